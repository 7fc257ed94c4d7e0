//! Integration tests for sqlweave-session

use std::fs;
use std::sync::{Arc, Mutex};

use serde_json::json;
use sqlweave_binding::{MethodSignature, ParamBinding, ParamDescriptor};
use sqlweave_config::{ConfigError, ConfigResult, Configuration, MapperDocument, MapperDocumentAssembler};
use sqlweave_session::*;
use temp_env::with_vars;
use tempfile::TempDir;

const DOCUMENT: &str = r#"
configuration:
  properties:
    property:
      - { name: url, value: "sqlite://doc.db" }
  settings:
    setting:
      - { name: useActualParamName, value: "${actual}" }
  environments:
    default: dev
    environment:
      - id: dev
        transactionManager: { type: JDBC }
        dataSource:
          type: UNPOOLED
          property:
            - { name: url, value: "${url}" }
      - id: test
        transactionManager: { type: MANAGED }
        dataSource:
          type: UNPOOLED
          property:
            - { name: url, value: "postgres://ci/test" }
  databaseIdProvider:
    type: DB_VENDOR
"#;

fn builder() -> SessionFactoryBuilder {
    SessionFactoryBuilder::new().env_prefix(None).variable("actual", "true")
}

#[test]
fn test_build_from_str_selects_default_environment() {
    let factory = builder().build_from_str(DOCUMENT).unwrap();
    let configuration = factory.configuration();
    assert_eq!(configuration.environment().unwrap().id(), "dev");
    assert_eq!(configuration.database_id(), Some("SQLite"));
}

#[test]
fn test_explicit_environment_and_bytes_input() {
    let factory = builder()
        .environment("test")
        .build_from_bytes(DOCUMENT.as_bytes())
        .unwrap();
    let configuration = factory.configuration();
    assert_eq!(configuration.environment().unwrap().id(), "test");
    assert_eq!(configuration.database_id(), Some("PostgreSQL"));
}

#[test]
fn test_env_prefixed_variables_feed_substitution() {
    with_vars(
        [
            ("SQLWEAVE_url", Some("postgres://env/blog")),
            ("SQLWEAVE_actual", Some("false")),
        ],
        || {
            let factory = SessionFactoryBuilder::new().build_from_str(DOCUMENT).unwrap();
            let configuration = factory.configuration();
            assert_eq!(configuration.database_id(), Some("PostgreSQL"));
            assert!(!configuration.settings().use_actual_param_name);
        },
    );
}

#[test]
fn test_bind_follows_use_actual_param_name() {
    let signature = MethodSignature::new("BlogMapper.find")
        .param(ParamDescriptor::value("String").declared("title"))
        .param(ParamDescriptor::value("i64").declared("authorId"));

    let factory = builder().build_from_str(DOCUMENT).unwrap();
    let binding = factory.bind(&signature, &[json!("Rust"), json!(7)]);
    assert_eq!(
        binding.into_value(),
        json!({"title": "Rust", "authorId": 7, "param1": "Rust", "param2": 7})
    );
    let first = factory.param_resolver(&signature);
    assert!(Arc::ptr_eq(&first, &factory.param_resolver(&signature)));

    let factory = SessionFactoryBuilder::new()
        .env_prefix(None)
        .variable("actual", "false")
        .build_from_str(DOCUMENT)
        .unwrap();
    let binding = factory.bind(&signature, &[json!("Rust"), json!(7)]);
    assert_eq!(
        binding.into_value(),
        json!({"0": "Rust", "1": 7, "param1": "Rust", "param2": 7})
    );
}

#[test]
fn test_bind_keeps_overloads_apart() {
    let factory = SessionFactoryBuilder::new()
        .env_prefix(None)
        .variable("actual", "false")
        .build_from_str(DOCUMENT)
        .unwrap();
    let by_id = MethodSignature::new("BlogMapper.find").param(ParamDescriptor::value("i64"));
    let by_title = MethodSignature::new("BlogMapper.find")
        .param(ParamDescriptor::value("String"))
        .param(ParamDescriptor::value("i64"));

    assert_eq!(factory.bind(&by_id, &[json!(7)]), ParamBinding::Single(json!(7)));
    assert_eq!(
        factory.bind(&by_title, &[json!("Rust"), json!(7)]).into_value(),
        json!({"0": "Rust", "1": 7, "param1": "Rust", "param2": 7})
    );
}

#[test]
fn test_build_wraps_assembly_errors() {
    let err = builder().environment("prod").build_from_str(DOCUMENT).unwrap_err();
    assert!(err.to_string().starts_with("Error building session factory"));
    assert!(matches!(err.root_cause(), ConfigError::UnknownEnvironment { .. }));

    let err = builder().build_from_bytes(b"- not\n- a mapping\n").unwrap_err();
    assert!(matches!(err.root_cause(), ConfigError::InvalidValue { .. }));

    let err = builder().build_from_str("settings: [").unwrap_err();
    assert!(matches!(err.root_cause(), ConfigError::Yaml(_)));
}

#[derive(Default)]
struct RecordingAssembler {
    seen: Mutex<Vec<String>>,
}

impl MapperDocumentAssembler for RecordingAssembler {
    fn assemble(&self, _configuration: &mut Configuration, document: MapperDocument) -> ConfigResult<()> {
        self.seen.lock().unwrap().push(document.content);
        Ok(())
    }
}

#[test]
fn test_resource_roots_and_mapper_assembler() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("vars.properties"), "greeting=hello\n").unwrap();
    fs::write(dir.path().join("PostMapper.yaml"), "namespace: PostMapper\n").unwrap();

    let recorder = Arc::new(RecordingAssembler::default());
    let document = r#"
properties:
  resource: vars.properties
mappers:
  mapper:
    - { resource: PostMapper.yaml }
"#;
    let factory = builder()
        .resource_root(dir.path())
        .mapper_assembler(recorder.clone())
        .build_from_reader(document.as_bytes())
        .unwrap();

    assert_eq!(factory.configuration().variables()["greeting"], "hello");
    assert_eq!(*recorder.seen.lock().unwrap(), vec!["namespace: PostMapper\n".to_string()]);
}

#[test]
fn test_build_from_configuration() {
    let factory = SessionFactoryBuilder::new().build(Configuration::new());
    assert!(factory.configuration().environment().is_none());
    let signature = MethodSignature::new("Mapper.one").param(ParamDescriptor::value("i32"));
    assert_eq!(factory.bind(&signature, &[json!(1)]), ParamBinding::Single(json!(1)));
}
