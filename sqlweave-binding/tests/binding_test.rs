//! Integration tests for sqlweave-binding

use serde_json::{json, Value};
use sqlweave_binding::*;

fn named(binding: &ParamBinding) -> Vec<(String, Value)> {
    binding
        .as_named()
        .expect("expected a named binding")
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

fn entries(pairs: &[(&str, Value)]) -> Vec<(String, Value)> {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

#[test]
fn test_two_positional_parameters() {
    let signature = MethodSignature::new("Mapper.add")
        .param(ParamDescriptor::value("i32").declared("a"))
        .param(ParamDescriptor::value("i32").declared("b"));
    let resolver = ParamNameResolver::new(&signature, false);

    assert_eq!(resolver.name_table(), &[(0, "0".to_string()), (1, "1".to_string())]);
    let binding = resolver.bind(&[json!(5), json!(7)]);
    assert_eq!(
        named(&binding),
        entries(&[("0", json!(5)), ("param1", json!(5)), ("1", json!(7)), ("param2", json!(7))])
    );
    assert_eq!(
        binding.into_value(),
        json!({"0": 5, "1": 7, "param1": 5, "param2": 7})
    );
}

#[test]
fn test_single_parameter_is_unwrapped() {
    let signature = MethodSignature::new("Mapper.find").param(ParamDescriptor::value("i32").declared("a"));
    for use_actual_param_name in [true, false] {
        let binding = ParamNameResolver::new(&signature, use_actual_param_name).bind(&[json!(5)]);
        assert_eq!(binding, ParamBinding::Single(json!(5)));
    }
}

#[test]
fn test_special_parameter_is_skipped() {
    let signature = MethodSignature::new("Mapper.page")
        .param(ParamDescriptor::value("i32").declared("a"))
        .param(ParamDescriptor::row_bounds())
        .param(ParamDescriptor::value("i32").declared("b"));
    let resolver = ParamNameResolver::new(&signature, false);

    assert_eq!(resolver.name_table(), &[(0, "0".to_string()), (2, "1".to_string())]);
    let binding = resolver.bind(&[json!(5), json!({"offset": 10, "limit": 20}), json!(9)]);
    assert_eq!(
        binding.into_value(),
        json!({"0": 5, "1": 9, "param1": 5, "param2": 9})
    );
}

#[test]
fn test_result_handler_is_skipped() {
    let signature = MethodSignature::new("Mapper.stream")
        .param(ParamDescriptor::result_handler())
        .param(ParamDescriptor::value("String").declared("name"));
    let resolver = ParamNameResolver::new(&signature, true);
    assert_eq!(resolver.name_table(), &[(1, "name".to_string())]);
    assert_eq!(resolver.bind(&[Value::Null, json!("x")]), ParamBinding::Single(json!("x")));
}

#[test]
fn test_explicit_generic_name_is_never_overwritten() {
    let signature = MethodSignature::new("Mapper.swap")
        .param(ParamDescriptor::value("i32"))
        .param(ParamDescriptor::value("i32").named("param1"));
    let resolver = ParamNameResolver::new(&signature, false);
    assert!(resolver.has_name_override());
    assert_eq!(resolver.names(), vec!["0", "param1"]);

    let binding = resolver.bind(&[json!(1), json!(2)]);
    let map = binding.as_named().unwrap();
    assert_eq!(map.get("param1").unwrap(), &json!(2));
    assert_eq!(map.get("0").unwrap(), &json!(1));
    assert_eq!(map.get("param2").unwrap(), &json!(2));
    assert_eq!(map.len(), 3);
}

#[test]
fn test_overrides_and_declared_names() {
    let signature = MethodSignature::new("Mapper.search")
        .param(ParamDescriptor::value("String").declared("title").named("t"))
        .param(ParamDescriptor::value("i64").declared("authorId"));
    let binding = ParamNameResolver::new(&signature, true).bind(&[json!("Rust"), json!(3)]);
    assert_eq!(
        binding.into_value(),
        json!({"t": "Rust", "authorId": 3, "param1": "Rust", "param2": 3})
    );
}

#[test]
fn test_unknown_name_is_an_error() {
    let signature = MethodSignature::new("Mapper.add")
        .param(ParamDescriptor::value("i32"))
        .param(ParamDescriptor::value("i32"));
    let binding = ParamNameResolver::new(&signature, false).bind(&[json!(1), json!(2)]);
    let err = binding.as_named().unwrap().get("param3").unwrap_err();
    assert!(matches!(err, BindingError::ParameterNotFound { name, .. } if name == "param3"));
}

#[test]
fn test_no_names_is_absent_even_with_arguments() {
    let signature = MethodSignature::new("Mapper.count");
    let binding = ParamNameResolver::new(&signature, true).bind(&[json!(1)]);
    assert!(binding.is_absent());
    assert_eq!(binding.into_value(), Value::Null);
}
