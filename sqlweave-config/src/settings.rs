//! Scalar settings, their recognized names and defaults

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, ConfigResult};
use crate::properties::Properties;
use crate::type_handler::JdbcType;

/// Setting naming the virtual filesystem implementations
pub const VFS_IMPL: &str = "vfsImpl";

/// Every setting name a document may use (case sensitive)
pub const KNOWN_SETTINGS: &[&str] = &[
    "autoMappingBehavior",
    "autoMappingUnknownColumnBehavior",
    "cacheEnabled",
    "proxyFactory",
    "lazyLoadingEnabled",
    "aggressiveLazyLoading",
    "multipleResultSetsEnabled",
    "useColumnLabel",
    "useGeneratedKeys",
    "defaultExecutorType",
    "defaultStatementTimeout",
    "defaultFetchSize",
    "mapUnderscoreToCamelCase",
    "safeRowBoundsEnabled",
    "localCacheScope",
    "jdbcTypeForNull",
    "lazyLoadTriggerMethods",
    "safeResultHandlerEnabled",
    "defaultScriptingLanguage",
    "defaultEnumTypeHandler",
    "callSettersOnNulls",
    "useActualParamName",
    "returnInstanceForEmptyRow",
    "logPrefix",
    "logImpl",
    "configurationFactory",
    VFS_IMPL,
];

const DEFAULT_LAZY_LOAD_TRIGGER_METHODS: &str = "equals,clone,hashCode,toString";

/// Fail with `UnknownSetting` on the first unrecognized key
pub fn validate_setting_keys(props: &Properties) -> ConfigResult<()> {
    match props.keys().find(|key| !KNOWN_SETTINGS.contains(&key.as_str())) {
        Some(key) => Err(ConfigError::UnknownSetting { key: key.clone() }),
        None => Ok(()),
    }
}

macro_rules! setting_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(format!("expected one of: {}", [$($text),+].join(", "))),
                }
            }
        }
    };
}

setting_enum!(
    /// How columns are mapped automatically to result properties
    AutoMappingBehavior {
        None => "NONE",
        Partial => "PARTIAL",
        Full => "FULL",
    }
);

setting_enum!(
    /// What to do with columns that cannot be mapped automatically
    AutoMappingUnknownColumnBehavior {
        None => "NONE",
        Warning => "WARNING",
        Failing => "FAILING",
    }
);

setting_enum!(
    /// Statement execution strategy
    ExecutorType {
        Simple => "SIMPLE",
        Reuse => "REUSE",
        Batch => "BATCH",
    }
);

setting_enum!(
    /// Lifetime of the session-local cache
    LocalCacheScope {
        Session => "SESSION",
        Statement => "STATEMENT",
    }
);

/// Scalar settings forwarded to the execution engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub auto_mapping_behavior: AutoMappingBehavior,
    pub auto_mapping_unknown_column_behavior: AutoMappingUnknownColumnBehavior,
    pub cache_enabled: bool,
    pub proxy_factory: Option<String>,
    pub lazy_loading_enabled: bool,
    pub aggressive_lazy_loading: bool,
    pub multiple_result_sets_enabled: bool,
    pub use_column_label: bool,
    pub use_generated_keys: bool,
    pub default_executor_type: ExecutorType,
    pub default_statement_timeout: Option<i32>,
    pub default_fetch_size: Option<i32>,
    pub map_underscore_to_camel_case: bool,
    pub safe_row_bounds_enabled: bool,
    pub local_cache_scope: LocalCacheScope,
    pub jdbc_type_for_null: JdbcType,
    pub lazy_load_trigger_methods: BTreeSet<String>,
    pub safe_result_handler_enabled: bool,
    pub default_scripting_language: Option<String>,
    /// Resolved type id of the default enum handler
    pub default_enum_type_handler: Option<String>,
    pub call_setters_on_nulls: bool,
    pub use_actual_param_name: bool,
    pub return_instance_for_empty_row: bool,
    pub log_prefix: Option<String>,
    pub log_impl: Option<String>,
    pub configuration_factory: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_mapping_behavior: AutoMappingBehavior::Partial,
            auto_mapping_unknown_column_behavior: AutoMappingUnknownColumnBehavior::None,
            cache_enabled: true,
            proxy_factory: None,
            lazy_loading_enabled: false,
            aggressive_lazy_loading: false,
            multiple_result_sets_enabled: true,
            use_column_label: true,
            use_generated_keys: false,
            default_executor_type: ExecutorType::Simple,
            default_statement_timeout: None,
            default_fetch_size: None,
            map_underscore_to_camel_case: false,
            safe_row_bounds_enabled: false,
            local_cache_scope: LocalCacheScope::Session,
            jdbc_type_for_null: JdbcType::Other,
            lazy_load_trigger_methods: parse_string_set(DEFAULT_LAZY_LOAD_TRIGGER_METHODS),
            safe_result_handler_enabled: true,
            default_scripting_language: None,
            default_enum_type_handler: None,
            call_setters_on_nulls: false,
            use_actual_param_name: true,
            return_instance_for_empty_row: false,
            log_prefix: None,
            log_impl: None,
            configuration_factory: None,
        }
    }
}

impl Settings {
    /// Build settings from validated properties; absent keys take defaults.
    ///
    /// `defaultEnumTypeHandler` is copied verbatim; the assembler resolves it
    /// against the type catalog.
    pub fn from_properties(props: &Properties) -> ConfigResult<Self> {
        let defaults = Settings::default();
        let reader = SettingsReader { props };

        Ok(Self {
            auto_mapping_behavior: reader.parsed("autoMappingBehavior", defaults.auto_mapping_behavior)?,
            auto_mapping_unknown_column_behavior: reader.parsed(
                "autoMappingUnknownColumnBehavior",
                defaults.auto_mapping_unknown_column_behavior,
            )?,
            cache_enabled: reader.boolean("cacheEnabled", defaults.cache_enabled)?,
            proxy_factory: reader.text("proxyFactory"),
            lazy_loading_enabled: reader.boolean("lazyLoadingEnabled", defaults.lazy_loading_enabled)?,
            aggressive_lazy_loading: reader.boolean("aggressiveLazyLoading", defaults.aggressive_lazy_loading)?,
            multiple_result_sets_enabled: reader
                .boolean("multipleResultSetsEnabled", defaults.multiple_result_sets_enabled)?,
            use_column_label: reader.boolean("useColumnLabel", defaults.use_column_label)?,
            use_generated_keys: reader.boolean("useGeneratedKeys", defaults.use_generated_keys)?,
            default_executor_type: reader.parsed("defaultExecutorType", defaults.default_executor_type)?,
            default_statement_timeout: reader.integer("defaultStatementTimeout")?,
            default_fetch_size: reader.integer("defaultFetchSize")?,
            map_underscore_to_camel_case: reader
                .boolean("mapUnderscoreToCamelCase", defaults.map_underscore_to_camel_case)?,
            safe_row_bounds_enabled: reader.boolean("safeRowBoundsEnabled", defaults.safe_row_bounds_enabled)?,
            local_cache_scope: reader.parsed("localCacheScope", defaults.local_cache_scope)?,
            jdbc_type_for_null: reader.parsed("jdbcTypeForNull", defaults.jdbc_type_for_null)?,
            lazy_load_trigger_methods: reader
                .text("lazyLoadTriggerMethods")
                .map(|value| parse_string_set(&value))
                .unwrap_or(defaults.lazy_load_trigger_methods),
            safe_result_handler_enabled: reader
                .boolean("safeResultHandlerEnabled", defaults.safe_result_handler_enabled)?,
            default_scripting_language: reader.text("defaultScriptingLanguage"),
            default_enum_type_handler: reader.text("defaultEnumTypeHandler"),
            call_setters_on_nulls: reader.boolean("callSettersOnNulls", defaults.call_setters_on_nulls)?,
            use_actual_param_name: reader.boolean("useActualParamName", defaults.use_actual_param_name)?,
            return_instance_for_empty_row: reader
                .boolean("returnInstanceForEmptyRow", defaults.return_instance_for_empty_row)?,
            log_prefix: reader.text("logPrefix"),
            log_impl: reader.text("logImpl"),
            configuration_factory: reader.text("configurationFactory"),
        })
    }
}

struct SettingsReader<'a> {
    props: &'a Properties,
}

impl SettingsReader<'_> {
    fn text(&self, key: &str) -> Option<String> {
        self.props.get(key).cloned()
    }

    fn boolean(&self, key: &str, default: bool) -> ConfigResult<bool> {
        match self.props.get(key) {
            None => Ok(default),
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(ConfigError::invalid_value(key, value, "expected true or false")),
            },
        }
    }

    fn integer(&self, key: &str) -> ConfigResult<Option<i32>> {
        self.props
            .get(key)
            .map(|value| {
                value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::invalid_value(key, value, "expected an integer"))
            })
            .transpose()
    }

    fn parsed<T>(&self, key: &str, default: T) -> ConfigResult<T>
    where
        T: FromStr<Err = String>,
    {
        match self.props.get(key) {
            None => Ok(default),
            Some(value) => value
                .trim()
                .parse()
                .map_err(|reason| ConfigError::invalid_value(key, value, reason)),
        }
    }
}

fn parse_string_set(value: &str) -> BTreeSet<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
