//! Key/value property sets and `${name}` substitution

use std::collections::BTreeMap;

use crate::error::{ConfigError, ConfigResult};

/// Flat key/value set used for variables, settings and element properties
pub type Properties = BTreeMap<String, String>;

const OPEN_TOKEN: &str = "${";
const CLOSE_TOKEN: char = '}';

/// Replace every `${name}` in `text` with its value from `vars`.
///
/// Placeholders naming an unknown variable are left in place, so a later
/// stage (or the execution engine) can still see them.
pub fn substitute(text: &str, vars: &Properties) -> String {
    if !text.contains(OPEN_TOKEN) {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(OPEN_TOKEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN_TOKEN.len()..];
        match after_open.find(CLOSE_TOKEN) {
            Some(end) => {
                let key = &after_open[..end];
                match vars.get(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str(OPEN_TOKEN);
                        out.push_str(key);
                        out.push(CLOSE_TOKEN);
                    }
                }
                rest = &after_open[end + 1..];
            }
            None => {
                // Unterminated placeholder, keep the remainder verbatim
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Parse the line-oriented `key=value` property file format.
///
/// Supports `=`, `:` or whitespace separators, `#`/`!` comment lines,
/// trailing-backslash continuations and the usual escapes.
pub fn parse_properties(text: &str) -> Properties {
    let mut props = Properties::new();
    let mut logical = String::new();

    for raw in text.lines() {
        let line = raw.trim_start();
        if logical.is_empty() && (line.is_empty() || line.starts_with('#') || line.starts_with('!')) {
            continue;
        }

        if ends_with_continuation(line) {
            logical.push_str(&line[..line.len() - 1]);
            continue;
        }
        logical.push_str(line);

        let (key, value) = split_property_line(&logical);
        props.insert(unescape(&key), unescape(&value));
        logical.clear();
    }

    if !logical.is_empty() {
        let (key, value) = split_property_line(&logical);
        props.insert(unescape(&key), unescape(&value));
    }

    props
}

/// Flatten a YAML mapping into properties, joining nested keys with `.`
pub fn parse_yaml_properties(text: &str) -> ConfigResult<Properties> {
    let value: serde_yaml::Value = serde_yaml::from_str(text)?;
    let mut props = Properties::new();
    match value {
        serde_yaml::Value::Mapping(_) => flatten_yaml("", &value, &mut props),
        serde_yaml::Value::Null => {}
        _ => {
            return Err(ConfigError::invalid_value(
                "properties",
                "<document>",
                "a YAML property source must be a mapping",
            ))
        }
    }
    Ok(props)
}

fn flatten_yaml(prefix: &str, value: &serde_yaml::Value, props: &mut Properties) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (key, child) in map {
                let Some(key) = scalar_to_string(key) else {
                    continue;
                };
                let full = if prefix.is_empty() {
                    key
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_yaml(&full, child, props);
            }
        }
        serde_yaml::Value::Sequence(items) => {
            let joined: Vec<String> = items.iter().filter_map(scalar_to_string).collect();
            props.insert(prefix.to_string(), joined.join(","));
        }
        other => {
            if let Some(text) = scalar_to_string(other) {
                props.insert(prefix.to_string(), text);
            }
        }
    }
}

/// Render a YAML scalar as text, `None` for collections
pub(crate) fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Null => Some(String::new()),
        serde_yaml::Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        _ => None,
    }
}

fn ends_with_continuation(line: &str) -> bool {
    let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
    trailing % 2 == 1
}

fn split_property_line(line: &str) -> (String, String) {
    let mut escaped = false;
    for (idx, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                let key = line[..idx].trim_end().to_string();
                let value = line[idx + 1..].trim_start().to_string();
                return (key, value);
            }
            c if c.is_whitespace() => {
                let key = line[..idx].to_string();
                let mut value = line[idx..].trim_start();
                if let Some(stripped) = value.strip_prefix('=').or_else(|| value.strip_prefix(':')) {
                    value = stripped.trim_start();
                }
                return (key, value.to_string());
            }
            _ => {}
        }
    }
    (line.to_string(), String::new())
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Properties {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_substitute_known_and_unknown() {
        let vars = vars(&[("user", "sa"), ("db", "blog")]);
        assert_eq!(
            substitute("jdbc://${db}?user=${user}&pw=${password}", &vars),
            "jdbc://blog?user=sa&pw=${password}"
        );
        assert_eq!(substitute("plain", &vars), "plain");
        assert_eq!(substitute("broken ${user", &vars), "broken ${user");
    }

    #[test]
    fn test_parse_properties_formats() {
        let text = "\
# comment
! another comment
driver=org.h2.Driver
url : jdbc:h2:mem:test
username sa
password=
long=first \\
     second
escaped\\=key=value\\tTab
";
        let props = parse_properties(text);
        assert_eq!(props["driver"], "org.h2.Driver");
        assert_eq!(props["url"], "jdbc:h2:mem:test");
        assert_eq!(props["username"], "sa");
        assert_eq!(props["password"], "");
        assert_eq!(props["long"], "first second");
        assert_eq!(props["escaped=key"], "value\tTab");
        assert_eq!(props.len(), 6);
    }

    #[test]
    fn test_parse_yaml_properties_flattens() {
        let props = parse_yaml_properties(
            "db:\n  url: sqlite://blog.db\n  pool: 5\nflags: [a, b]\n",
        )
        .unwrap();
        assert_eq!(props["db.url"], "sqlite://blog.db");
        assert_eq!(props["db.pool"], "5");
        assert_eq!(props["flags"], "a,b");
    }

    #[test]
    fn test_parse_yaml_properties_rejects_scalars() {
        assert!(parse_yaml_properties("just a string").is_err());
    }
}
