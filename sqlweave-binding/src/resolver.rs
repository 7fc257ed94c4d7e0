//! Positional argument → named parameter resolution

use serde_json::Value;
use tracing::trace;

use crate::param_map::{ParamBinding, ParamMap};
use crate::signature::MethodSignature;

/// Prefix of the generic `param1`, `param2`, ... names
pub const GENERIC_NAME_PREFIX: &str = "param";

/// Immutable naming table for one callable signature.
///
/// Resolved once per signature; `bind` can then be called from any number
/// of threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamNameResolver {
    /// (argument position, resolved name), in declaration order
    names: Vec<(usize, String)>,
    has_name_override: bool,
}

impl ParamNameResolver {
    /// Resolve names for `signature`.
    ///
    /// An explicit override always wins. Otherwise the declared identifier is
    /// used when `use_actual_param_name` is set and the identifier is known,
    /// falling back to the count of parameters named so far.
    pub fn new(signature: &MethodSignature, use_actual_param_name: bool) -> Self {
        let mut names: Vec<(usize, String)> = Vec::with_capacity(signature.params.len());
        let mut has_name_override = false;

        for (position, param) in signature.params.iter().enumerate() {
            if param.kind.is_special() {
                continue;
            }
            let name = match &param.name_override {
                Some(name) => {
                    has_name_override = true;
                    name.clone()
                }
                None => param
                    .declared_name
                    .clone()
                    .filter(|_| use_actual_param_name)
                    .unwrap_or_else(|| names.len().to_string()),
            };
            names.push((position, name));
        }

        trace!(signature = %signature.id, names = ?names, "Resolved parameter names");
        Self {
            names,
            has_name_override,
        }
    }

    /// Resolved names in declaration order
    pub fn names(&self) -> Vec<&str> {
        self.names.iter().map(|(_, name)| name.as_str()).collect()
    }

    /// (argument position, name) pairs
    pub fn name_table(&self) -> &[(usize, String)] {
        &self.names
    }

    pub fn has_name_override(&self) -> bool {
        self.has_name_override
    }

    /// Bind one call's raw arguments.
    ///
    /// Positions beyond the end of `args` bind to `null`; argument counts are
    /// the caller's contract and are not validated here.
    pub fn bind(&self, args: &[Value]) -> ParamBinding {
        let argument = |position: usize| args.get(position).cloned().unwrap_or(Value::Null);

        match self.names.as_slice() {
            [] => ParamBinding::Absent,
            [(position, _)] if !self.has_name_override => ParamBinding::Single(argument(*position)),
            names => {
                let mut map = ParamMap::new();
                for (index, (position, name)) in names.iter().enumerate() {
                    map.insert(name.clone(), argument(*position));
                    let generic = format!("{}{}", GENERIC_NAME_PREFIX, index + 1);
                    if !self.is_resolved_name(&generic) {
                        map.insert(generic, argument(*position));
                    }
                }
                ParamBinding::Named(map)
            }
        }
    }

    fn is_resolved_name(&self, name: &str) -> bool {
        self.names.iter().any(|(_, resolved)| resolved == name)
    }
}
