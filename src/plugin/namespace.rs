//! Per-plugin export table.

use crate::error::PluginError;
use v8::{self, MapFnTo};

/// Property attributes applied to an exported value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Attributes {
    pub read_only: bool,
    pub dont_enum: bool,
    pub dont_delete: bool,
}

impl Attributes {
    pub const NONE: Attributes = Attributes {
        read_only: false,
        dont_enum: false,
        dont_delete: false,
    };

    /// Read-only and non-deletable, still enumerable.
    pub const CONSTANT: Attributes = Attributes {
        read_only: true,
        dont_enum: false,
        dont_delete: true,
    };

    pub(crate) fn to_v8(self) -> v8::PropertyAttribute {
        let mut attr = v8::PropertyAttribute::NONE;

        if self.read_only {
            attr = attr | v8::PropertyAttribute::READ_ONLY;
        }
        if self.dont_enum {
            attr = attr | v8::PropertyAttribute::DONT_ENUM;
        }
        if self.dont_delete {
            attr = attr | v8::PropertyAttribute::DONT_DELETE;
        }

        attr
    }
}

/// Primitive values a plugin can place on the global template.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl From<bool> for ExportValue {
    fn from(v: bool) -> Self {
        ExportValue::Bool(v)
    }
}

impl From<f64> for ExportValue {
    fn from(v: f64) -> Self {
        ExportValue::Number(v)
    }
}

impl From<i32> for ExportValue {
    fn from(v: i32) -> Self {
        ExportValue::Number(v as f64)
    }
}

impl From<&str> for ExportValue {
    fn from(v: &str) -> Self {
        ExportValue::String(v.to_string())
    }
}

impl From<String> for ExportValue {
    fn from(v: String) -> Self {
        ExportValue::String(v)
    }
}

#[derive(Debug, Clone)]
pub enum Export {
    Function(v8::FunctionCallback),
    Value {
        value: ExportValue,
        attributes: Attributes,
    },
}

/// Exports collected during one plugin registration.
///
/// A namespace belongs to a single plugin; the host merges it into a
/// [`crate::GlobalTemplate`] once the plugin body has returned successfully.
#[derive(Debug)]
pub struct Namespace {
    plugin: String,
    exports: Vec<(String, Export)>,
}

impl Namespace {
    pub fn new(plugin: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            exports: Vec::new(),
        }
    }

    /// Export a native function under `name`.
    pub fn function(
        &mut self,
        name: impl Into<String>,
        callback: impl MapFnTo<v8::FunctionCallback>,
    ) -> &mut Self {
        self.insert(name.into(), Export::Function(callback.map_fn_to()))
    }

    /// Export a primitive value with default attributes.
    pub fn value(&mut self, name: impl Into<String>, value: impl Into<ExportValue>) -> &mut Self {
        self.value_with(name, value, Attributes::NONE)
    }

    pub fn value_with(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ExportValue>,
        attributes: Attributes,
    ) -> &mut Self {
        self.insert(
            name.into(),
            Export::Value {
                value: value.into(),
                attributes,
            },
        )
    }

    pub fn contains(&self, name: &str) -> bool {
        self.exports.iter().any(|(n, _)| n == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.exports.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.exports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exports.is_empty()
    }

    pub(crate) fn validate(&self) -> Result<(), PluginError> {
        match self.exports.iter().find(|(name, _)| name.is_empty()) {
            Some((name, _)) => Err(PluginError::InvalidName {
                plugin: self.plugin.clone(),
                name: name.clone(),
            }),
            None => Ok(()),
        }
    }

    pub(crate) fn into_parts(self) -> (String, Vec<(String, Export)>) {
        (self.plugin, self.exports)
    }

    fn insert(&mut self, name: String, export: Export) -> &mut Self {
        match self.exports.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = export,
            None => self.exports.push((name, export)),
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_scope: &mut v8::PinScope, _args: v8::FunctionCallbackArguments, _rv: v8::ReturnValue) {}

    #[test]
    fn test_exports_keep_insertion_order() {
        let mut ns = Namespace::new("sample");
        ns.function("b", noop).value("a", 1).value("c", "three");

        assert_eq!(ns.names().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(ns.len(), 3);
        assert!(ns.contains("a"));
        assert!(!ns.contains("d"));
    }

    #[test]
    fn test_duplicate_name_replaces_in_place() {
        let mut ns = Namespace::new("sample");
        ns.value("x", 1).value("y", 2).value("x", true);

        assert_eq!(ns.names().collect::<Vec<_>>(), vec!["x", "y"]);

        let (_, exports) = ns.into_parts();
        match &exports[0].1 {
            Export::Value { value, .. } => assert_eq!(*value, ExportValue::Bool(true)),
            other => panic!("unexpected export: {:?}", other),
        }
    }

    #[test]
    fn test_empty_name_is_invalid() {
        let mut ns = Namespace::new("sample");
        ns.value("", 1);

        let err = ns.validate().unwrap_err();
        assert!(matches!(err, PluginError::InvalidName { ref plugin, .. } if plugin == "sample"));
    }
}
