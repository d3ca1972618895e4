//! GlobalTemplate - host-side composition of plugin namespaces.
//!
//! Plugins never touch the shared global object directly. Each one fills its own
//! [`Namespace`], and the host merges namespaces here, so name collisions and
//! registration order are explicit. The template is turned into a
//! `v8::ObjectTemplate` only when a context is created.

use super::namespace::{Export, ExportValue, Namespace};
use crate::config::CollisionPolicy;
use crate::error::PluginError;
use v8;

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    owner: String,
    export: Export,
}

#[derive(Debug, Clone, Default)]
pub struct GlobalTemplate {
    entries: Vec<Entry>,
}

impl GlobalTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a plugin namespace into the template.
    ///
    /// With [`CollisionPolicy::Reject`] the merge is all-or-nothing: if any
    /// export collides with a name owned by another plugin, nothing is added.
    /// Returns the number of exports merged.
    pub fn merge(
        &mut self,
        namespace: Namespace,
        policy: CollisionPolicy,
    ) -> Result<usize, PluginError> {
        let (plugin, exports) = namespace.into_parts();

        if policy == CollisionPolicy::Reject {
            for (name, _) in &exports {
                if let Some(owner) = self.owner(name) {
                    return Err(PluginError::DuplicateExport {
                        plugin,
                        name: name.clone(),
                        owner: owner.to_string(),
                    });
                }
            }
        }

        let count = exports.len();

        for (name, export) in exports {
            match self.entries.iter_mut().find(|e| e.name == name) {
                Some(entry) => {
                    tracing::warn!(
                        "Plugin '{}' overwrites global '{}' (previously from '{}')",
                        plugin,
                        name,
                        entry.owner
                    );
                    entry.owner = plugin.clone();
                    entry.export = export;
                }
                None => {
                    tracing::debug!("Plugin '{}' exports global '{}'", plugin, name);
                    self.entries.push(Entry {
                        name,
                        owner: plugin.clone(),
                        export,
                    });
                }
            }
        }

        Ok(count)
    }

    /// Plugin that currently provides `name`.
    pub fn owner(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.owner.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.owner(name).is_some()
    }

    /// Exported names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the engine object template. Must run inside a handle scope.
    pub(crate) fn build<'s>(
        &self,
        scope: &mut v8::PinScope<'s, '_, ()>,
    ) -> Result<v8::Local<'s, v8::ObjectTemplate>, PluginError> {
        let template = v8::ObjectTemplate::new(scope);

        for entry in &self.entries {
            let key = v8::String::new(scope, &entry.name).ok_or_else(|| {
                PluginError::Engine(format!("failed to allocate name '{}'", entry.name))
            })?;

            match &entry.export {
                Export::Function(callback) => {
                    let function = v8::FunctionTemplate::builder_raw(*callback).build(scope);
                    template.set(key.into(), function.into());
                }
                Export::Value { value, attributes } => {
                    let value = primitive(scope, value).ok_or_else(|| {
                        PluginError::Engine(format!("failed to allocate value '{}'", entry.name))
                    })?;
                    template.set_with_attr(key.into(), value.into(), attributes.to_v8());
                }
            }
        }

        Ok(template)
    }
}

fn primitive<'s>(
    scope: &mut v8::PinScope<'s, '_, ()>,
    value: &ExportValue,
) -> Option<v8::Local<'s, v8::Value>> {
    let local: v8::Local<v8::Value> = match value {
        ExportValue::Undefined => v8::undefined(scope).into(),
        ExportValue::Null => v8::null(scope).into(),
        ExportValue::Bool(b) => v8::Boolean::new(scope, *b).into(),
        ExportValue::Number(n) => v8::Number::new(scope, *n).into(),
        ExportValue::String(s) => v8::String::new(scope, s)?.into(),
    };

    Some(local)
}
