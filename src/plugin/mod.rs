//! Plugin registration convention.
//!
//! A plugin is anything implementing [`Plugin`]: a name plus a body that fills a
//! [`Namespace`]. Plain functions and closures become plugins via [`plugin_fn`].
//! The host runs bodies through [`crate::Engine::register`], which holds the
//! isolate lock for the duration of the body and merges the result into a
//! [`GlobalTemplate`].

mod namespace;
mod template;

pub use namespace::{Attributes, Export, ExportValue, Namespace};
pub use template::GlobalTemplate;

use crate::error::PluginError;

/// Contract shared by plugin producers and the host that loads them.
pub trait Plugin {
    fn name(&self) -> &str;

    /// Declare this plugin's exports. Errors abort the registration and
    /// nothing from this plugin is installed.
    fn register(&self, namespace: &mut Namespace) -> Result<(), PluginError>;
}

/// A plugin backed by a plain function or closure.
pub struct PluginFn<F> {
    name: String,
    body: F,
}

/// Wrap `body` as a plugin named `name`.
///
/// ```ignore
/// let plugin = plugin_fn("math", |ns: &mut Namespace| {
///     ns.value_with("PI", std::f64::consts::PI, Attributes::CONSTANT);
///     Ok(())
/// });
/// engine.register(&mut global, &plugin)?;
/// ```
pub fn plugin_fn<F>(name: impl Into<String>, body: F) -> PluginFn<F>
where
    F: Fn(&mut Namespace) -> Result<(), PluginError>,
{
    PluginFn {
        name: name.into(),
        body,
    }
}

impl<F> Plugin for PluginFn<F>
where
    F: Fn(&mut Namespace) -> Result<(), PluginError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn register(&self, namespace: &mut Namespace) -> Result<(), PluginError> {
        (self.body)(namespace)
    }
}
