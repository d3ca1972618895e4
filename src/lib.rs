//! Native plugins for embedded V8 isolates.
//!
//! A plugin contributes named globals (native functions or constants) to the
//! contexts an [`Engine`] creates. Plugins fill their own [`Namespace`]; the host
//! composes namespaces into a [`GlobalTemplate`] and builds contexts from it.
//!
//! ```ignore
//! use openworkers_plugin_v8::{Engine, EngineConfig, GlobalTemplate, plugins};
//!
//! let mut engine = Engine::new(EngineConfig::default());
//! let mut global = GlobalTemplate::new();
//! engine.register(&mut global, &plugins::log_plugin())?;
//!
//! let ctx = engine.new_context(Some(&global))?;
//! engine.eval(&ctx, r#"log("Hello Plugin!")"#)?;
//! ```

#[macro_use]
mod macros;

pub mod config;
pub mod engine;
pub mod error;
pub mod lock;
pub mod output;
pub mod platform;
pub mod plugin;
pub mod plugins;

pub use config::{CollisionPolicy, EngineConfig};
pub use engine::{Context, Engine};
pub use error::{ConfigError, ExceptionDetails, PluginError, ScriptError};
pub use lock::IsolateLock;
pub use output::{Output, SharedBuffer};
pub use plugin::{
    Attributes, Export, ExportValue, GlobalTemplate, Namespace, Plugin, PluginFn, plugin_fn,
};
