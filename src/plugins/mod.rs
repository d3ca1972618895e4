//! Plugins shipped with the crate.

mod log;

pub use self::log::{LOG_PLUGIN, log_plugin};

use crate::plugin::Plugin;

/// Every built-in plugin, in registration order.
pub fn builtin() -> Vec<Box<dyn Plugin>> {
    vec![Box::new(log_plugin())]
}
