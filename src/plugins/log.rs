//! `log(value)` - print the first argument to the engine output.

use crate::error::PluginError;
use crate::output::Output;
use crate::plugin::{Namespace, Plugin, plugin_fn};
use v8;

pub const LOG_PLUGIN: &str = "log";

/// Native `log`.
///
/// Only the first argument is consulted; with no arguments the call is a
/// silent no-op. The value is coerced with the engine's own `ToString`, so a
/// throwing `toString()` leaves its exception pending for the caller script.
fn log(scope: &mut v8::PinScope, args: v8::FunctionCallbackArguments, _retval: v8::ReturnValue) {
    if args.length() < 1 {
        return;
    }

    let Some(text) = args.get(0).to_string(scope) else {
        return;
    };
    let text = text.to_rust_string_lossy(scope);

    match scope.get_current_context().get_slot::<Output>() {
        Some(output) => output.write_line(&text),
        None => Output::Stdout.write_line(&text),
    }
}

pub fn log_plugin() -> impl Plugin {
    plugin_fn(LOG_PLUGIN, |ns: &mut Namespace| -> Result<(), PluginError> {
        ns.function("log", log);
        Ok(())
    })
}
