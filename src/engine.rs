//! Engine - one V8 isolate plus the host side of the plugin handshake.
//!
//! The handshake mirrors how an embedder wires plugins in:
//! 1. create an engine (isolate)
//! 2. create a [`GlobalTemplate`]
//! 3. [`Engine::register`] each plugin against that template
//! 4. [`Engine::new_context`] from the populated template, then evaluate scripts

use std::panic::{self, AssertUnwindSafe};
use std::pin::pin;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use v8;

use crate::config::EngineConfig;
use crate::error::{PluginError, ScriptError};
use crate::lock::IsolateLock;
use crate::output::Output;
use crate::platform;
use crate::plugin::{GlobalTemplate, Namespace, Plugin};

static NEXT_ENGINE_ID: AtomicU64 = AtomicU64::new(1);

/// A V8 context created by an [`Engine`].
///
/// Only usable with the engine that created it; other engines reject it.
pub struct Context {
    engine_id: u64,
    inner: v8::Global<v8::Context>,
}

impl Context {
    pub fn engine_id(&self) -> u64 {
        self.engine_id
    }
}

pub struct Engine {
    id: u64,
    isolate: v8::UnenteredIsolate,
    config: EngineConfig,
    output: Rc<Output>,
}

impl Engine {
    /// Create a new isolate with the configured heap limits.
    ///
    /// The isolate is not entered on creation; every operation locks and enters
    /// it for its own duration, so engines can be used and dropped in any order.
    pub fn new(config: EngineConfig) -> Self {
        platform::get_platform();

        let (heap_initial, heap_max) = config.heap_limits_bytes();
        let params = v8::CreateParams::default().heap_limits(heap_initial, heap_max);
        let isolate = v8::Isolate::new_unentered(params);

        let id = NEXT_ENGINE_ID.fetch_add(1, Ordering::Relaxed);

        tracing::debug!(
            "Created engine {} (heap {}MB..{}MB, collisions: {:?})",
            id,
            config.heap_initial_mb,
            config.heap_max_mb,
            config.collision
        );

        Self {
            id,
            isolate,
            config,
            output: Rc::new(Output::default()),
        }
    }

    /// Redirect what native functions print. Applies to contexts created afterwards.
    pub fn with_output(mut self, output: Output) -> Self {
        self.set_output(output);
        self
    }

    pub fn set_output(&mut self, output: Output) {
        self.output = Rc::new(output);
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Run a plugin body and merge its exports into `global`.
    ///
    /// The isolate is locked (`v8::Locker`) and entered while the body runs,
    /// and released on every exit path. If the body returns an error or panics, the registration
    /// fails, `global` is left untouched and the error is returned; the caller
    /// decides whether to keep loading other plugins.
    pub fn register(
        &mut self,
        global: &mut GlobalTemplate,
        plugin: &dyn Plugin,
    ) -> Result<(), PluginError> {
        let mut locker = v8::Locker::new(&mut self.isolate);
        let _lock = IsolateLock::acquire(&mut locker);

        let name = plugin.name().to_string();
        let mut namespace = Namespace::new(name.clone());

        match panic::catch_unwind(AssertUnwindSafe(|| plugin.register(&mut namespace))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!("Plugin '{}' registration failed: {}", name, e);
                return Err(e);
            }
            Err(payload) => {
                let reason = panic_reason(payload.as_ref());
                tracing::error!("Plugin '{}' panicked during registration: {}", name, reason);
                return Err(PluginError::Panicked {
                    plugin: name,
                    reason,
                });
            }
        }

        namespace.validate()?;

        let count = global.merge(namespace, self.config.collision)?;
        tracing::info!("Registered plugin '{}' ({} exports)", name, count);

        Ok(())
    }

    /// Create a context whose global object is built from `global`.
    ///
    /// With `None` the context only has the engine's built-in globals.
    pub fn new_context(&mut self, global: Option<&GlobalTemplate>) -> Result<Context, PluginError> {
        let mut locker = v8::Locker::new(&mut self.isolate);
        let _lock = IsolateLock::acquire(&mut locker);

        let scope = pin!(v8::HandleScope::new(&mut *locker));
        let mut scope = scope.init();

        let global_template = match global {
            Some(template) => Some(template.build(&mut scope)?),
            None => None,
        };

        let context = v8::Context::new(
            &scope,
            v8::ContextOptions {
                global_template,
                ..Default::default()
            },
        );

        // Native functions find the output through the context slot
        context.set_slot(self.output.clone());

        let scope = &mut v8::ContextScope::new(&mut scope, context);
        let inner = v8::Global::new(scope.as_ref(), context);

        tracing::debug!(
            "Engine {} created context ({} plugin globals)",
            self.id,
            global.map_or(0, GlobalTemplate::len)
        );

        Ok(Context {
            engine_id: self.id,
            inner,
        })
    }

    /// Evaluate `source` in `context` and return its completion value as a string.
    pub fn eval(&mut self, context: &Context, source: &str) -> Result<String, ScriptError> {
        self.eval_named(context, "<anonymous>", source)
    }

    /// Like [`Engine::eval`], with `resource_name` reported in exception details.
    pub fn eval_named(
        &mut self,
        context: &Context,
        resource_name: &str,
        source: &str,
    ) -> Result<String, ScriptError> {
        if context.engine_id != self.id {
            return Err(ScriptError::Engine(format!(
                "context belongs to engine {}, not engine {}",
                context.engine_id, self.id
            )));
        }

        let mut locker = v8::Locker::new(&mut self.isolate);
        let _lock = IsolateLock::acquire(&mut locker);

        let scope = pin!(v8::HandleScope::new(&mut *locker));
        let mut scope = scope.init();
        let ctx = v8::Local::new(&scope, &context.inner);
        let scope = &mut v8::ContextScope::new(&mut scope, ctx);

        let code = v8_str!(scope, source, ScriptError::Engine)?;
        let name = v8_str!(scope, resource_name, ScriptError::Engine)?;
        let origin = v8::ScriptOrigin::new(
            scope,
            name.into(),
            0,
            0,
            false,
            0,
            None,
            false,
            false,
            false,
            None,
        );

        let tc = pin!(v8::TryCatch::new(scope));
        let tc = tc.init();

        let script = match v8::Script::compile(&tc, code, Some(&origin)) {
            Some(script) => script,
            None => return Err(ScriptError::Compile(exception_details!(&tc))),
        };

        let result = match script.run(&tc) {
            Some(value) => value,
            None => return Err(ScriptError::Runtime(exception_details!(&tc))),
        };

        match result.to_string(&tc) {
            Some(s) => Ok(s.to_rust_string_lossy(&tc)),
            None => Err(ScriptError::Runtime(exception_details!(&tc))),
        }
    }

    /// Drain the microtask queue (promise reactions).
    pub fn run_microtasks(&mut self) {
        let mut locker = v8::Locker::new(&mut self.isolate);
        let _lock = IsolateLock::acquire(&mut locker);
        locker.perform_microtask_checkpoint();
    }

    /// Ask V8 to collect as much garbage as it can.
    pub fn collect_garbage(&mut self) {
        let mut locker = v8::Locker::new(&mut self.isolate);
        let _lock = IsolateLock::acquire(&mut locker);
        locker.low_memory_notification();
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn panic_reason(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
