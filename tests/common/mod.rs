#![allow(dead_code)]

use openworkers_plugin_v8::{
    Context, Engine, EngineConfig, GlobalTemplate, Output, SharedBuffer, plugins,
};

/// Engine writing to an in-memory buffer instead of stdout.
pub fn buffered_engine(config: EngineConfig) -> (Engine, SharedBuffer) {
    let buffer = SharedBuffer::new();
    let engine = Engine::new(config).with_output(Output::Buffer(buffer.clone()));
    (engine, buffer)
}

/// Engine with the `log` plugin registered and a context ready to run scripts.
pub fn log_context() -> (Engine, Context, SharedBuffer) {
    let (mut engine, buffer) = buffered_engine(EngineConfig::default());
    let mut global = GlobalTemplate::new();

    engine
        .register(&mut global, &plugins::log_plugin())
        .expect("log plugin should register");

    let ctx = engine
        .new_context(Some(&global))
        .expect("context should be created");

    (engine, ctx, buffer)
}

/// Own property names of `globalThis`, sorted.
pub fn global_names(engine: &mut Engine, ctx: &Context) -> Vec<String> {
    let joined = engine
        .eval(ctx, "Object.getOwnPropertyNames(globalThis).sort().join('\\n')")
        .expect("global names should be readable");

    joined.lines().map(str::to_string).collect()
}
