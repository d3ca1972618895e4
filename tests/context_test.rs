mod common;

use common::{buffered_engine, log_context};
use openworkers_plugin_v8::{Engine, EngineConfig, ScriptError};

#[test]
fn test_completion_value() {
    let (mut engine, ctx, _buffer) = log_context();

    assert_eq!(engine.eval(&ctx, "'Hello ' + 'World!'").unwrap(), "Hello World!");
    assert_eq!(engine.eval(&ctx, "[1, 2].map(x => x * 2)").unwrap(), "2,4");
}

#[test]
fn test_compile_error_details() {
    let (mut engine, ctx, _buffer) = log_context();

    let err = engine
        .eval_named(&ctx, "broken.js", "let a = 1;\nlet = = 2;")
        .unwrap_err();

    match err {
        ScriptError::Compile(details) => {
            assert!(details.message.starts_with("SyntaxError"));
            assert_eq!(details.resource_name.as_deref(), Some("broken.js"));
            assert_eq!(details.line, Some(2));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_runtime_error_details() {
    let (mut engine, ctx, buffer) = log_context();

    let err = engine
        .eval_named(&ctx, "main.js", "log('before');\nmissing();\nlog('after');")
        .unwrap_err();

    let details = err.details().expect("runtime errors carry details").clone();
    assert!(matches!(err, ScriptError::Runtime(_)));
    assert!(details.message.contains("missing is not defined"));
    assert_eq!(details.line, Some(2));
    assert_eq!(details.source_line.as_deref(), Some("missing();"));

    assert_eq!(buffer.contents(), "before\n");
}

#[test]
fn test_contexts_do_not_share_globals() {
    let (mut engine, _buffer) = buffered_engine(EngineConfig::default());

    let a = engine.new_context(None).unwrap();
    let b = engine.new_context(None).unwrap();

    engine.eval(&a, "var shared = 'from a';").unwrap();

    assert_eq!(engine.eval(&a, "shared").unwrap(), "from a");
    assert_eq!(engine.eval(&b, "typeof shared").unwrap(), "undefined");
}

#[test]
fn test_state_persists_within_context() {
    let (mut engine, ctx, buffer) = log_context();

    engine.eval(&ctx, "var counter = 0;").unwrap();
    engine.eval(&ctx, "counter += 5;").unwrap();
    engine.eval(&ctx, "log(counter)").unwrap();

    assert_eq!(buffer.contents(), "5\n");
}

#[test]
fn test_context_from_other_engine_is_rejected() {
    let mut owner = Engine::default();
    let ctx = owner.new_context(None).unwrap();

    let mut other = Engine::default();
    let err = other.eval(&ctx, "1").unwrap_err();

    assert!(matches!(err, ScriptError::Engine(_)));
    assert_eq!(ctx.engine_id(), owner.id());
}

#[test]
fn test_microtasks_run_on_demand() {
    let (mut engine, ctx, buffer) = log_context();

    engine
        .eval(&ctx, "Promise.resolve('resolved').then(v => log(v)); log('sync');")
        .unwrap();
    engine.run_microtasks();

    assert_eq!(buffer.contents(), "sync\nresolved\n");
}

#[test]
fn test_collect_garbage_keeps_context_usable() {
    let (mut engine, ctx, buffer) = log_context();

    engine
        .eval(&ctx, "var junk = []; for (let i = 0; i < 1000; i++) junk.push({ i }); junk = null;")
        .unwrap();
    engine.collect_garbage();
    engine.eval(&ctx, "log('alive')").unwrap();

    assert_eq!(buffer.contents(), "alive\n");
}

#[test]
fn test_interleaved_engines_drop_in_creation_order() {
    let (mut first, first_ctx, first_out) = log_context();
    let (mut second, second_ctx, second_out) = log_context();

    first.eval(&first_ctx, "log('one')").unwrap();
    second.eval(&second_ctx, "log('two')").unwrap();
    first.eval(&first_ctx, "log('three')").unwrap();

    assert_eq!(first_out.contents(), "one\nthree\n");
    assert_eq!(second_out.contents(), "two\n");

    drop(first_ctx);
    drop(first);

    second.eval(&second_ctx, "log('four')").unwrap();
    assert_eq!(second_out.contents(), "two\nfour\n");
}

#[test]
fn test_engines_in_a_vec() {
    let mut engines: Vec<Engine> = (0..3).map(|_| Engine::default()).collect();
    let contexts: Vec<_> = engines
        .iter_mut()
        .map(|engine| engine.new_context(None).unwrap())
        .collect();

    for (i, (engine, ctx)) in engines.iter_mut().zip(&contexts).enumerate() {
        assert_eq!(engine.eval(ctx, &format!("{} * 10", i)).unwrap(), format!("{}", i * 10));
    }

    drop(contexts);
    drop(engines);
}
