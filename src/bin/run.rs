use anyhow::{Context as _, bail};
use clap::Parser;
use openworkers_plugin_v8::{CollisionPolicy, Engine, EngineConfig, GlobalTemplate, plugins};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Evaluate a script in a V8 context with the built-in plugins installed.
#[derive(Debug, Parser)]
#[command(name = "plugin-v8-run", version)]
struct Args {
    /// Script file to evaluate
    file: Option<PathBuf>,

    /// Evaluate this code instead of a file
    #[arg(short, long, conflicts_with = "file")]
    eval: Option<String>,

    /// Print the completion value of the script
    #[arg(short, long)]
    print: bool,

    /// Maximum heap size in MB (overrides PLUGIN_V8_HEAP_MAX_MB)
    #[arg(long)]
    heap_max_mb: Option<usize>,

    /// What to do when two plugins export the same global: overwrite | reject
    #[arg(long)]
    on_collision: Option<CollisionPolicy>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = EngineConfig::from_env()?;

    if let Some(mb) = args.heap_max_mb {
        if mb == 0 {
            bail!("--heap-max-mb must be at least 1");
        }
        config.heap_max_mb = mb;
        config.heap_initial_mb = config.heap_initial_mb.min(mb);
    }

    if let Some(policy) = args.on_collision {
        config.collision = policy;
    }

    let (resource_name, source) = match (args.eval, args.file) {
        (Some(code), _) => ("<eval>".to_string(), code),
        (None, Some(path)) => {
            let source = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            (path.display().to_string(), source)
        }
        (None, None) => bail!("nothing to run: pass a script file or --eval <CODE>"),
    };

    let mut engine = Engine::new(config);
    let mut global = GlobalTemplate::new();

    for plugin in plugins::builtin() {
        engine.register(&mut global, plugin.as_ref())?;
    }

    let ctx = engine.new_context(Some(&global))?;
    let result = engine.eval_named(&ctx, &resource_name, &source)?;
    engine.run_microtasks();

    if args.print {
        println!("{}", result);
    }

    Ok(())
}
