use anyhow::{Context, Result};
use ptrack::cli::{self, CliCommand};
use ptrack::config::Config;
use ptrack::context::{AppContext, StandardContext};
use ptrack::controller::TaskController;
use ptrack::date::SystemClock;
use ptrack::session::{RetryPolicy, Session};
use ptrack::store::TaskStore;
use simplelog::{ConfigBuilder, WriteLogger};
use std::env;
use std::fs::OpenOptions;
use std::io;

fn main() {
    let args: Vec<String> = env::args().collect();
    let binary_name = args
        .first()
        .and_then(|a| std::path::Path::new(a).file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "ptrack".to_string());

    let parsed = match cli::parse_args(args.iter().skip(1).cloned()) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}\n", e);
            cli::print_help(&binary_name);
            std::process::exit(2);
        }
    };

    if parsed.command == CliCommand::Help {
        cli::print_help(&binary_name);
        return;
    }

    if let Err(e) = run(parsed) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: cli::CliArgs) -> Result<()> {
    let ctx = StandardContext::new(args.root);
    let cfg = Config::load_or_default(&ctx)?;
    init_logging(&ctx, &cfg);

    let task_file = match args.file {
        Some(f) => f,
        None => cfg.resolve_task_file(&ctx)?,
    };
    let store = TaskStore::open(&task_file, cfg.store_options())
        .with_context(|| format!("Could not load tasks from '{}'", task_file.display()))?;
    let controller = TaskController::new(store, SystemClock);

    match args.command {
        CliCommand::List => print!("{}", controller.render_tasks()),
        CliCommand::Summary => print!("{}", controller.render_summary()),
        CliCommand::Interactive => {
            let retry = match cfg.max_prompt_attempts {
                Some(n) => RetryPolicy::limited(n),
                None => RetryPolicy::unlimited(),
            };
            let stdin = io::stdin();
            let mut session = Session::new(controller, stdin.lock(), io::stdout(), retry);
            session.run()?;
        }
        CliCommand::Help => {}
    }
    Ok(())
}

/// Logs go to a file in the data directory so they never interleave with the menu.
fn init_logging(ctx: &dyn AppContext, cfg: &Config) {
    let Some(path) = ctx.get_log_path() else {
        return;
    };
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: cannot open log file {}: {}", path.display(), e);
            return;
        }
    };
    let log_cfg = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Err(e) = WriteLogger::init(cfg.log_level, log_cfg, file) {
        eprintln!("Warning: logger already initialised: {}", e);
    }
}
