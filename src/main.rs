use spec2test::config::Config;
use spec2test::output;
use spec2test::state;
use spec2test::strategy::{DirectoryStrategy, HandWrittenStrategy, TestStrategy};
use spec2test::{Evaluator, TaskRegistry, TestGenAgent, katas};

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "spec2test", version, about = "Score generated tests against reference and mutant implementations")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate tests for every task and score them
    Run {
        /// Config file (default: ./spec2test.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// TOML task file (default: built-in katas)
        #[arg(long)]
        tasks: Option<PathBuf>,
        /// Read pre-generated tests from <DIR>/<task>.<ext> instead of the hand-written suites
        #[arg(long)]
        tests_dir: Option<PathBuf>,
        /// Test command override; the tests file is appended
        #[arg(long)]
        test_cmd: Option<String>,
        /// Per-run timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
        /// Session ID used to tag staging directories (default: auto-generated)
        #[arg(long)]
        session: Option<String>,
        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
        /// Exit code only, no output
        #[arg(short, long)]
        quiet: bool,
    },
    /// List the tasks that would be evaluated
    List {
        /// TOML task file (default: built-in katas)
        #[arg(long)]
        tasks: Option<PathBuf>,
    },
    /// Summary of the last run
    Status {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a mutant from the last run
    Show {
        /// Task name
        task: String,
        /// Mutant number (e.g. 2 or mutant_2)
        mutant: String,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match cli.command {
        Commands::Run {
            config,
            tasks,
            tests_dir,
            test_cmd,
            timeout,
            session,
            json,
            quiet,
        } => cmd_run(RunArgs {
            config,
            tasks,
            tests_dir,
            test_cmd,
            timeout,
            session,
            json,
            quiet,
        }),
        Commands::List { tasks } => cmd_list(tasks.as_deref()),
        Commands::Status { json } => cmd_status(json),
        Commands::Show { task, mutant, json } => cmd_show(&task, &mutant, json),
    };

    process::exit(exit_code);
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("spec2test=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

struct RunArgs {
    config: Option<PathBuf>,
    tasks: Option<PathBuf>,
    tests_dir: Option<PathBuf>,
    test_cmd: Option<String>,
    timeout: Option<u64>,
    session: Option<String>,
    json: bool,
    quiet: bool,
}

fn load_registry(tasks: Option<&Path>) -> Result<TaskRegistry, String> {
    match tasks {
        Some(path) => TaskRegistry::load(path).map_err(|e| e.to_string()),
        None => katas::builtin_registry().map_err(|e| e.to_string()),
    }
}

fn cmd_run(args: RunArgs) -> i32 {
    let mut config = match Config::load(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            output::print_error(&e.to_string());
            return 2;
        }
    };
    if let Some(cmd) = args.test_cmd {
        config.runner.command = cmd;
    }
    if let Some(secs) = args.timeout {
        config.runner.timeout_secs = secs;
    }
    if let Err(e) = config.validate() {
        output::print_error(&e.to_string());
        return 2;
    }

    let registry = match load_registry(args.tasks.as_deref()) {
        Ok(r) => r,
        Err(e) => {
            output::print_error(&e);
            return 2;
        }
    };

    let strategy: Box<dyn TestStrategy> = match args.tests_dir {
        Some(dir) => {
            if !dir.is_dir() {
                output::print_error(&format!(
                    "Tests directory not found: {}. Pass --tests-dir <dir> with generated test files.",
                    dir.display()
                ));
                return 2;
            }
            Box::new(DirectoryStrategy::new(dir, config.staging.tests_extension()))
        }
        None => Box::new(HandWrittenStrategy::builtin().with_module(config.staging.impl_module())),
    };
    let agent = TestGenAgent::from_boxed(strategy);

    let session = args.session.unwrap_or_else(spec2test::generate_session_id);
    let runner = config.test_runner();
    tracing::info!(
        session = %session,
        strategy = agent.strategy_name(),
        command = %runner.command_line(),
        timeout = ?runner.timeout(),
        tasks = registry.len(),
        "starting evaluation"
    );

    let evaluator = Evaluator::new(runner, config.staging.clone(), session);
    let report = evaluator.evaluate_all(&agent, &registry);

    state::save_last_run(&report);

    let exit_code = if report.all_tasks_clean() { 0 } else { 1 };
    if args.quiet {
        return exit_code;
    }

    if args.json {
        match serde_json::to_string(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                output::print_error(&format!("Failed to serialize report: {}", e));
                return 3;
            }
        }
    } else {
        output::print_run_report(&report);
    }

    exit_code
}

fn cmd_list(tasks: Option<&Path>) -> i32 {
    match load_registry(tasks) {
        Ok(registry) => {
            output::print_task_list(&registry);
            0
        }
        Err(e) => {
            output::print_error(&e);
            2
        }
    }
}

fn cmd_status(json_mode: bool) -> i32 {
    match state::load_last_run() {
        Some(report) => {
            if json_mode {
                print_json(&report)
            } else {
                output::print_status(&report);
                0
            }
        }
        None => {
            output::print_error("No previous run found. Run `spec2test run` first.");
            2
        }
    }
}

fn cmd_show(task_name: &str, mutant_ref: &str, json_mode: bool) -> i32 {
    let Some(report) = state::load_last_run() else {
        output::print_error("No previous run found. Run `spec2test run` first.");
        return 2;
    };

    let Some(task) = report.task(task_name) else {
        let valid: Vec<_> = report.tasks.iter().map(|t| t.task.as_str()).collect();
        output::print_error(&format!(
            "Task '{}' not found. Available: {}",
            task_name,
            valid.join(", ")
        ));
        return 2;
    };

    let mutant = mutant_ref
        .trim_start_matches("mutant_")
        .parse::<usize>()
        .ok()
        .and_then(|index| task.mutant(index));
    match mutant {
        Some(m) => {
            if json_mode {
                print_json(m)
            } else {
                output::print_mutant_detail(task, m);
                0
            }
        }
        None => {
            let valid: Vec<_> = task.mutant_outcomes.iter().map(|m| m.index.to_string()).collect();
            output::print_error(&format!(
                "Mutant '{}' not found for {}. Valid: {}",
                mutant_ref,
                task.task,
                valid.join(", ")
            ));
            2
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> i32 {
    match serde_json::to_string(value) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            output::print_error(&format!("Failed to serialize: {}", e));
            3
        }
    }
}
