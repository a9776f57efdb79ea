use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{Generator, generate};
use colored::Colorize;
use foldmon::cli::{Cli, Commands};
use foldmon::config::{DisplayConfig, KNOWN_KEYS};
use foldmon::monitor::DirectoryMonitor;
use foldmon::output::{self, Verbosity};
use foldmon::MonitorContext;
use foldmon::session::Session;
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "FOLDMON_LOG";

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    output::set_verbosity(Verbosity::from_flags(cli.verbose, cli.quiet));
    init_logging(cli.verbose);

    let command = cli.command.clone().unwrap_or(Commands::Watch);
    if let Commands::Completion { shell } = command {
        print_completions(shell, &mut Cli::command());
        return Ok(ExitCode::SUCCESS);
    }

    let ctx = match cli.config {
        Some(path) => MonitorContext::with_config_path(path, cli.root)?,
        None => MonitorContext::new(cli.root)?,
    };
    configure_color(&ctx.config.display);
    output::verbose(&format!("Config: {}", ctx.config_path.display()));
    for key in KNOWN_KEYS {
        if let Some(value) = ctx.config.get(key) {
            output::verbose(&format!("  {key} = {value}"));
        }
    }

    let monitor = DirectoryMonitor::new(&ctx.root, ctx.monitor_options())?;
    for skipped in monitor.initial_errors() {
        output::warning(&format!("Skipped {skipped}"));
    }
    output::info(&format!(
        "Monitoring {} ({} files)",
        ctx.root.display(),
        monitor.len()
    ));

    let timestamp_format = ctx.config.display.timestamp_format;
    match command {
        Commands::Watch => {
            let mut session = Session::new(monitor)
                .with_prompt(!cli.no_prompt)
                .with_color(ctx.config.display.color)
                .with_timestamp_format(timestamp_format);
            session.run(io::stdin().lock(), io::stdout().lock())?;
        }
        Commands::List => {
            for record in monitor.records() {
                println!("{:<8} {}", record.kind().name(), record.filename());
            }
        }
        Commands::Info { filename } => match monitor.info(&filename) {
            Some(record) => print!("{}", record.describe(timestamp_format)),
            None => {
                println!("File not found: {filename}");
                return Ok(ExitCode::FAILURE);
            }
        },
        Commands::Completion { .. } => {}
    }

    Ok(ExitCode::SUCCESS)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "foldmon=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn configure_color(display: &DisplayConfig) {
    if !display.color || !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
}

fn print_completions<G: Generator>(g: G, cmd: &mut clap::Command) {
    generate(g, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
