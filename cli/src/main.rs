use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use commander::BUNDLED_SCRIPTS;
use commander::app::{Runner, script_repository};
use commander::server::{self, AppState};
use commander_core::CommanderConfig;
use commander_scripts::{SqlScriptCommand, split_statements};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "commander")]
#[command(about = "Run ordered startup commands and SQL scripts against a database")]
#[command(version)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(long, global = true, env = "COMMANDER_CONFIG")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the pipeline once and exit.
    Run(RunArgs),
    /// List the scripts a run would execute, in order, without touching the database.
    Scripts(ScriptsArgs),
    /// Serve the HTTP trigger (`POST /execute`).
    Serve(ServeArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Database file path (overrides `database.path`).
    #[arg(long)]
    db: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ScriptsArgs {
    /// Also print every statement of every script.
    #[arg(long)]
    statements: bool,
}

#[derive(Debug, Args)]
struct ServeArgs {
    /// Database file path (overrides `database.path`).
    #[arg(long)]
    db: Option<PathBuf>,
    /// Listen address (overrides `server.bind`).
    #[arg(long)]
    bind: Option<SocketAddr>,
}

fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let result = load_config(cli.config.as_ref()).and_then(|config| match cli.command {
        Command::Run(args) => run_once(config, args),
        Command::Scripts(args) => run_scripts(config, args),
        Command::Serve(args) => run_serve(config, args),
    });

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "commander=info,commander_core=info,commander_scripts=info,commander_sqlite=info,tower_http=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<CommanderConfig, String> {
    match path {
        Some(path) => CommanderConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display())),
        None => Ok(CommanderConfig::default()),
    }
}

fn run_once(mut config: CommanderConfig, args: RunArgs) -> Result<(), String> {
    if let Some(db) = args.db {
        config.database.path = db;
    }

    let mut runner = Runner::from_config(&config).map_err(|err| err.to_string())?;
    let commands = runner.pipeline().effective_commands().join(", ");
    runner.run().map_err(|err| err.to_string())?;

    println!(
        "Executed [{commands}] against '{}'.",
        config.database.path.display()
    );
    Ok(())
}

fn run_scripts(config: CommanderConfig, args: ScriptsArgs) -> Result<(), String> {
    let repository = script_repository(&config, BUNDLED_SCRIPTS).map_err(|err| err.to_string())?;
    let scripts = repository.discover().map_err(|err| err.to_string())?;

    if !config.command_filter().matches(SqlScriptCommand::NAME) {
        eprintln!("note: SQL_SCRIPT is excluded by cmd.includes/cmd.excludes and will not run.");
    }

    for script in &scripts {
        println!("{}\t{}", script.name, script.location);
        if args.statements {
            let statements = split_statements(&script.body, &config.script.delimiter)
                .map_err(|err| format!("Failed to split '{}': {err}", script.name))?;
            for (index, statement) in statements.iter().enumerate() {
                println!("  {:>3}: {statement}", index + 1);
            }
        }
    }

    println!("{} script(s) from {}.", scripts.len(), repository.source_labels().join(", "));
    Ok(())
}

fn run_serve(mut config: CommanderConfig, args: ServeArgs) -> Result<(), String> {
    if let Some(db) = args.db {
        config.database.path = db;
    }
    let addr = match args.bind {
        Some(addr) => addr,
        None => config
            .server
            .bind
            .parse::<SocketAddr>()
            .map_err(|err| format!("Invalid server.bind '{}': {err}", config.server.bind))?,
    };

    let runner = Runner::from_config(&config).map_err(|err| err.to_string())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to start async runtime: {err}"))?;

    runtime
        .block_on(server::serve(addr, AppState::new(runner)))
        .map_err(|err| format!("Server error on {addr}: {err}"))
}
