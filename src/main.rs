use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use dartforge::config::EngineConfig;
use std::process;
use tracing::{error, info};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine configuration (JSON). Overrides the flag defaults.
    #[arg(global = true, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Resolve(cmd::resolve::ResolveArgs),
    Checkout(cmd::checkout::CheckoutArgs),
    Simulate(cmd::simulate::SimulateArgs),
    Bench(cmd::bench::BenchArgs),
    Games(cmd::games::GamesArgs),
}

fn load_config(path: Option<&str>, from_flags: &EngineConfig) -> EngineConfig {
    let Some(path) = path else {
        return from_flags.clone();
    };
    info!("⚙️  Loading config from {}", path);
    EngineConfig::load_from_file(path).unwrap_or_else(|e| {
        error!("❌ Invalid config '{}': {}", path, e);
        process::exit(1);
    })
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if cli.debug {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else {
        tracing_subscriber::fmt::init();
    }

    let result = match cli.command {
        Commands::Resolve(args) => cmd::resolve::run(args),
        Commands::Checkout(args) => cmd::checkout::run(args),
        Commands::Simulate(args) => {
            let config = load_config(cli.config.as_deref(), &args.engine);
            cmd::simulate::run(args, config)
        }
        Commands::Bench(args) => {
            let config = load_config(cli.config.as_deref(), &args.engine);
            cmd::bench::run(args, config)
        }
        Commands::Games(args) => cmd::games::run(args),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}
