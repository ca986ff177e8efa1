use clap::{ArgAction, Parser, Subcommand};

mod commands;
mod logging;
mod terminal;

#[derive(Parser)]
#[command(name = "pomotick", version, about = "Work/rest countdown timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive timer session
    Run(commands::run::RunArgs),
    /// Print a random motivational message
    Message {
        /// Message pool: work or rest
        #[arg(default_value = "work")]
        category: String,
        /// Seed for a reproducible pick
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    let config = pomotick_core::Config::load_or_default();
    logging::init_logging(cli.verbose, &config.logging.level);

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args, &config),
        Commands::Message { category, seed } => commands::message::run(&category, seed),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            commands::completions::run::<Cli>(shell);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
