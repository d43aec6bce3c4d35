use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "kairos-cli", version, about = "Kairos schedule optimizer CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Schedule optimization
    Optimize {
        #[command(subcommand)]
        action: commands::optimize::OptimizeAction,
    },
    /// Energy curve inspection
    Energy {
        #[command(subcommand)]
        action: commands::energy::EnergyAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Optimize { action } => commands::optimize::run(action),
        Commands::Energy { action } => commands::energy::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
