use clap::Parser;
use tracing_subscriber::EnvFilter;

use daily_tasks::cli::Cli;
use daily_tasks::cmd::*;
use daily_tasks::config::Config;

fn main() {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);

    let filter = if config.verbose {
        "daily_tasks=debug,info"
    } else {
        "daily_tasks=warn,warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command.unwrap_or(Commands::Today) {
        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
        Commands::Shell => cmd_shell(&config),
        command => cmd_once(&config, command),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
