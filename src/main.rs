use std::process::ExitCode;

use clap::Parser;

use clonecall::command::Commands;
use clonecall::runtime::{self, Config, LogLevel};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// trace, debug, info, warn, error or off
    #[arg(long = "log-level", global = true, default_value = "info")]
    log_level: LogLevel,

    /// Worker threads for library calls that do not take a count; 0 uses all cores
    #[arg(long = "threads-default", global = true, default_value_t = 0)]
    threads_default: usize,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    runtime::setup_global_logger(cli.log_level);
    Config::init(Config {
        log_level: cli.log_level,
        num_threads: cli.threads_default,
    });
    log::debug!("Running command {:?}", cli.command);

    let result = match cli.command {
        Commands::Filter(mut cmd) => cmd.try_execute(),
        Commands::Call(mut cmd) => cmd.try_execute(),
    };

    if let Err(e) = result {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
