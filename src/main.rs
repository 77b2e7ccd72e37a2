use anyhow::Context;
use proctable::commands::{Cli, Commands, Session, SessionOptions};
use proctable::utils::config_paths::ConfigPaths;
use proctable::utils::logger::init_logger;
use proctable::{PcbError, ProcessTable, Settings};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match main_impl(cli) {
        Ok(code) => code,
        Err(err) => {
            match err.downcast_ref::<PcbError>() {
                Some(pcb_err) => eprintln!("Error: {}", pcb_err.user_message()),
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::from(1)
        }
    }
}

fn main_impl(cli: Cli) -> anyhow::Result<ExitCode> {
    let paths = ConfigPaths::new()?;
    let settings = Settings::load(&cli.global, &paths)?;
    if settings.log_file.is_some() {
        paths
            .ensure_dirs()
            .context("Failed to create configuration directories")?;
    }
    init_logger(settings.log_level.as_deref(), settings.log_file.clone())
        .context("Failed to initialize logging")?;

    match cli.command_or_default() {
        Commands::Shell => run_shell(&settings),
        Commands::Config => {
            print!("{}", settings.to_toml()?);
            Ok(ExitCode::from(0))
        }
        Commands::Version => {
            println!("proctable {}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::from(0))
        }
    }
}

fn run_shell(settings: &Settings) -> anyhow::Result<ExitCode> {
    let table = ProcessTable::new(settings.capacity)?;
    let options = SessionOptions {
        format: settings.format,
        strict: settings.strict,
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(table, stdin.lock(), stdout.lock(), options);
    let summary = session.run()?;

    tracing::debug!(
        commands = summary.commands,
        ignored = summary.ignored,
        eof = summary.ended_by_eof,
        "shell finished"
    );
    Ok(ExitCode::from(0))
}
