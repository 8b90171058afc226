use std::process::ExitCode;

use clap::Parser;

use quicklabel::cli::{Cli, USAGE};
use quicklabel::display::NativeDisplay;
use quicklabel::{Session, SessionError, SessionOutcome};

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.log_level.to_level_filter().as_str()),
    )
    .init();

    if cli.show_usage {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), SessionError> {
    log::info!("MAKE SURE NumLock is ON to label with the NumPad digits.");

    let config = cli.into_config()?.normalize()?;
    log::info!("Labels will be stored in {:?}", config.output_path);

    let display = NativeDisplay::new()?;
    let mut session = Session::from_config(config, display)?;
    let summary = session.run()?;

    if summary.outcome == SessionOutcome::Complete {
        log::info!("All {} images labeled", summary.total);
    }
    Ok(())
}
