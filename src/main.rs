use std::process::ExitCode;

use clap::Parser;

use upnote2notion::config::{self, Settings};
use upnote2notion::notion::{HttpTransport, OfflineTransport};
use upnote2notion::{batch, Cli, Error, Result};

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let settings = Settings::resolve(cli)?;

    if cli.save_config {
        let path = config::config_path().ok_or(Error::ConfigDirUnavailable)?;
        config::save(&path, &settings.to_saved())?;
        println!("Saved config to {}", path.display());
    }

    if settings.dry_run {
        batch::run(&settings, &mut OfflineTransport)?;
    } else {
        let mut transport = HttpTransport::new(&settings.api_key)?;
        batch::run(&settings, &mut transport)?;
    }
    Ok(())
}
