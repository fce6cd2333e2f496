mod cli;
mod host;
mod script;
mod world;

use std::fs::File;
use std::io::{self, BufRead, BufReader};

use app::{AppBuilder, Application, LOG_HOST, LogOptions};
use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use freecam::FreecamSettings;
use tracing::level_filters::LevelFilter;

use crate::cli::Cli;
use crate::host::Host;

struct FreecamHost;

impl Application for FreecamHost {
    const APP_ID: &'static str = "freecam_host";
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let settings = FreecamSettings::load(&cli.config)
        .wrap_err_with(|| format!("loading {}", cli.config.display()))?;

    if cli.print_config {
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    let level = match &settings.logging.level {
        Some(level) => level
            .parse::<LevelFilter>()
            .wrap_err_with(|| format!("invalid log level `{}`", level))?,
        None => app::default_level(),
    };
    let ctx = AppBuilder::<FreecamHost>::new(
        env!("CARGO_PKG_VERSION"),
        LogOptions {
            level,
            directory: cli.log_dir.clone().or_else(|| settings.logging.directory.clone()),
        },
    )
    .map_err(|err| eyre!("logging setup failed: {}", err))?
    .build();
    tracing::info!(
        target: LOG_HOST,
        "Settings from {}: {} camera, height offset {}, {} mode, default speed {}, disable on damage {}",
        cli.config.display(),
        settings.camera.mode,
        settings.camera.height_offset,
        settings.world.interaction_mode,
        settings.session_defaults().speed,
        settings.world.disable_on_damage
    );

    let host = Host::new(&settings);
    let reader: Box<dyn BufRead> = match &cli.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).wrap_err_with(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let summary = host.run_script(reader, io::stdout().lock())?;
    tracing::info!(
        target: LOG_HOST,
        "{} line(s), {} error(s), {} player(s) online, {} in freecam (log: {})",
        summary.lines,
        summary.errors,
        host.world().players().len(),
        host.controller().store().active_count(),
        ctx.log_file().display()
    );
    Ok(())
}
