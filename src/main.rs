// Main entry point - Settings, logging and command dispatch
use anyhow::Context;
use clap::Parser;
use energy_timeseries::application::series_service::SeriesService;
use energy_timeseries::infrastructure::config::load_settings;
use energy_timeseries::presentation::cli::{Cli, Command};
use energy_timeseries::Zone;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration, then let flags override it
    let mut settings = load_settings()?;
    if let Some(encoding) = &cli.encoding {
        settings.encoding = encoding.clone();
    }
    settings.pretty |= cli.pretty;

    // Initialize tracing; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let service = SeriesService::new(&settings)?;

    match cli.command {
        Command::Show {
            file,
            kind,
            timezone,
        } => {
            let zone = timezone
                .as_deref()
                .map(str::parse::<Zone>)
                .transpose()
                .context("Invalid --timezone")?;
            let table = service.render(&file, kind.map(Into::into), zone)?;
            print!("{}", table);
        }
        Command::Split { frame, out_dir } => {
            for path in service.split(&frame, &out_dir)? {
                println!("{}", path.display());
            }
        }
        Command::Merge { output, inputs } => {
            let frame = service.merge(&inputs, &output)?;
            println!(
                "Wrote {} columns x {} rows to {}",
                frame.columns.len(),
                frame.index.len(),
                output.display()
            );
        }
    }

    Ok(())
}
