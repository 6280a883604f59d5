use airq_explorer::cli::{run, Cli};
use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::sync::Mutex;
use tracing::Level;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;
    run(cli).context("air-quality exploration failed")
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let builder = tracing_subscriber::fmt().with_max_level(level).with_target(false);

    match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }

    Ok(())
}
