use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;
use trimic_core::{AppConfig, Recording};
use trimic_pipeline::Pipeline;

#[derive(Parser)]
#[command(name = "trimic", about = "Acoustic event detection and localisation")]
struct Cli {
    /// Path to a 3-channel wav file
    wav: PathBuf,

    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)
            .with_context(|| format!("failed to load config from {:?}", path))?,
        None => AppConfig::default(),
    };

    let env_filter = EnvFilter::try_new(&config.general.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::Registry::default()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        );

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    tracing::info!("decoding {:?}", cli.wav);
    let wav = trimic_wav::decode_wav(&cli.wav)
        .with_context(|| format!("failed to decode {:?}", cli.wav))?;

    let recording = Recording::from_interleaved(&wav.samples, wav.channels as usize, wav.sample_rate)
        .context("recording is not a 3-channel stream")?;

    tracing::info!(
        samples = recording.len(),
        sample_rate = recording.sample_rate(),
        "recording loaded"
    );

    let pipeline = Pipeline::from_config(&config).context("invalid configuration")?;
    let locations = pipeline.run(&recording);

    if locations.is_empty() {
        println!("no acoustic events detected");
        return Ok(());
    }

    for location in &locations {
        let marker = if location.converged {
            String::new()
        } else {
            format!(" [solver did not converge, residual {:.3e}]", location.residual)
        };
        println!(
            "event {} detected at time {}s, estimated location ({:.1}, {:.1}) meters{}",
            location.event_index + 1,
            location.onset_seconds,
            location.x,
            location.y,
            marker,
        );
    }

    Ok(())
}
