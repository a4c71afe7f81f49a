use clap::Parser;
use std::{io, path::PathBuf, process::ExitCode};
use tracing::{error, info};
use trilat::{config::load_receivers, prelude::*};

/// Print the noiseless power each receiver observes from an emitter at a known position.
///
/// The output can be passed straight to `trilat <RECEIVERS> values`.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the JSON file describing the receivers.
    receivers: PathBuf,

    #[arg(long, allow_negative_numbers = true)]
    x: f64,

    #[arg(long, allow_negative_numbers = true)]
    y: f64,
}

fn main() -> ExitCode {
    // Register an event subscriber that prints events to STDERR.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let receivers = match load_receivers(&args.receivers) {
        Ok(receivers) => receivers,
        Err(err) => {
            error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let emitter = Position::new(args.x, args.y);
    info!("simulating emitter at {emitter}");

    let powers: Vec<String> = readings(&receivers, &emitter)
        .iter()
        .map(|power| power.to_string())
        .collect();
    println!("{}", powers.join(" "));

    ExitCode::SUCCESS
}

fn readings(receivers: &Receivers, emitter: &Position) -> Vec<f64> {
    receivers
        .iter()
        .map(|receiver| {
            let distance = emitter.distance(&Position::new(receiver.x(), receiver.y()));
            expected_power(receiver, distance)
        })
        .collect()
}
