use clap::{Parser, Subcommand};
use rand::Rng;
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    process::ExitCode,
};
use tracing::{error, info};
use trilat::{config::load_receivers, prelude::*};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

/// Locate an emitter from the power received at three or more receivers.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the JSON file describing the receivers.
    receivers: PathBuf,

    /// Print the solution as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// Take one received power per receiver from the command line.
    #[command(short_flag = 'v', long_flag = "values")]
    Values {
        /// Received powers, in receiver order.
        #[arg(required = true, allow_negative_numbers = true)]
        powers: Vec<f64>,

        /// Receiver used to linearize the system. Chosen at random if omitted.
        #[arg(short, long)]
        pivot: Option<usize>,
    },

    /// Prompt for each received power and the pivot.
    #[command(short_flag = 'i', long_flag = "interactive")]
    Interactive,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> CliResult<()> {
    let receivers = load_receivers(&args.receivers)?;
    info!(
        "loaded {} receivers from {}",
        receivers.len(),
        args.receivers.display()
    );

    let mut rng = rand::rng();
    let (powers, pivot) = match args.mode {
        Mode::Values { powers, pivot } => {
            let pivot = match pivot {
                Some(pivot) => pivot,
                None => random_pivot(&mut rng, &receivers),
            };
            (powers, pivot)
        }
        Mode::Interactive => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let mut output = io::stdout();
            let powers = prompt_powers(&mut input, &mut output, receivers.len())?;
            let pivot = prompt_pivot(&mut input, &mut output, receivers.len(), &mut rng)?;
            (powers, pivot)
        }
    };

    info!("linearizing around receiver {pivot}");
    let solution = Multilateration::new(receivers, pivot)?.estimate(&powers)?;

    match args.json {
        true => println!("{}", serde_json::to_string_pretty(&solution)?),
        false => print_solution(&solution),
    }

    Ok(())
}

fn print_solution(solution: &Solution) {
    let system = solution.system();
    println!("Receiver position coefficients matrix:{}", system.coefficients());
    println!("Estimated distances:");
    for (index, distance) in system.distances().iter().enumerate() {
        println!("  {index}: {distance}");
    }
    println!();
    println!("System results vector:{}", system.results());
    println!("Estimated position: {}", solution.position());
}

/// Ask for the power received by each of `count` receivers until every answer is a real number.
fn prompt_powers<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    count: usize,
) -> io::Result<Vec<f64>> {
    let mut powers = Vec::with_capacity(count);
    while powers.len() < count {
        writeln!(
            output,
            "Input the power received by receiver {}: ",
            powers.len() + 1
        )?;

        match read_line(input)?.parse::<f64>() {
            Ok(power) if power.is_finite() => powers.push(power),
            _ => writeln!(output, "Invalid input: not a real number")?,
        }
    }

    Ok(powers)
}

/// Ask for a pivot below `count`. An empty answer picks one at random.
fn prompt_pivot<R: BufRead, W: Write, G: Rng + ?Sized>(
    input: &mut R,
    output: &mut W,
    count: usize,
    rng: &mut G,
) -> io::Result<usize> {
    loop {
        writeln!(
            output,
            "Input the pivot for the linearization (max {}) or <enter> for random: ",
            count - 1
        )?;

        let line = read_line(input)?;
        if line.is_empty() {
            return Ok(rng.random_range(0..count));
        }

        match line.parse::<usize>() {
            Ok(pivot) if pivot < count => return Ok(pivot),
            Ok(_) => writeln!(
                output,
                "Invalid input: pivot must be between 0 and {}",
                count - 1
            )?,
            Err(_) => writeln!(output, "Invalid input: not a non-negative integer")?,
        }
    }
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input ended before every value was given",
        ));
    }

    Ok(line.trim().to_string())
}
