use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use sunny16::config::{self, CalculatorConfig};
use sunny16::solver::{self, Lock, Solution};
use sunny16::stops::{Stop, generate_grid};
use sunny16::types::{ParameterKind, StopIncrement};
use sunny16::{chart, light, output};
use tracing_subscriber::EnvFilter;

/// Shared flags for commands that work on a stop grid.
#[derive(clap::Args, Clone, Copy)]
struct IncrementArgs {
    /// Use third-stop increments (f/8, f/9, f/10, f/11 ...)
    #[arg(long, conflicts_with = "full")]
    third: bool,

    /// Use full-stop increments (f/8, f/11, f/16 ...)
    #[arg(long)]
    full: bool,
}

impl IncrementArgs {
    /// Command-line choice, falling back to the config file.
    fn resolve(self, config: &CalculatorConfig) -> StopIncrement {
        match (self.third, self.full) {
            (true, _) => StopIncrement::Third,
            (_, true) => StopIncrement::Full,
            _ => config.increment,
        }
    }
}

#[derive(clap::Args)]
struct SolveArgs {
    /// Light condition in EV at ISO 100 (see `sunny16 ev`)
    #[arg(long, allow_hyphen_values = true)]
    ev: Option<f64>,

    /// The two parameters held fixed, e.g. `--lock iso,aperture`
    #[arg(long, value_delimiter = ',')]
    lock: Vec<ParameterKind>,

    /// ISO marking, e.g. 400
    #[arg(long)]
    iso: Option<String>,

    /// Aperture marking, e.g. f/5.6
    #[arg(long)]
    aperture: Option<String>,

    /// Shutter marking, e.g. 1/125 or 2"
    #[arg(long)]
    shutter: Option<String>,

    #[command(flatten)]
    increment: IncrementArgs,
}

impl SolveArgs {
    fn label(&self, kind: ParameterKind) -> Option<&str> {
        match kind {
            ParameterKind::Iso => self.iso.as_deref(),
            ParameterKind::Aperture => self.aperture.as_deref(),
            ParameterKind::Shutter => self.shutter.as_deref(),
        }
    }
}

#[derive(Parser)]
#[command(name = "sunny16")]
#[command(about = "Exposure calculator: lock two of ISO, aperture, and shutter, solve the third")]
#[command(long_about = "\
Exposure calculator: lock two of ISO, aperture, and shutter, solve the third

Pick a light condition in EV, hold two parameters fixed, and the third is
derived from EV = log2(N²/t) − log2(S/100) and snapped to the nearest value
a camera can set. If the result falls outside the available range, the
closest boundary is shown with advice on which parameter to change.

Examples:

  sunny16 solve --lock iso,aperture                 # stock defaults: 1/125
  sunny16 solve --ev 12 --lock iso,shutter --shutter 1/60
  sunny16 solve --ev 9 --third --lock aperture,shutter --aperture f/2.8
  sunny16 stops aperture --third
  sunny16 chart --aperture f/11

Unset parameters come from sunny16.toml in the config directory.
Run 'sunny16 gen-config' to generate a documented sunny16.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing sunny16.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Log calculation steps to stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Derive the unlocked parameter from EV and two locked ones
    Solve(SolveArgs),
    /// List the legal values for one parameter
    Stops {
        kind: ParameterKind,
        #[command(flatten)]
        increment: IncrementArgs,
    },
    /// List the standard light conditions
    Ev,
    /// Print the ISO needed for each shutter speed and EV at one aperture
    Chart {
        /// Aperture marking (default f/16)
        #[arg(long)]
        aperture: Option<String>,
        #[command(flatten)]
        increment: IncrementArgs,
    },
    /// Print a stock sunny16.toml with all options documented
    GenConfig,
}

#[derive(Serialize)]
struct SolveReport<'a> {
    ev: f64,
    increment: StopIncrement,
    locks: &'a [Lock],
    solution: &'a Solution,
    warning: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Solve(args) => {
            let config = load_config(&cli.config_dir)?;
            let increment = args.increment.resolve(&config);
            let ev = args.ev.unwrap_or_else(|| f64::from(config.defaults.ev));

            let locked = args
                .lock
                .iter()
                .map(|&kind| resolve_stop(&args, &config, kind, increment).map(|stop| (kind, stop)))
                .collect::<Result<Vec<_>, _>>()?;
            let locks: Vec<Lock> = locked
                .iter()
                .map(|&(kind, stop)| Lock::new(kind, stop.value))
                .collect();

            let solution = solver::solve(ev, increment, &locks)?;
            if cli.json {
                output::print_json(&SolveReport {
                    ev,
                    increment,
                    locks: &locks,
                    solution: &solution,
                    warning: solution.warning(),
                })?;
            } else {
                output::print_solution(ev, increment, &locked, &solution);
            }
        }
        Command::Stops { kind, increment } => {
            let config = load_config(&cli.config_dir)?;
            let grid = generate_grid(kind, increment.resolve(&config));
            if cli.json {
                output::print_json(&grid)?;
            } else {
                output::print_stops(&grid);
            }
        }
        Command::Ev => {
            let conditions = light::ev_options();
            if cli.json {
                output::print_json(&conditions)?;
            } else {
                output::print_ev_options(&conditions);
            }
        }
        Command::Chart {
            aperture,
            increment,
        } => {
            let config = load_config(&cli.config_dir)?;
            let increment = increment.resolve(&config);
            let label = aperture.as_deref().unwrap_or(chart::DEFAULT_APERTURE);
            let aperture = find_stop(ParameterKind::Aperture, label, increment)?;
            let table = chart::chart_for_aperture(aperture.value, increment)?;
            if cli.json {
                output::print_json(&table)?;
            } else {
                output::print_chart(&table);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Route `tracing` output to stderr so `--json` stays parseable.
///
/// `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sunny16={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(dir: &Path) -> Result<CalculatorConfig, config::ConfigError> {
    let config = config::load_config(dir)?;
    tracing::debug!(
        dir = %dir.display(),
        increment = %config.increment,
        ev = config.defaults.ev,
        "config loaded"
    );
    Ok(config)
}

fn find_stop(
    kind: ParameterKind,
    label: &str,
    increment: StopIncrement,
) -> Result<Stop, Box<dyn std::error::Error>> {
    generate_grid(kind, increment)
        .find_label(label)
        .ok_or_else(|| format!("\"{label}\" is not a {increment}-stop {kind}").into())
}

/// A locked parameter from its command-line marking, or the config default.
fn resolve_stop(
    args: &SolveArgs,
    config: &CalculatorConfig,
    kind: ParameterKind,
    increment: StopIncrement,
) -> Result<Stop, Box<dyn std::error::Error>> {
    match args.label(kind) {
        Some(label) => find_stop(kind, label, increment),
        None => Ok(config.default_stop(kind, increment)?),
    }
}
