use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trinity::{commands, init_logging};

#[derive(Parser, Debug)]
#[command(name = "trinity")]
#[command(about = "N-agent replicator dynamics with κ/π scaling sensitivity sweeps")]
struct Args {
    /// Path to the data directory (default: ~/.trinity/)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Directory for result files (default: <data-dir>/results)
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// Sweep configuration YAML; built-in tables are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare the default system with and without the κ/π correction
    Baseline {
        /// Override the configured step count
        #[arg(long)]
        steps: Option<usize>,
    },
    /// Run the parameter sweep and export the result table
    Sweep {
        /// Override the configured step count
        #[arg(long)]
        steps: Option<usize>,

        /// Also write the table as JSON
        #[arg(long)]
        json: bool,
    },
    /// Baseline, sweep and report (default)
    Run {
        #[arg(long)]
        steps: Option<usize>,

        #[arg(long)]
        json: bool,
    },
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".trinity")
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = args.data_dir.unwrap_or_else(default_data_dir);
    let out_dir = args.output_dir.unwrap_or_else(|| data_dir.join("results"));

    init_logging(&data_dir, &args.log_level)?;

    let mut config = commands::load_sweep_config(args.config.as_deref())?;
    let command = args.command.unwrap_or(Command::Run {
        steps: None,
        json: false,
    });

    println!("Trinity Dynamics (κ/π ≈ {:.4})", trinity_core::config::S_FACTOR);

    match command {
        Command::Baseline { steps } => {
            if let Some(steps) = steps {
                config.simulation.steps = steps;
            }
            commands::baseline(&out_dir, &config.simulation)?;
        }
        Command::Sweep { steps, json } => {
            if let Some(steps) = steps {
                config.simulation.steps = steps;
            }
            commands::sweep(&out_dir, &config, json)?;
        }
        Command::Run { steps, json } => {
            if let Some(steps) = steps {
                config.simulation.steps = steps;
            }
            commands::run(&out_dir, &config, json)?;
        }
    }

    tracing::info!("Trinity finished");
    Ok(())
}
