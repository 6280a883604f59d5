use crate::models::Variable;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "airq-explorer")]
#[command(about = "Explore PM2.5 air quality against weather by monitoring location")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Configuration file (TOML)")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Suppress the loading spinner")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List monitoring locations in the dataset
    Locations {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,
    },

    /// Seasonal PM2.5 means, severity bands and weather correlations
    Summary {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,

        #[arg(short, long, help = "Location to analyse [default: all locations]")]
        location: Option<String>,

        #[arg(long, help = "Emit JSON instead of text tables")]
        json: bool,
    },

    /// Print (variable, PM2.5) pairs for a scatter plot as CSV
    Scatter {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,

        #[arg(short, long, help = "Location to analyse [default: all locations]")]
        location: Option<String>,

        #[arg(long, default_value = "TEMP", help = "Weather variable: TEMP, PRES, DEWP, RAIN or WSPM")]
        variable: Variable,

        #[arg(long, help = "Maximum number of points to print")]
        limit: Option<usize>,
    },
}
