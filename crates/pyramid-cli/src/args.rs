use clap::{Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

/// CLI arguments for the `pyramid` binary
#[derive(Debug, Parser)]
#[command(
    name = "pyramid",
    version,
    about = "Query population pyramids, compare regions and serve the JSON API"
)]
pub struct CliArgs {
    /// Data directory or prebuilt snapshot (overrides the config file)
    #[arg(short = 'd', long = "data", global = true)]
    pub data: Option<PathBuf>,

    /// TOML config file (default: ./pyramid.toml when present)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show a summary of the database contents
    Stats,

    /// List all countries
    Countries,

    /// Show the years available for a country
    Country {
        /// Slug, ISO2/ISO3 code or name (e.g. japan, JP, JPN)
        query: String,
    },

    /// List all US states
    States,

    /// Find countries and states whose name contains a string
    Search {
        /// Case- and accent-insensitive fragment (e.g. "ivoire")
        query: String,
    },

    /// Print a population pyramid for a country or state
    Pyramid {
        /// Slug, code or name; prefix with `state:` or `country:` to pick one
        slug: String,
        year: u16,
        /// Show shares of the total instead of counts
        #[arg(long)]
        percent: bool,
        /// Print the chart as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare two regions band by band
    Compare { a: String, b: String, year: u16 },

    /// Demographic metrics and transition stage
    Metrics { slug: String, year: u16 },

    /// Rank countries by population growth between two years
    Growth {
        from: u16,
        to: u16,
        /// Number of rows to print
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },

    /// Build a bincode snapshot of the data directory
    #[cfg(feature = "builder")]
    Build {
        /// Output file (e.g. data/popdb.bin)
        out: PathBuf,
        /// Write the snapshot without gzip
        #[arg(long)]
        no_compress: bool,
    },

    /// Serve the JSON API
    Serve {
        #[arg(long)]
        host: Option<IpAddr>,
        #[arg(short, long)]
        port: Option<u16>,
    },
}
