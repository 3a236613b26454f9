//! Command implementations for the flood watch CLI.
//!
//! Provides subcommands for scoring regions, inspecting rainfall patterns,
//! generating forecasts and downloading feeds.

use clap::Subcommand;

pub mod config;
pub mod fetch;
pub mod forecast;
pub mod inputs;
pub mod pattern;
pub mod risk;

#[derive(Subcommand)]
pub enum Command {
    /// Current flood risk per region and reservoir totals per state
    Risk {
        /// Reservoir feed CSV (embedded sample when omitted)
        #[arg(short = 'r', long)]
        reservoirs_csv: Option<String>,
    },

    /// Twelve-month rainfall pattern for a region and year
    Pattern {
        /// Reservoir feed CSV, used to find same-state neighbours
        #[arg(short = 'r', long)]
        reservoirs_csv: Option<String>,

        /// Rainfall history CSV (embedded sample when omitted)
        #[arg(short = 'f', long)]
        rainfall_csv: Option<String>,

        #[arg(long)]
        region: String,

        #[arg(long)]
        year: i32,

        /// Also list the rainfall history held per location
        #[arg(long)]
        coverage: bool,
    },

    /// Day-by-day flood forecast for a region
    Forecast {
        #[arg(short = 'r', long)]
        reservoirs_csv: Option<String>,

        #[arg(short = 'f', long)]
        rainfall_csv: Option<String>,

        #[arg(long)]
        region: String,

        /// Days to forecast (config `default_days` when omitted)
        #[arg(long, allow_negative_numbers = true)]
        days: Option<i64>,

        /// First forecast day, YYYY-MM-DD (today when omitted)
        #[arg(long)]
        start_date: Option<String>,

        /// Seed for forecast noise; overrides the config file
        #[arg(long)]
        seed: Option<u64>,

        /// Weather snapshot JSON
        #[arg(long)]
        weather: Option<String>,

        /// River gauge JSON
        #[arg(long)]
        river: Option<String>,

        /// Print the outlook as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download a feed to a local file
    Fetch {
        #[arg(long)]
        url: String,

        /// Output path
        #[arg(short = 'o', long)]
        output: String,

        #[arg(long, value_enum, default_value_t = fetch::FeedKind::Reservoirs)]
        kind: fetch::FeedKind,
    },
}

pub async fn run(command: Command, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = config::load_config(config_path)?;
    match command {
        Command::Risk { reservoirs_csv } => risk::run_risk(reservoirs_csv.as_deref(), &config),
        Command::Pattern {
            reservoirs_csv,
            rainfall_csv,
            region,
            year,
            coverage,
        } => pattern::run_pattern(
            reservoirs_csv.as_deref(),
            rainfall_csv.as_deref(),
            &region,
            year,
            coverage,
        ),
        Command::Forecast {
            reservoirs_csv,
            rainfall_csv,
            region,
            days,
            start_date,
            seed,
            weather,
            river,
            json,
        } => {
            let args = forecast::ForecastArgs {
                reservoirs_csv,
                rainfall_csv,
                region,
                days,
                start_date,
                seed,
                weather_json: weather,
                river_json: river,
                json,
            };
            forecast::run_forecast(&args, &config)
        }
        Command::Fetch { url, output, kind } => fetch::run_fetch(&url, &output, kind).await,
    }
}
