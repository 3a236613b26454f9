//! `forecast`: the full outlook for one region.

use crate::config::FloodConfig;
use crate::inputs::{read_rainfall, read_reservoirs, read_river, read_weather};
use anyhow::Result;
use chrono::Local;
use flood_data::cache::RegionFeedCache;
use flood_data::forecast::{ForecastGenerator, ForecastSettings};
use flood_data::historical::RainfallArchive;
use flood_data::noise::{NoNoise, NoiseSource, SeededNoise};
use flood_data::outlook::{assess, FloodOutlook, OutlookInputs};
use flood_utils::dates::parse_date;
use log::{info, warn};
use std::fmt::Write;

/// Command-line arguments of `forecast`, after clap.
#[derive(Debug, Default, Clone)]
pub struct ForecastArgs {
    pub reservoirs_csv: Option<String>,
    pub rainfall_csv: Option<String>,
    pub region: String,
    pub days: Option<i64>,
    pub start_date: Option<String>,
    pub seed: Option<u64>,
    pub weather_json: Option<String>,
    pub river_json: Option<String>,
    pub json: bool,
}

/// Generator for the configured noise. A seed on the command line wins over
/// the config file; without either, forecasts carry no noise.
pub fn build_generator(
    settings: &ForecastSettings,
    seed_override: Option<u64>,
) -> ForecastGenerator<Box<dyn NoiseSource>> {
    match seed_override.or(settings.seed) {
        Some(seed) => {
            info!("Using seeded noise (seed {}, amplitude {})", seed, settings.noise_amplitude);
            let noise: Box<dyn NoiseSource> = Box::new(SeededNoise::from_seed_u64(seed));
            ForecastGenerator::with_noise(noise, settings.noise_amplitude)
        }
        None => {
            let noise: Box<dyn NoiseSource> = Box::new(NoNoise);
            ForecastGenerator::with_noise(noise, 0.0)
        }
    }
}

pub fn outlook_for(args: &ForecastArgs, config: &FloodConfig) -> Result<FloodOutlook> {
    let start_date = match args.start_date.as_deref() {
        Some(s) => parse_date(s)?,
        None => Local::now().naive_local().date(),
    };
    let days = args
        .days
        .unwrap_or_else(|| i64::from(config.forecast.default_days));

    // One run, one load: the cache is here for its empty-snapshot fallback.
    let mut cache = RegionFeedCache::default();
    let observations =
        cache.observations_or_empty(|| read_reservoirs(args.reservoirs_csv.as_deref()));
    let records = read_rainfall(args.rainfall_csv.as_deref()).unwrap_or_else(|e| {
        warn!("Rainfall feed unavailable ({}), using the canonical curve", e);
        Vec::new()
    });
    let archive = RainfallArchive::new(records).with_regions(&observations);
    let weather = read_weather(args.weather_json.as_deref()).unwrap_or_else(|e| {
        warn!("Weather snapshot unavailable ({}), using the rainfall fallback", e);
        None
    });
    let river = read_river(args.river_json.as_deref()).unwrap_or_else(|e| {
        warn!("River gauge unavailable ({}), scoring reservoirs only", e);
        None
    });

    let inputs = OutlookInputs {
        region: &args.region,
        observations: &observations,
        archive: &archive,
        weather: weather.as_ref(),
        river: river.as_ref(),
        start_date,
        days,
    };
    let generator = build_generator(&config.forecast, args.seed);
    Ok(assess(&inputs, &config.risk, &generator)?)
}

pub fn render_outlook(outlook: &FloodOutlook) -> Result<String> {
    let mut out = String::new();
    writeln!(
        out,
        "{}: {} risk, starting {}",
        outlook.region, outlook.risk_level, outlook.forecast.start_date
    )?;
    writeln!(
        out,
        "{:<12} {:>6} {:>6} {:>8} {:>10}",
        "DATE", "PROB", "CONF", "RISK", "RAIN (mm)"
    )?;
    for day in &outlook.forecast.days {
        writeln!(
            out,
            "{:<12} {:>5.1}% {:>5.1}% {:>8} {:>10.1}",
            day.date.to_string(),
            day.probability,
            day.confidence,
            day.risk_level.as_str(),
            day.expected_rainfall_mm
        )?;
    }

    let summary = &outlook.summary;
    writeln!(out)?;
    if let Some(peak) = &summary.peak_day {
        writeln!(out, "peak: {} at {:.1}%", peak.date, peak.probability)?;
    }
    writeln!(out, "average probability: {:.1}%", summary.average_probability)?;
    writeln!(out, "initial trend: {:?}", summary.initial_trend)?;
    writeln!(out, "sustained high risk: {}", summary.sustained_high_risk)?;
    Ok(out)
}

pub fn run_forecast(args: &ForecastArgs, config: &FloodConfig) -> Result<()> {
    let outlook = outlook_for(args, config)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&outlook)?);
    } else {
        print!("{}", render_outlook(&outlook)?);
    }
    Ok(())
}
