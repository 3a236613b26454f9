use chrono::NaiveDate;
use flood_core::forecast::InitialTrend;
use flood_core::rainfall::HistoricalRainfallRecord;
use flood_core::region::RegionObservation;
use flood_core::RiskLevel;
use flood_data::analysis::analyze;
use flood_data::forecast::{ForecastGenerator, ForecastHistory, ForecastRequest};
use flood_data::historical::{RainfallArchive, CANONICAL_MONSOON_CURVE_MM};
use flood_data::noise::SeededNoise;
use flood_data::outlook::{assess, OutlookInputs};
use flood_data::risk::RiskThresholds;

fn sample_archive() -> (Vec<RegionObservation>, RainfallArchive) {
    let observations = RegionObservation::sample().unwrap();
    let archive = RainfallArchive::new(HistoricalRainfallRecord::sample().unwrap())
        .with_regions(&observations);
    (observations, archive)
}

#[test]
fn generate_then_analyze_round_trip() {
    let (_, archive) = sample_archive();
    let start = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let generator = ForecastGenerator::with_noise(SeededNoise::from_seed_u64(2024), 3.0);
    for region in ["Idukki", "Wayanad", "Tehri Garhwal", "Atlantis"] {
        let history = ForecastHistory::from_archive(&archive, region, 2024);
        for risk_level in RiskLevel::ALL {
            for days in [1, 5, 10, 30] {
                let request = ForecastRequest {
                    region: region.to_string(),
                    start_date: start,
                    risk_level,
                    reservoir_factor: None,
                    rainfall_factor: 25.0,
                    days,
                };
                let forecast = generator.generate(&request, &history).unwrap();
                assert_eq!(forecast.len(), days as usize);
                let summary = analyze(&forecast.days);
                let peak = summary.peak_day.expect("non-empty forecast has a peak");
                assert!(forecast.days.iter().all(|d| d.probability <= peak.probability));
                if days < 3 {
                    assert_eq!(summary.initial_trend, InitialTrend::Stable);
                } else {
                    assert_ne!(summary.initial_trend, InitialTrend::Stable);
                }
            }
        }
    }
}

#[test]
fn every_sample_region_has_a_twelve_month_pattern() {
    let (observations, archive) = sample_archive();
    for obs in &observations {
        let pattern = archive.historical_pattern(&obs.region_id, 2024);
        assert_eq!(pattern.months.len(), 12);
    }
    // Tehri Garhwal is alone in its state and has no rainfall rows.
    let tehri = archive.historical_pattern("Tehri Garhwal", 2024);
    assert_eq!(tehri.values(), CANONICAL_MONSOON_CURVE_MM);
    // Idukki has rows and must never reach the canonical curve.
    assert!(!archive.historical_pattern("Idukki", 1950).is_canonical());
}

#[test]
fn sample_snapshot_outlooks() {
    let (observations, archive) = sample_archive();
    let thresholds = RiskThresholds::default();
    let generator = ForecastGenerator::new();
    let start = NaiveDate::from_ymd_opt(2024, 8, 10).unwrap();
    let expectations = [
        ("Idukki", RiskLevel::Severe),
        ("Wayanad", RiskLevel::High),
        ("Satara", RiskLevel::High),
        ("Solapur", RiskLevel::Low),
        ("Sambalpur", RiskLevel::Severe),
        ("Tehri Garhwal", RiskLevel::Medium),
        ("Bilaspur", RiskLevel::Medium),
    ];
    for (region, expected) in expectations {
        let inputs = OutlookInputs {
            region,
            observations: &observations,
            archive: &archive,
            weather: None,
            river: None,
            start_date: start,
            days: 10,
        };
        let outlook = assess(&inputs, &thresholds, &generator).unwrap();
        assert_eq!(outlook.risk_level, expected, "region {region}");
        assert_eq!(outlook.forecast.len(), 10);
    }
}
