use serde::Serialize;

use crate::results::store::VerdictTotals;

/// Aggregate numbers behind the admin analytics endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub total_ideas_analyzed: i64,
    pub total_build_verdicts: i64,
    pub total_bail_verdicts: i64,
    pub total_caution_verdicts: i64,
    pub total_time_saved: f64,
    /// Rounded to one decimal place.
    pub average_score: f64,
    /// `"build:bail"`, e.g. `"1:3"`.
    pub build_bail_ratio: String,
    pub build_rate: f64,
    pub bail_rate: f64,
    pub caution_rate: f64,
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn rate(part: i64, total: i64) -> f64 {
    if total == 0 {
        0.0
    } else {
        round_to(part as f64 / total as f64, 3)
    }
}

impl From<VerdictTotals> for AnalyticsReport {
    fn from(t: VerdictTotals) -> Self {
        AnalyticsReport {
            total_ideas_analyzed: t.total,
            total_build_verdicts: t.build,
            total_bail_verdicts: t.bail,
            total_caution_verdicts: t.caution,
            total_time_saved: round_to(t.time_saved, 1),
            average_score: round_to(t.average_score, 1),
            build_bail_ratio: format!("{}:{}", t.build, t.bail),
            build_rate: rate(t.build, t.total),
            bail_rate: rate(t.bail, t.total),
            caution_rate: rate(t.caution, t.total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_reports_zeroes() {
        let report = AnalyticsReport::from(VerdictTotals::default());
        assert_eq!(report.total_ideas_analyzed, 0);
        assert_eq!(report.build_bail_ratio, "0:0");
        assert_eq!(report.build_rate, 0.0);
        assert_eq!(report.average_score, 0.0);
    }

    #[test]
    fn test_rates_and_rounding() {
        let report = AnalyticsReport::from(VerdictTotals {
            total: 8,
            build: 2,
            bail: 5,
            caution: 1,
            time_saved: 640.25,
            average_score: 4.2375,
        });
        assert_eq!(report.build_bail_ratio, "2:5");
        assert_eq!(report.build_rate, 0.25);
        assert_eq!(report.bail_rate, 0.625);
        assert_eq!(report.caution_rate, 0.125);
        assert_eq!(report.average_score, 4.2);
        assert_eq!(report.total_time_saved, 640.3);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(AnalyticsReport::from(VerdictTotals::default())).unwrap();
        assert!(json.get("totalIdeasAnalyzed").is_some());
        assert!(json.get("buildBailRatio").is_some());
    }
}
