//! Public impact figures.
//!
//! Public pages start from fallback numbers and overlay whatever the
//! `public-impact` endpoint returns, so they render even when the backend is
//! unreachable.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyGrowth {
    pub month: String,
    #[serde(default)]
    pub trees: u64,
}

/// Partial metrics as sent by the server; any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsPatch {
    pub trees_planted: Option<f64>,
    pub approved_trees_planted: Option<f64>,
    pub co2_offset_kg_per_year: Option<f64>,
    pub co2_offset_tonnes_per_year: Option<f64>,
    pub donations_inr_total: Option<f64>,
    pub active_donors: Option<f64>,
    pub global_donors: Option<f64>,
    pub approved_projects: Option<f64>,
    pub total_projects: Option<f64>,
    pub approval_rate_percent: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarksPatch {
    pub community_survival_rate_percent: Option<f64>,
    pub industry_survival_rate_percent: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthPatch {
    pub monthly_growth: Vec<MonthlyGrowth>,
    pub peak_monthly_trees: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitmentPatch {
    pub operations_share_percent: Option<f64>,
    pub plantation_share_percent: Option<f64>,
    pub transparency_percent: Option<f64>,
    pub monitoring_support: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicImpactResponse {
    pub metrics: MetricsPatch,
    pub benchmarks: BenchmarksPatch,
    pub growth: GrowthPatch,
    pub commitment: CommitmentPatch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImpactMetrics {
    pub trees_planted: f64,
    pub co2_offset_kg_per_year: f64,
    pub donations_inr_total: f64,
    pub active_donors: f64,
    pub global_donors: f64,
    pub approval_rate_percent: f64,
    pub community_survival_rate_percent: f64,
    pub industry_survival_rate_percent: f64,
}

impl Default for ImpactMetrics {
    fn default() -> Self {
        Self {
            trees_planted: 15517.0,
            co2_offset_kg_per_year: 325936.6,
            donations_inr_total: 7760505.0,
            active_donors: 1253.0,
            global_donors: 1249.0,
            approval_rate_percent: 85.0,
            community_survival_rate_percent: 85.0,
            industry_survival_rate_percent: 60.0,
        }
    }
}

impl ImpactMetrics {
    /// Active donors, falling back to all-time donors when the server reports zero.
    pub fn donors(&self) -> f64 {
        if self.active_donors > 0.0 {
            self.active_donors
        } else {
            self.global_donors
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Commitment {
    pub operations_share_percent: f64,
    pub plantation_share_percent: f64,
    pub transparency_percent: f64,
    pub monitoring_support: String,
}

impl Default for Commitment {
    fn default() -> Self {
        Self {
            operations_share_percent: 10.0,
            plantation_share_percent: 90.0,
            transparency_percent: 100.0,
            monitoring_support: "24/7".to_string(),
        }
    }
}

/// Everything the landing and impact pages display.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpactSnapshot {
    pub metrics: ImpactMetrics,
    pub monthly_growth: Vec<MonthlyGrowth>,
    pub commitment: Commitment,
}

impl Default for ImpactSnapshot {
    fn default() -> Self {
        let monthly_growth = [
            ("Jan", 400),
            ("Feb", 300),
            ("Mar", 600),
            ("Apr", 800),
            ("May", 500),
            ("Jun", 900),
        ]
        .into_iter()
        .map(|(month, trees)| MonthlyGrowth {
            month: month.to_string(),
            trees,
        })
        .collect();

        Self {
            metrics: ImpactMetrics::default(),
            monthly_growth,
            commitment: Commitment::default(),
        }
    }
}

fn overlay(target: &mut f64, value: Option<f64>) {
    if let Some(v) = value {
        *target = v;
    }
}

impl ImpactSnapshot {
    /// Overlays server values; absent fields keep their current value and an
    /// empty growth series keeps the existing one.
    pub fn merge(&mut self, response: &PublicImpactResponse) {
        let m = &mut self.metrics;
        let patch = &response.metrics;
        overlay(&mut m.trees_planted, patch.trees_planted);
        overlay(&mut m.co2_offset_kg_per_year, patch.co2_offset_kg_per_year);
        overlay(&mut m.donations_inr_total, patch.donations_inr_total);
        overlay(&mut m.active_donors, patch.active_donors);
        overlay(&mut m.global_donors, patch.global_donors);
        overlay(&mut m.approval_rate_percent, patch.approval_rate_percent);
        overlay(
            &mut m.community_survival_rate_percent,
            response.benchmarks.community_survival_rate_percent,
        );
        overlay(
            &mut m.industry_survival_rate_percent,
            response.benchmarks.industry_survival_rate_percent,
        );

        if !response.growth.monthly_growth.is_empty() {
            self.monthly_growth = response.growth.monthly_growth.clone();
        }

        let c = &mut self.commitment;
        let patch = &response.commitment;
        overlay(&mut c.operations_share_percent, patch.operations_share_percent);
        overlay(&mut c.plantation_share_percent, patch.plantation_share_percent);
        overlay(&mut c.transparency_percent, patch.transparency_percent);
        if let Some(support) = &patch.monitoring_support {
            c.monitoring_support = support.clone();
        }
    }

    /// Largest monthly count, never below 1.
    pub fn peak_trees(&self) -> u64 {
        self.monthly_growth
            .iter()
            .map(|m| m.trees)
            .max()
            .unwrap_or(0)
            .max(1)
    }

    /// Bar heights in whole percent of the peak month.
    pub fn growth_bars(&self) -> Vec<(String, u64, u64)> {
        let peak = self.peak_trees();
        self.monthly_growth
            .iter()
            .map(|m| (m.month.clone(), m.trees, m.trees * 100 / peak))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_keeps_fallbacks_for_missing_fields() {
        let response: PublicImpactResponse = serde_json::from_value(json!({
            "metrics": {"trees_planted": 42, "donations_inr_total": 4158},
            "benchmarks": {"industry_survival_rate_percent": 55},
            "growth": {"monthly_growth": []},
        }))
        .unwrap();

        let mut snapshot = ImpactSnapshot::default();
        snapshot.merge(&response);

        assert_eq!(snapshot.metrics.trees_planted, 42.0);
        assert_eq!(snapshot.metrics.donations_inr_total, 4158.0);
        assert_eq!(snapshot.metrics.industry_survival_rate_percent, 55.0);
        assert_eq!(snapshot.metrics.co2_offset_kg_per_year, 325936.6);
        assert_eq!(snapshot.monthly_growth.len(), 6);
        assert_eq!(snapshot.commitment.monitoring_support, "24/7");
    }

    #[test]
    fn test_merge_replaces_growth_series() {
        let response: PublicImpactResponse = serde_json::from_value(json!({
            "growth": {"monthly_growth": [{"month": "Jul", "trees": 0}, {"month": "Aug", "trees": 0}]},
            "commitment": {"monitoring_support": "Weekly"},
        }))
        .unwrap();

        let mut snapshot = ImpactSnapshot::default();
        snapshot.merge(&response);

        assert_eq!(snapshot.monthly_growth.len(), 2);
        assert_eq!(snapshot.peak_trees(), 1);
        assert_eq!(snapshot.commitment.monitoring_support, "Weekly");
    }

    #[test]
    fn test_growth_bars_relative_to_peak() {
        let snapshot = ImpactSnapshot::default();
        let bars = snapshot.growth_bars();
        assert_eq!(bars[5], ("Jun".to_string(), 900, 100));
        assert_eq!(bars[0].2, 44);
    }

    #[test]
    fn test_donors_fallback() {
        let metrics = ImpactMetrics {
            active_donors: 0.0,
            ..ImpactMetrics::default()
        };
        assert_eq!(metrics.donors(), 1249.0);
    }
}
