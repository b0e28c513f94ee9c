use crate::domain::merged::MergedRecord;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

/// `numerator / denominator`, or exactly 0 when the denominator is zero.
///
/// Every KPI ratio goes through here so a campaign without spend or clicks
/// reports 0 instead of NaN or infinity. A quotient beyond `Decimal` range
/// is computed in `f64` instead.
pub fn safe_ratio(numerator: Decimal, denominator: Decimal) -> f64 {
    if denominator.is_zero() {
        return 0.0;
    }
    match numerator.checked_div(denominator) {
        Some(quotient) => quotient.to_f64().unwrap_or(0.0),
        None => {
            let ratio = numerator.to_f64().unwrap_or(0.0) / denominator.to_f64().unwrap_or(1.0);
            if ratio.is_finite() { ratio } else { 0.0 }
        }
    }
}

/// Headline marketing KPIs over a set of merged records
///
/// Totals are plain sums; the six ratios are derived from the totals, not
/// averaged per row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KpiSummary {
    pub record_count: usize,

    // Totals
    pub total_revenue: Decimal,
    pub total_cost: Decimal,
    pub total_clicks: u64,
    pub total_conversions: u64,
    pub total_impressions: u64,

    // Ratios
    pub roas: f64,
    pub cpc: f64,
    pub cpa: f64,
    pub ctr: f64,
    pub cvr: f64,
    pub aov: f64,
}

impl KpiSummary {
    pub fn calculate(records: &[MergedRecord<'_>]) -> Self {
        let mut total_revenue = Decimal::ZERO;
        let mut total_cost = Decimal::ZERO;
        let mut total_clicks = 0u64;
        let mut total_conversions = 0u64;
        let mut total_impressions = 0u64;

        for record in records {
            let perf = record.performance;
            total_revenue = total_revenue.saturating_add(perf.revenue);
            total_cost = total_cost.saturating_add(perf.actual_cost);
            total_clicks = total_clicks.saturating_add(perf.clicks);
            total_conversions = total_conversions.saturating_add(perf.conversions);
            total_impressions = total_impressions.saturating_add(perf.impressions);
        }

        let clicks = Decimal::from(total_clicks);
        let conversions = Decimal::from(total_conversions);
        let impressions = Decimal::from(total_impressions);

        Self {
            record_count: records.len(),
            total_revenue,
            total_cost,
            total_clicks,
            total_conversions,
            total_impressions,
            roas: safe_ratio(total_revenue, total_cost),
            cpc: safe_ratio(total_cost, clicks),
            cpa: safe_ratio(total_cost, conversions),
            ctr: safe_ratio(clicks, impressions),
            cvr: safe_ratio(conversions, clicks),
            aov: safe_ratio(total_revenue, conversions),
        }
    }
}
