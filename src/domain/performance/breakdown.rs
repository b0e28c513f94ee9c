//! Grouped aggregations behind the dashboard charts.
//!
//! Records whose grouping key is missing (unmatched join, unparseable date)
//! are kept in a `None` group, so every breakdown's revenue adds up to the
//! total revenue of its input.

use super::metrics::safe_ratio;
use crate::domain::merged::MergedRecord;
use crate::domain::records::Platform;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEFAULT_RANKING_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRevenue {
    pub date: Option<NaiveDate>,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfluencerEfficiency {
    pub inf_name: Option<String>,
    /// First platform seen for this influencer name
    pub platform: Option<Platform>,
    pub total_cost: Decimal,
    pub total_revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformRoas {
    pub platform: Option<Platform>,
    pub revenue: Decimal,
    pub actual_cost: Decimal,
    pub roas: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: Option<String>,
    pub revenue: Decimal,
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignRoas {
    pub campaign_name: Option<String>,
    pub revenue: Decimal,
    pub actual_cost: Decimal,
    pub roas: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfluencerRevenue {
    pub inf_name: Option<String>,
    pub revenue: Decimal,
    pub actual_cost: Decimal,
}

#[derive(Debug, Default)]
struct GroupTotals {
    revenue: Decimal,
    cost: Decimal,
    platform: Option<Platform>,
}

fn group_by<'a, K, F>(records: &[MergedRecord<'a>], key: F) -> BTreeMap<K, GroupTotals>
where
    K: Ord,
    F: Fn(&MergedRecord<'a>) -> K,
{
    let mut groups: BTreeMap<K, GroupTotals> = BTreeMap::new();
    for record in records {
        let totals = groups.entry(key(record)).or_default();
        totals.revenue = totals.revenue.saturating_add(record.revenue());
        totals.cost = totals.cost.saturating_add(record.actual_cost());
        if totals.platform.is_none() {
            totals.platform = record.platform().cloned();
        }
    }
    groups
}

/// All chart inputs for one filtered record set
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Breakdowns {
    /// Ascending by day, undated bucket last
    pub daily_revenue: Vec<DailyRevenue>,
    /// Descending by revenue
    pub influencer_efficiency: Vec<InfluencerEfficiency>,
    /// Descending by ROAS
    pub platform_roas: Vec<PlatformRoas>,
    /// Descending by revenue
    pub category_share: Vec<CategoryShare>,
    /// Top campaigns by ROAS
    pub campaign_roas: Vec<CampaignRoas>,
    /// Top influencers by revenue
    pub influencer_ranking: Vec<InfluencerRevenue>,
}

impl Breakdowns {
    pub fn calculate(records: &[MergedRecord<'_>], ranking_limit: usize) -> Self {
        let influencers = influencer_totals(records);
        let mut influencer_ranking: Vec<InfluencerRevenue> = influencers
            .iter()
            .map(|i| InfluencerRevenue {
                inf_name: i.inf_name.clone(),
                revenue: i.total_revenue,
                actual_cost: i.total_cost,
            })
            .collect();
        influencer_ranking.truncate(ranking_limit);

        let mut campaign_roas = campaign_roas(records);
        campaign_roas.truncate(ranking_limit);

        Self {
            daily_revenue: daily_revenue(records),
            influencer_efficiency: influencers,
            platform_roas: platform_roas(records),
            category_share: category_share(records),
            campaign_roas,
            influencer_ranking,
        }
    }
}

pub fn daily_revenue(records: &[MergedRecord<'_>]) -> Vec<DailyRevenue> {
    let groups = group_by(records, |r| r.post_date);
    let mut series: Vec<DailyRevenue> = groups
        .into_iter()
        .map(|(date, totals)| DailyRevenue {
            date,
            revenue: totals.revenue,
        })
        .collect();
    // BTreeMap puts `None` first; the undated bucket belongs after the series.
    if series.first().is_some_and(|d| d.date.is_none()) {
        let undated = series.remove(0);
        series.push(undated);
    }
    series
}

pub fn influencer_totals(records: &[MergedRecord<'_>]) -> Vec<InfluencerEfficiency> {
    let mut rows: Vec<InfluencerEfficiency> = group_by(records, |r| r.inf_name().map(str::to_string))
        .into_iter()
        .map(|(inf_name, totals)| InfluencerEfficiency {
            inf_name,
            platform: totals.platform,
            total_cost: totals.cost,
            total_revenue: totals.revenue,
        })
        .collect();
    rows.sort_by(|a, b| b.total_revenue.cmp(&a.total_revenue));
    rows
}

pub fn platform_roas(records: &[MergedRecord<'_>]) -> Vec<PlatformRoas> {
    let mut rows: Vec<PlatformRoas> = group_by(records, |r| r.platform().cloned())
        .into_iter()
        .map(|(platform, totals)| PlatformRoas {
            platform,
            revenue: totals.revenue,
            actual_cost: totals.cost,
            roas: safe_ratio(totals.revenue, totals.cost),
        })
        .collect();
    rows.sort_by(|a, b| b.roas.total_cmp(&a.roas));
    rows
}

pub fn category_share(records: &[MergedRecord<'_>]) -> Vec<CategoryShare> {
    let groups = group_by(records, |r| r.category().map(str::to_string));
    let total = groups
        .values()
        .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.revenue));
    let mut rows: Vec<CategoryShare> = groups
        .into_iter()
        .map(|(category, totals)| CategoryShare {
            category,
            revenue: totals.revenue,
            share: safe_ratio(totals.revenue, total),
        })
        .collect();
    rows.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    rows
}

pub fn campaign_roas(records: &[MergedRecord<'_>]) -> Vec<CampaignRoas> {
    let mut rows: Vec<CampaignRoas> = group_by(records, |r| r.campaign_name().map(str::to_string))
        .into_iter()
        .map(|(campaign_name, totals)| CampaignRoas {
            campaign_name,
            revenue: totals.revenue,
            actual_cost: totals.cost,
            roas: safe_ratio(totals.revenue, totals.cost),
        })
        .collect();
    rows.sort_by(|a, b| b.roas.total_cmp(&a.roas));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::records::{Campaign, Influencer, PerformanceRecord, Product};
    use rust_decimal_macros::dec;

    fn perf(id: &str, inf_id: &str, date: &str, cost: Decimal, revenue: Decimal) -> PerformanceRecord {
        PerformanceRecord {
            perf_id: id.to_string(),
            campaign_id: "C1".to_string(),
            inf_id: inf_id.to_string(),
            post_date: date.to_string(),
            post_url: String::new(),
            actual_cost: cost,
            impressions: 100,
            clicks: 5,
            conversions: 1,
            revenue,
            genai_comment_summary: String::new(),
        }
    }

    fn influencer(id: &str, name: &str, platform: Platform) -> Influencer {
        Influencer {
            inf_id: id.to_string(),
            inf_name: name.to_string(),
            platform,
            follower_count: 10_000,
            avg_engagement_rate: 0.05,
            main_category: "Beauty".to_string(),
            estimated_cost_per_post: dec!(100000),
            genai_brand_fit_score: 4.0,
            genai_brand_fit_reason: String::new(),
        }
    }

    fn campaign() -> Campaign {
        Campaign {
            campaign_id: "C1".to_string(),
            campaign_name: "Launch".to_string(),
            product_id: "P1".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            total_budget: dec!(1000000),
        }
    }

    fn product() -> Product {
        Product {
            product_id: "P1".to_string(),
            product_name: "Mist 1".to_string(),
            category: "Mist".to_string(),
            price: dec!(30000),
        }
    }

    fn record<'a>(
        perf: &'a PerformanceRecord,
        influencer: Option<&'a Influencer>,
        campaign: &'a Campaign,
        product: &'a Product,
    ) -> MergedRecord<'a> {
        MergedRecord {
            performance: perf,
            post_date: crate::domain::merged::parse_post_date(&perf.post_date),
            campaign: Some(campaign),
            product: Some(product),
            influencer,
        }
    }

    #[test]
    fn test_breakdowns_sum_to_total_revenue() {
        let camp = campaign();
        let prod = product();
        let alice = influencer("a", "Alice", Platform::Instagram);
        let bob = influencer("b", "Bob", Platform::TikTok);
        let rows = [
            perf("1", "a", "2025-01-03", dec!(100), dec!(400)),
            perf("2", "b", "2025-01-02", dec!(200), dec!(100)),
            perf("3", "a", "bad-date", dec!(50), dec!(25)),
            perf("4", "ghost", "2025-01-03", dec!(10), dec!(5)),
        ];
        let records = vec![
            record(&rows[0], Some(&alice), &camp, &prod),
            record(&rows[1], Some(&bob), &camp, &prod),
            record(&rows[2], Some(&alice), &camp, &prod),
            record(&rows[3], None, &camp, &prod),
        ];
        let total = dec!(530);
        let b = Breakdowns::calculate(&records, DEFAULT_RANKING_LIMIT);

        assert_eq!(b.daily_revenue.iter().map(|d| d.revenue).sum::<Decimal>(), total);
        assert_eq!(b.influencer_efficiency.iter().map(|i| i.total_revenue).sum::<Decimal>(), total);
        assert_eq!(b.platform_roas.iter().map(|p| p.revenue).sum::<Decimal>(), total);
        assert_eq!(b.category_share.iter().map(|c| c.revenue).sum::<Decimal>(), total);
        assert_eq!(b.campaign_roas.iter().map(|c| c.revenue).sum::<Decimal>(), total);
    }

    #[test]
    fn test_daily_series_is_chronological_with_undated_last() {
        let camp = campaign();
        let prod = product();
        let rows = [
            perf("1", "a", "2025-01-03", dec!(1), dec!(10)),
            perf("2", "a", "garbage", dec!(1), dec!(7)),
            perf("3", "a", "2025-01-01", dec!(1), dec!(20)),
            perf("4", "a", "2025-01-03", dec!(1), dec!(5)),
        ];
        let records: Vec<_> = rows.iter().map(|p| record(p, None, &camp, &prod)).collect();
        let series = daily_revenue(&records);

        assert_eq!(series.len(), 3);
        assert_eq!(series[0].date, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(series[1].date, NaiveDate::from_ymd_opt(2025, 1, 3));
        assert_eq!(series[1].revenue, dec!(15));
        assert_eq!(series[2].date, None);
        assert_eq!(series[2].revenue, dec!(7));
    }

    #[test]
    fn test_platform_roas_zero_cost_is_zero_and_sorted() {
        let camp = campaign();
        let prod = product();
        let ig = influencer("a", "Alice", Platform::Instagram);
        let yt = influencer("b", "Bob", Platform::YouTube);
        let rows = [
            perf("1", "a", "2025-01-01", dec!(100), dec!(300)),
            perf("2", "b", "2025-01-01", Decimal::ZERO, dec!(900)),
        ];
        let records = vec![
            record(&rows[0], Some(&ig), &camp, &prod),
            record(&rows[1], Some(&yt), &camp, &prod),
        ];
        let platforms = platform_roas(&records);

        assert_eq!(platforms[0].platform, Some(Platform::Instagram));
        assert!((platforms[0].roas - 3.0).abs() < 1e-12);
        assert_eq!(platforms[1].platform, Some(Platform::YouTube));
        assert_eq!(platforms[1].roas, 0.0);
    }

    #[test]
    fn test_influencer_ranking_is_capped() {
        let camp = campaign();
        let prod = product();
        let people: Vec<Influencer> = (0..15)
            .map(|i| influencer(&format!("i{i}"), &format!("Name {i:02}"), Platform::Instagram))
            .collect();
        let rows: Vec<PerformanceRecord> = (0..15)
            .map(|i| perf(&i.to_string(), &format!("i{i}"), "2025-01-01", dec!(1), Decimal::from(i)))
            .collect();
        let records: Vec<_> = rows
            .iter()
            .zip(people.iter())
            .map(|(p, inf)| record(p, Some(inf), &camp, &prod))
            .collect();

        let b = Breakdowns::calculate(&records, DEFAULT_RANKING_LIMIT);
        assert_eq!(b.influencer_efficiency.len(), 15);
        assert_eq!(b.influencer_ranking.len(), 10);
        assert_eq!(b.influencer_ranking[0].inf_name.as_deref(), Some("Name 14"));
        assert_eq!(b.influencer_ranking[9].revenue, dec!(5));
    }

    #[test]
    fn test_category_share_fractions() {
        let camp = campaign();
        let prod = product();
        let rows = [perf("1", "a", "2025-01-01", dec!(1), dec!(40))];
        let records: Vec<_> = rows.iter().map(|p| record(p, None, &camp, &prod)).collect();
        let shares = category_share(&records);
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].category.as_deref(), Some("Mist"));
        assert!((shares[0].share - 1.0).abs() < 1e-12);
    }
}
