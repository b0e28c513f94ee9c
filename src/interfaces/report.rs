//! Plain-text rendering for the terminal.
//!
//! Every renderer returns a `String` so `main` decides where it goes and
//! tests can assert on the exact layout.

use crate::application::aggregator::{Aggregation, PerformanceReport};
use crate::application::seeding::SeedingSelection;
use crate::domain::filters::PerformanceFilter;
use crate::domain::performance::breakdown::Breakdowns;
use crate::domain::performance::KpiSummary;
use crate::domain::tables::TableSet;
use rust_decimal::Decimal;
use std::fmt::Write;

const WIDTH: usize = 100;
const NONE_LABEL: &str = "(none)";

pub const SELECTION_REQUIRED: &str =
    "⚠️ Select at least one campaign and one product to see performance.";
pub const NO_MATCHING_DATA: &str = "⚠️ No performance data matches the current filters.";

/// Insert `,` every three digits of the integer part
pub fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Whole currency units with separators, e.g. `1,234,567 KRW`
pub fn format_amount(amount: Decimal) -> String {
    format!("{} KRW", group_thousands(&amount.round_dp(0).to_string()))
}

/// One decimal place, for per-click and per-conversion costs
pub fn format_unit_cost(cost: f64) -> String {
    format!("{} KRW", group_thousands(&format!("{cost:.1}")))
}

pub fn format_percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

fn label(value: Option<&str>) -> &str {
    value.unwrap_or(NONE_LABEL)
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}", title);
    let _ = writeln!(out, "{}", "-".repeat(WIDTH));
}

pub fn render_performance(aggregation: &Aggregation<'_>) -> String {
    match aggregation {
        Aggregation::SelectionRequired => format!("{SELECTION_REQUIRED}\n"),
        Aggregation::Computed(report) if report.is_empty() => format!("{NO_MATCHING_DATA}\n"),
        Aggregation::Computed(report) => render_report(report),
    }
}

fn render_report(report: &PerformanceReport<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(WIDTH));
    let _ = writeln!(out, "📊 CAMPAIGN PERFORMANCE");
    let _ = writeln!(out, "{}", "=".repeat(WIDTH));
    let period = match &report.filter.date_range {
        Some(range) => format!("{} ~ {}", range.start, range.end),
        None => "all dates".to_string(),
    };
    let _ = writeln!(
        out,
        "{} of {} posts | {} campaigns | {} products | {}",
        report.records.len(),
        report.merged_count,
        report.filter.campaign_ids.len(),
        report.filter.product_names.len(),
        period
    );

    render_kpis(&mut out, &report.kpis);
    render_breakdowns(&mut out, &report.breakdowns);
    out
}

fn render_kpis(out: &mut String, kpis: &KpiSummary) {
    heading(out, "Key metrics");
    let grid = [
        [
            ("💰 Revenue", format_amount(kpis.total_revenue)),
            ("💸 Cost", format_amount(kpis.total_cost)),
            ("📈 ROAS", format_percent(kpis.roas)),
        ],
        [
            ("🖱️ CVR", format_percent(kpis.cvr)),
            ("🎯 CTR", format_percent(kpis.ctr)),
            ("🛍️ AOV", format_amount(Decimal::try_from(kpis.aov).unwrap_or_default())),
        ],
        [
            ("🫰 CPC", format_unit_cost(kpis.cpc)),
            ("🫰 CPA", format_unit_cost(kpis.cpa)),
            ("👀 Impressions", group_thousands(&kpis.total_impressions.to_string())),
        ],
    ];
    for row in grid {
        let cells: Vec<String> = row
            .iter()
            .map(|(name, value)| format!("{:<14} {:>17}", name, value))
            .collect();
        let _ = writeln!(out, "{}", cells.join(" | "));
    }
}

fn render_breakdowns(out: &mut String, breakdowns: &Breakdowns) {
    heading(out, "Daily revenue");
    for day in &breakdowns.daily_revenue {
        let date = day
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| NONE_LABEL.to_string());
        let _ = writeln!(out, "{:<12} {:>22}", date, format_amount(day.revenue));
    }

    heading(out, "Influencer efficiency (cost vs revenue)");
    let _ = writeln!(
        out,
        "{:<24} | {:<10} | {:>22} | {:>22}",
        "Influencer", "Platform", "Cost", "Revenue"
    );
    for row in &breakdowns.influencer_efficiency {
        let platform = row
            .platform
            .as_ref()
            .map(|p| p.to_string())
            .unwrap_or_else(|| NONE_LABEL.to_string());
        let _ = writeln!(
            out,
            "{:<24} | {:<10} | {:>22} | {:>22}",
            label(row.inf_name.as_deref()),
            platform,
            format_amount(row.total_cost),
            format_amount(row.total_revenue)
        );
    }

    heading(out, "ROAS by platform");
    for row in &breakdowns.platform_roas {
        let platform = row
            .platform
            .as_ref()
            .map(|p| p.to_string())
            .unwrap_or_else(|| NONE_LABEL.to_string());
        let _ = writeln!(out, "{:<24} {:>10}", platform, format_percent(row.roas));
    }

    heading(out, "Revenue share by category");
    for row in &breakdowns.category_share {
        let _ = writeln!(
            out,
            "{:<24} {:>22} {:>10}",
            label(row.category.as_deref()),
            format_amount(row.revenue),
            format_percent(row.share)
        );
    }

    heading(out, "Top campaigns by ROAS");
    for (rank, row) in breakdowns.campaign_roas.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {:<40} {:>10}",
            rank + 1,
            label(row.campaign_name.as_deref()),
            format_percent(row.roas)
        );
    }

    heading(out, "Top influencers by revenue");
    for (rank, row) in breakdowns.influencer_ranking.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {:<40} {:>22}",
            rank + 1,
            label(row.inf_name.as_deref()),
            format_amount(row.revenue)
        );
    }
}

pub fn render_seeding(selection: &SeedingSelection<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "🔍 {} of {} influencers match",
        selection.matches.len(),
        selection.total
    );
    if selection.matches.is_empty() {
        let _ = writeln!(out, "⚠️ No influencers match the current filters.");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<20} | {:<10} | {:>12} | {:>8} | {:<12} | {:>18} | {:>5} | Fit reason",
        "Name", "Platform", "Followers", "ER", "Category", "Cost / post", "Fit"
    );
    let _ = writeln!(out, "{}", "-".repeat(WIDTH + 20));
    for inf in &selection.matches {
        let _ = writeln!(
            out,
            "{:<20} | {:<10} | {:>12} | {:>8} | {:<12} | {:>18} | {:>5.1} | {}",
            inf.inf_name,
            inf.platform.to_string(),
            group_thousands(&inf.follower_count.to_string()),
            format_percent(inf.avg_engagement_rate),
            inf.main_category,
            format_amount(inf.estimated_cost_per_post),
            inf.genai_brand_fit_score,
            inf.genai_brand_fit_reason
        );
    }
    out
}

/// Filter summary printed above a performance report
pub fn render_selection(tables: &TableSet, filter: &PerformanceFilter) -> String {
    let campaigns: Vec<String> = tables
        .campaigns
        .iter()
        .filter(|c| filter.campaign_ids.contains(&c.campaign_id))
        .map(|c| c.filter_label())
        .collect();
    let products: Vec<&str> = filter.product_names.iter().map(String::as_str).collect();
    let dates = match filter.date_range {
        Some(range) => format!("{} ~ {}", range.start, range.end),
        None => "all dates".to_string(),
    };

    let mut out = String::new();
    let campaign_list = if campaigns.is_empty() {
        NONE_LABEL.to_string()
    } else {
        campaigns.join(", ")
    };
    let product_list = if products.is_empty() {
        NONE_LABEL.to_string()
    } else {
        products.join(", ")
    };
    let _ = writeln!(out, "Campaigns: {}", campaign_list);
    let _ = writeln!(out, "Products:  {}", product_list);
    let _ = writeln!(out, "Period:    {}", dates);
    out
}

pub fn render_campaigns(tables: &TableSet) -> String {
    let mut out = String::new();
    if tables.campaigns.is_empty() {
        let _ = writeln!(out, "No campaigns registered.");
        return out;
    }

    let products = tables.product_index();
    let _ = writeln!(
        out,
        "{:<18} | {:<30} | {:<20} | {:<10} | {:<10} | {:>20}",
        "ID", "Name", "Product", "Start", "End", "Budget"
    );
    let _ = writeln!(out, "{}", "-".repeat(WIDTH + 20));
    for c in &tables.campaigns {
        let product = products
            .get(c.product_id.as_str())
            .map(|p| p.product_name.as_str())
            .unwrap_or(NONE_LABEL);
        let _ = writeln!(
            out,
            "{:<18} | {:<30} | {:<20} | {:<10} | {:<10} | {:>20}",
            c.campaign_id,
            c.campaign_name,
            product,
            c.start_date,
            c.end_date,
            format_amount(c.total_budget)
        );
    }
    out
}
