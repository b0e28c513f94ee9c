// Marketing KPI domain
pub mod breakdown;
pub mod metrics;

pub use breakdown::{Breakdowns, DEFAULT_RANKING_LIMIT};
pub use metrics::{KpiSummary, safe_ratio};
