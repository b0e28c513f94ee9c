use crate::domain::errors::DashboardError;
use crate::domain::records::Campaign;
use crate::domain::tables::{Generation, TableSet};
use std::sync::Arc;

/// Read side: hands out immutable snapshots of the four tables.
///
/// Implementations may memoize. A snapshot is reused only while the
/// requested generation matches the one it was loaded under and the
/// backing data has not changed.
pub trait TableSource {
    fn snapshot(&self, generation: Generation) -> Result<Arc<TableSet>, DashboardError>;
}

/// Write side for the campaign table.
///
/// Both operations return the generation the caller must use for its
/// next snapshot. There is no locking against other writers.
pub trait CampaignStore {
    fn append(&self, campaign: &Campaign) -> Result<Generation, DashboardError>;
    fn delete(&self, campaign_id: &str) -> Result<Generation, DashboardError>;
}
