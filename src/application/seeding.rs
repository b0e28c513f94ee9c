use crate::domain::filters::SeedingFilter;
use crate::domain::records::Influencer;
use serde::Serialize;
use tracing::debug;

/// Influencers matching a seeding search, in table order
#[derive(Debug, Clone, Serialize)]
pub struct SeedingSelection<'a> {
    pub filter: SeedingFilter,
    pub total: usize,
    pub matches: Vec<&'a Influencer>,
}

pub fn select_influencers<'a>(
    influencers: &'a [Influencer],
    filter: &SeedingFilter,
) -> SeedingSelection<'a> {
    let matches: Vec<&Influencer> = influencers.iter().filter(|i| filter.matches(i)).collect();
    debug!(
        "Seeding search matched {} of {} influencers",
        matches.len(),
        influencers.len()
    );
    SeedingSelection {
        filter: filter.clone(),
        total: influencers.len(),
        matches,
    }
}
