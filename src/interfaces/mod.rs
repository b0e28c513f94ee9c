// Merged-record CSV export
pub mod export;

// Terminal rendering of reports, seeding results and campaign lists
pub mod report;
