// Campaign id allocation
pub mod campaign_id;

// Domain-specific error types
pub mod errors;

// Performance and seeding filters
pub mod filters;

// Denormalized join of the four tables
pub mod merged;

// KPI and breakdown calculations
pub mod performance;

// Port interfaces
pub mod ports;

// Source table rows
pub mod records;

// Table snapshots
pub mod tables;
