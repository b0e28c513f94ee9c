// Filter, join and KPI computation over one snapshot
pub mod aggregator;

// Campaign registration and removal
pub mod campaign_admin;

// Influencer search for product seeding
pub mod seeding;
