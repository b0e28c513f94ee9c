use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use infludash::application::aggregator::PerformanceAggregator;
use infludash::application::campaign_admin::{CampaignAdmin, NewCampaign, delete_choices};
use infludash::application::seeding::select_influencers;
use infludash::config::DashboardConfig;
use infludash::domain::filters::{DateRange, PerformanceFilter, SeedingFilter};
use infludash::domain::ports::TableSource;
use infludash::domain::tables::Generation;
use infludash::infrastructure::{CsvCampaignStore, CsvTableSource};
use infludash::interfaces::{export, report};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about = "Influencer campaign dashboard", long_about = None)]
struct Cli {
    /// Directory holding the master tables (overrides DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Campaign performance KPIs and breakdowns
    Performance {
        /// Campaign id to include (repeatable, default: all)
        #[arg(long = "campaign")]
        campaigns: Vec<String>,

        /// Product name to include (repeatable, default: all)
        #[arg(long = "product")]
        products: Vec<String>,

        /// First post date (YYYY-MM-DD, default: earliest post)
        #[arg(long, conflicts_with = "all_dates")]
        from: Option<NaiveDate>,

        /// Last post date (YYYY-MM-DD, default: latest post)
        #[arg(long, conflicts_with = "all_dates")]
        to: Option<NaiveDate>,

        /// Disable the date filter, keeping undated posts
        #[arg(long)]
        all_dates: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Write the filtered merged records to this CSV file
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Influencer search for product seeding
    Seeding {
        /// Main category to include (repeatable, default: all)
        #[arg(long = "category")]
        categories: Vec<String>,

        #[arg(long)]
        min_followers: Option<u64>,

        #[arg(long)]
        max_followers: Option<u64>,

        /// Lowest brand-fit score
        #[arg(long)]
        min_fit: Option<f64>,

        /// Highest brand-fit score
        #[arg(long)]
        max_fit: Option<f64>,

        /// Print matches as JSON
        #[arg(long)]
        json: bool,
    },
    /// Campaign master maintenance
    Campaigns {
        #[command(subcommand)]
        action: CampaignAction,
    },
}

#[derive(Subcommand)]
enum CampaignAction {
    /// List registered campaigns
    List,
    /// Register a new campaign
    Add {
        #[arg(long)]
        name: String,

        /// Product name as listed in the product table
        #[arg(long)]
        product: String,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,

        /// Total budget in KRW
        #[arg(long)]
        budget: Decimal,
    },
    /// Delete a campaign; without an id, list the choices
    Delete { campaign_id: Option<String> },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so --json output stays parseable
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let cli = Cli::parse();
    let mut config = DashboardConfig::from_env()?;
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir).context("Invalid --data-dir")?;
    }
    info!("Using data directory {:?}", config.data_dir);

    let source = CsvTableSource::in_dir(&config.data_dir);
    let generation = Generation::initial();
    let tables = source.snapshot(generation)?;

    match cli.command {
        Commands::Performance {
            campaigns,
            products,
            from,
            to,
            all_dates,
            json,
            export: export_path,
        } => {
            let defaults = PerformanceFilter::select_all(&tables);
            let date_range = if all_dates {
                None
            } else {
                let observed = defaults.date_range;
                match (
                    from.or(observed.map(|r| r.start)),
                    to.or(observed.map(|r| r.end)),
                ) {
                    (Some(start), Some(end)) => Some(DateRange::new(start, end)),
                    _ => None,
                }
            };
            let filter = PerformanceFilter {
                campaign_ids: if campaigns.is_empty() {
                    defaults.campaign_ids
                } else {
                    campaigns.into_iter().collect()
                },
                product_names: if products.is_empty() {
                    defaults.product_names
                } else {
                    products.into_iter().collect()
                },
                date_range,
            };

            let aggregation = PerformanceAggregator::new(config.ranking_limit).compute(&tables, &filter);
            if let Some(path) = export_path
                && let Some(report) = aggregation.report()
            {
                let count = export::export_records(&path, &report.records)?;
                eprintln!("📝 Exported {} records to {}", count, path.display());
            }
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&aggregation).context("Failed to serialize report")?
                );
            } else {
                print!("{}", report::render_selection(&tables, &filter));
                print!("{}", report::render_performance(&aggregation));
            }
        }
        Commands::Seeding {
            categories,
            min_followers,
            max_followers,
            min_fit,
            max_fit,
            json,
        } => {
            let defaults = SeedingFilter::full_range(&tables.influencers);
            let filter = SeedingFilter {
                categories: categories.into_iter().collect(),
                min_followers: min_followers.unwrap_or(defaults.min_followers),
                max_followers: max_followers.unwrap_or(defaults.max_followers),
                min_fit_score: min_fit.unwrap_or(defaults.min_fit_score),
                max_fit_score: max_fit.unwrap_or(defaults.max_fit_score),
            };
            let selection = select_influencers(&tables.influencers, &filter);
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&selection).context("Failed to serialize matches")?
                );
            } else {
                print!("{}", report::render_seeding(&selection));
            }
        }
        Commands::Campaigns { action } => {
            let store = CsvCampaignStore::new(source.paths().campaigns.clone(), generation);
            let admin = CampaignAdmin::new(store, config.campaign_id_prefix.clone());
            match action {
                CampaignAction::List => print!("{}", report::render_campaigns(&tables)),
                CampaignAction::Add {
                    name,
                    product,
                    start,
                    end,
                    budget,
                } => {
                    let request = NewCampaign {
                        name,
                        product_name: product,
                        start_date: start,
                        end_date: end,
                        total_budget: budget,
                    };
                    let created = admin.add(&tables, &request)?;
                    println!(
                        "✅ Registered '{}' as {}",
                        created.campaign.campaign_name, created.campaign.campaign_id
                    );
                    let refreshed = source.snapshot(created.generation)?;
                    print!("{}", report::render_campaigns(&refreshed));
                }
                CampaignAction::Delete { campaign_id: None } => {
                    for choice in delete_choices(&tables) {
                        println!("{:<18} {}", choice.campaign_id, choice.label);
                    }
                }
                CampaignAction::Delete {
                    campaign_id: Some(id),
                } => {
                    let next = admin.delete(&tables, &id)?;
                    println!("🗑️ Deleted campaign {}", id);
                    let refreshed = source.snapshot(next)?;
                    print!("{}", report::render_campaigns(&refreshed));
                }
            }
        }
    }

    Ok(())
}
