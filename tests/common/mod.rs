#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

pub const PRODUCTS: &str = "product_id,product_name,category,price\n\
    P1,Serum 1,Serum,45000\n\
    P2,Mist 2,Mist,31000\n";

pub const INFLUENCERS: &str = "inf_id,inf_name,platform,follower_count,avg_engagement_rate,main_category,estimated_cost_per_post,genai_brand_fit_score,genai_brand_fit_reason\n\
    I1,Minji,Instagram,150000,0.042,Beauty,1200000,4.5,Clean image.\n\
    I2,Jisoo,YouTube,820000,0.031,Lifestyle,3500000,3.8,Trustworthy reviews.\n\
    I3,Haru,TikTok,12000,0.090,Beauty,300000,2.1,Trendy content.\n";

pub const CAMPAIGNS: &str = "campaign_id,campaign_name,product_id,start_date,end_date,total_budget\n\
    C1,March Serum,P1,2025-03-01,2025-03-31,10000\n\
    C2,Summer Mist,P2,2025-06-01,2025-06-30,20000\n\
    C3,\"Serum, encore\",P1,2025-09-01,2025-09-30,30000\n";

pub const PERFORMANCE: &str = "perf_id,campaign_id,inf_id,post_date,post_url,actual_cost,impressions,clicks,conversions,revenue,genai_comment_summary\n\
    1,C1,I1,2025-03-04,https://instagram.com/p/1,1000,800,10,1,5000,Positive 88%.\n\
    2,C1,I1,2025-03-05,https://instagram.com/p/2,2000,200,0,0,0,Positive 71%.\n\
    3,C2,I2,2025-06-10,https://youtube.com/watch?v=3,4000,5000,50,4,12000,Positive 90%.\n\
    4,C2,I3,not a date,https://tiktok.com/@haru/4,500,1000,5,0,0,Positive 75%.\n\
    5,C9,I9,2025-07-01,https://example.com/5,100,10,1,0,0,Orphan row.\n";

/// Scratch data directory holding the four tables
pub struct TestDir {
    pub path: PathBuf,
}

impl TestDir {
    pub fn new(prefix: &str) -> Self {
        let unique_id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "infludash_{}_{}_{}",
            prefix,
            std::process::id(),
            unique_id
        ));
        fs::create_dir_all(&path).expect("Failed to create test temp dir");
        let dir = Self { path };
        dir.write("product_master.csv", PRODUCTS);
        dir.write("influencer_master.csv", INFLUENCERS);
        dir.write("campaign_master.csv", CAMPAIGNS);
        dir.write("campaign_performance.csv", PERFORMANCE);
        dir
    }

    pub fn write(&self, file: &str, content: &str) {
        fs::write(self.path.join(file), content).expect("Failed to write fixture");
    }

    pub fn read(&self, file: &str) -> String {
        fs::read_to_string(self.path.join(file)).expect("Failed to read fixture")
    }

    pub fn file(&self, file: &str) -> PathBuf {
        self.path.join(file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        fs::remove_dir_all(&self.path).ok();
    }
}
