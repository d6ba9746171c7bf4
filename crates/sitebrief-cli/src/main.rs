use std::env;
use std::path::PathBuf;

use clap::Parser;
use sitebrief_crawler::{
    load_targets, run_targets, CrawlConfig, DigestWriter, FileStore, MatchPolicy,
};
use tokio::runtime;

/// Targeted crawler that turns listing pages into daily briefings
#[derive(Debug, Parser)]
#[command(version)]
pub struct Args {
    /// Path to the JSON target list
    #[arg(long, short, default_value = "configs/urls.json")]
    pub targets: PathBuf,
    /// Optional default crawler yaml configuration file
    #[arg(env = "SITEBRIEF_CRAWLER_CONFIG", long)]
    pub crawler_config: Option<PathBuf>,
    /// Override the required-keyword list file
    #[arg(long)]
    pub keywords: Option<PathBuf>,
    /// Override the briefings output directory
    #[arg(long)]
    pub briefings_dir: Option<PathBuf>,
    /// Override the visited URL file
    #[arg(long)]
    pub visited_file: Option<PathBuf>,
    /// Override the visited URL matching policy
    #[arg(value_enum, long)]
    pub match_policy: Option<MatchPolicy>,
    /// Override the crawler's user agent
    #[arg(long)]
    pub user_agent: Option<String>,
    /// Override the per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
    /// When quiet no logs are outputted
    #[arg(long, short)]
    pub quiet: bool,
}

impl TryFrom<&Args> for CrawlConfig {
    type Error = anyhow::Error;

    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        let mut conf = if let Some(path) = &args.crawler_config {
            serde_yaml::from_reader(fs_err::File::open(path)?)?
        } else {
            CrawlConfig::default()
        };
        if let Some(keywords) = &args.keywords {
            conf.keywords_file = keywords.clone();
        }
        if let Some(briefings_dir) = &args.briefings_dir {
            conf.briefings_dir = briefings_dir.clone();
        }
        if let Some(visited_file) = &args.visited_file {
            conf.store.visited_file = visited_file.clone();
        }
        if let Some(match_policy) = args.match_policy {
            conf.store.match_policy = match_policy;
        }
        if let Some(user_agent) = &args.user_agent {
            conf.user_agent = user_agent.to_string();
        }
        if let Some(timeout) = args.timeout {
            conf.timeout_secs = timeout;
        }
        Ok(conf)
    }
}

pub fn crawl(args: Args) -> anyhow::Result<()> {
    let conf: CrawlConfig = (&args).try_into()?;
    let targets = load_targets(&args.targets)?;
    let store = FileStore::new(&conf.store);
    let digest = DigestWriter::new(conf.briefings_dir.clone());

    let rt = runtime::Builder::new_multi_thread().enable_all().build()?;
    rt.block_on(run_targets(&conf, &targets, &store, &digest))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if !args.quiet {
        env::set_var("RUST_LOG", "sitebrief_crawler=info,sitebrief=info");
        env_logger::init();
    }
    crawl(args)
}
