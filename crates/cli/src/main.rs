use anyhow::{Context, Result};
use clap::Parser;
use photolabel_core::{init, Config, Pipeline};
use photolabel_core::source::PathSource;
use url::Url;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the image to label
    image: std::path::PathBuf,

    /// Maximum number of labels to request
    #[arg(short = 'n', long)]
    max_results: Option<u32>,

    /// Override the annotation endpoint defined in .env
    #[arg(long)]
    endpoint: Option<String>,

    /// Also print the provider's mid token next to each label
    #[arg(long, default_value_t = false)]
    show_mid: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup
    let _ = dotenvy::dotenv();
    init();
    env_logger::init();
    let args = Args::parse();

    // Load config and apply CLI overrides
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(n) = args.max_results {
        config.max_results = n;
    }
    if let Some(endpoint) = args.endpoint {
        config.endpoint = Url::parse(&endpoint).context("Invalid --endpoint")?;
    }

    let mut pipeline = Pipeline::from_config(config);
    let mut source = PathSource::new(&args.image);

    // Select
    if let Some(notice) = pipeline.select_image(&mut source).await {
        eprintln!("{}", notice.message());
        std::process::exit(1);
    }

    // Analyze
    if let Some(notice) = pipeline.analyze().await {
        // "No labels found" is informational; real failures exit non-zero
        let failed = pipeline.last_error().is_some();
        eprintln!("{}", notice.message());
        if failed {
            std::process::exit(1);
        }
        return Ok(());
    }

    println!("Detected objects:");
    for label in pipeline.labels() {
        if args.show_mid {
            println!("  {} ({})", label.description, label.mid);
        } else {
            println!("  {}", label.description);
        }
    }

    Ok(())
}
