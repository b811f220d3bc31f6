use clap::Parser;
use zillow_listings::utils::logger;
use zillow_listings::{CliConfig, EtlEngine, EtlError, ListingPipeline, LocalStorage};

#[tokio::main]
async fn main() {
    // clap prints usage and exits 2 on bad flags, 0 on -h
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting zillow-listings CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(&config).await {
        tracing::error!("❌ Export failed: {}", e);
        eprintln!("❌ {}", e);
        if let EtlError::UpstreamStatus { body, .. } = &e {
            eprintln!("{}", body);
        }
        std::process::exit(e.exit_code());
    }
}

async fn run(config: &CliConfig) -> zillow_listings::Result<String> {
    let job = config.resolve()?;

    let storage = LocalStorage::new(config.output_dir.clone());
    let pipeline = ListingPipeline::new(storage, job)?;

    let output_path = EtlEngine::new(pipeline).run().await?;
    tracing::info!("✅ Export completed: {}", output_path);

    Ok(output_path)
}
