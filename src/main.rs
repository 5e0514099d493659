use article_link_sync::utils::{logger, validation::Validate};
use article_link_sync::{CliConfig, GitSparseFetcher, LinkMapPipeline, LocalStorage, SyncEngine};
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration failed: {}", e);
            eprintln!("Error: {}", e.user_friendly_message());
            if e.is_config_error() {
                eprintln!("💡 Check the --config file and command line flags");
            }
            std::process::exit(1);
        }
    };

    println!(
        "Fetching {} from {} (branch: {})",
        config.file_path, config.repository_url, config.branch
    );
    println!("Updating: {}", config.target_path);

    let pipeline = LinkMapPipeline::new(
        GitSparseFetcher::new(),
        LocalStorage::current_dir(),
        config,
    );
    let engine = SyncEngine::new(pipeline);

    match engine.run().await {
        Ok(report) => {
            if !report.written {
                println!(
                    "Dry run: ARTICLE_LINK_MAP would be updated with {} entries (changed: {})",
                    report.entries, report.changed
                );
            } else {
                println!("✅ Successfully updated ARTICLE_LINK_MAP ({} entries)", report.entries);
                println!();
                println!("Note: Please review the changes and run 'npm run build' to verify.");
            }
        }
        Err(e) => {
            tracing::error!("❌ Sync failed during {}: {}", e.stage, e.error);
            eprintln!("Error: {}", e.user_friendly_message());
            std::process::exit(1);
        }
    }
}
