use anyhow::Context;
use clap::Parser;
use drugsignals::{
    apis::OpenFdaClient,
    arguments::{print_debug_info, Arguments},
    cache::CacheConfig,
    config::{apply_env_overrides, load_config_from_path, validate_config},
    logger::{self, LogTag},
    notes::InMemoryNoteRepository,
    signals::{SignalAnalyzer, SignalCache},
    webserver::{self, AppState},
};
use std::sync::Arc;
use tokio::sync::Notify;

/// Main entry point
///
/// Loads `.env`, parses arguments, loads and validates configuration, wires
/// the analyzer and note store, then serves HTTP until Ctrl-C.
#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let args = Arguments::parse();
    logger::init(args.logger_config());

    logger::info(LogTag::System, "drugsignals starting up...");
    print_debug_info(&args);

    if let Err(e) = run(args).await {
        logger::error(LogTag::System, &format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(args: Arguments) -> anyhow::Result<()> {
    let mut config = load_config_from_path(&args.config)?;
    apply_env_overrides(&mut config);
    args.apply_overrides(&mut config);
    validate_config(&config)?;

    if config.openfda.api_key.is_empty() {
        logger::warning(
            LogTag::Config,
            "No openFDA API key configured, requests use the keyless quota",
        );
    }

    let client = OpenFdaClient::new(&config.openfda)?;
    let target = client.query_target().clone();
    let cache = SignalCache::new(CacheConfig::from(&config.signals));
    let analyzer = SignalAnalyzer::new(Arc::new(client), target, cache)
        .with_default_limit(config.signals.default_limit);

    logger::info(
        LogTag::Signals,
        &format!(
            "Signal cache: ttl={}s, capacity={}, default limit={}",
            config.signals.cache_ttl_secs, config.signals.cache_capacity, config.signals.default_limit
        ),
    );

    let state = Arc::new(AppState::new(
        Arc::new(config),
        Arc::new(analyzer),
        Arc::new(InMemoryNoteRepository::new()),
    ));

    let shutdown = Arc::new(Notify::new());
    let ctrlc_shutdown = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        logger::info(LogTag::System, "Shutdown requested (Ctrl-C)");
        ctrlc_shutdown.notify_one();
    })
    .context("Failed to install Ctrl-C handler")?;

    webserver::start_server(state, shutdown)
        .await
        .map_err(anyhow::Error::msg)?;

    logger::info(LogTag::System, "drugsignals stopped");
    Ok(())
}
