//! Trading ecosystem logging - entry point
//!
//! 1. Loads `.env` (if present)
//! 2. Initializes console logging from `LOG_LEVEL` / `LOG_FORMAT`
//! 3. Bootstraps the process configuration once
//! 4. Runs a few agent threads sharing the one remote client

use std::thread;

use ecosystem_log::config::logging::{init_logging, LoggingConfig};
use ecosystem_log::config::{ConfigBootstrap, ProcessEnv};
use ecosystem_log::core::{LogFields, StructuredLogger};

const AGENT_IDS: &[&str] = &["agent-alpha", "agent-beta", "agent-gamma"];

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenvy::dotenv().ok();

    init_logging(&LoggingConfig::from_env(&ProcessEnv));

    let bootstrap = ConfigBootstrap::from_process_env();
    let config = bootstrap.bootstrap();

    let logger = StructuredLogger::create(&config, "ecosystem", None);
    logger.info(
        &format!(
            "Starting in {} mode on {} ({})",
            config.mode,
            config.exchange_name,
            if config.is_local_mode() { "local logging" } else { "remote logging" }
        ),
        LogFields::default(),
    );

    thread::scope(|s| {
        for (i, agent_id) in AGENT_IDS.iter().enumerate() {
            let config = &config;
            s.spawn(move || {
                let agent = StructuredLogger::create(config, "strategy_agent", Some(*agent_id));
                let strategy = format!("strategy-{}", i + 1);
                agent.info("Agent online", LogFields::new().strategy(strategy.as_str()));
                agent.warning(
                    "No market data yet, waiting",
                    LogFields::new().strategy(strategy.as_str()),
                );
            });
        }
    });

    logger.info("All agents reported, shutting down", LogFields::default());
    Ok(())
}
