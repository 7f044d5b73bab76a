//! websearch-tool CLI entry point.
//!
//! Runs the search proxy and provides tooling around the extension settings.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use websearch_tool::cli::{
    describe_settings, expand_path, summarize_results, verdict_marker, DEFAULT_CONFIG_PATH,
    DEFAULT_PROXY_URL, DEFAULT_SETTINGS_PATH,
};
use websearch_tool::interceptor::format_results;
use websearch_tool::proxy::{ProxyConfig, SearchProxy, SearchProxyServer, PLUGIN_INFO};
use websearch_tool::search::GoogleSearchBackend;
use websearch_tool::settings::{test_trigger, SettingsStore, EXTENSION_NAME};
use websearch_tool::{ProxyClient, SearchService};

/// Web search for chat generation.
#[derive(Parser)]
#[command(name = "websearch-tool")]
#[command(about = "Search proxy and trigger tooling for search-augmented chat generation.")]
#[command(version)]
struct Cli {
    /// Proxy config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Extension settings file path
    #[arg(short, long, default_value = DEFAULT_SETTINGS_PATH)]
    settings: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the search proxy
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Google API key
        #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Google programmable search engine id
        #[arg(long, env = "GOOGLE_CSE_ID")]
        engine_id: Option<String>,
    },

    /// Query a running proxy and print results formatted with the current settings
    Search {
        /// Search query
        query: String,

        /// Proxy base URL
        #[arg(long, default_value = DEFAULT_PROXY_URL)]
        proxy: String,
    },

    /// Test a trigger pattern against sample model output
    TestTrigger {
        /// Sample text to scan
        sample: String,

        /// Pattern to test (defaults to the configured one)
        #[arg(long)]
        pattern: Option<String>,
    },

    /// Extension settings management
    Settings {
        #[command(subcommand)]
        action: SettingsCommands,
    },

    /// Proxy configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Show current settings
    Show,

    /// Set a settings value
    Set {
        /// Settings key (manual_enabled, auto_enabled, triggerRegex, resultCount, wrapperTemplate, itemTemplate)
        key: String,
        /// New value
        value: String,
    },

    /// Restore defaults
    Reset,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current config
    Show,

    /// Validate config
    Validate,

    /// Write a default config file
    Init,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = expand_path(&cli.config);
    let settings_path = expand_path(&cli.settings);

    // Initialize logging
    let log_level = if cli.verbose {
        "debug".to_string()
    } else {
        ProxyConfig::load_or_default(&config_path)
            .map(|c| c.logging.level)
            .unwrap_or_else(|_| "info".to_string())
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve {
            host,
            port,
            api_key,
            engine_id,
        } => {
            let mut config = ProxyConfig::load_or_default(&config_path)?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(api_key) = api_key {
                config.google.api_key = api_key;
            }
            if let Some(engine_id) = engine_id {
                config.google.engine_id = engine_id;
            }
            config.validate()?;

            let backend = GoogleSearchBackend::new(&config.google.api_key, &config.google.engine_id)
                .with_endpoint(&config.google.endpoint);
            let server = SearchProxyServer::new(SearchProxy::new(Arc::new(backend)), config.server.clone());

            tracing::info!("Initializing {} plugin ({})", PLUGIN_INFO.name, PLUGIN_INFO.id);
            server.start().await?;
        }

        Commands::Search { query, proxy } => {
            let store = SettingsStore::open(&settings_path, EXTENSION_NAME)?;
            let settings = store.settings().await;

            let client = ProxyClient::new(&proxy);
            let mut results = client
                .search(&query)
                .await
                .with_context(|| format!("Web search via {} failed", client.search_url()))?;
            results.truncate(settings.result_count);

            tracing::info!("Search for '{}' returned {}", query, summarize_results(&results));
            println!("{}", format_results(&settings, &query, &results));
        }

        Commands::TestTrigger { sample, pattern } => {
            let pattern = match pattern {
                Some(pattern) => pattern,
                None => SettingsStore::open(&settings_path, EXTENSION_NAME)?
                    .settings()
                    .await
                    .trigger_regex,
            };

            let verdict = test_trigger(&pattern, &sample);
            println!("{} {}", verdict_marker(&verdict), verdict);
            if !verdict.is_success() {
                std::process::exit(1);
            }
        }

        Commands::Settings { action } => {
            let store = SettingsStore::open(&settings_path, EXTENSION_NAME)?;
            match action {
                SettingsCommands::Show => {
                    println!("Settings file: {}", settings_path.display());
                    println!();
                    println!("{}", describe_settings(&store.settings().await));
                }
                SettingsCommands::Set { key, value } => {
                    store.update(|s| s.set_by_key(&key, &value)).await?;
                    store.flush().await?;
                    println!("Set {} = {}", key, value);
                }
                SettingsCommands::Reset => {
                    store.reset().await?;
                    store.flush().await?;
                    println!("Settings restored to defaults.");
                }
            }
        }

        Commands::Config { action } => match action {
            ConfigCommands::Show => {
                let config = ProxyConfig::load_or_default(&config_path)?;
                println!("Config path: {}", config_path.display());
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
            ConfigCommands::Validate => {
                let config = ProxyConfig::load(&config_path)?;
                config.validate()?;
                println!("✓ Configuration is valid ({})", config.server_addr());
            }
            ConfigCommands::Init => {
                if config_path.exists() {
                    anyhow::bail!("Config already exists at {}", config_path.display());
                }
                ProxyConfig::new().save(&config_path)?;
                println!("Created {}", config_path.display());
                println!();
                println!("Next steps:");
                println!("  1. Set google.api_key and google.engine_id in the config");
                println!("  2. Run: websearch-tool serve");
            }
        },
    }

    Ok(())
}
