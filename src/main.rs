use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use war_recommender::config::AppConfig;
use war_recommender::fetch::{HttpWarStatsClient, WarStatsApi};
use war_recommender::parse_duration;
use war_recommender::query::{QueryController, QueryError};
use war_recommender::render::OutputFormat;

#[derive(Parser)]
#[command(name = "war-recommender")]
#[command(about = "Clan war attack recommendations from member war statistics")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./war-recommender.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and rank members of a clan
    Recommend {
        /// Clan tag, with or without the leading '#'
        tag: String,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Ask the service to pull the latest war, then fetch
    Update {
        /// Clan tag, with or without the leading '#'
        tag: String,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Fetch the clan named by a shareable link
    Open {
        /// Link carrying a clanTag query parameter
        link: String,

        #[command(flatten)]
        display: DisplayArgs,
    },
}

#[derive(Args)]
struct DisplayArgs {
    /// Column to sort by (e.g. recommendationScore, townHall, playerName)
    #[arg(long)]
    sort: Option<String>,

    /// Sort direction (asc, desc)
    #[arg(long)]
    order: Option<String>,

    /// Output format (table, json)
    #[arg(long)]
    format: Option<String>,

    /// Request timeout (e.g., "30s", "2m", "500ms")
    #[arg(long)]
    timeout: Option<String>,

    /// API endpoint override
    #[arg(long)]
    endpoint: Option<String>,
}

impl DisplayArgs {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(sort) = &self.sort {
            config.display.sort_key = sort.clone();
        }
        if let Some(order) = &self.order {
            config.display.sort_direction = order.clone();
        }
        if let Some(format) = &self.format {
            config.display.format = format.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.api.endpoint = endpoint.clone();
        }
    }
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries rendered results only
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(Path::new(&cli.config))
        .with_context(|| format!("Failed to load config from {}", cli.config))?;

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.log_level.clone());
    init_tracing(&level, cli.json_logs);

    tracing::info!("Starting war-recommender v{}", env!("CARGO_PKG_VERSION"));

    let display = match &cli.command {
        Commands::Recommend { display, .. }
        | Commands::Update { display, .. }
        | Commands::Open { display, .. } => display,
    };
    display.apply(&mut config);
    config.validate()?;

    let mut client_config = config.api.client_config();
    if let Some(timeout) = &display.timeout {
        client_config.timeout = parse_duration(timeout)
            .ok_or_else(|| anyhow!("Invalid --timeout '{}' (expected e.g. 30s, 2m)", timeout))?;
    }

    let api: Arc<dyn WarStatsApi> = Arc::new(HttpWarStatsClient::new(client_config)?);
    let mut controller = QueryController::new(api, config.display.sort_state()?);
    if let Some(hint) = &config.display.error_hint {
        controller = controller.with_error_hint(hint.clone());
    }

    let outcome = match &cli.command {
        Commands::Recommend { tag, .. } => controller.fetch(tag).await.map(|_| ()),
        Commands::Update { tag, .. } => controller.update_latest(tag).await.map(|_| ()),
        Commands::Open { link, .. } => {
            let url = Url::parse(link).with_context(|| format!("Invalid link '{}'", link))?;
            match controller.open_link(&url).await {
                Ok(Some(_)) => Ok(()),
                Ok(None) => return Err(anyhow!("Link has no clanTag parameter: {}", link)),
                Err(e) => Err(e),
            }
        }
    };

    if let Some(info) = controller.info() {
        eprintln!("{}", info);
    }

    if let Err(e) = outcome {
        return Err(user_error(&controller, e));
    }

    let format = config.display.output_format()?;
    // Presenters terminate their own output.
    let output = format.presenter().render(&controller.view())?;
    print!("{}", output);

    if format == OutputFormat::Table {
        if let Some(link) = config
            .display
            .link_base_url()?
            .and_then(|base| controller.shareable_link(&base))
        {
            println!("\nShare: {}", link);
        }
    }

    Ok(())
}

/// The controller's message already carries the configured hint.
fn user_error(controller: &QueryController, error: QueryError) -> anyhow::Error {
    match controller.error() {
        Some(message) => anyhow!("{}", message),
        None => error.into(),
    }
}
