use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use modelmatch_api::RestApi;
use modelmatch_engine::{read_records, EngineConfig, MatchEngine, NarrativeConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Cross-brand model matching over catalog specification records
#[derive(Parser, Debug)]
#[command(name = "modelmatch")]
#[command(about = "Find the closest competing-brand models", long_about = None)]
struct Cli {
    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the REST API
    Serve {
        /// Dataset loaded at startup (JSON array or JSON lines, optionally .gz)
        #[arg(short, long)]
        dataset: Option<PathBuf>,

        /// HTTP API port
        #[arg(long, default_value_t = 8080)]
        http_port: u16,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Print recommendations for one model as JSON
    Recommend {
        #[arg(short, long)]
        dataset: PathBuf,

        /// Model identifier to match against
        #[arg(short, long)]
        model: String,

        #[arg(long)]
        top_n: Option<usize>,

        /// Also request a narrative explanation
        #[arg(long)]
        explain: bool,

        #[command(flatten)]
        engine: EngineArgs,
    },
}

#[derive(Args, Debug)]
struct EngineArgs {
    /// Nearest neighbors retrieved before brand filtering
    #[arg(long, default_value_t = modelmatch_engine::DEFAULT_OVER_FETCH)]
    over_fetch: usize,

    /// Matches returned when a request does not say
    #[arg(long, default_value_t = modelmatch_engine::DEFAULT_TOP_N)]
    default_top_n: usize,

    /// Chat-completions endpoint for narratives, e.g. https://my-resource.openai.azure.com
    #[arg(long, requires = "narrative_deployment")]
    narrative_endpoint: Option<String>,

    #[arg(long, requires = "narrative_endpoint")]
    narrative_deployment: Option<String>,

    #[arg(long, default_value = "2024-02-01")]
    narrative_api_version: String,

    #[arg(long, env = "MODELMATCH_API_KEY", hide_env_values = true, default_value = "")]
    narrative_api_key: String,

    #[arg(long, default_value_t = 20)]
    narrative_timeout_secs: u64,
}

impl EngineArgs {
    fn config(&self) -> EngineConfig {
        let narrative = match (&self.narrative_endpoint, &self.narrative_deployment) {
            (Some(endpoint), Some(deployment)) => Some(NarrativeConfig {
                endpoint: endpoint.clone(),
                deployment: deployment.clone(),
                api_version: self.narrative_api_version.clone(),
                api_key: self.narrative_api_key.clone(),
                temperature: 0.0,
                timeout_secs: self.narrative_timeout_secs,
            }),
            _ => None,
        };

        EngineConfig {
            over_fetch: self.over_fetch,
            default_top_n: self.default_top_n,
            narrative,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Command::Serve {
            dataset,
            http_port,
            engine,
        } => serve(dataset, http_port, engine.config()).await,
        Command::Recommend {
            dataset,
            model,
            top_n,
            explain,
            engine,
        } => recommend(dataset, &model, top_n, explain, engine.config()).await,
    }
}

async fn serve(dataset: Option<PathBuf>, http_port: u16, config: EngineConfig) -> anyhow::Result<()> {
    info!("Starting ModelMatch v{}", env!("CARGO_PKG_VERSION"));
    info!("HTTP API port: {}", http_port);

    let engine = Arc::new(MatchEngine::new(config)?);
    match dataset {
        Some(path) => {
            let records = read_records(&path)?;
            engine
                .load(&records)
                .with_context(|| format!("Failed to load {}", path.display()))?;
        }
        None => info!("No dataset given; waiting for PUT /snapshot"),
    }

    let engine_http = engine.clone();
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(engine_http, http_port).await {
                tracing::error!("HTTP server error: {}", e);
            }
        })
    });

    info!("HTTP API: http://localhost:{}/", http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}

async fn recommend(
    dataset: PathBuf,
    model: &str,
    top_n: Option<usize>,
    explain: bool,
    config: EngineConfig,
) -> anyhow::Result<()> {
    let top_n = top_n.unwrap_or(config.default_top_n);
    let engine = MatchEngine::new(config)?;

    let records = read_records(&dataset)?;
    engine
        .load(&records)
        .with_context(|| format!("Failed to load {}", dataset.display()))?;

    let output = if explain {
        serde_json::to_string_pretty(&engine.explain(model, top_n).await?)?
    } else {
        serde_json::to_string_pretty(&engine.recommend(model, top_n)?)?
    };
    println!("{}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(["modelmatch", "recommend", "--dataset", "d.json", "--model", "M"].iter().chain(args))
    }

    #[test]
    fn test_narrative_flags_require_each_other() {
        assert!(parse(&["--narrative-endpoint", "https://example.com"]).is_err());
        assert!(parse(&["--narrative-deployment", "gpt-4o"]).is_err());
    }

    #[test]
    fn test_narrative_config_from_flags() {
        let cli = parse(&["--narrative-endpoint", "https://example.com", "--narrative-deployment", "gpt-4o"]).unwrap();
        let Command::Recommend { engine, .. } = cli.command else {
            panic!("expected recommend");
        };
        let narrative = engine.config().narrative.unwrap();
        assert_eq!(narrative.deployment, "gpt-4o");
        assert_eq!(narrative.timeout_secs, 20);

        let cli = parse(&[]).unwrap();
        let Command::Recommend { engine, .. } = cli.command else {
            panic!("expected recommend");
        };
        assert!(engine.config().narrative.is_none());
        assert_eq!(engine.config().over_fetch, 30);
    }
}
