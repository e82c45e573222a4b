use clap::{Parser, Subcommand};
use serverless_api::config::{Config, DeployerConfig, ServerConfig};
use serverless_api::error::{AppError, AppResult};
use serverless_api::runtime::{self, HandlerKind};
use serverless_api::server;
use std::env;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// serverless-api - Lambda handlers for the secrets API and redeploy-on-upload
#[derive(Parser, Debug)]
#[command(name = "serverless-api")]
#[command(version)]
#[command(about = "Lambda handlers for the secrets API and redeploy-on-upload", long_about = None)]
struct Cli {
    /// Defaults to the handler named by the `_HANDLER` environment variable
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the API handler in the Lambda runtime
    Api,

    /// Run the redeploy-on-upload handler in the Lambda runtime
    Deployer,

    /// Run one event from a JSON file and print the result
    Invoke {
        /// Handler to invoke
        #[arg(long, value_enum)]
        handler: HandlerKind,

        /// Path to the event JSON
        #[arg(long)]
        event: PathBuf,
    },

    /// Serve the API handler over local HTTP
    Serve {
        /// Host to bind to (overrides SERVER_HOST env var)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides SERVER_PORT env var)
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Commands {
    fn from_handler_env() -> AppResult<Self> {
        let handler = env::var("_HANDLER")
            .map_err(|_| AppError::MissingEnvVar("_HANDLER".to_string()))?;

        Ok(match handler.parse::<HandlerKind>()? {
            HandlerKind::Api => Commands::Api,
            HandlerKind::Deployer => Commands::Deployer,
        })
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    // CloudWatch stamps each line itself
    if env::var("AWS_LAMBDA_FUNCTION_NAME").is_ok() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    init_tracing();

    let command = match cli.command {
        Some(command) => command,
        None => Commands::from_handler_env()?,
    };

    match command {
        Commands::Api => {
            let gate = runtime::api_gate(Config::from_env()?).await;
            runtime::run_api(gate).await
        }
        Commands::Deployer => {
            let redeployer = runtime::redeployer(DeployerConfig::from_env()?).await;
            runtime::run_deployer(redeployer).await
        }
        Commands::Invoke { handler, event } => {
            let payload = runtime::read_event(&event)?;
            let output = match handler {
                HandlerKind::Api => {
                    let gate = runtime::api_gate(Config::from_env()?).await;
                    runtime::invoke_api(&gate, payload).await?
                }
                HandlerKind::Deployer => {
                    let redeployer = runtime::redeployer(DeployerConfig::from_env()?).await;
                    runtime::invoke_deployer(&redeployer, payload).await?
                }
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Commands::Serve { host, port } => {
            let mut server_config = ServerConfig::from_env()?;
            if let Some(host) = host {
                server_config.host = host;
            }
            if let Some(port) = port {
                server_config.port = port;
            }
            let addr = server_config.addr();

            let gate = runtime::api_gate(Config::from_env()?).await;
            server::run_server(gate, addr).await
        }
    }
}
