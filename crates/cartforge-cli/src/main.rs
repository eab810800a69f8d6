//! CartForge CLI - generate game cartridges with a remote coding agent.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cartforge_client::http::DEFAULT_BASE_URL;
use cartforge_client::{
    ClientConfig, DirectTransport, JobClient, JobError, RelayTransport, Transport,
};
use cartforge_core::{cartridge, JobId, JobStatus};

/// CartForge CLI - remote cartridge generation
#[derive(Parser)]
#[command(name = "cartforge")]
#[command(about = "Generate game cartridges with a remote coding agent", long_about = None)]
struct Cli {
    #[command(flatten)]
    remote: RemoteArgs,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RemoteArgs {
    /// Relay endpoint; when set, every request goes through it
    #[arg(long, env = "CARTFORGE_RELAY_URL")]
    relay_url: Option<String>,

    /// Job service address, used when no relay is configured
    #[arg(long, env = "OPENHANDS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Session API key for direct requests
    #[arg(long, env = "OPENHANDS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Overall polling budget in seconds
    #[arg(long, default_value_t = 300)]
    timeout_secs: u64,

    /// Seconds between status polls
    #[arg(long, default_value_t = 3)]
    poll_interval_secs: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    request_timeout_secs: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a game and write its cartridge
    Generate {
        /// Task prompt for the agent
        #[arg(short, long)]
        prompt: String,

        /// Workspace path of the generated source
        #[arg(long, default_value = "game.lua")]
        path: String,

        /// Cartridge output file
        #[arg(short, long, default_value = "game.tic")]
        out: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a job's status
    Status {
        /// Job ID
        id: String,
    },

    /// Print a file from a job's workspace
    Fetch {
        /// Job ID
        id: String,

        /// Workspace path of the file
        #[arg(long, default_value = "game.lua")]
        path: String,
    },

    /// Encode a local source file into a cartridge
    Encode {
        /// Source file
        input: PathBuf,

        /// Cartridge output file
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Commands::Generate {
            prompt,
            path,
            out,
            json,
        } => {
            let client = build_client(&cli.remote)?;
            let success = generate(&client, &prompt, &path, &out, json).await?;
            if !success {
                std::process::exit(1);
            }
        }
        Commands::Status { id } => {
            let client = build_client(&cli.remote)?;
            status(&client, JobId::new(id)).await?;
        }
        Commands::Fetch { id, path } => {
            let client = build_client(&cli.remote)?;
            let code = client.get_artifact(&JobId::new(id), &path).await?;
            print!("{}", code);
        }
        Commands::Encode { input, output } => {
            encode_file(&input, &output)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn build_client(args: &RemoteArgs) -> Result<JobClient, JobError> {
    let config = ClientConfig::default()
        .with_timeout(Duration::from_secs(args.timeout_secs))
        .with_poll_interval(Duration::from_secs(args.poll_interval_secs))
        .with_request_timeout(Duration::from_secs(args.request_timeout_secs));

    let transport: Arc<dyn Transport> = match &args.relay_url {
        Some(relay_url) => {
            info!(relay = %relay_url, "Using relay transport");
            Arc::new(RelayTransport::new(relay_url, &config)?)
        }
        None => {
            let mut direct = DirectTransport::new(&args.base_url, &config)?;
            match &args.api_key {
                Some(key) => direct = direct.with_api_key(key.clone()),
                None => warn!("No API key configured, requests are unauthenticated"),
            }
            info!(base_url = %args.base_url, "Using direct transport");
            Arc::new(direct)
        }
    };

    Ok(JobClient::new(transport, config))
}

async fn generate(
    client: &JobClient,
    prompt: &str,
    path: &str,
    out: &Path,
    json: bool,
) -> Result<bool, Box<dyn std::error::Error>> {
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, abandoning run (the remote job keeps running)");
            interrupt.cancel();
        }
    });

    let progress = |elapsed_secs: u64, status: JobStatus| {
        info!(elapsed_secs, status = %status, "Waiting for agent");
    };
    let result = client
        .run_with_cancel(prompt, path, Some(&progress), &cancel)
        .await;

    if let Some(cart) = &result.cartridge {
        std::fs::write(out, cart)?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if result.success {
        let size = result.cartridge.as_ref().map_or(0, Vec::len);
        println!("Cartridge written:");
        if let Some(id) = &result.job_id {
            println!("  Job:      {}", id);
        }
        println!("  Output:   {} ({} bytes)", out.display(), size);
        println!("  Elapsed:  {}s", result.elapsed_secs);
    } else {
        println!(
            "Generation failed after {}s: {}",
            result.elapsed_secs,
            result.error.as_deref().unwrap_or("unknown error")
        );
    }

    Ok(result.success)
}

async fn status(client: &JobClient, id: JobId) -> Result<(), Box<dyn std::error::Error>> {
    let job = client.get_status(&id).await?;

    println!("  ID:       {}", job.id);
    println!("  Status:   {}", job.status);
    if let Some(title) = &job.title {
        println!("  Title:    {}", title);
    }
    if let Some(created) = job.created_at {
        println!("  Created:  {}", created.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(updated) = job.last_updated_at {
        println!("  Updated:  {}", updated.format("%Y-%m-%d %H:%M:%S"));
    }

    Ok(())
}

fn encode_file(input: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let code = std::fs::read_to_string(input)?;
    let cart = cartridge::encode(&code)?;
    std::fs::write(output, &cart)?;

    println!(
        "Encoded {} bytes of code into {} ({} bytes)",
        code.len(),
        output.display(),
        cart.len()
    );
    Ok(())
}
