use std::{path::PathBuf, time::Duration};

use {
    clap::{Parser, Subcommand},
    cowork_bridge::{Bridge, ExecuteOptions},
    cowork_config::CoworkConfig,
    cowork_routing::Router,
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "cowork", about = "Cowork — message router and agentic tool bridge")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Explicit config file (overrides discovery).
    #[arg(long, global = true, env = "COWORK_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how a message would be routed, without executing anything.
    Route {
        message: String,
    },
    /// Route a message: direct messages are reported as such, agent
    /// messages are executed through the bridge.
    Ask {
        message: String,
        /// User id the session is keyed on.
        #[arg(long, default_value = "cli")]
        user: String,
    },
    /// Execute a prompt through the bridge unconditionally.
    Exec {
        prompt: String,
        /// User id the session is keyed on.
        #[arg(long, default_value = "cli")]
        user: String,
        /// Start a fresh session even if one exists.
        #[arg(long)]
        new_session: bool,
        /// Restrict the tool to read-only capabilities.
        #[arg(long)]
        safe: bool,
        /// Timeout override in seconds.
        #[arg(long)]
        timeout: Option<u64>,
        /// Print the full result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Session management.
    Sessions {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// List active sessions. The table is in-memory, so this shows what
    /// the current process has accumulated.
    List,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a starter config file with every default spelled out.
    Init,
    /// Print the effective configuration.
    Show,
    /// Print the path the config is discovered at.
    Path,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    let config = cowork_config::discover_and_load(cli.config.as_deref())?;

    match cli.command {
        Commands::Route { message } => {
            let router = Router::new(&config.routing)?;
            let decision = router.route(&message);
            let target = if decision.to_agent { "agent" } else { "direct" };
            println!("{target}: {}", decision.reason);
            Ok(())
        },
        Commands::Ask { message, user } => {
            let router = Router::new(&config.routing)?;
            let decision = router.route(&message);
            if !decision.to_agent {
                println!(
                    "routed direct ({}); nothing to execute",
                    decision.reason
                );
                return Ok(());
            }
            info!(reason = %decision.reason, "routing to agent");
            run_exec(config, &message, &user, ExecuteOptions::default(), false, false).await
        },
        Commands::Exec {
            prompt,
            user,
            new_session,
            safe,
            timeout,
            json,
        } => {
            let options = ExecuteOptions {
                new_session,
                timeout: timeout.map(Duration::from_secs),
                ..Default::default()
            };
            run_exec(config, &prompt, &user, options, safe, json).await
        },
        Commands::Sessions { action } => match action {
            SessionAction::List => {
                let bridge = Bridge::new(config.bridge)?;
                let sessions = bridge.list_sessions().await;
                if sessions.is_empty() {
                    println!("No active sessions.");
                } else {
                    for (user, session) in &sessions {
                        println!(
                            "  {user} — {} ({} messages)",
                            session.session_id, session.message_count
                        );
                    }
                }
                Ok(())
            },
        },
        Commands::Config { action } => handle_config(action, cli.config.as_deref()),
    }
}

async fn run_exec(
    config: CoworkConfig,
    prompt: &str,
    user: &str,
    options: ExecuteOptions,
    safe: bool,
    json: bool,
) -> anyhow::Result<()> {
    let bridge = Bridge::new(config.bridge)?;

    let result = if safe {
        bridge.execute_safe(prompt, user, options).await
    } else {
        bridge.execute(prompt, user, options).await
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if result.success {
        println!("{}", result.output);
    } else if let Some(ref error) = result.error {
        eprintln!("error: {error}");
    }

    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}

fn handle_config(action: ConfigAction, explicit: Option<&std::path::Path>) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let path = match explicit {
                Some(p) => p.to_path_buf(),
                None => default_config_path()?,
            };
            cowork_config::save_starter_config(&path)?;
            println!("Wrote {}", path.display());
            Ok(())
        },
        ConfigAction::Show => {
            let config = cowork_config::discover_and_load(explicit)?;
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        },
        ConfigAction::Path => {
            let path = match explicit {
                Some(p) => p.to_path_buf(),
                None => default_config_path()?,
            };
            println!("{}", path.display());
            Ok(())
        },
    }
}

fn default_config_path() -> anyhow::Result<PathBuf> {
    cowork_config::config_dir()
        .map(|dir| dir.join("cowork.toml"))
        .ok_or_else(|| anyhow::anyhow!("could not determine a config directory"))
}
