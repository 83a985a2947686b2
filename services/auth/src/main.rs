use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use hms_auth::models::{ProfileUpdate, Role};
use hms_auth::notify::TracingNotifier;
use hms_auth::{AuthConfig, SessionManager};

/// Manage the hospital dashboard session from the command line
#[derive(Parser)]
#[command(name = "hms-auth", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the persisted session
    Status,
    /// Log in and persist the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// patient, doctor or admin
        #[arg(long)]
        role: Role,
    },
    /// Log out and remove the persisted session
    Logout,
    /// Update the profile of the current session
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        avatar: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();

    let config = AuthConfig::from_env()?;
    let store = config.open_store().await?;

    let manager = SessionManager::new(store, Arc::new(TracingNotifier))
        .with_timings(config.timings());
    manager.initialize().await;

    match cli.command {
        Command::Status => {}
        Command::Login {
            email,
            password,
            role,
        } => {
            if !manager.login(&email, &password, role).await {
                anyhow::bail!("Login rejected for {}", email);
            }
        }
        Command::Logout => manager.logout().await,
        Command::Profile {
            name,
            email,
            avatar,
        } => {
            let update = ProfileUpdate {
                name,
                email,
                avatar,
            };
            if update.is_empty() {
                anyhow::bail!("Nothing to update, pass --name, --email or --avatar");
            }
            if !manager.update_profile(update).await {
                anyhow::bail!("Not signed in");
            }
        }
    }

    match manager.current_session() {
        Some(session) => println!("{}", serde_json::to_string_pretty(&session)?),
        None => println!("not signed in"),
    }

    info!("Session state: {:?}", manager.phase());
    manager.dispose();

    Ok(())
}
