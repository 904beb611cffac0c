//! Command-line entry point.

use anyhow::{bail, Result};
use aquaview::api::models::{RecordQuery, WaterQualityDraft, WaterQualityPatch};
use aquaview::api::{water_quality, Transport};
use aquaview::auth::Session;
use aquaview::console::{print_record_page, Console};
use aquaview::notify::TerminalNotifier;
use aquaview::router::guard::{authorize, GuardVerdict};
use aquaview::router::routes::{Route, RouteIntent};
use aquaview::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "aquaview", version, about = "Water-quality dashboard client and admin console")]
struct Cli {
    /// Path to config.toml (defaults to the platform config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open the interactive console.
    Console,
    /// Print the public dashboard overview (or one sampling method's).
    Dashboard {
        #[arg(long)]
        method: Option<String>,
    },
    /// Sign in with an admin account.
    Login {
        #[arg(long)]
        username: Option<String>,
    },
    /// Sign out and revoke the server-side session.
    Logout,
    /// Show the signed-in identity.
    Whoami,
    /// Manage water-quality records (admin).
    Records {
        #[command(subcommand)]
        action: RecordsAction,
    },
}

#[derive(Subcommand)]
enum RecordsAction {
    /// List records, newest first.
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        per_page: u32,
        #[arg(long)]
        river: Option<String>,
        #[arg(long)]
        level: Option<String>,
        #[arg(long)]
        code: Option<String>,
    },
    /// Show one record as JSON.
    Show { id: i64 },
    /// Create a record from a JSON object.
    Add {
        #[arg(long)]
        json: String,
    },
    /// Apply a JSON patch to a record.
    Update {
        id: i64,
        #[arg(long)]
        json: String,
    },
    /// Delete a record.
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("aquaview=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let (transport, session) = aquaview::bootstrap(&config, Arc::new(TerminalNotifier))?;

    // Bootstrap once at start; guarded navigation re-checks lazily.
    if let Err(err) = session.initialize().await {
        tracing::debug!("Startup identity hydration failed: {err}");
    }

    match cli.command {
        Command::Console => {
            let mut console = Console::new(transport, session);
            console.run().await
        }
        Command::Dashboard { method } => {
            let route = match method {
                Some(method) => Route::MethodDashboard(method),
                None => Route::Dashboard,
            };
            let mut console = Console::new(transport, session);
            console.navigate(route).await?;
            Ok(())
        }
        Command::Login { username } => login_command(&session, username).await,
        Command::Logout => {
            session.logout().await;
            println!("Signed out.");
            Ok(())
        }
        Command::Whoami => whoami_command(&session),
        Command::Records { action } => records_command(&transport, &session, action).await,
    }
}

/// Guard a one-shot command the same way the console guards a screen.
async fn ensure_route(session: &Session, route: Route) -> Result<()> {
    match authorize(&RouteIntent::new(route), session).await {
        GuardVerdict::Allow => Ok(()),
        GuardVerdict::Redirect(Route::Login) => {
            bail!("This requires an administrator session. Sign in first: aquaview login")
        }
        GuardVerdict::Redirect(other) => bail!("Redirected to {}", other.title()),
    }
}

async fn login_command(session: &Session, username: Option<String>) -> Result<()> {
    match authorize(&RouteIntent::new(Route::Login), session).await {
        GuardVerdict::Allow => {}
        GuardVerdict::Redirect(_) => {
            let name = session
                .identity()
                .map(|profile| profile.username)
                .unwrap_or_default();
            println!("Already signed in as {name}. Run `aquaview logout` first.");
            return Ok(());
        }
    }

    let username: String = match username {
        Some(name) => name,
        None => dialoguer::Input::new()
            .with_prompt("Username")
            .interact_text()?,
    };
    let password = dialoguer::Password::new()
        .with_prompt("Password")
        .interact()?;

    match session.login(&username, &password).await {
        Ok(()) => {
            println!("Signed in as {username}.");
            Ok(())
        }
        Err(err) => {
            let message = session.form_error().unwrap_or_else(|| err.to_string());
            bail!("{message}")
        }
    }
}

fn whoami_command(session: &Session) -> Result<()> {
    match session.identity() {
        Some(profile) if session.is_authenticated() => {
            println!(
                "{} <{}>{}",
                profile.username,
                profile.email,
                if profile.is_admin { " (administrator)" } else { "" }
            );
            Ok(())
        }
        _ => {
            println!("Not signed in.");
            Ok(())
        }
    }
}

async fn records_command(
    transport: &Arc<Transport>,
    session: &Arc<Session>,
    action: RecordsAction,
) -> Result<()> {
    ensure_route(session, Route::AdminRecords).await?;

    match action {
        RecordsAction::List {
            page,
            per_page,
            river,
            level,
            code,
        } => {
            let query = RecordQuery {
                page,
                per_page,
                river_name: river,
                comprehensive_quality_level: level,
                code,
                ..RecordQuery::default()
            };
            let listing = water_quality::list(transport, &query).await?;
            print_record_page(&listing);
        }
        RecordsAction::Show { id } => {
            let record = water_quality::get(transport, id).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        RecordsAction::Add { json } => {
            let draft: WaterQualityDraft = serde_json::from_str(&json)?;
            let record = water_quality::create(transport, &draft).await?;
            println!("Created record #{}.", record.id);
        }
        RecordsAction::Update { id, json } => {
            let patch: WaterQualityPatch = serde_json::from_str(&json)?;
            let record = water_quality::update(transport, id, &patch).await?;
            println!("Updated record #{}.", record.id);
        }
        RecordsAction::Delete { id } => {
            water_quality::delete(transport, id).await?;
            println!("Deleted record #{id}.");
        }
    }
    Ok(())
}
