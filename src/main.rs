// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use marketplace_session::{
    api::{ApiError, HttpAuthApi},
    auth::{AuthError, AuthService, Role},
    config::{ClientConfig, ConfigError},
    logging,
    models::{Credentials, Registration},
    routing::{Decision, NavigationError, Navigator, RouteTable},
    session::Session,
    state::SessionContext,
    storage::{RedbStore, StorageError},
};

#[derive(Parser)]
#[command(
    name = "marketplace-session",
    about = "Inspect and drive the marketplace client session",
    version
)]
struct Cli {
    /// API base URL (overrides MARKETPLACE_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Session database (overrides SESSION_DB_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    session_db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Show the current session
    Status,

    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "MARKETPLACE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account and log in
    Register {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        #[arg(long, env = "MARKETPLACE_PASSWORD", hide_env_values = true)]
        password: String,

        /// `buyer` or `seller`; the server default applies when omitted
        #[arg(long, value_parser = parse_role)]
        role: Option<Role>,
    },

    /// Forget the session
    Logout,

    /// Re-validate the session against the server
    Refresh,

    /// Show where navigating to each path ends up
    Navigate {
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("session storage: {0}")]
    Storage(#[from] StorageError),

    #[error("API client: {0}")]
    Api(#[from] ApiError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

fn parse_role(raw: &str) -> Result<Role, String> {
    Role::from_str(raw).ok_or_else(|| format!("unknown role {raw:?} (expected buyer or seller)"))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    if let Err(e) = logging::init(config.log_format) {
        eprintln!("warning: {e}");
    }

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, mut config: ClientConfig) -> Result<(), CliError> {
    if let Some(path) = cli.session_db {
        config.session_db_path = path;
    }
    let api_url = cli
        .api_url
        .unwrap_or_else(|| config.api_url.as_str().to_string());

    let storage = RedbStore::open(&config.session_db_path)?;
    let api = HttpAuthApi::new(&api_url, config.http_timeout)?;
    let auth = AuthService::new(api, SessionContext::new(storage))
        .with_bootstrap_timeout(config.bootstrap_timeout);

    let ready = auth.bootstrap().await;
    tracing::info!(
        api_url = %api_url,
        db = %config.session_db_path.display(),
        "Client ready"
    );

    match cli.command {
        Command::Status => print_session(&auth.session().snapshot().await),
        Command::Login { email, password } => {
            auth.login(&Credentials::new(email, password)).await?;
            print_session(&auth.session().snapshot().await);
        }
        Command::Register {
            username,
            email,
            password,
            role,
        } => {
            auth.register(&Registration {
                username,
                email,
                password,
                role,
            })
            .await?;
            print_session(&auth.session().snapshot().await);
        }
        Command::Logout => {
            auth.logout().await;
            println!("logged out");
        }
        Command::Refresh => {
            auth.fetch_user().await?;
            print_session(&auth.session().snapshot().await);
        }
        Command::Navigate { paths } => {
            let mut nav = Navigator::new(
                &ready,
                auth.session().clone(),
                RouteTable::marketplace(),
                config.paths,
            );
            for path in paths {
                match nav.navigate(&path).await {
                    Decision::Permit => println!("{path}: permit"),
                    Decision::RedirectTo(next) => {
                        let shown = nav.resolve(&next).await?;
                        println!("{path}: redirect to {next} (lands on {shown})");
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_session(session: &Session) {
    let (Some(subject_id), Some(role)) = (&session.subject_id, session.role) else {
        println!("anonymous");
        return;
    };
    match &session.profile {
        Some(user) => println!("{} <{}> id={subject_id} role={role}", user.username, user.email),
        None => println!("id={subject_id} role={role} (profile not loaded)"),
    }
}
