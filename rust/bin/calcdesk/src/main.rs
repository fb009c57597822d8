//! `calcdesk` — account and profile client for the calculator service.
//!
//! Manages server contexts, sign-in, and the profile screen from a terminal.

mod commands;
mod config;
mod render;

use std::io::Write;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// calcdesk CLI tool.
#[derive(Parser, Debug)]
#[command(name = "calcdesk", about = "Calculator account and profile client")]
struct Cli {
    /// Path to client config file (default: ~/.calcdesk/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage server contexts.
    #[command(name = "context")]
    Context {
        #[command(subcommand)]
        action: ContextAction,
    },

    /// Switch the current context.
    #[command(name = "use")]
    Use {
        #[command(subcommand)]
        what: UseWhat,
    },

    /// Login to the current context's server.
    Login {
        #[arg(long)]
        email: Option<String>,
        /// Password (not recommended, use the interactive prompt).
        #[arg(long)]
        password: Option<String>,
    },

    /// Logout: clear token from current context.
    Logout,

    /// Show or edit your profile.
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Change your password. Signs you out on success.
    Passwd,

    /// Rate a candidate password.
    Strength { password: String },

    /// Show version.
    Version,
}

#[derive(Subcommand, Debug)]
enum ContextAction {
    /// Create a new context.
    Create {
        name: String,
        /// Server URL (e.g. http://localhost:8000).
        #[arg(long)]
        server: String,
    },
    /// List all contexts.
    List,
    /// Set properties on a context.
    Set {
        name: String,
        #[arg(long)]
        server: Option<String>,
    },
    /// Delete a context.
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
enum UseWhat {
    /// Switch to a context.
    Context { name: String },
}

#[derive(Subcommand, Debug)]
enum ProfileAction {
    /// Show profile details and calculation count.
    Show,
    /// Update email and bio.
    Update {
        #[arg(long)]
        email: String,
        /// New bio. Pass an empty string to clear it.
        #[arg(long)]
        bio: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .map(std::path::PathBuf::from)
        .unwrap_or_else(config::ClientConfig::default_path);

    match cli.command {
        Commands::Context { action } => match action {
            ContextAction::Create { name, server } => {
                commands::context::create(&name, &server, &config_path)?;
            }
            ContextAction::List => {
                commands::context::list(&config_path)?;
            }
            ContextAction::Set { name, server } => {
                commands::context::set(&name, server.as_deref(), &config_path)?;
            }
            ContextAction::Delete { name } => {
                commands::context::delete(&name, &config_path)?;
            }
        },

        Commands::Use { what } => match what {
            UseWhat::Context { name } => {
                commands::context::use_context(&name, &config_path)?;
            }
        },

        Commands::Login { email, password } => {
            let email = match email {
                Some(e) => e,
                None => prompt("Email: ")?,
            };
            let password = match password {
                Some(p) => p,
                None => rpassword::prompt_password("Password: ")?,
            };
            commands::login::login(&email, &password, &config_path).await?;
        }

        Commands::Logout => {
            commands::login::logout(&config_path)?;
        }

        Commands::Profile { action } => match action {
            ProfileAction::Show => {
                commands::profile::show(&config_path).await?;
            }
            ProfileAction::Update { email, bio } => {
                commands::profile::update(&email, bio.as_deref(), &config_path).await?;
            }
        },

        Commands::Passwd => {
            commands::password::passwd(&config_path).await?;
        }

        Commands::Strength { password } => {
            commands::password::check_strength(&password)?;
        }

        Commands::Version => {
            println!("calcdesk cli v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn prompt(label: &str) -> anyhow::Result<String> {
    eprint!("{}", label);
    std::io::stderr().flush()?;
    let mut s = String::new();
    std::io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}
