use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod commands;

use common::settings::Settings;

#[derive(Parser)]
#[command(name = "farmsight")]
#[command(about = "FarmSight - farm account and crop disease assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and store the session
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Defaults to the password when omitted
        #[arg(long)]
        confirm_password: Option<String>,
    },
    /// Log out; the local session is always cleared
    Logout,
    /// Show whether a session is stored and for whom
    Status,
    /// Ask the backend whether the stored token is still valid
    Validate,
    /// Re-fetch the profile; clears the session if that fails
    Whoami,
    /// Update profile fields
    Profile {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Additional field as key=value (value parsed as JSON when possible)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },
    /// Change the password of the logged-in user
    ChangePassword {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
    },
    /// Request a password reset email
    RequestReset {
        #[arg(long)]
        email: String,
    },
    /// Complete a password reset
    ResetPassword {
        #[arg(long)]
        token: String,
        #[arg(long)]
        new: String,
    },
    /// Score a password locally
    PasswordStrength { password: String },
    /// List diseases matching a crop and/or symptoms
    Diagnose {
        #[arg(long)]
        crop: Option<String>,
        /// Symptom id or name; repeatable
        #[arg(long = "symptom")]
        symptoms: Vec<String>,
    },
    /// Browse the disease catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List crop types
    Crops,
    /// List symptoms grouped by category
    Symptoms,
    /// Show one disease
    Disease { id: u32 },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();
    let settings = Settings::load()?;
    info!("Using API at {}", settings.api_url);

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&settings, &email, &password).await?
        }
        Commands::Register {
            username,
            email,
            password,
            confirm_password,
        } => {
            let confirm_password = confirm_password.unwrap_or_else(|| password.clone());
            commands::auth::register(&settings, username, email, password, confirm_password)
                .await?
        }
        Commands::Logout => commands::auth::logout(&settings).await?,
        Commands::Status => commands::auth::status(&settings).await?,
        Commands::Validate => commands::auth::validate(&settings).await?,
        Commands::Whoami => commands::auth::whoami(&settings).await?,
        Commands::Profile {
            username,
            email,
            fields,
        } => commands::auth::update_profile(&settings, username, email, &fields).await?,
        Commands::ChangePassword { current, new } => {
            commands::auth::change_password(&settings, &current, &new).await?
        }
        Commands::RequestReset { email } => {
            commands::auth::request_reset(&settings, &email).await?
        }
        Commands::ResetPassword { token, new } => {
            commands::auth::reset_password(&settings, &token, &new).await?
        }
        Commands::PasswordStrength { password } => commands::auth::password_strength(&password),
        Commands::Diagnose { crop, symptoms } => {
            commands::diagnose::diagnose(&settings, crop, &symptoms)?
        }
        Commands::Catalog { action } => match action {
            CatalogAction::Crops => commands::diagnose::crops(&settings)?,
            CatalogAction::Symptoms => commands::diagnose::symptoms(&settings)?,
            CatalogAction::Disease { id } => commands::diagnose::disease(&settings, id)?,
        },
    }

    Ok(())
}
