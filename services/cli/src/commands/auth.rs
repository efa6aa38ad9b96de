use anyhow::{Context, Result};
use auth::{
    AuthService,
    models::{ProfileUpdate, RegistrationForm},
    validation::score_password,
};
use common::{settings::Settings, storage::open_storage};
use serde_json::{Map, Value};

async fn service(settings: &Settings) -> Result<AuthService> {
    let storage = open_storage(settings)
        .await
        .context("Failed to open session storage")?;
    Ok(AuthService::from_settings(settings, storage))
}

pub async fn login(settings: &Settings, email: &str, password: &str) -> Result<()> {
    let session = service(settings).await?.login(email, password).await?;
    println!("Logged in as {} <{}>", session.user.username, session.user.email);
    Ok(())
}

pub async fn register(
    settings: &Settings,
    username: String,
    email: String,
    password: String,
    confirm_password: String,
) -> Result<()> {
    let form = RegistrationForm {
        username,
        email,
        password,
        confirm_password,
    };

    let session = service(settings)
        .await?
        .register_with_confirmation(&form)
        .await?;
    println!(
        "Account created for {} <{}>",
        session.user.username, session.user.email
    );
    Ok(())
}

pub async fn logout(settings: &Settings) -> Result<()> {
    service(settings).await?.logout().await;
    println!("Logged out");
    Ok(())
}

pub async fn status(settings: &Settings) -> Result<()> {
    let service = service(settings).await?;

    if !service.is_authenticated().await {
        println!("Not logged in");
        return Ok(());
    }

    match service.current_user().await? {
        Some(user) => println!("Logged in as {} <{}> (id {})", user.username, user.email, user.id),
        None => println!("Token stored, no cached profile"),
    }
    Ok(())
}

pub async fn validate(settings: &Settings) -> Result<()> {
    if service(settings).await?.validate_token().await {
        println!("Session is valid");
    } else {
        println!("Session is not valid");
    }
    Ok(())
}

pub async fn whoami(settings: &Settings) -> Result<()> {
    match service(settings).await?.refresh_user_data().await {
        Some(user) => println!("{}", serde_json::to_string_pretty(&user)?),
        None => println!("Not logged in"),
    }
    Ok(())
}

pub async fn update_profile(
    settings: &Settings,
    username: Option<String>,
    email: Option<String>,
    fields: &[String],
) -> Result<()> {
    let update = ProfileUpdate {
        username,
        email,
        extra: parse_fields(fields)?,
    };

    let user = service(settings).await?.update_profile(&update).await?;
    println!("{}", serde_json::to_string_pretty(&user)?);
    Ok(())
}

pub async fn change_password(settings: &Settings, current: &str, new: &str) -> Result<()> {
    let message = service(settings)
        .await?
        .change_password(current, new)
        .await?;
    println!("{}", message);
    Ok(())
}

pub async fn request_reset(settings: &Settings, email: &str) -> Result<()> {
    let message = service(settings)
        .await?
        .request_password_reset(email)
        .await?;
    println!("{}", message);
    Ok(())
}

pub async fn reset_password(settings: &Settings, token: &str, new: &str) -> Result<()> {
    let message = service(settings)
        .await?
        .reset_password(token, new)
        .await?;
    println!("{}", message);
    Ok(())
}

pub fn password_strength(password: &str) {
    let strength = score_password(password);
    println!(
        "{} ({}/5, {}%)",
        strength.label(),
        strength.score(),
        strength.percentage()
    );
    if !strength.is_valid() {
        println!("Does not meet the minimum requirements");
    }
}

fn parse_fields(fields: &[String]) -> Result<Map<String, Value>> {
    let mut map = Map::new();
    for field in fields {
        let (key, raw) = field
            .split_once('=')
            .with_context(|| format!("Expected KEY=VALUE, got '{}'", field))?;
        let value =
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        map.insert(key.trim().to_string(), value);
    }
    Ok(map)
}
