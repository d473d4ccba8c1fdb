//! Sign in and print the authenticated user's profile.
//!
//! Expects `EMBERCLOUD_EMAIL`, `EMBERCLOUD_PASSWORD`,
//! `EMBERCLOUD_API_KEY`, and `EMBERCLOUD_APP_ID` in the environment
//! (or a `.env` file).

use std::env;

use embercloud::{Authenticator, CloudClient, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let email = env::var("EMBERCLOUD_EMAIL")?;
    let password = env::var("EMBERCLOUD_PASSWORD")?;
    let config = Config::new(env::var("EMBERCLOUD_API_KEY")?, env::var("EMBERCLOUD_APP_ID")?);

    let gateway = Authenticator::new(config).login(&email, &password).await?;
    let client = CloudClient::new(gateway);

    let user = client.get_user().await?;
    println!("uid:            {}", user.uid.as_deref().unwrap_or("-"));
    println!("display name:   {}", user.display_name.as_deref().unwrap_or("-"));
    println!("account:        {}", user.account_id.as_deref().unwrap_or("-"));
    println!("units:          {}", user.preferred_units.as_deref().unwrap_or("-"));
    if !user.extensions.is_empty() {
        println!("extra fields:   {}", serde_json::to_string(&user.extensions)?);
    }

    Ok(())
}
