//! Prints the bcrypt hash of a secret read from stdin.
//!
//! Used to provision `users.password_hash`:
//!
//! ```text
//! printf '%s' 'hunter2' | hash-secret
//! ```

use std::io::{self, Read};

use anyhow::{bail, Context};

use gatekeeper_server::auth::password::hash_secret;
use gatekeeper_server::config::AppConfig;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env().context("Invalid configuration")?;

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read secret from stdin")?;
    let secret = input.trim_end_matches(&['\r', '\n'][..]);
    if secret.is_empty() {
        bail!("secret must not be empty");
    }

    let hash = hash_secret(secret, config.bcrypt_cost).context("Failed to hash secret")?;
    println!("{}", hash);

    Ok(())
}
