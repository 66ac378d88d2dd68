// ABOUTME: Login command implementation.
// ABOUTME: Authenticates against the configured target and prints the token.

use cfkit::config::Config;
use cfkit::error::Result;
use cfkit::output::Output;
use serde::Serialize;
use std::fmt;

use super::session;

#[derive(Serialize)]
struct LoginRow<'a> {
    instance: &'a str,
    target: &'a str,
    token: String,
}

impl fmt::Display for LoginRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token)
    }
}

pub async fn login(config: &Config, output: &Output) -> Result<()> {
    output.progress(&format!("Logging in to {} as {}", config.target, config.username));
    let session = session::connect(config).await?;

    output.row(&LoginRow {
        instance: session.instance.name(),
        target: session.instance.api_address(),
        token: session.instance.access_token(),
    });
    Ok(())
}
