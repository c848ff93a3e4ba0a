//! Credential resolution for tunesona-analyzer
//!
//! Provides multi-tier credential resolution with CLI → ENV → token store → TOML priority.

use std::sync::Arc;
use tracing::{info, warn};
use tunesona_common::config::TomlConfig;
use tunesona_common::credential::{StaticCredentialProvider, TokenStore};
use tunesona_common::{CredentialProvider, Error, Result};

/// Environment variable holding a user token
pub const USER_TOKEN_ENV_VAR: &str = "TUNESONA_USER_TOKEN";

/// Resolve the credential provider for one invocation
///
/// **Priority:** CLI `--token` → `TUNESONA_USER_TOKEN` → token store → TOML `[credential] user_token`
pub async fn resolve_credential_provider(
    cli_token: Option<&str>,
    toml_config: &TomlConfig,
) -> Result<Arc<dyn CredentialProvider>> {
    let mut sources = Vec::new();

    // Tier 1: command line
    let cli_token = cli_token.filter(|t| is_valid_token(t));
    if cli_token.is_some() {
        sources.push("command line");
    }

    // Tier 2: environment variable
    let env_token = std::env::var(USER_TOKEN_ENV_VAR)
        .ok()
        .filter(|t| is_valid_token(t));
    if env_token.is_some() {
        sources.push("environment");
    }

    // Tier 3: local token store. Only read when no higher tier supplied a
    // token, since load() deletes expired or corrupt files.
    let store = TokenStore::new(toml_config.token_store_path());
    let stored = if sources.is_empty() {
        store.load().await?.filter(|c| c.has_token())
    } else {
        None
    };
    if stored.is_some() || (!sources.is_empty() && store.path().is_file()) {
        sources.push("token store");
    }

    // Tier 4: TOML config
    let toml_token = toml_config
        .credential
        .user_token
        .as_deref()
        .filter(|t| is_valid_token(t));
    if toml_token.is_some() {
        sources.push("TOML");
    }

    if sources.len() > 1 {
        warn!(
            "User token found in multiple sources: {}. Using {} (highest priority).",
            sources.join(", "),
            sources[0]
        );
    }

    if let Some(token) = cli_token {
        info!("User token taken from command line");
        return Ok(Arc::new(StaticCredentialProvider::new(token)));
    }

    if let Some(token) = env_token {
        info!("User token loaded from environment variable");
        return Ok(Arc::new(StaticCredentialProvider::new(token)));
    }

    if stored.is_some() {
        info!(path = %store.path().display(), "User token loaded from token store");
        return Ok(Arc::new(store));
    }

    if let Some(token) = toml_token {
        info!("User token loaded from TOML config");
        return Ok(Arc::new(StaticCredentialProvider::new(token)));
    }

    Err(Error::Credential(format!(
        "User token not configured. Provide one of:\n\
         1. Command line: --token <TOKEN>\n\
         2. Environment: {}=<TOKEN>\n\
         3. Token store: tunesona-analyzer token store <TOKEN>\n\
         4. TOML config: [credential] user_token = \"<TOKEN>\"",
        USER_TOKEN_ENV_VAR
    )))
}

/// Non-empty, non-whitespace
pub fn is_valid_token(token: &str) -> bool {
    !token.trim().is_empty()
}
