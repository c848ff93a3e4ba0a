//! Credential capability
//!
//! The analysis pipeline never owns token lifecycle. It asks a
//! [`CredentialProvider`] for a credential once per invocation and uses it for
//! every request of that invocation.
//!
//! # Providers
//! - [`StaticCredentialProvider`] - a token supplied up front (CLI, environment)
//! - [`TokenStore`] - a JSON file holding the user token and its expiry

use crate::time::{Clock, SystemClock};
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default buffer before expiry at which a token counts as expiring
pub const DEFAULT_EXPIRY_BUFFER_MINUTES: i64 = 5;

/// Bearer credential for music API requests
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Bearer token value
    pub token: String,
    /// Expiry instant, if known
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    /// Credential without a known expiry
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expires_at: None,
        }
    }

    /// Credential expiring `expires_in_secs` after `now`
    pub fn expiring_in(token: impl Into<String>, now: DateTime<Utc>, expires_in_secs: i64) -> Self {
        Self {
            token: token.into(),
            expires_at: Some(now + Duration::seconds(expires_in_secs)),
        }
    }

    /// False for an empty or whitespace-only token
    pub fn has_token(&self) -> bool {
        !self.token.trim().is_empty()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }

    /// True when the token expires within `buffer` of `now`
    pub fn is_expiring_soon(&self, now: DateTime<Utc>, buffer: Duration) -> bool {
        self.expires_at.is_some_and(|at| at - now < buffer)
    }
}

// Tokens must never end up in logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Supplies an already-valid credential
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Provider name for diagnostics
    fn name(&self) -> &'static str;

    /// Return a credential usable for the whole pipeline invocation
    ///
    /// # Errors
    /// Returns `Error::Credential` if no usable credential is available
    async fn get_valid_credential(&self) -> Result<Credential>;
}

/// Provider returning a fixed token
pub struct StaticCredentialProvider {
    credential: Credential,
}

impl StaticCredentialProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            credential: Credential::new(token),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn get_valid_credential(&self) -> Result<Credential> {
        if !self.credential.has_token() {
            return Err(Error::Credential("Token is empty".to_string()));
        }
        Ok(self.credential.clone())
    }
}

/// File-backed token store
///
/// Expired tokens are deleted on read and reported as absent.
pub struct TokenStore {
    path: PathBuf,
    clock: Arc<dyn Clock>,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Use a specific clock for expiry checks
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist a credential, replacing any stored one
    ///
    /// # Errors
    /// Returns `Error::InvalidInput` for a blank token
    pub async fn store(&self, credential: &Credential) -> Result<()> {
        if !credential.has_token() {
            return Err(Error::InvalidInput("Refusing to store an empty token".to_string()));
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_string_pretty(credential)
            .map_err(|e| Error::Internal(format!("Serialize token failed: {}", e)))?;
        tokio::fs::write(&self.path, content).await?;

        info!(
            path = %self.path.display(),
            expires_at = ?credential.expires_at,
            "Stored user token"
        );
        Ok(())
    }

    /// Load the stored credential, if present and unexpired
    ///
    /// An unreadable or corrupt file is removed and treated as absent.
    pub async fn load(&self) -> Result<Option<Credential>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Io(e)),
        };

        let credential: Credential = match serde_json::from_str(&content) {
            Ok(credential) => credential,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Discarding corrupt token store");
                self.clear().await?;
                return Ok(None);
            }
        };

        if credential.is_expired(self.clock.now()) {
            debug!(path = %self.path.display(), "Stored token expired, removing");
            self.clear().await?;
            return Ok(None);
        }

        Ok(Some(credential))
    }

    /// Remove the stored credential; absent file is not an error
    pub async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

#[async_trait]
impl CredentialProvider for TokenStore {
    fn name(&self) -> &'static str {
        "token-store"
    }

    async fn get_valid_credential(&self) -> Result<Credential> {
        let credential = self.load().await?.ok_or_else(|| {
            Error::Credential(format!(
                "No valid token stored at {}",
                self.path.display()
            ))
        })?;

        if !credential.has_token() {
            return Err(Error::Credential(format!(
                "Token stored at {} is empty",
                self.path.display()
            )));
        }

        if credential.is_expiring_soon(
            self.clock.now(),
            Duration::minutes(DEFAULT_EXPIRY_BUFFER_MINUTES),
        ) {
            warn!("Stored token expires within {} minutes", DEFAULT_EXPIRY_BUFFER_MINUTES);
        }

        Ok(credential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::FixedClock;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_has_token() {
        assert!(Credential::new("abc").has_token());
        assert!(!Credential::new("").has_token());
        assert!(!Credential::new(" \t").has_token());
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", Credential::new("secret-token"));
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("redacted"));
    }

    #[test]
    fn test_expiry_checks() {
        let now = fixed_now();
        let credential = Credential::expiring_in("t", now, 120);

        assert!(!credential.is_expired(now));
        assert!(credential.is_expired(now + Duration::seconds(120)));
        assert!(credential.is_expiring_soon(now, Duration::minutes(5)));
        assert!(!credential.is_expiring_soon(now, Duration::minutes(1)));

        let forever = Credential::new("t");
        assert!(!forever.is_expired(now));
        assert!(!forever.is_expiring_soon(now, Duration::minutes(5)));
    }

    #[tokio::test]
    async fn test_static_provider() {
        let provider = StaticCredentialProvider::new("abc");
        assert_eq!(provider.get_valid_credential().await.unwrap().token, "abc");

        let empty = StaticCredentialProvider::new("  ");
        assert!(matches!(
            empty.get_valid_credential().await,
            Err(Error::Credential(_))
        ));
    }

    #[tokio::test]
    async fn test_token_store_roundtrip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("nested").join("token.json"))
            .with_clock(Arc::new(FixedClock(fixed_now())));

        assert!(store.load().await.unwrap().is_none());

        let credential = Credential::expiring_in("user-token", fixed_now(), 3600);
        store.store(&credential).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(credential));
        assert_eq!(store.get_valid_credential().await.unwrap().token, "user-token");

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
        // Clearing twice is fine
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_token_store_drops_expired_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        let store = TokenStore::new(&path).with_clock(Arc::new(FixedClock(fixed_now())));

        let stale = Credential::expiring_in("old", fixed_now(), -10);
        store.store(&stale).await.unwrap();

        assert!(store.load().await.unwrap().is_none());
        assert!(!path.exists(), "Expired token file should be removed");
        assert!(matches!(
            store.get_valid_credential().await,
            Err(Error::Credential(_))
        ));
    }

    #[tokio::test]
    async fn test_token_store_rejects_blank_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        let store = TokenStore::new(&path);

        assert!(matches!(
            store.store(&Credential::new("")).await,
            Err(Error::InvalidInput(_))
        ));
        assert!(!path.exists());

        // A hand-edited file with a blank token is not a usable credential
        std::fs::write(&path, r#"{"token":"  "}"#).unwrap();
        assert!(matches!(
            store.get_valid_credential().await,
            Err(Error::Credential(_))
        ));
    }

    #[tokio::test]
    async fn test_token_store_discards_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(&path, "not json").unwrap();

        let store = TokenStore::new(&path);
        assert!(store.load().await.unwrap().is_none());
        assert!(!path.exists());
    }
}
