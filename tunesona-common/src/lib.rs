//! # Tunesona Common Library
//!
//! Shared code for the Tunesona workspace including:
//! - Error type and result alias
//! - TOML configuration loading and resolution
//! - Credential capability and local token store
//! - Clock capability and timestamp helpers

pub mod config;
pub mod credential;
pub mod error;
pub mod time;

pub use credential::{Credential, CredentialProvider};
pub use error::{Error, Result};
pub use time::{Clock, SystemClock};
