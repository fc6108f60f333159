use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use anyhow::{Context, Result};
use zeroize::Zeroizing;

/// The default base URL of the registry API.
pub const DEFAULT_API_BASE: &str = "http://localhost:8080";

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The base URL the registry client talks to.
    pub api_base_url: String,
    /// The directory holding the durable credential slot.
    pub data_dir: PathBuf,
    /// The address the registry service listens on.
    pub bind_addr: SocketAddr,
    /// The duration of a bearer session in days.
    pub session_duration_days: i64,
    /// The password given to the seeded accounts.
    pub seed_password: Zeroizing<String>,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let api_base_url = env::var("UDATA_API_BASE")
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        reqwest::Url::parse(&api_base_url)
            .with_context(|| format!("UDATA_API_BASE is not a valid URL: {}", api_base_url))?;

        let session_duration_days: i64 = env::var("SESSION_DURATION_DAYS")
            .unwrap_or_else(|_| "7".to_string())
            .parse()
            .context("Invalid SESSION_DURATION_DAYS")?;

        if session_duration_days <= 0 {
            anyhow::bail!("SESSION_DURATION_DAYS must be greater than 0");
        }

        let seed_password = Zeroizing::new(
            env::var("UDATA_SEED_PASSWORD").unwrap_or_else(|_| "password".to_string()),
        );

        Ok(Self {
            api_base_url,
            data_dir: env::var("UDATA_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".udata")),
            bind_addr: env::var("UDATA_BIND_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
                .parse()
                .context("Invalid UDATA_BIND_ADDR")?,
            session_duration_days,
            seed_password,
        })
    }
}
