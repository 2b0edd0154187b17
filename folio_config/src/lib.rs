use std::{net::IpAddr, path::Path};

use anyhow::Context;
use config::{Environment, File, FileFormat};
use folio_models::email_address::EmailAddressWithName;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

/// Load the configuration from the files listed in `FOLIO_CONFIG_PATH`
/// (separated by `:`), falling back to [`DEFAULT_CONFIG_PATH`].
///
/// Environment variables prefixed with `FOLIO__` override individual keys,
/// e.g. `FOLIO__EMAIL__TRANSPORT__API_KEY`.
pub fn load() -> anyhow::Result<Config> {
    let paths = std::env::var("FOLIO_CONFIG_PATH").ok();
    let paths = match paths.as_deref() {
        Some(paths) => paths.split(':').filter(|p| !p.is_empty()).collect(),
        None => vec![DEFAULT_CONFIG_PATH],
    };

    load_with_environment(
        &paths,
        Environment::with_prefix("FOLIO")
            .prefix_separator("__")
            .separator("__"),
    )
}

/// Load the configuration from the given files only.
pub fn load_paths(paths: &[impl AsRef<Path>]) -> anyhow::Result<Config> {
    builder(paths)?
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

fn load_with_environment(
    paths: &[impl AsRef<Path>],
    environment: Environment,
) -> anyhow::Result<Config> {
    builder(paths)?
        .add_source(environment)
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

fn builder(
    paths: &[impl AsRef<Path>],
) -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub email: EmailConfig,
    pub contact: ContactConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    /// Sender of all outgoing mail.
    pub from: EmailAddressWithName,
    pub transport: EmailTransportConfig,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EmailTransportConfig {
    Resend {
        api_key: String,
        endpoint_override: Option<Url>,
    },
    Smtp {
        url: String,
    },
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    pub recipient: EmailAddressWithName,
    pub subject_prefix: String,
}
