//! Per-invocation context: resolved config, formatter, and the tab's session
//! coordinator.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use devfinder_core::config::default_data_dir;
use devfinder_core::{ClientConfig, FileTabStorage, HttpTransport, SessionCoordinator};

use crate::cli::Cli;
use crate::error::{CliError, Result};
use crate::output::{get_formatter, OutputFormatter};

pub struct Context {
    pub coordinator: SessionCoordinator,
    pub formatter: Box<dyn OutputFormatter>,
    pub json: bool,
}

impl Context {
    pub async fn build(cli: &Cli) -> Result<Self> {
        let config = resolve_config(cli).await?;
        let data_dir = resolve_data_dir(cli)?;
        debug!(
            base_url = %config.base_url,
            timeout_ms = config.timeout_ms,
            tab = %cli.tab,
            data_dir = %data_dir.display(),
            "resolved configuration"
        );

        let transport = Arc::new(HttpTransport::new(&config)?);
        let storage = Arc::new(FileTabStorage::new(data_dir, &cli.tab)?);
        let coordinator = SessionCoordinator::start(transport, storage, &config).await;

        Ok(Self {
            coordinator,
            formatter: get_formatter(cli.json),
            json: cli.json,
        })
    }

    pub fn print(&self, text: String) {
        println!("{}", text);
    }
}

/// Config file first, then flag and environment overrides.
async fn resolve_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::load(path).await?,
        None => ClientConfig::default(),
    };

    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.clone());
    }
    if let Some(timeout) = cli.timeout {
        config = config.with_timeout_ms(timeout);
    }

    config.validate()?;
    Ok(config)
}

fn resolve_data_dir(cli: &Cli) -> Result<PathBuf> {
    match &cli.data_dir {
        Some(dir) => Ok(dir.clone()),
        None => default_data_dir()
            .map(|dir| dir.join("tabs"))
            .ok_or_else(|| CliError::Other("Could not determine a data directory".to_string())),
    }
}
