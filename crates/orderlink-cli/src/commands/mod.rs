use anyhow::{Context as _, Result};
use orderlink_config::AppConfig;
use orderlink_sync::NocoDbClient;
use serde::Serialize;
use std::io::{self, Write};

pub mod completions;
pub mod record;
pub mod sync;

pub struct Context<'a> {
    pub config: &'a AppConfig,
    pub json: bool,
}

impl Context<'_> {
    pub fn client(&self) -> Result<NocoDbClient> {
        NocoDbClient::new(&self.config.remote)
            .map_err(orderlink_sync::SyncError::Client)
            .with_context(|| "build http client")
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
