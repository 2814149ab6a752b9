use crate::commands::{print_json, Context};
use anyhow::{Context as _, Result};
use clap::{Args, ValueEnum};
use orderlink_core::RecordId;
use orderlink_sync::{fetch_record, Collection};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CollectionArg {
    Clients,
    Orders,
}

impl From<CollectionArg> for Collection {
    fn from(value: CollectionArg) -> Self {
        match value {
            CollectionArg::Clients => Collection::Clients,
            CollectionArg::Orders => Collection::Orders,
        }
    }
}

#[derive(Debug, Args)]
pub struct RecordArgs {
    /// Table to read from
    #[arg(value_enum)]
    pub collection: CollectionArg,
    /// Record id as shown by NocoDB
    pub id: String,
}

/// Prints one record as JSON; handy for checking field names before a sync.
pub fn show_record(ctx: &Context<'_>, args: RecordArgs) -> Result<()> {
    let id: RecordId = args.id.parse()?;
    let collection = Collection::from(args.collection);
    let client = ctx.client()?;
    let record = fetch_record(&client, ctx.config, collection, &id)
        .with_context(|| format!("show {} record", collection.label()))?;
    print_json(&record)
}
