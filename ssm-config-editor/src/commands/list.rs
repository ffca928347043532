use std::io::Write;

use anyhow::Context;
use clap::Args;

use super::StoreArgs;
use crate::{output::render_parameter_table, storage::repository::ParameterRepository};

#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Only list parameters whose name starts with this prefix
    #[arg(long)]
    pub prefix: Option<String>,

    #[command(flatten)]
    pub store: StoreArgs,
}

pub async fn run<W: Write>(
    args: &ListArgs,
    store: &dyn ParameterRepository,
    out: &mut W,
) -> anyhow::Result<()> {
    let prefix = args.prefix.as_deref().filter(|p| !p.is_empty());
    let list = store
        .list(prefix)
        .await
        .context("Error fetching parameters")?;

    write!(out, "{}", render_parameter_table(list.parameters()))?;
    Ok(())
}
