use std::io::Write;

use anyhow::Context;
use clap::Args;

use super::StoreArgs;
use crate::{domain::ParameterName, storage::repository::ParameterAdminRepository};

#[derive(Debug, Clone, Args)]
pub struct DeleteArgs {
    /// Parameter name
    pub key: String,

    #[command(flatten)]
    pub store: StoreArgs,
}

pub async fn run<W: Write>(
    args: &DeleteArgs,
    store: &dyn ParameterAdminRepository,
    out: &mut W,
) -> anyhow::Result<()> {
    store
        .delete(&ParameterName::new(&args.key))
        .await
        .with_context(|| format!("Error deleting parameter '{}'", args.key))?;

    writeln!(out, "Parameter deleted successfully")?;
    Ok(())
}
