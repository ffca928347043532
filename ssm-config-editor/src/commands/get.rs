use std::io::Write;

use anyhow::Context;
use clap::Args;

use super::StoreArgs;
use crate::{domain::ParameterName, storage::repository::ParameterRepository};

#[derive(Debug, Clone, Args)]
pub struct GetArgs {
    /// Parameter name
    pub key: String,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Prints the decrypted value of a parameter.
pub async fn run<W: Write>(
    args: &GetArgs,
    store: &dyn ParameterRepository,
    out: &mut W,
) -> anyhow::Result<()> {
    let parameter = store
        .get(&ParameterName::new(&args.key), true)
        .await
        .with_context(|| format!("Error fetching parameter '{}'", args.key))?;

    writeln!(out, "{}", parameter.value())?;
    Ok(())
}
