use std::io::Write;

use anyhow::Context;
use clap::Args;

use super::StoreArgs;
use crate::{
    domain::ParameterName,
    format::Format,
    workflow::{Outcome, ParameterWorkflow},
};

#[derive(Debug, Clone, Args)]
pub struct EditArgs {
    /// Parameter name
    pub key: String,

    /// Validate as json, yaml, env or text (detected from the current value if omitted)
    #[arg(long)]
    pub format: Option<Format>,

    #[command(flatten)]
    pub store: StoreArgs,
}

pub async fn run<W: Write>(
    args: &EditArgs,
    workflow: &ParameterWorkflow,
    out: &mut W,
) -> anyhow::Result<()> {
    let outcome = workflow
        .edit_parameter(&ParameterName::new(&args.key), args.format)
        .await
        .with_context(|| format!("Error editing parameter '{}'", args.key))?;

    match outcome {
        Outcome::Committed { .. } => writeln!(out, "SSM key updated successfully")?,
        Outcome::Unchanged => writeln!(out, "No changes detected, SSM key not updated.")?,
    }
    Ok(())
}
