use std::io::Write;

use anyhow::Context;
use clap::Args;

use super::StoreArgs;
use crate::{domain::ParameterName, format::Format, workflow::ParameterWorkflow};

#[derive(Debug, Clone, Args)]
pub struct CreateArgs {
    /// Name of the new parameter
    pub key: String,

    /// Existing parameter whose value seeds the editor
    #[arg(long)]
    pub from: Option<String>,

    /// Validate as json, yaml, env or text (detected from --from if omitted)
    #[arg(long)]
    pub format: Option<Format>,

    #[command(flatten)]
    pub store: StoreArgs,
}

pub async fn run<W: Write>(
    args: &CreateArgs,
    workflow: &ParameterWorkflow,
    out: &mut W,
) -> anyhow::Result<()> {
    let from = args
        .from
        .as_deref()
        .filter(|f| !f.is_empty())
        .map(ParameterName::new);

    workflow
        .create_parameter(&ParameterName::new(&args.key), from.as_ref(), args.format)
        .await
        .with_context(|| format!("Error creating SSM parameter '{}'", args.key))?;

    writeln!(out, "SSM parameter '{}' created successfully", args.key)?;
    Ok(())
}
