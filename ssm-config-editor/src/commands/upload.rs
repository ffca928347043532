use std::{io::Write, path::PathBuf};

use anyhow::{Context, anyhow};
use clap::Args;

use super::StoreArgs;
use crate::{
    domain::{ParameterName, ParameterType},
    format::Format,
    storage::repository::{ParameterAdminRepository, PutParameterRequest},
};

#[derive(Debug, Clone, Args)]
pub struct UploadArgs {
    /// Parameter name
    pub key: String,

    /// File whose content becomes the parameter value
    pub file: PathBuf,

    /// Reject the file unless it is valid json, yaml, env or text
    #[arg(long)]
    pub format: Option<Format>,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Writes a file's content to a parameter, creating or replacing it.
pub async fn run<W: Write>(
    args: &UploadArgs,
    store: &dyn ParameterAdminRepository,
    out: &mut W,
) -> anyhow::Result<()> {
    let content = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("Error reading the file '{}'", args.file.display()))?;

    if let Some(format) = args.format {
        format
            .validate(&content)
            .with_context(|| format!("'{}' is not valid {}", args.file.display(), format))?;
    }

    let value = String::from_utf8(content)
        .map_err(|e| anyhow!("'{}' is not valid UTF-8: {}", args.file.display(), e))?;

    store
        .put(PutParameterRequest::overwrite(
            ParameterName::new(&args.key),
            value,
            ParameterType::String,
        ))
        .await
        .context("Error uploading SSM parameter value")?;

    writeln!(out, "SSM parameter value uploaded successfully")?;
    Ok(())
}
