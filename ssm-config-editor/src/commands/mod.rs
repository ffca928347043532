//! One module per subcommand. Each owns its flags; nothing is shared between
//! commands except what is passed in.

pub mod create;
pub mod delete;
pub mod edit;
pub mod get;
pub mod list;
pub mod upload;

use anyhow::anyhow;
use clap::Args;
use tracing::debug;

use crate::{
    configs::{Configs, StoreConfig},
    storage::adapters::ssm_storage::SsmStorage,
};

#[derive(Debug, Clone, Default, Args)]
pub struct StoreArgs {
    /// AWS region (defaults to AWS_REGION, AWS_DEFAULT_REGION, then us-east-1)
    #[arg(long)]
    pub region: Option<String>,
}

impl StoreArgs {
    pub async fn connect(&self) -> anyhow::Result<SsmStorage> {
        let config = StoreConfig::load()
            .await
            .map_err(|e| anyhow!(e))?
            .with_region_override(self.region.clone());
        debug!(?config, "Connecting to parameter store");
        SsmStorage::new(config).await
    }
}
