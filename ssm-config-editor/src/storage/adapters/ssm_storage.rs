use anyhow::Result as AnyResult;
use aws_config::BehaviorVersion;
use aws_sdk_ssm::{
    Client,
    error::DisplayErrorContext,
    primitives::DateTime as SmithyDateTime,
    types::{self as ssm_types, ParameterStringFilter},
};
use aws_types::region::Region;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    configs::StoreConfig,
    domain::*,
    storage::repository::{
        ParameterAdminRepository, ParameterList, ParameterRepository, PutParameterRequest,
        RepositoryError,
    },
};

const NAME_FILTER_KEY: &str = "Name";
const BEGINS_WITH_OPTION: &str = "BeginsWith";

#[derive(Clone)]
pub struct SsmStorage {
    client: Client,
}

impl SsmStorage {
    pub async fn new(config: StoreConfig) -> AnyResult<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }

        if let Some(region) = config.region.clone() {
            loader = loader.region(Region::new(region));
        }

        if let Some(endpoint_url) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url.clone());
        }

        let shared_config = loader.load().await;
        Ok(Self::with_client(Client::new(&shared_config)))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl std::fmt::Debug for SsmStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SsmStorage")
            .field("region", &self.client.config().region())
            .finish()
    }
}

fn to_domain_type(
    param_type: Option<&ssm_types::ParameterType>,
) -> Result<ParameterType, RepositoryError> {
    match param_type {
        None => Ok(ParameterType::String),
        Some(t) => t
            .as_str()
            .parse::<ParameterType>()
            .map_err(RepositoryError::SerializationFailed),
    }
}

fn to_sdk_type(param_type: ParameterType) -> ssm_types::ParameterType {
    match param_type {
        ParameterType::String => ssm_types::ParameterType::String,
        ParameterType::StringList => ssm_types::ParameterType::StringList,
        ParameterType::SecureString => ssm_types::ParameterType::SecureString,
    }
}

fn to_sdk_tier(tier: ParameterTier) -> ssm_types::ParameterTier {
    match tier {
        ParameterTier::Standard => ssm_types::ParameterTier::Standard,
        ParameterTier::Advanced => ssm_types::ParameterTier::Advanced,
    }
}

fn to_chrono(timestamp: &SmithyDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
}

#[async_trait::async_trait]
impl ParameterRepository for SsmStorage {
    async fn get(
        &self,
        name: &ParameterName,
        with_decryption: bool,
    ) -> Result<Parameter, RepositoryError> {
        debug!(parameter = name.as_str(), with_decryption, "Fetching parameter from SSM");

        let response = self
            .client
            .get_parameter()
            .name(name.as_str())
            .with_decryption(with_decryption)
            .send()
            .await
            .map_err(|err| {
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_parameter_not_found())
                {
                    RepositoryError::ParameterNotFound(name.to_string())
                } else {
                    RepositoryError::ConnectionFailed(format!(
                        "Failed to get parameter '{}': {}",
                        name,
                        DisplayErrorContext(&err)
                    ))
                }
            })?;

        let parameter = response
            .parameter()
            .ok_or_else(|| RepositoryError::ParameterNotFound(name.to_string()))?;
        let value = parameter.value().ok_or_else(|| {
            RepositoryError::SerializationFailed(format!("Parameter '{}' has no value", name))
        })?;

        let mut result = Parameter::new(
            name.clone(),
            value,
            to_domain_type(parameter.r#type())?,
            parameter.version(),
        );
        if let Some(last_modified) = parameter.last_modified_date().and_then(to_chrono) {
            result = result.with_last_modified(last_modified);
        }
        Ok(result)
    }

    async fn list(&self, prefix: Option<&str>) -> Result<ParameterList, RepositoryError> {
        debug!(prefix, "Listing parameters from SSM");

        let filters = match prefix {
            Some(prefix) => Some(vec![
                ParameterStringFilter::builder()
                    .key(NAME_FILTER_KEY)
                    .option(BEGINS_WITH_OPTION)
                    .values(prefix)
                    .build()
                    .map_err(|e| RepositoryError::ValidationError(e.to_string()))?,
            ]),
            None => None,
        };

        let mut pages = self
            .client
            .describe_parameters()
            .set_parameter_filters(filters)
            .into_paginator()
            .send();

        let mut parameters = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|err| {
                RepositoryError::QueryFailed(format!(
                    "Failed to describe parameters: {}",
                    DisplayErrorContext(&err)
                ))
            })?;

            for metadata in page.parameters() {
                let Some(name) = metadata.name() else {
                    continue;
                };
                parameters.push(ParameterMetadata {
                    name: ParameterName::new(name),
                    version: metadata.version(),
                    last_modified: metadata.last_modified_date().and_then(to_chrono),
                });
            }
        }

        debug!(count = parameters.len(), "Listed parameters");
        Ok(ParameterList::new(parameters))
    }
}

#[async_trait::async_trait]
impl ParameterAdminRepository for SsmStorage {
    async fn put(&self, request: PutParameterRequest) -> Result<i64, RepositoryError> {
        debug!(
            parameter = request.name.as_str(),
            param_type = request.param_type.as_str(),
            overwrite = request.overwrite,
            tier = request.tier.map(|t| t.as_str()),
            "Writing parameter to SSM"
        );

        let response = self
            .client
            .put_parameter()
            .name(request.name.as_str())
            .value(request.value)
            .r#type(to_sdk_type(request.param_type))
            .overwrite(request.overwrite)
            .set_tier(request.tier.map(to_sdk_tier))
            .send()
            .await
            .map_err(|err| {
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_parameter_already_exists())
                {
                    RepositoryError::ParameterAlreadyExists(request.name.to_string())
                } else {
                    RepositoryError::QueryFailed(format!(
                        "Failed to put parameter '{}': {}",
                        request.name,
                        DisplayErrorContext(&err)
                    ))
                }
            })?;

        Ok(response.version())
    }

    async fn delete(&self, name: &ParameterName) -> Result<(), RepositoryError> {
        debug!(parameter = name.as_str(), "Deleting parameter from SSM");

        self.client
            .delete_parameter()
            .name(name.as_str())
            .send()
            .await
            .map_err(|err| {
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_parameter_not_found())
                {
                    RepositoryError::ParameterNotFound(name.to_string())
                } else {
                    RepositoryError::QueryFailed(format!(
                        "Failed to delete parameter '{}': {}",
                        name,
                        DisplayErrorContext(&err)
                    ))
                }
            })?;

        Ok(())
    }
}
