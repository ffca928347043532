use std::fmt;

use crate::domain::*;

#[derive(Debug, Clone, PartialEq)]
pub struct PutParameterRequest {
    pub name: ParameterName,
    pub value: String,
    pub param_type: ParameterType,
    pub overwrite: bool,
    /// `None` leaves the tier to the store's default.
    pub tier: Option<ParameterTier>,
}

impl PutParameterRequest {
    /// A new parameter: plain string, overwrite disabled, tier chosen from the size.
    pub fn create(name: ParameterName, value: String) -> Self {
        let tier = ParameterTier::for_content_len(value.len());
        Self {
            name,
            value,
            param_type: ParameterType::String,
            overwrite: false,
            tier: Some(tier),
        }
    }

    /// Replaces a parameter's value, creating it if missing. The tier is only
    /// sent when the value needs `Advanced`, so existing tiers are never lowered.
    pub fn overwrite(name: ParameterName, value: String, param_type: ParameterType) -> Self {
        let tier = match ParameterTier::for_content_len(value.len()) {
            ParameterTier::Advanced => Some(ParameterTier::Advanced),
            ParameterTier::Standard => None,
        };
        Self {
            name,
            value,
            param_type,
            overwrite: true,
            tier,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParameterList {
    parameters: Vec<ParameterMetadata>,
}

impl ParameterList {
    pub fn new(parameters: Vec<ParameterMetadata>) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &[ParameterMetadata] {
        &self.parameters
    }

    pub fn into_parameters(self) -> Vec<ParameterMetadata> {
        self.parameters
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    ConnectionFailed(String),
    QueryFailed(String),
    SerializationFailed(String),
    ParameterNotFound(String),
    ParameterAlreadyExists(String),
    ValidationError(String),
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            Self::QueryFailed(msg) => write!(f, "Query failed: {}", msg),
            Self::SerializationFailed(msg) => write!(f, "Serialization failed: {}", msg),
            Self::ParameterNotFound(msg) => write!(f, "Parameter not found: {}", msg),
            Self::ParameterAlreadyExists(msg) => write!(f, "Parameter already exists: {}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for RepositoryError {}

/// Read operations against the parameter store
#[async_trait::async_trait]
pub trait ParameterRepository: Send + Sync {
    async fn get(
        &self,
        name: &ParameterName,
        with_decryption: bool,
    ) -> Result<Parameter, RepositoryError>;

    /// Drains every page before returning.
    async fn list(&self, prefix: Option<&str>) -> Result<ParameterList, RepositoryError>;
}

/// Write operations against the parameter store
#[async_trait::async_trait]
pub trait ParameterAdminRepository: ParameterRepository {
    /// Returns the version assigned by the store.
    async fn put(&self, request: PutParameterRequest) -> Result<i64, RepositoryError>;
    async fn delete(&self, name: &ParameterName) -> Result<(), RepositoryError>;
}
