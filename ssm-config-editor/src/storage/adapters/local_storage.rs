use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;

use crate::domain::*;
use crate::storage::repository::*;

#[derive(Debug, Clone)]
struct StoredParameter {
    value: String,
    param_type: ParameterType,
    tier: ParameterTier,
    version: i64,
    last_modified: chrono::DateTime<Utc>,
}

/// In-memory parameter store. Keeps versions per name like the real service.
#[derive(Clone, Default)]
pub struct LocalStorage {
    parameters: Arc<RwLock<BTreeMap<ParameterName, StoredParameter>>>,
    puts: Arc<RwLock<Vec<PutParameterRequest>>>,
}

impl LocalStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameters<I, N, V>(parameters: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        let storage = Self::new();
        {
            let mut stored = storage.parameters.write().unwrap();
            for (name, value) in parameters {
                stored.insert(
                    ParameterName::new(name),
                    StoredParameter {
                        value: value.into(),
                        param_type: ParameterType::String,
                        tier: ParameterTier::Standard,
                        version: 1,
                        last_modified: Utc::now(),
                    },
                );
            }
        }
        storage
    }

    /// Every write request accepted so far, in order.
    pub fn put_requests(&self) -> Vec<PutParameterRequest> {
        self.puts.read().unwrap().clone()
    }

    pub fn tier_of(&self, name: &str) -> Option<ParameterTier> {
        self.parameters
            .read()
            .unwrap()
            .get(&ParameterName::new(name))
            .map(|p| p.tier)
    }

    pub fn clear(&self) {
        self.parameters.write().unwrap().clear();
        self.puts.write().unwrap().clear();
    }
}

#[async_trait::async_trait]
impl ParameterRepository for LocalStorage {
    async fn get(
        &self,
        name: &ParameterName,
        _with_decryption: bool,
    ) -> Result<Parameter, RepositoryError> {
        let parameters = self.parameters.read().unwrap();
        let stored = parameters
            .get(name)
            .ok_or_else(|| RepositoryError::ParameterNotFound(name.to_string()))?;

        Ok(
            Parameter::new(
                name.clone(),
                stored.value.clone(),
                stored.param_type,
                stored.version,
            )
            .with_last_modified(stored.last_modified),
        )
    }

    async fn list(&self, prefix: Option<&str>) -> Result<ParameterList, RepositoryError> {
        let parameters = self.parameters.read().unwrap();
        let listed = parameters
            .iter()
            .filter(|(name, _)| prefix.is_none_or(|p| name.starts_with(p)))
            .map(|(name, stored)| ParameterMetadata {
                name: name.clone(),
                version: stored.version,
                last_modified: Some(stored.last_modified),
            })
            .collect();
        Ok(ParameterList::new(listed))
    }
}

#[async_trait::async_trait]
impl ParameterAdminRepository for LocalStorage {
    async fn put(&self, request: PutParameterRequest) -> Result<i64, RepositoryError> {
        let mut parameters = self.parameters.write().unwrap();
        let version = match parameters.get(&request.name) {
            Some(_) if !request.overwrite => {
                return Err(RepositoryError::ParameterAlreadyExists(
                    request.name.to_string(),
                ));
            }
            Some(existing) => existing.version + 1,
            None => 1,
        };

        let tier = match (request.tier, parameters.get(&request.name)) {
            (Some(ParameterTier::Standard), Some(existing))
                if existing.tier == ParameterTier::Advanced =>
            {
                return Err(RepositoryError::ValidationError(format!(
                    "{} is an advanced parameter and cannot move to the standard tier",
                    request.name
                )));
            }
            (Some(tier), _) => tier,
            (None, Some(existing)) => existing.tier,
            (None, None) => ParameterTier::Standard,
        };
        if tier == ParameterTier::Standard
            && ParameterTier::for_content_len(request.value.len()) == ParameterTier::Advanced
        {
            return Err(RepositoryError::ValidationError(format!(
                "value of {} exceeds the standard tier size limit",
                request.name
            )));
        }

        parameters.insert(
            request.name.clone(),
            StoredParameter {
                value: request.value.clone(),
                param_type: request.param_type,
                tier,
                version,
                last_modified: Utc::now(),
            },
        );
        self.puts.write().unwrap().push(request);
        Ok(version)
    }

    async fn delete(&self, name: &ParameterName) -> Result<(), RepositoryError> {
        let mut parameters = self.parameters.write().unwrap();
        if parameters.remove(name).is_none() {
            return Err(RepositoryError::ParameterNotFound(name.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_parameter() {
        let storage = LocalStorage::new();
        let result = storage.get(&ParameterName::new("/missing"), true).await;
        assert_eq!(
            result.unwrap_err(),
            RepositoryError::ParameterNotFound("/missing".to_string())
        );
    }

    #[tokio::test]
    async fn test_overwrite_increments_version() {
        let storage = LocalStorage::with_parameters([("/app/config", "A=1")]);
        let name = ParameterName::new("/app/config");

        let version = storage
            .put(PutParameterRequest::overwrite(
                name.clone(),
                "A=2".to_string(),
                ParameterType::String,
            ))
            .await
            .unwrap();

        assert_eq!(version, 2);
        assert_eq!(storage.get(&name, true).await.unwrap().value(), "A=2");
    }

    #[tokio::test]
    async fn test_create_rejects_existing_parameter() {
        let storage = LocalStorage::with_parameters([("/app/config", "A=1")]);
        let result = storage
            .put(PutParameterRequest::create(
                ParameterName::new("/app/config"),
                "A=2".to_string(),
            ))
            .await;

        assert!(matches!(
            result,
            Err(RepositoryError::ParameterAlreadyExists(_))
        ));
        assert!(storage.put_requests().is_empty());
    }

    #[tokio::test]
    async fn test_list_filters_by_prefix() {
        let storage = LocalStorage::with_parameters([
            ("/app/one", "1"),
            ("/app/two", "2"),
            ("/other/three", "3"),
        ]);

        let all = storage.list(None).await.unwrap();
        assert_eq!(all.len(), 3);

        let filtered = storage.list(Some("/app/")).await.unwrap();
        let names: Vec<_> = filtered
            .parameters()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["/app/one", "/app/two"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let storage = LocalStorage::with_parameters([("/app/one", "1")]);
        let name = ParameterName::new("/app/one");

        storage.delete(&name).await.unwrap();
        assert!(storage.get(&name, false).await.is_err());
        assert!(matches!(
            storage.delete(&name).await,
            Err(RepositoryError::ParameterNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_advanced_parameter_cannot_downgrade() {
        let storage = LocalStorage::new();
        let name = ParameterName::new("/big");
        storage
            .put(PutParameterRequest::create(name.clone(), "x".repeat(5000)))
            .await
            .unwrap();

        let downgrade = PutParameterRequest {
            name: name.clone(),
            value: "small".to_string(),
            param_type: ParameterType::String,
            overwrite: true,
            tier: Some(ParameterTier::Standard),
        };
        assert!(matches!(
            storage.put(downgrade).await,
            Err(RepositoryError::ValidationError(_))
        ));

        let unset = PutParameterRequest::overwrite(
            name.clone(),
            "small".to_string(),
            ParameterType::String,
        );
        assert_eq!(storage.put(unset).await.unwrap(), 2);
        assert_eq!(storage.tier_of("/big"), Some(ParameterTier::Advanced));
    }

    #[tokio::test]
    async fn test_standard_tier_rejects_large_values() {
        let storage = LocalStorage::new();
        let request = PutParameterRequest {
            name: ParameterName::new("/big"),
            value: "x".repeat(5000),
            param_type: ParameterType::String,
            overwrite: false,
            tier: Some(ParameterTier::Standard),
        };

        assert!(matches!(
            storage.put(request).await,
            Err(RepositoryError::ValidationError(_))
        ));
    }
}
