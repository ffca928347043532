use super::{Configs, loaders::environment::first_env};

pub const DEFAULT_REGION: &str = "us-east-1";

/// Connection settings for the parameter store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreConfig {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub endpoint_url: Option<String>,
}

impl StoreConfig {
    /// `--region` wins over whatever the environment says.
    pub fn with_region_override(mut self, region: Option<String>) -> Self {
        if let Some(region) = region {
            self.region = Some(region);
        }
        self
    }
}

#[async_trait::async_trait]
impl Configs for StoreConfig {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(StoreConfig {
            region: Some(
                first_env(&["AWS_REGION", "AWS_DEFAULT_REGION"])
                    .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            ),
            profile: first_env(&["AWS_PROFILE"]),
            endpoint_url: first_env(&["SSM_ENDPOINT_URL", "AWS_ENDPOINT"]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        unsafe {
            for name in [
                "AWS_REGION",
                "AWS_DEFAULT_REGION",
                "AWS_PROFILE",
                "SSM_ENDPOINT_URL",
                "AWS_ENDPOINT",
            ] {
                std::env::remove_var(name);
            }
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_defaults_to_us_east_1() {
        clear_env();
        let config = StoreConfig::load().await.unwrap();
        assert_eq!(config.region.as_deref(), Some(DEFAULT_REGION));
        assert_eq!(config.profile, None);
        assert_eq!(config.endpoint_url, None);
    }

    #[tokio::test]
    #[serial]
    async fn test_reads_environment() {
        clear_env();
        unsafe {
            std::env::set_var("AWS_DEFAULT_REGION", "eu-west-1");
            std::env::set_var("AWS_PROFILE", "staging");
            std::env::set_var("AWS_ENDPOINT", "http://localhost:4566");
        }

        let config = StoreConfig::load().await.unwrap();
        assert_eq!(config.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.profile.as_deref(), Some("staging"));
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:4566"));

        clear_env();
    }

    #[tokio::test]
    #[serial]
    async fn test_region_flag_overrides_environment() {
        clear_env();
        unsafe {
            std::env::set_var("AWS_REGION", "eu-west-1");
        }

        let config = StoreConfig::load()
            .await
            .unwrap()
            .with_region_override(Some("ap-southeast-1".to_string()));
        assert_eq!(config.region.as_deref(), Some("ap-southeast-1"));

        let unchanged = StoreConfig::load().await.unwrap().with_region_override(None);
        assert_eq!(unchanged.region.as_deref(), Some("eu-west-1"));

        clear_env();
    }
}
