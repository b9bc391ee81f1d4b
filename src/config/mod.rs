//! 配置模块。
//!
//! 该模块负责从环境变量加载运行配置，并基于 AWS 默认凭据链创建 S3 客户端。
//! 配置对象在启动时构建一次，之后以引用方式传递，不使用全局状态。

use crate::s3::S3Storage;
use crate::s3::presign::DEFAULT_PRESIGN_EXPIRY;
use crate::utils::wait::WaitPolicy;
use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use aws_credential_types::provider::error::CredentialsError;
use aws_sdk_s3::Client;
use std::env;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// 默认区域
pub const DEFAULT_REGION: &str = "ap-northeast-1";

/// 默认存储桶名称
pub const DEFAULT_BUCKET: &str = "my-test-bucket-221343";

/// 默认对象键
pub const DEFAULT_OBJECT_KEY: &str = "my-object-key";

/// 配置加载失败的原因
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 数值型环境变量无法解析
    #[error("{name} must be a whole number of seconds, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    /// 默认凭据链未配置任何凭据提供者
    #[error("no credentials provider is configured")]
    MissingCredentials,

    /// 凭据链无法解析出凭据
    #[error("failed to resolve AWS credentials")]
    Credentials(#[from] CredentialsError),
}

/// 运行配置
///
/// # 环境变量
///
/// * `S3_REGION` - 目标区域（默认：ap-northeast-1）
/// * `S3_BUCKET` - 存储桶名称
/// * `S3_OBJECT_KEY` - 预签名的对象键
/// * `S3_ENDPOINT` - S3 兼容服务的端点 URL，设置后使用路径风格寻址
/// * `S3_WAIT_TIMEOUT_SECS` - 等待存储桶可见的截止时间（默认：60）
/// * `S3_WAIT_INTERVAL_SECS` - 存在性探测间隔（默认：5）
/// * `S3_PRESIGN_EXPIRES_SECS` - 预签名URL有效时长（默认：900）
///
/// 凭据始终由 AWS 默认凭据链解析。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub region: String,
    pub bucket: String,
    pub object_key: String,
    pub endpoint: Option<String>,
    pub wait: WaitPolicy,
    pub presign_expires_in: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            bucket: DEFAULT_BUCKET.to_string(),
            object_key: DEFAULT_OBJECT_KEY.to_string(),
            endpoint: None,
            wait: WaitPolicy::default(),
            presign_expires_in: DEFAULT_PRESIGN_EXPIRY,
        }
    }
}

impl AppConfig {
    /// 从进程环境变量加载配置。
    ///
    /// # Errors
    ///
    /// 数值型变量无法解析时返回 `ConfigError::InvalidNumber`。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 通过 `lookup` 读取变量并加载配置，未设置或为空的变量使用默认值。
    ///
    /// # Errors
    ///
    /// 数值型变量无法解析时返回 `ConfigError::InvalidNumber`。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let seconds = |name: &'static str, default: Duration| -> Result<Duration, ConfigError> {
            match var(name) {
                Some(value) => value
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|_| ConfigError::InvalidNumber { name, value }),
                None => Ok(default),
            }
        };

        Ok(Self {
            region: var("S3_REGION").unwrap_or(defaults.region),
            bucket: var("S3_BUCKET").unwrap_or(defaults.bucket),
            object_key: var("S3_OBJECT_KEY").unwrap_or(defaults.object_key),
            endpoint: var("S3_ENDPOINT"),
            wait: WaitPolicy::new(
                seconds("S3_WAIT_INTERVAL_SECS", defaults.wait.interval)?,
                seconds("S3_WAIT_TIMEOUT_SECS", defaults.wait.timeout)?,
            ),
            presign_expires_in: seconds("S3_PRESIGN_EXPIRES_SECS", defaults.presign_expires_in)?,
        })
    }
}

/// 使用 AWS 默认加载链构建 SDK 配置，并确认凭据可以解析。
///
/// # 参数
///
/// * `config` - 运行配置，其中的区域优先于环境中的区域设置。
///
/// # Errors
///
/// 凭据链缺失或无法解析凭据时返回错误。
pub async fn load_sdk_config(config: &AppConfig) -> Result<SdkConfig, ConfigError> {
    let region_provider = RegionProviderChain::first_try(Some(Region::new(config.region.clone())))
        .or_default_provider();

    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(region_provider)
        .load()
        .await;

    let credentials_provider = sdk_config
        .credentials_provider()
        .ok_or(ConfigError::MissingCredentials)?;
    credentials_provider.provide_credentials().await?;

    debug!(region = ?sdk_config.region(), "Loaded AWS configuration");
    Ok(sdk_config)
}

/// 根据 SDK 配置创建 S3 客户端。
///
/// 设置了 `endpoint` 时使用该端点并启用路径风格寻址。
pub fn create_s3_client(sdk_config: &SdkConfig, config: &AppConfig) -> Client {
    let mut builder = aws_sdk_s3::config::Builder::from(sdk_config);
    if let Some(endpoint) = &config.endpoint {
        builder = builder.endpoint_url(endpoint).force_path_style(true);
    }
    Client::from_conf(builder.build())
}

/// 加载配置并创建存储服务。
///
/// # Errors
///
/// 同 [`load_sdk_config`]。
pub async fn create_storage(config: &AppConfig) -> Result<S3Storage, ConfigError> {
    let sdk_config = load_sdk_config(config).await?;
    let client = create_s3_client(&sdk_config, config);

    info!(
        region = %config.region,
        endpoint = config.endpoint.as_deref().unwrap_or("default"),
        "Initialized S3 client"
    );

    Ok(S3Storage::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::s3::ObjectStorage;
    use aws_credential_types::Credentials;
    use aws_credential_types::provider::SharedCredentialsProvider;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = tokio_test::assert_ok!(AppConfig::from_lookup(lookup_from(&[])));

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.region, "ap-northeast-1");
        assert_eq!(config.bucket, "my-test-bucket-221343");
        assert_eq!(config.object_key, "my-object-key");
        assert_eq!(config.endpoint, None);
        assert_eq!(config.wait, WaitPolicy::default());
        assert_eq!(config.presign_expires_in, Duration::from_secs(900));
    }

    #[test]
    fn test_overrides_from_environment() {
        let config = tokio_test::assert_ok!(AppConfig::from_lookup(lookup_from(&[
            ("S3_REGION", "eu-west-1"),
            ("S3_BUCKET", "uploads"),
            ("S3_OBJECT_KEY", "incoming/report.csv"),
            ("S3_ENDPOINT", "http://localhost:9000"),
            ("S3_WAIT_TIMEOUT_SECS", "10"),
            ("S3_WAIT_INTERVAL_SECS", " 2 "),
            ("S3_PRESIGN_EXPIRES_SECS", "3600"),
        ])));

        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.bucket, "uploads");
        assert_eq!(config.object_key, "incoming/report.csv");
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:9000"));
        assert_eq!(
            config.wait,
            WaitPolicy::new(Duration::from_secs(2), Duration::from_secs(10))
        );
        assert_eq!(config.presign_expires_in, Duration::from_secs(3600));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = tokio_test::assert_ok!(AppConfig::from_lookup(lookup_from(&[
            ("S3_BUCKET", ""),
            ("S3_ENDPOINT", "   "),
        ])));

        assert_eq!(config.bucket, DEFAULT_BUCKET);
        assert_eq!(config.endpoint, None);
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        let err = tokio_test::assert_err!(AppConfig::from_lookup(lookup_from(&[(
            "S3_WAIT_TIMEOUT_SECS",
            "one minute"
        )])));

        match err {
            ConfigError::InvalidNumber { name, value } => {
                assert_eq!(name, "S3_WAIT_TIMEOUT_SECS");
                assert_eq!(value, "one minute");
            }
            other => panic!("expected invalid number, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_endpoint_enables_path_style() {
        let sdk_config = SdkConfig::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("ap-northeast-1"))
            .credentials_provider(SharedCredentialsProvider::new(Credentials::new(
                "AKIDEXAMPLE",
                "secret",
                None,
                None,
                "unit-test",
            )))
            .build();
        let config = AppConfig {
            endpoint: Some("http://localhost:9000".to_string()),
            ..AppConfig::default()
        };

        let storage = S3Storage::new(create_s3_client(&sdk_config, &config));
        let url = tokio_test::assert_ok!(
            storage
                .presign_put("uploads", "incoming/report.csv", DEFAULT_PRESIGN_EXPIRY)
                .await
        );

        assert!(url.starts_with("http://localhost:9000/uploads/incoming/report.csv?"));
    }
}
