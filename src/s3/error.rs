//! S3 操作的错误类型

use aws_sdk_s3::presigning::PresigningConfigError;
use std::time::Duration;
use thiserror::Error;

/// 与存储服务交互时发生的错误
#[derive(Debug, Error)]
pub enum StorageError {
    /// 服务端或传输层返回的错误，原样透传
    #[error("S3 request failed: {0}")]
    Sdk(#[from] aws_sdk_s3::Error),

    /// 预签名配置无效（例如过期时间超过 7 天）
    #[error("invalid presigning config: {0}")]
    PresignConfig(#[from] PresigningConfigError),
}

/// 确保存储桶存在时发生的错误
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// 创建请求失败，且不属于“已存在”类条件
    #[error("failed to create bucket {bucket}")]
    Create {
        bucket: String,
        #[source]
        source: StorageError,
    },

    /// 等待期间存在性探测失败
    #[error("failed to check whether bucket {bucket} exists")]
    Probe {
        bucket: String,
        #[source]
        source: StorageError,
    },

    /// 存储桶在截止时间内始终不可见
    #[error("bucket {bucket} was not visible after {timeout:?} ({attempts} attempts)")]
    WaitTimeout {
        bucket: String,
        timeout: Duration,
        attempts: u32,
    },
}

impl ProvisionError {
    /// 是否为等待超时
    pub fn is_wait_timeout(&self) -> bool {
        matches!(self, Self::WaitTimeout { .. })
    }
}
