//! 存储服务接口模块
//!
//! 该模块定义本程序用到的三个存储服务操作，并基于 `aws_sdk_s3::Client` 实现。

use crate::s3::error::StorageError;
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::operation::create_bucket::CreateBucketError;
use aws_sdk_s3::operation::head_bucket::HeadBucketError;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use std::time::Duration;
use tracing::debug;

/// S3 不接受显式指定为 us-east-1 的 LocationConstraint
const US_EAST_1: &str = "us-east-1";

/// 创建存储桶请求的分类结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateBucketStatus {
    /// 新建成功
    Created,
    /// 调用方已拥有同名存储桶
    AlreadyOwned,
    /// 同名存储桶已被其他账户占用
    AlreadyExists,
}

/// 存储服务操作
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// 在指定区域创建存储桶。“已存在”类条件作为状态返回，而不是错误。
    async fn create_bucket(
        &self,
        bucket: &str,
        region: &str,
    ) -> Result<CreateBucketStatus, StorageError>;

    /// 存在性探测。存储桶不存在时返回 `Ok(false)`。
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, StorageError>;

    /// 生成允许一次 PUT 上传的预签名 URL。
    async fn presign_put(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError>;
}

/// 基于 AWS SDK 的存储服务实现
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: Client,
}

impl S3Storage {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn create_bucket(
        &self,
        bucket: &str,
        region: &str,
    ) -> Result<CreateBucketStatus, StorageError> {
        debug!(bucket, region, "Sending CreateBucket");

        let mut request = self.client.create_bucket().bucket(bucket);
        if region != US_EAST_1 {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(region))
                    .build(),
            );
        }

        match request.send().await {
            Ok(_) => Ok(CreateBucketStatus::Created),
            Err(err) => {
                let service_err = err.as_service_error();
                if service_err.is_some_and(CreateBucketError::is_bucket_already_owned_by_you) {
                    return Ok(CreateBucketStatus::AlreadyOwned);
                }
                if service_err.is_some_and(CreateBucketError::is_bucket_already_exists) {
                    return Ok(CreateBucketStatus::AlreadyExists);
                }
                Err(aws_sdk_s3::Error::from(err).into())
            }
        }
    }

    async fn bucket_exists(&self, bucket: &str) -> Result<bool, StorageError> {
        debug!(bucket, "Sending HeadBucket");

        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(err) if err.as_service_error().is_some_and(HeadBucketError::is_not_found) => {
                Ok(false)
            }
            Err(err) => Err(aws_sdk_s3::Error::from(err).into()),
        }
    }

    async fn presign_put(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        debug!(bucket, key, ?expires_in, "Presigning PutObject");

        let presigning_config = PresigningConfig::expires_in(expires_in)?;

        let presigned_request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning_config)
            .await
            .map_err(aws_sdk_s3::Error::from)?;

        Ok(presigned_request.uri().to_string())
    }
}
