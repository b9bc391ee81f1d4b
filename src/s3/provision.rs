//! 存储桶准备模块
//!
//! 该模块负责确保存储桶存在：发起创建请求，对“已存在”类条件进行分类，
//! 新建成功后等待存储桶对后续请求可见。

use crate::s3::error::ProvisionError;
use crate::s3::storage::{CreateBucketStatus, ObjectStorage};
use crate::utils::wait::{WaitError, WaitPolicy, poll_until};
use tracing::{error, info, warn};

/// 存储桶准备的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// 新建成功，并且已经可见
    Created,
    /// 调用方已拥有该存储桶
    AlreadyOwned,
    /// 存储桶名已被其他账户占用
    AlreadyExists,
}

impl ProvisionOutcome {
    /// 调用方之后能否使用该存储桶
    pub fn is_usable(self) -> bool {
        matches!(self, Self::Created | Self::AlreadyOwned)
    }
}

/// 确保指定区域中存在名为 `bucket` 的存储桶。
///
/// # 参数
///
/// * `storage` - 存储服务。
/// * `bucket` - 存储桶名称，不做本地校验。
/// * `region` - 目标区域，不做本地校验。
/// * `wait` - 新建成功后等待存储桶可见的轮询策略。
///
/// # 返回值
///
/// 创建结果分类。“已拥有”与“已存在”都不视为错误，由调用方决定后续流程。
///
/// # Errors
///
/// 创建请求失败时返回 `ProvisionError::Create`；
/// 等待期间探测失败返回 `ProvisionError::Probe`；
/// 截止时间内存储桶不可见返回 `ProvisionError::WaitTimeout`。
pub async fn ensure_bucket_exists<S>(
    storage: &S,
    bucket: &str,
    region: &str,
    wait: WaitPolicy,
) -> Result<ProvisionOutcome, ProvisionError>
where
    S: ObjectStorage + ?Sized,
{
    let status = storage
        .create_bucket(bucket, region)
        .await
        .map_err(|source| {
            error!(bucket, region, error = %source, "Couldn't create bucket");
            ProvisionError::Create {
                bucket: bucket.to_string(),
                source,
            }
        })?;

    match status {
        CreateBucketStatus::AlreadyOwned => {
            info!("You already own bucket {bucket}.");
            Ok(ProvisionOutcome::AlreadyOwned)
        }
        CreateBucketStatus::AlreadyExists => {
            warn!("Bucket {bucket} already exists.");
            Ok(ProvisionOutcome::AlreadyExists)
        }
        CreateBucketStatus::Created => {
            wait_until_bucket_exists(storage, bucket, wait).await?;
            Ok(ProvisionOutcome::Created)
        }
    }
}

async fn wait_until_bucket_exists<S>(
    storage: &S,
    bucket: &str,
    wait: WaitPolicy,
) -> Result<(), ProvisionError>
where
    S: ObjectStorage + ?Sized,
{
    match poll_until(wait, || storage.bucket_exists(bucket)).await {
        Ok(attempts) => {
            info!(bucket, attempts, "Created bucket {bucket}.");
            Ok(())
        }
        Err(WaitError::Probe(source)) => {
            error!(bucket, error = %source, "Failed to probe bucket {bucket}.");
            Err(ProvisionError::Probe {
                bucket: bucket.to_string(),
                source,
            })
        }
        Err(WaitError::TimedOut { attempts, .. }) => {
            warn!("Failed attempt to wait for bucket {bucket} to exist.");
            Err(ProvisionError::WaitTimeout {
                bucket: bucket.to_string(),
                timeout: wait.timeout,
                attempts,
            })
        }
    }
}
