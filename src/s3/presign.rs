//! S3预签名URL模块
//!
//! 该模块负责生成允许单次 PUT 上传的预签名URL。

use crate::s3::error::StorageError;
use crate::s3::storage::ObjectStorage;
use std::time::{Duration, SystemTime};
use tracing::info;

/// 默认过期时间：15分钟
pub const DEFAULT_PRESIGN_EXPIRY: Duration = Duration::from_secs(15 * 60);

/// 预签名上传URL及其有效期
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedUpload {
    /// 预签名URL
    pub url: String,
    /// 有效时长
    pub expires_in: Duration,
    /// 过期时刻（按生成时的本地时钟计算）
    pub expires_at: SystemTime,
}

/// 为 `bucket` 中的 `key` 生成预签名 PUT URL。
///
/// 不附加任何请求头、内容类型或校验和约束，签名算法使用默认值。
///
/// # 参数
///
/// * `storage` - 存储服务。
/// * `bucket` - 存储桶名称。
/// * `key` - 对象键。
/// * `expires_in` - URL 有效时长。
///
/// # 返回值
///
/// 预签名URL及过期时刻。
///
/// # Errors
///
/// 签名失败时原样返回存储服务错误。
pub async fn presign_put<S>(
    storage: &S,
    bucket: &str,
    key: &str,
    expires_in: Duration,
) -> Result<PresignedUpload, StorageError>
where
    S: ObjectStorage + ?Sized,
{
    let issued_at = SystemTime::now();
    let url = storage.presign_put(bucket, key, expires_in).await?;

    info!(bucket, key, ?expires_in, "Generated presigned PutObject URL");

    Ok(PresignedUpload {
        url,
        expires_in,
        expires_at: issued_at + expires_in,
    })
}
