//! 顶层流程
//!
//! 严格顺序执行：准备存储桶 → 生成预签名URL → 输出结果。
//! 任一阶段失败即终止，不产生部分结果。

use crate::config::AppConfig;
use crate::s3::{ObjectStorage, PresignedUpload, ensure_bucket_exists, presign_put};
use anyhow::{Context, Result, anyhow};
use tracing::info;

/// 配置加载失败时的提示
pub const CONFIG_FAILURE_MESSAGE: &str =
    "Couldn't load default configuration. Have you set up your AWS account?";

/// 存储桶准备失败时的提示
pub const PROVISION_FAILURE_MESSAGE: &str = "Couldn't create bucket";

/// 预签名失败时的提示
pub const PRESIGN_FAILURE_MESSAGE: &str = "Couldn't generate a presigned URL for PutObject";

/// 执行存储桶准备与预签名。
///
/// 调用方已拥有存储桶时继续生成预签名URL；存储桶属于其他账户时终止。
///
/// # 参数
///
/// * `config` - 运行配置。
/// * `storage` - 存储服务。
///
/// # 返回值
///
/// 预签名上传URL。
///
/// # Errors
///
/// 返回带有阶段提示信息的错误，原始错误保留在错误链中。
pub async fn run<S>(config: &AppConfig, storage: &S) -> Result<PresignedUpload>
where
    S: ObjectStorage + ?Sized,
{
    let outcome = ensure_bucket_exists(storage, &config.bucket, &config.region, config.wait)
        .await
        .context(PROVISION_FAILURE_MESSAGE)?;

    if !outcome.is_usable() {
        return Err(anyhow!(
            "bucket {} already exists and is owned by another account",
            config.bucket
        )
        .context(PROVISION_FAILURE_MESSAGE));
    }
    info!(bucket = %config.bucket, ?outcome, "Bucket is ready");

    presign_put(
        storage,
        &config.bucket,
        &config.object_key,
        config.presign_expires_in,
    )
    .await
    .context(PRESIGN_FAILURE_MESSAGE)
}

/// 将流程结果渲染为输出行。
///
/// 成功时输出预签名URL；失败时第一行为阶段提示，其后逐行输出错误链。
pub fn render(result: &Result<PresignedUpload>) -> Vec<String> {
    match result {
        Ok(upload) => vec![format!("The presigned URL is: {}", upload.url)],
        Err(err) => err.chain().map(|cause| cause.to_string()).collect(),
    }
}
