//! S3模块
//!
//! 该模块负责处理与S3存储桶的交互，包括存储桶准备、存在性等待和预签名URL生成。

// 声明子模块
pub mod error;
pub mod presign;
pub mod provision;
pub mod storage;

// 重新导出常用的类型和函数
pub use error::{ProvisionError, StorageError};
pub use presign::{DEFAULT_PRESIGN_EXPIRY, PresignedUpload, presign_put};
pub use provision::{ProvisionOutcome, ensure_bucket_exists};
pub use storage::{CreateBucketStatus, ObjectStorage, S3Storage};
