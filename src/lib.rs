//! 存储桶准备与预签名上传库
//!
//! 主要功能包括：
//! - 在指定区域中幂等地确保存储桶存在，并等待新建的存储桶可见
//! - 为指定对象键生成允许单次 PUT 上传的预签名URL
//! - 从环境变量加载运行配置

pub mod config;
pub mod s3;
pub mod utils;
pub mod workflow;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::LocalTime;

/// 初始化日志输出
///
/// 默认级别为 `info`，可通过 `RUST_LOG` 覆盖。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(LocalTime::rfc_3339())
        .init();
}
