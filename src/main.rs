use anyhow::Context;
use bucket_presign::config::{self, AppConfig};
use bucket_presign::s3::S3Storage;
use bucket_presign::workflow::{self, CONFIG_FAILURE_MESSAGE};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // 加载 .env 文件
    dotenvy::dotenv().ok();

    bucket_presign::init_tracing();

    let result = match load().await {
        Ok((app_config, storage)) => workflow::run(&app_config, &storage).await,
        Err(e) => Err(e),
    };

    for line in workflow::render(&result) {
        println!("{line}");
    }

    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// 加载运行配置并创建 S3 客户端
async fn load() -> anyhow::Result<(AppConfig, S3Storage)> {
    let app_config = AppConfig::from_env().context(CONFIG_FAILURE_MESSAGE)?;
    let storage = config::create_storage(&app_config)
        .await
        .context(CONFIG_FAILURE_MESSAGE)?;
    Ok((app_config, storage))
}
