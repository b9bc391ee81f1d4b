//! 有界轮询模块
//!
//! 以固定间隔重复执行探测，直到探测成功或超过截止时间。

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{Instant, sleep, timeout_at};

/// 轮询策略：固定探测间隔 + 硬性截止时间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// 两次探测之间的间隔
    pub interval: Duration,
    /// 从第一次探测开始计算的总时长上限
    pub timeout: Duration,
}

impl WaitPolicy {
    /// 默认探测间隔：5秒
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

    /// 默认截止时间：1分钟
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL, Self::DEFAULT_TIMEOUT)
    }
}

/// 轮询失败的原因
#[derive(Debug, Error)]
pub enum WaitError<E> {
    /// 探测本身返回了错误，轮询立即终止
    #[error("probe failed: {0}")]
    Probe(#[source] E),

    /// 截止时间内探测始终未成功
    #[error("condition not met after {attempts} attempts ({elapsed:?} elapsed)")]
    TimedOut { elapsed: Duration, attempts: u32 },
}

/// 按照 `policy` 轮询 `probe`，直到其返回 `Ok(true)`。
///
/// 第一次探测立即执行，此后每隔 `policy.interval` 执行一次。
/// 单次探测同样受截止时间约束，挂起的探测不会让等待超出上限。
///
/// # 参数
///
/// * `policy` - 探测间隔与截止时间。
/// * `probe` - 每次调用产生一次探测，`Ok(false)` 表示条件尚未满足。
///
/// # 返回值
///
/// 条件满足时返回已执行的探测次数。
///
/// # Errors
///
/// 探测出错时返回 `WaitError::Probe`，超过截止时间返回 `WaitError::TimedOut`。
pub async fn poll_until<F, Fut, E>(policy: WaitPolicy, mut probe: F) -> Result<u32, WaitError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    let started = Instant::now();
    // 截止时间超出时钟表示范围时视为没有截止时间
    let deadline = started.checked_add(policy.timeout);
    let mut attempts = 0;

    loop {
        attempts += 1;

        let outcome = match deadline {
            Some(deadline) => timeout_at(deadline, probe()).await.ok(),
            None => Some(probe().await),
        };

        match outcome {
            Some(Ok(true)) => return Ok(attempts),
            Some(Ok(false)) => {}
            Some(Err(err)) => return Err(WaitError::Probe(err)),
            None => {
                return Err(WaitError::TimedOut {
                    elapsed: started.elapsed(),
                    attempts,
                });
            }
        }

        // 下一次探测会落在截止时间之后，直接结束
        if let Some(deadline) = deadline {
            let next_attempt = Instant::now().checked_add(policy.interval);
            if next_attempt.is_none_or(|next_attempt| next_attempt >= deadline) {
                return Err(WaitError::TimedOut {
                    elapsed: started.elapsed(),
                    attempts,
                });
            }
        }

        sleep(policy.interval).await;
    }
}
