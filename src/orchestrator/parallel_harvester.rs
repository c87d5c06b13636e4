//! 并行采集器 - 编排层
//!
//! 对同一个共享会话并发启动 N 个采集 worker，按完成顺序
//! 合并各自的部分结果并做全局去重。
//!
//! 因为所有 worker 驱动同一个浏览会话，worker 之间的滚动/读取
//! 交错不可避免，两个 worker 完全可能先后观察到同一条记录，
//! 所以除了 worker 内部去重，合并时还必须按条目全局去重。

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::HarvestError;
use crate::infrastructure::SessionDriver;
use crate::models::RecordCollection;
use crate::workflow::Harvester;

/// 计算每个 worker 的目标份额
///
/// 整除切分：余数刻意不再分配，`total / workers * workers` 之外的
/// 记录不会被请求。这是沿用原始采集脚本的既定行为，不是待修复的缺陷。
pub fn per_worker_target(total_target: usize, worker_count: usize) -> usize {
    total_target / worker_count
}

/// 并行采集器
///
/// 职责：
/// - 切分目标、启动 worker、合并结果
/// - 不认识浏览器细节，只依赖 SessionDriver
pub struct ParallelHarvester {
    settle_poll: Duration,
    settle_timeout: Duration,
    max_stale_retries: usize,
}

impl ParallelHarvester {
    /// 创建新的并行采集器
    pub fn new(settle_poll: Duration, settle_timeout: Duration, max_stale_retries: usize) -> Self {
        Self {
            settle_poll,
            settle_timeout,
            max_stale_retries,
        }
    }

    /// 从配置创建并行采集器
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Duration::from_millis(config.settle_poll_ms),
            Duration::from_millis(config.settle_timeout_ms),
            config.max_stale_retries,
        )
    }

    /// 并发采集
    ///
    /// # 参数
    /// - `session`: 所有 worker 共享的会话
    /// - `total_target`: 总目标记录数（调用方保证 ≥ 1）
    /// - `worker_count`: worker 数量（调用方保证 ≥ 1）
    ///
    /// # 返回
    /// 返回全局去重后的合并集合；任一 worker 失败时返回首个观察到的
    /// 错误，并向其余 worker 广播取消信号（尽力而为——它们共享同一个
    /// 会话，已发出的命令无法收回）
    pub async fn run<D>(
        &self,
        session: Arc<D>,
        total_target: usize,
        worker_count: usize,
    ) -> Result<RecordCollection, HarvestError>
    where
        D: SessionDriver + 'static,
    {
        let share = per_worker_target(total_target, worker_count);
        let cancel = CancellationToken::new();

        info!(
            "📦 启动并行采集: 总目标 {} 条, {} 个 worker, 每个 {} 条",
            total_target, worker_count, share
        );
        if share * worker_count < total_target {
            info!(
                "💡 整除切分的余数 {} 条不会被请求（沿用原始行为）",
                total_target - share * worker_count
            );
        }

        let mut tasks = FuturesUnordered::new();
        for worker_id in 1..=worker_count {
            let harvester = Harvester::new(
                self.settle_poll,
                self.settle_timeout,
                self.max_stale_retries,
            )
            .with_worker_id(worker_id)
            .with_cancel(cancel.clone());
            let session = session.clone();

            tasks.push(tokio::spawn(async move {
                let outcome = harvester.run(session.as_ref(), share).await;
                (worker_id, outcome)
            }));
        }

        // 按完成顺序合并；worker 之间没有顺序保证，
        // 最终顺序是"先完成者优先"的去重结果
        let mut merged = RecordCollection::new();
        let mut first_error: Option<HarvestError> = None;

        while let Some(joined) = tasks.next().await {
            match joined {
                Ok((worker_id, Ok(outcome))) => {
                    let found = outcome.records.len();
                    let added = merged.merge(outcome.records);
                    info!(
                        "✓ worker {} 完成 ({:?}): 收录 {} 条, 合并后新增 {} 条",
                        worker_id, outcome.termination, found, added
                    );
                }
                Ok((worker_id, Err(e))) => {
                    error!("❌ worker {} 采集失败: {}", worker_id, e);
                    if first_error.is_none() {
                        first_error = Some(e);
                        cancel.cancel();
                    }
                }
                Err(join_err) => {
                    error!("❌ worker 任务执行失败: {}", join_err);
                    if first_error.is_none() {
                        first_error = Some(HarvestError::extraction(join_err));
                        cancel.cancel();
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                if merged.len() < total_target {
                    warn!(
                        "⚠️ 内容见顶，合并结果 {} 条少于总目标 {} 条",
                        merged.len(),
                        total_target
                    );
                }
                Ok(merged)
            }
        }
    }
}
