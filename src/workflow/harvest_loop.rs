//! 采集循环 - 流程层
//!
//! 核心职责：定义"一个 worker"的完整采集流程
//!
//! 单次采集是一个状态机：
//!
//! ```text
//! Idle → Scrolling → Querying → {Accumulating, Retrying}
//!      → {Scrolling, Terminated-Full, Terminated-Plateau, Failed}
//! ```
//!
//! - 滚动到底部后等待异步渲染（轮询高度直到稳定，带总超时）
//! - 查询当前可见记录；瞬态的元素失效在原地重试，不重新滚动，
//!   重试次数有上限，超限升级为致命错误
//! - 非空且未见过的文本按首次发现顺序收录
//! - 达到目标数即成功返回（不截断，收录多少返回多少）
//! - 两次滚动之间高度不再增长（plateau）也正常返回，即使未达目标

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::HarvestError;
use crate::infrastructure::SessionDriver;
use crate::models::RecordCollection;

/// 单次采集的终止方式
///
/// 调用方必须能区分"内容见顶提前结束"（合法结果）
/// 与"出错结束"（由 `Err` 表达），因此终止方式随结果显式返回。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// 收录数达到目标
    TargetReached,
    /// 滚动高度不再增长，内容见顶
    Plateau,
    /// 收到取消信号后提前退出
    Cancelled,
}

/// 单次采集结果
#[derive(Debug)]
pub struct HarvestOutcome {
    /// 收录的记录（有序、去重，可能超出或不足目标数）
    pub records: RecordCollection,
    /// 终止方式
    pub termination: Termination,
}

/// 采集器
///
/// 职责：
/// - 驱动一个会话完成 滚动 → 等待渲染 → 查询 → 收录 → 判停 的循环
/// - 不持有会话资源，不认识并发
pub struct Harvester {
    worker_id: usize,
    settle_poll: Duration,
    settle_timeout: Duration,
    max_stale_retries: usize,
    cancel: CancellationToken,
}

impl Harvester {
    /// 创建新的采集器
    pub fn new(settle_poll: Duration, settle_timeout: Duration, max_stale_retries: usize) -> Self {
        Self {
            worker_id: 0,
            settle_poll,
            settle_timeout,
            max_stale_retries,
            cancel: CancellationToken::new(),
        }
    }

    /// 从配置创建采集器
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Duration::from_millis(config.settle_poll_ms),
            Duration::from_millis(config.settle_timeout_ms),
            config.max_stale_retries,
        )
    }

    /// 设置 worker 编号（用于日志）
    pub fn with_worker_id(mut self, worker_id: usize) -> Self {
        self.worker_id = worker_id;
        self
    }

    /// 挂接共享取消信号
    ///
    /// 编排层让所有 worker 共享同一个信号，任一 worker 失败后
    /// 其余 worker 不再对共享会话发出滚动/查询命令
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// 执行一次完整采集
    ///
    /// # 参数
    /// - `session`: 已导航到目标页面的会话
    /// - `target_count`: 目标记录数；0 是退化情形，不发出任何滚动
    ///
    /// # 返回
    /// 返回收录的记录和终止方式；不可恢复的查询失败返回错误
    pub async fn run<D>(
        &self,
        session: &D,
        target_count: usize,
    ) -> Result<HarvestOutcome, HarvestError>
    where
        D: SessionDriver + ?Sized,
    {
        let mut records = RecordCollection::new();

        if target_count == 0 {
            debug!("[worker {}] 目标数为 0，跳过采集", self.worker_id);
            return Ok(HarvestOutcome {
                records,
                termination: Termination::TargetReached,
            });
        }

        let mut last_height = session.page_height().await?;
        let mut iteration = 0usize;

        loop {
            if self.cancel.is_cancelled() {
                warn!(
                    "[worker {}] 收到取消信号，已收录 {} 条，提前退出",
                    self.worker_id,
                    records.len()
                );
                return Ok(HarvestOutcome {
                    records,
                    termination: Termination::Cancelled,
                });
            }

            iteration += 1;
            debug!(
                "[worker {}] 第 {} 轮滚动 (当前高度: {})",
                self.worker_id, iteration, last_height
            );

            session.scroll_to_bottom().await?;
            self.settle_after_scroll(session, last_height).await?;

            let visible = self.query_with_retry(session).await?;
            for text in visible {
                // push 内部丢弃空串与重复，保持首次发现顺序
                records.push(text);
            }

            if records.len() >= target_count {
                info!(
                    "[worker {}] ✓ 达到目标: {} / {} 条 (共 {} 轮滚动)",
                    self.worker_id,
                    records.len(),
                    target_count,
                    iteration
                );
                return Ok(HarvestOutcome {
                    records,
                    termination: Termination::TargetReached,
                });
            }

            let new_height = session.page_height().await?;
            if new_height == last_height {
                info!(
                    "[worker {}] 内容见顶: 收录 {} / {} 条 (共 {} 轮滚动)",
                    self.worker_id,
                    records.len(),
                    target_count,
                    iteration
                );
                return Ok(HarvestOutcome {
                    records,
                    termination: Termination::Plateau,
                });
            }
            last_height = new_height;
        }
    }

    /// 滚动后等待异步内容渲染
    ///
    /// 不使用固定 sleep：按 `settle_poll` 间隔轮询页面高度。
    /// 高度仍停留在滚动前的值说明内容尚未开始渲染，继续等待；
    /// 只有在观察到高度变化之后，连续两次读到相同高度才算渲染完成。
    /// 总时长以 `settle_timeout` 封顶，等待期间不持有任何互斥锁。
    async fn settle_after_scroll<D>(
        &self,
        session: &D,
        last_height: i64,
    ) -> Result<(), HarvestError>
    where
        D: SessionDriver + ?Sized,
    {
        let deadline = Instant::now() + self.settle_timeout;
        let mut prev = last_height;
        let mut height_changed = false;

        loop {
            sleep(self.settle_poll).await;
            let height = session.page_height().await?;
            if Instant::now() >= deadline {
                return Ok(());
            }
            if height != prev {
                height_changed = true;
                prev = height;
            } else if height_changed {
                // 变化后高度连续两次相同，渲染完成
                return Ok(());
            }
            // 高度未变且从未变过：渲染尚未开始，继续轮询直到超时
        }
    }

    /// 查询可见记录，瞬态失效在原地重试
    ///
    /// 状态机中的 `Querying → Retrying → Querying` 转移：
    /// 不重新滚动，重试次数以 `max_stale_retries` 封顶，
    /// 超限升级为 `StaleRetriesExhausted`
    async fn query_with_retry<D>(&self, session: &D) -> Result<Vec<String>, HarvestError>
    where
        D: SessionDriver + ?Sized,
    {
        let mut attempts = 0usize;
        loop {
            match session.query_records().await {
                Ok(texts) => return Ok(texts),
                Err(e) if e.is_transient() => {
                    attempts += 1;
                    if attempts > self.max_stale_retries {
                        warn!(
                            "[worker {}] ⚠️ 元素持续失效，重试 {} 次后放弃",
                            self.worker_id, self.max_stale_retries
                        );
                        return Err(HarvestError::StaleRetriesExhausted {
                            attempts: self.max_stale_retries,
                        });
                    }
                    debug!(
                        "[worker {}] 元素失效，原地重试 ({}/{})",
                        self.worker_id, attempts, self.max_stale_retries
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }
}
