//! 时间线会话 - 基础设施层
//!
//! 持有唯一的 page 资源，通过 JS 求值暴露滚动 / 读高度 / 查询记录能力

use async_trait::async_trait;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::HarvestError;
use crate::infrastructure::SessionDriver;

/// 时间线会话
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 实现 SessionDriver 的三个原语
/// - 不认识采集目标数 / worker
///
/// 多个 worker 通过 `Arc<TimelineSession>` 共享同一个会话。
/// 内部用互斥锁串行化单条 CDP 命令，避免交错的部分读取；
/// 命令之间的交错仍然存在，由编排层的全局去重兜底。
pub struct TimelineSession {
    page: Page,
    record_selector: String,
    command_lock: Mutex<()>,
}

impl TimelineSession {
    /// 创建新的时间线会话
    pub fn new(page: Page, record_selector: impl Into<String>) -> Self {
        Self {
            page,
            record_selector: record_selector.into(),
            command_lock: Mutex::new(()),
        }
    }

    /// 获取 page 的引用（用于其他操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并反序列化为指定类型
    async fn eval_as<T: DeserializeOwned>(&self, js_code: &str) -> Result<T, HarvestError> {
        let _guard = self.command_lock.lock().await;
        let result = self.page.evaluate(js_code).await?;
        let typed_value = result
            .into_value()
            .map_err(HarvestError::extraction)?;
        Ok(typed_value)
    }
}

#[async_trait]
impl SessionDriver for TimelineSession {
    async fn scroll_to_bottom(&self) -> Result<(), HarvestError> {
        debug!("滚动到页面底部");
        let _: bool = self
            .eval_as("(() => { window.scrollTo(0, document.body.scrollHeight); return true; })()")
            .await?;
        Ok(())
    }

    async fn page_height(&self) -> Result<i64, HarvestError> {
        let height: i64 = self.eval_as("document.body.scrollHeight").await?;
        Ok(height)
    }

    async fn query_records(&self) -> Result<Vec<String>, HarvestError> {
        let js_code = format!(
            r#"Array.from(document.querySelectorAll('{}')).map(el => el.innerText)"#,
            self.record_selector
        );
        let texts: Vec<String> = self.eval_as(&js_code).await?;
        debug!("查询到 {} 个可见记录节点", texts.len());
        Ok(texts)
    }
}
