//! 会话驱动接口 - 基础设施层
//!
//! 采集循环只依赖这三个原语，不接触具体浏览器实现，
//! 测试中可以用脚本化的模拟驱动替换真实页面。

use async_trait::async_trait;

use crate::error::HarvestError;

/// 浏览会话驱动
///
/// 职责：
/// - 暴露滚动 / 读高度 / 查询记录三个能力
/// - 不认识采集目标数、不管理循环状态
///
/// `query_records` 允许返回瞬态的 `HarvestError::StaleElement`，
/// 表示底层节点在查询与读取之间被页面替换，调用方可原地重试；
/// 其余错误一律视为不可恢复。
#[async_trait]
pub trait SessionDriver: Send + Sync {
    /// 将页面滚动到底部
    async fn scroll_to_bottom(&self) -> Result<(), HarvestError>;

    /// 读取当前页面内容高度
    async fn page_height(&self) -> Result<i64, HarvestError>;

    /// 查询当前可见的全部记录文本
    async fn query_records(&self) -> Result<Vec<String>, HarvestError>;
}
