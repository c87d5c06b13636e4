//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责并发采集的调度和应用生命周期管理。
//!
//! ### `parallel_harvester` - 并行采集器
//! - 按 worker 数量切分总目标（整除，余数不分配）
//! - 对同一个共享会话并发启动 worker（tokio::spawn）
//! - 按完成顺序合并各 worker 的部分结果（全局去重）
//! - 任一 worker 失败时传播首个错误并广播取消信号
//!
//! ### `app` - 应用生命周期
//! - 启动日志、连接/启动浏览器、登录、导航
//! - 持有 Browser 和 TimelineSession，确保生命周期正确
//! - 调用并行采集并把结果交给持久化服务
//! - 输出全局统计
//!
//! ## 层次关系
//!
//! ```text
//! app (生命周期 + 资源)
//!     ↓
//! parallel_harvester (N 个并发 worker)
//!     ↓
//! workflow::Harvester (单个 worker 的采集循环)
//!     ↓
//! infrastructure (会话原语：滚动 / 读高度 / 查询)
//! ```

pub mod app;
pub mod parallel_harvester;

pub use app::App;
pub use parallel_harvester::ParallelHarvester;
