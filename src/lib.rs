//! # Tweet Harvester
//!
//! 一个通过滚动加载增量采集时间线推文的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `SessionDriver` - 滚动 / 读高度 / 查询记录三个原语的抽象
//! - `TimelineSession` - 唯一的 page owner，通过 JS 求值实现原语
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `RecordWriter` - 落盘 CSV 能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个 worker"的完整采集循环
//! - `Harvester` - 滚动 → 等待渲染 → 查询 → 收录 → 判停 状态机
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/parallel_harvester` - 并发 worker 的切分、合并与取消
//! - `orchestrator/app` - 应用生命周期与资源管理
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::{connect_to_browser_and_page, launch_headless_browser, login_to_twitter};
pub use config::Config;
pub use error::{AppError, AppResult, HarvestError};
pub use infrastructure::{SessionDriver, TimelineSession};
pub use models::RecordCollection;
pub use orchestrator::{App, ParallelHarvester};
pub use workflow::{HarvestOutcome, Harvester, Termination};
