//! 应用生命周期 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：启动日志、连接/启动浏览器、登录、导航到时间线
//! 2. **资源管理**：持有 Browser 和 TimelineSession，确保生命周期正确
//! 3. **采集调度**：委托 ParallelHarvester 执行并发采集
//! 4. **结果落盘**：把合并后的集合交给 RecordWriter
//! 5. **全局统计**：输出最终采集结果

use anyhow::Result;
use chromiumoxide::Browser;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::browser;
use crate::config::Config;
use crate::infrastructure::TimelineSession;
use crate::orchestrator::ParallelHarvester;
use crate::services::RecordWriter;
use crate::utils::logging;

/// 应用主结构
pub struct App {
    config: Config,
    browser: Browser,
    session: Arc<TimelineSession>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 校验配置，环境变量写错时尽早失败
        config.validate()?;

        // 初始化日志文件
        logging::init_log_file(&config.output_log_file)?;
        logging::log_startup(config.total_records, config.worker_count);

        // 获取会话：优先复用调试端口上的浏览器，否则启动无头实例
        let (browser, page) = match config.browser_debug_port {
            Some(port) => {
                browser::connect_to_browser_and_page(port, &config.timeline_url).await?
            }
            None => {
                let (mut browser, page) = browser::launch_headless_browser("about:blank").await?;

                // 无头模式每次都是全新会话，需要先登录再导航到时间线
                let prepared: Result<()> = async {
                    if config.twitter_username.is_empty() {
                        warn!("⚠️ 未配置登录凭据，跳过登录（时间线可能不完整）");
                    } else {
                        browser::login_to_twitter(&page, &config).await?;
                    }
                    page.goto(config.timeline_url.as_str()).await?;
                    Ok(())
                }
                .await;

                // 登录/导航失败时也要回收刚启动的浏览器
                if let Err(e) = prepared {
                    if let Err(close_err) = browser.close().await {
                        warn!("关闭浏览器失败: {}", close_err);
                    }
                    return Err(e);
                }
                info!("已导航到时间线: {}", config.timeline_url);
                (browser, page)
            }
        };

        // 等待时间线首屏渲染（与滚动后的等待共用同一个超时配置）
        sleep(Duration::from_millis(config.settle_timeout_ms)).await;

        let session = Arc::new(TimelineSession::new(page, config.record_selector.clone()));

        Ok(Self {
            config,
            browser,
            session,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        let harvester = ParallelHarvester::from_config(&self.config);
        let records = harvester
            .run(
                self.session.clone(),
                self.config.total_records,
                self.config.worker_count,
            )
            .await?;

        // 详细日志（如果启用）
        if self.config.verbose_logging {
            for (i, record) in records.as_slice().iter().take(5).enumerate() {
                info!("  {}. {}", i + 1, logging::truncate_text(record, 80));
            }
        }

        let collected = records.len();
        let writer = RecordWriter::new(self.config.output_csv_file.clone());
        writer.write_all(records.as_slice()).await?;

        logging::print_final_stats(
            collected,
            self.config.total_records,
            &self.config.output_csv_file,
        );

        Ok(())
    }

    /// 关闭浏览器会话
    ///
    /// 无论采集成功或失败都应调用，保证会话被回收
    pub async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("关闭浏览器失败: {}", e);
        }
    }
}
