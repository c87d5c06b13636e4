use crate::error::ConfigError;

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 采集记录总目标数
    pub total_records: usize,
    /// 并发 worker 数量
    pub worker_count: usize,
    /// 滚动后等待内容渲染的轮询间隔（毫秒）
    pub settle_poll_ms: u64,
    /// 滚动后等待内容渲染的总超时（毫秒）
    pub settle_timeout_ms: u64,
    /// 瞬态元素失效的最大重试次数
    pub max_stale_retries: usize,
    /// 浏览器调试端口（为空时启动无头浏览器）
    pub browser_debug_port: Option<u16>,
    /// 登录页面 URL
    pub login_url: String,
    /// 目标时间线 URL
    pub timeline_url: String,
    /// 记录节点的 CSS 选择器
    pub record_selector: String,
    /// 登录用户名
    pub twitter_username: String,
    /// 登录密码
    pub twitter_password: String,
    /// 结果 CSV 输出路径
    pub output_csv_file: String,
    /// 输出日志文件
    pub output_log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            total_records: 100,
            worker_count: 5,
            settle_poll_ms: 500,
            settle_timeout_ms: 5000,
            max_stale_retries: 5,
            browser_debug_port: None,
            login_url: "https://twitter.com/login".to_string(),
            timeline_url: "https://twitter.com/timesofindia".to_string(),
            record_selector: r#"article[data-testid="tweet"] div[lang]"#.to_string(),
            twitter_username: String::new(),
            twitter_password: String::new(),
            output_csv_file: "tweets_parallel.csv".to_string(),
            output_log_file: "output.txt".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            total_records: std::env::var("TOTAL_RECORDS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.total_records),
            worker_count: std::env::var("WORKER_COUNT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.worker_count),
            settle_poll_ms: std::env::var("SETTLE_POLL_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.settle_poll_ms),
            settle_timeout_ms: std::env::var("SETTLE_TIMEOUT_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.settle_timeout_ms),
            max_stale_retries: std::env::var("MAX_STALE_RETRIES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_stale_retries),
            browser_debug_port: std::env::var("BROWSER_DEBUG_PORT").ok().and_then(|v| v.parse().ok()),
            login_url: std::env::var("LOGIN_URL").unwrap_or(default.login_url),
            timeline_url: std::env::var("TIMELINE_URL").unwrap_or(default.timeline_url),
            record_selector: std::env::var("RECORD_SELECTOR").unwrap_or(default.record_selector),
            twitter_username: std::env::var("TWITTER_USERNAME").unwrap_or(default.twitter_username),
            twitter_password: std::env::var("TWITTER_PASSWORD").unwrap_or(default.twitter_password),
            output_csv_file: std::env::var("OUTPUT_CSV_FILE").unwrap_or(default.output_csv_file),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 校验配置取值
    ///
    /// 总目标数和 worker 数必须 ≥ 1：并行切分对 0 无意义，
    /// 环境变量写错不应让程序带病启动
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_records == 0 {
            return Err(ConfigError::InvalidValue {
                field: "total_records".to_string(),
                reason: "必须 ≥ 1".to_string(),
            });
        }
        if self.worker_count == 0 {
            return Err(ConfigError::InvalidValue {
                field: "worker_count".to_string(),
                reason: "必须 ≥ 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_default_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_worker_count() {
        let config = Config {
            worker_count: 0,
            ..Config::default()
        };
        match config.validate() {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "worker_count"),
            other => panic!("预期 InvalidValue，实际: {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_zero_total_records() {
        let config = Config {
            total_records: 0,
            ..Config::default()
        };
        match config.validate() {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "total_records"),
            other => panic!("预期 InvalidValue，实际: {:?}", other),
        }
    }
}
