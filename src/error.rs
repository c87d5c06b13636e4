use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 浏览器相关错误
    Browser(BrowserError),
    /// 采集相关错误
    Harvest(HarvestError),
    /// 文件操作错误
    File(FileError),
    /// 配置错误
    Config(ConfigError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Browser(e) => write!(f, "浏览器错误: {}", e),
            AppError::Harvest(e) => write!(f, "采集错误: {}", e),
            AppError::File(e) => write!(f, "文件错误: {}", e),
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Browser(e) => Some(e),
            AppError::Harvest(e) => Some(e),
            AppError::File(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 浏览器相关错误
#[derive(Debug)]
pub enum BrowserError {
    /// 连接浏览器失败
    ConnectionFailed {
        port: u16,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 创建页面失败
    PageCreationFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 导航失败
    NavigationFailed {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 登录失败
    LoginFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 浏览器配置失败
    ConfigurationFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for BrowserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserError::ConnectionFailed { port, source } => {
                write!(f, "无法连接到浏览器 (端口: {}): {}", port, source)
            }
            BrowserError::PageCreationFailed { source } => {
                write!(f, "创建页面失败: {}", source)
            }
            BrowserError::NavigationFailed { url, source } => {
                write!(f, "导航到 {} 失败: {}", url, source)
            }
            BrowserError::LoginFailed { source } => {
                write!(f, "登录失败: {}", source)
            }
            BrowserError::ConfigurationFailed { source } => {
                write!(f, "浏览器配置失败: {}", source)
            }
        }
    }
}

impl std::error::Error for BrowserError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BrowserError::ConnectionFailed { source, .. }
            | BrowserError::PageCreationFailed { source }
            | BrowserError::NavigationFailed { source, .. }
            | BrowserError::LoginFailed { source }
            | BrowserError::ConfigurationFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

/// 采集相关错误
///
/// 错误分级：
/// - `StaleElement` 是瞬态信号，采集循环在原地重试，不向上传播
/// - 其余变体对发起查询的 worker 都是致命错误，向编排层传播
#[derive(Debug)]
pub enum HarvestError {
    /// 元素在查询与读取之间被页面替换（瞬态，可原地重试）
    StaleElement,
    /// 瞬态重试次数耗尽后升级为致命错误
    StaleRetriesExhausted { attempts: usize },
    /// 查询/读取会话时的其他不可恢复失败
    Extraction {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 共享会话不可用（如导航丢失、目标页面被关闭）
    SessionUnavailable { reason: String },
}

impl fmt::Display for HarvestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarvestError::StaleElement => {
                write!(f, "元素引用失效（瞬态）")
            }
            HarvestError::StaleRetriesExhausted { attempts } => {
                write!(f, "元素引用持续失效，已重试 {} 次仍未恢复", attempts)
            }
            HarvestError::Extraction { source } => {
                write!(f, "提取记录失败: {}", source)
            }
            HarvestError::SessionUnavailable { reason } => {
                write!(f, "浏览会话不可用: {}", reason)
            }
        }
    }
}

impl std::error::Error for HarvestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HarvestError::Extraction { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

impl HarvestError {
    /// 判断是否为可原地重试的瞬态错误
    pub fn is_transient(&self) -> bool {
        matches!(self, HarvestError::StaleElement)
    }

    /// 创建提取失败错误
    pub fn extraction(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        HarvestError::Extraction {
            source: Box::new(source),
        }
    }
}

/// 文件操作错误
#[derive(Debug)]
pub enum FileError {
    /// 读取文件失败
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::ReadFailed { path, source } => {
                write!(f, "读取文件失败 ({}): {}", path, source)
            }
            FileError::WriteFailed { path, source } => {
                write!(f, "写入文件失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::ReadFailed { source, .. } | FileError::WriteFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 环境变量解析失败
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置取值非法
    InvalidValue { field: String, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EnvVarParseFailed {
                var_name,
                value,
                expected_type,
            } => {
                write!(
                    f,
                    "环境变量 {} 解析失败: 值 '{}' 无法转换为 {}",
                    var_name, value, expected_type
                )
            }
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "配置项 {} 非法: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ========== 从常见错误类型转换 ==========
// 注意：不需要手动实现 From<AppError> for anyhow::Error，
// 因为 anyhow 已经为所有实现了 std::error::Error 的类型提供了自动实现

impl From<chromiumoxide::error::CdpError> for HarvestError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        classify_cdp_message(&err.to_string(), err)
    }
}

impl From<HarvestError> for AppError {
    fn from(err: HarvestError) -> Self {
        AppError::Harvest(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

/// 根据 CDP 错误消息对失败做分级
///
/// Chrome DevTools 协议没有结构化的"元素失效"错误码，只能按消息文本识别：
/// - 节点/执行上下文在求值瞬间被页面替换 → 瞬态 `StaleElement`
/// - 目标页面或会话整体丢失 → `SessionUnavailable`
/// - 其余 → `Extraction`
fn classify_cdp_message(
    message: &str,
    source: impl std::error::Error + Send + Sync + 'static,
) -> HarvestError {
    const STALE_MARKERS: [&str; 3] = [
        "Cannot find context with specified id",
        "Node with given id does not belong to the document",
        "Could not find node with given id",
    ];
    const SESSION_MARKERS: [&str; 3] = ["Target closed", "Session closed", "Browser closed"];

    if STALE_MARKERS.iter().any(|m| message.contains(m)) {
        return HarvestError::StaleElement;
    }
    if SESSION_MARKERS.iter().any(|m| message.contains(m)) {
        return HarvestError::SessionUnavailable {
            reason: message.to_string(),
        };
    }
    HarvestError::Extraction {
        source: Box::new(source),
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建浏览器连接错误
    pub fn browser_connection_failed(
        port: u16,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Browser(BrowserError::ConnectionFailed {
            port,
            source: Box::new(source),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct FakeError(String);

    impl fmt::Display for FakeError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl std::error::Error for FakeError {}

    #[test]
    fn test_classify_stale_message() {
        let err = classify_cdp_message(
            "Cannot find context with specified id",
            FakeError("ctx".into()),
        );
        assert!(err.is_transient());
    }

    #[test]
    fn test_classify_session_lost_message() {
        let err = classify_cdp_message("Target closed", FakeError("gone".into()));
        assert!(matches!(err, HarvestError::SessionUnavailable { .. }));
    }

    #[test]
    fn test_classify_other_message_is_fatal_extraction() {
        let err = classify_cdp_message("some protocol error", FakeError("boom".into()));
        assert!(matches!(err, HarvestError::Extraction { .. }));
        assert!(!err.is_transient());
    }
}
