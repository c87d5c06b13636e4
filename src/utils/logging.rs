/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use anyhow::Result;
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志订阅器
///
/// 日志级别通过 RUST_LOG 控制，默认 info
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
///
/// # 返回
/// 返回是否成功初始化
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n推文采集日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `total_records`: 总目标记录数
/// - `worker_count`: 并发 worker 数
pub fn log_startup(total_records: usize, worker_count: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 并行推文采集模式");
    info!("🎯 总目标: {} 条", total_records);
    info!("📊 并发 worker 数: {}", worker_count);
    info!("{}", "=".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `collected`: 实际收录数
/// - `total_target`: 总目标数
/// - `output_csv_file`: 结果文件路径
pub fn print_final_stats(collected: usize, total_target: usize, output_csv_file: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 采集完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 收录: {}/{} 条（去重后）", collected, total_target);
    info!("{}", "=".repeat(60));
    info!("\n结果已保存至: {}", output_csv_file);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_short_input_unchanged() {
        assert_eq!(truncate_text("短文本", 10), "短文本");
    }

    #[test]
    fn test_truncate_text_long_input_gets_ellipsis() {
        let text = "这是一条相当长的推文内容需要被截断";
        let truncated = truncate_text(text, 5);
        assert_eq!(truncated, "这是一条相...");
    }
}
