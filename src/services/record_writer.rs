//! 记录写入服务 - 业务能力层
//!
//! 只负责"把记录落盘为 CSV"能力，不关心采集流程

use anyhow::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::debug;

/// 记录写入服务
///
/// 输出格式：UTF-8 文本，首行为列名，之后每行一条记录。
/// 记录文本中的分隔符不做任何转义——沿用原始脚本的既定行为，
/// 含内嵌换行/逗号的记录会破坏行结构，这是已知的格式脆弱点。
pub struct RecordWriter {
    output_path: String,
    header: String,
}

impl RecordWriter {
    /// 创建新的记录写入服务
    pub fn new(output_path: impl Into<String>) -> Self {
        Self {
            output_path: output_path.into(),
            header: "extracted tweets".to_string(),
        }
    }

    /// 使用自定义列名创建
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// 将全部记录写入输出文件
    ///
    /// # 参数
    /// - `records`: 有序、去重后的记录列表
    ///
    /// # 返回
    /// 返回是否成功写入
    pub async fn write_all(&self, records: &[String]) -> Result<()> {
        debug!(
            "写入 {} 条记录到 {}",
            records.len(),
            self.output_path
        );

        let file = File::create(&self.output_path)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "{}", self.header)?;
        for record in records {
            writeln!(writer, "{}", record)?;
        }
        writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_all_emits_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tweets.csv");
        let writer = RecordWriter::new(path.to_string_lossy().to_string());

        let records = vec!["第一条推文".to_string(), "第二条推文".to_string()];
        writer.write_all(&records).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "extracted tweets\n第一条推文\n第二条推文\n");
    }

    #[tokio::test]
    async fn test_embedded_delimiters_are_not_escaped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tweets.csv");
        let writer = RecordWriter::new(path.to_string_lossy().to_string());

        // 内嵌逗号按原样写出，不加引号不转义
        let records = vec!["hello, world".to_string()];
        writer.write_all(&records).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("hello, world"));
        assert!(!content.contains("\"hello, world\""));
    }

    #[tokio::test]
    async fn test_empty_collection_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        let writer = RecordWriter::new(path.to_string_lossy().to_string());

        writer.write_all(&[]).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "extracted tweets\n");
    }
}
