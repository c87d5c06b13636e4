//! 记录集合 - 数据模型层
//!
//! 有序且去重的记录序列：插入顺序 = 首次发现顺序

use std::collections::HashSet;

/// 记录集合
///
/// 不变式：
/// - 任意两个元素在字符串精确相等意义下互不相同
/// - 插入顺序即首次发现顺序，单次采集内只增不减
#[derive(Debug, Default)]
pub struct RecordCollection {
    records: Vec<String>,
    seen: HashSet<String>,
}

impl RecordCollection {
    /// 创建空集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条记录
    ///
    /// 空字符串和已存在的记录会被丢弃
    ///
    /// # 返回
    /// 返回记录是否被实际收录
    pub fn push(&mut self, record: String) -> bool {
        if record.is_empty() || self.seen.contains(&record) {
            return false;
        }
        self.seen.insert(record.clone());
        self.records.push(record);
        true
    }

    /// 合并另一个集合（全局去重）
    ///
    /// 后到集合中已存在的记录被丢弃，保序追加新记录
    ///
    /// # 返回
    /// 返回实际新增的记录数
    pub fn merge(&mut self, other: RecordCollection) -> usize {
        let mut added = 0;
        for record in other.records {
            if self.push(record) {
                added += 1;
            }
        }
        added
    }

    /// 当前记录数
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 集合是否为空
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 是否已包含某条记录
    pub fn contains(&self, record: &str) -> bool {
        self.seen.contains(record)
    }

    /// 以切片形式访问记录
    pub fn as_slice(&self) -> &[String] {
        &self.records
    }

    /// 消费集合，取出有序记录列表
    pub fn into_vec(self) -> Vec<String> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_first_sighting_order() {
        let mut collection = RecordCollection::new();
        assert!(collection.push("第一条".to_string()));
        assert!(collection.push("第二条".to_string()));
        assert!(collection.push("第三条".to_string()));

        assert_eq!(collection.as_slice(), &["第一条", "第二条", "第三条"]);
    }

    #[test]
    fn test_push_rejects_duplicates_and_empty() {
        let mut collection = RecordCollection::new();
        assert!(collection.push("重复的推文".to_string()));
        assert!(!collection.push("重复的推文".to_string()));
        assert!(!collection.push(String::new()));

        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_merge_is_global_dedup() {
        let mut first = RecordCollection::new();
        first.push("a".to_string());
        first.push("b".to_string());

        let mut second = RecordCollection::new();
        second.push("b".to_string());
        second.push("c".to_string());

        let added = first.merge(second);
        assert_eq!(added, 1);
        assert_eq!(first.as_slice(), &["a", "b", "c"]);
    }

    #[test]
    fn test_dedup_invariant_after_merges() {
        let mut merged = RecordCollection::new();
        for batch in [["x", "y"], ["y", "z"], ["z", "x"]] {
            let mut partial = RecordCollection::new();
            for r in batch {
                partial.push(r.to_string());
            }
            merged.merge(partial);
        }

        let unique: std::collections::HashSet<_> = merged.as_slice().iter().collect();
        assert_eq!(unique.len(), merged.len());
        assert_eq!(merged.len(), 3);
    }
}
