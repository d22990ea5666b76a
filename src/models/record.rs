//! 输入记录
//!
//! 一条记录就是字段名到值的映射，保留输入时的字段顺序。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// 单条记录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, JsonValue>,
}

impl Record {
    /// 创建空记录
    pub fn new() -> Self {
        Self::default()
    }

    /// 链式添加字段（主要用于测试与示例）
    pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// 读取原始值
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.fields.get(key)
    }

    /// 读取值的文本形式
    pub fn get_text(&self, key: &str) -> Option<String> {
        self.fields.get(key).map(value_to_text)
    }

    /// 写入字段；已存在的键保持原位置
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 按输入顺序遍历 (字段名, 文本值)
    pub fn text_fields(&self) -> impl Iterator<Item = (&str, String)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), value_to_text(v)))
    }
}

impl From<Map<String, JsonValue>> for Record {
    fn from(fields: Map<String, JsonValue>) -> Self {
        Self { fields }
    }
}

/// 将字段值转为写入文档的文本
///
/// 字符串原样输出，null 为空串，数组/对象输出紧凑 JSON。
pub fn value_to_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
