use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 单条对译记录
///
/// 内部是一个保持插入顺序的字段表（serde_json 开启 `preserve_order`），
/// 除本引擎关心的 `jp` / `en` / `keywords` / `verified` 外，
/// 其余字段原样透传，加载-保存往返不改变任何字段的顺序和内容。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationEntry {
    fields: Map<String, Value>,
}

impl TranslationEntry {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// 日语原文（缺失时返回空字符串）
    pub fn jp(&self) -> &str {
        self.fields.get("jp").and_then(Value::as_str).unwrap_or("")
    }

    /// 英语参考译文（缺失时返回空字符串）
    pub fn en(&self) -> &str {
        self.fields.get("en").and_then(Value::as_str).unwrap_or("")
    }

    /// 已生成的关键词文本
    pub fn keywords(&self) -> Option<&str> {
        self.fields.get("keywords").and_then(Value::as_str)
    }

    /// 是否已有关键词
    ///
    /// 只有 `keywords` 存在、是字符串且非空时才算已生成；
    /// 空字符串表示上次生成失败，下次运行仍需重新处理。
    pub fn has_keywords(&self) -> bool {
        self.keywords().map(|k| !k.is_empty()).unwrap_or(false)
    }

    /// 写入新生成的关键词
    ///
    /// 同时把 `verified` 重置为 false：关键词是机器生成的，需要人工复核。
    pub fn set_keywords(&mut self, keywords: impl Into<String>) {
        self.fields
            .insert("keywords".to_string(), Value::String(keywords.into()));
        self.fields.insert("verified".to_string(), Value::Bool(false));
    }

    /// 读取任意字段（透传字段的只读访问）
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// 字段名列表（按插入顺序）
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }
}
