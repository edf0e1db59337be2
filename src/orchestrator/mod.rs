//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度。
//!
//! ### `category_processor` - 单个分类处理器
//! - 遍历单个分类文件的所有记录（Vec<TranslationEntry>）
//! - 幂等跳过已有关键词的记录
//! - 限频、检查点保存、耗尽停机
//! - 输出单个分类的处理摘要
//!
//! ## 层次关系
//!
//! ```text
//! app (处理 Vec<分类文件>)
//!     ↓
//! category_processor (处理 Vec<TranslationEntry>)
//!     ↓
//! clients::FailoverClient (处理单次生成请求 + 模型切换)
//!     ↓
//! clients::GeminiBackend (单次原始 API 调用)
//! ```

pub mod category_processor;

// 重新导出主要类型
pub use category_processor::{process_category, RunSummary};
