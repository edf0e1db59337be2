//! # Generate Keywords
//!
//! 一个为日英对译数据批量生成搜索关键词的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 数据层（Models）
//! - `models/entry` - 对译记录（保持字段插入顺序，未知字段透传）
//! - `models/loaders` - JSON 分类文件的加载/整体快照保存/目录扫描
//!
//! ### ② 客户端层（Clients）
//! - `clients/failover_client` - 模型池 + 单调游标 + 故障转移循环
//! - `clients/gemini_backend` - Gemini OpenAI 兼容接口的单次调用
//!
//! ### ③ 业务能力层（Services）
//! - `services/prompt` - 关键词生成提示词构造
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/category_processor` - 单分类处理：幂等跳过、限频、
//!   检查点保存、耗尽停机
//! - `app` - 应用生命周期：启动检查、模型列表、多分类循环、全局统计
//!
//! ## 可恢复性
//!
//! 没有任何断点记录文件："已有关键词则跳过" + "定期整体快照保存"
//! 共同实现任意中断点下的自愈恢复。

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use app::App;
pub use clients::{FailoverClient, GeminiBackend, GenerationBackend, GenerationOutcome};
pub use config::Config;
pub use error::{classify_failure, AppError, AppResult, GenerationFailure};
pub use models::TranslationEntry;
pub use orchestrator::{process_category, RunSummary};
