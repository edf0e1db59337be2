//! 单个分类处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责处理单个分类文件里的所有记录，是记录级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **遍历记录**：按顺序走完 `Vec<TranslationEntry>`
//! 2. **幂等跳过**：已有关键词的记录不再调用、不再改动
//! 3. **限频**：每次成功生成后按配置的间隔休眠
//! 4. **检查点**：每新生成 k 条就整体保存一次快照
//! 5. **耗尽处理**：模型池耗尽时立即停止、保存进度、报告部分完成
//!
//! 可恢复性完全由"幂等跳过 + 检查点保存"实现，不需要任何单独的
//! 断点记录文件：进程在任意时刻被杀，最多丢掉上次检查点之后的
//! 新增关键词，已保存的记录不会损坏，下次运行自然跳过已完成部分。

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use crate::clients::{FailoverClient, GenerationBackend, GenerationOutcome};
use crate::config::Config;
use crate::models::loaders::save_entries;
use crate::models::TranslationEntry;
use crate::services::keyword_prompt;

/// 单个分类的处理结果摘要
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// 走过的记录数
    pub visited: usize,
    /// 本次新生成关键词的记录数
    pub enriched: usize,
    /// 因已有关键词而跳过的记录数
    pub skipped: usize,
    /// 是否因模型池耗尽而提前结束
    pub ended_by_exhaustion: bool,
}

/// 处理单个分类文件的所有记录
///
/// # 参数
/// - `entries`: 该分类的全部记录（就地修改）
/// - `client`: 故障转移生成客户端（游标跨分类保持）
/// - `path`: 该分类文件的路径（检查点保存用）
/// - `category_index`: 分类序号（用于日志）
/// - `config`: 配置
///
/// # 返回
/// 返回处理摘要；模型池耗尽不是错误，通过摘要的
/// `ended_by_exhaustion` 上报。
pub async fn process_category<B: GenerationBackend>(
    entries: &mut Vec<TranslationEntry>,
    client: &mut FailoverClient<B>,
    path: &Path,
    category_index: usize,
    config: &Config,
) -> Result<RunSummary> {
    let total = entries.len();
    let mut summary = RunSummary::default();
    // 上次检查点之后新生成的条数
    let mut pending_since_checkpoint = 0usize;

    for index in 0..total {
        summary.visited += 1;

        if entries[index].has_keywords() {
            summary.skipped += 1;
            continue;
        }

        log_generating(category_index, index + 1, total, entries[index].jp());

        let prompt = keyword_prompt(entries[index].jp(), entries[index].en());

        match client.generate(&prompt).await {
            GenerationOutcome::PoolExhausted => {
                summary.ended_by_exhaustion = true;
                break;
            }
            GenerationOutcome::Success(text) => {
                if text.is_empty() {
                    // 软失败：记录保持原样，下次运行重新处理
                    warn!(
                        "[分类 {}] ⚠️ 第 {} 条未得到关键词，留待下次运行",
                        category_index,
                        index + 1
                    );
                    continue;
                }

                if config.verbose_logging {
                    info!("[分类 {}] 关键词: {}", category_index, text);
                }

                entries[index].set_keywords(text);
                summary.enriched += 1;
                pending_since_checkpoint += 1;

                if pending_since_checkpoint >= config.checkpoint_interval {
                    save_entries(path, entries).await?;
                    pending_since_checkpoint = 0;
                    info!(
                        "[分类 {}] 💾 已保存进度（{} 条新关键词）",
                        category_index, summary.enriched
                    );
                }

                // 防止触发每分钟限频
                tokio::time::sleep(Duration::from_secs(config.request_delay_secs)).await;
            }
        }
    }

    if summary.ended_by_exhaustion {
        // 耗尽属于正常停机：保存当前进度后由上层决定是否继续后续分类
        save_entries(path, entries).await?;
        warn!(
            "[分类 {}] 🛑 模型池已耗尽，已保存进度（本次新生成 {} 条）",
            category_index, summary.enriched
        );
    } else if pending_since_checkpoint > 0 {
        save_entries(path, entries).await?;
        info!("[分类 {}] 💾 已保存最终进度", category_index);
    }

    log_category_complete(category_index, &summary, total);

    Ok(summary)
}

// ========== 日志辅助函数 ==========

fn log_generating(category_index: usize, position: usize, total: usize, jp: &str) {
    let preview = crate::utils::logging::truncate_text(jp, 40);
    info!(
        "[分类 {}] [{}/{}] ✨ 正在生成: {}",
        category_index, position, total, preview
    );
}

fn log_category_complete(category_index: usize, summary: &RunSummary, total: usize) {
    info!(
        "[分类 {}] 记录统计: 新生成 {}, 跳过 {}, 走过 {}/{}",
        category_index, summary.enriched, summary.skipped, summary.visited, total
    );
}
