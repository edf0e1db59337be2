//! 应用主流程 - 编排层
//!
//! ## 职责
//!
//! 1. **启动检查**：API 密钥缺失是致命错误，不发起任何调用
//! 2. **模型列表**：启动时查询一次可用模型，仅供参考输出
//! 3. **分类循环**：按文件名顺序逐个处理数据目录下的 JSON 分类文件
//! 4. **故障隔离**：单个分类加载失败只跳过该分类，其余继续
//! 5. **耗尽停机**：某个分类报告模型池耗尽后不再处理后续分类
//! 6. **全局统计**：汇总所有分类的处理结果
//!
//! 整个运行只构造一个 `FailoverClient`：游标跨分类保持，已经被
//! 判定不可用的模型在同一轮运行里不会再被尝试。

use anyhow::Result;
use tracing::{error, info, warn};

use crate::clients::{FailoverClient, GeminiBackend};
use crate::config::Config;
use crate::error::{AppError, ConfigError};
use crate::models::loaders::{find_category_files, load_entries};
use crate::orchestrator::process_category;
use crate::utils::logging::log_startup;

/// 应用主结构
#[derive(Debug)]
pub struct App {
    config: Config,
    client: FailoverClient<GeminiBackend>,
}

impl App {
    /// 初始化应用
    ///
    /// 密钥缺失或模型池为空时在此处失败，保证之后不会发起任何
    /// 生成调用、不会写任何文件。
    pub async fn initialize(config: Config) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(AppError::missing_credential("GEMINI_API_KEY").into());
        }
        if config.model_pool.is_empty() {
            return Err(AppError::Config(ConfigError::EmptyModelPool).into());
        }

        log_startup(&config.model_pool, &config.data_folder);

        let backend = GeminiBackend::new(&config);

        // 查询可用模型，仅供参考；失败不阻塞处理
        match backend.list_models().await {
            Ok(models) => {
                info!("--- 当前可用模型 ---");
                for model in models {
                    info!("模型 ID: {}", model);
                }
            }
            Err(e) => warn!("⚠️ 查询模型列表失败（继续运行）: {}", e),
        }

        let client = FailoverClient::new(backend, config.model_pool.clone());

        Ok(Self { config, client })
    }

    /// 运行应用主逻辑
    pub async fn run(&mut self) -> Result<()> {
        let category_files = find_category_files(&self.config.data_folder).await?;

        if category_files.is_empty() {
            warn!("⚠️ 没有找到待处理的JSON文件，程序结束");
            return Ok(());
        }

        let mut stats = BatchStats::default();

        for (idx, path) in category_files.iter().enumerate() {
            let category_index = idx + 1;
            let file_name = path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();

            info!("\n--- 📂 开始处理: {} ---", file_name);

            // 单个分类加载失败只影响该分类，其余继续
            let mut entries = match load_entries(path).await {
                Ok(entries) => entries,
                Err(e) => {
                    error!("[分类 {}] ❌ 加载 {} 失败: {}", category_index, file_name, e);
                    stats.failed += 1;
                    continue;
                }
            };

            info!(
                "[分类 {}] 已加载 {} 条记录",
                category_index,
                entries.len()
            );

            let summary = process_category(
                &mut entries,
                &mut self.client,
                path,
                category_index,
                &self.config,
            )
            .await?;

            stats.processed += 1;
            stats.enriched += summary.enriched;
            stats.skipped += summary.skipped;

            if summary.ended_by_exhaustion {
                stats.exhausted = true;
                warn!("💾 进度已保存，模型池耗尽，本轮运行到此为止");
                break;
            }
        }

        print_final_stats(&stats, category_files.len());

        Ok(())
    }
}

/// 批量处理统计
#[derive(Debug, Default)]
struct BatchStats {
    /// 完整走过的分类数
    processed: usize,
    /// 加载失败的分类数
    failed: usize,
    /// 新生成关键词总数
    enriched: usize,
    /// 幂等跳过总数
    skipped: usize,
    /// 是否因模型池耗尽而提前结束
    exhausted: bool,
}

// ========== 日志辅助函数 ==========

fn print_final_stats(stats: &BatchStats, total_files: usize) {
    info!("\n{}", "=".repeat(60));
    if stats.exhausted {
        info!("📊 本轮运行部分完成（模型池耗尽）");
    } else {
        info!("🚀 全部分类处理完成");
    }
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 处理分类: {}/{}", stats.processed, total_files);
    if stats.failed > 0 {
        info!("❌ 加载失败: {}", stats.failed);
    }
    info!("✨ 新生成关键词: {} 条", stats.enriched);
    info!("⏭️ 幂等跳过: {} 条", stats.skipped);
    info!("{}", "=".repeat(60));
}
