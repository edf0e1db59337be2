//! 模型故障转移客户端
//!
//! 持有一个按优先级排列的模型池和一个只会向前移动的游标。
//! 对外只暴露一个操作：为给定提示词生成文本。内部在配额耗尽或
//! 模型下线时自动切换到池中的下一个模型，同一提示词最多尝试
//! 池长度次，绝不无限循环。
//!
//! 游标只存在于客户端实例中，不持久化：新一轮运行从第一个模型
//! 重新开始。已生成关键词的记录不会重复提交，所以重置游标最多
//! 浪费每个已耗尽模型一次失败调用，不会浪费数据上的工作。

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::GenerationFailure;

/// 单次原始生成调用的抽象
///
/// 生产实现是 Gemini 后端；测试用脚本化后端模拟各类失败。
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// 用指定模型为提示词生成一段文本
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerationFailure>;
}

/// 一次生成请求的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// 当前模型成功返回文本（可能为空串，表示本次软失败）
    Success(String),
    /// 模型池已耗尽，本轮运行不应再发起任何调用
    PoolExhausted,
}

/// 故障转移生成客户端
#[derive(Debug)]
pub struct FailoverClient<B: GenerationBackend> {
    backend: B,
    pool: Vec<String>,
    cursor: usize,
}

impl<B: GenerationBackend> FailoverClient<B> {
    /// 创建新的故障转移客户端
    ///
    /// `pool` 按优先级排列，最新/最强的模型在前。
    pub fn new(backend: B, pool: Vec<String>) -> Self {
        Self {
            backend,
            pool,
            cursor: 0,
        }
    }

    /// 底层后端的只读访问（测试中用于检查调用轨迹）
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// 当前选中的模型（池耗尽时返回 None）
    pub fn current_model(&self) -> Option<&str> {
        self.pool.get(self.cursor).map(String::as_str)
    }

    /// 游标位置（0 起始，单调不减）
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// 模型池是否已耗尽
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.pool.len()
    }

    /// 为提示词生成文本，失败时在池内自动切换模型
    ///
    /// 失败处理策略：
    /// - 配额耗尽 / 模型下线：游标前进一位，用下一个模型重试同一提示词；
    /// - 其他瞬时错误：不动游标，返回空文本（这条记录下次运行再试，
    ///   一次坏调用不应报废整个模型）。
    pub async fn generate(&mut self, prompt: &str) -> GenerationOutcome {
        loop {
            let model = match self.pool.get(self.cursor) {
                Some(model) => model.clone(),
                None => return GenerationOutcome::PoolExhausted,
            };

            match self.backend.generate(&model, prompt).await {
                Ok(text) => return GenerationOutcome::Success(text),
                Err(failure @ (GenerationFailure::Quota | GenerationFailure::Retired)) => {
                    warn!("⚠️ 模型 {} 不可用: {}", model, failure);

                    self.cursor += 1;
                    match self.current_model() {
                        Some(next) => info!("🔄 切换到 {}...", next),
                        None => {
                            warn!("🛑 所有模型均已耗尽或不可用");
                            return GenerationOutcome::PoolExhausted;
                        }
                    }
                }
                Err(GenerationFailure::Transient(msg)) => {
                    warn!("调用出错（不切换模型）: {}", msg);
                    return GenerationOutcome::Success(String::new());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// 脚本化后端：按预设顺序依次返回结果，并记录每次调用使用的模型
    struct ScriptedBackend {
        script: Mutex<VecDeque<Result<String, GenerationFailure>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        fn new(script: Vec<Result<String, GenerationFailure>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GenerationBackend for ScriptedBackend {
        async fn generate(&self, model: &str, _prompt: &str) -> Result<String, GenerationFailure> {
            self.calls.lock().unwrap().push(model.to_string());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| panic!("脚本已用完，模型 {} 不应再被调用", model))
        }
    }

    fn pool(models: &[&str]) -> Vec<String> {
        models.iter().map(|m| m.to_string()).collect()
    }

    #[tokio::test]
    async fn test_quota_advances_and_cursor_is_retained() {
        // 字面场景：A 配额耗尽 → 切到 B 成功；下一次调用直接用 B
        let backend = ScriptedBackend::new(vec![
            Err(GenerationFailure::Quota),
            Ok("sushi, 寿司, 鮨, seafood".to_string()),
            Ok("ramen, ラーメン".to_string()),
        ]);
        let mut client = FailoverClient::new(backend, pool(&["A", "B", "C"]));

        let outcome = client.generate("prompt 1").await;
        assert_eq!(
            outcome,
            GenerationOutcome::Success("sushi, 寿司, 鮨, seafood".to_string())
        );
        assert_eq!(client.cursor(), 1);

        let outcome = client.generate("prompt 2").await;
        assert_eq!(outcome, GenerationOutcome::Success("ramen, ラーメン".to_string()));

        // A 只被调用一次，之后所有调用都走 B
        assert_eq!(client.backend.calls(), vec!["A", "B", "B"]);
        assert_eq!(client.cursor(), 1);
    }

    #[tokio::test]
    async fn test_retired_model_also_advances() {
        let backend = ScriptedBackend::new(vec![
            Err(GenerationFailure::Retired),
            Ok("keywords".to_string()),
        ]);
        let mut client = FailoverClient::new(backend, pool(&["old", "new"]));

        let outcome = client.generate("prompt").await;
        assert_eq!(outcome, GenerationOutcome::Success("keywords".to_string()));
        assert_eq!(client.cursor(), 1);
    }

    #[tokio::test]
    async fn test_transient_failure_does_not_advance() {
        let backend = ScriptedBackend::new(vec![Err(GenerationFailure::Transient(
            "connection reset".to_string(),
        ))]);
        let mut client = FailoverClient::new(backend, pool(&["A", "B"]));

        let outcome = client.generate("prompt").await;
        // 软失败：返回空文本，游标不动
        assert_eq!(outcome, GenerationOutcome::Success(String::new()));
        assert_eq!(client.cursor(), 0);
        assert_eq!(client.current_model(), Some("A"));
    }

    #[tokio::test]
    async fn test_exhaustion_after_at_most_pool_len_attempts() {
        let backend = ScriptedBackend::new(vec![
            Err(GenerationFailure::Quota),
            Err(GenerationFailure::Quota),
            Err(GenerationFailure::Quota),
        ]);
        let mut client = FailoverClient::new(backend, pool(&["A", "B", "C"]));

        let outcome = client.generate("prompt").await;
        assert_eq!(outcome, GenerationOutcome::PoolExhausted);
        assert!(client.is_exhausted());
        assert_eq!(client.backend.calls().len(), 3);

        // 耗尽后不再发起任何原始调用
        let outcome = client.generate("prompt").await;
        assert_eq!(outcome, GenerationOutcome::PoolExhausted);
        assert_eq!(client.backend.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_single_model_pool_exhausts_immediately() {
        // 字面场景：池只有 A，A 配额耗尽 → 本次及之后的调用都返回耗尽
        let backend = ScriptedBackend::new(vec![Err(GenerationFailure::Quota)]);
        let mut client = FailoverClient::new(backend, pool(&["A"]));

        assert_eq!(client.generate("p").await, GenerationOutcome::PoolExhausted);
        assert_eq!(client.generate("p").await, GenerationOutcome::PoolExhausted);
        assert_eq!(client.backend.calls(), vec!["A"]);
    }

    #[tokio::test]
    async fn test_empty_pool_is_exhausted_from_the_start() {
        let backend = ScriptedBackend::new(vec![]);
        let mut client = FailoverClient::new(backend, Vec::new());

        assert!(client.is_exhausted());
        assert_eq!(client.generate("p").await, GenerationOutcome::PoolExhausted);
        assert!(client.backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_mixed_failures_cursor_monotonic() {
        // quota → 前进；transient → 原地软失败；再次调用仍用同一模型
        let backend = ScriptedBackend::new(vec![
            Err(GenerationFailure::Quota),
            Err(GenerationFailure::Transient("oops".to_string())),
            Ok("ok".to_string()),
        ]);
        let mut client = FailoverClient::new(backend, pool(&["A", "B"]));

        assert_eq!(
            client.generate("p1").await,
            GenerationOutcome::Success(String::new())
        );
        assert_eq!(client.cursor(), 1);

        assert_eq!(
            client.generate("p2").await,
            GenerationOutcome::Success("ok".to_string())
        );
        assert_eq!(client.cursor(), 1);
        assert_eq!(client.backend.calls(), vec!["A", "B", "B"]);
    }
}
