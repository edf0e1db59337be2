//! Gemini 生成后端
//!
//! 走 Gemini 的 OpenAI 兼容接口（chat completions），使用 `async-openai`
//! crate 发起调用。模型名由故障转移客户端逐次传入，本模块不关心
//! 模型选择，只负责单次调用和失败分类。

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::debug;

use crate::clients::failover_client::GenerationBackend;
use crate::config::Config;
use crate::error::{classify_failure, GenerationFailure};

/// Gemini API 客户端
#[derive(Debug)]
pub struct GeminiBackend {
    client: Client<OpenAIConfig>,
    api_key: String,
    api_base_url: String,
}

impl GeminiBackend {
    /// 创建新的 Gemini 后端
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.api_key)
            .with_api_base(&config.api_base_url);

        Self {
            client: Client::with_config(openai_config),
            api_key: config.api_key.clone(),
            api_base_url: config.api_base_url.clone(),
        }
    }

    /// 查询当前可用的模型列表
    ///
    /// 走 OpenAI 兼容接口的 GET /models；仅用于启动时的参考输出，
    /// 失败不影响后续处理。
    pub async fn list_models(&self) -> anyhow::Result<Vec<String>> {
        let url = format!("{}/models", self.api_base_url.trim_end_matches('/'));

        let response: serde_json::Value = reqwest::Client::new()
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("查询模型列表失败: {}", e))?
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("模型列表响应解析失败: {}", e))?;

        let models = response
            .get("data")
            .and_then(|v| v.as_array())
            .map(|models| {
                models
                    .iter()
                    .filter_map(|m| m.get("id").and_then(|id| id.as_str()))
                    .map(|id| id.to_string())
                    .collect()
            })
            .unwrap_or_default();

        Ok(models)
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerationFailure> {
        debug!("调用生成 API，模型: {}", model);

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| GenerationFailure::Transient(e.to_string()))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .build()
            .map_err(|e| GenerationFailure::Transient(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| classify_failure(&e.to_string()))?;

        debug!("生成 API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| GenerationFailure::Transient("生成结果为空".to_string()))?;

        Ok(content.trim().to_string())
    }
}
