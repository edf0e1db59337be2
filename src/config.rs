/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// Gemini API 密钥（为空视为未配置，启动时报错）
    pub api_key: String,
    /// OpenAI 兼容接口的基础 URL
    pub api_base_url: String,
    /// 模型池，按优先级排列（最新/最强的在前）
    pub model_pool: Vec<String>,
    /// 数据文件存放目录
    pub data_folder: String,
    /// 相邻两次生成调用之间的间隔（秒），防止触发每分钟限频
    pub request_delay_secs: u64,
    /// 每新生成多少条关键词后保存一次进度
    pub checkpoint_interval: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            model_pool: vec![
                "gemini-3.1-pro".to_string(),
                "gemini-3.0-flash".to_string(),
                "gemini-3.0-pro".to_string(),
                "gemini-2.5-flash".to_string(),
                "gemini-2.5-pro".to_string(),
                "gemini-2.0-flash".to_string(),
            ],
            data_folder: "data".to_string(),
            request_delay_secs: 2,
            checkpoint_interval: 10,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_key: std::env::var("GEMINI_API_KEY").unwrap_or(default.api_key),
            api_base_url: std::env::var("GEMINI_API_BASE_URL").unwrap_or(default.api_base_url),
            model_pool: std::env::var("MODEL_POOL")
                .ok()
                .map(|v| parse_model_pool(&v))
                .filter(|pool| !pool.is_empty())
                .unwrap_or(default.model_pool),
            data_folder: std::env::var("DATA_FOLDER").unwrap_or(default.data_folder),
            request_delay_secs: std::env::var("REQUEST_DELAY_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_delay_secs),
            checkpoint_interval: std::env::var("CHECKPOINT_INTERVAL").ok().and_then(|v| v.parse().ok()).unwrap_or(default.checkpoint_interval),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }
}

/// 解析逗号分隔的模型池，忽略空白项
fn parse_model_pool(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
