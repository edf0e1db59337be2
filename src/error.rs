use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 配置错误
    Config(ConfigError),
    /// 文件操作错误
    File(FileError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::File(e) => write!(f, "文件错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(e) => Some(e),
            AppError::File(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// API 密钥缺失（启动前致命错误，不允许发起任何调用）
    MissingCredential {
        var_name: String,
    },
    /// 模型池为空
    EmptyModelPool,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingCredential { var_name } => {
                write!(f, "环境变量 {} 未设置，无法调用生成服务", var_name)
            }
            ConfigError::EmptyModelPool => write!(f, "模型池不能为空"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// 文件操作错误
#[derive(Debug)]
pub enum FileError {
    /// 文件不存在
    NotFound {
        path: String,
    },
    /// 读取文件失败
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// JSON 解析失败
    JsonParseFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 目录不存在
    DirectoryNotFound {
        path: String,
    },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::NotFound { path } => write!(f, "文件不存在: {}", path),
            FileError::ReadFailed { path, source } => {
                write!(f, "读取文件失败 ({}): {}", path, source)
            }
            FileError::WriteFailed { path, source } => {
                write!(f, "写入文件失败 ({}): {}", path, source)
            }
            FileError::JsonParseFailed { path, source } => {
                write!(f, "JSON解析失败 ({}): {}", path, source)
            }
            FileError::DirectoryNotFound { path } => write!(f, "目录不存在: {}", path),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::ReadFailed { source, .. }
            | FileError::WriteFailed { source, .. }
            | FileError::JsonParseFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 生成调用失败的分类
///
/// 失败分类决定故障转移行为：
/// - `Quota` / `Retired` 是后端级别的问题，本次运行内不会恢复，
///   触发模型池游标前进；
/// - `Transient` 是单次调用级别的问题（网络抖动、响应格式异常等），
///   不影响模型选择，本条记录留到下次运行再试。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationFailure {
    /// 配额/频率限制（HTTP 429 等）
    Quota,
    /// 模型已下线或不存在（HTTP 404 等）
    Retired,
    /// 其他瞬时错误
    Transient(String),
}

impl fmt::Display for GenerationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationFailure::Quota => write!(f, "配额已用尽"),
            GenerationFailure::Retired => write!(f, "模型已下线"),
            GenerationFailure::Transient(msg) => write!(f, "瞬时错误: {}", msg),
        }
    }
}

fn quota_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b429\b|RESOURCE_EXHAUSTED|rate.?limit|quota").expect("合法的正则表达式")
    })
}

fn retired_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b404\b|NOT_FOUND|deprecated|retired|no longer available")
            .expect("合法的正则表达式")
    })
}

/// 根据错误消息对生成调用失败进行分类
///
/// 匹配签名与 Gemini API 的报错文本对应：429/RESOURCE_EXHAUSTED 表示配额，
/// 404/NOT_FOUND 表示模型下线，其余一律视为瞬时错误。
pub fn classify_failure(message: &str) -> GenerationFailure {
    if quota_pattern().is_match(message) {
        GenerationFailure::Quota
    } else if retired_pattern().is_match(message) {
        GenerationFailure::Retired
    } else {
        GenerationFailure::Transient(message.to_string())
    }
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::File(FileError::JsonParseFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建 API 密钥缺失错误
    pub fn missing_credential(var_name: impl Into<String>) -> Self {
        AppError::Config(ConfigError::MissingCredential {
            var_name: var_name.into(),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建 JSON 解析错误
    pub fn json_parse_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::JsonParseFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_quota_signatures() {
        assert_eq!(
            classify_failure("HTTP status 429: Too Many Requests"),
            GenerationFailure::Quota
        );
        assert_eq!(
            classify_failure("RESOURCE_EXHAUSTED: Quota exceeded for model"),
            GenerationFailure::Quota
        );
        assert_eq!(
            classify_failure("rate limit reached, retry later"),
            GenerationFailure::Quota
        );
    }

    #[test]
    fn test_classify_retired_signatures() {
        assert_eq!(
            classify_failure("HTTP 404 Not Found: model does not exist"),
            GenerationFailure::Retired
        );
        assert_eq!(
            classify_failure("NOT_FOUND: models/gemini-1.0-pro is not found"),
            GenerationFailure::Retired
        );
        assert_eq!(
            classify_failure("model has been deprecated"),
            GenerationFailure::Retired
        );
    }

    #[test]
    fn test_classify_transient_fallback() {
        let failure = classify_failure("connection reset by peer");
        assert!(matches!(failure, GenerationFailure::Transient(_)));

        // 数字必须是独立的 token，避免误伤普通文本
        let failure = classify_failure("request id 14290 failed with unknown error");
        assert!(matches!(failure, GenerationFailure::Transient(_)));
    }
}
