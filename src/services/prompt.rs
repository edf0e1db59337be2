//! 提示词构造 - 业务能力层
//!
//! 只负责把一条记录的日语/英语短语拼成生成服务的请求文本，
//! 引擎其余部分把提示词当作不透明字符串。

/// 为一条对译记录构造关键词生成提示词
///
/// 要求模型只返回逗号分隔的关键词列表，便于直接写回 `keywords` 字段。
pub fn keyword_prompt(jp: &str, en: &str) -> String {
    format!(
        "Provide 8-10 search keywords for JP: '{}' and EN: '{}'. \
         Return ONLY a comma-separated list.",
        jp, en
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_prompt_contains_both_phrases() {
        let prompt = keyword_prompt("お会計お願いします", "Check, please");
        assert!(prompt.contains("お会計お願いします"));
        assert!(prompt.contains("Check, please"));
        assert!(prompt.contains("comma-separated"));
    }
}
