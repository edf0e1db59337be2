pub mod prompt;

pub use prompt::keyword_prompt;
