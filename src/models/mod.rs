pub mod entry;
pub mod loaders;

pub use entry::TranslationEntry;
pub use loaders::{find_category_files, load_entries, save_entries};
