pub mod json_loader;

pub use json_loader::{find_category_files, load_entries, save_entries};
