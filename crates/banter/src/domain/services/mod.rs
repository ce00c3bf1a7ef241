//! Domain Services
//!
//! Stateless domain logic shared by the application layer.

pub mod code_blocks;
pub mod model_search;
pub mod title;

pub use code_blocks::render_code_blocks;
pub use model_search::ModelSearch;
pub use title::{fallback_title, normalize_title, TITLE_INSTRUCTION};
