pub mod config;
pub mod document;
pub mod item;
pub mod project;
pub mod tree;

pub use config::*;
pub use document::*;
pub use item::*;
pub use project::*;
pub use tree::*;
