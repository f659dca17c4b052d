pub mod config;
pub mod file_utils;
pub mod image;
pub mod theme;
pub mod types;

pub use config::*;
pub use file_utils::*;
pub use image::*;
pub use theme::*;
pub use types::*;
