mod format;
mod json;

pub use format::compress_png;
pub use json::write_metadata;
