mod load;
mod save;
mod types;

pub use load::LoadedConfig;
pub use save::{make_relative, save_config};
pub use types::{CompressConfig, IsoConfig};
