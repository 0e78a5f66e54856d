mod runner;
mod state;

pub use runner::SpritesheetPipeline;
pub use state::PipelineState;
