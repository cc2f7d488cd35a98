pub mod category;
pub mod config;
pub mod errors;
pub mod extract;
pub mod feedback;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod prompt;
pub mod providers;
pub mod score;
pub mod session;

pub use model::{Evaluation, GenerationRequest, GradeOutcome};
pub use pipeline::{GradingPipeline, PipelineOptions};
