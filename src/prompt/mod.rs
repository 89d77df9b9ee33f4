mod builder;
mod engine;

pub use builder::{assemble_research_context, build_drafting_prompt, drafting_engine};
pub use engine::TeraEngine;
