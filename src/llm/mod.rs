//! Model provider client used by the answer drafter.

mod compatible;
mod traits;

pub use compatible::OpenAiCompatibleClient;
pub use traits::ChatProvider;
