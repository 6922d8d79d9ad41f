//! LLM provider routing, retry and response cleanup.

pub mod fence;
pub mod retry;
pub mod router;

pub use fence::strip_code_fence;
pub use router::{
    CompletionModel, LlmCompletion, LlmError, LlmProviderError, LlmRouter, Provider,
    ProviderSelection,
};
