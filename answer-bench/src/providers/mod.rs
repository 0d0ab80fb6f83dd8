//! LLM Provider implementations

pub mod lmstudio;
pub mod traits;

pub use lmstudio::LmStudioClient;
pub use traits::{
    CompletionRequest, CompletionResponse, LLMProvider, Message, ModelInfo, ProviderError,
    ProviderResult,
};
