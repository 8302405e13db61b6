//! Concrete [`LlmProvider`](crate::agent::provider::LlmProvider) backends.

mod openai;

pub use openai::OpenAiProvider;
