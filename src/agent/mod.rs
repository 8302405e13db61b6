//! Multi-provider question answering.
//!
//! Retrieves evidence, formats it as context, and asks every configured
//! provider for an answer, falling back across each provider's models.
//!
//! # Architecture
//!
//! ```text
//! User query → SearchAgent
//!   ├── RetrievalClient (papers ∥ articles, failures → empty lists)
//!   ├── format_context → prompt
//!   ├── Fan-out → one task per active provider
//!   │   └── model[0] → model[1] → … until a non-empty answer
//!   └── AnswerMap merged in provider order → QueryResult
//! ```

pub mod answer;
pub mod client;
pub mod completion;
pub mod config;
pub mod credentials;
pub mod message;
pub mod orchestrator;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod result;

// Re-export key types
pub use answer::{AnswerMap, ProviderAnswer};
pub use completion::{CompletionOrchestrator, ProviderSlot};
pub use config::{AgentConfig, AgentConfigBuilder, credentials_from_env};
pub use credentials::{CredentialStore, ProviderId};
pub use message::{ChatRequest, ChatResponse, TokenUsage};
pub use orchestrator::SearchAgent;
pub use prompt::{build_prompt, format_context};
pub use provider::LlmProvider;
pub use result::QueryResult;
