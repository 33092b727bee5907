//! Prompt definitions for HR Desk.
//!
//! - YAML-based prompt definitions with a system and a user template
//! - Handlebars rendering without HTML escaping
//! - A built-in grounded answer prompt, overridable per workspace

pub mod builder;
pub mod loader;
pub mod types;

pub use builder::build_prompt;
pub use loader::{
    default_answer_prompt, list_prompts, load_prompt, resolve_prompt, ANSWER_PROMPT_ID,
};
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptBehavior, PromptDefinition, PromptOutputSpec};
