//! Prompt loader for YAML prompt definitions.
//!
//! Workspace files under `.hrdesk/prompts/<id>.yml` take precedence over the
//! definitions compiled into the crate.

use crate::types::PromptDefinition;
use hrdesk_core::{AppError, AppResult};
use std::path::Path;

/// Identifier of the grounded answer prompt.
pub const ANSWER_PROMPT_ID: &str = "hrdesk.answer.default";

const BUILTIN_ANSWER_PROMPT: &str = include_str!("../prompts/hrdesk.answer.default.yml");

/// The built-in answer prompt.
pub fn default_answer_prompt() -> AppResult<PromptDefinition> {
    parse_prompt(BUILTIN_ANSWER_PROMPT, ANSWER_PROMPT_ID)
}

/// Load a prompt definition by ID from the workspace.
///
/// # Arguments
/// * `workspace_path` - Root workspace directory containing `.hrdesk/`
/// * `prompt_id` - Prompt identifier (e.g., "hrdesk.answer.default")
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = workspace_path
        .join(".hrdesk/prompts")
        .join(format!("{}.yml", prompt_id));

    tracing::debug!("Loading prompt from: {:?}", prompt_file);

    if !prompt_file.exists() {
        return Err(AppError::Prompt(format!(
            "Prompt file not found: {:?}",
            prompt_file
        )));
    }

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition = parse_prompt(&contents, &prompt_file.display().to_string())?;

    tracing::info!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// Load the workspace override for `prompt_id`, falling back to the built-in
/// answer prompt when the workspace has none.
pub fn resolve_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let has_override = list_prompts(workspace_path)?
        .iter()
        .any(|id| id == prompt_id);

    if has_override {
        load_prompt(workspace_path, prompt_id)
    } else if prompt_id == ANSWER_PROMPT_ID {
        default_answer_prompt()
    } else {
        Err(AppError::Prompt(format!("Unknown prompt: {}", prompt_id)))
    }
}

/// List all prompt IDs available in the workspace.
pub fn list_prompts(workspace_path: &Path) -> AppResult<Vec<String>> {
    let prompts_dir = workspace_path.join(".hrdesk/prompts");

    if !prompts_dir.exists() {
        return Ok(Vec::new());
    }

    let mut prompt_ids = Vec::new();

    for entry in walkdir::WalkDir::new(&prompts_dir)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("yml") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                prompt_ids.push(stem.to_string());
            }
        }
    }

    Ok(prompt_ids)
}

fn parse_prompt(contents: &str, origin: &str) -> AppResult<PromptDefinition> {
    let definition: PromptDefinition = serde_yaml::from_str(contents)
        .map_err(|e| AppError::Prompt(format!("Failed to parse prompt YAML {}: {}", origin, e)))?;

    validate_prompt(&definition)?;
    Ok(definition)
}

fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    Ok(())
}
