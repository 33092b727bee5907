//! Prompt builder for rendering templates.

use crate::types::{BuiltPrompt, BuiltPromptMetadata, PromptDefinition};
use hrdesk_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Build a prompt from a definition and input variables.
///
/// `tone` and `style` from the definition's behavior are added to the
/// variables unless the caller already set them. Both the system and the
/// user templates see the same variables.
///
/// # Example
/// ```no_run
/// use hrdesk_prompt::{build_prompt, default_answer_prompt};
/// use std::collections::HashMap;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let def = default_answer_prompt()?;
/// let mut vars = HashMap::new();
/// vars.insert("message".to_string(), "Who works on Portal Web?".to_string());
/// vars.insert("context".to_string(), "Employee: Ana Pérez ...".to_string());
///
/// let built = build_prompt(&def, vars)?;
/// println!("User prompt: {}", built.user);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    mut variables: HashMap<String, String>,
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", definition.id);

    variables
        .entry("tone".to_string())
        .or_insert_with(|| definition.behavior.tone.clone());
    variables
        .entry("style".to_string())
        .or_insert_with(|| definition.behavior.style.clone());

    let system = if definition.system.trim().is_empty() {
        None
    } else {
        Some(render_template(&definition.system, &variables)?)
    };
    let user = render_template(&definition.template, &variables)?;

    Ok(BuiltPrompt {
        system,
        user,
        metadata: BuiltPromptMetadata {
            source_prompt_id: definition.id.clone(),
            resolved_variables: variables,
        },
    })
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text output: employee names and salaries must not be HTML-escaped.
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", &variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}
