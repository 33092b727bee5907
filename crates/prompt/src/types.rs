//! Prompt types for HR Desk.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A prompt definition loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    #[serde(rename = "createdBy", default)]
    pub created_by: String,

    pub behavior: PromptBehavior,

    /// System message template (persona and grounding rules)
    #[serde(default)]
    pub system: String,

    /// User message template with Handlebars syntax
    pub template: String,

    pub output: PromptOutputSpec,
}

/// Behavioral settings, exposed to both templates as `tone` and `style`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptBehavior {
    pub tone: String,
    pub style: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptOutputSpec {
    /// Output format (e.g., "text", "markdown")
    pub format: String,
}

/// A fully built prompt ready for generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// Rendered system message; `None` when the definition has none
    pub system: Option<String>,

    /// Rendered user message
    pub user: String,

    pub metadata: BuiltPromptMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    #[serde(rename = "sourcePromptId")]
    pub source_prompt_id: String,

    /// Template variables that were resolved
    #[serde(rename = "resolvedVariables")]
    pub resolved_variables: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_definition_deserialization() {
        let yaml = r#"
id: test.prompt
title: Test Prompt
apiVersion: "1.0"
createdBy: test
behavior:
  tone: professional
  style: concise
system: "Use only the context."
template: "{{context}} / {{message}}"
output:
  format: text
"#;

        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.id, "test.prompt");
        assert_eq!(def.behavior.tone, "professional");
        assert_eq!(def.system, "Use only the context.");
    }

    #[test]
    fn test_system_is_optional() {
        let yaml = r#"
id: bare
title: Bare
apiVersion: "1.0"
behavior: { tone: neutral, style: brief }
template: "{{message}}"
output: { format: text }
"#;
        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert!(def.system.is_empty());
        assert!(def.created_by.is_empty());
    }
}
