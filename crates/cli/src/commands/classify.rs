//! Classify command handler.

use clap::Args;
use hrdesk_core::AppResult;
use hrdesk_knowledge::{classify, rewrite, Entities};

/// Show the intent and entities detected in a message
#[derive(Args, Debug)]
pub struct ClassifyCommand {
    /// The message to analyse
    pub message: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ClassifyCommand {
    pub fn execute(&self) -> AppResult<()> {
        let intent = classify(&self.message);
        let entities = Entities::extract(&self.message);
        let query = rewrite(&self.message);

        if self.json {
            let output = serde_json::json!({
                "intent": intent,
                "entities": entities,
                "rewrittenQuery": query,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        println!("Intent:   {}", intent);
        let fields = [
            ("employee", &entities.employee_name),
            ("location", &entities.employee_location),
            ("department", &entities.department),
            ("project", &entities.project_name),
            ("project location", &entities.project_location),
            ("client", &entities.client),
            ("code", &entities.project_code),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                println!("  {:<17} {}", format!("{}:", label), value);
            }
        }
        if entities.mentions_skill {
            println!("  skill keyword:    yes");
        }
        if query != self.message {
            println!("Query:    {}", query);
        }

        Ok(())
    }
}
