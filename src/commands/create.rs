use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, connect};
use crate::cli::OutputOptions;
use crate::controller::ListController;
use crate::error::Result;
use crate::types::IssueDraft;

/// Form values for `create`. Unset selects keep the blank form's defaults.
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    pub title: String,
    pub description: String,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assignee: Option<String>,
}

impl CreateOptions {
    pub fn to_draft(&self) -> IssueDraft {
        let mut draft = IssueDraft::blank()
            .title(&self.title)
            .description(&self.description);
        if let Some(status) = &self.status {
            draft = draft.status(status);
        }
        if let Some(priority) = &self.priority {
            draft = draft.priority(priority);
        }
        if let Some(assignee) = &self.assignee {
            draft = draft.assignee(assignee);
        }
        draft
    }
}

/// Create a new issue
pub async fn cmd_create(options: CreateOptions, output: OutputOptions) -> Result<()> {
    let mut controller = ListController::new(connect()?);
    controller.open_create();
    let issue = controller.submit(&options.to_draft()).await?;

    let text = format!(
        "Created issue {}: {}",
        format!("#{}", issue.id).cyan(),
        issue.title
    );
    CommandOutput::new(json!({
        "action": "created",
        "issue": issue,
    }))
    .with_text(text)
    .print(output)
}
