use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, connect};
use crate::cli::OutputOptions;
use crate::controller::ListController;
use crate::error::{DeskError, Result};
use crate::remote::IssueSource;
use crate::types::{IssueDraft, IssueId};

/// Fields to change; anything unset keeps the fetched value.
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assignee: Option<String>,
}

impl UpdateOptions {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.assignee.is_none()
    }

    /// Overlay the changes on a pre-filled form.
    pub fn apply_to(&self, mut draft: IssueDraft) -> IssueDraft {
        if let Some(title) = &self.title {
            draft = draft.title(title);
        }
        if let Some(description) = &self.description {
            draft = draft.description(description);
        }
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

/// Edit an existing issue
pub async fn cmd_update(id: IssueId, options: UpdateOptions, output: OutputOptions) -> Result<()> {
    if options.is_empty() {
        return Err(DeskError::Other(
            "nothing to update: pass at least one of --title, --description, --status, --priority, --assignee".to_string(),
        ));
    }

    let gateway = connect()?;
    let snapshot = gateway.fetch_issue(id).await?;

    let mut controller = ListController::new(gateway);
    let draft = options.apply_to(IssueDraft::from_issue(&snapshot));
    controller.open_edit(snapshot);
    let issue = controller.submit(&draft).await?;

    let text = format!(
        "Updated issue {}: {}",
        format!("#{}", issue.id).cyan(),
        issue.title
    );
    CommandOutput::new(json!({
        "action": "updated",
        "issue": issue,
    }))
    .with_text(text)
    .print(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Assignee, Issue, IssuePriority, IssueStatus};

    #[test]
    fn test_apply_keeps_unset_fields() {
        let issue = Issue {
            id: 7,
            title: "Optimize database query for reports".to_string(),
            description: "Too slow.".to_string(),
            status: IssueStatus::Done,
            priority: IssuePriority::High,
            assignee: Assignee::Frank,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        };
        let options = UpdateOptions {
            status: Some("Open".to_string()),
            ..UpdateOptions::default()
        };
        let payload = options
            .apply_to(IssueDraft::from_issue(&issue))
            .validate()
            .unwrap();
        assert_eq!(payload.status, IssueStatus::Open);
        assert_eq!(payload.title, issue.title);
        assert_eq!(payload.assignee, Assignee::Frank);
    }

    #[test]
    fn test_is_empty() {
        assert!(UpdateOptions::default().is_empty());
        assert!(
            !UpdateOptions {
                title: Some("x".into()),
                ..UpdateOptions::default()
            }
            .is_empty()
        );
    }
}
