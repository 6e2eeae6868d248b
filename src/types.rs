use serde::{Deserialize, Serialize};

use crate::error::{DeskError, RequestError};

pub const CONFIG_DIR: &str = ".issuedesk";

/// Identity of an issue, assigned by the collection.
pub type IssueId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum IssueStatus {
    #[default]
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
}

enum_display_fromstr!(
    IssueStatus,
    DeskError::InvalidStatus,
    {
        Open => "Open",
        InProgress => "In Progress",
        Done => "Done",
    }
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum IssuePriority {
    #[default]
    Low,
    Medium,
    High,
}

enum_display_fromstr!(
    IssuePriority,
    DeskError::InvalidPriority,
    {
        Low => "Low",
        Medium => "Medium",
        High => "High",
    }
);

impl IssuePriority {
    /// Rank used when sorting by priority: High first when ascending.
    pub fn rank(self) -> u8 {
        match self {
            IssuePriority::High => 0,
            IssuePriority::Medium => 1,
            IssuePriority::Low => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Assignee {
    #[default]
    Alice,
    Bob,
    Charlie,
    David,
    Eve,
    Frank,
    Grace,
    Heidi,
}

enum_display_fromstr!(
    Assignee,
    DeskError::InvalidAssignee,
    {
        Alice => "Alice",
        Bob => "Bob",
        Charlie => "Charlie",
        David => "David",
        Eve => "Eve",
        Frank => "Frank",
        Grace => "Grace",
        Heidi => "Heidi",
    }
);

/// Read snapshot of an issue as served by the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: IssueId,
    pub title: String,
    pub description: String,
    pub status: IssueStatus,
    pub priority: IssuePriority,
    pub assignee: Assignee,
    /// ISO 8601
    pub created_at: String,
    /// ISO 8601, changes on every mutation
    pub updated_at: String,
}

/// Validated body of a create or update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuePayload {
    pub title: String,
    pub description: String,
    pub status: IssueStatus,
    pub priority: IssuePriority,
    pub assignee: Assignee,
}

impl IssuePayload {
    /// Check the non-empty text invariants.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.title.trim().is_empty() {
            return Err(RequestError::validation("title", "must not be empty"));
        }
        if self.description.trim().is_empty() {
            return Err(RequestError::validation("description", "must not be empty"));
        }
        Ok(())
    }
}

/// Raw form values, as typed by the operator.
///
/// Nothing here is trusted until [`IssueDraft::validate`] turns it into an
/// [`IssuePayload`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueDraft {
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub assignee: String,
}

impl IssueDraft {
    /// A blank create form, with each select preset to the first value of its domain.
    pub fn blank() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            status: IssueStatus::ALL[0].to_string(),
            priority: IssuePriority::ALL[0].to_string(),
            assignee: Assignee::ALL[0].to_string(),
        }
    }

    /// An edit form pre-filled from the snapshot being edited.
    pub fn from_issue(issue: &Issue) -> Self {
        Self {
            title: issue.title.clone(),
            description: issue.description.clone(),
            status: issue.status.to_string(),
            priority: issue.priority.to_string(),
            assignee: issue.assignee.to_string(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    pub fn assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = assignee.into();
        self
    }

    /// Turn the form into a payload, or say which field is wrong.
    pub fn validate(&self) -> Result<IssuePayload, RequestError> {
        let status = self
            .status
            .parse::<IssueStatus>()
            .map_err(|e| RequestError::validation("status", e.to_string()))?;
        let priority = self
            .priority
            .parse::<IssuePriority>()
            .map_err(|e| RequestError::validation("priority", e.to_string()))?;
        let assignee = self
            .assignee
            .parse::<Assignee>()
            .map_err(|e| RequestError::validation("assignee", e.to_string()))?;

        let payload = IssuePayload {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            status,
            priority,
            assignee,
        };
        payload.validate()?;
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_issue() -> Issue {
        Issue {
            id: 7,
            title: "Optimize database query for reports".to_string(),
            description: "The quarterly report generation is too slow.".to_string(),
            status: IssueStatus::Done,
            priority: IssuePriority::High,
            assignee: Assignee::Frank,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-02T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_status_wire_values() {
        assert_eq!(
            serde_json::to_string(&IssueStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
        assert_eq!(
            serde_json::from_str::<IssueStatus>("\"Done\"").unwrap(),
            IssueStatus::Done
        );
        assert_eq!(IssueStatus::InProgress.to_string(), "In Progress");
        assert_eq!(
            "in progress".parse::<IssueStatus>().unwrap(),
            IssueStatus::InProgress
        );
    }

    #[test]
    fn test_invalid_enum_text() {
        assert!(matches!(
            "Blocked".parse::<IssueStatus>(),
            Err(DeskError::InvalidStatus(_))
        ));
        assert!(matches!(
            "Urgent".parse::<IssuePriority>(),
            Err(DeskError::InvalidPriority(_))
        ));
        assert!(matches!(
            "Mallory".parse::<Assignee>(),
            Err(DeskError::InvalidAssignee(_))
        ));
    }

    #[test]
    fn test_priority_rank_orders_high_first() {
        let mut all = IssuePriority::ALL.to_vec();
        all.sort_by_key(|p| p.rank());
        assert_eq!(
            all,
            vec![IssuePriority::High, IssuePriority::Medium, IssuePriority::Low]
        );
    }

    #[test]
    fn test_issue_json_shape() {
        let json = serde_json::to_value(sample_issue()).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["status"], "Done");
        assert_eq!(json["assignee"], "Frank");
        assert_eq!(json["createdAt"], "2024-01-01T00:00:00Z");
        assert_eq!(json["updatedAt"], "2024-01-02T00:00:00Z");
    }

    #[test]
    fn test_blank_draft_defaults() {
        let draft = IssueDraft::blank();
        assert_eq!(draft.status, "Open");
        assert_eq!(draft.priority, "Low");
        assert_eq!(draft.assignee, "Alice");
    }

    #[test]
    fn test_draft_validates_into_payload() {
        let payload = IssueDraft::blank()
            .title("  Fix typo  ")
            .description("Footer copyright")
            .status("Done")
            .validate()
            .unwrap();
        assert_eq!(payload.title, "Fix typo");
        assert_eq!(payload.status, IssueStatus::Done);
        assert_eq!(payload.assignee, Assignee::Alice);
    }

    #[test]
    fn test_draft_rejects_empty_title() {
        let err = IssueDraft::blank()
            .title("   ")
            .description("something")
            .validate()
            .unwrap_err();
        assert_eq!(err, RequestError::validation("title", "must not be empty"));
    }

    #[test]
    fn test_draft_rejects_empty_description() {
        let err = IssueDraft::blank().title("x").validate().unwrap_err();
        assert!(matches!(
            err,
            RequestError::Validation {
                field: "description",
                ..
            }
        ));
    }

    #[test]
    fn test_draft_rejects_unknown_assignee() {
        let err = IssueDraft::blank()
            .title("x")
            .description("y")
            .assignee("Mallory")
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            RequestError::Validation {
                field: "assignee",
                ..
            }
        ));
    }

    #[test]
    fn test_edit_draft_prefilled_from_snapshot() {
        let issue = sample_issue();
        let payload = IssueDraft::from_issue(&issue).validate().unwrap();
        assert_eq!(payload.title, issue.title);
        assert_eq!(payload.status, IssueStatus::Done);
        assert_eq!(payload.priority, IssuePriority::High);
        assert_eq!(payload.assignee, Assignee::Frank);
    }
}
