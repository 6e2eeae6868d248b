//! Sample issues for a fresh store.

use crate::types::{Assignee, IssuePayload, IssuePriority, IssueStatus};

type SeedRow = (
    &'static str,
    &'static str,
    IssueStatus,
    IssuePriority,
    Assignee,
);

const SEED: &[SeedRow] = &[
    (
        "Fix login button styling on mobile",
        "The login button is misaligned on screens smaller than 375px. Needs CSS adjustment.",
        IssueStatus::Open,
        IssuePriority::High,
        Assignee::Alice,
    ),
    (
        "Implement password reset functionality",
        "Users need a way to reset their password via email. This involves backend and frontend changes.",
        IssueStatus::InProgress,
        IssuePriority::High,
        Assignee::Bob,
    ),
    (
        "Update documentation for API endpoint v2",
        "The documentation for the new /api/v2/users endpoint is outdated. It needs to reflect the new response format.",
        IssueStatus::Open,
        IssuePriority::Medium,
        Assignee::Charlie,
    ),
    (
        "Refactor user authentication service",
        "The current authentication service is monolithic and hard to maintain. It should be broken down into smaller, testable units.",
        IssueStatus::Done,
        IssuePriority::Low,
        Assignee::Alice,
    ),
    (
        "Add loading spinners to data tables",
        "When data is being fetched for tables, a loading spinner should be displayed to improve user experience.",
        IssueStatus::InProgress,
        IssuePriority::Medium,
        Assignee::David,
    ),
    (
        "UI bug on the dashboard with dark mode",
        "The chart colors on the dashboard are not visible in dark mode.",
        IssueStatus::Open,
        IssuePriority::High,
        Assignee::Eve,
    ),
    (
        "Optimize database query for reports",
        "The quarterly report generation is too slow. The main SQL query needs optimization.",
        IssueStatus::Done,
        IssuePriority::High,
        Assignee::Frank,
    ),
    (
        "Add support for single sign-on (SSO)",
        "Integrate with an OAuth2 provider to allow users to sign in with their Google accounts.",
        IssueStatus::Open,
        IssuePriority::Medium,
        Assignee::Grace,
    ),
    (
        "Fix typo in the footer",
        "There is a spelling mistake in the copyright notice in the footer.",
        IssueStatus::Open,
        IssuePriority::Low,
        Assignee::Bob,
    ),
    (
        "Prepare for production release v1.2.0",
        "Create a release branch, update version numbers, and run final regression tests.",
        IssueStatus::InProgress,
        IssuePriority::High,
        Assignee::Heidi,
    ),
];

/// Payloads for the sample issues, in id order.
pub fn seed_payloads() -> impl Iterator<Item = IssuePayload> {
    SEED.iter()
        .map(|&(title, description, status, priority, assignee)| IssuePayload {
            title: title.to_string(),
            description: description.to_string(),
            status,
            priority,
            assignee,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_valid() {
        let payloads: Vec<_> = seed_payloads().collect();
        assert_eq!(payloads.len(), 10);
        assert!(payloads.iter().all(|p| p.validate().is_ok()));
        assert_eq!(payloads[6].title, "Optimize database query for reports");
        assert_eq!(payloads[6].status, IssueStatus::Done);
    }
}
