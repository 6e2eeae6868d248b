//! Terminal rendering for issues and list views.

use owo_colors::OwoColorize;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::controller::{ListView, Notice, NoticeLevel, SyncStatus};
use crate::query::{SortColumn, SortDirection, SortSpec};
use crate::types::{Issue, IssuePriority, IssueStatus};

pub fn format_status_colored(status: IssueStatus) -> String {
    let badge = format!("[{status}]");
    match status {
        IssueStatus::Open => badge.yellow().to_string(),
        IssueStatus::InProgress => badge.cyan().to_string(),
        IssueStatus::Done => badge.green().to_string(),
    }
}

pub fn format_priority_colored(priority: IssuePriority) -> String {
    let text = priority.to_string();
    match priority {
        IssuePriority::High => text.red().to_string(),
        IssuePriority::Medium => text.yellow().to_string(),
        IssuePriority::Low => text.dimmed().to_string(),
    }
}

/// Arrow shown next to the sorted column header.
pub fn sort_marker(spec: SortSpec, column: SortColumn) -> &'static str {
    match (spec.column == column, spec.direction) {
        (false, _) => "",
        (true, SortDirection::Asc) => " ^",
        (true, SortDirection::Desc) => " v",
    }
}

pub fn format_notice(notice: &Notice) -> String {
    match notice.level {
        NoticeLevel::Success => notice.message.green().to_string(),
        NoticeLevel::Error => notice.message.red().to_string(),
    }
}

const COLUMNS: [(SortColumn, &str); 6] = [
    (SortColumn::Id, "ID"),
    (SortColumn::Title, "Title"),
    (SortColumn::Status, "Status"),
    (SortColumn::Priority, "Priority"),
    (SortColumn::Assignee, "Assignee"),
    (SortColumn::UpdatedAt, "Updated"),
];

/// Render a page of issues as a table. The sorted column's header carries
/// the direction marker.
///
/// Cells are plain text: table widths are computed on raw characters.
pub fn issue_table(items: &[Issue], sort: SortSpec) -> String {
    let mut builder = Builder::default();
    builder.push_record(
        COLUMNS
            .iter()
            .map(|(column, label)| format!("{label}{}", sort_marker(sort, *column))),
    );
    for issue in items {
        builder.push_record([
            issue.id.to_string(),
            issue.title.clone(),
            issue.status.to_string(),
            issue.priority.to_string(),
            issue.assignee.to_string(),
            short_timestamp(&issue.updated_at),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

/// `2024-05-01T10:11:12.123456789Z` -> `2024-05-01 10:11`
pub fn short_timestamp(ts: &str) -> String {
    match ts.parse::<jiff::Timestamp>() {
        Ok(parsed) => parsed.strftime("%Y-%m-%d %H:%M").to_string(),
        Err(_) => ts.to_string(),
    }
}

/// Everything below the table: range, page counter, filters, status line.
pub fn list_footer(view: &ListView) -> String {
    let mut out = format!(
        "{}  {}",
        view.range,
        format!("Page {} of {}", view.page, view.total_pages).dimmed()
    );

    let mut filters = Vec::new();
    if !view.search_term.is_empty() {
        filters.push(format!("search \"{}\"", view.search_term));
    }
    if let Some(status) = view.status_filter.value() {
        filters.push(format!("status={status}"));
    }
    if let Some(priority) = view.priority_filter.value() {
        filters.push(format!("priority={priority}"));
    }
    if let Some(assignee) = view.assignee_filter.value() {
        filters.push(format!("assignee={assignee}"));
    }
    if !filters.is_empty() {
        out.push_str(&format!("\n{} {}", "Filters:".dimmed(), filters.join(", ")));
    }

    if let Some(err) = &view.last_error {
        out.push_str(&format!(
            "\n{} {err}",
            "Failed to load issues:".red().bold()
        ));
    }
    if let Some(notice) = &view.notice {
        out.push_str(&format!("\n{}", format_notice(notice)));
    }
    out
}

/// Full list rendering.
pub fn render_list(view: &ListView) -> String {
    let body = if view.items.is_empty() {
        "No issues found.".dimmed().to_string()
    } else {
        issue_table(&view.items, view.sort)
    };
    format!("{body}\n{}", list_footer(view))
}

pub fn status_label(status: SyncStatus) -> &'static str {
    match status {
        SyncStatus::Idle => "idle",
        SyncStatus::Fetching => "loading",
        SyncStatus::Error => "error",
    }
}

/// Detail block for a single issue.
pub fn format_issue_detail(issue: &Issue) -> String {
    format!(
        "{} {}\n{}\n\n{} {}  {} {}  {} {}\n{} {}\n{} {}",
        format!("#{}", issue.id).cyan(),
        issue.title.bold(),
        issue.description,
        "Status:".dimmed(),
        format_status_colored(issue.status),
        "Priority:".dimmed(),
        format_priority_colored(issue.priority),
        "Assignee:".dimmed(),
        issue.assignee,
        "Created:".dimmed(),
        short_timestamp(&issue.created_at),
        "Updated:".dimmed(),
        short_timestamp(&issue.updated_at),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Assignee;

    fn issue() -> Issue {
        Issue {
            id: 3,
            title: "Update documentation for API endpoint v2".to_string(),
            description: "Outdated response format.".to_string(),
            status: IssueStatus::Open,
            priority: IssuePriority::Medium,
            assignee: Assignee::Charlie,
            created_at: "2024-05-01T10:11:12.5Z".to_string(),
            updated_at: "2024-05-02T08:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_sort_marker() {
        let spec = SortSpec::new(SortColumn::Title, SortDirection::Asc);
        assert_eq!(sort_marker(spec, SortColumn::Title), " ^");
        assert_eq!(sort_marker(spec, SortColumn::Id), "");
        assert_eq!(sort_marker(spec.toggled(SortColumn::Title), SortColumn::Title), " v");
    }

    #[test]
    fn test_short_timestamp() {
        assert_eq!(short_timestamp("2024-05-01T10:11:12.5Z"), "2024-05-01 10:11");
        assert_eq!(short_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn test_issue_table_marks_sorted_header() {
        let table = issue_table(
            &[issue()],
            SortSpec::new(SortColumn::Priority, SortDirection::Desc),
        );
        assert!(table.contains("Priority v"));
        assert!(table.contains("Update documentation"));
    }

    #[test]
    fn test_detail_contains_fields() {
        let detail = format_issue_detail(&issue());
        assert!(detail.contains("#3"));
        assert!(detail.contains("Charlie"));
        assert!(detail.contains("2024-05-02 08:00"));
    }
}
