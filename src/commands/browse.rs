//! Line-oriented list session.
//!
//! Each input line is one command. Commands that change the selection go
//! through the list controller and re-render the page; `new` and `edit`
//! prompt for the form fields one line at a time.

use std::io::Write;

use owo_colors::OwoColorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use super::connect;
use crate::controller::{ListAction, ListController};
use crate::display::{format_issue_detail, format_notice, render_list, status_label};
use crate::error::Result;
use crate::query::{FilterChange, FilterDimension, SortColumn};
use crate::remote::{IssueSink, IssueSource};
use crate::types::{IssueDraft, IssueId};

const HELP: &str = "\
Commands:
  /TEXT                      search titles (a bare / clears the search)
  status|priority|assignee V filter by value, or `all` to clear
  sort COLUMN                sort by id, title, status, priority, assignee, updatedAt
  page N | next | prev       move between pages
  new                        open the create form
  edit ID                    open the edit form for an issue
  form                       re-enter the open form
  cancel                     close the open form
  show ID                    show one issue
  refresh                    fetch the current page again
  help                       this text
  quit                       leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Search(String),
    Filter(FilterChange),
    Sort(SortColumn),
    Page(i64),
    Next,
    Prev,
    New,
    Edit(IssueId),
    Form,
    Cancel,
    Show(IssueId),
    Refresh,
    Help,
    Quit,
}

impl BrowseCommand {
    /// Parse one input line. The error is a message for the operator.
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let line = line.trim();
        if let Some(text) = line.strip_prefix('/') {
            return Ok(BrowseCommand::Search(text.trim().to_string()));
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let word = word.to_ascii_lowercase();

        match word.as_str() {
            "status" | "priority" | "assignee" => {
                if rest.is_empty() {
                    return Err(format!("usage: {word} VALUE|all"));
                }
                let dimension = word
                    .parse::<FilterDimension>()
                    .map_err(|e| e.to_string())?;
                FilterChange::parse(dimension, rest)
                    .map(BrowseCommand::Filter)
                    .map_err(|e| e.to_string())
            }
            "sort" => rest
                .parse::<SortColumn>()
                .map(BrowseCommand::Sort)
                .map_err(|e| e.to_string()),
            "page" => rest
                .parse::<i64>()
                .map(BrowseCommand::Page)
                .map_err(|_| format!("not a page number: '{rest}'")),
            "next" | "n" => Ok(BrowseCommand::Next),
            "prev" | "p" => Ok(BrowseCommand::Prev),
            "new" => Ok(BrowseCommand::New),
            "edit" => parse_id(rest).map(BrowseCommand::Edit),
            "show" => parse_id(rest).map(BrowseCommand::Show),
            "form" => Ok(BrowseCommand::Form),
            "cancel" => Ok(BrowseCommand::Cancel),
            "refresh" | "r" => Ok(BrowseCommand::Refresh),
            "help" | "?" => Ok(BrowseCommand::Help),
            "quit" | "q" | "exit" => Ok(BrowseCommand::Quit),
            _ => Err(format!("Unknown command '{word}' (type `help`)")),
        }
    }
}

fn parse_id(text: &str) -> std::result::Result<IssueId, String> {
    text.parse()
        .map_err(|_| format!("not an issue id: '{text}'"))
}

/// Browse the configured API from the terminal
pub async fn cmd_browse() -> Result<()> {
    let mut controller = ListController::new(connect()?);
    let input = BufReader::new(tokio::io::stdin());
    let mut out = std::io::stdout();
    run_session(&mut controller, input, &mut out).await
}

/// Drive `controller` from `input` until `quit` or end of input.
pub async fn run_session<G, R, W>(
    controller: &mut ListController<G>,
    mut input: R,
    out: &mut W,
) -> Result<()>
where
    G: IssueSource + IssueSink,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    // Form values from the last failed submit, offered again by `form`.
    let mut retry: Option<IssueDraft> = None;

    list_action(controller, ListAction::Refresh, out).await?;

    loop {
        write!(
            out,
            "{} ",
            format!(
                "issuedesk [{}] {}/{}>",
                status_label(controller.status()),
                controller.query().page,
                controller.total_pages()
            )
            .dimmed()
        )?;
        out.flush()?;

        let Some(line) = read_line(&mut input).await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match BrowseCommand::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "{}", message.red())?;
                continue;
            }
        };

        match command {
            BrowseCommand::Quit => break,
            BrowseCommand::Help => writeln!(out, "{HELP}")?,
            BrowseCommand::Search(text) => {
                list_action(controller, ListAction::SetSearch(text), out).await?
            }
            BrowseCommand::Filter(change) => {
                list_action(controller, ListAction::SetFilter(change), out).await?
            }
            BrowseCommand::Sort(column) => {
                list_action(controller, ListAction::SetSort(column), out).await?
            }
            BrowseCommand::Page(page) => {
                list_action(controller, ListAction::SetPage(page), out).await?
            }
            BrowseCommand::Next => {
                let page = i64::from(controller.query().page) + 1;
                list_action(controller, ListAction::SetPage(page), out).await?
            }
            BrowseCommand::Prev => {
                let page = i64::from(controller.query().page) - 1;
                list_action(controller, ListAction::SetPage(page), out).await?
            }
            BrowseCommand::Refresh => list_action(controller, ListAction::Refresh, out).await?,
            BrowseCommand::New => {
                controller.open_create();
                retry = fill_and_submit(controller, None, &mut input, out).await?;
            }
            BrowseCommand::Edit(id) => match controller.gateway().fetch_issue(id).await {
                Ok(issue) => {
                    controller.open_edit(issue);
                    retry = fill_and_submit(controller, None, &mut input, out).await?;
                }
                Err(err) => writeln!(out, "{} {err}", "Failed to load issue:".red())?,
            },
            BrowseCommand::Form => {
                if controller.pending().is_some() {
                    retry = fill_and_submit(controller, retry.take(), &mut input, out).await?;
                } else {
                    writeln!(out, "No form is open (use `new` or `edit ID`).")?;
                }
            }
            BrowseCommand::Cancel => {
                controller.cancel_edit();
                retry = None;
                writeln!(out, "Form closed.")?;
            }
            BrowseCommand::Show(id) => match controller.gateway().fetch_issue(id).await {
                Ok(issue) => writeln!(out, "{}", format_issue_detail(&issue))?,
                Err(err) => writeln!(out, "{} {err}", "Failed to load issue:".red())?,
            },
        }
    }

    Ok(())
}

async fn list_action<G, W>(
    controller: &mut ListController<G>,
    action: ListAction,
    out: &mut W,
) -> Result<()>
where
    G: IssueSource + IssueSink,
    W: Write,
{
    controller.apply(action).await;
    writeln!(out, "{}", render_list(&controller.view()))?;
    Ok(())
}

/// Prompt for each field of the open form, then submit it.
///
/// Returns the typed values when the submit failed, so the form can be
/// re-entered without starting over.
async fn fill_and_submit<G, R, W>(
    controller: &mut ListController<G>,
    start: Option<IssueDraft>,
    input: &mut R,
    out: &mut W,
) -> Result<Option<IssueDraft>>
where
    G: IssueSource + IssueSink,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let Some(mut draft) = start.or_else(|| controller.draft()) else {
        return Ok(None);
    };

    writeln!(out, "{}", "Leave a field blank to keep [its value].".dimmed())?;
    let mut complete = true;
    {
        let IssueDraft {
            title,
            description,
            status,
            priority,
            assignee,
        } = &mut draft;
        let fields: [(&str, &mut String); 5] = [
            ("Title", title),
            ("Description", description),
            ("Status", status),
            ("Priority", priority),
            ("Assignee", assignee),
        ];
        for (label, value) in fields {
            write!(out, "{label} [{value}]: ")?;
            out.flush()?;
            let Some(line) = read_line(input).await? else {
                complete = false;
                break;
            };
            let line = line.trim();
            if !line.is_empty() {
                *value = line.to_string();
            }
        }
    }
    if !complete {
        writeln!(out)?;
        return Ok(Some(draft));
    }

    match controller.submit(&draft).await {
        Ok(_) => {
            writeln!(out, "{}", render_list(&controller.view()))?;
            Ok(None)
        }
        Err(_) => {
            if let Some(notice) = controller.notice() {
                writeln!(out, "{}", format_notice(notice))?;
            }
            writeln!(out, "Type `form` to try again or `cancel` to discard.")?;
            Ok(Some(draft))
        }
    }
}

async fn read_line<R: AsyncBufRead + Unpin>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::query::Filter;
    use crate::store::IssueStore;
    use crate::types::IssueStatus;

    async fn session(script: &str) -> (ListController<Arc<IssueStore>>, String) {
        let mut controller = ListController::new(Arc::new(IssueStore::seeded()));
        let mut out = Vec::new();
        run_session(&mut controller, script.as_bytes(), &mut out)
            .await
            .unwrap();
        (controller, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            BrowseCommand::parse("/login"),
            Ok(BrowseCommand::Search("login".to_string()))
        );
        assert_eq!(
            BrowseCommand::parse("/"),
            Ok(BrowseCommand::Search(String::new()))
        );
        assert_eq!(
            BrowseCommand::parse("status In Progress"),
            Ok(BrowseCommand::Filter(FilterChange::Status(Filter::Only(
                IssueStatus::InProgress
            ))))
        );
        assert_eq!(
            BrowseCommand::parse("assignee all"),
            Ok(BrowseCommand::Filter(FilterChange::Assignee(Filter::All)))
        );
        assert_eq!(
            BrowseCommand::parse("sort priority"),
            Ok(BrowseCommand::Sort(SortColumn::Priority))
        );
        assert_eq!(BrowseCommand::parse("page -3"), Ok(BrowseCommand::Page(-3)));
        assert_eq!(BrowseCommand::parse("edit 7"), Ok(BrowseCommand::Edit(7)));
        assert_eq!(BrowseCommand::parse("Q"), Ok(BrowseCommand::Quit));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(BrowseCommand::parse("status").is_err());
        assert!(BrowseCommand::parse("status Blocked").is_err());
        assert!(BrowseCommand::parse("sort weight").is_err());
        assert!(BrowseCommand::parse("page two").is_err());
        assert!(BrowseCommand::parse("edit seven").is_err());
        assert!(
            BrowseCommand::parse("frobnicate")
                .unwrap_err()
                .contains("Unknown command")
        );
    }

    #[tokio::test]
    async fn test_filter_resets_page_and_narrows_list() {
        let (controller, out) = session("next\nstatus Open\nquit\n").await;
        assert_eq!(
            controller.query().status_filter,
            Filter::Only(IssueStatus::Open)
        );
        assert_eq!(controller.query().page, 1);
        assert!(
            controller
                .page()
                .items
                .iter()
                .all(|issue| issue.status == IssueStatus::Open)
        );
        assert!(out.contains("Filters:"));
    }

    #[tokio::test]
    async fn test_page_request_is_clamped() {
        let (controller, out) = session("page 9\n").await;
        assert_eq!(controller.query().page, 2);
        assert!(out.contains("Page 2 of 2"));
    }

    #[tokio::test]
    async fn test_create_through_form() {
        let (controller, out) =
            session("new\nAdd CSV export\nExport the list\n\nHigh\n\nquit\n").await;
        assert_eq!(controller.gateway().len(), 11);
        assert!(controller.pending().is_none());
        assert!(out.contains("Issue created"));

        let created = controller.gateway().get(11).unwrap();
        assert_eq!(created.priority.as_str(), "High");
        assert_eq!(created.assignee.as_str(), "Alice");
    }

    #[tokio::test]
    async fn test_empty_title_keeps_form_open() {
        let (controller, out) = session("new\n\nsomething\n\n\n\nquit\n").await;
        assert_eq!(controller.gateway().len(), 10);
        assert!(controller.pending().is_some());
        assert!(out.contains("invalid title"));
    }

    #[tokio::test]
    async fn test_retry_keeps_typed_values() {
        let script = "new\n\nExport the list\n\n\n\nform\nAdd CSV export\n\n\n\n\nquit\n";
        let (controller, _) = session(script).await;
        let created = controller.gateway().get(11).unwrap();
        assert_eq!(created.title, "Add CSV export");
        assert_eq!(created.description, "Export the list");
    }

    #[tokio::test]
    async fn test_edit_prefills_snapshot() {
        let (controller, _) = session("edit 7\n\n\nOpen\n\n\nquit\n").await;
        let updated = controller.gateway().get(7).unwrap();
        assert_eq!(updated.status, IssueStatus::Open);
        assert_eq!(updated.title, "Optimize database query for reports");
    }

    #[tokio::test]
    async fn test_edit_missing_issue_reports_error() {
        let (controller, out) = session("edit 99\nquit\n").await;
        assert!(controller.pending().is_none());
        assert!(out.contains("Issue not found"));
    }

    #[tokio::test]
    async fn test_unknown_command_is_reported() {
        let (_, out) = session("frobnicate\n").await;
        assert!(out.contains("Unknown command"));
    }
}
