use serde_json::json;

use super::{CommandOutput, connect};
use crate::cli::OutputOptions;
use crate::display::format_issue_detail;
use crate::error::Result;
use crate::remote::IssueSource;
use crate::types::IssueId;

/// Display a single issue
pub async fn cmd_show(id: IssueId, output: OutputOptions) -> Result<()> {
    let issue = connect()?.fetch_issue(id).await?;

    CommandOutput::new(json!(issue))
        .with_text(format_issue_detail(&issue))
        .print(output)
}
