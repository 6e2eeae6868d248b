//! Sort specification for issue listings.

use serde::{Deserialize, Serialize};

use crate::error::DeskError;

/// Column an issue listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortColumn {
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "title")]
    Title,
    #[serde(rename = "status")]
    Status,
    #[serde(rename = "priority")]
    Priority,
    #[serde(rename = "assignee")]
    Assignee,
    #[default]
    #[serde(rename = "updatedAt")]
    UpdatedAt,
}

enum_display_fromstr!(
    SortColumn,
    DeskError::InvalidSortColumn,
    {
        Id => "id",
        Title => "title",
        Status => "status",
        Priority => "priority",
        Assignee => "assignee",
        UpdatedAt => "updatedAt",
    }
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

enum_display_fromstr!(
    SortDirection,
    DeskError::InvalidSortDirection,
    {
        Asc => "asc",
        Desc => "desc",
    }
);

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Sort column plus direction. Defaults to most recently updated first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            column: SortColumn::UpdatedAt,
            direction: SortDirection::Desc,
        }
    }
}

impl SortSpec {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Sort toggle: re-selecting the current column flips the direction,
    /// selecting another column starts it ascending.
    pub fn toggled(self, column: SortColumn) -> Self {
        if self.column == column {
            Self {
                column,
                direction: self.direction.flipped(),
            }
        } else {
            Self {
                column,
                direction: SortDirection::Asc,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_updated_at_desc() {
        let spec = SortSpec::default();
        assert_eq!(spec.column, SortColumn::UpdatedAt);
        assert_eq!(spec.direction, SortDirection::Desc);
    }

    #[test]
    fn test_toggle_same_column_flips() {
        let spec = SortSpec::default().toggled(SortColumn::UpdatedAt);
        assert_eq!(spec, SortSpec::new(SortColumn::UpdatedAt, SortDirection::Asc));
        let spec = spec.toggled(SortColumn::UpdatedAt);
        assert_eq!(spec, SortSpec::new(SortColumn::UpdatedAt, SortDirection::Desc));
    }

    #[test]
    fn test_toggle_new_column_starts_ascending() {
        let spec = SortSpec::new(SortColumn::Title, SortDirection::Desc).toggled(SortColumn::Id);
        assert_eq!(spec, SortSpec::new(SortColumn::Id, SortDirection::Asc));
    }

    #[test]
    fn test_column_wire_values() {
        assert_eq!(SortColumn::UpdatedAt.to_string(), "updatedAt");
        assert_eq!("updatedat".parse::<SortColumn>().unwrap(), SortColumn::UpdatedAt);
        assert_eq!(
            serde_json::to_string(&SortColumn::UpdatedAt).unwrap(),
            "\"updatedAt\""
        );
        assert!("created".parse::<SortColumn>().is_err());
    }
}
