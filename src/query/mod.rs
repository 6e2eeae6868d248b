//! What the operator wants to see, and how that becomes a request.
//!
//! - [`state`]: the search/filter/sort/page selection and its transitions
//! - [`params`]: canonical request parameters for a selection
//! - [`pagination`]: page counts, clamping and range labels
//! - [`sort`]: sort columns and the toggle rule

pub mod pagination;
pub mod params;
pub mod sort;
pub mod state;

pub use pagination::{PAGE_SIZE, PageRange, clamp_page, range_label, total_pages};
pub use params::QueryParams;
pub use sort::{SortColumn, SortDirection, SortSpec};
pub use state::{Filter, FilterChange, FilterDimension, QueryState};
