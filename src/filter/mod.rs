pub mod types;
pub mod filter;
pub mod filter_where;
pub mod filter_order;

pub use types::*;
pub use filter::{PolicyFilter, PolicyQuery, POLICY_COLUMNS, POLICY_TABLE};
pub use filter_where::{escape_like, FilterWhere};
pub use filter_order::FilterOrder;
