//! Row filtering and alignment of the count matrix and label table.

pub mod align;
pub mod support;

pub use align::{align_tables, drop_category, AlignOrder};
pub use support::{check_min_members, filter_category_support, SupportFilterResult};
