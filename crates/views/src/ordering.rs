use shoplist_catalog::{is_request_new_marker, same_name};
use std::cmp::Ordering;

/// Group label for records without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Category under which a record is shown.
pub(crate) fn category_label(category: &str) -> &str {
    if category.trim().is_empty() || is_request_new_marker(category) {
        UNCATEGORIZED
    } else {
        category
    }
}

pub(crate) fn cmp_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

pub(crate) fn position_in(order: &[String], name: &str) -> Option<usize> {
    order.iter().position(|entry| same_name(entry, name))
}
