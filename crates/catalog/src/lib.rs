//! # Shoplist Catalog
//!
//! Product records and the three dynamic taxonomies (categories, units,
//! stores), all persisted in the single shoplist document.
//!
//! - [`RecordRepository`] / [`DocumentRepository`]: upsert-by-id CRUD with a
//!   full document reload on every call.
//! - [`TaxonomyManager`]: ordered, case-insensitively distinct name lists that
//!   grow as the user types new entries.
//! - [`RecordEditor`]: the add/edit workflow, including the
//!   [`TaxonomyChoice::RequestNew`] prompt round-trip.

mod editor;
mod error;
mod prompt;
mod record;
mod repository;
mod taxonomy;

pub use editor::RecordEditor;
pub use error::{CatalogError, Result};
pub use prompt::{resolve_choice, PromptRequest, ValuePrompt};
pub use record::{Record, DEFAULT_QUANTITY, DEFAULT_UNIT};
pub use repository::{DocumentRepository, RecordRepository};
pub use taxonomy::{
    is_request_new_marker, same_name, Taxonomy, TaxonomyChoice, TaxonomyList, TaxonomyManager,
};
