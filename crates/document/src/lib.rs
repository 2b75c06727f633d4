//! # Shoplist Document
//!
//! Storage for the single document that holds the whole shopping list.
//!
//! ## Layout
//!
//! ```text
//! ShoppingList.json
//!     ├── Categories  ["Dairy", "Vegetables", ...]
//!     ├── Units       ["pcs", "kg", ...]
//!     ├── Stores      ["Biedronka", "Lidl", ...]
//!     └── Products    [{ "Id": ..., "Name": ..., "Quantity": ..., ... }]
//! ```
//!
//! There is no cache: [`DocumentStore`] reads the file on every load and
//! rewrites it atomically on every save. Import and export stream the raw bytes
//! and honor a cancellation token.
//!
//! ## Example
//!
//! ```no_run
//! use shoplist_document::{DocumentStore, Section};
//!
//! fn main() -> shoplist_document::Result<()> {
//!     let store = DocumentStore::new("ShoppingList.json");
//!     let mut doc = store.load_or_create()?;
//!     doc.ensure_section(Section::Stores).push("Corner shop".into());
//!     store.save(&doc)?;
//!     Ok(())
//! }
//! ```

mod document;
mod error;
mod paths;
mod seed;
mod store;
mod transfer;

pub use document::{Document, Section};
pub use error::{DocumentError, Result};
pub use paths::{
    default_data_dir, default_document_path, resolve_document_path, APP_DIR_NAME, DATA_FILE_ENV,
    DOCUMENT_FILE_NAME,
};
pub use seed::{DEFAULT_CATEGORIES, DEFAULT_STORES, DEFAULT_UNITS};
pub use store::DocumentStore;

// Re-exported so callers do not need a direct tokio-util dependency.
pub use tokio_util::sync::CancellationToken;
