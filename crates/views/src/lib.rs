//! Derived views over the shopping list.
//!
//! - [`CatalogView`]: every record grouped by category, optionally for one store
//! - [`ActiveListView`]: unpurchased records in category order
//! - [`ShoppingSession`]: persists mutations and broadcasts them as
//!   [`RecordEvent`]s so attached views stay current without a rebuild

pub mod active;
pub mod catalog;
pub mod events;
mod ordering;
pub mod session;

pub use active::ActiveListView;
pub use catalog::{store_filters, CatalogView, CategoryGroup, StoreFilter};
pub use events::{EventBus, RecordEvent, RecordObserver, Subscription};
pub use ordering::UNCATEGORIZED;
pub use session::ShoppingSession;
