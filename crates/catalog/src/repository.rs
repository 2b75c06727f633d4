use crate::error::Result;
use crate::record::{node_id, Record, ID_KEY};
use serde_json::Value;
use shoplist_document::{DocumentStore, Section};

/// CRUD over product records.
///
/// Implementations must not cache: every method performs its own complete
/// load / modify / save cycle, so two interleaved writers follow
/// last-write-wins at whole-document granularity.
pub trait RecordRepository {
    /// Upserts by id: loads (or creates) the document, overwrites the node with
    /// the same id or appends a new one, then rewrites the document.
    fn save(&self, record: &Record) -> Result<()>;

    /// Removes the node with `id`. Missing document or node is a no-op.
    fn delete(&self, id: &str) -> Result<()>;

    /// Loads (or creates) the document and returns the record with `id`.
    fn find(&self, id: &str) -> Result<Option<Record>>;

    /// Like [`RecordRepository::find`], but a missing record comes back as an
    /// empty shell carrying just `id` (see [`Record::is_empty_shell`]).
    fn load(&self, id: &str) -> Result<Record> {
        Ok(self.find(id)?.unwrap_or_else(|| Record::with_id(id)))
    }

    /// Every record in document order; empty when the document does not exist.
    fn load_all(&self) -> Result<Vec<Record>>;
}

/// [`RecordRepository`] backed by the `Products` section of the document.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    store: DocumentStore,
}

impl DocumentRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }
}

impl RecordRepository for DocumentRepository {
    fn save(&self, record: &Record) -> Result<()> {
        let mut doc = self.store.load_or_create()?;
        let products = doc.ensure_section(Section::Products);

        let existing = products
            .iter_mut()
            .filter_map(Value::as_object_mut)
            .find(|node| node.get(ID_KEY).and_then(Value::as_str) == Some(record.id.as_str()));
        match existing {
            Some(node) => {
                record.write_into(node);
                log::debug!("Updated product {}", record.id);
            }
            None => {
                products.push(record.to_node());
                log::debug!("Appended product {}", record.id);
            }
        }

        self.store.save(&doc)?;
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<()> {
        let Some(mut doc) = self.store.load()? else {
            return Ok(());
        };
        let products = doc.ensure_section(Section::Products);
        let Some(index) = products.iter().position(|node| node_id(node) == Some(id)) else {
            return Ok(());
        };
        products.remove(index);

        self.store.save(&doc)?;
        log::debug!("Deleted product {id}");
        Ok(())
    }

    fn find(&self, id: &str) -> Result<Option<Record>> {
        let mut doc = self.store.load_or_create()?;
        let products = doc.ensure_section(Section::Products);
        Ok(products
            .iter()
            .find(|node| node_id(node) == Some(id))
            .map(Record::from_node))
    }

    fn load_all(&self) -> Result<Vec<Record>> {
        let Some(doc) = self.store.load()? else {
            return Ok(Vec::new());
        };
        Ok(doc
            .section(Section::Products)
            .unwrap_or_default()
            .iter()
            .filter(|node| node.is_object())
            .map(Record::from_node)
            .collect())
    }
}
