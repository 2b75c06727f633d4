use crate::active::ActiveListView;
use crate::catalog::{store_filters, CatalogView, StoreFilter};
use crate::events::{EventBus, RecordEvent};
use shoplist_catalog::{
    CatalogError, Record, RecordRepository, Result, Taxonomy, TaxonomyManager,
};

/// Mutations coming from list widgets, persisted then broadcast to views.
///
/// Every mutation runs the repository's full load/modify/save cycle first and
/// publishes the matching [`RecordEvent`] only after the save succeeded.
/// Mutations on an unknown id return `Ok(None)` and publish nothing.
#[derive(Debug)]
pub struct ShoppingSession<R> {
    repository: R,
    taxonomies: TaxonomyManager,
    bus: EventBus,
}

impl<R: RecordRepository> ShoppingSession<R> {
    pub fn new(repository: R, taxonomies: TaxonomyManager) -> Self {
        Self {
            repository,
            taxonomies,
            bus: EventBus::new(),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn taxonomies(&self) -> &TaxonomyManager {
        &self.taxonomies
    }

    /// Composes a catalog view attached to this session's events.
    ///
    /// A filter naming a store that is no longer listed falls back to `All`.
    pub fn catalog(&mut self, filter: StoreFilter) -> Result<CatalogView> {
        let filter = filter.normalize(&self.taxonomies.load(Taxonomy::Stores));
        let mut view = CatalogView::compose(&self.taxonomies, &self.repository, filter)?;
        view.attach(&mut self.bus);
        Ok(view)
    }

    /// Composes an active-list view attached to this session's events.
    pub fn active_list(&mut self) -> Result<ActiveListView> {
        let mut view = ActiveListView::compose(&self.taxonomies, &self.repository)?;
        view.attach(&mut self.bus);
        Ok(view)
    }

    #[must_use]
    pub fn store_filter_options(&self) -> Vec<StoreFilter> {
        store_filters(&self.taxonomies.load(Taxonomy::Stores))
    }

    /// Upserts `record` as edited elsewhere. Views pick it up on rebuild.
    pub fn save(&self, record: &Record) -> Result<()> {
        self.repository.save(record)
    }

    pub fn set_purchased(&mut self, id: &str, purchased: bool) -> Result<Option<Record>> {
        self.update(id, |record| {
            if record.purchased == purchased {
                return None;
            }
            record.purchased = purchased;
            Some(RecordEvent::PurchaseChanged {
                id: record.id.clone(),
                purchased,
            })
        })
    }

    pub fn toggle_purchased(&mut self, id: &str) -> Result<Option<Record>> {
        self.update(id, |record| {
            record.purchased = !record.purchased;
            Some(RecordEvent::PurchaseChanged {
                id: record.id.clone(),
                purchased: record.purchased,
            })
        })
    }

    /// Adds `delta` (negative to decrement) to the quantity, never going below 0.
    /// A non-finite `delta` is rejected before anything is loaded.
    pub fn adjust_quantity(&mut self, id: &str, delta: f64) -> Result<Option<Record>> {
        let delta = finite(delta)?;
        self.update(id, |record| {
            let quantity = (record.quantity + delta).clamp(0.0, f64::MAX);
            quantity_change(record, quantity)
        })
    }

    pub fn set_quantity(&mut self, id: &str, quantity: f64) -> Result<Option<Record>> {
        let quantity = finite(quantity)?.max(0.0);
        self.update(id, |record| quantity_change(record, quantity))
    }

    /// Deletes the record. Returns false (and publishes nothing) for an unknown id.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        if self.repository.find(id)?.is_none() {
            return Ok(false);
        }
        self.repository.delete(id)?;
        self.bus.publish(RecordEvent::Deleted { id: id.to_string() });
        Ok(true)
    }

    fn update<F>(&mut self, id: &str, change: F) -> Result<Option<Record>>
    where
        F: FnOnce(&mut Record) -> Option<RecordEvent>,
    {
        let Some(mut record) = self.repository.find(id)? else {
            log::debug!("No record {id} to update");
            return Ok(None);
        };
        if let Some(event) = change(&mut record) {
            self.repository.save(&record)?;
            self.bus.publish(event);
        }
        Ok(Some(record))
    }
}

fn finite(value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CatalogError::InvalidQuantity(value))
    }
}

fn quantity_change(record: &mut Record, quantity: f64) -> Option<RecordEvent> {
    if record.quantity == quantity {
        return None;
    }
    record.quantity = quantity;
    Some(RecordEvent::QuantityChanged {
        id: record.id.clone(),
        quantity,
    })
}
