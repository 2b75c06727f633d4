use crate::events::{EventBus, RecordEvent, RecordObserver, Subscription};
use crate::ordering::{category_label, cmp_names, position_in, UNCATEGORIZED};
use serde::Serialize;
use shoplist_catalog::{Record, RecordRepository, Result, Taxonomy, TaxonomyList, TaxonomyManager};

/// Unpurchased records ordered by category position, then name.
#[derive(Debug, Serialize)]
pub struct ActiveListView {
    category_order: Vec<String>,
    items: Vec<Record>,
    #[serde(skip)]
    subscription: Option<Subscription>,
}

impl ActiveListView {
    pub fn compose(
        taxonomies: &TaxonomyManager,
        repository: &dyn RecordRepository,
    ) -> Result<Self> {
        let categories = taxonomies.load(Taxonomy::Categories);
        let records = repository.load_all()?;
        Ok(Self::build(&categories, records))
    }

    #[must_use]
    pub fn build(categories: &TaxonomyList, records: Vec<Record>) -> Self {
        let mut view = Self {
            category_order: category_order(categories),
            items: Vec::new(),
            subscription: None,
        };
        view.replace_items(records);
        view
    }

    /// Re-reads the category order and every record, keeping the subscription.
    pub fn reload(
        &mut self,
        taxonomies: &TaxonomyManager,
        repository: &dyn RecordRepository,
    ) -> Result<()> {
        let records = repository.load_all()?;
        self.category_order = category_order(&taxonomies.load(Taxonomy::Categories));
        self.replace_items(records);
        Ok(())
    }

    fn replace_items(&mut self, records: Vec<Record>) {
        let mut items: Vec<Record> = records
            .into_iter()
            .filter(|record| !record.purchased)
            .collect();
        let order = &self.category_order;
        items.sort_by(|a, b| {
            rank(order, a)
                .cmp(&rank(order, b))
                .then_with(|| cmp_names(&a.name, &b.name))
        });
        self.items = items;
    }

    #[must_use]
    pub fn items(&self) -> &[Record] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|record| record.id == id)
    }

    #[must_use]
    pub fn category_order(&self) -> &[String] {
        &self.category_order
    }

    pub fn attach(&mut self, bus: &mut EventBus) {
        self.subscription = Some(bus.subscribe());
    }

    pub fn process_pending(&mut self) -> usize {
        let Some(mut subscription) = self.subscription.take() else {
            return 0;
        };
        let seen = subscription.deliver_to(self);
        self.subscription = Some(subscription);
        seen
    }
}

impl RecordObserver for ActiveListView {
    fn on_record_event(&mut self, event: &RecordEvent) {
        match event {
            RecordEvent::PurchaseChanged {
                id,
                purchased: true,
            }
            | RecordEvent::Deleted { id } => {
                self.items.retain(|record| &record.id != id);
            }
            // Un-purchasing does not bring an item back until the next reload.
            RecordEvent::PurchaseChanged {
                purchased: false, ..
            } => {}
            RecordEvent::QuantityChanged { id, quantity } => {
                if let Some(record) = self.items.iter_mut().find(|record| &record.id == id) {
                    record.quantity = *quantity;
                }
            }
        }
    }
}

fn category_order(categories: &TaxonomyList) -> Vec<String> {
    let mut order = categories.names().to_vec();
    if position_in(&order, UNCATEGORIZED).is_none() {
        order.push(UNCATEGORIZED.to_string());
    }
    order
}

// Categories outside the order sort after every known one.
fn rank(order: &[String], record: &Record) -> usize {
    position_in(order, category_label(&record.category)).unwrap_or(usize::MAX)
}
