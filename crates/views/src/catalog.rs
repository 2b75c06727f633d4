use crate::events::{EventBus, RecordEvent, RecordObserver, Subscription};
use crate::ordering::{category_label, cmp_names, position_in};
use serde::Serialize;
use shoplist_catalog::{
    same_name, Record, RecordRepository, Result, Taxonomy, TaxonomyList, TaxonomyManager,
};
use std::fmt;

/// Which store's products the catalog shows.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreFilter {
    #[default]
    All,
    Store(String),
}

impl StoreFilter {
    /// Blank input or "all" (any case) means no filter.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => StoreFilter::All,
            Some(value) if value.eq_ignore_ascii_case("all") => StoreFilter::All,
            Some(value) => StoreFilter::Store(value.to_string()),
        }
    }

    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            StoreFilter::All => true,
            StoreFilter::Store(store) => same_name(&record.store, store),
        }
    }

    /// Falls back to [`StoreFilter::All`] when the store is no longer listed.
    #[must_use]
    pub fn normalize(self, stores: &TaxonomyList) -> Self {
        if let StoreFilter::Store(store) = &self {
            if !stores.contains(store) {
                return StoreFilter::All;
            }
        }
        self
    }
}

impl fmt::Display for StoreFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreFilter::All => f.write_str("All"),
            StoreFilter::Store(store) => f.write_str(store),
        }
    }
}

/// Filter options offered to the user: `All`, then every store.
#[must_use]
pub fn store_filters(stores: &TaxonomyList) -> Vec<StoreFilter> {
    std::iter::once(StoreFilter::All)
        .chain(stores.names().iter().cloned().map(StoreFilter::Store))
        .collect()
}

/// Records of one category, unpurchased first, then by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGroup {
    name: String,
    records: Vec<Record>,
    expanded: bool,
}

impl CategoryGroup {
    fn new(name: String, records: Vec<Record>) -> Self {
        let mut group = Self {
            name,
            records,
            expanded: false,
        };
        group.refresh_order();
        group
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
    }

    /// Stable re-sort: unpurchased before purchased, then name without case.
    pub fn refresh_order(&mut self) {
        self.records.sort_by(|a, b| {
            a.purchased
                .cmp(&b.purchased)
                .then_with(|| cmp_names(&a.name, &b.name))
        });
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }
}

/// Every record grouped by category, optionally narrowed to one store.
#[derive(Debug, Serialize)]
pub struct CatalogView {
    filter: StoreFilter,
    category_order: Vec<String>,
    groups: Vec<CategoryGroup>,
    #[serde(skip)]
    subscription: Option<Subscription>,
}

impl CatalogView {
    /// Loads the category list and all records, then builds the view.
    pub fn compose(
        taxonomies: &TaxonomyManager,
        repository: &dyn RecordRepository,
        filter: StoreFilter,
    ) -> Result<Self> {
        let categories = taxonomies.load(Taxonomy::Categories);
        let records = repository.load_all()?;
        Ok(Self::build(&categories, records, filter))
    }

    /// Groups `records` by category.
    ///
    /// Every predefined category gets a group, even an empty one. Categories
    /// found only in the data (including [`crate::UNCATEGORIZED`]) are appended
    /// to the order once, in first-seen order.
    #[must_use]
    pub fn build(categories: &TaxonomyList, records: Vec<Record>, filter: StoreFilter) -> Self {
        let mut category_order: Vec<String> = categories.names().to_vec();
        let mut buckets: Vec<Vec<Record>> = vec![Vec::new(); category_order.len()];

        for record in records.into_iter().filter(|record| filter.matches(record)) {
            let label = category_label(&record.category);
            let index = match position_in(&category_order, label) {
                Some(index) => index,
                None => {
                    category_order.push(label.to_string());
                    buckets.push(Vec::new());
                    category_order.len() - 1
                }
            };
            buckets[index].push(record);
        }

        let groups = category_order
            .iter()
            .cloned()
            .zip(buckets)
            .map(|(name, records)| CategoryGroup::new(name, records))
            .collect();

        Self {
            filter,
            category_order,
            groups,
            subscription: None,
        }
    }

    #[must_use]
    pub fn filter(&self) -> &StoreFilter {
        &self.filter
    }

    /// Category order after appending categories found only in the data.
    #[must_use]
    pub fn category_order(&self) -> &[String] {
        &self.category_order
    }

    #[must_use]
    pub fn groups(&self) -> &[CategoryGroup] {
        &self.groups
    }

    pub fn groups_mut(&mut self) -> &mut [CategoryGroup] {
        &mut self.groups
    }

    #[must_use]
    pub fn group(&self, name: &str) -> Option<&CategoryGroup> {
        self.groups.iter().find(|group| same_name(&group.name, name))
    }

    #[must_use]
    pub fn record(&self, id: &str) -> Option<&Record> {
        self.groups
            .iter()
            .flat_map(|group| group.records.iter())
            .find(|record| record.id == id)
    }

    #[must_use]
    pub fn record_count(&self) -> usize {
        self.groups.iter().map(|group| group.records.len()).sum()
    }

    /// Starts following record events published on `bus`.
    pub fn attach(&mut self, bus: &mut EventBus) {
        self.subscription = Some(bus.subscribe());
    }

    /// Applies events queued since the last call. Returns how many were seen.
    pub fn process_pending(&mut self) -> usize {
        let Some(mut subscription) = self.subscription.take() else {
            return 0;
        };
        let seen = subscription.deliver_to(self);
        self.subscription = Some(subscription);
        seen
    }

    fn locate_mut(&mut self, id: &str) -> Option<(&mut CategoryGroup, usize)> {
        self.groups
            .iter_mut()
            .find_map(|group| group.position(id).map(|index| (group, index)))
    }
}

impl RecordObserver for CatalogView {
    fn on_record_event(&mut self, event: &RecordEvent) {
        let Some((group, index)) = self.locate_mut(event.id()) else {
            return;
        };
        match event {
            RecordEvent::PurchaseChanged { purchased, .. } => {
                group.records[index].purchased = *purchased;
                group.refresh_order();
            }
            RecordEvent::QuantityChanged { quantity, .. } => {
                group.records[index].quantity = *quantity;
            }
            RecordEvent::Deleted { .. } => {
                group.records.remove(index);
                group.refresh_order();
            }
        }
    }
}
