use console::style;
use shoplist_catalog::{Record, TaxonomyList};
use shoplist_views::{ActiveListView, CatalogView};

/// Ids are shown shortened; any unique prefix is accepted back.
const SHORT_ID_LEN: usize = 8;

pub(crate) fn short_id(id: &str) -> &str {
    id.char_indices()
        .nth(SHORT_ID_LEN)
        .map_or(id, |(end, _)| &id[..end])
}

pub(crate) fn record_line(record: &Record) -> String {
    let mark = if record.purchased { "[x]" } else { "[ ]" };
    let optional = if record.optional { " (optional)" } else { "" };
    let store = if record.store.is_empty() {
        String::new()
    } else {
        format!(" @ {}", record.store)
    };
    let line = format!(
        "{mark} {} {} {}{optional}{store}",
        record.name, record.quantity, record.unit
    );
    let line = if record.purchased {
        style(line).dim().to_string()
    } else {
        line
    };
    format!("{}  {line}", style(short_id(&record.id)).cyan())
}

pub(crate) fn print_record_details(record: &Record) {
    println!("{}", style(&record.name).bold());
    println!("  Id:        {}", record.id);
    println!("  Quantity:  {} {}", record.quantity, record.unit);
    println!("  Category:  {}", record.category);
    println!("  Store:     {}", record.store);
    println!("  Optional:  {}", yes_no(record.optional));
    println!("  Purchased: {}", yes_no(record.purchased));
}

pub(crate) fn print_catalog(view: &CatalogView) {
    println!("{} {}", style("Store:").dim(), view.filter());
    for group in view.groups() {
        println!(
            "{} {}",
            style(group.name()).bold(),
            style(format!("({})", group.records().len())).dim()
        );
        for record in group.records() {
            println!("  {}", record_line(record));
        }
    }
}

pub(crate) fn print_active_list(view: &ActiveListView) {
    if view.is_empty() {
        println!("{}", style("Nothing left to buy.").green());
        return;
    }
    for record in view.items() {
        println!("{}", record_line(record));
    }
}

pub(crate) fn print_taxonomy(list: &TaxonomyList) {
    for name in list.names() {
        println!("{name}");
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
