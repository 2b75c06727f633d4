//! Default taxonomy entries written into a freshly created document.

pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Dairy",
    "Vegetables",
    "Fruit",
    "Electronics",
    "Appliances",
];

pub const DEFAULT_UNITS: &[&str] = &["pcs", "kg", "l", "g", "pack", "ml"];

pub const DEFAULT_STORES: &[&str] = &["Biedronka", "Lidl", "Selgros", "Auchan"];
