use clap::ValueEnum;
use shoplist_catalog::Taxonomy;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub(crate) enum TaxonomyFlag {
    #[value(alias = "category")]
    Categories,
    #[value(alias = "unit")]
    Units,
    #[value(alias = "store")]
    Stores,
}

impl TaxonomyFlag {
    pub(crate) const fn as_domain(self) -> Taxonomy {
        match self {
            TaxonomyFlag::Categories => Taxonomy::Categories,
            TaxonomyFlag::Units => Taxonomy::Units,
            TaxonomyFlag::Stores => Taxonomy::Stores,
        }
    }
}

/// Value given on the command line that asks for a brand-new taxonomy entry.
pub(crate) const REQUEST_NEW_ARG: &str = "+";
