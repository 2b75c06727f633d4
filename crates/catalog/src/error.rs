use shoplist_document::DocumentError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("Product name must not be blank")]
    MissingName,

    #[error("Quantity must be a finite number, got {0}")]
    InvalidQuantity(f64),
}
