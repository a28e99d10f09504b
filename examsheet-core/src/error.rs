//! Errors that abort an import run

use crate::enums::UnknownCodeError;
use crate::reader::{CellReference, CellTypeError};
use crate::store::StoreError;
use thiserror::Error;

/// No sheet carries the requested code in its sheet code cell
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Sheet with sheet code '{code}' not found")]
pub struct SheetNotFoundError {
    pub code: String,
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    CellType(#[from] CellTypeError),

    /// A coded cell could not be decoded into its classification
    #[error("{field} at {sheet}!{cell} is invalid: {source}")]
    UnknownCode {
        field: &'static str,
        sheet: String,
        cell: CellReference,
        #[source]
        source: UnknownCodeError,
    },

    #[error("Sheet '{0}' not found in workbook")]
    MasterSheetNotFound(String),

    #[error(transparent)]
    SheetNotFound(#[from] SheetNotFoundError),

    /// The store did not hand back an identity for a new record
    #[error("{record} could not be imported: the store returned an error on insert")]
    StorageInsert {
        record: String,
        #[source]
        source: StoreError,
    },

    #[error("Store operation failed")]
    Store(#[from] StoreError),
}
