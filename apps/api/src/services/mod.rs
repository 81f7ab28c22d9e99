//! Business services behind the HTTP routes.
//!
//! Each service holds the shared store (`Arc<dyn LedgerStore>`) and speaks
//! in domain types. Validation happens here, before any storage call.

pub mod inventory;
pub mod reports;
pub mod sales;

pub use inventory::InventoryService;
pub use reports::ReportService;
pub use sales::{SaleReceipt, SalesService};

use flash_core::{CoreError, ValidationError};
use flash_db::DbError;

/// Errors a service call can end with.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Storage(#[from] DbError),
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Core(CoreError::Validation(err))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
