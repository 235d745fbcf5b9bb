//! `stockroom-inventory` — inventory entities and their managers.
//!
//! Each manager fronts one document collection: it validates input,
//! cross-references related entities through sibling managers, persists, and
//! stamps every write with the acting user. Deletion is always a soft-delete
//! flag flip; records are never purged.

pub mod article_variant;
pub mod stock;
pub mod storage;
pub mod transfer_out;

pub use article_variant::{ArticleVariant, ArticleVariantManager};
pub use stock::{InventoryManager, MovementType, StockMovement, StockRecord};
pub use storage::{Storage, StorageManager};
pub use transfer_out::{TransferOutDoc, TransferOutDocManager, TransferOutItem};
