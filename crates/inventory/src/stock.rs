//! On-hand stock per (storage, variant) and the movement ledger behind it.

use serde::{Deserialize, Serialize};
use stockroom_core::{Actor, AuditStamp, DocId, DomainError, DomainResult, ValidationErrors};
use stockroom_store::{Collection, Db, Document, FieldValue, Find, Page, Query};

/// Current on-hand quantity of one variant at one storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub id: Option<DocId>,
    pub storage_id: Option<DocId>,
    pub article_variant_id: Option<DocId>,
    pub quantity: i64,
    pub deleted: bool,
    pub audit: AuditStamp,
}

impl Document for StockRecord {
    const COLLECTION: &'static str = "inventories";

    fn id(&self) -> Option<DocId> {
        self.id
    }

    fn set_id(&mut self, id: DocId) {
        self.id = Some(id);
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => self.id.map(FieldValue::Id),
            "storage_id" => self.storage_id.map(FieldValue::Id),
            "article_variant_id" => self.article_variant_id.map(FieldValue::Id),
            "quantity" => Some(self.quantity.into()),
            "deleted" => Some(self.deleted.into()),
            _ => None,
        }
    }

    fn audit_mut(&mut self) -> &mut AuditStamp {
        &mut self.audit
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    In,
    Out,
    Adjustment,
}

impl MovementType {
    fn as_str(&self) -> &'static str {
        match self {
            MovementType::In => "in",
            MovementType::Out => "out",
            MovementType::Adjustment => "adjustment",
        }
    }
}

/// One entry in the stock movement ledger.
///
/// `code` carries the reference document's code (e.g. the transfer-out
/// document that caused the movement). `before`/`after` snapshot the stock
/// level around the movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: Option<DocId>,
    pub code: String,
    pub movement_type: MovementType,
    pub storage_id: Option<DocId>,
    pub article_variant_id: Option<DocId>,
    pub before: i64,
    pub quantity: i64,
    pub after: i64,
    pub remark: String,
    pub deleted: bool,
    pub audit: AuditStamp,
}

impl Document for StockMovement {
    const COLLECTION: &'static str = "inventory-movements";

    fn id(&self) -> Option<DocId> {
        self.id
    }

    fn set_id(&mut self, id: DocId) {
        self.id = Some(id);
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => self.id.map(FieldValue::Id),
            "code" => Some(self.code.clone().into()),
            "movement_type" => Some(self.movement_type.as_str().into()),
            "storage_id" => self.storage_id.map(FieldValue::Id),
            "article_variant_id" => self.article_variant_id.map(FieldValue::Id),
            "deleted" => Some(self.deleted.into()),
            _ => None,
        }
    }

    fn audit_mut(&mut self) -> &mut AuditStamp {
        &mut self.audit
    }
}

/// Manager for stock records and their movement ledger.
pub struct InventoryManager {
    stocks: Collection<StockRecord>,
    movements: Collection<StockMovement>,
    actor: Actor,
}

impl InventoryManager {
    pub fn new(db: &Db, actor: Actor) -> Self {
        Self {
            stocks: db.collection(),
            movements: db.collection(),
            actor,
        }
    }

    /// Current stock record for one (storage, variant), if any.
    pub async fn get_by_storage_and_variant(
        &self,
        storage_id: DocId,
        article_variant_id: DocId,
    ) -> DomainResult<Option<StockRecord>> {
        Ok(self
            .stocks
            .single_or_default(
                Query::new()
                    .eq("storage_id", storage_id)
                    .eq("article_variant_id", article_variant_id)
                    .eq("deleted", false),
            )
            .await?)
    }

    /// Movement ledger entries carrying a reference document code.
    pub async fn movements_for(&self, reference_code: &str) -> DomainResult<Page<StockMovement>> {
        Ok(self
            .movements
            .find(Query::new().eq("code", reference_code).eq("deleted", false))
            .page(1, 100)
            .order_by("id", true)
            .execute()
            .await?)
    }

    /// Decrement stock at a storage and record an `Out` movement.
    ///
    /// Returns the movement's identifier. Stock may go negative; the ledger
    /// keeps the before/after snapshot either way.
    pub async fn out(
        &self,
        storage_id: DocId,
        reference_code: &str,
        article_variant_id: DocId,
        quantity: i64,
        remark: impl Into<String>,
    ) -> DomainResult<DocId> {
        self.move_stock(
            MovementType::Out,
            storage_id,
            reference_code,
            article_variant_id,
            quantity,
            remark.into(),
        )
        .await
    }

    /// Increment stock at a storage and record an `In` movement.
    pub async fn receive(
        &self,
        storage_id: DocId,
        reference_code: &str,
        article_variant_id: DocId,
        quantity: i64,
        remark: impl Into<String>,
    ) -> DomainResult<DocId> {
        self.move_stock(
            MovementType::In,
            storage_id,
            reference_code,
            article_variant_id,
            quantity,
            remark.into(),
        )
        .await
    }

    async fn move_stock(
        &self,
        movement_type: MovementType,
        storage_id: DocId,
        reference_code: &str,
        article_variant_id: DocId,
        quantity: i64,
        remark: String,
    ) -> DomainResult<DocId> {
        let mut errors = ValidationErrors::new();
        if reference_code.is_empty() {
            errors.set("code", "code is required");
        }
        if quantity <= 0 {
            errors.set("quantity", "quantity must be greater than 0");
        }
        if !errors.is_empty() {
            return Err(DomainError::validation(errors));
        }

        let delta = match movement_type {
            MovementType::Out => -quantity,
            _ => quantity,
        };

        let current = self
            .get_by_storage_and_variant(storage_id, article_variant_id)
            .await?;
        let before = current.as_ref().map(|s| s.quantity).unwrap_or(0);
        let after = before + delta;

        match current {
            Some(mut stock) => {
                stock.quantity = after;
                stock.stamp(&self.actor.username, "manager");
                self.stocks.update(stock).await?;
            }
            None => {
                let mut stock = StockRecord {
                    storage_id: Some(storage_id),
                    article_variant_id: Some(article_variant_id),
                    quantity: after,
                    ..StockRecord::default()
                };
                stock.stamp(&self.actor.username, "manager");
                self.stocks.insert(stock).await?;
            }
        }

        let mut movement = StockMovement {
            id: None,
            code: reference_code.to_string(),
            movement_type,
            storage_id: Some(storage_id),
            article_variant_id: Some(article_variant_id),
            before,
            quantity,
            after,
            remark,
            deleted: false,
            audit: AuditStamp::default(),
        };
        movement.stamp(&self.actor.username, "manager");
        let id = self.movements.insert(movement).await?;
        tracing::debug!(
            %id,
            code = reference_code,
            kind = movement_type.as_str(),
            before,
            after,
            "stock movement recorded"
        );
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(db: &Db) -> InventoryManager {
        InventoryManager::new(db, Actor::new("unit-test"))
    }

    #[tokio::test]
    async fn receive_then_out_tracks_before_and_after() {
        let db = Db::new();
        let manager = manager(&db);
        let storage = DocId::new();
        let variant = DocId::new();

        manager
            .receive(storage, "RCV-001", variant, 10, "initial")
            .await
            .unwrap();
        manager
            .out(storage, "TRF-001", variant, 4, "transfer")
            .await
            .unwrap();

        let stock = manager
            .get_by_storage_and_variant(storage, variant)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stock.quantity, 6);

        let movements = manager.movements_for("TRF-001").await.unwrap();
        assert_eq!(movements.count(), 1);
        let movement = &movements.data[0];
        assert_eq!(movement.movement_type, MovementType::Out);
        assert_eq!(movement.before, 10);
        assert_eq!(movement.quantity, 4);
        assert_eq!(movement.after, 6);
        assert_eq!(movement.remark, "transfer");
    }

    #[tokio::test]
    async fn out_without_prior_stock_goes_negative() {
        let db = Db::new();
        let manager = manager(&db);
        let storage = DocId::new();
        let variant = DocId::new();

        manager
            .out(storage, "TRF-002", variant, 3, "")
            .await
            .unwrap();
        let stock = manager
            .get_by_storage_and_variant(storage, variant)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stock.quantity, -3);
    }

    #[tokio::test]
    async fn movements_validate_code_and_quantity() {
        let db = Db::new();
        let manager = manager(&db);
        let storage = DocId::new();
        let variant = DocId::new();

        let err = manager.out(storage, "", variant, 1, "").await.unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap().get("code"),
            Some("code is required")
        );

        let err = manager.out(storage, "TRF-003", variant, 0, "").await.unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap().get("quantity"),
            Some("quantity must be greater than 0")
        );
    }
}
