//! Transfer-out documents: stock moved out of one storage toward another.

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use stockroom_core::{Actor, AuditStamp, DocId, DomainError, DomainResult, ValidationErrors};
use stockroom_store::{Clause, Collection, Db, Document, FieldValue, Find, Page, Paging, Query};

use crate::article_variant::{ArticleVariant, ArticleVariantManager};
use crate::stock::InventoryManager;
use crate::storage::{Storage, StorageManager};

/// One line of a transfer-out document.
///
/// `article_variant_id` and `quantity` are optional on input so "required"
/// and "invalid" surface as distinct validation errors; validation resolves
/// and attaches the referenced variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferOutItem {
    pub article_variant_id: Option<DocId>,
    pub article_variant: Option<ArticleVariant>,
    pub quantity: Option<i64>,
    pub remark: String,
}

/// Record of stock moved out of `source_id` toward `destination_id`.
///
/// `source`/`destination` are attached copies of the resolved storages,
/// populated by validation on every successful write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferOutDoc {
    pub id: Option<DocId>,
    pub code: String,
    pub source_id: Option<DocId>,
    pub source: Option<Storage>,
    pub destination_id: Option<DocId>,
    pub destination: Option<Storage>,
    pub items: Vec<TransferOutItem>,
    pub deleted: bool,
    pub audit: AuditStamp,
}

impl Document for TransferOutDoc {
    const COLLECTION: &'static str = "transfer-out-docs";

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
            "source_id" => self.source_id.map(FieldValue::Id),
            "destination_id" => self.destination_id.map(FieldValue::Id),
            "deleted" => Some(self.deleted.into()),
            _ => None,
        }
    }

    fn audit_mut(&mut self) -> &mut AuditStamp {
        &mut self.audit
    }
}

/// Manager for [`TransferOutDoc`] records.
///
/// Creation fans out to the inventory manager: one stock decrement at the
/// source storage per item, issued concurrently with the document insert.
/// There is no compensation if part of the fan-out fails; committed writes
/// stay committed.
pub struct TransferOutDocManager {
    docs: Collection<TransferOutDoc>,
    storages: StorageManager,
    variants: ArticleVariantManager,
    inventory: InventoryManager,
    actor: Actor,
}

impl TransferOutDocManager {
    pub fn new(db: &Db, actor: Actor) -> Self {
        Self {
            docs: db.collection(),
            storages: StorageManager::new(db, actor.clone()),
            variants: ArticleVariantManager::new(db, actor.clone()),
            inventory: InventoryManager::new(db, actor.clone()),
            actor,
        }
    }

    /// Page through non-deleted documents; keyword filters by
    /// case-insensitive substring match on `code`.
    pub async fn read(&self, paging: Paging) -> DomainResult<Page<TransferOutDoc>> {
        let mut query = Query::new().eq("deleted", false);
        if let Some(keyword) = &paging.keyword {
            query = query.any_of(vec![Clause::contains("code", keyword.clone())]);
        }

        Ok(self
            .docs
            .find(query)
            .page(paging.page, paging.size)
            .order_by(paging.order.as_str(), paging.asc)
            .execute()
            .await?)
    }

    pub async fn get_by_id(&self, id: DocId) -> DomainResult<TransferOutDoc> {
        self.get_single_by_query(Query::new().eq("id", id).eq("deleted", false))
            .await
    }

    pub async fn get_by_id_or_default(&self, id: DocId) -> DomainResult<Option<TransferOutDoc>> {
        self.get_single_or_default_by_query(Query::new().eq("id", id).eq("deleted", false))
            .await
    }

    pub async fn get_single_by_query(&self, query: Query) -> DomainResult<TransferOutDoc> {
        Ok(self.docs.single(query).await?)
    }

    pub async fn get_single_or_default_by_query(
        &self,
        query: Query,
    ) -> DomainResult<Option<TransferOutDoc>> {
        Ok(self.docs.single_or_default(query).await?)
    }

    /// Validate, persist, and decrement source stock for every item.
    ///
    /// The insert and the per-item decrements are issued concurrently and
    /// joined; the call fails if any of them fails, without rolling back the
    /// operations that already committed.
    pub async fn create(&self, doc: TransferOutDoc) -> DomainResult<DocId> {
        let valid = self.validate(doc).await?;

        let insert = async { Ok::<DocId, DomainError>(self.docs.insert(valid.clone()).await?) };

        let mut decrements = Vec::with_capacity(valid.items.len());
        if let Some(source_id) = valid.source_id {
            for item in &valid.items {
                // Validation has resolved both fields for every item.
                if let (Some(variant_id), Some(quantity)) = (item.article_variant_id, item.quantity)
                {
                    decrements.push(self.inventory.out(
                        source_id,
                        &valid.code,
                        variant_id,
                        quantity,
                        item.remark.clone(),
                    ));
                }
            }
        }

        let (id, _) = futures::try_join!(insert, try_join_all(decrements))?;
        tracing::info!(%id, code = %valid.code, items = valid.items.len(), "transfer-out document created");
        Ok(id)
    }

    /// Re-validate (including uniqueness against other documents) and persist.
    pub async fn update(&self, doc: TransferOutDoc) -> DomainResult<DocId> {
        let valid = self.validate(doc).await?;
        let id = self.docs.update(valid).await?;
        tracing::info!(%id, "transfer-out document updated");
        Ok(id)
    }

    /// Re-validate, flip the soft-delete flag, and persist. Never purges.
    pub async fn delete(&self, doc: TransferOutDoc) -> DomainResult<DocId> {
        let mut valid = self.validate(doc).await?;
        valid.deleted = true;
        let id = self.docs.update(valid).await?;
        tracing::info!(%id, "transfer-out document deleted");
        Ok(id)
    }

    /// Validation pipeline.
    ///
    /// Issues the code-uniqueness lookup, both storage lookups, and one
    /// variant lookup per item without mutual sequencing, then joins and
    /// checks field by field. Variant results correlate back to `items`
    /// positionally.
    async fn validate(&self, mut doc: TransferOutDoc) -> DomainResult<TransferOutDoc> {
        let mut errors = ValidationErrors::new();

        let mut duplicate_query = Query::new().eq("code", doc.code.clone()).eq("deleted", false);
        if let Some(id) = doc.id {
            duplicate_query = duplicate_query.ne("id", id);
        }
        let duplicate = async {
            Ok::<_, DomainError>(self.docs.single_or_default(duplicate_query).await?)
        };

        let source = async {
            match doc.source_id {
                Some(id) => self.storages.get_by_id_or_default(id).await,
                None => Ok(None),
            }
        };
        let destination = async {
            match doc.destination_id {
                Some(id) => self.storages.get_by_id_or_default(id).await,
                None => Ok(None),
            }
        };

        if doc.items.is_empty() {
            errors.set("items", "items is required");
        }
        let variant_lookups: Vec<_> = doc
            .items
            .iter()
            .map(|item| {
                let id = item.article_variant_id;
                async move {
                    match id {
                        Some(id) => self.variants.get_by_id_or_default(id).await,
                        None => Ok(None),
                    }
                }
            })
            .collect();

        let (duplicate, source, destination, variants) = futures::try_join!(
            duplicate,
            source,
            destination,
            try_join_all(variant_lookups)
        )?;

        if doc.code.is_empty() {
            errors.set("code", "code is required");
        } else if duplicate.is_some() {
            errors.set("code", "code already exists");
        }

        if doc.source_id.is_none() {
            errors.set("sourceId", "sourceId is required");
        }
        match source {
            // A missing id therefore also surfaces as "not found".
            None => errors.set("sourceId", "sourceId not found"),
            Some(storage) => {
                doc.source_id = storage.id;
                doc.source = Some(storage);
            }
        }

        if doc.destination_id.is_none() {
            errors.set("destinationId", "destinationId is required");
        }
        match destination {
            None => errors.set("destinationId", "destinationId not found"),
            Some(storage) => {
                doc.destination_id = storage.id;
                doc.destination = Some(storage);
            }
        }

        if !variants.is_empty() {
            let mut item_errors = Vec::with_capacity(doc.items.len());
            for (index, variant) in variants.into_iter().enumerate() {
                let mut item_error = ValidationErrors::new();

                match doc.items[index].article_variant_id {
                    None => item_error.set("articleVariantId", "articleVariantId is required"),
                    Some(id) => {
                        // Forward-only scan: an item is flagged when a later
                        // item reuses its id, so the last duplicate stays
                        // unflagged.
                        for other in &doc.items[index + 1..] {
                            if other.article_variant_id == Some(id) {
                                item_error.set(
                                    "articleVariantId",
                                    "articleVariantId already exists on another detail",
                                );
                            }
                        }
                    }
                }

                match variant {
                    None => item_error.set("articleVariantId", "articleVariantId not found"),
                    Some(variant) => {
                        let item = &mut doc.items[index];
                        item.article_variant_id = variant.id;
                        item.article_variant = Some(variant);
                    }
                }

                match doc.items[index].quantity {
                    None => item_error.set("quantity", "quantity is required"),
                    Some(quantity) if quantity <= 0 => {
                        item_error.set("quantity", "quantity must be greater than 0");
                    }
                    _ => {}
                }

                item_errors.push(item_error);
            }

            // Any item error publishes the whole sparse per-item array.
            if item_errors.iter().any(|e| !e.is_empty()) {
                errors.set_items(item_errors);
            }
        }

        if !errors.is_empty() {
            return Err(DomainError::validation(errors));
        }

        doc.stamp(&self.actor.username, "manager");
        Ok(doc)
    }
}
