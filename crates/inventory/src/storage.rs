//! Storage locations (warehouses, shops) and their manager.

use serde::{Deserialize, Serialize};
use stockroom_core::{Actor, AuditStamp, DocId, DomainError, DomainResult, ValidationErrors};
use stockroom_store::{Clause, Collection, Db, Document, FieldValue, Find, Page, Paging, Query};

/// A physical stock location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Storage {
    pub id: Option<DocId>,
    pub code: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub deleted: bool,
    pub audit: AuditStamp,
}

impl Document for Storage {
    const COLLECTION: &'static str = "storages";

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
            "name" => Some(self.name.clone().into()),
            "deleted" => Some(self.deleted.into()),
            _ => None,
        }
    }

    fn audit_mut(&mut self) -> &mut AuditStamp {
        &mut self.audit
    }
}

/// CRUD manager for [`Storage`] records.
pub struct StorageManager {
    storages: Collection<Storage>,
    actor: Actor,
}

impl StorageManager {
    pub fn new(db: &Db, actor: Actor) -> Self {
        Self {
            storages: db.collection(),
            actor,
        }
    }

    /// Page through non-deleted storages; keyword matches code or name.
    pub async fn read(&self, paging: Paging) -> DomainResult<Page<Storage>> {
        let mut query = Query::new().eq("deleted", false);
        if let Some(keyword) = &paging.keyword {
            query = query.any_of(vec![
                Clause::contains("code", keyword.clone()),
                Clause::contains("name", keyword.clone()),
            ]);
        }

        Ok(self
            .storages
            .find(query)
            .page(paging.page, paging.size)
            .order_by(paging.order.as_str(), paging.asc)
            .execute()
            .await?)
    }

    pub async fn get_by_id(&self, id: DocId) -> DomainResult<Storage> {
        Ok(self
            .storages
            .single(Query::new().eq("id", id).eq("deleted", false))
            .await?)
    }

    pub async fn get_by_id_or_default(&self, id: DocId) -> DomainResult<Option<Storage>> {
        Ok(self
            .storages
            .single_or_default(Query::new().eq("id", id).eq("deleted", false))
            .await?)
    }

    pub async fn create(&self, storage: Storage) -> DomainResult<DocId> {
        let valid = self.validate(storage).await?;
        let id = self.storages.insert(valid).await?;
        tracing::debug!(%id, "storage created");
        Ok(id)
    }

    pub async fn update(&self, storage: Storage) -> DomainResult<DocId> {
        let valid = self.validate(storage).await?;
        Ok(self.storages.update(valid).await?)
    }

    pub async fn delete(&self, storage: Storage) -> DomainResult<DocId> {
        let mut valid = self.validate(storage).await?;
        valid.deleted = true;
        Ok(self.storages.update(valid).await?)
    }

    async fn validate(&self, mut storage: Storage) -> DomainResult<Storage> {
        let mut errors = ValidationErrors::new();

        let mut duplicate_query = Query::new().eq("code", storage.code.clone()).eq("deleted", false);
        if let Some(id) = storage.id {
            duplicate_query = duplicate_query.ne("id", id);
        }
        let duplicate = self.storages.single_or_default(duplicate_query).await?;

        if storage.code.is_empty() {
            errors.set("code", "code is required");
        } else if duplicate.is_some() {
            errors.set("code", "code already exists");
        }

        if storage.name.is_empty() {
            errors.set("name", "name is required");
        }

        if !errors.is_empty() {
            return Err(DomainError::validation(errors));
        }

        storage.stamp(&self.actor.username, "manager");
        Ok(storage)
    }
}
