//! Article variants: sellable configurations of a base article.

use serde::{Deserialize, Serialize};
use stockroom_core::{Actor, AuditStamp, DocId, DomainError, DomainResult, ValidationErrors};
use stockroom_store::{Clause, Collection, Db, Document, FieldValue, Find, Page, Paging, Query};

/// A specific sellable configuration (size etc.) of a base article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleVariant {
    pub id: Option<DocId>,
    pub code: String,
    pub name: String,
    pub size: String,
    pub description: String,
    /// Retail price in minor currency units.
    pub retail_price: i64,
    pub deleted: bool,
    pub audit: AuditStamp,
}

impl Document for ArticleVariant {
    const COLLECTION: &'static str = "article-variants";

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
            "size" => Some(self.size.clone().into()),
            "deleted" => Some(self.deleted.into()),
            _ => None,
        }
    }

    fn audit_mut(&mut self) -> &mut AuditStamp {
        &mut self.audit
    }
}

/// CRUD manager for [`ArticleVariant`] records.
pub struct ArticleVariantManager {
    variants: Collection<ArticleVariant>,
    actor: Actor,
}

impl ArticleVariantManager {
    pub fn new(db: &Db, actor: Actor) -> Self {
        Self {
            variants: db.collection(),
            actor,
        }
    }

    /// Page through non-deleted variants; keyword matches code or name.
    pub async fn read(&self, paging: Paging) -> DomainResult<Page<ArticleVariant>> {
        let mut query = Query::new().eq("deleted", false);
        if let Some(keyword) = &paging.keyword {
            query = query.any_of(vec![
                Clause::contains("code", keyword.clone()),
                Clause::contains("name", keyword.clone()),
            ]);
        }

        Ok(self
            .variants
            .find(query)
            .page(paging.page, paging.size)
            .order_by(paging.order.as_str(), paging.asc)
            .execute()
            .await?)
    }

    pub async fn get_by_id(&self, id: DocId) -> DomainResult<ArticleVariant> {
        Ok(self
            .variants
            .single(Query::new().eq("id", id).eq("deleted", false))
            .await?)
    }

    pub async fn get_by_id_or_default(&self, id: DocId) -> DomainResult<Option<ArticleVariant>> {
        Ok(self
            .variants
            .single_or_default(Query::new().eq("id", id).eq("deleted", false))
            .await?)
    }

    pub async fn create(&self, variant: ArticleVariant) -> DomainResult<DocId> {
        let valid = self.validate(variant).await?;
        let id = self.variants.insert(valid).await?;
        tracing::debug!(%id, "article variant created");
        Ok(id)
    }

    pub async fn update(&self, variant: ArticleVariant) -> DomainResult<DocId> {
        let valid = self.validate(variant).await?;
        Ok(self.variants.update(valid).await?)
    }

    pub async fn delete(&self, variant: ArticleVariant) -> DomainResult<DocId> {
        let mut valid = self.validate(variant).await?;
        valid.deleted = true;
        Ok(self.variants.update(valid).await?)
    }

    async fn validate(&self, mut variant: ArticleVariant) -> DomainResult<ArticleVariant> {
        let mut errors = ValidationErrors::new();

        let mut duplicate_query = Query::new().eq("code", variant.code.clone()).eq("deleted", false);
        if let Some(id) = variant.id {
            duplicate_query = duplicate_query.ne("id", id);
        }
        let duplicate = self.variants.single_or_default(duplicate_query).await?;

        if variant.code.is_empty() {
            errors.set("code", "code is required");
        } else if duplicate.is_some() {
            errors.set("code", "code already exists");
        }

        if variant.name.is_empty() {
            errors.set("name", "name is required");
        }

        if !errors.is_empty() {
            return Err(DomainError::validation(errors));
        }

        variant.stamp(&self.actor.username, "manager");
        Ok(variant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(db: &Db) -> ArticleVariantManager {
        ArticleVariantManager::new(db, Actor::new("unit-test"))
    }

    fn variant(code: &str) -> ArticleVariant {
        ArticleVariant {
            code: code.to_string(),
            name: format!("name[{code}]"),
            size: "M".to_string(),
            description: format!("description for {code}"),
            retail_price: 14900,
            ..ArticleVariant::default()
        }
    }

    #[tokio::test]
    async fn create_update_delete_lifecycle() {
        let db = Db::new();
        let manager = manager(&db);

        let id = manager.create(variant("AV-001")).await.unwrap();

        let mut stored = manager.get_by_id(id).await.unwrap();
        stored.code = "AV-001[updated]".to_string();
        stored.name += "[updated]";
        assert_eq!(manager.update(stored).await.unwrap(), id);

        let updated = manager.get_by_id(id).await.unwrap();
        assert_eq!(updated.code, "AV-001[updated]");

        manager.delete(updated).await.unwrap();
        assert_eq!(manager.get_by_id_or_default(id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_keeps_code_uniqueness_against_others() {
        let db = Db::new();
        let manager = manager(&db);

        manager.create(variant("AV-001")).await.unwrap();
        let id = manager.create(variant("AV-002")).await.unwrap();

        let mut second = manager.get_by_id(id).await.unwrap();
        second.code = "AV-001".to_string();
        let err = manager.update(second).await.unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap().get("code"),
            Some("code already exists")
        );

        // Updating without changing the code does not trip on itself.
        let unchanged = manager.get_by_id(id).await.unwrap();
        assert_eq!(manager.update(unchanged).await.unwrap(), id);
    }
}
