use async_trait::async_trait;
use models::audit::Auditable;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, EntityTrait, IntoActiveModel, Iterable, PrimaryKeyToColumn,
    PrimaryKeyTrait, QueryOrder, QuerySelect, Select, Value,
};
use tracing::debug;

use super::errors::{RepositoryError, RepositoryResult};
use super::unit_of_work::{ModelOf, UnitOfWork};
use crate::pagination::Pagination;

/// Generic CRUD over one entity type.
///
/// Mutations accept anything convertible into `Option`; passing `None` fails
/// with [`RepositoryError::ArgumentMissing`] before anything is staged. Each
/// mutation commits immediately and returns the stamped records.
#[async_trait]
pub trait Repository<M>: Send + Sync
where
    M: Send + Sync + 'static,
{
    type Id: Send + 'static;

    /// Store lookup. `None` when no row has this id.
    async fn get_by_id(&self, id: Self::Id) -> RepositoryResult<Option<M>>;

    async fn insert<T>(&mut self, entity: T) -> RepositoryResult<M>
    where
        T: Into<Option<M>> + Send;

    async fn bulk_insert<T>(&mut self, entities: T) -> RepositoryResult<Vec<M>>
    where
        T: Into<Option<Vec<M>>> + Send;

    async fn update<T>(&mut self, entity: T) -> RepositoryResult<M>
    where
        T: Into<Option<M>> + Send;

    async fn bulk_update<T>(&mut self, entities: T) -> RepositoryResult<Vec<M>>
    where
        T: Into<Option<Vec<M>>> + Send;

    async fn delete<T>(&mut self, entity: T) -> RepositoryResult<()>
    where
        T: Into<Option<M>> + Send;

    async fn bulk_delete<T>(&mut self, entities: T) -> RepositoryResult<()>
    where
        T: Into<Option<Vec<M>>> + Send;

    /// Every row in key order; rows are tracked as unchanged.
    async fn get_all(&mut self) -> RepositoryResult<Vec<M>>;

    /// Every row in key order, untracked.
    async fn get_all_as_no_tracking(&self) -> RepositoryResult<Vec<M>>;

    /// Rows `[(page_number - 1) * page_size, page_number * page_size)` in key order.
    async fn get_all_with_pagination(&self, page_number: u64, page_size: u64) -> RepositoryResult<Vec<M>>;

    /// Commit whatever is staged. Returns the number of rows written.
    async fn save(&mut self) -> RepositoryResult<usize>;
}

/// [`Repository`] over a sea-orm entity, writing through a [`UnitOfWork`].
pub struct SeaOrmRepository<A: ActiveModelTrait> {
    unit_of_work: UnitOfWork<A>,
}

impl<A: ActiveModelTrait> SeaOrmRepository<A> {
    pub fn new(unit_of_work: UnitOfWork<A>) -> Self { Self { unit_of_work } }

    pub fn unit_of_work(&self) -> &UnitOfWork<A> { &self.unit_of_work }

    pub fn unit_of_work_mut(&mut self) -> &mut UnitOfWork<A> { &mut self.unit_of_work }

    fn ordered_by_key() -> Select<A::Entity> {
        <A::Entity as EntityTrait>::PrimaryKey::iter()
            .fold(<A::Entity as EntityTrait>::find(), |query, pk| query.order_by_asc(pk.into_column()))
    }

    fn tracked(&self, key: &[Value]) -> RepositoryResult<ModelOf<A>> {
        self.unit_of_work
            .entry(key)
            .map(|entry| entry.model().clone())
            .ok_or_else(|| RepositoryError::Db("committed record is no longer tracked".to_string()))
    }
}

#[async_trait]
impl<A> Repository<ModelOf<A>> for SeaOrmRepository<A>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send + Sync + 'static,
    ModelOf<A>: IntoActiveModel<A> + Auditable + PartialEq + Sync + 'static,
    <<A::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType: Send + 'static,
{
    type Id = <<A::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

    async fn get_by_id(&self, id: Self::Id) -> RepositoryResult<Option<ModelOf<A>>> {
        let found = <A::Entity as EntityTrait>::find_by_id(id).one(self.unit_of_work.connection()).await?;
        Ok(found)
    }

    async fn insert<T>(&mut self, entity: T) -> RepositoryResult<ModelOf<A>>
    where
        T: Into<Option<ModelOf<A>>> + Send,
    {
        let entity = entity.into().ok_or(RepositoryError::ArgumentMissing("entity"))?;
        let key = self.unit_of_work.stage_added(entity)?;
        self.unit_of_work.commit().await?;
        self.tracked(&key)
    }

    async fn bulk_insert<T>(&mut self, entities: T) -> RepositoryResult<Vec<ModelOf<A>>>
    where
        T: Into<Option<Vec<ModelOf<A>>>> + Send,
    {
        let entities = entities.into().ok_or(RepositoryError::ArgumentMissing("entities"))?;
        let keys = self.unit_of_work.stage_added_all(entities)?;
        self.unit_of_work.commit().await?;
        keys.iter().map(|key| self.tracked(key)).collect()
    }

    async fn update<T>(&mut self, entity: T) -> RepositoryResult<ModelOf<A>>
    where
        T: Into<Option<ModelOf<A>>> + Send,
    {
        let entity = entity.into().ok_or(RepositoryError::ArgumentMissing("entity"))?;
        let key = self.unit_of_work.stage_modified(entity);
        self.unit_of_work.commit().await?;
        self.tracked(&key)
    }

    async fn bulk_update<T>(&mut self, entities: T) -> RepositoryResult<Vec<ModelOf<A>>>
    where
        T: Into<Option<Vec<ModelOf<A>>>> + Send,
    {
        let entities = entities.into().ok_or(RepositoryError::ArgumentMissing("entities"))?;
        let keys: Vec<_> = entities.into_iter().map(|e| self.unit_of_work.stage_modified(e)).collect();
        self.unit_of_work.commit().await?;
        keys.iter().map(|key| self.tracked(key)).collect()
    }

    async fn delete<T>(&mut self, entity: T) -> RepositoryResult<()>
    where
        T: Into<Option<ModelOf<A>>> + Send,
    {
        let entity = entity.into().ok_or(RepositoryError::ArgumentMissing("entity"))?;
        self.unit_of_work.stage_removed(entity);
        self.unit_of_work.commit().await?;
        Ok(())
    }

    async fn bulk_delete<T>(&mut self, entities: T) -> RepositoryResult<()>
    where
        T: Into<Option<Vec<ModelOf<A>>>> + Send,
    {
        let entities = entities.into().ok_or(RepositoryError::ArgumentMissing("entities"))?;
        for entity in entities {
            self.unit_of_work.stage_removed(entity);
        }
        self.unit_of_work.commit().await?;
        Ok(())
    }

    async fn get_all(&mut self) -> RepositoryResult<Vec<ModelOf<A>>> {
        let rows = Self::ordered_by_key().all(self.unit_of_work.connection()).await?;
        for row in &rows {
            self.unit_of_work.attach(row.clone());
        }
        Ok(rows)
    }

    async fn get_all_as_no_tracking(&self) -> RepositoryResult<Vec<ModelOf<A>>> {
        let rows = Self::ordered_by_key().all(self.unit_of_work.connection()).await?;
        Ok(rows)
    }

    async fn get_all_with_pagination(&self, page_number: u64, page_size: u64) -> RepositoryResult<Vec<ModelOf<A>>> {
        let page = Pagination::new(page_number, page_size);
        if page.is_empty() {
            return Ok(Vec::new());
        }
        let (offset, limit) = page.normalize();
        debug!(page_number, page_size, offset, "loading page");
        let rows = Self::ordered_by_key()
            .offset(offset)
            .limit(limit)
            .all(self.unit_of_work.connection())
            .await?;
        Ok(rows)
    }

    async fn save(&mut self) -> RepositoryResult<usize> { self.unit_of_work.commit().await }
}
