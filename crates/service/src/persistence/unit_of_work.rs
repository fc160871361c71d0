//! Change-tracking unit of work.
//!
//! Entries are staged as added, modified or removed and written together by
//! [`UnitOfWork::commit`] inside one database transaction. Audit columns are
//! stamped once per commit, before anything reaches the store.

use std::marker::PhantomData;

use chrono::Utc;
use models::audit::{Actor, Auditable};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    IntoActiveModel, Iterable, ModelTrait, PrimaryKeyToColumn, TransactionTrait, Value,
};
use tracing::{debug, info, warn};

use super::errors::{RepositoryError, RepositoryResult};

/// Model type written through active model `A`.
pub type ModelOf<A> = <<A as ActiveModelTrait>::Entity as EntityTrait>::Model;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryState {
    Unchanged,
    Added,
    Modified,
    Deleted,
}

/// A tracked record and what the next commit will do with it.
#[derive(Clone, Debug)]
pub struct Entry<M> {
    key: Vec<Value>,
    state: EntryState,
    model: M,
}

impl<M> Entry<M> {
    /// Primary key values, in primary key column order.
    pub fn key(&self) -> &[Value] { &self.key }

    pub fn state(&self) -> EntryState { self.state }

    pub fn model(&self) -> &M { &self.model }

    fn is_pending(&self) -> bool { self.state != EntryState::Unchanged }
}

/// Request-scoped tracker for records of one entity.
///
/// Not shareable between callers: every mutating method takes `&mut self`.
pub struct UnitOfWork<A: ActiveModelTrait> {
    db: DatabaseConnection,
    actor: Actor,
    entries: Vec<Entry<ModelOf<A>>>,
    _active: PhantomData<fn() -> A>,
}

impl<A: ActiveModelTrait> UnitOfWork<A> {
    pub fn new(db: DatabaseConnection, actor: Actor) -> Self {
        Self { db, actor, entries: Vec::new(), _active: PhantomData }
    }

    pub fn actor(&self) -> Actor { self.actor }

    pub fn connection(&self) -> &DatabaseConnection { &self.db }

    pub fn entries(&self) -> impl Iterator<Item = &Entry<ModelOf<A>>> + '_ { self.entries.iter() }

    pub fn entry(&self, key: &[Value]) -> Option<&Entry<ModelOf<A>>> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// True when the next commit has something to write.
    pub fn has_changes(&self) -> bool { self.entries.iter().any(Entry::is_pending) }

    pub fn pending_count(&self) -> usize { self.entries.iter().filter(|e| e.is_pending()).count() }

    /// Forget every tracked entry, pending or not.
    pub fn detach_all(&mut self) { self.entries.clear(); }

    fn position(&self, key: &[Value]) -> Option<usize> { self.entries.iter().position(|e| e.key == key) }

    fn accept_changes(&mut self) {
        self.entries.retain(|e| e.state != EntryState::Deleted);
        for entry in &mut self.entries {
            entry.state = EntryState::Unchanged;
        }
    }

    fn revert_changes(&mut self) -> usize {
        let mut reverted = 0;
        for entry in &mut self.entries {
            if matches!(entry.state, EntryState::Added | EntryState::Modified) {
                entry.state = EntryState::Unchanged;
                reverted += 1;
            }
        }
        reverted
    }
}

impl<A> UnitOfWork<A>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send + Sync + 'static,
    ModelOf<A>: IntoActiveModel<A> + Auditable + PartialEq + Sync,
{
    /// Primary key values of `model`.
    pub fn key_of(model: &ModelOf<A>) -> Vec<Value> {
        <A::Entity as EntityTrait>::PrimaryKey::iter()
            .map(|pk| model.get(pk.into_column()))
            .collect()
    }

    /// Stage `model` for insertion. Returns its key.
    ///
    /// A key already staged for insertion is rejected and the existing entry kept.
    pub fn stage_added(&mut self, model: ModelOf<A>) -> RepositoryResult<Vec<Value>> {
        let key = Self::key_of(&model);
        match self.position(&key) {
            Some(i) => {
                let entry = &mut self.entries[i];
                if entry.state == EntryState::Added {
                    return Err(RepositoryError::DuplicateKey(format!("{key:?}")));
                }
                // a row pending deletion still exists in the store
                entry.state = if entry.state == EntryState::Deleted { EntryState::Modified } else { EntryState::Added };
                entry.model = model;
            }
            None => self.entries.push(Entry { key: key.clone(), state: EntryState::Added, model }),
        }
        Ok(key)
    }

    /// Stage a batch for insertion. The batch is checked as a whole first,
    /// so a rejected batch leaves nothing staged.
    pub fn stage_added_all(&mut self, models: Vec<ModelOf<A>>) -> RepositoryResult<Vec<Vec<Value>>> {
        let keys: Vec<_> = models.iter().map(Self::key_of).collect();
        for (i, key) in keys.iter().enumerate() {
            let staged = self.position(key).is_some_and(|p| self.entries[p].state == EntryState::Added);
            if staged || keys[..i].contains(key) {
                return Err(RepositoryError::DuplicateKey(format!("{key:?}")));
            }
        }
        for model in models {
            self.stage_added(model)?;
        }
        Ok(keys)
    }

    /// Stage `model` as modified, whether or not its values changed.
    pub fn stage_modified(&mut self, model: ModelOf<A>) -> Vec<Value> {
        let key = Self::key_of(&model);
        match self.position(&key) {
            Some(i) => {
                let entry = &mut self.entries[i];
                if entry.state != EntryState::Added {
                    entry.state = EntryState::Modified;
                }
                entry.model = model;
            }
            None => self.entries.push(Entry { key: key.clone(), state: EntryState::Modified, model }),
        }
        key
    }

    /// Stage `model` for deletion. An entry that was only staged for insertion
    /// is dropped instead, since the store never saw it.
    pub fn stage_removed(&mut self, model: ModelOf<A>) -> Vec<Value> {
        let key = Self::key_of(&model);
        match self.position(&key) {
            Some(i) if self.entries[i].state == EntryState::Added => {
                self.entries.remove(i);
            }
            Some(i) => {
                let entry = &mut self.entries[i];
                entry.state = EntryState::Deleted;
                entry.model = model;
            }
            None => self.entries.push(Entry { key: key.clone(), state: EntryState::Deleted, model }),
        }
        key
    }

    /// Track a record loaded from the store. Pending entries are left alone.
    pub fn attach(&mut self, model: ModelOf<A>) {
        let key = Self::key_of(&model);
        match self.position(&key) {
            Some(i) if self.entries[i].state == EntryState::Unchanged => self.entries[i].model = model,
            Some(_) => {}
            None => self.entries.push(Entry { key, state: EntryState::Unchanged, model }),
        }
    }

    /// Change detection: a tracked unchanged record whose values differ from
    /// `model` becomes modified. Untracked records are staged as modified.
    pub fn track_changes(&mut self, model: ModelOf<A>) -> EntryState {
        let key = Self::key_of(&model);
        match self.position(&key) {
            Some(i) => {
                let entry = &mut self.entries[i];
                if entry.state == EntryState::Unchanged && entry.model != model {
                    entry.state = EntryState::Modified;
                }
                entry.model = model;
                entry.state
            }
            None => {
                self.entries.push(Entry { key, state: EntryState::Modified, model });
                EntryState::Modified
            }
        }
    }

    /// Stamp audit columns, then write every pending entry in one transaction.
    ///
    /// On failure the staged additions and modifications are reverted to
    /// unchanged, remaining deletions are written once more, and the original
    /// failure is returned as [`RepositoryError::CommitConflict`].
    pub async fn commit(&mut self) -> RepositoryResult<usize> {
        if !self.has_changes() {
            debug!("nothing pending; commit skipped");
            return Ok(0);
        }
        self.stamp_audit_columns();
        match self.write_pending().await {
            Ok(written) => {
                self.accept_changes();
                debug!(written, actor = %self.actor, "unit of work committed");
                Ok(written)
            }
            Err(err) => {
                let reverted = self.revert_changes();
                warn!(error = %err, reverted, "commit failed; staged additions and modifications reverted");
                self.recommit_after_revert().await;
                Err(RepositoryError::CommitConflict(err.to_string()))
            }
        }
    }

    fn stamp_audit_columns(&mut self) {
        let actor = self.actor;
        let now = Utc::now();
        for entry in &mut self.entries {
            let state = entry.state;
            let Some(columns) = entry.model.audit_columns() else { continue };
            match state {
                EntryState::Added => columns.stamp_created(actor, now),
                EntryState::Modified => columns.stamp_updated(actor, now),
                EntryState::Deleted | EntryState::Unchanged => {}
            }
        }
    }

    async fn recommit_after_revert(&mut self) {
        if !self.has_changes() {
            return;
        }
        match self.write_pending().await {
            Ok(written) => {
                self.accept_changes();
                info!(written, "pending deletions re-committed after rollback");
            }
            Err(err) => {
                warn!(error = %err, "re-commit after rollback failed; detaching staged deletions");
                self.entries.retain(|e| e.state != EntryState::Deleted);
            }
        }
    }

    async fn write_pending(&self) -> Result<usize, DbErr> {
        let txn = self.db.begin().await?;
        let mut written = 0;
        for entry in self.entries.iter().filter(|e| e.is_pending()) {
            if let Err(err) = Self::write_entry(&txn, entry).await {
                if let Err(rollback_err) = txn.rollback().await {
                    warn!(error = %rollback_err, "transaction rollback failed");
                }
                return Err(err);
            }
            written += 1;
        }
        txn.commit().await?;
        Ok(written)
    }

    async fn write_entry(txn: &DatabaseTransaction, entry: &Entry<ModelOf<A>>) -> Result<(), DbErr> {
        let active = mark_all_set(entry.model.clone().into_active_model());
        match entry.state {
            EntryState::Added => {
                <A::Entity as EntityTrait>::insert(active).exec_without_returning(txn).await?;
            }
            EntryState::Modified => {
                <A::Entity as EntityTrait>::update(active).exec(txn).await?;
            }
            EntryState::Deleted => {
                let result = <A::Entity as EntityTrait>::delete(active).exec(txn).await?;
                if result.rows_affected == 0 {
                    return Err(DbErr::RecordNotFound("no row matched the staged deletion".into()));
                }
            }
            EntryState::Unchanged => {}
        }
        Ok(())
    }
}

/// Every column carrying a value becomes `Set`, so inserts and updates write
/// the full record.
fn mark_all_set<A: ActiveModelTrait>(mut active: A) -> A {
    for column in <A::Entity as EntityTrait>::Column::iter() {
        if let Some(value) = active.get(column).into_value() {
            active.set(column, value);
        }
    }
    active
}
