//! Audit capability shared by persisted records.
//!
//! A record that carries `created_by`/`created_at`/`updated_by`/`updated_at`
//! columns exposes them through [`Auditable`]; the persistence layer stamps
//! them while committing a unit of work. Records without audit columns return
//! `None` and are written untouched.

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The principal on whose behalf a unit of work writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor(Uuid);

impl Actor {
    pub fn new(id: Uuid) -> Self { Self(id) }

    /// Explicit identity for calls that carry no authenticated principal.
    pub fn anonymous() -> Self { Self(Uuid::nil()) }

    pub fn id(&self) -> Uuid { self.0 }

    pub fn is_anonymous(&self) -> bool { self.0.is_nil() }
}

impl Default for Actor {
    fn default() -> Self { Self::anonymous() }
}

impl From<Uuid> for Actor {
    fn from(id: Uuid) -> Self { Self(id) }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// Mutable view over a record's audit columns.
pub struct AuditColumns<'a> {
    pub created_by: &'a mut Option<Uuid>,
    pub created_at: &'a mut Option<DateTime<FixedOffset>>,
    pub updated_by: &'a mut Option<Uuid>,
    pub updated_at: &'a mut Option<DateTime<FixedOffset>>,
}

impl AuditColumns<'_> {
    /// First persistence: who and when created.
    pub fn stamp_created(self, actor: Actor, at: DateTime<Utc>) {
        *self.created_by = Some(actor.id());
        *self.created_at = Some(at.into());
    }

    /// Every later mutation: who and when last updated.
    pub fn stamp_updated(self, actor: Actor, at: DateTime<Utc>) {
        *self.updated_at = Some(at.into());
        *self.updated_by = Some(actor.id());
    }
}

pub trait Auditable {
    /// `None` for records that carry no audit columns.
    fn audit_columns(&mut self) -> Option<AuditColumns<'_>>;
}
