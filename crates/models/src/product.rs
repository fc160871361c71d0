use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::audit::{AuditColumns, Auditable};
use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub created_by: Option<Uuid>,
    pub created_at: Option<DateTimeWithTimeZone>,
    pub updated_by: Option<Uuid>,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Auditable for Model {
    fn audit_columns(&mut self) -> Option<AuditColumns<'_>> {
        Some(AuditColumns {
            created_by: &mut self.created_by,
            created_at: &mut self.created_at,
            updated_by: &mut self.updated_by,
            updated_at: &mut self.updated_at,
        })
    }
}

impl Model {
    /// Unsaved product with empty audit columns.
    pub fn new(id: i32, name: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            price,
            created_by: None,
            created_at: None,
            updated_by: None,
            updated_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Identifiers are caller supplied; zero is the "empty" id.
pub fn validate_id(id: i32) -> Result<(), errors::ModelError> {
    if id == 0 {
        return Err(errors::ModelError::validation("'Id' must not be empty."));
    }
    Ok(())
}
