use models::audit::Actor;
use sea_orm::{ActiveModelTrait, DatabaseConnection};

use super::repository::SeaOrmRepository;
use super::unit_of_work::UnitOfWork;

/// Connection plus the principal a request acts for. Cheap to clone; every
/// unit of work it hands out stamps audit columns with this actor.
#[derive(Clone, Debug)]
pub struct DbContext {
    db: DatabaseConnection,
    actor: Actor,
}

impl DbContext {
    pub fn new(db: DatabaseConnection, actor: Actor) -> Self { Self { db, actor } }

    pub fn actor(&self) -> Actor { self.actor }

    pub fn connection(&self) -> &DatabaseConnection { &self.db }

    pub fn unit_of_work<A: ActiveModelTrait>(&self) -> UnitOfWork<A> {
        UnitOfWork::new(self.db.clone(), self.actor)
    }

    pub fn repository<A: ActiveModelTrait>(&self) -> SeaOrmRepository<A> {
        SeaOrmRepository::new(self.unit_of_work())
    }
}
