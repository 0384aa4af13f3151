//! Repository layer for database operations

pub mod categories;
pub mod equipment;
pub mod events;
pub mod transfers;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub categories: categories::CategoriesRepository,
    pub equipment: equipment::EquipmentRepository,
    pub events: events::EventsRepository,
    pub transfers: transfers::TransfersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            categories: categories::CategoriesRepository::new(pool.clone()),
            equipment: equipment::EquipmentRepository::new(pool.clone()),
            events: events::EventsRepository::new(pool.clone()),
            transfers: transfers::TransfersRepository::new(pool.clone()),
            pool,
        }
    }
}
