//! Business logic services

pub mod auth;
pub mod cache;
pub mod equipment;
pub mod events;
pub mod transfers;

use crate::{
    config::{AuthConfig, CacheConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub equipment: equipment::EquipmentService,
    pub events: events::EventsService,
    pub transfers: transfers::TransfersService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig, cache_config: &CacheConfig) -> Self {
        let categories_cache = cache::CategoryCache::new(cache_config.categories_ttl_secs);
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            equipment: equipment::EquipmentService::new(repository.clone(), categories_cache),
            events: events::EventsService::new(repository.clone()),
            transfers: transfers::TransfersService::new(repository),
        }
    }
}
