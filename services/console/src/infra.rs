use std::sync::Arc;

use rentease::config::{AdminSeed, AppConfig, StoreBackend, StoreConfig};
use rentease::error::AppError;
use rentease::geocoding::{self, PincodeLookup};
use rentease::marketplace::{
    PropertyRepository, PropertyService, RentalWorkflow, RequestRepository, RequestService,
    UserRepository, UserService,
};
use rentease::store::{MemoryStore, MongoStore};
use tracing::{info, warn};

pub(crate) type Marketplace =
    RentalWorkflow<dyn UserRepository, dyn PropertyRepository, dyn RequestRepository>;

/// Everything a console session needs.
pub(crate) struct App {
    pub(crate) marketplace: Marketplace,
    pub(crate) lookup: Box<dyn PincodeLookup>,
    pub(crate) max_login_attempts: u32,
}

struct Repositories {
    users: Arc<dyn UserRepository>,
    properties: Arc<dyn PropertyRepository>,
    requests: Arc<dyn RequestRepository>,
}

impl Repositories {
    fn shared<S>(store: Arc<S>) -> Self
    where
        S: UserRepository + PropertyRepository + RequestRepository + 'static,
    {
        Self {
            users: store.clone(),
            properties: store.clone(),
            requests: store,
        }
    }
}

impl App {
    fn new(
        repositories: Repositories,
        lookup: Box<dyn PincodeLookup>,
        max_login_attempts: u32,
        rented_sync_attempts: u32,
    ) -> Self {
        let marketplace = RentalWorkflow::new(
            UserService::new(repositories.users),
            PropertyService::new(repositories.properties),
            RequestService::new(repositories.requests),
            rented_sync_attempts,
        );
        Self {
            marketplace,
            lookup,
            max_login_attempts: max_login_attempts.max(1),
        }
    }

    /// In-memory app with lookups disabled, for scripted sessions.
    #[cfg(test)]
    pub(crate) fn in_memory(store: Arc<MemoryStore>) -> Self {
        Self::with_lookup(store, Box::new(geocoding::DisabledLookup))
    }

    #[cfg(test)]
    pub(crate) fn with_lookup(store: Arc<MemoryStore>, lookup: Box<dyn PincodeLookup>) -> Self {
        Self::new(Repositories::shared(store), lookup, 3, 3)
    }
}

fn open_store(config: &StoreConfig) -> Result<Repositories, AppError> {
    match config.backend {
        StoreBackend::Memory => {
            warn!("using the in-memory store; nothing survives this session");
            Ok(Repositories::shared(Arc::new(MemoryStore::new())))
        }
        StoreBackend::MongoDb => {
            let store = MongoStore::connect(config)?;
            info!(database = %config.database, "connected to document store");
            Ok(Repositories::shared(Arc::new(store)))
        }
    }
}

pub(crate) fn build_app(config: &AppConfig) -> Result<App, AppError> {
    let repositories = open_store(&config.store)?;
    let app = App::new(
        repositories,
        geocoding::from_config(&config.geocoding),
        config.auth.max_login_attempts,
        config.rentals.rented_sync_attempts,
    );
    if let Some(seed) = &config.auth.admin {
        bootstrap_admin(&app, seed)?;
    }
    Ok(app)
}

fn bootstrap_admin(app: &App, seed: &AdminSeed) -> Result<(), AppError> {
    let admin = app
        .marketplace
        .users()
        .ensure_admin(&seed.username, &seed.password)?;
    info!(username = %admin.username, "administrator account ready");
    Ok(())
}
