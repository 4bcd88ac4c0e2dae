//! Shared fixtures for handler tests: an in-memory app with rate limiting off.

use crate::auth::jwt::generate_access_token;
use crate::auth::revocation::TokenRevocations;
use crate::config::Config;
use crate::model::settings::Settings;
use crate::routes;
use crate::store::{KeyValueStore, StoreError};
use crate::store::cache::CachedStore;
use crate::store::leave_store::LeaveStore;
use crate::store::memory::MemoryStore;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::web::Data;
use actix_web::{App, Error};
use async_trait::async_trait;
use futures::channel::oneshot;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ADMIN_EMAIL: &str = "admin@cuti.test";
pub const ADMIN_PASSWORD: &str = "rahasia";
const JWT_SECRET: &str = "test-secret";

pub struct TestState {
    pub config: Config,
    pub store: Data<LeaveStore>,
    pub cache: Data<CachedStore>,
    pub revocations: Data<TokenRevocations>,
}

pub fn config() -> Config {
    Config {
        server_addr: "127.0.0.1:0".to_string(),
        database_url: None,
        jwt_secret: JWT_SECRET.to_string(),
        access_token_ttl: 3600,
        rate_limit_enabled: false,
        rate_login_per_min: 60,
        rate_public_per_min: 600,
        api_prefix: "/api/v1".to_string(),
        cache_ttl_secs: 30,
        log_dir: "logs".to_string(),
        default_approver_email: ADMIN_EMAIL.to_string(),
        default_admin_password: ADMIN_PASSWORD.to_string(),
    }
}

pub fn state() -> TestState {
    let config = config();
    let cache = Arc::new(CachedStore::new(
        Arc::new(MemoryStore::default()),
        Duration::from_secs(config.cache_ttl_secs),
    ));
    let kv: Arc<dyn KeyValueStore> = cache.clone();
    let store = LeaveStore::new(
        kv,
        Settings::new(&config.default_approver_email, &config.default_admin_password),
    );

    TestState {
        revocations: Data::new(TokenRevocations::new(config.access_token_ttl)),
        store: Data::new(store),
        cache: Data::from(cache),
        config,
    }
}

pub fn app(
    state: &TestState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody + use<>>,
        Error = Error,
        InitError = (),
    > + use<>,
> {
    let config = state.config.clone();

    App::new()
        .app_data(state.store.clone())
        .app_data(state.cache.clone())
        .app_data(state.revocations.clone())
        .app_data(Data::new(config.clone()))
        .configure(move |cfg| routes::configure(cfg, config))
}

/// A valid approver token, without going through the login route.
pub fn token() -> String {
    token_for(ADMIN_EMAIL)
}

pub fn token_for(email: &str) -> String {
    let (token, _) = generate_access_token(email, JWT_SECRET, 3600)
        .expect("token signing works with a static secret");
    token
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// Memory backend whose next `get` can be held open after it has read its value, to interleave a
/// slow reader with writers.
#[derive(Default)]
pub struct GatedStore {
    inner: MemoryStore,
    gate: Mutex<Option<(oneshot::Sender<()>, oneshot::Receiver<()>)>>,
}

impl GatedStore {
    /// Hold the next `get`. The first receiver fires once that read has its value; sending on the
    /// returned sender lets it finish.
    pub fn hold_next_get(&self) -> (oneshot::Receiver<()>, oneshot::Sender<()>) {
        let (fetched_tx, fetched_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        *self.gate.lock().unwrap() = Some((fetched_tx, release_rx));
        (fetched_rx, release_tx)
    }
}

#[async_trait]
impl KeyValueStore for GatedStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self.inner.get(key).await?;
        let gate = self.gate.lock().unwrap().take();
        if let Some((fetched, release)) = gate {
            let _ = fetched.send(());
            let _ = release.await;
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.inner.delete(key).await
    }

    async fn list(&self) -> Result<Vec<(String, String)>, StoreError> {
        self.inner.list().await
    }
}
