use chrono::Utc;
use futures::lock::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use super::{KeyValueStore, StoreError};
use crate::model::leave_request::{LeaveRequest, LeaveStatus, NewLeaveRequest};
use crate::model::settings::Settings;

pub const REQUESTS_KEY: &str = "leave_requests";
pub const SETTINGS_KEY: &str = "dashboard_settings";

/// Typed access to the leave list and the settings record.
///
/// Reads never fail: a broken or unreadable record is logged and treated as empty (requests) or
/// default (settings). Writes read the current record strictly and bypass any cache, so neither a
/// backend hiccup nor a stale cached copy can wipe it.
pub struct LeaveStore {
    kv: Arc<dyn KeyValueStore>,
    default_settings: Settings,
    write_lock: Mutex<()>,
}

impl LeaveStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, default_settings: Settings) -> Self {
        Self {
            kv,
            default_settings,
            write_lock: Mutex::new(()),
        }
    }

    async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.kv.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Same as `load` but never served from a cache. Used under `write_lock`.
    async fn load_latest<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.kv.get_fresh(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.kv.set(key, &raw).await
    }

    async fn load_requests(&self) -> Result<Vec<LeaveRequest>, StoreError> {
        Ok(self.load(REQUESTS_KEY).await?.unwrap_or_default())
    }

    async fn latest_requests(&self) -> Result<Vec<LeaveRequest>, StoreError> {
        Ok(self.load_latest(REQUESTS_KEY).await?.unwrap_or_default())
    }

    /// All requests, newest first.
    pub async fn requests(&self) -> Vec<LeaveRequest> {
        self.load_requests().await.unwrap_or_else(|e| {
            error!(error = %e, "Error reading leave requests");
            Vec::new()
        })
    }

    pub async fn find(&self, id: &str) -> Option<LeaveRequest> {
        self.requests().await.into_iter().find(|r| r.id == id)
    }

    pub async fn save_request(&self, new: NewLeaveRequest) -> Result<LeaveRequest, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut requests = self.latest_requests().await?;
        let request = new.into_request(Uuid::new_v4().to_string(), Utc::now());
        requests.insert(0, request.clone());
        self.save(REQUESTS_KEY, &requests).await?;

        info!(id = %request.id, division = %request.division, "Leave request stored");
        Ok(request)
    }

    /// Move a PENDING request to `status`. `None` when the id is unknown or the request was
    /// already decided.
    pub async fn decide(
        &self,
        id: &str,
        status: LeaveStatus,
    ) -> Result<Option<LeaveRequest>, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut requests = self.latest_requests().await?;
        let Some(request) = requests
            .iter_mut()
            .find(|r| r.id == id && r.status == LeaveStatus::Pending)
        else {
            return Ok(None);
        };

        request.status = status;
        let updated = request.clone();
        self.save(REQUESTS_KEY, &requests).await?;

        info!(id, status = %status, "Leave request decided");
        Ok(Some(updated))
    }

    /// Returns whether a request with `id` existed.
    pub async fn delete_request(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut requests = self.latest_requests().await?;
        let before = requests.len();
        requests.retain(|r| r.id != id);
        if requests.len() == before {
            return Ok(false);
        }

        self.save(REQUESTS_KEY, &requests).await?;
        info!(id, "Leave request deleted");
        Ok(true)
    }

    pub async fn settings(&self) -> Settings {
        match self.load(SETTINGS_KEY).await {
            Ok(Some(settings)) => settings,
            Ok(None) => self.default_settings.clone(),
            Err(e) => {
                error!(error = %e, "Error reading settings");
                self.default_settings.clone()
            }
        }
    }

    pub async fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.save(SETTINGS_KEY, settings).await
    }

    /// Read-modify-write of the settings record. Nothing is written when `change` fails.
    pub async fn update_settings<F, E>(&self, change: F) -> Result<Settings, E>
    where
        F: FnOnce(&mut Settings) -> Result<(), E>,
        E: From<StoreError>,
    {
        let _guard = self.write_lock.lock().await;

        let mut settings = self
            .load_latest(SETTINGS_KEY)
            .await?
            .unwrap_or_else(|| self.default_settings.clone());
        change(&mut settings)?;
        self.save(SETTINGS_KEY, &settings).await?;

        Ok(settings)
    }
}
