//! Vehicle status cache
//!
//! Holds the last status fetched for the selected vehicle and coordinates
//! refreshes against the gateway.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::gateway::{GatewayError, LocationProvider, TemperatureProvider, VehicleGateway};
use crate::vehicle::{Vehicle, VehicleStatus};

#[derive(Debug, Default)]
struct CacheMeta {
    /// Vehicle the cached snapshot belongs to
    vehicle_id: Option<Uuid>,
    last_updated: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl CacheMeta {
    /// An unbound cache accepts any vehicle
    fn is_bound_to(&self, vehicle_id: Uuid) -> bool {
        self.vehicle_id.map_or(true, |bound| bound == vehicle_id)
    }
}

/// Last-known status of the selected vehicle
pub struct StatusCache {
    snapshot: watch::Sender<Option<VehicleStatus>>,
    meta: Mutex<CacheMeta>,
    location: Option<Arc<dyn LocationProvider>>,
    temperature: Option<Arc<dyn TemperatureProvider>>,
}

impl StatusCache {
    /// Create an empty cache without enrichment providers
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(None);
        Self {
            snapshot,
            meta: Mutex::new(CacheMeta::default()),
            location: None,
            temperature: None,
        }
    }

    /// Install a live location source used on every refresh
    pub fn with_location_provider(mut self, provider: Arc<dyn LocationProvider>) -> Self {
        self.location = Some(provider);
        self
    }

    /// Install a temperature lookup keyed on the (possibly live) location
    pub fn with_temperature_provider(mut self, provider: Arc<dyn TemperatureProvider>) -> Self {
        self.temperature = Some(provider);
        self
    }

    fn meta(&self) -> MutexGuard<'_, CacheMeta> {
        self.meta.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Cached snapshot, if any
    pub fn current(&self) -> Option<VehicleStatus> {
        self.snapshot.borrow().clone()
    }

    /// Cached outside temperature (°F)
    pub fn outside_temp_f(&self) -> Option<f64> {
        self.snapshot.borrow().as_ref().map(|s| s.outside_temp_f)
    }

    /// When the snapshot was last replaced
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.meta().last_updated
    }

    /// Error from the most recent refresh, cleared by the next success
    pub fn last_error(&self) -> Option<String> {
        self.meta().last_error.clone()
    }

    /// Whether the most recent refresh failed
    pub fn has_error(&self) -> bool {
        self.meta().last_error.is_some()
    }

    /// Subscribe to snapshot changes.
    ///
    /// Receivers are only woken when the snapshot changes structurally.
    pub fn subscribe(&self) -> watch::Receiver<Option<VehicleStatus>> {
        self.snapshot.subscribe()
    }

    /// Bind the cache to a vehicle, dropping a snapshot that belongs to
    /// another one
    pub fn bind(&self, vehicle_id: Option<Uuid>) {
        let mut meta = self.meta();
        if meta.vehicle_id == vehicle_id {
            return;
        }
        debug!(?vehicle_id, "status cache rebound, clearing snapshot");
        *meta = CacheMeta {
            vehicle_id,
            ..Default::default()
        };
        self.snapshot.send_if_modified(|s| s.take().is_some());
    }

    /// Fetch the vehicle's status and replace the cached snapshot.
    ///
    /// On failure the previous snapshot is kept and the error is recorded.
    pub async fn refresh(
        &self,
        gateway: &dyn VehicleGateway,
        vehicle: &Vehicle,
    ) -> Result<VehicleStatus, GatewayError> {
        let fetched = match gateway.fetch_status(vehicle).await {
            Ok(status) => status.normalized(),
            Err(e) => {
                warn!(vehicle = %vehicle.id, error = %e, "status refresh failed");
                let mut meta = self.meta();
                if meta.is_bound_to(vehicle.id) {
                    meta.last_error = Some(e.to_string());
                } else {
                    debug!(vehicle = %vehicle.id, "ignoring failure for unselected vehicle");
                }
                return Err(e);
            }
        };

        let status = self.enrich(fetched).await;

        {
            let mut meta = self.meta();
            if !meta.is_bound_to(vehicle.id) {
                debug!(vehicle = %vehicle.id, "discarding status for unselected vehicle");
                return Ok(status);
            }
            meta.vehicle_id = Some(vehicle.id);
            meta.last_updated = Some(Utc::now());
            meta.last_error = None;
        }

        let next = status.clone();
        self.snapshot.send_if_modified(|current| {
            if current.as_ref() == Some(&next) {
                false
            } else {
                *current = Some(next);
                true
            }
        });
        debug!(
            vehicle = %vehicle.id,
            locked = status.is_locked,
            running = status.engine_running,
            outside_temp_f = status.outside_temp_f,
            "status refreshed"
        );
        Ok(status)
    }

    /// Overwrite location with a live fix, then the outside temperature with
    /// a lookup at that location. Failures keep the gateway's values.
    async fn enrich(&self, mut status: VehicleStatus) -> VehicleStatus {
        if let Some(provider) = &self.location {
            if let Some(location) = provider.current_location().await {
                status.location = location;
            }
        }
        if let Some(provider) = &self.temperature {
            match provider.outside_temperature_f(status.location).await {
                Ok(temp_f) => status.outside_temp_f = temp_f,
                Err(e) => warn!(error = %e, "temperature lookup failed, keeping reported value"),
            }
        }
        status
    }
}

impl Default for StatusCache {
    fn default() -> Self {
        Self::new()
    }
}
