use crate::{
    ConnectionHandle, ConnectionId, ConnectionLimits, Metrics, Result as WsErrorResult, WsError,
};

use std::collections::HashMap;
use std::panic::Location;
use std::sync::Arc;

use axum::extract::ws::Message;
use error_location::ErrorLocation;
use log::{info, warn};
use tokio::sync::{RwLock, mpsc};

/// Registry of live subscriber connections, grouped by API key.
///
/// All admissions and releases for a key are serialized through one lock, so
/// the quota check and the insert are a single atomic step: two concurrent
/// admissions can never both observe "under quota" and jointly exceed it.
/// Broadcast never iterates under the lock - it takes a `snapshot` first.
pub struct ConnectionRegistry {
    inner: Arc<RwLock<RegistryInner>>,
    limits: ConnectionLimits,
    metrics: Metrics,
}

struct RegistryInner {
    /// Live connections per API key. Entries are created on first admission
    /// and removed when the last connection for the key is released, so an
    /// absent key is equivalent to an empty group.
    groups: HashMap<Arc<str>, HashMap<ConnectionId, ConnectionHandle>>,
}

impl ConnectionRegistry {
    pub fn new(limits: ConnectionLimits, metrics: Metrics) -> Self {
        Self {
            inner: Arc::new(RwLock::new(RegistryInner {
                groups: HashMap::new(),
            })),
            limits,
            metrics,
        }
    }

    /// Admit a new connection under `api_key`, returning its handle.
    ///
    /// Check-and-insert happens under the write lock. A rejection mutates
    /// nothing; the caller closes the socket with a policy-violation reason.
    pub async fn register(
        &self,
        api_key: &str,
        sender: mpsc::Sender<Message>,
    ) -> WsErrorResult<ConnectionHandle> {
        let mut inner = self.inner.write().await;

        let current = inner.groups.get(api_key).map_or(0, HashMap::len);
        if self.limits.max_per_key > 0 && current >= self.limits.max_per_key {
            warn!(
                "Connection rejected for key '{}': per-key quota reached ({}/{})",
                api_key, current, self.limits.max_per_key
            );
            self.metrics.admission_rejected();
            return Err(WsError::QuotaExceeded {
                api_key: api_key.to_string(),
                current,
                max: self.limits.max_per_key,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let key: Arc<str> = Arc::from(api_key);
        let connection_id = ConnectionId::new();
        let handle = ConnectionHandle::new(connection_id, Arc::clone(&key), sender);
        let group = inner.groups.entry(key).or_default();
        group.insert(connection_id, handle.clone());

        info!(
            "Admitted connection {connection_id} for key '{api_key}' ({} live for this key)",
            group.len()
        );
        self.metrics.connection_admitted();

        Ok(handle)
    }

    /// Remove a connection if it is still present. Idempotent: a connection
    /// can be released both by its own lifecycle and by a failed delivery,
    /// and the second call is a no-op.
    pub async fn release(&self, api_key: &str, connection_id: ConnectionId) {
        let mut inner = self.inner.write().await;

        let Some(group) = inner.groups.get_mut(api_key) else {
            return;
        };

        if group.remove(&connection_id).is_none() {
            return;
        }

        info!(
            "Released connection {connection_id} for key '{api_key}' ({} remaining for this key)",
            group.len()
        );
        self.metrics.connection_released();

        if group.is_empty() {
            inner.groups.remove(api_key);
        }
    }

    /// Point-in-time copy of every live connection across all keys.
    ///
    /// Taken under the read lock, so a concurrent admit/release is either
    /// fully visible or fully absent - never a torn view of one group. The
    /// lock is dropped before any delivery I/O happens.
    pub async fn snapshot(&self) -> Vec<ConnectionHandle> {
        let inner = self.inner.read().await;
        inner
            .groups
            .values()
            .flat_map(|group| group.values().cloned())
            .collect()
    }

    /// Live connection count for one key
    pub async fn key_count(&self, api_key: &str) -> usize {
        let inner = self.inner.read().await;
        inner.groups.get(api_key).map_or(0, HashMap::len)
    }

    /// Live connection count across all keys
    pub async fn total_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.groups.values().map(HashMap::len).sum()
    }
}

impl Clone for ConnectionRegistry {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            limits: self.limits,
            metrics: self.metrics.clone(),
        }
    }
}
