use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use worldlink_common::{Location, PlayerRef};

use crate::server::Server;

/// Cloneable handle to a `Server` behind a mutex.
///
/// Every access takes the lock for the duration of one closure or one call,
/// so callers never hold server state across an await point.
#[derive(Debug, Clone, Default)]
pub struct SharedServer(Arc<Mutex<Server>>);

impl SharedServer {
    pub fn new(server: Server) -> Self {
        Self(Arc::new(Mutex::new(server)))
    }

    /// Lock the server. A poisoned lock is recovered; server operations keep
    /// the state consistent at every step.
    pub fn lock(&self) -> MutexGuard<'_, Server> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to the server.
    pub fn with<R>(&self, f: impl FnOnce(&mut Server) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn location_of(&self, player: &PlayerRef) -> Option<Location> {
        self.lock().player(player.id).map(|p| p.location.clone())
    }

    pub fn inbox_of(&self, player: &PlayerRef) -> Vec<String> {
        self.lock()
            .player(player.id)
            .map(|p| p.inbox.clone())
            .unwrap_or_default()
    }
}
