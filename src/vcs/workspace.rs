//! Scoped leasing of the global P4CLIENT binding
//!
//! `P4CLIENT` belongs to the user's p4 environment, not to us. Every
//! operation that needs our client reads the current value, switches to
//! ours, does its work, and switches back, one lease at a time.

use crate::error::RegistryResult;
use crate::vcs::p4::P4;
use crate::vcs::records::parse_client_binding;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, warn};

/// Serializes lease windows for one registry instance
#[derive(Debug, Clone)]
pub struct WorkspaceContext {
    p4: P4,
    lock: Arc<Mutex<()>>,
}

impl WorkspaceContext {
    /// Create a context that binds `p4.workspace()` during leases
    pub fn new(p4: P4) -> Self {
        Self {
            p4,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Save the current binding and override it with ours
    ///
    /// Waits for any other lease on this context to be released first.
    pub async fn acquire(&self) -> RegistryResult<WorkspaceLease> {
        let guard = self.lock.clone().lock_owned().await;

        let saved = parse_client_binding(&self.p4.get_client().await?)?;
        let mut lease = WorkspaceLease {
            p4: self.p4.clone(),
            saved,
            overridden: false,
            guard: Some(guard),
        };

        if lease.saved == self.p4.workspace() {
            debug!("P4CLIENT already set to {}", lease.saved);
            return Ok(lease);
        }

        debug!(
            "Switching P4CLIENT from {} to {}",
            lease.saved,
            self.p4.workspace()
        );
        lease.overridden = true;
        if let Err(e) = self.p4.set_client(self.p4.workspace()).await {
            if let Err(restore) = lease.release().await {
                warn!("Failed to restore P4CLIENT after failed switch: {}", restore);
            }
            return Err(e);
        }

        Ok(lease)
    }

    /// Run `op` inside a lease, restoring the binding however `op` ends
    pub async fn scoped<T, F, Fut>(&self, op: F) -> RegistryResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RegistryResult<T>>,
    {
        let lease = self.acquire().await?;
        let result = op().await;
        let restored = lease.release().await;

        match (result, restored) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(restore)) => {
                warn!("Failed to restore P4CLIENT: {}", restore);
                Err(e)
            }
        }
    }
}

/// An active override of P4CLIENT
///
/// Call [`WorkspaceLease::release`] when done. A lease dropped without
/// release (its future was cancelled) restores the binding from a
/// background task that keeps the context locked until it finishes.
#[derive(Debug)]
pub struct WorkspaceLease {
    p4: P4,
    saved: String,
    overridden: bool,
    guard: Option<OwnedMutexGuard<()>>,
}

impl WorkspaceLease {
    /// Binding that was active before the lease
    pub fn saved(&self) -> &str {
        &self.saved
    }

    /// Restore the saved binding and end the lease
    pub async fn release(mut self) -> RegistryResult<()> {
        let result = if self.overridden {
            debug!("Restoring P4CLIENT to {}", self.saved);
            let result = self.p4.set_client(&self.saved).await;
            self.overridden = false;
            result
        } else {
            Ok(())
        };
        self.guard.take();
        result
    }
}

impl Drop for WorkspaceLease {
    fn drop(&mut self) {
        if !self.overridden {
            return;
        }

        let p4 = self.p4.clone();
        let saved = std::mem::take(&mut self.saved);
        let guard = self.guard.take();

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                warn!("Workspace lease abandoned, restoring P4CLIENT={} in background", saved);
                handle.spawn(async move {
                    if let Err(e) = p4.set_client(&saved).await {
                        warn!("Failed to restore P4CLIENT={}: {}", saved, e);
                    }
                    drop(guard);
                });
            }
            Err(_) => warn!("Cannot restore P4CLIENT={}: no async runtime", saved),
        }
    }
}
