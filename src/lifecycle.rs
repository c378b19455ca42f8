//! Per-instance lifecycle bookkeeping shared by every panel variant.

use crate::error::PanelError;
use crate::panel::PanelId;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PanelState {
    Uninitialized,
    Active,
    Destroyed,
}

/// State guard enforcing `init -> (update|resize)* -> destroy`.
#[derive(Clone, Debug)]
pub struct Lifecycle {
    panel: PanelId,
    state: PanelState,
}

impl Lifecycle {
    pub fn new(panel: PanelId) -> Self {
        Self {
            panel,
            state: PanelState::Uninitialized,
        }
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn panel(&self) -> &PanelId {
        &self.panel
    }

    /// Checks that init may run. The state stays Uninitialized until
    /// [`Lifecycle::mark_active`] so a failed init can still be destroyed.
    pub fn check_init(&self) -> Result<(), PanelError> {
        match self.state {
            PanelState::Uninitialized => Ok(()),
            PanelState::Active => Err(PanelError::AlreadyInitialized {
                panel: self.panel.clone(),
            }),
            PanelState::Destroyed => Err(PanelError::Destroyed {
                panel: self.panel.clone(),
            }),
        }
    }

    pub fn mark_active(&mut self) {
        self.state = PanelState::Active;
    }

    pub fn ensure_active(&self) -> Result<(), PanelError> {
        match self.state {
            PanelState::Active => Ok(()),
            PanelState::Uninitialized => Err(PanelError::NotActive {
                panel: self.panel.clone(),
            }),
            PanelState::Destroyed => Err(PanelError::Destroyed {
                panel: self.panel.clone(),
            }),
        }
    }

    /// Moves to Destroyed. Valid from Active and from Uninitialized (an init
    /// that failed half way); a second call fails.
    pub fn destroy(&mut self) -> Result<(), PanelError> {
        if self.state == PanelState::Destroyed {
            return Err(PanelError::AlreadyDestroyed {
                panel: self.panel.clone(),
            });
        }
        self.state = PanelState::Destroyed;
        Ok(())
    }
}

/// Liveness flag of one panel activation. Revoked when the panel is destroyed;
/// work started during the activation checks it before touching the panel.
#[derive(Clone, Debug)]
pub struct ActivationToken {
    epoch: u64,
    live: Arc<AtomicBool>,
}

impl ActivationToken {
    pub fn new(epoch: u64) -> Self {
        Self {
            epoch,
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    pub fn revoke(&self) {
        self.live.store(false, Ordering::Release);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Delivered,
    /// The activation ended before the result arrived; the value was dropped.
    Discarded,
}

/// Result slot for asynchronous work started inside `init` (e.g. a fetch).
pub struct Deferred<T> {
    token: ActivationToken,
    slot: Arc<Mutex<Option<T>>>,
}

/// Producer half of a [`Deferred`], handed to whatever performs the work.
pub struct Completer<T> {
    token: ActivationToken,
    slot: Arc<Mutex<Option<T>>>,
}

impl<T> Deferred<T> {
    pub fn new(token: ActivationToken) -> (Self, Completer<T>) {
        let slot = Arc::new(Mutex::new(None));
        (
            Self {
                token: token.clone(),
                slot: slot.clone(),
            },
            Completer { token, slot },
        )
    }

    /// Takes the delivered value, if any. Always None once the activation ended.
    pub fn take(&self) -> Option<T> {
        if !self.token.is_live() {
            return None;
        }
        self.slot.lock().take()
    }

    pub fn is_ready(&self) -> bool {
        self.token.is_live() && self.slot.lock().is_some()
    }
}

impl<T> Completer<T> {
    /// Completing after the owning panel was destroyed is a no-op.
    pub fn complete(self, value: T) -> Completion {
        if !self.token.is_live() {
            debug!(epoch = self.token.epoch(), "discarding completion for a retired activation");
            return Completion::Discarded;
        }
        *self.slot.lock() = Some(value);
        Completion::Delivered
    }
}
