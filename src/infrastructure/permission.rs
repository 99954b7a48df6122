//! Microphone permission adapter
//!
//! Desktop platforms have no runtime permission prompt that cpal can
//! drive, so access is decided by the configured [`MicrophonePolicy`]. With
//! `ask`, a request probes for a usable input device on a background thread
//! and remembers the answer.

use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use std::thread;

use cpal::traits::HostTrait;

use crate::application::ports::{PermissionCallback, PermissionProvider, PermissionStatus};
use crate::domain::config::MicrophonePolicy;

type Probe = Arc<dyn Fn() -> bool + Send + Sync>;

fn lock<T>(mutex: &StdMutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Whether the default host exposes an input device
fn default_input_available() -> bool {
    cpal::default_host().default_input_device().is_some()
}

/// Permission provider backed by the microphone policy and a cpal probe
pub struct CpalPermissionProvider {
    policy: MicrophonePolicy,
    status: Arc<StdMutex<PermissionStatus>>,
    probe: Probe,
}

impl CpalPermissionProvider {
    /// Create a provider that probes the default cpal host
    pub fn new(policy: MicrophonePolicy) -> Self {
        Self::with_probe(policy, default_input_available)
    }

    /// Create a provider with a custom device probe
    pub fn with_probe(
        policy: MicrophonePolicy,
        probe: impl Fn() -> bool + Send + Sync + 'static,
    ) -> Self {
        let status = match policy {
            MicrophonePolicy::Allow => PermissionStatus::Granted,
            MicrophonePolicy::Deny => PermissionStatus::Denied,
            MicrophonePolicy::Ask => PermissionStatus::Undetermined,
        };
        Self {
            policy,
            status: Arc::new(StdMutex::new(status)),
            probe: Arc::new(probe),
        }
    }
}

impl PermissionProvider for CpalPermissionProvider {
    fn query_microphone_permission(&self) -> PermissionStatus {
        *lock(&self.status)
    }

    fn request_microphone_permission(&self, callback: PermissionCallback) {
        match self.policy {
            MicrophonePolicy::Allow => callback(true),
            MicrophonePolicy::Deny => callback(false),
            MicrophonePolicy::Ask => {
                let status = Arc::clone(&self.status);
                let probe = Arc::clone(&self.probe);
                thread::spawn(move || {
                    let granted = probe();
                    *lock(&status) = PermissionStatus::from_granted(granted);
                    tracing::debug!(granted, "microphone probe finished");
                    callback(granted);
                });
            }
        }
    }
}
