//! Microphone permission port interface

/// Microphone permission status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

impl PermissionStatus {
    /// Status from a yes/no answer
    pub const fn from_granted(granted: bool) -> Self {
        if granted {
            Self::Granted
        } else {
            Self::Denied
        }
    }
}

/// Callback receiving the answer to a permission request; may run on any thread.
pub type PermissionCallback = Box<dyn FnOnce(bool) + Send>;

/// Port for querying and requesting microphone access
pub trait PermissionProvider: Send + Sync {
    /// Current permission status
    fn query_microphone_permission(&self) -> PermissionStatus;

    /// Ask for access; the answer arrives asynchronously through `callback`.
    fn request_microphone_permission(&self, callback: PermissionCallback);
}

/// Blanket implementation for boxed permission providers
impl PermissionProvider for Box<dyn PermissionProvider> {
    fn query_microphone_permission(&self) -> PermissionStatus {
        self.as_ref().query_microphone_permission()
    }

    fn request_microphone_permission(&self, callback: PermissionCallback) {
        self.as_ref().request_microphone_permission(callback)
    }
}
