//! Session view port interface

/// Port for the screen the session reflects its state into
pub trait SessionView: Send + Sync {
    /// Text of the record control
    fn set_record_label(&self, text: &str);

    /// Text of the play control
    fn set_play_label(&self, text: &str);

    /// Text of the elapsed-time readout
    fn set_elapsed_label(&self, text: &str);

    /// Whether the record control accepts input
    fn set_record_enabled(&self, enabled: bool);
}

/// Shared views forward to the inner view
impl<T: SessionView + ?Sized> SessionView for std::sync::Arc<T> {
    fn set_record_label(&self, text: &str) {
        self.as_ref().set_record_label(text)
    }

    fn set_play_label(&self, text: &str) {
        self.as_ref().set_play_label(text)
    }

    fn set_elapsed_label(&self, text: &str) {
        self.as_ref().set_elapsed_label(text)
    }

    fn set_record_enabled(&self, enabled: bool) {
        self.as_ref().set_record_enabled(enabled)
    }
}
