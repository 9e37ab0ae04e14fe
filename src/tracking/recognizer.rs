use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Read/write view onto the external cloud recognizer. The controller only
/// queries it for the cancel affordance and re-enables it on user cancel.
pub trait Recognizer: Send + Sync {
    fn is_initialized(&self) -> bool;
    fn is_enabled(&self) -> bool;
    fn set_enabled(&self, enabled: bool);
}

/// Flag-backed recognizer shared between the host and the controller.
#[derive(Debug, Clone, Default)]
pub struct SharedRecognizer {
    initialized: Arc<AtomicBool>,
    enabled: Arc<AtomicBool>,
}

impl SharedRecognizer {
    pub fn new(initialized: bool, enabled: bool) -> Self {
        Self {
            initialized: Arc::new(AtomicBool::new(initialized)),
            enabled: Arc::new(AtomicBool::new(enabled)),
        }
    }

    pub fn set_initialized(&self, initialized: bool) {
        self.initialized.store(initialized, Ordering::SeqCst);
    }
}

impl Recognizer for SharedRecognizer {
    fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }
}
