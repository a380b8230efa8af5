//! Recording navigator: captures navigations instead of performing them.
//!
//! This is both the test double for the `Navigator` port and the adapter
//! the HTTP surface uses: a gate activation records its single decision
//! here, and the handler converts it into a redirect response.

use std::sync::Mutex;

use crate::domain::gating::Destination;
use crate::ports::Navigator;

/// `Navigator` that records every call.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    calls: Mutex<Vec<(Destination, bool)>>,
}

impl RecordingNavigator {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded navigations, in order.
    pub fn calls(&self) -> Vec<(Destination, bool)> {
        self.calls.lock().unwrap().clone()
    }

    /// The most recent navigation, if any.
    pub fn last(&self) -> Option<(Destination, bool)> {
        self.calls.lock().unwrap().last().copied()
    }

    /// How many navigations were recorded.
    pub fn navigation_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, destination: Destination, replace: bool) {
        self.calls.lock().unwrap().push((destination, replace));
    }
}
