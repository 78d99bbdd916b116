//! Replaying adapter for the `Clock` port.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::warn;

use super::extract_result;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::Clock;

/// Serves recorded clock readings in order.
///
/// Once the recording runs out, the system clock is used and a divergence is
/// logged.
pub struct ReplayingClock {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingClock {
    /// Creates a replaying clock from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn next(&self) -> Result<DateTime<Utc>, Box<dyn std::error::Error + Send + Sync>> {
        let output = {
            let mut replayer = self.replayer.lock().expect("replayer lock poisoned");
            replayer.next_interaction("clock", "now")?.output.clone()
        };
        extract_result(&output, "clock::now")
    }
}

impl Clock for ReplayingClock {
    fn now(&self) -> DateTime<Utc> {
        self.next().unwrap_or_else(|e| {
            warn!(error = %e, "replay diverged: using the system clock");
            Utc::now()
        })
    }
}
