use std::{thread, time::Duration};

use serde::{Deserialize, Serialize};

/// How [`FlappyEnv::act`](crate::FlappyEnv) paces steps against wall-clock time.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "mode")]
pub enum FramePacing {
    /// No throttling. Used for training throughput.
    #[default]
    Fast,
    /// Sleep one frame per step.
    Realtime { fps: u32 },
}

impl FramePacing {
    /// Duration of one frame, or `None` if steps are not throttled.
    #[must_use]
    pub fn frame_duration(&self) -> Option<Duration> {
        match *self {
            Self::Fast | Self::Realtime { fps: 0 } => None,
            Self::Realtime { fps } => Some(Duration::from_secs(1) / fps),
        }
    }

    /// Blocks for one frame in realtime mode; returns immediately in fast mode.
    pub fn wait(&self) {
        if let Some(frame) = self.frame_duration() {
            thread::sleep(frame);
        }
    }
}
