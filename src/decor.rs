//! Decorative resources: the hero animation descriptor and the sidebar logo.
//!
//! Both are optional. Any failure is reported as
//! [`DashboardError::OptionalResource`] and the dashboard renders without it.

use std::path::Path;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::data::error::{DashboardError, DashboardResult};

// ---------------------------------------------------------------------------
// Lottie animation descriptor
// ---------------------------------------------------------------------------

/// The header fields of a Lottie (Bodymovin) JSON document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LottieDescriptor {
    #[serde(rename = "nm", default)]
    pub name: Option<String>,
    #[serde(rename = "fr")]
    pub frame_rate: f64,
    #[serde(rename = "ip")]
    pub in_point: f64,
    #[serde(rename = "op")]
    pub out_point: f64,
    #[serde(rename = "w")]
    pub width: u32,
    #[serde(rename = "h")]
    pub height: u32,
    #[serde(default)]
    pub layers: Vec<serde_json::Value>,
}

impl LottieDescriptor {
    pub fn frame_count(&self) -> f64 {
        (self.out_point - self.in_point).max(0.0)
    }

    /// Playback length in seconds, 0 for a zero frame rate.
    pub fn duration_secs(&self) -> f64 {
        if self.frame_rate > 0.0 {
            self.frame_count() / self.frame_rate
        } else {
            0.0
        }
    }
}

/// Single blocking GET of the descriptor. No retries.
pub fn fetch_animation(url: &str, timeout: Duration) -> DashboardResult<LottieDescriptor> {
    let fail = |reason: String| DashboardError::optional_resource(url, reason);

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| fail(e.to_string()))?;
    let resp = client.get(url).send().map_err(|e| fail(e.to_string()))?;
    if !resp.status().is_success() {
        return Err(fail(format!("HTTP {}", resp.status())));
    }
    resp.json::<LottieDescriptor>()
        .map_err(|e| fail(format!("invalid descriptor: {e}")))
}

// ---------------------------------------------------------------------------
// Background fetch
// ---------------------------------------------------------------------------

/// Where the hero animation stands.
#[derive(Debug)]
pub enum AnimationState {
    Pending(Receiver<DashboardResult<LottieDescriptor>>),
    Ready(LottieDescriptor),
    Unavailable,
}

impl AnimationState {
    /// Start the fetch on a detached thread. The UI never waits on it.
    pub fn spawn(url: String, timeout: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let spawned = std::thread::Builder::new()
            .name("animation-fetch".into())
            .spawn(move || {
                // The receiver is gone if the window closed first.
                let _ = tx.send(fetch_animation(&url, timeout));
            });
        match spawned {
            Ok(_) => AnimationState::Pending(rx),
            Err(e) => {
                log::warn!("could not start animation fetch: {e}");
                AnimationState::Unavailable
            }
        }
    }

    /// Check for a finished fetch. Cheap; meant to be called every frame.
    pub fn poll(&mut self) {
        let AnimationState::Pending(rx) = self else {
            return;
        };
        let next = match rx.try_recv() {
            Ok(Ok(descriptor)) => {
                log::info!(
                    "animation descriptor loaded: {} frames at {} fps",
                    descriptor.frame_count(),
                    descriptor.frame_rate
                );
                AnimationState::Ready(descriptor)
            }
            Ok(Err(e)) => {
                log::warn!("{e}");
                AnimationState::Unavailable
            }
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                log::warn!("animation fetch thread ended without a result");
                AnimationState::Unavailable
            }
        };
        *self = next;
    }

    pub fn descriptor(&self) -> Option<&LottieDescriptor> {
        match self {
            AnimationState::Ready(d) => Some(d),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Sidebar logo
// ---------------------------------------------------------------------------

/// Read the logo and check that it is an image the loaders understand.
pub fn load_logo(path: &Path) -> DashboardResult<Arc<[u8]>> {
    let resource = path.display().to_string();
    let bytes = std::fs::read(path)
        .map_err(|e| DashboardError::optional_resource(resource.as_str(), e))?;
    image::guess_format(&bytes)
        .map_err(|e| DashboardError::optional_resource(resource.as_str(), e))?;
    Ok(bytes.into())
}
