use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One analyzed frame captured while recording, timestamped against the
/// session origin.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DataPoint {
    pub elapsed_seconds: f64,
    pub activation_score: f32,
    pub spectral_centroid: f32,
    pub spectral_harshness: f32,
    pub dynamic_variability: f32,
    pub temporal_unpredictability: f32,
    pub rms_level: f32,
}

struct SessionLog {
    origin: Option<Instant>,
    points: Vec<DataPoint>,
}

/// Append-only metric log guarded by a short critical section. The active
/// flag is readable without the lock so the analysis path can skip idle
/// sessions cheaply.
pub(crate) struct RecordingLog {
    active: AtomicBool,
    log: Mutex<SessionLog>,
}

impl RecordingLog {
    pub(crate) fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            log: Mutex::new(SessionLog {
                origin: None,
                points: Vec::new(),
            }),
        }
    }

    fn lock_log(&self) -> MutexGuard<'_, SessionLog> {
        self.log.lock().unwrap_or_else(|poisoned| {
            warn!("Recording log lock poisoned; recovering.");
            poisoned.into_inner()
        })
    }

    /// Begins a session: clears prior points and restamps the origin. Calling
    /// while already recording starts over.
    pub(crate) fn start(&self) {
        {
            let mut log = self.lock_log();
            log.points.clear();
            log.origin = Some(Instant::now());
            self.active.store(true, Ordering::Relaxed);
        }
        debug!("Recording started");
    }

    /// Freezes the session. Captured points stay readable until the next
    /// start.
    pub(crate) fn stop(&self) {
        self.active.store(false, Ordering::Relaxed);
        debug!("Recording stopped");
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    pub(crate) fn elapsed_seconds(&self) -> f64 {
        if !self.is_active() {
            return 0.0;
        }
        self.lock_log()
            .origin
            .map(|origin| origin.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Appends one point stamped inside the critical section. A stop racing
    /// this call may still land one final boundary point.
    pub(crate) fn append_if_active(&self, build: impl FnOnce(f64) -> DataPoint) {
        if !self.is_active() {
            return;
        }
        let mut log = self.lock_log();
        if let Some(origin) = log.origin {
            let point = build(origin.elapsed().as_secs_f64());
            log.points.push(point);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.lock_log().points.len()
    }

    pub(crate) fn points(&self) -> Vec<DataPoint> {
        self.lock_log().points.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(elapsed_seconds: f64) -> DataPoint {
        DataPoint {
            elapsed_seconds,
            activation_score: 50.0,
            spectral_centroid: 0.0,
            spectral_harshness: 0.0,
            dynamic_variability: 0.0,
            temporal_unpredictability: 0.0,
            rms_level: 0.0,
        }
    }

    #[test]
    fn append_is_ignored_while_idle() {
        let log = RecordingLog::new();
        log.append_if_active(point);
        assert_eq!(log.len(), 0);
        assert!(!log.is_active());
        assert_eq!(log.elapsed_seconds(), 0.0);
    }

    #[test]
    fn start_stamps_points_with_session_time() {
        let log = RecordingLog::new();
        log.start();
        assert!(log.is_active());
        log.append_if_active(point);
        let points = log.points();
        assert_eq!(points.len(), 1);
        assert!(points[0].elapsed_seconds >= 0.0);
        assert!(points[0].elapsed_seconds < 1.0);
    }

    #[test]
    fn stop_freezes_but_keeps_points() {
        let log = RecordingLog::new();
        log.start();
        log.append_if_active(point);
        log.stop();
        log.append_if_active(point);
        assert_eq!(log.len(), 1);
        assert_eq!(log.elapsed_seconds(), 0.0);
    }

    #[test]
    fn restart_clears_previous_session() {
        let log = RecordingLog::new();
        log.start();
        log.append_if_active(point);
        log.append_if_active(point);
        log.stop();
        log.start();
        assert_eq!(log.len(), 0);
        assert!(log.is_active());
    }

    #[test]
    fn datapoint_serializes_field_names() {
        let json = serde_json::to_string(&point(1.5)).unwrap();
        assert!(json.contains("\"elapsed_seconds\":1.5"));
        assert!(json.contains("\"activation_score\""));
        assert!(json.contains("\"rms_level\""));
    }
}
