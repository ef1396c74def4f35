//! Multi-touch tracking.
//!
//! Each finger is a [`TouchPoint`] keyed by a platform-assigned id. Phases follow
//! the usual lifecycle:
//!
//! ```text
//! Began -> (Moved | Stationary)* -> Ended | Cancelled
//! ```
//!
//! Points in `Ended`/`Cancelled` stay visible until the next [`Touch::end_frame`],
//! so a tap shorter than one frame is still observed once. Motionless points that
//! stop receiving platform events are dropped after [`STALE_TOUCH_TIMEOUT`].

use std::time::{Duration, Instant};

use log::debug;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchPhase {
    Began,
    Moved,
    Stationary,
    Ended,
    Cancelled,
}

impl TouchPhase {
    /// `true` for phases that remove the point at the end of the frame.
    #[inline]
    pub fn is_finished(self) -> bool {
        matches!(self, TouchPhase::Ended | TouchPhase::Cancelled)
    }
}

/// One finger. `x`/`y` are normalized to `[0, 1]` over the touch surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub pressure: f32,
    pub phase: TouchPhase,
}

/// Every known touch point, in the order the fingers went down.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TouchState {
    pub points: Vec<TouchPoint>,
}

impl TouchState {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&TouchPoint> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TouchPoint> {
        self.points.iter()
    }

    /// Points that are still on the surface.
    pub fn active(&self) -> impl Iterator<Item = &TouchPoint> {
        self.points.iter().filter(|p| !p.phase.is_finished())
    }
}

/// Stationary points that see no platform event for this long are dropped.
pub const STALE_TOUCH_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy)]
struct Tracked {
    point: TouchPoint,
    observed: bool,
    last_event: Instant,
}

#[derive(Debug)]
struct TouchInner {
    points: Vec<Tracked>,
    devices: usize,
    stale_after: Option<Duration>,
}

impl Default for TouchInner {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            devices: 0,
            stale_after: Some(STALE_TOUCH_TIMEOUT),
        }
    }
}

impl TouchInner {
    fn find(&mut self, id: u64) -> Option<&mut Tracked> {
        self.points.iter_mut().find(|t| t.point.id == id)
    }

    fn end_frame(&mut self, now: Instant) {
        let stale_after = self.stale_after;
        self.points.retain(|t| {
            let stale = t.point.phase == TouchPhase::Stationary
                && stale_after.is_some_and(|limit| now.saturating_duration_since(t.last_event) > limit);
            !(t.point.phase.is_finished() || stale)
        });
        for tracked in &mut self.points {
            // A begin nobody has read yet must survive into the next snapshot.
            if tracked.point.phase != TouchPhase::Began || tracked.observed {
                tracked.point.phase = TouchPhase::Stationary;
            }
        }
    }
}

/// Touch service. Fed by the platform layer, read once per frame.
#[derive(Debug, Default)]
pub struct Touch {
    inner: Mutex<TouchInner>,
}

impl Touch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change how long a motionless point may go without platform events before
    /// [`end_frame`](Self::end_frame) drops it. `None` keeps points until they end.
    pub fn set_stale_timeout(&self, timeout: Option<Duration>) {
        self.inner.lock().stale_after = timeout;
    }

    /// Start tracking `id`. A stale point with the same id is replaced.
    pub fn touch_began(&self, id: u64, x: f32, y: f32, pressure: f32) {
        let mut inner = self.inner.lock();
        inner.points.retain(|t| t.point.id != id);
        inner.points.push(Tracked {
            point: TouchPoint {
                id,
                x: x.clamp(0.0, 1.0),
                y: y.clamp(0.0, 1.0),
                pressure,
                phase: TouchPhase::Began,
            },
            observed: false,
            last_event: Instant::now(),
        });
    }

    /// Update the position of `id`. Sub-epsilon motion keeps the current phase,
    /// and so does a `Began` that has not been read yet.
    pub fn touch_moved(&self, id: u64, x: f32, y: f32, pressure: f32) {
        let mut inner = self.inner.lock();
        let Some(tracked) = inner.find(id) else {
            debug!("touch {id} moved without a matching begin");
            return;
        };
        let unseen_begin = tracked.point.phase == TouchPhase::Began && !tracked.observed;
        let point = &mut tracked.point;
        if point.phase.is_finished() {
            return;
        }
        tracked.last_event = Instant::now();
        let (x, y) = (x.clamp(0.0, 1.0), y.clamp(0.0, 1.0));
        let moved = (point.x - x).abs() >= f32::EPSILON || (point.y - y).abs() >= f32::EPSILON;
        if moved && !unseen_begin {
            point.phase = TouchPhase::Moved;
        }
        point.x = x;
        point.y = y;
        point.pressure = pressure;
    }

    pub fn touch_ended(&self, id: u64, x: f32, y: f32) {
        let mut inner = self.inner.lock();
        if let Some(tracked) = inner.find(id) {
            tracked.last_event = Instant::now();
            let point = &mut tracked.point;
            point.x = x.clamp(0.0, 1.0);
            point.y = y.clamp(0.0, 1.0);
            point.pressure = 0.0;
            point.phase = TouchPhase::Ended;
        }
    }

    pub fn touch_cancelled(&self, id: u64) {
        let mut inner = self.inner.lock();
        if let Some(tracked) = inner.find(id) {
            tracked.last_event = Instant::now();
            tracked.point.phase = TouchPhase::Cancelled;
        }
    }

    /// A touch device was attached or removed. Losing the last device cancels
    /// every live point.
    pub fn device_changed(&self, connected: bool) {
        let mut inner = self.inner.lock();
        if connected {
            inner.devices += 1;
        } else {
            inner.devices = inner.devices.saturating_sub(1);
            if inner.devices == 0 {
                for tracked in inner.points.iter_mut().filter(|t| !t.point.phase.is_finished()) {
                    tracked.point.phase = TouchPhase::Cancelled;
                }
            }
        }
        debug!("touch devices: {}", inner.devices);
    }

    /// Snapshot every point. Points returned here count as observed.
    pub fn get_state(&self) -> TouchState {
        let mut inner = self.inner.lock();
        let points = inner
            .points
            .iter_mut()
            .map(|t| {
                t.observed = true;
                t.point
            })
            .collect();
        TouchState { points }
    }

    /// Drop finished and stale points, then settle the rest to `Stationary`.
    ///
    /// A `Began` point that no [`get_state`](Self::get_state) has returned yet
    /// keeps its phase, so a finger landing between a read and the end of the
    /// frame is still reported as `Began` once.
    pub fn end_frame(&self) {
        self.inner.lock().end_frame(Instant::now());
    }

    pub fn is_supported(&self) -> bool {
        self.inner.lock().devices > 0
    }

    pub fn device_count(&self) -> usize {
        self.inner.lock().devices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_lifecycle() {
        let touch = Touch::new();
        touch.touch_began(1, 0.5, 0.5, 1.0);
        assert_eq!(touch.get_state().get(1).map(|p| p.phase), Some(TouchPhase::Began));

        touch.end_frame();
        assert_eq!(touch.get_state().get(1).map(|p| p.phase), Some(TouchPhase::Stationary));

        touch.touch_moved(1, 0.6, 0.5, 1.0);
        assert_eq!(touch.get_state().get(1).map(|p| p.phase), Some(TouchPhase::Moved));

        touch.end_frame();
        touch.touch_ended(1, 0.6, 0.5);
        let state = touch.get_state();
        assert_eq!(state.get(1).map(|p| p.phase), Some(TouchPhase::Ended));
        assert_eq!(state.active().count(), 0);

        touch.end_frame();
        assert!(touch.get_state().is_empty());
    }

    #[test]
    fn tiny_motion_keeps_phase() {
        let touch = Touch::new();
        touch.touch_began(3, 0.25, 0.25, 1.0);
        touch.get_state();
        touch.end_frame();
        touch.touch_moved(3, 0.25, 0.25, 0.5);
        let point = *touch.get_state().get(3).unwrap();
        assert_eq!(point.phase, TouchPhase::Stationary);
        assert_eq!(point.pressure, 0.5);
    }

    #[test]
    fn tap_within_one_frame_is_observed() {
        let touch = Touch::new();
        touch.touch_began(7, 0.1, 0.9, 1.0);
        touch.touch_ended(7, 0.1, 0.9);
        assert_eq!(touch.get_state().len(), 1);
        touch.end_frame();
        assert!(touch.get_state().is_empty());
    }

    #[test]
    fn coordinates_are_clamped() {
        let touch = Touch::new();
        touch.touch_began(1, -0.5, 1.5, 1.0);
        let p = *touch.get_state().get(1).unwrap();
        assert_eq!((p.x, p.y), (0.0, 1.0));
    }

    #[test]
    fn losing_last_device_cancels_points() {
        let touch = Touch::new();
        touch.device_changed(true);
        assert!(touch.is_supported());
        touch.touch_began(1, 0.5, 0.5, 1.0);
        touch.touch_began(2, 0.2, 0.2, 1.0);

        touch.device_changed(false);
        assert!(!touch.is_supported());
        assert!(touch
            .get_state()
            .iter()
            .all(|p| p.phase == TouchPhase::Cancelled));
        touch.end_frame();
        assert!(touch.get_state().is_empty());
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let touch = Touch::new();
        touch.touch_moved(9, 0.5, 0.5, 1.0);
        touch.touch_ended(9, 0.5, 0.5);
        touch.touch_cancelled(9);
        assert!(touch.get_state().is_empty());
    }

    #[test]
    fn begin_after_read_survives_end_of_frame() {
        let touch = Touch::new();
        touch.get_state();
        touch.touch_began(4, 0.5, 0.5, 1.0);
        touch.end_frame();
        assert_eq!(touch.get_state().get(4).map(|p| p.phase), Some(TouchPhase::Began));

        touch.end_frame();
        assert_eq!(touch.get_state().get(4).map(|p| p.phase), Some(TouchPhase::Stationary));
    }

    #[test]
    fn unread_begin_is_not_overwritten_by_motion() {
        let touch = Touch::new();
        touch.touch_began(5, 0.1, 0.1, 1.0);
        touch.touch_moved(5, 0.4, 0.4, 1.0);
        let point = *touch.get_state().get(5).unwrap();
        assert_eq!(point.phase, TouchPhase::Began);
        assert_eq!((point.x, point.y), (0.4, 0.4));
    }

    #[test]
    fn stale_stationary_points_are_dropped() {
        let touch = Touch::new();
        touch.touch_began(6, 0.5, 0.5, 1.0);
        touch.get_state();
        touch.end_frame();

        let later = Instant::now() + STALE_TOUCH_TIMEOUT * 2;
        touch.inner.lock().end_frame(later);
        assert!(touch.get_state().is_empty());
    }

    #[test]
    fn stale_cleanup_can_be_disabled() {
        let touch = Touch::new();
        touch.set_stale_timeout(None);
        touch.touch_began(6, 0.5, 0.5, 1.0);
        touch.get_state();
        touch.end_frame();

        let later = Instant::now() + STALE_TOUCH_TIMEOUT * 2;
        touch.inner.lock().end_frame(later);
        assert_eq!(touch.get_state().len(), 1);
    }
}
