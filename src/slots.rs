//! Gamepad slot management.
//!
//! [`GamepadManager`] maps physical controllers (by [`DeviceId`]) onto stable
//! player slots. It is `&self` throughout and internally locked, so it can be
//! shared through an `Arc` between the simulation thread and whatever thread the
//! platform delivers hot-plug callbacks on.
//!
//! # Slot assignment
//! On connect, a device goes to the first match of:
//! 1. the slot already holding it;
//! 2. a free slot whose last occupant was this device;
//! 3. the lowest free slot that has never been used;
//! 4. the lowest free slot.
//!
//! Devices beyond capacity are ignored. Disconnecting frees the slot but the slot
//! remembers who sat there, so a controller that drops out and comes back lands
//! where it was.
//!
//! # Reads
//! [`GamepadManager::get_state`] never fails. Empty slots and out-of-range
//! indices produce [`GamepadState::default()`].
//!
//! # Suspend
//! [`GamepadManager::suspend`] only silences rumble. Connected pads keep reading
//! as connected, so a button held across suspend and resume stays `Held`.

use crate::backends::{DeviceId, GamepadBackend};
use crate::deadzone::{DeadZone, THUMB_DEAD_ZONE};
use crate::error::BackendError;
use crate::gamepad::{GamepadState, PlayerIndex, RawGamepadReading, Vibration};
use log::{debug, warn};
use parking_lot::Mutex;

#[derive(Debug, Default, Clone)]
struct Slot {
    device: Option<DeviceId>,
    last_occupant: Option<DeviceId>,
    last_good: Option<RawGamepadReading>,
}

impl Slot {
    fn is_free(&self) -> bool {
        self.device.is_none()
    }

    fn vacate(&mut self) {
        self.device = None;
        self.last_good = None;
    }
}

struct Inner<B> {
    backend: B,
    slots: Vec<Slot>,
    most_recent: usize,
    suspended: bool,
    thumb_dead_zone: f32,
    trigger_dead_zone: f32,
}

impl<B: GamepadBackend> Inner<B> {
    fn resolve(&self, player: PlayerIndex) -> Option<usize> {
        let slot = match player {
            PlayerIndex::Slot(i) => i,
            PlayerIndex::MostRecent => self.most_recent,
        };
        (slot < self.slots.len()).then_some(slot)
    }

    fn connect(&mut self, id: &DeviceId) -> Option<usize> {
        let chosen = self
            .slots
            .iter()
            .position(|s| s.device.as_ref() == Some(id))
            .or_else(|| {
                self.slots
                    .iter()
                    .position(|s| s.is_free() && s.last_occupant.as_ref() == Some(id))
            })
            .or_else(|| {
                self.slots
                    .iter()
                    .position(|s| s.is_free() && s.last_occupant.is_none())
            })
            .or_else(|| self.slots.iter().position(Slot::is_free));

        let Some(index) = chosen else {
            warn!(
                "gamepad {id} ignored: all {} slots are occupied",
                self.slots.len()
            );
            return None;
        };

        let slot = &mut self.slots[index];
        if slot.device.as_ref() != Some(id) {
            debug!("gamepad {id} connected in slot {index}");
            slot.device = Some(id.clone());
            slot.last_occupant = Some(id.clone());
            slot.last_good = None;
            self.most_recent = index;
        }
        Some(index)
    }

    fn disconnect(&mut self, id: &DeviceId) -> Option<usize> {
        let index = self
            .slots
            .iter()
            .position(|s| s.device.as_ref() == Some(id))?;
        self.slots[index].vacate();
        debug!("gamepad {id} disconnected from slot {index}");
        Some(index)
    }

    fn shape(&self, reading: &RawGamepadReading, dead_zone: DeadZone) -> GamepadState {
        GamepadState::from_reading(
            reading,
            dead_zone,
            self.thumb_dead_zone,
            self.trigger_dead_zone,
        )
    }
}

/// Multi-controller slot table over a [`GamepadBackend`].
pub struct GamepadManager<B> {
    inner: Mutex<Inner<B>>,
}

impl<B: GamepadBackend> GamepadManager<B> {
    /// Create a manager with the default stick threshold and no trigger threshold.
    ///
    /// Devices the backend already knows about are connected immediately, in
    /// enumeration order.
    pub fn new(backend: B) -> Self {
        Self::with_thresholds(backend, THUMB_DEAD_ZONE, 0.0)
    }

    pub fn with_thresholds(mut backend: B, thumb_dead_zone: f32, trigger_dead_zone: f32) -> Self {
        let capacity = backend.max_players();
        let present = backend.enumerate();
        let mut inner = Inner {
            backend,
            slots: vec![Slot::default(); capacity],
            most_recent: 0,
            suspended: false,
            thumb_dead_zone,
            trigger_dead_zone,
        };
        for id in &present {
            inner.connect(id);
        }
        Self {
            inner: Mutex::new(inner),
        }
    }

    /// Snapshot for `player`, shaped with `dead_zone`.
    pub fn get_state(&self, player: PlayerIndex, dead_zone: DeadZone) -> GamepadState {
        let mut inner = self.inner.lock();
        let Some(index) = inner.resolve(player) else {
            return GamepadState::default();
        };
        let Some(id) = inner.slots[index].device.clone() else {
            return GamepadState::default();
        };

        match inner.backend.read(&id) {
            Ok(Some(reading)) => {
                inner.slots[index].last_good = Some(reading);
                inner.shape(&reading, dead_zone)
            }
            Ok(None) => {
                inner.disconnect(&id);
                GamepadState::default()
            }
            Err(err @ BackendError::Transient { .. }) => {
                debug!("gamepad {id} in slot {index}: {err}, reusing last reading");
                match inner.slots[index].last_good {
                    Some(reading) => inner.shape(&reading, dead_zone),
                    None => GamepadState::default(),
                }
            }
            Err(err) => {
                warn!("gamepad {id} in slot {index} dropped: {err}");
                inner.slots[index].vacate();
                GamepadState::default()
            }
        }
    }

    /// Request rumble on `player`. Returns `false` if nothing was sent.
    pub fn set_vibration(&self, player: PlayerIndex, vibration: Vibration) -> bool {
        let mut inner = self.inner.lock();
        if !inner.backend.supports_vibration() {
            return false;
        }
        let Some(index) = inner.resolve(player) else {
            return false;
        };
        let Some(id) = inner.slots[index].device.clone() else {
            return false;
        };
        inner.backend.set_vibration(&id, vibration.clamped())
    }

    /// Stop rumble on every occupied slot. Reads are unaffected; the flag is only
    /// reported through [`is_suspended`](Self::is_suspended).
    pub fn suspend(&self) {
        let mut inner = self.inner.lock();
        if inner.suspended {
            return;
        }
        if inner.backend.supports_vibration() {
            let occupied: Vec<DeviceId> = inner.slots.iter().filter_map(|s| s.device.clone()).collect();
            for id in &occupied {
                inner.backend.set_vibration(id, Vibration::OFF);
            }
        }
        inner.suspended = true;
        debug!("gamepads suspended");
    }

    /// Rescan the backend: drop devices that went away and connect new ones.
    pub fn resume(&self) {
        let mut inner = self.inner.lock();
        inner.suspended = false;

        let present = inner.backend.enumerate();
        let gone: Vec<DeviceId> = inner
            .slots
            .iter()
            .filter_map(|s| s.device.clone())
            .filter(|id| !present.contains(id))
            .collect();
        for id in &gone {
            inner.disconnect(id);
        }
        for id in &present {
            if !inner.slots.iter().any(|s| s.device.as_ref() == Some(id)) {
                inner.connect(id);
            }
        }
        debug!(
            "gamepads resumed, {} connected",
            inner.slots.iter().filter(|s| !s.is_free()).count()
        );
    }

    /// Hot-plug notification. Returns the slot that changed, if any.
    pub fn on_device_changed(&self, id: &DeviceId, before: bool, after: bool) -> Option<usize> {
        let mut inner = self.inner.lock();
        match (before, after) {
            (_, true) => inner.connect(id),
            (true, false) => inner.disconnect(id),
            (false, false) => None,
        }
    }

    pub fn player_of(&self, id: &DeviceId) -> Option<usize> {
        self.inner
            .lock()
            .slots
            .iter()
            .position(|s| s.device.as_ref() == Some(id))
    }

    pub fn device_in(&self, slot: usize) -> Option<DeviceId> {
        self.inner.lock().slots.get(slot).and_then(|s| s.device.clone())
    }

    pub fn most_recent_slot(&self) -> usize {
        self.inner.lock().most_recent
    }

    pub fn connected_count(&self) -> usize {
        self.inner.lock().slots.iter().filter(|s| !s.is_free()).count()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().slots.len()
    }

    pub fn is_suspended(&self) -> bool {
        self.inner.lock().suspended
    }

    pub fn supports_vibration(&self) -> bool {
        self.inner.lock().backend.supports_vibration()
    }
}

impl<B> std::fmt::Debug for GamepadManager<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("GamepadManager")
            .field("capacity", &inner.slots.len())
            .field("most_recent", &inner.most_recent)
            .field("suspended", &inner.suspended)
            .finish_non_exhaustive()
    }
}
