//! Simulated GPIO header state.
//!
//! Pins are plain booleans keyed by BCM number. Nothing here touches real
//! hardware.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// BCM numbers of the 26 simulated header pins, in display order.
pub const GPIO_PINS: [u8; 26] = [
    2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27,
];

/// A validated GPIO pin identifier (2..=27).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct GpioPin(u8);

impl GpioPin {
    pub const MIN: u8 = 2;
    pub const MAX: u8 = 27;

    /// Validates a BCM pin number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPin`] when `number` is outside `2..=27`.
    pub fn new(number: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&number) {
            Ok(Self(number))
        } else {
            Err(Error::InvalidPin(number))
        }
    }

    /// Pin at `index` in [`GPIO_PINS`], wrapping around.
    pub fn from_index(index: usize) -> Self {
        Self(GPIO_PINS[index % GPIO_PINS.len()])
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Position of this pin in [`GPIO_PINS`].
    pub fn index(self) -> usize {
        usize::from(self.0 - Self::MIN)
    }

    /// All header pins in display order.
    pub fn all() -> impl Iterator<Item = GpioPin> {
        GPIO_PINS.iter().map(|&n| GpioPin(n))
    }
}

impl fmt::Display for GpioPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{}", self.0)
    }
}

impl TryFrom<u8> for GpioPin {
    type Error = Error;

    fn try_from(number: u8) -> Result<Self> {
        Self::new(number)
    }
}

/// Pin → asserted map with lazily created entries.
///
/// Manual writes mark the pin as user-held until [`GpioStateMap::release_held`]
/// runs at the end of the next tick; random flips skip held pins so the user's
/// action wins a same-tick collision.
#[derive(Debug, Clone, Default)]
pub struct GpioStateMap {
    states: BTreeMap<GpioPin, bool>,
    held: BTreeSet<GpioPin>,
}

impl GpioStateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the pin's state; pins never written read `false`.
    pub fn read(&self, pin: GpioPin) -> bool {
        self.states.get(&pin).copied().unwrap_or(false)
    }

    /// Sets the pin's state (last write wins).
    pub fn write(&mut self, pin: GpioPin, asserted: bool) {
        self.states.insert(pin, asserted);
    }

    /// User write: sets the pin and holds it against the next random flip.
    pub fn write_manual(&mut self, pin: GpioPin, asserted: bool) {
        self.write(pin, asserted);
        self.held.insert(pin);
    }

    /// User toggle; returns the new state.
    pub fn toggle(&mut self, pin: GpioPin) -> bool {
        let next = !self.read(pin);
        self.write_manual(pin, next);
        next
    }

    /// Random write from the scheduler. Returns `false` if the pin is user-held.
    pub fn write_random(&mut self, pin: GpioPin, asserted: bool) -> bool {
        if self.held.contains(&pin) {
            return false;
        }
        self.write(pin, asserted);
        true
    }

    pub fn is_held(&self, pin: GpioPin) -> bool {
        self.held.contains(&pin)
    }

    /// Ends the current tick's user hold on every pin.
    pub fn release_held(&mut self) {
        self.held.clear();
    }

    /// Drops every entry; all pins read `false` afterwards.
    pub fn clear(&mut self) {
        self.states.clear();
        self.held.clear();
    }

    /// Number of pins that have been written at least once.
    pub fn written(&self) -> usize {
        self.states.len()
    }

    /// Number of pins currently asserted.
    pub fn asserted_count(&self) -> usize {
        self.states.values().filter(|&&on| on).count()
    }

    /// Every header pin with its state, in display order.
    pub fn snapshot(&self) -> Vec<(GpioPin, bool)> {
        GpioPin::all().map(|pin| (pin, self.read(pin))).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pin(n: u8) -> GpioPin {
        GpioPin::new(n).expect("valid pin")
    }

    #[test]
    fn pin_range_is_validated() {
        assert!(GpioPin::new(2).is_ok());
        assert!(GpioPin::new(27).is_ok());
        assert!(matches!(GpioPin::new(1), Err(Error::InvalidPin(1))));
        assert!(matches!(GpioPin::new(28), Err(Error::InvalidPin(28))));
    }

    #[test]
    fn index_round_trips_through_header_order() {
        for (i, p) in GpioPin::all().enumerate() {
            assert_eq!(p.index(), i);
            assert_eq!(GpioPin::from_index(i), p);
        }
        assert_eq!(GpioPin::all().count(), 26);
    }

    #[test]
    fn unwritten_pins_read_false() {
        let map = GpioStateMap::new();
        assert!(GpioPin::all().all(|p| !map.read(p)));
        assert_eq!(map.written(), 0);
    }

    #[test]
    fn double_toggle_restores_state() {
        let mut map = GpioStateMap::new();
        let before = map.read(pin(13));
        map.toggle(pin(13));
        assert_ne!(map.read(pin(13)), before);
        map.toggle(pin(13));
        assert_eq!(map.read(pin(13)), before);

        map.write(pin(4), true);
        map.toggle(pin(4));
        map.toggle(pin(4));
        assert!(map.read(pin(4)));
    }

    #[test]
    fn held_pin_ignores_random_write_until_released() {
        let mut map = GpioStateMap::new();
        map.toggle(pin(17));
        assert!(!map.write_random(pin(17), false));
        assert!(map.read(pin(17)));

        map.release_held();
        assert!(map.write_random(pin(17), false));
        assert!(!map.read(pin(17)));
    }

    #[test]
    fn clear_resets_everything() {
        let mut map = GpioStateMap::new();
        map.write(pin(2), true);
        map.toggle(pin(3));
        map.clear();
        assert_eq!(map.written(), 0);
        assert!(!map.is_held(pin(3)));
        assert_eq!(map.asserted_count(), 0);
    }

    #[test]
    fn snapshot_lists_all_pins() {
        let mut map = GpioStateMap::new();
        map.write(pin(27), true);
        let snap = map.snapshot();
        assert_eq!(snap.len(), 26);
        assert_eq!(snap[0], (pin(2), false));
        assert_eq!(snap[25], (pin(27), true));
    }
}
