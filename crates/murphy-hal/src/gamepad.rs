//! Controller input sources.

use std::cell::RefCell;
use std::rc::Rc;

use murphy_types::{Button, GamepadState};

/// A controller the robot reads once or more per tick.
///
/// Implementations return a snapshot; the core never writes to a gamepad.
pub trait Gamepad {
    fn state(&self) -> GamepadState;
}

/// Scriptable gamepad for simulation and tests.
///
/// Clones share the same underlying state, so the host loop (or a test) can
/// keep one clone to press buttons while the context owns another.
#[derive(Clone, Default)]
pub struct SimGamepad {
    state: Rc<RefCell<GamepadState>>,
}

impl SimGamepad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&self, button: Button) {
        self.state.borrow_mut().set(button, true);
    }

    pub fn release(&self, button: Button) {
        self.state.borrow_mut().set(button, false);
    }

    /// Release every button and centre every axis.
    pub fn release_all(&self) {
        *self.state.borrow_mut() = GamepadState::default();
    }

    /// Set the left stick position.
    pub fn set_left_stick(&self, x: f32, y: f32) {
        let mut state = self.state.borrow_mut();
        state.left_stick_x = x.clamp(-1.0, 1.0);
        state.left_stick_y = y.clamp(-1.0, 1.0);
    }
}

impl Gamepad for SimGamepad {
    fn state(&self) -> GamepadState {
        *self.state.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_visible_through_clone() {
        let driver = SimGamepad::new();
        let owned: Box<dyn Gamepad> = Box::new(driver.clone());

        assert!(!owned.state().a);
        driver.press(Button::A);
        assert!(owned.state().pressed(Button::A));
        driver.release(Button::A);
        assert!(!owned.state().a);
    }

    #[test]
    fn sticks_are_clamped() {
        let pad = SimGamepad::new();
        pad.set_left_stick(2.0, -3.0);
        let state = pad.state();
        assert_eq!(state.left_stick_x, 1.0);
        assert_eq!(state.left_stick_y, -1.0);

        pad.release_all();
        assert_eq!(pad.state(), GamepadState::default());
    }
}
