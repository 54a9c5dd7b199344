use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single value written to a telemetry sink under a string key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TelemetryValue {
    Flag(bool),
    Integer(i64),
    Number(f64),
    Text(String),
}

impl std::fmt::Display for TelemetryValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TelemetryValue::Flag(v) => write!(f, "{v}"),
            TelemetryValue::Integer(v) => write!(f, "{v}"),
            TelemetryValue::Number(v) => write!(f, "{v:.3}"),
            TelemetryValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<bool> for TelemetryValue {
    fn from(v: bool) -> Self {
        TelemetryValue::Flag(v)
    }
}

impl From<i64> for TelemetryValue {
    fn from(v: i64) -> Self {
        TelemetryValue::Integer(v)
    }
}

impl From<usize> for TelemetryValue {
    fn from(v: usize) -> Self {
        TelemetryValue::Integer(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<f32> for TelemetryValue {
    fn from(v: f32) -> Self {
        TelemetryValue::Number(f64::from(v))
    }
}

impl From<f64> for TelemetryValue {
    fn from(v: f64) -> Self {
        TelemetryValue::Number(v)
    }
}

impl From<&str> for TelemetryValue {
    fn from(v: &str) -> Self {
        TelemetryValue::Text(v.to_string())
    }
}

impl From<String> for TelemetryValue {
    fn from(v: String) -> Self {
        TelemetryValue::Text(v)
    }
}

/// Digital inputs on a standard two-stick controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    A,
    B,
    X,
    Y,
    LeftBumper,
    RightBumper,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    Start,
    Back,
}

/// Snapshot of a controller's digital and analog state for one tick.
///
/// Stick axes are in `[-1.0, 1.0]`, triggers in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GamepadState {
    pub a: bool,
    pub b: bool,
    pub x: bool,
    pub y: bool,
    pub left_bumper: bool,
    pub right_bumper: bool,
    pub dpad_up: bool,
    pub dpad_down: bool,
    pub dpad_left: bool,
    pub dpad_right: bool,
    pub start: bool,
    pub back: bool,
    pub left_stick_x: f32,
    pub left_stick_y: f32,
    pub right_stick_x: f32,
    pub right_stick_y: f32,
    pub left_trigger: f32,
    pub right_trigger: f32,
}

impl GamepadState {
    /// Whether `button` is held down in this snapshot.
    pub fn pressed(&self, button: Button) -> bool {
        match button {
            Button::A => self.a,
            Button::B => self.b,
            Button::X => self.x,
            Button::Y => self.y,
            Button::LeftBumper => self.left_bumper,
            Button::RightBumper => self.right_bumper,
            Button::DpadUp => self.dpad_up,
            Button::DpadDown => self.dpad_down,
            Button::DpadLeft => self.dpad_left,
            Button::DpadRight => self.dpad_right,
            Button::Start => self.start,
            Button::Back => self.back,
        }
    }

    /// Set `button` to `held`.
    pub fn set(&mut self, button: Button, held: bool) {
        let slot = match button {
            Button::A => &mut self.a,
            Button::B => &mut self.b,
            Button::X => &mut self.x,
            Button::Y => &mut self.y,
            Button::LeftBumper => &mut self.left_bumper,
            Button::RightBumper => &mut self.right_bumper,
            Button::DpadUp => &mut self.dpad_up,
            Button::DpadDown => &mut self.dpad_down,
            Button::DpadLeft => &mut self.dpad_left,
            Button::DpadRight => &mut self.dpad_right,
            Button::Start => &mut self.start,
            Button::Back => &mut self.back,
        };
        *slot = held;
    }
}

/// Error type shared by the task runtime, the context boundary and drivers.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MurphyError {
    /// A required collaborator is missing or a construction parameter is out
    /// of range.  Raised before the object exists.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A runtime contract was broken, e.g. the state machine lost its state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },

    #[error("Hardware Fault on {component}: {details}")]
    HardwareFault { component: String, details: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn telemetry_value_conversions() {
        assert_eq!(TelemetryValue::from(true), TelemetryValue::Flag(true));
        assert_eq!(TelemetryValue::from(3usize), TelemetryValue::Integer(3));
        assert_eq!(TelemetryValue::from(0.5f64), TelemetryValue::Number(0.5));
        assert_eq!(
            TelemetryValue::from("Idle"),
            TelemetryValue::Text("Idle".to_string())
        );
    }

    #[test]
    fn telemetry_value_display() {
        assert_eq!(TelemetryValue::from("Intake").to_string(), "Intake");
        assert_eq!(TelemetryValue::from(1.25f64).to_string(), "1.250");
        assert_eq!(TelemetryValue::from(false).to_string(), "false");
    }

    #[test]
    fn telemetry_value_serializes_untagged() {
        let json = serde_json::to_string(&TelemetryValue::from("Score")).unwrap();
        assert_eq!(json, "\"Score\"");
        let back: TelemetryValue = serde_json::from_str("42").unwrap();
        assert_eq!(back, TelemetryValue::Integer(42));
    }

    #[test]
    fn gamepad_set_and_pressed_agree() {
        let mut pad = GamepadState::default();
        assert!(!pad.pressed(Button::RightBumper));
        pad.set(Button::RightBumper, true);
        assert!(pad.pressed(Button::RightBumper));
        assert!(pad.right_bumper);
        pad.set(Button::RightBumper, false);
        assert!(!pad.pressed(Button::RightBumper));
    }

    #[test]
    fn murphy_error_display() {
        let err = MurphyError::QueueFull { capacity: 4 };
        assert!(err.to_string().contains("capacity 4"));

        let err = MurphyError::HardwareFault {
            component: "lift".to_string(),
            details: "stalled".to_string(),
        };
        assert!(err.to_string().contains("lift"));
        assert!(err.to_string().contains("stalled"));
    }
}
