//! Keyboard and gamepad state folded into one snapshot per frame.
//!
//! Native builds read gamepads through gilrs; elsewhere only the keyboard is
//! used.

use macroquad::prelude::*;
use tracing::debug;

/// Stick deflection, as a fraction of full scale, that counts as a press.
/// Matches 8192 on a 16-bit axis.
pub const DEAD_ZONE: f32 = 0.25;

/// Normalised per-frame input for the hero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    /// -1 left, 1 right
    pub x_axis: i8,
    /// -1 up, 1 down
    pub y_axis: i8,
    pub jump: bool,
    pub action: bool,
}

/// One gamepad's state, y axis pointing down.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PadState {
    pub x: f32,
    pub y: f32,
    pub jump: bool,
    pub action: bool,
}

fn axis_from(value: f32) -> Option<i8> {
    (value.abs() > DEAD_ZONE).then(|| if value < 0.0 { -1 } else { 1 })
}

/// A deflected stick overrides the keyboard axis; buttons are OR-ed in.
pub fn merge_pad(snapshot: &mut InputSnapshot, pad: &PadState) {
    if let Some(x) = axis_from(pad.x) {
        snapshot.x_axis = x;
    }
    if let Some(y) = axis_from(pad.y) {
        snapshot.y_axis = y;
    }
    snapshot.jump |= pad.jump;
    snapshot.action |= pad.action;
}

/// Reads the keyboard. Left wins over right and up over down.
pub fn keyboard_snapshot() -> InputSnapshot {
    let x_axis = if is_key_down(KeyCode::Left) {
        -1
    } else if is_key_down(KeyCode::Right) {
        1
    } else {
        0
    };
    let y_axis = if is_key_down(KeyCode::Up) {
        -1
    } else if is_key_down(KeyCode::Down) {
        1
    } else {
        0
    };
    InputSnapshot {
        x_axis,
        y_axis,
        jump: is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::Space),
        action: is_key_down(KeyCode::LeftControl) || is_key_down(KeyCode::E),
    }
}

pub struct InputAdapter {
    pads: platform::Pads,
    last: InputSnapshot,
}

impl InputAdapter {
    pub fn new() -> Self {
        InputAdapter {
            pads: platform::Pads::new(),
            last: InputSnapshot::default(),
        }
    }

    /// Call once per frame.
    pub fn poll(&mut self) -> InputSnapshot {
        let mut snapshot = keyboard_snapshot();
        for pad in self.pads.poll() {
            merge_pad(&mut snapshot, &pad);
        }
        if snapshot != self.last {
            debug!(?snapshot, "input changed");
            self.last = snapshot;
        }
        snapshot
    }
}

impl Default for InputAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod platform {
    use super::PadState;
    use gilrs::{Axis, Button, EventType, Gilrs};
    use tracing::{info, warn};

    pub struct Pads {
        gilrs: Option<Gilrs>,
    }

    impl Pads {
        pub fn new() -> Self {
            let gilrs = match Gilrs::new() {
                Ok(gilrs) => Some(gilrs),
                Err(err) => {
                    warn!("gamepad support unavailable: {err}");
                    None
                }
            };
            Pads { gilrs }
        }

        pub fn poll(&mut self) -> Vec<PadState> {
            let Some(gilrs) = self.gilrs.as_mut() else {
                return Vec::new();
            };
            while let Some(event) = gilrs.next_event() {
                match event.event {
                    EventType::Connected => {
                        info!(id = %event.id, name = gilrs.gamepad(event.id).name(), "gamepad connected")
                    }
                    EventType::Disconnected => info!(id = %event.id, "gamepad disconnected"),
                    _ => {}
                }
            }
            gilrs
                .gamepads()
                .map(|(_, gp)| PadState {
                    x: gp.value(Axis::LeftStickX),
                    // gilrs reports up as positive
                    y: -gp.value(Axis::LeftStickY),
                    jump: gp.is_pressed(Button::South),
                    action: gp.is_pressed(Button::West),
                })
                .collect()
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod platform {
    use super::PadState;

    pub struct Pads;

    impl Pads {
        pub fn new() -> Self {
            Pads
        }

        pub fn poll(&mut self) -> Vec<PadState> {
            Vec::new()
        }
    }
}
