//! Input providers
//!
//! Hosts translate device events into [`InputEvent`]s and feed them to a
//! [`Controller`], which yields one [`TickInput`] per simulation step.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::TickInput;

/// Logical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Jump,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            " " | "ArrowUp" | "w" | "W" => Some(Key::Jump),
            _ => None,
        }
    }
}

/// Device-independent input events, in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// A touch/click began
    PointerDown(Vec2),
    /// A touch/cursor moved
    PointerMove(Vec2),
    /// A touch/click ended
    PointerUp,
}

/// Which controller a player uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ControllerKind {
    #[default]
    Keyboard,
    Joystick,
}

impl ControllerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControllerKind::Keyboard => "Keyboard",
            ControllerKind::Joystick => "Joystick",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "keyboard" | "keys" => Some(ControllerKind::Keyboard),
            "joystick" | "touch" => Some(ControllerKind::Joystick),
            _ => None,
        }
    }
}

/// Source of per-tick movement
pub trait Controller {
    /// Update internal state from a device event
    fn handle(&mut self, event: &InputEvent);

    /// Current horizontal direction (-1, 0, 1) and whether jump is held
    fn movement(&self) -> (i8, bool);

    /// Whether jump was pressed since the last call
    fn take_jump(&mut self) -> bool;

    /// Input for the next simulation tick
    fn tick_input(&mut self) -> TickInput {
        let (horizontal, _) = self.movement();
        TickInput {
            horizontal,
            jump: self.take_jump(),
            autopilot: false,
        }
    }
}

/// Build the controller for `kind`
pub fn make_controller(kind: ControllerKind, dead_zone: f32) -> Box<dyn Controller> {
    log::info!("Using {} controller", kind.as_str());
    match kind {
        ControllerKind::Keyboard => Box::new(KeyboardController::default()),
        ControllerKind::Joystick => Box::new(JoystickController::new(dead_zone)),
    }
}

/// Press/release tracking for left, right and jump
#[derive(Debug, Clone, Default)]
pub struct KeyboardController {
    left: bool,
    right: bool,
    jump_held: bool,
    jump_queued: bool,
}

impl Controller for KeyboardController {
    fn handle(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown(Key::Left) => self.left = true,
            InputEvent::KeyDown(Key::Right) => self.right = true,
            InputEvent::KeyDown(Key::Jump) => {
                // Auto-repeat while held is not a new press
                if !self.jump_held {
                    self.jump_queued = true;
                }
                self.jump_held = true;
            }
            InputEvent::KeyUp(Key::Left) => self.left = false,
            InputEvent::KeyUp(Key::Right) => self.right = false,
            InputEvent::KeyUp(Key::Jump) => self.jump_held = false,
            _ => {}
        }
    }

    fn movement(&self) -> (i8, bool) {
        let mut horizontal = 0;
        if self.left {
            horizontal -= 1;
        }
        if self.right {
            horizontal += 1;
        }
        (horizontal, self.jump_held)
    }

    fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump_queued)
    }
}

/// On-screen stick in the bottom left and jump button in the bottom right
#[derive(Debug, Clone)]
pub struct JoystickController {
    pub stick_center: Vec2,
    pub stick_radius: f32,
    pub button_center: Vec2,
    pub button_radius: f32,
    /// Fraction of the stick radius ignored around the center
    pub dead_zone: f32,
    /// Handle position, within `stick_radius` of the center
    pub handle: Vec2,
    active: bool,
    jump_held: bool,
    jump_queued: bool,
}

impl JoystickController {
    pub const STICK_RADIUS: f32 = 50.0;
    pub const BUTTON_RADIUS: f32 = 30.0;

    pub fn new(dead_zone: f32) -> Self {
        let stick_center = Vec2::new(100.0, SCREEN_HEIGHT - 100.0);
        Self {
            stick_center,
            stick_radius: Self::STICK_RADIUS,
            button_center: Vec2::new(SCREEN_WIDTH - 80.0, SCREEN_HEIGHT - 100.0),
            button_radius: Self::BUTTON_RADIUS,
            dead_zone: dead_zone.clamp(0.0, 1.0),
            handle: stick_center,
            active: false,
            jump_held: false,
            jump_queued: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    fn release(&mut self) {
        self.active = false;
        self.handle = self.stick_center;
        self.jump_held = false;
    }
}

impl Controller for JoystickController {
    fn handle(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerDown(pos) => {
                if pos.distance(self.stick_center) <= self.stick_radius {
                    self.active = true;
                    self.handle = pos;
                }
                if pos.distance(self.button_center) <= self.button_radius {
                    if !self.jump_held {
                        self.jump_queued = true;
                    }
                    self.jump_held = true;
                }
            }
            InputEvent::PointerMove(pos) if self.active => {
                let offset = (pos - self.stick_center).clamp_length_max(self.stick_radius);
                self.handle = self.stick_center + offset;
            }
            InputEvent::PointerUp => self.release(),
            _ => {}
        }
    }

    fn movement(&self) -> (i8, bool) {
        if !self.active {
            return (0, self.jump_held);
        }
        let dx = self.handle.x - self.stick_center.x;
        if dx.abs() < self.stick_radius * self.dead_zone {
            return (0, self.jump_held);
        }
        (if dx > 0.0 { 1 } else { -1 }, self.jump_held)
    }

    fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump_queued)
    }
}
