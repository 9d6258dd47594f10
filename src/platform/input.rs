//! Per-frame input snapshot

use std::collections::HashSet;

use glam::Vec2;

/// Keys the arcade reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Backspace,
    F11,
    /// Number row / numpad digit
    Digit(u8),
    /// Letter key (stored uppercase)
    Letter(char),
    Plus,
    Minus,
}

impl Key {
    /// Letter key from any-case char
    pub fn letter(c: char) -> Self {
        Key::Letter(c.to_ascii_uppercase())
    }
}

/// Input snapshot for a single tick
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Keys currently held down
    pub held: HashSet<Key>,
    /// Keys that went down this frame
    pub pressed: HashSet<Key>,
    /// Pointer position in pixels
    pub pointer: Vec2,
    /// Left button went down this frame
    pub clicked: bool,
}

impl FrameInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot with a single key-down edge
    pub fn key(key: Key) -> Self {
        let mut input = Self::default();
        input.press(key);
        input
    }

    /// Snapshot with a left click at a pixel position
    pub fn click_at(pointer: Vec2) -> Self {
        Self {
            pointer,
            clicked: true,
            ..Default::default()
        }
    }

    /// Record a key-down edge (also marks the key held)
    pub fn press(&mut self, key: Key) {
        self.pressed.insert(key);
        self.held.insert(key);
    }

    pub fn was_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// First digit key pressed this frame, if any
    pub fn pressed_digit(&self) -> Option<u8> {
        (1..=9).find(|d| self.pressed.contains(&Key::Digit(*d)))
    }

    /// Clear one-shot edges after the tick consumed them
    pub fn clear_edges(&mut self) {
        self.pressed.clear();
        self.clicked = false;
    }
}

/// Auto-repeat for one held key: fires on the press edge, then after
/// `delay` seconds and every `interval` seconds while still held
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyRepeat {
    held_for: f32,
    next_fire: f32,
}

impl KeyRepeat {
    pub fn fires(&mut self, input: &FrameInput, key: Key, dt: f32, delay: f32, interval: f32) -> bool {
        if input.was_pressed(key) {
            self.held_for = 0.0;
            self.next_fire = delay;
            return true;
        }
        if !input.is_held(key) {
            self.held_for = 0.0;
            self.next_fire = delay;
            return false;
        }
        self.held_for += dt;
        if self.held_for >= self.next_fire {
            self.next_fire += interval.max(f32::EPSILON);
            true
        } else {
            false
        }
    }
}
