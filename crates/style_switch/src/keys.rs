//! Character bindings that drive mode changes.
//!
//! The default table maps `j`/`t` to the input scheme, `c`/`a` to the
//! manipulation target and `m` to multi-touch, in both cases.

use crate::mode::{InputScheme, ManipulationTarget, ModeState};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mode change triggered by a bound character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchAction {
    SelectJoystick,
    SelectTrackball,
    SelectCamera,
    SelectActor,
    EnableMultiTouch,
}

impl SwitchAction {
    /// Apply this action to the mode flags. Every action except
    /// [`SwitchAction::EnableMultiTouch`] clears multi-touch.
    pub fn apply(self, mode: &mut ModeState) {
        match self {
            SwitchAction::SelectJoystick => {
                mode.scheme = InputScheme::Joystick;
                mode.multi_touch = false;
            }
            SwitchAction::SelectTrackball => {
                mode.scheme = InputScheme::Trackball;
                mode.multi_touch = false;
            }
            SwitchAction::SelectCamera => {
                mode.target = ManipulationTarget::Camera;
                mode.multi_touch = false;
            }
            SwitchAction::SelectActor => {
                mode.target = ManipulationTarget::Actor;
                mode.multi_touch = false;
            }
            SwitchAction::EnableMultiTouch => {
                mode.multi_touch = true;
            }
        }
    }
}

impl fmt::Display for SwitchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SwitchAction::SelectJoystick => "select_joystick",
            SwitchAction::SelectTrackball => "select_trackball",
            SwitchAction::SelectCamera => "select_camera",
            SwitchAction::SelectActor => "select_actor",
            SwitchAction::EnableMultiTouch => "enable_multi_touch",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    pub key: char,
    pub action: SwitchAction,
}

impl KeyBinding {
    pub const fn new(key: char, action: SwitchAction) -> Self {
        Self { key, action }
    }
}

/// Ordered character → action table. Keys are matched exactly, so upper and
/// lower case need separate entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    bindings: Vec<KeyBinding>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use SwitchAction::*;
        let pairs = [
            ('j', SelectJoystick),
            ('t', SelectTrackball),
            ('c', SelectCamera),
            ('a', SelectActor),
            ('m', EnableMultiTouch),
        ];
        let mut bindings = Vec::with_capacity(pairs.len() * 2);
        for (key, action) in pairs {
            bindings.push(KeyBinding::new(key, action));
            bindings.push(KeyBinding::new(key.to_ascii_uppercase(), action));
        }
        Self { bindings }
    }
}

impl KeyBindings {
    /// A table without any bindings.
    pub fn empty() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    pub fn from_bindings(bindings: impl IntoIterator<Item = KeyBinding>) -> Self {
        let mut table = Self::empty();
        for binding in bindings {
            table.bind(binding.key, binding.action);
        }
        table
    }

    /// Action bound to a raw character code.
    pub fn action_for(&self, code: u32) -> Option<SwitchAction> {
        let key = char::from_u32(code)?;
        self.bindings
            .iter()
            .find(|b| b.key == key)
            .map(|b| b.action)
    }

    /// Bind `key`, returning the action it replaced.
    pub fn bind(&mut self, key: char, action: SwitchAction) -> Option<SwitchAction> {
        if let Some(existing) = self.bindings.iter_mut().find(|b| b.key == key) {
            let previous = existing.action;
            existing.action = action;
            return Some(previous);
        }
        self.bindings.push(KeyBinding::new(key, action));
        None
    }

    pub fn unbind(&mut self, key: char) -> Option<SwitchAction> {
        let at = self.bindings.iter().position(|b| b.key == key)?;
        Some(self.bindings.remove(at).action)
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyBinding> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
