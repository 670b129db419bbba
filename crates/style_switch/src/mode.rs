//! Mode selection state and the lookup from modes to style variants.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter};

/// Whether input moves the camera or the picked scene object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ManipulationTarget {
    #[default]
    Camera,
    Actor,
}

/// How pointer deltas map to motion.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InputScheme {
    #[default]
    Joystick,
    Trackball,
}

/// The five style variants a switch owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumCount, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum StyleKind {
    JoystickCamera,
    JoystickActor,
    TrackballCamera,
    TrackballActor,
    MultiTouchCamera,
}

impl StyleKind {
    /// All variants in registry order.
    pub const ALL: [StyleKind; StyleKind::COUNT] = [
        StyleKind::JoystickCamera,
        StyleKind::JoystickActor,
        StyleKind::TrackballCamera,
        StyleKind::TrackballActor,
        StyleKind::MultiTouchCamera,
    ];

    /// Registry slot of this variant.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_modes(target: ManipulationTarget, scheme: InputScheme) -> Self {
        match (scheme, target) {
            (InputScheme::Joystick, ManipulationTarget::Camera) => StyleKind::JoystickCamera,
            (InputScheme::Joystick, ManipulationTarget::Actor) => StyleKind::JoystickActor,
            (InputScheme::Trackball, ManipulationTarget::Camera) => StyleKind::TrackballCamera,
            (InputScheme::Trackball, ManipulationTarget::Actor) => StyleKind::TrackballActor,
        }
    }

    pub const fn is_multi_touch(self) -> bool {
        matches!(self, StyleKind::MultiTouchCamera)
    }

    /// Whether default-viewport broadcasts reach this variant.
    ///
    /// The multi-touch camera keeps whatever default viewport it had.
    pub const fn receives_default_viewport(self) -> bool {
        !self.is_multi_touch()
    }
}

/// The three independent mode flags.
///
/// `multi_touch` overrides `target` and `scheme` while set; the other two
/// keep their values so clearing multi-touch returns to the previous pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeState {
    pub target: ManipulationTarget,
    pub scheme: InputScheme,
    pub multi_touch: bool,
}

impl ModeState {
    pub const fn new(target: ManipulationTarget, scheme: InputScheme) -> Self {
        Self {
            target,
            scheme,
            multi_touch: false,
        }
    }

    pub const fn resolve(&self) -> StyleKind {
        if self.multi_touch {
            StyleKind::MultiTouchCamera
        } else {
            StyleKind::from_modes(self.target, self.scheme)
        }
    }
}
