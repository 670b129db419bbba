//! Runtime switching between interactor styles.
//!
//! A [`StyleSwitch`] owns one instance of each of the five manipulation
//! styles (joystick/trackball × camera/actor, plus multi-touch camera) and
//! keeps exactly one of them attached to the current [`EventSource`]. Mode
//! changes come from the application or from character input routed through
//! the source; the switch resolves the matching style and moves the
//! attachment over.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use style_switch::{
//!     InputScheme, LocalEventSource, ManipulationTarget, Notification, SourceHandle,
//!     StandardStyle, StyleKind, StyleSwitch,
//! };
//!
//! let source = Rc::new(LocalEventSource::new());
//! let mut switch = StyleSwitch::new(StandardStyle::boxed);
//! switch.set_event_source(Some(SourceHandle::new(&source)));
//! switch.select_mode(ManipulationTarget::Camera, InputScheme::Trackball);
//!
//! source.emit(&Notification::character('m'), |id, n| switch.deliver(id, n));
//! assert_eq!(switch.active_kind(), Some(StyleKind::MultiTouchCamera));
//! ```

pub mod errors;
pub mod keys;
pub mod mode;
pub mod registry;
pub mod settings;
pub mod source;
pub mod style;
pub mod styles;
pub mod switch;

#[cfg(feature = "bevy")]
pub mod bevy_adapter;

pub use errors::SwitchError;
pub use keys::{KeyBinding, KeyBindings, SwitchAction};
pub use mode::{InputScheme, ManipulationTarget, ModeState, StyleKind};
pub use registry::StyleRegistry;
pub use settings::{Settings, SettingsError, SwitchSettings};
pub use source::{
    EventSource, LocalEventSource, Notification, NotificationKind, ObserverId, Propagation,
    SourceHandle,
};
pub use style::{DeviceStyleId, Indent, InteractorStyle, ViewportId};
pub use styles::StandardStyle;
pub use switch::StyleSwitch;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
