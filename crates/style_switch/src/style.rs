//! The capability set every interactor style offers to the switch.

use crate::source::{Notification, ObserverId, Propagation, SourceHandle};
use std::fmt;

/// Opaque, non-owning reference to a renderer/viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewportId(pub u64);

/// Opaque, non-owning reference to an auxiliary device style
/// (3D mouse and similar devices).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceStyleId(pub u64);

/// Indentation level for diagnostic dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Indent(usize);

impl Indent {
    const STEP: usize = 2;

    pub fn next(self) -> Self {
        Self(self.0 + Self::STEP)
    }

    pub fn width(self) -> usize {
        self.0
    }
}

impl fmt::Display for Indent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:width$}", "", width = self.0)
    }
}

/// Behavior object translating raw input into camera or actor manipulation.
///
/// The switch owns one boxed implementation per [`StyleKind`](crate::StyleKind)
/// and only ever attaches one of them to an event source at a time.
pub trait InteractorStyle {
    /// Human-readable type name used in diagnostics.
    fn class_name(&self) -> &str;

    /// Id this style subscribes under.
    fn observer_id(&self) -> ObserverId;

    /// Attach to `source`, or release all subscriptions when `None`.
    ///
    /// Passing the source the style is already attached to must not change
    /// its subscriptions.
    fn set_event_source(&mut self, source: Option<SourceHandle>);

    fn event_source(&self) -> Option<&SourceHandle>;

    fn set_viewport(&mut self, viewport: Option<ViewportId>);

    fn set_default_viewport(&mut self, viewport: Option<ViewportId>);

    fn set_clipping_auto_adjust(&mut self, enabled: bool);

    fn set_device_style(&mut self, device: Option<DeviceStyleId>);

    /// Handle a notification the style subscribed to.
    fn handle(&mut self, notification: &Notification) -> Propagation {
        let _ = notification;
        Propagation::Continue
    }

    /// Write a diagnostic dump, each line prefixed with `indent`.
    fn describe(&self, out: &mut dyn fmt::Write, indent: Indent) -> fmt::Result;
}
