//! Reference style used when the application does not bring its own.
//!
//! `StandardStyle` holds the configuration a style receives from the switch
//! and subscribes to the notifications its variant reacts to. It does no
//! camera math; handled input is counted and traced.

use crate::mode::StyleKind;
use crate::source::{
    same_source, EventSource, Notification, NotificationKind, ObserverId, Propagation,
    SourceHandle,
};
use crate::style::{DeviceStyleId, Indent, InteractorStyle, ViewportId};
use std::fmt;
use tracing::{debug, trace};

const POINTER_KINDS: &[NotificationKind] = &[NotificationKind::Character, NotificationKind::Pointer];
const GESTURE_KINDS: &[NotificationKind] = &[NotificationKind::Character, NotificationKind::Gesture];

pub struct StandardStyle {
    kind: StyleKind,
    id: ObserverId,
    source: Option<SourceHandle>,
    viewport: Option<ViewportId>,
    default_viewport: Option<ViewportId>,
    clipping_auto_adjust: bool,
    device_style: Option<DeviceStyleId>,
    priority: f32,
    handled: u64,
}

impl StandardStyle {
    pub fn new(kind: StyleKind) -> Self {
        Self {
            kind,
            id: ObserverId::next(),
            source: None,
            viewport: None,
            default_viewport: None,
            clipping_auto_adjust: true,
            device_style: None,
            priority: 0.0,
            handled: 0,
        }
    }

    /// Factory for [`StyleSwitch::new`](crate::StyleSwitch::new).
    pub fn boxed(kind: StyleKind) -> Box<dyn InteractorStyle> {
        Box::new(Self::new(kind))
    }

    pub fn kind(&self) -> StyleKind {
        self.kind
    }

    pub fn viewport(&self) -> Option<ViewportId> {
        self.viewport
    }

    pub fn default_viewport(&self) -> Option<ViewportId> {
        self.default_viewport
    }

    pub fn clipping_auto_adjust(&self) -> bool {
        self.clipping_auto_adjust
    }

    pub fn device_style(&self) -> Option<DeviceStyleId> {
        self.device_style
    }

    /// Number of pointer/gesture notifications handled so far.
    pub fn handled(&self) -> u64 {
        self.handled
    }

    fn observed_kinds(&self) -> &'static [NotificationKind] {
        if self.kind.is_multi_touch() {
            GESTURE_KINDS
        } else {
            POINTER_KINDS
        }
    }
}

impl InteractorStyle for StandardStyle {
    fn class_name(&self) -> &str {
        match self.kind {
            StyleKind::JoystickCamera => "JoystickCameraStyle",
            StyleKind::JoystickActor => "JoystickActorStyle",
            StyleKind::TrackballCamera => "TrackballCameraStyle",
            StyleKind::TrackballActor => "TrackballActorStyle",
            StyleKind::MultiTouchCamera => "MultiTouchCameraStyle",
        }
    }

    fn observer_id(&self) -> ObserverId {
        self.id
    }

    fn set_event_source(&mut self, source: Option<SourceHandle>) {
        if same_source(self.source.as_ref(), source.as_ref()) {
            return;
        }
        if let Some(old) = self.source.take().and_then(|h| h.get()) {
            old.remove_observer(self.id);
        }
        if let Some(new) = source.as_ref().and_then(SourceHandle::get) {
            for &kind in self.observed_kinds() {
                new.add_observer(self.id, kind, self.priority);
            }
        }
        debug!(
            "{} {}",
            self.kind,
            if source.is_some() { "attached" } else { "detached" }
        );
        self.source = source;
    }

    fn event_source(&self) -> Option<&SourceHandle> {
        self.source.as_ref()
    }

    fn set_viewport(&mut self, viewport: Option<ViewportId>) {
        self.viewport = viewport;
    }

    fn set_default_viewport(&mut self, viewport: Option<ViewportId>) {
        self.default_viewport = viewport;
    }

    fn set_clipping_auto_adjust(&mut self, enabled: bool) {
        self.clipping_auto_adjust = enabled;
    }

    fn set_device_style(&mut self, device: Option<DeviceStyleId>) {
        self.device_style = device;
    }

    fn handle(&mut self, notification: &Notification) -> Propagation {
        match notification {
            Notification::Pointer { .. } if !self.kind.is_multi_touch() => {
                self.handled += 1;
                trace!("{} handled {:?}", self.kind, notification);
                Propagation::Consumed
            }
            Notification::Gesture { .. } if self.kind.is_multi_touch() => {
                self.handled += 1;
                trace!("{} handled {:?}", self.kind, notification);
                Propagation::Consumed
            }
            _ => Propagation::Continue,
        }
    }

    fn describe(&self, out: &mut dyn fmt::Write, indent: Indent) -> fmt::Result {
        writeln!(out, "{indent}Observer: {}", self.id)?;
        writeln!(
            out,
            "{indent}EventSource: {}",
            if self.source.is_some() { "set" } else { "none" }
        )?;
        writeln!(out, "{indent}Viewport: {:?}", self.viewport)?;
        writeln!(out, "{indent}DefaultViewport: {:?}", self.default_viewport)?;
        writeln!(
            out,
            "{indent}AutoAdjustClippingRange: {}",
            if self.clipping_auto_adjust { "On" } else { "Off" }
        )?;
        writeln!(out, "{indent}DeviceStyle: {:?}", self.device_style)?;
        writeln!(out, "{indent}Handled: {}", self.handled)
    }
}
