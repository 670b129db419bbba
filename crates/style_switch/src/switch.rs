//! The style switch: owns all variants, attaches exactly one.

use crate::errors::{flag_from_value, SwitchError};
use crate::keys::KeyBindings;
use crate::mode::{InputScheme, ManipulationTarget, ModeState, StyleKind};
use crate::registry::StyleRegistry;
use crate::settings::SwitchSettings;
use crate::source::{
    same_source, EventSource, Notification, NotificationKind, ObserverId, Propagation,
    SourceHandle,
};
use crate::style::{DeviceStyleId, Indent, InteractorStyle, ViewportId};
use crate::styles::StandardStyle;
use std::fmt;
use tracing::{debug, error, trace};

/// Notification kinds the switch itself subscribes to.
const SWITCH_KINDS: [NotificationKind; 2] =
    [NotificationKind::Character, NotificationKind::SourceDestroyed];

/// Interactor style façade that forwards to one of five owned variants.
///
/// Every mode change goes through a single resolve step, which detaches
/// the previously active variant before attaching the new one, so at most
/// one variant is subscribed to the event source at any time.
pub struct StyleSwitch {
    id: ObserverId,
    registry: StyleRegistry,
    mode: ModeState,
    active: Option<StyleKind>,
    source: Option<SourceHandle>,
    bindings: KeyBindings,
    priority: f32,
    clipping_auto_adjust: bool,
    viewport: Option<ViewportId>,
    default_viewport: Option<ViewportId>,
    device_style: Option<DeviceStyleId>,
}

impl StyleSwitch {
    /// Create a switch owning one style per [`StyleKind`] built by `factory`.
    ///
    /// No variant is active until the first mode selection or event source.
    pub fn new<F>(factory: F) -> Self
    where
        F: FnMut(StyleKind) -> Box<dyn InteractorStyle>,
    {
        Self {
            id: ObserverId::next(),
            registry: StyleRegistry::new(factory),
            mode: ModeState::default(),
            active: None,
            source: None,
            bindings: KeyBindings::default(),
            priority: 0.0,
            clipping_auto_adjust: true,
            viewport: None,
            default_viewport: None,
            device_style: None,
        }
    }

    /// Switch built from [`StandardStyle`]s.
    pub fn with_standard_styles() -> Self {
        Self::new(StandardStyle::boxed)
    }

    /// Apply `settings` to a new switch. The configured initial mode is
    /// stored but not resolved yet.
    pub fn from_settings<F>(settings: &SwitchSettings, factory: F) -> Self
    where
        F: FnMut(StyleKind) -> Box<dyn InteractorStyle>,
    {
        let mut switch = Self::new(factory);
        switch.mode = settings.initial_mode;
        switch.bindings = settings.bindings.clone();
        switch.priority = settings.priority;
        switch.set_clipping_auto_adjust(settings.clipping_auto_adjust);
        switch
    }

    // ------------------------------------------------------------------
    // Mode selection
    // ------------------------------------------------------------------

    pub fn select_mode(&mut self, target: ManipulationTarget, scheme: InputScheme) {
        self.mode = ModeState::new(target, scheme);
        self.resolve();
    }

    pub fn select_multi_touch(&mut self) {
        self.mode.multi_touch = true;
        self.resolve();
    }

    /// Apply the binding for `code`, if any, then resolve.
    ///
    /// Bound codes are reported as [`Propagation::Consumed`] so lower
    /// priority observers (including the active style) never see them.
    pub fn on_character_input(&mut self, code: u32) -> Propagation {
        let propagation = match self.bindings.action_for(code) {
            Some(action) => {
                trace!("character {code:#x} -> {action}");
                action.apply(&mut self.mode);
                Propagation::Consumed
            }
            None => Propagation::Continue,
        };
        self.resolve();
        propagation
    }

    /// Bring the active variant in line with the mode flags.
    ///
    /// Re-attaches the active variant and pushes the device style even when
    /// the variant did not change, so replacing the event source without a
    /// mode change still leaves the right variant subscribed.
    fn resolve(&mut self) {
        let target = self.mode.resolve();
        if self.active != Some(target) {
            if let Some(previous) = self.active {
                self.registry.get_mut(previous).set_event_source(None);
            }
            debug!("interactor style {:?} -> {}", self.active, target);
            self.active = Some(target);
        }
        let source = self.source.clone();
        let device = self.device_style;
        let style = self.registry.get_mut(target);
        style.set_event_source(source);
        style.set_device_style(device);
    }

    // ------------------------------------------------------------------
    // Event source
    // ------------------------------------------------------------------

    /// Observe `source` (or nothing) from now on.
    pub fn set_event_source(&mut self, source: Option<SourceHandle>) {
        if same_source(self.source.as_ref(), source.as_ref()) {
            return;
        }
        if let Some(old) = self.source.as_ref().and_then(SourceHandle::get) {
            old.remove_observer(self.id);
        }
        if let Some(active) = self.active {
            self.registry.get_mut(active).set_event_source(None);
        }
        if let Some(new) = source.as_ref().and_then(SourceHandle::get) {
            for kind in SWITCH_KINDS {
                new.add_observer(self.id, kind, self.priority);
            }
        }
        debug!(
            "event source {}",
            if source.is_some() { "attached" } else { "cleared" }
        );
        self.source = source;
        self.resolve();
    }

    /// Explicit teardown hook for the owner of the event source.
    pub fn detach_source(&mut self) {
        self.set_event_source(None);
    }

    pub fn event_source(&self) -> Option<&SourceHandle> {
        self.source.as_ref()
    }

    /// The switch's own observer behavior.
    pub fn handle(&mut self, notification: &Notification) -> Propagation {
        match notification {
            Notification::Character { code } => self.on_character_input(*code),
            Notification::SourceDestroyed => {
                self.set_event_source(None);
                Propagation::Continue
            }
            _ => Propagation::Continue,
        }
    }

    /// Route a notification to the switch or to the variant owning
    /// `observer`. Unknown observers are ignored.
    pub fn deliver(&mut self, observer: ObserverId, notification: &Notification) -> Propagation {
        if observer == self.id {
            return self.handle(notification);
        }
        match self.registry.kind_of(observer) {
            Some(kind) => self.registry.get_mut(kind).handle(notification),
            None => Propagation::Continue,
        }
    }

    // ------------------------------------------------------------------
    // Broadcast configuration
    // ------------------------------------------------------------------

    pub fn set_clipping_auto_adjust(&mut self, enabled: bool) {
        if enabled == self.clipping_auto_adjust {
            return;
        }
        self.clipping_auto_adjust = enabled;
        self.registry
            .for_each(|style| style.set_clipping_auto_adjust(enabled));
    }

    /// Integer form of [`StyleSwitch::set_clipping_auto_adjust`]. Values other
    /// than `0` and `1` are rejected and leave the flag untouched.
    pub fn set_clipping_auto_adjust_value(&mut self, value: i64) -> Result<(), SwitchError> {
        if value == i64::from(self.clipping_auto_adjust) {
            return Ok(());
        }
        let enabled = flag_from_value(value).map_err(|err| {
            error!("{err}");
            err
        })?;
        self.set_clipping_auto_adjust(enabled);
        Ok(())
    }

    pub fn set_viewport(&mut self, viewport: Option<ViewportId>) {
        self.viewport = viewport;
        self.registry.for_each(|style| style.set_viewport(viewport));
    }

    /// Broadcast the default viewport to the joystick and trackball variants.
    /// The multi-touch variant is left alone.
    pub fn set_default_viewport(&mut self, viewport: Option<ViewportId>) {
        self.default_viewport = viewport;
        self.registry.for_each_where(
            StyleKind::receives_default_viewport,
            |style| style.set_default_viewport(viewport),
        );
    }

    pub fn set_device_style(&mut self, device: Option<DeviceStyleId>) {
        self.device_style = device;
        if let Some(active) = self.active {
            self.registry.get_mut(active).set_device_style(device);
        }
    }

    /// Priority used for subscriptions made after this call.
    pub fn set_priority(&mut self, priority: f32) {
        self.priority = priority;
    }

    pub fn bindings_mut(&mut self) -> &mut KeyBindings {
        &mut self.bindings
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn observer_id(&self) -> ObserverId {
        self.id
    }

    pub fn mode(&self) -> ModeState {
        self.mode
    }

    pub fn active_kind(&self) -> Option<StyleKind> {
        self.active
    }

    pub fn active_style(&self) -> Option<&dyn InteractorStyle> {
        self.active.map(|kind| self.registry.get(kind))
    }

    pub fn style(&self, kind: StyleKind) -> &dyn InteractorStyle {
        self.registry.get(kind)
    }

    pub fn attached_styles(&self) -> Vec<StyleKind> {
        self.registry.attached()
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn priority(&self) -> f32 {
        self.priority
    }

    pub fn clipping_auto_adjust(&self) -> bool {
        self.clipping_auto_adjust
    }

    pub fn viewport(&self) -> Option<ViewportId> {
        self.viewport
    }

    pub fn default_viewport(&self) -> Option<ViewportId> {
        self.default_viewport
    }

    pub fn device_style(&self) -> Option<DeviceStyleId> {
        self.device_style
    }

    /// Diagnostic dump naming the active variant, followed by the variant's
    /// own dump one level deeper.
    pub fn describe(&self, out: &mut dyn fmt::Write, indent: Indent) -> fmt::Result {
        writeln!(
            out,
            "{indent}Mode: {} / {}{}",
            self.mode.target,
            self.mode.scheme,
            if self.mode.multi_touch { " (multi-touch)" } else { "" }
        )?;
        writeln!(
            out,
            "{indent}AutoAdjustClippingRange: {}",
            if self.clipping_auto_adjust { "On" } else { "Off" }
        )?;
        match self.active {
            Some(kind) => {
                let style = self.registry.get(kind);
                writeln!(out, "{indent}CurrentStyle: {kind}")?;
                writeln!(out, "{}{}", indent.next(), style.class_name())?;
                style.describe(out, indent.next())
            }
            None => writeln!(out, "{indent}CurrentStyle: none"),
        }
    }
}

impl fmt::Display for StyleSwitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.describe(f, Indent::default())
    }
}

impl fmt::Debug for StyleSwitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleSwitch")
            .field("id", &self.id)
            .field("mode", &self.mode)
            .field("active", &self.active)
            .field("source", &self.source)
            .field("clipping_auto_adjust", &self.clipping_auto_adjust)
            .finish_non_exhaustive()
    }
}
