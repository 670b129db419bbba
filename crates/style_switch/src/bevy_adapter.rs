#![cfg(feature = "bevy")]
//! Bevy integration: keyboard input drives the switch.
//!
//! The switch holds `Rc` handles, so it lives in a non-send resource and the
//! forwarding system runs on the main thread.

use crate::mode::StyleKind;
use crate::settings::SwitchSettings;
use crate::source::{LocalEventSource, Notification, Propagation, SourceHandle};
use crate::styles::StandardStyle;
use crate::switch::StyleSwitch;
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::prelude::*;
use std::rc::Rc;

/// Emitted when keyboard input changed the active variant.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractorStyleChanged {
    pub from: Option<StyleKind>,
    pub to: StyleKind,
}

/// Event source plus the switch observing it.
pub struct StyleSwitchHost {
    pub source: Rc<LocalEventSource>,
    pub switch: StyleSwitch,
}

impl StyleSwitchHost {
    pub fn new(settings: &SwitchSettings) -> Self {
        let source = Rc::new(LocalEventSource::new());
        let mut switch = StyleSwitch::from_settings(settings, StandardStyle::boxed);
        switch.set_event_source(Some(SourceHandle::new(&source)));
        Self { source, switch }
    }

    pub fn dispatch(&mut self, notification: &Notification) -> Propagation {
        let switch = &mut self.switch;
        self.source
            .emit(notification, |id, n| switch.deliver(id, n))
    }
}

impl Drop for StyleSwitchHost {
    fn drop(&mut self) {
        let switch = &mut self.switch;
        self.source.shutdown(|id, n| switch.deliver(id, n));
    }
}

#[derive(Default)]
pub struct StyleSwitchPlugin {
    pub settings: SwitchSettings,
}

impl Plugin for StyleSwitchPlugin {
    fn build(&self, app: &mut App) {
        app.insert_non_send_resource(StyleSwitchHost::new(&self.settings))
            .add_message::<InteractorStyleChanged>()
            .add_systems(PreUpdate, forward_keyboard_input);
    }

    fn name(&self) -> &str {
        "StyleSwitchPlugin"
    }
}

/// Feed typed characters into the host's event source.
pub fn forward_keyboard_input(
    mut keyboard: MessageReader<KeyboardInput>,
    mut host: NonSendMut<StyleSwitchHost>,
    mut changed: MessageWriter<InteractorStyleChanged>,
) {
    for input in keyboard.read() {
        if !input.state.is_pressed() {
            continue;
        }
        let Key::Character(text) = &input.logical_key else {
            continue;
        };
        for ch in text.chars() {
            let before = host.switch.active_kind();
            host.dispatch(&Notification::character(ch));
            if let Some(to) = host.switch.active_kind() {
                if before != Some(to) {
                    changed.write(InteractorStyleChanged { from: before, to });
                }
            }
        }
    }
}
