//! Integration tests for the attach/detach protocol of `StyleSwitch`:
//! - exactly one variant attached after every mode change
//! - idempotent re-selection (re-attach without detach)
//! - character mapping, consumption and fall-through
//! - event source replacement and teardown
//! - broadcast of clipping flag and viewports

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use style_switch::{
    DeviceStyleId, EventSource, Indent, InputScheme, InteractorStyle, LocalEventSource,
    ManipulationTarget, Notification, NotificationKind, ObserverId, Propagation, SourceHandle,
    StyleKind, StyleSwitch, SwitchError, ViewportId,
};
use test_log::test;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Attach(Option<SourceHandle>),
    Viewport(Option<ViewportId>),
    DefaultViewport(Option<ViewportId>),
    Clipping(bool),
    Device(Option<DeviceStyleId>),
}

type Journal = Rc<RefCell<Vec<(StyleKind, Call)>>>;

/// Style that records every call and subscribes like a real style would.
struct RecordingStyle {
    kind: StyleKind,
    id: ObserverId,
    source: Option<SourceHandle>,
    journal: Journal,
}

impl RecordingStyle {
    fn factory(journal: &Journal) -> impl FnMut(StyleKind) -> Box<dyn InteractorStyle> {
        let journal = journal.clone();
        move |kind| -> Box<dyn InteractorStyle> {
            Box::new(RecordingStyle {
                kind,
                id: ObserverId::next(),
                source: None,
                journal: journal.clone(),
            })
        }
    }

    fn record(&self, call: Call) {
        self.journal.borrow_mut().push((self.kind, call));
    }
}

impl InteractorStyle for RecordingStyle {
    fn class_name(&self) -> &str {
        "RecordingStyle"
    }

    fn observer_id(&self) -> ObserverId {
        self.id
    }

    fn set_event_source(&mut self, source: Option<SourceHandle>) {
        self.record(Call::Attach(source.clone()));
        if self.source == source {
            return;
        }
        if let Some(old) = self.source.take().and_then(|h| h.get()) {
            old.remove_observer(self.id);
        }
        if let Some(new) = source.as_ref().and_then(SourceHandle::get) {
            new.add_observer(self.id, NotificationKind::Pointer, 0.0);
        }
        self.source = source;
    }

    fn event_source(&self) -> Option<&SourceHandle> {
        self.source.as_ref()
    }

    fn set_viewport(&mut self, viewport: Option<ViewportId>) {
        self.record(Call::Viewport(viewport));
    }

    fn set_default_viewport(&mut self, viewport: Option<ViewportId>) {
        self.record(Call::DefaultViewport(viewport));
    }

    fn set_clipping_auto_adjust(&mut self, enabled: bool) {
        self.record(Call::Clipping(enabled));
    }

    fn set_device_style(&mut self, device: Option<DeviceStyleId>) {
        self.record(Call::Device(device));
    }

    fn describe(&self, out: &mut dyn fmt::Write, indent: Indent) -> fmt::Result {
        writeln!(out, "{indent}Recording {}", self.kind)
    }
}

struct Fixture {
    source: Rc<LocalEventSource>,
    journal: Journal,
    switch: StyleSwitch,
}

impl Fixture {
    fn new() -> Self {
        let journal: Journal = Rc::default();
        let source = Rc::new(LocalEventSource::new());
        let mut switch = StyleSwitch::new(RecordingStyle::factory(&journal));
        switch.set_event_source(Some(SourceHandle::new(&source)));
        journal.borrow_mut().clear();
        Self {
            source,
            journal,
            switch,
        }
    }

    fn handle(&self) -> SourceHandle {
        SourceHandle::new(&self.source)
    }

    fn type_char(&mut self, ch: char) -> Propagation {
        let switch = &mut self.switch;
        self.source
            .emit(&Notification::character(ch), |id, n| switch.deliver(id, n))
    }

    fn calls(&self) -> Vec<(StyleKind, Call)> {
        self.journal.borrow().clone()
    }

    fn clear(&self) {
        self.journal.borrow_mut().clear();
    }

    /// Style observers currently subscribed on the source.
    fn subscribed_styles(&self) -> Vec<StyleKind> {
        self.source
            .observers_of(NotificationKind::Pointer)
            .into_iter()
            .filter_map(|id| {
                StyleKind::ALL
                    .into_iter()
                    .find(|&kind| self.switch.style(kind).observer_id() == id)
            })
            .collect()
    }

    fn assert_only_active_attached(&self) {
        let active = self.switch.active_kind().expect("an active style");
        assert_eq!(self.switch.attached_styles(), vec![active]);
        assert_eq!(self.subscribed_styles(), vec![active]);
    }
}

#[test]
fn exactly_one_variant_attached_after_every_call() {
    let mut fx = Fixture::new();
    fx.assert_only_active_attached();

    let steps: Vec<Box<dyn Fn(&mut Fixture)>> = vec![
        Box::new(|fx: &mut Fixture| {
            fx.switch
                .select_mode(ManipulationTarget::Actor, InputScheme::Joystick)
        }),
        Box::new(|fx: &mut Fixture| fx.switch.select_multi_touch()),
        Box::new(|fx: &mut Fixture| {
            fx.type_char('t');
        }),
        Box::new(|fx: &mut Fixture| {
            fx.type_char('a');
        }),
        Box::new(|fx: &mut Fixture| {
            fx.type_char('M');
        }),
        Box::new(|fx: &mut Fixture| {
            fx.type_char('q');
        }),
        Box::new(|fx: &mut Fixture| {
            fx.type_char('C');
        }),
        Box::new(|fx: &mut Fixture| {
            fx.switch
                .select_mode(ManipulationTarget::Camera, InputScheme::Trackball)
        }),
        Box::new(|fx: &mut Fixture| {
            fx.switch.on_character_input('J' as u32);
        }),
    ];
    for step in steps {
        step(&mut fx);
        fx.assert_only_active_attached();
    }
}

#[test]
fn reselecting_the_same_mode_only_reattaches() {
    let mut fx = Fixture::new();
    fx.switch
        .select_mode(ManipulationTarget::Camera, InputScheme::Joystick);
    let subscriptions = fx.source.observers_of(NotificationKind::Pointer);
    fx.clear();

    fx.switch
        .select_mode(ManipulationTarget::Camera, InputScheme::Joystick);

    assert_eq!(
        fx.calls(),
        vec![
            (StyleKind::JoystickCamera, Call::Attach(Some(fx.handle()))),
            (StyleKind::JoystickCamera, Call::Device(None)),
        ]
    );
    assert_eq!(fx.source.observers_of(NotificationKind::Pointer), subscriptions);
}

#[test]
fn switching_detaches_old_before_attaching_new() {
    let mut fx = Fixture::new();
    fx.switch
        .select_mode(ManipulationTarget::Actor, InputScheme::Trackball);

    let calls = fx.calls();
    assert_eq!(calls[0], (StyleKind::JoystickCamera, Call::Attach(None)));
    assert_eq!(
        calls[1],
        (StyleKind::TrackballActor, Call::Attach(Some(fx.handle())))
    );
}

#[test]
fn multi_touch_overrides_then_yields() {
    let mut fx = Fixture::new();
    fx.switch
        .select_mode(ManipulationTarget::Actor, InputScheme::Joystick);

    assert_eq!(fx.type_char('m'), Propagation::Consumed);
    assert_eq!(fx.switch.active_kind(), Some(StyleKind::MultiTouchCamera));

    fx.switch
        .select_mode(ManipulationTarget::Actor, InputScheme::Trackball);
    assert_eq!(fx.switch.active_kind(), Some(StyleKind::TrackballActor));
    assert!(!fx.switch.mode().multi_touch);
}

#[test]
fn unmapped_codes_fall_through_unchanged() {
    let mut fx = Fixture::new();
    fx.switch
        .select_mode(ManipulationTarget::Actor, InputScheme::Trackball);
    let mode = fx.switch.mode();

    for ch in ['x', 'r', 'w', '3', ' ', 'é'] {
        assert_eq!(fx.type_char(ch), Propagation::Continue, "char {ch:?}");
        assert_eq!(fx.switch.mode(), mode);
        assert_eq!(fx.switch.active_kind(), Some(StyleKind::TrackballActor));
    }
    assert_eq!(fx.switch.on_character_input(0xFFFF_FFFF), Propagation::Continue);
    assert_eq!(fx.switch.active_kind(), Some(StyleKind::TrackballActor));
}

#[test]
fn every_mapped_code_is_consumed() {
    let mut fx = Fixture::new();
    for ch in ['j', 'J', 't', 'T', 'c', 'C', 'a', 'A', 'm', 'M'] {
        assert_eq!(fx.type_char(ch), Propagation::Consumed, "char {ch:?}");
    }
}

#[test]
fn clearing_the_source_detaches_without_dropping() {
    let mut fx = Fixture::new();
    fx.switch
        .select_mode(ManipulationTarget::Camera, InputScheme::Trackball);
    let style_id = fx.switch.style(StyleKind::TrackballCamera).observer_id();

    fx.switch.set_event_source(None);

    assert_eq!(fx.switch.active_kind(), Some(StyleKind::TrackballCamera));
    let active = fx.switch.active_style().expect("style still owned");
    assert!(active.event_source().is_none());
    assert_eq!(active.observer_id(), style_id);
    assert!(fx.switch.attached_styles().is_empty());
    assert_eq!(fx.source.subscription_count(), 0);
}

#[test]
fn setting_the_same_source_is_a_no_op() {
    let mut fx = Fixture::new();
    let handle = fx.handle();
    fx.switch.set_event_source(Some(handle));
    assert!(fx.calls().is_empty());
}

#[test]
fn replacing_the_source_moves_all_subscriptions() {
    let mut fx = Fixture::new();
    let other = Rc::new(LocalEventSource::new());
    fx.switch
        .set_event_source(Some(SourceHandle::new(&other)));

    assert_eq!(fx.source.subscription_count(), 0);
    assert!(other.is_observing(fx.switch.observer_id(), NotificationKind::Character));
    assert!(other.is_observing(
        fx.switch.observer_id(),
        NotificationKind::SourceDestroyed
    ));
    let active_id = fx.switch.active_style().unwrap().observer_id();
    assert_eq!(other.observers_of(NotificationKind::Pointer), vec![active_id]);
    assert_eq!(fx.switch.attached_styles(), vec![StyleKind::JoystickCamera]);
}

#[test]
fn source_teardown_detaches_switch_and_style() {
    let mut fx = Fixture::new();
    let switch = &mut fx.switch;
    fx.source.shutdown(|id, n| switch.deliver(id, n));

    assert!(fx.switch.event_source().is_none());
    assert!(fx.switch.attached_styles().is_empty());
    assert_eq!(fx.switch.active_kind(), Some(StyleKind::JoystickCamera));
}

#[test]
fn dropped_source_does_not_break_detach() {
    let journal: Journal = Rc::default();
    let mut switch = StyleSwitch::new(RecordingStyle::factory(&journal));
    {
        let source = Rc::new(LocalEventSource::new());
        switch.set_event_source(Some(SourceHandle::new(&source)));
    }
    switch.detach_source();
    assert!(switch.event_source().is_none());
    assert!(switch.attached_styles().is_empty());
}

#[test]
fn invalid_clipping_value_is_rejected() {
    let mut fx = Fixture::new();
    assert_eq!(
        fx.switch.set_clipping_auto_adjust_value(2),
        Err(SwitchError::InvalidFlagValue { value: 2 })
    );
    assert!(fx.switch.clipping_auto_adjust());
    assert!(fx.calls().is_empty());

    fx.switch.set_clipping_auto_adjust_value(0).unwrap();
    assert!(!fx.switch.clipping_auto_adjust());
    assert_eq!(fx.calls().len(), 5);
}

#[test]
fn unchanged_clipping_flag_is_not_broadcast() {
    let mut fx = Fixture::new();
    fx.switch.set_clipping_auto_adjust(false);
    fx.switch.set_clipping_auto_adjust(true);
    fx.clear();

    fx.switch.set_clipping_auto_adjust(true);
    fx.switch.set_clipping_auto_adjust_value(1).unwrap();
    assert!(fx.calls().is_empty());

    fx.switch.set_clipping_auto_adjust(false);
    let kinds: Vec<StyleKind> = fx.calls().into_iter().map(|(kind, _)| kind).collect();
    assert_eq!(kinds, StyleKind::ALL.to_vec());
}

#[test]
fn viewport_reaches_all_default_viewport_skips_multi_touch() {
    let mut fx = Fixture::new();
    fx.switch.set_viewport(Some(ViewportId(1)));
    let viewport_targets: Vec<StyleKind> = fx.calls().into_iter().map(|(k, _)| k).collect();
    assert_eq!(viewport_targets, StyleKind::ALL.to_vec());
    fx.clear();

    fx.switch.set_default_viewport(Some(ViewportId(2)));
    let calls = fx.calls();
    assert_eq!(calls.len(), 4);
    assert!(calls
        .iter()
        .all(|(kind, call)| !kind.is_multi_touch()
            && *call == Call::DefaultViewport(Some(ViewportId(2)))));
    assert_eq!(fx.switch.default_viewport(), Some(ViewportId(2)));
    assert_eq!(fx.switch.viewport(), Some(ViewportId(1)));
}

#[test]
fn device_style_is_pushed_on_resolution() {
    let mut fx = Fixture::new();
    fx.switch.set_device_style(Some(DeviceStyleId(4)));
    assert_eq!(
        fx.calls(),
        vec![(StyleKind::JoystickCamera, Call::Device(Some(DeviceStyleId(4))))]
    );
    fx.clear();

    fx.type_char('t');
    assert!(fx
        .calls()
        .contains(&(StyleKind::TrackballCamera, Call::Device(Some(DeviceStyleId(4))))));
}

#[test]
fn priority_orders_switch_against_other_observers() {
    let journal: Journal = Rc::default();
    let source = Rc::new(LocalEventSource::new());
    let early = ObserverId::next();
    source.add_observer(early, NotificationKind::Character, 0.5);

    let mut switch = StyleSwitch::new(RecordingStyle::factory(&journal));
    switch.set_priority(1.0);
    switch.set_event_source(Some(SourceHandle::new(&source)));

    assert_eq!(
        source.observers_of(NotificationKind::Character),
        vec![switch.observer_id(), early]
    );
}

#[test]
fn documented_scenario() {
    let mut fx = Fixture::new();

    fx.switch
        .select_mode(ManipulationTarget::Camera, InputScheme::Trackball);
    assert_eq!(fx.switch.active_kind(), Some(StyleKind::TrackballCamera));

    fx.type_char('j');
    assert_eq!(fx.switch.active_kind(), Some(StyleKind::JoystickCamera));

    fx.switch.select_multi_touch();
    assert_eq!(fx.switch.active_kind(), Some(StyleKind::MultiTouchCamera));

    fx.type_char('t');
    assert_eq!(fx.switch.active_kind(), Some(StyleKind::TrackballCamera));
    fx.assert_only_active_attached();
}
