//! Event sources, notifications and observer bookkeeping.
//!
//! An [`EventSource`] is owned by the application. Switches and styles only
//! keep a [`SourceHandle`] (a weak reference) and register observers on it
//! by [`ObserverId`]. Delivery is done by the source owner, which routes each
//! notification to the subscribed observer ids (see
//! [`LocalEventSource::emit`]).

use smallvec::SmallVec;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

static NEXT_OBSERVER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of something that subscribes to an event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

impl ObserverId {
    /// Allocate a fresh, process-unique id.
    pub fn next() -> Self {
        Self(NEXT_OBSERVER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Character,
    SourceDestroyed,
    Pointer,
    Gesture,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// A character key was typed. `code` is the raw character code.
    Character { code: u32 },
    /// The source is going away; observers must drop their handles.
    SourceDestroyed,
    Pointer { x: f64, y: f64 },
    Gesture { scale: f64 },
}

impl Notification {
    pub fn character(ch: char) -> Self {
        Self::Character { code: ch as u32 }
    }

    pub fn kind(&self) -> NotificationKind {
        match self {
            Notification::Character { .. } => NotificationKind::Character,
            Notification::SourceDestroyed => NotificationKind::SourceDestroyed,
            Notification::Pointer { .. } => NotificationKind::Pointer,
            Notification::Gesture { .. } => NotificationKind::Gesture,
        }
    }
}

/// Result of handling a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Propagation {
    #[default]
    Continue,
    /// Stop delivering this notification to lower priority observers.
    Consumed,
}

impl Propagation {
    pub fn is_consumed(self) -> bool {
        self == Propagation::Consumed
    }
}

/// Platform input dispatcher.
///
/// Methods take `&self`; implementations use interior mutability so that
/// observers can unsubscribe while a notification is being delivered.
pub trait EventSource {
    fn add_observer(&self, observer: ObserverId, kind: NotificationKind, priority: f32);

    /// Remove every subscription held by `observer`.
    fn remove_observer(&self, observer: ObserverId);
}

/// Non-owning reference to an event source.
#[derive(Clone)]
pub struct SourceHandle(Weak<dyn EventSource>);

impl SourceHandle {
    pub fn new<S: EventSource + 'static>(source: &Rc<S>) -> Self {
        let weak: Weak<S> = Rc::downgrade(source);
        Self(weak)
    }

    pub fn from_dyn(source: &Rc<dyn EventSource>) -> Self {
        Self(Rc::downgrade(source))
    }

    /// Upgrade to the source, `None` once it has been dropped.
    pub fn get(&self) -> Option<Rc<dyn EventSource>> {
        self.0.upgrade()
    }

    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }

    /// Identity comparison (address only).
    pub fn same_source(&self, other: &SourceHandle) -> bool {
        self.addr() == other.addr()
    }

    fn addr(&self) -> *const () {
        Weak::as_ptr(&self.0).cast::<()>()
    }
}

impl PartialEq for SourceHandle {
    fn eq(&self, other: &Self) -> bool {
        self.same_source(other)
    }
}

impl Eq for SourceHandle {}

impl fmt::Debug for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceHandle")
            .field("addr", &self.addr())
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// Compare two optional handles by identity.
pub fn same_source(a: Option<&SourceHandle>, b: Option<&SourceHandle>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.same_source(b),
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Subscription {
    observer: ObserverId,
    kind: NotificationKind,
    priority: f32,
}

/// In-process event source.
///
/// Subscriptions are kept ordered by descending priority; equal priorities
/// keep insertion order. A repeated `(observer, kind)` subscription replaces
/// the earlier one.
#[derive(Default)]
pub struct LocalEventSource {
    subscriptions: RefCell<SmallVec<[Subscription; 8]>>,
}

impl LocalEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_observing(&self, observer: ObserverId, kind: NotificationKind) -> bool {
        self.subscriptions
            .borrow()
            .iter()
            .any(|s| s.observer == observer && s.kind == kind)
    }

    /// Observers subscribed to `kind`, in delivery order.
    pub fn observers_of(&self, kind: NotificationKind) -> Vec<ObserverId> {
        self.subscriptions
            .borrow()
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| s.observer)
            .collect()
    }

    /// Distinct observers with at least one subscription.
    pub fn observer_ids(&self) -> Vec<ObserverId> {
        let mut ids: Vec<ObserverId> = Vec::new();
        for sub in self.subscriptions.borrow().iter() {
            if !ids.contains(&sub.observer) {
                ids.push(sub.observer);
            }
        }
        ids
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.borrow().len()
    }

    /// Deliver `notification` to its subscribers until one consumes it.
    ///
    /// The subscriber list is snapshotted first, so `deliver` may add or
    /// remove subscriptions on this source.
    pub fn emit<F>(&self, notification: &Notification, mut deliver: F) -> Propagation
    where
        F: FnMut(ObserverId, &Notification) -> Propagation,
    {
        let targets = self.observers_of(notification.kind());
        for observer in targets {
            if deliver(observer, notification).is_consumed() {
                trace!("{:?} consumed by observer {}", notification.kind(), observer);
                return Propagation::Consumed;
            }
        }
        Propagation::Continue
    }

    /// Announce teardown to all observers, then drop every subscription.
    pub fn shutdown<F>(&self, deliver: F)
    where
        F: FnMut(ObserverId, &Notification) -> Propagation,
    {
        self.emit(&Notification::SourceDestroyed, deliver);
        self.subscriptions.borrow_mut().clear();
    }
}

impl EventSource for LocalEventSource {
    fn add_observer(&self, observer: ObserverId, kind: NotificationKind, priority: f32) {
        let mut subs = self.subscriptions.borrow_mut();
        subs.retain(|s| !(s.observer == observer && s.kind == kind));
        let at = subs
            .iter()
            .position(|s| s.priority < priority)
            .unwrap_or(subs.len());
        subs.insert(
            at,
            Subscription {
                observer,
                kind,
                priority,
            },
        );
    }

    fn remove_observer(&self, observer: ObserverId) {
        self.subscriptions
            .borrow_mut()
            .retain(|s| s.observer != observer);
    }
}
