//! Fixed, enum-indexed storage for the five style variants.

use crate::mode::StyleKind;
use crate::source::ObserverId;
use crate::style::InteractorStyle;
use strum::EnumCount;

pub struct StyleRegistry {
    styles: [Box<dyn InteractorStyle>; StyleKind::COUNT],
}

impl StyleRegistry {
    /// Build one style per variant. `factory` is called once for each
    /// [`StyleKind`], in registry order.
    pub fn new<F>(mut factory: F) -> Self
    where
        F: FnMut(StyleKind) -> Box<dyn InteractorStyle>,
    {
        Self {
            styles: std::array::from_fn(|i| factory(StyleKind::ALL[i])),
        }
    }

    pub fn get(&self, kind: StyleKind) -> &dyn InteractorStyle {
        self.styles[kind.index()].as_ref()
    }

    pub fn get_mut(&mut self, kind: StyleKind) -> &mut dyn InteractorStyle {
        self.styles[kind.index()].as_mut()
    }

    /// Apply `f` to every variant accepted by `filter`.
    pub fn for_each_where<P, F>(&mut self, filter: P, mut f: F)
    where
        P: Fn(StyleKind) -> bool,
        F: FnMut(&mut dyn InteractorStyle),
    {
        for kind in StyleKind::ALL {
            if filter(kind) {
                f(self.styles[kind.index()].as_mut());
            }
        }
    }

    pub fn for_each(&mut self, f: impl FnMut(&mut dyn InteractorStyle)) {
        self.for_each_where(|_| true, f);
    }

    /// Variant whose style subscribes under `observer`.
    pub fn kind_of(&self, observer: ObserverId) -> Option<StyleKind> {
        StyleKind::ALL
            .into_iter()
            .find(|kind| self.styles[kind.index()].observer_id() == observer)
    }

    /// Variants currently holding an event source.
    pub fn attached(&self) -> Vec<StyleKind> {
        StyleKind::ALL
            .into_iter()
            .filter(|kind| self.styles[kind.index()].event_source().is_some())
            .collect()
    }
}
