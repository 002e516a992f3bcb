use std::rc::Rc;

use crate::{
    breakpoints::{Breakpoints, Tier},
    environment::{create_selector, create_signal, use_context_option, with_runtime},
    error::{Error, Result},
    listener::{use_event_listener, EventTarget},
    signal::{ReadSignal, SignalGet, SignalRead, SignalSet},
    window::{Viewport, Window, RESIZE},
};

/// Live viewport width and the breakpoint flags derived from it.
///
/// Every flag is a selector over `width`, so dependants only rerun when the
/// flag actually flips.
#[derive(Debug, Clone)]
pub struct UseBreakpoints {
    pub width: ReadSignal<u32>,
    pub is_mobile: ReadSignal<bool>,
    pub is_tablet: ReadSignal<bool>,
    pub is_desktop: ReadSignal<bool>,
    breakpoints: Rc<Breakpoints>,
}

/// Tracks the [`Window`] provided to the current scope.
pub fn use_breakpoints(breakpoints: Breakpoints) -> Result<UseBreakpoints> {
    require_scope(RESIZE)?;
    let window = use_context_option::<Window>().ok_or(Error::MissingWindow)?;
    use_breakpoints_with(&window, breakpoints)
}

/// Tracks `target`, seeding the width from its current size.
///
/// One `resize` listener is bound to the current scope and removed with it.
pub fn use_breakpoints_with<T>(target: &T, breakpoints: Breakpoints) -> Result<UseBreakpoints>
where
    T: EventTarget + Viewport + Clone + 'static,
{
    require_scope(RESIZE)?;

    let breakpoints = Rc::new(breakpoints);
    let width = create_signal(target.inner_width());

    let viewport = target.clone();
    use_event_listener(target, RESIZE, move |_| {
        let next = viewport.inner_width();
        if width.with_untracked(|w| *w != next).unwrap_or(false) {
            tracing::trace!(width = next, "viewport resized");
            width.set(next);
        }
    })?;

    let width = width.read_only();
    let flag = |f: fn(&Breakpoints, u32) -> bool| {
        let breakpoints = breakpoints.clone();
        create_selector(move || f(&breakpoints, width.get()))
    };

    Ok(UseBreakpoints {
        width,
        is_mobile: flag(Breakpoints::is_mobile),
        is_tablet: flag(Breakpoints::is_tablet),
        is_desktop: flag(Breakpoints::is_desktop),
        breakpoints,
    })
}

/// Derived signals are owned by the current scope, so one must be active.
fn require_scope(what: &str) -> Result<()> {
    match with_runtime(|r| r.current_scope()) {
        Some(_) => Ok(()),
        None => Err(Error::NoActiveScope(what.to_string())),
    }
}

impl UseBreakpoints {
    pub fn breakpoints(&self) -> &Breakpoints {
        &self.breakpoints
    }

    /// `width >= breakpoints[name]`
    pub fn greater(&self, name: &str) -> Result<ReadSignal<bool>> {
        let threshold = self.breakpoints.get(name)?;
        require_scope("greater")?;
        let width = self.width;
        Ok(create_selector(move || width.get() >= threshold))
    }

    /// `width < breakpoints[name]`
    pub fn smaller(&self, name: &str) -> Result<ReadSignal<bool>> {
        let threshold = self.breakpoints.get(name)?;
        require_scope("smaller")?;
        let width = self.width;
        Ok(create_selector(move || width.get() < threshold))
    }

    /// `breakpoints[min] <= width < breakpoints[max]`, with `min < max` left to the caller
    pub fn between(&self, min: &str, max: &str) -> Result<ReadSignal<bool>> {
        let (min, max) = (self.breakpoints.get(min)?, self.breakpoints.get(max)?);
        require_scope("between")?;
        let width = self.width;
        Ok(create_selector(move || {
            let w = width.get();
            w >= min && w < max
        }))
    }

    /// Errors outside an active scope, like the other derived lookups.
    pub fn tier(&self) -> Result<ReadSignal<Tier>> {
        require_scope("tier")?;
        let breakpoints = self.breakpoints.clone();
        let width = self.width;
        Ok(create_selector(move || breakpoints.tier(width.get())))
    }
}
