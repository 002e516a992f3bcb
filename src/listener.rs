use std::{cell::Cell, rc::Rc};

use crossterm::event::Event;

use crate::{
    environment::{on_cleanup, with_runtime},
    error::{Error, Result},
};

/// Callback attached to an [`EventTarget`], identified by its allocation.
pub type Listener = Rc<dyn Fn(&Event)>;

/// Anything listeners can be attached to by event name.
///
/// Removal must match on reference identity ([`Rc::ptr_eq`]), not on the
/// event payload or the callback's behaviour.
pub trait EventTarget {
    fn add_event_listener(&self, event: &str, listener: Listener);
    fn remove_event_listener(&self, event: &str, listener: &Listener);
}

/// Attaches `callback` to `event` on `target` for the lifetime of the current scope.
///
/// The listener is removed exactly once, either when the scope is disposed or
/// when [`ListenerHandle::release`] is called, whichever comes first.
pub fn use_event_listener<T>(
    target: &T,
    event: &str,
    callback: impl Fn(&Event) + 'static,
) -> Result<ListenerHandle>
where
    T: EventTarget + Clone + 'static,
{
    if with_runtime(|r| r.current_scope()).is_none() {
        return Err(Error::NoActiveScope(event.to_string()));
    }

    let listener: Listener = Rc::new(callback);
    target.add_event_listener(event, listener.clone());
    tracing::debug!(event, "attached listener");

    let handle = ListenerHandle::new(target.clone(), event.to_string(), listener);
    let detach = handle.detach.clone();
    on_cleanup(move || {
        if let Some(detach) = detach.take() {
            detach()
        }
    });
    Ok(handle)
}

/// Binding returned by [`use_event_listener`].
pub struct ListenerHandle {
    detach: Rc<Cell<Option<Box<dyn FnOnce()>>>>,
    attached: Rc<Cell<bool>>,
}

impl ListenerHandle {
    fn new<T: EventTarget + 'static>(target: T, event: String, listener: Listener) -> Self {
        let attached = Rc::new(Cell::new(true));
        let attached_c = attached.clone();
        let detach: Box<dyn FnOnce()> = Box::new(move || {
            target.remove_event_listener(&event, &listener);
            attached_c.set(false);
            tracing::debug!(event = event.as_str(), "detached listener");
        });
        Self {
            detach: Rc::new(Cell::new(Some(detach))),
            attached,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }

    /// Detaches before the owning scope ends. Later calls and the scope cleanup do nothing.
    pub fn release(&self) {
        if let Some(detach) = self.detach.take() {
            detach()
        }
    }
}

impl std::fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("attached", &self.is_attached())
            .finish()
    }
}
