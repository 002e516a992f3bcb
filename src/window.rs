use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use crossterm::event::Event;

use crate::{
    error::Result,
    listener::{EventTarget, Listener},
};

pub const RESIZE: &str = "resize";

/// Name listeners register under for a given terminal event.
pub fn event_name(event: &Event) -> &'static str {
    match event {
        Event::Resize(..) => RESIZE,
        Event::Key(_) => "key",
        Event::Mouse(_) => "mouse",
        Event::FocusGained => "focus",
        Event::FocusLost => "blur",
        Event::Paste(_) => "paste",
    }
}

/// Size of the surface breakpoints are measured against.
pub trait Viewport {
    fn inner_width(&self) -> u32;
    fn inner_height(&self) -> u32;
}

#[derive(Default)]
struct WindowState {
    size: Cell<(u32, u32)>,
    listeners: RefCell<Vec<(String, Listener)>>,
}

/// Host window: the current viewport size plus a listener registry keyed by event name.
///
/// Cloning is cheap and every clone refers to the same window.
#[derive(Clone, Default)]
pub struct Window(Rc<WindowState>);

impl Window {
    pub fn new(width: u32, height: u32) -> Self {
        let window = Self::default();
        window.0.size.set((width, height));
        window
    }

    pub fn from_terminal() -> Result<Self> {
        let (cols, rows) = crossterm::terminal::size()?;
        Ok(Self::new(cols.into(), rows.into()))
    }

    /// Applies `event` to the window, then calls the listeners registered for it.
    ///
    /// Listeners run in registration order on a snapshot of the registry, so a
    /// listener may attach or detach others without affecting this dispatch.
    pub fn dispatch(&self, event: &Event) {
        if let Event::Resize(cols, rows) = event {
            self.0.size.set(((*cols).into(), (*rows).into()));
        }

        let name = event_name(event);
        let listeners: Vec<Listener> = self
            .0
            .listeners
            .borrow()
            .iter()
            .filter(|(e, _)| e == name)
            .map(|(_, l)| l.clone())
            .collect();

        tracing::trace!(event = name, listeners = listeners.len(), "dispatch");
        for listener in listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.0
            .listeners
            .borrow()
            .iter()
            .filter(|(e, _)| e == event)
            .count()
    }
}

impl Viewport for Window {
    fn inner_width(&self) -> u32 {
        self.0.size.get().0
    }

    fn inner_height(&self) -> u32 {
        self.0.size.get().1
    }
}

impl EventTarget for Window {
    fn add_event_listener(&self, event: &str, listener: Listener) {
        let mut listeners = self.0.listeners.borrow_mut();
        let exists = listeners
            .iter()
            .any(|(e, l)| e == event && Rc::ptr_eq(l, &listener));
        if !exists {
            listeners.push((event.to_string(), listener));
        }
    }

    fn remove_event_listener(&self, event: &str, listener: &Listener) {
        let removed = {
            let mut listeners = self.0.listeners.borrow_mut();
            let index = listeners
                .iter()
                .position(|(e, l)| e == event && Rc::ptr_eq(l, listener));
            index.map(|i| listeners.remove(i))
        };
        drop(removed);
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("size", &self.0.size.get())
            .field("listeners", &self.0.listeners.borrow().len())
            .finish()
    }
}
