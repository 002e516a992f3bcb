pub mod breakpoints;
mod context;
pub mod environment;
pub mod error;
pub mod host;
pub mod listener;
pub mod nodes;
pub mod prelude;
mod runtime;
pub mod signal;
pub mod tracker;
pub mod widget;
pub mod window;

pub use breakpoints::{Breakpoints, TabletRange, Tier};
pub use environment::{
    create_memo, create_selector, create_signal, create_tracking_scope, mount, on_cleanup,
    provide_context, use_context, use_context_option, Mounted,
};
pub use error::{Error, Result};
pub use host::{forward_events, terminal_events};
pub use listener::{use_event_listener, EventTarget, Listener, ListenerHandle};
pub use signal::{ReadSignal, Signal, SignalGet, SignalRead, SignalSet, SignalUpdate};
pub use tracker::{use_breakpoints, use_breakpoints_with, UseBreakpoints};
pub use widget::TierBadge;
pub use window::{Viewport, Window, RESIZE};
