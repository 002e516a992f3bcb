pub use crate::{
    breakpoints::{Breakpoints, TabletRange, Tier},
    environment::{
        create_memo, create_selector, create_signal, create_tracking_scope, mount, on_cleanup,
        provide_context, use_context, use_context_option,
    },
    host::{forward_events, terminal_events},
    listener::use_event_listener,
    signal::{ReadSignal, Signal, SignalGet, SignalRead, SignalSet, SignalUpdate},
    tracker::{use_breakpoints, use_breakpoints_with, UseBreakpoints},
    widget::TierBadge,
    window::{Viewport, Window},
};
