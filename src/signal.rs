use std::marker::PhantomData;

use crate::environment::with_runtime;
use crate::nodes::{IntoScope, Scope};

pub trait SignalRead<T: 'static>: IntoScope {
    fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        with_runtime(|r| r.nodes.with_value::<T, R>(self.into_scope(), |n| f(n)))
    }
    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        with_runtime(|r| r.track_dependant(self.into_scope()));
        self.with_untracked(f)
    }
}

pub trait SignalGet<T: Clone + 'static>: SignalRead<T> {
    fn get_untracked(&self) -> T {
        self.with_untracked(|v| v.clone())
            .unwrap_or_else(|| panic!("Node {:?} has been disposed", self.into_scope()))
    }
    fn get(&self) -> T {
        self.with(|v| v.clone())
            .unwrap_or_else(|| panic!("Node {:?} has been disposed", self.into_scope()))
    }
}

pub trait SignalUpdate<T: 'static>: IntoScope {
    fn update_silent(&self, f: impl FnOnce(&mut T)) {
        with_runtime(|r| r.nodes.with_value(self.into_scope(), f));
    }
    fn update(&self, f: impl FnOnce(&mut T)) {
        self.update_silent(f);
        with_runtime(|r| r.update_dependants(self.into_scope()));
    }
}

pub trait SignalSet<T: 'static>: SignalUpdate<T> {
    fn set_silent(&self, new: T) {
        self.update_silent(|v| *v = new);
    }
    fn set(&self, new: T) {
        self.update(|v| *v = new)
    }
}

macro_rules! impl_signal_read {
    ($iden:ident) => {
        impl<T> IntoScope for $iden<T> {
            fn into_scope(&self) -> Scope {
                self.0
            }
        }

        impl<T> Clone for $iden<T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> Copy for $iden<T> {}

        impl<T: std::fmt::Debug + 'static> std::fmt::Debug for $iden<T> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let mut s = f.debug_struct(stringify!($iden));
                s.field("scope", &self.0);
                match self.with_untracked(|v| format!("{:?}", v)) {
                    Some(v) => s.field("value", &v),
                    None => s.field("value", &"<disposed>"),
                };
                s.finish()
            }
        }

        impl<T: 'static> SignalRead<T> for $iden<T> {}
        impl<T: Clone + 'static> SignalGet<T> for $iden<T> {}
    };
}

/// Read only view of a value node, derived nodes are handed out as this
pub struct ReadSignal<T>(pub(crate) Scope, pub(crate) PhantomData<T>);
impl_signal_read!(ReadSignal);

/// Writable value node
pub struct Signal<T>(pub(crate) Scope, pub(crate) PhantomData<T>);
impl_signal_read!(Signal);
impl<T: 'static> SignalUpdate<T> for Signal<T> {}
impl<T: 'static> SignalSet<T> for Signal<T> {}

impl<T> Signal<T> {
    pub fn read_only(&self) -> ReadSignal<T> {
        ReadSignal(self.0, PhantomData)
    }
}
