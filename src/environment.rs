use std::any::{type_name, Any};
use std::ops::Deref;

use crate::{
    nodes::{ReactiveNode, Scope},
    runtime::Runtime,
    signal::*,
};

thread_local! {
    static RUNTIME: Runtime = Runtime::default();
}

pub(crate) fn with_runtime<R>(f: impl FnOnce(&Runtime) -> R) -> R {
    RUNTIME.with(f)
}

/// Disposes the scope when dropped, so unwinding out of a scope still releases it
struct ScopeGuard(Scope);

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        with_runtime(|r| r.dispose_scope(self.0))
    }
}

pub fn create_tracking_scope<R>(f: impl FnOnce() -> R) -> R {
    let scope = with_runtime(|r| r.nodes.insert(ReactiveNode::default()));
    let _guard = ScopeGuard(scope);
    with_runtime(|r| r.with_tracking_scope(scope, f))
}

/// Runs `f` in a child scope of the current one that lives until the
/// returned [`Mounted`] is unmounted or dropped.
///
/// Cleanups registered inside `f` (listeners, nested memos) run on unmount.
/// Panics when called outside a tracking scope.
pub fn mount<T>(f: impl FnOnce() -> T) -> Mounted<T> {
    let scope = with_runtime(|r| r.create_child_scope());
    let guard = ScopeGuard(scope);
    let value = with_runtime(|r| r.with_tracking_scope(scope, f));
    std::mem::forget(guard);
    Mounted {
        scope: Some(scope),
        value,
    }
}

pub struct Mounted<T> {
    scope: Option<Scope>,
    value: T,
}

impl<T> Mounted<T> {
    pub fn is_mounted(&self) -> bool {
        self.scope.is_some()
    }

    pub fn unmount(mut self) {
        self.dispose();
    }

    fn dispose(&mut self) {
        if let Some(scope) = self.scope.take() {
            with_runtime(|r| r.dispose_scope(scope));
        }
    }
}

impl<T> Deref for Mounted<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> Drop for Mounted<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Cleanup
pub fn on_cleanup(f: impl FnOnce() + 'static) {
    with_runtime(|r| r.add_cleanup(r.get_current_scope(), f))
}

/// Context
pub fn provide_context<T: Clone + Any + 'static>(x: T) {
    with_runtime(|r| r.context.provide_context(r.get_current_scope(), x))
}

pub fn use_context_option<T: Clone + Any + 'static>() -> Option<T> {
    with_runtime(|r| r.current_scope().and_then(|s| r.get_context(s)))
}

pub fn use_context<T: Clone + Any + 'static>() -> T {
    let p = with_runtime(|r| r.current_scope());
    use_context_option()
        .unwrap_or_else(|| panic!("Missing {} in parent scope {:?}", type_name::<T>(), p))
}

/// Signals
pub fn create_signal<T: 'static>(value: T) -> Signal<T> {
    let scope = with_runtime(|r| r.create_value_node(Box::new(value)));
    Signal(scope, std::marker::PhantomData)
}

pub fn create_memo<T: 'static>(f: impl Fn() -> T + 'static) -> ReadSignal<T> {
    let scope = with_runtime(|r| r.create_cb_node(move |_| Some(Box::new(f()))));
    ReadSignal(scope, std::marker::PhantomData)
}

pub fn create_selector<T: PartialEq + 'static>(f: impl Fn() -> T + 'static) -> ReadSignal<T> {
    let scope = with_runtime(|r| {
        r.create_cb_node(move |previous| {
            let previous = previous.and_then(|v| v.downcast_ref::<T>());
            let next = f();
            match Some(&next) != previous {
                true => Some(Box::new(next)),
                false => None,
            }
        })
    });
    ReadSignal(scope, std::marker::PhantomData)
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;

    fn test_signal_memo_dependancy() {
        let sig = create_signal("Foo");
        let m1 = create_memo(move || sig.get().to_uppercase());
        let m2 = create_memo(move || m1.get().to_lowercase());
        assert_eq!(sig.get(), "Foo");
        assert_eq!(m1.get(), "FOO");
        assert_eq!(m2.get(), "foo");
        sig.set("Bar");
        assert_eq!(sig.get(), "Bar");
        assert_eq!(m1.get(), "BAR");
        assert_eq!(m2.get(), "bar");
    }

    fn test_runtime_cleaned_up() {
        with_runtime(|r| {
            assert_eq!(r.nodes.len(), 0);
            assert_eq!(r.cleanup.borrow().len(), 0);
            assert!(r.context.0.borrow().is_empty());
        });
    }

    #[test]
    fn test_signal_dependancy_tracking() {
        create_tracking_scope(test_signal_memo_dependancy);
        test_runtime_cleaned_up()
    }

    #[test]
    fn test_signal_dependancy_nested() {
        create_tracking_scope(|| {
            create_memo(test_signal_memo_dependancy);
        });
        test_runtime_cleaned_up()
    }

    #[test]
    fn test_signal_dependancy_tracks_latest() {
        create_tracking_scope(|| {
            let count = Rc::new(Cell::new(0));
            let trigger = create_signal(0);
            let s1 = create_signal("foo");
            let s2 = create_signal("bar");

            let count_c = count.clone();
            let m = create_memo(move || {
                count_c.set(count_c.get() + 1);
                match trigger.get() % 2 == 0 {
                    true => s1.get(),
                    false => s2.get(),
                }
            });

            assert_eq!(m.get(), "foo");
            trigger.set(1);
            assert_eq!(m.get(), "bar");
            assert_eq!(count.get(), 2);
            s1.set("FOO");
            assert_eq!(
                count.get(),
                2,
                "Doesn't rerun due to no longer depending on s1"
            );
        });
        test_runtime_cleaned_up()
    }

    #[test]
    fn test_signal_selector() {
        create_tracking_scope(|| {
            let count = Rc::new(Cell::new(0));
            let source = create_signal((0, 0));
            let s1 = create_selector(move || source.get().0);

            let count_c = count.clone();
            let m = create_memo(move || {
                count_c.set(count_c.get() + 1);
                s1.get()
            });

            assert_eq!(count.get(), 1);
            source.set((0, 10));

            // Doesn't update because selector equals previous
            assert_eq!(m.get(), 0);
            assert_eq!(count.get(), 1);

            source.set((10, 10));
            assert_eq!(m.get(), 10);
            assert_eq!(count.get(), 2);
        })
    }

    #[test]
    fn test_cleanup() {
        create_tracking_scope(|| {
            let trig = create_signal(0);
            let count = create_signal(0);

            create_memo(move || match trig.get() {
                0 => create_memo(move || on_cleanup(move || count.update(|v| *v += 1))),
                _ => create_memo(move || {}),
            });
            trig.set(1);
            assert_eq!(count.get(), 1, "executed cleanup");
        })
    }

    #[test]
    fn test_root_cleanup_runs_on_scope_end() {
        let ran = Rc::new(Cell::new(false));
        let ran_c = ran.clone();
        create_tracking_scope(move || on_cleanup(move || ran_c.set(true)));
        assert!(ran.get());
        test_runtime_cleaned_up()
    }

    #[test]
    fn test_scope_released_on_panic() {
        let ran = Rc::new(Cell::new(false));
        let ran_c = ran.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            create_tracking_scope(move || {
                on_cleanup(move || ran_c.set(true));
                panic!("setup failed");
            })
        }));
        assert!(result.is_err());
        assert!(ran.get());
        assert!(with_runtime(|r| r.current_scope()).is_none());
        test_runtime_cleaned_up()
    }

    #[test]
    fn test_mount_unmount() {
        create_tracking_scope(|| {
            let count = create_signal(0);
            let mounted = mount(move || {
                on_cleanup(move || count.update(|v| *v += 1));
                create_signal(42)
            });
            let inner = *mounted;
            assert!(mounted.is_mounted());
            assert_eq!(inner.get(), 42);
            assert_eq!(count.get(), 0);

            mounted.unmount();
            assert_eq!(count.get(), 1);
            assert_eq!(inner.with_untracked(|v| *v), None, "disposed with its scope");
        });
        test_runtime_cleaned_up()
    }

    #[test]
    fn test_mount_drop_unmounts() {
        create_tracking_scope(|| {
            let count = create_signal(0);
            {
                let _mounted = mount(move || on_cleanup(move || count.update(|v| *v += 1)));
            }
            assert_eq!(count.get(), 1);
        })
    }

    #[test]
    fn test_context_inherited_by_children() {
        create_tracking_scope(|| {
            provide_context(7usize);
            let seen = mount(use_context::<usize>);
            assert_eq!(*seen, 7);
            assert_eq!(use_context_option::<String>(), None);
        });
        assert_eq!(use_context_option::<usize>(), None);
        test_runtime_cleaned_up()
    }
}
