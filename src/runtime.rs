use std::{
    any::Any,
    cell::{Cell, RefCell},
    rc::Rc,
};

use slotmap::SecondaryMap;

use crate::{
    context::Contexts,
    nodes::{Callback, ReactiveNodes, Scope},
};

type Cleanup = Box<dyn FnOnce()>;

#[derive(Default, Clone)]
pub struct Runtime {
    pub(crate) tracker: Rc<Cell<Option<Scope>>>,
    pub(crate) nodes: ReactiveNodes,
    pub(crate) cleanup: Rc<RefCell<SecondaryMap<Scope, Vec<Cleanup>>>>,
    pub(crate) context: Contexts,
}

impl Runtime {
    pub(crate) fn create_cb_node(
        &self,
        cb: impl Fn(Option<&Box<dyn Any>>) -> Option<Box<dyn Any>> + 'static,
    ) -> Scope {
        let scope = self.get_current_scope();
        let cb = Callback(Box::new(cb));
        let id = self.nodes.create(scope, None, None);
        let value = self.with_tracking_scope(id, || cb.0(None));
        self.nodes.with(id, |n| {
            n.callback = Some(cb);
            n.value = value
        });
        id
    }

    pub(crate) fn create_value_node(&self, value: Box<dyn Any>) -> Scope {
        let scope = self.get_current_scope();
        self.nodes.create(scope, None, Some(value))
    }

    pub(crate) fn create_child_scope(&self) -> Scope {
        let scope = self.get_current_scope();
        self.nodes.create(scope, None, None)
    }

    pub(crate) fn update_dependants(&self, node: Scope) {
        self.recompute(node);
    }

    /// Records the current scope as a dependant of `scope`, reads outside any scope are untracked
    pub(crate) fn track_dependant(&self, scope: Scope) {
        if let Some(current) = self.tracker.get() {
            self.nodes.add_dependant(scope, current);
        }
    }

    pub(crate) fn current_scope(&self) -> Option<Scope> {
        self.tracker.get()
    }

    pub(crate) fn get_current_scope(&self) -> Scope {
        self.tracker.get().expect("Missing scope")
    }

    pub(crate) fn with_tracking_scope<R>(&self, id: Scope, f: impl FnOnce() -> R) -> R {
        struct Restore<'a>(&'a Cell<Option<Scope>>, Option<Scope>);
        impl Drop for Restore<'_> {
            fn drop(&mut self) {
                self.0.set(self.1);
            }
        }

        let _restore = Restore(&self.tracker, self.tracker.replace(Some(id)));
        f()
    }

    pub(crate) fn recompute(&self, id: Scope) {
        let deps = self.recompute_node(id);
        for dep in deps {
            self.recompute(dep);
        }
    }

    fn recompute_node(&self, id: Scope) -> Vec<Scope> {
        if let (Some(callback), previous_value) = self.nodes.take_recompute(id) {
            self.run_cleanups(id);
            self.dispose_of_children(id);
            self.nodes.remove_scope_from_dependants(id);
            self.context.dispose(id);

            let new_value = self.with_tracking_scope(id, || callback.0(previous_value.as_ref()));
            return self.nodes.update(id, callback, new_value, previous_value);
        }
        self.nodes.take_dependants(id)
    }

    pub(crate) fn add_cleanup(&self, id: Scope, f: impl FnOnce() + 'static) {
        let mut cleanups = self.cleanup.borrow_mut();
        match cleanups.get_mut(id) {
            Some(v) => v.push(Box::new(f)),
            None => {
                cleanups.insert(id, vec![Box::new(f)]);
            }
        }
    }

    /// Runs the cleanups of every descendant of `id`, then those of `id` itself
    pub(crate) fn run_cleanups(&self, id: Scope) {
        let mut children = self.nodes.get_scope_children(id);
        children.push(id);
        for child in children {
            // Released before running so cleanups may register or read other cleanups
            let cleanups = self.cleanup.borrow_mut().remove(child).unwrap_or_default();
            for cleanup in cleanups {
                cleanup()
            }
        }
    }

    pub(crate) fn dispose_of_children(&self, scope: Scope) {
        for child in self.nodes.get_scope_children(scope) {
            self.context.dispose(child);
            self.nodes.dispose(child);
        }
    }

    pub(crate) fn dispose_scope(&self, scope: Scope) {
        tracing::debug!(?scope, "disposing scope");
        self.run_cleanups(scope);
        self.dispose_of_children(scope);
        self.context.dispose(scope);
        self.nodes.dispose(scope);
    }

    pub(crate) fn get_context<T: Clone + Any + 'static>(&self, id: Scope) -> Option<T> {
        match self.context.use_context_from_scope(id) {
            Some(v) => Some(v),
            None => match self.nodes.get_parent(id) {
                Some(id) => self.get_context(id),
                None => None,
            },
        }
    }
}
