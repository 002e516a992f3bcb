use std::{
    any::{Any, TypeId},
    cell::RefCell,
    collections::HashMap,
    rc::Rc,
};

use crate::nodes::Scope;

#[derive(Default, Debug, Clone)]
pub struct Contexts(pub(crate) Rc<RefCell<HashMap<(Scope, TypeId), Box<dyn Any>>>>);

impl Contexts {
    pub(crate) fn provide_context<T: Clone + Any + 'static>(&self, scope: Scope, x: T) {
        let mut contexts = self.0.borrow_mut();
        contexts.insert((scope, TypeId::of::<T>()), Box::new(x));
    }

    pub(crate) fn use_context_from_scope<T: Clone + Any + 'static>(&self, id: Scope) -> Option<T> {
        let contexts = self.0.borrow();
        contexts
            .get(&(id, TypeId::of::<T>()))
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    }

    pub(crate) fn dispose(&self, scope: Scope) {
        // Values are dropped after the borrow ends, their destructors may touch the runtime
        let removed: Vec<Box<dyn Any>> = {
            let mut contexts = self.0.borrow_mut();
            let keys: Vec<_> = contexts.keys().filter(|(s, _)| *s == scope).copied().collect();
            keys.into_iter().filter_map(|k| contexts.remove(&k)).collect()
        };
        drop(removed);
    }
}
