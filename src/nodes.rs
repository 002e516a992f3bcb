use slotmap::{new_key_type, SlotMap};
use std::{any::Any, cell::RefCell, collections::HashSet, rc::Rc};

new_key_type! {
    pub struct Scope;
}

pub trait IntoScope {
    fn into_scope(&self) -> Scope;
}

impl IntoScope for Scope {
    fn into_scope(&self) -> Scope {
        *self
    }
}

#[derive(Default, Debug)]
pub struct ReactiveNode {
    /// Any value
    pub(crate) value: Option<Box<dyn Any>>,
    /// Recomputes the value from the previous one, `None` means unchanged
    pub(crate) callback: Option<Callback>,
    /// Node of the parent scope
    pub(crate) parent: Option<Scope>,
    /// Nodes who depend on the value from this node
    pub(crate) dependants: HashSet<Scope>,
}

#[derive(Default, Debug, Clone)]
pub struct ReactiveNodes(pub(crate) Rc<RefCell<SlotMap<Scope, ReactiveNode>>>);

impl ReactiveNodes {
    pub(crate) fn insert(&self, node: ReactiveNode) -> Scope {
        self.0.borrow_mut().insert(node)
    }

    pub(crate) fn create(
        &self,
        parent: Scope,
        cb: Option<Callback>,
        value: Option<Box<dyn Any>>,
    ) -> Scope {
        self.insert(ReactiveNode {
            value,
            callback: cb,
            parent: Some(parent),
            dependants: HashSet::new(),
        })
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub(crate) fn with<R>(&self, id: Scope, f: impl FnOnce(&mut ReactiveNode) -> R) -> Option<R> {
        self.0.borrow_mut().get_mut(id).map(f)
    }

    pub(crate) fn get_children(&self, scope: Scope) -> Vec<Scope> {
        let nodes = self.0.borrow();
        nodes
            .iter()
            .filter(|(_, n)| n.parent == Some(scope))
            .map(|(id, _)| id)
            .collect()
    }

    /// Every descendant of `scope`, deepest first
    pub(crate) fn get_scope_children(&self, scope: Scope) -> Vec<Scope> {
        let mut all = vec![];
        for child in self.get_children(scope) {
            all.extend(self.get_scope_children(child));
            all.push(child)
        }
        all
    }

    pub(crate) fn get_parent(&self, id: Scope) -> Option<Scope> {
        self.0.borrow().get(id).and_then(|n| n.parent)
    }

    pub(crate) fn take_recompute(&self, scope: Scope) -> (Option<Callback>, Option<Box<dyn Any>>) {
        self.with(scope, |n| match n.callback.is_some() {
            true => (n.callback.take(), n.value.take()),
            false => (None, None),
        })
        .unwrap_or((None, None))
    }

    /// Update value if there is a new value and return dependants otherwise restore the previous
    pub(crate) fn update(
        &self,
        scope: Scope,
        cb: Callback,
        value: Option<Box<dyn Any>>,
        previous: Option<Box<dyn Any>>,
    ) -> Vec<Scope> {
        let mut stale = None;
        let dependants = self
            .with(scope, |n| {
                n.callback = Some(cb);
                match value {
                    Some(val) => {
                        n.value = Some(val);
                        stale = previous;
                        n.dependants.drain().collect::<Vec<_>>()
                    }
                    None => {
                        n.value = previous;
                        vec![]
                    }
                }
            })
            .unwrap_or_default();
        // Dropped outside the borrow, the old value may own runtime handles
        drop(stale);
        dependants
    }

    pub(crate) fn add_dependant(&self, scope: Scope, dependant: Scope) {
        if scope != dependant {
            self.with(scope, |n| n.dependants.insert(dependant));
        }
    }

    pub(crate) fn take_dependants(&self, scope: Scope) -> Vec<Scope> {
        self.with(scope, |n| n.dependants.drain().collect())
            .unwrap_or_default()
    }

    pub(crate) fn remove_scope_from_dependants(&self, scope: Scope) {
        let mut nodes = self.0.borrow_mut();
        for (_, node) in nodes.iter_mut() {
            node.dependants.remove(&scope);
        }
    }

    pub(crate) fn dispose(&self, id: Scope) {
        self.remove_scope_from_dependants(id);
        let removed = self.0.borrow_mut().remove(id);
        drop(removed);
    }

    pub(crate) fn with_value<T: 'static, R>(
        &self,
        scope: Scope,
        f: impl FnOnce(&mut T) -> R,
    ) -> Option<R> {
        let value = self.with(scope, |n| n.value.take()).flatten()?;
        match value.downcast::<T>() {
            Ok(mut value) => {
                let result = f(&mut value);
                self.with(scope, |n| n.value.replace(value));
                Some(result)
            }
            Err(value) => {
                self.with(scope, |n| n.value.replace(value));
                None
            }
        }
    }
}

pub(crate) struct Callback(pub(crate) Box<dyn Fn(Option<&Box<dyn Any>>) -> Option<Box<dyn Any>>>);
impl std::fmt::Debug for Callback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fn")
    }
}
