use payloads::{Observers, Subscription};
use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

/// State that changes only through its own actions.
pub trait Reducer {
    type Action;

    fn reduce(&mut self, action: Self::Action);
}

/// Owns one machine's state, its mounted flag and its change listeners.
///
/// Once unmounted, dispatches are dropped and listeners are no longer told
/// about anything.
pub(crate) struct Store<S> {
    state: RefCell<S>,
    mounted: Cell<bool>,
    observers: Observers,
}

impl<S: Reducer> Store<S> {
    pub fn new(state: S) -> Rc<Self> {
        Rc::new(Self {
            state: RefCell::new(state),
            mounted: Cell::new(true),
            observers: Observers::new(),
        })
    }

    /// Apply an action and notify listeners. Returns false, changing nothing,
    /// when unmounted.
    pub fn dispatch(&self, action: S::Action) -> bool {
        if !self.mounted.get() {
            return false;
        }
        self.state.borrow_mut().reduce(action);
        self.observers.notify();
        true
    }

    pub fn state(&self) -> Ref<'_, S> {
        self.state.borrow()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    pub fn unmount(&self) {
        self.mounted.set(false);
    }

    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        self.observers.subscribe(listener)
    }
}
