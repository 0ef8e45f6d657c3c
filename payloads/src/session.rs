//! Credential storage and the session-expired notification.

use secrecy::{ExposeSecret, SecretBox};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Where the bearer token and the logged-in user's data are kept.
///
/// Both values are always written and cleared together.
pub trait CredentialStore {
    fn token(&self) -> Option<SecretBox<String>>;

    /// The stored user record, as JSON.
    fn user_data(&self) -> Option<String>;

    fn save(&self, token: &SecretBox<String>, user_data: &str);

    fn clear(&self);
}

/// Credentials held in memory for the lifetime of the process.
#[derive(Default)]
pub struct MemoryCredentials {
    token: RefCell<Option<SecretBox<String>>>,
    user_data: RefCell<Option<String>>,
}

impl MemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let credentials = Self::default();
        *credentials.token.borrow_mut() =
            Some(SecretBox::new(Box::new(token.into())));
        credentials
    }
}

impl CredentialStore for MemoryCredentials {
    fn token(&self) -> Option<SecretBox<String>> {
        self.token
            .borrow()
            .as_ref()
            .map(|token| copy_secret(token))
    }

    fn user_data(&self) -> Option<String> {
        self.user_data.borrow().clone()
    }

    fn save(&self, token: &SecretBox<String>, user_data: &str) {
        *self.token.borrow_mut() = Some(copy_secret(token));
        *self.user_data.borrow_mut() = Some(user_data.to_string());
    }

    fn clear(&self) {
        self.token.borrow_mut().take();
        self.user_data.borrow_mut().take();
    }
}

pub fn copy_secret(secret: &SecretBox<String>) -> SecretBox<String> {
    SecretBox::new(Box::new(secret.expose_secret().clone()))
}

type Listener = Rc<dyn Fn()>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// A list of parameterless listeners.
///
/// Cloning shares the list. Listeners stay registered for as long as the
/// [`Subscription`] returned by [`Observers::subscribe`] is alive.
#[derive(Clone, Default)]
pub struct Observers {
    registry: Rc<RefCell<Registry>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Rc::new(listener)));
        Subscription {
            registry: Rc::downgrade(&self.registry),
            id,
        }
    }

    /// Call every live listener once.
    pub fn notify(&self) {
        // Listeners may subscribe or unsubscribe while being called.
        let listeners: Vec<Listener> = self
            .registry
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener();
        }
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps a listener registered. Dropping it unsubscribes.
#[must_use = "the listener is removed when the subscription is dropped"]
pub struct Subscription {
    registry: Weak<RefCell<Registry>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .borrow_mut()
                .listeners
                .retain(|(id, _)| *id != self.id);
        }
    }
}

/// Fired when the backend rejects the stored credentials.
///
/// The client clears the credentials before notifying, so listeners only need
/// to move the user to the login view.
#[derive(Clone, Default)]
pub struct SessionEvents {
    observers: Observers,
}

impl SessionEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        self.observers.subscribe(listener)
    }

    pub fn notify_expired(&self) {
        tracing::info!(
            listeners = self.observers.len(),
            "session expired"
        );
        self.observers.notify();
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }
}
