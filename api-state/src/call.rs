//! A single API operation with loading, error and result tracking.

use crate::store::{Reducer, Store};
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use jiff::Timestamp;
use payloads::{ClientError, Envelope, ErrorDetails, Subscription};
use std::future::Future;
use std::rc::Rc;

type Operation<A, T> =
    Rc<dyn Fn(A) -> LocalBoxFuture<'static, Result<Envelope<T>, ClientError>>>;

pub type SuccessCallback<T> = Rc<dyn Fn(&Envelope<T>)>;
pub type ErrorCallback = Rc<dyn Fn(&ClientError, &ErrorDetails)>;

pub struct CallOptions<T> {
    /// Execute as soon as the host mounts the call.
    pub immediate: bool,
    /// Data shown before the first success, and restored by a reset.
    pub default_data: Option<T>,
    pub on_success: Option<SuccessCallback<T>>,
    /// Replaces the default error log when set.
    pub on_error: Option<ErrorCallback>,
}

impl<T> Default for CallOptions<T> {
    fn default() -> Self {
        Self {
            immediate: false,
            default_data: None,
            on_success: None,
            on_error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<ErrorDetails>,
    /// The most recent successful result with its message and timestamp.
    pub last_success: Option<Envelope<T>>,
    in_flight: usize,
    default_data: Option<T>,
}

#[derive(Debug)]
pub enum CallAction<T> {
    Started,
    Succeeded(Envelope<T>),
    Failed(ErrorDetails),
    Reset,
}

impl<T: Clone> Reducer for CallState<T> {
    type Action = CallAction<T>;

    fn reduce(&mut self, action: CallAction<T>) {
        match action {
            CallAction::Started => {
                self.in_flight += 1;
                self.loading = true;
                self.error = None;
            }
            CallAction::Succeeded(mut envelope) => {
                self.settle();
                envelope.timestamp.get_or_insert_with(Timestamp::now);
                self.data = Some(envelope.data.clone());
                self.error = None;
                self.last_success = Some(envelope);
            }
            CallAction::Failed(details) => {
                self.settle();
                self.error = Some(details);
            }
            CallAction::Reset => {
                self.data = self.default_data.clone();
                self.error = None;
                self.last_success = None;
            }
        }
    }
}

impl<T> CallState<T> {
    fn new(default_data: Option<T>) -> Self
    where
        T: Clone,
    {
        Self {
            data: default_data.clone(),
            loading: false,
            error: None,
            last_success: None,
            in_flight: 0,
            default_data,
        }
    }

    fn settle(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.loading = self.in_flight > 0;
    }
}

/// Runs one API operation on demand and tracks its outcome.
///
/// Overlapping executes are not coalesced: each resolution overwrites the
/// previous one, so the state reflects whichever request resolved last.
/// `loading` stays true until every request in flight has resolved.
pub struct ApiCall<A, T> {
    operation: Operation<A, T>,
    on_success: Option<SuccessCallback<T>>,
    on_error: Option<ErrorCallback>,
    immediate: bool,
    store: Rc<Store<CallState<T>>>,
}

impl<A, T> Clone for ApiCall<A, T> {
    fn clone(&self) -> Self {
        Self {
            operation: self.operation.clone(),
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
            immediate: self.immediate,
            store: self.store.clone(),
        }
    }
}

impl<A: 'static, T: Clone + 'static> ApiCall<A, T> {
    pub fn new<F, Fut>(operation: F, options: CallOptions<T>) -> Self
    where
        F: Fn(A) -> Fut + 'static,
        Fut: Future<Output = Result<Envelope<T>, ClientError>> + 'static,
    {
        Self {
            operation: Rc::new(move |args| operation(args).boxed_local()),
            on_success: options.on_success,
            on_error: options.on_error,
            immediate: options.immediate,
            store: Store::new(CallState::new(options.default_data)),
        }
    }

    /// Run the operation.
    ///
    /// Returns `Ok(None)` without touching state or callbacks when the call
    /// was unmounted before the operation started or before it resolved.
    pub async fn execute(&self, args: A) -> Result<Option<T>, ClientError> {
        if !self.store.dispatch(CallAction::Started) {
            return Ok(None);
        }

        let result = (self.operation)(args).await;
        if !self.store.is_mounted() {
            tracing::debug!("call resolved after unmount, discarding");
            return Ok(None);
        }

        match result {
            Ok(envelope) => {
                let data = envelope.data.clone();
                self.store.dispatch(CallAction::Succeeded(envelope.clone()));
                if let Some(on_success) = &self.on_success {
                    on_success(&envelope);
                }
                Ok(Some(data))
            }
            Err(e) => {
                let details = ErrorDetails::from(&e);
                self.store.dispatch(CallAction::Failed(details.clone()));
                match &self.on_error {
                    Some(on_error) => on_error(&e, &details),
                    None => {
                        tracing::error!(
                            error = %details.message,
                            "API call failed"
                        )
                    }
                }
                Err(e)
            }
        }
    }

    /// Perform the initial execute for hosts that mount calls themselves.
    pub async fn mount(&self, args: A) -> Result<Option<T>, ClientError> {
        if self.immediate {
            self.execute(args).await
        } else {
            Ok(None)
        }
    }

    /// Restore the default data and forget the last outcome.
    pub fn reset(&self) {
        self.store.dispatch(CallAction::Reset);
    }

    pub fn state(&self) -> CallState<T> {
        self.store.state().clone()
    }

    pub fn data(&self) -> Option<T> {
        self.store.state().data.clone()
    }

    pub fn loading(&self) -> bool {
        self.store.state().loading
    }

    pub fn error(&self) -> Option<ErrorDetails> {
        self.store.state().error.clone()
    }

    pub fn last_success(&self) -> Option<Envelope<T>> {
        self.store.state().last_success.clone()
    }

    pub fn is_success(&self) -> bool {
        let state = self.store.state();
        !state.loading && state.error.is_none() && state.data.is_some()
    }

    pub fn has_data(&self) -> bool {
        self.store.state().data.is_some()
    }

    pub fn error_message(&self) -> Option<String> {
        self.store.state().error.as_ref().map(|e| e.message.clone())
    }

    pub fn success_message(&self) -> Option<String> {
        self.store
            .state()
            .last_success
            .as_ref()
            .and_then(|s| s.message.clone())
    }

    pub fn is_immediate(&self) -> bool {
        self.immediate
    }

    pub fn is_mounted(&self) -> bool {
        self.store.is_mounted()
    }

    /// Stop all further state changes. In-flight executes resolve quietly.
    pub fn unmount(&self) {
        self.store.unmount();
    }

    /// Listen for state changes.
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        self.store.subscribe(listener)
    }
}
