//! A collection endpoint kept in sync with the server through CRUD calls.

use crate::store::{Reducer, Store};
use payloads::{
    ApiClient, ClientError, ErrorDetails, Identified, Subscription,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::rc::Rc;

pub type ItemCallback<T> = Rc<dyn Fn(&T)>;
pub type IdCallback<I> = Rc<dyn Fn(I)>;
pub type ErrorCallback = Rc<dyn Fn(&ClientError, &ErrorDetails)>;

pub struct ListOptions<T: Identified> {
    pub immediate: bool,
    pub on_item_created: Option<ItemCallback<T>>,
    pub on_item_updated: Option<ItemCallback<T>>,
    pub on_item_deleted: Option<IdCallback<T::Id>>,
    pub on_error: Option<ErrorCallback>,
}

impl<T: Identified> Default for ListOptions<T> {
    fn default() -> Self {
        Self {
            immediate: true,
            on_item_created: None,
            on_item_updated: None,
            on_item_deleted: None,
            on_error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<ErrorDetails>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

pub enum ListAction<T: Identified> {
    FetchStarted,
    Fetched(Vec<T>),
    FetchFailed(ErrorDetails),
    Created(T),
    Updated { id: T::Id, item: T },
    Deleted(T::Id),
}

impl<T: Identified> Reducer for ListState<T> {
    type Action = ListAction<T>;

    fn reduce(&mut self, action: ListAction<T>) {
        match action {
            ListAction::FetchStarted => {
                self.loading = true;
                self.error = None;
            }
            ListAction::Fetched(items) => {
                self.loading = false;
                self.items = items;
            }
            ListAction::FetchFailed(details) => {
                self.loading = false;
                self.error = Some(details);
            }
            ListAction::Created(item) => self.items.push(item),
            ListAction::Updated { id, item } => {
                if let Some(slot) = self.items.iter_mut().find(|i| i.id() == id)
                {
                    *slot = item;
                }
            }
            ListAction::Deleted(id) => self.items.retain(|i| i.id() != id),
        }
    }
}

/// Items of one collection endpoint.
///
/// Local items change only after the server has confirmed the operation.
/// Only fetching touches `loading` and `error`; the other operations report
/// failures through `on_error` and their return value.
pub struct ApiList<T: Identified> {
    client: ApiClient,
    base_path: String,
    options: Rc<ListOptions<T>>,
    store: Rc<Store<ListState<T>>>,
}

impl<T: Identified> Clone for ApiList<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            base_path: self.base_path.clone(),
            options: self.options.clone(),
            store: self.store.clone(),
        }
    }
}

impl<T> ApiList<T>
where
    T: Identified + DeserializeOwned + Clone + 'static,
{
    pub fn new(
        client: ApiClient,
        base_path: impl Into<String>,
        options: ListOptions<T>,
    ) -> Self {
        Self {
            client,
            base_path: base_path.into(),
            options: Rc::new(options),
            store: Store::new(ListState::default()),
        }
    }

    fn item_path(&self, id: T::Id) -> String {
        format!("{}/{id}", self.base_path)
    }

    fn report(&self, error: &ClientError) -> ErrorDetails {
        let details = ErrorDetails::from(error);
        tracing::warn!(
            path = %self.base_path,
            error = %details.message,
            "list operation failed"
        );
        if self.store.is_mounted() {
            if let Some(on_error) = &self.options.on_error {
                on_error(error, &details);
            }
        }
        details
    }

    /// Load the whole collection. A success body that is not a sequence
    /// leaves the list empty.
    pub async fn fetch_items(&self) -> Result<Vec<T>, ClientError> {
        self.store.dispatch(ListAction::FetchStarted);

        let result = self
            .client
            .get::<Value>(&self.base_path)
            .await
            .and_then(|envelope| match envelope.into_inner() {
                data @ Value::Array(_) => {
                    serde_json::from_value::<Vec<T>>(data).map_err(Into::into)
                }
                _ => Ok(Vec::new()),
            });

        match result {
            Ok(items) => {
                self.store.dispatch(ListAction::Fetched(items.clone()));
                Ok(items)
            }
            Err(e) => {
                let details = self.report(&e);
                self.store.dispatch(ListAction::FetchFailed(details));
                Err(e)
            }
        }
    }

    pub async fn create_item<B>(&self, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
    {
        match self.client.post::<T, B>(&self.base_path, body).await {
            Ok(envelope) => {
                let item = envelope.into_inner();
                if self.store.dispatch(ListAction::Created(item.clone())) {
                    if let Some(callback) = &self.options.on_item_created {
                        callback(&item);
                    }
                }
                Ok(item)
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    /// Replace the item with the given id by the server's updated copy.
    pub async fn update_item<B>(
        &self,
        id: T::Id,
        body: &B,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
    {
        match self.client.put::<T, B>(&self.item_path(id), body).await {
            Ok(envelope) => {
                let item = envelope.into_inner();
                let updated = ListAction::Updated {
                    id,
                    item: item.clone(),
                };
                if self.store.dispatch(updated) {
                    if let Some(callback) = &self.options.on_item_updated {
                        callback(&item);
                    }
                }
                Ok(item)
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    pub async fn delete_item(&self, id: T::Id) -> Result<(), ClientError> {
        match self.client.delete::<Value>(&self.item_path(id)).await {
            Ok(_) => {
                if self.store.dispatch(ListAction::Deleted(id)) {
                    if let Some(callback) = &self.options.on_item_deleted {
                        callback(id);
                    }
                }
                Ok(())
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    /// Fetch a single item. The list itself is left alone.
    pub async fn get_item(&self, id: T::Id) -> Result<T, ClientError> {
        match self.client.get::<T>(&self.item_path(id)).await {
            Ok(envelope) => Ok(envelope.into_inner()),
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    /// Perform the initial fetch for hosts that mount lists themselves.
    pub async fn mount(&self) -> Result<(), ClientError> {
        if self.options.immediate {
            self.fetch_items().await?;
        }
        Ok(())
    }

    pub fn state(&self) -> ListState<T> {
        self.store.state().clone()
    }

    pub fn items(&self) -> Vec<T> {
        self.store.state().items.clone()
    }

    pub fn loading(&self) -> bool {
        self.store.state().loading
    }

    pub fn error(&self) -> Option<ErrorDetails> {
        self.store.state().error.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.store.state().items.is_empty()
    }

    pub fn count(&self) -> usize {
        self.store.state().items.len()
    }

    pub fn error_message(&self) -> Option<String> {
        self.store.state().error.as_ref().map(|e| e.message.clone())
    }

    pub fn is_immediate(&self) -> bool {
        self.options.immediate
    }

    pub fn unmount(&self) {
        self.store.unmount();
    }

    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        self.store.subscribe(listener)
    }
}
