//! Page-by-page navigation over a collection endpoint.

use crate::store::{Reducer, Store};
use payloads::responses::PageMeta;
use payloads::{ApiClient, ClientError, ErrorDetails, Subscription};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::rc::Rc;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// A fetched page, classified once when the response arrives.
#[derive(Debug, Clone, PartialEq)]
pub enum PagedResult<T> {
    /// `{content, pagination}` from a paginating endpoint.
    Paged { content: Vec<T>, meta: PageMeta },
    /// A plain sequence from an endpoint that does not paginate.
    Bare(Vec<T>),
}

impl<T: DeserializeOwned> PagedResult<T> {
    pub fn from_value(value: Value) -> Result<Self, ClientError> {
        match value {
            Value::Array(_) => Ok(Self::Bare(serde_json::from_value(value)?)),
            Value::Object(mut object)
                if object.contains_key("content")
                    && object.contains_key("pagination") =>
            {
                let content = object.remove("content").unwrap_or(Value::Null);
                let meta = object.remove("pagination").unwrap_or(Value::Null);
                Ok(Self::Paged {
                    content: serde_json::from_value(content)?,
                    meta: serde_json::from_value(meta)?,
                })
            }
            _ => Err(ClientError::UnexpectedFormat),
        }
    }
}

impl<T> PagedResult<T> {
    /// The items and their metadata. A bare sequence is one complete page.
    pub fn into_parts(self) -> (Vec<T>, PageMeta) {
        match self {
            Self::Paged { content, meta } => (content, meta),
            Self::Bare(items) => {
                let meta = PageMeta::single_page(items.len());
                (items, meta)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct PaginationOptions {
    pub page_size: u32,
    pub immediate: bool,
    /// Extra query parameters sent with every page request.
    pub params: Vec<(String, String)>,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            immediate: true,
            params: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaginationState<T> {
    pub data: Vec<T>,
    pub pagination: PageMeta,
    pub loading: bool,
    pub error: Option<ErrorDetails>,
}

#[derive(Debug)]
pub enum PaginationAction<T> {
    Started,
    Loaded { data: Vec<T>, meta: PageMeta },
    Failed(ErrorDetails),
}

impl<T> Reducer for PaginationState<T> {
    type Action = PaginationAction<T>;

    fn reduce(&mut self, action: PaginationAction<T>) {
        match action {
            PaginationAction::Started => {
                self.loading = true;
                self.error = None;
            }
            PaginationAction::Loaded { data, meta } => {
                self.loading = false;
                self.data = data;
                self.pagination = meta;
            }
            PaginationAction::Failed(details) => {
                self.loading = false;
                self.error = Some(details);
            }
        }
    }
}

/// Build the query for one page. Later entries replace earlier ones with the
/// same key, so `extra` beats `params`, which beat `page` and `size`.
pub fn page_query(
    page: u32,
    size: u32,
    params: &[(String, String)],
    extra: &[(String, String)],
) -> Vec<(String, String)> {
    let mut query: Vec<(String, String)> = Vec::new();
    let entries = [
        ("page".to_string(), page.to_string()),
        ("size".to_string(), size.to_string()),
    ];
    let overrides = params.iter().chain(extra.iter()).cloned();
    for (key, value) in entries.into_iter().chain(overrides) {
        match query.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => query.push((key, value)),
        }
    }
    query
}

/// One page of a collection at a time.
///
/// Navigation that would leave the valid page range is a no-op and sends no
/// request; those calls return `Ok(None)`.
pub struct ApiPagination<T> {
    client: ApiClient,
    base_path: String,
    options: Rc<PaginationOptions>,
    store: Rc<Store<PaginationState<T>>>,
}

impl<T> Clone for ApiPagination<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            base_path: self.base_path.clone(),
            options: self.options.clone(),
            store: self.store.clone(),
        }
    }
}

impl<T: DeserializeOwned + Clone + 'static> ApiPagination<T> {
    pub fn new(
        client: ApiClient,
        base_path: impl Into<String>,
        options: PaginationOptions,
    ) -> Self {
        let state = PaginationState {
            data: Vec::new(),
            pagination: PageMeta::initial(options.page_size),
            loading: false,
            error: None,
        };
        Self {
            client,
            base_path: base_path.into(),
            options: Rc::new(options),
            store: Store::new(state),
        }
    }

    /// Fetch page `page` (zero-based) with `size` items, sending `extra`
    /// query parameters on top of the configured ones.
    pub async fn fetch_page(
        &self,
        page: u32,
        size: u32,
        extra: &[(String, String)],
    ) -> Result<Vec<T>, ClientError> {
        self.store.dispatch(PaginationAction::Started);
        let query = page_query(page, size, &self.options.params, extra);

        let result = self
            .client
            .get_with_query::<Value, _>(&self.base_path, &query)
            .await
            .and_then(|envelope| {
                PagedResult::from_value(envelope.into_inner())
            });

        match result {
            Ok(paged) => {
                let (data, meta) = paged.into_parts();
                tracing::debug!(
                    path = %self.base_path,
                    page = meta.current_page,
                    items = data.len(),
                    "page loaded"
                );
                self.store.dispatch(PaginationAction::Loaded {
                    data: data.clone(),
                    meta,
                });
                Ok(data)
            }
            Err(e) => {
                let details = ErrorDetails::from(&e);
                tracing::warn!(
                    path = %self.base_path,
                    error = %details.message,
                    "page fetch failed"
                );
                self.store.dispatch(PaginationAction::Failed(details));
                Err(e)
            }
        }
    }

    async fn load(&self, page: u32) -> Result<Option<Vec<T>>, ClientError> {
        self.fetch_page(page, self.options.page_size, &[])
            .await
            .map(Some)
    }

    pub async fn next_page(&self) -> Result<Option<Vec<T>>, ClientError> {
        let meta = self.pagination();
        if meta.last {
            return Ok(None);
        }
        self.load(meta.current_page + 1).await
    }

    pub async fn previous_page(&self) -> Result<Option<Vec<T>>, ClientError> {
        let meta = self.pagination();
        if meta.first || meta.current_page == 0 {
            return Ok(None);
        }
        self.load(meta.current_page - 1).await
    }

    pub async fn go_to_page(
        &self,
        page: u32,
    ) -> Result<Option<Vec<T>>, ClientError> {
        if page >= self.pagination().total_pages {
            return Ok(None);
        }
        self.load(page).await
    }

    /// Refetch the current page.
    pub async fn refresh(&self) -> Result<Vec<T>, ClientError> {
        let page = self.pagination().current_page;
        self.fetch_page(page, self.options.page_size, &[]).await
    }

    /// Fetch the first page for hosts that mount pagination themselves.
    pub async fn mount(&self) -> Result<(), ClientError> {
        if self.options.immediate {
            self.fetch_page(0, self.options.page_size, &[]).await?;
        }
        Ok(())
    }

    pub fn state(&self) -> PaginationState<T> {
        self.store.state().clone()
    }

    pub fn data(&self) -> Vec<T> {
        self.store.state().data.clone()
    }

    pub fn pagination(&self) -> PageMeta {
        self.store.state().pagination.clone()
    }

    pub fn loading(&self) -> bool {
        self.store.state().loading
    }

    pub fn error(&self) -> Option<ErrorDetails> {
        self.store.state().error.clone()
    }

    pub fn has_data(&self) -> bool {
        !self.store.state().data.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.store.state().data.is_empty()
    }

    pub fn can_go_next(&self) -> bool {
        !self.store.state().pagination.last
    }

    pub fn can_go_previous(&self) -> bool {
        !self.store.state().pagination.first
    }

    pub fn error_message(&self) -> Option<String> {
        self.store.state().error.as_ref().map(|e| e.message.clone())
    }

    pub fn page_size(&self) -> u32 {
        self.options.page_size
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
