use api_state::{ApiPagination, PaginationOptions};
use serde::de::DeserializeOwned;
use std::ops::Deref;
use std::rc::Rc;
use yew::prelude::*;

use crate::get_api_client;

pub struct UseApiPaginationHandle<T> {
    pages: Rc<ApiPagination<T>>,
}

impl<T> Deref for UseApiPaginationHandle<T> {
    type Target = ApiPagination<T>;

    fn deref(&self) -> &Self::Target {
        &self.pages
    }
}

impl<T: DeserializeOwned + Clone + 'static> UseApiPaginationHandle<T> {
    pub fn on_next(&self) -> Callback<MouseEvent> {
        let pages = self.pages.clone();
        Callback::from(move |_| {
            let pages = (*pages).clone();
            yew::platform::spawn_local(async move {
                let _ = pages.next_page().await;
            });
        })
    }

    pub fn on_previous(&self) -> Callback<MouseEvent> {
        let pages = self.pages.clone();
        Callback::from(move |_| {
            let pages = (*pages).clone();
            yew::platform::spawn_local(async move {
                let _ = pages.previous_page().await;
            });
        })
    }

    pub fn on_go_to(&self) -> Callback<u32> {
        let pages = self.pages.clone();
        Callback::from(move |page: u32| {
            let pages = (*pages).clone();
            yew::platform::spawn_local(async move {
                let _ = pages.go_to_page(page).await;
            });
        })
    }

    pub fn on_refresh(&self) -> Callback<MouseEvent> {
        let pages = self.pages.clone();
        Callback::from(move |_| {
            let pages = (*pages).clone();
            yew::platform::spawn_local(async move {
                let _ = pages.refresh().await;
            });
        })
    }
}

/// Paged collection under `base_path`, bound to the component lifecycle.
#[hook]
pub fn use_api_pagination<T>(
    base_path: &'static str,
    options: PaginationOptions,
) -> UseApiPaginationHandle<T>
where
    T: DeserializeOwned + Clone + 'static,
{
    let pages = use_memo(base_path, move |path| {
        ApiPagination::new(get_api_client(), *path, options)
    });
    let update = use_force_update();

    {
        let pages = pages.clone();
        use_effect_with(base_path, move |_| {
            let subscription = pages.subscribe(move || update.force_update());
            if pages.is_immediate() {
                let pages = (*pages).clone();
                yew::platform::spawn_local(async move {
                    let _ = pages.mount().await;
                });
            }
            move || {
                drop(subscription);
                pages.unmount();
            }
        });
    }

    UseApiPaginationHandle { pages }
}
