use api_state::{ApiList, ListOptions};
use payloads::Identified;
use serde::de::DeserializeOwned;
use std::ops::Deref;
use std::rc::Rc;
use yew::prelude::*;

use crate::get_api_client;

pub struct UseApiListHandle<T: Identified> {
    list: Rc<ApiList<T>>,
}

impl<T: Identified> Deref for UseApiListHandle<T> {
    type Target = ApiList<T>;

    fn deref(&self) -> &Self::Target {
        &self.list
    }
}

impl<T> UseApiListHandle<T>
where
    T: Identified + DeserializeOwned + Clone + 'static,
{
    pub fn refetch(&self) -> Callback<MouseEvent> {
        let list = self.list.clone();
        Callback::from(move |_| {
            let list = (*list).clone();
            yew::platform::spawn_local(async move {
                let _ = list.fetch_items().await;
            });
        })
    }

    pub fn delete(&self) -> Callback<T::Id> {
        let list = self.list.clone();
        Callback::from(move |id: T::Id| {
            let list = (*list).clone();
            yew::platform::spawn_local(async move {
                let _ = list.delete_item(id).await;
            });
        })
    }
}

/// CRUD list over `base_path`, bound to the component lifecycle.
#[hook]
pub fn use_api_list<T>(
    base_path: &'static str,
    options: ListOptions<T>,
) -> UseApiListHandle<T>
where
    T: Identified + DeserializeOwned + Clone + 'static,
{
    let list = use_memo(base_path, move |path| {
        ApiList::new(get_api_client(), *path, options)
    });
    let update = use_force_update();

    {
        let list = list.clone();
        use_effect_with(base_path, move |_| {
            let subscription = list.subscribe(move || update.force_update());
            if list.is_immediate() {
                let list = (*list).clone();
                yew::platform::spawn_local(async move {
                    let _ = list.mount().await;
                });
            }
            move || {
                drop(subscription);
                list.unmount();
            }
        });
    }

    UseApiListHandle { list }
}
