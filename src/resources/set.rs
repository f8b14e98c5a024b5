//! Client-side collection and single-entity state machines

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::auth::{Navigator, Route};
use crate::error::{Error, ErrorKind};
use crate::models::Keyed;
use crate::resources::ResourceApi;

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// A fetched collection with create/update/delete that patch local state
/// from the server response, or refetch when the response omits the entity.
///
/// Operations are not queued or deduplicated; concurrent calls race and the
/// last write to local state wins, as in the web client.
pub struct ResourceSet<T> {
    api: Arc<dyn ResourceApi>,
    plural_key: String,
    singular_key: String,
    navigator: Arc<dyn Navigator>,
    items: RwLock<Vec<T>>,
    is_loading: AtomicBool,
    error: RwLock<Option<String>>,
}

impl<T> ResourceSet<T>
where
    T: DeserializeOwned + Keyed + Clone + Send + Sync,
{
    pub fn new(
        api: Arc<dyn ResourceApi>,
        plural_key: &str,
        singular_key: &str,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            api,
            plural_key: plural_key.to_string(),
            singular_key: singular_key.to_string(),
            navigator,
            items: RwLock::new(Vec::new()),
            is_loading: AtomicBool::new(false),
            error: RwLock::new(None),
        }
    }

    /// Snapshot of the fetched items
    pub fn items(&self) -> Vec<T> {
        self.items.read().map(|i| i.clone()).unwrap_or_default()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading.load(Ordering::SeqCst)
    }

    pub fn error(&self) -> Option<String> {
        self.error.read().ok().and_then(|e| e.clone())
    }

    fn set_error(&self, message: Option<String>) {
        if let Ok(mut slot) = self.error.write() {
            *slot = message;
        }
    }

    fn redirect_on_auth_failure(&self, err: &Error) {
        if err.kind() == ErrorKind::Unauthorized {
            self.navigator.navigate(Route::Login);
        }
    }

    /// Fetch the collection, replacing local items on success.
    ///
    /// On failure the prior items are kept and `error` carries a generic
    /// per-resource message; the server's wording is not surfaced on this
    /// path. An auth failure additionally redirects to login.
    pub async fn refetch(&self) {
        self.is_loading.store(true, Ordering::SeqCst);
        match self.api.list().await {
            Ok(data) => {
                let value = data
                    .get(&self.plural_key)
                    .cloned()
                    .unwrap_or_else(|| Value::Array(Vec::new()));
                match serde_json::from_value::<Vec<T>>(value) {
                    Ok(list) => {
                        if let Ok(mut items) = self.items.write() {
                            *items = list;
                        }
                        self.set_error(None);
                    }
                    Err(_) => {
                        self.set_error(Some(format!("Failed to load {}", self.plural_key)));
                    }
                }
            }
            Err(err) => {
                self.set_error(Some(format!("Failed to load {}", self.plural_key)));
                self.redirect_on_auth_failure(&err);
            }
        }
        self.is_loading.store(false, Ordering::SeqCst);
    }

    /// Create an entity. When the response carries it under the singular key
    /// it is appended locally; otherwise exactly one refetch reconciles the
    /// collection. Errors are recorded in `error` and then propagated.
    pub async fn create_item(&self, data: &Value) -> Result<(), Error> {
        match self.api.create(data).await {
            Ok(response) => {
                match response
                    .get(&self.singular_key)
                    .filter(|v| !v.is_null())
                    .and_then(|v| serde_json::from_value::<T>(v.clone()).ok())
                {
                    Some(item) => {
                        if let Ok(mut items) = self.items.write() {
                            items.push(item);
                        }
                    }
                    None => self.refetch().await,
                }
                self.set_error(None);
                Ok(())
            }
            Err(err) => {
                self.set_error(Some(err.to_string()));
                self.redirect_on_auth_failure(&err);
                Err(err)
            }
        }
    }

    /// Update an entity, patching the local copy from the response or
    /// refetching when the response omits it
    pub async fn update_item(&self, id: &str, data: &Value) -> Result<(), Error> {
        match self.api.update(id, data).await {
            Ok(response) => {
                match response
                    .get(&self.singular_key)
                    .filter(|v| !v.is_null())
                    .and_then(|v| serde_json::from_value::<T>(v.clone()).ok())
                {
                    Some(updated) => {
                        if let Ok(mut items) = self.items.write() {
                            if let Some(slot) = items.iter_mut().find(|item| item.key() == id) {
                                *slot = updated;
                            }
                        }
                    }
                    None => self.refetch().await,
                }
                self.set_error(None);
                Ok(())
            }
            Err(err) => {
                self.set_error(Some(err.to_string()));
                self.redirect_on_auth_failure(&err);
                Err(err)
            }
        }
    }

    /// Delete an entity and drop the local copy
    pub async fn delete_item(&self, id: &str) -> Result<(), Error> {
        match self.api.delete(id).await {
            Ok(_) => {
                if let Ok(mut items) = self.items.write() {
                    items.retain(|item| item.key() != id);
                }
                self.set_error(None);
                Ok(())
            }
            Err(err) => {
                self.set_error(Some(err.to_string()));
                self.redirect_on_auth_failure(&err);
                Err(err)
            }
        }
    }
}

/// One entity fetched by id, with loading/error state
pub struct ResourceDetail<T> {
    api: Arc<dyn ResourceApi>,
    singular_key: String,
    navigator: Arc<dyn Navigator>,
    item: RwLock<Option<T>>,
    is_loading: AtomicBool,
    error: RwLock<Option<String>>,
}

impl<T> ResourceDetail<T>
where
    T: DeserializeOwned + Clone + Send + Sync,
{
    pub fn new(api: Arc<dyn ResourceApi>, singular_key: &str, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            api,
            singular_key: singular_key.to_string(),
            navigator,
            item: RwLock::new(None),
            is_loading: AtomicBool::new(false),
            error: RwLock::new(None),
        }
    }

    pub fn item(&self) -> Option<T> {
        self.item.read().ok().and_then(|i| i.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading.load(Ordering::SeqCst)
    }

    pub fn error(&self) -> Option<String> {
        self.error.read().ok().and_then(|e| e.clone())
    }

    fn set_error(&self, message: Option<String>) {
        if let Ok(mut slot) = self.error.write() {
            *slot = message;
        }
    }

    fn not_found_message(&self) -> String {
        format!("{} not found", capitalize(&self.singular_key))
    }

    /// Fetch the entity. The payload is read from the singular key with a
    /// fallback to the whole `data` value; when both are empty the error is
    /// a domain "not found" message.
    pub async fn fetch(&self, id: &str) {
        self.is_loading.store(true, Ordering::SeqCst);
        match self.api.get(id).await {
            Ok(data) => {
                let value = match data.get(&self.singular_key) {
                    Some(inner) if !inner.is_null() => inner.clone(),
                    _ => data,
                };
                if value.is_null() {
                    if let Ok(mut item) = self.item.write() {
                        *item = None;
                    }
                    self.set_error(Some(self.not_found_message()));
                } else {
                    match serde_json::from_value::<T>(value) {
                        Ok(parsed) => {
                            if let Ok(mut item) = self.item.write() {
                                *item = Some(parsed);
                            }
                            self.set_error(None);
                        }
                        Err(_) => self.set_error(Some(self.not_found_message())),
                    }
                }
            }
            Err(err) => {
                self.set_error(Some(err.to_string()));
                if err.kind() == ErrorKind::Unauthorized {
                    self.navigator.navigate(Route::Login);
                }
            }
        }
        self.is_loading.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::capitalize;

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("organization"), "Organization");
        assert_eq!(capitalize(""), "");
    }
}
