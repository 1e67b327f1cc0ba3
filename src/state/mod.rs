//! Session-scoped selection state.
//!
//! Provider and model selection used to be natural candidates for free
//! globals; instead the app owns one [`SessionState`] and hands out a
//! cloneable [`SessionHandle`] to the router and the command handlers, so
//! every read and write goes through an explicit method on an explicit
//! value.

use crate::api::ApiProvider;
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug)]
pub struct SessionState {
    preferred_provider: ApiProvider,
    selected_model: String,
}

impl SessionState {
    pub fn new(preferred_provider: ApiProvider, selected_model: impl Into<String>) -> Self {
        Self {
            preferred_provider,
            selected_model: selected_model.into(),
        }
    }
}

/// Shared handle to the session state. Cheap to clone; safe to read from
/// spawned request tasks.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    inner: Arc<Mutex<SessionState>>,
}

impl SessionHandle {
    pub fn new(state: SessionState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    pub fn preferred_provider(&self) -> ApiProvider {
        self.lock().preferred_provider
    }

    pub fn set_preferred_provider(&self, provider: ApiProvider) {
        self.lock().preferred_provider = provider;
    }

    pub fn selected_model(&self) -> String {
        self.lock().selected_model.clone()
    }

    pub fn set_selected_model(&self, model: &str) {
        self.lock().selected_model = model.to_string();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
