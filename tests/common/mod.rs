use std::sync::{Arc, Mutex};

use saaskit_rust::auth::{Navigator, Route};
use saaskit_rust::config::ClientOptions;
use saaskit_rust::token::MemoryTokenStore;
use saaskit_rust::SaasKit;

/// Navigator that records every redirect for assertions
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            routes: Mutex::new(Vec::new()),
        })
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

pub struct TestHarness {
    pub client: SaasKit,
    pub navigator: Arc<RecordingNavigator>,
    pub token_store: Arc<MemoryTokenStore>,
}

/// Build a client against a mock server, with a recording navigator and an
/// optionally pre-seeded token store
pub fn harness(server_uri: &str, token: Option<&str>) -> TestHarness {
    let navigator = RecordingNavigator::new();
    let token_store = Arc::new(match token {
        Some(token) => MemoryTokenStore::with_token(token),
        None => MemoryTokenStore::new(),
    });

    let options = ClientOptions::default()
        .with_token_store(token_store.clone())
        .with_navigator(navigator.clone());
    let client = SaasKit::new_with_options(server_uri, options);

    TestHarness {
        client,
        navigator,
        token_store,
    }
}
