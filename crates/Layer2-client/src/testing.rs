//! Test helpers shared by the unit tests

use crate::context::ClientContext;
use crate::registry::ClassMapping;
use httpmock::MockServer;
use std::time::Duration;
use unify_foundation::{UsernamePasswordAuth, DEFAULT_BASE_PATH, DEFAULT_TIMEOUT_SECS};

/// Context pointing at the default local server; never used to send requests
pub(crate) fn test_context(mapping: ClassMapping) -> ClientContext {
    context_for("http://localhost:9100", mapping)
}

/// Context pointing at a mock server
pub(crate) fn mock_context(server: &MockServer, mapping: ClassMapping) -> ClientContext {
    context_for(&server.base_url(), mapping)
}

fn context_for(origin: &str, mapping: ClassMapping) -> ClientContext {
    ClientContext::new(
        reqwest::Client::new(),
        origin,
        DEFAULT_BASE_PATH,
        UsernamePasswordAuth::new("username", "password"),
        mapping,
        Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    )
    .expect("valid test origin")
}
