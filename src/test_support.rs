//! Shared fixtures for HTTP-level tests.

use std::sync::Arc;

use axum_test::TestServer;

use crate::auth::jwt::sign_token;
use crate::config::Config;
use crate::routes;
use crate::state::AppState;
use crate::store::memory::MemoryStore;

pub struct TestApp {
    pub server: TestServer,
    /// Valid bearer token for user id 1.
    pub token: String,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = Config::for_tests();
        let token = sign_token(1, "tester@example.com", &config.jwt_secret, config.token_ttl_hours)
            .expect("sign test token");
        let state = AppState::new(Arc::new(MemoryStore::new()), config);
        let server = TestServer::try_new(routes::app(state)).expect("start test server");

        Self { server, token }
    }
}
