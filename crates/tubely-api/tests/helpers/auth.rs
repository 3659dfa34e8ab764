use std::time::Duration;
use tubely_api::auth::issue_access_token;
use uuid::Uuid;

use super::{TEST_JWT_ISSUER, TEST_JWT_SECRET};

/// A caller with a valid access token.
pub struct TestUser {
    pub user_id: Uuid,
    pub token: String,
}

impl TestUser {
    pub fn new() -> Self {
        let user_id = Uuid::new_v4();
        let token = issue_access_token(
            user_id,
            TEST_JWT_SECRET,
            TEST_JWT_ISSUER,
            Duration::from_secs(3600),
        )
        .expect("Failed to issue token");
        Self { user_id, token }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}
