//! Authentication for the Unify API
//!
//! Unify expects `Authorization: BasicCreds <base64(username:password)>`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;

/// Authorization scheme understood by Unify
pub const AUTH_SCHEME: &str = "BasicCreds";

/// Username/password credentials
#[derive(Clone, PartialEq, Eq)]
pub struct UsernamePasswordAuth {
    username: String,
    password: String,
}

impl UsernamePasswordAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Value of the `Authorization` header
    pub fn header_value(&self) -> String {
        let creds = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("{} {}", AUTH_SCHEME, creds)
    }
}

impl fmt::Debug for UsernamePasswordAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsernamePasswordAuth")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}
