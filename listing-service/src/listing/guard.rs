//! Access guard
//!
//! A presence check on two session cookies. The guard never inspects cookie
//! contents: it is a coarse gate in front of the list endpoints, and real
//! authorization (signature and claim verification) must happen upstream.

use std::collections::HashMap;

use crate::config::AuthConfig;

/// The two carriers a request may present
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCarriers {
    /// Primary session cookie value
    pub primary: Option<String>,
    /// Administrative session cookie value
    pub admin: Option<String>,
}

impl SessionCarriers {
    /// Pick the configured carriers out of a request's cookies
    pub fn from_cookies(cookies: &HashMap<String, String>, names: &AuthConfig) -> Self {
        Self {
            primary: cookies.get(&names.primary_cookie).cloned(),
            admin: cookies.get(&names.admin_cookie).cloned(),
        }
    }

    /// True when at least one carrier is present and non-blank
    ///
    /// # Example
    ///
    /// ```rust
    /// use listing_service::listing::SessionCarriers;
    ///
    /// let admin_only = SessionCarriers { primary: None, admin: Some("a1".into()) };
    /// assert!(admin_only.is_authorized());
    ///
    /// let blank = SessionCarriers { primary: Some("".into()), admin: None };
    /// assert!(!blank.is_authorized());
    /// ```
    pub fn is_authorized(&self) -> bool {
        is_present(self.primary.as_deref()) || is_present(self.admin.as_deref())
    }
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}
