//! Which page the client is attached to.

use std::fmt;
use std::str::FromStr;

/// Page context injected into the client at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageContext {
    /// Customer dashboard: refreshes its own application list when a report is attached.
    Customer,
    /// Admin dashboard: refreshes the admin application list on every notification.
    Admin,
    /// Any other page; no real-time connection at load time.
    #[default]
    Other,
}

impl PageContext {
    /// Derive the context from a page path by substring match.
    pub fn from_path(path: &str) -> Self {
        if path.contains("customer.html") {
            PageContext::Customer
        } else if path.contains("admin.html") {
            PageContext::Admin
        } else {
            PageContext::Other
        }
    }

    /// Whether this page opens a real-time connection when it loads.
    pub fn wants_realtime(self) -> bool {
        matches!(self, PageContext::Customer | PageContext::Admin)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PageContext::Customer => "customer",
            PageContext::Admin => "admin",
            PageContext::Other => "other",
        }
    }
}

impl fmt::Display for PageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(PageContext::Customer),
            "admin" => Ok(PageContext::Admin),
            "other" => Ok(PageContext::Other),
            other => Err(format!(
                "unknown page '{other}' (expected customer, admin or other)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(
            PageContext::from_path("/static/customer.html"),
            PageContext::Customer
        );
        assert_eq!(PageContext::from_path("/admin.html?tab=2"), PageContext::Admin);
        assert_eq!(PageContext::from_path("/index.html"), PageContext::Other);
        assert_eq!(PageContext::from_path(""), PageContext::Other);
    }

    #[test]
    fn test_wants_realtime() {
        assert!(PageContext::Customer.wants_realtime());
        assert!(PageContext::Admin.wants_realtime());
        assert!(!PageContext::Other.wants_realtime());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Admin".parse::<PageContext>(), Ok(PageContext::Admin));
        assert!("login".parse::<PageContext>().is_err());
    }
}
