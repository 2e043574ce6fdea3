//! Path normalization for metric labels.
//!
//! Raw request paths are unbounded (`/users/1`, `/users/2`, ...), so they are
//! collapsed onto a fixed set of configured prefixes before they reach a label.
//! Anything that matches no prefix is reported as [`FALLBACK_ROUTE`].

use std::sync::Arc;

/// Label used for paths that match none of the known routes.
pub const FALLBACK_ROUTE: &str = "other";

#[derive(Debug, Clone)]
pub struct RouteMatcher {
    routes: Arc<[String]>,
}

impl RouteMatcher {
    pub fn new<I, S>(routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            routes: routes.into_iter().map(Into::into).collect(),
        }
    }

    /// Return the label for `path`.
    ///
    /// Routes are tried in configured order and the first prefix match wins,
    /// even when a later route would match a longer prefix.
    pub fn label<'a>(&'a self, path: &str) -> &'a str {
        self.routes
            .iter()
            .find(|route| path.starts_with(route.as_str()))
            .map(String::as_str)
            .unwrap_or(FALLBACK_ROUTE)
    }

    pub fn routes(&self) -> &[String] {
        &self.routes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_configured_prefix() {
        let matcher = RouteMatcher::new(["/users", "/orders"]);
        assert_eq!(matcher.label("/users/42"), "/users");
        assert_eq!(matcher.label("/orders"), "/orders");
    }

    #[test]
    fn unmatched_path_falls_back_to_other() {
        let matcher = RouteMatcher::new(["/users"]);
        assert_eq!(matcher.label("/unknown/path"), FALLBACK_ROUTE);
        assert_eq!(matcher.label("/"), FALLBACK_ROUTE);
    }

    #[test]
    fn first_configured_match_wins_over_longest() {
        let matcher = RouteMatcher::new(["/api", "/api/users"]);
        assert_eq!(matcher.label("/api/users/7"), "/api");

        let matcher = RouteMatcher::new(["/api/users", "/api"]);
        assert_eq!(matcher.label("/api/users/7"), "/api/users");
        assert_eq!(matcher.label("/api/orders"), "/api");
    }

    #[test]
    fn empty_route_list_labels_everything_other() {
        let matcher = RouteMatcher::new(Vec::<String>::new());
        assert!(matcher.routes().is_empty());
        assert_eq!(matcher.label("/users/1"), FALLBACK_ROUTE);
    }

    #[test]
    fn prefix_match_is_plain_string_prefix() {
        // no segment boundary check: "/users" also claims "/usersettings"
        let matcher = RouteMatcher::new(["/users"]);
        assert_eq!(matcher.label("/usersettings"), "/users");

        let matcher = RouteMatcher::new([""]);
        assert_eq!(matcher.label("/anything"), "");
    }
}
