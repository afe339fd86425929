//! Route lookup and target URL construction.
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Prefix routes are ordered longest-first, ties keep declaration order
//! - The catch-all is stored apart from the prefix list, so `resolve` is total

use crate::config::UpstreamsConfig;
use crate::routing::label::{UpstreamLabel, UpstreamLabels};
use crate::routing::matcher::PathMatcher;

/// Prefix bound to the locations origin.
pub const LOCATIONS_PREFIX: &str = "/locations";

/// A compiled route.
#[derive(Debug, Clone)]
pub struct Route {
    pub matcher: PathMatcher,
    /// Upstream origin; empty means the route is declared but unbound.
    pub upstream_origin: String,
    pub label: UpstreamLabel,
}

impl Route {
    pub fn new(
        matcher: PathMatcher,
        upstream_origin: impl Into<String>,
        labels: &UpstreamLabels,
    ) -> Self {
        let upstream_origin = upstream_origin.into();
        let label = labels.label_for(&upstream_origin);
        Self {
            matcher,
            upstream_origin,
            label,
        }
    }

    /// Whether an upstream origin is bound to this route.
    pub fn has_upstream(&self) -> bool {
        !self.upstream_origin.is_empty()
    }

    /// Outbound URL for a request path and raw query on this route.
    pub fn target_url(&self, path: &str, query: Option<&str>) -> String {
        target_url(&self.upstream_origin, path, query)
    }
}

/// Join an origin, a path and a raw query string.
///
/// One trailing slash is stripped from the origin, the path is forced to
/// start with `/`, and a non-empty query is appended after a single `?`.
pub fn target_url(origin: &str, path: &str, query: Option<&str>) -> String {
    let origin = origin.strip_suffix('/').unwrap_or(origin);
    let mut url = String::with_capacity(origin.len() + path.len() + 2);
    url.push_str(origin);
    if !path.starts_with('/') {
        url.push('/');
    }
    url.push_str(path);
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(query);
    }
    url
}

/// Ordered, immutable route table.
#[derive(Debug, Clone)]
pub struct RouteTable {
    prefixes: Vec<Route>,
    fallback: Route,
}

impl RouteTable {
    /// Build a table from prefix bindings and the catch-all origin.
    pub fn new<I, P, O>(
        prefixes: I,
        default_origin: impl Into<String>,
        labels: &UpstreamLabels,
    ) -> Self
    where
        I: IntoIterator<Item = (P, O)>,
        P: Into<String>,
        O: Into<String>,
    {
        let mut prefixes: Vec<Route> = prefixes
            .into_iter()
            .map(|(prefix, origin)| Route::new(PathMatcher::prefix(prefix), origin, labels))
            .collect();
        // Stable sort: equal-length prefixes keep declaration order.
        prefixes.sort_by(|a, b| b.matcher.specificity().cmp(&a.matcher.specificity()));

        Self {
            prefixes,
            fallback: Route::new(PathMatcher::CatchAll, default_origin, labels),
        }
    }

    /// Compile the table from upstream configuration.
    pub fn from_config(config: &UpstreamsConfig) -> Self {
        let labels = UpstreamLabels::new(&config.locations_base_url, &config.legacy_base_url);
        let locations = (
            LOCATIONS_PREFIX.to_string(),
            config.locations_base_url.clone(),
        );
        let prefixes = std::iter::once(locations).chain(
            config
                .routes
                .iter()
                .map(|r| (r.path_prefix.clone(), r.base_url.clone())),
        );

        let table = Self::new(prefixes, config.legacy_base_url.clone(), &labels);
        for route in table.routes() {
            tracing::info!(
                prefix = %route.matcher.as_str(),
                upstream = %route.label,
                origin = %route.upstream_origin,
                bound = route.has_upstream(),
                "Route compiled"
            );
        }
        table
    }

    /// Find the route for a path. Always succeeds.
    pub fn resolve(&self, path: &str) -> &Route {
        self.prefixes
            .iter()
            .find(|route| route.matcher.matches(path))
            .unwrap_or(&self.fallback)
    }

    /// All routes in evaluation order, catch-all last.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.prefixes.iter().chain(std::iter::once(&self.fallback))
    }
}
