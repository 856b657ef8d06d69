//! Routes of the search page and navigation between locations.

use crate::events::TuiEvent;
use libsearch_core::{PageNumber, QueryParams};
use tokio::sync::mpsc;
use url::{form_urlencoded, Url};

/// Path prefix of the library search page.
pub const LIBRARY_SEARCH_PATH: &str = "search/Library";

/// Locations are resolved against this base; only its path and query matter.
const LOCATION_BASE: &str = "http://localhost/";

#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("Invalid location '{location}': {reason}")]
    Encoding { location: String, reason: String },
    #[error("'{location}' is not a library search location")]
    NotSearchRoute { location: String },
    #[error("Navigation to '{url}' dropped: {reason}")]
    Dropped { url: String, reason: String },
}

/// Route and query parameters of one search page view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    pub page_param: Option<String>,
    pub query_params: QueryParams,
}

impl Route {
    pub fn library_search(page: PageNumber, query_params: QueryParams) -> Self {
        Self {
            page_param: Some(page.to_string()),
            query_params,
        }
    }

    /// `search/Library/{page}`, or the bare prefix without a page.
    pub fn path(&self) -> String {
        match &self.page_param {
            Some(page) => format!("{}/{}", LIBRARY_SEARCH_PATH, page),
            None => LIBRARY_SEARCH_PATH.to_string(),
        }
    }

    /// Absolute URL with the form-encoded query string.
    pub fn url(&self) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query_params.to_pairs())
            .finish();
        if query.is_empty() {
            format!("/{}", self.path())
        } else {
            format!("/{}?{}", self.path(), query)
        }
    }
}

/// Where a navigation leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Search(Route),
    Other(String),
}

impl Location {
    /// Parse a location such as `/search/Library/2?board=CBSE`.
    pub fn parse(location: &str) -> Result<Location, NavError> {
        let encoding = |e: url::ParseError| NavError::Encoding {
            location: location.to_string(),
            reason: e.to_string(),
        };
        let base = Url::parse(LOCATION_BASE).map_err(encoding)?;
        let url = base.join(location.trim()).map_err(encoding)?;
        if url.origin() != base.origin() {
            return Ok(Location::Other(location.to_string()));
        }

        let path = url.path().trim_start_matches('/');
        let Some(rest) = path.strip_prefix(LIBRARY_SEARCH_PATH) else {
            return Ok(Location::Other(location.to_string()));
        };
        if !rest.is_empty() && !rest.starts_with('/') {
            return Ok(Location::Other(location.to_string()));
        }
        let page_param = match rest.trim_matches('/') {
            "" => None,
            page if !page.contains('/') => Some(page.to_string()),
            _ => return Ok(Location::Other(location.to_string())),
        };

        let mut query_params = QueryParams::new();
        for (key, value) in url.query_pairs() {
            query_params.append(key, value);
        }

        Ok(Location::Search(Route {
            page_param,
            query_params,
        }))
    }

    /// Parse a location that must point at the search page.
    pub fn parse_search(location: &str) -> Result<Route, NavError> {
        match Self::parse(location)? {
            Location::Search(route) => Ok(route),
            Location::Other(_) => Err(NavError::NotSearchRoute {
                location: location.to_string(),
            }),
        }
    }

    pub fn url(&self) -> String {
        match self {
            Location::Search(route) => route.url(),
            Location::Other(path) => path.clone(),
        }
    }
}

/// Performs URL navigation on behalf of the page.
pub trait Navigator: Send + Sync {
    fn navigate(&self, location: Location) -> Result<(), NavError>;
}

/// Navigator that hands locations to the event loop.
#[derive(Clone)]
pub struct ChannelNavigator {
    sender: mpsc::Sender<TuiEvent>,
}

impl ChannelNavigator {
    pub fn new(sender: mpsc::Sender<TuiEvent>) -> Self {
        Self { sender }
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, location: Location) -> Result<(), NavError> {
        let url = location.url();
        self.sender
            .try_send(TuiEvent::Navigate(location))
            .map_err(|err| NavError::Dropped {
                url,
                reason: err.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_url_encodes_query() {
        let params = QueryParams::from_pairs([("key", "plant cells"), ("board", "CBSE"), ("board", "ICSE")]);
        let route = Route::library_search(PageNumber::new(2).unwrap(), params);
        assert_eq!(route.path(), "search/Library/2");
        assert_eq!(route.url(), "/search/Library/2?board=CBSE&board=ICSE&key=plant+cells");
    }

    #[test]
    fn parse_round_trips_search_location() {
        let params = QueryParams::from_pairs([("key", "a&b"), ("medium", "English")]);
        let route = Route::library_search(PageNumber::new(3).unwrap(), params);
        assert_eq!(Location::parse(&route.url()).unwrap(), Location::Search(route));
    }

    #[test]
    fn parse_without_page_or_query() {
        let parsed = Location::parse("search/Library").unwrap();
        assert_eq!(parsed, Location::Search(Route::default()));
        let parsed = Location::parse("/search/Library/?key=x+y").unwrap();
        match parsed {
            Location::Search(route) => {
                assert!(route.page_param.is_none());
                assert_eq!(
                    route.query_params.get("key"),
                    Some(&libsearch_core::QueryValue::from("x y"))
                );
            }
            other => panic!("unexpected location {other:?}"),
        }
    }

    #[test]
    fn other_paths_are_not_search_routes() {
        assert_eq!(
            Location::parse("/resources/play/content/do_1").unwrap(),
            Location::Other("/resources/play/content/do_1".to_string())
        );
        assert!(matches!(
            Location::parse("/search/Library/2/extra").unwrap(),
            Location::Other(_)
        ));
        assert!(matches!(
            Location::parse_search("/search/LibraryX"),
            Err(NavError::NotSearchRoute { .. })
        ));
    }

    #[tokio::test]
    async fn channel_navigator_forwards_locations() {
        let (tx, mut rx) = mpsc::channel(4);
        let navigator = ChannelNavigator::new(tx);
        navigator.navigate(Location::Other("/resources".to_string())).unwrap();
        match rx.recv().await {
            Some(TuiEvent::Navigate(Location::Other(path))) => assert_eq!(path, "/resources"),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn full_channel_reports_dropped_navigation() {
        let (tx, _rx) = mpsc::channel(1);
        tx.try_send(TuiEvent::Resize { width: 80, height: 24 }).unwrap();
        let navigator = ChannelNavigator::new(tx);
        let result = navigator.navigate(Location::Other("/resources".to_string()));
        assert!(matches!(result, Err(NavError::Dropped { url, .. }) if url == "/resources"));
    }

    #[test]
    fn fragment_and_semicolons_are_handled() {
        let route = Location::parse_search("/search/Library/4?key=a;b&board=CBSE#top").unwrap();
        assert_eq!(route.page_param.as_deref(), Some("4"));
        assert_eq!(
            route.query_params.get("key"),
            Some(&libsearch_core::QueryValue::from("a;b"))
        );
        assert_eq!(
            route.query_params.get("board"),
            Some(&libsearch_core::QueryValue::from("CBSE"))
        );
    }

    #[test]
    fn foreign_origin_is_not_a_search_route() {
        assert!(matches!(
            Location::parse("https://elsewhere.org/search/Library/2").unwrap(),
            Location::Other(_)
        ));
    }
}
