//! Interaction and impression telemetry records.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Page id reported by the library search page.
pub const LIBRARY_SEARCH_PAGE_ID: &str = "library-search";

/// Impression subtype set once the visit log is attached.
pub const PAGE_EXIT_SUBTYPE: &str = "pageexit";

/// Static descriptor of one interactive element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractEdata {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub pageid: String,
}

impl InteractEdata {
    pub fn click(id: &str, pageid: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: "click".to_string(),
            pageid: pageid.to_string(),
        }
    }
}

/// Interaction descriptors of the search page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractDescriptors {
    pub close: InteractEdata,
    pub card: InteractEdata,
    pub filter: InteractEdata,
    pub sort: InteractEdata,
}

impl InteractDescriptors {
    pub fn library_search() -> Self {
        Self {
            close: InteractEdata::click("search-close", LIBRARY_SEARCH_PAGE_ID),
            card: InteractEdata::click("content-card", LIBRARY_SEARCH_PAGE_ID),
            filter: InteractEdata::click("filter", LIBRARY_SEARCH_PAGE_ID),
            sort: InteractEdata::click("sort", LIBRARY_SEARCH_PAGE_ID),
        }
    }
}

/// Route-level telemetry settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryRouteData {
    pub env: String,
    pub kind: String,
    pub pageid: String,
    pub subtype: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpressionContext {
    pub env: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpressionEdata {
    #[serde(rename = "type")]
    pub kind: String,
    pub pageid: String,
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub visits: Vec<InviewEntry>,
}

/// Impression event describing what the user saw on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpressionEvent {
    pub context: ImpressionContext,
    pub edata: ImpressionEdata,
}

impl ImpressionEvent {
    pub fn new(route: &TelemetryRouteData, uri: impl Into<String>) -> Self {
        Self {
            context: ImpressionContext {
                env: route.env.clone(),
            },
            edata: ImpressionEdata {
                kind: route.kind.clone(),
                pageid: route.pageid.clone(),
                uri: uri.into(),
                subtype: route.subtype.clone(),
                visits: Vec::new(),
            },
        }
    }

    /// New snapshot carrying the visit log, marked as a page exit.
    pub fn with_page_exit(&self, log: &InviewLog) -> Self {
        let mut next = self.clone();
        next.edata.visits = log.entries().to_vec();
        next.edata.subtype = Some(PAGE_EXIT_SUBTYPE.to_string());
        next
    }
}

/// One card seen in the viewport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviewEntry {
    pub objid: String,
    pub objtype: String,
    pub index: usize,
}

/// Append-only visit log, deduplicated by `objid`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InviewLog {
    entries: Vec<InviewEntry>,
    seen: HashSet<String>,
}

impl InviewLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append unless the object was already logged. Returns true on append.
    pub fn record(&mut self, entry: InviewEntry) -> bool {
        if !self.seen.insert(entry.objid.clone()) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn entries(&self) -> &[InviewEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn route() -> TelemetryRouteData {
        TelemetryRouteData {
            env: "library".to_string(),
            kind: "search".to_string(),
            pageid: "library-search".to_string(),
            subtype: Some("paginate".to_string()),
        }
    }

    fn entry(id: &str, index: usize) -> InviewEntry {
        InviewEntry {
            objid: id.to_string(),
            objtype: "Resource".to_string(),
            index,
        }
    }

    #[test]
    fn log_deduplicates_by_object_id() {
        let mut log = InviewLog::new();
        assert!(log.record(entry("do_1", 0)));
        assert!(!log.record(entry("do_1", 3)));
        assert!(log.record(entry("do_2", 1)));
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].index, 0);
    }

    #[test]
    fn page_exit_snapshot_carries_visits() {
        let initial = ImpressionEvent::new(&route(), "/search/Library/1?key=math");
        let mut log = InviewLog::new();
        log.record(entry("do_1", 0));

        let exit = initial.with_page_exit(&log);
        assert_eq!(initial.edata.subtype.as_deref(), Some("paginate"));
        assert!(initial.edata.visits.is_empty());
        assert_eq!(exit.edata.subtype.as_deref(), Some(PAGE_EXIT_SUBTYPE));

        let json = serde_json::to_value(&exit).unwrap();
        assert_eq!(
            json,
            json!({
                "context": { "env": "library" },
                "edata": {
                    "type": "search",
                    "pageid": "library-search",
                    "uri": "/search/Library/1?key=math",
                    "subtype": "pageexit",
                    "visits": [{ "objid": "do_1", "objtype": "Resource", "index": 0 }]
                }
            })
        );
    }

    #[test]
    fn interact_descriptors_are_clicks_on_search_page() {
        let descriptors = InteractDescriptors::library_search();
        for edata in [&descriptors.close, &descriptors.card, &descriptors.filter, &descriptors.sort] {
            assert_eq!(edata.kind, "click");
            assert_eq!(edata.pageid, LIBRARY_SEARCH_PAGE_ID);
        }
        assert_eq!(descriptors.close.id, "search-close");
        assert_eq!(descriptors.card.id, "content-card");
    }
}
