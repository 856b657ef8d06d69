//! Search request and response wire types.

use crate::query::{FilterSet, PageNumber, SortSpec};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Soft constraint key sent with every library search.
pub const BADGE_ASSERTIONS: &str = "badgeAssertions";

/// A content search, built fresh for every issued search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Only filters with non-empty values.
    pub filters: FilterSet,
    pub limit: u32,
    pub page_number: PageNumber,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub soft_constraints: Map<String, Value>,
    #[serde(rename = "sort_by")]
    pub sort_by: Map<String, Value>,
}

impl SearchRequest {
    pub fn new(
        filters: &FilterSet,
        limit: u32,
        page_number: PageNumber,
        query: Option<String>,
        sort: Option<&SortSpec>,
    ) -> Self {
        let mut soft_constraints = Map::new();
        soft_constraints.insert(BADGE_ASSERTIONS.to_string(), Value::from(1));
        Self {
            filters: filters.non_empty(),
            limit,
            page_number,
            query,
            soft_constraints,
            sort_by: sort.map(SortSpec::to_json).unwrap_or_default(),
        }
    }

    /// Zero-based index of the first item on the requested page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number.get() - 1) * u64::from(self.limit)
    }

    /// Wrap into the body posted to the search endpoint.
    pub fn to_envelope(&self) -> SearchEnvelope {
        SearchEnvelope {
            request: SearchEnvelopeBody {
                filters: self.filters.clone(),
                limit: self.limit,
                offset: self.offset(),
                query: self.query.clone(),
                soft_constraints: self.soft_constraints.clone(),
                sort_by: self.sort_by.clone(),
            },
        }
    }
}

/// `{ "request": { ... } }` body of the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchEnvelope {
    pub request: SearchEnvelopeBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEnvelopeBody {
    pub filters: FilterSet,
    pub limit: u32,
    pub offset: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub soft_constraints: Map<String, Value>,
    #[serde(rename = "sort_by")]
    pub sort_by: Map<String, Value>,
}

/// Server response wrapper. Only `result` is read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerResponse {
    #[serde(default)]
    pub result: SearchResult,
}

impl ServerResponse {
    pub fn new(count: u64, content: Vec<ContentItem>) -> Self {
        Self {
            result: SearchResult { count, content },
        }
    }

    /// True when the backend reported matches and sent at least one item.
    pub fn has_results(&self) -> bool {
        self.result.count > 0 && !self.result.content.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub content: Vec<ContentItem>,
}

/// One raw search hit. The backend schema is open, so fields are read by
/// name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentItem(pub Map<String, Value>);

impl ContentItem {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Resolve a dotted path such as `"gradeLevel.0"` or `"me.rating"`.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.0.get(first)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn identifier(&self) -> Option<&str> {
        self.get_str("identifier")
    }

    pub fn content_type(&self) -> Option<&str> {
        self.get_str("contentType")
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.get_str("mimeType")
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for ContentItem {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{QueryParams, SearchQuery};
    use serde_json::json;

    fn item(value: Value) -> ContentItem {
        match value {
            Value::Object(map) => ContentItem(map),
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn request_envelope_matches_backend_shape() {
        let params = QueryParams::from_pairs([
            ("key", "fractions"),
            ("sort_by", "name"),
            ("sortType", "asc"),
            ("board", "CBSE"),
            ("medium", ""),
        ]);
        let query = SearchQuery::from_route(Some("3"), &params, PageNumber::FIRST);
        let request = SearchRequest::new(&query.filters, 20, query.page, query.text.clone(), query.sort.as_ref());

        let body = serde_json::to_value(request.to_envelope()).unwrap();
        assert_eq!(
            body,
            json!({
                "request": {
                    "filters": { "board": "CBSE" },
                    "limit": 20,
                    "offset": 40,
                    "query": "fractions",
                    "softConstraints": { "badgeAssertions": 1 },
                    "sort_by": { "name": "asc" }
                }
            })
        );
    }

    #[test]
    fn request_without_sort_sends_empty_object() {
        let request = SearchRequest::new(&FilterSet::default(), 10, PageNumber::FIRST, None, None);
        assert_eq!(request.offset(), 0);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["sort_by"], json!({}));
        assert_eq!(body["pageNumber"], json!(1));
        assert!(body.get("query").is_none());
    }

    #[test]
    fn response_tolerates_extra_fields_and_missing_content() {
        let raw = json!({
            "id": "api.content.search",
            "ver": "1.0",
            "params": { "status": "successful" },
            "responseCode": "OK",
            "result": { "count": 0 }
        });
        let response: ServerResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(response.result.count, 0);
        assert!(response.result.content.is_empty());
        assert!(!response.has_results());
    }

    #[test]
    fn count_without_content_is_not_a_result() {
        let response = ServerResponse::new(4, Vec::new());
        assert!(!response.has_results());
    }

    #[test]
    fn content_item_resolves_dotted_paths() {
        let hit = item(json!({
            "identifier": "do_1",
            "gradeLevel": ["Grade 1", "Grade 2"],
            "org": { "name": "NCERT" }
        }));
        assert_eq!(hit.identifier(), Some("do_1"));
        assert_eq!(hit.get_path("gradeLevel.1"), Some(&json!("Grade 2")));
        assert_eq!(hit.get_path("org.name"), Some(&json!("NCERT")));
        assert_eq!(hit.get_path("org.missing"), None);
        assert_eq!(hit.get_path("identifier.x"), None);
    }
}
