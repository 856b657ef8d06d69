//! Route and query-parameter model.
//!
//! Query parameters arrive as arbitrary string keys. A handful of keys are
//! reserved for the free-text query and sorting; everything else is a filter.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroU32;

/// A single query-string value. Repeated keys collapse into `Multi`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Single(String),
    Multi(Vec<String>),
}

impl QueryValue {
    /// True for an empty string or an empty list.
    pub fn is_empty(&self) -> bool {
        match self {
            QueryValue::Single(value) => value.is_empty(),
            QueryValue::Multi(values) => values.is_empty(),
        }
    }

    /// Flatten to a single string, joining list values with `,`.
    pub fn to_query_string(&self) -> String {
        match self {
            QueryValue::Single(value) => value.clone(),
            QueryValue::Multi(values) => values.join(","),
        }
    }

    /// Iterate over the raw values in order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            QueryValue::Single(value) => std::slice::from_ref(value),
            QueryValue::Multi(values) => values.as_slice(),
        };
        slice.iter().map(String::as_str)
    }

    fn push(&mut self, value: String) {
        match self {
            QueryValue::Single(existing) => {
                let first = std::mem::take(existing);
                *self = QueryValue::Multi(vec![first, value]);
            }
            QueryValue::Multi(values) => values.push(value),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Single(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Single(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        QueryValue::Multi(values)
    }
}

/// Query keys that carry search controls rather than filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedKey {
    /// Free-text query.
    Text,
    /// Field to sort on.
    SortBy,
    /// Sort direction.
    SortType,
}

impl ReservedKey {
    pub const ALL: [ReservedKey; 3] = [ReservedKey::Text, ReservedKey::SortBy, ReservedKey::SortType];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservedKey::Text => "key",
            ReservedKey::SortBy => "sort_by",
            ReservedKey::SortType => "sortType",
        }
    }

    pub fn is_reserved(key: &str) -> bool {
        Self::ALL.iter().any(|reserved| reserved.as_str() == key)
    }
}

/// Ordered query parameters of the current route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams {
    entries: BTreeMap<String, QueryValue>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(key, value)` pairs; repeated keys accumulate.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params = Self::new();
        for (key, value) in pairs {
            params.append(key, value);
        }
        params
    }

    /// Parse `key=value` strings, as given on a command line.
    pub fn parse_pairs<I, S>(pairs: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut params = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, value) = pair
                .split_once('=')
                .filter(|(key, _)| !key.trim().is_empty())
                .ok_or_else(|| CoreError::InvalidQueryPair {
                    pair: pair.to_string(),
                })?;
            params.append(key.trim(), value);
        }
        Ok(params)
    }

    /// Append a value, turning the entry into a list on repeats.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        match self.entries.entry(key.into()) {
            Entry::Occupied(mut entry) => entry.get_mut().push(value),
            Entry::Vacant(entry) => {
                entry.insert(QueryValue::Single(value));
            }
        }
    }

    /// Replace the value stored under `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Expand into flat `(key, value)` pairs, one per list element.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .flat_map(|(key, value)| value.values().map(move |v| (key.clone(), v.to_string())))
            .collect()
    }
}

/// Filters derived from query parameters with the reserved keys removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    entries: BTreeMap<String, QueryValue>,
}

impl FilterSet {
    /// Every non-reserved query parameter becomes a filter.
    pub fn from_query(params: &QueryParams) -> Self {
        let entries = params
            .iter()
            .filter(|(key, _)| !ReservedKey::is_reserved(key))
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();
        Self { entries }
    }

    /// Build from arbitrary entries. Reserved keys are still dropped.
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, QueryValue)>,
        K: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value))
            .filter(|(key, _)| !ReservedKey::is_reserved(key))
            .collect();
        Self { entries }
    }

    /// The view sent to the backend: only entries with a non-empty value.
    pub fn non_empty(&self) -> FilterSet {
        let entries = self
            .entries
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        FilterSet { entries }
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

/// Sort field and direction, present only when both are supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: String,
}

impl SortSpec {
    /// `{ <field>: <direction> }` as expected by the backend.
    pub fn to_json(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        map.insert(
            self.field.clone(),
            serde_json::Value::String(self.direction.clone()),
        );
        map
    }
}

/// Page number of the result list. Always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageNumber(NonZeroU32);

impl PageNumber {
    pub const FIRST: PageNumber = PageNumber(NonZeroU32::MIN);

    pub fn new(page: u32) -> Option<Self> {
        NonZeroU32::new(page).map(Self)
    }

    pub fn get(&self) -> u32 {
        self.0.get()
    }

    pub fn parse(value: &str) -> CoreResult<Self> {
        value
            .trim()
            .parse::<u32>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| CoreError::InvalidPageNumber {
                value: value.to_string(),
            })
    }

    /// Page from the route segment, or `current` when the segment is
    /// absent or unusable.
    pub fn from_route(param: Option<&str>, current: PageNumber) -> Self {
        param
            .and_then(|value| Self::parse(value).ok())
            .unwrap_or(current)
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything one route emission contributes to a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub page: PageNumber,
    pub query_params: QueryParams,
    pub filters: FilterSet,
    pub text: Option<String>,
    pub sort: Option<SortSpec>,
}

impl SearchQuery {
    /// Derive the search inputs from route and query parameters.
    ///
    /// The sort direction is flattened to a string when a sort field is
    /// also present.
    pub fn from_route(page_param: Option<&str>, query_params: &QueryParams, current: PageNumber) -> Self {
        let page = PageNumber::from_route(page_param, current);
        let mut params = query_params.clone();

        let sort_field = params.get(ReservedKey::SortBy.as_str()).cloned();
        let sort_type = params.get(ReservedKey::SortType.as_str()).cloned();
        let sort = match (sort_field, sort_type) {
            (Some(field), Some(direction)) => {
                let direction = direction.to_query_string();
                params.set(ReservedKey::SortType.as_str(), direction.clone());
                Some(SortSpec {
                    field: field.to_query_string(),
                    direction,
                })
            }
            _ => None,
        };

        let text = params
            .get(ReservedKey::Text.as_str())
            .map(QueryValue::to_query_string);
        let filters = FilterSet::from_query(&params);

        Self {
            page,
            query_params: params,
            filters,
            text,
            sort,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_keys_become_lists() {
        let params = QueryParams::from_pairs([("board", "CBSE"), ("board", "NCERT"), ("key", "math")]);
        assert_eq!(
            params.get("board"),
            Some(&QueryValue::Multi(vec!["CBSE".to_string(), "NCERT".to_string()]))
        );
        assert_eq!(params.get("key"), Some(&QueryValue::from("math")));
    }

    #[test]
    fn parse_pairs_rejects_missing_separator() {
        let err = QueryParams::parse_pairs(["board"]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidQueryPair { .. }));
        assert!(QueryParams::parse_pairs(["=x"]).is_err());
    }

    #[test]
    fn reserved_keys_are_removed_from_filters() {
        let params = QueryParams::from_pairs([
            ("key", "fractions"),
            ("sort_by", "name"),
            ("sortType", "asc"),
            ("gradeLevel", "Grade 5"),
        ]);
        let query = SearchQuery::from_route(Some("2"), &params, PageNumber::FIRST);
        assert_eq!(query.page.get(), 2);
        assert_eq!(query.text.as_deref(), Some("fractions"));
        assert_eq!(query.filters.len(), 1);
        assert!(query.filters.contains_key("gradeLevel"));
        assert_eq!(
            query.sort,
            Some(SortSpec {
                field: "name".to_string(),
                direction: "asc".to_string()
            })
        );
    }

    #[test]
    fn sort_direction_is_flattened_to_string() {
        let params = QueryParams::from_pairs([
            ("sort_by", "lastUpdatedOn"),
            ("sortType", "desc"),
            ("sortType", "asc"),
        ]);
        let query = SearchQuery::from_route(None, &params, PageNumber::FIRST);
        assert_eq!(query.sort.map(|s| s.direction), Some("desc,asc".to_string()));
        assert_eq!(
            query.query_params.get("sortType"),
            Some(&QueryValue::from("desc,asc"))
        );
    }

    #[test]
    fn sort_requires_field_and_direction() {
        let params = QueryParams::from_pairs([("sortType", "desc")]);
        let query = SearchQuery::from_route(None, &params, PageNumber::FIRST);
        assert!(query.sort.is_none());
        assert!(query.filters.is_empty());
    }

    #[test]
    fn missing_or_bad_page_keeps_current() {
        let current = PageNumber::new(4).unwrap();
        let params = QueryParams::new();
        assert_eq!(SearchQuery::from_route(None, &params, current).page, current);
        assert_eq!(SearchQuery::from_route(Some("0"), &params, current).page, current);
        assert_eq!(SearchQuery::from_route(Some("abc"), &params, current).page, current);
        assert_eq!(SearchQuery::from_route(Some("7"), &params, current).page.get(), 7);
    }

    #[test]
    fn non_empty_drops_blank_values() {
        let filters = FilterSet::from_entries([
            ("board", QueryValue::from("")),
            ("medium", QueryValue::Multi(vec![])),
            ("subject", QueryValue::from("Science")),
        ]);
        let sent = filters.non_empty();
        assert_eq!(sent.len(), 1);
        assert!(sent.contains_key("subject"));
    }

    #[test]
    fn filters_serialize_as_plain_object() {
        let filters = FilterSet::from_entries([
            ("board", QueryValue::Multi(vec!["CBSE".into(), "ICSE".into()])),
            ("subject", QueryValue::from("Science")),
        ]);
        let json = serde_json::to_value(&filters).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "board": ["CBSE", "ICSE"], "subject": "Science" })
        );
    }
}
