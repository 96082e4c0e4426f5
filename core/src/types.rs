//! Request payloads and response shapes for the YMM service.
//!
//! # Design
//! Write payloads are typed so their JSON layout is fixed at compile time.
//! Response rows carry a variable number of `field_N` columns, so the typed
//! shapes keep those in a map next to the fixed keys.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// One positional YMM value as the service expects it on writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub field: String,
    pub field_val: String,
    pub tag_field: String,
    pub tag_val: String,
}

/// Turn positional values into `field_1..field_n` entries, in input order.
pub fn build_post_fields<S: AsRef<str>>(fields: &[S]) -> Vec<FieldEntry> {
    fields
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let ordinal = i + 1;
            FieldEntry {
                field: format!("field_{ordinal}"),
                field_val: value.as_ref().to_string(),
                tag_field: format!("field_{ordinal}_tag"),
                tag_val: value.as_ref().to_string(),
            }
        })
        .collect()
}

/// Comparison the service applies between the search text and a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchCondition {
    Equals,
    NotEquals,
    BeginsWith,
    EndsWith,
    #[default]
    Contains,
    DoesNotContains,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    /// Sent as-is, for conditions the service accepts but this enum lacks.
    Raw(String),
}

impl SearchCondition {
    pub fn as_str(&self) -> &str {
        match self {
            SearchCondition::Equals => "equals",
            SearchCondition::NotEquals => "not_equals",
            SearchCondition::BeginsWith => "begins_with",
            SearchCondition::EndsWith => "ends_with",
            SearchCondition::Contains => "contains",
            SearchCondition::DoesNotContains => "does_not_contains",
            SearchCondition::GreaterThan => "greater_than",
            SearchCondition::GreaterThanOrEqual => "greater_than_or_equal",
            SearchCondition::LessThan => "less_than",
            SearchCondition::LessThanOrEqual => "less_than_or_equal",
            SearchCondition::Raw(raw) => raw,
        }
    }
}

impl fmt::Display for SearchCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchCondition {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "equals" => SearchCondition::Equals,
            "not_equals" => SearchCondition::NotEquals,
            "begins_with" => SearchCondition::BeginsWith,
            "ends_with" => SearchCondition::EndsWith,
            "contains" => SearchCondition::Contains,
            "does_not_contains" => SearchCondition::DoesNotContains,
            "greater_than" => SearchCondition::GreaterThan,
            "greater_than_or_equal" => SearchCondition::GreaterThanOrEqual,
            "less_than" => SearchCondition::LessThan,
            "less_than_or_equal" => SearchCondition::LessThanOrEqual,
            other => SearchCondition::Raw(other.to_string()),
        })
    }
}

impl From<&str> for SearchCondition {
    fn from(s: &str) -> Self {
        match s.parse::<SearchCondition>() {
            Ok(cond) => cond,
            Err(never) => match never {},
        }
    }
}

impl From<String> for SearchCondition {
    fn from(s: String) -> Self {
        SearchCondition::from(s.as_str())
    }
}

impl Serialize for SearchCondition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SearchCondition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(SearchCondition::from(raw))
    }
}

/// Which YMM columns a search is restricted to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterFields {
    pub year: bool,
    pub make: bool,
    pub model: bool,
}

impl FilterFields {
    /// Selected column names, always in year, make, model order.
    pub fn field_names(&self) -> Vec<&'static str> {
        [
            (self.year, "field_1"),
            (self.make, "field_2"),
            (self.model, "field_3"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect()
    }
}

/// Parameters of a search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub txt: String,
    pub condition: SearchCondition,
    pub page: u32,
    pub filter: FilterFields,
}

impl SearchQuery {
    pub fn new(txt: impl Into<String>) -> Self {
        Self {
            txt: txt.into(),
            condition: SearchCondition::default(),
            page: 1,
            filter: FilterFields::default(),
        }
    }

    pub fn condition(mut self, condition: impl Into<SearchCondition>) -> Self {
        self.condition = condition.into();
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn filter_year(mut self, on: bool) -> Self {
        self.filter.year = on;
        self
    }

    pub fn filter_make(mut self, on: bool) -> Self {
        self.filter.make = on;
        self
    }

    pub fn filter_model(mut self, on: bool) -> Self {
        self.filter.model = on;
        self
    }
}

/// Body of a search POST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPayload {
    pub txt: String,
    pub search_cond: SearchCondition,
    pub page: u32,
    pub filter_fields: Vec<String>,
}

impl From<&SearchQuery> for SearchPayload {
    fn from(query: &SearchQuery) -> Self {
        Self {
            txt: query.txt.clone(),
            search_cond: query.condition.clone(),
            page: query.page,
            filter_fields: query
                .filter
                .field_names()
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Body of an add or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YmmPayload {
    pub ymm_fields: Vec<FieldEntry>,
    pub product_ids: Vec<String>,
}

/// Body of a bulk product-to-YMM assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignPayload {
    pub product_ids: Vec<String>,
    pub ymm_row_ids: Vec<String>,
}

/// Body of a delete. The id string may name several rows; its format is up
/// to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePayload {
    pub delete_id: String,
}

/// Summary row in a list or search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YmmRow {
    pub id: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl YmmRow {
    /// Value of `field_<n>` as a string, if present.
    pub fn field(&self, n: usize) -> Option<&str> {
        self.fields.get(&format!("field_{n}")).and_then(Value::as_str)
    }
}

/// List or search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YmmList {
    pub all_count: String,
    pub total: u64,
    #[serde(default)]
    pub list: Vec<YmmRow>,
}

/// Single row with its linked products, as returned by `action=edit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YmmRecord {
    pub id: String,
    pub shop_id: String,
    #[serde(default)]
    pub product_ids: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl YmmRecord {
    /// Linked product ids, split from the comma-separated wire string.
    pub fn product_ids(&self) -> Vec<&str> {
        self.product_ids
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .collect()
    }

    pub fn field(&self, n: usize) -> Option<&str> {
        self.fields.get(&format!("field_{n}")).and_then(Value::as_str)
    }

    pub fn tag(&self, n: usize) -> Option<&str> {
        self.fields
            .get(&format!("field_{n}_tag"))
            .and_then(Value::as_str)
    }
}

/// Interpretation of a search response by `YmmClient::search_ymm`.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResult {
    Empty,
    Single(String),
    Many(Vec<YmmRow>),
}
