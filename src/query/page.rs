//! List Pages
//!
//! The canonical list response is `{ data: [...], totalCount, totalPages }`.
//! Some controllers still wrap it one level deeper
//! (`{ data: { data, totalCount, totalPages } }`); that shape is accepted as
//! a compatibility shim and logged so it can be retired.

use serde::Deserialize;
use serde_json::Value;

use crate::api::ResourceKind;
use crate::error::{ApiError, ApiResult};
use crate::models::Resource;

/// One page of rows, untyped, as cached
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListPage {
    pub data: Vec<Value>,
    pub total_count: u64,
    pub total_pages: u32,
}

/// Which envelope a response used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeShape {
    Canonical,
    LegacyNested,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CanonicalEnvelope {
    data: Vec<Value>,
    total_count: u64,
    total_pages: u32,
}

#[derive(Deserialize)]
struct NestedEnvelope {
    data: CanonicalEnvelope,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListEnvelope {
    Canonical(CanonicalEnvelope),
    LegacyNested(NestedEnvelope),
}

impl ListPage {
    /// Parse a list response body, reporting which envelope it used
    pub fn parse(body: &str) -> ApiResult<(Self, EnvelopeShape)> {
        let envelope: ListEnvelope = serde_json::from_str(body)
            .map_err(|_| ApiError::Decode("list response matches neither envelope shape".to_string()))?;
        let (inner, shape) = match envelope {
            ListEnvelope::Canonical(e) => (e, EnvelopeShape::Canonical),
            ListEnvelope::LegacyNested(e) => (e.data, EnvelopeShape::LegacyNested),
        };
        Ok((
            Self {
                data: inner.data,
                total_count: inner.total_count,
                total_pages: inner.total_pages,
            },
            shape,
        ))
    }

    pub fn from_body(body: &str, resource: ResourceKind) -> ApiResult<Self> {
        let (page, shape) = Self::parse(body)?;
        if shape == EnvelopeShape::LegacyNested {
            log::warn!("[QUERY] {} list used the nested envelope", resource.controller());
        }
        Ok(page)
    }

    pub fn contains_id(&self, resource: ResourceKind, id: i64) -> bool {
        self.data.iter().any(|row| resource.row_id(row) == Some(id))
    }

    /// Decode rows into the resource type
    pub fn decode<T: Resource>(&self) -> ApiResult<ListResult<T>> {
        let data = self
            .data
            .iter()
            .map(|row| serde_json::from_value::<T>(row.clone()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ApiError::Decode(format!("{} row: {}", T::KIND.controller(), e)))?;
        Ok(ListResult {
            data,
            total_count: self.total_count,
            total_pages: self.total_pages,
        })
    }
}

/// Typed page handed to views; replaced wholesale on refetch
#[derive(Debug, Clone, PartialEq)]
pub struct ListResult<T> {
    pub data: Vec<T>,
    pub total_count: u64,
    pub total_pages: u32,
}

impl<T> Default for ListResult<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            total_count: 0,
            total_pages: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Badge;
    use serde_json::json;

    #[test]
    fn test_canonical_envelope() {
        let body = json!({ "data": [{ "badgeID": 1, "name": "Gold" }], "totalCount": 11, "totalPages": 2 }).to_string();
        let (page, shape) = ListPage::parse(&body).unwrap();
        assert_eq!(shape, EnvelopeShape::Canonical);
        assert_eq!(page.total_count, 11);
        assert_eq!(page.total_pages, 2);
        assert!(page.contains_id(ResourceKind::Badge, 1));
    }

    #[test]
    fn test_nested_envelope_is_accepted_as_legacy() {
        let body = json!({
            "data": { "data": [{ "badgeID": 4, "name": "Silver" }], "totalCount": 1, "totalPages": 1 }
        })
        .to_string();
        let (page, shape) = ListPage::parse(&body).unwrap();
        assert_eq!(shape, EnvelopeShape::LegacyNested);
        assert_eq!(page.total_count, 1);

        let typed = page.decode::<Badge>().unwrap();
        assert_eq!(typed.data[0].name, "Silver");
    }

    #[test]
    fn test_missing_totals_rejected() {
        let body = json!({ "data": [] }).to_string();
        assert!(matches!(ListPage::parse(&body), Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_decode_reports_bad_rows() {
        let page = ListPage {
            data: vec![json!({ "badgeID": "x" })],
            total_count: 1,
            total_pages: 1,
        };
        assert!(matches!(page.decode::<Badge>(), Err(ApiError::Decode(_))));
    }
}
