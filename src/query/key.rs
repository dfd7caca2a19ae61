//! List Query Keys

use std::collections::BTreeMap;

use crate::api::ResourceKind;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Identifies one cached page of a resource list.
///
/// Filters live in a `BTreeMap` so equal queries hash equally regardless of
/// the order filters were added in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListQuery {
    pub resource: ResourceKind,
    pub page: u32,
    pub page_size: u32,
    pub sort_field: String,
    pub ascending: bool,
    pub filters: BTreeMap<String, String>,
}

impl ListQuery {
    pub fn new(resource: ResourceKind) -> Self {
        Self {
            resource,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort_field: resource.default_sort().to_string(),
            ascending: false,
            filters: BTreeMap::new(),
        }
    }

    /// Pages are 1-based; 0 is clamped to 1
    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = size.max(1);
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>, ascending: bool) -> Self {
        self.sort_field = field.into();
        self.ascending = ascending;
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Same resource, size, sort and filters, one page further
    pub fn next_page(&self) -> Self {
        Self {
            page: self.page + 1,
            ..self.clone()
        }
    }

    /// Query-string parameters for the list endpoint
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
            ("sortField".to_string(), self.sort_field.clone()),
            ("ascending".to_string(), self.ascending.to_string()),
        ];
        params.extend(self.filters.iter().map(|(k, v)| (k.clone(), v.clone())));
        params
    }
}
