//! Query parameter helpers.
//!
//! [`QueryParams`] collects URL query pairs from optional values, and
//! [`ListParams`] carries the paging and sorting arguments accepted by every
//! NSX-T list endpoint. Cursors are opaque and are only passed through.

use std::fmt::Display;

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: &'static str, value: Option<T>)
    where
        T: ToString,
    {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Append a required key/value pair.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string()));
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.pairs
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Paging and sorting arguments of NSX-T list endpoints.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListParams {
    /// Opaque cursor returned by the previous page.
    pub cursor: Option<String>,
    /// Comma separated list of fields to include.
    pub included_fields: Option<String>,
    /// Maximum number of results (server default 1000).
    pub page_size: Option<i64>,
    /// Sort direction.
    pub sort_ascending: Option<bool>,
    /// Field to sort by.
    pub sort_by: Option<String>,
    /// Include objects marked for deletion (policy API only).
    pub include_mark_for_delete_objects: Option<bool>,
}

impl ListParams {
    /// Create empty list parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue from a cursor.
    #[must_use]
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Limit the page size.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Sort by a field.
    #[must_use]
    pub fn sorted_by(mut self, field: impl Into<String>, ascending: bool) -> Self {
        self.sort_by = Some(field.into());
        self.sort_ascending = Some(ascending);
        self
    }

    /// Append the parameters to an existing builder.
    pub fn append_to(&self, params: &mut QueryParams) {
        params.push_opt("cursor", self.cursor.as_ref());
        params.push_opt(
            "include_mark_for_delete_objects",
            self.include_mark_for_delete_objects,
        );
        params.push_opt("included_fields", self.included_fields.as_ref());
        params.push_opt("page_size", self.page_size);
        params.push_opt("sort_ascending", self.sort_ascending);
        params.push_opt("sort_by", self.sort_by.as_ref());
    }

    /// Convert to URL query pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = QueryParams::new();
        self.append_to(&mut params);
        params.into_pairs()
    }
}

#[cfg(test)]
mod tests {
    use super::{ListParams, QueryParams};

    #[test]
    fn push_opt_skips_none() {
        let mut params = QueryParams::new();
        params.push_opt("cursor", Option::<String>::None);
        assert!(params.is_empty());
    }

    #[test]
    fn push_keeps_order() {
        let mut params = QueryParams::new();
        params.push("action", "create_with_rules");
        params.push_opt("cascade", Some(true));
        assert_eq!(
            params.into_pairs(),
            vec![
                ("action", "create_with_rules".to_string()),
                ("cascade", "true".to_string())
            ]
        );
    }

    #[test]
    fn list_params_to_pairs() {
        let params = ListParams::new()
            .with_cursor("00361")
            .with_page_size(50)
            .sorted_by("display_name", true);

        let pairs = params.to_pairs();
        assert!(pairs.contains(&("cursor", "00361".into())));
        assert!(pairs.contains(&("page_size", "50".into())));
        assert!(pairs.contains(&("sort_by", "display_name".into())));
        assert!(pairs.contains(&("sort_ascending", "true".into())));
        assert!(!pairs.iter().any(|(k, _)| *k == "included_fields"));
    }

    #[test]
    fn empty_list_params_produce_no_pairs() {
        assert!(ListParams::default().to_pairs().is_empty());
    }
}
