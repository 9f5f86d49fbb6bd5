//! IGDB query-language builder
//!
//! Renders the `search "..."; fields a,b; where ...; sort ...; limit n; offset n;`
//! text body that IGDB endpoints accept.

use std::fmt;

/// Direction for a `sort` clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

impl SortOrder {
    fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Builder for an IGDB query body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IgdbQuery {
    search: Option<String>,
    fields: Vec<String>,
    conditions: Vec<String>,
    sort: Option<(String, SortOrder)>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl IgdbQuery {
    /// Create an empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Full-text search term; double quotes are escaped
    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Add one field to the `fields` clause
    #[must_use]
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Add several fields to the `fields` clause
    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Add a `where` condition; multiple conditions are joined with `&`
    #[must_use]
    pub fn filter(mut self, condition: impl Into<String>) -> Self {
        self.conditions.push(condition.into());
        self
    }

    /// Set the `sort` clause
    #[must_use]
    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some((field.into(), order));
        self
    }

    /// Set the `limit` clause
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the `offset` clause
    #[must_use]
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Requested limit, if any
    pub fn limit_value(&self) -> Option<usize> {
        self.limit
    }
}

/// Escape a search term for a quoted string literal
fn escape_term(term: &str) -> String {
    term.replace('\\', "\\\\").replace('"', "\\\"")
}

impl fmt::Display for IgdbQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut clauses = Vec::new();

        if let Some(ref term) = self.search {
            clauses.push(format!("search \"{}\";", escape_term(term)));
        }

        if self.fields.is_empty() {
            clauses.push("fields *;".to_string());
        } else {
            clauses.push(format!("fields {};", self.fields.join(",")));
        }

        if !self.conditions.is_empty() {
            clauses.push(format!("where {};", self.conditions.join(" & ")));
        }

        if let Some((ref field, order)) = self.sort {
            clauses.push(format!("sort {field} {};", order.as_str()));
        }

        if let Some(limit) = self.limit {
            clauses.push(format!("limit {limit};"));
        }

        if let Some(offset) = self.offset {
            clauses.push(format!("offset {offset};"));
        }

        f.write_str(&clauses.join(" "))
    }
}
