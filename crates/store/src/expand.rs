//! Read-side query value types: expansion paths, filters, sort.

/// Dot-path expansion specification.
///
/// Each path names a relation field, optionally drilling into the expanded
/// record's own relations: `"order_id.frame_item_ids"` inlines the order under
/// the customer, then the frame items under the order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expand {
    paths: Vec<String>,
}

impl Expand {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }
}

/// Store-side filter expression.
///
/// Kept as the store's string syntax (`field = "value"`, `field ~ "value"`,
/// clauses joined with `&&`); builders below escape values so callers never
/// hand-concatenate user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter(String);

impl Filter {
    pub fn raw(expr: impl Into<String>) -> Self {
        Self(expr.into())
    }

    /// `field = "value"`
    pub fn eq(field: &str, value: &str) -> Self {
        Self(format!("{field} = \"{}\"", escape(value)))
    }

    /// `field ~ "value"` (case-insensitive containment)
    pub fn contains(field: &str, value: &str) -> Self {
        Self(format!("{field} ~ \"{}\"", escape(value)))
    }

    /// Join clauses with `&&`. An empty iterator yields a match-all filter.
    pub fn and<I: IntoIterator<Item = Filter>>(clauses: I) -> Self {
        let joined = clauses
            .into_iter()
            .map(|c| c.0)
            .collect::<Vec<_>>()
            .join(" && ");
        Self(joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Single-field sort: `"-order_no"` descending, `"surname"` ascending.
/// Dotted paths follow single relations (`"-order_id.order_no"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub descending: bool,
}

impl SortSpec {
    pub fn parse(spec: &str) -> Self {
        match spec.strip_prefix('-') {
            Some(field) => Self {
                field: field.to_string(),
                descending: true,
            },
            None => Self {
                field: spec.strip_prefix('+').unwrap_or(spec).to_string(),
                descending: false,
            },
        }
    }
}

/// Options for a full-list read.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub filter: Option<Filter>,
    pub expand: Expand,
    pub sort: Option<SortSpec>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        if !filter.is_empty() {
            self.filter = Some(filter);
        }
        self
    }

    pub fn expand(mut self, expand: Expand) -> Self {
        self.expand = expand;
        self
    }

    pub fn sort(mut self, spec: &str) -> Self {
        self.sort = Some(SortSpec::parse(spec));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_compose_the_store_syntax() {
        let filter = Filter::and([
            Filter::contains("email", "ann@"),
            Filter::eq("surname", "Price"),
        ]);
        assert_eq!(filter.as_str(), r#"email ~ "ann@" && surname = "Price""#);
    }

    #[test]
    fn eq_escapes_quotes() {
        let filter = Filter::eq("surname", "O\"Neil");
        assert_eq!(filter.as_str(), r#"surname = "O\"Neil""#);
    }

    #[test]
    fn sort_spec_parses_direction() {
        assert_eq!(
            SortSpec::parse("-order_no"),
            SortSpec {
                field: "order_no".into(),
                descending: true
            }
        );
        assert!(!SortSpec::parse("surname").descending);
    }
}
