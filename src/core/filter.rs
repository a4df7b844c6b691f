//! Query-string filter parsing
//!
//! Filters arrive as `field[operator]=value` parameters, e.g.
//! `name[~eq]=admin&id[gte]=10&id[lt]=20`. They are grouped by field name,
//! keeping parameter order within each group, and every expression is checked
//! against the resource's capability table before anything is returned.

use crate::core::error::QueryError;
use crate::core::predicate::{Operator, ResourceDescriptor};
use indexmap::IndexMap;
use regex::Regex;
use std::sync::OnceLock;

/// One parsed `field[operator]=value` expression
#[derive(Debug, Clone, PartialEq)]
pub struct FilterExpression {
    pub name: String,
    pub operator: Operator,
    pub value: String,
    /// Whether the value is compared as a string literal rather than a typed scalar
    pub is_string_data: bool,
}

/// Filter expressions grouped by field name, in first-seen order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    filters: IndexMap<String, Vec<FilterExpression>>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, expression: FilterExpression) {
        self.filters
            .entry(expression.name.clone())
            .or_default()
            .push(expression);
    }

    /// Expressions for a single field
    pub fn get(&self, field: &str) -> Option<&[FilterExpression]> {
        self.filters.get(field).map(Vec::as_slice)
    }

    /// Iterate over every expression, field by field
    pub fn expressions(&self) -> impl Iterator<Item = &FilterExpression> {
        self.filters.values().flatten()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.values().map(Vec::len).sum()
    }
}

fn filter_key_regex() -> &'static Regex {
    static FILTER_KEY_REGEX: OnceLock<Regex> = OnceLock::new();
    FILTER_KEY_REGEX.get_or_init(|| {
        Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\[(~?[a-z]+)\]$").expect("filter key regex is valid")
    })
}

/// Split a raw `field[operator]` key into its parts
pub fn parse_filter_key(key: &str) -> Result<(String, Operator), QueryError> {
    let malformed = || QueryError::MalformedFilterSyntax {
        parameter: key.to_string(),
    };

    let captures = filter_key_regex().captures(key).ok_or_else(malformed)?;
    let operator = Operator::from_token(&captures[2]).ok_or_else(malformed)?;

    Ok((captures[1].to_string(), operator))
}

/// Parser turning raw filter parameters into a validated [`FilterSet`]
pub struct FilterParser {
    descriptor: &'static ResourceDescriptor,
}

impl FilterParser {
    pub fn new(descriptor: &'static ResourceDescriptor) -> Self {
        Self { descriptor }
    }

    /// Parse and validate raw `(key, value)` pairs
    ///
    /// Fails on the first malformed or unsupported expression; nothing is
    /// partially applied.
    pub fn parse<'a, I>(&self, params: I) -> Result<FilterSet, QueryError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut set = FilterSet::new();

        for (key, value) in params {
            let (name, operator) = parse_filter_key(key)?;
            self.descriptor.check_predicate(&name, operator)?;

            let is_string_data = self.descriptor.is_string_typed(&name);
            set.push(FilterExpression {
                name,
                operator,
                value: value.to_string(),
                is_string_data,
            });
        }

        Ok(set)
    }
}
