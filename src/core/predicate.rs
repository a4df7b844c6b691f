//! Per-resource capability tables for sorting and filtering
//!
//! Each resource type declares a static [`ResourceDescriptor`]: for every
//! column, which filter operators make sense, whether it can be sorted on,
//! and how its values are typed. Validation is a pure lookup against it.

use crate::core::error::QueryError;
use crate::core::field::FieldKind;
use std::fmt;

/// Filter operators accepted in `field[operator]=value` parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEquals,
    LessThan,
    LessThanOrEquals,
    /// Case-insensitive substring match
    ApproximatelyEquals,
}

impl Operator {
    /// Every operator, in the order they are documented
    pub const ALL: &'static [Operator] = &[
        Operator::Equals,
        Operator::NotEquals,
        Operator::GreaterThan,
        Operator::GreaterThanOrEquals,
        Operator::LessThan,
        Operator::LessThanOrEquals,
        Operator::ApproximatelyEquals,
    ];

    /// Parse the bracketed query-string token (`eq`, `gte`, `~eq`, ...)
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "eq" => Some(Operator::Equals),
            "neq" => Some(Operator::NotEquals),
            "gt" => Some(Operator::GreaterThan),
            "gte" => Some(Operator::GreaterThanOrEquals),
            "lt" => Some(Operator::LessThan),
            "lte" => Some(Operator::LessThanOrEquals),
            "~eq" => Some(Operator::ApproximatelyEquals),
            _ => None,
        }
    }

    /// The query-string token for this operator
    pub fn token(&self) -> &'static str {
        match self {
            Operator::Equals => "eq",
            Operator::NotEquals => "neq",
            Operator::GreaterThan => "gt",
            Operator::GreaterThanOrEquals => "gte",
            Operator::LessThan => "lt",
            Operator::LessThanOrEquals => "lte",
            Operator::ApproximatelyEquals => "~eq",
        }
    }

    /// Whether this is one of the string-match variants
    pub fn is_string_match(&self) -> bool {
        matches!(self, Operator::ApproximatelyEquals)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Operators for columns that only support (in)equality
pub const EQUALITY_OPERATORS: &[Operator] = &[Operator::Equals, Operator::NotEquals];

/// Operators for free-text columns
pub const TEXT_OPERATORS: &[Operator] = &[
    Operator::Equals,
    Operator::NotEquals,
    Operator::ApproximatelyEquals,
];

/// Operators for ordered scalar columns (integers, timestamps)
pub const ORDERED_OPERATORS: &[Operator] = &[
    Operator::Equals,
    Operator::NotEquals,
    Operator::GreaterThan,
    Operator::GreaterThanOrEquals,
    Operator::LessThan,
    Operator::LessThanOrEquals,
];

/// What a single column supports
#[derive(Debug, Clone, Copy)]
pub struct FieldCapability {
    /// Column name, as accepted in query parameters and emitted into SQL
    pub name: &'static str,
    pub kind: FieldKind,
    /// Permitted filter operators; empty means not filterable
    pub operators: &'static [Operator],
    pub sortable: bool,
}

/// Static capability descriptor for one resource type
#[derive(Debug)]
pub struct ResourceDescriptor {
    /// Backing table name
    pub table: &'static str,
    /// Column holding the owner identity; every query is scoped by it
    pub owner_column: &'static str,
    /// Column used as the stable default ordering and tie-breaker
    pub key_column: &'static str,
    pub fields: &'static [FieldCapability],
}

impl ResourceDescriptor {
    /// Find the capability entry for a column
    pub fn field(&self, name: &str) -> Option<&'static FieldCapability> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Operators permitted for `field`, or `NotFilterable`
    pub fn valid_predicates(&self, field: &str) -> Result<&'static [Operator], QueryError> {
        match self.field(field) {
            Some(capability) if !capability.operators.is_empty() => Ok(capability.operators),
            _ => Err(QueryError::NotFilterable {
                field: field.to_string(),
            }),
        }
    }

    /// Check that `operator` is permitted on `field`
    pub fn check_predicate(
        &self,
        field: &str,
        operator: Operator,
    ) -> Result<&'static FieldCapability, QueryError> {
        let operators = self.valid_predicates(field)?;
        if !operators.contains(&operator) {
            return Err(QueryError::PredicateNotSupported {
                field: field.to_string(),
                operator: operator.token().to_string(),
            });
        }
        self.field(field).ok_or_else(|| QueryError::NotFilterable {
            field: field.to_string(),
        })
    }

    pub fn is_sortable(&self, field: &str) -> bool {
        self.field(field).is_some_and(|f| f.sortable)
    }

    /// Whether values for `field` are compared as string literals
    pub fn is_string_typed(&self, field: &str) -> bool {
        self.field(field).is_some_and(|f| f.kind == FieldKind::Text)
    }
}
