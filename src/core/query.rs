//! Query builder: validated sort, filter and page → one owner-scoped query
//!
//! A [`ListQuery`] always carries the owner scope as a separate, mandatory
//! field. Caller-supplied predicates are only ever conjoined with it, so no
//! filter can widen visibility to another owner's rows.
//!
//! The same query value can be rendered to SQL with positional bind
//! parameters ([`ListQuery::select_statement`], [`ListQuery::count_statement`])
//! or evaluated directly against rows ([`ListQuery::matches`],
//! [`ListQuery::compare`]).

use crate::core::error::QueryError;
use crate::core::field::{FieldKind, FieldValue};
use crate::core::filter::{FilterExpression, FilterSet};
use crate::core::pagination::PageSpec;
use crate::core::predicate::{Operator, ResourceDescriptor};
use crate::core::resource::{OwnerId, Resource};
use crate::core::sort::{SortDirection, SortSpec};
use std::cmp::Ordering;

/// A typed comparison on one column
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: &'static str,
    pub operator: Operator,
    pub value: FieldValue,
}

impl Predicate {
    /// Evaluate the predicate against a column value
    pub fn matches(&self, actual: &FieldValue) -> bool {
        let ordering = || actual.compare(&self.value);
        match self.operator {
            Operator::Equals => ordering() == Some(Ordering::Equal),
            Operator::NotEquals => ordering().is_some_and(|o| o != Ordering::Equal),
            Operator::GreaterThan => ordering() == Some(Ordering::Greater),
            Operator::GreaterThanOrEquals => ordering().is_some_and(|o| o != Ordering::Less),
            Operator::LessThan => ordering() == Some(Ordering::Less),
            Operator::LessThanOrEquals => ordering().is_some_and(|o| o != Ordering::Greater),
            Operator::ApproximatelyEquals => match (actual.as_string(), self.value.as_string()) {
                (Some(haystack), Some(needle)) => haystack
                    .to_lowercase()
                    .contains(&needle.to_lowercase()),
                _ => false,
            },
        }
    }

    /// SQL comparison with the value as positional parameter `$index`
    fn to_sql(&self, index: usize) -> String {
        match self.operator {
            Operator::Equals => format!("{} = ${}", self.field, index),
            Operator::NotEquals => format!("{} <> ${}", self.field, index),
            Operator::GreaterThan => format!("{} > ${}", self.field, index),
            Operator::GreaterThanOrEquals => format!("{} >= ${}", self.field, index),
            Operator::LessThan => format!("{} < ${}", self.field, index),
            Operator::LessThanOrEquals => format!("{} <= ${}", self.field, index),
            Operator::ApproximatelyEquals => {
                format!("{} ILIKE ${} ESCAPE '\\'", self.field, index)
            }
        }
    }

    /// Value bound for this predicate
    ///
    /// String-match needles are wrapped in wildcards with LIKE metacharacters
    /// escaped, so user input only ever matches literally.
    fn bind_value(&self) -> FieldValue {
        match (&self.operator, &self.value) {
            (Operator::ApproximatelyEquals, FieldValue::String(needle)) => {
                FieldValue::String(format!("%{}%", escape_like(needle)))
            }
            (_, value) => value.clone(),
        }
    }
}

/// Escape `\`, `%` and `_` for use inside a LIKE pattern
pub fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// SQL text plus the values bound to its `$n` placeholders, in order
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    pub text: String,
    pub params: Vec<FieldValue>,
}

/// An executable, owner-scoped list query
#[derive(Debug, Clone)]
pub struct ListQuery {
    descriptor: &'static ResourceDescriptor,
    owner: OwnerId,
    predicates: Vec<Predicate>,
    sort: Vec<SortSpec>,
    page: PageSpec,
}

impl ListQuery {
    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn sort(&self) -> &[SortSpec] {
        &self.sort
    }

    pub fn page(&self) -> PageSpec {
        self.page
    }

    pub fn descriptor(&self) -> &'static ResourceDescriptor {
        self.descriptor
    }

    /// Sort keys including the trailing key-column tie-breaker
    pub fn effective_sort(&self) -> Vec<SortSpec> {
        let mut sort = self.sort.clone();
        if !sort.iter().any(|s| s.field == self.descriptor.key_column) {
            sort.push(SortSpec::ascending(self.descriptor.key_column));
        }
        sort
    }

    /// Owner scope plus every predicate, and the values to bind
    fn where_clause(&self) -> (String, Vec<FieldValue>) {
        let mut clauses = vec![format!("{} = $1", self.descriptor.owner_column)];
        let mut params = vec![FieldValue::String(self.owner.to_string())];

        for predicate in &self.predicates {
            params.push(predicate.bind_value());
            clauses.push(predicate.to_sql(params.len()));
        }

        (clauses.join(" AND "), params)
    }

    /// `SELECT` for one page of rows
    pub fn select_statement(&self, columns: &str) -> SqlStatement {
        let (where_clause, mut params) = self.where_clause();

        // Text keys sort bytewise, the same order `String::cmp` gives in memory
        let order_by = self
            .effective_sort()
            .iter()
            .map(|s| {
                if self.descriptor.is_string_typed(s.field) {
                    format!("{} COLLATE \"C\" {}", s.field, s.direction.as_sql())
                } else {
                    format!("{} {}", s.field, s.direction.as_sql())
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        params.push(FieldValue::Integer(saturating_i64(self.page.limit)));
        let limit_index = params.len();
        params.push(FieldValue::Integer(saturating_i64(self.page.skip)));
        let offset_index = params.len();

        SqlStatement {
            text: format!(
                "SELECT {} FROM {} WHERE {} ORDER BY {} LIMIT ${} OFFSET ${}",
                columns, self.descriptor.table, where_clause, order_by, limit_index, offset_index
            ),
            params,
        }
    }

    /// `SELECT COUNT(*)` over the same scope and filters, ignoring the page
    pub fn count_statement(&self) -> SqlStatement {
        let (where_clause, params) = self.where_clause();
        SqlStatement {
            text: format!(
                "SELECT COUNT(*) FROM {} WHERE {}",
                self.descriptor.table, where_clause
            ),
            params,
        }
    }

    /// Whether a row is inside the owner scope and satisfies every predicate
    pub fn matches<R: Resource>(&self, row: &R) -> bool {
        row.owner() == &self.owner
            && self.predicates.iter().all(|p| {
                row.field_value(p.field)
                    .is_some_and(|actual| p.matches(&actual))
            })
    }

    /// Order two rows by the effective sort keys
    pub fn compare<R: Resource>(&self, a: &R, b: &R) -> Ordering {
        for spec in self.effective_sort() {
            let ordering = match (a.field_value(spec.field), b.field_value(spec.field)) {
                (Some(x), Some(y)) => x.compare(&y).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            };
            let ordering = match spec.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Builds [`ListQuery`] values for one resource type
pub struct QueryBuilder {
    descriptor: &'static ResourceDescriptor,
}

impl QueryBuilder {
    pub fn new(descriptor: &'static ResourceDescriptor) -> Self {
        Self { descriptor }
    }

    /// Compose validated filters, sort keys and page into a query for `owner`
    ///
    /// Typed values that fail to parse produce [`QueryError::Build`].
    pub fn build(
        &self,
        owner: OwnerId,
        filters: &FilterSet,
        sort: Vec<SortSpec>,
        page: PageSpec,
    ) -> Result<ListQuery, QueryError> {
        let predicates = filters
            .expressions()
            .map(|expression| self.predicate(expression))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ListQuery {
            descriptor: self.descriptor,
            owner,
            predicates,
            sort,
            page,
        })
    }

    fn predicate(&self, expression: &FilterExpression) -> Result<Predicate, QueryError> {
        let capability =
            self.descriptor
                .field(&expression.name)
                .ok_or_else(|| QueryError::Build {
                    message: format!("unknown column '{}'", expression.name),
                })?;

        if expression.operator.is_string_match() && !expression.is_string_data {
            return Err(QueryError::Build {
                message: format!(
                    "operator {} requires a string column, '{}' is not one",
                    expression.operator, expression.name
                ),
            });
        }

        let kind = if expression.is_string_data {
            FieldKind::Text
        } else {
            capability.kind
        };
        let value = kind
            .parse_value(&expression.value)
            .map_err(|message| QueryError::Build { message })?;

        Ok(Predicate {
            field: capability.name,
            operator: expression.operator,
            value,
        })
    }
}
