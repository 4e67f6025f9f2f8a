//! List query parsing, document ordering and pagination.

use crate::ids::parse_leading_int;
use crate::types::User;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const DEFAULT_SORT_FIELD: &str = "name";

// ============================================================================
// QUERY
// ============================================================================

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// `desc` / `descending` (any case) sorts descending; anything else ascends.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(value)
                if value.eq_ignore_ascii_case("desc")
                    || value.eq_ignore_ascii_case("descending") =>
            {
                SortOrder::Descending
            }
            _ => SortOrder::Ascending,
        }
    }
}

/// A normalized list request. Always valid: bad input falls back to defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-indexed page number.
    pub page: u64,
    pub limit: u64,
    pub sort_by: String,
    pub order: SortOrder,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort_by: DEFAULT_SORT_FIELD.to_string(),
            order: SortOrder::Ascending,
        }
    }
}

impl ListQuery {
    /// Build a query from raw request parameters.
    ///
    /// `page` and `limit` take their leading integer; absent, non-numeric
    /// or sub-1 values fall back to the defaults. An empty `sort_by` falls
    /// back to `name`.
    pub fn from_params(
        page: Option<&str>,
        limit: Option<&str>,
        sort_by: Option<&str>,
        order: Option<&str>,
    ) -> Self {
        Self {
            page: positive_or(page, DEFAULT_PAGE),
            limit: positive_or(limit, DEFAULT_LIMIT),
            sort_by: sort_by
                .map(str::trim)
                .filter(|field| !field.is_empty())
                .unwrap_or(DEFAULT_SORT_FIELD)
                .to_string(),
            order: SortOrder::parse(order),
        }
    }

    pub fn with_page(mut self, page: u64) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn sorted_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = field.into();
        self.order = order;
        self
    }

    /// Number of records skipped before the window starts.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit.max(1))
    }
}

fn positive_or(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(parse_leading_int)
        .filter(|value| *value >= 1)
        .and_then(|value| u64::try_from(value).ok())
        .unwrap_or(default)
}

// ============================================================================
// PAGE
// ============================================================================

/// One window of a sorted collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub total: u64,
    pub current_page: u64,
    pub total_pages: u64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn empty(query: &ListQuery) -> Self {
        Self {
            total: 0,
            current_page: query.page,
            total_pages: 0,
            items: Vec::new(),
        }
    }
}

/// Sort `users` by the query's field and direction, then cut the window.
///
/// The sort is stable, so records comparing equal keep their input order.
pub fn paginate(users: Vec<User>, query: &ListQuery) -> Page<User> {
    let total = users.len() as u64;

    let mut keyed: Vec<(Option<Value>, User)> = users
        .into_iter()
        .map(|user| (user.field_value(&query.sort_by), user))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = compare_values(a.as_ref(), b.as_ref());
        match query.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });

    let skip = usize::try_from(query.offset()).unwrap_or(usize::MAX);
    let take = usize::try_from(query.limit).unwrap_or(usize::MAX);

    Page {
        total,
        current_page: query.page,
        total_pages: query.total_pages(total),
        items: keyed
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|(_, user)| user)
            .collect(),
    }
}

// ============================================================================
// ORDERING
// ============================================================================

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(_)) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Object(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Bool(_)) => 5,
    }
}

/// Total order over optional JSON values, document-store style.
///
/// Missing and null sort first, then numbers, strings, objects, arrays and
/// booleans. Within a type: numeric, lexicographic, or element-wise.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let rank = type_rank(a).cmp(&type_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }

    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => {
                let x = x.as_f64().unwrap_or(f64::NAN);
                let y = y.as_f64().unwrap_or(f64::NAN);
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
        },
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Array(xs)), Some(Value::Array(ys))) => xs
            .iter()
            .zip(ys.iter())
            .map(|(x, y)| compare_values(Some(x), Some(y)))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or_else(|| xs.len().cmp(&ys.len())),
        (Some(Value::Object(xs)), Some(Value::Object(ys))) => xs
            .iter()
            .zip(ys.iter())
            .map(|((xk, xv), (yk, yv))| {
                xk.cmp(yk).then_with(|| compare_values(Some(xv), Some(yv)))
            })
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or_else(|| xs.len().cmp(&ys.len())),
        _ => Ordering::Equal,
    }
}

// =============================================================================
// TESTS
// =============================================================================


// =============================================================================
// PROPERTY TESTS
// =============================================================================
