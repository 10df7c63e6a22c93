//! Filter and sort criteria sent to the remote store.
//!
//! A [`FilterForm`] holds what the user typed; [`normalize`] coerces it into
//! an immutable [`QueryDescriptor`]. Two descriptors with equal fields are
//! interchangeable: list fields are kept as ordered sets, so the order and
//! duplicates of the comma lists do not matter.
use std::collections::BTreeSet;

use api_types::transaction::TransactionType;
use chrono::{DateTime, NaiveDate};

use crate::{FeedError, MinorAmount};

/// Raw values of the filter form, as entered.
#[derive(Debug, Clone, Default)]
pub struct FilterForm {
    pub from: String,
    pub to: String,
    pub categories: String,
    pub types: String,
    pub payment_methods: String,
    pub statuses: String,
    pub min_amount: String,
    pub max_amount: String,
    pub search: String,
    pub sort_by: String,
    pub sort_dir: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortField {
    #[default]
    Date,
    Amount,
    Description,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Amount => "amount",
            Self::Description => "description",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Normalized query. Replacing the active descriptor always restarts
/// pagination from page 1.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct QueryDescriptor {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub categories: BTreeSet<String>,
    pub types: BTreeSet<TransactionType>,
    pub payment_methods: BTreeSet<String>,
    pub statuses: BTreeSet<String>,
    pub min_amount: Option<i64>,
    pub max_amount: Option<i64>,
    pub search: Option<String>,
    pub sort: Sort,
}

impl QueryDescriptor {
    /// Query pairs for the list endpoint, in a stable order.
    ///
    /// Lists are comma-joined; dates are ISO 8601; amounts are minor units.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(from) = self.from {
            params.push(("from", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.to {
            params.push(("to", to.format("%Y-%m-%d").to_string()));
        }
        push_list(&mut params, "category", self.categories.iter().map(String::as_str));
        push_list(&mut params, "type", self.types.iter().map(|t| t.as_str()));
        push_list(
            &mut params,
            "payment_method",
            self.payment_methods.iter().map(String::as_str),
        );
        push_list(&mut params, "status", self.statuses.iter().map(String::as_str));
        if let Some(min) = self.min_amount {
            params.push(("min_amount", min.to_string()));
        }
        if let Some(max) = self.max_amount {
            params.push(("max_amount", max.to_string()));
        }
        if let Some(search) = &self.search {
            params.push(("q", search.clone()));
        }
        params.push(("sort", self.sort.field.as_str().to_string()));
        params.push(("order", self.sort.direction.as_str().to_string()));
        params
    }
}

fn push_list<'a>(
    params: &mut Vec<(&'static str, String)>,
    key: &'static str,
    values: impl Iterator<Item = &'a str>,
) {
    let joined = values.collect::<Vec<_>>().join(",");
    if !joined.is_empty() {
        params.push((key, joined));
    }
}

/// Coerces the form into a descriptor.
///
/// Returns `Ok(None)` when nothing is filtered and the sort is the default:
/// the caller then fetches everything. Only type coercion happens here; the
/// server enforces everything else (a `min_amount` above `max_amount` is
/// passed through as is).
pub fn normalize(form: &FilterForm) -> Result<Option<QueryDescriptor>, FeedError> {
    let search = form.search.trim();
    let query = QueryDescriptor {
        from: parse_date(&form.from)?,
        to: parse_date(&form.to)?,
        categories: split_list(&form.categories).map(str::to_string).collect(),
        types: split_list(&form.types)
            .map(parse_type)
            .collect::<Result<_, _>>()?,
        payment_methods: split_list(&form.payment_methods)
            .map(str::to_string)
            .collect(),
        statuses: split_list(&form.statuses).map(str::to_string).collect(),
        min_amount: parse_amount(&form.min_amount)?,
        max_amount: parse_amount(&form.max_amount)?,
        search: (!search.is_empty()).then(|| search.to_string()),
        sort: Sort {
            field: parse_sort_field(&form.sort_by)?,
            direction: parse_sort_direction(&form.sort_dir)?,
        },
    };

    if query == QueryDescriptor::default() {
        return Ok(None);
    }
    Ok(Some(query))
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|item| !item.is_empty())
}

fn parse_date(raw: &str) -> Result<Option<NaiveDate>, FeedError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| Some(dt.date_naive()))
        .map_err(|_| FeedError::InvalidFilter(format!("\"{raw}\" is not a date")))
}

fn parse_amount(raw: &str) -> Result<Option<i64>, FeedError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(raw.parse::<MinorAmount>()?.minor()))
}

fn parse_type(raw: &str) -> Result<TransactionType, FeedError> {
    match raw.to_lowercase().as_str() {
        "income" => Ok(TransactionType::Income),
        "expense" => Ok(TransactionType::Expense),
        other => Err(FeedError::InvalidFilter(format!(
            "unknown transaction type \"{other}\""
        ))),
    }
}

fn parse_sort_field(raw: &str) -> Result<SortField, FeedError> {
    match raw.trim().to_lowercase().as_str() {
        "" | "date" => Ok(SortField::Date),
        "amount" => Ok(SortField::Amount),
        "description" => Ok(SortField::Description),
        other => Err(FeedError::InvalidFilter(format!("unknown sort key \"{other}\""))),
    }
}

fn parse_sort_direction(raw: &str) -> Result<SortDirection, FeedError> {
    match raw.trim().to_lowercase().as_str() {
        "" | "desc" => Ok(SortDirection::Desc),
        "asc" => Ok(SortDirection::Asc),
        other => Err(FeedError::InvalidFilter(format!(
            "unknown sort direction \"{other}\""
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_form_means_no_filter() {
        assert_eq!(normalize(&FilterForm::default()), Ok(None));

        let blank = FilterForm {
            categories: " , ,".to_string(),
            search: "   ".to_string(),
            sort_by: "date".to_string(),
            ..FilterForm::default()
        };
        assert_eq!(normalize(&blank), Ok(None));
    }

    #[test]
    fn lists_compare_as_sets() {
        let a = FilterForm {
            categories: "food, rent".to_string(),
            types: "expense".to_string(),
            ..FilterForm::default()
        };
        let b = FilterForm {
            categories: "rent,food,food".to_string(),
            types: "Expense".to_string(),
            ..FilterForm::default()
        };
        assert_eq!(normalize(&a).unwrap(), normalize(&b).unwrap());
    }

    #[test]
    fn dates_accept_iso_date_or_rfc3339() {
        let form = FilterForm {
            from: "2026-01-01".to_string(),
            to: "2026-01-31T23:00:00+01:00".to_string(),
            ..FilterForm::default()
        };
        let query = normalize(&form).unwrap().unwrap();
        assert_eq!(query.from, NaiveDate::from_ymd_opt(2026, 1, 1));
        assert_eq!(query.to, NaiveDate::from_ymd_opt(2026, 1, 31));
    }

    #[test]
    fn amounts_become_minor_units() {
        let form = FilterForm {
            min_amount: "10,5".to_string(),
            max_amount: "2".to_string(),
            ..FilterForm::default()
        };
        let query = normalize(&form).unwrap().unwrap();
        assert_eq!(query.min_amount, Some(1050));
        // Not validated against each other.
        assert_eq!(query.max_amount, Some(200));
    }

    #[test]
    fn coercion_failures_are_errors() {
        let bad_date = FilterForm {
            from: "yesterday".to_string(),
            ..FilterForm::default()
        };
        assert!(matches!(normalize(&bad_date), Err(FeedError::InvalidFilter(_))));

        let bad_type = FilterForm {
            types: "income,transfer".to_string(),
            ..FilterForm::default()
        };
        assert!(matches!(normalize(&bad_type), Err(FeedError::InvalidFilter(_))));

        let bad_amount = FilterForm {
            min_amount: "ten".to_string(),
            ..FilterForm::default()
        };
        assert!(matches!(normalize(&bad_amount), Err(FeedError::InvalidAmount(_))));
    }

    #[test]
    fn non_default_sort_alone_is_a_query() {
        let form = FilterForm {
            sort_by: "amount".to_string(),
            sort_dir: "asc".to_string(),
            ..FilterForm::default()
        };
        let query = normalize(&form).unwrap().unwrap();
        assert_eq!(query.sort.field, SortField::Amount);
        assert_eq!(query.sort.direction, SortDirection::Asc);
    }

    #[test]
    fn params_are_stable() {
        let form = FilterForm {
            from: "2026-02-01".to_string(),
            categories: "rent, food".to_string(),
            types: "expense,income".to_string(),
            min_amount: "5".to_string(),
            search: " coffee ".to_string(),
            ..FilterForm::default()
        };
        let params = normalize(&form).unwrap().unwrap().to_params();
        assert_eq!(
            params,
            vec![
                ("from", "2026-02-01".to_string()),
                ("category", "food,rent".to_string()),
                ("type", "income,expense".to_string()),
                ("min_amount", "500".to_string()),
                ("q", "coffee".to_string()),
                ("sort", "date".to_string()),
                ("order", "desc".to_string()),
            ]
        );
    }
}
