//! Client-side filtering and sorting of persona collections.
//!
//! Both operations are total: they never fail, and an empty input or an
//! input with no matches yields an empty output.

use crate::api::models::{Field, Record};
use crate::utils::text::parse_leading_float;
use std::cmp::Ordering;

/// Predicate over record fields.
///
/// Comparisons are exact and made on the stringified field value; a missing
/// field never matches.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Equals { field: Field, value: String },
    /// Matches when any element of a list-valued field equals `value`.
    /// Scalar fields behave like `Equals`.
    Includes { field: Field, value: String },
    /// Disjunction; an empty list matches nothing.
    Any(Vec<Filter>),
    /// Conjunction; an empty list matches everything.
    All(Vec<Filter>),
}

impl Filter {
    pub fn equals(field: Field, value: impl Into<String>) -> Self {
        Filter::Equals {
            field,
            value: value.into(),
        }
    }

    pub fn includes(field: Field, value: impl Into<String>) -> Self {
        Filter::Includes {
            field,
            value: value.into(),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Filter::Equals { field, value } => record.value(*field).as_deref() == Some(value),
            Filter::Includes { field, value } => {
                record.elements(*field).iter().any(|element| element == value)
            }
            Filter::Any(filters) => filters.iter().any(|f| f.matches(record)),
            Filter::All(filters) => filters.iter().all(|f| f.matches(record)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Case-insensitive string comparison
    Lexicographic,
    /// Leading-float comparison; unparseable values are NaN
    Numeric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: Field,
    pub mode: SortMode,
}

impl SortSpec {
    pub fn lexicographic(field: Field) -> Self {
        Self {
            field,
            mode: SortMode::Lexicographic,
        }
    }

    pub fn numeric(field: Field) -> Self {
        Self {
            field,
            mode: SortMode::Numeric,
        }
    }
}

/// Fetch-side processing applied after one retrieval: filter, then sort.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filter: Option<Filter>,
    pub sort: Option<SortSpec>,
}

impl Query {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn apply(&self, records: Vec<Record>) -> Vec<Record> {
        let records = match &self.filter {
            Some(filter) => filter_records(records, filter),
            None => records,
        };
        match &self.sort {
            Some(sort) => sort_records(records, sort),
            None => records,
        }
    }
}

pub fn filter_records(records: Vec<Record>, filter: &Filter) -> Vec<Record> {
    filter_by(records, |record| filter.matches(record))
}

pub fn filter_by<P>(records: Vec<Record>, predicate: P) -> Vec<Record>
where
    P: Fn(&Record) -> bool,
{
    records.into_iter().filter(|r| predicate(r)).collect()
}

enum SortKey {
    Text(Option<String>),
    Number(f64),
}

fn sort_key(record: &Record, spec: &SortSpec) -> SortKey {
    let value = record.value(spec.field);
    match spec.mode {
        SortMode::Lexicographic => SortKey::Text(value.map(|v| v.to_lowercase())),
        SortMode::Numeric => SortKey::Number(
            value
                .as_deref()
                .map(parse_leading_float)
                .unwrap_or(f64::NAN),
        ),
    }
}

/// Missing text and NaN sort after every real key.
fn compare_keys(a: &SortKey, b: &SortKey) -> Ordering {
    match (a, b) {
        (SortKey::Text(a), SortKey::Text(b)) => match (a, b) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        (SortKey::Number(a), SortKey::Number(b)) => match (a.is_nan(), b.is_nan()) {
            (false, false) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (false, true) => Ordering::Less,
            (true, false) => Ordering::Greater,
            (true, true) => Ordering::Equal,
        },
        _ => Ordering::Equal,
    }
}

/// Stable sort: records with equal keys keep their input order.
pub fn sort_records(records: Vec<Record>, spec: &SortSpec) -> Vec<Record> {
    let mut keyed: Vec<(SortKey, Record)> = records
        .into_iter()
        .map(|record| (sort_key(&record, spec), record))
        .collect();

    // slice::sort_by is a stable merge sort
    keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b));

    keyed.into_iter().map(|(_, record)| record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{Address, FieldValue, PersonaFields};

    fn persona(id: &str, name: &str, city: &str, appearances: FieldValue) -> Record {
        Record::new(
            id,
            PersonaFields {
                name: Some(name.to_string()),
                surname: Some(format!("{} surname", name)),
                address: Some(Address {
                    street: Some("Calle 1".to_string()),
                    city: Some(city.to_string()),
                    region: Some("Jaén".to_string()),
                    country: Some("España".to_string()),
                }),
                years_of_participation: Some(FieldValue::List(vec![
                    FieldValue::from(2018u64),
                    FieldValue::from(2022u64),
                ])),
                olympic_appearances: Some(appearances),
                category: Some("Deportista".to_string()),
            },
        )
    }

    fn names(records: &[Record]) -> Vec<String> {
        records.iter().map(|r| r.display(Field::Name)).collect()
    }

    fn ids(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_sort_lexicographic_case_insensitive() {
        let records = vec![
            persona("1", "María", "Jaén", 1u64.into()),
            persona("2", "juan", "Jaén", 1u64.into()),
            persona("3", "Pedro", "Jaén", 1u64.into()),
        ];
        let sorted = sort_records(records, &SortSpec::lexicographic(Field::Name));
        assert_eq!(names(&sorted), vec!["juan", "María", "Pedro"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let records = vec![
            persona("a", "Ana", "Úbeda", 1u64.into()),
            persona("b", "ana", "Baeza", 1u64.into()),
            persona("c", "Bea", "Jaén", 1u64.into()),
            persona("d", "ANA", "Linares", 1u64.into()),
        ];
        let sorted = sort_records(records, &SortSpec::lexicographic(Field::Name));
        assert_eq!(ids(&sorted), vec!["a", "b", "d", "c"]);
    }

    #[test]
    fn test_sort_nested_field() {
        let records = vec![
            persona("1", "A", "Úbeda", 1u64.into()),
            persona("2", "B", "baeza", 1u64.into()),
            persona("3", "C", "Jaén", 1u64.into()),
        ];
        let sorted = sort_records(records, &SortSpec::lexicographic(Field::City));
        assert_eq!(ids(&sorted), vec!["2", "3", "1"]);
    }

    #[test]
    fn test_sort_numeric_nan_last_and_stable() {
        let records = vec![
            persona("nan1", "A", "X", "n/a".into()),
            persona("ten", "B", "X", 10u64.into()),
            persona("two", "C", "X", "2".into()),
            persona("nan2", "D", "X", "unknown".into()),
            persona("three", "E", "X", 3u64.into()),
        ];
        let sorted = sort_records(records, &SortSpec::numeric(Field::Appearances));
        assert_eq!(ids(&sorted), vec!["two", "three", "ten", "nan1", "nan2"]);
    }

    #[test]
    fn test_sort_numeric_is_not_lexicographic() {
        let records = vec![
            persona("1", "A", "X", 10u64.into()),
            persona("2", "B", "X", 9u64.into()),
        ];
        let sorted = sort_records(records, &SortSpec::numeric(Field::Appearances));
        assert_eq!(ids(&sorted), vec!["2", "1"]);
    }

    #[test]
    fn test_sort_missing_fields_go_last() {
        let mut nameless = persona("none", "x", "X", 1u64.into());
        nameless.fields.name = None;
        let records = vec![nameless, persona("z", "Zoe", "X", 1u64.into())];
        let sorted = sort_records(records, &SortSpec::lexicographic(Field::Name));
        assert_eq!(ids(&sorted), vec!["z", "none"]);
    }

    #[test]
    fn test_sort_empty() {
        assert!(sort_records(Vec::new(), &SortSpec::numeric(Field::Years)).is_empty());
    }

    #[test]
    fn test_filter_equals() {
        let records = vec![
            persona("1", "Juan", "Jaén", 1u64.into()),
            persona("2", "María", "Baeza", 2u64.into()),
        ];
        let filtered = filter_records(records, &Filter::equals(Field::Name, "María"));
        assert_eq!(ids(&filtered), vec!["2"]);
    }

    #[test]
    fn test_filter_is_exact() {
        let records = vec![persona("1", "Juan", "Jaén", 1u64.into())];
        assert!(filter_records(records.clone(), &Filter::equals(Field::Name, "juan")).is_empty());
        assert!(filter_records(records, &Filter::equals(Field::Name, "Jua")).is_empty());
    }

    #[test]
    fn test_filter_empty_input_and_no_match() {
        assert!(filter_records(Vec::new(), &Filter::equals(Field::Name, "Juan")).is_empty());
        let records = vec![persona("1", "Juan", "Jaén", 1u64.into())];
        assert!(filter_records(records, &Filter::equals(Field::Name, "Nadie")).is_empty());
    }

    #[test]
    fn test_filter_any_and_all() {
        let records = vec![
            persona("1", "Juan", "Jaén", 1u64.into()),
            persona("2", "María", "Baeza", 2u64.into()),
            persona("3", "Juan", "Baeza", 3u64.into()),
        ];

        let any = Filter::Any(vec![
            Filter::equals(Field::Name, "María"),
            Filter::equals(Field::Appearances, "3"),
        ]);
        assert_eq!(ids(&filter_records(records.clone(), &any)), vec!["2", "3"]);

        let all = Filter::All(vec![
            Filter::equals(Field::Name, "Juan"),
            Filter::equals(Field::City, "Baeza"),
            Filter::equals(Field::Category, "Deportista"),
            Filter::includes(Field::Years, "2022"),
        ]);
        assert_eq!(ids(&filter_records(records.clone(), &all)), vec!["3"]);

        assert!(filter_records(records.clone(), &Filter::Any(Vec::new())).is_empty());
        assert_eq!(filter_records(records, &Filter::All(Vec::new())).len(), 3);
    }

    #[test]
    fn test_filter_includes() {
        let records = vec![persona("1", "Juan", "Jaén", 1u64.into())];
        assert_eq!(
            filter_records(records.clone(), &Filter::includes(Field::Years, "2018")).len(),
            1
        );
        assert!(filter_records(records.clone(), &Filter::includes(Field::Years, "2019")).is_empty());
        assert_eq!(
            filter_records(records, &Filter::includes(Field::Name, "Juan")).len(),
            1
        );
    }

    #[test]
    fn test_filter_missing_field_never_matches() {
        let mut record = persona("1", "Juan", "Jaén", 1u64.into());
        record.fields.address = None;
        assert!(!Filter::equals(Field::City, "undefined").matches(&record));
        assert!(!Filter::equals(Field::Address, "undefined").matches(&record));
    }

    #[test]
    fn test_filter_by_closure() {
        let records = vec![
            persona("1", "Juan", "Jaén", 1u64.into()),
            persona("2", "María", "Baeza", 2u64.into()),
        ];
        let filtered = filter_by(records, |r| r.id == "2");
        assert_eq!(ids(&filtered), vec!["2"]);
    }

    #[test]
    fn test_query_filters_then_sorts() {
        let records = vec![
            persona("1", "Pedro", "Jaén", 1u64.into()),
            persona("2", "ana", "Baeza", 2u64.into()),
            persona("3", "Luis", "Jaén", 3u64.into()),
        ];
        let query = Query::all()
            .filter(Filter::equals(Field::City, "Jaén"))
            .sort(SortSpec::lexicographic(Field::Name));
        assert_eq!(ids(&query.apply(records.clone())), vec!["3", "1"]);
        assert_eq!(ids(&Query::all().apply(records)), vec!["1", "2", "3"]);
    }
}
