use std::collections::{BTreeMap, HashSet};
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the loaded sheet
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring what a spreadsheet can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// ISO-8601 date (or date-time) kept as text.
    Date(String),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => write!(f, "<null>"),
            other => match other.as_text() {
                Some(text) => write!(f, "{text}"),
                None => Ok(()),
            },
        }
    }
}

impl CellValue {
    /// Canonical text form used for criteria comparison.
    /// `Null` has no text form and therefore never matches anything.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::String(s) | CellValue::Date(s) => Some(s.clone()),
            CellValue::Integer(i) => Some(i.to_string()),
            CellValue::Float(v) => Some(v.to_string()),
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Null => None,
        }
    }

    /// Exact, case-sensitive equality against user supplied text.
    pub fn matches_text(&self, expected: &str) -> bool {
        match self {
            CellValue::String(s) | CellValue::Date(s) => s == expected,
            CellValue::Null => false,
            other => other.as_text().is_some_and(|t| t == expected),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded sheet
// ---------------------------------------------------------------------------

/// The full parsed sheet with a pre-computed distinct-value index.
///
/// Every row holds exactly `columns.len()` cells. A `Table` is never
/// mutated after construction; a new upload produces a new `Table`.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
    /// For each column its distinct non-null values in first-appearance
    /// order, distinct by text form.
    unique_values: BTreeMap<String, Vec<CellValue>>,
}

impl Table {
    /// Build a table from a header and its rows. Rows are padded with
    /// `Null` or truncated to the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows: Vec<Vec<CellValue>> = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Null);
                row
            })
            .collect();

        let mut unique_values: BTreeMap<String, Vec<CellValue>> = BTreeMap::new();
        for (i, col) in columns.iter().enumerate() {
            let mut seen: HashSet<String> = HashSet::new();
            let values = rows
                .iter()
                .filter_map(|row| row.get(i))
                .filter(|val| val.as_text().is_some_and(|text| seen.insert(text)))
                .cloned()
                .collect();
            unique_values.insert(col.clone(), values);
        }

        Table {
            columns,
            rows,
            unique_values,
        }
    }

    /// Ordered column names, exactly as in the header row.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Distinct non-null values of a column in sheet order.
    pub fn unique_values(&self, column: &str) -> Option<&[CellValue]> {
        self.unique_values.get(column).map(Vec::as_slice)
    }

    /// Borrow the row at `index`.
    pub fn record(&self, index: usize) -> Option<Record<'_>> {
        self.rows.get(index).map(|values| Record {
            index,
            columns: &self.columns,
            values,
        })
    }

    /// All rows in original order.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().enumerate().map(|(index, values)| Record {
            index,
            columns: &self.columns,
            values,
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Record – a borrowed view of one row
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    index: usize,
    columns: &'a [String],
    values: &'a [CellValue],
}

impl<'a> Record<'a> {
    /// Position of this row in the source table.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get(&self, column: &str) -> Option<&'a CellValue> {
        let values = self.values;
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| values.get(i))
    }

    /// `(column, value)` pairs in table column order.
    pub fn fields(&self) -> impl Iterator<Item = (&'a str, &'a CellValue)> {
        let (columns, values) = (self.columns, self.values);
        columns.iter().map(String::as_str).zip(values.iter())
    }

    /// Whether the sheet had no columns at all.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    #[test]
    fn text_form_matches_exactly() {
        assert!(s("Acme").matches_text("Acme"));
        assert!(!s("Acme").matches_text("acme"));
        assert!(!s("Acme ").matches_text("Acme"));
        assert!(CellValue::Integer(123).matches_text("123"));
        assert!(CellValue::Float(1.5).matches_text("1.5"));
        assert!(!CellValue::Null.matches_text(""));
        assert!(!CellValue::Null.matches_text("<null>"));
    }

    #[test]
    fn rows_are_padded_to_header_width() {
        let table = Table::new(
            vec!["A".into(), "B".into()],
            vec![vec![s("x")], vec![s("y"), s("z"), s("dropped")]],
        );
        let first = table.record(0).unwrap();
        assert_eq!(first.fields().count(), 2);
        assert_eq!(first.get("B"), Some(&CellValue::Null));
        let second = table.record(1).unwrap();
        assert_eq!(second.fields().count(), 2);
        assert_eq!(second.get("B"), Some(&s("z")));
    }

    #[test]
    fn unique_values_skip_nulls_and_keep_sheet_order() {
        let table = Table::new(
            vec!["CUR".into()],
            vec![vec![s("USD")], vec![s("EUR")], vec![CellValue::Null], vec![s("USD")]],
        );
        let values: Vec<String> = table
            .unique_values("CUR")
            .unwrap()
            .iter()
            .map(|v| v.to_string())
            .collect();
        assert_eq!(values, vec!["USD", "EUR"]);
    }

    #[test]
    fn unique_values_are_distinct_by_text() {
        let table = Table::new(
            vec!["ACCOUNT NUMBER".into()],
            vec![
                vec![s("456")],
                vec![CellValue::Integer(123)],
                vec![s("123")],
                vec![CellValue::Integer(456)],
            ],
        );
        assert_eq!(
            table.unique_values("ACCOUNT NUMBER").unwrap(),
            [s("456"), CellValue::Integer(123)]
        );
        assert!(table.unique_values("MISSING").is_none());
    }

    #[test]
    fn record_fields_follow_column_order() {
        let table = Table::new(
            vec!["Z".into(), "A".into()],
            vec![vec![s("last"), s("first")]],
        );
        let names: Vec<&str> = table.record(0).unwrap().fields().map(|(c, _)| c).collect();
        assert_eq!(names, vec!["Z", "A"]);
    }
}
