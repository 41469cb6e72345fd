use thiserror::Error;

use super::model::{Record, Table};

pub const ACCOUNT_NAME_COLUMN: &str = "ACCOUNT NAME";
pub const CURRENCY_COLUMN: &str = "CURRENCIES";
pub const ACCOUNT_NUMBER_COLUMN: &str = "ACCOUNT NUMBER";
pub const BANK_COLUMN: &str = "BANK";

// ---------------------------------------------------------------------------
// Filter criteria: which account name / currency the user picked
// ---------------------------------------------------------------------------

/// The user's selection. `None` and `Some("")` both mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub account_name: Option<String>,
    pub currency: Option<String>,
}

impl FilterCriteria {
    pub fn new(account_name: impl Into<String>, currency: impl Into<String>) -> Self {
        FilterCriteria {
            account_name: Some(account_name.into()),
            currency: Some(currency.into()),
        }
    }

    /// `(column, expected value)` for every non-empty field.
    fn constraints(&self) -> Vec<(&'static str, &str)> {
        [
            (ACCOUNT_NAME_COLUMN, self.account_name.as_deref()),
            (CURRENCY_COLUMN, self.currency.as_deref()),
        ]
        .into_iter()
        .filter_map(|(col, val)| match val {
            Some(v) if !v.is_empty() => Some((col, v)),
            _ => None,
        })
        .collect()
    }
}

/// Why a lookup produced no record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("no account name or currency selected")]
    NoCriteria,

    #[error("column '{0}' not found in the loaded sheet")]
    MissingColumn(String),

    #[error("no matching account details found")]
    NotFound,
}

/// Return the first record, in table order, whose constrained fields equal
/// the criteria exactly.
///
/// * No active criteria → [`LookupError::NoCriteria`]; the table is not scanned.
/// * An active criterion whose column is absent → [`LookupError::MissingColumn`].
/// * Nothing matches → [`LookupError::NotFound`].
pub fn find<'a>(table: &'a Table, criteria: &FilterCriteria) -> Result<Record<'a>, LookupError> {
    let constraints = criteria.constraints();
    if constraints.is_empty() {
        return Err(LookupError::NoCriteria);
    }

    if let Some((col, _)) = constraints.iter().find(|(col, _)| !table.has_column(col)) {
        return Err(LookupError::MissingColumn(col.to_string()));
    }
    log::debug!("looking up {constraints:?} in {} rows", table.len());

    let found = table.records().find(|record| {
        constraints.iter().all(|(col, expected)| {
            record
                .get(col)
                .is_some_and(|value| value.matches_text(expected))
        })
    });

    match found {
        Some(record) => {
            log::debug!("matched row {}", record.index());
            Ok(record)
        }
        None => Err(LookupError::NotFound),
    }
}
