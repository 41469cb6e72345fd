//! Email summary of a looked-up account.
//!
//! [`compose`] only depends on the data layer; delivery goes through the
//! [`Notifier`] trait so the SMTP transport stays out of the lookup core.

pub mod smtp;

use thiserror::Error;

use crate::data::filter::{ACCOUNT_NAME_COLUMN, ACCOUNT_NUMBER_COLUMN, BANK_COLUMN, CURRENCY_COLUMN};
use crate::data::format::format_details;
use crate::data::model::Record;

/// Shown for any field the record does not carry.
pub const PLACEHOLDER: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("email is not configured (add an [smtp] section to the config file)")]
    NotConfigured,

    #[error("smtp.username and smtp.password must be set together")]
    IncompleteCredentials,

    #[error("invalid address '{address}': {source}")]
    InvalidAddress {
        address: String,
        source: lettre::address::AddressError,
    },

    #[error("could not build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Something that can deliver an [`EmailMessage`]. One attempt per call.
pub trait Notifier {
    fn send(&self, recipient: &str, message: &EmailMessage) -> Result<(), TransportError>;
}

fn field_text(record: &Record<'_>, column: &str) -> String {
    record
        .get(column)
        .filter(|v| !v.is_null())
        .map(|v| v.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Build the summary email for a matched record.
pub fn compose(record: &Record<'_>) -> EmailMessage {
    let name = field_text(record, ACCOUNT_NAME_COLUMN);
    let number = field_text(record, ACCOUNT_NUMBER_COLUMN);
    let currency = field_text(record, CURRENCY_COLUMN);
    let bank = field_text(record, BANK_COLUMN);

    let subject = format!("Account Details for {name} ({currency})");
    let body = format!(
        "Account Name: {name}\n\
         Account Number: {number}\n\
         Currency: {currency}\n\
         Bank: {bank}\n\
         \n\
         {}",
        format_details(Some(record))
    );

    EmailMessage { subject, body }
}
