use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::Config;
use crate::data::filter::{find, FilterCriteria, LookupError};
use crate::data::format::{format_details, NO_DETAILS};
use crate::data::loader::load_file;
use crate::data::model::{Record, Table};
use crate::diagram::{maker_checker, to_drawio_xml};
use crate::notify::smtp::SmtpNotifier;
use crate::notify::{compose, Notifier, TransportError};

// ---------------------------------------------------------------------------
// Session: one loaded sheet
// ---------------------------------------------------------------------------

/// The sheet the user is currently working with. Replaced wholesale on
/// every load, never edited in place.
#[derive(Debug)]
pub struct Session {
    pub source: PathBuf,
    pub table: Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub level: StatusLevel,
    pub text: String,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: Config,

    /// Loaded sheet (None until a file loads successfully).
    pub session: Option<Session>,

    /// Selected account name; empty means no constraint.
    pub account_name: String,

    /// Selected currency; empty means no constraint.
    pub currency: String,

    /// Row of the last successful lookup.
    pub matched_row: Option<usize>,

    /// Set by a successful lookup until the preview has scrolled to it.
    scroll_pending: bool,

    /// Text shown in the details panel.
    pub details: String,

    pub recipient: String,

    /// Status / error message shown in the UI.
    pub status: Option<Status>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let recipient = config
            .smtp
            .as_ref()
            .and_then(|s| s.default_recipient.clone())
            .unwrap_or_default();
        Self {
            config,
            session: None,
            account_name: String::new(),
            currency: String::new(),
            matched_row: None,
            scroll_pending: false,
            details: String::new(),
            recipient,
            status: None,
        }
    }

    fn set_status(&mut self, level: StatusLevel, text: impl Into<String>) {
        let text = text.into();
        match level {
            StatusLevel::Info => log::info!("{text}"),
            StatusLevel::Warning => log::warn!("{text}"),
            StatusLevel::Error => log::error!("{text}"),
        }
        self.status = Some(Status { level, text });
    }

    fn clear_results(&mut self) {
        self.matched_row = None;
        self.scroll_pending = false;
        self.details.clear();
    }

    /// The matched row, once per successful lookup. The sheet preview
    /// scrolls to it a single time and is then left to the user.
    pub fn take_scroll_target(&mut self) -> Option<usize> {
        if std::mem::take(&mut self.scroll_pending) {
            self.matched_row
        } else {
            None
        }
    }

    /// Load a sheet, replacing whatever was loaded before. A failed load
    /// leaves no sheet at all.
    pub fn open(&mut self, path: &Path) {
        self.account_name.clear();
        self.currency.clear();
        self.clear_results();

        match load_file(path) {
            Ok(table) => {
                let text = format!(
                    "Loaded {} rows with columns {:?} from {}",
                    table.len(),
                    table.columns(),
                    path.display()
                );
                self.session = Some(Session {
                    source: path.to_path_buf(),
                    table,
                });
                self.set_status(StatusLevel::Info, text);
            }
            Err(e) => {
                self.session = None;
                self.set_status(
                    StatusLevel::Error,
                    format!("Error: could not load {}: {e}", path.display()),
                );
            }
        }
    }

    pub fn table(&self) -> Option<&Table> {
        self.session.as_ref().map(|s| &s.table)
    }

    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new(self.account_name.clone(), self.currency.clone())
    }

    /// `""` followed by the distinct values of `column`, or `None` when the
    /// sheet has no such column.
    pub fn choices(&self, column: &str) -> Option<Vec<String>> {
        let values = self.table()?.unique_values(column)?;
        Some(
            std::iter::once(String::new())
                .chain(values.iter().map(|v| v.to_string()))
                .collect(),
        )
    }

    /// Look up the current selection and render the result.
    pub fn retrieve(&mut self) {
        let Some(session) = &self.session else {
            self.set_status(StatusLevel::Warning, "Please upload an account sheet first.");
            return;
        };

        let outcome = find(&session.table, &self.criteria())
            .map(|record| (record.index(), format_details(Some(&record))));

        match outcome {
            Ok((row, details)) => {
                self.matched_row = Some(row);
                self.scroll_pending = true;
                self.details = details;
                self.status = None;
            }
            Err(e) => {
                self.matched_row = None;
                self.scroll_pending = false;
                self.details = NO_DETAILS.to_string();
                match e {
                    LookupError::NoCriteria => self.set_status(
                        StatusLevel::Warning,
                        "Please select an Account Name or Currency.",
                    ),
                    LookupError::NotFound => {
                        self.set_status(StatusLevel::Warning, "No matching account details found.")
                    }
                    LookupError::MissingColumn(col) => self.set_status(
                        StatusLevel::Error,
                        format!("Error: Column '{col}' not found in the Excel file."),
                    ),
                }
            }
        }
    }

    pub fn matched_record(&self) -> Option<Record<'_>> {
        self.table()?.record(self.matched_row?)
    }

    /// Email the matched record to `self.recipient` through `notifier`.
    pub fn send_email(&mut self, notifier: &dyn Notifier) {
        let Some(record) = self.matched_record() else {
            self.set_status(StatusLevel::Warning, "Retrieve account details before sending.");
            return;
        };
        let message = compose(&record);
        let recipient = self.recipient.trim().to_string();

        match notifier.send(&recipient, &message) {
            Ok(()) => self.set_status(StatusLevel::Info, format!("Email sent to {recipient}.")),
            Err(e) => self.set_status(StatusLevel::Error, format!("Error sending email: {e}")),
        }
    }

    /// Email through the SMTP relay from the config file.
    pub fn send_email_smtp(&mut self) {
        let notifier = match &self.config.smtp {
            Some(smtp) => SmtpNotifier::from_config(smtp),
            None => Err(TransportError::NotConfigured),
        };
        match notifier {
            Ok(notifier) => self.send_email(&notifier),
            Err(e) => self.set_status(StatusLevel::Error, format!("Error sending email: {e}")),
        }
    }

    /// Write the maker-checker diagram to `path`.
    pub fn export_diagram(&mut self, path: &Path) {
        match write_diagram(path) {
            Ok(()) => self.set_status(
                StatusLevel::Info,
                format!("Diagram written to {}", path.display()),
            ),
            Err(e) => self.set_status(StatusLevel::Error, format!("Error: {e:#}")),
        }
    }
}

fn write_diagram(path: &Path) -> Result<()> {
    let xml = to_drawio_xml(&maker_checker()).context("generating diagram")?;
    std::fs::write(path, xml).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::tests::RecordingNotifier;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/data")
            .join(name)
    }

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.open(&fixture("accounts.csv"));
        assert!(state.session.is_some());
        state
    }

    #[test]
    fn retrieve_renders_first_match() {
        let mut state = loaded();
        state.account_name = "Acme".into();
        state.retrieve();

        assert_eq!(state.matched_row, Some(0));
        assert!(state.details.starts_with("Account Details:\n- ACCOUNT NAME: Acme\n"));
        assert!(state.status.is_none());
    }

    #[test]
    fn empty_selection_prompts_instead_of_failing() {
        let mut state = loaded();
        state.retrieve();

        assert_eq!(state.matched_row, None);
        assert_eq!(state.details, NO_DETAILS);
        let status = state.status.unwrap();
        assert_eq!(status.level, StatusLevel::Warning);
        assert_eq!(status.text, "Please select an Account Name or Currency.");
    }

    #[test]
    fn no_match_is_a_warning() {
        let mut state = loaded();
        state.account_name = "Acme".into();
        state.currency = "GBP".into();
        state.retrieve();

        assert_eq!(state.details, NO_DETAILS);
        assert_eq!(state.status.unwrap().text, "No matching account details found.");
    }

    #[test]
    fn missing_column_is_an_error() {
        let mut state = AppState::default();
        state.session = Some(Session {
            source: PathBuf::from("memory"),
            table: Table::new(vec!["ACCOUNT NAME".into()], vec![]),
        });
        state.currency = "USD".into();
        state.retrieve();

        let status = state.status.unwrap();
        assert_eq!(status.level, StatusLevel::Error);
        assert!(status.text.contains("CURRENCIES"));
    }

    #[test]
    fn failed_reload_drops_previous_sheet() {
        let mut state = loaded();
        state.account_name = "Acme".into();
        state.retrieve();
        assert!(state.matched_row.is_some());

        state.open(&fixture("missing.xlsx"));
        assert!(state.session.is_none());
        assert!(state.matched_row.is_none());
        assert!(state.account_name.is_empty());
        assert_eq!(state.status.unwrap().level, StatusLevel::Error);
    }

    #[test]
    fn reload_replaces_sheet() {
        let mut state = loaded();
        state.open(&fixture("accounts.json"));
        let session = state.session.as_ref().unwrap();
        assert!(session.source.ends_with("accounts.json"));
        assert_eq!(session.table.len(), 2);
    }

    #[test]
    fn choices_start_with_no_constraint() {
        let state = loaded();
        assert_eq!(
            state.choices("CURRENCIES").unwrap(),
            vec!["", "USD", "EUR", "GBP"]
        );
        assert!(state.choices("NO SUCH COLUMN").is_none());
    }

    #[test]
    fn preview_scrolls_to_each_new_match_once() {
        let mut state = loaded();
        assert_eq!(state.take_scroll_target(), None);

        state.currency = "EUR".into();
        state.retrieve();
        assert_eq!(state.take_scroll_target(), Some(1));
        assert_eq!(state.take_scroll_target(), None);
        assert_eq!(state.matched_row, Some(1));

        // the same lookup again scrolls again
        state.retrieve();
        assert_eq!(state.take_scroll_target(), Some(1));

        state.currency = "JPY".into();
        state.retrieve();
        assert_eq!(state.take_scroll_target(), None);

        state.currency = "GBP".into();
        state.retrieve();
        state.open(&fixture("accounts.json"));
        assert_eq!(state.take_scroll_target(), None);
    }

    #[test]
    fn retrieve_without_sheet_warns() {
        let mut state = AppState::default();
        state.account_name = "Acme".into();
        state.retrieve();
        assert_eq!(state.status.unwrap().level, StatusLevel::Warning);
    }

    #[test]
    fn email_goes_to_recipient() {
        let mut state = loaded();
        state.account_name = "Acme".into();
        state.currency = "EUR".into();
        state.recipient = " treasury@example.com ".into();
        state.retrieve();

        let notifier = RecordingNotifier::default();
        state.send_email(&notifier);

        let sent = notifier.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "treasury@example.com");
        assert_eq!(sent[0].1.subject, "Account Details for Acme (EUR)");
        assert_eq!(state.status.unwrap().level, StatusLevel::Info);
    }

    #[test]
    fn email_requires_a_match() {
        let mut state = loaded();
        let notifier = RecordingNotifier::default();
        state.send_email(&notifier);
        assert!(notifier.sent.borrow().is_empty());
        assert_eq!(state.status.unwrap().level, StatusLevel::Warning);
    }

    #[test]
    fn transport_failure_is_reported() {
        let mut state = loaded();
        state.currency = "GBP".into();
        state.retrieve();

        let notifier = RecordingNotifier {
            fail: true,
            ..RecordingNotifier::default()
        };
        state.send_email(&notifier);
        let status = state.status.unwrap();
        assert_eq!(status.level, StatusLevel::Error);
        assert!(status.text.starts_with("Error sending email"));
    }

    #[test]
    fn smtp_without_config_is_reported() {
        let mut state = loaded();
        state.currency = "GBP".into();
        state.retrieve();
        state.send_email_smtp();
        let status = state.status.unwrap();
        assert_eq!(status.level, StatusLevel::Error);
        assert!(status.text.contains("not configured"));
    }

    #[test]
    fn diagram_is_written_to_disk() {
        let path = std::env::temp_dir().join(format!(
            "account-lookup-{}-{}",
            std::process::id(),
            crate::diagram::DIAGRAM_FILE_NAME
        ));
        let mut state = AppState::default();
        state.export_diagram(&path);
        let xml = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(xml.contains("<mxfile"));
        assert_eq!(state.status.unwrap().level, StatusLevel::Info);
    }
}
