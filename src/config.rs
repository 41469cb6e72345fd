use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("only one of smtp.password and smtp.password_cmd may be specified")]
    AmbiguousPassword,

    #[error("smtp.username needs smtp.password or smtp.password_cmd, and vice versa")]
    IncompleteCredentials,

    #[error("smtp.password_cmd failed: {0}")]
    PasswordCommand(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub smtp: Option<SmtpConfig>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    #[default]
    Starttls,
    /// TLS from the first byte (SMTPS).
    Wrapper,
    None,
}

impl TlsMode {
    pub fn default_port(self) -> u16 {
        match self {
            TlsMode::Starttls => 587,
            TlsMode::Wrapper => 465,
            TlsMode::None => 25,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: Option<u16>,
    #[serde(default)]
    pub tls: TlsMode,
    pub username: Option<String>,
    pub password: Option<String>,
    pub password_cmd: Option<String>,
    /// Sender mailbox, e.g. `Accounts <accounts@example.com>`.
    pub from: String,

    /// Prefills the recipient field in the UI.
    pub default_recipient: Option<String>,
}

impl SmtpConfig {
    pub fn port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.tls.default_port())
    }
}

/// `~/.config/account-lookup/config.toml` on Linux, the platform equivalent elsewhere.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("account-lookup").join("config.toml"))
}

/// Load the config at `path`. A missing file is not an error: email is
/// simply left unconfigured.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        log::info!("no config at {}, email disabled", path.display());
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config = parse(&content)?;
    expand_password(&mut config)?;
    Ok(config)
}

pub fn parse(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    if let Some(smtp) = &config.smtp {
        let has_secret = smtp.password.is_some() || smtp.password_cmd.is_some();
        if smtp.password.is_some() && smtp.password_cmd.is_some() {
            return Err(ConfigError::AmbiguousPassword);
        }
        if smtp.username.is_some() != has_secret {
            return Err(ConfigError::IncompleteCredentials);
        }
    }
    Ok(config)
}

/// Run `password_cmd` if present and store its output as the password.
fn expand_password(config: &mut Config) -> Result<(), ConfigError> {
    let Some(smtp) = &mut config.smtp else {
        return Ok(());
    };
    let Some(cmd) = &smtp.password_cmd else {
        return Ok(());
    };

    let output = Command::new("sh")
        .arg("-c")
        .arg(cmd)
        .output()
        .map_err(|e| ConfigError::PasswordCommand(e.to_string()))?;
    if !output.status.success() {
        return Err(ConfigError::PasswordCommand(format!(
            "exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    smtp.password = Some(String::from_utf8_lossy(&output.stdout).trim().to_string());
    smtp.password_cmd = None;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_has_no_smtp() {
        let config = parse("").unwrap();
        assert!(config.smtp.is_none());
    }

    #[test]
    fn smtp_section_with_defaults() {
        let config = parse(
            r#"
            [smtp]
            host = "smtp.example.com"
            username = "user@example.com"
            password = "secret"
            from = "Accounts <accounts@example.com>"
            "#,
        )
        .unwrap();
        let smtp = config.smtp.unwrap();
        assert_eq!(smtp.tls, TlsMode::Starttls);
        assert_eq!(smtp.port(), 587);
        assert_eq!(smtp.default_recipient, None);
    }

    #[test]
    fn explicit_tls_mode_and_port() {
        let config = parse(
            r#"
            [smtp]
            host = "localhost"
            tls = "none"
            port = 2525
            from = "a@example.com"
            "#,
        )
        .unwrap();
        let smtp = config.smtp.unwrap();
        assert_eq!(smtp.tls, TlsMode::None);
        assert_eq!(smtp.port(), 2525);
    }

    #[test]
    fn password_and_command_are_exclusive() {
        let result = parse(
            r#"
            [smtp]
            host = "smtp.example.com"
            password = "secret"
            password_cmd = "echo secret"
            from = "a@example.com"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::AmbiguousPassword)));
    }

    #[test]
    fn username_and_secret_come_together() {
        let username_only = parse(
            r#"
            [smtp]
            host = "smtp.example.com"
            username = "user@example.com"
            from = "a@example.com"
            "#,
        );
        assert!(matches!(username_only, Err(ConfigError::IncompleteCredentials)));

        let command_only = parse(
            r#"
            [smtp]
            host = "smtp.example.com"
            password_cmd = "pass show smtp"
            from = "a@example.com"
            "#,
        );
        assert!(matches!(command_only, Err(ConfigError::IncompleteCredentials)));

        let with_command = parse(
            r#"
            [smtp]
            host = "smtp.example.com"
            username = "user@example.com"
            password_cmd = "pass show smtp"
            from = "a@example.com"
            "#,
        );
        assert!(with_command.is_ok());
    }

    #[test]
    fn unknown_tls_mode_is_rejected() {
        let result = parse(
            r#"
            [smtp]
            host = "smtp.example.com"
            tls = "ssl3"
            from = "a@example.com"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("account-lookup-no-such-config.toml");
        let config = load(&path).unwrap();
        assert!(config.smtp.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn password_cmd_output_becomes_password() {
        let mut config = parse(
            r#"
            [smtp]
            host = "smtp.example.com"
            username = "user@example.com"
            password_cmd = "echo '  hunter2  '"
            from = "a@example.com"
            "#,
        )
        .unwrap();
        expand_password(&mut config).unwrap();
        let smtp = config.smtp.unwrap();
        assert_eq!(smtp.password.as_deref(), Some("hunter2"));
        assert!(smtp.password_cmd.is_none());
    }
}
