use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use super::{EmailMessage, Notifier, TransportError};
use crate::config::{SmtpConfig, TlsMode};

/// Sends through a single SMTP relay using the configured credentials.
pub struct SmtpNotifier {
    from: Mailbox,
    transport: SmtpTransport,
}

impl SmtpNotifier {
    pub fn from_config(config: &SmtpConfig) -> Result<Self, TransportError> {
        let from = parse_mailbox(&config.from)?;

        let builder = match config.tls {
            TlsMode::Starttls => SmtpTransport::starttls_relay(&config.host)?,
            TlsMode::Wrapper => SmtpTransport::relay(&config.host)?,
            TlsMode::None => SmtpTransport::builder_dangerous(&config.host),
        };
        let builder = builder.port(config.port());
        let builder = match (&config.username, &config.password) {
            (Some(user), Some(pass)) => {
                builder.credentials(Credentials::new(user.clone(), pass.clone()))
            }
            (None, None) => builder,
            _ => return Err(TransportError::IncompleteCredentials),
        };

        Ok(SmtpNotifier {
            from,
            transport: builder.build(),
        })
    }
}

impl Notifier for SmtpNotifier {
    fn send(&self, recipient: &str, message: &EmailMessage) -> Result<(), TransportError> {
        let email = build_message(&self.from, recipient, message)?;
        self.transport.send(&email)?;
        log::info!("sent '{}' to {recipient}", message.subject);
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, TransportError> {
    address
        .trim()
        .parse()
        .map_err(|source| TransportError::InvalidAddress {
            address: address.to_string(),
            source,
        })
}

fn build_message(
    from: &Mailbox,
    recipient: &str,
    message: &EmailMessage,
) -> Result<Message, TransportError> {
    let to = parse_mailbox(recipient)?;
    Ok(Message::builder()
        .from(from.clone())
        .to(to)
        .subject(message.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(message.body.clone())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> EmailMessage {
        EmailMessage {
            subject: "Account Details for Acme (USD)".into(),
            body: "Account Name: Acme\n".into(),
        }
    }

    #[test]
    fn builds_plain_text_message() {
        let from = parse_mailbox("Accounts <accounts@example.com>").unwrap();
        let email = build_message(&from, "treasury@example.com", &message()).unwrap();
        let raw = String::from_utf8(email.formatted()).unwrap();
        assert!(raw.contains("Subject: Account Details for Acme (USD)"));
        assert!(raw.contains("To: treasury@example.com"));
        assert!(raw.contains("text/plain"));
    }

    #[test]
    fn bad_recipient_is_rejected_before_sending() {
        let from = parse_mailbox("accounts@example.com").unwrap();
        let result = build_message(&from, "not an address", &message());
        assert!(matches!(
            result,
            Err(TransportError::InvalidAddress { address, .. }) if address == "not an address"
        ));
    }

    #[test]
    fn invalid_sender_fails_configuration() {
        let config = SmtpConfig {
            host: "localhost".into(),
            tls: TlsMode::None,
            from: "nobody".into(),
            ..SmtpConfig::default()
        };
        assert!(matches!(
            SmtpNotifier::from_config(&config),
            Err(TransportError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn half_configured_login_is_refused() {
        let username_only = SmtpConfig {
            host: "localhost".into(),
            tls: TlsMode::None,
            username: Some("user@example.com".into()),
            from: "accounts@example.com".into(),
            ..SmtpConfig::default()
        };
        assert!(matches!(
            SmtpNotifier::from_config(&username_only),
            Err(TransportError::IncompleteCredentials)
        ));

        let password_only = SmtpConfig {
            username: None,
            password: Some("secret".into()),
            ..username_only
        };
        assert!(matches!(
            SmtpNotifier::from_config(&password_only),
            Err(TransportError::IncompleteCredentials)
        ));
    }

    #[test]
    fn unreachable_relay_surfaces_transport_error() {
        let config = SmtpConfig {
            host: "127.0.0.1".into(),
            port: Some(1),
            tls: TlsMode::None,
            from: "accounts@example.com".into(),
            ..SmtpConfig::default()
        };
        let notifier = SmtpNotifier::from_config(&config).unwrap();
        let result = notifier.send("treasury@example.com", &message());
        assert!(matches!(result, Err(TransportError::Smtp(_))));
    }
}
