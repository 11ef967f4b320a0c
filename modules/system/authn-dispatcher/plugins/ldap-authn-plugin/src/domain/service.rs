//! Search-then-bind login flow against one directory server.

use std::sync::Arc;

use authn_dispatcher_sdk::{AuthNDispatcherError, Credentials};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use super::directory::{DirectoryConnector, DirectoryError, DirectorySession, ServerProfile};
use crate::config::LookupMode;

/// Service account used for the user search.
pub struct SearchAccount {
    pub dn: String,
    pub password: SecretString,
}

/// Directory `AuthN` backend service.
pub struct Service {
    pub(crate) server: ServerProfile,
    pub(crate) mode: LookupMode,
    pub(crate) bind_dn_templates: Vec<String>,
    pub(crate) user_search_base: String,
    pub(crate) search_filter: String,
    pub(crate) search_account: Option<SearchAccount>,
    pub(crate) user_attribute: String,
    pub(crate) user_dn_attribute: String,
    pub(crate) valid_username: Regex,
    pub(crate) connector: Arc<dyn DirectoryConnector>,
}

impl Service {
    #[must_use]
    pub fn server(&self) -> &ServerProfile {
        &self.server
    }

    /// Verify credentials and return the login name on success.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if the user name is malformed, the password is empty,
    ///   the user cannot be found, or no bind template accepts the password
    /// - `ServiceUnavailable` if the directory cannot be reached
    /// - `Internal` if the search account is rejected or the directory answers
    ///   unexpectedly
    #[tracing::instrument(skip_all, fields(server = %self.server.address, username = %credentials.username))]
    pub async fn verify(&self, credentials: &Credentials) -> Result<String, AuthNDispatcherError> {
        let username = credentials.username.as_str();

        if credentials.password.expose_secret().is_empty() {
            return Err(unauthorized("empty password"));
        }
        if !self.valid_username.is_match(username) {
            warn!(username = %username, "Username does not match the valid username pattern");
            return Err(unauthorized("invalid username"));
        }

        let resolved = match self.mode {
            LookupMode::DirectBind => username.to_owned(),
            LookupMode::SearchThenBind => self.resolve_username(username).await?,
        };

        self.bind_as_user(&resolved, &credentials.password).await?;
        debug!(resolved = %resolved, "Directory bind succeeded");
        Ok(username.to_owned())
    }

    /// Render the search filter for a login name.
    #[must_use]
    pub fn search_filter_for(&self, login: &str) -> String {
        self.search_filter
            .replace("{login_attr}", &self.user_attribute)
            .replace("{login}", &escape_filter_value(login))
    }

    async fn resolve_username(&self, login: &str) -> Result<String, AuthNDispatcherError> {
        let mut session = self.open_session().await?;

        if let Some(account) = &self.search_account {
            session
                .simple_bind(&account.dn, &account.password)
                .await
                .map_err(|e| match e {
                    DirectoryError::InvalidCredentials => {
                        AuthNDispatcherError::Internal("search account was rejected".to_owned())
                    }
                    other => map_directory_error(other),
                })?;
        }

        let filter = self.search_filter_for(login);
        let entries = session
            .search(
                &self.user_search_base,
                &filter,
                &[self.user_dn_attribute.as_str()],
            )
            .await
            .map_err(map_directory_error)?;

        let entry = match entries.as_slice() {
            [entry] => entry,
            [] => {
                warn!(filter = %filter, "No directory entry found for user");
                return Err(unauthorized("user not found"));
            }
            _ => {
                warn!(filter = %filter, matches = entries.len(), "User lookup matched several entries");
                return Err(unauthorized("ambiguous user"));
            }
        };

        match entry.values(&self.user_dn_attribute) {
            [value] => Ok(value.clone()),
            [] => {
                warn!(dn = %entry.dn, attribute = %self.user_dn_attribute, "Directory entry lacks lookup attribute");
                Err(unauthorized("user not found"))
            }
            values => {
                warn!(
                    dn = %entry.dn,
                    attribute = %self.user_dn_attribute,
                    values = values.len(),
                    "Lookup attribute has several values"
                );
                Err(unauthorized("ambiguous user"))
            }
        }
    }

    async fn bind_as_user(
        &self,
        resolved: &str,
        password: &SecretString,
    ) -> Result<(), AuthNDispatcherError> {
        for template in &self.bind_dn_templates {
            let dn = render_bind_dn(template, resolved);
            let mut session = self.open_session().await?;
            match session.simple_bind(&dn, password).await {
                Ok(()) => return Ok(()),
                Err(DirectoryError::InvalidCredentials) => {
                    debug!(dn = %dn, "Bind rejected, trying next template");
                }
                Err(other) => return Err(map_directory_error(other)),
            }
        }

        warn!(username = %resolved, "Invalid password for user");
        Err(unauthorized("invalid credentials"))
    }

    async fn open_session(&self) -> Result<Box<dyn DirectorySession>, AuthNDispatcherError> {
        self.connector.connect(&self.server).await.map_err(|e| {
            warn!(port = self.server.port, error = %e, "Cannot open directory session");
            map_directory_error(e)
        })
    }
}

/// Substitute the resolved user name into a bind DN template.
#[must_use]
pub fn render_bind_dn(template: &str, username: &str) -> String {
    template.replace("{username}", username)
}

/// Escape a value for use inside a search filter (RFC 4515).
#[must_use]
pub fn escape_filter_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str(r"\5c"),
            '*' => out.push_str(r"\2a"),
            '(' => out.push_str(r"\28"),
            ')' => out.push_str(r"\29"),
            '\0' => out.push_str(r"\00"),
            _ => out.push(c),
        }
    }
    out
}

fn unauthorized(reason: &str) -> AuthNDispatcherError {
    AuthNDispatcherError::Unauthorized(reason.to_owned())
}

fn map_directory_error(e: DirectoryError) -> AuthNDispatcherError {
    match e {
        DirectoryError::InvalidCredentials => unauthorized("invalid credentials"),
        DirectoryError::Unavailable(msg) => AuthNDispatcherError::ServiceUnavailable(msg),
        DirectoryError::Protocol(msg) => AuthNDispatcherError::Internal(msg),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use async_trait::async_trait;
    use tracing_test::traced_test;

    use super::*;

    struct Unreachable;

    #[async_trait]
    impl DirectoryConnector for Unreachable {
        async fn connect(
            &self,
            _server: &ServerProfile,
        ) -> Result<Box<dyn DirectorySession>, DirectoryError> {
            Err(DirectoryError::Unavailable("connection refused".to_owned()))
        }
    }

    fn service() -> Service {
        Service {
            server: ServerProfile {
                address: "tmw.com".to_owned(),
                port: 636,
                use_ssl: true,
            },
            mode: LookupMode::DirectBind,
            bind_dn_templates: vec![r"tmw\{username}".to_owned()],
            user_search_base: "DC=tmw".to_owned(),
            search_filter: "({login_attr}={login})".to_owned(),
            search_account: None,
            user_attribute: "sAMAccountName".to_owned(),
            user_dn_attribute: "sAMAccountName".to_owned(),
            valid_username: Regex::new(crate::config::DEFAULT_VALID_USERNAME_REGEX).unwrap(),
            connector: Arc::new(Unreachable),
        }
    }

    fn credentials(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.to_owned(),
            password: SecretString::from(password.to_owned()),
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn malformed_username_is_logged_and_rejected() {
        let err = service()
            .verify(&credentials("bob", "hunter22"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthNDispatcherError::Unauthorized(_)));
        assert!(logs_contain("Username does not match the valid username pattern"));
        assert!(!logs_contain("hunter22"));
    }

    #[tokio::test]
    #[traced_test]
    async fn unreachable_server_keeps_password_out_of_logs() {
        let err = service()
            .verify(&credentials("alice01", "hunter22"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthNDispatcherError::ServiceUnavailable(_)));
        assert!(logs_contain("Cannot open directory session"));
        assert!(logs_contain("server=tmw.com"));
        assert!(!logs_contain("hunter22"));
    }

    #[test]
    fn escape_filter_value_escapes_special_characters() {
        assert_eq!(escape_filter_value("alice"), "alice");
        assert_eq!(escape_filter_value("a*"), r"a\2a");
        assert_eq!(escape_filter_value("(x)"), r"\28x\29");
        assert_eq!(escape_filter_value(r"tmw\alice"), r"tmw\5calice");
        assert_eq!(escape_filter_value("a\0b"), r"a\00b");
    }

    #[test]
    fn render_bind_dn_substitutes_username() {
        assert_eq!(render_bind_dn(r"tmw\{username}", "alice01"), r"tmw\alice01");
        assert_eq!(
            render_bind_dn("uid={username},ou=people,dc=tmw", "alice01"),
            "uid=alice01,ou=people,dc=tmw"
        );
    }

    #[test]
    fn map_directory_error_classifies_failures() {
        assert!(matches!(
            map_directory_error(DirectoryError::InvalidCredentials),
            AuthNDispatcherError::Unauthorized(_)
        ));
        assert!(matches!(
            map_directory_error(DirectoryError::Unavailable("down".to_owned())),
            AuthNDispatcherError::ServiceUnavailable(_)
        ));
        assert!(matches!(
            map_directory_error(DirectoryError::Protocol("bad".to_owned())),
            AuthNDispatcherError::Internal(_)
        ));
    }
}
