/// `UserContext` is the identity of a hub user as seen by every component after login.
///
/// Built by the `AuthN` dispatcher when a login is accepted and handed to the
/// session provisioner when the user's session is admitted.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UserContext {
    /// Normalized (lowercase) user name.
    name: String,
    /// Numeric user id assigned by the hub database.
    #[serde(default)]
    id: u64,
    /// Administrators see the whole shared users tree.
    #[serde(default)]
    admin: bool,
    /// Authentication domain the user logged in through, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    domain: Option<String>,
}

impl UserContext {
    /// Create a new `UserContext` builder
    #[must_use]
    pub fn builder() -> UserContextBuilder {
        UserContextBuilder::default()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether the user is flagged as a hub administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.admin
    }

    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Return a copy of this context with the administrator flag replaced.
    #[must_use]
    pub fn with_admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }
}

#[derive(Default)]
pub struct UserContextBuilder {
    name: Option<String>,
    id: Option<u64>,
    admin: bool,
    domain: Option<String>,
}

impl UserContextBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }

    #[must_use]
    pub fn domain(mut self, domain: &str) -> Self {
        self.domain = Some(domain.to_owned());
        self
    }

    #[must_use]
    pub fn build(self) -> UserContext {
        UserContext {
            name: self.name.unwrap_or_default(),
            id: self.id.unwrap_or_default(),
            admin: self.admin,
            domain: self.domain,
        }
    }
}
