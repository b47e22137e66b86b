/// An authenticated user as handed to us by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub token: String,
}

/// The caller's identity for one operation. Never stored globally; every
/// operation that cares receives it explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Identity {
    #[default]
    Anonymous,
    Authenticated(Session),
}

impl Identity {
    pub fn authenticated(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Identity::Authenticated(Session {
            user_id: user_id.into(),
            token: token.into(),
        })
    }

    /// Builds an identity from optional CLI/env values. A missing or blank user
    /// id means anonymous.
    pub fn from_parts(user_id: Option<String>, token: Option<String>) -> Self {
        match user_id.filter(|id| !id.trim().is_empty()) {
            Some(user_id) => Identity::authenticated(user_id, token.unwrap_or_default()),
            None => Identity::Anonymous,
        }
    }

    /// The session, if it carries a usable (non-blank) user id.
    pub fn session(&self) -> Option<&Session> {
        match self {
            Identity::Authenticated(session) if !session.user_id.trim().is_empty() => Some(session),
            _ => None,
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.session().map(|s| s.user_id.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }
}
