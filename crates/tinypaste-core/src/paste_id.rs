use crate::codec;
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Leading character reserved for secret tokens. It is never an alphabet symbol,
/// so secret tokens and encoded integer keys cannot collide.
pub const SECRET_MARKER: char = '+';

/// A marker-prefixed random identifier for a secret paste.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SecretToken(String);

impl SecretToken {
    /// Validates and wraps a token such as `"+Qa9_x"`.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        Self::validate(&token)?;
        Ok(Self(token))
    }

    /// Builds a token from its alphabet symbols, prepending the marker.
    ///
    /// Returns an error if `body` is empty or contains a non-alphabet symbol.
    pub fn from_body(body: &str) -> Result<Self> {
        let mut token = String::with_capacity(body.len() + 1);
        token.push(SECRET_MARKER);
        token.push_str(body);
        Self::new(token)
    }

    /// Wraps a token without validation.
    ///
    /// Use this only for tokens produced by trusted internal sources
    /// (e.g. token sources that only emit marker-prefixed alphabet symbols).
    pub fn new_unchecked(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the full token, marker included.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the random part of the token, without the marker.
    pub fn body(&self) -> &str {
        &self.0[SECRET_MARKER.len_utf8()..]
    }

    fn validate(token: &str) -> Result<()> {
        let Some(body) = token.strip_prefix(SECRET_MARKER) else {
            return Err(CoreError::InvalidIdentifier(format!(
                "secret token must start with '{SECRET_MARKER}': '{token}'"
            )));
        };

        if body.is_empty() {
            return Err(CoreError::InvalidIdentifier(
                "secret token has no body".to_string(),
            ));
        }

        if let Some(c) = body.chars().find(|&c| codec::digit(c).is_none()) {
            return Err(CoreError::InvalidIdentifier(format!(
                "'{c}' is not in the identifier alphabet"
            )));
        }

        Ok(())
    }
}

impl std::fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SecretToken").field(&self.0).finish()
    }
}

impl Display for SecretToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SecretToken {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<SecretToken> for String {
    fn from(value: SecretToken) -> Self {
        value.0
    }
}

/// Identifier of a stored paste.
///
/// Public pastes are addressed by the integer key the store assigned and are
/// rendered through [`codec::encode`]. Secret pastes are addressed by their token.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PasteId {
    Public(u64),
    Secret(SecretToken),
}

impl PasteId {
    /// Parses the textual form of an identifier.
    ///
    /// A leading [`SECRET_MARKER`] selects a secret token; anything else must be
    /// a canonical encoding of an integer key.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.starts_with(SECRET_MARKER) {
            SecretToken::new(raw).map(Self::Secret)
        } else {
            codec::decode(raw).map(Self::Public)
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, Self::Secret(_))
    }
}

impl Display for PasteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PasteId::Public(key) => f.write_str(&codec::encode(*key)),
            PasteId::Secret(token) => Display::fmt(token, f),
        }
    }
}

impl From<SecretToken> for PasteId {
    fn from(value: SecretToken) -> Self {
        Self::Secret(value)
    }
}

impl std::str::FromStr for PasteId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
