//! User name escaping and `{username}` / `{userid}` template expansion.

use std::collections::BTreeMap;

use hub_security::UserContext;
use serde_json::Value;

/// Prefix of every escaped byte. It is escaped itself, which keeps the
/// encoding injective.
const ESCAPE_CHAR: char = '-';

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Map a user name to an identifier made only of `[a-z0-9-]`.
///
/// Lowercase ASCII letters and digits pass through. Every other character,
/// uppercase letters and the escape marker included, is replaced by `-`
/// followed by the lowercase hex of each of its UTF-8 bytes. `Bob Smith`
/// becomes `-42ob-20-53mith`.
///
/// The result never contains `/`, `\` or `.`, so it is safe as a single
/// path component.
#[must_use]
pub fn escape_identifier(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut buf = [0u8; 4];
    for c in raw.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
            continue;
        }
        for byte in c.encode_utf8(&mut buf).bytes() {
            out.push(ESCAPE_CHAR);
            out.push(char::from(HEX[usize::from(byte >> 4)]));
            out.push(char::from(HEX[usize::from(byte & 0x0f)]));
        }
    }
    out
}

/// Values substituted into templates for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpolationContext {
    username: String,
    userid: String,
}

impl InterpolationContext {
    /// Context for a user: `{username}` is the escaped name, `{userid}` the numeric id.
    #[must_use]
    pub fn for_user(user: &UserContext) -> Self {
        Self {
            username: escape_identifier(user.name()),
            userid: user.id().to_string(),
        }
    }

    /// The escaped user name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Substitute the placeholders in one string. Unknown `{...}` sequences
    /// are left as they are.
    #[must_use]
    pub fn interpolate(&self, template: &str) -> String {
        template
            .replace("{username}", &self.username)
            .replace("{userid}", &self.userid)
    }
}

/// Shape-preserving template expansion.
///
/// Every string leaf is interpolated; sequences and mappings keep their
/// length and keys; other scalars are copied. The receiver is never
/// modified, so shared template constants can be expanded for any number
/// of users.
pub trait Expand {
    #[must_use]
    fn expand(&self, ctx: &InterpolationContext) -> Self;
}

impl Expand for String {
    fn expand(&self, ctx: &InterpolationContext) -> Self {
        ctx.interpolate(self)
    }
}

impl<T: Expand> Expand for Option<T> {
    fn expand(&self, ctx: &InterpolationContext) -> Self {
        self.as_ref().map(|v| v.expand(ctx))
    }
}

impl<T: Expand> Expand for Vec<T> {
    fn expand(&self, ctx: &InterpolationContext) -> Self {
        self.iter().map(|v| v.expand(ctx)).collect()
    }
}

impl<T: Expand> Expand for BTreeMap<String, T> {
    fn expand(&self, ctx: &InterpolationContext) -> Self {
        self.iter()
            .map(|(k, v)| (k.clone(), v.expand(ctx)))
            .collect()
    }
}

impl Expand for Value {
    fn expand(&self, ctx: &InterpolationContext) -> Self {
        match self {
            Value::String(s) => Value::String(ctx.interpolate(s)),
            Value::Array(items) => Value::Array(items.iter().map(|v| v.expand(ctx)).collect()),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.expand(ctx)))
                    .collect(),
            ),
            Value::Null | Value::Bool(_) | Value::Number(_) => self.clone(),
        }
    }
}
