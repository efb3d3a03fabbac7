//! Store keys are namespaced by app name: `<app>:<suffix>`.
use std::fmt;

const SEPARATOR: char = ':';
const CURRENT_SUFFIX: &str = "current";

/// Removes every character outside `[A-Za-z0-9]` from a revision token.
pub fn sanitize_revision(token: &str) -> String {
    token.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// A key into the index store.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LookupKey(String);

impl LookupKey {
    /// Key for an explicitly requested revision. The token is sanitized
    /// before it is joined to the app name.
    pub fn revision(app_name: &str, token: &str) -> Self {
        Self::join(app_name, &sanitize_revision(token))
    }

    /// Pointer key whose value names the content key of the current revision.
    pub fn current(app_name: &str) -> Self {
        Self::join(app_name, CURRENT_SUFFIX)
    }

    /// Wraps the value read from a pointer key. Pointer targets are opaque
    /// and used verbatim.
    pub fn from_pointer(target: String) -> Self {
        LookupKey(target)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn join(app_name: &str, suffix: &str) -> Self {
        LookupKey(format!("{app_name}{SEPARATOR}{suffix}"))
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
