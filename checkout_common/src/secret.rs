use std::fmt;

/// Wrapper for gateway credentials (API client secrets, carrier passwords) so they cannot leak through `Debug`
/// or `Display` output. The config structs that hold them are logged at startup; a `Secret<String>` field shows
/// up as `[redacted]`.
///
/// The wrapped value is only reachable through [`reveal`](Secret::reveal), which keeps the places a credential
/// is actually used easy to grep for.
#[derive(Clone, Default)]
pub struct Secret<T>(T);

impl<T> Secret<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrows the secret value. Hand the result straight to its consumer (header builder, login payload)
    /// rather than storing it somewhere it might get logged.
    pub fn reveal(&self) -> &T {
        &self.0
    }
}

impl<T> From<T> for Secret<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[redacted]")
    }
}

impl<T> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[redacted]")
    }
}
