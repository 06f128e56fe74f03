use secrecy::{ExposeSecret, SecretString};

/// A key passphrase, kept out of debug output.
///
/// Wraps [`secrecy::SecretString`] so the passphrase is never printed by
/// `Debug` and is zeroized on drop rather than lingering in freed memory.
pub struct Passphrase(SecretString);

impl Passphrase {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(SecretString::from(secret.into()))
    }

    /// Passphrase of a key protected by the empty string.
    ///
    /// Equivalent to passing no passphrase at all: engines treat both as
    /// "the key is not passphrase-protected".
    pub fn empty() -> Self {
        Self::new("")
    }

    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }

    /// Expose the raw passphrase for hand-off to an engine.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Passphrase([REDACTED])")
    }
}

impl From<&str> for Passphrase {
    fn from(secret: &str) -> Self {
        Self::new(secret)
    }
}

impl From<String> for Passphrase {
    fn from(secret: String) -> Self {
        Self::new(secret)
    }
}
