use crate::core::errors::Result;
use crate::core::models::fingerprint::Fingerprint;
use crate::core::models::passphrase::Passphrase;

/// Port for external OpenPGP engines.
///
/// Implementations live in `adapters::engine` (e.g. GnupgEngine). The
/// core layer only depends on this trait, never on a concrete engine.
///
/// An engine value owns one session keyring: keys imported through
/// [`import_key`](PgpEngine::import_key) stay visible to later `encrypt`
/// and `decrypt` calls on the same value, and to nothing else.
pub trait PgpEngine: Send + Sync {
    /// Import armored key material into the session keyring and return
    /// the fingerprint the engine assigns to it.
    fn import_key(&self, armored: &[u8]) -> Result<Fingerprint>;

    /// Encrypt plaintext for a recipient already present in the session
    /// keyring.
    fn encrypt(&self, recipient: &Fingerprint, plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Decrypt ciphertext with whichever imported secret key matches it.
    ///
    /// Passing `None` is equivalent to an empty passphrase; both mean the
    /// secret key is expected to be unprotected.
    fn decrypt(&self, ciphertext: &[u8], passphrase: Option<&Passphrase>) -> Result<Vec<u8>>;

    /// Human-readable name of this engine (e.g. "gnupg").
    fn name(&self) -> &str;
}
