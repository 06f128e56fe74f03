use std::path::Path;

use crate::core::errors::{KeysealError, Result};
use crate::core::models::fingerprint::Fingerprint;
use crate::core::models::passphrase::Passphrase;
use crate::core::traits::engine::PgpEngine;

/// Single-key facade over an OpenPGP engine session.
///
/// Holds one ASCII-armored key (public or public+private), resolves it to
/// the engine-assigned fingerprint on demand, and delegates encryption
/// and decryption to the engine. The facade owns its engine session for
/// its whole lifetime; dropping the facade drops the session.
///
/// The store has two states: no key, and key set. Assigning a key moves
/// it to the second state; every other operation requires that state and
/// fails with [`KeysealError::KeyNotSet`] otherwise. A new assignment
/// replaces the previous key wholly; there is no multi-key storage.
pub struct KeyStore<E: PgpEngine> {
    engine: E,
    /// Armored key material, stored verbatim. Empty until first assigned.
    key: String,
    /// Fingerprint of the imported key; cleared on every assignment.
    fingerprint: Option<Fingerprint>,
}

impl<E: PgpEngine> KeyStore<E> {
    /// Wrap an engine session with an empty key slot.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            key: String::new(),
            fingerprint: None,
        }
    }

    /// Store armored key text verbatim, replacing any previous key.
    ///
    /// No validation happens here; a malformed key only surfaces when it
    /// is first imported. Clears the cached fingerprint, so the next
    /// operation re-imports.
    pub fn set_key(&mut self, armored: impl Into<String>) {
        self.key = armored.into();
        self.fingerprint = None;
    }

    /// Read a key file once and store its contents, replacing any
    /// previous key.
    ///
    /// The file is not watched or re-read; later changes to it have no
    /// effect on this store.
    pub fn set_key_from_file(&mut self, path: &Path) -> Result<()> {
        let armored =
            std::fs::read_to_string(path).map_err(|_| KeysealError::KeyFileUnreadable {
                path: path.to_path_buf(),
            })?;
        self.set_key(armored);
        Ok(())
    }

    /// The stored armored key, exactly as assigned.
    ///
    /// Fails with [`KeysealError::KeyNotSet`] when the slot is empty or
    /// all-whitespace.
    pub fn key(&self) -> Result<&str> {
        if self.key.trim().is_empty() {
            return Err(KeysealError::KeyNotSet);
        }
        Ok(&self.key)
    }

    /// Fingerprint of the stored key.
    ///
    /// The first call after an assignment imports the key into the
    /// engine's session keyring and caches the reported fingerprint;
    /// later calls reuse the cache. A gpg import spawns a subprocess, so
    /// re-importing on every operation would be anything but cheap.
    pub fn fingerprint(&mut self) -> Result<Fingerprint> {
        if let Some(fingerprint) = &self.fingerprint {
            return Ok(fingerprint.clone());
        }

        let fingerprint = self.engine.import_key(self.key()?.as_bytes())?;
        tracing::debug!(
            engine = self.engine.name(),
            %fingerprint,
            "key imported into session keyring"
        );
        self.fingerprint = Some(fingerprint.clone());
        Ok(fingerprint)
    }

    /// Encrypt plaintext for the stored key, returning armored ciphertext.
    pub fn encrypt(&mut self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let recipient = self.fingerprint()?;
        self.engine.encrypt(&recipient, plaintext)
    }

    /// Read a file and encrypt its contents for the stored key.
    pub fn encrypt_file(&mut self, path: &Path) -> Result<Vec<u8>> {
        let plaintext = std::fs::read(path)?;
        self.encrypt(&plaintext)
    }

    /// Decrypt ciphertext with the stored key.
    ///
    /// Pass the key's passphrase, or `None` for passphrase-less keys.
    /// A wrong passphrase is a [`KeysealError::DecryptionFailed`], never
    /// plaintext.
    pub fn decrypt(
        &mut self,
        ciphertext: &[u8],
        passphrase: Option<&Passphrase>,
    ) -> Result<Vec<u8>> {
        // The engine can only use a secret key it has seen; resolving the
        // fingerprint guarantees the current key is in the session keyring.
        self.fingerprint()?;
        self.engine.decrypt(ciphertext, passphrase)
    }
}
