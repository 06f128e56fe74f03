use std::path::PathBuf;

/// All domain errors for keyseal.
///
/// The wrapped engine reports failures as free-form text; each variant
/// keeps enough of that context to diagnose the issue without a debugger.
/// There is exactly one failure channel: operations never hand an error
/// back disguised as a result value.
#[derive(Debug, thiserror::Error)]
pub enum KeysealError {
    #[error(
        "No key set\n\n  \
         Call 'set_key' with armored OpenPGP key text, or 'set_key_from_file'\n  \
         with a path to a key file, before any cryptographic operation."
    )]
    KeyNotSet,

    #[error(
        "Key file not readable: {path}\n\n  \
         Check that the path is correct and the file exists."
    )]
    KeyFileUnreadable { path: PathBuf },

    #[error("Key import rejected by {engine}: {reason}")]
    KeyImportFailed { engine: String, reason: String },

    #[error("Encryption failed: {reason}")]
    EncryptionFailed { reason: String },

    #[error(
        "Decryption failed: {reason}\n\n  \
         The ciphertext may be malformed, encrypted for a different key,\n  \
         or the passphrase may be wrong."
    )]
    DecryptionFailed { reason: String },

    #[error(
        "OpenPGP engine unavailable: {reason}\n\n  \
         keyseal delegates all cryptography to an external engine.\n  \
         Check that GnuPG is installed and on PATH, or point the session\n  \
         at the binary with 'GnupgEngine::with_gpg_path'."
    )]
    EngineUnavailable { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, KeysealError>;
