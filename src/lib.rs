//! One key, one session: a small OpenPGP facade over GnuPG.
//!
//! `keyseal` holds a single ASCII-armored OpenPGP key, imports it into an
//! isolated session keyring to learn its fingerprint, and delegates
//! encryption and decryption to the engine. Packet parsing, keyring
//! management, cipher selection and armoring all stay in GnuPG; this
//! crate marshals parameters and keeps sessions isolated from each other.
//!
//! # Quick start
//!
//! ```no_run
//! use std::path::Path;
//!
//! use keyseal::{GnupgEngine, KeyStore, Passphrase};
//!
//! # fn main() -> keyseal::Result<()> {
//! let mut store = KeyStore::new(GnupgEngine::new()?);
//! store.set_key_from_file(Path::new("keys/foo.asc"))?;
//!
//! let ciphertext = store.encrypt(b"lorem ipsum dolorem asimet")?;
//! let plaintext = store.decrypt(&ciphertext, Some(&Passphrase::from("hunter2")))?;
//! assert_eq!(plaintext, b"lorem ipsum dolorem asimet");
//! # Ok(())
//! # }
//! ```
//!
//! Keys and content can also be passed as literal values: `set_key` takes
//! armored text directly and `encrypt` takes raw bytes. File and literal
//! entry points are deliberately separate; nothing is ever silently
//! re-interpreted as a path.

pub mod adapters;
pub mod core;

pub use crate::adapters::engine::gnupg::GnupgEngine;
pub use crate::core::errors::{KeysealError, Result};
pub use crate::core::models::fingerprint::Fingerprint;
pub use crate::core::models::passphrase::Passphrase;
pub use crate::core::services::key_store::KeyStore;
pub use crate::core::traits::engine::PgpEngine;
