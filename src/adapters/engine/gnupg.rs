use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::TempDir;

use crate::core::errors::{KeysealError, Result};
use crate::core::models::fingerprint::Fingerprint;
use crate::core::models::passphrase::Passphrase;
use crate::core::traits::engine::PgpEngine;

/// GnuPG engine that shells out to the system `gpg` binary.
///
/// Requires GnuPG 2.x to be installed. Every session owns its own
/// keyring directory, passed to gpg via `--homedir` on each invocation,
/// so imports never touch the user's keyring or any other session's.
/// [`new`](GnupgEngine::new) puts the keyring in a scratch directory
/// that is deleted when the session is dropped;
/// [`with_homedir`](GnupgEngine::with_homedir) pins it to a caller-chosen
/// location instead.
pub struct GnupgEngine {
    /// Path to the gpg binary (defaults to "gpg").
    gpg_path: PathBuf,
    homedir: PathBuf,
    /// Keeps the scratch keyring alive for ephemeral sessions.
    _scratch: Option<TempDir>,
}

impl GnupgEngine {
    /// Create a session with an ephemeral scratch keyring.
    pub fn new() -> Result<Self> {
        let scratch = tempfile::Builder::new()
            .prefix("keyseal-keyring-")
            .tempdir()?;
        Ok(Self {
            gpg_path: PathBuf::from("gpg"),
            homedir: scratch.path().to_path_buf(),
            _scratch: Some(scratch),
        })
    }

    /// Create a session whose keyring lives at `homedir`.
    ///
    /// The directory is created if missing. GnuPG refuses a home
    /// directory that other users can read, so permissions are forced to
    /// 0700 on unix.
    pub fn with_homedir(homedir: impl Into<PathBuf>) -> Result<Self> {
        let homedir = homedir.into();
        if !homedir.exists() {
            std::fs::create_dir_all(&homedir)?;
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&homedir, std::fs::Permissions::from_mode(0o700))?;
        }
        Ok(Self {
            gpg_path: PathBuf::from("gpg"),
            homedir,
            _scratch: None,
        })
    }

    /// Override the gpg binary path.
    pub fn with_gpg_path(mut self, gpg_path: impl Into<PathBuf>) -> Self {
        self.gpg_path = gpg_path.into();
        self
    }

    /// The keyring directory this session operates on.
    pub fn homedir(&self) -> &Path {
        &self.homedir
    }

    /// Check if gpg is available on the system.
    pub fn is_available(&self) -> bool {
        Command::new(&self.gpg_path)
            .arg("--version")
            .output()
            .is_ok_and(|o| o.status.success())
    }

    /// Run gpg with the session flags, feed `stdin_data`, and return
    /// stdout on success. `on_failure` turns gpg's stderr into the
    /// calling operation's domain error.
    fn run_gpg(
        &self,
        args: &[&str],
        stdin_data: &[u8],
        on_failure: impl FnOnce(String) -> KeysealError,
    ) -> Result<Vec<u8>> {
        let mut cmd = Command::new(&self.gpg_path);
        cmd.arg("--homedir")
            .arg(&self.homedir)
            .args(["--batch", "--yes"])
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::debug!(gpg = %self.gpg_path.display(), ?args, "spawning gpg");

        let mut child = cmd.spawn().map_err(|e| KeysealError::EngineUnavailable {
            reason: format!("failed to run '{}': {e}", self.gpg_path.display()),
        })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(stdin_data)?;
            // stdin drops here, closing the pipe so gpg sees EOF
        }

        let output = child.wait_with_output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::debug!(status = ?output.status.code(), "gpg exited with error");
            return Err(on_failure(stderr));
        }

        Ok(output.stdout)
    }
}

impl PgpEngine for GnupgEngine {
    fn import_key(&self, armored: &[u8]) -> Result<Fingerprint> {
        let stdout = self.run_gpg(&["--status-fd", "1", "--import"], armored, |stderr| {
            KeysealError::KeyImportFailed {
                engine: "gnupg".into(),
                reason: stderr,
            }
        })?;

        let status = String::from_utf8_lossy(&stdout);
        parse_import_fingerprint(&status).ok_or_else(|| KeysealError::KeyImportFailed {
            engine: "gnupg".into(),
            reason: "gpg reported no IMPORT_OK status for the key material".into(),
        })
    }

    fn encrypt(&self, recipient: &Fingerprint, plaintext: &[u8]) -> Result<Vec<u8>> {
        // Imported keys carry no ownertrust in a fresh keyring; without
        // an explicit trust model gpg refuses them in batch mode.
        let args = [
            "--trust-model",
            "always",
            "--armor",
            "--recipient",
            recipient.as_str(),
            "--encrypt",
        ];

        self.run_gpg(&args, plaintext, |stderr| KeysealError::EncryptionFailed {
            reason: stderr,
        })
    }

    fn decrypt(&self, ciphertext: &[u8], passphrase: Option<&Passphrase>) -> Result<Vec<u8>> {
        let mut args: Vec<String> = vec!["--pinentry-mode".into(), "loopback".into()];

        // The passphrase travels through a 0600 file inside the session
        // homedir, never through argv; argv is world-readable in a
        // process listing.
        let passphrase_file = match passphrase {
            Some(passphrase) if !passphrase.is_empty() => {
                let mut file = tempfile::Builder::new()
                    .prefix("keyseal-pass-")
                    .tempfile_in(&self.homedir)?;
                file.write_all(passphrase.expose().as_bytes())?;
                file.flush()?;
                args.push("--passphrase-file".into());
                args.push(file.path().to_string_lossy().into_owned());
                Some(file)
            }
            _ => None,
        };
        args.push("--decrypt".into());

        let arg_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
        let plaintext = self.run_gpg(&arg_refs, ciphertext, |stderr| {
            KeysealError::DecryptionFailed { reason: stderr }
        });

        drop(passphrase_file);
        plaintext
    }

    fn name(&self) -> &str {
        "gnupg"
    }
}

/// Extract the fingerprint from the `--status-fd` output of a key import.
///
/// The line format is `[GNUPG:] IMPORT_OK <flags> <fingerprint>`; the
/// first such line wins. Importing a public+private block emits one line
/// per packet group, all carrying the same primary fingerprint.
fn parse_import_fingerprint(status: &str) -> Option<Fingerprint> {
    status.lines().find_map(|line| {
        let rest = line.strip_prefix("[GNUPG:] IMPORT_OK ")?;
        let fingerprint = rest.split_whitespace().nth(1)?;
        Some(Fingerprint::new(fingerprint))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_has_correct_name() {
        let engine = GnupgEngine::new().unwrap();
        assert_eq!(engine.name(), "gnupg");
    }

    #[test]
    fn ephemeral_sessions_get_distinct_keyrings() {
        let a = GnupgEngine::new().unwrap();
        let b = GnupgEngine::new().unwrap();
        assert_ne!(a.homedir(), b.homedir());
        assert!(a.homedir().is_dir());
        assert!(b.homedir().is_dir());
    }

    #[test]
    fn with_homedir_creates_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let ring = dir.path().join("ring");

        let engine = GnupgEngine::with_homedir(&ring).unwrap();
        assert_eq!(engine.homedir(), ring);
        assert!(ring.is_dir());
    }

    #[test]
    fn parse_fingerprint_from_import_status() {
        let status = "[GNUPG:] KEY_CONSIDERED 96E46E5CE78C4677A2897FD227B7B52C6AD17D0C 0\n\
                      [GNUPG:] IMPORT_OK 1 96E46E5CE78C4677A2897FD227B7B52C6AD17D0C\n\
                      [GNUPG:] IMPORT_RES 1 0 1 0 0 0 0 0 0 0 0 0 0 0 0\n";

        let fingerprint = parse_import_fingerprint(status).unwrap();
        assert_eq!(
            fingerprint.as_str(),
            "96E46E5CE78C4677A2897FD227B7B52C6AD17D0C"
        );
    }

    #[test]
    fn parse_fingerprint_first_import_line_wins() {
        let status = "[GNUPG:] IMPORT_OK 1 AAAA1111BBBB2222CCCC3333DDDD4444EEEE5555\n\
                      [GNUPG:] IMPORT_OK 17 FFFF1111BBBB2222CCCC3333DDDD4444EEEE5555\n";

        let fingerprint = parse_import_fingerprint(status).unwrap();
        assert!(fingerprint.as_str().starts_with("AAAA"));
    }

    #[test]
    fn parse_fingerprint_without_import_ok_is_none() {
        assert!(parse_import_fingerprint("[GNUPG:] IMPORT_RES 1 0 0").is_none());
        assert!(parse_import_fingerprint("").is_none());
        assert!(parse_import_fingerprint("[GNUPG:] IMPORT_OK 1").is_none());
    }

    // Integration tests that require GPG installed are in tests/
}
