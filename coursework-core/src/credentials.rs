//! Credential store backed by flat files in the user config directory.
//!
//! # Storage layout
//!
//! ```text
//! <config_dir>/coursework/
//!   notion.key   (Notion integration secret)
//!   canvas.key   (Canvas access token)
//!   canvas.url   (Canvas base URL, e.g. https://canvas.example.edu)
//! ```
//!
//! A missing or blank file triggers the interactive [`SecretPrompt`]; the
//! answer is persisted with the `.tmp` + rename pattern so a cancelled or
//! failed run never leaves a half-written secret behind.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{io_err, CredentialError};

/// Directory name under the platform config directory.
pub const APP_DIR_NAME: &str = "coursework";

/// One of the three secrets the tool needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Secret {
    NotionKey,
    CanvasKey,
    CanvasUrl,
}

impl Secret {
    /// Load order used by [`Credentials::load`].
    pub const ALL: [Secret; 3] = [Secret::NotionKey, Secret::CanvasKey, Secret::CanvasUrl];

    pub fn file_name(self) -> &'static str {
        match self {
            Secret::NotionKey => "notion.key",
            Secret::CanvasKey => "canvas.key",
            Secret::CanvasUrl => "canvas.url",
        }
    }

    /// Human-readable prompt label.
    pub fn label(self) -> &'static str {
        match self {
            Secret::NotionKey => "Notion integration key",
            Secret::CanvasKey => "Canvas access token",
            Secret::CanvasUrl => "Canvas base URL",
        }
    }

    /// Whether terminal input should be hidden.
    pub fn is_sensitive(self) -> bool {
        !matches!(self, Secret::CanvasUrl)
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Source of secrets that are not cached on disk yet.
pub trait SecretPrompt {
    /// Ask for `secret`. An error means the user cancelled.
    fn prompt(&self, secret: Secret) -> Result<String, CredentialError>;
}

impl<F> SecretPrompt for F
where
    F: Fn(Secret) -> Result<String, CredentialError>,
{
    fn prompt(&self, secret: Secret) -> Result<String, CredentialError> {
        self(secret)
    }
}

/// `<config_dir>/coursework` (pure, no I/O).
pub fn default_dir() -> Result<PathBuf, CredentialError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or(CredentialError::ConfigDirNotFound)
}

/// Reads cached secrets and falls back to a prompt.
#[derive(Debug)]
pub struct CredentialStore<P> {
    dir: PathBuf,
    prompt: P,
}

impl<P: SecretPrompt> CredentialStore<P> {
    pub fn new(dir: impl Into<PathBuf>, prompt: P) -> Self {
        Self {
            dir: dir.into(),
            prompt,
        }
    }

    /// Store rooted at [`default_dir`].
    pub fn from_default_dir(prompt: P) -> Result<Self, CredentialError> {
        Ok(Self::new(default_dir()?, prompt))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, secret: Secret) -> PathBuf {
        self.dir.join(secret.file_name())
    }

    /// The trimmed on-disk value, or `None` when missing or blank.
    pub fn cached(&self, secret: Secret) -> Result<Option<String>, CredentialError> {
        let path = self.path_of(secret);
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                let value = contents.trim();
                Ok((!value.is_empty()).then(|| value.to_string()))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_err(path, err)),
        }
    }

    /// Return the secret, prompting and persisting it on first use.
    pub fn get(&self, secret: Secret) -> Result<String, CredentialError> {
        if let Some(value) = self.cached(secret)? {
            tracing::debug!(secret = %secret, "using cached secret");
            return Ok(value);
        }

        let value = self.prompt.prompt(secret)?.trim().to_string();
        if value.is_empty() {
            return Err(CredentialError::EmptySecret { secret });
        }
        self.persist(secret, &value)?;
        tracing::info!(path = %self.path_of(secret).display(), "saved {}", secret.label());
        Ok(value)
    }

    fn persist(&self, secret: Secret, value: &str) -> Result<(), CredentialError> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir).map_err(|e| io_err(&self.dir, e))?;
            set_dir_permissions(&self.dir)?;
        }
        let path = self.path_of(secret);
        let tmp = path.with_extension(format!("{}.tmp", extension_of(&path)));
        std::fs::write(&tmp, value).map_err(|e| io_err(&tmp, e))?;
        set_file_permissions(&tmp)?;
        std::fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
        Ok(())
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// The three secrets, resolved.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub notion_key: String,
    pub canvas_key: String,
    pub canvas_url: String,
}

impl Credentials {
    /// Resolve every secret in [`Secret::ALL`] order.
    pub fn load<P: SecretPrompt>(store: &CredentialStore<P>) -> Result<Self, CredentialError> {
        Ok(Self {
            notion_key: store.get(Secret::NotionKey)?,
            canvas_key: store.get(Secret::CanvasKey)?,
            canvas_url: store.get(Secret::CanvasUrl)?,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("notion_key", &"<redacted>")
            .field("canvas_key", &"<redacted>")
            .field("canvas_url", &self.canvas_url)
            .finish()
    }
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), CredentialError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), CredentialError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), CredentialError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), CredentialError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
