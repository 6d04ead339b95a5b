//! Speech narration for exercise cues.
//!
//! Cues are best-effort by design: a missing or slow speech backend must
//! never disturb exercise timing. Requests are dropped, not queued, when no
//! backend is ready, and a new cue cancels the one still playing.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

/// System text-to-speech commands probed in order
const BACKEND_CANDIDATES: &[&str] = &["espeak-ng", "espeak", "say", "spd-say"];

/// Speech capability consumed by exercise hosts
pub trait Narrator {
    /// Idempotent readiness initialization; must not block
    fn prepare(&mut self);

    /// Speak `text`, cancelling any in-flight utterance first.
    /// Silently drops the request when no backend is ready.
    fn speak(&mut self, text: &str);

    /// Cancel in-flight speech and release resources
    fn stop(&mut self);
}

/// Silent narrator for tests and `--no-audio` runs
pub struct NullNarrator;

impl Narrator for NullNarrator {
    fn prepare(&mut self) {}
    fn speak(&mut self, _text: &str) {}
    fn stop(&mut self) {}
}

/// Narrator backed by a system text-to-speech command.
///
/// `prepare()` scans PATH once for a usable backend; cues spoken before it
/// runs (or when nothing was found) are dropped.
pub struct SpeechNarrator {
    backend: Option<PathBuf>,
    override_command: Option<PathBuf>,
    prepared: bool,
    child: Option<Child>,
}

impl SpeechNarrator {
    pub fn new() -> Self {
        Self {
            backend: None,
            override_command: None,
            prepared: false,
            child: None,
        }
    }

    /// Use a specific command instead of probing PATH
    pub fn with_command(command: impl Into<PathBuf>) -> Self {
        Self {
            backend: None,
            override_command: Some(command.into()),
            prepared: false,
            child: None,
        }
    }

    /// Reap or kill whatever is still playing
    fn cancel_inflight(&mut self) {
        if let Some(mut child) = self.child.take() {
            match child.try_wait() {
                Ok(Some(_)) => {}
                _ => {
                    let _ = child.kill();
                    let _ = child.wait();
                }
            }
        }
    }
}

impl Default for SpeechNarrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Narrator for SpeechNarrator {
    fn prepare(&mut self) {
        if self.prepared {
            return;
        }
        self.prepared = true;

        self.backend = self.override_command.clone().or_else(|| {
            let path = std::env::var_os("PATH").unwrap_or_default();
            detect_backend(&path)
        });

        match &self.backend {
            Some(cmd) => tracing::debug!("Speech backend: {}", cmd.display()),
            None => tracing::warn!("No speech backend found; cues will be silent"),
        }
    }

    fn speak(&mut self, text: &str) {
        let Some(cmd) = self.backend.clone() else {
            tracing::debug!("Speech backend not ready, dropping cue: {}", text);
            return;
        };

        // Last cue wins
        self.cancel_inflight();

        match Command::new(&cmd)
            .arg(text)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => self.child = Some(child),
            Err(e) => tracing::warn!("Speech command {:?} failed: {}", cmd, e),
        }
    }

    fn stop(&mut self) {
        self.cancel_inflight();
    }
}

impl Drop for SpeechNarrator {
    fn drop(&mut self) {
        self.cancel_inflight();
    }
}

/// First backend candidate present on `path`
fn detect_backend(path: &OsStr) -> Option<PathBuf> {
    BACKEND_CANDIDATES
        .iter()
        .find_map(|name| find_in_path(name, path))
}

/// Locate an executable `name` in a PATH-style variable
fn find_in_path(name: &str, path: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(path)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
