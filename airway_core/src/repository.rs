//! Program storage with file locking.
//!
//! Programs live in a single JSON document. Reads take a shared lock;
//! writes go through a locked temp file and an atomic rename. A missing or
//! unreadable document is replaced by the built-in default programs.

use crate::{Error, ExerciseProgram, PhaseSpec, Result};
use fs2::FileExt;
use once_cell::sync::Lazy;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Built-in programs seeded on first use
static DEFAULT_PROGRAMS: Lazy<Vec<ExerciseProgram>> = Lazy::new(|| {
    vec![
        ExerciseProgram {
            id: Some("default-1".into()),
            name: "Autogenic Drainage".into(),
            phase1: PhaseSpec {
                sets: 10,
                inhale_duration: 2,
                exhale_duration: 5,
            },
            phase2: PhaseSpec {
                sets: 10,
                inhale_duration: 4,
                exhale_duration: 6,
            },
        },
        ExerciseProgram {
            id: Some("default-2".into()),
            name: "Quick Relief".into(),
            phase1: PhaseSpec {
                sets: 5,
                inhale_duration: 2,
                exhale_duration: 4,
            },
            phase2: PhaseSpec {
                sets: 5,
                inhale_duration: 3,
                exhale_duration: 5,
            },
        },
        ExerciseProgram {
            id: Some("default-3".into()),
            name: "Extended Session".into(),
            phase1: PhaseSpec {
                sets: 15,
                inhale_duration: 3,
                exhale_duration: 6,
            },
            phase2: PhaseSpec {
                sets: 15,
                inhale_duration: 5,
                exhale_duration: 8,
            },
        },
    ]
});

/// Validated CRUD over the stored program list
pub struct ProgramRepository {
    path: PathBuf,
}

impl ProgramRepository {
    /// Create a repository over the given document path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored programs, in stored order.
    ///
    /// Seeds and persists the default set when no document exists. A
    /// document that cannot be read or parsed is treated the same way:
    /// logged, then replaced by the defaults.
    pub fn list_all(&self) -> Result<Vec<ExerciseProgram>> {
        match self.read_document()? {
            Some(programs) => Ok(programs),
            None => {
                tracing::info!("No program list at {:?}, seeding defaults", self.path);
                let defaults = DEFAULT_PROGRAMS.clone();
                self.write_document(&defaults)?;
                Ok(defaults)
            }
        }
    }

    /// Look up a program by id; absence is not an error
    pub fn get_by_id(&self, id: &str) -> Result<Option<ExerciseProgram>> {
        let programs = self.list_all()?;
        Ok(programs.into_iter().find(|p| p.id.as_deref() == Some(id)))
    }

    /// Validate and persist a program.
    ///
    /// Assigns a fresh id when absent; overwrites in place when the id
    /// matches a stored record, otherwise appends. Validation failures leave
    /// the stored list untouched.
    pub fn save(&self, mut program: ExerciseProgram) -> Result<ExerciseProgram> {
        program.validate()?;

        let mut programs = self.list_all()?;
        match &program.id {
            Some(id) => {
                if let Some(existing) = programs
                    .iter_mut()
                    .find(|p| p.id.as_deref() == Some(id.as_str()))
                {
                    *existing = program.clone();
                } else {
                    programs.push(program.clone());
                }
            }
            None => {
                program.id = Some(Uuid::new_v4().to_string());
                programs.push(program.clone());
            }
        }

        self.write_document(&programs)?;
        tracing::debug!("Saved program {:?}", program.id);
        Ok(program)
    }

    /// Delete a program by id; unknown ids are a silent no-op
    pub fn remove(&self, id: &str) -> Result<()> {
        let mut programs = self.list_all()?;
        let before = programs.len();
        programs.retain(|p| p.id.as_deref() != Some(id));

        if programs.len() != before {
            self.write_document(&programs)?;
            tracing::debug!("Removed program {}", id);
        }
        Ok(())
    }

    /// Read the stored list with a shared lock.
    ///
    /// Returns None when the document is absent or unusable (the caller
    /// reseeds in both cases).
    fn read_document(&self) -> Result<Option<Vec<ExerciseProgram>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open program list {:?}: {}", self.path, e);
                return Ok(None);
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock program list {:?}: {}", self.path, e);
            return Ok(None);
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read program list {:?}: {}", self.path, e);
            return Ok(None);
        }

        file.unlock()?;

        match serde_json::from_str::<Vec<ExerciseProgram>>(&contents) {
            Ok(programs) => Ok(Some(programs)),
            Err(e) => {
                tracing::warn!("Failed to parse program list {:?}: {}", self.path, e);
                Ok(None)
            }
        }
    }

    /// Write the whole list atomically: temp file, sync, rename over the
    /// original, with an exclusive lock serializing concurrent writers.
    fn write_document(&self, programs: &[ExerciseProgram]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(self.path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "program path missing parent")
        })?)?;

        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(programs)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}
