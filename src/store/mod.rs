//! JSON store of generated arrangements
//!
//! A store is one JSON object keyed by the number of pairs:
//!
//! ```json
//! { "8": { "Rounds": 7, "Tables": 4, "BoardMovement": [0, 1, 2, 4],
//!          "Arrangement": [[{ "NS": 8, "EW": 1, "Board": 0 }, ...], ...] } }
//! ```
//!
//! Only arrangements passing [`validate`] are written, and every entry is
//! validated again when loaded.


use crate::arrangement::{Arrangement, Cell, ShapeError};
use crate::validate::{validate, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::{rename, File};
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error raised by the store
#[derive(Debug, Error)]
pub enum Error {
    /// The file cannot be read or written
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The file is not a JSON object
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The store has no entry for this number of pairs
    #[error("No arrangement for {pairs} pairs")]
    NotFound {
        /// Number of pairs
        pairs: u8,
    },

    /// The entry does not describe an arrangement
    #[error("The arrangement for {pairs} pairs is malformed: {source}")]
    Malformed {
        /// Number of pairs
        pairs: u8,
        /// What is wrong
        source: EntryError,
    },

    /// The entry describes an illegal movement
    #[error("The arrangement for {pairs} pairs is invalid: {source}")]
    Invalid {
        /// Number of pairs
        pairs: u8,
        /// The failed check
        source: ValidationError,
    },
}

/// Structural problem in a store entry
#[derive(Debug, Error)]
pub enum EntryError {
    /// Fields missing or of the wrong type
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The grid is not an arrangement
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// `Rounds` or `Tables` disagree with the grid
    #[error("{field} is {found}, but the grid has {expected}")]
    Header {
        /// `Rounds` or `Tables`
        field: &'static str,
        /// Value in the entry
        found: usize,
        /// Value from the grid
        expected: usize,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Entry {
    rounds: usize,
    tables: usize,
    board_movement: Option<Vec<u8>>,
    arrangement: Vec<Vec<Cell>>,
}

impl From<&Arrangement> for Entry {
    fn from(arrangement: &Arrangement) -> Self {
        Self {
            rounds: arrangement.rounds(),
            tables: arrangement.tables(),
            board_movement: arrangement.board_movement().map(<[u8]>::to_vec),
            arrangement: arrangement.to_rounds(),
        }
    }
}

impl Entry {
    fn into_arrangement(self, pairs: u8) -> Result<Arrangement, EntryError> {
        let mut arrangement = Arrangement::new(pairs, self.arrangement)?;

        for (field, found, expected) in [
            ("Rounds", self.rounds, arrangement.rounds()),
            ("Tables", self.tables, arrangement.tables()),
        ] {
            if found != expected {
                return Err(EntryError::Header {
                    field,
                    found,
                    expected,
                });
            }
        }

        if let Some(movement) = self.board_movement {
            arrangement = arrangement.with_board_movement(movement);
        }

        Ok(arrangement)
    }
}

/// Arrangements kept in a JSON file
///
/// Entries are kept as raw JSON until loaded, so that one bad entry does not
/// hide the others and unknown keys survive a rewrite.
#[derive(Debug, Clone)]
pub struct ArrangementStore {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl ArrangementStore {
    /// Open a store, or start an empty one if the file does not exist
    ///
    /// # Errors
    /// [`Error::Io`] if the file cannot be read, [`Error::Json`] if it is
    /// not a JSON object
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        let entries = match File::open(&path) {
            Ok(file) => serde_json::from_reader(io::BufReader::new(file))?,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                log::debug!("{} does not exist yet", path.display());
                BTreeMap::new()
            }
            Err(error) => return Err(error.into()),
        };

        Ok(Self { path, entries })
    }

    /// The file backing this store
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Numbers of pairs with an entry, in ascending order
    #[must_use]
    pub fn pairs(&self) -> Vec<u8> {
        let mut pairs: Vec<u8> = self.entries.keys().filter_map(|key| key.parse().ok()).collect();
        pairs.sort_unstable();
        pairs
    }

    /// Load and validate the arrangement for a number of pairs
    ///
    /// # Errors
    /// - [`Error::NotFound`] if there is no entry
    /// - [`Error::Malformed`] if the entry is not an arrangement
    /// - [`Error::Invalid`] if the arrangement is not a legal movement
    pub fn load(&self, pairs: u8) -> Result<Arrangement, Error> {
        let Some(value) = self.entries.get(&pairs.to_string()) else {
            log::error!("No entry for {pairs} pairs in {}", self.path.display());
            return Err(Error::NotFound { pairs });
        };

        let arrangement = Entry::deserialize(value)
            .map_err(EntryError::from)
            .and_then(|entry| entry.into_arrangement(pairs))
            .map_err(|source| {
                log::error!("{pairs} pairs in {}: {source}", self.path.display());
                Error::Malformed { pairs, source }
            })?;

        validate(&arrangement).map_err(|source| Error::Invalid { pairs, source })?;
        log::info!("Loaded {pairs} pairs from {}", self.path.display());
        Ok(arrangement)
    }

    /// Validate an arrangement and write it to the file
    ///
    /// The entry for the same number of pairs is replaced, and the others
    /// are kept.
    ///
    /// # Errors
    /// - [`Error::Invalid`] if the arrangement is not a legal movement
    /// - [`Error::Io`] or [`Error::Json`] if the file cannot be written
    pub fn save(&mut self, arrangement: &Arrangement) -> Result<(), Error> {
        let pairs = arrangement.pairs();
        validate(arrangement).map_err(|source| Error::Invalid { pairs, source })?;

        let value = serde_json::to_value(Entry::from(arrangement))?;
        self.entries.insert(pairs.to_string(), value);
        self.write()?;

        log::info!("Saved {pairs} pairs to {}", self.path.display());
        Ok(())
    }

    fn write(&self) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = serde_json::to_vec_pretty(&self.entries)?;
        let temp_path = self.path.with_extension("tmp");

        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&data)?;
            file.flush()?;
            file.sync_all()?;
        }

        rename(&temp_path, &self.path)?;
        log::debug!("Wrote {} bytes to {}", data.len(), self.path.display());
        Ok(())
    }
}

/// Load the arrangement for a number of pairs from a store file
///
/// # Errors
/// See [`ArrangementStore::open`] and [`ArrangementStore::load`]
pub fn load_arrangement(pairs: u8, path: impl AsRef<Path>) -> Result<Arrangement, Error> {
    ArrangementStore::open(path)?.load(pairs)
}
