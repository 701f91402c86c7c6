//! Score persistence
//!
//! Records are append-only: one per save, keyed by user and millisecond
//! timestamp, never read back or overwritten by the game.

use anyhow::Result;

pub mod file;
pub mod memory;
pub mod record;
pub mod recorder;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use record::{ScoreKey, ScoreRecord, format_iso8601};
pub use recorder::{SaveOutcome, ScoreRecorder};

/// Write side of a keyed score store
///
/// Implementations block; callers move writes onto the blocking pool.
pub trait ScoreStore: Send + Sync {
    /// Append `record` under `key`. Fails if the key already exists.
    fn write(&self, key: &ScoreKey, record: &ScoreRecord) -> Result<()>;

    /// Short label for logs
    fn describe(&self) -> String;
}
