mod saved_runs;
mod session;
mod sqlite;

pub use self::saved_runs::{SavedRun, clear_runs, delete_run, list_runs, load_run, save_run};
pub use self::session::{MemorySessionStore, SessionStore};
pub use self::sqlite::SqliteSessionStore;
