//! Path resolution for todo-api directories.
//!
//! Provides XDG-compliant path resolution for the default database location.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "todo-api";
const DB_FILE: &str = "todos.db";

/// Get XDG-compliant data directory for todo-api.
///
/// Uses `$XDG_DATA_HOME/todo-api`, falling back to
/// `$HOME/.local/share/todo-api`, and finally to `./todo-api` when neither
/// variable is set.
pub fn get_data_dir() -> PathBuf {
    let data_home = env::var_os("XDG_DATA_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_home.join(APP_DIR)
}

/// Get database file path (data_dir/todos.db).
pub fn get_db_path() -> PathBuf {
    get_data_dir().join(DB_FILE)
}
