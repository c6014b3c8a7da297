use std::ffi::OsString;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, Error as SqliteError, ffi::ErrorCode};

use crate::{ClientError, ClientResult};

pub const HOME_ENV_VAR: &str = "RUNWAY_HOME";

const LEDGER_DIR_NAME: &str = ".runway";
const LEDGER_FILE_NAME: &str = "ledger.db";
const BUSY_TIMEOUT: Duration = Duration::from_millis(250);

/// Picks the ledger directory: explicit override, then `RUNWAY_HOME`, then
/// `~/.runway`. Relative paths are resolved against the working directory.
pub fn resolve_ledger_home(home_override: Option<&Path>) -> ClientResult<PathBuf> {
    let candidate = match home_override {
        Some(path) => path.to_path_buf(),
        None => default_home(std::env::var_os(HOME_ENV_VAR))?,
    };

    if candidate.is_absolute() {
        return Ok(candidate);
    }
    let cwd = std::env::current_dir()
        .map_err(|error| ClientError::ledger_init_failed(&candidate, &error.to_string()))?;
    Ok(cwd.join(candidate))
}

fn default_home(env_value: Option<OsString>) -> ClientResult<PathBuf> {
    if let Some(value) = env_value.filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(value));
    }
    home::home_dir()
        .map(|home| home.join(LEDGER_DIR_NAME))
        .ok_or_else(|| {
            ClientError::ledger_init_failed(
                Path::new("."),
                "No home directory is available; set RUNWAY_HOME to choose a ledger location.",
            )
        })
}

pub fn ensure_ledger_directory(path: &Path) -> ClientResult<()> {
    fs::create_dir_all(path).map_err(|error| map_io_error(path, &error))?;
    restrict_to_owner(path);
    Ok(())
}

pub fn ledger_db_path(home: &Path) -> PathBuf {
    home.join(LEDGER_FILE_NAME)
}

pub fn open_connection(db_path: &Path) -> ClientResult<Connection> {
    Connection::open(db_path)
        .and_then(|connection| {
            connection.busy_timeout(BUSY_TIMEOUT)?;
            Ok(connection)
        })
        .map_err(|error| map_sqlite_error(db_path, &error))
}

pub fn map_io_error(path: &Path, error: &io::Error) -> ClientError {
    match error.kind() {
        ErrorKind::PermissionDenied => {
            ClientError::ledger_init_permission_denied(path, &error.to_string())
        }
        _ => ClientError::ledger_init_failed(path, &error.to_string()),
    }
}

/// Translates SQLite failures into the ledger error family: contention becomes
/// `ledger_locked`, a foreign file becomes `ledger_corrupt`, and open or
/// write refusals become permission errors.
pub fn map_sqlite_error(path: &Path, error: &SqliteError) -> ClientError {
    match error.sqlite_error_code() {
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => {
            ClientError::ledger_locked(path)
        }
        Some(ErrorCode::NotADatabase) => ClientError::ledger_corrupt(path),
        Some(ErrorCode::CannotOpen | ErrorCode::ReadOnly) => {
            ClientError::ledger_init_permission_denied(path, &error.to_string())
        }
        _ => ClientError::ledger_init_failed(path, &error.to_string()),
    }
}

#[cfg(unix)]
fn restrict_to_owner(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    // Ledger still works if the mode cannot be changed (e.g. a shared mount).
    let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o700));
}

#[cfg(not(unix))]
fn restrict_to_owner(_path: &Path) {}
