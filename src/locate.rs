// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Search for terminfo database file for the terminal

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use tracing::debug;

const TERMINFO_DIRS: &[&str] = &[
    "/etc/terminfo",
    "/lib/terminfo",
    "/usr/share/terminfo",
    "/usr/share/misc/terminfo",
    "/usr/local/share/terminfo",
];

/// Errors reported when looking for a terminfo database file
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// `TERM` is not set or empty
    #[error("Terminal name is not set")]
    MissingTerminalName,
    /// Terminfo file for the terminal could not be found
    #[error("Database not found")]
    DatabaseNotFound,
    /// The file exists but could not be read
    #[error("Cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Compiled terminfo entry and the file it was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

fn find_in_directory(term_name: &str, dir: &Path) -> Option<PathBuf> {
    let first_byte = *term_name.as_bytes().first()?;

    // Standard layout - leaf directories use the first character of the terminal name.
    let first_char = char::from(first_byte);
    let filename = dir.join(first_char.to_string()).join(term_name);
    if filename.exists() {
        return Some(filename);
    }

    // Darwin layout - leaf directories use the first byte of the terminal name
    // in hexadecimal form.
    let first_byte_hex = format!("{first_byte:02X}");
    let filename = dir.join(first_byte_hex).join(term_name);
    if filename.exists() {
        return Some(filename);
    }

    None
}

/// Returns all directories that are searched for terminfo files
///
/// This function does not attempt to verify if the directories to be searched actually exist.
pub fn search_directories() -> Vec<PathBuf> {
    let mut search_dirs = vec![];

    // Search the directory from the `TERMINFO` environment variable.
    if let Some(dir) = env::var_os("TERMINFO").filter(|dir| !dir.is_empty()) {
        search_dirs.push(PathBuf::from(dir));
    }

    // Search `.terminfo` in the home directory.
    if let Some(home_dir) = env::home_dir() {
        search_dirs.push(home_dir.join(".terminfo"));
    }

    search_dirs.extend(TERMINFO_DIRS.iter().map(PathBuf::from));

    search_dirs
}

/// Find and read the terminfo database file in the given directories
///
/// Directories are tried in order, the first existing file wins.
pub fn locate_in<P: AsRef<Path>>(
    term_name: &str,
    dirs: impl IntoIterator<Item = P>,
) -> Result<Database, Error> {
    if term_name.is_empty() {
        return Err(Error::MissingTerminalName);
    }

    for dir in dirs {
        let Some(path) = find_in_directory(term_name, dir.as_ref()) else {
            continue;
        };
        debug!(path = %path.display(), "found terminfo database");
        return match fs::read(&path) {
            Ok(bytes) => Ok(Database { path, bytes }),
            Err(source) => Err(Error::Read { path, source }),
        };
    }

    Err(Error::DatabaseNotFound)
}

/// Find terminfo database file for the terminal name
///
/// Returns the file path and its contents if it exists, an error otherwise.
pub fn locate(term_name: &str) -> Result<Database, Error> {
    locate_in(term_name, search_directories())
}
