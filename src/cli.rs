// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Command line arguments

use std::path::PathBuf;

use clap::Parser;

/// Record the byte sequences your terminal sends for key presses
///
/// Every prompt waits for one key press. Press Escape to skip a combination
/// that your terminal or desktop does not pass through.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Write the fixture to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Letters of the prompt groups to record, all groups if omitted
    #[arg(short, long, value_name = "LETTERS")]
    pub select: Option<String>,

    /// Append diagnostic logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Show the prompt groups and their letters, then exit
    #[arg(long)]
    pub list_groups: bool,
}

#[cfg(test)]
mod test {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let args = Args::parse_from(["keycap"]);
        assert!(args.output.is_none());
        assert!(args.select.is_none());
        assert!(!args.list_groups);
    }

    #[test]
    fn selection_and_output() {
        let args = Args::parse_from(["keycap", "-s", "fa", "-o", "xterm.json"]);
        assert_eq!(args.select.as_deref(), Some("fa"));
        assert_eq!(args.output, Some(PathBuf::from("xterm.json")));
    }
}
