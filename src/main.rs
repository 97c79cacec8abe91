// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

mod cli;
mod logging;

use std::{
    env,
    fs::File,
    io::{self, BufWriter},
};

use anyhow::{Context, anyhow};
use clap::Parser;
use keycap::{
    Fixture, GroupSelector, KeyCaptureSession, KeypadMode, RawModeGuard, StdinTerminal,
    TerminalProfile, catalogue, layout::NATIVE, locale, locate,
};
use tracing::{info, warn};

use crate::cli::Args;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _log_guard = logging::init(args.log_file.as_deref())?;
    let catalogue = catalogue();

    if args.list_groups {
        for group in catalogue.groups() {
            println!("{}  {}", group.code, group.title);
        }
        return Ok(());
    }

    let selector = match &args.select {
        Some(letters) => GroupSelector::parse(letters, &catalogue.codes()).map_err(|err| {
            let codes: String = catalogue.codes().into_iter().collect();
            anyhow!("{err}, valid groups are \"{codes}\"")
        })?,
        None => GroupSelector::all(),
    };

    let raw_mode = RawModeGuard::activate(StdinTerminal, NATIVE)
        .context("cannot switch the terminal to raw input")?;
    let erase = raw_mode.erase();

    let term_name = env::var("TERM").unwrap_or_default();
    let database = match locate(&term_name) {
        Ok(database) => Some(database),
        Err(err) => {
            warn!(term = %term_name, "terminfo database not captured: {err}");
            None
        }
    };
    let keypad = database
        .as_ref()
        .and_then(|database| match KeypadMode::parse(&database.bytes) {
            Ok(keypad) => keypad,
            Err(err) => {
                warn!("cannot read keypad capabilities: {err}");
                None
            }
        });
    let charset = locale::charset();
    info!(term = %term_name, charset = ?charset, erase, "starting capture");

    let mut session = KeyCaptureSession::new(&raw_mode, io::stdin().lock(), io::stdout().lock())
        .with_keypad_mode(keypad);
    let outcome = session.run(&catalogue, &selector);
    info!(samples = session.samples().len(), "capture finished");
    let samples = session.into_samples();
    raw_mode.restore();

    let profile = TerminalProfile {
        name: term_name,
        charset,
        database,
        erase,
    };
    let fixture = Fixture::assemble(profile, samples);
    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            fixture.write_json(BufWriter::new(file))?;
        }
        None => fixture.write_json(io::stdout().lock())?,
    }

    outcome.context("capture session ended early")
}
