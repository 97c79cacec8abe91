// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Fixture combining the terminal profile with the recorded samples

use std::io::Write;

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Serialize;

use crate::{
    capture::RecordedSample,
    key::{Key, KeyIdentity},
    locate::Database,
};

/// Properties of the terminal the samples were recorded on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminalProfile {
    /// Value of `TERM`, empty if unset
    pub name: String,
    pub charset: Option<String>,
    pub database: Option<Database>,
    /// Erase character in effect before raw mode
    pub erase: u8,
}

/// Serializable form of a capture run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fixture {
    pub terminal: String,
    pub charset: Option<String>,
    pub erase: u8,
    pub database: Option<DatabaseRecord>,
    pub samples: Vec<SampleRecord>,
}

/// Terminfo entry encoded as base64, annotated with its source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseRecord {
    /// Location of the entry, non-UTF-8 bytes replaced
    pub path: String,
    pub base64: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleRecord {
    pub label: Option<String>,
    pub bytes: Vec<u8>,
    pub key: KeyRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeyRecord {
    /// Character code, 0 for none
    #[serde(rename = "char")]
    pub key_char: u32,
    pub key: Key,
    pub shift: bool,
    pub alt: bool,
    pub control: bool,
}

impl From<KeyIdentity> for KeyRecord {
    fn from(identity: KeyIdentity) -> Self {
        Self {
            key_char: u32::from(identity.key_char),
            key: identity.key,
            shift: identity.modifiers.shift,
            alt: identity.modifiers.alt,
            control: identity.modifiers.control,
        }
    }
}

impl From<RecordedSample> for SampleRecord {
    fn from(sample: RecordedSample) -> Self {
        Self {
            bytes: sample.sequence.as_bytes().to_vec(),
            key: KeyRecord::from(sample.identity),
            label: sample.label,
        }
    }
}

impl Fixture {
    /// Build the fixture, keeping samples in recording order
    pub fn assemble(profile: TerminalProfile, samples: Vec<RecordedSample>) -> Self {
        Self {
            terminal: profile.name,
            charset: profile.charset,
            erase: profile.erase,
            database: profile.database.map(|database| DatabaseRecord {
                base64: STANDARD.encode(&database.bytes),
                path: database.path.to_string_lossy().into_owned(),
            }),
            samples: samples.into_iter().map(SampleRecord::from).collect(),
        }
    }

    /// Write the fixture as pretty-printed JSON followed by a newline
    pub fn write_json(&self, mut writer: impl Write) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer).map_err(serde_json::Error::io)?;
        writer.flush().map_err(serde_json::Error::io)
    }
}
