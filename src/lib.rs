// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Recording the raw byte sequences a terminal sends for key presses

pub mod capture;
pub mod fixture;
pub mod key;
pub mod layout;
pub mod locale;
pub mod locate;
pub mod mode;
pub mod parse;
pub mod prompts;

pub use capture::{KeyCaptureSession, RawSequence, RecordedSample};
pub use fixture::{Fixture, TerminalProfile};
pub use key::{Key, KeyIdentity, Modifiers};
pub use locate::{Database, locate, search_directories};
pub use mode::{RawModeGuard, StdinTerminal};
pub use parse::KeypadMode;
pub use prompts::{GroupSelector, catalogue, catalogue_for};
