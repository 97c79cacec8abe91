// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Switching the terminal into raw input mode and back
//!
//! [`RawModeGuard::activate`] saves the terminal settings and installs the
//! raw configuration. The saved settings are put back exactly once, either by
//! [`RawModeGuard::restore`] or when the guard is dropped.

use std::{io, os::fd::AsFd};

use nix::{
    libc::tcflag_t,
    sys::termios::{self, ControlFlags, InputFlags, LocalFlags, OutputFlags, SetArg},
};
use tracing::{debug, warn};

use crate::layout::Layout;

/// Errors reported when switching the terminal mode
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The current terminal settings could not be read
    #[error("Cannot query terminal settings: {0}")]
    TerminalQueryFailed(#[source] io::Error),
    /// The raw input settings could not be applied
    #[error("Cannot configure terminal: {0}")]
    TerminalConfigureFailed(#[source] io::Error),
}

/// Copy of the terminal control block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawModeSnapshot {
    pub input_flags: u64,
    pub output_flags: u64,
    pub control_flags: u64,
    pub local_flags: u64,
    pub control_chars: Vec<u8>,
}

impl RawModeSnapshot {
    /// Erase character, zero if the layout index is out of range
    pub fn erase(&self, layout: &Layout) -> u8 {
        self.control_chars.get(layout.verase).copied().unwrap_or(0)
    }

    fn set_control_char(&mut self, index: usize, value: u8) {
        if let Some(slot) = self.control_chars.get_mut(index) {
            *slot = value;
        }
    }
}

/// Derive the capture configuration from the saved settings
///
/// Signals stay enabled so that interrupt still works, XON/XOFF flow control
/// is turned off, canonical and extended input processing are turned off and
/// reads return as soon as one byte is available. Echo is left untouched.
pub fn raw_input(saved: &RawModeSnapshot, layout: &Layout) -> RawModeSnapshot {
    let mut raw = saved.clone();
    raw.local_flags |= layout.isig;
    raw.input_flags &= !(layout.ixon | layout.ixoff);
    raw.local_flags &= !(layout.icanon | layout.iexten);
    raw.set_control_char(layout.vmin, 1);
    raw.set_control_char(layout.vtime, 0);
    raw
}

/// Access to the terminal control block
pub trait TerminalDevice {
    /// Read the current settings
    fn attributes(&self) -> io::Result<RawModeSnapshot>;
    /// Apply settings immediately
    fn set_attributes(&self, snapshot: &RawModeSnapshot) -> io::Result<()>;
}

/// The terminal attached to standard input
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinTerminal;

impl TerminalDevice for StdinTerminal {
    fn attributes(&self) -> io::Result<RawModeSnapshot> {
        let termios = termios::tcgetattr(io::stdin().as_fd())?;
        Ok(RawModeSnapshot {
            input_flags: u64::from(termios.input_flags.bits()),
            output_flags: u64::from(termios.output_flags.bits()),
            control_flags: u64::from(termios.control_flags.bits()),
            local_flags: u64::from(termios.local_flags.bits()),
            control_chars: termios.control_chars.to_vec(),
        })
    }

    fn set_attributes(&self, snapshot: &RawModeSnapshot) -> io::Result<()> {
        // Start from the current block so that fields we don't track (line
        // speeds, line discipline) are preserved.
        let mut termios = termios::tcgetattr(io::stdin().as_fd())?;
        termios.input_flags = InputFlags::from_bits_retain(snapshot.input_flags as tcflag_t);
        termios.output_flags = OutputFlags::from_bits_retain(snapshot.output_flags as tcflag_t);
        termios.control_flags =
            ControlFlags::from_bits_retain(snapshot.control_flags as tcflag_t);
        termios.local_flags = LocalFlags::from_bits_retain(snapshot.local_flags as tcflag_t);
        for (slot, value) in termios.control_chars.iter_mut().zip(&snapshot.control_chars) {
            *slot = *value;
        }
        termios::tcsetattr(io::stdin().as_fd(), SetArg::TCSANOW, &termios)?;
        Ok(())
    }
}

/// Raw input mode, active for the lifetime of the guard
#[derive(Debug)]
pub struct RawModeGuard<D: TerminalDevice> {
    device: D,
    saved: RawModeSnapshot,
    erase: u8,
    restored: bool,
}

impl<D: TerminalDevice> RawModeGuard<D> {
    /// Save the current settings and switch to raw input
    pub fn activate(device: D, layout: &Layout) -> Result<Self, Error> {
        let saved = device.attributes().map_err(Error::TerminalQueryFailed)?;
        let raw = raw_input(&saved, layout);
        device
            .set_attributes(&raw)
            .map_err(Error::TerminalConfigureFailed)?;
        let erase = saved.erase(layout);
        debug!(layout = layout.name, erase, "raw mode active");
        Ok(Self {
            device,
            saved,
            erase,
            restored: false,
        })
    }

    /// Erase character of the settings in effect before activation
    pub const fn erase(&self) -> u8 {
        self.erase
    }

    /// Put the saved settings back
    pub fn restore(mut self) {
        self.restore_once();
    }

    fn restore_once(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        match self.device.set_attributes(&self.saved) {
            Ok(()) => debug!("terminal settings restored"),
            Err(err) => warn!("cannot restore terminal settings: {err}"),
        }
    }
}

impl<D: TerminalDevice> Drop for RawModeGuard<D> {
    fn drop(&mut self) {
        self.restore_once();
    }
}
