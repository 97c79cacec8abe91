// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Interactive capture of key press sequences
//!
//! The operator is walked through the prompts of a [`Catalogue`]. Every
//! prompt performs exactly one blocking read; whatever bytes that read
//! returns become the sample for the prompted key. A lone Escape means the
//! combination cannot be produced and no sample is kept.

use std::{
    io::{self, Read, Write},
    marker::PhantomData,
};

use tracing::{debug, info, warn};

use crate::{
    key::KeyIdentity,
    mode::{RawModeGuard, TerminalDevice},
    parse::KeypadMode,
    prompts::{Catalogue, GroupSelector, Phase, PromptGroup},
};

/// Capacity of the buffer used for a single key press
pub const READ_CAPACITY: usize = 1024;

/// Escape key code
pub const ESCAPE: u8 = 0x1b;

/// Bytes returned by one read in response to a key press
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSequence(Vec<u8>);

impl RawSequence {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// True for the single Escape byte used to skip a prompt
    pub fn is_escape_only(&self) -> bool {
        self.0 == [ESCAPE]
    }
}

impl From<&[u8]> for RawSequence {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

/// A key identity and the bytes the terminal sent for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSample {
    pub identity: KeyIdentity,
    pub sequence: RawSequence,
    pub label: Option<String>,
}

/// Operator-driven capture over a terminal in raw input mode
///
/// The session borrows the raw mode guard, so it cannot outlive raw mode.
#[derive(Debug)]
pub struct KeyCaptureSession<'g, R, W> {
    input: R,
    output: W,
    keypad: Option<KeypadMode>,
    samples: Vec<RecordedSample>,
    raw_mode: PhantomData<&'g ()>,
}

impl<'g, R: Read, W: Write> KeyCaptureSession<'g, R, W> {
    pub fn new<D: TerminalDevice>(_raw_mode: &'g RawModeGuard<D>, input: R, output: W) -> Self {
        Self {
            input,
            output,
            keypad: None,
            samples: vec![],
            raw_mode: PhantomData,
        }
    }

    /// Sequences switching the keypad into application mode and back
    #[must_use]
    pub fn with_keypad_mode(mut self, keypad: Option<KeypadMode>) -> Self {
        self.keypad = keypad;
        self
    }

    /// Samples recorded so far, in prompt order
    pub fn samples(&self) -> &[RecordedSample] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<RecordedSample> {
        self.samples
    }

    fn read_raw(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
        loop {
            match self.input.read(buffer) {
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                result => return result,
            }
        }
    }

    /// Read one reply for a gate or a question, lowercased
    fn read_answer(&mut self) -> io::Result<u8> {
        let mut buffer = [0u8; READ_CAPACITY];
        let count = self.read_raw(&mut buffer)?;
        writeln!(self.output)?;
        if count == 0 {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        Ok(buffer[0].to_ascii_lowercase())
    }

    fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")?;
        self.output.flush()
    }

    /// Show `text` and check that the operator typed `expected`
    ///
    /// Letters are compared case insensitively. Callers repeat the gate until
    /// it succeeds.
    pub fn confirm(&mut self, text: &str, expected: u8) -> io::Result<bool> {
        self.say(text)?;
        let answer = self.read_answer()?;
        Ok(answer == expected.to_ascii_lowercase())
    }

    /// Ask a yes/no question until it is answered
    pub fn ask(&mut self, question: &str) -> io::Result<bool> {
        loop {
            self.say(question)?;
            match self.read_answer()? {
                b'y' => return Ok(true),
                b'n' => return Ok(false),
                _ => {}
            }
        }
    }

    /// Prompt for every key of an enabled group and record the replies
    pub fn record_group(
        &mut self,
        group: &PromptGroup,
        selector: &GroupSelector,
    ) -> io::Result<()> {
        if !selector.is_enabled(group.code) {
            debug!(group = %group.code, "group disabled");
            return Ok(());
        }
        info!(group = %group.code, prompts = group.prompts.len(), "recording group");
        self.say(&format!("\n{}:", group.title))?;

        let mut buffer = [0u8; READ_CAPACITY];
        for prompt in &group.prompts {
            write!(self.output, "{}: ", prompt.label)?;
            self.output.flush()?;
            let count = match self.read_raw(&mut buffer) {
                Ok(count) => count,
                Err(err) => {
                    warn!(label = %prompt.label, "read failed: {err}");
                    0
                }
            };
            writeln!(self.output)?;

            let sequence = RawSequence::from(&buffer[..count]);
            if sequence.is_escape_only() {
                debug!(label = %prompt.label, "skipped by operator");
                continue;
            }
            debug!(label = %prompt.label, bytes = ?sequence.as_bytes(), "recorded");
            self.samples.push(RecordedSample {
                identity: prompt.identity,
                sequence,
                label: Some(prompt.label.clone()),
            });
        }
        Ok(())
    }

    fn record_groups(&mut self, phase: &Phase, selector: &GroupSelector) -> io::Result<()> {
        for group in &phase.groups {
            self.record_group(group, selector)?;
        }
        Ok(())
    }

    fn write_control(&mut self, sequence: &[u8]) -> io::Result<()> {
        self.output.write_all(sequence)?;
        self.output.flush()
    }

    /// Pass the confirmation gate of a phase and record its groups
    ///
    /// A phase without enabled groups is skipped without showing the gate.
    pub fn run_phase(&mut self, phase: &Phase, selector: &GroupSelector) -> io::Result<()> {
        if !phase.groups.iter().any(|group| selector.is_enabled(group.code)) {
            return Ok(());
        }

        let keypad = if phase.application_mode {
            let Some(keypad) = self.keypad.clone() else {
                warn!("terminal has no keypad transmit capability");
                return self.say("\nKeypad application mode is not available, skipping.");
            };
            Some(keypad)
        } else {
            None
        };

        while !self.confirm(phase.confirmation, phase.expected)? {}

        let Some(keypad) = keypad else {
            return self.record_groups(phase, selector);
        };
        self.write_control(&keypad.enter)?;
        let result = self.record_groups(phase, selector);
        let exit = self.write_control(&keypad.exit);
        result.and(exit)
    }

    /// Run the standard phase, then the keypad phases if the operator agrees
    pub fn run(&mut self, catalogue: &Catalogue, selector: &GroupSelector) -> io::Result<()> {
        self.run_phase(&catalogue.standard, selector)?;

        let keypad_enabled = catalogue
            .keypad
            .iter()
            .flat_map(|phase| &phase.groups)
            .any(|group| selector.is_enabled(group.code));
        if !keypad_enabled || !self.ask(catalogue.keypad_question)? {
            info!("numeric keypad skipped");
            return Ok(());
        }
        for phase in &catalogue.keypad {
            self.run_phase(phase, selector)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::collections::VecDeque;

    use super::*;
    use crate::{
        key::{Key, Modifiers},
        layout::LINUX,
        mode::RawModeSnapshot,
        prompts::{Prompt, catalogue},
    };

    struct NullTerminal;

    impl TerminalDevice for NullTerminal {
        fn attributes(&self) -> io::Result<RawModeSnapshot> {
            Ok(RawModeSnapshot {
                input_flags: 0,
                output_flags: 0,
                control_flags: 0,
                local_flags: 0,
                control_chars: vec![0; 20],
            })
        }

        fn set_attributes(&self, _snapshot: &RawModeSnapshot) -> io::Result<()> {
            Ok(())
        }
    }

    /// Input returning one scripted chunk per read
    struct Script(VecDeque<io::Result<Vec<u8>>>);

    impl Script {
        fn new(chunks: &[&[u8]]) -> Self {
            Self(chunks.iter().map(|chunk| Ok(chunk.to_vec())).collect())
        }
    }

    impl Read for Script {
        fn read(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
            match self.0.pop_front() {
                Some(Ok(chunk)) => {
                    buffer[..chunk.len()].copy_from_slice(&chunk);
                    Ok(chunk.len())
                }
                Some(Err(err)) => Err(err),
                None => Ok(0),
            }
        }
    }

    fn group(code: char, keys: &[Key]) -> PromptGroup {
        PromptGroup {
            code,
            title: "Test keys",
            prompts: keys
                .iter()
                .map(|&key| Prompt::new(KeyIdentity::new(key, '\0', Modifiers::NONE)))
                .collect(),
        }
    }

    fn phase(groups: Vec<PromptGroup>, application_mode: bool) -> Phase {
        Phase {
            confirmation: "Ready?",
            expected: b'y',
            application_mode,
            groups,
        }
    }

    fn keys(samples: &[RecordedSample]) -> Vec<Key> {
        samples.iter().map(|sample| sample.identity.key).collect()
    }

    #[test]
    fn escape_only_discarded() {
        let guard = RawModeGuard::activate(NullTerminal, &LINUX).unwrap();
        let input = Script::new(&[b"\x1b", b"\x1b[A"]);
        let mut session = KeyCaptureSession::new(&guard, input, io::sink());
        let selector = GroupSelector::all();
        session
            .record_group(&group('a', &[Key::F1, Key::UpArrow]), &selector)
            .unwrap();
        let samples = session.into_samples();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].identity.key, Key::UpArrow);
        assert_eq!(samples[0].sequence.as_bytes(), [27, 91, 65]);
        assert_eq!(samples[0].label.as_deref(), Some("Up Arrow"));
    }

    #[test]
    fn double_escape_kept() {
        let guard = RawModeGuard::activate(NullTerminal, &LINUX).unwrap();
        let input = Script::new(&[b"\x1b\x1b"]);
        let mut session = KeyCaptureSession::new(&guard, input, io::sink());
        session
            .record_group(&group('e', &[Key::Escape]), &GroupSelector::all())
            .unwrap();
        assert_eq!(session.samples()[0].sequence.as_bytes(), b"\x1b\x1b");
    }

    #[test]
    fn failed_and_empty_reads_recorded() {
        let guard = RawModeGuard::activate(NullTerminal, &LINUX).unwrap();
        let input = Script(VecDeque::from([
            Err(io::Error::from(io::ErrorKind::Interrupted)),
            Ok(b"\x1bOP".to_vec()),
            Err(io::Error::other("device gone")),
        ]));
        let mut session = KeyCaptureSession::new(&guard, input, io::sink());
        session
            .record_group(&group('f', &[Key::F1, Key::F2, Key::F3]), &GroupSelector::all())
            .unwrap();
        let samples = session.into_samples();
        assert_eq!(keys(&samples), [Key::F1, Key::F2, Key::F3]);
        assert_eq!(samples[0].sequence.as_bytes(), b"\x1bOP");
        assert!(samples[1].sequence.as_bytes().is_empty());
        assert!(samples[2].sequence.as_bytes().is_empty());
    }

    #[test]
    fn repeated_identity_kept_in_order() {
        let guard = RawModeGuard::activate(NullTerminal, &LINUX).unwrap();
        let input = Script::new(&[b"\x7f", b"\x08", b"\x7f"]);
        let mut session = KeyCaptureSession::new(&guard, input, io::sink());
        session
            .record_group(
                &group('e', &[Key::Backspace, Key::Backspace, Key::Backspace]),
                &GroupSelector::all(),
            )
            .unwrap();
        let bytes: Vec<&[u8]> = session
            .samples()
            .iter()
            .map(|sample| sample.sequence.as_bytes())
            .collect();
        assert_eq!(bytes, [b"\x7f", b"\x08", b"\x7f"]);
    }

    #[test]
    fn confirm_case_insensitive() {
        let guard = RawModeGuard::activate(NullTerminal, &LINUX).unwrap();
        let input = Script::new(&[b"n", b"Y"]);
        let mut output = vec![];
        let mut session = KeyCaptureSession::new(&guard, input, &mut output);
        assert!(!session.confirm("Press y", b'y').unwrap());
        assert!(session.confirm("Press y", b'y').unwrap());
        drop(session);
        assert!(String::from_utf8(output).unwrap().starts_with("Press y\n"));
    }

    #[test]
    fn confirm_end_of_input() {
        let guard = RawModeGuard::activate(NullTerminal, &LINUX).unwrap();
        let mut session = KeyCaptureSession::new(&guard, Script::new(&[]), io::sink());
        let err = session.confirm("Press y", b'y').unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn gate_repeats_until_confirmed() {
        let guard = RawModeGuard::activate(NullTerminal, &LINUX).unwrap();
        let input = Script::new(&[b"x", b"q", b"y", b"\x1bOQ"]);
        let mut output = vec![];
        let mut session = KeyCaptureSession::new(&guard, input, &mut output);
        session
            .run_phase(&phase(vec![group('f', &[Key::F2])], false), &GroupSelector::all())
            .unwrap();
        assert_eq!(session.samples()[0].sequence.as_bytes(), b"\x1bOQ");
        drop(session);
        assert_eq!(String::from_utf8(output).unwrap().matches("Ready?").count(), 3);
    }

    #[test]
    fn disabled_group_not_prompted() {
        let guard = RawModeGuard::activate(NullTerminal, &LINUX).unwrap();
        let input = Script::new(&[b"y", b"\x1bOP", b"\x1b[H"]);
        let mut output = vec![];
        let mut session = KeyCaptureSession::new(&guard, input, &mut output);
        let known = ['f', 'a', 'n'];
        let selector = GroupSelector::parse("fn", &known).unwrap();
        let groups = vec![
            group('f', &[Key::F1]),
            group('a', &[Key::UpArrow, Key::DownArrow]),
            group('n', &[Key::Home]),
        ];
        session.run_phase(&phase(groups, false), &selector).unwrap();
        assert_eq!(keys(session.samples()), [Key::F1, Key::Home]);
        assert_eq!(session.samples()[1].sequence.as_bytes(), b"\x1b[H");
        drop(session);
        let output = String::from_utf8(output).unwrap();
        assert!(!output.contains("Up Arrow"));
        assert!(output.contains("Home: "));
    }

    #[test]
    fn disabled_phase_skips_gate() {
        let guard = RawModeGuard::activate(NullTerminal, &LINUX).unwrap();
        let mut output = vec![];
        let mut session = KeyCaptureSession::new(&guard, Script::new(&[]), &mut output);
        let selector = GroupSelector::parse("", &['f']).unwrap();
        session
            .run_phase(&phase(vec![group('f', &[Key::F1])], false), &selector)
            .unwrap();
        assert!(session.samples().is_empty());
        drop(session);
        assert!(output.is_empty());
    }

    #[test]
    fn application_mode_wraps_prompts() {
        let guard = RawModeGuard::activate(NullTerminal, &LINUX).unwrap();
        let input = Script::new(&[b"y", b"\x1bOp"]);
        let mut output = vec![];
        let keypad = KeypadMode {
            enter: b"\x1b[?1h\x1b=".to_vec(),
            exit: b"\x1b[?1l\x1b>".to_vec(),
        };
        let mut session =
            KeyCaptureSession::new(&guard, input, &mut output).with_keypad_mode(Some(keypad));
        session
            .run_phase(&phase(vec![group('x', &[Key::NumPad0])], true), &GroupSelector::all())
            .unwrap();
        assert_eq!(session.samples()[0].sequence.as_bytes(), b"\x1bOp");
        drop(session);
        let enter = output.windows(7).position(|w| w == b"\x1b[?1h\x1b=").unwrap();
        let prompt = output.windows(7).position(|w| w == b"NumPad0").unwrap();
        let exit = output.windows(7).position(|w| w == b"\x1b[?1l\x1b>").unwrap();
        assert!(enter < prompt && prompt < exit);
    }

    #[test]
    fn application_mode_left_after_empty_read() {
        let guard = RawModeGuard::activate(NullTerminal, &LINUX).unwrap();
        let input = Script::new(&[b"y"]);
        let mut output = vec![];
        let keypad = KeypadMode {
            enter: b"<smkx>".to_vec(),
            exit: b"<rmkx>".to_vec(),
        };
        let mut session =
            KeyCaptureSession::new(&guard, input, &mut output).with_keypad_mode(Some(keypad));
        // End of input on a key prompt records an empty sequence
        session
            .run_phase(&phase(vec![group('x', &[Key::NumPad1])], true), &GroupSelector::all())
            .unwrap();
        drop(session);
        assert!(String::from_utf8(output).unwrap().ends_with("<rmkx>"));
    }

    #[test]
    fn application_mode_unavailable() {
        let guard = RawModeGuard::activate(NullTerminal, &LINUX).unwrap();
        let mut session = KeyCaptureSession::new(&guard, Script::new(&[]), io::sink());
        session
            .run_phase(&phase(vec![group('x', &[Key::NumPad0])], true), &GroupSelector::all())
            .unwrap();
        assert!(session.samples().is_empty());
    }

    #[test]
    fn keypad_declined() {
        let guard = RawModeGuard::activate(NullTerminal, &LINUX).unwrap();
        let catalogue = catalogue();
        let selector = GroupSelector::parse("dk", &catalogue.codes()).unwrap();
        let mut input: Vec<&[u8]> = Vec::new();
        input.push(b"y");
        // Digits without and with Alt
        for _ in 0..20 {
            input.push(b"0");
        }
        input.push(b"?");
        input.push(b"n");
        let script = Script(input.iter().map(|chunk| Ok(chunk.to_vec())).collect());
        let mut session = KeyCaptureSession::new(&guard, script, io::sink());
        session.run(&catalogue, &selector).unwrap();
        let samples = session.into_samples();
        assert_eq!(samples.len(), 20);
        assert!(samples.iter().all(|sample| sample.identity.key != Key::NumPad0));
    }

    #[test]
    fn keypad_only() {
        let guard = RawModeGuard::activate(NullTerminal, &LINUX).unwrap();
        let catalogue = catalogue();
        let selector = GroupSelector::parse("k", &catalogue.codes()).unwrap();
        let mut input: Vec<&[u8]> = Vec::new();
        input.push(b"y");
        input.push(b"y");
        for _ in 0..16 {
            input.push(b"5");
        }
        let script = Script(input.iter().map(|chunk| Ok(chunk.to_vec())).collect());
        let mut session = KeyCaptureSession::new(&guard, script, io::sink());
        session.run(&catalogue, &selector).unwrap();
        let samples = session.into_samples();
        assert_eq!(samples.len(), 16);
        assert_eq!(samples[0].identity.key, Key::NumPad0);
        assert_eq!(samples[15].identity.key, Key::Enter);
    }
}
