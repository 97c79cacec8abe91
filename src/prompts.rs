// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Key prompts shown to the operator, grouped by key category

use std::collections::BTreeSet;

use crate::{
    key::{Key, KeyIdentity, Modifiers},
    layout::{Layout, NATIVE},
};

const CTRL: Modifiers = Modifiers::CONTROL;
const ALT: Modifiers = Modifiers::ALT;
const SHIFT: Modifiers = Modifiers::SHIFT;
const NONE: Modifiers = Modifiers::NONE;

/// Modifier combinations tried for function keys
const FUNCTION_CHORDS: [Modifiers; 6] = [
    NONE,
    SHIFT,
    CTRL,
    ALT,
    Modifiers {
        shift: true,
        control: true,
        alt: false,
    },
    Modifiers {
        shift: true,
        alt: true,
        control: false,
    },
];

/// Modifier combinations tried for arrow, navigation and editing keys
const NAVIGATION_CHORDS: [Modifiers; 7] = [
    NONE,
    SHIFT,
    CTRL,
    ALT,
    Modifiers {
        shift: true,
        control: true,
        alt: false,
    },
    Modifiers {
        control: true,
        alt: true,
        shift: false,
    },
    Modifiers {
        shift: true,
        alt: true,
        control: false,
    },
];

/// Errors reported when parsing a group selector
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The letter does not name any prompt group
    #[error("Unknown group '{0}'")]
    UnknownGroup(char),
}

/// Instruction shown to the operator and the key it asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub label: String,
    pub identity: KeyIdentity,
}

impl Prompt {
    pub fn new(identity: KeyIdentity) -> Self {
        Self {
            label: identity.to_string(),
            identity,
        }
    }

    fn labeled(label: &str, identity: KeyIdentity) -> Self {
        Self {
            label: format!("{}{label}", identity.modifiers),
            identity,
        }
    }
}

/// Prompts of one key category, enabled as a unit by a selector letter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptGroup {
    pub code: char,
    pub title: &'static str,
    pub prompts: Vec<Prompt>,
}

/// Prompt groups behind a single confirmation gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phase {
    /// Text shown before the gate
    pub confirmation: &'static str,
    /// Byte the operator has to type to pass the gate
    pub expected: u8,
    /// Prompts run with the keypad in application (transmit) mode
    pub application_mode: bool,
    pub groups: Vec<PromptGroup>,
}

/// All phases of a capture session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalogue {
    pub standard: Phase,
    /// Yes/no question deciding whether the keypad phases run
    pub keypad_question: &'static str,
    pub keypad: Vec<Phase>,
}

impl Catalogue {
    /// All groups in prompt order
    pub fn groups(&self) -> impl Iterator<Item = &PromptGroup> {
        std::iter::once(&self.standard)
            .chain(&self.keypad)
            .flat_map(|phase| &phase.groups)
    }

    /// Selector letters of all groups
    pub fn codes(&self) -> Vec<char> {
        self.groups().map(|group| group.code).collect()
    }
}

/// Set of enabled prompt groups
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSelector {
    /// `None` enables every group
    codes: Option<BTreeSet<char>>,
}

impl GroupSelector {
    /// Enable every group
    pub const fn all() -> Self {
        Self { codes: None }
    }

    /// Enable the groups named by `letters`, checked against `known` codes
    ///
    /// Letters are case insensitive, repeats are allowed.
    pub fn parse(letters: &str, known: &[char]) -> Result<Self, Error> {
        let mut codes = BTreeSet::new();
        for letter in letters.chars().filter(|c| !c.is_whitespace()) {
            let code = letter.to_ascii_lowercase();
            if !known.contains(&code) {
                return Err(Error::UnknownGroup(letter));
            }
            codes.insert(code);
        }
        Ok(Self { codes: Some(codes) })
    }

    pub fn is_enabled(&self, code: char) -> bool {
        self.codes.as_ref().is_none_or(|codes| codes.contains(&code))
    }
}

fn chords(keys: &[(Key, char)], modifiers: &[Modifiers]) -> Vec<Prompt> {
    keys.iter()
        .flat_map(|&(key, key_char)| {
            modifiers
                .iter()
                .map(move |&modifiers| Prompt::new(KeyIdentity::new(key, key_char, modifiers)))
        })
        .collect()
}

fn function_keys() -> PromptGroup {
    let keys: Vec<(Key, char)> = Key::FUNCTION.iter().map(|&key| (key, '\0')).collect();
    PromptGroup {
        code: 'f',
        title: "Function keys",
        prompts: chords(&keys, &FUNCTION_CHORDS),
    }
}

fn arrows() -> PromptGroup {
    let keys = [
        (Key::UpArrow, '\0'),
        (Key::DownArrow, '\0'),
        (Key::LeftArrow, '\0'),
        (Key::RightArrow, '\0'),
    ];
    PromptGroup {
        code: 'a',
        title: "Arrow keys",
        prompts: chords(&keys, &NAVIGATION_CHORDS),
    }
}

fn navigation() -> PromptGroup {
    let keys = [
        (Key::Home, '\0'),
        (Key::End, '\0'),
        (Key::PageUp, '\0'),
        (Key::PageDown, '\0'),
    ];
    PromptGroup {
        code: 'n',
        title: "Home, End, Page Up and Page Down",
        prompts: chords(&keys, &NAVIGATION_CHORDS),
    }
}

fn editing() -> PromptGroup {
    let mut prompts = chords(
        &[(Key::Insert, '\0'), (Key::Delete, '\0')],
        &NAVIGATION_CHORDS,
    );
    prompts.extend(chords(&[(Key::Backspace, '\x08')], &[NONE, CTRL, ALT]));
    prompts.extend(chords(&[(Key::Tab, '\t')], &[NONE, SHIFT, ALT]));
    prompts.extend(chords(&[(Key::Enter, '\r')], &[NONE, CTRL, ALT]));
    prompts.extend(chords(&[(Key::Spacebar, ' ')], &[NONE, CTRL, ALT]));
    PromptGroup {
        code: 'e',
        title: "Editing keys",
        prompts,
    }
}

fn letters(layout: &Layout) -> PromptGroup {
    let mut prompts = vec![];
    for (key, lower) in Key::LETTERS.into_iter().zip('a'..='z') {
        let upper = lower.to_ascii_uppercase();
        // Interrupt, suspend and delayed suspend stay bound to signals
        let signal = match key {
            Key::C | Key::Z => true,
            Key::Y => layout.delayed_suspend,
            _ => false,
        };
        if !signal {
            let control = char::from(lower as u8 - b'a' + 1);
            prompts.push(Prompt::new(KeyIdentity::new(key, control, CTRL)));
        }
        prompts.push(Prompt::new(KeyIdentity::new(key, lower, ALT)));
        prompts.push(Prompt::new(KeyIdentity::new(key, upper, ALT | SHIFT)));
    }
    PromptGroup {
        code: 'l',
        title: "Letters with Ctrl and Alt",
        prompts,
    }
}

fn digits() -> PromptGroup {
    let keys: Vec<(Key, char)> = Key::DIGITS.into_iter().zip('0'..='9').collect();
    PromptGroup {
        code: 'd',
        title: "Digits",
        prompts: chords(&keys, &[NONE, ALT]),
    }
}

fn keypad(code: char, title: &'static str) -> PromptGroup {
    let mut prompts: Vec<Prompt> = Key::NUMPAD_DIGITS
        .into_iter()
        .zip('0'..='9')
        .map(|(key, key_char)| Prompt::new(KeyIdentity::new(key, key_char, NONE)))
        .collect();
    let operators = [
        ("Keypad /", Key::Divide, '/'),
        ("Keypad *", Key::Multiply, '*'),
        ("Keypad -", Key::Subtract, '-'),
        ("Keypad +", Key::Add, '+'),
        ("Keypad .", Key::Decimal, '.'),
        ("Keypad Enter", Key::Enter, '\r'),
    ];
    for (label, key, key_char) in operators {
        prompts.push(Prompt::labeled(label, KeyIdentity::new(key, key_char, NONE)));
    }
    PromptGroup {
        code,
        title,
        prompts,
    }
}

/// Prompt phases in the order they are presented
pub fn catalogue() -> Catalogue {
    catalogue_for(NATIVE)
}

/// Prompt phases for a terminal with the given control block layout
pub fn catalogue_for(layout: &Layout) -> Catalogue {
    Catalogue {
        standard: Phase {
            confirmation: "Press each key combination when asked. If your terminal or \
                desktop does not pass a combination through, press Escape instead.\n\
                Press 'y' to begin.",
            expected: b'y',
            application_mode: false,
            groups: vec![
                function_keys(),
                arrows(),
                navigation(),
                editing(),
                letters(layout),
                digits(),
            ],
        },
        keypad_question: "Does your keyboard have a numeric keypad? (y/n)",
        keypad: vec![
            Phase {
                confirmation: "Switch Num Lock on, then press 'y'.",
                expected: b'y',
                application_mode: false,
                groups: vec![keypad('k', "Numeric keypad")],
            },
            Phase {
                confirmation: "The numeric keypad is switched to application mode now. \
                    Keep Num Lock on and press 'y'.",
                expected: b'y',
                application_mode: true,
                groups: vec![keypad('x', "Numeric keypad in application mode")],
            },
        ],
    }
}
