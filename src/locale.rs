// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Character set of the current locale

use std::env;

/// Locale variables in order of precedence
const LOCALE_VARIABLES: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// Returns the charset named by the locale environment, lowercased
///
/// The first non-blank variable of `LC_ALL`, `LC_MESSAGES` and `LANG` is
/// used. Returns `None` if none is set or the locale has no charset part.
pub fn charset() -> Option<String> {
    let locale = LOCALE_VARIABLES
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.trim().is_empty())?;
    charset_of(&locale)
}

/// Extract the charset from a locale name such as `en_US.UTF-8@euro`
pub fn charset_of(locale: &str) -> Option<String> {
    let (_, rest) = locale.split_once('.')?;
    let charset = rest.split_once('@').map_or(rest, |(charset, _)| charset);
    Some(charset.to_lowercase())
}
