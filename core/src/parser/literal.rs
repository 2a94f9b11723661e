//! Literal text extraction and translation.
// Copyright (C) 2024  Frankie Baffa
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use {
    crate::{
        error::Result,
        parser::{
            slice,
            Parser,
        },
    },
    log::trace,
    regex::{
        Captures,
        Regex,
    },
    std::{
        mem::take,
        sync::LazyLock,
    },
};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$([1-9][0-9]*)").expect("placeholder pattern")
});

static PLACEHOLDERS_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\$[1-9][0-9]*)+$").expect("placeholder run pattern")
});

/// Substitute the placeholders found in part `n`, following parts that
/// themselves hold placeholders. A part already being expanded is left
/// as its placeholder.
fn expand_part(n: usize, parts: &[String], chain: &mut Vec<usize>) -> String {
    chain.push(n);
    let expanded = PLACEHOLDER.replace_all(&parts[n], |caps: &Captures| {
        match caps[1].parse::<usize>().ok().map(|m| m - 1) {
            Some(m) if m < parts.len() && !chain.contains(&m) => expand_part(m, parts, chain),
            _ => caps[0].to_owned(),
        }
    }).into_owned();
    chain.pop();

    expanded
}

/// Replace each `$N` in `text` by the `N`th of `parts`.
fn apply_literals(text: &str, parts: &[String]) -> String {
    let parts = (0..parts.len())
        .map(|n| expand_part(n, parts, &mut Vec::new()))
        .collect::<Vec<String>>();

    PLACEHOLDER.replace_all(text, |caps: &Captures| {
        caps[1].parse::<usize>()
            .ok()
            .and_then(|n| parts.get(n - 1))
            .cloned()
            .unwrap_or_else(|| caps[0].to_owned())
    }).into_owned()
}

fn is_placeholders_only(text: &str) -> bool {
    PLACEHOLDERS_ONLY.is_match(text)
}

impl Parser {
    /// Translate `text`, then put `parts` back in place of their
    /// placeholders. Surrounding whitespace is kept as is.
    pub(crate)
    fn combine_literals(&self, text: &str, parts: &[String]) -> Result<String> {
        let trimmed_end = text.trim_end();
        let right = trimmed_end.len();
        let phrase = trimmed_end.trim_start();
        if phrase.is_empty() {
            return Ok(text.to_owned());
        }
        let left = right - phrase.len();

        let combined = if parts.is_empty() {
            self.stringify.translate(phrase)?
        }
        else if is_placeholders_only(phrase) {
            apply_literals(phrase, parts)
        }
        else {
            apply_literals(&self.stringify.translate(phrase)?, parts)
        };
        trace!("literal {phrase:?} => {combined:?}");

        Ok(format!("{}{}{}", &text[..left], combined, &text[right..]))
    }

    /// Close the literal run pending up to `index`, writing it out
    /// translated.
    ///
    /// The run made of a `<title>` content is kept as the title of the
    /// document when rendering an include.
    pub(crate)
    fn literal_target(&mut self, index: usize, is_title: bool) -> Result<()> {
        let combined = if self.literal_parts.is_empty() {
            let combined = self.combine_literals(slice(&self.source, self.start, index), &[])?;
            self.target.push_str(&combined);
            combined
        }
        else {
            self.target.push_str(slice(&self.source, self.start, index));
            let parts = take(&mut self.literal_parts);
            let combined = self.combine_literals(&self.target, &parts)?;
            self.target = self.target_stack.pop().unwrap_or_default() + &combined;
            combined
        };

        if is_title && self.assets.collecting {
            self.assets.head_title = Some(combined);
        }
        self.start = index.max(self.start);

        Ok(())
    }
}
