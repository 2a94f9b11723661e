//! The display-text collaborator of the Tessera Templating Engine.
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
        context::Value,
        error::Result,
    },
    heck::{
        ToKebabCase,
        ToLowerCamelCase,
        ToSnakeCase,
        ToUpperCamelCase,
    },
};

/// Renders values as display text and post-processes literal phrases.
///
/// Swap in an implementation to localize output: every literal run is
/// handed to [`Stringify::translate`] with its embedded values replaced by
/// `$1`, `$2`, ... placeholders, which are substituted back afterwards.
pub
trait Stringify: Send + Sync {
    /// Render `value` as display text.
    fn stringify(&self, value: &Value) -> Result<String>;

    /// Post-process a literal phrase.
    fn translate(&self, phrase: &str) -> Result<String> {
        Ok(phrase.to_owned())
    }
}

/// Renders values with their `Display` form and leaves phrases untouched.
#[derive(Debug, Default, Clone, Copy)]
pub
struct PlainText;

impl Stringify for PlainText {
    fn stringify(&self, value: &Value) -> Result<String> {
        Ok(value.to_string())
    }
}

fn uc_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lc_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Properties available on the display text of any value.
///
/// Consulted when a path segment is missing from the value itself.
pub(crate)
fn text_property(text: &str, name: &str) -> Option<Value> {
    let value = match name {
        "length" => return Some(Value::from(text.chars().count())),
        "lower" => text.to_lowercase(),
        "upper" => text.to_uppercase(),
        "trim" => text.trim().to_owned(),
        "ucFirst" => uc_first(text),
        "lcFirst" => lc_first(text),
        "camel" => text.to_lower_camel_case(),
        "pascal" => text.to_upper_camel_case(),
        "kebab" => text.to_kebab_case(),
        "snake" => text.to_snake_case(),
        _ => return None,
    };

    Some(Value::String(value))
}
