//! Rendering options for the Tessera Templating Engine.
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
        error::{
            Error,
            Result,
        },
        file::read_file,
    },
    serde::Deserialize,
    serde_json::from_str as from_json_str,
    std::{
        collections::BTreeSet,
        env::current_dir,
        path::{
            Path,
            PathBuf,
        },
    },
};

/// Elements whose content becomes a `$N` placeholder inside a literal run.
pub
const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "acronym", "b", "bdo", "big", "button", "cite", "code",
    "data", "del", "dfn", "em", "font", "i", "img", "input", "ins", "kbd",
    "label", "map", "mark", "meter", "object", "optgroup", "option",
    "output", "picture", "q", "rt", "samp", "select", "small", "span",
    "strike", "strong", "sub", "sup", "svg", "time", "tspan", "tt", "u",
    "var", "wbr",
];

/// Attributes whose values are literal runs.
pub
const LITERAL_ATTRIBUTES: &[&str] = &[
    "alt", "enterkeyhint", "label", "lang", "placeholder", "srcdoc", "title",
];

/// Elements whose content is a literal run.
pub
const LITERAL_ELEMENTS: &[&str] = &[
    "a", "abbr", "acronym", "article", "aside", "b", "bdi", "bdo", "big",
    "blockquote", "body", "br", "button", "caption", "center", "cite",
    "data", "datalist", "dd", "del", "desc", "details", "dfn", "dialog",
    "div", "dt", "em", "fieldset", "figcaption", "figure", "font", "footer",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "i",
    "iframe", "ins", "keygen", "label", "legend", "li", "main", "mark",
    "menuitem", "meter", "nav", "noframes", "noscript", "optgroup",
    "option", "p", "pre", "q", "rb", "s", "section", "select", "small",
    "span", "strike", "strong", "sub", "summary", "sup", "td", "template",
    "text", "textarea", "textpath", "th", "time", "title", "tspan", "u",
    "wbr",
];

/// Elements that never have a closing tag.
pub
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "br", "col", "embed", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track",
];

fn set_of(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|n| (*n).to_owned()).collect()
}

fn default_app_dir() -> PathBuf {
    current_dir().unwrap_or_default()
}

/// What the parser does while rendering, and which elements it treats
/// specially.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub
struct Options {
    /// Evaluate `{...}` expressions and comment directives.
    pub do_expression: bool,
    /// Extract literal runs for phrase-level post-processing.
    pub do_literal: bool,
    /// The application root that `/` include paths and head assets are
    /// resolved against.
    pub app_dir: PathBuf,
    pub inline_elements: BTreeSet<String>,
    pub literal_attributes: BTreeSet<String>,
    pub literal_elements: BTreeSet<String>,
    pub void_elements: BTreeSet<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            do_expression: true,
            do_literal: false,
            app_dir: default_app_dir(),
            inline_elements: set_of(INLINE_ELEMENTS),
            literal_attributes: set_of(LITERAL_ATTRIBUTES),
            literal_elements: set_of(LITERAL_ELEMENTS),
            void_elements: set_of(VOID_ELEMENTS),
        }
    }
}

impl Options {
    /// Read options from a JSON file. Missing keys keep their defaults.
    pub
    fn read<P>(p: P) -> Result<Self>
    where
        P: AsRef<Path>
    {
        let file = read_file(&p)?;
        from_json_str::<Self>(&file).map_err(|e| Error::JsonParse(e, p.as_ref().into()))
    }

    pub(crate)
    fn is_inline(&self, tag: &str) -> bool {
        self.inline_elements.contains(tag)
    }

    pub(crate)
    fn is_literal_attribute(&self, attribute: &str) -> bool {
        self.literal_attributes.contains(attribute)
    }

    pub(crate)
    fn is_literal_element(&self, tag: &str) -> bool {
        self.literal_elements.contains(tag)
    }

    pub(crate)
    fn is_void(&self, tag: &str) -> bool {
        self.void_elements.contains(tag)
    }
}
