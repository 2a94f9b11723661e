//! Markers recognized by the Tessera Templating Engine.
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

pub(crate)
const OPEN: u8 = b'{';

pub(crate)
const CLOSE: u8 = b'}';

pub(crate)
const URL_OPEN: u8 = b'(';

pub(crate)
const URL_CLOSE: u8 = b')';

pub(crate)
const TAG_OPEN: u8 = b'<';

pub(crate)
const TAG_CLOSE: u8 = b'>';

pub(crate)
const CONDITIONAL: u8 = b'?';

pub(crate)
const ESCAPE: u8 = b'\\';

pub(crate)
const PLACEHOLDER: char = '$';

pub(crate)
const SCOPESEP: char = '.';

pub(crate)
const BLOCK_BACK: char = '-';

pub(crate)
const ALL_VALUES: &str = "*";

pub(crate)
const WHITESPACE: &[u8] = b" \n\r\t\x0c";

pub(crate)
const TAG_NAME_END: &[u8] = b" >\n\r\t\x0c";

pub(crate)
const ATTRIBUTE_NAME_END: &[u8] = b" =>\n\r\t\x0c";

pub(crate)
const COMMENT_OPEN: &str = "<!--";

pub(crate)
const COMMENT_CLOSE: &str = "-->";

pub(crate)
const END_BLOCK: &str = "end-->";

pub(crate)
const CDATA: &str = "CDATA[";

pub(crate)
const CDATA_CLOSE: &str = "]]>";

pub(crate)
const SCRIPT_CLOSE: &str = "</script>";

pub(crate)
const DOCTYPE: &str = "<!DOCTYPE html>";

pub(crate)
const APP_SCHEME: &str = "app://";

/// The path token anchoring an included region.
pub(crate)
const BEGIN: &str = "BEGIN";

pub(crate)
const BEGIN_MARKER: &str = "BEGIN-->";

pub(crate)
const END_MARKER: &str = "END-->";

pub(crate)
const BEGIN_SPLICE: &str = "<!--BEGIN-->";

pub(crate)
const END_SPLICE: &str = "<!--END-->";

pub(crate)
const CONTENT: &str = "content";

pub(crate)
const DATA_IF: &str = "data-if";

pub(crate)
const DATA_END: &str = "data-end";

pub(crate)
const URL_ATTRIBUTES: &[&str] = &[ "action", "formaction", "href", "location", "src", ];

pub(crate)
const ADDRESS: &str = "address";

pub(crate)
const HEAD: &str = "head";

pub(crate)
const INPUT: &str = "input";

pub(crate)
const LINK: &str = "link";

pub(crate)
const SCRIPT: &str = "script";

pub(crate)
const TITLE: &str = "title";

pub(crate)
const STYLESHEET_EXT: &str = ".css";

pub(crate)
const SCRIPT_EXT: &str = ".js";
