//! Error types for the Tessera Templating Engine.
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
    crate::file::Coordinate,
    std::{
        error::Error as StdError,
        fmt::{
            Display,
            Formatter,
            Result as FmtResult,
        },
        io::Error as IOError,
        path::PathBuf,
        result::Result as StdResult,
    },
    serde_json::Error as JsonError,
};

/// The error type for the Tessera Templating Engine.
///
/// Malformed markup never produces an error: unterminated expressions,
/// unmatched closing tags and unbalanced elements are passed through as
/// text. The only template-level failure is an attribute block that is
/// never terminated.
#[derive(Debug)]
pub enum Error {
    IO(IOError, PathBuf),
    JsonParse(JsonError, PathBuf),
    UnterminatedAttributeBlock(Coordinate, PathBuf),
    Function(String),
}

impl Display for Error {
    fn fmt(&self, fmtr: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::IO(e, p) => fmtr.write_fmt(format_args!("IO error in {:?} {:?}", p, e)),
            Self::JsonParse(e, p) => fmtr.write_fmt(format_args!("Json error in {:?} {:?}", p, e)),
            Self::UnterminatedAttributeBlock(c, p) => fmtr.write_fmt(format_args!(
                "Missing data-end matching data-if in {:?} at line {} position {}",
                p,
                c.line() + 1,
                c.position() + 1,
            )),
            Self::Function(msg) => fmtr.write_fmt(format_args!(
                "Function call failed: {}",
                msg,
            )),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::IO(e, _) => Some(e),
            Self::JsonParse(e, _) => Some(e),
            _ => None,
        }
    }
}

/// The result type for the Tessera Templating Engine.
pub type Result<T> = StdResult<T, Error>;
