//! File handling utilities for the Tessera Templating Engine.
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
    crate::error::{
        Error,
        Result,
    },
    std::{
        collections::HashMap,
        fmt::{ Display, Formatter, Result as FmtResult, },
        fs::read_to_string,
        path::{ Path, PathBuf, },
    },
};

const NEWLINE: char = '\n';

/// Read a template or data file as UTF-8 text, byte for byte.
pub(crate)
fn read_file<P: AsRef<Path>>(p: P) -> Result<String> {
    read_to_string(&p).map_err(|e| Error::IO(e, p.as_ref().into()))
}

/// A line and position within a template, both zero based.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub
struct Coordinate {
    line: usize,
    position: usize,
}

impl Coordinate {
    /// Locate a byte offset within `source`.
    pub(crate)
    fn at<S>(source: S, offset: usize) -> Self
    where
        S: AsRef<str>
    {
        let source = source.as_ref();
        let mut offset = offset.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }

        let before = &source[..offset];
        let line = before.matches(NEWLINE).count();
        let position = match before.rfind(NEWLINE) {
            Some(nl) => before[nl + 1..].chars().count(),
            None => before.chars().count(),
        };

        Self { line, position, }
    }

    pub
    fn line(&self) -> usize {
        self.line
    }

    pub
    fn position(&self) -> usize {
        self.position
    }
}

impl Display for Coordinate {
    fn fmt(&self, fmtr: &mut Formatter<'_>) -> FmtResult {
        fmtr.write_fmt(format_args!(
            "line {} position {}",
            self.line + 1,
            self.position + 1
        ))
    }
}

/// The file collaborator used to read templates, including those pulled in
/// by include directives.
pub
trait Loader: Send + Sync {
    /// Read the file at `path` as UTF-8 text.
    fn load(&self, path: &Path) -> Result<String>;
}

/// Reads templates from the filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub
struct FileLoader;

impl Loader for FileLoader {
    fn load(&self, path: &Path) -> Result<String> {
        read_file(path)
    }
}

/// Serves templates from memory, keyed by their cleaned path.
#[derive(Debug, Default, Clone)]
pub
struct MemoryLoader {
    files: HashMap<PathBuf, String>,
}

impl MemoryLoader {
    pub
    fn new() -> Self {
        Self::default()
    }

    /// Register `content` under `path`.
    pub
    fn insert<P, S>(&mut self, path: P, content: S) -> &mut Self
    where
        P: AsRef<Path>,
        S: Into<String>
    {
        self.files.insert(crate::path::clean_path(path), content.into());
        self
    }
}

impl Loader for MemoryLoader {
    fn load(&self, path: &Path) -> Result<String> {
        let path = crate::path::clean_path(path);
        match self.files.get(&path) {
            Some(content) => Ok(content.to_owned()),
            None => Err(Error::IO(
                std::io::Error::from(std::io::ErrorKind::NotFound),
                path,
            )),
        }
    }
}
