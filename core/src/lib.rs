//! Tessera, an HTML template engine.
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

mod assets;
mod context;
mod error;
mod file;
mod hooks;
mod options;
mod parser;
mod path;
mod stringify;
#[cfg(test)]
mod test;

pub use {
    assets::{
        front_scripts,
        HtmlResponse,
    },
    context::{
        Callable,
        Function,
        Include,
        Value,
    },
    error::{
        Error,
        Result,
    },
    file::{
        Coordinate,
        FileLoader,
        Loader,
        MemoryLoader,
    },
    hooks::{
        AttributeHook,
        Hooks,
        TagHook,
    },
    options::{
        Options,
        INLINE_ELEMENTS,
        LITERAL_ATTRIBUTES,
        LITERAL_ELEMENTS,
        VOID_ELEMENTS,
    },
    parser::{
        Parser,
        Resolver,
    },
    stringify::{
        PlainText,
        Stringify,
    },
};
