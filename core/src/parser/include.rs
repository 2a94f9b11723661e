//! Template inclusion.
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
        parser::{
            consts,
            Parser,
        },
        path::include_target,
    },
    log::debug,
    std::{
        path::PathBuf,
        sync::Arc,
    },
};

impl Parser {
    /// Render the include named by `expression`.
    ///
    /// A trailing run of `-` renders the include with the data of that
    /// many enclosing blocks up, and a trailing `(path)` with the value of
    /// `path`. Otherwise the include gets `data`.
    pub(crate)
    fn include_expression(&mut self, expression: &str, data: &Value) -> Result<Value> {
        let trimmed = expression.trim_end_matches(consts::BLOCK_BACK);
        let back = expression.len() - trimmed.len();

        let (path, data) = if back > 0 {
            let data = self.block_stack.len()
                .checked_sub(back)
                .and_then(|i| self.block_stack.get(i))
                .map(|entry| entry.frame.data.clone())
                .unwrap_or_default();
            (trimmed, data)
        }
        else if let Some(open) = expression.strip_suffix(')').and_then(|e| e.rfind('(')) {
            let inner = &expression[open + 1..expression.len() - 1];
            (&expression[..open], self.parse_path(inner, data)?)
        }
        else {
            (expression, data.clone())
        };

        let file = include_target(&self.options.app_dir, self.directory(), path);
        Ok(Value::from(self.include(file, data)?))
    }

    /// Render `file` with `data` in a parser of its own, returning what
    /// should be spliced at the include point.
    pub(crate)
    fn include(&mut self, file: PathBuf, data: Value) -> Result<String> {
        debug!("including {:?}", file);

        let container = self.block_stack.first()
            .map(|entry| entry.frame.data.clone())
            .unwrap_or_else(|| self.data.clone());
        let mut parser = Self::new_internal(data, Some(container));
        parser.options = self.options.clone();
        parser.hooks = self.hooks.clone();
        parser.resolvers = self.resolvers.clone();
        parser.stringify = Arc::clone(&self.stringify);
        parser.loader = Arc::clone(&self.loader);
        parser.included = true;
        parser.assets = self.assets.for_include();

        let parsed = parser.parse_file::<_, &str>(file, None)?;
        self.assets.absorb(parser.assets);

        let Some(begin) = parsed.find(consts::BEGIN_SPLICE) else {
            if parsed.starts_with(consts::DOCTYPE) {
                if self.target_replace.is_empty() {
                    debug!("{:?} is a whole document, replacing {:?}", parser.file, self.file);
                    self.target_replace = parsed;
                }
                return Ok(String::new());
            }
            return Ok(parsed);
        };

        let from = begin + consts::BEGIN_SPLICE.len();
        let to = parsed[from..].find(consts::END_SPLICE)
            .map(|end| from + end)
            .unwrap_or(parsed.len());

        Ok(parsed[from..to].to_owned())
    }
}
