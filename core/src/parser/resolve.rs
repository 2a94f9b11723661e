//! Path resolution.
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
        stringify::text_property,
    },
    log::trace,
    std::sync::Arc,
};

/// Resolves a path segment starting with a registered prefix character.
pub type Resolver = Arc<dyn Fn(&str, &Value) -> Result<Value> + Send + Sync>;

fn is_include(expression: &str) -> bool {
    expression.starts_with("./")
        || expression.starts_with("../")
        || expression.starts_with('/')
}

fn unquote(variable: &str) -> Option<&str> {
    let first = variable.chars().next()?;
    if (first != '"' && first != '\'') || variable.len() < 2 || !variable.ends_with(first) {
        return None;
    }

    Some(&variable[1..variable.len() - 1])
}

impl Parser {
    /// Resolve a whole expression against `data`.
    pub(crate)
    fn parse_path(&mut self, expression: &str, data: &Value) -> Result<Value> {
        if expression.is_empty() {
            return Ok(Value::Null);
        }

        if is_include(expression) {
            return self.include_expression(expression, data);
        }

        let mut path = expression;
        if path.chars().all(|c| c == consts::SCOPESEP) {
            if path.len() == 1 {
                return match data {
                    Value::Function(f) => f.call(&Value::Null),
                    data => Ok(data.clone()),
                };
            }
            path = &path[2..];
        }

        self.block_back = 0;
        let mut value = data.clone();
        for variable in path.split(consts::SCOPESEP) {
            let next = self.parse_variable(variable, &value)?;
            value = next;
        }

        if let Value::Html(response) = &value {
            self.assets.embed(response, &self.options.app_dir);
        }

        Ok(value)
    }

    /// Resolve one segment of a path.
    fn parse_variable(&mut self, variable: &str, data: &Value) -> Result<Value> {
        if variable.is_empty() {
            return Ok(self.ancestor());
        }

        if variable == consts::ALL_VALUES {
            return Ok(data.values());
        }

        if variable == consts::BEGIN {
            return Ok(data.clone());
        }

        if let Some(text) = unquote(variable) {
            return Ok(Value::from(text));
        }

        let resolver = variable.chars()
            .next()
            .and_then(|prefix| self.resolvers.get(&prefix))
            .cloned();
        if let Some(resolver) = resolver {
            trace!("resolving {variable} with a prefix resolver");
            return resolver(variable, data);
        }

        let value = match data.get(variable) {
            Some(value) => value,
            None => {
                let text = self.stringify.stringify(data)?;
                text_property(&text, variable).unwrap_or_default()
            },
        };

        match value {
            Value::Function(f) => f.call(data),
            Value::Include(include) => {
                let file = self.directory().join(include.path());
                let data = include.data().clone();
                Ok(Value::from(self.include(file, data)?))
            },
            value => Ok(value),
        }
    }

    /// The data of the next enclosing block, conditional blocks aside.
    fn ancestor(&mut self) -> Value {
        loop {
            self.block_back += 1;
            let entry = self.block_stack.len()
                .checked_sub(self.block_back)
                .and_then(|i| self.block_stack.get(i));

            match entry {
                Some(entry) if entry.conditional => continue,
                Some(entry) => return entry.frame.data.clone(),
                None => return Value::Null,
            }
        }
    }
}
