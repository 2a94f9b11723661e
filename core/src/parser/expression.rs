//! Expression evaluation.
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
        file::Coordinate,
        parser::{
            consts,
            slice,
            Parser,
        },
    },
    log::debug,
    std::mem::take,
};

/// The outcome of [`Parser::parse_expression`].
#[derive(Debug, Default)]
pub(crate)
struct Evaluation {
    /// The expression carried a `?` marker.
    pub(crate) conditional: bool,
    /// A closing marker was found.
    pub(crate) closed: bool,
    /// The resolved value, when it alone makes up the output.
    pub(crate) value: Option<Value>,
}

impl Parser {
    /// Evaluate the expression opening at the current index.
    ///
    /// `open` and `close` delimit the expression. A `<` opener reads a
    /// block directive, closed by `final_close` (`-->`). Same-kind
    /// openers nest, their values becoming part of the enclosing path.
    ///
    /// When the opener does not start an expression, the index simply
    /// moves past it. When no closing marker follows, the opener and
    /// what was read are written out unchanged.
    pub(crate)
    fn parse_expression(
        &mut self,
        data: &Value,
        open: u8,
        close: u8,
        final_close: &str,
    ) -> Result<Evaluation> {
        let index_out = self.index;
        let directive = open == consts::TAG_OPEN;
        let open = if directive {
            self.index += consts::COMMENT_OPEN.len() - 1;
            consts::OPEN
        }
        else {
            open
        };

        self.index += 1;
        if self.index >= self.length || !self.starts_expression(self.char_at(self.index), open, close) {
            return Ok(Evaluation::default());
        }

        let literal_saved = self.in_literal && self.literal_parts.is_empty();
        if literal_saved {
            let saved = take(&mut self.target);
            self.target_stack.push(saved);
        }

        let mut evaluation = Evaluation::default();
        let leading_conditional = self.byte(self.index) == consts::CONDITIONAL;
        if leading_conditional {
            evaluation.conditional = true;
            self.index += 1;
        }

        let final_char = final_close.as_bytes().first().copied();
        let stack_pos = self.target_stack.len();
        let before = take(&mut self.target) + slice(&self.source, self.start, index_out);
        self.target_stack.push(before);
        self.start = self.index;

        while self.index < self.length {
            let c = self.byte(self.index);

            if c == open {
                let pending = take(&mut self.target) + slice(&self.source, self.start, self.index);
                self.target_stack.push(pending);
                self.index += 1;
                self.start = self.index;
                continue;
            }

            let at_final = final_char == Some(c) && self.starts_with_at(self.index, final_close);
            if c == close || at_final {
                let mut end = self.index;
                if end > self.start && self.byte(end - 1) == consts::CONDITIONAL {
                    evaluation.conditional = true;
                    end -= 1;
                }

                let mut expression = take(&mut self.target) + slice(&self.source, self.start, end);
                if at_final && self.target_stack.len() > stack_pos + 1 {
                    // openers never closed inside a directive are plain text
                    let mut text = String::new();
                    for part in self.target_stack.split_off(stack_pos + 1) {
                        text.push_str(&part);
                        text.push(open as char);
                    }
                    expression = text + &expression;
                }

                let last_target = self.target_stack.pop().unwrap_or_default();
                let parsed = self.parse_path(&expression, data)?;
                self.index += if at_final { final_close.len() } else { 1 };
                self.start = self.index;

                if self.target_stack.len() != stack_pos {
                    self.target = last_target + &parsed.to_string();
                    continue;
                }

                evaluation.closed = true;

                if self.in_literal {
                    self.literal_parts.push(parsed.to_string());
                    self.target = format!(
                        "{}{}{}",
                        last_target,
                        consts::PLACEHOLDER,
                        self.literal_parts.len(),
                    );
                    return Ok(evaluation);
                }

                let truthy = parsed.is_truthy();
                if last_target.is_empty() {
                    self.target = parsed.to_string();
                    evaluation.value = Some(parsed);
                }
                else {
                    self.target = last_target + &parsed.to_string();
                }

                if evaluation.conditional && !truthy && !directive {
                    if evaluation.value.is_some() {
                        self.target.clear();
                    }
                    else {
                        self.drop_conditional();
                    }
                }

                return Ok(evaluation);
            }

            if c == b'"' || c == b'\'' {
                self.index += 1;
                while self.index < self.length && self.byte(self.index) != c {
                    if self.byte(self.index) == consts::ESCAPE {
                        self.index += 1;
                    }
                    self.index += 1;
                }
            }

            self.index += 1;
        }

        debug!("unterminated expression at {}", Coordinate::at(&self.source, index_out));

        let mut text = take(&mut self.target);
        while self.target_stack.len() > stack_pos + 1 {
            let pending = self.target_stack.pop().unwrap_or_default();
            text = pending + &(open as char).to_string() + &text;
        }

        let mut opener = if directive {
            consts::COMMENT_OPEN.to_owned()
        }
        else {
            (open as char).to_string()
        };
        if leading_conditional {
            opener.push(consts::CONDITIONAL as char);
        }

        self.target = self.target_stack.pop().unwrap_or_default() + &opener + &text;
        if literal_saved {
            self.target = self.target_stack.pop().unwrap_or_default() + &self.target;
        }
        self.index = self.length;

        Ok(evaluation)
    }

    /// A falsy conditional drops the word it stands in: output back to
    /// the last space, source up to the next whitespace or tag boundary.
    /// Within an attribute this removes the whole attribute.
    pub(crate)
    fn drop_conditional(&mut self) {
        let floor = self.target.rfind(&['<', '>'][..])
            .map(|p| p + 1)
            .unwrap_or(0);
        let cut = self.target.rfind(' ')
            .filter(|p| *p >= floor)
            .unwrap_or(floor);
        self.target.truncate(cut);

        while self.index < self.length
            && !consts::TAG_NAME_END.contains(&self.byte(self.index))
            && self.byte(self.index) != consts::TAG_OPEN
        {
            self.index += 1;
        }

        // revisit the character before the boundary: it may close the
        // enclosing attribute
        self.start = self.index;
        self.index -= 1;
    }
}
