//! Comments, declarations and `<!--path-->...<!--end-->` blocks.
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
            trim_end_line,
            BlockEntry,
            Frame,
            Parser,
        },
    },
    log::{
        debug,
        trace,
        warn,
    },
    std::mem::take,
};

impl Parser {
    /// Handle `<!` at `tag_index`: a comment, a block directive, CDATA or
    /// a declaration such as DOCTYPE.
    pub(crate)
    fn markup_declaration(&mut self, tag_index: usize, frame: &mut Frame) -> Result<()> {
        if self.in_literal {
            self.literal_target(tag_index, false)?;
        }

        self.index += 1;
        let c = self.byte(self.index);
        self.index += 1;

        if c == b'-' && self.byte(self.index) == b'-' {
            self.index += 1;
            return self.comment(tag_index, frame);
        }

        let close = if c == b'[' && self.starts_with_at(self.index, consts::CDATA) {
            self.find_from(consts::CDATA_CLOSE, self.index + consts::CDATA.len())
                .map(|p| p + consts::CDATA_CLOSE.len())
        }
        else {
            self.find_from(">", self.index).map(|p| p + 1)
        };
        self.index = close.unwrap_or(self.length);

        if self.in_literal {
            self.source_to_target();
        }

        Ok(())
    }

    fn comment(&mut self, tag_index: usize, frame: &mut Frame) -> Result<()> {
        let plain = !self.options.do_expression
            || !self.starts_expression(self.char_at(self.index), consts::OPEN, consts::CLOSE)
            || self.starts_with_at(self.index, consts::BEGIN_MARKER)
            || self.starts_with_at(self.index, consts::END_MARKER);

        if plain {
            self.index = self.find_from(consts::COMMENT_CLOSE, self.index)
                .map(|p| p + consts::COMMENT_CLOSE.len())
                .unwrap_or(self.length);
            if self.in_literal && self.index > self.start {
                self.source_to_target();
            }
            return Ok(());
        }

        if self.starts_with_at(self.index, consts::END_BLOCK) {
            self.end_block(tag_index, frame);
            return Ok(());
        }

        self.begin_block(tag_index, frame)
    }

    /// `<!--end-->` at `tag_index`: render the next item or leave the block.
    fn end_block(&mut self, tag_index: usize, frame: &mut Frame) {
        self.target.push_str(trim_end_line(slice(&self.source, self.start, tag_index)));

        if let Some(item) = frame.items.as_mut().and_then(|items| items.next()) {
            frame.data = item;
            self.index = frame.start;
            self.start = frame.start;
            return;
        }

        if self.block_stack.len() > self.container_depth {
            if let Some(entry) = self.block_stack.pop() {
                trace!("block closed at {}", Coordinate::at(&self.source, tag_index));
                *frame = entry.frame;
            }
        }
        else {
            warn!("unmatched end of block at {}", Coordinate::at(&self.source, tag_index));
        }

        self.index += consts::END_BLOCK.len();
        self.start = self.index;
    }

    /// `<!--path-->` at `tag_index`: enter the block bound to `path`.
    fn begin_block(&mut self, tag_index: usize, frame: &mut Frame) -> Result<()> {
        if tag_index > self.start {
            self.target.push_str(trim_end_line(slice(&self.source, self.start, tag_index)));
            self.start = tag_index;
        }

        let back_target = take(&mut self.target);
        let back_in_literal = self.in_literal;
        self.index = tag_index;
        self.in_literal = false;

        let evaluation = self.parse_expression(
            &frame.data,
            consts::TAG_OPEN,
            consts::CLOSE,
            consts::COMMENT_CLOSE,
        )?;

        if !evaluation.closed {
            debug!("unterminated block at {}", Coordinate::at(&self.source, tag_index));
            self.target = back_target + &self.target;
            self.in_literal = back_in_literal;
            return Ok(());
        }

        let value = match evaluation.value {
            Some(value) => value,
            None => Value::String(take(&mut self.target)),
        };
        let block_data = if !evaluation.conditional {
            value
        }
        else if value.is_truthy() {
            frame.data.clone()
        }
        else {
            Value::Null
        };

        let outer = std::mem::replace(frame, Frame { start: self.index, ..Frame::default() });
        self.block_stack.push(BlockEntry { frame: outer, conditional: evaluation.conditional, });
        self.target = back_target;
        self.in_literal = back_in_literal;

        let entered = match block_data {
            Value::Array(items) => {
                let mut items = items.into_iter();
                match items.next() {
                    Some(first) => {
                        frame.data = first;
                        frame.items = Some(items);
                        true
                    },
                    None => false,
                }
            },
            data if data.is_truthy() => {
                frame.data = data;
                true
            },
            _ => false,
        };

        if !entered {
            trace!("skipping block at {}", Coordinate::at(&self.source, tag_index));
            self.skip_block();
            return Ok(());
        }

        if self.in_literal && self.index > self.start {
            self.source_to_target();
        }

        Ok(())
    }

    /// Move to the `<!--end-->` closing the block just entered, skipping
    /// nested blocks.
    fn skip_block(&mut self) {
        if self.index > self.start {
            self.source_to_target();
        }

        let mut depth = 1usize;
        let mut from = self.index;
        let mut end = None;

        while let Some(open) = self.find_from(consts::COMMENT_OPEN, from) {
            let inner = open + consts::COMMENT_OPEN.len();
            from = inner;

            if !self.starts_expression(self.char_at(inner), consts::OPEN, consts::CLOSE)
                || self.starts_with_at(inner, consts::BEGIN_MARKER)
                || self.starts_with_at(inner, consts::END_MARKER)
            {
                continue;
            }

            if self.starts_with_at(inner, consts::END_BLOCK) {
                depth -= 1;
                if depth == 0 {
                    end = Some(open);
                    break;
                }
            }
            else {
                depth += 1;
            }
        }

        self.index = end.unwrap_or(self.length);
        self.start = self.index;
    }
}
