//! Opening and closing tags.
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
        assets::register_front_script,
        context::Value,
        error::{
            Error,
            Result,
        },
        file::Coordinate,
        parser::{
            consts,
            slice,
            Parser,
            TagEntry,
        },
        path::front_asset,
    },
    log::trace,
    std::mem::take,
};

/// What is known of the opening tag being read.
#[derive(Debug, Default)]
struct OpenTag {
    name: String,
    void: bool,
    /// The literal parts of the enclosing run were set aside.
    pushed_parts: bool,
    has_type_submit: bool,
    in_input: bool,
    in_link: bool,
    in_script: bool,
}

impl Parser {
    /// Pop the innermost open element.
    ///
    /// Returns whether the literal run pending at `target_index` still
    /// has to be closed by the caller.
    pub(crate)
    fn close_tag(&mut self, should_in_literal: bool, target_index: usize) -> Result<bool> {
        let mut should_in_literal = should_in_literal || self.in_literal;
        let entry = self.tag_stack.pop().unwrap_or_default();
        self.tag_name = entry.tag_name;
        self.in_literal = entry.in_literal;
        self.hooks.tag_close(&self.tag_name);

        if self.tag_name == consts::ADDRESS {
            self.lock_literal = false;
        }

        if self.in_literal && self.options.is_inline(&self.tag_name) {
            if self.options.is_literal_element(&self.tag_name) {
                self.literal_target(target_index, false)?;
            }
            self.literal_parts = self.literal_part_stack.pop().unwrap_or_default();
            let flat = take(&mut self.target) + slice(&self.source, self.start, self.index);
            self.literal_parts.push(flat);
            self.start = self.index;
            self.target = format!(
                "{}{}{}",
                self.target_stack.pop().unwrap_or_default(),
                consts::PLACEHOLDER,
                self.literal_parts.len(),
            );
            should_in_literal = false;
        }

        Ok(should_in_literal)
    }

    /// `</name>` at `tag_index`.
    pub(crate)
    fn close_element(&mut self, tag_index: usize, in_head: &mut bool) -> Result<()> {
        self.index += 1;
        let name_end = self.find_from(">", self.index).unwrap_or(self.length);
        let close_name = slice(&self.source, self.index, name_end).trim().to_owned();
        self.index = (name_end + 1).min(self.length);

        if *in_head && close_name == consts::HEAD {
            *in_head = false;
        }

        let mut should_in_literal = self.in_literal;
        let open = self.tag_stack.iter().any(|entry| entry.tag_name == close_name);
        if open && !self.options.is_void(&close_name) {
            loop {
                should_in_literal = self.close_tag(should_in_literal, tag_index)?;
                if self.tag_name == close_name || self.tag_stack.is_empty() {
                    break;
                }
            }
        }
        else {
            trace!("ignoring </{}> at {}", close_name, Coordinate::at(&self.source, tag_index));
        }

        if should_in_literal {
            self.lock_literal = false;
            let is_title = self.tag_name == consts::TITLE;
            self.literal_target(tag_index, is_title)?;
        }

        if self.in_literal && self.index > self.start {
            self.source_to_target();
        }

        Ok(())
    }

    /// `<name ...>` at `tag_index`, the name starting with a letter.
    pub(crate)
    fn open_element(&mut self, tag_index: usize, data: &Value, in_head: &mut bool) -> Result<()> {
        while self.index < self.length && !consts::TAG_NAME_END.contains(&self.byte(self.index)) {
            self.index += 1;
        }
        self.tag_name = slice(&self.source, tag_index + 1, self.index).to_owned();
        self.hooks.tag_open(&self.tag_name);
        self.skip_whitespace();

        if self.tag_name == consts::HEAD {
            *in_head = true;
        }

        let mut tag = OpenTag {
            name: self.tag_name.clone(),
            void: self.options.is_void(&self.tag_name),
            in_input: self.tag_name == consts::INPUT,
            in_link: self.tag_name == consts::LINK,
            in_script: self.tag_name == consts::SCRIPT,
            ..OpenTag::default()
        };

        if !tag.void {
            self.tag_stack.push(TagEntry {
                tag_name: tag.name.clone(),
                in_literal: self.in_literal,
            });
        }

        let element_in_literal = self.in_literal;
        let mut inline_element = false;
        if self.in_literal {
            inline_element = self.options.is_inline(&tag.name);
            if inline_element {
                // the text before the element stays in the enclosing run
                let before = slice(&self.source, self.start, tag_index).to_owned();
                let saved = take(&mut self.target);
                if self.literal_parts.is_empty() {
                    self.target_stack.push(saved);
                    self.target_stack.push(before);
                }
                else {
                    self.target_stack.push(saved + &before);
                }
                self.start = tag_index;

                if !tag.void {
                    let parts = take(&mut self.literal_parts);
                    self.literal_part_stack.push(parts);
                    tag.pushed_parts = true;
                }
            }
            else {
                self.literal_target(tag_index, false)?;
            }
        }

        let target_tag_index = if *in_head && (tag.in_link || tag.in_script) {
            self.source_to_target();
            self.target.rfind('<')
        }
        else {
            None
        };

        while self.index < self.length && self.byte(self.index) != consts::TAG_CLOSE {
            let before = self.index;
            self.attribute(&mut tag, data)?;
            if self.index == before {
                self.index += 1;
            }
        }
        self.index = (self.index + 1).min(self.length);
        self.hooks.tag_opened(&tag.name);

        if tag.in_script {
            self.hooks.tag_close(&tag.name);
            self.index = self.find_from(consts::SCRIPT_CLOSE, self.index)
                .map(|p| p + consts::SCRIPT_CLOSE.len())
                .unwrap_or(self.length);
            if let Some(entry) = self.tag_stack.pop() {
                self.in_literal = entry.in_literal;
            }
        }

        if let Some(position) = target_tag_index {
            self.source_to_target();
            let link = self.target[position..].to_owned();
            self.assets.capture(link);
        }

        if tag.in_script {
            if self.in_literal && self.index > self.start {
                self.source_to_target();
            }
            return Ok(());
        }

        if tag.void {
            if tag.pushed_parts {
                self.literal_parts = self.literal_part_stack.pop().unwrap_or_default();
            }
            self.in_literal = element_in_literal;
            self.hooks.tag_close(&tag.name);

            if self.in_literal {
                if self.index > self.start {
                    self.source_to_target();
                }
                if inline_element {
                    let part = take(&mut self.target);
                    self.literal_parts.push(part);
                    self.target = format!(
                        "{}{}{}",
                        self.target_stack.pop().unwrap_or_default(),
                        consts::PLACEHOLDER,
                        self.literal_parts.len(),
                    );
                }
            }
        }
        else {
            if tag.name == consts::ADDRESS {
                self.lock_literal = true;
            }
            self.in_literal = self.options.do_literal
                && !self.lock_literal
                && self.options.is_literal_element(&tag.name);
            if self.in_literal && self.index > self.start {
                self.source_to_target();
            }
        }

        Ok(())
    }

    /// Read one attribute of `tag`, evaluating expressions in its value.
    fn attribute(&mut self, tag: &mut OpenTag, data: &Value) -> Result<()> {
        let attribute_position = self.index;
        while self.index < self.length && !consts::ATTRIBUTE_NAME_END.contains(&self.byte(self.index)) {
            self.index += 1;
        }
        let name = slice(&self.source, attribute_position, self.index).to_owned();
        self.skip_whitespace();

        let is_block = name == consts::DATA_IF;
        let mut block_before = None;
        let mut block_value = None;

        if self.byte(self.index) == b'=' {
            self.index += 1;
            self.skip_whitespace();

            let (open, close) = if consts::URL_ATTRIBUTES.contains(&name.as_str()) {
                (consts::URL_OPEN, consts::URL_CLOSE)
            }
            else {
                (consts::OPEN, consts::CLOSE)
            };

            let quote = match self.byte(self.index) {
                c @ (b'"' | b'\'') => {
                    self.index += 1;
                    Some(c)
                },
                _ => None,
            };

            if open == consts::URL_OPEN && self.starts_with_at(self.index, consts::APP_SCHEME) {
                self.source_to_target();
                self.index += consts::APP_SCHEME.len();
                self.start = self.index;
            }

            self.in_literal = self.options.do_literal
                && !is_block
                && (self.options.is_literal_attribute(&name) || (tag.has_type_submit && name == "value"));
            if self.in_literal && !tag.pushed_parts && tag.void && !self.literal_parts.is_empty() {
                let parts = take(&mut self.literal_parts);
                self.literal_part_stack.push(parts);
                tag.pushed_parts = true;
            }

            let in_link_href = tag.in_link && name == "href";
            let in_script_src = tag.in_script && name == "src";
            if (in_link_href || in_script_src || self.in_literal) && self.index > self.start {
                self.source_to_target();
            }

            let value_position = self.index;
            if quote.is_some() && is_block {
                block_before = Some(take(&mut self.target) + slice(&self.source, self.start, attribute_position));
                self.start = self.index;
            }

            while self.index < self.length {
                let c = self.byte(self.index);
                let at_end = match quote {
                    Some(quote) => c == quote,
                    None => c == b' ' || c == consts::TAG_CLOSE,
                };

                if at_end {
                    let value = slice(&self.source, value_position, self.index).to_owned();
                    if tag.in_input && !tag.has_type_submit {
                        tag.has_type_submit = name == "type" && value == "submit";
                    }
                    if self.in_literal {
                        self.literal_target(self.index, false)?;
                    }
                    if in_link_href && value.ends_with(consts::STYLESHEET_EXT) {
                        self.front_reference(false);
                    }
                    if in_script_src && value.ends_with(consts::SCRIPT_EXT) {
                        self.front_reference(true);
                    }
                    self.hooks.attribute(&name, &value);
                    if c != consts::TAG_CLOSE {
                        self.index += 1;
                    }
                    break;
                }

                if c == open && self.options.do_expression {
                    let evaluation = self.parse_expression(data, open, close, "")?;
                    block_value = evaluation.value;
                    continue;
                }

                self.index += 1;
            }
        }
        else {
            self.hooks.attribute(&name, "");
            if name == consts::DATA_END {
                self.index = attribute_position;
                self.source_to_target();
                self.index += consts::DATA_END.len();
                self.start = self.index;
            }
        }

        self.skip_whitespace();

        if let Some(before) = block_before {
            let shown = match &block_value {
                Some(value) if value.to_string() == self.target => value.is_truthy(),
                _ => !self.target.is_empty(),
            };

            if !shown {
                match self.find_from(consts::DATA_END, self.index) {
                    Some(end) => self.index = end + consts::DATA_END.len(),
                    None => return Err(Error::UnterminatedAttributeBlock(
                        Coordinate::at(&self.source, attribute_position),
                        self.file.clone(),
                    )),
                }
                trace!("skipping attributes up to {}", Coordinate::at(&self.source, self.index));
            }

            self.start = self.index;
            self.target = before;
        }

        Ok(())
    }

    /// Normalize the asset reference read since `start` into an
    /// application URL.
    fn front_reference(&mut self, script: bool) {
        let reference = slice(&self.source, self.start, self.index);
        let url = front_asset(&self.options.app_dir, self.directory(), reference);
        if script {
            register_front_script(url.as_str());
        }
        self.target.push_str(&url);
        self.start = self.index;
    }
}
