//! The Tessera template engine.
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

mod block;
pub(crate) mod consts;
mod expression;
mod include;
mod literal;
mod resolve;
mod tag;

pub use resolve::Resolver;

use {
    crate::{
        assets::{
            HeadAssets,
            HtmlResponse,
        },
        context::{
            Include,
            Value,
        },
        error::{
            Error,
            Result,
        },
        file::{
            FileLoader,
            Loader,
        },
        hooks::Hooks,
        options::Options,
        path::clean_path,
        stringify::{
            PlainText,
            Stringify,
        },
    },
    log::{
        debug,
        trace,
    },
    std::{
        collections::BTreeMap,
        env::current_dir,
        fmt::{
            Debug,
            Formatter,
            Result as FmtResult,
        },
        mem::take,
        path::{
            Path,
            PathBuf,
        },
        sync::Arc,
        vec::IntoIter,
    },
};

/// The bytes of `source` between `from` and `to`, or nothing when the
/// range is empty.
pub(crate)
fn slice(source: &str, from: usize, to: usize) -> &str {
    if from >= to {
        return "";
    }

    source.get(from..to.min(source.len())).unwrap_or_default()
}

/// Trim trailing whitespace from `text`, stopping after the first newline
/// so a directive standing on its own line leaves no blank line behind.
pub(crate)
fn trim_end_line(text: &str) -> &str {
    let bytes = text.as_bytes();
    let mut index = bytes.len();
    while index > 0 && consts::WHITESPACE.contains(&bytes[index - 1]) {
        index -= 1;
        if bytes[index] == b'\n' {
            break;
        }
    }

    &text[..index]
}

/// An open element.
#[derive(Clone, Debug, Default)]
pub(crate)
struct TagEntry {
    tag_name: String,
    /// Whether literal mode was active before the element opened.
    in_literal: bool,
}

/// The iteration state of a block.
#[derive(Clone, Debug, Default)]
pub(crate)
struct Frame {
    /// Where the block body starts in the source.
    start: usize,
    data: Value,
    /// Items still to be rendered when iterating.
    items: Option<IntoIter<Value>>,
}

impl Frame {
    fn new(data: Value) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }
}

/// An enclosing frame saved while a block renders.
#[derive(Clone, Debug)]
pub(crate)
struct BlockEntry {
    frame: Frame,
    /// Conditional blocks are skipped when walking up to ancestors.
    conditional: bool,
}

/// A single-pass template renderer.
///
/// The parser walks the template once, copying markup to its output and
/// replacing expressions with values resolved from its data. Blocks
/// (`<!--path-->...<!--end-->`) loop over arrays or render conditionally,
/// includes render other templates with their own parser, and the links
/// declared in every included `<head>` are gathered into the head of the
/// final document.
///
/// ```
/// use tessera_core::{ Parser, Value, };
///
/// let data = Value::object([ ("name", Value::from("World")), ]);
/// let mut parser = Parser::new(data);
/// let html = parser.parse_buffer("<p>Hello {name}!</p>").unwrap();
/// assert_eq!("<p>Hello World!</p>", html);
/// ```
#[derive(Clone)]
pub
struct Parser {
    data: Value,
    file: PathBuf,
    directory: PathBuf,
    included: bool,

    block_back: usize,
    block_stack: Vec<BlockEntry>,
    /// Entries of `block_stack` holding container data.
    container_depth: usize,

    index: usize,
    length: usize,
    source: String,
    start: usize,
    tag_name: String,
    tag_stack: Vec<TagEntry>,
    target: String,
    target_replace: String,
    target_stack: Vec<String>,

    in_literal: bool,
    literal_parts: Vec<String>,
    literal_part_stack: Vec<Vec<String>>,
    lock_literal: bool,

    assets: HeadAssets,

    options: Options,
    hooks: Hooks,
    resolvers: BTreeMap<char, Resolver>,
    stringify: Arc<dyn Stringify>,
    loader: Arc<dyn Loader>,
}

impl Debug for Parser {
    fn fmt(&self, fmtr: &mut Formatter<'_>) -> FmtResult {
        fmtr.debug_struct("Parser")
            .field("file", &self.file)
            .field("included", &self.included)
            .field("index", &self.index)
            .field("length", &self.length)
            .field("tag_stack", &self.tag_stack)
            .field("in_literal", &self.in_literal)
            .field("options", &self.options)
            .field("hooks", &self.hooks)
            .field("resolvers", &self.resolvers.keys().collect::<Vec<&char>>())
            .finish()
    }
}

impl Parser {
    fn new_internal(data: Value, container: Option<Value>) -> Self {
        let block_stack = container.into_iter()
            .map(|data| BlockEntry { frame: Frame::new(data), conditional: false, })
            .collect::<Vec<BlockEntry>>();
        let options = Options::default();

        Self {
            data,
            file: PathBuf::new(),
            directory: PathBuf::new(),
            included: false,
            block_back: 0,
            container_depth: block_stack.len(),
            block_stack,
            index: 0,
            length: 0,
            source: String::new(),
            start: 0,
            tag_name: String::new(),
            tag_stack: Vec::new(),
            target: String::new(),
            target_replace: String::new(),
            target_stack: Vec::new(),
            in_literal: options.do_literal,
            literal_parts: Vec::new(),
            literal_part_stack: Vec::new(),
            lock_literal: false,
            assets: HeadAssets::default(),
            options,
            hooks: Hooks::default(),
            resolvers: BTreeMap::new(),
            stringify: Arc::new(PlainText),
            loader: Arc::new(FileLoader),
        }
    }

    pub
    fn new<V>(data: V) -> Self
    where
        V: Into<Value>
    {
        Self::new_internal(data.into(), None)
    }

    /// A parser whose outermost ancestor is `container`, the data of the
    /// layout this template renders into.
    pub
    fn with_container<V, C>(data: V, container: C) -> Self
    where
        V: Into<Value>,
        C: Into<Value>
    {
        Self::new_internal(data.into(), Some(container.into()))
    }

    pub
    fn data(&self) -> &Value {
        &self.data
    }

    /// The template currently rendered, empty for buffers.
    pub
    fn file(&self) -> &Path {
        &self.file
    }

    /// The directory relative includes are resolved from: the directory
    /// of the template, or the application root for buffers.
    pub
    fn directory(&self) -> &Path {
        if self.directory.as_os_str().is_empty() {
            return &self.options.app_dir;
        }

        &self.directory
    }

    /// Anchor relative includes of buffers at `directory`.
    pub
    fn set_directory<P>(&mut self, directory: P)
    where
        P: AsRef<Path>
    {
        self.directory = clean_path(directory);
    }

    pub
    fn options(&self) -> &Options {
        &self.options
    }

    pub
    fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    pub
    fn set_options(&mut self, options: Options) {
        self.in_literal = options.do_literal;
        self.options = options;
    }

    pub
    fn hooks_mut(&mut self) -> &mut Hooks {
        &mut self.hooks
    }

    /// Trace every tag and attribute event through the `log` facade.
    pub
    fn debug_events(&mut self) {
        self.hooks = Hooks::debug();
    }

    /// Resolve path segments starting with `prefix` through `resolver`.
    ///
    /// The resolver receives the whole segment, prefix included, and the
    /// value the segment is applied to.
    pub
    fn register_resolver<F>(&mut self, prefix: char, resolver: F)
    where
        F: Fn(&str, &Value) -> Result<Value> + Send + Sync + 'static
    {
        self.resolvers.insert(prefix, Arc::new(resolver));
    }

    pub
    fn set_stringify<S>(&mut self, stringify: S)
    where
        S: Stringify + 'static
    {
        self.stringify = Arc::new(stringify);
    }

    pub
    fn set_loader<L>(&mut self, loader: L)
    where
        L: Loader + 'static
    {
        self.loader = Arc::new(loader);
    }

    /// Every link gathered from the heads of this template and its includes.
    pub
    fn head_links(&self) -> Vec<String> {
        self.assets.head_links.iter().cloned().collect()
    }

    /// The title of the last included template that declared one.
    pub
    fn head_title(&self) -> Option<&str> {
        self.assets.head_title.as_deref()
    }

    /// Wrap rendered markup with the links this parser gathered, so it can
    /// be embedded in another template.
    pub
    fn into_response<S>(self, html: S) -> HtmlResponse
    where
        S: Into<String>
    {
        HtmlResponse::new(html, self.head_links())
    }

    /// Whether the parser holds no state from a previous render.
    pub
    fn is_context_clean(&self) -> bool {
        !self.assets.collecting
            && self.assets.add_links.is_empty()
            && self.assets.done_links.is_empty()
            && self.assets.head_links.is_empty()
            && self.assets.head_title.is_none()
            && self.index == self.length
            && self.start == self.length
            && self.in_literal == self.options.do_literal
            && !self.lock_literal
            && self.literal_parts.is_empty()
            && self.literal_part_stack.is_empty()
            && self.target_stack.is_empty()
            && self.target_replace.is_empty()
            && self.tag_stack.is_empty()
            && self.block_stack.len() == self.container_depth
    }

    pub(crate)
    fn set_source<S>(&mut self, source: S)
    where
        S: Into<String>
    {
        self.source = source.into();
        self.length = self.source.len();
        self.index = 0;
        self.start = 0;
        self.tag_name.clear();
        self.tag_stack.clear();
        self.target.clear();
        self.target_stack.clear();
        self.in_literal = self.options.do_literal;
        self.literal_parts.clear();
        self.literal_part_stack.clear();
        self.lock_literal = false;
    }

    /// Render `buffer` against the parser's data.
    pub
    fn parse_buffer<S>(&mut self, buffer: S) -> Result<String>
    where
        S: Into<String>
    {
        self.set_source(buffer);
        let output = self.parse_vars()?;

        if self.assets.collecting {
            return Ok(output);
        }

        if !self.target_replace.is_empty() {
            debug!("{:?} replaced by an included document", self.file);
            return Ok(take(&mut self.target_replace));
        }

        Ok(self.assets.inject(output, self.included))
    }

    /// Render the template `file`.
    ///
    /// With a `container`, the template is rendered inside that layout: the
    /// layout is parsed with the container data, where `content` includes
    /// `file` with the parser's data.
    pub
    fn parse_file<P, C>(&mut self, file: P, container: Option<C>) -> Result<String>
    where
        P: AsRef<Path>,
        C: AsRef<Path>
    {
        let file = Self::normalize_initial_path(file)?;

        if let (Some(container), false) = (container, self.included) {
            let container = Self::normalize_initial_path(container)?;
            debug!("rendering {:?} into {:?}", file, container);

            let include = Include::new(file, take(&mut self.data));
            let mut data = Value::object([ (consts::CONTENT, Value::from(include)), ]);
            if let Some(entry) = self.block_stack.first() {
                data.overlay(&entry.frame.data);
            }
            self.data = data;

            return self.parse_file::<_, &Path>(container, None);
        }

        trace!("parsing {:?}", file);
        self.directory = file.parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_default();
        let buffer = self.loader.load(&file)?;
        self.file = file;

        self.parse_buffer(buffer)
    }

    fn normalize_initial_path<P>(path: P) -> Result<PathBuf>
    where
        P: AsRef<Path>
    {
        let path = path.as_ref();
        if path.is_absolute() {
            return Ok(clean_path(path));
        }

        let cwd = current_dir().map_err(|e| Error::IO(e, path.to_path_buf()))?;
        Ok(clean_path(cwd.join(path)))
    }

    /// Render the current source, returning the output.
    pub(crate)
    fn parse_vars(&mut self) -> Result<String> {
        let mut frame = Frame::new(self.data.clone());
        let mut in_head = false;

        while self.index < self.length {
            let c = self.byte(self.index);

            if c == consts::OPEN && self.options.do_expression {
                let evaluation = self.parse_expression(&frame.data, consts::OPEN, consts::CLOSE, "")?;
                let dropped = evaluation.value.as_ref().is_some_and(|value| !value.is_truthy());
                if evaluation.conditional && dropped {
                    self.drop_conditional();
                }
                continue;
            }

            if c != consts::TAG_OPEN {
                self.index += 1;
                continue;
            }

            let tag_index = self.index;
            self.index += 1;
            match self.byte(self.index) {
                b'!' => self.markup_declaration(tag_index, &mut frame)?,
                b'/' => self.close_element(tag_index, &mut in_head)?,
                c if c.is_ascii_alphabetic() => self.open_element(tag_index, &frame.data, &mut in_head)?,
                _ => (),
            }
        }

        self.index = self.index.min(self.length);
        self.finish()
    }

    /// Close what is still open and flush the rest of the source.
    fn finish(&mut self) -> Result<String> {
        if !self.tag_stack.is_empty() {
            let mut should_in_literal = self.in_literal;
            while !self.tag_stack.is_empty() {
                should_in_literal = self.close_tag(should_in_literal, self.length)?;
            }
            if should_in_literal {
                self.literal_target(self.length, false)?;
            }
        }
        else if self.in_literal {
            self.literal_target(self.index, false)?;
        }

        if self.start < self.length {
            self.target.push_str(slice(&self.source, self.start, self.length));
            self.start = self.length;
        }

        Ok(take(&mut self.target))
    }

    fn byte(&self, index: usize) -> u8 {
        self.source.as_bytes().get(index).copied().unwrap_or_default()
    }

    fn char_at(&self, index: usize) -> Option<char> {
        self.source.get(index..).and_then(|s| s.chars().next())
    }

    fn starts_with_at(&self, index: usize, pattern: &str) -> bool {
        self.source.as_bytes()
            .get(index..)
            .map(|s| s.starts_with(pattern.as_bytes()))
            .unwrap_or(false)
    }

    /// The position of `pattern` at or after `from`.
    fn find_from(&self, pattern: &str, from: usize) -> Option<usize> {
        let mut from = from;
        while from < self.length && !self.source.is_char_boundary(from) {
            from += 1;
        }

        self.source.get(from..)?
            .find(pattern)
            .map(|p| p + from)
    }

    fn skip_whitespace(&mut self) {
        while consts::WHITESPACE.contains(&self.byte(self.index)) {
            self.index += 1;
        }
    }

    /// Copy the source pending since `start` to the output.
    fn source_to_target(&mut self) {
        self.target.push_str(slice(&self.source, self.start, self.index));
        self.start = self.index;
    }

    /// Whether `c`, following an opener, starts an expression rather
    /// than plain text.
    fn starts_expression(&self, c: Option<char>, open: u8, close: u8) -> bool {
        match c {
            Some(c) => c.is_ascii_alphanumeric()
                || "\"'*./?".contains(c)
                || c == open as char
                || c == close as char
                || self.resolvers.contains_key(&c),
            None => false,
        }
    }
}
