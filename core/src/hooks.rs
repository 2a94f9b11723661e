//! Tag lifecycle hooks for the Tessera Templating Engine.
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
    log::debug,
    std::{
        fmt::{
            Debug,
            Formatter,
            Result as FmtResult,
        },
        sync::Arc,
    },
};

/// Called with a tag name.
pub type TagHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Called with an attribute name and its raw value, `""` when valueless.
pub type AttributeHook = Arc<dyn Fn(&str, &str) + Send + Sync>;

/// Callbacks fired while the parser walks markup. Include parsers share
/// the hooks of their includer.
#[derive(Clone, Default)]
pub
struct Hooks {
    /// Each attribute of an opening tag.
    pub on_attribute: Option<AttributeHook>,
    /// A tag name is known, before its attributes.
    pub on_tag_open: Option<TagHook>,
    /// An opening tag is complete, before its children.
    pub on_tag_opened: Option<TagHook>,
    /// An element closes, explicitly or at end of input.
    pub on_tag_close: Option<TagHook>,
}

impl Hooks {
    /// Hooks that trace every event through `log::debug!`.
    pub
    fn debug() -> Self {
        Self {
            on_attribute: Some(Arc::new(|name: &str, value: &str| debug!("attribute {name} = {value}"))),
            on_tag_open: Some(Arc::new(|name: &str| debug!("tag.open = {name}"))),
            on_tag_opened: Some(Arc::new(|name: &str| debug!("tag.opened = {name}"))),
            on_tag_close: Some(Arc::new(|name: &str| debug!("tag.closed = {name}"))),
        }
    }

    pub(crate)
    fn attribute(&self, name: &str, value: &str) {
        if let Some(hook) = &self.on_attribute {
            hook(name, value);
        }
    }

    pub(crate)
    fn tag_open(&self, name: &str) {
        if let Some(hook) = &self.on_tag_open {
            hook(name);
        }
    }

    pub(crate)
    fn tag_opened(&self, name: &str) {
        if let Some(hook) = &self.on_tag_opened {
            hook(name);
        }
    }

    pub(crate)
    fn tag_close(&self, name: &str) {
        if let Some(hook) = &self.on_tag_close {
            hook(name);
        }
    }
}

impl Debug for Hooks {
    fn fmt(&self, fmtr: &mut Formatter<'_>) -> FmtResult {
        fmtr.debug_struct("Hooks")
            .field("on_attribute", &self.on_attribute.is_some())
            .field("on_tag_open", &self.on_tag_open.is_some())
            .field("on_tag_opened", &self.on_tag_opened.is_some())
            .field("on_tag_close", &self.on_tag_close.is_some())
            .finish()
    }
}
