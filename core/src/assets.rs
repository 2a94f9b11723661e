//! Head assets collected while rendering with the Tessera Templating Engine.
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
    crate::path::app_url,
    log::{
        debug,
        trace,
    },
    regex::Regex,
    std::{
        collections::BTreeSet,
        fmt::{
            Display,
            Formatter,
            Result as FmtResult,
        },
        path::Path,
        sync::{
            LazyLock,
            Mutex,
            PoisonError,
        },
    },
};

const HEAD_CLOSE: &str = "</head>";
const TITLE_OPEN: &str = "<title";
const TITLE_CLOSE: &str = "</title>";
const LINK_SEP: &str = "\n\t";

static SCRIPT_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<script[^>]*\bsrc=["']([^"']+)["']"#).expect("script source pattern")
});

static FRONT_SCRIPTS: LazyLock<Mutex<BTreeSet<String>>> = LazyLock::new(|| {
    Mutex::new(BTreeSet::new())
});

/// Record a script path as needed by the browser front end.
///
/// The registry is shared by every render in the process and only grows.
pub(crate)
fn register_front_script<S>(script: S)
where
    S: Into<String>
{
    let script = script.into();
    trace!("front script {script}");
    FRONT_SCRIPTS.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(script);
}

/// Every front script recorded so far, sorted.
pub
fn front_scripts() -> Vec<String> {
    FRONT_SCRIPTS.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .cloned()
        .collect()
}

/// Rendered markup together with the assets it depends on.
#[derive(Clone, Debug, Default)]
pub
struct HtmlResponse {
    html: String,
    dependencies: Vec<String>,
}

impl HtmlResponse {
    /// `dependencies` are either raw head tags (`<link ...>`,
    /// `<script ...></script>`) or paths to `.css`/`.js` files.
    pub
    fn new<S>(html: S, dependencies: Vec<String>) -> Self
    where
        S: Into<String>
    {
        Self {
            html: html.into(),
            dependencies,
        }
    }

    pub
    fn html(&self) -> &str {
        &self.html
    }

    pub
    fn dependencies(&self) -> &[String] {
        &self.dependencies
    }
}

impl Display for HtmlResponse {
    fn fmt(&self, fmtr: &mut Formatter<'_>) -> FmtResult {
        fmtr.write_str(&self.html)
    }
}

/// The head links and title gathered by one parser.
#[derive(Clone, Debug, Default)]
pub(crate)
struct HeadAssets {
    /// Set while rendering an include: links are reported to the
    /// includer rather than injected.
    pub(crate) collecting: bool,
    /// Links from includes still to be injected into this document's head.
    pub(crate) add_links: BTreeSet<String>,
    /// Links the includer already holds.
    pub(crate) done_links: BTreeSet<String>,
    /// Every link seen in a `<head>`, here or in an include.
    pub(crate) head_links: BTreeSet<String>,
    pub(crate) head_title: Option<String>,
}

impl HeadAssets {
    /// Assets for an include of a parser holding `self`.
    pub(crate)
    fn for_include(&self) -> Self {
        Self {
            collecting: true,
            done_links: self.head_links.clone(),
            ..Self::default()
        }
    }

    pub(crate)
    fn capture<S>(&mut self, link: S)
    where
        S: Into<String>
    {
        let link = link.into();
        if self.done_links.contains(&link) {
            trace!("head link already present {link}");
            return;
        }

        debug!("head link {link}");
        self.head_links.insert(link);
    }

    /// Take over what an include gathered.
    pub(crate)
    fn absorb(&mut self, include: HeadAssets) {
        if !self.collecting {
            self.add_links.extend(include.head_links.iter().cloned());
            if include.head_title.is_some() {
                self.head_title = include.head_title;
            }
        }
        self.head_links.extend(include.head_links);
    }

    /// Register the dependencies declared by a response.
    pub(crate)
    fn embed<A>(&mut self, response: &HtmlResponse, app_dir: A)
    where
        A: AsRef<Path>
    {
        for dependency in response.dependencies().iter() {
            let link = if dependency.starts_with('<') {
                let script = SCRIPT_SRC.captures(dependency)
                    .and_then(|caps| caps.get(1));
                if let Some(script) = script {
                    register_front_script(script.as_str());
                }
                dependency.to_owned()
            }
            else {
                let url = app_url(app_dir.as_ref(), dependency)
                    .unwrap_or_else(|| dependency.to_owned());
                match url.rsplit_once('.').map(|(_, ext)| ext) {
                    Some("css") => format!("<link href=\"{url}\" rel=\"stylesheet\">"),
                    Some("js") => {
                        register_front_script(url.as_str());
                        format!("<script src=\"{url}\" type=\"module\"></script>")
                    },
                    _ => continue,
                }
            };

            if !self.collecting {
                self.add_links.insert(link.clone());
            }
            self.capture(link);
        }
    }

    /// Write gathered links and the title into a finished document.
    pub(crate)
    fn inject(&self, mut html: String, included: bool) -> String {
        if !self.add_links.is_empty() {
            if let Some(head) = html.find(HEAD_CLOSE) {
                let position = html[..head].rfind('>').map(|p| p + 1).unwrap_or(head);
                let links = self.add_links.iter()
                    .map(|l| l.as_str())
                    .collect::<Vec<&str>>()
                    .join(LINK_SEP);
                debug!("injecting {} head links", self.add_links.len());
                html.insert_str(position, &format!("{LINK_SEP}{links}"));
            }
            else {
                debug!("no head to inject {} links into", self.add_links.len());
            }
        }

        if let (Some(title), false) = (&self.head_title, included) {
            let open = html.find(TITLE_OPEN)
                .and_then(|open| html[open..].find('>').map(|p| open + p + 1));
            if let Some(position) = open {
                if let Some(close) = html[position..].find(TITLE_CLOSE) {
                    html.replace_range(position..position + close, title);
                }
            }
        }

        html
    }
}
