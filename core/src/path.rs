//! Path handling for includes and head assets in the Tessera Templating Engine.
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

use std::path::{
    Component,
    Path,
    PathBuf,
};

const URL_SEP: char = '/';
const SCOPE: char = '@';
const PACKAGES: &str = "node_modules";

/// Lexically resolve `.` and `..` components without touching the disk.
pub(crate)
fn clean_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let mut out = Vec::new();

    for comp in path.as_ref().components() {
        match comp {
            Component::CurDir => (),
            Component::ParentDir => match out.last() {
                Some(Component::RootDir) => (),
                Some(Component::Normal(_)) => {
                    out.pop();
                },
                None | Some(Component::CurDir) | Some(Component::ParentDir) |
                Some(Component::Prefix(_)) => out.push(comp),
            },
            comp => out.push(comp),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }

    out.iter().collect()
}

/// Map an include expression onto the filesystem.
///
/// `/file` lives under the application root and `/@scope/file` under its
/// installed packages. Anything else is relative to `directory`, the
/// directory of the including template.
pub(crate)
fn include_target<A, D>(app_dir: A, directory: D, expression: &str) -> PathBuf
where
    A: AsRef<Path>,
    D: AsRef<Path>
{
    let target = if let Some(rest) = expression.strip_prefix(URL_SEP) {
        let mut root = app_dir.as_ref().to_path_buf();
        if rest.starts_with(SCOPE) {
            root.push(PACKAGES);
        }
        root.push(rest);
        root
    }
    else if Path::new(expression).is_absolute() {
        PathBuf::from(expression)
    }
    else {
        directory.as_ref().join(expression)
    };

    clean_path(target)
}

/// Render a filesystem path as an application-root URL path such as
/// `/css/site.css`, with `/` separators on every platform.
///
/// Returns `None` when `path` does not live under `app_dir`.
pub(crate)
fn app_url<A, P>(app_dir: A, path: P) -> Option<String>
where
    A: AsRef<Path>,
    P: AsRef<Path>
{
    let app_dir = clean_path(app_dir);
    let path = clean_path(path);
    let relative = path.strip_prefix(&app_dir).ok()?;

    let mut url = String::new();
    for comp in relative.components() {
        if let Component::Normal(seg) = comp {
            url.push(URL_SEP);
            url.push_str(&seg.to_string_lossy());
        }
    }

    if url.is_empty() {
        url.push(URL_SEP);
    }

    Some(url)
}

/// Normalize an asset reference found in a template living in `directory`
/// into an application-root URL path.
///
/// Absolute URLs and references with a scheme are returned unchanged.
pub(crate)
fn front_asset<A, D>(app_dir: A, directory: D, reference: &str) -> String
where
    A: AsRef<Path>,
    D: AsRef<Path>
{
    if reference.starts_with(URL_SEP) || reference.contains("://") {
        return reference.to_owned();
    }

    app_url(app_dir, directory.as_ref().join(reference))
        .unwrap_or_else(|| reference.to_owned())
}
