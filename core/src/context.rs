//! The data context of the Tessera Templating Engine.
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
        assets::HtmlResponse,
        error::{
            Error,
            Result,
        },
        file::read_file,
    },
    indexmap::IndexMap,
    serde_json::{
        from_str as from_json_str,
        Map as JsonMap,
        Number as JsonNumber,
        Value as JsonValue,
    },
    std::{
        fmt::{
            Debug,
            Display,
            Formatter,
            Result as FmtResult,
        },
        path::{
            Path,
            PathBuf,
        },
        sync::Arc,
    },
};

const LENGTH: &str = "length";
const JOIN: &str = ",";

/// The signature of a callable stored in the data context. The argument is
/// the value the callable was looked up on.
pub type Callable = dyn Fn(&Value) -> Result<Value> + Send + Sync;

/// A callable context value. Resolving a path onto one invokes it.
#[derive(Clone)]
pub
struct Function(Arc<Callable>);

impl Function {
    pub
    fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static
    {
        Self(Arc::new(f))
    }

    /// Invoke with `receiver` bound as the value it was found on.
    pub
    fn call(&self, receiver: &Value) -> Result<Value> {
        (self.0)(receiver)
    }
}

impl Debug for Function {
    fn fmt(&self, fmtr: &mut Formatter<'_>) -> FmtResult {
        fmtr.write_str("Function")
    }
}

/// A template render deferred until a path resolves to it.
#[derive(Clone, Debug)]
pub
struct Include {
    path: PathBuf,
    data: Box<Value>,
}

impl Include {
    pub
    fn new<P, V>(path: P, data: V) -> Self
    where
        P: AsRef<Path>,
        V: Into<Value>
    {
        Self {
            path: path.as_ref().into(),
            data: Box::new(data.into()),
        }
    }

    pub
    fn path(&self) -> &Path {
        &self.path
    }

    pub
    fn data(&self) -> &Value {
        &self.data
    }
}

/// A value in the data context.
///
/// Objects keep their insertion order so that `*` lists their values in
/// the order they were declared.
#[derive(Clone, Debug, Default)]
pub
enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(JsonNumber),
    String(String),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
    Function(Function),
    Html(HtmlResponse),
    Include(Include),
}

impl Value {
    /// Read a JSON file into a context value.
    pub
    fn read<P>(p: P) -> Result<Self>
    where
        P: AsRef<Path>
    {
        let file = read_file(&p)?;
        let json = from_json_str::<JsonValue>(&file)
            .map_err(|e| Error::JsonParse(e, p.as_ref().into()))?;

        Ok(json.into())
    }

    /// Wrap a closure as a callable value.
    pub
    fn function<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static
    {
        Self::Function(Function::new(f))
    }

    /// Build an object from key/value pairs, keeping their order.
    pub
    fn object<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>
    {
        Self::Object(entries.into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect())
    }

    pub
    fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether the value counts as true for conditionals and blocks.
    pub
    fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => n.as_f64()
                .map(|f| f != 0.0 && !f.is_nan())
                .unwrap_or(true),
            Self::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub
    fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a direct property.
    ///
    /// Objects are addressed by key, arrays by index or `length`.
    pub
    fn get(&self, key: &str) -> Option<Value> {
        match self {
            Self::Object(map) => map.get(key).cloned(),
            Self::Array(items) => if key == LENGTH {
                Some(Self::from(items.len()))
            }
            else {
                key.parse::<usize>().ok()
                    .and_then(|idx| items.get(idx))
                    .cloned()
            },
            Self::Html(resp) if key == LENGTH => Some(Self::from(resp.html().len())),
            _ => None,
        }
    }

    /// The values of an object as an array; anything else is returned as-is.
    pub
    fn values(&self) -> Self {
        match self {
            Self::Object(map) => Self::Array(map.values().cloned().collect()),
            other => other.clone(),
        }
    }

    /// Overlay the properties of `other` onto this object.
    ///
    /// Non-object operands leave `self` untouched.
    pub(crate)
    fn overlay(&mut self, other: &Value) {
        if let (Self::Object(map), Self::Object(over)) = (self, other) {
            for (k, v) in over.iter() {
                map.insert(k.to_owned(), v.to_owned());
            }
        }
    }

    /// Convert to plain JSON. Callables and deferred includes become null.
    pub
    fn to_json(&self) -> JsonValue {
        match self {
            Self::Null | Self::Function(_) | Self::Include(_) => JsonValue::Null,
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Number(n) => JsonValue::Number(n.to_owned()),
            Self::String(s) => JsonValue::String(s.to_owned()),
            Self::Array(items) => JsonValue::Array(items.iter()
                .map(|v| v.to_json())
                .collect()),
            Self::Object(map) => JsonValue::Object(map.iter()
                .map(|(k, v)| (k.to_owned(), v.to_json()))
                .collect::<JsonMap<String, JsonValue>>()),
            Self::Html(resp) => JsonValue::String(resp.html().to_owned()),
        }
    }
}

impl Display for Value {
    fn fmt(&self, fmtr: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Null | Self::Function(_) | Self::Include(_) => Ok(()),
            Self::Bool(b) => fmtr.write_fmt(format_args!("{b}")),
            Self::Number(n) => fmtr.write_fmt(format_args!("{n}")),
            Self::String(s) => fmtr.write_str(s),
            Self::Array(items) => {
                let mut dlim = "";
                for item in items.iter() {
                    fmtr.write_fmt(format_args!("{dlim}{item}"))?;
                    dlim = JOIN;
                }
                Ok(())
            },
            Self::Object(_) => fmtr.write_fmt(format_args!("{}", self.to_json())),
            Self::Html(resp) => fmtr.write_str(resp.html()),
        }
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => Self::Number(n),
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(items) => Self::Array(items.into_iter()
                .map(Self::from)
                .collect()),
            JsonValue::Object(map) => Self::Object(map.into_iter()
                .map(|(k, v)| (k, Self::from(v)))
                .collect()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Self::Number((n as u64).into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        JsonNumber::from_f64(n)
            .map(Self::Number)
            .unwrap_or(Self::Null)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Self::Function(f)
    }
}

impl From<HtmlResponse> for Value {
    fn from(resp: HtmlResponse) -> Self {
        Self::Html(resp)
    }
}

impl From<Include> for Value {
    fn from(include: Include) -> Self {
        Self::Include(include)
    }
}
