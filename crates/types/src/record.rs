//! The capability domain objects implement so bands can read values off them.
//!
//! A [`Record`] answers "what is the member called `name`?" with either a
//! stored field or a zero-argument accessor. Callers never need to know which
//! one they got: [`crate::attribute::resolve`] invokes accessors transparently.
//!
//! There are three ways to make data bindable:
//!
//! - implement [`Record`] by hand with a `match` over member names,
//! - register accessors for a type in an [`AccessorTable`] and wrap values in [`Adapted`],
//! - feed JSON objects, which become [`JsonRecord`]s.

use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A shared handle to a bound domain object.
pub type Object = Arc<dyn Record>;

/// A member looked up on a record.
pub enum Member<'a> {
    /// A stored value.
    Field(Value),
    /// A zero-argument accessor, invoked on resolution.
    Accessor(Box<dyn FnOnce() -> Value + 'a>),
}

impl<'a> Member<'a> {
    pub fn field(value: impl Into<Value>) -> Self {
        Member::Field(value.into())
    }

    pub fn accessor<V: Into<Value>>(f: impl FnOnce() -> V + 'a) -> Self {
        Member::Accessor(Box::new(move || f().into()))
    }

    pub fn is_accessor(&self) -> bool {
        matches!(self, Member::Accessor(_))
    }

    /// Reads the member, invoking it if it is an accessor.
    pub fn into_value(self) -> Value {
        match self {
            Member::Field(value) => value,
            Member::Accessor(f) => f(),
        }
    }
}

impl fmt::Debug for Member<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Field(value) => f.debug_tuple("Field").field(value).finish(),
            Member::Accessor(_) => f.write_str("Accessor(..)"),
        }
    }
}

/// A domain object that exposes named members.
pub trait Record: fmt::Debug + Send + Sync {
    /// Looks up a member by name. Returns `None` if the record has no such member.
    fn member(&self, name: &str) -> Option<Member<'_>>;

    /// A stable, human-readable identity used in error messages and for
    /// comparing records by value.
    fn identity(&self) -> String {
        format!("{:?}", self)
    }
}

type Getter<T> = Box<dyn Fn(&T) -> Value + Send + Sync>;

enum Accessor<T> {
    Field(Getter<T>),
    Method(Getter<T>),
}

/// An explicit registration of the members a type exposes.
///
/// ```ignore
/// let table = AccessorTable::new()
///     .field("name", |p: &Person| p.name.clone().into())
///     .method("age", |p: &Person| p.age().into())
///     .identity(|p| p.id.to_string());
/// let object = Adapted::object(person, Arc::new(table));
/// ```
pub struct AccessorTable<T> {
    members: HashMap<String, Accessor<T>>,
    identity: Option<Box<dyn Fn(&T) -> String + Send + Sync>>,
}

impl<T> Default for AccessorTable<T> {
    fn default() -> Self {
        Self {
            members: HashMap::new(),
            identity: None,
        }
    }
}

impl<T> AccessorTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a stored field.
    pub fn field(mut self, name: &str, getter: impl Fn(&T) -> Value + Send + Sync + 'static) -> Self {
        self.members
            .insert(name.to_string(), Accessor::Field(Box::new(getter)));
        self
    }

    /// Registers a computed, zero-argument accessor.
    pub fn method(mut self, name: &str, getter: impl Fn(&T) -> Value + Send + Sync + 'static) -> Self {
        self.members
            .insert(name.to_string(), Accessor::Method(Box::new(getter)));
        self
    }

    /// Sets how the identity of an adapted value is derived.
    pub fn identity(mut self, f: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        self.identity = Some(Box::new(f));
        self
    }

    pub fn has_member(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    fn lookup<'a>(&'a self, target: &'a T, name: &str) -> Option<Member<'a>> {
        match self.members.get(name)? {
            Accessor::Field(getter) => Some(Member::Field(getter(target))),
            Accessor::Method(getter) => Some(Member::Accessor(Box::new(move || getter(target)))),
        }
    }
}

/// A value paired with the accessor table describing its members.
pub struct Adapted<T> {
    inner: T,
    table: Arc<AccessorTable<T>>,
}

impl<T: fmt::Debug + Send + Sync + 'static> Adapted<T> {
    pub fn new(inner: T, table: Arc<AccessorTable<T>>) -> Self {
        Self { inner, table }
    }

    /// Wraps a value and returns it as a shared [`Object`].
    pub fn object(inner: T, table: Arc<AccessorTable<T>>) -> Object {
        Arc::new(Self::new(inner, table))
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: fmt::Debug> fmt::Debug for Adapted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

impl<T: fmt::Debug + Send + Sync> Record for Adapted<T> {
    fn member(&self, name: &str) -> Option<Member<'_>> {
        self.table.lookup(&self.inner, name)
    }

    fn identity(&self) -> String {
        match &self.table.identity {
            Some(f) => f(&self.inner),
            None => format!("{:?}", self.inner),
        }
    }
}

/// A record backed by a JSON object. Every key is a stored field.
#[derive(Debug, Clone)]
pub struct JsonRecord {
    fields: serde_json::Map<String, serde_json::Value>,
}

impl JsonRecord {
    pub fn new(fields: serde_json::Map<String, serde_json::Value>) -> Self {
        Self { fields }
    }

    /// Converts a JSON array of objects into bindable objects.
    ///
    /// Non-object entries are rejected with their position.
    pub fn objects_from_json(json: serde_json::Value) -> Result<Vec<Object>, String> {
        let items = match json {
            serde_json::Value::Array(items) => items,
            other => return Err(format!("Expected a JSON array of objects, got: {}", other)),
        };

        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                serde_json::Value::Object(map) => Ok(Arc::new(JsonRecord::new(map)) as Object),
                other => Err(format!("Entry {} is not a JSON object: {}", i, other)),
            })
            .collect()
    }
}

impl Record for JsonRecord {
    fn member(&self, name: &str) -> Option<Member<'_>> {
        self.fields
            .get(name)
            .map(|v| Member::Field(Value::from(v.clone())))
    }

    /// Uses the `id` key when present, otherwise the serialized object.
    fn identity(&self) -> String {
        match self.fields.get("id") {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => serde_json::Value::Object(self.fields.clone()).to_string(),
        }
    }
}
