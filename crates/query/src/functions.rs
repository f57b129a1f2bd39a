//! Defines the registry and built-in implementations for query functions.
//!
//! Functions are pure: they receive already-evaluated arguments and return a
//! new value. Applications register their own derivations (for example a
//! lookup into an in-memory store keyed by the parent's id) by name.
use crate::error::QueryError;
use banded_types::{Value, resolve_value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The signature for a query function implementation.
pub type QueryFunction = Arc<dyn Fn(&[Value]) -> Result<Value, QueryError> + Send + Sync>;

/// A registry to hold all available functions for the evaluation engine.
#[derive(Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, QueryFunction>,
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.functions.keys().collect();
        names.sort();
        f.debug_struct("FunctionRegistry")
            .field("functions", &names)
            .finish()
    }
}

impl FunctionRegistry {
    /// Creates a new, empty function registry.
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Registers a new function, replacing any previous one with the same name.
    pub fn register(
        &mut self,
        name: &str,
        func: impl Fn(&[Value]) -> Result<Value, QueryError> + Send + Sync + 'static,
    ) {
        self.functions.insert(name.to_lowercase(), Arc::new(func));
    }

    /// Finds a function by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&QueryFunction> {
        self.functions.get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

// --- Argument helpers ---

fn error(function: &str, message: impl Into<String>) -> QueryError {
    QueryError::Function {
        function: function.to_string(),
        message: message.into(),
    }
}

fn list_arg<'a>(function: &str, args: &'a [Value], i: usize) -> Result<&'a [Value], QueryError> {
    match args.get(i) {
        Some(Value::List(items)) => Ok(items),
        Some(other) => Err(error(
            function,
            format!("argument {} must be a list, got {}", i + 1, other.type_name()),
        )),
        None => Err(error(function, format!("missing argument {}", i + 1))),
    }
}

fn str_arg<'a>(function: &str, args: &'a [Value], i: usize) -> Result<&'a str, QueryError> {
    args.get(i)
        .and_then(Value::as_str)
        .ok_or_else(|| error(function, format!("argument {} must be a string", i + 1)))
}

fn arity(function: &str, args: &[Value], expected: usize) -> Result<(), QueryError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(error(
            function,
            format!("expected {} arguments, got {}", expected, args.len()),
        ))
    }
}

/// Ordering used by `sort_by`. Values of unrelated kinds compare equal, so a
/// stable sort leaves them in place.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Str(x), Value::Str(y)) => x.cmp(y),
        (Value::Date(x), Value::Date(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
    }
}

// --- Built-in Function Implementations ---

fn select_where(function: &str, args: &[Value], keep_matches: bool) -> Result<Value, QueryError> {
    arity(function, args, 3)?;
    let items = list_arg(function, args, 0)?;
    let attribute = str_arg(function, args, 1)?;
    let expected = &args[2];

    let mut selected = Vec::new();
    for item in items {
        if (resolve_value(item, attribute)? == *expected) == keep_matches {
            selected.push(item.clone());
        }
    }
    Ok(Value::List(selected))
}

fn filter(args: &[Value]) -> Result<Value, QueryError> {
    select_where("filter", args, true)
}

fn exclude(args: &[Value]) -> Result<Value, QueryError> {
    select_where("exclude", args, false)
}

fn sort_by(args: &[Value]) -> Result<Value, QueryError> {
    arity("sort_by", args, 2)?;
    let items = list_arg("sort_by", args, 0)?;
    let attribute = str_arg("sort_by", args, 1)?;

    let mut keyed = items
        .iter()
        .map(|item| -> Result<_, QueryError> {
            Ok((resolve_value(item, attribute)?, item.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    keyed.sort_by(|(a, _), (b, _)| compare_values(a, b));
    Ok(Value::List(keyed.into_iter().map(|(_, item)| item).collect()))
}

fn reverse(args: &[Value]) -> Result<Value, QueryError> {
    arity("reverse", args, 1)?;
    let items = list_arg("reverse", args, 0)?;
    Ok(Value::List(items.iter().rev().cloned().collect()))
}

fn take(args: &[Value]) -> Result<Value, QueryError> {
    arity("take", args, 2)?;
    let items = list_arg("take", args, 0)?;
    let n = args[1]
        .as_i64()
        .filter(|n| *n >= 0)
        .ok_or_else(|| error("take", "argument 2 must be a non-negative integer"))?;
    Ok(Value::List(items.iter().take(n as usize).cloned().collect()))
}

fn pluck(args: &[Value]) -> Result<Value, QueryError> {
    arity("pluck", args, 2)?;
    let items = list_arg("pluck", args, 0)?;
    let attribute = str_arg("pluck", args, 1)?;
    let values = items
        .iter()
        .map(|item| resolve_value(item, attribute))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::List(values))
}

fn flatten(args: &[Value]) -> Result<Value, QueryError> {
    arity("flatten", args, 1)?;
    let items = list_arg("flatten", args, 0)?;
    let mut flat = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::List(inner) => flat.extend(inner.iter().cloned()),
            other => flat.push(other.clone()),
        }
    }
    Ok(Value::List(flat))
}

fn count(args: &[Value]) -> Result<Value, QueryError> {
    arity("count", args, 1)?;
    let items = list_arg("count", args, 0)?;
    Ok(Value::Int(items.len() as i64))
}

impl Default for FunctionRegistry {
    /// Creates a new registry populated with all built-in functions.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register("filter", filter);
        registry.register("exclude", exclude);
        registry.register("sort_by", sort_by);
        registry.register("reverse", reverse);
        registry.register("take", take);
        registry.register("pluck", pluck);
        registry.register("flatten", flatten);
        registry.register("count", count);
        registry
    }
}
