//! Property bags for virtual nodes.
//!
//! Every property is a tagged [`Prop`]: a class name, an event listener or a
//! plain attribute value. The tag decides how the attribute setter applies it
//! to a concrete node, so no key-prefix inspection happens at render time.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// A primitive property value.
///
/// Floats compare by bit pattern, so a `NaN` value equals itself and an
/// unchanged `NaN` prop is not reported as a change.
#[derive(Debug, Clone)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Bool(a), Value::Bool(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Str(v.clone())
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

macro_rules! impl_int_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Int(v as i64)
                }
            }
        )*
    };
}

impl_int_value!(i8, i16, i32, i64, u8, u16, u32, isize);

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        i64::try_from(v)
            .map(Value::Int)
            .unwrap_or(Value::Float(v as f64))
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::from(v as u64)
    }
}

/// An event delivered to a listener.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Lower-case event name, e.g. `click`
    pub name: String,
    /// Optional payload supplied by whoever dispatched the event
    pub detail: Option<Value>,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<Value>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Shared reference to an event callback.
///
/// Two handlers are equal only when they point at the same closure, which is
/// what the differ relies on to detect a swapped listener.
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn(&Event)>);

impl Handler {
    pub fn new(f: impl Fn(&Event) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, event: &Event) {
        (self.0)(event)
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

impl<F: Fn(&Event) + 'static> From<F> for Handler {
    fn from(f: F) -> Self {
        Handler::new(f)
    }
}

/// Identity of a property inside a [`Props`] bag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PropKey {
    /// The reserved `class` key
    Class,
    /// An event listener, keyed by lower-case event name
    On(String),
    /// Any other direct property
    Attr(String),
}

impl fmt::Display for PropKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropKey::Class => f.write_str("class"),
            PropKey::On(event) => write!(f, "on{event}"),
            PropKey::Attr(name) => f.write_str(name),
        }
    }
}

/// A single tagged property.
#[derive(Debug, Clone, PartialEq)]
pub enum Prop {
    /// Maps to the class-name attribute of the concrete node
    Class(String),
    /// Registers `handler` for `event`, matched case-insensitively
    On { event: String, handler: Handler },
    /// Set as a direct property on the concrete node
    Attr { name: String, value: Value },
}

impl Prop {
    pub fn class(value: impl Into<String>) -> Self {
        Prop::Class(value.into())
    }

    /// Create a listener prop. The event name is lower-cased.
    pub fn on(event: &str, handler: impl Into<Handler>) -> Self {
        Prop::On {
            event: event.to_lowercase(),
            handler: handler.into(),
        }
    }

    pub fn attr(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Prop::Attr {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> PropKey {
        match self {
            Prop::Class(_) => PropKey::Class,
            Prop::On { event, .. } => PropKey::On(event.to_lowercase()),
            Prop::Attr { name, .. } => PropKey::Attr(name.clone()),
        }
    }
}

/// Ordered property bag of a virtual node.
///
/// Keys are unique; inserting a prop with an existing key replaces it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    entries: BTreeMap<PropKey, Prop>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the class name.
    pub fn class(mut self, value: impl Into<String>) -> Self {
        self.insert(Prop::class(value));
        self
    }

    /// Register an event listener, e.g. `on("click", ...)`.
    pub fn on(mut self, event: &str, handler: impl Into<Handler>) -> Self {
        self.insert(Prop::on(event, handler));
        self
    }

    /// Set a direct property.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(Prop::attr(name, value));
        self
    }

    /// Insert a prop, returning the one it replaced.
    pub fn insert(&mut self, prop: Prop) -> Option<Prop> {
        self.entries.insert(prop.key(), prop)
    }

    pub fn get(&self, key: &PropKey) -> Option<&Prop> {
        self.entries.get(key)
    }

    /// Look up a direct property value by name.
    pub fn value(&self, name: &str) -> Option<&Value> {
        match self.entries.get(&PropKey::Attr(name.to_string())) {
            Some(Prop::Attr { value, .. }) => Some(value),
            _ => None,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &PropKey> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Prop> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<()> for Props {
    fn from(_: ()) -> Self {
        Props::new()
    }
}

impl FromIterator<Prop> for Props {
    fn from_iter<I: IntoIterator<Item = Prop>>(iter: I) -> Self {
        let mut props = Props::new();
        for prop in iter {
            props.insert(prop);
        }
        props
    }
}
