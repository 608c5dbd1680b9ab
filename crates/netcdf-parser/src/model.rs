//! In-memory view of a granule's group hierarchy.
//!
//! Readers snapshot the file into these types and release the underlying
//! handle, so everything downstream works on plain owned data. Each group
//! owns its child groups and variables; there are no back-pointers.

use std::fmt;

/// Path of the root group.
pub const ROOT_PATH: &str = "/";

/// A named dimension with its current length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub name: String,
    pub len: usize,
}

impl Dimension {
    pub fn new(name: impl Into<String>, len: usize) -> Self {
        Self {
            name: name.into(),
            len,
        }
    }
}

/// An attribute value as stored in the file.
///
/// Single-element numeric attributes are scalars; anything longer is a
/// sequence. Character attributes are `Text`, NetCDF-4 `string` attributes
/// with more than one element are `Texts`. The `_FillValue` of a `char`
/// variable is a byte string, not text, and is read as `Bytes`.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Text(String),
    Texts(Vec<String>),
    Int(i64),
    UInt(u64),
    Float(f32),
    Double(f64),
    Ints(Vec<i64>),
    UInts(Vec<u64>),
    Floats(Vec<f32>),
    Doubles(Vec<f64>),
    /// Raw byte string with no numeric or textual interpretation.
    Bytes(Vec<u8>),
}

impl AttrValue {
    /// Borrow the value as text, if it is a single string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            AttrValue::Texts(v) if v.len() == 1 => Some(&v[0]),
            _ => None,
        }
    }

    /// Numeric scalar value widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            AttrValue::Int(v) => Some(v as f64),
            AttrValue::UInt(v) => Some(v as f64),
            AttrValue::Float(v) => Some(v as f64),
            AttrValue::Double(v) => Some(v),
            _ => None,
        }
    }

    /// True for a floating-point scalar holding NaN.
    pub fn is_nan(&self) -> bool {
        match *self {
            AttrValue::Float(v) => v.is_nan(),
            AttrValue::Double(v) => v.is_nan(),
            _ => false,
        }
    }

    pub fn is_bytes(&self) -> bool {
        matches!(self, AttrValue::Bytes(_))
    }

    /// Render the value as a single line of text, joining sequences with
    /// spaces (`"1 2 4"`, `"good bad"`).
    pub fn to_text(&self) -> String {
        fn join<T: fmt::Display>(items: &[T]) -> String {
            items
                .iter()
                .map(|i| i.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        }
        fn join_floats<T: fmt::Debug>(items: &[T]) -> String {
            items
                .iter()
                .map(|i| format!("{:?}", i))
                .collect::<Vec<_>>()
                .join(" ")
        }

        match self {
            AttrValue::Text(s) => s.clone(),
            AttrValue::Texts(v) => v.join(" "),
            AttrValue::Int(v) => v.to_string(),
            AttrValue::UInt(v) => v.to_string(),
            AttrValue::Float(v) => format!("{:?}", v),
            AttrValue::Double(v) => format!("{:?}", v),
            AttrValue::Ints(v) => join(v),
            AttrValue::UInts(v) => join(v),
            AttrValue::Floats(v) => join_floats(v),
            AttrValue::Doubles(v) => join_floats(v),
            AttrValue::Bytes(v) => String::from_utf8_lossy(v).into_owned(),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<f32> for AttrValue {
    fn from(v: f32) -> Self {
        AttrValue::Float(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Double(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

/// Attribute set of a variable or group, in file order.
///
/// Names are case-sensitive. Setting an existing name replaces its value
/// in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    entries: Vec<(String, AttrValue)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            attrs.set(k, v);
        }
        attrs
    }
}

/// Kind of a user-defined (non-atomic) NetCDF-4 type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserTypeKind {
    Compound,
    Enum,
    Opaque,
    Vlen,
}

impl fmt::Display for UserTypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserTypeKind::Compound => write!(f, "compound"),
            UserTypeKind::Enum => write!(f, "enum"),
            UserTypeKind::Opaque => write!(f, "opaque"),
            UserTypeKind::Vlen => write!(f, "vlen"),
        }
    }
}

/// Element type of a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementType {
    Char,
    Byte,
    UByte,
    Short,
    UShort,
    Int,
    UInt,
    Int64,
    UInt64,
    Float,
    Double,
    /// NetCDF-4 variable-length string.
    String,
    /// Compound, enum, opaque or vlen type declared in the file.
    UserDefined { kind: UserTypeKind, name: String },
}

impl ElementType {
    /// Fixed-width binary code (`"f4"`, `"u1"`, `"S1"`...) for atomic types.
    ///
    /// Variable-length strings and user-defined types have no binary code.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            ElementType::Char => Some("S1"),
            ElementType::Byte => Some("i1"),
            ElementType::UByte => Some("u1"),
            ElementType::Short => Some("i2"),
            ElementType::UShort => Some("u2"),
            ElementType::Int => Some("i4"),
            ElementType::UInt => Some("u4"),
            ElementType::Int64 => Some("i8"),
            ElementType::UInt64 => Some("u8"),
            ElementType::Float => Some("f4"),
            ElementType::Double => Some("f8"),
            ElementType::String | ElementType::UserDefined { .. } => None,
        }
    }

    /// Textual description of the type (`"vlen string"`, `"compound wind_t"`).
    pub fn description(&self) -> String {
        match self {
            ElementType::String => "vlen string".to_string(),
            ElementType::UserDefined { kind, name } => format!("{} {}", kind, name),
            other => other.keyword().unwrap_or_default().to_string(),
        }
    }

    fn keyword(&self) -> Option<&'static str> {
        match self {
            ElementType::Char => Some("char"),
            ElementType::Byte => Some("byte"),
            ElementType::UByte => Some("ubyte"),
            ElementType::Short => Some("short"),
            ElementType::UShort => Some("ushort"),
            ElementType::Int => Some("int"),
            ElementType::UInt => Some("uint"),
            ElementType::Int64 => Some("int64"),
            ElementType::UInt64 => Some("uint64"),
            ElementType::Float => Some("float"),
            ElementType::Double => Some("double"),
            ElementType::String => Some("string"),
            ElementType::UserDefined { .. } => None,
        }
    }
}

/// A variable and its metadata. Data values are never loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    /// Path of the owning group, `"/"` for the root group.
    pub group_path: String,
    pub attributes: Attributes,
    /// Dimensions, outermost first.
    pub dimensions: Vec<Dimension>,
    pub element_type: ElementType,
}

impl Variable {
    pub fn new(name: impl Into<String>, element_type: ElementType) -> Self {
        Self {
            name: name.into(),
            group_path: ROOT_PATH.to_string(),
            attributes: Attributes::new(),
            dimensions: Vec::new(),
            element_type,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    pub fn with_attribute(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.attributes.set(name, value);
        self
    }

    pub fn with_dimension(mut self, name: &str, len: usize) -> Self {
        self.dimensions.push(Dimension::new(name, len));
        self
    }
}

/// A group node: attributes, local dimensions, variables and child groups.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: String,
    /// Slash-delimited path, `"/"` for the root group.
    pub path: String,
    pub attributes: Attributes,
    pub dimensions: Vec<Dimension>,
    pub variables: Vec<Variable>,
    pub groups: Vec<Group>,
}

impl Group {
    /// Create an empty root group.
    pub fn root() -> Self {
        Self {
            name: ROOT_PATH.to_string(),
            path: ROOT_PATH.to_string(),
            attributes: Attributes::new(),
            dimensions: Vec::new(),
            variables: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Create an empty group nested under `parent_path`.
    pub fn child_of(parent_path: &str, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: join_path(parent_path, &name),
            name,
            ..Self::root()
        }
    }

    pub fn is_root(&self) -> bool {
        self.path == ROOT_PATH
    }

    /// Add a variable, stamping it with this group's path.
    pub fn add_variable(&mut self, mut variable: Variable) {
        variable.group_path = self.path.clone();
        self.variables.push(variable);
    }

    /// Add a child group named `name` and return it for population.
    pub fn add_group(&mut self, name: impl Into<String>) -> &mut Group {
        let child = Group::child_of(&self.path, name);
        self.groups.push(child);
        let last = self.groups.len() - 1;
        &mut self.groups[last]
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Total number of variables in this group and all descendants.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
            + self
                .groups
                .iter()
                .map(|g| g.variable_count())
                .sum::<usize>()
    }
}

/// Join a group path and a child name.
pub fn join_path(parent: &str, name: &str) -> String {
    if parent == ROOT_PATH {
        format!("/{}", name)
    } else {
        format!("{}/{}", parent, name)
    }
}
