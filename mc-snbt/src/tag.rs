use indexmap::IndexMap;

/// Identity of a tag, one per NBT tag kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagId {
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
    List,
    Compound,
    ByteArray,
    IntArray,
    LongArray,
}

impl std::fmt::Display for TagId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TagId::Byte => "BYTE",
            TagId::Short => "SHORT",
            TagId::Int => "INT",
            TagId::Long => "LONG",
            TagId::Float => "FLOAT",
            TagId::Double => "DOUBLE",
            TagId::String => "STRING",
            TagId::List => "LIST",
            TagId::Compound => "COMPOUND",
            TagId::ByteArray => "BYTE_ARRAY",
            TagId::IntArray => "INT_ARRAY",
            TagId::LongArray => "LONG_ARRAY",
        };
        write!(f, "{}", name)
    }
}

/// Compound payload: keys keep the order they were parsed or inserted in
pub type Compound = IndexMap<String, TagNode>;

/// A node of an SNBT tag tree
///
/// The payload always matches the tag kind, so there is no way to build a
/// `COMPOUND` that holds a list or a `STRING` that holds a number.
///
/// `Bool` is a `BYTE` that was spelled `true`/`false` in the source; it
/// keeps that spelling when written back.
#[derive(Debug, Clone, PartialEq)]
pub enum TagNode {
    Byte(i8),
    Bool(bool),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    List(Vec<TagNode>),
    Compound(Compound),
    ByteArray(Vec<i8>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl TagNode {
    /// Build a compound from `(key, value)` pairs, keeping their order
    pub fn compound<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, TagNode)>,
    {
        TagNode::Compound(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn list<I: IntoIterator<Item = TagNode>>(items: I) -> Self {
        TagNode::List(items.into_iter().collect())
    }

    pub fn string(value: impl Into<String>) -> Self {
        TagNode::String(value.into())
    }

    pub fn id(&self) -> TagId {
        match self {
            TagNode::Byte(_) | TagNode::Bool(_) => TagId::Byte,
            TagNode::Short(_) => TagId::Short,
            TagNode::Int(_) => TagId::Int,
            TagNode::Long(_) => TagId::Long,
            TagNode::Float(_) => TagId::Float,
            TagNode::Double(_) => TagId::Double,
            TagNode::String(_) => TagId::String,
            TagNode::List(_) => TagId::List,
            TagNode::Compound(_) => TagId::Compound,
            TagNode::ByteArray(_) => TagId::ByteArray,
            TagNode::IntArray(_) => TagId::IntArray,
            TagNode::LongArray(_) => TagId::LongArray,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, TagNode::String(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagNode::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            TagNode::Compound(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[TagNode]> {
        match self {
            TagNode::List(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a direct child of a compound by key
    pub fn get(&self, key: &str) -> Option<&TagNode> {
        self.as_compound().and_then(|map| map.get(key))
    }

    /// Count the nodes of this subtree, the node itself included
    pub fn node_count(&self) -> usize {
        1 + match self {
            TagNode::List(items) => items.iter().map(TagNode::node_count).sum(),
            TagNode::Compound(map) => map.values().map(TagNode::node_count).sum(),
            _ => 0,
        }
    }
}

impl From<&str> for TagNode {
    fn from(value: &str) -> Self {
        TagNode::String(value.to_string())
    }
}

impl From<String> for TagNode {
    fn from(value: String) -> Self {
        TagNode::String(value)
    }
}

impl From<i32> for TagNode {
    fn from(value: i32) -> Self {
        TagNode::Int(value)
    }
}

impl From<f64> for TagNode {
    fn from(value: f64) -> Self {
        TagNode::Double(value)
    }
}

impl From<bool> for TagNode {
    fn from(value: bool) -> Self {
        TagNode::Bool(value)
    }
}
