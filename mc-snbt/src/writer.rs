use crate::parser::is_unquoted_char;
use crate::tag::TagNode;

/// Layout used when writing a tree back to text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    /// Single line, comma separated (`{a:1,b:"x"}`)
    Compact,
    /// One entry per line, tab indented, no commas, as FTB Quests writes it
    #[default]
    Pretty,
}

/// Serialize a tag tree to SNBT
pub fn to_snbt(node: &TagNode, style: Style) -> String {
    let mut out = String::new();
    write_node(&mut out, node, style, 0);
    out
}

fn write_node(out: &mut String, node: &TagNode, style: Style, depth: usize) {
    match node {
        TagNode::Byte(v) => out.push_str(&format!("{}b", v)),
        TagNode::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
        TagNode::Short(v) => out.push_str(&format!("{}s", v)),
        TagNode::Int(v) => out.push_str(&v.to_string()),
        TagNode::Long(v) => out.push_str(&format!("{}L", v)),
        // Debug formatting keeps the ".0" on whole numbers
        TagNode::Float(v) => out.push_str(&format!("{:?}f", v)),
        TagNode::Double(v) => out.push_str(&format!("{:?}d", v)),
        TagNode::String(s) => write_quoted(out, s),
        TagNode::ByteArray(values) => write_array(out, 'B', values.iter().map(|v| format!("{}b", v)), style),
        TagNode::IntArray(values) => write_array(out, 'I', values.iter().map(|v| v.to_string()), style),
        TagNode::LongArray(values) => write_array(out, 'L', values.iter().map(|v| format!("{}L", v)), style),
        TagNode::List(items) => {
            if items.is_empty() {
                out.push_str(if style == Style::Pretty { "[ ]" } else { "[]" });
                return;
            }
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                separator(out, style, depth + 1, i == 0);
                write_node(out, item, style, depth + 1);
            }
            close(out, style, depth, ']');
        }
        TagNode::Compound(map) => {
            if map.is_empty() {
                out.push_str(if style == Style::Pretty { "{ }" } else { "{}" });
                return;
            }
            out.push('{');
            for (i, (key, value)) in map.iter().enumerate() {
                separator(out, style, depth + 1, i == 0);
                write_key(out, key);
                out.push(':');
                if style == Style::Pretty {
                    out.push(' ');
                }
                write_node(out, value, style, depth + 1);
            }
            close(out, style, depth, '}');
        }
    }
}

fn separator(out: &mut String, style: Style, depth: usize, first: bool) {
    match style {
        Style::Compact => {
            if !first {
                out.push(',');
            }
        }
        Style::Pretty => {
            out.push('\n');
            indent(out, depth);
        }
    }
}

fn close(out: &mut String, style: Style, depth: usize, bracket: char) {
    if style == Style::Pretty {
        out.push('\n');
        indent(out, depth);
    }
    out.push(bracket);
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push('\t');
    }
}

fn write_array(out: &mut String, kind: char, values: impl Iterator<Item = String>, style: Style) {
    let sep = match style {
        Style::Compact => ",",
        Style::Pretty => ", ",
    };
    let body = values.collect::<Vec<_>>().join(sep);
    match style {
        Style::Compact => out.push_str(&format!("[{};{}]", kind, body)),
        Style::Pretty if body.is_empty() => out.push_str(&format!("[{}; ]", kind)),
        Style::Pretty => out.push_str(&format!("[{}; {}]", kind, body)),
    }
}

fn write_key(out: &mut String, key: &str) {
    if !key.is_empty() && key.chars().all(is_unquoted_char) {
        out.push_str(key);
    } else {
        write_quoted(out, key);
    }
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
}

impl std::fmt::Display for TagNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", to_snbt(self, Style::Compact))
    }
}
