use crate::error::{SnbtError, SnbtResult};
use crate::tag::{Compound, TagNode};

/// Deepest compound/list nesting accepted, the same limit Minecraft applies to NBT
pub const MAX_DEPTH: usize = 512;

/// Parser for SNBT text
///
/// Accepts both the comma-separated form written by Minecraft and the
/// newline-separated form used by FTB Quests chapter files:
///
/// ```text
/// {
///     id: "1A2B3C"
///     title: "Getting Started"
///     x: -1.5d
///     tasks: [{ type: "item", count: 4L }]
/// }
/// ```
pub struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Parser {
            chars: source.chars().collect(),
            pos: 0,
            depth: 0,
        }
    }

    /// Parse the whole input as a single tag
    pub fn parse(&mut self) -> SnbtResult<TagNode> {
        self.skip_whitespace();
        let node = self.parse_value()?;
        self.skip_whitespace();
        if let Some(c) = self.peek() {
            return Err(self.error(format!("unexpected trailing character '{}'", c)));
        }
        Ok(node)
    }

    fn parse_value(&mut self) -> SnbtResult<TagNode> {
        match self.peek() {
            Some('{') => self.nested(Self::parse_compound),
            Some('[') => {
                if self.is_typed_array_start() {
                    self.parse_typed_array()
                } else {
                    self.nested(Self::parse_list)
                }
            }
            Some('"') | Some('\'') => Ok(TagNode::String(self.parse_quoted()?)),
            Some(_) => {
                let start = self.pos;
                let token = self.parse_unquoted();
                if token.is_empty() {
                    return Err(self.error("expected a value".to_string()));
                }
                classify_scalar(&token).map_err(|message| self.error_at(start, message))
            }
            None => Err(self.error("unexpected end of input".to_string())),
        }
    }

    /// Run a container parser one level deeper, failing past `MAX_DEPTH`
    fn nested(&mut self, parse: fn(&mut Self) -> SnbtResult<TagNode>) -> SnbtResult<TagNode> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(format!("nesting deeper than {} levels", MAX_DEPTH)));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn parse_compound(&mut self) -> SnbtResult<TagNode> {
        self.expect('{')?;
        let mut map = Compound::new();
        self.skip_whitespace();

        while self.peek() != Some('}') {
            let key = match self.peek() {
                Some('"') | Some('\'') => self.parse_quoted()?,
                Some(_) => {
                    let key = self.parse_unquoted();
                    if key.is_empty() {
                        return Err(self.error("expected a compound key".to_string()));
                    }
                    key
                }
                None => return Err(self.error("unterminated compound".to_string())),
            };
            self.skip_whitespace();
            self.expect(':')?;
            self.skip_whitespace();
            let value = self.parse_value()?;
            map.insert(key, value);
            self.skip_separator();
        }

        self.expect('}')?;
        Ok(TagNode::Compound(map))
    }

    fn parse_list(&mut self) -> SnbtResult<TagNode> {
        self.expect('[')?;
        let mut items = Vec::new();
        self.skip_whitespace();

        while self.peek() != Some(']') {
            if self.peek().is_none() {
                return Err(self.error("unterminated list".to_string()));
            }
            items.push(self.parse_value()?);
            self.skip_separator();
        }

        self.expect(']')?;
        Ok(TagNode::List(items))
    }

    fn is_typed_array_start(&self) -> bool {
        matches!(
            (self.peek_at(1), self.peek_at(2)),
            (Some('B' | 'I' | 'L'), Some(';'))
        )
    }

    fn parse_typed_array(&mut self) -> SnbtResult<TagNode> {
        self.expect('[')?;
        let kind = self.advance().unwrap_or('I');
        self.expect(';')?;
        self.skip_whitespace();

        let mut values = Vec::new();
        while self.peek() != Some(']') {
            let start = self.pos;
            let token = self.parse_unquoted();
            if token.is_empty() {
                return Err(self.error(format!("expected an element of a [{};] array", kind)));
            }
            let value = classify_scalar(&token).map_err(|m| self.error_at(start, m))?;
            values.push((start, value));
            self.skip_separator();
        }
        self.expect(']')?;

        match kind {
            'B' => values
                .into_iter()
                .map(|(at, v)| match v {
                    TagNode::Byte(b) => Ok(b),
                    TagNode::Bool(b) => Ok(b as i8),
                    TagNode::Int(i) => i8::try_from(i)
                        .map_err(|_| self.error_at(at, format!("{} is out of byte range", i))),
                    other => Err(self.error_at(at, format!("{} in a byte array", other.id()))),
                })
                .collect::<SnbtResult<Vec<_>>>()
                .map(TagNode::ByteArray),
            'L' => values
                .into_iter()
                .map(|(at, v)| match v {
                    TagNode::Long(l) => Ok(l),
                    TagNode::Int(i) => Ok(i as i64),
                    other => Err(self.error_at(at, format!("{} in a long array", other.id()))),
                })
                .collect::<SnbtResult<Vec<_>>>()
                .map(TagNode::LongArray),
            _ => values
                .into_iter()
                .map(|(at, v)| match v {
                    TagNode::Int(i) => Ok(i),
                    other => Err(self.error_at(at, format!("{} in an int array", other.id()))),
                })
                .collect::<SnbtResult<Vec<_>>>()
                .map(TagNode::IntArray),
        }
    }

    fn parse_quoted(&mut self) -> SnbtResult<String> {
        let start = self.pos;
        let quote = self.advance().unwrap_or('"');
        let mut out = String::new();

        loop {
            match self.advance() {
                None => return Err(self.error_at(start, "unterminated string".to_string())),
                Some(c) if c == quote => break,
                Some('\\') => {
                    let escaped = match self.advance() {
                        Some('\\') => '\\',
                        Some('"') => '"',
                        Some('\'') => '\'',
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some(other) => {
                            return Err(self.error(format!("invalid escape sequence '\\{}'", other)));
                        }
                        None => return Err(self.error_at(start, "unterminated string".to_string())),
                    };
                    out.push(escaped);
                }
                Some(c) => out.push(c),
            }
        }

        Ok(out)
    }

    fn parse_unquoted(&mut self) -> String {
        let mut token = String::new();
        while let Some(c) = self.peek() {
            if !is_unquoted_char(c) {
                break;
            }
            token.push(c);
            self.pos += 1;
        }
        token
    }

    /// Skip whitespace and at most one comma between elements
    fn skip_separator(&mut self) {
        self.skip_whitespace();
        if self.peek() == Some(',') {
            self.pos += 1;
            self.skip_whitespace();
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> SnbtResult<()> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{}', found '{}'", expected, c))),
            None => Err(self.error(format!("expected '{}', found end of input", expected))),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn error(&self, message: String) -> SnbtError {
        self.error_at(self.pos, message)
    }

    fn error_at(&self, pos: usize, message: String) -> SnbtError {
        let mut line = 1;
        let mut column = 1;
        for &c in &self.chars[..pos.min(self.chars.len())] {
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        SnbtError::Parse {
            line,
            column,
            message,
        }
    }
}

/// Parse SNBT text into a tag tree
pub fn parse(source: &str) -> SnbtResult<TagNode> {
    Parser::new(source).parse()
}

pub(crate) fn is_unquoted_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+')
}

/// Turn a bare token into a number, boolean, or unquoted string
fn classify_scalar(token: &str) -> Result<TagNode, String> {
    match token {
        "true" => return Ok(TagNode::Bool(true)),
        "false" => return Ok(TagNode::Bool(false)),
        _ => {}
    }

    let last = token.chars().last().unwrap_or(' ');
    let (body, suffix) = match last {
        'b' | 'B' | 's' | 'S' | 'l' | 'L' | 'f' | 'F' | 'd' | 'D' => {
            (&token[..token.len() - 1], Some(last.to_ascii_lowercase()))
        }
        _ => (token, None),
    };

    if is_integer(body) {
        let out_of_range = |kind: &str| format!("{} is out of {} range", token, kind);
        return match suffix {
            Some('b') => body.parse().map(TagNode::Byte).map_err(|_| out_of_range("byte")),
            Some('s') => body.parse().map(TagNode::Short).map_err(|_| out_of_range("short")),
            Some('l') => body.parse().map(TagNode::Long).map_err(|_| out_of_range("long")),
            Some('f') => parse_float(token, body).map(TagNode::Float),
            Some('d') => parse_double(token, body).map(TagNode::Double),
            _ => body.parse().map(TagNode::Int).map_err(|_| out_of_range("int")),
        };
    }

    if is_decimal(body) {
        return match suffix {
            Some('f') => parse_float(token, body).map(TagNode::Float),
            Some('d') | None => parse_double(token, body).map(TagNode::Double),
            // `1.5b` and friends are not numbers
            _ => Ok(TagNode::String(token.to_string())),
        };
    }

    Ok(TagNode::String(token.to_string()))
}

// `str::parse` saturates to infinity instead of failing, and infinity has
// no SNBT spelling
fn parse_float(token: &str, body: &str) -> Result<f32, String> {
    match body.parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err(format!("{} is out of float range", token)),
        Err(e) => Err(e.to_string()),
    }
}

fn parse_double(token: &str, body: &str) -> Result<f64, String> {
    match body.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err(format!("{} is out of double range", token)),
        Err(e) => Err(e.to_string()),
    }
}

fn is_integer(s: &str) -> bool {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn is_decimal(s: &str) -> bool {
    let unsigned = s.strip_prefix(['-', '+']).unwrap_or(s);
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(i) => (&unsigned[..i], Some(&unsigned[i + 1..])),
        None => (unsigned, None),
    };

    let mut parts = mantissa.splitn(2, '.');
    let whole = parts.next().unwrap_or("");
    let fraction = parts.next().unwrap_or("");
    let mantissa_ok = (!whole.is_empty() || !fraction.is_empty())
        && whole.chars().all(|c| c.is_ascii_digit())
        && fraction.chars().all(|c| c.is_ascii_digit());

    let exponent_ok = match exponent {
        Some(e) => is_integer(e),
        None => true,
    };

    mantissa_ok && exponent_ok
}
