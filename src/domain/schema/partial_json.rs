//! Completion of truncated JSON objects
//!
//! While a structured reply streams in, the accumulated text is a prefix of a
//! JSON object. [`complete_partial_json`] closes that prefix into the most
//! complete valid object:
//! - an unterminated string value is closed, an unterminated key is dropped
//! - a key with no value yet becomes `null`, a trailing comma is dropped
//! - partial `true`/`false`/`null` are completed, partial numbers are trimmed
//! - open arrays and objects are closed innermost first

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Key,
    Colon,
    Value,
    CommaOrEnd,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    is_object: bool,
    expect: Expect,
}

impl Frame {
    fn object() -> Self {
        Self {
            is_object: true,
            expect: Expect::Key,
        }
    }

    fn array() -> Self {
        Self {
            is_object: false,
            expect: Expect::Value,
        }
    }

    fn closer(&self) -> char {
        if self.is_object { '}' } else { ']' }
    }
}

/// Scanner state at the end of the buffer
#[derive(Debug, Default)]
struct Scan {
    stack: Vec<Frame>,
    in_string: bool,
    string_start: usize,
    string_is_key: bool,
    escaped: bool,
    unicode_left: u8,
    escape_start: usize,
    literal_start: Option<usize>,
    root_end: Option<usize>,
}

impl Scan {
    fn value_done(&mut self) {
        if let Some(frame) = self.stack.last_mut() {
            frame.expect = Expect::CommaOrEnd;
        }
    }

    fn run(src: &str) -> Self {
        let mut scan = Scan::default();

        for (i, c) in src.char_indices() {
            if scan.in_string {
                if scan.unicode_left > 0 {
                    scan.unicode_left -= 1;
                    continue;
                }
                if scan.escaped {
                    scan.escaped = false;
                    if c == 'u' {
                        scan.unicode_left = 4;
                    }
                    continue;
                }
                match c {
                    '\\' => {
                        scan.escaped = true;
                        scan.escape_start = i;
                    }
                    '"' => {
                        scan.in_string = false;
                        if scan.string_is_key {
                            if let Some(frame) = scan.stack.last_mut() {
                                frame.expect = Expect::Colon;
                            }
                        } else {
                            scan.value_done();
                        }
                    }
                    _ => {}
                }
                continue;
            }

            if scan.literal_start.is_some() {
                if is_literal_char(c) {
                    continue;
                }
                scan.literal_start = None;
                scan.value_done();
            }

            match c {
                '{' => scan.stack.push(Frame::object()),
                '[' => scan.stack.push(Frame::array()),
                '}' | ']' => {
                    scan.stack.pop();
                    if scan.stack.is_empty() {
                        scan.root_end = Some(i + 1);
                        break;
                    }
                    scan.value_done();
                }
                '"' => {
                    scan.in_string = true;
                    scan.string_start = i;
                    scan.string_is_key = matches!(
                        scan.stack.last(),
                        Some(frame) if frame.is_object && frame.expect == Expect::Key
                    );
                }
                ':' => {
                    if let Some(frame) = scan.stack.last_mut() {
                        frame.expect = Expect::Value;
                    }
                }
                ',' => {
                    if let Some(frame) = scan.stack.last_mut() {
                        frame.expect = if frame.is_object {
                            Expect::Key
                        } else {
                            Expect::Value
                        };
                    }
                }
                c if c.is_whitespace() => {}
                _ => scan.literal_start = Some(i),
            }
        }

        scan
    }
}

fn is_literal_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-')
}

/// Longest valid completion of a truncated literal
fn complete_literal(literal: &str) -> Option<String> {
    for word in ["true", "false", "null"] {
        if word.starts_with(literal) {
            return Some(word.to_string());
        }
    }

    let mut candidate = literal;
    while !candidate.is_empty() {
        if serde_json::from_str::<serde_json::Number>(candidate).is_ok() {
            return Some(candidate.to_string());
        }
        let mut chars = candidate.chars();
        chars.next_back();
        candidate = chars.as_str();
    }

    None
}

/// Close a truncated JSON object. Returns `None` when the text is empty or
/// does not start an object.
pub fn complete_partial_json(buffer: &str) -> Option<Value> {
    let src = buffer.trim_start();
    if !src.starts_with('{') {
        return None;
    }

    let mut scan = Scan::run(src);

    if let Some(end) = scan.root_end {
        return serde_json::from_str(&src[..end]).ok();
    }

    let mut out = if scan.in_string {
        if scan.string_is_key {
            src[..scan.string_start].to_string()
        } else {
            let end = if scan.escaped || scan.unicode_left > 0 {
                scan.escape_start
            } else {
                src.len()
            };
            scan.value_done();
            format!("{}\"", &src[..end])
        }
    } else if let Some(start) = scan.literal_start {
        match complete_literal(&src[start..]) {
            Some(literal) => {
                scan.value_done();
                format!("{}{}", &src[..start], literal)
            }
            None => src[..start].to_string(),
        }
    } else {
        src.to_string()
    };

    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    if out.ends_with(',') {
        out.pop();
    }

    if let Some(top) = scan.stack.last() {
        if top.is_object {
            match top.expect {
                Expect::Colon => out.push_str(":null"),
                Expect::Value => out.push_str("null"),
                Expect::Key | Expect::CommaOrEnd => {}
            }
        }
    }

    for frame in scan.stack.iter().rev() {
        out.push(frame.closer());
    }

    serde_json::from_str(&out).ok()
}
