//! Splits stylesheet text into rule blocks and rule bodies into declarations.
//!
//! Nothing here understands CSS beyond braces and semicolons. Every byte of the
//! input ends up in exactly one segment, so joining the segments gives the
//! input back.

/// One piece of a stylesheet, borrowed from the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A brace-delimited rule.
    Block(RuleBlock<'a>),
    /// Trailing text without a complete `{ ... }` pair.
    Rest(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleBlock<'a> {
    /// Everything up to the opening brace, the brace itself and at most one
    /// line ending right after it.
    pub preamble: &'a str,
    /// Declarations between the braces.
    pub body: &'a str,
    /// The closing brace.
    pub postamble: &'a str,
}

impl<'a> Segment<'a> {
    /// Appends the raw text of this segment to `out`.
    pub fn write_raw(&self, out: &mut String) {
        match self {
            Segment::Block(block) => {
                out.push_str(block.preamble);
                out.push_str(block.body);
                out.push_str(block.postamble);
            }
            Segment::Rest(text) => out.push_str(text),
        }
    }
}

/// Splits `text` into blocks in source order.
///
/// A block runs from the cursor to the next `{`, then to the first `}` after
/// it. Nested braces are not tracked: an inner `}` closes the block. When no
/// further `{ ... }` pair exists the remainder becomes a single [`Segment::Rest`].
pub fn split_blocks(text: &str) -> Vec<Segment<'_>> {
    let bytes = text.as_bytes();
    let mut segments = Vec::new();
    let mut cursor = 0;

    while cursor < text.len() {
        let Some(open) = find_byte(bytes, cursor, b'{') else {
            break;
        };
        let mut body_start = open + 1;
        if bytes.get(body_start) == Some(&b'\r') {
            body_start += 1;
        }
        if bytes.get(body_start) == Some(&b'\n') {
            body_start += 1;
        }
        let Some(close) = find_byte(bytes, body_start, b'}') else {
            break;
        };
        segments.push(Segment::Block(RuleBlock {
            preamble: &text[cursor..body_start],
            body: &text[body_start..close],
            postamble: &text[close..close + 1],
        }));
        cursor = close + 1;
    }

    if cursor < text.len() {
        segments.push(Segment::Rest(&text[cursor..]));
    }
    segments
}

/// Splits a rule body into declaration lines.
///
/// A line runs up to the first `;` and then on to the end of that physical
/// line. Without a `;` followed by a newline the remaining text is one last
/// line, so single-line bodies are left alone. A blank line always ends a
/// declaration; leading newlines are dropped and blank lines are discarded.
pub fn split_declarations(body: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut chunk_start = 0;
    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        if line.trim().is_empty() {
            split_chunk(&mut lines, &body[chunk_start..offset]);
            chunk_start = offset + line.len();
        }
        offset += line.len();
    }
    split_chunk(&mut lines, &body[chunk_start..]);
    lines
}

/// Splits text holding no blank line.
fn split_chunk<'a>(lines: &mut Vec<&'a str>, chunk: &'a str) {
    let bytes = chunk.as_bytes();
    let mut cursor = 0;
    while cursor < chunk.len() {
        let end = find_byte(bytes, cursor, b';')
            .and_then(|semi| find_byte(bytes, semi + 1, b'\n'))
            .map(|newline| newline + 1)
            .unwrap_or(chunk.len());
        push_declaration(lines, &chunk[cursor..end]);
        cursor = end;
    }
}

fn push_declaration<'a>(lines: &mut Vec<&'a str>, fragment: &'a str) {
    let fragment = fragment.trim_start_matches('\n');
    if !fragment.trim().is_empty() {
        lines.push(fragment);
    }
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes[from..]
        .iter()
        .position(|&b| b == needle)
        .map(|offset| from + offset)
}
