//! Serializes a parsed HTML document one node per line.
//!
//! [`print_document`] indents with a single space per nesting level;
//! [`IndentedPrinter`] widens that to any indent width afterwards.

use crate::dom::dom_tree::{self, Handle, NodeData};
use std::fmt::Write;

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is printed exactly as parsed.
const PREFORMATTED_ELEMENTS: &[&str] = &["pre", "textarea"];

/// Elements whose text is not HTML-escaped.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Prints the doctype (if any) and the whole tree.
pub fn print_document(document: &dom_tree::Document) -> String {
    let mut out = String::new();
    if let Some(doctype) = &*document.doctype.borrow() {
        let _ = writeln!(out, "<!DOCTYPE {}>", doctype.name);
    }
    print_children(&document.root, 0, false, &mut out);
    out
}

fn print_children(node: &Handle, depth: usize, raw_text: bool, out: &mut String) {
    for child in &node.borrow().children {
        print_node(child, depth, raw_text, out);
    }
}

fn print_node(node: &Handle, depth: usize, raw_text: bool, out: &mut String) {
    let node_ref = node.borrow();
    let indentation = " ".repeat(depth);
    match &node_ref.data {
        NodeData::DocumentRoot => print_children(node, depth, raw_text, out),
        NodeData::Text(text) => {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                let text = if raw_text { trimmed.to_string() } else { escape_text(trimmed) };
                let _ = writeln!(out, "{}{}", indentation, text);
            }
        }
        NodeData::Comment(text) => {
            let _ = writeln!(out, "{}<!--{}-->", indentation, text);
        }
        NodeData::Element(elem) => {
            let tag = elem.tag.as_str();
            let _ = write!(out, "{}<{}", indentation, tag);
            for (key, value) in &elem.attributes {
                let _ = write!(out, " {}=\"{}\"", key, escape_attribute(value));
            }

            if VOID_ELEMENTS.contains(&tag) {
                out.push_str("/>\n");
            } else if PREFORMATTED_ELEMENTS.contains(&tag) {
                out.push('>');
                collect_text(node, out);
                let _ = writeln!(out, "</{}>", tag);
            } else {
                out.push_str(">\n");
                let raw = RAW_TEXT_ELEMENTS.contains(&tag);
                for child in &node_ref.children {
                    print_node(child, depth + 1, raw, out);
                }
                let _ = writeln!(out, "{}</{}>", indentation, tag);
            }
        }
    }
}

/// Writes all descendant text of `node` escaped and untouched otherwise.
fn collect_text(node: &Handle, out: &mut String) {
    for child in &node.borrow().children {
        match &child.borrow().data {
            NodeData::Text(text) => out.push_str(&escape_text(text)),
            NodeData::Element(_) => collect_text(child, out),
            NodeData::Comment(_) | NodeData::DocumentRoot => {}
        }
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

/// Re-indents printer output: the leading whitespace of every line is
/// repeated `indent_width` times.
#[derive(Debug, Clone, Copy)]
pub struct IndentedPrinter {
    indent_width: usize,
}

impl Default for IndentedPrinter {
    fn default() -> Self {
        IndentedPrinter { indent_width: 4 }
    }
}

impl IndentedPrinter {
    pub fn new(indent_width: usize) -> Self {
        IndentedPrinter { indent_width }
    }

    pub fn indent_width(&self) -> usize {
        self.indent_width
    }

    pub fn reindent(&self, printed: &str) -> String {
        let mut out = String::with_capacity(printed.len() * 2);
        for line in printed.split_inclusive('\n') {
            let content = line.trim_start_matches(|c: char| c.is_whitespace() && c != '\n');
            let leading = &line[..line.len() - content.len()];
            out.push_str(&leading.repeat(self.indent_width));
            out.push_str(content);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::html::create_dom_tree;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_print_one_node_per_line() {
        let document = create_dom_tree("<!DOCTYPE html><p class=\"a\">Hi <br>there</p>");
        assert_eq!(
            print_document(&document),
            "<!DOCTYPE html>\n<html>\n <head>\n </head>\n <body>\n  <p class=\"a\">\n   Hi\n   <br/>\n   there\n  </p>\n </body>\n</html>\n"
        );
    }

    #[test]
    fn test_print_escapes_text_but_not_scripts() {
        let document = create_dom_tree("<body><p>a &lt; b</p><script>if (a < b) {}</script></body>");
        let printed = print_document(&document);
        assert!(printed.contains("   a &lt; b\n"));
        assert!(printed.contains("   if (a < b) {}\n"));
    }

    #[test]
    fn test_print_keeps_preformatted_text() {
        let document = create_dom_tree("<pre>  x\n    y</pre>");
        assert!(print_document(&document).contains("  <pre>  x\n    y</pre>\n"));
    }

    #[test]
    fn test_reindent_multiplies_leading_whitespace() {
        let printer = IndentedPrinter::new(3);
        assert_eq!(printer.reindent("<a>\n <b>\n  c\n </b>\n</a>\n"), "<a>\n   <b>\n      c\n   </b>\n</a>\n");
        assert_eq!(IndentedPrinter::default().indent_width(), 4);
        assert_eq!(IndentedPrinter::new(1).reindent(" x\n"), " x\n");
    }
}
