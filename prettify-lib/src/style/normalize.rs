//! Whole-text passes run after the declarations are sorted.
//!
//! Each pass is a pure `&str -> String` function and every pass is idempotent
//! on its own output.

/// Units dropped after a bare zero.
const ZERO_UNITS: [&str; 9] = ["px", "em", "%", "in", "cm", "mm", "pc", "pt", "ex"];

/// Encoding declaration prepended when the sheet has none.
pub const CHARSET_DECLARATION: &str = "@charset utf-8;\n\n";

/// Column width of a tab when wrapping; matches the tab expansion below.
const TAB_WIDTH: usize = 4;

/// Replaces `0px`, `0em`, `0%` ... with `0` when the zero starts the text or
/// follows whitespace or a colon. Stacked units such as `0pxpx` go at once.
pub fn condense_zero_units(css: &str) -> String {
    log::debug!("Condensing zero units");
    let mut condensed = String::with_capacity(css.len());
    let mut rest = condense_leading_zero(css, &mut condensed);
    while let Some(ch) = rest.chars().next() {
        condensed.push(ch);
        rest = &rest[ch.len_utf8()..];
        if ch.is_whitespace() || ch == ':' {
            rest = condense_leading_zero(rest, &mut condensed);
        }
    }
    condensed
}

/// Pushes a bare `0` for a unit-suffixed zero at the start of `text` and
/// returns what follows it. Otherwise returns `text` untouched.
fn condense_leading_zero<'a>(text: &'a str, out: &mut String) -> &'a str {
    let Some(mut rest) = text.strip_prefix('0') else {
        return text;
    };
    if zero_unit(rest).is_none() {
        return text;
    }
    while let Some(unit) = zero_unit(rest) {
        rest = &rest[unit.len()..];
    }
    out.push('0');
    rest
}

fn zero_unit(text: &str) -> Option<&'static str> {
    ZERO_UNITS.iter().copied().find(|unit| text.starts_with(unit))
}

/// Collapses runs of `;` into one.
pub fn condense_semicolons(css: &str) -> String {
    log::debug!("Condensing repeated semicolons");
    let mut condensed = String::with_capacity(css.len());
    let mut previous = None;
    for ch in css.chars() {
        if ch == ';' && previous == Some(';') {
            continue;
        }
        condensed.push(ch);
        previous = Some(ch);
    }
    condensed
}

/// Soft wraps long lines.
///
/// A break is only ever inserted right after a `}`, once the current line has
/// at least `line_width` columns before that brace. Existing newlines reset the
/// column count. A `}` that already ends a line, or that is followed by a `0`,
/// is left alone; a zero moved to a new line would otherwise lose its unit on
/// the next run.
pub fn wrap_css_lines(css: &str, line_width: usize) -> String {
    log::debug!("Wrapping lines to ~{} columns", line_width);
    let mut wrapped = String::with_capacity(css.len() + css.len() / line_width.max(1));
    let mut column = 0;
    let mut chars = css.chars().peekable();

    while let Some(ch) = chars.next() {
        wrapped.push(ch);
        match ch {
            '\n' => column = 0,
            '\t' => column += TAB_WIDTH,
            '}' => {
                let keep_line = matches!(chars.peek(), None | Some('\n' | '\r' | '0'));
                if column >= line_width && !keep_line {
                    wrapped.push('\n');
                    column = 0;
                } else {
                    column += 1;
                }
            }
            _ => column += 1,
        }
    }
    wrapped
}

/// Tidies whitespace.
///
/// - blank lines before the first line of text are dropped
/// - trailing whitespace is removed from every line; a line-ending run of
///   `;` and whitespace becomes a single `;`
/// - runs of blank lines: 3 become 2, 5 become 4, 6 or more become a
///   horizontal rule comment padded by 4 blank lines on each side
/// - `{` at a line end gets exactly one space before it, see
///   [`space_before_open_brace`]
/// - tabs become 4 spaces
/// - the text ends with exactly two newlines
pub fn normalize_whitespace(css: &str) -> String {
    log::debug!("Normalizing whitespace");
    let mut lines: Vec<String> = Vec::new();
    let mut blank_run = 0;
    for line in css.lines() {
        let line = tidy_line_end(line);
        if line.is_empty() {
            blank_run += 1;
            continue;
        }
        if !lines.is_empty() {
            push_blank_run(&mut lines, blank_run);
        }
        blank_run = 0;
        lines.push(line);
    }
    if !lines.is_empty() {
        push_blank_run(&mut lines, blank_run);
    }

    let mut joined = String::with_capacity(css.len() + 2);
    for line in &lines {
        joined.push_str(line);
        joined.push('\n');
    }

    let spaced = space_before_open_brace(&joined);
    let mut normalized = spaced.replace('\t', "    ");
    normalized.truncate(normalized.trim_end_matches('\n').len());
    normalized.push_str("\n\n");
    normalized
}

fn horizontal_rule() -> String {
    format!("/* {} */", "-".repeat(72))
}

fn tidy_line_end(line: &str) -> String {
    let line = line.trim_end();
    if line.ends_with(';') {
        let head = line.trim_end_matches(|c: char| c == ';' || c.is_whitespace());
        format!("{};", head)
    } else {
        line.to_string()
    }
}

fn push_blank_run(lines: &mut Vec<String>, run: usize) {
    let kept = match run {
        3 => 2,
        5 => 4,
        n if n >= 6 => {
            lines.extend(std::iter::repeat(String::new()).take(4));
            lines.push(horizontal_rule());
            4
        }
        n => n,
    };
    lines.extend(std::iter::repeat(String::new()).take(kept));
}

/// Rewrites every `{\n` as ` {\n`, swallowing the whitespace in front of it.
///
/// Whitespace emitted by an earlier rewrite is never swallowed. Line breaks
/// are only swallowed when they follow a selector: after the start of the
/// text, a `;`, a brace or a comment the brace stays on its own line.
fn space_before_open_brace(css: &str) -> String {
    let mut spaced = String::with_capacity(css.len() + 16);
    let mut guard = 0;
    let mut rest = css;
    while let Some(at) = rest.find("{\n") {
        spaced.push_str(&rest[..at]);
        let head = &spaced[..guard + spaced[guard..].trim_end().len()];
        let kept = if head.is_empty() || head.ends_with([';', '{', '}']) || head.ends_with("*/") {
            guard + spaced[guard..].trim_end_matches([' ', '\t']).len()
        } else {
            head.len()
        };
        spaced.truncate(kept);
        spaced.push_str(" {\n");
        guard = spaced.len();
        rest = &rest[at + 2..];
    }
    spaced.push_str(rest);
    spaced
}

/// Aligns the values of single-colon declaration lines into one column.
///
/// A line takes part when it has exactly one `:`, ends with `;` and holds no
/// brace. The value column sits one space past the longest property name.
/// Without any such line the text comes back unchanged.
pub fn justify_right(css: &str) -> String {
    log::debug!("Right justifying property values");
    let max_indent = css
        .lines()
        .filter_map(justifiable)
        .map(|(name, _)| name.chars().count() + 1)
        .fold(1, usize::max);
    if max_indent <= 1 {
        return css.to_string();
    }

    let mut justified = String::with_capacity(css.len() + css.len() / 4);
    for line in css.lines() {
        match justifiable(line) {
            Some((name, value)) => {
                let padding = max_indent + 1 - (name.chars().count() + 1);
                justified.push_str(name);
                justified.push(':');
                justified.push_str(&" ".repeat(padding));
                justified.push_str(value);
            }
            None => justified.push_str(line),
        }
        justified.push('\n');
    }
    justified
}

/// Splits a justifiable line into its trimmed name and value.
fn justifiable(line: &str) -> Option<(&str, &str)> {
    if line.contains('{') || line.contains('}') || !line.trim().ends_with(';') {
        return None;
    }
    let (name, value) = line.split_once(':')?;
    if value.contains(':') {
        return None;
    }
    Some((name.trim_end(), value.trim_start()))
}

/// Prepends [`CHARSET_DECLARATION`] unless the text already mentions `@charset`.
/// A blank sheet becomes the declaration alone.
pub fn add_encoding(css: &str) -> String {
    log::debug!("Adding encoding declaration if needed");
    if css.contains("@charset") {
        css.to_string()
    } else if css.trim().is_empty() {
        CHARSET_DECLARATION.to_string()
    } else {
        format!("{}{}", CHARSET_DECLARATION, css)
    }
}

/// Deletes rules whose body holds nothing but whitespace, together with their
/// selector. The selector starts after the last `;`, `{` or `}` and must hold
/// more than whitespace and comments.
///
/// Repeats until nothing changes, so a rule left empty by a removal goes too.
pub fn remove_empty_rules(css: &str) -> String {
    log::debug!("Removing empty rules");
    let mut current = remove_empty_rules_once(css);
    loop {
        let next = remove_empty_rules_once(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn remove_empty_rules_once(css: &str) -> String {
    let bytes = css.as_bytes();
    let mut kept = String::with_capacity(css.len());
    let mut run_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                let close = bytes[i + 1..]
                    .iter()
                    .position(|b| !b.is_ascii_whitespace())
                    .map(|offset| i + 1 + offset)
                    .filter(|&at| bytes[at] == b'}');
                match close {
                    Some(close) if !is_blank_selector(&css[run_start..i]) => {
                        i = close + 1;
                        run_start = i;
                    }
                    _ => {
                        kept.push_str(&css[run_start..=i]);
                        i += 1;
                        run_start = i;
                    }
                }
            }
            b'}' | b';' => {
                kept.push_str(&css[run_start..=i]);
                i += 1;
                run_start = i;
            }
            _ => i += 1,
        }
    }
    kept.push_str(&css[run_start..]);
    kept
}

fn is_blank_selector(selector: &str) -> bool {
    let mut rest = selector.trim();
    while let Some(comment) = rest.strip_prefix("/*") {
        match comment.find("*/") {
            Some(end) => rest = comment[end + 2..].trim(),
            None => return false,
        }
    }
    rest.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_condense_zero_units() {
        assert_eq!(condense_zero_units("margin: 0px;"), "margin: 0;");
        assert_eq!(condense_zero_units("width:0%;"), "width:0;");
        assert_eq!(condense_zero_units("margin:0em 0pt\t0ex;"), "margin:0 0\t0;");
        assert_eq!(condense_zero_units("width:10px;"), "width:10px;");
        assert_eq!(condense_zero_units("opacity: 0.5;"), "opacity: 0.5;");
        assert_eq!(condense_zero_units("left:-0px;"), "left:-0px;");
    }

    #[test]
    fn test_condense_zero_units_idempotent() {
        let once = condense_zero_units("a { margin: 0px 0em 0mm 0cm; top:0in; }");
        assert_eq!(once, "a { margin: 0 0 0 0; top:0; }");
        assert_eq!(condense_zero_units(&once), once);
    }

    #[test]
    fn test_condense_zero_units_at_start_and_stacked() {
        assert_eq!(condense_zero_units("0px a"), "0 a");
        assert_eq!(condense_zero_units("a:0pxpx 0emin;"), "a:0 0;");
        assert_eq!(condense_zero_units("a 00px"), "a 00px");
        assert_eq!(condense_zero_units("0"), "0");
    }

    #[test]
    fn test_condense_semicolons() {
        assert_eq!(condense_semicolons("color:red;;;;"), "color:red;");
        assert_eq!(condense_semicolons("a;b;;c"), "a;b;c");
    }

    #[test]
    fn test_wrap_only_after_closing_brace() {
        let css = "a{x:1}b{x:2}c{x:3}";
        assert_eq!(wrap_css_lines(css, 4), "a{x:1}\nb{x:2}\nc{x:3}");
        assert_eq!(wrap_css_lines(css, 80), css);
        assert_eq!(wrap_css_lines("aaaaaaaaaa", 2), "aaaaaaaaaa");
    }

    #[test]
    fn test_wrap_leaves_existing_line_breaks() {
        let css = "a{x:1}\nb{x:2}\n";
        assert_eq!(wrap_css_lines(css, 2), css);
        let once = wrap_css_lines("a{x:1}b{x:2}c{x:3}", 4);
        assert_eq!(wrap_css_lines(&once, 4), once);
    }

    #[test]
    fn test_wrap_never_breaks_before_zero() {
        assert_eq!(wrap_css_lines("a{x:1}0px b{x:1}c", 4), "a{x:1}0px b{x:1}\nc");
    }

    #[test]
    fn test_normalize_whitespace_basics() {
        let css = "a{  \n\tcolor : red ;\n}   ";
        assert_eq!(normalize_whitespace(css), "a {\n    color : red;\n}\n\n");
    }

    #[test]
    fn test_normalize_collapses_space_before_brace() {
        assert_eq!(normalize_whitespace("a   {\nx:1;\n}"), "a {\nx:1;\n}\n\n");
        assert_eq!(normalize_whitespace("a\n\n{\nx:1;\n}"), "a {\nx:1;\n}\n\n");
        assert_eq!(normalize_whitespace("a {x:1;}"), "a {x:1;}\n\n");
    }

    #[test]
    fn test_normalize_keeps_brace_after_statement_on_its_own_line() {
        assert_eq!(normalize_whitespace("{\n}\n"), " {\n}\n\n");
        assert_eq!(
            normalize_whitespace("@charset utf-8;\n\n {\n}\n"),
            "@charset utf-8;\n\n {\n}\n\n"
        );
        assert_eq!(normalize_whitespace("a {\n}\n{\nx:1;\n}"), "a {\n}\n {\nx:1;\n}\n\n");
        assert_eq!(normalize_whitespace("/* c */\n{\n}"), "/* c */\n {\n}\n\n");
    }

    #[test]
    fn test_normalize_drops_leading_blank_lines() {
        assert_eq!(normalize_whitespace("\n\n\na {\n}\n"), "a {\n}\n\n");
        assert_eq!(normalize_whitespace("\n\n\n\n\n\n\n"), "\n\n");
    }

    #[test]
    fn test_normalize_collapses_line_end_semicolons() {
        assert_eq!(normalize_whitespace("color: red; ;\n"), "color: red;\n\n");
        assert_eq!(normalize_whitespace("top: 0 ;\t; \n"), "top: 0;\n\n");
    }

    #[test]
    fn test_normalize_blank_line_runs() {
        let with_blanks = |n: usize| format!("a\n{}b", "\n".repeat(n));
        assert_eq!(normalize_whitespace(&with_blanks(2)), "a\n\n\nb\n\n");
        assert_eq!(normalize_whitespace(&with_blanks(3)), "a\n\n\nb\n\n");
        assert_eq!(normalize_whitespace(&with_blanks(4)), "a\n\n\n\n\nb\n\n");
        assert_eq!(normalize_whitespace(&with_blanks(5)), "a\n\n\n\n\nb\n\n");
        let rule = format!("a\n\n\n\n\n{}\n\n\n\n\nb\n\n", horizontal_rule());
        assert_eq!(normalize_whitespace(&with_blanks(6)), rule);
        assert_eq!(normalize_whitespace(&with_blanks(9)), rule);
        assert_eq!(normalize_whitespace(&rule), rule);
    }

    #[test]
    fn test_normalize_trailing_newlines() {
        assert_eq!(normalize_whitespace("a\n\n\n\n"), "a\n\n");
        assert_eq!(normalize_whitespace(""), "\n\n");
    }

    #[test]
    fn test_justify_right_aligns_values() {
        let css = "a {\n  color: red;\n  margin-left:0;\n}\n\n";
        assert_eq!(
            justify_right(css),
            "a {\n  color:       red;\n  margin-left: 0;\n}\n\n"
        );
        assert_eq!(justify_right(&justify_right(css)), justify_right(css));
    }

    #[test]
    fn test_justify_right_skips_lines_with_several_colons() {
        let css = "a {\n  background: url(http://x);\n  top:0;\n}\n";
        assert_eq!(justify_right(css), "a {\n  background: url(http://x);\n  top: 0;\n}\n");
    }

    #[test]
    fn test_justify_right_noop_without_declarations() {
        let css = "a {}\nb { color: red; }\n";
        assert_eq!(justify_right(css), css);
        assert_eq!(justify_right(":x;\n"), ":x;\n");
    }

    #[test]
    fn test_add_encoding_once() {
        let once = add_encoding("a{}");
        assert_eq!(once, "@charset utf-8;\n\na{}");
        assert_eq!(add_encoding(&once), once);
        assert_eq!(add_encoding("\n\n"), CHARSET_DECLARATION);
    }

    #[test]
    fn test_remove_empty_rules() {
        assert_eq!(remove_empty_rules("a{}b{color:red}"), "b{color:red}");
        assert_eq!(remove_empty_rules("a {\n }"), "");
        assert_eq!(remove_empty_rules("@media x{ a{}}"), "");
        assert_eq!(remove_empty_rules("{}"), "{}");
    }

    #[test]
    fn test_remove_empty_rules_keeps_statements_before_selector() {
        assert_eq!(
            remove_empty_rules("a{color:red}\n@import x;\nb{\n}"),
            "a{color:red}\n@import x;"
        );
        assert_eq!(remove_empty_rules("@charset utf-8;\n\n{}"), "@charset utf-8;\n\n{}");
        assert_eq!(remove_empty_rules("/* rule */\n{}"), "/* rule */\n{}");
    }
}
