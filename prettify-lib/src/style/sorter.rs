use crate::config::{MatchMode, PrettifyConfig};
use crate::parser::blocks::{split_blocks, split_declarations, Segment};
use crate::style::catalog::PropertyCatalog;
use crate::style::classifier::classify;

/// Blank line placed between two property groups.
pub const GROUP_SEPARATOR: &str = "\n";

/// Orders declaration lines by group, then by priority inside each group.
///
/// Both sorts are stable, so lines that tie keep their input order. Runs of
/// equal group are joined with a single [`GROUP_SEPARATOR`]; there is never a
/// separator before the first run or after the last one.
pub fn group_and_sort<'a>(
    lines: &[&'a str],
    catalog: &PropertyCatalog,
    mode: MatchMode,
) -> Vec<&'a str> {
    if lines.is_empty() {
        return Vec::new();
    }

    let mut classified: Vec<((usize, usize), &'a str)> = lines
        .iter()
        .map(|line| (classify(line, catalog, mode), *line))
        .collect();
    classified.sort_by_key(|((_, group), _)| *group);

    let mut sorted = Vec::with_capacity(classified.len() + 4);
    for run in classified.chunk_by_mut(|(a, _), (b, _)| a.1 == b.1) {
        run.sort_by_key(|((priority, _), _)| *priority);
        if !sorted.is_empty() {
            sorted.push(GROUP_SEPARATOR);
        }
        sorted.extend(run.iter().map(|(_, line)| *line));
    }
    sorted
}

/// Sorts the declarations of every rule block in `css`.
///
/// Text outside rule bodies is copied through untouched.
pub fn sort_properties(css: &str, config: &PrettifyConfig) -> String {
    log::debug!("Sorting CSS properties (grouped: {})", config.group);
    let catalog = PropertyCatalog::builtin(config.group);
    let mut sorted = String::with_capacity(css.len() + 16);

    for segment in split_blocks(css) {
        match segment {
            Segment::Block(block) => {
                sorted.push_str(block.preamble);
                let lines = split_declarations(block.body);
                let ordered = group_and_sort(&lines, catalog, config.match_mode);
                push_lines(&mut sorted, &ordered);
                sorted.push_str(block.postamble);
            }
            Segment::Rest(text) => sorted.push_str(text),
        }
    }
    sorted
}

/// Joins lines, ending every line but the last with a newline so that a
/// declaration without one is never glued to the next.
fn push_lines(out: &mut String, lines: &[&str]) {
    let last = lines.len().saturating_sub(1);
    for (index, line) in lines.iter().enumerate() {
        out.push_str(line);
        if index < last && !line.ends_with('\n') {
            out.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn catalog(grouped: bool) -> PropertyCatalog {
        PropertyCatalog::compile("color margin\n\npadding top\n\nwidth", grouped)
    }

    #[test]
    fn test_empty_input_stays_empty() {
        assert!(group_and_sort(&[], &catalog(true), MatchMode::Substring).is_empty());
    }

    #[test]
    fn test_sort_by_rank_without_groups() {
        let lines = ["width:1px;\n", "color:red;\n", "padding:0;\n", "margin:0;\n"];
        assert_eq!(
            group_and_sort(&lines, &catalog(false), MatchMode::Substring),
            vec!["color:red;\n", "margin:0;\n", "padding:0;\n", "width:1px;\n"]
        );
    }

    #[test]
    fn test_unknown_properties_keep_input_order_after_known() {
        let lines = ["zoom:1;\n", "color:red;\n", "-x-foo:2;\n", "margin:0;\n", "aaa:3;\n"];
        assert_eq!(
            group_and_sort(&lines, &catalog(false), MatchMode::Substring),
            vec!["color:red;\n", "margin:0;\n", "zoom:1;\n", "-x-foo:2;\n", "aaa:3;\n"]
        );
    }

    #[test]
    fn test_groups_are_separated_once() {
        let lines = ["width:1px;\n", "top:0;\n", "color:red;\n", "padding:0;\n"];
        assert_eq!(
            group_and_sort(&lines, &catalog(true), MatchMode::Substring),
            vec!["color:red;\n", "\n", "padding:0;\n", "top:0;\n", "\n", "width:1px;\n"]
        );
    }

    #[test]
    fn test_unknown_properties_join_group_zero() {
        let lines = ["width:1px;\n", "zoom:1;\n", "color:red;\n"];
        assert_eq!(
            group_and_sort(&lines, &catalog(true), MatchMode::Substring),
            vec!["color:red;\n", "zoom:1;\n", "\n", "width:1px;\n"]
        );
    }

    #[test]
    fn test_duplicate_properties_are_stable() {
        let lines = ["margin:1px;\n", "color:red;\n", "margin:2px;\n"];
        assert_eq!(
            group_and_sort(&lines, &catalog(false), MatchMode::Substring),
            vec!["color:red;\n", "margin:1px;\n", "margin:2px;\n"]
        );
    }

    #[test]
    fn test_sort_properties_rewrites_each_block() {
        let css = "a{\nmargin:0px;\ncolor:red;\n}\nb {\n  padding:0;\n  color:blue;\n}\n";
        assert_eq!(
            sort_properties(css, &PrettifyConfig::default()),
            "a{\ncolor:red;\nmargin:0px;\n}\nb {\n  color:blue;\n  padding:0;\n}\n"
        );
    }

    #[test]
    fn test_sort_properties_does_not_fuse_unterminated_line() {
        let css = "a{\nmargin:0;\ncolor:red}";
        assert_eq!(
            sort_properties(css, &PrettifyConfig::default()),
            "a{\ncolor:red\nmargin:0;\n}"
        );
    }

    #[test]
    fn test_sort_properties_grouped_inserts_blank_lines() {
        let css = "a {\nz-index:1;\ncolor:red;\n}";
        assert_eq!(
            sort_properties(css, &PrettifyConfig::default().with_group(true)),
            "a {\ncolor:red;\n\nz-index:1;\n}"
        );
    }
}
