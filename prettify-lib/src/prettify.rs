use crate::config::PrettifyConfig;
use crate::parser::html::create_dom_tree;
use crate::printer::{print_document, IndentedPrinter};
use crate::style::normalize::{
    add_encoding, condense_semicolons, condense_zero_units, justify_right, normalize_whitespace,
    remove_empty_rules, wrap_css_lines,
};
use crate::style::sorter::sort_properties;

/// Prettifies a stylesheet.
///
/// Sorts the declarations of every rule, then runs the text passes in a fixed
/// order. Never fails: text that does not look like CSS passes through the
/// sorter untouched and only gets whitespace treatment. Running it on its own
/// output changes nothing.
pub fn prettify(css: &str, config: &PrettifyConfig) -> String {
    log::info!("Prettify CSS / SCSS...");
    let css = if config.remove_empty_rules {
        remove_empty_rules(css)
    } else {
        css.to_string()
    };
    let css = sort_properties(&css, config);
    // Sorting drops blank declaration lines, which can leave more rules empty.
    let css = if config.remove_empty_rules {
        remove_empty_rules(&css)
    } else {
        css
    };
    let css = condense_zero_units(&css);
    let css = wrap_css_lines(&css, config.line_width);
    let css = condense_semicolons(&css);
    let css = normalize_whitespace(&css);
    let css = if config.justify {
        justify_right(&css)
    } else {
        css
    };
    let css = add_encoding(&css);
    log::info!("Finished prettify CSS / SCSS");
    css
}

/// Prettifies an HTML document, one node per line, indented by `indent_width`
/// spaces per nesting level.
pub fn html_prettify(html: &str, indent_width: usize) -> String {
    log::info!("Prettify HTML...");
    let document = create_dom_tree(html);
    let printed = IndentedPrinter::new(indent_width).reindent(&print_document(&document));
    let mut pretty = printed.replace('\t', "    ");
    pretty.truncate(pretty.trim_end_matches('\n').len());
    pretty.push_str("\n\n");
    log::info!("Finished prettify HTML");
    pretty
}
