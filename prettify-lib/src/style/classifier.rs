use crate::config::MatchMode;
use crate::style::catalog::{PropertyCatalog, UNKNOWN_PRIORITY};

/// Returns `(priority, group)` for one declaration line. Smaller priority sorts
/// first; unknown properties get [`UNKNOWN_PRIORITY`] and group 0.
///
/// Strict mode only reads the name on the first physical line of `line`.
pub fn classify(line: &str, catalog: &PropertyCatalog, mode: MatchMode) -> (usize, usize) {
    let found = match mode {
        MatchMode::Substring => catalog
            .entries()
            .find(|entry| contains_property(line, entry.name)),
        MatchMode::Strict => line
            .lines()
            .next()
            .and_then(|first| first.split_once(':'))
            .and_then(|(name, _)| catalog.get(&name.trim().to_lowercase())),
    };
    match found {
        Some(entry) => (entry.rank, entry.group),
        None => (UNKNOWN_PRIORITY, 0),
    }
}

/// True when `name:` occurs somewhere in `line`, allowing spaces or tabs
/// before the colon.
fn contains_property(line: &str, name: &str) -> bool {
    let mut from = 0;
    while let Some(offset) = line[from..].find(name) {
        let at = from + offset;
        if line[at + name.len()..]
            .trim_start_matches([' ', '\t'])
            .starts_with(':')
        {
            return true;
        }
        // Catalog names are ASCII, so one byte past a match start is a char boundary.
        from = at + 1;
    }
    false
}
