/// How a declaration line is matched against catalog property names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// The first catalog name whose `name:` appears anywhere in the line.
    /// `-webkit-box-shadow:` therefore ranks as `box-shadow`.
    #[default]
    Substring,
    /// Only the text before the first colon, trimmed, counts as the name.
    Strict,
}

/// Options for [`crate::prettify::prettify`].
///
/// Every stage reads what it needs from this value; there is no global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrettifyConfig {
    /// Use the grouped catalog and put a blank line between property groups.
    pub group: bool,
    /// Align declaration values into one column.
    pub justify: bool,
    /// Soft wrap width; lines only ever break after a `}`.
    pub line_width: usize,
    pub match_mode: MatchMode,
    /// Drop rules with an empty `{}` body before sorting.
    pub remove_empty_rules: bool,
}

impl Default for PrettifyConfig {
    fn default() -> Self {
        PrettifyConfig {
            group: false,
            justify: false,
            line_width: 80,
            match_mode: MatchMode::Substring,
            remove_empty_rules: false,
        }
    }
}

impl PrettifyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, group: bool) -> Self {
        self.group = group;
        self
    }

    pub fn with_justify(mut self, justify: bool) -> Self {
        self.justify = justify;
        self
    }

    pub fn with_line_width(mut self, line_width: usize) -> Self {
        self.line_width = line_width;
        self
    }

    pub fn with_match_mode(mut self, match_mode: MatchMode) -> Self {
        self.match_mode = match_mode;
        self
    }

    pub fn with_remove_empty_rules(mut self, remove: bool) -> Self {
        self.remove_empty_rules = remove;
        self
    }
}
