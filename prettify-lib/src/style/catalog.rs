//! The property catalog: every known CSS property name with its rank and group.
//!
//! Properties are listed alphabetically. Blank lines fence the list into groups,
//! which only matter when grouping is enabled.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Priority given to declarations whose property is not in the catalog.
pub const UNKNOWN_PRIORITY: usize = 9999;

/// Built-in property list. A blank line starts a new group.
pub const CSS_PROPERTIES: &str = r#"


alignment-adjust alignment-baseline animation animation-delay
animation-direction animation-duration animation-iteration-count
animation-name animation-play-state animation-timing-function appearance
azimuth

backface-visibility background background-attachment background-clip
background-color background-image background-origin background-position
background-repeat background-size baseline-shift bikeshedding bookmark-label
bookmark-level bookmark-state bookmark-target border border-bottom
border-bottom-color border-bottom-left-radius border-bottom-right-radius
border-bottom-style border-bottom-width border-collapse border-color
border-image border-image-outset border-image-repeat border-image-slice
border-image-source border-image-width border-left border-left-color
border-left-style border-left-width border-radius border-right
border-right-color border-right-style border-right-width border-spacing
border-style border-top border-top-color border-top-left-radius
border-top-right-radius border-top-style border-top-width border-width bottom
box-decoration-break box-shadow box-sizing

caption-side clear clip color column-count column-fill column-gap column-rule
column-rule-color column-rule-style column-rule-width column-span column-width
columns content counter-increment counter-reset cue cue-after cue-before
cursor

direction display drop-initial-after-adjust drop-initial-after-align
drop-initial-before-adjust drop-initial-before-align drop-initial-size
drop-initial-value

elevation empty-cells

fit fit-position float font font-family font-size font-size-adjust
font-stretch font-style font-variant font-weight

grid-columns grid-rows

hanging-punctuation height hyphenate-character hyphenate-resource hyphens

icon image-orientation image-resolution inline-box-align

left letter-spacing line-height line-stacking line-stacking-ruby
line-stacking-shift line-stacking-strategy linear-gradient list-style
list-style-image list-style-position list-style-type

margin margin-bottom margin-left margin-right margin-top marquee-direction
marquee-loop marquee-speed marquee-style max-height max-width min-height
min-width

nav-index

opacity orphans outline outline-color outline-offset outline-style
outline-width overflow overflow-style overflow-x overflow-y

padding padding-bottom padding-left padding-right padding-top page
page-break-after page-break-before page-break-inside pause pause-after
pause-before perspective perspective-origin pitch pitch-range play-during
position presentation-level

quotes

resize rest rest-after rest-before richness right rotation rotation-point
ruby-align ruby-overhang ruby-position ruby-span

size speak speak-header speak-numeral speak-punctuation speech-rate src
stress string-set

table-layout target target-name target-new target-position text-align
text-align-last text-decoration text-emphasis text-indent text-justify
text-outline text-shadow text-transform text-wrap top transform
transform-origin transition transition-delay transition-duration
transition-property transition-timing-function

unicode-bidi unicode-range

vertical-align visibility voice-balance voice-duration voice-family
voice-pitch voice-range voice-rate voice-stress voice-volume volume

white-space widows width word-break word-spacing word-wrap

z-index

"#;

/// One known property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry<'a> {
    pub name: &'a str,
    pub rank: usize,
    pub group: usize,
}

/// Compiled catalog: parallel `names`/`groups` vectors plus a name index.
#[derive(Debug, Clone, Default)]
pub struct PropertyCatalog {
    names: Vec<String>,
    groups: Vec<usize>,
    ranks: HashMap<String, usize>,
}

static UNGROUPED: OnceLock<PropertyCatalog> = OnceLock::new();
static GROUPED: OnceLock<PropertyCatalog> = OnceLock::new();

impl PropertyCatalog {
    /// Compiles a whitespace separated property list.
    ///
    /// Tokens starting with `#` are comments. With `grouped` set, every empty
    /// token (a blank line) bumps the group counter for the tokens after it;
    /// otherwise empty tokens are dropped and everything lands in group 0.
    pub fn compile(catalog_text: &str, grouped: bool) -> Self {
        let lowered = catalog_text.trim().to_lowercase();
        let tokens = lowered
            .lines()
            .flat_map(|line| line.split(' '))
            .filter(|token| !token.starts_with('#'));

        let mut catalog = PropertyCatalog::default();
        let mut group_id = 0;
        for token in tokens {
            if token.trim().is_empty() {
                if grouped {
                    group_id += 1;
                }
                continue;
            }
            let rank = catalog.names.len();
            catalog.ranks.entry(token.to_string()).or_insert(rank);
            catalog.names.push(token.to_string());
            catalog.groups.push(if grouped { group_id } else { 0 });
        }
        catalog
    }

    /// The built-in catalog, compiled once per process and shared afterwards.
    pub fn builtin(grouped: bool) -> &'static PropertyCatalog {
        let cell = if grouped { &GROUPED } else { &UNGROUPED };
        cell.get_or_init(|| {
            log::debug!("Compiling CSS property catalog (grouped: {})", grouped);
            Self::compile(CSS_PROPERTIES, grouped)
        })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn groups(&self) -> &[usize] {
        &self.groups
    }

    /// Looks a property up by its exact name.
    pub fn get(&self, name: &str) -> Option<CatalogEntry<'_>> {
        let rank = *self.ranks.get(name)?;
        Some(self.entry(rank))
    }

    /// Entries in rank order.
    pub fn entries(&self) -> impl Iterator<Item = CatalogEntry<'_>> + '_ {
        (0..self.names.len()).map(move |rank| self.entry(rank))
    }

    fn entry(&self, rank: usize) -> CatalogEntry<'_> {
        CatalogEntry {
            name: &self.names[rank],
            rank,
            group: self.groups[rank],
        }
    }
}
