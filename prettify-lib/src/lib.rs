//! Prettifier for stylesheets and HTML.
//!
//! [`prettify`] sorts the declarations of every CSS rule by a fixed property
//! catalog and tidies the text around them; [`html_prettify`] re-prints an
//! HTML document one node per line. Both are pure and safe to call from many
//! threads at once. The [`files`] and [`runner`] modules add the file handling
//! used by the command line tool.

pub mod config;
pub mod dom;
pub mod error;
pub mod files;
pub mod parser;
pub mod prettify;
pub mod printer;
pub mod runner;
pub mod style;

pub use config::{MatchMode, PrettifyConfig};
pub use error::{PrettifyError, Result};
pub use prettify::{html_prettify, prettify};
