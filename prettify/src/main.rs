use clap::Parser;
use log::LevelFilter;
use prettify_lib::files::RunOptions;
use prettify_lib::runner;
use prettify_lib::{MatchMode, PrettifyConfig, PrettifyError};
use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};

const PRETTIFY_INTRO: &str = r#"
    CSS-HTML-Prettify: a prettifier and beautifier for the web.

    Takes a file or folder and processes every CSS, SCSS and HTML file found.
    CSS properties are sorted alphabetically to help spot duplicates; selectors are not.
"#;

#[derive(Parser)]
#[command(name = "prettify", version)]
#[command(about = "Prettify CSS, SCSS and HTML files", long_about = PRETTIFY_INTRO)]
struct Args {
    /// Full path to a local file or folder.
    fullpath: PathBuf,

    /// Prefix to prepend to output file names.
    #[arg(long)]
    prefix: Option<String>,

    /// Add a timestamp comment on all CSS/SCSS output files.
    #[arg(long)]
    timestamp: bool,

    /// Disable all logging.
    #[arg(long)]
    quiet: bool,

    /// Shell command to run after processing.
    #[arg(long)]
    after: Option<String>,

    /// Shell command to run before processing.
    #[arg(long)]
    before: Option<String>,

    /// Re-process files whenever they change.
    #[arg(long)]
    watch: bool,

    /// Milliseconds to let changes settle before re-processing in watch mode.
    #[arg(long, default_value_t = 500)]
    watch_debounce: u64,

    /// Group CSS properties, with a blank line between groups.
    #[arg(long)]
    group: bool,

    /// Right justify CSS property values.
    #[arg(long)]
    justify: bool,

    /// Only match a property by the name before its colon.
    #[arg(long)]
    strict: bool,

    /// Remove rules with an empty `{}` body.
    #[arg(long)]
    remove_empty: bool,

    /// Soft wrap width for CSS output.
    #[arg(long, default_value_t = 80)]
    line_width: usize,

    /// Spaces per nesting level in HTML output.
    #[arg(long, default_value_t = 4)]
    indent: usize,
}

impl Args {
    fn run_options(&self) -> RunOptions {
        let match_mode = if self.strict {
            MatchMode::Strict
        } else {
            MatchMode::Substring
        };
        RunOptions {
            config: PrettifyConfig::new()
                .with_group(self.group)
                .with_justify(self.justify)
                .with_line_width(self.line_width)
                .with_match_mode(match_mode)
                .with_remove_empty_rules(self.remove_empty),
            prefix: self.prefix.clone(),
            timestamp: self.timestamp,
            indent_width: self.indent,
        }
    }
}

fn init_logging(quiet: bool) {
    let level = if quiet {
        LevelFilter::Off
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run_hook(command: Option<&str>) {
    if let Some(command) = command {
        match runner::run_hook(command) {
            Ok(output) => log::info!("{}", output),
            Err(e) => log::warn!("{}", e),
        }
    }
}

fn main() {
    let start_time = Instant::now();
    // parse the args given in terminal
    let args: Args = Args::parse();
    init_logging(args.quiet);

    run_hook(args.before.as_deref());

    let options = args.run_options();
    // Taken before the run so that fresh prefixed output is not watched.
    let watched = if args.watch {
        match runner::watch_list(&args.fullpath, options.prefix.as_deref()) {
            Ok(files) => files,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
    } else {
        Vec::new()
    };

    let summary = match runner::run(&args.fullpath, &options) {
        Ok(summary) => summary,
        Err(e @ PrettifyError::NotFound { .. }) | Err(e @ PrettifyError::UnsupportedTarget { .. }) => {
            log::error!("{}", e);
            eprintln!("File or folder not found, or can't be read: {}", e);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    run_hook(args.after.as_deref());

    log::info!("{}", "-".repeat(80));
    log::info!("Number of files processed: {}", summary.processed.len());
    if !summary.failed.is_empty() {
        log::warn!("Number of files failed: {}", summary.failed.len());
    }
    log::info!("Total processing time: {:?}", start_time.elapsed());

    if args.watch {
        let debounce = Duration::from_millis(args.watch_debounce);
        if let Err(e) = runner::watch(&watched, &options, debounce, || false) {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }

    if !summary.is_success() {
        process::exit(1);
    }
}
