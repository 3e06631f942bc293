//! Runs the prettifiers over a file or a whole folder.

use crate::error::{PrettifyError, Result};
use crate::files::{collect_targets, process_file, RunOptions, SourceKind};
use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, DebouncedEventKind};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, SystemTime};

/// Outcome of a run. One failing file never stops the others.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Input files in the order they were found.
    pub processed: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, PrettifyError)>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    fn record(&mut self, path: PathBuf, outcome: Result<PathBuf>) {
        match outcome {
            Ok(output) => {
                log::debug!("Wrote {}", output.display());
                self.processed.push(path);
            }
            Err(err) => {
                log::error!("{}", err);
                self.failed.push((path, err));
            }
        }
    }
}

/// Prettifies `target`: a single stylesheet or HTML file, or every such file
/// below a folder, one file per worker thread.
pub fn run(target: &Path, options: &RunOptions) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    if target.is_file() {
        if SourceKind::from_path(target).is_none() {
            return Err(PrettifyError::UnsupportedTarget {
                path: target.to_path_buf(),
            });
        }
        summary.record(target.to_path_buf(), process_file(target, options));
        return Ok(summary);
    }
    if !target.is_dir() {
        return Err(PrettifyError::NotFound {
            path: target.to_path_buf(),
        });
    }

    log::info!("Target is a folder, processing may take some time...");
    let files = collect_targets(target)?;
    let outcomes: Vec<(PathBuf, Result<PathBuf>)> = files
        .into_par_iter()
        .map(|path| {
            let outcome = process_file(&path, options);
            (path, outcome)
        })
        .collect();
    for (path, outcome) in outcomes {
        summary.record(path, outcome);
    }
    Ok(summary)
}

/// Files a watch on `target` should follow. With a `prefix`, files already
/// carrying it are output of an earlier run and are left out.
pub fn watch_list(target: &Path, prefix: Option<&str>) -> Result<Vec<PathBuf>> {
    let files = if target.is_dir() {
        collect_targets(target)?
    } else {
        vec![target.to_path_buf()]
    };
    let Some(prefix) = prefix.filter(|prefix| !prefix.is_empty()) else {
        return Ok(files);
    };
    Ok(files
        .into_iter()
        .filter(|path| {
            !path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with(prefix))
        })
        .collect())
}

/// Prettifies each of `files` again whenever it changes on disk, until
/// `should_stop` says so. Changes are debounced over `debounce`, and
/// `should_stop` is checked at least that often.
///
/// A change only counts when the modification time differs from the last
/// one seen, so output written over its own input is not picked up again.
pub fn watch<F>(
    files: &[PathBuf],
    options: &RunOptions,
    debounce: Duration,
    mut should_stop: F,
) -> Result<()>
where
    F: FnMut() -> bool,
{
    let mut targets: HashMap<PathBuf, &Path> = HashMap::new();
    let mut folders: HashSet<PathBuf> = HashSet::new();
    for path in files {
        let canonical = path
            .canonicalize()
            .map_err(|err| PrettifyError::from_io(path, err))?;
        if let Some(folder) = canonical.parent() {
            folders.insert(folder.to_path_buf());
        }
        targets.insert(canonical, path.as_path());
    }

    let (tx, rx) = mpsc::channel::<DebounceEventResult>();
    let mut debouncer = new_debouncer(debounce, tx).map_err(|source| PrettifyError::Watch {
        path: files.first().cloned().unwrap_or_default(),
        source,
    })?;
    // Folders rather than files, so editors that save by renaming are seen too.
    for folder in &folders {
        debouncer
            .watcher()
            .watch(folder, RecursiveMode::NonRecursive)
            .map_err(|source| PrettifyError::Watch {
                path: folder.clone(),
                source,
            })?;
    }

    let mut seen: HashMap<&Path, Option<SystemTime>> = files
        .iter()
        .map(|path| (path.as_path(), modified(path)))
        .collect();
    for path in files {
        log::info!("Watching {}", path.display());
    }

    while !should_stop() {
        let events = match rx.recv_timeout(debounce) {
            Ok(Ok(events)) => events,
            Ok(Err(err)) => {
                log::warn!("File watcher error: {}", err);
                continue;
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                log::error!("File watcher disconnected");
                break;
            }
        };

        let mut changed: Vec<&Path> = events
            .iter()
            .filter(|event| event.kind == DebouncedEventKind::Any)
            .filter_map(|event| targets.get(&event.path).copied())
            .collect();
        changed.sort();
        changed.dedup();

        for path in changed {
            let current = modified(path);
            if current.is_none() || seen.get(path).copied().flatten() == current {
                continue;
            }
            log::debug!("Modification detected on {}", path.display());
            if let Err(err) = process_file(path, options) {
                log::error!("{}", err);
            }
            seen.insert(path, modified(path));
        }
    }
    Ok(())
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

/// Runs a shell command and returns its trimmed standard output.
pub fn run_hook(command: &str) -> Result<String> {
    let output = shell(command)
        .output()
        .map_err(|err| PrettifyError::Command {
            command: command.to_string(),
            reason: err.to_string(),
        })?;
    if !output.status.success() {
        return Err(PrettifyError::Command {
            command: command.to_string(),
            reason: format!(
                "{}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", command]);
    cmd
}

#[cfg(not(windows))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", command]);
    cmd
}

#[cfg(all(test, not(windows)))]
mod tests {
    use super::*;

    #[test]
    fn test_run_hook_output_and_failure() {
        assert_eq!(run_hook("echo hello").unwrap(), "hello");
        assert!(matches!(run_hook("exit 3"), Err(PrettifyError::Command { .. })));
    }
}
