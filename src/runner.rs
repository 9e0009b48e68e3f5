// SPDX-License-Identifier: MIT
//
// Keystroke conformance runner.
//
// A case directory holds pairs of files:
//
//   test_case_<N>.keystrokes.txt   raw `vim -W` scriptout log
//   test_case_<N>.txt              expected buffer contents afterwards
//
// Every case starts from an empty buffer. Cases run in numeric order; the
// buffer is compared with trailing whitespace trimmed on both sides.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;
use vimline_engine::{Options, TextBuffer};
use vimline_input::scriptout;

use crate::session::Session;

const PREFIX: &str = "test_case_";
const KEYS_SUFFIX: &str = ".keystrokes.txt";

/// One keystroke file with its expected output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    pub number: u64,
    pub keys: PathBuf,
    pub expected: PathBuf,
}

/// Pass/fail totals.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
}

impl Summary {
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Find every case in `dir`, ordered by number. A keystroke file without
/// an expected file is skipped.
pub fn discover(dir: &Path) -> Result<Vec<Case>> {
    let mut cases = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("cannot read case directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(number) = name
            .strip_prefix(PREFIX)
            .and_then(|rest| rest.strip_suffix(KEYS_SUFFIX))
            .and_then(|n| n.parse::<u64>().ok())
        else {
            continue;
        };
        let expected = dir.join(format!("{PREFIX}{number}.txt"));
        if !expected.is_file() {
            debug!(case = number, "no expected output; skipped");
            continue;
        }
        cases.push(Case {
            number,
            keys: path,
            expected,
        });
    }
    cases.sort_by_key(|case| case.number);
    Ok(cases)
}

/// Run one case and return the buffer it produced.
pub fn play(case: &Case, options: &Options) -> Result<String> {
    let bytes = fs::read(&case.keys)
        .with_context(|| format!("cannot read keystrokes {}", case.keys.display()))?;
    let keys = scriptout::decode(&bytes);
    debug!(case = case.number, keys = keys.len(), "playing");
    let mut session = Session::new(TextBuffer::new(), options.clone());
    session.feed_all(keys);
    Ok(session.engine().text().to_string())
}

/// Run every case in `dir`, printing a `PASS:` / `FAIL:` line for each.
pub fn run(dir: &Path, options: &Options) -> Result<Summary> {
    let mut summary = Summary::default();
    for case in discover(dir)? {
        let expected = fs::read_to_string(&case.expected)
            .with_context(|| format!("cannot read {}", case.expected.display()))?;
        let actual = play(&case, options)?;
        let name = case
            .keys
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
        if actual.trim_end() == expected.trim_end() {
            summary.passed += 1;
            println!("PASS: {name}");
        } else {
            summary.failed += 1;
            println!("FAIL: {name}");
            println!("  expected: {:?}", expected.trim_end());
            println!("  actual:   {:?}", actual.trim_end());
        }
    }
    println!("{} passed, {} failed", summary.passed, summary.failed);
    Ok(summary)
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// A scratch directory unique to this test.
    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("vimline-runner-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    #[test]
    fn discover_orders_numerically_and_needs_expected() {
        let dir = scratch("discover");
        for n in [10, 2, 1] {
            fs::write(dir.join(format!("test_case_{n}.keystrokes.txt")), "").unwrap();
            fs::write(dir.join(format!("test_case_{n}.txt")), "").unwrap();
        }
        fs::write(dir.join("test_case_7.keystrokes.txt"), "").unwrap();
        fs::write(dir.join("notes.txt"), "").unwrap();

        let numbers: Vec<u64> = discover(&dir).unwrap().iter().map(|c| c.number).collect();
        assert_eq!(numbers, vec![1, 2, 10]);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn run_counts_passes_and_failures() {
        let dir = scratch("run");
        // "ihello<Esc>:wq<CR>" as scriptout bytes.
        fs::write(dir.join("test_case_1.keystrokes.txt"), b"ihello\x1b:wq\r").unwrap();
        fs::write(dir.join("test_case_1.txt"), "hello\n").unwrap();
        fs::write(dir.join("test_case_2.keystrokes.txt"), b"iabc\x1b").unwrap();
        fs::write(dir.join("test_case_2.txt"), "xyz").unwrap();

        let summary = run(&dir, &Options::default()).unwrap();
        assert_eq!(summary, Summary { passed: 1, failed: 1 });
        assert!(!summary.all_passed());
        fs::remove_dir_all(&dir).ok();
    }
}
