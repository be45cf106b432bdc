//! Exercise identifier allocation
//!
//! Scans the projects directory for `exercise-<NN>-<topic>` entries and hands
//! out the next sequence number together with its padded form and port.

use crate::error::{Error, Result};
use camino::Utf8Path;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Prefix shared by every exercise directory
pub const EXERCISE_PREFIX: &str = "exercise-";

static SEQUENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^exercise-(\d+)").expect("sequence regex is valid"));

static TOPIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^exercise-\d+-(.+)$").expect("topic regex is valid"));

/// Identifiers derived for one new exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Allocation {
    /// Sequence number (1-based)
    pub sequence: u64,
    /// Sequence zero-padded to at least two digits
    pub padded: String,
    /// Development server port
    pub port: u64,
    /// Topic as supplied by the user
    pub topic: String,
    /// Full exercise name, `exercise-<padded>-<topic>`
    pub name: String,
    /// Manifest short name, `ex<padded>`
    pub short_name: String,
}

impl Allocation {
    /// Build an allocation for an already known sequence number
    pub fn new(sequence: u64, topic: &str, base_port: u64) -> Self {
        let padded = pad_sequence(sequence);
        Self {
            sequence,
            name: exercise_name(&padded, topic),
            short_name: format!("ex{}", padded),
            port: port_for(base_port, sequence),
            topic: topic.to_string(),
            padded,
        }
    }

    /// Manifest key of the start command
    pub fn start_script(&self) -> String {
        format!("start:{}", self.short_name)
    }

    /// Manifest key of the build command
    pub fn build_script(&self) -> String {
        format!("build:{}", self.short_name)
    }

    /// Local URL the dev server listens on
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }
}

/// Zero-pad a sequence number to a minimum width of two
pub fn pad_sequence(sequence: u64) -> String {
    format!("{:02}", sequence)
}

/// Port for a sequence number; no range check is applied
pub fn port_for(base_port: u64, sequence: u64) -> u64 {
    base_port.saturating_add(sequence)
}

/// Full exercise name from padded sequence and topic
pub fn exercise_name(padded: &str, topic: &str) -> String {
    format!("{}{}-{}", EXERCISE_PREFIX, padded, topic)
}

/// Sequence number encoded in an entry name
///
/// `None` when the name lacks the exercise prefix. Prefixed names without a
/// parsable number count as zero.
pub fn parse_sequence(name: &str) -> Option<u64> {
    if !name.starts_with(EXERCISE_PREFIX) {
        return None;
    }

    let sequence = match SEQUENCE_RE.captures(name) {
        Some(caps) => match caps[1].parse::<u64>() {
            Ok(n) => n,
            Err(e) => {
                warn!("Ignoring sequence of {}: {}", name, e);
                0
            }
        },
        None => {
            debug!("{} has no sequence number, counting it as 0", name);
            0
        }
    };

    Some(sequence)
}

/// Collect the entry names of `projects_dir`, or nothing if it does not exist
fn entry_names(projects_dir: &Utf8Path) -> Result<Vec<String>> {
    if !projects_dir.exists() {
        debug!("Projects directory {} does not exist", projects_dir);
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(projects_dir)? {
        let entry = entry?;
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => debug!("Skipping non UTF-8 entry {:?}", raw),
        }
    }
    Ok(names)
}

/// Sequence numbers of all exercise entries in `projects_dir`
pub fn scan_sequences(projects_dir: &Utf8Path) -> Result<Vec<u64>> {
    let sequences = entry_names(projects_dir)?
        .iter()
        .filter_map(|name| parse_sequence(name))
        .collect::<Vec<_>>();

    debug!(
        "Found {} exercise entries in {}",
        sequences.len(),
        projects_dir
    );
    Ok(sequences)
}

/// Next unused sequence number: highest existing plus one, or 1
pub fn next_sequence(projects_dir: &Utf8Path) -> Result<u64> {
    let max = scan_sequences(projects_dir)?.into_iter().max();
    Ok(max.map_or(1, |n| n.saturating_add(1)))
}

/// Existing exercises whose topic equals `topic`
pub fn existing_topics(projects_dir: &Utf8Path, topic: &str) -> Result<Vec<String>> {
    let mut matches = entry_names(projects_dir)?
        .into_iter()
        .filter(|name| {
            TOPIC_RE
                .captures(name)
                .is_some_and(|caps| &caps[1] == topic)
        })
        .collect::<Vec<_>>();
    matches.sort();
    Ok(matches)
}

/// Allocate identifiers for a new exercise on `topic`
pub fn allocate(projects_dir: &Utf8Path, topic: &str, base_port: u64) -> Result<Allocation> {
    if topic.is_empty() {
        return Err(Error::EmptyTopic);
    }

    let sequence = next_sequence(projects_dir)?;
    let allocation = Allocation::new(sequence, topic, base_port);
    debug!(
        "Allocated {} on port {}",
        allocation.name, allocation.port
    );
    Ok(allocation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn projects_with(entries: &[&str]) -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        for entry in entries {
            fs::create_dir_all(root.join(entry)).unwrap();
        }
        (dir, root)
    }

    #[test]
    fn test_pad_sequence() {
        assert_eq!(pad_sequence(1), "01");
        assert_eq!(pad_sequence(10), "10");
        assert_eq!(pad_sequence(100), "100");
        assert_eq!(pad_sequence(0), "00");
    }

    #[test]
    fn test_port_for() {
        assert_eq!(port_for(4200, 6), 4206);
        assert_eq!(port_for(4200, 150), 4350);
        assert_eq!(port_for(u64::MAX, 1), u64::MAX);
    }

    #[test]
    fn test_parse_sequence() {
        assert_eq!(parse_sequence("exercise-03-data-binding"), Some(3));
        assert_eq!(parse_sequence("exercise-12"), Some(12));
        assert_eq!(parse_sequence("exercise-"), Some(0));
        assert_eq!(parse_sequence("exercise-intro"), Some(0));
        assert_eq!(parse_sequence("exercise-99999999999999999999999-x"), Some(0));
        assert_eq!(parse_sequence("shared-lib"), None);
        assert_eq!(parse_sequence("Exercise-04-caps"), None);
    }

    #[test]
    fn test_next_sequence_from_existing() {
        let (_dir, root) = projects_with(&[
            "exercise-01-basics",
            "exercise-03-data-binding",
            "exercise-05-services",
        ]);

        assert_eq!(next_sequence(&root).unwrap(), 6);

        let allocation = allocate(&root, "routing", 4200).unwrap();
        assert_eq!(allocation.sequence, 6);
        assert_eq!(allocation.padded, "06");
        assert_eq!(allocation.port, 4206);
        assert_eq!(allocation.name, "exercise-06-routing");
        assert_eq!(allocation.short_name, "ex06");
    }

    #[test]
    fn test_next_sequence_missing_dir() {
        let (_dir, root) = projects_with(&[]);
        let missing = root.join("projects");

        assert_eq!(next_sequence(&missing).unwrap(), 1);
        assert_eq!(allocate(&missing, "basics", 4200).unwrap().name, "exercise-01-basics");
    }

    #[test]
    fn test_next_sequence_ignores_other_entries() {
        let (_dir, root) = projects_with(&["shared", "exercise-", "node_modules"]);
        assert_eq!(next_sequence(&root).unwrap(), 1);
    }

    #[test]
    fn test_files_count_as_entries() {
        let (_dir, root) = projects_with(&["exercise-02-forms"]);
        fs::write(root.join("exercise-09-notes.md"), "notes").unwrap();

        assert_eq!(next_sequence(&root).unwrap(), 10);
    }

    #[test]
    fn test_sequence_beyond_two_digits() {
        let (_dir, root) = projects_with(&["exercise-99-last", "exercise-100-more"]);

        let allocation = allocate(&root, "overflow", 4200).unwrap();
        assert_eq!(allocation.padded, "101");
        assert_eq!(allocation.port, 4301);
    }

    #[test]
    fn test_allocate_rejects_empty_topic() {
        let (_dir, root) = projects_with(&[]);
        assert!(matches!(allocate(&root, "", 4200), Err(Error::EmptyTopic)));
    }

    #[test]
    fn test_whitespace_topic_is_kept() {
        let (_dir, root) = projects_with(&[]);
        let allocation = allocate(&root, "  ", 4200).unwrap();
        assert_eq!(allocation.name, "exercise-01-  ");
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_projects_dir_is_io_error() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, root) = projects_with(&["projects/exercise-01-basics"]);
        let projects = root.join("projects");
        fs::set_permissions(&projects, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not apply to root
        if fs::read_dir(&projects).is_ok() {
            fs::set_permissions(&projects, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = next_sequence(&projects);
        fs::set_permissions(&projects, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_topic_passed_through_verbatim() {
        let (_dir, root) = projects_with(&[]);
        let allocation = allocate(&root, "Two Way_binding", 4200).unwrap();
        assert_eq!(allocation.name, "exercise-01-Two Way_binding");
    }

    #[test]
    fn test_existing_topics() {
        let (_dir, root) = projects_with(&[
            "exercise-01-routing",
            "exercise-02-forms",
            "exercise-04-routing",
            "exercise-05-routing-guards",
        ]);

        assert_eq!(
            existing_topics(&root, "routing").unwrap(),
            vec!["exercise-01-routing", "exercise-04-routing"]
        );
        assert!(existing_topics(&root, "pipes").unwrap().is_empty());
    }

    #[test]
    fn test_allocation_names() {
        let allocation = Allocation::new(7, "two-way-binding", 4200);
        assert_eq!(allocation.start_script(), "start:ex07");
        assert_eq!(allocation.build_script(), "build:ex07");
        assert_eq!(allocation.url(), "http://localhost:4207");
    }
}
