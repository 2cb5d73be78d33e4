//! Pair `<stem><pre_suffix>` and `<stem><post_suffix>` files into tasks.
//!
//! The key is captured from the end of the stem, so `router-10.0.0.1` keys
//! as `10.0.0.1`.
//!
//! Every pre file yields one task whose right side is the sibling post path,
//! whether or not that file exists; a missing post file then shows up as a
//! `Failed` task instead of silently disappearing. Post files without a pre
//! counterpart are reported as orphans.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use regex::Regex;

use logdiff_core::{types::ComparisonTask, PairingConfig};

use crate::error::{io_err, EngineError};

/// Result of scanning a directory for pairs.
#[derive(Debug, Default)]
pub struct Pairing {
    /// Tasks sorted by group, then key.
    pub tasks: Vec<ComparisonTask>,
    /// Post files with no matching pre file.
    pub orphans: Vec<PathBuf>,
    /// Pre and post files skipped because their key was already taken,
    /// including the post counterpart of a skipped pre file.
    pub duplicates: Vec<PathBuf>,
}

/// Walk `root` and build pending tasks.
pub fn pair_directory(root: &Path, config: &PairingConfig) -> Result<Pairing, EngineError> {
    if !root.is_dir() {
        return Err(EngineError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    let key_re = config.key_regex()?;

    let mut files = Vec::new();
    collect_files(root, config.recursive, &mut files)?;
    files.sort();

    // key -> (group, stem, pre path)
    let mut pres: BTreeMap<String, (Option<String>, String, PathBuf)> = BTreeMap::new();
    let mut posts: Vec<(KeyMatch, PathBuf)> = Vec::new();
    let mut duplicates = Vec::new();
    // (directory, key) of skipped pre files; their post files are duplicates too
    let mut skipped: HashSet<(PathBuf, String)> = HashSet::new();

    for path in files {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(found) = match_key(name, &config.pre_suffix, &key_re) {
            if pres.contains_key(&found.key) {
                tracing::warn!("duplicate key {}: skipping {}", found.key, path.display());
                skipped.insert((parent_of(&path), found.key));
                duplicates.push(path);
                continue;
            }
            let group = group_of(root, &path);
            tracing::debug!("pre file for {}: {}", found.key, path.display());
            pres.insert(found.key, (group, found.stem, path));
        } else if let Some(found) = match_key(name, &config.post_suffix, &key_re) {
            posts.push((found, path));
        }
    }

    // a skipped pre sharing its folder with the winner leaves that post alone
    for (key, (_, _, pre)) in &pres {
        skipped.remove(&(parent_of(pre), key.clone()));
    }

    // (directory, key) -> post path as found on disk; the first path-sorted
    // post file wins
    let mut post_index: HashMap<(PathBuf, String), PathBuf> = HashMap::new();
    for (found, path) in posts {
        let slot = (parent_of(&path), found.key);
        if skipped.contains(&slot) || post_index.contains_key(&slot) {
            tracing::warn!("duplicate key {}: skipping {}", slot.1, path.display());
            duplicates.push(path);
            continue;
        }
        post_index.insert(slot, path);
    }

    let mut tasks: Vec<ComparisonTask> = pres
        .into_iter()
        .map(|(key, (group, stem, pre))| {
            let post = post_index
                .remove(&(parent_of(&pre), key.clone()))
                .unwrap_or_else(|| post_path_for(&pre, &stem, &config.post_suffix));
            let task = ComparisonTask::new(key, pre, post);
            match group {
                Some(group) => task.with_group(group),
                None => task,
            }
        })
        .collect();

    let mut orphans: Vec<PathBuf> = post_index.into_values().collect();
    orphans.sort();
    for orphan in &orphans {
        tracing::warn!("post file without pre counterpart: {}", orphan.display());
    }
    duplicates.sort();
    tasks.sort_by(|a, b| (&a.group, &a.id).cmp(&(&b.group, &b.id)));

    Ok(Pairing {
        tasks,
        orphans,
        duplicates,
    })
}

/// A file name split into its stem (name minus suffix) and captured key.
#[derive(Debug, PartialEq, Eq)]
struct KeyMatch {
    stem: String,
    key: String,
}

/// Key captured from `name` if it ends with `suffix` (ASCII case-insensitive).
fn match_key(name: &str, suffix: &str, key_re: &Regex) -> Option<KeyMatch> {
    if name.len() <= suffix.len() {
        return None;
    }
    let split = name.len() - suffix.len();
    if !name.is_char_boundary(split) || !name[split..].eq_ignore_ascii_case(suffix) {
        return None;
    }
    let stem = &name[..split];
    let key = key_re.captures(stem)?.name("key")?.as_str().to_string();
    Some(KeyMatch {
        stem: stem.to_string(),
        key,
    })
}

/// Sibling post path for a pre file with the given stem.
fn post_path_for(pre: &Path, stem: &str, post_suffix: &str) -> PathBuf {
    let name = format!("{stem}{post_suffix}");
    match pre.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

fn parent_of(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

fn group_of(root: &Path, path: &Path) -> Option<String> {
    let parent = path.parent()?;
    let rel = parent.strip_prefix(root).ok()?;
    if rel.as_os_str().is_empty() {
        None
    } else {
        Some(rel.to_string_lossy().replace('\\', "/"))
    }
}

fn collect_files(dir: &Path, recursive: bool, out: &mut Vec<PathBuf>) -> Result<(), EngineError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            if recursive {
                collect_files(&path, recursive, out)?;
            }
        } else if meta.is_file() {
            out.push(path);
        }
    }
    Ok(())
}
