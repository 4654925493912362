use log::warn;
use std::{
    collections::VecDeque,
    fs,
    path::{Path, PathBuf},
};

pub const KGG_EXTENSION: &str = "kgg";

/// Expand inputs containing glob patterns. Other inputs are kept as they are.
pub fn expand_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut expanded = Vec::new();

    for input in inputs {
        let Some(pattern) = input.to_str().filter(|x| x.contains(['*', '?', '['])) else {
            expanded.push(input.to_owned());
            continue;
        };

        match glob::glob(pattern) {
            Ok(paths) => {
                let before = expanded.len();

                for path in paths {
                    match path {
                        Ok(path) => expanded.push(path),
                        Err(e) => warn!("cannot read {}: {}", e.path().display(), e.error()),
                    }
                }

                if expanded.len() == before {
                    warn!("no files match {}", pattern);
                }
            }
            Err(_) => expanded.push(input.to_owned()),
        }
    }

    expanded
}

pub fn is_kgg(path: &Path) -> bool {
    path.extension()
        .and_then(|x| x.to_str())
        .is_some_and(|x| x.eq_ignore_ascii_case(KGG_EXTENSION))
}

/// Visit every file below `input`, breadth first.
///
/// Files without the `.kgg` extension are skipped unless `scan_all` is set.
pub fn walk<F: FnMut(PathBuf)>(input: &Path, scan_all: bool, mut visit: F) {
    let mut queue = VecDeque::new();
    queue.push_back(std::path::absolute(input).unwrap_or_else(|_| input.to_owned()));

    while let Some(path) = queue.pop_front() {
        if path.is_file() {
            if scan_all || is_kgg(&path) {
                visit(path);
            }
            continue;
        }

        if path.is_dir() {
            match fs::read_dir(&path) {
                Ok(entries) => {
                    let mut entries = entries
                        .filter_map(|x| x.ok().map(|x| x.path()))
                        .collect::<Vec<_>>();
                    entries.sort();
                    queue.extend(entries);
                }
                Err(e) => warn!("cannot read directory {}: {}", path.display(), e),
            }
            continue;
        }

        warn!("invalid path: {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &Path, scan_all: bool) -> Vec<String> {
        let mut found = Vec::new();
        walk(input, scan_all, |x| {
            found.push(x.file_name().unwrap().to_string_lossy().into_owned())
        });
        found
    }

    #[test]
    fn test_walk_filters_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("album")).unwrap();
        fs::write(dir.path().join("a.kgg"), b"").unwrap();
        fs::write(dir.path().join("b.KGG"), b"").unwrap();
        fs::write(dir.path().join("cover.jpg"), b"").unwrap();
        fs::write(dir.path().join("album/c.kgg"), b"").unwrap();

        assert_eq!(collect(dir.path(), false), ["a.kgg", "b.KGG", "c.kgg"]);
        assert_eq!(
            collect(dir.path(), true),
            ["a.kgg", "b.KGG", "cover.jpg", "c.kgg"]
        );
    }

    #[test]
    fn test_walk_single_file_and_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("song.kgg");
        fs::write(&file, b"").unwrap();

        assert_eq!(collect(&file, false), ["song.kgg"]);
        assert!(collect(&dir.path().join("missing"), true).is_empty());
    }

    #[test]
    fn test_expand_inputs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("x.kgg"), b"").unwrap();
        fs::write(dir.path().join("y.kgg"), b"").unwrap();

        let plain = dir.path().join("plain");
        let pattern = dir.path().join("*.kgg");
        let expanded = expand_inputs(&[plain.clone(), pattern]);

        assert_eq!(
            expanded,
            [plain, dir.path().join("x.kgg"), dir.path().join("y.kgg")]
        );
    }
}
