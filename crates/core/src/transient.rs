//! Transient file name rule
//!
//! Editor lock/swap files (`~$report.docx`), hidden files (`.DS_Store`,
//! `.~lock.x#`) and dunder bookkeeping files (`__cache__`) are never mirrored.
//! Only the base name is checked and only files are filtered; directories are
//! always mirrored.

use std::path::Path;

const TRANSIENT_PREFIXES: [&str; 3] = ["~", ".", "__"];

/// True if the file's base name marks it as transient
pub fn is_transient(path: &Path) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy();
    TRANSIENT_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_names() {
        assert!(is_transient(Path::new("/root/~lock.tmp")));
        assert!(is_transient(Path::new("/root/a/b/.hidden")));
        assert!(is_transient(Path::new("/root/deep/__cache__")));
        assert!(is_transient(Path::new("~$report.docx")));
        assert!(is_transient(Path::new(".DS_Store")));
    }

    #[test]
    fn test_regular_names() {
        assert!(!is_transient(Path::new("/root/report.pdf")));
        assert!(!is_transient(Path::new("/root/.config/settings.json")));
        assert!(!is_transient(Path::new("notes~")));
        assert!(!is_transient(Path::new("_single_underscore.txt")));
        assert!(!is_transient(Path::new("/")));
    }
}
