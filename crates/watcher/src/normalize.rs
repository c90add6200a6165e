//! Translation of `notify` events into [`FsEvent`]
//!
//! Backends disagree on how much they report: inotify says whether a created
//! entry is a folder and pairs rename halves, FSEvents reports `Any` kinds and
//! unpaired rename paths. Whatever the backend leaves out is filled in from
//! the filesystem at translation time.

use mirror_core::{Change, FsEvent};
use notify::event::{AccessKind, AccessMode, CreateKind, ModifyKind, RenameMode};
use notify::{Event, EventKind};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Normalized events for one backend event. Paths outside `root` are dropped.
pub fn normalize(event: &Event, root: &Path) -> Vec<FsEvent> {
    let in_root = |p: &&PathBuf| p.starts_with(root);

    match &event.kind {
        EventKind::Create(CreateKind::Folder) => event
            .paths
            .iter()
            .filter(in_root)
            .map(|p| FsEvent::Directory(Change::Created { path: p.clone() }))
            .collect(),
        EventKind::Create(CreateKind::File) => event
            .paths
            .iter()
            .filter(in_root)
            .map(|p| FsEvent::File(Change::Created { path: p.clone() }))
            .collect(),
        EventKind::Create(_) => event
            .paths
            .iter()
            .filter(in_root)
            .filter_map(|p| classify(p, Change::Created { path: p.clone() }))
            .collect(),
        EventKind::Modify(ModifyKind::Name(mode)) => normalize_rename(&event.paths, *mode, root),
        EventKind::Modify(_) | EventKind::Access(AccessKind::Close(AccessMode::Write)) => event
            .paths
            .iter()
            .filter(in_root)
            .filter_map(|p| classify(p, Change::Modified { path: p.clone() }))
            .collect(),
        _ => {
            trace!(kind = ?event.kind, "Ignoring event kind");
            Vec::new()
        }
    }
}

fn normalize_rename(paths: &[PathBuf], mode: RenameMode, root: &Path) -> Vec<FsEvent> {
    match mode {
        RenameMode::Both => {
            let (Some(from), Some(to)) = (paths.first(), paths.get(1)) else {
                return Vec::new();
            };
            if !to.starts_with(root) {
                // Moved out of the tree; mirrored copy stays
                return Vec::new();
            }
            let from = from.starts_with(root).then(|| from.clone());
            classify(
                to,
                Change::Moved {
                    from,
                    to: to.clone(),
                },
            )
            .into_iter()
            .collect()
        }
        RenameMode::To | RenameMode::Any | RenameMode::Other => paths
            .iter()
            .filter(|p| p.starts_with(root))
            .filter_map(|p| {
                classify(
                    p,
                    Change::Moved {
                        from: None,
                        to: p.clone(),
                    },
                )
            })
            .collect(),
        RenameMode::From => Vec::new(),
    }
}

/// Tag `change` as a directory or file event by looking at the filesystem.
/// Returns `None` if the path is already gone.
fn classify(path: &Path, change: Change) -> Option<FsEvent> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Some(FsEvent::Directory(change)),
        Ok(_) => Some(FsEvent::File(change)),
        Err(_) => {
            trace!(path = %path.display(), "Path vanished before classification");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{DataChange, MetadataKind, RemoveKind};
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("root");
        fs::create_dir_all(root.join("dir")).unwrap();
        fs::write(root.join("file.txt"), b"data").unwrap();
        (temp_dir, root)
    }

    #[test]
    fn test_create_kinds() {
        let (_temp, root) = setup();

        let folder = Event::new(EventKind::Create(CreateKind::Folder)).add_path(root.join("dir"));
        assert_eq!(
            normalize(&folder, &root),
            vec![FsEvent::Directory(Change::Created { path: root.join("dir") })]
        );

        let file = Event::new(EventKind::Create(CreateKind::File)).add_path(root.join("file.txt"));
        assert_eq!(
            normalize(&file, &root),
            vec![FsEvent::File(Change::Created { path: root.join("file.txt") })]
        );

        let any = Event::new(EventKind::Create(CreateKind::Any)).add_path(root.join("dir"));
        assert!(matches!(
            normalize(&any, &root).as_slice(),
            [FsEvent::Directory(Change::Created { .. })]
        ));
    }

    #[test]
    fn test_modify_and_close_write_become_modified() {
        let (_temp, root) = setup();
        let path = root.join("file.txt");

        for kind in [
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            EventKind::Modify(ModifyKind::Metadata(MetadataKind::WriteTime)),
            EventKind::Access(AccessKind::Close(AccessMode::Write)),
        ] {
            let event = Event::new(kind).add_path(path.clone());
            assert_eq!(
                normalize(&event, &root),
                vec![FsEvent::File(Change::Modified { path: path.clone() })]
            );
        }
    }

    #[test]
    fn test_modify_on_vanished_path_is_dropped() {
        let (_temp, root) = setup();
        let event = Event::new(EventKind::Modify(ModifyKind::Any)).add_path(root.join("gone.txt"));
        assert!(normalize(&event, &root).is_empty());
    }

    #[test]
    fn test_remove_is_ignored() {
        let (_temp, root) = setup();
        let event = Event::new(EventKind::Remove(RemoveKind::File)).add_path(root.join("file.txt"));
        assert!(normalize(&event, &root).is_empty());
    }

    #[test]
    fn test_rename_both_becomes_move() {
        let (_temp, root) = setup();
        let event = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
            .add_path(root.join("old.txt"))
            .add_path(root.join("file.txt"));

        assert_eq!(
            normalize(&event, &root),
            vec![FsEvent::File(Change::Moved {
                from: Some(root.join("old.txt")),
                to: root.join("file.txt"),
            })]
        );
    }

    #[test]
    fn test_rename_into_tree_has_no_source() {
        let (temp, root) = setup();
        let event = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
            .add_path(temp.path().join("outside/dir"))
            .add_path(root.join("dir"));

        assert_eq!(
            normalize(&event, &root),
            vec![FsEvent::Directory(Change::Moved {
                from: None,
                to: root.join("dir"),
            })]
        );
    }

    #[test]
    fn test_rename_halves() {
        let (_temp, root) = setup();

        let from = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::From)))
            .add_path(root.join("old.txt"));
        assert!(normalize(&from, &root).is_empty());

        let to = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::To)))
            .add_path(root.join("file.txt"));
        assert_eq!(
            normalize(&to, &root),
            vec![FsEvent::File(Change::Moved {
                from: None,
                to: root.join("file.txt"),
            })]
        );

        // FSEvents style: the old half no longer exists and is dropped
        let any = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Any)))
            .add_path(root.join("old.txt"));
        assert!(normalize(&any, &root).is_empty());
    }

    #[test]
    fn test_paths_outside_root_are_dropped() {
        let (temp, root) = setup();
        let outside = temp.path().join("elsewhere.txt");
        fs::write(&outside, b"x").unwrap();

        let event = Event::new(EventKind::Create(CreateKind::File)).add_path(outside);
        assert!(normalize(&event, &root).is_empty());
    }
}
