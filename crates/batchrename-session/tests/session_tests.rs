use batchrename_session::{
    EntryId, RowStatus, SessionConfig, SessionController, SessionUpdate, ThumbnailState,
};
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn write_png(path: &Path, width: u32, height: u32) {
    image::RgbaImage::from_pixel(width, height, image::Rgba([200, 30, 30, 255]))
        .save(path)
        .unwrap();
}

fn folder_with_pngs(names: &[&str], width: u32, height: u32) -> TempDir {
    let temp = TempDir::new().unwrap();
    for name in names {
        write_png(&temp.path().join(name), width, height);
    }
    temp
}

fn controller(generate_thumbnails: bool) -> SessionController {
    let config = SessionConfig::builder()
        .decode_threads(2usize)
        .poll_interval(Duration::from_millis(5))
        .generate_thumbnails(generate_thumbnails)
        .build()
        .unwrap();
    SessionController::new(config).unwrap()
}

/// Poll until the session settles, collecting every update.
fn settle(controller: &mut SessionController) -> Vec<SessionUpdate> {
    let deadline = Instant::now() + Duration::from_secs(10);
    let mut updates = Vec::new();
    while !controller.is_settled() {
        assert!(Instant::now() < deadline, "session did not settle");
        updates.extend(controller.poll());
        std::thread::sleep(controller.poll_interval());
    }
    updates.extend(controller.poll());
    updates
}

#[test]
fn test_load_folder_lists_entries_in_order() {
    let temp = folder_with_pngs(&["b.png", "a.png", "c.png"], 8, 8);
    fs::write(temp.path().join("notes.txt"), "skip").unwrap();

    let mut controller = controller(false);
    controller.load_folder(temp.path()).unwrap();
    let updates = settle(&mut controller);

    let discovered: Vec<(u64, String)> = updates
        .iter()
        .filter_map(|u| match u {
            SessionUpdate::EntryDiscovered { id, current_name } => {
                Some((id.0, current_name.clone()))
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        discovered,
        vec![
            (1, "a.png".to_string()),
            (2, "b.png".to_string()),
            (3, "c.png".to_string())
        ]
    );
    assert!(matches!(
        updates.last(),
        Some(SessionUpdate::ScanFinished { discovered: 3 })
    ));

    let session = controller.session().unwrap();
    assert_eq!(session.entries().len(), 3);
    assert!(session.scan_error().is_none());
    assert!(session.progress().scan_done);
}

#[test]
fn test_thumbnails_routed_by_entry_id() {
    let temp = TempDir::new().unwrap();
    write_png(&temp.path().join("a.png"), 10, 20);
    write_png(&temp.path().join("b.png"), 30, 5);
    fs::write(temp.path().join("c.png"), "not really a png").unwrap();

    let mut controller = controller(true);
    controller.load_folder(temp.path()).unwrap();
    let updates = settle(&mut controller);

    let ready = updates
        .iter()
        .filter(|u| matches!(u, SessionUpdate::ThumbnailReady { .. }))
        .count();
    assert_eq!(ready, 3);

    let session = controller.session().unwrap();
    let dims = |id: u64| match &session.row(EntryId::new(id)).unwrap().thumbnail {
        ThumbnailState::Ready(t) => Some((t.width, t.height)),
        _ => None,
    };
    assert_eq!(dims(1), Some((10, 20)));
    assert_eq!(dims(2), Some((30, 5)));
    assert_eq!(
        session.row(EntryId::new(3)).unwrap().thumbnail,
        ThumbnailState::Unavailable
    );
    assert_eq!(session.progress().thumbnails_ready, 2);
    assert_eq!(session.progress().thumbnails_failed, 1);
}

#[test]
fn test_large_images_are_scaled_down() {
    let temp = folder_with_pngs(&["wide.png"], 140, 70);

    let mut controller = controller(true);
    controller.load_folder(temp.path()).unwrap();
    settle(&mut controller);

    let session = controller.session().unwrap();
    match &session.row(EntryId::new(1)).unwrap().thumbnail {
        ThumbnailState::Ready(t) => {
            assert_eq!(t.width, 70);
            assert!((34..=36).contains(&t.height));
            assert!(t.is_well_formed());
        }
        other => panic!("expected a preview, got {other:?}"),
    }
}

#[test]
fn test_paste_and_rename_all() {
    let temp = folder_with_pngs(&["a.png", "b.png", "c.png"], 4, 4);

    let mut controller = controller(false);
    controller.load_folder(temp.path()).unwrap();
    settle(&mut controller);

    let events = controller.paste_names("x\n\n  y  \n");
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| !e.invalid));

    let report = controller.rename_all().unwrap();
    assert_eq!((report.renamed, report.errors), (2, 0));
    assert_eq!(report.summary(), "Renamed: 2\nErrors: 0");

    assert!(temp.path().join("x.png").exists());
    assert!(temp.path().join("y.png").exists());
    assert!(temp.path().join("c.png").exists());
    assert!(!temp.path().join("a.png").exists());

    let session = controller.session().unwrap();
    assert_eq!(session.entry(EntryId::new(1)).unwrap().current_name, "x.png");
    assert_eq!(
        session.row(EntryId::new(1)).unwrap().status,
        RowStatus::Success
    );
    assert_eq!(session.row(EntryId::new(3)).unwrap().status, RowStatus::Empty);
}

#[test]
fn test_invalid_candidate_flagged_live_and_rejected() {
    let temp = folder_with_pngs(&["a.png"], 4, 4);

    let mut controller = controller(false);
    controller.load_folder(temp.path()).unwrap();
    settle(&mut controller);

    let event = controller.set_candidate(EntryId::new(1), "a:b").unwrap();
    assert!(event.invalid);
    assert_eq!(event.char_count, 3);
    assert_eq!(
        controller
            .session()
            .unwrap()
            .row(EntryId::new(1))
            .unwrap()
            .status
            .to_string(),
        "Invalid Char!"
    );

    let report = controller.rename_all().unwrap();
    assert_eq!((report.renamed, report.errors), (0, 1));
    assert!(temp.path().join("a.png").exists());
}

#[test]
fn test_existing_target_reports_file_exists() {
    let temp = folder_with_pngs(&["a.png", "target.png"], 4, 4);

    let mut controller = controller(false);
    controller.load_folder(temp.path()).unwrap();
    settle(&mut controller);

    controller.set_candidate(EntryId::new(1), "target");
    let report = controller.rename_all().unwrap();

    assert_eq!(report.errors, 1);
    assert_eq!(
        controller
            .session()
            .unwrap()
            .row(EntryId::new(1))
            .unwrap()
            .status,
        RowStatus::FileExists
    );
    assert!(temp.path().join("a.png").exists());
}

#[test]
fn test_missing_folder_is_unreadable() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("gone");

    let mut controller = controller(true);
    controller.load_folder(&missing).unwrap();
    let updates = settle(&mut controller);

    assert!(matches!(
        updates.as_slice(),
        [SessionUpdate::FolderUnreadable { .. }]
    ));
    let session = controller.session().unwrap();
    assert!(session.entries().is_empty());
    assert!(session.scan_error().is_some());
}

#[test]
fn test_edits_without_session_are_ignored() {
    let mut controller = controller(false);
    assert!(controller.session().is_none());
    assert!(!controller.is_settled());
    assert!(controller.poll().is_empty());
    assert!(controller.set_candidate(EntryId::new(1), "x").is_none());
    assert!(controller.paste_names("x").is_empty());
    assert!(controller.preview_plan().is_none());
    assert!(controller.rename_all().is_none());
}

#[test]
fn test_new_folder_discards_previous_results() {
    let names: Vec<String> = (0..40).map(|i| format!("img{i:02}.png")).collect();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    let first = folder_with_pngs(&names, 40, 20);
    let second = folder_with_pngs(&names[..5], 20, 40);

    let mut controller = controller(true);
    let old = controller.load_folder(first.path()).unwrap();
    let new = controller.load_folder(second.path()).unwrap();
    assert!(new > old);

    settle(&mut controller);
    // Give stragglers from the first load a chance to arrive
    for _ in 0..5 {
        std::thread::sleep(Duration::from_millis(20));
        controller.poll();
    }

    let session = controller.session().unwrap();
    assert_eq!(session.generation(), new);
    assert_eq!(session.folder(), second.path());
    assert_eq!(session.entries().len(), 5);

    for (entry, row) in session.rows() {
        assert!(entry.source_path.starts_with(second.path()));
        match &row.thumbnail {
            ThumbnailState::Ready(t) => assert_eq!((t.width, t.height), (20, 40)),
            other => panic!("row {} has {other:?}", entry.id),
        }
    }
}
