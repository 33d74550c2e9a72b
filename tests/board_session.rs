//! End-to-end editing sessions through the public facade
//!
//! Builds a layout on a board, saves it, reloads it into a fresh board and
//! checks that selection, labels and contents behave as the editor expects.

use streamberry::{
    page_label, snapshot_editor, Board, ConfigArchive, FormatConfig, FormatError, GridEditor,
    GridPos, IdentityCodec, MarkerPolicy, CONFIG_EXTENSION,
};
use tempfile::TempDir;

fn pos(row: usize, col: usize) -> GridPos {
    GridPos::new(row, col).unwrap()
}

#[test]
fn test_edit_save_reload() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(format!("stream.{}", CONFIG_EXTENSION));

    let mut board: Board<Vec<u8>> = Board::new();
    board.set_cell(0, pos(0, 0), Some(vec![1; 100])).unwrap();

    // Clicking the "+" tab appends a page
    let second = board.select_page(board.page_count()).unwrap();
    assert_eq!(second, 1);
    board.set_cell(second, pos(2, 4), Some(vec![2; 50])).unwrap();
    assert_eq!(board.page_labels(), vec!["Page 1".to_string(), "2".to_string()]);

    let archive = ConfigArchive::with_defaults(IdentityCodec);
    let saved = archive.save(&path, board.document()).unwrap();
    assert_eq!(saved.pages_written, 2);
    assert_eq!(saved.cells_written, 2);

    let mut reloaded: Board<Vec<u8>> = Board::new();
    let report = archive.load_into(&path, &mut reloaded).unwrap();
    assert!(report.is_clean());
    assert_eq!(reloaded.page_count(), 2);
    assert_eq!(reloaded.current_page(), 0);
    assert_eq!(reloaded.cell_at(0, pos(0, 0)), Some(&vec![1; 100]));
    assert_eq!(reloaded.cell_at(1, pos(2, 4)), Some(&vec![2; 50]));
    assert_eq!(reloaded.document(), board.document());
}

#[test]
fn test_loading_never_adds_pages() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("three.sbconf");

    let mut board: Board<Vec<u8>> = Board::new();
    board.insert_page().unwrap();
    board.insert_page().unwrap();

    let archive = ConfigArchive::with_defaults(IdentityCodec);
    archive.save(&path, board.document()).unwrap();

    let mut target: Board<Vec<u8>> = Board::new();
    archive.load_into(&path, &mut target).unwrap();
    assert_eq!(target.page_count(), 3);
    assert_eq!(
        target.page_labels(),
        (0..3).map(page_label).collect::<Vec<_>>()
    );
}

#[test]
fn test_snapshot_editor_matches_board() {
    let mut board: Board<Vec<u8>> = Board::new();
    board.set_cell(0, pos(1, 3), Some(vec![5, 5])).unwrap();
    board.insert_page().unwrap();

    let snapshot = snapshot_editor(&board).unwrap();
    assert_eq!(&snapshot, board.document());

    let archive = ConfigArchive::with_defaults(IdentityCodec);
    let (bytes, _) = archive.encode(&snapshot).unwrap();
    assert_eq!(archive.decode(&bytes).unwrap().document, snapshot);
}

#[test]
fn test_failed_load_keeps_session() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.sbconf");
    std::fs::write(&path, b"definitely not a config").unwrap();

    let mut board: Board<Vec<u8>> = Board::new();
    board.set_cell(0, pos(0, 1), Some(vec![7])).unwrap();
    board.select_page(1).unwrap();

    let archive = ConfigArchive::new(
        IdentityCodec,
        FormatConfig::default().with_marker_policy(MarkerPolicy::Strict),
    )
    .unwrap();
    let err = archive.load_into(&path, &mut board).unwrap_err();
    assert!(matches!(err, FormatError::CorruptArchive(_)));
    assert_eq!(err.user_message(), "Not a valid config file (archive is corrupt)");

    assert_eq!(board.page_count(), 2);
    assert_eq!(board.current_page(), 1);
    assert_eq!(board.cell_at(0, pos(0, 1)), Some(&vec![7]));
}
