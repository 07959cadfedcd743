//! Tests for the processed-file archive

use super::*;
use crate::Error;
use crate::app::services::ingestion::relocate;

#[tokio::test]
async fn test_relocate_moves_file_unmodified() {
    let (_temp_dir, paths) = create_test_paths();
    let content = batch_content(&["A,1,10"]);
    let source = write_batch(&paths.download_dir, "4607.txt", &content);

    let destination = relocate(&source, &paths.processed_dir).await.unwrap();

    assert_eq!(destination, paths.processed_dir.join("4607.txt"));
    assert!(!source.exists());
    assert_eq!(fs::read_to_string(&destination).unwrap(), content);
}

#[tokio::test]
async fn test_relocate_overwrites_collision() {
    let (_temp_dir, paths) = create_test_paths();
    write_batch(&paths.processed_dir, "4607.txt", "older batch");
    let source = write_batch(&paths.download_dir, "4607.txt", "newer batch");

    let destination = relocate(&source, &paths.processed_dir).await.unwrap();

    assert_eq!(fs::read_to_string(destination).unwrap(), "newer batch");
}

#[tokio::test]
async fn test_relocate_creates_processed_directory() {
    let (temp_dir, paths) = create_test_paths();
    let source = write_batch(&paths.download_dir, "4607.txt", "batch");
    let processed = temp_dir.path().join("ARCHIVE").join("2023");

    relocate(&source, &processed).await.unwrap();

    assert!(processed.join("4607.txt").exists());
}

#[tokio::test]
async fn test_relocate_missing_source() {
    let (_temp_dir, paths) = create_test_paths();
    let source = paths.download_dir.join("gone.txt");

    let result = relocate(&source, &paths.processed_dir).await;

    match result {
        Err(Error::Relocation { from, to, .. }) => {
            assert_eq!(from, source);
            assert_eq!(to, paths.processed_dir.join("gone.txt"));
        }
        other => panic!("Expected Relocation error, got {:?}", other),
    }
}
