//! Tests for reconciliation and live ingestion

use super::*;
use crate::Error;
use crate::app::models::{FileStage, WriteMode};
use crate::app::services::ingestion::FileOutcome;

#[tokio::test]
async fn test_reconcile_rebuilds_from_all_files() {
    let (_temp_dir, paths) = create_test_paths();
    write_batch(&paths.download_dir, "4608.txt", &batch_content(&["B,1,5"]));
    write_batch(
        &paths.download_dir,
        "4607.txt",
        &batch_content(&["A,1,10", "A,2,20"]),
    );
    let pipeline = create_test_pipeline(&paths);

    let stats = pipeline.reconcile_startup().await.unwrap();

    assert_eq!(stats.files_discovered, 2);
    assert_eq!(stats.files_ingested, 2);
    assert_eq!(stats.groups_written, 2);
    assert_eq!(stats.stock_lines_written, 3);
    assert!(stats.is_clean());

    let content = fs::read_to_string(&paths.hht_file).unwrap();
    assert_eq!(count_documents(&content), 1);
    let groups: Vec<&str> = content.lines().filter(|l| l.starts_with("050 ")).collect();
    assert!(groups[0].starts_with("050 A "));
    assert!(groups[1].starts_with("050 B "));
    assert!(content.ends_with("999 000002000003\n"));

    assert!(!paths.download_dir.join("4607.txt").exists());
    assert!(paths.processed_dir.join("4607.txt").exists());
    assert!(paths.processed_dir.join("4608.txt").exists());
}

#[tokio::test]
async fn test_reconcile_replaces_previous_transmission() {
    let (_temp_dir, paths) = create_test_paths();
    fs::create_dir_all(paths.hht_file.parent().unwrap()).unwrap();
    fs::write(&paths.hht_file, "yesterday's transmission\n").unwrap();
    write_batch(&paths.download_dir, "4607.txt", &batch_content(&["A,1,10"]));

    create_test_pipeline(&paths).reconcile_startup().await.unwrap();

    let content = fs::read_to_string(&paths.hht_file).unwrap();
    assert!(!content.contains("yesterday"));
    assert_eq!(count_documents(&content), 1);
}

#[tokio::test]
async fn test_reconcile_with_no_files_leaves_destination_untouched() {
    let (_temp_dir, paths) = create_test_paths();
    fs::create_dir_all(paths.hht_file.parent().unwrap()).unwrap();
    fs::write(&paths.hht_file, "yesterday's transmission\n").unwrap();

    let stats = create_test_pipeline(&paths).reconcile_startup().await.unwrap();

    assert_eq!(stats.files_discovered, 0);
    assert_eq!(stats.files_ingested, 0);
    assert_eq!(
        fs::read_to_string(&paths.hht_file).unwrap(),
        "yesterday's transmission\n"
    );
}

#[tokio::test]
async fn test_reconcile_with_no_files_does_not_create_destination() {
    let (_temp_dir, paths) = create_test_paths();

    create_test_pipeline(&paths).reconcile_startup().await.unwrap();

    assert!(!paths.hht_file.exists());
}

#[tokio::test]
async fn test_reconcile_skips_failing_files() {
    let (_temp_dir, paths) = create_test_paths();
    write_batch(&paths.download_dir, "4607.txt", &batch_content(&["A,1,10"]));
    write_batch(&paths.download_dir, "4608.txt", &batch_content(&["B,1"]));
    write_batch(&paths.download_dir, "4609.txt", "C,1,1\nC,2,2\n");
    write_batch(&paths.download_dir, "4610.txt", &batch_content(&["D,4,4"]));

    let stats = create_test_pipeline(&paths).reconcile_startup().await.unwrap();

    assert_eq!(stats.files_discovered, 4);
    assert_eq!(stats.files_ingested, 2);
    assert_eq!(stats.files_failed(), 2);

    let stages: Vec<FileStage> = stats.failures.iter().map(|f| f.stage).collect();
    assert_eq!(stages, vec![FileStage::ParseFailed, FileStage::TimedOut]);

    // Failed files stay where they were
    assert!(paths.download_dir.join("4608.txt").exists());
    assert!(paths.download_dir.join("4609.txt").exists());
    assert!(!paths.processed_dir.join("4608.txt").exists());

    let content = fs::read_to_string(&paths.hht_file).unwrap();
    assert!(content.ends_with("999 000002000002\n"));
}

#[tokio::test]
async fn test_reconcile_missing_download_directory() {
    let (_temp_dir, paths) = create_test_paths();
    fs::remove_dir_all(&paths.download_dir).unwrap();

    let result = create_test_pipeline(&paths).reconcile_startup().await;

    assert!(matches!(result, Err(Error::Io { .. })));
}

#[tokio::test]
async fn test_ingest_file_appends_document() {
    let (_temp_dir, paths) = create_test_paths();
    write_batch(&paths.download_dir, "4607.txt", &batch_content(&["A,1,10"]));
    let pipeline = create_test_pipeline(&paths);
    pipeline.reconcile_startup().await.unwrap();
    let before = fs::read_to_string(&paths.hht_file).unwrap();

    let path = write_batch(
        &paths.download_dir,
        "4608.txt",
        &batch_content(&["B,1,5", "B,2,6"]),
    );
    let outcome = pipeline.ingest_file(&path).await;

    match outcome {
        FileOutcome::Ingested(summary) => {
            assert_eq!(summary.mode, WriteMode::Append);
            assert_eq!(summary.groups, 1);
            assert_eq!(summary.stock_lines, 2);
        }
        other => panic!("Expected Ingested, got {:?}", other),
    }

    let content = fs::read_to_string(&paths.hht_file).unwrap();
    assert!(content.starts_with(&before));
    assert_eq!(count_documents(&content), 2);
    assert!(content.ends_with("999 000001000002\n"));
}

#[tokio::test]
async fn test_ingest_file_archives_exactly_once() {
    let (_temp_dir, paths) = create_test_paths();
    let content = batch_content(&["A,1,10"]);
    let path = write_batch(&paths.download_dir, "4607.txt", &content);
    let pipeline = create_test_pipeline(&paths);

    assert!(pipeline.ingest_file(&path).await.is_ingested());

    assert!(!path.exists());
    assert_eq!(
        fs::read_to_string(paths.processed_dir.join("4607.txt")).unwrap(),
        content
    );

    // A duplicate notification for the same path does nothing
    let transmission = fs::read_to_string(&paths.hht_file).unwrap();
    assert!(matches!(pipeline.ingest_file(&path).await, FileOutcome::Skipped));
    assert_eq!(fs::read_to_string(&paths.hht_file).unwrap(), transmission);
}

#[tokio::test]
async fn test_ingest_missing_file_is_skipped() {
    let (_temp_dir, paths) = create_test_paths();
    let pipeline = create_test_pipeline(&paths);

    let outcome = pipeline
        .ingest_file(&paths.download_dir.join("never-existed.txt"))
        .await;

    assert!(matches!(outcome, FileOutcome::Skipped));
    assert!(!paths.hht_file.exists());
}

#[tokio::test]
async fn test_ingest_incomplete_file_times_out_untouched() {
    let (_temp_dir, paths) = create_test_paths();
    let content = "A,1,10\nA,2,20\n";
    let path = write_batch(&paths.download_dir, "4607.txt", content);

    let outcome = create_test_pipeline(&paths).ingest_file(&path).await;

    match outcome {
        FileOutcome::Failed {
            stage,
            error: Error::ReadinessTimeout { attempts, .. },
        } => {
            assert_eq!(stage, FileStage::TimedOut);
            assert_eq!(attempts, 3);
        }
        other => panic!("Expected readiness timeout, got {:?}", other),
    }

    assert_eq!(fs::read_to_string(&path).unwrap(), content);
    assert!(!paths.processed_dir.join("4607.txt").exists());
    assert!(!paths.hht_file.exists());
}

#[tokio::test]
async fn test_ingest_malformed_file_is_not_moved() {
    let (_temp_dir, paths) = create_test_paths();
    let path = write_batch(
        &paths.download_dir,
        "4607.txt",
        "A,1,10\nEND OF FILE\nNO DATE HERE\n",
    );

    let outcome = create_test_pipeline(&paths).ingest_file(&path).await;

    assert!(matches!(
        outcome,
        FileOutcome::Failed {
            stage: FileStage::ParseFailed,
            error: Error::MissingOrMalformedTrailer { .. },
        }
    ));
    assert!(path.exists());
    assert!(!paths.hht_file.exists());
}

#[tokio::test]
async fn test_ingest_non_utf8_file_is_parse_failure() {
    let (_temp_dir, paths) = create_test_paths();
    let path = paths.download_dir.join("4607.txt");
    let mut content = b"A,1,10\nB,CAF\xC9,5\nEND OF FILE\n".to_vec();
    content.extend_from_slice(SAMPLE_TRAILER.as_bytes());
    fs::write(&path, &content).unwrap();

    let outcome = create_test_pipeline(&paths).ingest_file(&path).await;

    assert!(matches!(
        outcome,
        FileOutcome::Failed {
            stage: FileStage::ParseFailed,
            error: Error::MalformedRecord { line: 2, .. },
        }
    ));
    assert!(path.exists());
    assert!(!paths.hht_file.exists());
}

#[tokio::test]
async fn test_ingest_oversized_field_stays_in_download_directory() {
    let (_temp_dir, paths) = create_test_paths();
    let content = batch_content(&["A,1,12345678901"]);
    let path = write_batch(&paths.download_dir, "4607.txt", &content);

    let outcome = create_test_pipeline(&paths).ingest_file(&path).await;

    assert!(matches!(
        outcome,
        FileOutcome::Failed {
            stage: FileStage::ParseFailed,
            error: Error::FieldWidth { width: 10, .. },
        }
    ));
    assert_eq!(fs::read_to_string(&path).unwrap(), content);
    assert!(!paths.processed_dir.join("4607.txt").exists());
    assert!(!paths.hht_file.exists());
}

#[tokio::test]
async fn test_reconcile_oversized_field_does_not_block_other_files() {
    let (_temp_dir, paths) = create_test_paths();
    write_batch(&paths.download_dir, "4607.txt", &batch_content(&["A,1,10"]));
    write_batch(
        &paths.download_dir,
        "4608.txt",
        &batch_content(&["INVENTORY-TOO-LONG,1,10"]),
    );
    write_batch(&paths.download_dir, "4609.txt", &batch_content(&["C,3,30"]));

    let stats = create_test_pipeline(&paths).reconcile_startup().await.unwrap();

    assert_eq!(stats.files_ingested, 2);
    assert_eq!(stats.files_failed(), 1);
    assert_eq!(stats.failures[0].stage, FileStage::ParseFailed);
    assert!(stats.failures[0].path.ends_with("4608.txt"));

    assert!(paths.download_dir.join("4608.txt").exists());
    assert!(!paths.processed_dir.join("4608.txt").exists());
    assert!(paths.processed_dir.join("4607.txt").exists());
    assert!(paths.processed_dir.join("4609.txt").exists());

    let content = fs::read_to_string(&paths.hht_file).unwrap();
    assert!(content.contains("050 A "));
    assert!(content.contains("050 C "));
    assert!(!content.contains("INVENTORY-TOO-LONG"));
    assert!(content.ends_with("999 000002000002\n"));
}

#[tokio::test]
async fn test_rebuild_failure_reports_archived_paths() {
    let (_temp_dir, paths) = create_test_paths();
    // A regular file where the upload directory should be
    fs::write(paths.hht_file.parent().unwrap(), "not a directory").unwrap();
    write_batch(&paths.download_dir, "4607.txt", &batch_content(&["A,1,10"]));

    let stats = create_test_pipeline(&paths).reconcile_startup().await.unwrap();

    assert_eq!(stats.files_ingested, 0);
    assert_eq!(stats.files_failed(), 1);
    assert_eq!(stats.failures[0].stage, FileStage::WriteFailed);
    assert_eq!(stats.failures[0].path, paths.processed_dir.join("4607.txt"));
    assert!(stats.failures[0].path.exists());
}

#[tokio::test]
async fn test_append_failure_leaves_batch_archived() {
    let (_temp_dir, paths) = create_test_paths();
    fs::write(paths.hht_file.parent().unwrap(), "not a directory").unwrap();
    let path = write_batch(&paths.download_dir, "4607.txt", &batch_content(&["A,1,10"]));

    let outcome = create_test_pipeline(&paths).ingest_file(&path).await;

    match outcome {
        FileOutcome::Failed {
            stage,
            error: Error::Write { path: reported, .. },
        } => {
            assert_eq!(stage, FileStage::WriteFailed);
            assert_eq!(reported, paths.hht_file);
        }
        other => panic!("Expected write failure, got {:?}", other),
    }
    assert!(paths.processed_dir.join("4607.txt").exists());
}

#[tokio::test]
async fn test_concurrent_ingestion_writes_whole_documents() {
    let (_temp_dir, paths) = create_test_paths();
    let pipeline = create_test_pipeline(&paths);
    let first = write_batch(&paths.download_dir, "4607.txt", &batch_content(&["A,1,10"]));
    let second = write_batch(&paths.download_dir, "4608.txt", &batch_content(&["B,1,5"]));

    let (a, b) = tokio::join!(pipeline.ingest_file(&first), pipeline.ingest_file(&second));

    assert!(a.is_ingested());
    assert!(b.is_ingested());

    let content = fs::read_to_string(&paths.hht_file).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 10);
    assert!(lines[0].starts_with("001 "));
    assert_eq!(lines[4], "999 000001000001");
    assert!(lines[5].starts_with("001 "));
    assert_eq!(lines[9], "999 000001000001");
}
