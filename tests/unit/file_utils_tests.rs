/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::path::Path;
use qrbatch::file_utils::FileManager;
use crate::common;

/// Test that generate_output_path appends the extension to the record name
#[test]
fn test_generate_output_path_withDottedExtension_shouldAppendDirectly() {
    let path = FileManager::generate_output_path("/tmp/out", "alice", ".png");
    assert_eq!(path, Path::new("/tmp/out/alice.png"));
}

/// Test that a bare extension gets a dot
#[test]
fn test_generate_output_path_withBareExtension_shouldInsertDot() {
    let path = FileManager::generate_output_path("/tmp/out", "bob", "jpg");
    assert_eq!(path, Path::new("/tmp/out/bob.jpg"));
}

/// Test that ensure_dir creates nested directories and tolerates existing ones
#[test]
fn test_ensure_dir_withNestedDir_shouldCreateAndBeIdempotent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b").join("c");

    FileManager::ensure_dir(&nested)?;
    FileManager::ensure_dir(&nested)?;

    assert!(nested.is_dir());
    Ok(())
}

/// Test that ensure_dir fails when a file sits where the folder should be
#[test]
fn test_ensure_dir_withFileInTheWay_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let blocker = common::create_records_file(temp_dir.path(), "blocker", "x")?;

    assert!(FileManager::ensure_dir(&blocker).is_err());
    Ok(())
}

/// Test that file_size reports bytes and errors for missing files
#[test]
fn test_file_size_withExistingAndMissingFile_shouldReportCorrectly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_records_file(temp_dir.path(), "sized.txt", "12345")?;

    assert_eq!(FileManager::file_size(&file)?, 5);
    assert!(FileManager::file_size(temp_dir.path().join("missing")).is_err());
    Ok(())
}

/// Test that append_to_log_file appends timestamped lines
#[test]
fn test_append_to_log_file_withTwoWrites_shouldKeepBoth() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let log = temp_dir.path().join("logs").join("run.log");

    FileManager::append_to_log_file(&log, "first")?;
    FileManager::append_to_log_file(&log, "second")?;

    let content = FileManager::read_to_string(&log)?;
    assert_eq!(content.lines().count(), 2);
    assert!(content.contains("] first"));
    assert!(content.contains("] second"));
    Ok(())
}
