use crate::commands::{FILE_FILTERS, OpenedFile, get_platform, read_selected_file};
use crate::ipc_error::IpcError;

use googletest::prelude::*;
use tempfile::TempDir;

#[tokio::test]
async fn given_cancelled_dialog_when_reading_then_none() {
    let result = read_selected_file(None).await;

    assert_that!(result, ok(none()));
}

#[tokio::test]
async fn given_text_file_when_reading_then_path_and_content_returned() {
    // Given
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("essay.md");
    std::fs::write(&file, "# Draft\n\nSome text.").unwrap();

    // When
    let opened = read_selected_file(Some(file.clone())).await.unwrap();

    // Then
    assert_that!(
        opened,
        some(eq(&OpenedFile {
            path: file.display().to_string(),
            content: "# Draft\n\nSome text.".to_string(),
        }))
    );
}

#[tokio::test]
async fn given_missing_file_when_reading_then_read_error_with_hint() {
    // Given
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("gone.txt");

    // When
    let result = read_selected_file(Some(missing.clone())).await;

    // Then
    match result {
        Err(e @ IpcError::ReadFile { .. }) => {
            assert!(e.to_string().contains("gone.txt"));
            assert!(e.recovery_hint().contains("UTF-8"));
        }
        other => panic!("expected read error, got {other:?}"),
    }
}

#[tokio::test]
async fn given_binary_file_when_reading_then_error() {
    // Given
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("image.bin");
    std::fs::write(&file, [0xff, 0xfe, 0x00, 0x9f]).unwrap();

    // When
    let result = read_selected_file(Some(file)).await;

    // Then
    assert_that!(result, err(anything()));
}

#[test]
fn given_file_filters_then_text_first_and_all_files_last() {
    let (name, extensions) = FILE_FILTERS[0];
    assert_that!(name, eq("Text Files"));
    assert_that!(extensions.to_vec(), elements_are![eq(&"txt"), eq(&"md"), eq(&"csv"), eq(&"json")]);

    let (name, extensions) = FILE_FILTERS[1];
    assert_that!(name, eq("All Files"));
    assert_that!(extensions.to_vec(), elements_are![eq(&"*")]);
}

#[test]
fn given_host_when_platform_requested_then_os_name() {
    assert_that!(get_platform(), eq(std::env::consts::OS));
}
