//! Integration tests for write-then-read cycles on document files.
//!
//! These tests verify that documents written with `write_document_atomic` are
//! read back unchanged by `read_document`, and that the file states a reader
//! can encounter (absent, blank, corrupt) are handled deterministically.

use chirpy_json::{ensure_file, read_document, write_document_atomic, Error};
use rstest::rstest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tempfile::TempDir;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
struct Library {
    #[serde(default)]
    books: BTreeMap<u64, Book>,
    #[serde(default)]
    loans: BTreeMap<u64, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Book {
    id: u64,
    title: String,
}

fn library_with(titles: &[&str]) -> Library {
    let books = titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            let id = i as u64 + 1;
            (
                id,
                Book {
                    id,
                    title: (*title).to_string(),
                },
            )
        })
        .collect();
    Library {
        books,
        loans: BTreeMap::new(),
    }
}

#[rstest]
#[case::empty(library_with(&[]))]
#[case::single(library_with(&["Dune"]))]
#[case::unicode(library_with(&["Hello, \u{4e16}\u{754c}! \u{1F600}"]))]
#[case::special_chars(library_with(&["Line1\nLine2\t\"Quoted\"\\"]))]
#[tokio::test]
async fn roundtrip_document(#[case] original: Library) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("library.json");

    write_document_atomic(&path, &original).await.unwrap();
    let read_back: Library = read_document(&path).await.unwrap();

    assert_eq!(original, read_back);
}

#[tokio::test]
async fn integer_keys_are_stored_as_decimal_strings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("library.json");

    write_document_atomic(&path, &library_with(&["A", "B"]))
        .await
        .unwrap();

    let raw = tokio::fs::read_to_string(&path).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["books"]["1"]["title"], "A");
    assert_eq!(value["books"]["2"]["id"], 2);
}

#[tokio::test]
async fn missing_collections_read_as_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("library.json");
    tokio::fs::write(&path, r#"{"books":{"3":{"id":3,"title":"C"}}}"#)
        .await
        .unwrap();

    let doc: Library = read_document(&path).await.unwrap();

    assert_eq!(doc.books.len(), 1);
    assert!(doc.loans.is_empty());
}

#[tokio::test]
async fn ensured_file_reads_as_default() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("library.json");

    ensure_file(&path).await.unwrap();
    let doc: Library = read_document(&path).await.unwrap();

    assert_eq!(doc, Library::default());
}

#[tokio::test]
async fn truncated_document_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("library.json");
    tokio::fs::write(&path, r#"{"books":{"1":{"id":1,"ti"#)
        .await
        .unwrap();

    let err = read_document::<Library, _>(&path).await.unwrap_err();

    assert!(matches!(err, Error::Corrupt { .. }));
    assert!(err.to_string().contains("library.json"));
}

#[tokio::test]
async fn overwrite_shrinks_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("library.json");

    write_document_atomic(&path, &library_with(&["A", "B", "C", "D"]))
        .await
        .unwrap();
    write_document_atomic(&path, &library_with(&["Z"]))
        .await
        .unwrap();

    let doc: Library = read_document(&path).await.unwrap();
    assert_eq!(doc, library_with(&["Z"]));
}
