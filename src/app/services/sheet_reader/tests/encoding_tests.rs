//! Tests for byte decoding and delimiter detection

use crate::app::services::sheet_reader::encoding::{decode_text, detect_delimiter};

#[test]
fn test_decode_plain_utf8() {
    let (text, encoding) = decode_text("Salário".as_bytes());
    assert_eq!(text, "Salário");
    assert_eq!(encoding, "UTF-8");
}

#[test]
fn test_decode_strips_utf8_bom() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(b"CPF;CBO");
    let (text, encoding) = decode_text(&bytes);
    assert_eq!(text, "CPF;CBO");
    assert_eq!(encoding, "UTF-8");
}

#[test]
fn test_decode_windows_1252_fallback() {
    // "Salário" with 0xE1 for "á"
    let bytes = b"Sal\xe1rio;Observa\xe7\xe3o";
    let (text, encoding) = decode_text(bytes);
    assert_eq!(text, "Salário;Observação");
    assert_eq!(encoding, "windows-1252");
}

#[test]
fn test_detect_delimiter() {
    assert_eq!(detect_delimiter("A;B;C\n1,5;2;3"), ';');
    assert_eq!(detect_delimiter("A,B,C"), ',');
    assert_eq!(detect_delimiter("A\tB\tC"), '\t');
    assert_eq!(detect_delimiter("\n\nA;B"), ';');
}

#[test]
fn test_detect_delimiter_ties_and_single_column() {
    assert_eq!(detect_delimiter("A;B,C"), ',');
    assert_eq!(detect_delimiter("CPF"), ',');
    assert_eq!(detect_delimiter(""), ',');
}
