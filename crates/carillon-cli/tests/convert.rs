//! End-to-end tests for the convert command: a real SMF byte stream in, a
//! generated C header out.

use std::path::PathBuf;
use std::process::ExitCode;

use carillon_cli::commands;

const END_OF_TRACK: [u8; 4] = [0x00, 0xFF, 0x2F, 0x00];

/// Assembles a single-track SMF byte stream from raw track event bytes.
fn smf_bytes(division: u16, track: &[u8]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(b"MThd");
    data.extend_from_slice(&6u32.to_be_bytes());
    data.extend_from_slice(&0u16.to_be_bytes());
    data.extend_from_slice(&1u16.to_be_bytes());
    data.extend_from_slice(&division.to_be_bytes());
    data.extend_from_slice(b"MTrk");
    data.extend_from_slice(&(track.len() as u32).to_be_bytes());
    data.extend_from_slice(track);
    data
}

/// One note 36 struck at t=0 with velocity 100 and released at t=500.
/// Division 500 at the SMF default tempo makes one tick one millisecond.
fn single_note_file(dir: &tempfile::TempDir) -> PathBuf {
    let track = [
        &[0x00, 0x90, 0x24, 0x64][..],
        &[0x83, 0x74, 0x80, 0x24, 0x00][..],
        &END_OF_TRACK[..],
    ]
    .concat();
    let path = dir.path().join("input.mid");
    std::fs::write(&path, smf_bytes(500, &track)).unwrap();
    path
}

#[test]
fn convert_writes_the_expected_header() {
    let tmp = tempfile::tempdir().unwrap();
    let input = single_note_file(&tmp);
    let output = tmp.path().join("mididata.h");

    let code = commands::convert::run(
        input.to_str().unwrap(),
        output.to_str().unwrap(),
        None,
        36,
        None,
        false,
    )
    .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);

    let header = std::fs::read_to_string(&output).unwrap();
    assert!(header.contains("const uint8_t channel_cnt = 1;"));
    assert!(header.contains("unsigned long int event_cnt = 2;"));
    assert!(header.contains("const PROGMEM unsigned long int event_timestamps[] = {0,500};"));
    assert!(header.contains("const PROGMEM uint8_t event_values[] = {100,0};"));
    assert!(header.contains("const PROGMEM uint8_t event_notes[] = {0,0};"));
    assert!(header.contains("const PROGMEM uint8_t event_states[] = {0x1,0x0};"));
    assert!(header.contains("unsigned long int current_event_index = 0;"));
}

#[test]
fn convert_with_missing_mapping_falls_back_and_succeeds() {
    let tmp = tempfile::tempdir().unwrap();
    let input = single_note_file(&tmp);
    let output = tmp.path().join("mididata.h");
    let mapping = tmp.path().join("absent.json");

    let code = commands::convert::run(
        input.to_str().unwrap(),
        output.to_str().unwrap(),
        Some(mapping.to_str().unwrap()),
        36,
        None,
        false,
    )
    .unwrap();

    // Missing override is recoverable: default layout, artifact written.
    assert_eq!(code, ExitCode::SUCCESS);
    assert!(output.exists());
}

#[test]
fn convert_with_override_routes_notes_through_it() {
    let tmp = tempfile::tempdir().unwrap();
    let input = single_note_file(&tmp);
    let output = tmp.path().join("mididata.h");
    let mapping = tmp.path().join("mapping.json");
    std::fs::write(&mapping, r#"{"mapping": {"36": 1}}"#).unwrap();

    let code = commands::convert::run(
        input.to_str().unwrap(),
        output.to_str().unwrap(),
        Some(mapping.to_str().unwrap()),
        36,
        Some(2),
        false,
    )
    .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);

    let header = std::fs::read_to_string(&output).unwrap();
    assert!(header.contains("const uint8_t channel_cnt = 2;"));
    assert!(header.contains("const PROGMEM uint8_t event_notes[] = {1,1};"));
    assert!(header.contains("const PROGMEM uint8_t event_states[] = {0x2,0x0};"));
}

#[test]
fn convert_missing_input_fails_and_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("mididata.h");

    let result = commands::convert::run(
        tmp.path().join("absent.mid").to_str().unwrap(),
        output.to_str().unwrap(),
        None,
        36,
        None,
        false,
    );

    assert!(result.is_err());
    assert!(!output.exists());
}

#[test]
fn convert_json_mode_reports_failure_with_exit_one() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("mididata.h");

    let code = commands::convert::run(
        tmp.path().join("absent.mid").to_str().unwrap(),
        output.to_str().unwrap(),
        None,
        36,
        None,
        true,
    )
    .unwrap();

    assert_eq!(code, ExitCode::from(1));
    assert!(!output.exists());
}

#[test]
fn inspect_reports_timeline_diagnostics() {
    let tmp = tempfile::tempdir().unwrap();
    let input = single_note_file(&tmp);

    let code = commands::inspect::run(input.to_str().unwrap(), false).unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
}

#[test]
fn check_mapping_accepts_valid_file() {
    let tmp = tempfile::tempdir().unwrap();
    let mapping = tmp.path().join("mapping.json");
    std::fs::write(&mapping, r#"{"mapping": {"36": 0, "38": 1}}"#).unwrap();

    let code = commands::check_mapping::run(mapping.to_str().unwrap(), 2, false).unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
}

#[test]
fn check_mapping_rejects_invalid_file_with_exit_one() {
    let tmp = tempfile::tempdir().unwrap();
    let mapping = tmp.path().join("mapping.json");
    std::fs::write(&mapping, r#"{"mapping": {"36": 5}}"#).unwrap();

    let code = commands::check_mapping::run(mapping.to_str().unwrap(), 2, false).unwrap();
    assert_eq!(code, ExitCode::from(1));
}
