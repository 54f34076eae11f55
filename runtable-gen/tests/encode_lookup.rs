//! Encode a range file to an artifact and query it back.

use std::path::Path;

use assert_matches::assert_matches;
use runtable::LookupError;
use runtable_gen::commands;
use runtable_gen::commands::EncodeArgs;
use runtable_gen::commands::LookupArgs;
use runtable_gen::config::CodecSettings;
use runtable_gen::config::Settings;
use runtable_gen::error::Error;
use test_case::test_case;

const SCRIPTS: &str = "\
# Scripts-like sample
# @missing: 0000..10FFFF; Unknown

0041..005A    ; Latin # L&  [26] LATIN CAPITAL LETTER A..LATIN CAPITAL LETTER Z
0061..007A    ; Latin # L&  [26] LATIN SMALL LETTER A..LATIN SMALL LETTER Z
0370..0373    ; Greek
0391..03A1    ; Greek
";

fn settings(domain_max: u32) -> Settings {
    Settings {
        codec: CodecSettings {
            field_bits: 32,
            domain_max,
            value_bits: None,
        },
    }
}

fn encode_to(dir: &Path, domain_max: u32) -> std::path::PathBuf {
    let input = dir.join("Scripts.txt");
    let output = dir.join("scripts.json");
    std::fs::write(&input, SCRIPTS).unwrap();

    let args = EncodeArgs {
        input,
        name: None,
        default: None,
        output: Some(output.clone()),
    };
    let table = commands::encode(&args, &settings(domain_max), &mut Vec::<u8>::new()).unwrap();
    assert_eq!(table.name, "scripts");
    assert_eq!(table.values, vec!["Unknown", "Latin", "Greek"]);

    output
}

fn lookup(table: &Path, code_points: Vec<u32>) -> Result<String, Error> {
    let args = LookupArgs { table: table.to_path_buf(), code_points };
    let mut out = Vec::new();
    commands::lookup(&args, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test_case(0x40 => "U+0040\tUnknown\n"; "before first range")]
#[test_case(0x41 => "U+0041\tLatin\n"; "first key of range")]
#[test_case(0x7A => "U+007A\tLatin\n"; "last key of range")]
#[test_case(0x3A1 => "U+03A1\tGreek\n"; "last listed code point")]
#[test_case(0x10FFFF => "U+10FFFF\tUnknown\n"; "end of domain")]
fn lookup_single(code_point: u32) -> String {
    let dir = tempfile::tempdir().unwrap();
    let table = encode_to(dir.path(), 0x10FFFF);
    lookup(&table, vec![code_point]).unwrap()
}

#[test]
fn lookup_many_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let table = encode_to(dir.path(), 0x10FFFF);

    let printed = lookup(&table, vec![0x61, 0x5B, 0x372]).unwrap();
    assert_eq!(printed, "U+0061\tLatin\nU+005B\tUnknown\nU+0372\tGreek\n");
}

#[test]
fn artifact_carries_flat_layout() {
    let dir = tempfile::tempdir().unwrap();
    let table = encode_to(dir.path(), 0x3FF);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(table).unwrap()).unwrap();
    assert_eq!(json["name"], "scripts");
    assert_eq!(json["value_bits"], 2);
    assert_eq!(json["field_bits"], 32);
    assert_eq!(json["domain_max"], 0x3FF);
    assert!(json["data"].is_string());
}

#[test]
fn lookup_past_domain_fails() {
    let dir = tempfile::tempdir().unwrap();
    let table = encode_to(dir.path(), 0x3FF);

    assert_matches!(
        lookup(&table, vec![0x400]),
        Err(Error::Lookup(LookupError::OutOfDomain { key: 0x400, domain_max: 0x3FF }))
    );
}

#[test]
fn encode_writes_to_stdout_without_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Scripts.txt");
    std::fs::write(&input, SCRIPTS).unwrap();

    let args = EncodeArgs {
        input,
        name: Some("u_scripts".to_string()),
        default: None,
        output: None,
    };
    let mut out = Vec::new();
    commands::encode(&args, &settings(0x3FF), &mut out).unwrap();

    let table: runtable::EncodedTable<String> = serde_json::from_slice(&out).unwrap();
    assert_eq!(table.name, "u_scripts");
    let codec = table.into_codec().unwrap();
    assert_eq!(codec.decode(0x391).as_deref(), Ok("Greek"));
}
