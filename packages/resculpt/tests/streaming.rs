//! Chunked and framed streaming behaviour.
//!
//! The transformer must be byte-for-byte independent of how the payload is
//! split into chunks, and the split interface must round-trip through the
//! pool cleanly.

use std::io::Cursor;

use resculpt::{Engine, EngineConfig, PathRule};

const REAL_WORLD_INPUT: &str = r#"{"candidates":[{"content":{"parts":[{"text":"hello","thoughtSignature":"xxx"},{"text":"world","thoughtSignature":"yyy"}]},"finishReason":"STOP"}],"usageMetadata":{"promptTokenCount":10}}"#;
const REAL_WORLD_EXPECT: &str = r#"{"candidates":[{"content":{"parts":[{"text":"hello"},{"text":"world"}]},"finishReason":"STOP"}],"usageMetadata":{"promptTokenCount":10}}"#;

fn real_world_rules() -> Vec<PathRule> {
    vec![PathRule::remove(
        "candidates.[*].content.parts.[*].thoughtSignature",
    )]
}

#[test]
fn output_is_chunking_independent() {
    let engine = Engine::new(real_world_rules()).unwrap();
    let input = REAL_WORLD_INPUT.as_bytes();

    for chunk_size in [1, 2, 3, 5, 7, 16, 64, input.len()] {
        let mut transformer = engine.acquire();
        let mut out = Vec::new();
        for chunk in input.chunks(chunk_size) {
            transformer.feed(chunk, &mut out).unwrap();
        }
        transformer.finish(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            REAL_WORLD_EXPECT,
            "chunk size {chunk_size}"
        );
    }
}

#[test]
fn whole_payload_api_matches_framed_api() {
    let engine = Engine::new(real_world_rules()).unwrap();

    let mut whole = Vec::new();
    engine
        .transform(Cursor::new(REAL_WORLD_INPUT.as_bytes().to_vec()), &mut whole)
        .unwrap();

    let mut framed = Vec::new();
    let mut transformer = engine.acquire();
    for chunk in REAL_WORLD_INPUT.as_bytes().chunks(11) {
        transformer.feed(chunk, &mut framed).unwrap();
    }
    transformer.finish(&mut framed).unwrap();

    assert_eq!(whole, framed);
}

#[test]
fn tiny_read_chunks_via_config() {
    let engine = Engine::with_config(
        real_world_rules(),
        EngineConfig::default().with_chunk_size(4),
    )
    .unwrap();
    let mut out = Vec::new();
    engine
        .transform(Cursor::new(REAL_WORLD_INPUT.as_bytes().to_vec()), &mut out)
        .unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), REAL_WORLD_EXPECT);
}

#[test]
fn keys_and_strings_split_across_chunks() {
    let engine = Engine::new(vec![
        PathRule::remove("thoughtSignature"),
        PathRule::set_raw("temperature", &b"0.5"[..]),
    ])
    .unwrap();
    let input = br#"{"thoughtSignature":"abcdefghij","temperature":1.0,"note":"sp\"lit"}"#;
    let expect = r#"{"temperature":0.5,"note":"sp\"lit"}"#;

    for chunk_size in 1..=input.len() {
        let mut transformer = engine.acquire();
        let mut out = Vec::new();
        for chunk in input.chunks(chunk_size) {
            transformer.feed(chunk, &mut out).unwrap();
        }
        transformer.finish(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            expect,
            "chunk size {chunk_size}"
        );
    }
}

#[test]
fn sequential_payloads_reuse_pooled_state() {
    let engine = Engine::new(vec![PathRule::remove("b")]).unwrap();
    for _ in 0..8 {
        let mut out = Vec::new();
        engine
            .transform(Cursor::new(br#"{"a":1,"b":2}"#.to_vec()), &mut out)
            .unwrap();
        assert_eq!(out, br#"{"a":1}"#);
    }
    assert_eq!(engine.stats().transforms, 8);
}

#[test]
fn concurrent_transformations_share_one_matcher() {
    let engine = std::sync::Arc::new(Engine::new(real_world_rules()).unwrap());
    let mut handles = Vec::new();
    for _ in 0..4 {
        let engine = std::sync::Arc::clone(&engine);
        handles.push(std::thread::spawn(move || {
            for _ in 0..50 {
                let mut out = Vec::new();
                engine
                    .transform(Cursor::new(REAL_WORLD_INPUT.as_bytes().to_vec()), &mut out)
                    .unwrap();
                assert_eq!(String::from_utf8(out).unwrap(), REAL_WORLD_EXPECT);
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn multi_megabyte_payload_streams() {
    // base64-ish filler: a single huge string value the engine must copy
    // through while removing a sibling
    let blob = "QUJDREVGR0hJSktMTU5PUA==".repeat(64 * 1024);
    let input = format!(r#"{{"image":"{blob}","debug":"drop-me","done":true}}"#);
    let expect = format!(r#"{{"image":"{blob}","done":true}}"#);

    let engine = Engine::new(vec![PathRule::remove("debug")]).unwrap();
    let mut out = Vec::new();
    engine
        .transform(Cursor::new(input.into_bytes()), &mut out)
        .unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), expect);
}
