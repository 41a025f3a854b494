//! The chunk-driven rewrite state machine.
//!
//! The transformer walks the structural positions reported by the scanner.
//! Bytes between positions are *content* (key bytes, string bodies, numbers,
//! literals, whitespace) and are handled per the current mode; the byte at
//! each position is a *structural event* and drives the state machine.
//!
//! State invariants:
//!
//! - path-stack depth equals the JSON nesting depth at every structural
//!   event;
//! - the matcher node carried on a stack frame is the node that was current
//!   when the container was *entered*; sibling key matches never overwrite
//!   it, they only flow into child containers through `last_match_node`;
//! - while skipping, nothing is emitted for the skipped value, and a sibling
//!   comma appears iff a later kept field is emitted (`pending_comma`);
//! - pending `add` fields registered at object entry are injected exactly
//!   before the closing `}` of the object at their registered depth.

use std::io::Write;
use std::sync::Arc;

use bytes::Bytes;
use rustc_hash::FxHashMap;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::matcher::{NodeId, PathMatcher};
use crate::rules::Action;
use crate::scanner;
use crate::transform::{encode, unescape};

/// One open container on the path stack.
#[derive(Debug, Clone, Copy)]
struct Frame {
    is_array: bool,
    /// Index of the next element, maintained by comma events.
    array_index: usize,
    /// Matcher state at container entry; stable for the frame's lifetime.
    node: NodeId,
    /// True until the first field is emitted into this object.
    first_field: bool,
}

/// Sub-state machine for value skipping.
#[derive(Debug, Clone, Copy, Default)]
struct SkipState {
    depth: usize,
    in_string: bool,
    escaped: bool,
}

/// A field queued for injection when its object closes.
#[derive(Debug)]
struct PendingAdd {
    key: String,
    value: Bytes,
}

/// Outcome of a key match, decided at the `:` event.
enum KeyMatch {
    Keep,
    Remove,
    Set,
}

/// The stateful byte-level engine: consumes chunks, emits the rewritten
/// stream into an internal buffer that [`Transformer::feed`] flushes to the
/// caller's sink. All state persists across chunk boundaries.
pub(crate) struct Transformer {
    matcher: Option<Arc<PathMatcher>>,
    has_add_rules: bool,

    positions: Vec<u32>,
    path_stack: Vec<Frame>,
    key_buffer: Vec<u8>,
    out: Vec<u8>,

    in_string: bool,
    escaped: bool,
    expect_key: bool,
    in_key: bool,
    /// Length of `key_buffer` at the key's closing quote; bytes past it are
    /// whitespace between the quote and the colon.
    key_end: usize,

    skipping: bool,
    skip: SkipState,

    pending_comma: bool,
    last_match_node: Option<NodeId>,
    /// Replacement emitted once the skipped original value ends.
    set_value: Option<Bytes>,
    /// depth -> fields to inject when the object at that depth closes.
    pending_adds: FxHashMap<usize, Vec<PendingAdd>>,
}

impl Transformer {
    pub(crate) fn with_config(config: &EngineConfig) -> Self {
        let config = config.sanitized();
        Self {
            matcher: None,
            has_add_rules: false,
            positions: vec![0u32; config.positions_capacity],
            path_stack: Vec::with_capacity(config.path_stack_capacity),
            key_buffer: Vec::with_capacity(config.key_buffer_capacity),
            out: Vec::with_capacity(config.output_capacity),
            in_string: false,
            escaped: false,
            expect_key: false,
            in_key: false,
            key_end: 0,
            skipping: false,
            skip: SkipState::default(),
            pending_comma: false,
            last_match_node: None,
            set_value: None,
            pending_adds: FxHashMap::default(),
        }
    }

    /// Bind a matcher for one transformation and reset all per-payload
    /// state. `has_add_rules` is computed once per checkout.
    pub(crate) fn attach(&mut self, matcher: Arc<PathMatcher>) {
        self.has_add_rules = matcher.has_add_rules();
        self.matcher = Some(matcher);
        self.reset();
    }

    /// Drop the matcher reference before the instance returns to the pool.
    pub(crate) fn detach(&mut self) {
        self.matcher = None;
        self.has_add_rules = false;
        self.path_stack.clear();
        self.key_buffer.clear();
        self.out.clear();
        self.pending_adds.clear();
        self.set_value = None;
        self.last_match_node = None;
    }

    fn reset(&mut self) {
        self.path_stack.clear();
        self.key_buffer.clear();
        self.out.clear();
        self.in_string = false;
        self.escaped = false;
        self.expect_key = false;
        self.in_key = false;
        self.key_end = 0;
        self.skipping = false;
        self.skip = SkipState::default();
        self.pending_comma = false;
        self.last_match_node = None;
        self.set_value = None;
        self.pending_adds.clear();
    }

    /// Process one chunk and flush the rewritten bytes to `writer`.
    /// Returns the number of bytes written.
    pub(crate) fn feed<W: Write>(&mut self, chunk: &[u8], writer: &mut W) -> Result<usize> {
        self.process_chunk(chunk);
        self.flush(writer)
    }

    /// Finish the transformation: resolve a still-open skip (a primitive
    /// truncated by end of input) and flush the remainder.
    pub(crate) fn finish<W: Write>(&mut self, writer: &mut W) -> Result<usize> {
        if self.skipping {
            self.skipping = false;
            self.skip = SkipState::default();
            if let Some(value) = self.set_value.take() {
                self.out.extend_from_slice(&value);
            }
        }
        self.flush(writer)
    }

    fn flush<W: Write>(&mut self, writer: &mut W) -> Result<usize> {
        if self.out.is_empty() {
            return Ok(0);
        }
        let written = self.out.len();
        writer.write_all(&self.out).map_err(EngineError::Write)?;
        self.out.clear();
        Ok(written)
    }

    /// Walk one chunk. The position buffer has fixed capacity; if a chunk is
    /// dense enough to fill it, scanning resumes past the last reported
    /// position instead of dropping events.
    fn process_chunk(&mut self, chunk: &[u8]) {
        let mut offset = 0usize;
        while offset < chunk.len() {
            let window = &chunk[offset..];
            let count = scanner::scan(window, &mut self.positions);
            let mut prev = 0usize;
            for i in 0..count {
                let pos = self.positions[i] as usize;
                if pos > prev {
                    self.handle_content(&window[prev..pos]);
                }
                self.handle_structural(window[pos]);
                prev = pos + 1;
            }
            if count == self.positions.len() {
                offset += prev;
            } else {
                if prev < window.len() {
                    self.handle_content(&window[prev..]);
                }
                break;
            }
        }
    }

    /// Content bytes carry no structural characters by construction, so the
    /// only state they can affect is `\`-escape parity inside strings.
    fn handle_content(&mut self, content: &[u8]) {
        if content.is_empty() {
            return;
        }
        if self.skipping {
            if self.skip.in_string {
                for &byte in content {
                    if self.skip.escaped {
                        self.skip.escaped = false;
                    } else if byte == b'\\' {
                        self.skip.escaped = true;
                    }
                }
            }
            return;
        }
        if self.in_key {
            self.key_buffer.extend_from_slice(content);
            if self.in_string {
                self.track_escapes(content);
            }
            return;
        }
        self.out.extend_from_slice(content);
        if self.in_string {
            self.track_escapes(content);
        }
    }

    fn track_escapes(&mut self, content: &[u8]) {
        for &byte in content {
            if self.escaped {
                self.escaped = false;
            } else if byte == b'\\' {
                self.escaped = true;
            }
        }
    }

    fn handle_structural(&mut self, ch: u8) {
        if self.skipping {
            let reprocess = self.handle_skip_char(ch);
            if !reprocess {
                return;
            }
            // a primitive skip ended on this terminator; fall through and
            // treat it as a normal event
        }

        if self.in_string {
            if self.escaped {
                self.escaped = false;
                self.emit_string_byte(ch);
                return;
            }
            if ch == b'"' {
                self.in_string = false;
                if self.in_key {
                    self.key_buffer.push(ch);
                    // key complete; the matcher is consulted at the colon
                    self.key_end = self.key_buffer.len();
                } else {
                    self.out.push(ch);
                }
            } else {
                self.emit_string_byte(ch);
            }
            return;
        }

        match ch {
            b'"' => {
                self.in_string = true;
                self.escaped = false;
                if self.expect_key {
                    self.in_key = true;
                    self.key_buffer.clear();
                    self.key_buffer.push(ch);
                    self.key_end = 0;
                } else {
                    self.out.push(ch);
                }
            }

            b':' => {
                if self.in_key {
                    self.in_key = false;
                    match self.resolve_key_match() {
                        KeyMatch::Remove => {
                            // the key is discarded; first_field and
                            // pending_comma stay untouched so the next kept
                            // field separates correctly
                            self.skipping = true;
                            self.skip = SkipState::default();
                            self.expect_key = false;
                            return;
                        }
                        verdict => {
                            if self.pending_comma {
                                self.out.push(b',');
                                self.pending_comma = false;
                            }
                            self.out.extend_from_slice(&self.key_buffer);
                            self.out.push(b':');
                            self.set_first_field(false);
                            if matches!(verdict, KeyMatch::Set) {
                                self.skipping = true;
                                self.skip = SkipState::default();
                            }
                        }
                    }
                } else {
                    self.out.push(ch);
                }
                self.expect_key = false;
            }

            b'{' => {
                if self.pending_comma {
                    self.out.push(b',');
                    self.pending_comma = false;
                }
                self.out.push(ch);
                let node = self.child_node();
                // registration must see the parent's depth, i.e. happen
                // before the push
                self.register_pending_adds(node);
                self.path_stack.push(Frame {
                    is_array: false,
                    array_index: 0,
                    node,
                    first_field: true,
                });
                self.expect_key = true;
            }

            b'}' => {
                self.inject_pending_adds();
                self.path_stack.pop();
                self.out.push(ch);
                self.expect_key = false;
                self.pending_comma = false;
            }

            b'[' => {
                if self.pending_comma {
                    self.out.push(b',');
                    self.pending_comma = false;
                }
                self.out.push(ch);
                let node = self.child_node();
                self.path_stack.push(Frame {
                    is_array: true,
                    array_index: 0,
                    node,
                    first_field: true,
                });
                self.expect_key = false;
                // the first element has no preceding comma, so match it now
                self.match_array_element();
            }

            b']' => {
                self.path_stack.pop();
                self.out.push(ch);
                self.expect_key = false;
                self.pending_comma = false;
            }

            b',' => match self.path_stack.last_mut() {
                Some(frame) if frame.is_array => {
                    frame.array_index += 1;
                    self.out.push(ch);
                    self.match_array_element();
                }
                Some(_) => {
                    // suppress the separator until the next kept field, so a
                    // removed trailing field does not leave ",}"
                    if !self.first_field() {
                        self.pending_comma = true;
                    }
                    self.expect_key = true;
                }
                None => self.out.push(ch),
            },

            other => self.out.push(other),
        }
    }

    #[inline]
    fn emit_string_byte(&mut self, ch: u8) {
        if self.in_key {
            self.key_buffer.push(ch);
        } else {
            self.out.push(ch);
        }
    }

    /// Matcher node for a container being entered: the most recent key or
    /// element match if one is pending, else the current frame's node.
    fn child_node(&mut self) -> NodeId {
        match self.last_match_node.take() {
            Some(node) => node,
            None => self.current_node(),
        }
    }

    #[inline]
    fn current_node(&self) -> NodeId {
        self.path_stack
            .last()
            .map(|frame| frame.node)
            .unwrap_or(NodeId::ROOT)
    }

    #[inline]
    fn first_field(&self) -> bool {
        self.path_stack
            .last()
            .map(|frame| frame.first_field)
            .unwrap_or(true)
    }

    #[inline]
    fn set_first_field(&mut self, value: bool) {
        if let Some(frame) = self.path_stack.last_mut() {
            frame.first_field = value;
        }
    }

    /// Resolve the completed key against the matcher. Steps from the
    /// *container's* node (never from a sibling's match result), records the
    /// landing node for a child container, and applies action precedence:
    /// `remove` beats `set`; `add` is independent and handled at container
    /// entry.
    fn resolve_key_match(&mut self) -> KeyMatch {
        let matcher = match self.matcher.as_ref() {
            Some(matcher) => Arc::clone(matcher),
            None => return KeyMatch::Keep,
        };

        let end = if self.key_end >= 2 {
            self.key_end
        } else {
            self.key_buffer.len()
        };
        if end < 2 {
            return KeyMatch::Keep;
        }
        let key = unescape::decode_key(&self.key_buffer[1..end - 1]);

        // a key present in the document cancels any add queued for it: the
        // original value wins
        if self.has_add_rules && !self.pending_adds.is_empty() && !self.path_stack.is_empty() {
            let depth = self.path_stack.len() - 1;
            if let Some(adds) = self.pending_adds.get_mut(&depth) {
                adds.retain(|add| add.key != key.as_ref());
            }
        }

        let state = self.current_node();
        let (next, actions) = matcher.step_key(state, key.as_ref());
        self.last_match_node = Some(next);

        let mut replacement: Option<Bytes> = None;
        for action in actions {
            match action.action {
                Action::Remove => {
                    self.set_value = None;
                    return KeyMatch::Remove;
                }
                Action::Set => {
                    if replacement.is_none() {
                        replacement = Some(action.payload_bytes());
                    }
                }
                Action::Add => {}
            }
        }
        if let Some(value) = replacement {
            self.set_value = Some(value);
            return KeyMatch::Set;
        }
        KeyMatch::Keep
    }

    /// Match the element at the top frame's current index. Runs at `[` for
    /// element zero and after every array comma.
    fn match_array_element(&mut self) {
        let matcher = match self.matcher.as_ref() {
            Some(matcher) => Arc::clone(matcher),
            None => return,
        };
        let (state, index) = match self.path_stack.last() {
            Some(frame) if frame.is_array => (frame.node, frame.array_index),
            _ => return,
        };

        let (next, actions) = matcher.step_index(state, index);
        self.last_match_node = Some(next);

        let mut replacement: Option<Bytes> = None;
        for action in actions {
            match action.action {
                Action::Remove => {
                    self.set_value = None;
                    self.skipping = true;
                    self.skip = SkipState::default();
                    return;
                }
                Action::Set => {
                    if replacement.is_none() {
                        replacement = Some(action.payload_bytes());
                    }
                }
                Action::Add => {}
            }
        }
        if let Some(value) = replacement {
            self.set_value = Some(value);
            self.skipping = true;
            self.skip = SkipState::default();
        }
    }

    /// Skip-mode byte handling. Returns `true` when the byte terminated a
    /// primitive value and must be re-processed as a normal structural
    /// event.
    fn handle_skip_char(&mut self, ch: u8) -> bool {
        if self.skip.escaped {
            self.skip.escaped = false;
            return false;
        }
        if self.skip.in_string {
            if ch == b'"' {
                self.skip.in_string = false;
                if self.skip.depth == 0 {
                    // string value complete
                    self.finish_skip_value();
                }
            }
            return false;
        }
        match ch {
            b'"' => self.skip.in_string = true,
            b'{' | b'[' => self.skip.depth += 1,
            b'}' | b']' => {
                if self.skip.depth > 0 {
                    self.skip.depth -= 1;
                    if self.skip.depth == 0 {
                        // compound value complete
                        self.finish_skip_value();
                    }
                } else {
                    // a primitive ended at the container close; the close
                    // itself still needs normal handling
                    self.finish_skip_value();
                    return true;
                }
            }
            b',' => {
                if self.skip.depth == 0 {
                    let substituting = self.set_value.is_some();
                    self.finish_skip_value();
                    if substituting {
                        // set: the comma separates the substitute from the
                        // next field and is re-processed normally
                        return true;
                    }
                    // remove: the separator vanishes with the value
                }
            }
            _ => {}
        }
        false
    }

    fn finish_skip_value(&mut self) {
        self.skipping = false;
        self.skip = SkipState::default();
        if let Some(value) = self.set_value.take() {
            self.out.extend_from_slice(&value);
        }
        if let Some(frame) = self.path_stack.last() {
            if !frame.is_array {
                self.expect_key = true;
            }
        }
    }

    /// At object entry, queue `add` fields for this node: literal children
    /// carrying an `add` whose rule depth equals the parent depth.
    fn register_pending_adds(&mut self, node: NodeId) {
        if !self.has_add_rules {
            return;
        }
        let matcher = match self.matcher.as_ref() {
            Some(matcher) => Arc::clone(matcher),
            None => return,
        };
        let depth = self.path_stack.len();
        for (key, child) in matcher.children(node) {
            for action in matcher.output(child) {
                if action.action != Action::Add {
                    continue;
                }
                if matcher.rule_target_depth(action.rule) != depth {
                    continue;
                }
                self.pending_adds
                    .entry(depth)
                    .or_default()
                    .push(PendingAdd {
                        key: key.to_owned(),
                        value: action.payload_bytes(),
                    });
            }
        }
    }

    /// Just before `}`: emit the adds queued for the closing object's depth.
    /// Keys already seen in the document were cancelled at key resolution;
    /// duplicate adds from distinct rules are emitted as-is.
    fn inject_pending_adds(&mut self) {
        if self.pending_adds.is_empty() || self.path_stack.is_empty() {
            return;
        }
        let depth = self.path_stack.len() - 1;
        let Some(adds) = self.pending_adds.remove(&depth) else {
            return;
        };
        let mut emitted = false;
        for add in &adds {
            if !self.first_field() || emitted {
                self.out.push(b',');
            }
            encode::write_escaped_str(&mut self.out, &add.key);
            self.out.push(b':');
            self.out.extend_from_slice(&add.value);
            emitted = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::PathRule;

    fn run(rules: Vec<PathRule>, input: &str) -> String {
        let matcher = Arc::new(PathMatcher::build(rules).expect("valid rules"));
        let mut transformer = Transformer::with_config(&EngineConfig::default());
        transformer.attach(matcher);
        let mut out = Vec::new();
        transformer.feed(input.as_bytes(), &mut out).unwrap();
        transformer.finish(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn passthrough_without_matches() {
        let input = r#"{"a":1,"b":[true,null,"x"],"c":{"d":2.5}}"#;
        assert_eq!(run(vec![PathRule::remove("zzz")], input), input);
    }

    #[test]
    fn removes_top_level_field() {
        assert_eq!(
            run(vec![PathRule::remove("b")], r#"{"a":1,"b":2,"c":3}"#),
            r#"{"a":1,"c":3}"#
        );
    }

    #[test]
    fn removes_first_and_last_fields() {
        assert_eq!(
            run(vec![PathRule::remove("a")], r#"{"a":1,"b":2}"#),
            r#"{"b":2}"#
        );
        assert_eq!(
            run(vec![PathRule::remove("b")], r#"{"a":1,"b":2}"#),
            r#"{"a":1}"#
        );
        assert_eq!(run(vec![PathRule::remove("a")], r#"{"a":1}"#), "{}");
    }

    #[test]
    fn removed_sibling_keeps_comma_discipline() {
        // pending separator survives a removed middle field
        assert_eq!(
            run(vec![PathRule::remove("b")], r#"{"a":1,"b":2,"c":3,"d":4}"#),
            r#"{"a":1,"c":3,"d":4}"#
        );
    }

    #[test]
    fn empty_object_value_does_not_eat_following_comma() {
        assert_eq!(
            run(vec![PathRule::remove("zzz")], r#"{"a":{},"b":1}"#),
            r#"{"a":{},"b":1}"#
        );
        // an object whose only field was removed behaves like an empty one
        assert_eq!(
            run(vec![PathRule::remove("a.x")], r#"{"a":{"x":1},"b":2}"#),
            r#"{"a":{},"b":2}"#
        );
    }

    #[test]
    fn escaped_quotes_do_not_desync_string_state() {
        let input = r#"{"a":"he said \"hi\"","b":"x,y","c":1}"#;
        assert_eq!(run(vec![PathRule::remove("zzz")], input), input);
        assert_eq!(
            run(vec![PathRule::remove("b")], input),
            r#"{"a":"he said \"hi\"","c":1}"#
        );
    }

    #[test]
    fn escaped_key_matches_decoded_rule_field() {
        let input = r#"{"he\"llo":1,"b":2}"#;
        assert_eq!(
            run(vec![PathRule::remove(r#"he"llo"#)], input),
            r#"{"b":2}"#
        );
    }

    #[test]
    fn whitespace_before_colon_still_matches() {
        assert_eq!(
            run(
                vec![PathRule::remove("b")],
                "{ \"a\" : 1 , \"b\" : 2 }"
            ),
            "{ \"a\" : 1  }"
        );
    }

    #[test]
    fn set_replaces_primitive_mid_object() {
        assert_eq!(
            run(
                vec![PathRule::set_raw("b", &b"999"[..])],
                r#"{"a":1,"b":2,"c":3}"#
            ),
            r#"{"a":1,"b":999,"c":3}"#
        );
    }

    #[test]
    fn set_on_last_field_closed_by_brace() {
        assert_eq!(
            run(vec![PathRule::set_raw("b", &b"999"[..])], r#"{"a":1,"b":2}"#),
            r#"{"a":1,"b":999}"#
        );
    }

    #[test]
    fn set_value_survives_end_of_input() {
        // a top-level primitive leaves the skip open until finish
        assert_eq!(run(vec![PathRule::set_raw("a", &b"2"[..])], r#"{"a":1}"#), r#"{"a":2}"#);
    }

    #[test]
    fn add_injects_before_close() {
        assert_eq!(
            run(vec![PathRule::add_raw("new", &b"123"[..])], "{}"),
            r#"{"new":123}"#
        );
        assert_eq!(
            run(vec![PathRule::add_raw("c", &b"3"[..])], r#"{"a":1,"b":2}"#),
            r#"{"a":1,"b":2,"c":3}"#
        );
    }

    #[test]
    fn add_is_cancelled_by_existing_key() {
        assert_eq!(
            run(
                vec![
                    PathRule::add_raw("b", &b"999"[..]),
                    PathRule::add_raw("c", &b"3"[..]),
                ],
                r#"{"a":1,"b":2}"#
            ),
            r#"{"a":1,"b":2,"c":3}"#
        );
    }

    #[test]
    fn add_key_with_specials_is_escaped() {
        assert_eq!(
            run(vec![PathRule::add_raw(r#"od"d"#, &b"1"[..])], "{}"),
            r#"{"od\"d":1}"#
        );
    }

    #[test]
    fn chunk_boundaries_are_arbitrary() {
        let rules = vec![
            PathRule::remove("a"),
            PathRule::set_raw("b", &b"999"[..]),
            PathRule::add_raw("d", &b"4"[..]),
        ];
        let input = r#"{"a":1,"b":2,"c":3}"#.as_bytes();
        let expected = r#"{"b":999,"c":3,"d":4}"#;

        for chunk_size in 1..=input.len() {
            let matcher = Arc::new(PathMatcher::build(rules.clone()).unwrap());
            let mut transformer = Transformer::with_config(&EngineConfig::default());
            transformer.attach(matcher);
            let mut out = Vec::new();
            for chunk in input.chunks(chunk_size) {
                transformer.feed(chunk, &mut out).unwrap();
            }
            transformer.finish(&mut out).unwrap();
            assert_eq!(
                String::from_utf8(out).unwrap(),
                expected,
                "chunk size {chunk_size}"
            );
        }
    }

    #[test]
    fn dense_chunk_overflows_position_buffer_without_losing_events() {
        // positions capacity of 64 (sanitized minimum), far denser input
        let config = EngineConfig {
            positions_capacity: 1,
            ..EngineConfig::default()
        };
        let mut input = String::from("{");
        for i in 0..200 {
            if i > 0 {
                input.push(',');
            }
            input.push_str(&format!(r#""k{i}":[{i},{i}]"#));
        }
        input.push('}');

        let matcher = Arc::new(PathMatcher::build(vec![PathRule::remove("k7")]).unwrap());
        let mut transformer = Transformer::with_config(&config);
        transformer.attach(matcher);
        let mut out = Vec::new();
        transformer.feed(input.as_bytes(), &mut out).unwrap();
        transformer.finish(&mut out).unwrap();
        let result = String::from_utf8(out).unwrap();
        assert!(!result.contains(r#""k7""#));
        assert!(result.contains(r#""k8":[8,8]"#));
        serde_json::from_str::<serde_json::Value>(&result).expect("output parses");
    }

    #[test]
    fn pool_style_reuse_starts_clean() {
        let matcher = Arc::new(PathMatcher::build(vec![PathRule::remove("b")]).unwrap());
        let mut transformer = Transformer::with_config(&EngineConfig::default());

        transformer.attach(Arc::clone(&matcher));
        let mut out = Vec::new();
        // leave the transformer mid-skip
        transformer.feed(br#"{"a":1,"b": {"x":"#, &mut out).unwrap();

        transformer.attach(matcher);
        let mut out = Vec::new();
        transformer.feed(br#"{"a":1,"b":2}"#, &mut out).unwrap();
        transformer.finish(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), r#"{"a":1}"#);
    }
}
