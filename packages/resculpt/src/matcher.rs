//! Compiled multi-pattern path matcher.
//!
//! Rule paths compile into a trie over segments, augmented with
//! Aho-Corasick-style failure links so a single step per key (or array
//! index) reports every rule whose path is a *suffix* of the steps walked so
//! far. Nodes live in an arena and reference each other by index: failure
//! links are back-edges to ancestors, so index references keep the graph
//! simple to build and trivially shareable.
//!
//! Once built the matcher never mutates; any number of concurrent
//! transformations may step it by shared reference.

use std::borrow::Cow;
use std::collections::VecDeque;

use bytes::Bytes;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::error::PathError;
use crate::path::{self, Segment};
use crate::rules::{Action, PathRule};
use crate::transform::encode;

/// Cached surface strings `[0]`..`[999]`, so hot-path array matching avoids
/// re-formatting small indices.
static INDEX_KEYS: Lazy<Vec<String>> =
    Lazy::new(|| (0..1000).map(|i| format!("[{i}]")).collect());

/// Surface form of an array index (`[n]`), cached for indices below 1000.
pub(crate) fn index_key(index: usize) -> Cow<'static, str> {
    match INDEX_KEYS.get(index) {
        Some(cached) => Cow::Borrowed(cached.as_str()),
        None => Cow::Owned(format!("[{index}]")),
    }
}

/// Index of a matcher node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(u32);

impl NodeId {
    /// The root state.
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Payload carried by a rule action: pre-validated JSON bytes (emitted
/// verbatim) or an abstract value serialised on demand.
#[derive(Debug, Clone)]
enum Payload {
    Raw(Bytes),
    Abstract(Value),
}

/// One rule firing at a matcher node.
#[derive(Debug, Clone)]
pub(crate) struct RuleAction {
    /// Index into the matcher's rule list.
    pub rule: u32,
    /// What the rule does at its target.
    pub action: Action,
    payload: Option<Payload>,
}

impl RuleAction {
    /// Encoded payload bytes. The raw form is zero-copy; the abstract form
    /// serialises here; no payload at all encodes as JSON `null`.
    pub(crate) fn payload_bytes(&self) -> Bytes {
        match &self.payload {
            Some(Payload::Raw(bytes)) => bytes.clone(),
            Some(Payload::Abstract(value)) => Bytes::from(encode::value_to_vec(value)),
            None => Bytes::from_static(b"null"),
        }
    }
}

#[derive(Debug, Default)]
struct Node {
    /// Literal-key children; `[n]` index selectors live here under their
    /// surface string.
    children: FxHashMap<String, NodeId>,
    /// `*` child, matching any object key.
    wildcard: Option<NodeId>,
    /// `[*]` child, matching any array element.
    array_any: Option<NodeId>,
    /// Longest proper suffix state.
    fail: NodeId,
    /// Rules firing when this node is reached, including outputs inherited
    /// from the failure chain at build time.
    output: Vec<RuleAction>,
}

impl Default for NodeId {
    fn default() -> Self {
        NodeId::ROOT
    }
}

struct CompiledRule {
    segments: Vec<Segment>,
}

/// The compiled automaton over rule paths.
pub struct PathMatcher {
    nodes: Vec<Node>,
    rules: Vec<CompiledRule>,
    has_add: bool,
}

impl PathMatcher {
    /// Compile a rule set into a matcher.
    ///
    /// Rule order is preserved for deterministic tie-breaking when several
    /// rules collide on one path. Rules with an empty path are skipped (the
    /// engine drops them before building, this is a second line of defence).
    ///
    /// # Errors
    ///
    /// [`PathError`] when any rule path fails the grammar.
    pub fn build(rules: Vec<PathRule>) -> Result<Self, PathError> {
        let mut matcher = PathMatcher {
            nodes: vec![Node::default()],
            rules: Vec::with_capacity(rules.len()),
            has_add: false,
        };
        for rule in rules {
            if rule.path.is_empty() {
                tracing::warn!("skipping rule with empty path");
                continue;
            }
            matcher.insert(rule)?;
        }
        matcher.link_failures();
        Ok(matcher)
    }

    /// Whether any rule was admitted.
    #[must_use]
    pub fn has_rules(&self) -> bool {
        !self.rules.is_empty()
    }

    /// Number of admitted rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Whether any admitted rule is an `add`; cached by transformers so
    /// rule-free object entries cost nothing.
    pub(crate) fn has_add_rules(&self) -> bool {
        self.has_add
    }

    /// The stack depth at which the rule's final segment sits (segment
    /// count minus one). Pending-add registration compares this against the
    /// entered object's depth.
    pub(crate) fn rule_target_depth(&self, rule: u32) -> usize {
        self.rules[rule as usize].segments.len().saturating_sub(1)
    }

    /// Literal-key children of a node, for pending-add registration.
    pub(crate) fn children(&self, node: NodeId) -> impl Iterator<Item = (&str, NodeId)> {
        self.nodes[node.index()]
            .children
            .iter()
            .map(|(key, &child)| (key.as_str(), child))
    }

    /// Rule actions firing at a node.
    pub(crate) fn output(&self, node: NodeId) -> &[RuleAction] {
        &self.nodes[node.index()].output
    }

    /// Step the automaton with an object key. Tries the literal child, then
    /// the wildcard child, then retries along the failure chain; an
    /// unmatched key lands back at the root with no actions.
    pub(crate) fn step_key(&self, state: NodeId, key: &str) -> (NodeId, &[RuleAction]) {
        let mut at = state;
        loop {
            let node = &self.nodes[at.index()];
            let next = node.children.get(key).copied().or(node.wildcard);
            if let Some(next) = next {
                return (next, &self.nodes[next.index()].output);
            }
            if at == NodeId::ROOT {
                return (NodeId::ROOT, &[]);
            }
            at = node.fail;
        }
    }

    /// Step the automaton with an array element index. Tries the explicit
    /// `[n]` child first, then `[*]`, then the failure chain.
    pub(crate) fn step_index(&self, state: NodeId, index: usize) -> (NodeId, &[RuleAction]) {
        let key = index_key(index);
        let mut at = state;
        loop {
            let node = &self.nodes[at.index()];
            let next = node.children.get(key.as_ref()).copied().or(node.array_any);
            if let Some(next) = next {
                return (next, &self.nodes[next.index()].output);
            }
            if at == NodeId::ROOT {
                return (NodeId::ROOT, &[]);
            }
            at = node.fail;
        }
    }

    fn insert(&mut self, rule: PathRule) -> Result<(), PathError> {
        let segments = path::parse_path(&rule.path)?;
        let rule_index = self.rules.len() as u32;
        if rule.action == Action::Add {
            self.has_add = true;
        }

        let mut node = NodeId::ROOT;
        for segment in &segments {
            node = self.child_or_insert(node, segment);
        }

        let payload = match (rule.value_bytes, rule.value) {
            (Some(bytes), _) => Some(Payload::Raw(bytes)),
            (None, Some(value)) => Some(Payload::Abstract(value)),
            (None, None) => None,
        };
        self.nodes[node.index()].output.push(RuleAction {
            rule: rule_index,
            action: rule.action,
            payload,
        });
        self.rules.push(CompiledRule { segments });
        Ok(())
    }

    fn child_or_insert(&mut self, parent: NodeId, segment: &Segment) -> NodeId {
        match segment {
            Segment::Wildcard => {
                if let Some(existing) = self.nodes[parent.index()].wildcard {
                    return existing;
                }
                let id = self.alloc();
                self.nodes[parent.index()].wildcard = Some(id);
                id
            }
            Segment::ArrayAny => {
                if let Some(existing) = self.nodes[parent.index()].array_any {
                    return existing;
                }
                let id = self.alloc();
                self.nodes[parent.index()].array_any = Some(id);
                id
            }
            Segment::Field(name) => self.literal_child(parent, name),
            Segment::ArrayIndex(index) => {
                let key = index_key(*index);
                self.literal_child(parent, key.as_ref())
            }
        }
    }

    fn literal_child(&mut self, parent: NodeId, key: &str) -> NodeId {
        if let Some(&existing) = self.nodes[parent.index()].children.get(key) {
            return existing;
        }
        let id = self.alloc();
        self.nodes[parent.index()]
            .children
            .insert(key.to_owned(), id);
        id
    }

    fn alloc(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::default());
        id
    }

    /// Breadth-first failure-link construction. A node's failure target is
    /// the longest proper suffix state reachable via the same step kind;
    /// each node inherits its failure target's output list so one runtime
    /// lookup reports every applicable rule.
    fn link_failures(&mut self) {
        let mut queue = VecDeque::new();

        // depth-1 states fail to the root
        let first: Vec<NodeId> = self.nodes[0].children.values().copied().collect();
        for id in first {
            self.nodes[id.index()].fail = NodeId::ROOT;
            queue.push_back(id);
        }
        if let Some(id) = self.nodes[0].wildcard {
            self.nodes[id.index()].fail = NodeId::ROOT;
            queue.push_back(id);
        }
        if let Some(id) = self.nodes[0].array_any {
            self.nodes[id.index()].fail = NodeId::ROOT;
            queue.push_back(id);
        }

        while let Some(current) = queue.pop_front() {
            let start = self.nodes[current.index()].fail;

            let literals: Vec<(String, NodeId)> = self.nodes[current.index()]
                .children
                .iter()
                .map(|(key, &child)| (key.clone(), child))
                .collect();
            for (key, child) in literals {
                let fail = if key.starts_with('[') {
                    self.find_fail_index(start, &key)
                } else {
                    self.find_fail_key(start, &key)
                };
                self.adopt_failure(child, fail);
                queue.push_back(child);
            }

            if let Some(child) = self.nodes[current.index()].wildcard {
                let fail = self.find_fail_wildcard(start);
                self.adopt_failure(child, fail);
                queue.push_back(child);
            }
            if let Some(child) = self.nodes[current.index()].array_any {
                let fail = self.find_fail_array_any(start);
                self.adopt_failure(child, fail);
                queue.push_back(child);
            }
        }
    }

    fn adopt_failure(&mut self, node: NodeId, fail: NodeId) {
        self.nodes[node.index()].fail = fail;
        if fail != node && !self.nodes[fail.index()].output.is_empty() {
            let inherited = self.nodes[fail.index()].output.clone();
            self.nodes[node.index()].output.extend(inherited);
        }
    }

    fn find_fail_key(&self, mut state: NodeId, key: &str) -> NodeId {
        loop {
            let node = &self.nodes[state.index()];
            if let Some(&child) = node.children.get(key) {
                return child;
            }
            if let Some(wildcard) = node.wildcard {
                return wildcard;
            }
            if state == NodeId::ROOT {
                return NodeId::ROOT;
            }
            state = node.fail;
        }
    }

    fn find_fail_index(&self, mut state: NodeId, key: &str) -> NodeId {
        loop {
            let node = &self.nodes[state.index()];
            if let Some(&child) = node.children.get(key) {
                return child;
            }
            if let Some(array_any) = node.array_any {
                return array_any;
            }
            if state == NodeId::ROOT {
                return NodeId::ROOT;
            }
            state = node.fail;
        }
    }

    fn find_fail_wildcard(&self, mut state: NodeId) -> NodeId {
        loop {
            let node = &self.nodes[state.index()];
            if let Some(wildcard) = node.wildcard {
                return wildcard;
            }
            if state == NodeId::ROOT {
                return NodeId::ROOT;
            }
            state = node.fail;
        }
    }

    fn find_fail_array_any(&self, mut state: NodeId) -> NodeId {
        loop {
            let node = &self.nodes[state.index()];
            if let Some(array_any) = node.array_any {
                return array_any;
            }
            if state == NodeId::ROOT {
                return NodeId::ROOT;
            }
            state = node.fail;
        }
    }
}
