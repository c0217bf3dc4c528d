//! Case-insensitive prefix index over place names.
//!
//! Keys are stored by the characters of their lowercase form. Each terminal
//! node keeps the original-case name that was inserted last and every node id
//! registered under that normalised name.

use std::collections::BTreeMap;

use crate::graph::NodeId;

#[derive(Debug, Default, Clone)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    terminal: Option<Terminal>,
}

#[derive(Debug, Clone)]
struct Terminal {
    full_name: String,
    location_ids: Vec<NodeId>,
}

/// Multiway character trie used for location autocomplete.
#[derive(Debug, Default, Clone)]
pub struct Trie {
    root: TrieNode,
    keys: usize,
}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct normalised names stored.
    pub fn len(&self) -> usize {
        self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys == 0
    }

    /// Remove every key.
    pub fn clear(&mut self) {
        self.root = TrieNode::default();
        self.keys = 0;
    }

    /// Insert `name` and associate `id` with it.
    pub fn add(&mut self, name: &str, id: NodeId) {
        let mut node = &mut self.root;
        for c in name.to_lowercase().chars() {
            node = node.children.entry(c).or_default();
        }

        match node.terminal.as_mut() {
            Some(terminal) => {
                terminal.full_name = name.to_string();
                terminal.location_ids.push(id);
            }
            None => {
                node.terminal = Some(Terminal {
                    full_name: name.to_string(),
                    location_ids: vec![id],
                });
                self.keys += 1;
            }
        }
    }

    /// Node ids stored under the exact (case-insensitive) key.
    pub fn get_location_ids(&self, key: &str) -> &[NodeId] {
        self.find(key)
            .and_then(|node| node.terminal.as_ref())
            .map(|terminal| terminal.location_ids.as_slice())
            .unwrap_or(&[])
    }

    /// Original-case name stored under the exact key, if any.
    pub fn full_name(&self, key: &str) -> Option<&str> {
        self.find(key)
            .and_then(|node| node.terminal.as_ref())
            .map(|terminal| terminal.full_name.as_str())
    }

    /// Every full name whose lowercase form starts with `prefix` lowercased.
    ///
    /// Returns `None` when no stored key passes through `prefix`, which is
    /// distinct from `Some` of an empty list.
    pub fn keys_with_prefix(&self, prefix: &str) -> Option<Vec<String>> {
        let start = self.find(prefix)?;
        let mut names = Vec::new();
        collect(start, &mut names);
        Some(names)
    }

    fn find(&self, key: &str) -> Option<&TrieNode> {
        let mut node = &self.root;
        for c in key.to_lowercase().chars() {
            node = node.children.get(&c)?;
        }
        Some(node)
    }
}

fn collect(node: &TrieNode, names: &mut Vec<String>) {
    if let Some(terminal) = &node.terminal {
        names.push(terminal.full_name.clone());
    }
    for child in node.children.values() {
        collect(child, names);
    }
}
