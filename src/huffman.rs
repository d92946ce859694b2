//! Huffman tree construction, canonical code derivation, and tree
//! (de)serialization, built from the top 256 most frequent pixel values.
//!
//! A min-heap merge of the least-frequent symbols builds the tree bottom up;
//! canonical codes are then assigned by a pre-order walk, using an arena of
//! indexed nodes and a `BinaryHeap` rather than parent-pointer tree nodes.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::error::{Error, Result};
use crate::io::{BitReader, BitWriter};
use crate::pixel::{ordering_key, Pixel};
use crate::rle::FrequencyMap;

pub const MAX_LEAVES: usize = 256;
const MIN_FREQUENCY: u32 = 2;

/// An arena of tree nodes, indexed by position instead of linked through
/// parent/child pointers.
#[derive(Debug, Default)]
pub struct Tree {
    nodes: Vec<Node>,
    root: Option<usize>,
}

#[derive(Debug)]
enum Node {
    Leaf(Pixel),
    Internal { left: usize, right: usize },
}

impl Tree {
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<usize> {
        self.root
    }

    /// Derives a `pixel -> code bits` table by a pre-order walk: left = 0, right = 1.
    pub fn codes(&self) -> HashMap<Pixel, Vec<u8>> {
        let mut table = HashMap::new();

        if let Some(root) = self.root {
            let mut stack = vec![(root, Vec::new())];

            while let Some((index, path)) = stack.pop() {
                match &self.nodes[index] {
                    Node::Leaf(value) => {
                        table.insert(value.clone(), path);
                    }

                    Node::Internal { left, right } => {
                        let mut left_path = path.clone();
                        left_path.push(0);
                        stack.push((*left, left_path));

                        let mut right_path = path;
                        right_path.push(1);
                        stack.push((*right, right_path));
                    }
                }
            }
        }

        table
    }

    /// Serializes the tree depth-first, pre-order: `0` for an internal node,
    /// `1` followed by the leaf's channel bytes (MSB-first per channel).
    pub fn serialize(&self, writer: &mut BitWriter) {
        if let Some(root) = self.root {
            self.serialize_node(root, writer);
        }
    }

    /// Writes a leading presence bit (1 = a tree follows, 0 = none), then the
    /// tree itself if present. An empty tree serializes to zero bits on its
    /// own, which would otherwise leave a reader with no way to tell "no
    /// tree" from "haven't read enough of the tree yet".
    pub fn serialize_framed(&self, writer: &mut BitWriter) {
        writer.write_bit(if self.is_empty() { 0 } else { 1 });
        self.serialize(writer);
    }

    /// Reads the presence bit written by `serialize_framed` and the tree
    /// that follows it, if any.
    pub fn deserialize_framed(reader: &mut BitReader, channels: usize) -> Result<Self> {
        if reader.read_bit()? == 0 {
            Ok(Tree::default())
        } else {
            Tree::deserialize(reader, channels)
        }
    }

    fn serialize_node(&self, index: usize, writer: &mut BitWriter) {
        let mut stack = vec![index];

        // an explicit stack keeps this from recursing to the tree's depth (up to 256)
        while let Some(index) = stack.pop() {
            match &self.nodes[index] {
                Node::Leaf(value) => {
                    writer.write_bit(1);
                    writer.write_bytes(value);
                }

                Node::Internal { left, right } => {
                    writer.write_bit(0);
                    // push right first so left is processed (and written) first
                    stack.push(*right);
                    stack.push(*left);
                }
            }
        }
    }

    /// Rebuilds a tree from its serialized bits, given the channel count.
    /// Walks an explicit stack of pending child slots instead of recursing,
    /// so a maximally unbalanced 256-leaf tree doesn't blow the call stack.
    pub fn deserialize(reader: &mut BitReader, channels: usize) -> Result<Self> {
        enum Slot { Root, Left(usize), Right(usize) }

        let mut tree = Tree::default();
        let mut stack = vec![Slot::Root];
        let mut root = None;

        while let Some(slot) = stack.pop() {
            let tag = reader.read_bit()?;

            let node_index = if tag == 1 {
                let bytes = reader.read_bytes(channels)?;
                tree.nodes.push(Node::Leaf(Pixel::from_slice(&bytes)));
                tree.nodes.len() - 1
            } else {
                tree.nodes.push(Node::Internal { left: usize::MAX, right: usize::MAX });
                let index = tree.nodes.len() - 1;
                stack.push(Slot::Right(index));
                stack.push(Slot::Left(index));
                index
            };

            match slot {
                Slot::Root => root = Some(node_index),
                Slot::Left(parent) => {
                    if let Node::Internal { left, .. } = &mut tree.nodes[parent] { *left = node_index; }
                }
                Slot::Right(parent) => {
                    if let Node::Internal { right, .. } = &mut tree.nodes[parent] { *right = node_index; }
                }
            }
        }

        tree.root = root;
        Ok(tree)
    }

    /// Walks the tree bit by bit (as a decoder does to resolve a Huffman
    /// code whose length isn't known ahead of time) and returns the leaf value.
    pub fn decode_one(&self, reader: &mut BitReader) -> Result<Pixel> {
        let mut index = self.root.ok_or_else(|| Error::invalid("no huffman tree to decode against"))?;

        loop {
            match &self.nodes[index] {
                Node::Leaf(value) => return Ok(value.clone()),
                Node::Internal { left, right } => {
                    index = if reader.read_bit()? == 0 { *left } else { *right };
                }
            }
        }
    }
}

/// A heap entry: pairs a frequency-ordered node with an insertion sequence
/// number so that equal-frequency ties are broken deterministically by
/// insertion order (see DESIGN.md's resolution of the "huffman ordering"
/// open question) rather than left to whatever order a `BinaryHeap` happens
/// to produce.
struct HeapEntry {
    frequency: u64,
    sequence: u64,
    node_index: usize,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.frequency == other.frequency && self.sequence == other.sequence
    }
}
impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse both fields so the lowest
        // frequency (and, on a tie, the earliest-inserted entry) pops first.
        other.frequency.cmp(&self.frequency)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}
impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Builds a Huffman tree from the frequency map's top `MAX_LEAVES` entries
/// with count >= 2, breaking truncation ties by `ordering_key`. Returns an
/// empty tree if fewer than one qualifying entry exists.
pub fn build(frequencies: &FrequencyMap) -> Tree {
    let mut entries: Vec<(&Pixel, u32)> = frequencies.iter()
        .filter(|(_, &count)| count >= MIN_FREQUENCY)
        .map(|(pixel, &count)| (pixel, count))
        .collect();

    if entries.is_empty() {
        return Tree::default();
    }

    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| ordering_key(a.0).cmp(&ordering_key(b.0))));
    entries.truncate(MAX_LEAVES);

    let mut tree = Tree::default();
    let mut heap = BinaryHeap::new();
    let mut sequence = 0_u64;

    let mut push_leaf = |tree: &mut Tree, heap: &mut BinaryHeap<HeapEntry>, sequence: &mut u64, value: Pixel, frequency: u32| {
        tree.nodes.push(Node::Leaf(value));
        let node_index = tree.nodes.len() - 1;
        heap.push(HeapEntry { frequency: frequency as u64, sequence: *sequence, node_index });
        *sequence += 1;
    };

    if entries.len() == 1 {
        // a single qualifying value is pushed twice so the tree has two leaves
        let (value, frequency) = entries[0].clone();
        push_leaf(&mut tree, &mut heap, &mut sequence, value.clone(), frequency);
        push_leaf(&mut tree, &mut heap, &mut sequence, value.clone(), frequency);
    } else {
        for (value, frequency) in entries {
            push_leaf(&mut tree, &mut heap, &mut sequence, value.clone(), frequency);
        }
    }

    while heap.len() > 1 {
        let left = heap.pop().unwrap();
        let right = heap.pop().unwrap();

        tree.nodes.push(Node::Internal { left: left.node_index, right: right.node_index });
        let node_index = tree.nodes.len() - 1;

        heap.push(HeapEntry {
            frequency: left.frequency + right.frequency,
            sequence,
            node_index,
        });
        sequence += 1;
    }

    tree.root = heap.pop().map(|entry| entry.node_index);
    tree
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::pixel::pixel3;

    fn frequencies(entries: &[(Pixel, u32)]) -> FrequencyMap {
        entries.iter().cloned().collect()
    }

    #[test]
    fn empty_below_threshold_yields_empty_tree() {
        let freq = frequencies(&[(pixel3(1, 1, 1), 1)]);
        assert!(build(&freq).is_empty());
    }

    #[test]
    fn single_qualifying_value_gets_one_bit_code() {
        let freq = frequencies(&[(pixel3(1, 1, 1), 5)]);
        let tree = build(&freq);
        let codes = tree.codes();

        assert_eq!(codes.len(), 1);
        assert_eq!(codes[&pixel3(1, 1, 1)].len(), 1);
    }

    #[test]
    fn codes_are_prefix_free() {
        let freq = frequencies(&[
            (pixel3(1, 0, 0), 10),
            (pixel3(0, 1, 0), 7),
            (pixel3(0, 0, 1), 4),
            (pixel3(1, 1, 0), 1), // below threshold, excluded
        ]);

        let tree = build(&freq);
        let codes = tree.codes();
        assert_eq!(codes.len(), 3);

        let all: Vec<&Vec<u8>> = codes.values().collect();
        for (i, a) in all.iter().enumerate() {
            for (j, b) in all.iter().enumerate() {
                if i != j {
                    assert!(!b.starts_with(a.as_slice()), "code {:?} is a prefix of {:?}", a, b);
                }
            }
        }
    }

    #[test]
    fn tree_round_trips_through_serialization() {
        let freq = frequencies(&[
            (pixel3(1, 0, 0), 10),
            (pixel3(0, 1, 0), 7),
            (pixel3(0, 0, 1), 4),
        ]);

        let tree = build(&freq);
        let mut writer = BitWriter::new();
        tree.serialize(&mut writer);
        let bytes = writer.finish();

        let mut reader = BitReader::new(&bytes);
        let restored = Tree::deserialize(&mut reader, 3).unwrap();

        assert_eq!(tree.codes(), restored.codes());
    }

    #[test]
    fn framed_round_trip_distinguishes_absence_from_presence() {
        let empty = Tree::default();
        let mut writer = BitWriter::new();
        empty.serialize_framed(&mut writer);
        let bytes = writer.finish();
        assert_eq!(bytes, vec![0]); // one presence bit, padded

        let mut reader = BitReader::new(&bytes);
        let restored = Tree::deserialize_framed(&mut reader, 3).unwrap();
        assert!(restored.is_empty());

        let freq = frequencies(&[(pixel3(1, 0, 0), 10), (pixel3(0, 1, 0), 7)]);
        let tree = build(&freq);
        let mut writer = BitWriter::new();
        tree.serialize_framed(&mut writer);
        let bytes = writer.finish();

        let mut reader = BitReader::new(&bytes);
        let restored = Tree::deserialize_framed(&mut reader, 3).unwrap();
        assert_eq!(tree.codes(), restored.codes());
    }

    #[test]
    fn truncates_to_256_most_frequent() {
        let mut entries: Vec<(Pixel, u32)> = (0 .. 300_u32)
            .map(|i| (pixel3((i % 256) as u8, (i / 256) as u8, 0), 300 - i))
            .collect();
        entries.dedup_by_key(|(p, _)| p.clone());

        let freq = frequencies(&entries);
        let tree = build(&freq);
        assert_eq!(tree.codes().len(), MAX_LEAVES.min(freq.len()));
    }
}
