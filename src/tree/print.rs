//! Level-order printing

/// Receives node hashes during a level-order walk
///
/// See [`MerkleTree::print_to`](super::MerkleTree::print_to).
pub trait Printer<H> {
    fn emit(&mut self, hash: &H);

    fn new_line(&mut self);
}

/// Collects each level as a row of hex-encoded hashes
#[derive(Debug, Default)]
pub struct HexPrinter {
    rows: Vec<Vec<String>>,
}

impl HexPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }
}

impl<H: AsRef<[u8]>> Printer<H> for HexPrinter {
    fn emit(&mut self, hash: &H) {
        let encoded = hex::encode(hash.as_ref());
        match self.rows.last_mut() {
            Some(row) => row.push(encoded),
            None => self.rows.push(vec![encoded]),
        }
    }

    fn new_line(&mut self) {
        self.rows.push(Vec::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Blake3, Hash, Hashable};
    use crate::MerkleTree;

    /// Records the call sequence as text
    #[derive(Default)]
    struct Transcript(String);

    impl Printer<Hash> for Transcript {
        fn emit(&mut self, hash: &Hash) {
            self.0.push_str(&hash.short());
            self.0.push(' ');
        }

        fn new_line(&mut self) {
            self.0.push('\n');
        }
    }

    #[test]
    fn test_print_level_order() {
        let tree = MerkleTree::build(["A", "B", "C", "D"], &Blake3);
        let mut transcript = Transcript::default();
        tree.print_to(&mut transcript);

        let lines: Vec<&str> = transcript.0.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], format!("{} ", tree.root_hash().unwrap().short()));
        assert_eq!(lines[1].split_whitespace().count(), 2);
        assert_eq!(lines[2].split_whitespace().count(), 4);
        assert!(!transcript.0.ends_with('\n'));
    }

    #[test]
    fn test_hex_printer_rows() {
        let tree = MerkleTree::build(0u32..5, &Blake3);
        let mut printer = HexPrinter::new();
        tree.print_to(&mut printer);

        let widths: Vec<usize> = printer.rows().iter().map(Vec::len).collect();
        assert_eq!(widths, vec![1, 2, 3, 5]);

        let rows = printer.into_rows();
        assert_eq!(rows[3][0], 0u32.hash().to_hex());
    }

    #[test]
    fn test_empty_tree_prints_nothing() {
        let tree: MerkleTree<u32, Hash> = MerkleTree::build(Vec::new(), &Blake3);
        let mut printer = HexPrinter::new();
        tree.print_to(&mut printer);
        assert!(printer.rows().is_empty());
    }
}
