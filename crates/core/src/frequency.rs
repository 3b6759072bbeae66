//! Byte frequency counting.
//!
//! Counts the occurrence of each byte value (0-255) in an input buffer.

/// Occurrence count for every byte value.
///
/// An empty input yields an empty table; rejecting it is left to the tree
/// builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    /// Count of each byte value (index = byte value).
    counts: [u64; 256],
}

impl FrequencyTable {
    /// Create a new, zeroed frequency table.
    pub fn new() -> Self {
        Self { counts: [0u64; 256] }
    }

    /// Count byte frequencies in `input`.
    pub fn from_bytes(input: &[u8]) -> Self {
        let mut table = Self::new();
        table.count(input);
        table
    }

    /// Build a table from explicit (symbol, count) pairs.
    ///
    /// Later pairs for the same symbol add to earlier ones.
    pub fn from_counts<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u8, u64)>,
    {
        let mut table = Self::new();
        for (symbol, count) in pairs {
            table.counts[symbol as usize] += count;
        }
        table
    }

    /// Add the bytes of `input` to the running counts.
    pub fn count(&mut self, input: &[u8]) {
        for &byte in input {
            self.counts[byte as usize] += 1;
        }
    }

    /// Occurrences of `symbol`.
    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Sum of all counts (the input length).
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of byte values with a non-zero count.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Non-zero entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as u8, count))
    }

    /// Shannon entropy of the distribution in bits per symbol.
    ///
    /// Returns 0.0 for an empty table.
    pub fn entropy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let total = total as f64;
        self.iter()
            .map(|(_, count)| {
                let p = count as f64 / total;
                -p * p.log2()
            })
            .sum()
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let table = FrequencyTable::from_bytes(b"");
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
        assert_eq!(table.distinct(), 0);
        assert_eq!(table.iter().count(), 0);
        assert_eq!(table.entropy(), 0.0);
    }

    #[test]
    fn test_counts() {
        let table = FrequencyTable::from_bytes(b"abracadabra");
        assert_eq!(table.get(b'a'), 5);
        assert_eq!(table.get(b'b'), 2);
        assert_eq!(table.get(b'r'), 2);
        assert_eq!(table.get(b'c'), 1);
        assert_eq!(table.get(b'd'), 1);
        assert_eq!(table.get(b'z'), 0);
        assert_eq!(table.total(), 11);
        assert_eq!(table.distinct(), 5);
    }

    #[test]
    fn test_iter_ascending() {
        let table = FrequencyTable::from_bytes(&[200, 3, 3, 0, 200, 200]);
        let entries: Vec<_> = table.iter().collect();
        assert_eq!(entries, vec![(0, 1), (3, 2), (200, 3)]);
    }

    #[test]
    fn test_incremental_count() {
        let mut table = FrequencyTable::from_bytes(b"aa");
        table.count(b"ab");
        assert_eq!(table, FrequencyTable::from_counts([(b'a', 3), (b'b', 1)]));
    }

    #[test]
    fn test_entropy() {
        let uniform = FrequencyTable::from_bytes(b"ABABABAB");
        assert!((uniform.entropy() - 1.0).abs() < 1e-12);

        let single = FrequencyTable::from_bytes(b"ZZZZZ");
        assert_eq!(single.entropy(), 0.0);
    }
}
