// ============================================================
// Layer 3 — Labelled Dataset
// ============================================================
// Parallel feature and label collections. `features[i]` always
// belongs to `labels[i]`: every mutation below touches both
// vectors at the same index, so the pairing cannot drift.

/// A single owned (features, label) pair.
/// This is what travels over the online-learning stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    pub features: Vec<f32>,
    pub label:    usize,
}

impl Example {
    pub fn new(features: Vec<f32>, label: usize) -> Self {
        Self { features, label }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabeledDataset {
    features: Vec<Vec<f32>>,
    labels:   Vec<usize>,
}

impl LabeledDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            features: Vec::with_capacity(capacity),
            labels:   Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, features: Vec<f32>, label: usize) {
        self.features.push(features);
        self.labels.push(label);
    }

    /// Move every example of `other` onto the end of `self`, keeping order.
    pub fn append(&mut self, other: &mut LabeledDataset) {
        self.features.append(&mut other.features);
        self.labels.append(&mut other.labels);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Length of the first feature vector, or 0 for an empty dataset.
    pub fn dimension(&self) -> usize {
        self.features.first().map_or(0, Vec::len)
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn example(&self, index: usize) -> Option<(&[f32], usize)> {
        Some((self.features.get(index)?.as_slice(), *self.labels.get(index)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[f32], usize)> {
        self.features
            .iter()
            .map(Vec::as_slice)
            .zip(self.labels.iter().copied())
    }

    /// Swap two examples. Features and labels move together.
    pub fn swap(&mut self, a: usize, b: usize) {
        self.features.swap(a, b);
        self.labels.swap(a, b);
    }

    /// Split into `[0, at)` and `[at, len)`. `at` is clamped to `len`.
    pub fn split_at(mut self, at: usize) -> (LabeledDataset, LabeledDataset) {
        let at = at.min(self.len());
        let tail = LabeledDataset {
            features: self.features.split_off(at),
            labels:   self.labels.split_off(at),
        };
        (self, tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> LabeledDataset {
        let mut ds = LabeledDataset::new();
        for i in 0..n {
            ds.push(vec![i as f32], i);
        }
        ds
    }

    #[test]
    fn test_swap_moves_pairs_together() {
        let mut ds = numbered(3);
        ds.swap(0, 2);
        assert_eq!(ds.example(0), Some((&[2.0f32][..], 2)));
        assert_eq!(ds.example(2), Some((&[0.0f32][..], 0)));
    }

    #[test]
    fn test_split_at_clamps() {
        let (head, tail) = numbered(4).split_at(10);
        assert_eq!(head.len(), 4);
        assert!(tail.is_empty());
    }

    #[test]
    fn test_append_keeps_order() {
        let mut a = numbered(2);
        let mut b = numbered(3);
        a.append(&mut b);
        assert_eq!(a.labels(), &[0, 1, 0, 1, 2]);
        assert!(b.is_empty());
    }

    #[test]
    fn test_dimension_of_empty_dataset() {
        assert_eq!(LabeledDataset::new().dimension(), 0);
    }
}
