/// Concatenation buffer for one in-flight streamed reply.
///
/// Appends are kept in arrival order with no delimiter, reordering or
/// deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamAccumulator {
    text: String,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.text.clear();
    }

    pub fn append(&mut self, fragment: &str) {
        self.text.push_str(fragment);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::StreamAccumulator;

    #[test]
    fn concatenation_ignores_chunk_boundaries() {
        let whole = "Fed holds rates; markets price a cut in March.";
        for split in 0..=whole.len() {
            if !whole.is_char_boundary(split) {
                continue;
            }
            let mut acc = StreamAccumulator::new();
            acc.append(&whole[..split]);
            acc.append(&whole[split..]);
            assert_eq!(acc.as_str(), whole);
        }
    }

    #[test]
    fn keeps_repeated_fragments() {
        let mut acc = StreamAccumulator::new();
        acc.append("ha");
        acc.append("ha");
        acc.append("");
        assert_eq!(acc.as_str(), "haha");

        acc.reset();
        assert!(acc.is_empty());
    }
}
