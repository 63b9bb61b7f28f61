use bitflags::bitflags;

bitflags! {
    /// Flags consumed by automaton construction and by the scan loop.
    ///
    /// `RIGHT_TO_LEFT` implies `REVERSE_PATTERN`: a right-to-left scan runs
    /// the reversed automaton backwards from each candidate position.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PatternOptions: u8 {
        const EXACT_BEGIN = 0b0001;
        const EXACT_END = 0b0010;
        const REVERSE_PATTERN = 0b0100;
        const RIGHT_TO_LEFT = 0b1100;
    }
}

#[cfg(test)]
mod tests {
    use super::PatternOptions;

    #[test]
    fn right_to_left_implies_reverse_pattern() {
        assert!(PatternOptions::RIGHT_TO_LEFT.contains(PatternOptions::REVERSE_PATTERN));
        assert!(!PatternOptions::REVERSE_PATTERN.contains(PatternOptions::RIGHT_TO_LEFT));
    }
}
