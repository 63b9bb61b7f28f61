/// Dense automaton state identifier, allocated sequentially during
/// construction.
pub type StateId = u32;

/// Numeric identifier of a capture group; 0 is the whole-match group.
pub type CaptureId = u16;

/// A captured sub-range of the input, as `(start, length)`.
pub type CaptureSpan = (usize, usize);
