//! Candidate matches and the priority discipline between them.
//!
//! The scanner probes six candidate classes in a fixed order. Classes
//! are never compared explicitly: a candidate offered later replaces
//! the current best only when it starts strictly earlier in the text.
//! Because classes are probed in priority order and patterns within a
//! class in declaration order, "strictly earlier wins" encodes the full
//! total order (class priority, then position, then declaration order).

use memchr::memmem;
use scroll_config::GlyphMapping;

/// What happens when a candidate wins the current scan step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MatchAction<'a> {
    /// Class 1: make this font set active, clearing the or-flag.
    Activate(usize),
    /// Class 2: make this font set active with the or-flag set.
    ActivateOr(usize),
    /// Class 3: make this font set the default set.
    SetDefault(usize),
    /// Classes 4-6: emit a glyph owned by `font`.
    Glyph {
        font: usize,
        mapping: &'a GlyphMapping,
        /// Occurrence-level or-mask; only active-lookup matches under
        /// the or-flag carry one.
        or: Option<u8>,
    },
}

/// A pattern match at an absolute byte position in the scroll text.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Candidate<'a> {
    pub pos: usize,
    pub len: usize,
    pub action: MatchAction<'a>,
}

/// Tracks the best candidate seen so far during one scan step.
#[derive(Default)]
pub(crate) struct BestCandidate<'a> {
    best: Option<Candidate<'a>>,
}

impl<'a> BestCandidate<'a> {
    /// Accept `candidate` only if it starts strictly before the current
    /// best. Equal positions never displace an earlier offer.
    pub fn offer(&mut self, candidate: Candidate<'a>) {
        if self.best.map_or(true, |best| candidate.pos < best.pos) {
            self.best = Some(candidate);
        }
    }

    pub fn into_inner(self) -> Option<Candidate<'a>> {
        self.best
    }
}

/// Leftmost occurrence of `pattern` at or after `cursor`, as an
/// absolute byte position.
pub(crate) fn find_from(text: &str, cursor: usize, pattern: &str) -> Option<usize> {
    memmem::find(text.as_bytes().get(cursor..)?, pattern.as_bytes()).map(|pos| cursor + pos)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test assertions use unwrap for clarity"
)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn find_from_is_absolute() {
        assert_eq!(find_from("abcabc", 0, "bc"), Some(1));
        assert_eq!(find_from("abcabc", 2, "bc"), Some(4));
        assert_eq!(find_from("abcabc", 5, "bc"), None);
    }

    #[test]
    fn find_from_past_end_is_none() {
        assert_eq!(find_from("ab", 2, "a"), None);
        assert_eq!(find_from("ab", 7, "a"), None);
    }

    #[test]
    fn earlier_position_displaces_best() {
        let mut best = BestCandidate::default();
        best.offer(Candidate {
            pos: 4,
            len: 1,
            action: MatchAction::Activate(0),
        });
        best.offer(Candidate {
            pos: 2,
            len: 1,
            action: MatchAction::Activate(1),
        });
        let winner = best.into_inner().unwrap();
        assert_eq!(winner.pos, 2);
        assert_eq!(winner.action, MatchAction::Activate(1));
    }

    #[test]
    fn equal_position_never_displaces() {
        let mut best = BestCandidate::default();
        best.offer(Candidate {
            pos: 3,
            len: 2,
            action: MatchAction::Activate(0),
        });
        best.offer(Candidate {
            pos: 3,
            len: 5,
            action: MatchAction::SetDefault(1),
        });
        let winner = best.into_inner().unwrap();
        assert_eq!(winner.action, MatchAction::Activate(0));
        assert_eq!(winner.len, 2);
    }
}
