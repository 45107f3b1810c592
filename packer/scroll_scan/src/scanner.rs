//! The stateful greedy scan loop.

use rustc_hash::FxHashMap;
use scroll_config::{GlyphMapping, ScrollConfig};
use tracing::debug;

use crate::candidate::{find_from, BestCandidate, Candidate, MatchAction};
use crate::token::{DedupEntry, GlyphToken, ScrollToken};
use crate::ScanError;

/// Everything one scan produces: the ordered token stream and the
/// dedup table assigning stable byte codes to distinct `(tag, set)`
/// pairs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanOutput {
    pub tokens: Vec<ScrollToken>,
    pub dedup: Vec<DedupEntry>,
}

/// Mutable scan state, owned by one [`scan`] call.
///
/// `active` and `default` are indices into `config.fonts`; both start
/// at the first declared font set. The or-flag belongs to the active
/// set and is cleared by every plain activation.
struct ScanState {
    active: usize,
    default: usize,
    or_flag: bool,
    cursor: usize,
}

/// Resolve `text` against `config` into tokens and a dedup table.
///
/// A single left-to-right pass; fails with
/// [`ScanError::UndefinedCharacter`] when no candidate starts at the
/// cursor, and with [`ScanError::CapacityExceeded`] when the distinct
/// glyph count plus `begin` leaves the 8-bit code space. The synthetic
/// zero terminator (when enabled) is appended after the capacity check
/// and never counts against it.
pub fn scan(text: &str, config: &ScrollConfig) -> Result<ScanOutput, ScanError> {
    Scanner::new(text, config).run()
}

struct Scanner<'a> {
    text: &'a str,
    config: &'a ScrollConfig,
    state: ScanState,
    dedup: Vec<DedupEntry>,
    /// (tag, set name) -> index into `dedup`.
    index: FxHashMap<(String, String), usize>,
    tokens: Vec<ScrollToken>,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str, config: &'a ScrollConfig) -> Self {
        Self {
            text,
            config,
            state: ScanState {
                active: 0,
                default: 0,
                or_flag: false,
                cursor: 0,
            },
            dedup: Vec::new(),
            index: FxHashMap::default(),
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<ScanOutput, ScanError> {
        debug!(
            active = %self.config.fonts[self.state.active].set,
            "scan start"
        );
        while self.state.cursor < self.text.len() {
            let best = self.best_candidate();
            match best {
                Some(candidate) if candidate.pos == self.state.cursor => {
                    self.apply(candidate)?;
                }
                _ => return Err(self.undefined_character()),
            }
        }

        let begin = self.config.parameters.begin;
        if self.dedup.len() + usize::from(begin) > 256 {
            return Err(ScanError::CapacityExceeded {
                unique: self.dedup.len(),
                begin,
            });
        }
        debug!(unique = self.dedup.len(), "scan complete");

        if self.config.parameters.zero {
            self.tokens.push(ScrollToken::Zero);
        }
        Ok(ScanOutput {
            tokens: self.tokens,
            dedup: self.dedup,
        })
    }

    /// Probe the six candidate classes in priority order and return the
    /// overall best match at or after the cursor.
    fn best_candidate(&self) -> Option<Candidate<'a>> {
        let mut best = BestCandidate::default();
        let cursor = self.state.cursor;
        let fonts = &self.config.fonts;

        // Class 1: primary set markers.
        for (i, font) in fonts.iter().enumerate() {
            if let Some(pos) = find_from(self.text, cursor, &font.set) {
                best.offer(Candidate {
                    pos,
                    len: font.set.len(),
                    action: MatchAction::Activate(i),
                });
            }
        }

        // Class 2: or-markers.
        for (i, font) in fonts.iter().enumerate() {
            if let Some(marker) = font.or_marker() {
                if let Some(pos) = find_from(self.text, cursor, marker) {
                    best.offer(Candidate {
                        pos,
                        len: marker.len(),
                        action: MatchAction::ActivateOr(i),
                    });
                }
            }
        }

        // Class 3: default markers.
        for (i, font) in fonts.iter().enumerate() {
            if let Some(marker) = font.default_marker() {
                if let Some(pos) = find_from(self.text, cursor, marker) {
                    best.offer(Candidate {
                        pos,
                        len: marker.len(),
                        action: MatchAction::SetDefault(i),
                    });
                }
            }
        }

        // Class 4: tags of the active lookup. Only these may carry an
        // occurrence-level or-mask, and only while the or-flag is set.
        let active_lookup = fonts[self.state.active].lookup.as_str();
        self.offer_lookup_tags(&mut best, active_lookup, self.state.active, self.state.or_flag);

        // Class 5: tags of the default lookup, unless it is the active
        // lookup (class 4 already offered those positions).
        let default_lookup = fonts[self.state.default].lookup.as_str();
        if default_lookup != active_lookup {
            self.offer_lookup_tags(&mut best, default_lookup, self.state.default, false);
        }

        // Class 6: tags of every remaining lookup, owned by the first
        // declared font set bound to that lookup. A table no set is
        // bound to can never resolve an owner and is skipped.
        for table in &self.config.lookups {
            if table.lookup == active_lookup || table.lookup == default_lookup {
                continue;
            }
            if let Some((owner, _)) = self.config.font_for_lookup(&table.lookup) {
                self.offer_lookup_tags(&mut best, &table.lookup, owner, false);
            }
        }

        best.into_inner()
    }

    /// Offer every non-empty tag of `lookup` as a glyph candidate owned
    /// by font set `font`. `with_or` propagates each mapping's or-mask
    /// into the candidate.
    fn offer_lookup_tags(
        &self,
        best: &mut BestCandidate<'a>,
        lookup: &str,
        font: usize,
        with_or: bool,
    ) {
        let Some(table) = self.config.lookup_named(lookup) else {
            return;
        };
        for mapping in &table.mapping {
            if mapping.tag.is_empty() {
                continue;
            }
            if let Some(pos) = find_from(self.text, self.state.cursor, &mapping.tag) {
                let or = if with_or { mapping.or } else { None };
                best.offer(Candidate {
                    pos,
                    len: mapping.tag.len(),
                    action: MatchAction::Glyph { font, mapping, or },
                });
            }
        }
    }

    fn apply(&mut self, candidate: Candidate<'a>) -> Result<(), ScanError> {
        match candidate.action {
            MatchAction::Activate(font) => {
                debug!(set = %self.config.fonts[font].set, "active font set changed");
                self.state.active = font;
                self.state.or_flag = false;
            }
            MatchAction::ActivateOr(font) => {
                debug!(set = %self.config.fonts[font].set, "active font set changed with \"or\"");
                self.state.active = font;
                self.state.or_flag = true;
            }
            MatchAction::SetDefault(font) => {
                debug!(set = %self.config.fonts[font].set, "default font set changed");
                self.state.default = font;
            }
            MatchAction::Glyph { font, mapping, or } => {
                self.emit_glyph(font, mapping, or)?;
            }
        }
        self.state.cursor = candidate.pos + candidate.len;
        Ok(())
    }

    /// Emit a token for one glyph occurrence, creating its dedup entry
    /// on first appearance.
    fn emit_glyph(
        &mut self,
        font: usize,
        mapping: &GlyphMapping,
        or: Option<u8>,
    ) -> Result<(), ScanError> {
        let set = &self.config.fonts[font];
        let key = (mapping.tag.clone(), set.set.clone());

        let code = if let Some(&slot) = self.index.get(&key) {
            debug!(tag = %mapping.tag, set = %set.set, "existing tag found");
            self.dedup[slot].code
        } else {
            // Codes are the table length at insertion. The end-of-scan
            // capacity check reports the usual overflow; this guard only
            // trips when the text holds more than 256 distinct glyphs,
            // which no begin value could accommodate either.
            let Ok(code) = u8::try_from(self.dedup.len()) else {
                return Err(ScanError::CapacityExceeded {
                    unique: self.dedup.len() + 1,
                    begin: self.config.parameters.begin,
                });
            };
            debug!(tag = %mapping.tag, set = %set.set, code, "new tag found");
            self.index.insert(key, self.dedup.len());
            self.dedup.push(DedupEntry {
                code,
                tag: mapping.tag.clone(),
                set: set.set.clone(),
                file: set.file.clone(),
                offsets: mapping.offsets.clone(),
                or,
            });
            code
        };

        self.tokens.push(ScrollToken::Glyph(GlyphToken {
            index: self.tokens.len(),
            code,
            tag: mapping.tag.clone(),
            set: set.set.clone(),
            file: set.file.clone(),
            offsets: mapping.offsets.clone(),
            or,
        }));
        Ok(())
    }

    /// Build the undefined-character report: the offending character, a
    /// window of up to five characters on each side, and the character
    /// position. The cursor always sits on a character boundary because
    /// it only ever advances by whole matched patterns.
    fn undefined_character(&self) -> ScanError {
        let cursor = self.state.cursor;
        let character = self.text[cursor..].chars().next().unwrap_or('\u{0}');

        let mut context: String = {
            let before: Vec<char> = self.text[..cursor].chars().rev().take(5).collect();
            before.into_iter().rev().collect()
        };
        context.extend(self.text[cursor..].chars().take(6));

        ScanError::UndefinedCharacter {
            character,
            context,
            position: self.text[..cursor].chars().count(),
            byte_offset: cursor,
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test assertions use unwrap for clarity"
)]
mod tests {
    use pretty_assertions::assert_eq;
    use scroll_config::{
        FontSet, GlyphMapping, Language, LookupTable, NumberFormat, Parameters, ScrollConfig,
    };

    use super::*;

    fn params(begin: u8) -> Parameters {
        Parameters {
            width: 1,
            height: 1,
            begin,
            zero: false,
            language: Language::C,
            format: NumberFormat::Hex,
            consolidation: None,
            text_org: None,
            fonts_org: Vec::new(),
        }
    }

    fn font(set: &str, lookup: &str) -> FontSet {
        FontSet {
            set: set.to_string(),
            set_default: None,
            set_or: None,
            file: format!("{lookup}.bin"),
            lookup: lookup.to_string(),
        }
    }

    fn mapping(tag: &str, offset: u32) -> GlyphMapping {
        GlyphMapping {
            tag: tag.to_string(),
            offsets: vec![offset],
            or: None,
        }
    }

    fn table(name: &str, mappings: Vec<GlyphMapping>) -> LookupTable {
        LookupTable {
            lookup: name.to_string(),
            mapping: mappings,
        }
    }

    /// One font set "[", lookup "main" with tags A -> 0 and B -> 1.
    fn single_set_config(begin: u8) -> ScrollConfig {
        ScrollConfig {
            scroll: vec!["unused".to_string()],
            parameters: params(begin),
            fonts: vec![font("[", "main")],
            lookups: vec![table("main", vec![mapping("A", 0), mapping("B", 1)])],
        }
    }

    fn effective_bytes(output: &ScanOutput, begin: u8) -> Vec<u8> {
        output
            .tokens
            .iter()
            .map(|token| token.effective_byte(begin))
            .collect()
    }

    // ─── Dedup codes and token bytes ─────────────────────────────────

    #[test]
    fn assigns_codes_in_first_appearance_order() {
        let config = single_set_config(32);
        let output = scan("AB", &config).unwrap();

        assert_eq!(output.dedup.len(), 2);
        assert_eq!(output.dedup[0].code, 0);
        assert_eq!(output.dedup[0].tag, "A");
        assert_eq!(output.dedup[1].code, 1);
        assert_eq!(output.dedup[1].tag, "B");
        assert_eq!(effective_bytes(&output, 32), vec![32, 33]);
    }

    #[test]
    fn reuses_codes_for_repeated_tags() {
        let config = single_set_config(32);
        let output = scan("AAB", &config).unwrap();

        assert_eq!(output.dedup.len(), 2);
        assert_eq!(output.tokens.len(), 3);
        let codes: Vec<u8> = output
            .tokens
            .iter()
            .map(|t| match t {
                ScrollToken::Glyph(g) => g.code,
                ScrollToken::Zero => unreachable!("zero disabled"),
            })
            .collect();
        assert_eq!(codes, vec![0, 0, 1]);
    }

    #[test]
    fn token_indices_follow_emission_order() {
        let config = single_set_config(0);
        let output = scan("ABBA", &config).unwrap();
        for (i, token) in output.tokens.iter().enumerate() {
            let ScrollToken::Glyph(glyph) = token else {
                unreachable!("zero disabled")
            };
            assert_eq!(glyph.index, i);
        }
    }

    #[test]
    fn codes_equal_dedup_indices() {
        let config = single_set_config(0);
        let output = scan("BABA", &config).unwrap();
        for (i, entry) in output.dedup.iter().enumerate() {
            assert_eq!(usize::from(entry.code), i);
        }
        // First appearance order: B before A.
        assert_eq!(output.dedup[0].tag, "B");
        assert_eq!(output.dedup[1].tag, "A");
    }

    #[test]
    fn scanning_twice_is_identical() {
        let config = single_set_config(5);
        let first = scan("ABAB", &config).unwrap();
        let second = scan("ABAB", &config).unwrap();
        assert_eq!(first, second);
    }

    // ─── Set switching ───────────────────────────────────────────────

    #[test]
    fn set_marker_switches_active_set() {
        let config = ScrollConfig {
            scroll: vec![String::new()],
            parameters: params(0),
            fonts: vec![font("[1", "one"), font("[2", "two")],
            lookups: vec![
                table("one", vec![mapping("A", 0)]),
                table("two", vec![mapping("A", 9)]),
            ],
        };
        // Same tag through two sets dedups into two entries.
        let output = scan("A[2A", &config).unwrap();
        assert_eq!(output.dedup.len(), 2);
        assert_eq!(output.dedup[0].set, "[1");
        assert_eq!(output.dedup[0].offsets, vec![0]);
        assert_eq!(output.dedup[1].set, "[2");
        assert_eq!(output.dedup[1].offsets, vec![9]);
        assert_eq!(output.tokens.len(), 2);
    }

    #[test]
    fn switch_markers_emit_no_tokens() {
        let config = ScrollConfig {
            scroll: vec![String::new()],
            parameters: params(0),
            fonts: vec![font("[1", "one"), font("[2", "two")],
            lookups: vec![
                table("one", vec![mapping("A", 0)]),
                table("two", vec![mapping("X", 1)]),
            ],
        };
        let output = scan("[2[1[2", &config).unwrap();
        assert_eq!(output.tokens, Vec::new());
        assert_eq!(output.dedup, Vec::new());
    }

    #[test]
    fn default_marker_changes_default_not_active() {
        // Active stays on set 1; "X" lives only in set 2's lookup and is
        // reached through the default set after the default switch.
        let mut second = font("[2", "two");
        second.set_default = Some("[d".to_string());
        let config = ScrollConfig {
            scroll: vec![String::new()],
            parameters: params(0),
            fonts: vec![font("[1", "one"), second],
            lookups: vec![
                table("one", vec![mapping("A", 0)]),
                table("two", vec![mapping("X", 7)]),
            ],
        };
        let output = scan("[dXA", &config).unwrap();
        assert_eq!(output.dedup.len(), 2);
        // X resolved through the default set (class 5), owned by set 2.
        assert_eq!(output.dedup[0].tag, "X");
        assert_eq!(output.dedup[0].set, "[2");
        // A still resolves through the unchanged active set.
        assert_eq!(output.dedup[1].tag, "A");
        assert_eq!(output.dedup[1].set, "[1");
    }

    // ─── Priority discipline ─────────────────────────────────────────

    #[test]
    fn set_marker_beats_tag_at_equal_position() {
        // "<" is a switch marker and "<<" a tag; both start at 0. The
        // marker class is probed first, so the tag never matches.
        let config = ScrollConfig {
            scroll: vec![String::new()],
            parameters: params(0),
            fonts: vec![font("<", "main")],
            lookups: vec![table("main", vec![mapping("<<", 0)])],
        };
        let output = scan("<<", &config).unwrap();
        assert_eq!(output.tokens, Vec::new());
        assert_eq!(output.dedup, Vec::new());
    }

    #[test]
    fn earlier_position_beats_higher_class() {
        // The tag "A" occurs before the switch marker "[2": position
        // wins over class priority.
        let config = ScrollConfig {
            scroll: vec![String::new()],
            parameters: params(0),
            fonts: vec![font("[1", "one"), font("[2", "two")],
            lookups: vec![
                table("one", vec![mapping("A", 0)]),
                table("two", vec![mapping("X", 1)]),
            ],
        };
        let output = scan("A[2X", &config).unwrap();
        assert_eq!(output.dedup[0].tag, "A");
        assert_eq!(output.dedup[0].set, "[1");
        assert_eq!(output.dedup[1].tag, "X");
        assert_eq!(output.dedup[1].set, "[2");
    }

    #[test]
    fn declaration_order_breaks_ties_within_a_class() {
        // Two sets whose markers both start at position 0; the first
        // declared one wins ("=" vs "=="). The rest of the text then
        // resolves under set "=".
        let config = ScrollConfig {
            scroll: vec![String::new()],
            parameters: params(0),
            fonts: vec![font("=", "one"), font("==", "two")],
            lookups: vec![
                table("one", vec![mapping("A", 0)]),
                table("two", vec![mapping("A", 1)]),
            ],
        };
        let output = scan("==A", &config).unwrap();
        // Both "=" markers consumed one at a time by the first set.
        assert_eq!(output.dedup.len(), 1);
        assert_eq!(output.dedup[0].set, "=");
        assert_eq!(output.dedup[0].offsets, vec![0]);
    }

    #[test]
    fn any_lookup_tag_resolves_when_active_and_default_miss() {
        // "X" is defined only in the second set's lookup; no switch ever
        // happens, so it resolves through class 6 with set 2 as owner.
        let config = ScrollConfig {
            scroll: vec![String::new()],
            parameters: params(0),
            fonts: vec![font("[1", "one"), font("[2", "two")],
            lookups: vec![
                table("one", vec![mapping("A", 0)]),
                table("two", vec![mapping("X", 3)]),
            ],
        };
        let output = scan("AXA", &config).unwrap();
        assert_eq!(output.dedup.len(), 2);
        assert_eq!(output.dedup[1].tag, "X");
        assert_eq!(output.dedup[1].set, "[2");
        assert_eq!(output.tokens.len(), 3);
    }

    // ─── Or-flag semantics ───────────────────────────────────────────

    fn or_config() -> ScrollConfig {
        let mut first = font("[", "main");
        first.set_or = Some("*".to_string());
        ScrollConfig {
            scroll: vec![String::new()],
            parameters: params(32),
            fonts: vec![first],
            lookups: vec![table(
                "main",
                vec![
                    GlyphMapping {
                        tag: "X".to_string(),
                        offsets: vec![0],
                        or: Some(128),
                    },
                    mapping("A", 1),
                ],
            )],
        }
    }

    #[test]
    fn or_marker_arms_the_or_mask() {
        let config = or_config();
        let output = scan("*X", &config).unwrap();
        let ScrollToken::Glyph(glyph) = &output.tokens[0] else {
            unreachable!("zero disabled")
        };
        assert_eq!(glyph.or, Some(128));
        assert_eq!(output.tokens[0].effective_byte(32), 128 | 32);
        // The dedup entry fixes the creating occurrence's or.
        assert_eq!(output.dedup[0].or, Some(128));
    }

    #[test]
    fn same_tag_without_or_marker_has_no_mask() {
        let config = or_config();
        let output = scan("X", &config).unwrap();
        let ScrollToken::Glyph(glyph) = &output.tokens[0] else {
            unreachable!("zero disabled")
        };
        assert_eq!(glyph.or, None);
        assert_eq!(output.tokens[0].effective_byte(32), 32);
    }

    #[test]
    fn plain_set_marker_clears_or_flag() {
        let config = or_config();
        let output = scan("*X[X", &config).unwrap();
        let masks: Vec<Option<u8>> = output
            .tokens
            .iter()
            .map(|t| match t {
                ScrollToken::Glyph(g) => g.or,
                ScrollToken::Zero => unreachable!("zero disabled"),
            })
            .collect();
        assert_eq!(masks, vec![Some(128), None]);
        // One dedup entry either way; its or stays as created.
        assert_eq!(output.dedup.len(), 1);
        assert_eq!(output.dedup[0].or, Some(128));
    }

    #[test]
    fn or_flag_persists_across_occurrences() {
        let config = or_config();
        let output = scan("*XAX", &config).unwrap();
        let masks: Vec<Option<u8>> = output
            .tokens
            .iter()
            .map(|t| match t {
                ScrollToken::Glyph(g) => g.or,
                ScrollToken::Zero => unreachable!("zero disabled"),
            })
            .collect();
        // "A" has no or in its mapping; the flag stays armed for the
        // second "X".
        assert_eq!(masks, vec![Some(128), None, Some(128)]);
    }

    #[test]
    fn or_flag_ignored_outside_the_active_lookup() {
        // X carries an or-mask in its mapping, but it only ever resolves
        // through the default lookup or another lookup; the armed flag
        // must not reach it there.
        let mut first = font("[", "one");
        first.set_or = Some("*".to_string());
        let mut second = font("]", "two");
        second.set_default = Some("=".to_string());
        let config = ScrollConfig {
            scroll: vec![String::new()],
            parameters: params(0),
            fonts: vec![first, second],
            lookups: vec![
                table("one", vec![mapping("A", 0)]),
                table(
                    "two",
                    vec![GlyphMapping {
                        tag: "X".to_string(),
                        offsets: vec![1],
                        or: Some(64),
                    }],
                ),
            ],
        };

        // Resolved through another lookup: no set switch happened, so X
        // is owned by the second set without its mask.
        let output = scan("*X", &config).unwrap();
        let ScrollToken::Glyph(glyph) = &output.tokens[0] else {
            unreachable!("zero disabled")
        };
        assert_eq!(glyph.set, "]");
        assert_eq!(glyph.or, None);
        assert_eq!(output.dedup[0].or, None);
        assert_eq!(output.tokens[0].effective_byte(0), 0);

        // Resolved through the default lookup after a default switch;
        // the flag stays armed on the active set but does not apply.
        let output = scan("*=X", &config).unwrap();
        let ScrollToken::Glyph(glyph) = &output.tokens[0] else {
            unreachable!("zero disabled")
        };
        assert_eq!(glyph.set, "]");
        assert_eq!(glyph.or, None);
    }

    #[test]
    fn dedup_or_fixed_by_first_occurrence() {
        // First occurrence without the or marker: entry.or is None even
        // though a later occurrence carries a mask.
        let config = or_config();
        let output = scan("X*X", &config).unwrap();
        assert_eq!(output.dedup.len(), 1);
        assert_eq!(output.dedup[0].or, None);
        let masks: Vec<Option<u8>> = output
            .tokens
            .iter()
            .map(|t| match t {
                ScrollToken::Glyph(g) => g.or,
                ScrollToken::Zero => unreachable!("zero disabled"),
            })
            .collect();
        assert_eq!(masks, vec![None, Some(128)]);
    }

    // ─── Zero terminator ─────────────────────────────────────────────

    #[test]
    fn zero_parameter_appends_terminator() {
        let mut config = single_set_config(32);
        config.parameters.zero = true;
        let output = scan("AB", &config).unwrap();
        assert_eq!(output.tokens.len(), 3);
        assert_eq!(output.tokens[2], ScrollToken::Zero);
        assert_eq!(output.tokens[2].effective_byte(32), 0);
        // Never in the dedup table.
        assert_eq!(output.dedup.len(), 2);
    }

    #[test]
    fn zero_appended_even_for_switch_only_text() {
        let mut config = ScrollConfig {
            scroll: vec![String::new()],
            parameters: params(10),
            fonts: vec![font("[1", "one"), font("[2", "two")],
            lookups: vec![
                table("one", vec![mapping("A", 0)]),
                table("two", vec![mapping("X", 1)]),
            ],
        };
        config.parameters.zero = true;
        let output = scan("[2[1", &config).unwrap();
        assert_eq!(output.tokens, vec![ScrollToken::Zero]);
        assert_eq!(output.dedup, Vec::new());
    }

    #[test]
    fn empty_text_scans_to_nothing() {
        let config = single_set_config(0);
        let output = scan("", &config).unwrap();
        assert_eq!(output.tokens, Vec::new());
        assert_eq!(output.dedup, Vec::new());
    }

    // ─── Failures ────────────────────────────────────────────────────

    #[test]
    fn undefined_character_reports_window_and_position() {
        let config = single_set_config(0);
        let err = scan("ABZBA", &config).unwrap_err();
        assert_eq!(
            err,
            ScanError::UndefinedCharacter {
                character: 'Z',
                context: "ABZBA".to_string(),
                position: 2,
                byte_offset: 2,
            }
        );
    }

    #[test]
    fn undefined_character_window_clips_to_text_bounds() {
        let config = single_set_config(0);
        let err = scan("ABABABAB?ABABABAB", &config).unwrap_err();
        let ScanError::UndefinedCharacter {
            character,
            context,
            position,
            ..
        } = err
        else {
            unreachable!("expected undefined character")
        };
        assert_eq!(character, '?');
        assert_eq!(position, 8);
        // Five characters each side of the offending one.
        assert_eq!(context, "BABAB?ABABA");
    }

    #[test]
    fn undefined_character_at_start() {
        let config = single_set_config(0);
        let err = scan("?AB", &config).unwrap_err();
        let ScanError::UndefinedCharacter {
            position, context, ..
        } = err
        else {
            unreachable!("expected undefined character")
        };
        assert_eq!(position, 0);
        assert_eq!(context, "?AB");
    }

    #[test]
    fn undefined_character_with_multibyte_context() {
        let config = single_set_config(0);
        let err = scan("AB\u{142}AB", &config).unwrap_err();
        let ScanError::UndefinedCharacter {
            character,
            position,
            byte_offset,
            ..
        } = err
        else {
            unreachable!("expected undefined character")
        };
        assert_eq!(character, '\u{142}');
        // Character position, not byte offset.
        assert_eq!(position, 2);
        assert_eq!(byte_offset, 2);
    }

    #[test]
    fn trailing_partial_match_is_undefined() {
        // "AB" matched, then a lone half of a two-character tag.
        let config = ScrollConfig {
            scroll: vec![String::new()],
            parameters: params(0),
            fonts: vec![font("[", "main")],
            lookups: vec![table("main", vec![mapping("AB", 0)])],
        };
        let err = scan("ABA", &config).unwrap_err();
        assert!(matches!(
            err,
            ScanError::UndefinedCharacter { character: 'A', position: 2, .. }
        ));
    }

    #[test]
    fn capacity_exceeded_counts_begin() {
        let config = single_set_config(255);
        let err = scan("AB", &config).unwrap_err();
        assert_eq!(
            err,
            ScanError::CapacityExceeded {
                unique: 2,
                begin: 255,
            }
        );
    }

    #[test]
    fn more_than_256_distinct_glyphs_fail_at_creation() {
        // 257 distinct single-character tags. The 257th entry cannot be
        // assigned a byte code, so the scan fails right there; the
        // undefined trailing character is never reached.
        let tags: Vec<String> = (0u32..257)
            .filter_map(|i| char::from_u32(0x100 + i))
            .map(String::from)
            .collect();
        assert_eq!(tags.len(), 257);
        let mappings: Vec<GlyphMapping> = tags
            .iter()
            .map(|tag| GlyphMapping {
                tag: tag.clone(),
                offsets: vec![0],
                or: None,
            })
            .collect();
        let config = ScrollConfig {
            scroll: vec![String::new()],
            parameters: params(0),
            fonts: vec![font("[", "main")],
            lookups: vec![table("main", mappings)],
        };

        let text = format!("{}?", tags.concat());
        let err = scan(&text, &config).unwrap_err();
        assert_eq!(
            err,
            ScanError::CapacityExceeded {
                unique: 257,
                begin: 0,
            }
        );

        // One fewer distinct tag fills the code space exactly.
        let output = scan(&tags[..256].concat(), &config).unwrap();
        assert_eq!(output.dedup.len(), 256);
    }

    #[test]
    fn capacity_boundary_is_inclusive() {
        // 2 unique + 254 = 256 is still fine.
        let config = single_set_config(254);
        let output = scan("AB", &config).unwrap();
        assert_eq!(output.dedup.len(), 2);
    }

    #[test]
    fn zero_token_exempt_from_capacity_check() {
        let mut config = single_set_config(254);
        config.parameters.zero = true;
        let output = scan("AB", &config).unwrap();
        assert_eq!(output.tokens.len(), 3);
    }

    // ─── Property tests ──────────────────────────────────────────────

    mod properties {
        use proptest::prelude::*;

        use super::*;

        /// Two sets with single-character markers and tags, so any
        /// concatenation of pieces stays scannable.
        fn prop_config() -> ScrollConfig {
            let mut first = font("[", "one");
            first.set_or = Some("*".to_string());
            let mut second = font("]", "two");
            second.set_default = Some("=".to_string());
            ScrollConfig {
                scroll: vec![String::new()],
                parameters: params(16),
                fonts: vec![first, second],
                lookups: vec![
                    table(
                        "one",
                        vec![
                            GlyphMapping {
                                tag: "A".to_string(),
                                offsets: vec![0],
                                or: Some(64),
                            },
                            mapping("B", 1),
                            mapping("C", 2),
                        ],
                    ),
                    table("two", vec![mapping("X", 3), mapping("Y", 4)]),
                ],
            }
        }

        fn piece() -> impl Strategy<Value = &'static str> {
            prop_oneof![
                Just("A"),
                Just("B"),
                Just("C"),
                Just("X"),
                Just("Y"),
                Just("["),
                Just("]"),
                Just("*"),
                Just("="),
            ]
        }

        proptest! {
            #[test]
            fn scan_is_deterministic(pieces in proptest::collection::vec(piece(), 0..64)) {
                let text: String = pieces.concat();
                let config = prop_config();
                let first = scan(&text, &config).unwrap();
                let second = scan(&text, &config).unwrap();
                prop_assert_eq!(first, second);
            }

            #[test]
            fn codes_are_sequential_and_unique(pieces in proptest::collection::vec(piece(), 0..64)) {
                let text: String = pieces.concat();
                let config = prop_config();
                let output = scan(&text, &config).unwrap();
                for (i, entry) in output.dedup.iter().enumerate() {
                    prop_assert_eq!(usize::from(entry.code), i);
                }
            }

            #[test]
            fn every_token_references_a_dedup_entry(pieces in proptest::collection::vec(piece(), 0..64)) {
                let text: String = pieces.concat();
                let config = prop_config();
                let output = scan(&text, &config).unwrap();
                for token in &output.tokens {
                    if let ScrollToken::Glyph(glyph) = token {
                        let entry = &output.dedup[usize::from(glyph.code)];
                        prop_assert_eq!(&entry.tag, &glyph.tag);
                        prop_assert_eq!(&entry.set, &glyph.set);
                    }
                }
            }
        }
    }
}
