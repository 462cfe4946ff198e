//! Segmentation of text around `<think>...</think>` regions.
//!
//! AI summaries arrive with the model's reasoning wrapped in `<think>` tags.
//! This module splits such text into an ordered list of [`Segment`]s so the
//! reasoning can be shown collapsed, and keeps the per-annotation
//! expanded/collapsed flags in an explicit [`ThoughtState`].
//!
//! Matching is lazy: an annotation ends at the first `</think>`, so nested
//! `<think>` tags are kept as literal text inside the outer annotation. An
//! opening tag without a closing tag is left in the surrounding plain text.

use regex::Regex;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::LazyLock;

pub const OPEN_DELIMITER: &str = "<think>";
pub const CLOSE_DELIMITER: &str = "</think>";

static THINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>(.*?)</think>").expect("think pattern is valid"));

// ============================================================================
// Segments
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Text,
    Annotation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub kind: SegmentKind,
    /// For annotations, the text strictly between the delimiters.
    pub body: String,
    pub sequence_index: usize,
}

impl Segment {
    fn new(kind: SegmentKind, body: &str, sequence_index: usize) -> Self {
        Self {
            kind,
            body: body.to_string(),
            sequence_index,
        }
    }

    pub fn is_annotation(&self) -> bool {
        self.kind == SegmentKind::Annotation
    }
}

/// Split `input` into text and annotation segments.
///
/// Zero-length text between or around annotations is never emitted. The one
/// exception is the empty input, which yields a single empty text segment.
pub fn segment(input: &str) -> Vec<Segment> {
    if !input.contains(OPEN_DELIMITER) {
        return vec![Segment::new(SegmentKind::Text, input, 0)];
    }

    let mut segments = Vec::new();
    let mut cursor = 0;

    for caps in THINK_RE.captures_iter(input) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
            continue;
        };

        if whole.start() > cursor {
            let idx = segments.len();
            segments.push(Segment::new(
                SegmentKind::Text,
                &input[cursor..whole.start()],
                idx,
            ));
        }

        let idx = segments.len();
        segments.push(Segment::new(SegmentKind::Annotation, body.as_str(), idx));
        cursor = whole.end();
    }

    if cursor < input.len() {
        let idx = segments.len();
        segments.push(Segment::new(SegmentKind::Text, &input[cursor..], idx));
    }

    segments
}

/// Rebuild the original text from its segments.
pub fn reassemble(segments: &[Segment]) -> String {
    let mut out = String::new();
    for seg in segments {
        match seg.kind {
            SegmentKind::Text => out.push_str(&seg.body),
            SegmentKind::Annotation => {
                out.push_str(OPEN_DELIMITER);
                out.push_str(&seg.body);
                out.push_str(CLOSE_DELIMITER);
            }
        }
    }
    out
}

/// Remove every closed `<think>` region and trim what is left.
pub fn strip_thoughts(input: &str) -> String {
    if !input.contains(OPEN_DELIMITER) {
        return input.trim().to_string();
    }
    THINK_RE.replace_all(input, "").trim().to_string()
}

pub fn annotation_count(segments: &[Segment]) -> usize {
    segments.iter().filter(|s| s.is_annotation()).count()
}

/// Short stable fingerprint of a content string, used to detect that the
/// content behind a saved toggle state has changed.
pub fn fingerprint(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    digest[..6].iter().map(|b| format!("{:02x}", b)).collect()
}

// ============================================================================
// Display State
// ============================================================================

/// Expanded flags, one per annotation, keyed by the annotation's position
/// among annotations (not by its sequence index).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThoughtState {
    expanded: Vec<bool>,
}

impl ThoughtState {
    pub fn collapsed(count: usize) -> Self {
        Self {
            expanded: vec![false; count],
        }
    }

    pub fn for_segments(segments: &[Segment]) -> Self {
        Self::collapsed(annotation_count(segments))
    }

    /// Build a state with the given positions expanded. Positions outside
    /// `0..count` are ignored.
    pub fn with_expanded(count: usize, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut state = Self::collapsed(count);
        for i in indices {
            if let Some(slot) = state.expanded.get_mut(i) {
                *slot = true;
            }
        }
        state
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.get(index).copied().unwrap_or(false)
    }

    /// Flip one annotation. Returns the new value, or `None` when `index`
    /// does not name an annotation.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let slot = self.expanded.get_mut(index)?;
        *slot = !*slot;
        Some(*slot)
    }

    pub fn expanded_indices(&self) -> Vec<usize> {
        self.expanded
            .iter()
            .enumerate()
            .filter(|(_, open)| **open)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Parse a comma-separated list of annotation positions, skipping junk.
pub fn parse_open_list(raw: &str) -> Vec<usize> {
    raw.split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}

// ============================================================================
// View
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Positioned<'a> {
    Text(&'a str),
    Annotation { position: usize, body: &'a str },
}

/// Segments of one content value together with their display state.
#[derive(Debug, Clone)]
pub struct ThinkableView {
    segments: Vec<Segment>,
    state: ThoughtState,
    fingerprint: String,
}

impl ThinkableView {
    pub fn new(content: &str) -> Self {
        let segments = segment(content);
        let state = ThoughtState::for_segments(&segments);
        Self {
            segments,
            state,
            fingerprint: fingerprint(content),
        }
    }

    /// Rebuild a view with a previously saved state. The state is only
    /// applied when `saved_fingerprint` matches `content`; otherwise every
    /// annotation starts collapsed.
    pub fn restore(content: &str, saved_fingerprint: Option<&str>, expanded: &[usize]) -> Self {
        let mut view = Self::new(content);
        if saved_fingerprint == Some(view.fingerprint.as_str()) {
            view.state = ThoughtState::with_expanded(view.state.len(), expanded.iter().copied());
        }
        view
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn state(&self) -> &ThoughtState {
        &self.state
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        self.state.toggle(index)
    }

    /// Segments in order, with each annotation tagged by its position
    /// among annotations (the key used by [`ThoughtState`]).
    pub fn positioned(&self) -> Vec<Positioned<'_>> {
        let mut next = 0;
        self.segments
            .iter()
            .map(|seg| match seg.kind {
                SegmentKind::Text => Positioned::Text(&seg.body),
                SegmentKind::Annotation => {
                    next += 1;
                    Positioned::Annotation {
                        position: next - 1,
                        body: &seg.body,
                    }
                }
            })
            .collect()
    }

    /// Query string describing the state reached by toggling `index`.
    pub fn toggled_query(&self, index: usize) -> String {
        let mut next = self.state.clone();
        next.toggle(index);
        let open: Vec<String> = next
            .expanded_indices()
            .iter()
            .map(|i| i.to_string())
            .collect();
        format!("rev={}&open={}", self.fingerprint, open.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(segments: &[Segment]) -> Vec<(SegmentKind, &str)> {
        segments.iter().map(|s| (s.kind, s.body.as_str())).collect()
    }

    #[test]
    fn test_plain_text_is_single_segment() {
        let segs = segment("just a note about <b>html</b>");
        assert_eq!(
            shape(&segs),
            vec![(SegmentKind::Text, "just a note about <b>html</b>")]
        );
    }

    #[test]
    fn test_empty_input_yields_empty_text() {
        let segs = segment("");
        assert_eq!(shape(&segs), vec![(SegmentKind::Text, "")]);
    }

    #[test]
    fn test_text_annotation_text() {
        let segs = segment("a<think>b</think>c");
        assert_eq!(
            shape(&segs),
            vec![
                (SegmentKind::Text, "a"),
                (SegmentKind::Annotation, "b"),
                (SegmentKind::Text, "c"),
            ]
        );
        let indices: Vec<usize> = segs.iter().map(|s| s.sequence_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_adjacent_annotations_do_not_merge() {
        let segs = segment("<think>x</think><think>y</think>");
        assert_eq!(
            shape(&segs),
            vec![(SegmentKind::Annotation, "x"), (SegmentKind::Annotation, "y")]
        );
    }

    #[test]
    fn test_unterminated_is_plain_text() {
        let segs = segment("<think>unterminated");
        assert_eq!(shape(&segs), vec![(SegmentKind::Text, "<think>unterminated")]);
    }

    #[test]
    fn test_unterminated_after_closed_region() {
        let segs = segment("<think>a</think>rest<think>open");
        assert_eq!(
            shape(&segs),
            vec![
                (SegmentKind::Annotation, "a"),
                (SegmentKind::Text, "rest<think>open"),
            ]
        );
    }

    #[test]
    fn test_nested_open_is_literal_in_body() {
        let segs = segment("<think>outer <think>inner</think> tail</think>");
        assert_eq!(
            shape(&segs),
            vec![
                (SegmentKind::Annotation, "outer <think>inner"),
                (SegmentKind::Text, " tail</think>"),
            ]
        );
    }

    #[test]
    fn test_multiline_body() {
        let segs = segment("<think>\nline one\nline two\n</think>\nSummary.");
        assert_eq!(
            shape(&segs),
            vec![
                (SegmentKind::Annotation, "\nline one\nline two\n"),
                (SegmentKind::Text, "\nSummary."),
            ]
        );
    }

    #[test]
    fn test_empty_annotation_body() {
        let segs = segment("x<think></think>");
        assert_eq!(
            shape(&segs),
            vec![(SegmentKind::Text, "x"), (SegmentKind::Annotation, "")]
        );
    }

    #[test]
    fn test_reassemble_restores_input() {
        let inputs = [
            "",
            "plain",
            "a<think>b</think>c",
            "<think>x</think><think>y</think>",
            "<think>unterminated",
            "<think>outer <think>inner</think> tail</think>",
            "中文<think>思考</think>摘要",
        ];
        for input in inputs {
            assert_eq!(reassemble(&segment(input)), input, "input: {:?}", input);
        }
    }

    #[test]
    fn test_strip_thoughts() {
        assert_eq!(strip_thoughts("<think>hmm</think> rust "), "rust");
        assert_eq!(strip_thoughts("plain "), "plain");
        assert_eq!(strip_thoughts("<think>only</think>"), "");
        assert_eq!(strip_thoughts("<think>open"), "<think>open");
    }

    #[test]
    fn test_state_matches_annotation_count() {
        let segs = segment("a<think>1</think>b<think>2</think>c<think>3</think>");
        let state = ThoughtState::for_segments(&segs);
        assert_eq!(state.len(), 3);
        assert!(state.expanded_indices().is_empty());
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut state = ThoughtState::collapsed(2);
        assert_eq!(state.toggle(1), Some(true));
        assert_eq!(state.toggle(1), Some(false));
        assert_eq!(state, ThoughtState::collapsed(2));
    }

    #[test]
    fn test_toggle_is_independent() {
        let mut state = ThoughtState::collapsed(3);
        state.toggle(0);
        assert!(state.is_expanded(0));
        assert!(!state.is_expanded(1));
        assert!(!state.is_expanded(2));
        state.toggle(2);
        assert_eq!(state.expanded_indices(), vec![0, 2]);
    }

    #[test]
    fn test_toggle_out_of_range() {
        let mut state = ThoughtState::collapsed(1);
        assert_eq!(state.toggle(5), None);
        assert!(!state.is_expanded(5));
    }

    #[test]
    fn test_view_positions_skip_text() {
        let view = ThinkableView::new("a<think>1</think>b<think>2</think>");
        assert_eq!(
            view.positioned(),
            vec![
                Positioned::Text("a"),
                Positioned::Annotation { position: 0, body: "1" },
                Positioned::Text("b"),
                Positioned::Annotation { position: 1, body: "2" },
            ]
        );
    }

    #[test]
    fn test_restore_applies_matching_fingerprint() {
        let content = "<think>a</think>x<think>b</think>";
        let fp = fingerprint(content);
        let view = ThinkableView::restore(content, Some(&fp), &[1, 9]);
        assert!(!view.state().is_expanded(0));
        assert!(view.state().is_expanded(1));
        assert_eq!(view.state().len(), 2);
    }

    #[test]
    fn test_restore_resets_on_changed_content() {
        let old = fingerprint("<think>a</think>");
        let view = ThinkableView::restore("<think>changed</think>", Some(&old), &[0]);
        assert!(!view.state().is_expanded(0));
    }

    #[test]
    fn test_toggled_query() {
        let content = "<think>a</think><think>b</think>";
        let view = ThinkableView::restore(content, Some(&fingerprint(content)), &[0]);
        let fp = view.fingerprint().to_string();
        assert_eq!(view.toggled_query(1), format!("rev={}&open=0,1", fp));
        assert_eq!(view.toggled_query(0), format!("rev={}&open=", fp));
    }

    #[test]
    fn test_parse_open_list() {
        assert_eq!(parse_open_list("0, 2,x,,3"), vec![0, 2, 3]);
        assert!(parse_open_list("").is_empty());
    }
}
