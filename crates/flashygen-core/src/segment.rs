// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Splitting normalized text into sections for the generator.
//!
//! Segmentation happens in three steps. First the text is cut on heading
//! boundaries. If that produces too many sections, small neighbours are folded
//! together, keeping their headings as `###` markers inside the merged content.
//! Finally any section whose content would overflow the generation budget is
//! cut into parts at line boundaries, keeping fenced code blocks whole.

use log::debug;

use crate::config::PipelineConfig;
use crate::types::section::Section;

/// Heading of content that doesn't sit under any boundary heading.
pub const FALLBACK_HEADING: &str = "Content";

const FENCE: &str = "```";

/// The deepest heading level that starts a new section.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HeadingLevel {
    H1,
    H2,
}

impl HeadingLevel {
    /// Is `line` (already trimmed) a heading that starts a new section?
    fn is_boundary(self, line: &str) -> bool {
        // "# " and "## " are mutually exclusive prefixes: the second
        // character of "## " is not a space.
        let h1 = line.starts_with("# ");
        let h2 = line.starts_with("## ");
        match self {
            HeadingLevel::H1 => h1,
            HeadingLevel::H2 => h1 || h2,
        }
    }
}

/// Split `text` into sections at headings no deeper than `max_level`.
///
/// Blank lines are skipped and every other line is trimmed. Deeper headings
/// stay in the content. A heading with nothing under it produces no section.
/// If no section is produced at all, the result is a single section holding
/// the original text under [`FALLBACK_HEADING`].
///
/// The scan is line by line and knows nothing about code fences: a `# ` line
/// inside a fence (a shell or Python comment) is taken as a heading, and the
/// fence ends up cut across two sections. [`split_large_sections`] keeps fences
/// whole only within the sections it is given.
pub fn segment(text: &str, max_level: HeadingLevel) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut heading: Option<String> = None;
    let mut lines: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if max_level.is_boundary(line) {
            flush(&mut sections, heading.take(), &mut lines);
            heading = Some(line.trim_start_matches('#').trim().to_string());
        } else {
            lines.push(line);
        }
    }
    flush(&mut sections, heading, &mut lines);

    if sections.is_empty() {
        return vec![Section::new(FALLBACK_HEADING, text)];
    }
    sections
}

fn flush(sections: &mut Vec<Section>, heading: Option<String>, lines: &mut Vec<&str>) {
    if lines.is_empty() {
        return;
    }
    let heading = heading.unwrap_or_else(|| FALLBACK_HEADING.to_string());
    sections.push(Section::new(heading, lines.join("\n")));
    lines.clear();
}

/// Segment on top-level headings, falling back to second-level headings when
/// that yields fewer than `min_sections` sections. Whichever attempt produced
/// more sections wins.
pub fn segment_by_headings(text: &str, min_sections: usize) -> Vec<Section> {
    let top = segment(text, HeadingLevel::H1);
    if top.len() >= min_sections {
        debug!("Split on H1 headings into {} section(s).", top.len());
        return top;
    }
    let second = segment(text, HeadingLevel::H2);
    if second.len() > top.len() {
        debug!("Split on H1 and H2 headings into {} section(s).", second.len());
        second
    } else {
        debug!("H2 split did not help, keeping {} section(s).", top.len());
        top
    }
}

/// Fold small or over-numerous sections together.
///
/// Returns the input unchanged when there are at most `max_count` sections and
/// none is smaller than `min_size`. Otherwise sections are folded greedily in
/// order: a section joins the current buffer while the buffer is smaller than
/// `min_size`, or while the buffer holds fewer than `len / max_count` sections.
/// A folded section's heading becomes a `### heading` line in the buffer's
/// content; the buffer keeps the heading of the section that opened it.
///
/// Many tiny sections with a small `max_count` can produce a final buffer far
/// larger than `min_size`.
pub fn merge_small_sections(
    sections: &[Section],
    min_size: usize,
    max_count: usize,
) -> Vec<Section> {
    let all_large = sections.iter().all(|s| s.content_len() >= min_size);
    if sections.len() <= max_count && all_large {
        return sections.to_vec();
    }

    let ratio = (sections.len() / max_count.max(1)).max(1);
    let mut merged: Vec<Section> = Vec::new();
    let mut iter = sections.iter();
    let Some(first) = iter.next() else {
        return merged;
    };
    let mut current = first.clone();
    let mut count = 1;
    for section in iter {
        if current.content_len() < min_size || count < ratio {
            fold(&mut current, section);
            count += 1;
        } else {
            merged.push(current);
            current = section.clone();
            count = 1;
        }
    }
    merged.push(current);
    merged
}

fn fold(into: &mut Section, other: &Section) {
    let mut piece = String::new();
    if !other.heading.is_empty() {
        piece.push_str("### ");
        piece.push_str(&other.heading);
        if !other.content.is_empty() {
            piece.push('\n');
        }
    }
    piece.push_str(&other.content);
    if piece.is_empty() {
        return;
    }
    if !into.content.is_empty() {
        into.content.push_str("\n\n");
    }
    into.content.push_str(&piece);
}

/// Split every section whose content exceeds `budget` characters.
///
/// Content is cut into units (single lines, or whole fenced code blocks) which
/// are packed greedily into parts. Joining the parts' content with `\n` gives
/// back the original content, less any blank lines that fell on a part
/// boundary. A unit larger than the budget gets a part of its own, which is the
/// only way a part can exceed the budget. No part is blank.
pub fn split_large_sections(sections: &[Section], budget: usize) -> Vec<Section> {
    let mut result: Vec<Section> = Vec::new();
    for section in sections {
        if section.content_len() <= budget {
            result.push(section.clone());
            continue;
        }
        let parts = pack_units(split_units(&section.content), budget);
        let total = parts.len();
        if total <= 1 {
            result.push(section.clone());
            continue;
        }
        for (idx, part) in parts.into_iter().enumerate() {
            result.push(Section::new(
                part_heading(&section.heading, idx + 1, total),
                part,
            ));
        }
    }
    result
}

fn part_heading(heading: &str, part: usize, total: usize) -> String {
    if heading.is_empty() {
        format!("Part {part}/{total}")
    } else {
        format!("{heading} (part {part}/{total})")
    }
}

/// Cut content into lines, keeping each fenced code block together as a single
/// unit. An unterminated fence runs to the end of the content.
fn split_units(content: &str) -> Vec<String> {
    let mut units: Vec<String> = Vec::new();
    let mut fence: Option<String> = None;
    for line in content.split('\n') {
        let is_fence = line.trim_start().starts_with(FENCE);
        match fence.take() {
            Some(mut block) => {
                block.push('\n');
                block.push_str(line);
                if is_fence {
                    units.push(block);
                } else {
                    fence = Some(block);
                }
            }
            None => {
                if is_fence {
                    fence = Some(line.to_string());
                } else {
                    units.push(line.to_string());
                }
            }
        }
    }
    if let Some(block) = fence {
        units.push(block);
    }
    units
}

fn pack_units(units: Vec<String>, budget: usize) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    let mut current: Option<(String, usize)> = None;
    for unit in units {
        let len = unit.chars().count();
        let blank = unit.trim().is_empty();
        current = match current.take() {
            Some((mut part, part_len)) if part_len + 1 + len <= budget => {
                part.push('\n');
                part.push_str(&unit);
                Some((part, part_len + 1 + len))
            }
            Some((part, _)) => {
                parts.push(part);
                if blank { None } else { Some((unit, len)) }
            }
            // A blank line never opens a part.
            None if blank => None,
            None => Some((unit, len)),
        };
    }
    if let Some((part, _)) = current {
        parts.push(part);
    }
    parts
}

/// Segment a whole document the way the generator wants it: heading split
/// with second-level fallback, then merging when there are too many sections,
/// then splitting of sections that would overflow the budget.
pub fn segment_document(text: &str, config: &PipelineConfig) -> Vec<Section> {
    let mut sections = segment_by_headings(text, config.min_top_level_sections);
    if sections.len() > config.max_sections {
        let before = sections.len();
        sections = merge_small_sections(&sections, config.min_section_size, config.max_sections);
        debug!("Merged {before} sections down to {}.", sections.len());
    }
    if let Some(budget) = config.split_budget() {
        let before = sections.len();
        sections = split_large_sections(&sections, budget);
        if sections.len() > before {
            debug!("Split {before} sections into {}.", sections.len());
        }
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_sections(count: usize, content_len: usize) -> Vec<Section> {
        (0..count)
            .map(|i| Section::new(format!("Topic {i}"), "x".repeat(content_len)))
            .collect()
    }

    #[test]
    fn test_h2_is_not_a_boundary_at_level_one() {
        let text = "# A\ncontent1\n## B\ncontent2\n# C\ncontent3";
        let sections = segment(text, HeadingLevel::H1);
        assert_eq!(
            sections,
            vec![
                Section::new("A", "content1\n## B\ncontent2"),
                Section::new("C", "content3"),
            ]
        );
    }

    #[test]
    fn test_h2_is_a_boundary_at_level_two() {
        let text = "# A\ncontent1\n## B\ncontent2\n### C\ncontent3";
        let sections = segment(text, HeadingLevel::H2);
        assert_eq!(
            sections,
            vec![
                Section::new("A", "content1"),
                Section::new("B", "content2\n### C\ncontent3"),
            ]
        );
    }

    #[test]
    fn test_blank_lines_are_skipped_and_lines_trimmed() {
        let text = "# A\n\n   first  \n\n\n  - second\n";
        let sections = segment(text, HeadingLevel::H1);
        assert_eq!(sections, vec![Section::new("A", "first\n- second")]);
    }

    #[test]
    fn test_heading_free_text_is_one_content_section() {
        let text = "alpha\n\nbeta\n\n\ngamma";
        let sections = segment(text, HeadingLevel::H1);
        assert_eq!(
            sections,
            vec![Section::new(FALLBACK_HEADING, "alpha\nbeta\ngamma")]
        );
    }

    #[test]
    fn test_empty_text_yields_fallback_with_original_text() {
        assert_eq!(
            segment("", HeadingLevel::H1),
            vec![Section::new(FALLBACK_HEADING, "")]
        );
        assert_eq!(
            segment(" \n\n ", HeadingLevel::H2),
            vec![Section::new(FALLBACK_HEADING, " \n\n ")]
        );
    }

    #[test]
    fn test_headings_without_content_fall_back() {
        let text = "# A\n# B";
        assert_eq!(
            segment(text, HeadingLevel::H1),
            vec![Section::new(FALLBACK_HEADING, text)]
        );
    }

    #[test]
    fn test_heading_without_content_is_dropped() {
        let text = "# Empty\n# Full\nbody";
        assert_eq!(
            segment(text, HeadingLevel::H1),
            vec![Section::new("Full", "body")]
        );
    }

    #[test]
    fn test_preamble_gets_fallback_heading() {
        let text = "intro\n# A\nbody";
        assert_eq!(
            segment(text, HeadingLevel::H1),
            vec![
                Section::new(FALLBACK_HEADING, "intro"),
                Section::new("A", "body"),
            ]
        );
    }

    #[test]
    fn test_content_lines_are_covered_in_order() {
        let text = "pre\n# One\na\n\nb\n## Two\nc\n# Three\n\nd\ne";
        let sections = segment(text, HeadingLevel::H1);
        let covered: Vec<&str> = sections
            .iter()
            .flat_map(|s| s.content.lines())
            .filter(|l| !HeadingLevel::H1.is_boundary(l))
            .collect();
        assert_eq!(covered, vec!["pre", "a", "b", "## Two", "c", "d", "e"]);
    }

    #[test]
    fn test_segment_by_headings_retries_at_level_two() {
        let text = "# Doc\n## A\na\n## B\nb\n## C\nc";
        let sections = segment_by_headings(text, 3);
        let headings: Vec<&str> = sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(headings, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_segment_by_headings_keeps_enough_top_level() {
        let text = "# A\na\n## A2\na2\n# B\nb\n# C\nc";
        let sections = segment_by_headings(text, 3);
        let headings: Vec<&str> = sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(headings, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_merge_is_noop_when_within_limits() {
        let sections = numbered_sections(5, 900);
        assert_eq!(merge_small_sections(&sections, 800, 20), sections);
    }

    #[test]
    fn test_merge_folds_small_sections() {
        let sections = numbered_sections(25, 100);
        let merged = merge_small_sections(&sections, 800, 20);
        assert!(merged.len() <= 20);
        assert!(merged.len() > 1);
        for section in &merged[..merged.len() - 1] {
            assert!(section.content_len() >= 800);
        }
        assert_eq!(merged[0].heading, "Topic 0");
        assert!(merged[0].content.contains("### Topic 1\n"));
    }

    #[test]
    fn test_merge_enforces_fold_ratio() {
        let sections = numbered_sections(60, 900);
        let merged = merge_small_sections(&sections, 800, 20);
        assert_eq!(merged.len(), 20);
        for (i, section) in merged.iter().enumerate() {
            assert_eq!(section.heading, format!("Topic {}", i * 3));
            assert_eq!(section.content.matches("### ").count(), 2);
        }
    }

    #[test]
    fn test_merge_is_idempotent() {
        let cases = vec![
            numbered_sections(25, 100),
            numbered_sections(60, 900),
            numbered_sections(7, 10),
            numbered_sections(41, 350),
        ];
        for sections in cases {
            let once = merge_small_sections(&sections, 800, 20);
            let twice = merge_small_sections(&once, 800, 20);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_small_sections(&[], 800, 20).is_empty());
    }

    #[test]
    fn test_split_leaves_small_sections_alone() {
        let sections = vec![Section::new("A", "short\ncontent")];
        assert_eq!(split_large_sections(&sections, 100), sections);
    }

    #[test]
    fn test_split_respects_budget_and_reconstructs() {
        let content: Vec<String> = (0..50).map(|i| format!("line number {i}")).collect();
        let content = content.join("\n");
        let sections = vec![Section::new("Big", content.clone())];
        let parts = split_large_sections(&sections, 100);
        assert!(parts.len() > 1);
        for part in &parts {
            assert!(part.content_len() <= 100);
        }
        let rebuilt: Vec<&str> = parts.iter().map(|s| s.content.as_str()).collect();
        assert_eq!(rebuilt.join("\n"), content);
        assert_eq!(parts[0].heading, format!("Big (part 1/{})", parts.len()));
    }

    #[test]
    fn test_split_keeps_fences_whole() {
        let code = "```python\ndef f():\n    return 1\n```";
        let content = format!("intro line\n{code}\noutro line");
        let sections = vec![Section::new("Code", content.clone())];
        let parts = split_large_sections(&sections, 40);
        assert!(parts.iter().any(|s| s.content.contains(code)));
        for part in &parts {
            assert_eq!(part.content.matches(FENCE).count() % 2, 0);
        }
        let rebuilt: Vec<&str> = parts.iter().map(|s| s.content.as_str()).collect();
        assert_eq!(rebuilt.join("\n"), content);
    }

    #[test]
    fn test_split_never_emits_blank_parts() {
        let sections = vec![Section::new("H", "abc\n\nabc")];
        let parts = split_large_sections(&sections, 3);
        assert_eq!(
            parts,
            vec![
                Section::new("H (part 1/2)", "abc"),
                Section::new("H (part 2/2)", "abc"),
            ]
        );
    }

    #[test]
    fn test_split_keeps_blank_lines_inside_parts() {
        let sections = vec![Section::new("H", "ab\n\ncd\n\n\nxyz")];
        let parts = split_large_sections(&sections, 6);
        let contents: Vec<&str> = parts.iter().map(|s| s.content.as_str()).collect();
        assert_eq!(contents, vec!["ab\n\ncd", "xyz"]);
    }

    #[test]
    fn test_comment_inside_fence_is_read_as_heading() {
        let text = "# Intro\nprose\n```python\n# a comment\nx = 1\n```\n# Next\nmore";
        let headings: Vec<String> = segment(text, HeadingLevel::H1)
            .into_iter()
            .map(|s| s.heading)
            .collect();
        assert_eq!(headings, vec!["Intro", "a comment", "Next"]);
    }

    #[test]
    fn test_split_oversized_unit_stands_alone() {
        let long_line = "y".repeat(50);
        let content = format!("a\n{long_line}\nb");
        let parts = split_large_sections(&[Section::new("", content)], 10);
        let contents: Vec<&str> = parts.iter().map(|s| s.content.as_str()).collect();
        assert_eq!(contents, vec!["a", long_line.as_str(), "b"]);
        assert_eq!(parts[2].heading, "Part 3/3");
    }

    #[test]
    fn test_segment_document_merges_and_splits() {
        let mut text = String::new();
        for i in 0..30 {
            text.push_str(&format!("# Topic {i}\nshort body {i}\n"));
        }
        let config = PipelineConfig {
            max_section_size: 200,
            ..PipelineConfig::default()
        };
        let sections = segment_document(&text, &config);
        assert!(sections.len() > 1);
        for section in &sections {
            assert!(section.content_len() <= 200);
        }
        assert!(sections[0].heading.starts_with("Topic 0"));
    }
}
