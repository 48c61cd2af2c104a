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

//! Flattening of block trees into the markdown dialect.

use crate::types::block::Block;
use crate::types::block::BlockKind;
use crate::types::block::InlineSpan;

const TOGGLE_GLYPH: &str = "▸";

/// Flatten a sequence of blocks into one markdown string.
///
/// Each block's line and each block's flattened children are separate units,
/// joined with a blank line. Units that flatten to nothing are dropped, so
/// unsupported blocks leave no trace.
pub fn normalize(blocks: &[Block], depth: usize) -> String {
    let mut parts: Vec<String> = Vec::new();
    for block in blocks {
        let line = normalize_block(block, depth);
        if !line.is_empty() {
            parts.push(line);
        }
        if !block.children.is_empty() {
            let children = normalize(&block.children, depth + 1);
            if !children.is_empty() {
                parts.push(children);
            }
        }
    }
    parts.join("\n\n")
}

/// Render a single block, ignoring its children.
fn normalize_block(block: &Block, depth: usize) -> String {
    let text = render_spans(&block.spans);
    if text.is_empty() && !matches!(block.kind, BlockKind::Divider) {
        return String::new();
    }
    match &block.kind {
        BlockKind::Paragraph => text,
        BlockKind::Heading1 => format!("# {text}"),
        BlockKind::Heading2 => format!("## {text}"),
        BlockKind::Heading3 => format!("### {text}"),
        BlockKind::BulletedItem => format!("{}- {text}", indent(depth)),
        BlockKind::NumberedItem => format!("{}1. {text}", indent(depth)),
        BlockKind::Checklist { checked } => {
            let checkbox = if *checked { "[x]" } else { "[ ]" };
            format!("{checkbox} {text}")
        }
        BlockKind::Toggle => format!("{TOGGLE_GLYPH} {text}"),
        BlockKind::Code { language } => format!("```{language}\n{text}\n```"),
        BlockKind::Quote => format!("> {text}"),
        BlockKind::Callout { emoji } => match emoji {
            Some(emoji) => format!("{emoji} {text}"),
            None => text,
        },
        BlockKind::Divider => "---".to_string(),
        BlockKind::Unsupported(_) => String::new(),
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

/// Concatenate spans, wrapping each in the markers for its annotations.
///
/// Markers nest within a span: code innermost, then bold, then italic.
pub fn render_spans(spans: &[InlineSpan]) -> String {
    let mut out = String::new();
    for span in spans {
        let mut text = span.text.clone();
        if span.annotations.code {
            text = format!("`{text}`");
        }
        if span.annotations.bold {
            text = format!("**{text}**");
        }
        if span.annotations.italic {
            text = format!("*{text}*");
        }
        out.push_str(&text);
    }
    out
}
