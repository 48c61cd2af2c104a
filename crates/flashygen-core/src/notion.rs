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

//! Conversion of document-store JSON into block trees.
//!
//! Block objects look like `{"type": "to_do", "to_do": {"rich_text": [...],
//! "checked": true}, "children": [...]}`: the type-specific payload lives under
//! a key named after the type. Missing or mistyped fields fall back to
//! defaults, so conversion never fails.

use serde_json::Value;

use crate::types::block::Annotations;
use crate::types::block::Block;
use crate::types::block::BlockKind;
use crate::types::block::InlineSpan;

pub const UNTITLED: &str = "Untitled";

const TITLE_PROPERTIES: [&str; 3] = ["title", "Title", "Name"];

/// Extract a page id from a page URL, or return a bare id unchanged (minus
/// hyphens).
///
/// `https://www.notion.so/workspace/Page-Title-abc123` gives `abc123`.
pub fn page_id_from_url(url: &str) -> String {
    let id = if url.contains("notion.so") {
        let last = url.trim_end_matches('/').rsplit('/').next().unwrap_or(url);
        last.rsplit('-').next().unwrap_or(last)
    } else {
        url
    };
    let id = id.split('?').next().unwrap_or(id);
    id.replace('-', "")
}

/// The title of a page object, or [`UNTITLED`].
pub fn page_title(page: &Value) -> String {
    let Some(properties) = page.get("properties") else {
        return UNTITLED.to_string();
    };
    for key in TITLE_PROPERTIES {
        let Some(property) = properties.get(key) else {
            continue;
        };
        if property.get("type").and_then(Value::as_str) != Some("title") {
            continue;
        }
        let Some(parts) = property.get("title").and_then(Value::as_array) else {
            continue;
        };
        if parts.is_empty() {
            continue;
        }
        return parts
            .iter()
            .filter_map(|part| part.get("plain_text").and_then(Value::as_str))
            .collect();
    }
    UNTITLED.to_string()
}

/// Convert a JSON array of block objects into blocks. Anything that isn't an
/// array yields no blocks.
pub fn blocks_from_json(value: &Value) -> Vec<Block> {
    value
        .as_array()
        .map(|items| items.iter().map(block_from_json).collect())
        .unwrap_or_default()
}

fn block_from_json(value: &Value) -> Block {
    let type_name = value.get("type").and_then(Value::as_str).unwrap_or("");
    let payload = value.get(type_name).unwrap_or(&Value::Null);
    let kind = match type_name {
        "paragraph" => BlockKind::Paragraph,
        "heading_1" => BlockKind::Heading1,
        "heading_2" => BlockKind::Heading2,
        "heading_3" => BlockKind::Heading3,
        "bulleted_list_item" => BlockKind::BulletedItem,
        "numbered_list_item" => BlockKind::NumberedItem,
        "to_do" => BlockKind::Checklist {
            checked: payload
                .get("checked")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        },
        "toggle" => BlockKind::Toggle,
        "code" => BlockKind::Code {
            language: payload
                .get("language")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
        },
        "quote" => BlockKind::Quote,
        "callout" => BlockKind::Callout {
            emoji: callout_emoji(payload),
        },
        "divider" => BlockKind::Divider,
        other => BlockKind::Unsupported(other.to_string()),
    };
    let spans = payload
        .get("rich_text")
        .map(spans_from_json)
        .unwrap_or_default();
    let children = value
        .get("children")
        .map(blocks_from_json)
        .unwrap_or_default();
    Block::new(kind, spans).with_children(children)
}

fn callout_emoji(payload: &Value) -> Option<String> {
    let icon = payload.get("icon")?;
    if icon.get("type").and_then(Value::as_str) != Some("emoji") {
        return None;
    }
    icon.get("emoji").and_then(Value::as_str).map(str::to_string)
}

fn spans_from_json(value: &Value) -> Vec<InlineSpan> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| {
            let flag = |name: &str| {
                item.get("annotations")
                    .and_then(|a| a.get(name))
                    .and_then(Value::as_bool)
                    .unwrap_or(false)
            };
            InlineSpan {
                text: item
                    .get("plain_text")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
                annotations: Annotations {
                    bold: flag("bold"),
                    italic: flag("italic"),
                    code: flag("code"),
                },
            }
        })
        .collect()
}
