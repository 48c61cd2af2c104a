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

use flashygen_core::Section;
use flashygen_core::error::Fallible;
use flashygen_core::normalize;
use flashygen_core::notion::UNTITLED;
use flashygen_core::notion::blocks_from_json;
use flashygen_core::notion::page_id_from_url;
use flashygen_core::notion::page_title;
use flashygen_core::pipeline::BlockSource;
use flashygen_core::pipeline::Page;
use flashygen_core::segment_document;
use log::info;
use serde_json::Value;

use crate::utils::file_stem;
use crate::utils::load_config;
use crate::utils::read_json;
use crate::utils::write_output;

/// Reads pages saved to disk. The page reference is the file path.
///
/// A file holds a bare array of block objects, a block listing with the array
/// under `results`, or `{"page": <page object>, "blocks": [...]}`. Only the
/// last form carries a title and id; otherwise they come from the file name.
pub struct SavedPageSource;

impl BlockSource for SavedPageSource {
    fn fetch_page(&self, page_ref: &str) -> Fallible<Page> {
        let value: Value = read_json(page_ref)?;
        let page = match value.get("page") {
            Some(page) => {
                let url = page
                    .get("url")
                    .or_else(|| page.get("id"))
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                let blocks = value.get("blocks").unwrap_or(&Value::Null);
                Page {
                    id: page_id_from_url(url),
                    title: page_title(page),
                    blocks: blocks_from_json(blocks),
                }
            }
            None => {
                let blocks = value.get("results").unwrap_or(&value);
                let stem = file_stem(page_ref);
                Page {
                    id: page_id_from_url(&stem),
                    title: if stem.is_empty() { UNTITLED.to_string() } else { stem },
                    blocks: blocks_from_json(blocks),
                }
            }
        };
        Ok(page)
    }
}

/// Normalize and segment a saved page, writing the sections as JSON.
pub fn print_sections(
    input: &str,
    config: Option<String>,
    output: Option<String>,
) -> Fallible<()> {
    let config = load_config(config.as_deref())?;
    let page = SavedPageSource.fetch_page(input)?;
    info!("Page: {} ({})", page.title, page.id);
    let text = normalize(&page.blocks, 0);
    let sections: Vec<Section> = if text.trim().is_empty() {
        Vec::new()
    } else {
        segment_document(&text, &config)
    };
    info!("{} blocks, {} sections.", page.blocks.len(), sections.len());
    let json = serde_json::to_string_pretty(&sections)?;
    write_output(output.as_deref(), &json)
}
