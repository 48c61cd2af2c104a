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

use flashygen_core::error::Fallible;
use flashygen_core::parse_cards;
use flashygen_core::pipeline::section_tag;
use log::info;
use log::warn;

use crate::utils::read_file;
use crate::utils::write_output;

/// Parse a saved generator response into cards, writing them as JSON.
///
/// With a section heading, cards are titled and tagged the same way the
/// pipeline does for that section.
pub fn parse_response(
    input: &str,
    title: &str,
    section: Option<String>,
    output: Option<String>,
) -> Fallible<()> {
    let response = read_file(input)?;
    let title = match &section {
        Some(heading) => format!("{title} - {heading}"),
        None => title.to_string(),
    };
    let mut cards = parse_cards(&response, &title)?;
    if let Some(heading) = section.filter(|h| !h.is_empty()) {
        let tag = section_tag(&heading);
        cards = cards.into_iter().map(|c| c.with_tag(tag.clone())).collect();
    }
    if cards.is_empty() {
        warn!("The response contained no usable cards.");
    } else {
        info!("Parsed {} cards.", cards.len());
    }
    let json = serde_json::to_string_pretty(&cards)?;
    write_output(output.as_deref(), &json)
}
