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

use std::fs::write;

use flashygen_core::Card;
use flashygen_core::error::Fallible;
use flashygen_core::fail;
use flashygen_core::package::DeckPackage;
use flashygen_core::package::RenderedCard;
use flashygen_core::package::output_path;
use flashygen_core::pipeline::PackageWriter;
use flashygen_core::render_cards;
use log::info;

use crate::utils::file_stem;
use crate::utils::read_json;

/// Writes a deck as a pretty-printed JSON package.
pub struct JsonPackageWriter {
    output: Option<String>,
}

impl JsonPackageWriter {
    pub fn new(output: Option<String>) -> Self {
        Self { output }
    }
}

impl PackageWriter for JsonPackageWriter {
    fn write_package(&self, deck_name: &str, cards: &[RenderedCard]) -> Fallible<String> {
        let path = output_path(deck_name, self.output.as_deref(), "json");
        let package = DeckPackage::new(deck_name, cards);
        write(&path, serde_json::to_string_pretty(&package)?)?;
        Ok(path)
    }
}

/// Render a cards file and write it as a deck package. The deck is named
/// after the input file unless a name is given.
pub fn export_deck(
    input: &str,
    deck_name: Option<String>,
    output: Option<String>,
) -> Fallible<()> {
    let cards: Vec<Card> = read_json(input)?;
    if cards.is_empty() {
        return fail("No flashcards to export");
    }
    let deck_name = deck_name.unwrap_or_else(|| file_stem(input));
    let rendered = render_cards(&cards);
    let path = JsonPackageWriter::new(output).write_package(&deck_name, &rendered)?;
    info!("Exported {} cards to {path}", rendered.len());
    Ok(())
}
