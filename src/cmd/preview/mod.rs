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

mod template;

use std::fs::write;

use flashygen_core::Card;
use flashygen_core::error::Fallible;
use flashygen_core::package::output_path;
use flashygen_core::render_cards;
use log::info;

use crate::cmd::preview::template::deck_template;
use crate::utils::file_stem;
use crate::utils::read_json;

/// Write a standalone HTML page showing every card of a cards file.
pub fn preview_deck(input: &str, output: Option<String>) -> Fallible<()> {
    let cards: Vec<Card> = read_json(input)?;
    let deck_name = file_stem(input);
    let rendered = render_cards(&cards);
    let page = deck_template(&deck_name, &rendered).into_string();
    let path = output_path(&deck_name, output.as_deref(), "html");
    write(&path, page)?;
    info!("Wrote a preview of {} cards to {path}", rendered.len());
    Ok(())
}
