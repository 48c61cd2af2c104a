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

//! The shape of an exported deck: a two-field note model, its templates and
//! stylesheet, and the rendered cards.

use serde::Serialize;

use crate::render::render;
use crate::types::card::Card;
use crate::types::card_hash::CardHash;

pub const MODEL_NAME: &str = "FlashyGen Basic";

pub const FIELDS: [&str; 2] = ["Question", "Answer"];

pub const QUESTION_TEMPLATE: &str = r#"<div class="card">
    <div class="question">{{Question}}</div>
</div>"#;

pub const ANSWER_TEMPLATE: &str = r#"<div class="card">
    <div class="question">{{Question}}</div>
    <hr>
    <div class="answer">{{Answer}}</div>
</div>"#;

/// Styles for the markup produced by [`render`], including the highlight
/// classes and the language badge on code blocks.
pub const STYLESHEET: &str = r#".card {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Arial, sans-serif;
    font-size: 18px;
    line-height: 1.7;
    text-align: center;
    color: #1a1a1a;
    background: #f4f6f8;
    padding: 30px;
}

.question {
    font-size: 22px;
    font-weight: 600;
    color: #1e3a8a;
    background: #ffffff;
    padding: 20px;
    border-radius: 12px;
    border-left: 5px solid #3b82f6;
}

.answer {
    text-align: left;
    background: #ffffff;
    margin-top: 25px;
    padding: 25px;
    border-radius: 12px;
    border-left: 5px solid #10b981;
}

hr {
    border: none;
    border-top: 2px solid #e5e7eb;
    margin: 25px 0;
}

code {
    font-family: "SF Mono", Menlo, Consolas, monospace;
    font-size: 15px;
    color: #dc2626;
    background: #f1f5f9;
    padding: 2px 6px;
    border-radius: 4px;
}

pre {
    position: relative;
    text-align: left;
    color: #e2e8f0;
    background: #1e293b;
    padding: 20px;
    margin: 15px 0;
    border-radius: 8px;
    overflow-x: auto;
}

pre::before {
    content: attr(data-language);
    position: absolute;
    top: 8px;
    right: 12px;
    font-size: 11px;
    font-weight: 600;
    letter-spacing: 0.5px;
    text-transform: uppercase;
    color: #94a3b8;
}

pre code {
    display: block;
    font-size: 14px;
    line-height: 1.6;
    color: inherit;
    background: transparent;
    padding: 0;
}

.comment { color: #6b7280; font-style: italic; }
.keyword { color: #c678dd; font-weight: 600; }
.string { color: #98c379; }
.number { color: #d19a66; }
.function { color: #61afef; }

strong { color: #1e40af; }
em { color: #7c3aed; }

ul, ol { text-align: left; padding-left: 25px; }

blockquote {
    color: #4b5563;
    background: #fffbeb;
    border-left: 4px solid #fbbf24;
    padding: 15px 20px;
    font-style: italic;
}

h1, h2, h3, h4 { color: #1f2937; }

@media (max-width: 600px) {
    .card { padding: 20px; font-size: 16px; }
    .question { font-size: 19px; padding: 15px; }
    .answer { padding: 18px; }
    pre { padding: 15px; }
}
"#;

/// A card whose front and back have been rendered to HTML.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct RenderedCard {
    pub guid: CardHash,
    pub front_html: String,
    pub back_html: String,
    pub tags: Vec<String>,
}

impl RenderedCard {
    pub fn from_card(card: &Card) -> Self {
        Self {
            guid: card.hash(),
            front_html: render(card.front()),
            back_html: render(card.back()),
            tags: card.tags().to_vec(),
        }
    }
}

/// Render every card, preserving order.
pub fn render_cards(cards: &[Card]) -> Vec<RenderedCard> {
    cards.iter().map(RenderedCard::from_card).collect()
}

/// Everything a package writer needs to produce a deck.
#[derive(Debug, Serialize)]
pub struct DeckPackage<'a> {
    pub name: &'a str,
    pub model: &'static str,
    pub fields: [&'static str; 2],
    pub question_template: &'static str,
    pub answer_template: &'static str,
    pub css: &'static str,
    pub cards: &'a [RenderedCard],
}

impl<'a> DeckPackage<'a> {
    pub fn new(name: &'a str, cards: &'a [RenderedCard]) -> Self {
        Self {
            name,
            model: MODEL_NAME,
            fields: FIELDS,
            question_template: QUESTION_TEMPLATE,
            answer_template: ANSWER_TEMPLATE,
            css: STYLESHEET,
            cards,
        }
    }
}

/// Where to write a deck. Without an explicit `output`, the deck name with
/// spaces replaced by underscores is used. `extension` is appended if the
/// path doesn't already end with it.
pub fn output_path(deck_name: &str, output: Option<&str>, extension: &str) -> String {
    let path = match output {
        Some(path) => path.to_string(),
        None => deck_name.replace(' ', "_"),
    };
    let suffix = format!(".{extension}");
    if path.ends_with(&suffix) {
        path
    } else {
        format!("{path}{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        assert_eq!(output_path("Rust Notes", None, "json"), "Rust_Notes.json");
        assert_eq!(output_path("x", Some("out/deck"), "json"), "out/deck.json");
        assert_eq!(output_path("x", Some("deck.json"), "json"), "deck.json");
    }

    #[test]
    fn test_rendered_card() {
        let card = Card::new("What is `x`?", "**one**", vec!["T".to_string()]);
        let rendered = RenderedCard::from_card(&card);
        assert_eq!(rendered.front_html, "What is <code>x</code>?");
        assert_eq!(rendered.back_html, "<strong>one</strong>");
        assert_eq!(rendered.tags, vec!["T".to_string()]);
        assert_eq!(rendered.guid, card.hash());
    }

    #[test]
    fn test_stylesheet_covers_highlight_classes() {
        use crate::render::highlight::{COMMENT, FUNCTION, KEYWORD, NUMBER, STRING};
        for class in [COMMENT, STRING, KEYWORD, NUMBER, FUNCTION] {
            assert!(STYLESHEET.contains(&format!(".{class} ")));
        }
        assert!(STYLESHEET.contains("attr(data-language)"));
    }

    #[test]
    fn test_deck_package_serializes() -> crate::error::Fallible<()> {
        let cards = render_cards(&[Card::new("Q", "A", vec![])]);
        let package = DeckPackage::new("Deck", &cards);
        let json = serde_json::to_value(&package)?;
        assert_eq!(json["name"], "Deck");
        assert_eq!(json["fields"][0], "Question");
        assert_eq!(json["cards"][0]["back_html"], "A");
        Ok(())
    }
}
