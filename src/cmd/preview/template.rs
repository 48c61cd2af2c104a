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

use flashygen_core::package::RenderedCard;
use flashygen_core::package::STYLESHEET;
use maud::DOCTYPE;
use maud::Markup;
use maud::PreEscaped;
use maud::html;

const PAGE_STYLE: &str = "body { background: #f5f5f5; margin: 0; padding: 20px; }
.preview { max-width: 840px; margin: 0 auto; }
.preview .card { margin-bottom: 32px; }
.tags { margin-top: 12px; font-size: 12px; color: #666; }
.tags span { margin-right: 8px; }";

pub fn page_template(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (PreEscaped(STYLESHEET)) }
                style { (PreEscaped(PAGE_STYLE)) }
            }
            body {
                (body)
            }
        }
    }
}

/// One card laid out the way the answer side of a note shows it.
pub fn card_template(card: &RenderedCard) -> Markup {
    html! {
        div.card id=(card.guid.to_hex()) {
            div.question { (PreEscaped(&card.front_html)) }
            hr;
            div.answer { (PreEscaped(&card.back_html)) }
            @if !card.tags.is_empty() {
                div.tags {
                    @for tag in &card.tags {
                        span { "#" (tag) }
                    }
                }
            }
        }
    }
}

pub fn deck_template(deck_name: &str, cards: &[RenderedCard]) -> Markup {
    let body = html! {
        main.preview {
            h1 { (deck_name) }
            p { (cards.len()) " cards" }
            @for card in cards {
                (card_template(card))
            }
        }
    };
    page_template(deck_name, body)
}
