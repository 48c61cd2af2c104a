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

//! Orchestration of the whole conversion: fetch, normalize, segment,
//! generate, render, write.
//!
//! Fetching, generation and packaging are collaborators behind traits; this
//! module only sequences them and decides what to do when they fail.

use log::debug;
use log::info;
use log::warn;

use crate::config::PipelineConfig;
use crate::error::Fallible;
use crate::error::fail;
use crate::normalize::normalize;
use crate::package::RenderedCard;
use crate::package::render_cards;
use crate::prompt::build_prompt;
use crate::response::parse_cards;
use crate::segment::segment_document;
use crate::types::block::Block;
use crate::types::card::Card;
use crate::types::section::Section;

/// A fetched page: its id, title and top-level blocks.
#[derive(Clone, Debug)]
pub struct Page {
    pub id: String,
    pub title: String,
    pub blocks: Vec<Block>,
}

/// Source of documents.
pub trait BlockSource {
    fn fetch_page(&self, page_ref: &str) -> Fallible<Page>;
}

/// Turns a prompt into raw card text.
pub trait CardGenerator {
    fn generate(&self, prompt: &str) -> Fallible<String>;
}

/// Writes a finished deck somewhere, returning where it went.
pub trait PackageWriter {
    fn write_package(&self, deck_name: &str, cards: &[RenderedCard]) -> Fallible<String>;
}

/// Section label tag: the heading with spaces replaced by hyphens.
pub fn section_tag(heading: &str) -> String {
    heading.replace(' ', "-")
}

/// Generate cards for each section in order.
///
/// Sections with blank content are skipped. A section whose generation or
/// parsing fails is logged and skipped; the others still produce cards.
pub fn generate_cards(
    generator: &dyn CardGenerator,
    sections: &[Section],
    title: &str,
    config: &PipelineConfig,
) -> Vec<Card> {
    let mut cards = Vec::new();
    let total = sections.len();
    for (idx, section) in sections.iter().enumerate() {
        if section.content.trim().is_empty() {
            debug!("Skipping empty section: {}", section.heading);
            continue;
        }
        info!("Section {}/{total}: {}", idx + 1, section.heading);
        let section_title = format!("{title} - {}", section.heading);
        let prompt = build_prompt(
            config.prompt_style,
            &section.content,
            &section_title,
            config.cards_per_concept,
        );
        let section_cards = generator
            .generate(&prompt)
            .and_then(|response| parse_cards(&response, &section_title));
        match section_cards {
            Ok(section_cards) => {
                info!("Generated {} cards for this section.", section_cards.len());
                cards.extend(section_cards.into_iter().map(|card| {
                    if section.heading.is_empty() {
                        card
                    } else {
                        card.with_tag(section_tag(&section.heading))
                    }
                }));
            }
            Err(e) => {
                warn!("Failed to generate cards for section '{}': {e}", section.heading);
            }
        }
    }
    cards
}

pub struct Pipeline<'a> {
    pub config: &'a PipelineConfig,
    pub source: &'a dyn BlockSource,
    pub generator: &'a dyn CardGenerator,
    pub writer: &'a dyn PackageWriter,
}

impl Pipeline<'_> {
    /// Run the whole conversion for one page. The deck is named after the page
    /// unless `deck_name` is given. Returns whatever the writer returns.
    pub fn run(&self, page_ref: &str, deck_name: Option<&str>) -> Fallible<String> {
        let page = self.source.fetch_page(page_ref)?;
        info!("Page retrieved: {} ({} blocks)", page.title, page.blocks.len());

        let content = normalize(&page.blocks, 0);
        if content.trim().is_empty() {
            return fail("No content found in the page");
        }
        info!("Parsed {} characters of content.", content.chars().count());

        let sections = segment_document(&content, self.config);
        info!("Processing {} section(s).", sections.len());

        let cards = generate_cards(self.generator, &sections, &page.title, self.config);
        if cards.is_empty() {
            return fail("No flashcards were generated");
        }
        info!("Generated {} flashcards.", cards.len());

        let rendered = render_cards(&cards);
        let deck_name = deck_name.unwrap_or(&page.title);
        let location = self.writer.write_package(deck_name, &rendered)?;
        info!("Wrote deck '{deck_name}' to {location}.");
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::types::block::BlockKind;

    struct StaticSource {
        blocks: Vec<Block>,
    }

    impl BlockSource for StaticSource {
        fn fetch_page(&self, page_ref: &str) -> Fallible<Page> {
            Ok(Page {
                id: page_ref.to_string(),
                title: "Rust Notes".to_string(),
                blocks: self.blocks.clone(),
            })
        }
    }

    /// Answers every prompt with one card echoing a marker found in the
    /// prompt, and fails for prompts containing "BROKEN".
    struct EchoGenerator {
        prompts: RefCell<Vec<String>>,
    }

    impl EchoGenerator {
        fn new() -> Self {
            Self {
                prompts: RefCell::new(Vec::new()),
            }
        }
    }

    impl CardGenerator for EchoGenerator {
        fn generate(&self, prompt: &str) -> Fallible<String> {
            self.prompts.borrow_mut().push(prompt.to_string());
            if prompt.contains("BROKEN") {
                return fail("generator timed out");
            }
            let marker = if prompt.contains("borrowing") {
                "borrow"
            } else {
                "other"
            };
            Ok(format!(
                r#"Sure! [{{"front": "What is {marker}?", "back": "`{marker}`", "type": "recall"}}]"#
            ))
        }
    }

    struct MemoryWriter {
        written: RefCell<Vec<(String, Vec<RenderedCard>)>>,
    }

    impl PackageWriter for MemoryWriter {
        fn write_package(&self, deck_name: &str, cards: &[RenderedCard]) -> Fallible<String> {
            self.written
                .borrow_mut()
                .push((deck_name.to_string(), cards.to_vec()));
            Ok(format!("memory://{deck_name}"))
        }
    }

    fn writer() -> MemoryWriter {
        MemoryWriter {
            written: RefCell::new(Vec::new()),
        }
    }

    #[test]
    fn test_generate_cards_tags_and_skips() {
        let sections = vec![
            Section::new("Borrow Checker", "borrowing rules"),
            Section::new("Empty", "   "),
            Section::new("Bad Section", "BROKEN"),
            Section::new("", "untitled content"),
        ];
        let generator = EchoGenerator::new();
        let cards = generate_cards(&generator, &sections, "Rust", &PipelineConfig::default());
        assert_eq!(generator.prompts.borrow().len(), 3);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].front(), "What is borrow?");
        assert_eq!(
            cards[0].tags(),
            &["Rust - Borrow Checker", "recall", "Borrow-Checker"]
        );
        assert_eq!(cards[1].tags(), &["Rust - ", "recall"]);
    }

    #[test]
    fn test_run_end_to_end() -> Fallible<()> {
        let source = StaticSource {
            blocks: vec![
                Block::text(BlockKind::Heading1, "Ownership"),
                Block::text(BlockKind::Paragraph, "borrowing rules"),
            ],
        };
        let generator = EchoGenerator::new();
        let writer = writer();
        let config = PipelineConfig::default();
        let pipeline = Pipeline {
            config: &config,
            source: &source,
            generator: &generator,
            writer: &writer,
        };
        let location = pipeline.run("abc123", None)?;
        assert_eq!(location, "memory://Rust Notes");
        let written = writer.written.borrow();
        let (deck_name, cards) = &written[0];
        assert_eq!(deck_name, "Rust Notes");
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].back_html, "<code>borrow</code>");
        assert_eq!(
            cards[0].tags,
            vec!["Rust Notes - Ownership", "recall", "Ownership"]
        );
        Ok(())
    }

    #[test]
    fn test_run_rejects_empty_page() {
        let source = StaticSource {
            blocks: vec![Block::text(BlockKind::Unsupported("image".into()), "x")],
        };
        let generator = EchoGenerator::new();
        let writer = writer();
        let config = PipelineConfig::default();
        let pipeline = Pipeline {
            config: &config,
            source: &source,
            generator: &generator,
            writer: &writer,
        };
        let err = pipeline.run("abc", Some("Deck")).unwrap_err();
        assert_eq!(err.to_string(), "error: No content found in the page");
        assert!(generator.prompts.borrow().is_empty());
    }

    #[test]
    fn test_run_fails_when_nothing_generated() {
        let source = StaticSource {
            blocks: vec![Block::text(BlockKind::Paragraph, "BROKEN")],
        };
        let generator = EchoGenerator::new();
        let writer = writer();
        let config = PipelineConfig::default();
        let pipeline = Pipeline {
            config: &config,
            source: &source,
            generator: &generator,
            writer: &writer,
        };
        let err = pipeline.run("abc", None).unwrap_err();
        assert_eq!(err.to_string(), "error: No flashcards were generated");
        assert!(writer.written.borrow().is_empty());
    }
}
