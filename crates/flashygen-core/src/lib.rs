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

//! flashygen-core: turning structured notes into question/answer decks.
//!
//! This library holds everything that does not touch the outside world:
//! - Normalizing Notion-style blocks into Markdown-like text
//! - Segmenting that text into sections sized for card generation
//! - Building generation prompts and coercing responses into cards
//! - Rendering card text to HTML with lightweight syntax highlighting
//!
//! Fetching pages, calling a generator and writing packages are left to the
//! collaborator traits in [`pipeline`].

pub mod config;
pub mod error;
pub mod normalize;
pub mod notion;
pub mod package;
pub mod pipeline;
pub mod prompt;
pub mod render;
pub mod response;
pub mod segment;
pub mod types;

// Re-exports for convenience
pub use config::PipelineConfig;
pub use error::{ErrorReport, Fallible, fail};
pub use normalize::normalize;
pub use package::{DeckPackage, RenderedCard, render_cards};
pub use pipeline::{BlockSource, CardGenerator, PackageWriter, Page, Pipeline, generate_cards};
pub use prompt::{PromptStyle, build_prompt};
pub use render::highlight::highlight;
pub use render::render;
pub use response::parse_cards;
pub use segment::{merge_small_sections, segment, segment_document, split_large_sections};
pub use types::block::{Annotations, Block, BlockKind, InlineSpan};
pub use types::card::Card;
pub use types::card_hash::CardHash;
pub use types::section::Section;
