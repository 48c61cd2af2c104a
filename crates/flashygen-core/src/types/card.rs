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

use serde::Deserialize;
use serde::Serialize;

use crate::types::card_hash::CardHash;
use crate::types::card_hash::Hasher;

/// A question/answer study card.
///
/// Tags accumulate as the card moves through the pipeline: the deck title and
/// card type when it is parsed, then the section label. Tags are never
/// deduplicated.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Card {
    front: String,
    back: String,
    #[serde(default)]
    tags: Vec<String>,
}

impl Card {
    pub fn new(front: impl Into<String>, back: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
            tags,
        }
    }

    pub fn front(&self) -> &str {
        &self.front
    }

    pub fn back(&self) -> &str {
        &self.back
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the card with `tag` appended to its tags.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// The card type, which is the second tag assigned at parse time.
    pub fn card_type(&self) -> Option<&str> {
        self.tags.get(1).map(String::as_str)
    }

    /// A hash of the card's front and back. Tags don't participate.
    pub fn hash(&self) -> CardHash {
        let mut hasher = Hasher::new();
        hasher.update(b"front");
        hasher.update(self.front.as_bytes());
        hasher.update(b"back");
        hasher.update(self.back.as_bytes());
        hasher.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_append_only() {
        let card = Card::new("Q", "A", vec!["Rust".to_string(), "recall".to_string()])
            .with_tag("Ownership")
            .with_tag("Rust");
        assert_eq!(card.tags(), &["Rust", "recall", "Ownership", "Rust"]);
        assert_eq!(card.card_type(), Some("recall"));
    }

    #[test]
    fn test_hash_ignores_tags() {
        let a = Card::new("Q", "A", vec![]);
        let b = Card::new("Q", "A", vec!["x".to_string()]);
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn test_hash_distinguishes_front_and_back() {
        let a = Card::new("ab", "c", vec![]);
        let b = Card::new("a", "bc", vec![]);
        assert_ne!(a.hash(), b.hash());
    }
}
