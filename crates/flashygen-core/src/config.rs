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

use crate::error::Fallible;
use crate::prompt::PromptStyle;

/// Knobs for segmentation and generation. Every field has a default, so an
/// empty TOML document is a valid configuration.
#[derive(Clone, PartialEq, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Sections shorter than this (in characters) are candidates for merging.
    pub min_section_size: usize,
    /// Upper bound on the number of sections sent to the generator.
    pub max_sections: usize,
    /// If splitting on top-level headings yields fewer sections than this,
    /// second-level headings are tried as well.
    pub min_top_level_sections: usize,
    /// Whether sections larger than `max_section_size` are split.
    pub split_large_sections: bool,
    /// Content budget (in characters) for a single section.
    pub max_section_size: usize,
    /// How many cards to ask for per concept.
    pub cards_per_concept: usize,
    pub prompt_style: PromptStyle,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_section_size: 800,
            max_sections: 20,
            min_top_level_sections: 3,
            split_large_sections: true,
            max_section_size: 2500,
            cards_per_concept: 3,
            prompt_style: PromptStyle::Detailed,
        }
    }
}

impl PipelineConfig {
    pub fn from_toml(text: &str) -> Fallible<Self> {
        let config: PipelineConfig = toml::from_str(text)?;
        Ok(config)
    }

    /// The split budget, if splitting is enabled.
    pub fn split_budget(&self) -> Option<usize> {
        if self.split_large_sections {
            Some(self.max_section_size)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() -> Fallible<()> {
        let config = PipelineConfig::from_toml("")?;
        assert_eq!(config, PipelineConfig::default());
        Ok(())
    }

    #[test]
    fn test_partial_override() -> Fallible<()> {
        let config = PipelineConfig::from_toml(
            "max_sections = 5\nsplit_large_sections = false\nprompt_style = \"direct\"\n",
        )?;
        assert_eq!(config.max_sections, 5);
        assert_eq!(config.min_section_size, 800);
        assert_eq!(config.split_budget(), None);
        assert_eq!(config.prompt_style, PromptStyle::Direct);
        Ok(())
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = PipelineConfig::from_toml("max_section = 5\n");
        assert!(result.is_err());
    }
}
