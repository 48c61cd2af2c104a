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

use clap::Parser;
use flashygen_core::error::Fallible;

use crate::cmd::cards::parse_response;
use crate::cmd::export::export_deck;
use crate::cmd::preview::preview_deck;
use crate::cmd::sections::print_sections;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Normalize a saved page and split it into sections.
    Sections {
        /// Path to a JSON file holding the page's blocks.
        input: String,
        /// Path to a TOML configuration file. By default, built-in defaults are used.
        #[arg(long)]
        config: Option<String>,
        /// Optional path to the output file. By default, the output is printed to stdout.
        #[arg(long)]
        output: Option<String>,
    },
    /// Parse a saved generator response into cards.
    Cards {
        /// Path to the file holding the raw response.
        input: String,
        /// Title used to tag the cards, usually the page title.
        #[arg(long)]
        title: String,
        /// Heading of the section the response was generated for.
        #[arg(long)]
        section: Option<String>,
        /// Optional path to the output file. By default, the output is printed to stdout.
        #[arg(long)]
        output: Option<String>,
    },
    /// Render a cards file into a deck package.
    Export {
        /// Path to a JSON cards file.
        input: String,
        /// Name of the deck. By default, the input file name is used.
        #[arg(long)]
        deck_name: Option<String>,
        /// Path to the package file. By default, it is derived from the deck name.
        #[arg(long)]
        output: Option<String>,
    },
    /// Write an HTML page showing every card of a cards file.
    Preview {
        /// Path to a JSON cards file.
        input: String,
        /// Path to the HTML file. By default, it is derived from the input file name.
        #[arg(long)]
        output: Option<String>,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Sections {
            input,
            config,
            output,
        } => print_sections(&input, config, output),
        Command::Cards {
            input,
            title,
            section,
            output,
        } => parse_response(&input, &title, section, output),
        Command::Export {
            input,
            deck_name,
            output,
        } => export_deck(&input, deck_name, output),
        Command::Preview { input, output } => preview_deck(&input, output),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_command_definition() {
        Command::command().debug_assert();
    }

    #[test]
    fn test_parse_cards_arguments() {
        let cli = Command::try_parse_from([
            "flashygen",
            "cards",
            "response.txt",
            "--title",
            "Rust",
            "--section",
            "Traits",
        ]);
        match cli {
            Ok(Command::Cards { title, section, .. }) => {
                assert_eq!(title, "Rust");
                assert_eq!(section.as_deref(), Some("Traits"));
            }
            _ => panic!("expected the cards command"),
        }
    }

    #[test]
    fn test_cards_requires_title() {
        assert!(Command::try_parse_from(["flashygen", "cards", "response.txt"]).is_err());
    }
}
