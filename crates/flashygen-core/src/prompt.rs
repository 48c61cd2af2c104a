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

/// How the generation request is phrased.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptStyle {
    /// A conversational request suited to large hosted models.
    #[default]
    Detailed,
    /// Short imperative instructions for small local models that drift into
    /// chatter when given room to.
    Direct,
}

/// Card types the generator is asked to choose from.
pub const CARD_TYPES: [&str; 5] = ["recall", "conceptual", "application", "comparison", "command"];

/// Build the prompt that asks the generator for cards covering `content`.
pub fn build_prompt(
    style: PromptStyle,
    content: &str,
    title: &str,
    cards_per_concept: usize,
) -> String {
    match style {
        PromptStyle::Detailed => detailed_prompt(content, title, cards_per_concept),
        PromptStyle::Direct => direct_prompt(content, title),
    }
}

fn detailed_prompt(content: &str, title: &str, cards_per_concept: usize) -> String {
    let types = CARD_TYPES.join(", ");
    format!(
        r#"You write flashcards for spaced repetition.

The notes below come from a page titled "{title}". Turn them into a complete set of flashcards.

Coverage rules:
- Every code example, command, function and technique is its own learnable item.
- Give each item its own card. Never bundle several commands into one card.
- Prefer many small, focused cards over a few large ones.
- Aim for about {cards_per_concept} cards per concept, and at least one per code example.
- Mix the question angle: what it is, why it works, when to use it, how it differs from a neighbour, and the exact syntax.

Card types: {types}.

Answers must show working code in fenced blocks with a language tag, for example:
```python
def greet(name):
    return f"Hello, {{name}}"
```

Write cards about the notes below, not about these instructions.

Notes:
{content}

Respond with a JSON array only. Each element has:
- "front": the question
- "back": the answer, with code blocks where useful
- "type": one of {types}

Escape newlines inside strings as \n and tabs as \t. Return nothing but the JSON array."#
    )
}

fn direct_prompt(content: &str, title: &str) -> String {
    format!(
        r#"Generate flashcards from the content below.

RULES:
1. Output ONLY a JSON array. No explanations, no extra text.
2. Every code example gets its own flashcard.
3. Use the content below, not the example in these rules.

FORMAT (use \n for newlines inside strings):
[
  {{"front": "Question", "back": "```cpp\nauto x = 42;\n```", "type": "command"}}
]

CONTENT (from "{title}"):
{content}

RETURN ONLY THE JSON ARRAY, STARTING WITH [ AND ENDING WITH ]"#
    )
}
