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

//! Rendering of the card markdown dialect to HTML.
//!
//! This is not a markdown parser. The dialect is small (fenced code, inline
//! code, bold, italic, line breaks) and is rewritten by a fixed sequence of
//! regex passes. Fenced code is cut out first so that nothing inside it is
//! touched by the later passes; inline code is shielded the same way from the
//! emphasis passes.

pub mod highlight;

use std::sync::LazyLock;

use regex::Captures;
use regex::Regex;

use crate::render::highlight::highlight;

/// Label used for fenced blocks that don't declare a language.
pub const DEFAULT_CODE_LABEL: &str = "code";

static FENCED_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```([^\s`]+)?[^\S\n]*\n(.*?)```").expect("invalid fence regex")
});

static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("invalid inline code regex"));

static BOLD_STARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("invalid bold regex"));

static BOLD_UNDERSCORES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__(.+?)__").expect("invalid bold regex"));

static ITALIC_STAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*]+?)\*").expect("invalid italic regex"));

static ITALIC_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_([^_]+?)_").expect("invalid italic regex"));

// Private-use code points delimit placeholders for shielded inline code.
const SHIELD_OPEN: char = '\u{E000}';
const SHIELD_CLOSE: char = '\u{E001}';

static SHIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\u{E000}(\\d+)\u{E001}").expect("invalid shield regex"));

/// Escape the characters that would otherwise be read as markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

/// Render card text to HTML.
///
/// Fenced code blocks become `<pre data-language="…"><code>…</code></pre>`
/// with highlighted contents. In the remaining text, inline code becomes
/// `<code>`, `**`/`__` become `<strong>`, `*`/`_` become `<em>` unless
/// preceded by a backslash, and newlines become `<br>`.
pub fn render(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in FENCED_CODE.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&render_prose(&text[last..whole.start()]));
        let language = caps.get(1).map_or(DEFAULT_CODE_LABEL, |m| m.as_str());
        let code = caps.get(2).map_or("", |m| m.as_str()).trim();
        out.push_str(&format!(
            r#"<pre data-language="{}"><code>{}</code></pre>"#,
            escape_html(language).replace('"', "&quot;"),
            highlight(code, language)
        ));
        last = whole.end();
    }
    out.push_str(&render_prose(&text[last..]));
    out
}

/// Render text that contains no fenced code.
fn render_prose(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    // Placeholder delimiters in the input itself are written as references.
    let escaped = escape_html(text)
        .replace(SHIELD_OPEN, "&#xE000;")
        .replace(SHIELD_CLOSE, "&#xE001;");

    let mut codes: Vec<String> = Vec::new();
    let shielded = INLINE_CODE
        .replace_all(&escaped, |caps: &Captures| {
            codes.push(format!("<code>{}</code>", &caps[1]));
            format!("{SHIELD_OPEN}{}{SHIELD_CLOSE}", codes.len() - 1)
        })
        .into_owned();

    let text = BOLD_STARS.replace_all(&shielded, "<strong>$1</strong>");
    let text = BOLD_UNDERSCORES.replace_all(&text, "<strong>$1</strong>");
    let text = replace_unescaped(&text, &ITALIC_STAR, "em");
    let text = replace_unescaped(&text, &ITALIC_UNDERSCORE, "em");

    let text = SHIELD.replace_all(&text, |caps: &Captures| {
        caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|idx| codes.get(idx).cloned())
            .unwrap_or_else(|| caps[0].to_string())
    });
    text.replace('\n', "<br>")
}

/// Wrap every match of `pattern` in `<tag>`, except matches directly preceded
/// by a backslash. `pattern` must start with a single-byte character.
fn replace_unescaped(text: &str, pattern: &Regex, tag: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut pos = 0;
    while pos < text.len() {
        let Some(caps) = pattern.captures_at(text, pos) else {
            break;
        };
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        if text[..whole.start()].ends_with('\\') {
            pos = whole.start() + 1;
            continue;
        }
        out.push_str(&text[last..whole.start()]);
        out.push_str(&format!("<{tag}>{}</{tag}>", inner.as_str()));
        last = whole.end();
        pos = whole.end();
    }
    out.push_str(&text[last..]);
    out
}
