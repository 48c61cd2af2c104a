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

//! Heuristic syntax highlighting.
//!
//! This is a fixed chain of regex passes over escaped code, not a tokenizer.
//! Each pass wraps one lexical category in `<span class="…">`, and only
//! rewrites text that no earlier pass has wrapped: a keyword inside a string,
//! or a number inside a comment, stays plain. Spans are never nested.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::render::escape_html;

pub const COMMENT: &str = "comment";
pub const STRING: &str = "string";
pub const KEYWORD: &str = "keyword";
pub const NUMBER: &str = "number";
pub const FUNCTION: &str = "function";

/// Keyword table used for languages not listed in [`KEYWORDS`].
const DEFAULT_LANGUAGE: &str = "python";

const KEYWORDS: &[(&str, &[&str])] = &[
    (
        "python",
        &[
            "def", "class", "import", "from", "as", "if", "elif", "else", "for", "while", "in",
            "return", "try", "except", "finally", "with", "lambda", "yield", "async", "await",
            "pass", "break", "continue", "raise", "assert", "global", "nonlocal", "and", "or",
            "not", "is", "True", "False", "None",
        ],
    ),
    (
        "javascript",
        &[
            "function", "const", "let", "var", "if", "else", "for", "while", "return", "class",
            "extends", "import", "export", "from", "as", "async", "await", "try", "catch",
            "finally", "throw", "new", "this", "super", "static", "yield", "break", "continue",
            "switch", "case", "default", "typeof", "instanceof", "in", "of", "delete", "void",
            "true", "false", "null", "undefined",
        ],
    ),
    (
        "typescript",
        &[
            "function", "const", "let", "var", "if", "else", "for", "while", "return", "class",
            "extends", "implements", "import", "export", "from", "as", "async", "await", "try",
            "catch", "finally", "throw", "new", "this", "super", "static", "yield", "break",
            "continue", "switch", "case", "default", "typeof", "instanceof", "in", "of", "delete",
            "void", "true", "false", "null", "undefined", "interface", "type", "enum",
            "namespace", "abstract", "readonly", "public", "private", "protected",
        ],
    ),
    (
        "java",
        &[
            "public", "private", "protected", "class", "interface", "extends", "implements",
            "new", "return", "if", "else", "for", "while", "do", "switch", "case", "default",
            "break", "continue", "try", "catch", "finally", "throw", "throws", "import",
            "package", "static", "final", "abstract", "synchronized", "volatile", "transient",
            "native", "strictfp", "void", "boolean", "byte", "char", "short", "int", "long",
            "float", "double", "true", "false", "null", "this", "super",
        ],
    ),
    (
        "c",
        &[
            "int", "char", "float", "double", "void", "struct", "union", "enum", "typedef",
            "sizeof", "if", "else", "for", "while", "do", "switch", "case", "default", "break",
            "continue", "return", "goto", "auto", "register", "static", "extern", "const",
            "volatile", "signed", "unsigned", "short", "long",
        ],
    ),
    (
        "cpp",
        &[
            "int", "char", "float", "double", "void", "bool", "struct", "class", "union", "enum",
            "typedef", "namespace", "using", "template", "typename", "public", "private",
            "protected", "virtual", "override", "final", "static", "const", "volatile",
            "mutable", "if", "else", "for", "while", "do", "switch", "case", "default", "break",
            "continue", "return", "try", "catch", "throw", "new", "delete", "this", "nullptr",
            "true", "false", "auto",
        ],
    ),
    (
        "go",
        &[
            "package", "import", "func", "var", "const", "type", "struct", "interface", "map",
            "chan", "if", "else", "for", "range", "switch", "case", "default", "break",
            "continue", "return", "defer", "go", "select", "fallthrough", "goto", "true",
            "false", "nil", "make", "new", "len", "cap", "append", "copy", "delete", "panic",
            "recover",
        ],
    ),
    (
        "rust",
        &[
            "fn", "let", "mut", "const", "static", "struct", "enum", "impl", "trait", "type",
            "mod", "use", "pub", "crate", "super", "self", "if", "else", "match", "loop",
            "while", "for", "in", "break", "continue", "return", "move", "ref", "as", "unsafe",
            "async", "await", "dyn", "where", "true", "false", "Some", "None", "Ok", "Err",
        ],
    ),
    (
        "ruby",
        &[
            "def", "class", "module", "if", "elsif", "else", "unless", "case", "when", "for",
            "while", "until", "loop", "break", "next", "return", "yield", "begin", "rescue",
            "ensure", "end", "do", "then", "and", "or", "not", "true", "false", "nil", "self",
            "super", "include", "extend", "require", "attr_accessor", "attr_reader",
            "attr_writer",
        ],
    ),
    (
        "php",
        &[
            "function", "class", "interface", "trait", "extends", "implements", "new", "return",
            "if", "else", "elseif", "for", "foreach", "while", "do", "switch", "case", "default",
            "break", "continue", "try", "catch", "finally", "throw", "public", "private",
            "protected", "static", "final", "abstract", "const", "var", "echo", "print",
            "require", "include", "namespace", "use", "as", "true", "false", "null", "this",
            "self", "parent",
        ],
    ),
    (
        "sql",
        &[
            "SELECT", "FROM", "WHERE", "JOIN", "INNER", "LEFT", "RIGHT", "OUTER", "ON", "GROUP",
            "BY", "ORDER", "ASC", "DESC", "HAVING", "INSERT", "INTO", "VALUES", "UPDATE", "SET",
            "DELETE", "CREATE", "TABLE", "DATABASE", "INDEX", "ALTER", "DROP", "TRUNCATE",
            "UNION", "ALL", "DISTINCT", "AS", "AND", "OR", "NOT", "IN", "BETWEEN", "LIKE", "IS",
            "NULL", "TRUE", "FALSE", "LIMIT",
        ],
    ),
    (
        "shell",
        &[
            "if", "then", "else", "elif", "fi", "case", "esac", "for", "while", "until", "do",
            "done", "function", "return", "exit", "break", "continue", "echo", "printf", "read",
            "cd", "ls", "mkdir", "rm", "cp", "mv", "grep", "sed", "awk", "sudo", "chmod",
            "chown", "export", "source", "alias",
        ],
    ),
];

static KEYWORD_PATTERNS: LazyLock<HashMap<&'static str, Regex>> = LazyLock::new(|| {
    KEYWORDS
        .iter()
        .map(|(language, words)| {
            let pattern = format!(r"\b(?:{})\b", words.join("|"));
            let regex = Regex::new(&pattern).expect("invalid keyword regex");
            (*language, regex)
        })
        .collect()
});

static SLASH_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//[^\n]*").expect("invalid comment regex"));
static HASH_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[^\n]*").expect("invalid comment regex"));
static DASH_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"--[^\n]*").expect("invalid comment regex"));

static C_BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("invalid comment regex"));
static DOUBLE_DOCSTRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)""".*?""""#).expect("invalid comment regex"));
static SINGLE_DOCSTRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)'''.*?'''").expect("invalid comment regex"));

static DOUBLE_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(?:[^"\\]|\\.)*""#).expect("invalid string regex"));
static SINGLE_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'(?:[^'\\]|\\.)*'").expect("invalid string regex"));
static BACKTICK_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`(?:[^`\\]|\\.)*`").expect("invalid string regex"));

static NUMBER_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+\.?\d*\b").expect("invalid number regex"));

static FUNCTION_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?P<name>[A-Za-z_]\w*)(?P<rest>\s*\()").expect("invalid call regex")
});

/// Map a declared language tag onto a [`KEYWORDS`] entry. Unknown tags map to
/// the default language.
pub fn keyword_language(language: &str) -> &'static str {
    let language = language.to_lowercase();
    let canonical = match language.as_str() {
        "py" | "python3" => "python",
        "js" | "jsx" | "node" => "javascript",
        "ts" | "tsx" => "typescript",
        "c++" | "cc" | "cxx" | "hpp" => "cpp",
        "h" => "c",
        "golang" => "go",
        "rs" => "rust",
        "rb" => "ruby",
        "bash" | "sh" | "zsh" | "console" => "shell",
        "postgres" | "postgresql" | "mysql" | "sqlite" => "sql",
        other => other,
    };
    KEYWORDS
        .iter()
        .map(|(name, _)| *name)
        .find(|name| *name == canonical)
        .unwrap_or(DEFAULT_LANGUAGE)
}

/// Highlight `code` written in `language`, returning escaped HTML.
///
/// Never fails: unknown languages use the default keyword table and patterns
/// that don't match leave the text unchanged.
pub fn highlight(code: &str, language: &str) -> String {
    let html = escape_html(code);
    let html = line_comments(&html);
    let html = block_comments(&html);
    let html = strings(&html);
    let html = keywords(&html, language);
    let html = numbers(&html);
    function_calls(&html)
}

/// `//`, `#` and `--` comments, up to the end of the line.
pub fn line_comments(html: &str) -> String {
    let html = wrap(html, &SLASH_COMMENT, COMMENT);
    let html = wrap(&html, &HASH_COMMENT, COMMENT);
    wrap(&html, &DASH_COMMENT, COMMENT)
}

/// `/* */` comments and triple-quoted docstrings, across lines.
pub fn block_comments(html: &str) -> String {
    let html = wrap(html, &C_BLOCK_COMMENT, COMMENT);
    let html = wrap(&html, &DOUBLE_DOCSTRING, COMMENT);
    wrap(&html, &SINGLE_DOCSTRING, COMMENT)
}

/// Double-quoted, single-quoted and backtick-quoted literals.
pub fn strings(html: &str) -> String {
    let html = wrap(html, &DOUBLE_QUOTED, STRING);
    let html = wrap(&html, &SINGLE_QUOTED, STRING);
    wrap(&html, &BACKTICK_QUOTED, STRING)
}

pub fn keywords(html: &str, language: &str) -> String {
    match KEYWORD_PATTERNS.get(keyword_language(language)) {
        Some(pattern) => wrap(html, pattern, KEYWORD),
        None => html.to_string(),
    }
}

pub fn numbers(html: &str) -> String {
    wrap(html, &NUMBER_LITERAL, NUMBER)
}

/// Identifiers directly followed by an opening parenthesis.
pub fn function_calls(html: &str) -> String {
    let replacement = format!(r#"<span class="{FUNCTION}">$name</span>$rest"#);
    rewrite_plain(html, |text| {
        FUNCTION_CALL
            .replace_all(text, replacement.as_str())
            .into_owned()
    })
}

/// Wrap every match of `pattern` in plain text with a span of `class`.
fn wrap(html: &str, pattern: &Regex, class: &str) -> String {
    let replacement = format!(r#"<span class="{class}">$0</span>"#);
    rewrite_plain(html, |text| {
        pattern.replace_all(text, replacement.as_str()).into_owned()
    })
}

/// Apply `rewrite` to each run of text that is neither a tag nor inside a
/// span. The input is escaped, so every `<` starts a tag we emitted.
fn rewrite_plain(html: &str, mut rewrite: impl FnMut(&str) -> String) -> String {
    let mut out = String::with_capacity(html.len());
    let mut depth: usize = 0;
    let mut rest = html;
    while !rest.is_empty() {
        if rest.starts_with('<') {
            let end = rest.find('>').map_or(rest.len(), |idx| idx + 1);
            let tag = &rest[..end];
            if tag.starts_with("</") {
                depth = depth.saturating_sub(1);
            } else {
                depth += 1;
            }
            out.push_str(tag);
            rest = &rest[end..];
            continue;
        }
        let end = rest.find('<').unwrap_or(rest.len());
        let text = &rest[..end];
        if depth == 0 {
            out.push_str(&rewrite(text));
        } else {
            out.push_str(text);
        }
        rest = &rest[end..];
    }
    out
}
