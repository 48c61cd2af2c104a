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

/// Inline formatting flags attached to a span of text.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
}

/// A run of text with uniform formatting.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct InlineSpan {
    pub text: String,
    pub annotations: Annotations,
}

impl InlineSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            annotations: Annotations::default(),
        }
    }

    pub fn bold(mut self) -> Self {
        self.annotations.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.annotations.italic = true;
        self
    }

    pub fn code(mut self) -> Self {
        self.annotations.code = true;
        self
    }
}

/// The type of a block, along with any attributes specific to that type.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum BlockKind {
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    BulletedItem,
    NumberedItem,
    Checklist { checked: bool },
    Toggle,
    Code { language: String },
    Quote,
    /// A callout, with the emoji of its icon when the icon is an emoji.
    Callout { emoji: Option<String> },
    Divider,
    /// A block type we don't know how to flatten. Carries the source type name.
    Unsupported(String),
}

/// One structural unit of a source document. Blocks own their children.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Block {
    pub kind: BlockKind,
    pub spans: Vec<InlineSpan>,
    pub children: Vec<Block>,
}

impl Block {
    pub fn new(kind: BlockKind, spans: Vec<InlineSpan>) -> Self {
        Self {
            kind,
            spans,
            children: Vec::new(),
        }
    }

    /// A block holding a single unformatted span.
    pub fn text(kind: BlockKind, text: &str) -> Self {
        Self::new(kind, vec![InlineSpan::plain(text)])
    }

    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.children = children;
        self
    }
}
