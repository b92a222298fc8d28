use serde::Serialize;
use std::collections::HashMap;

use crate::prompt::INSTRUCTION_PROMPT;

/// An uploaded image ready to be sent to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// The multimodal request for one submission.
///
/// Parts are sent in the order instruction, image, user text. The
/// instruction is always [`INSTRUCTION_PROMPT`] and cannot be set by callers.
#[derive(Debug, Clone)]
pub struct PromptRequest {
    instruction: &'static str,
    image: ImagePayload,
    user_text: String,
}

impl PromptRequest {
    pub fn new(image: ImagePayload, user_text: impl Into<String>) -> Self {
        PromptRequest {
            instruction: INSTRUCTION_PROMPT,
            image,
            user_text: user_text.into(),
        }
    }

    pub fn instruction(&self) -> &str {
        self.instruction
    }

    pub fn image(&self) -> &ImagePayload {
        &self.image
    }

    pub fn user_text(&self) -> &str {
        &self.user_text
    }
}

/// Anything that carries the text of a model reply
pub trait TextBearing {
    fn text(&self) -> &str;
}

/// Text returned by a vision model, with the model version when reported
#[derive(Debug, Clone, Default)]
pub struct ModelReply {
    pub text: String,
    pub model_version: Option<String>,
}

impl TextBearing for ModelReply {
    fn text(&self) -> &str {
        &self.text
    }
}

impl TextBearing for String {
    fn text(&self) -> &str {
        self
    }
}

impl TextBearing for str {
    fn text(&self) -> &str {
        self
    }
}

/// A nutrition table extracted from a model reply.
///
/// Every row is keyed by the entries of `headers`; rows keep the order they
/// had in the reply, including a final totals row if the model wrote one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

impl ParsedTable {
    /// Cell for `header` in row `row`, if that row has it
    pub fn cell(&self, row: usize, header: &str) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(header))
            .map(String::as_str)
    }
}

/// Result of extracting a table from a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// A nutrition table was found
    Table(ParsedTable),
    /// No table was found; the reply text, unchanged
    Text(String),
}

impl Extraction {
    pub fn as_table(&self) -> Option<&ParsedTable> {
        match self {
            Extraction::Table(table) => Some(table),
            Extraction::Text(_) => None,
        }
    }
}
