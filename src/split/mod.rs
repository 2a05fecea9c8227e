//! Multi-document YAML splitting
//!
//! A manifest file may hold any number of YAML documents separated by `---`
//! lines. Controller-generated CRDs routinely embed `---` inside field
//! descriptions, so documents are cut by serde_yaml's multi-document
//! deserializer rather than by text. Only the opt-in legacy mode works on the
//! raw text.
//!
//! A YAML syntax error cannot be resynchronized: the failing document is
//! yielded as an error and the rest of that file is dropped. Documents before
//! it are kept.

use std::borrow::Cow;
use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value;
use tracing::warn;

/// Document start marker
pub const SEPARATOR: &str = "---";

/// Text whose presence makes [`SplitMode::StripSeparators`] rewrite a file
const STRIP_TRIGGER: &str = "CustomResourceDefinition";

/// How a manifest file is cut into documents
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SplitMode {
    /// Split on YAML document boundaries
    #[default]
    BoundaryAware,
    /// Legacy behavior: delete every `---` from files mentioning a
    /// CustomResourceDefinition, then split everything else on any `---`
    /// substring. Can merge or corrupt legitimate multi-document files.
    StripSeparators,
}

/// One YAML document read from a manifest file
#[derive(Debug)]
pub struct RawDocument<'a> {
    /// File the document came from
    pub path: &'a Path,
    /// 1-based position of the document in its file
    pub index: usize,
    /// Parsed document, or the parse failure
    pub body: Result<Value, serde_yaml::Error>,
}

/// Split a manifest file into its documents.
///
/// Empty documents (nothing but whitespace and comments) are dropped.
pub fn documents<'a>(path: &'a Path, text: &'a str, mode: SplitMode) -> Documents<'a> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    match mode {
        SplitMode::BoundaryAware => Documents::Parsed(Parsed {
            path,
            stream: Some(serde_yaml::Deserializer::from_str(text)),
            index: 0,
        }),
        SplitMode::StripSeparators => Documents::Stripped(strip_and_split(path, text).into_iter()),
    }
}

/// Lazy sequence of documents returned by [`documents`]
pub enum Documents<'a> {
    /// Documents parsed from a YAML stream
    Parsed(Parsed<'a>),
    /// Pre-split output of the legacy stripping mode
    Stripped(std::vec::IntoIter<RawDocument<'a>>),
}

impl<'a> Iterator for Documents<'a> {
    type Item = RawDocument<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Documents::Parsed(parsed) => parsed.next(),
            Documents::Stripped(docs) => docs.next(),
        }
    }
}

/// Documents of one YAML stream, fused after the first failure
pub struct Parsed<'a> {
    path: &'a Path,
    stream: Option<serde_yaml::Deserializer<'a>>,
    index: usize,
}

impl<'a> Iterator for Parsed<'a> {
    type Item = RawDocument<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(document) = self.stream.as_mut()?.next() else {
                self.stream = None;
                return None;
            };
            self.index += 1;

            match Value::deserialize(document) {
                Ok(Value::Null) => continue,
                Ok(value) => return Some(self.document(Ok(value))),
                Err(error) => {
                    // The parser stays in its error state and would repeat
                    // this failure forever
                    self.stream = None;
                    return Some(self.document(Err(error)));
                }
            }
        }
    }
}

impl<'a> Parsed<'a> {
    fn document(&self, body: Result<Value, serde_yaml::Error>) -> RawDocument<'a> {
        RawDocument {
            path: self.path,
            index: self.index,
            body,
        }
    }
}

// =============================================================================
// Legacy stripping mode
// =============================================================================

fn is_blank(content: &str) -> bool {
    content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    })
}

fn strip_and_split<'a>(path: &'a Path, text: &str) -> Vec<RawDocument<'a>> {
    let text: Cow<'_, str> = if text.contains(STRIP_TRIGGER) && text.contains(SEPARATOR) {
        warn!(
            path = %path.display(),
            "Stripping every '---' from manifest containing a CustomResourceDefinition"
        );
        Cow::Owned(text.replace(SEPARATOR, ""))
    } else {
        Cow::Borrowed(text)
    };

    text.split(SEPARATOR)
        .filter(|piece| !is_blank(piece))
        .map(|piece| serde_yaml::from_str::<Value>(piece))
        .filter(|body| !matches!(body, Ok(Value::Null)))
        .enumerate()
        .map(|(i, body)| RawDocument {
            path,
            index: i + 1,
            body,
        })
        .collect()
}
