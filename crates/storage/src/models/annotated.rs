use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Byte span of an extraction inside the source text.
///
/// Offsets always fall on UTF-8 character boundaries of the text they were
/// aligned against, with `start_pos < end_pos`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CharInterval {
    pub start_pos: usize,
    pub end_pos: usize,
}

impl CharInterval {
    pub fn new(start_pos: usize, end_pos: usize) -> Self {
        Self { start_pos, end_pos }
    }

    pub fn len(&self) -> usize {
        self.end_pos.saturating_sub(self.start_pos)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn shifted(self, offset: usize) -> Self {
        Self {
            start_pos: self.start_pos + offset,
            end_pos: self.end_pos + offset,
        }
    }

    pub fn overlaps(&self, other: &CharInterval) -> bool {
        self.start_pos < other.end_pos && other.start_pos < self.end_pos
    }

    /// Returns the spanned slice if the interval is valid for `text`.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        if self.is_empty() {
            return None;
        }
        text.get(self.start_pos..self.end_pos)
    }
}

/// How an extraction was located in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentStatus {
    MatchExact,
    MatchCaseInsensitive,
    MatchFuzzy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Extraction {
    pub extraction_class: String,
    pub extraction_text: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub char_interval: Option<CharInterval>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment_status: Option<AlignmentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_index: Option<usize>,
}

impl Extraction {
    pub fn new(extraction_class: impl Into<String>, extraction_text: impl Into<String>) -> Self {
        Self {
            extraction_class: extraction_class.into(),
            extraction_text: extraction_text.into(),
            attributes: BTreeMap::new(),
            char_interval: None,
            alignment_status: None,
            extraction_index: None,
            group_index: None,
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn is_grounded(&self) -> bool {
        self.char_interval.is_some()
    }
}

/// A worked input/output pair shown to the model before the real text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExampleData {
    pub text: String,
    pub extractions: Vec<Extraction>,
}

impl ExampleData {
    pub fn new(text: impl Into<String>, extractions: Vec<Extraction>) -> Self {
        Self {
            text: text.into(),
            extractions,
        }
    }
}

/// Source text together with everything extracted from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnnotatedDocument {
    pub document_id: String,
    pub text: String,
    #[serde(default)]
    pub extractions: Vec<Extraction>,
}

impl AnnotatedDocument {
    pub fn new(text: impl Into<String>, extractions: Vec<Extraction>) -> Self {
        let id = Uuid::new_v4().simple().to_string();
        Self {
            document_id: format!("doc_{}", &id[..8]),
            text: text.into(),
            extractions,
        }
    }

    pub fn len(&self) -> usize {
        self.extractions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractions.is_empty()
    }

    pub fn grounded_count(&self) -> usize {
        self.extractions.iter().filter(|e| e.is_grounded()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_overlap_is_half_open() {
        let a = CharInterval::new(0, 5);
        let b = CharInterval::new(5, 9);
        let c = CharInterval::new(4, 6);

        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(b.overlaps(&c));
    }

    #[test]
    fn interval_slice_rejects_out_of_range() {
        let text = "risk factors";
        assert_eq!(CharInterval::new(0, 4).slice(text), Some("risk"));
        assert_eq!(CharInterval::new(5, 40).slice(text), None);
        assert_eq!(CharInterval::new(3, 3).slice(text), None);
    }

    #[test]
    fn extraction_omits_empty_fields_when_serialized() {
        let extraction = Extraction::new("item", "regulatory risks");
        let json = serde_json::to_string(&extraction).unwrap();

        assert_eq!(
            json,
            r#"{"extraction_class":"item","extraction_text":"regulatory risks"}"#
        );
    }

    #[test]
    fn document_ids_are_prefixed_and_unique() {
        let a = AnnotatedDocument::new("text", vec![]);
        let b = AnnotatedDocument::new("text", vec![]);

        assert!(a.document_id.starts_with("doc_"));
        assert_eq!(a.document_id.len(), 12);
        assert_ne!(a.document_id, b.document_id);
    }
}
