//! Project variants.
//!
//! The original system modelled each variant as a subclass; here a single
//! `projects` row carries a [`ProjectType`] tag plus a handful of sparse
//! type-specific columns, and behaviour differences are dispatched on the
//! tag.

use serde::{Deserialize, Serialize};

/// The kind of annotation work a project holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectType {
    TextClassification,
    SequenceLabeling,
    Seq2seq,
    IntentDetectionAndSlotFilling,
    Speech2text,
    ImageClassification,
    BoundingBox,
    Segmentation,
    ImageCaptioning,
}

impl ProjectType {
    /// Whether examples in this project are plain text (as opposed to an
    /// uploaded image or audio file).
    pub fn is_text_project(self) -> bool {
        matches!(
            self,
            ProjectType::TextClassification
                | ProjectType::SequenceLabeling
                | ProjectType::Seq2seq
                | ProjectType::IntentDetectionAndSlotFilling
        )
    }

    /// The canonical wire name, stored in the `project_type` column.
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectType::TextClassification => "TextClassification",
            ProjectType::SequenceLabeling => "SequenceLabeling",
            ProjectType::Seq2seq => "Seq2seq",
            ProjectType::IntentDetectionAndSlotFilling => "IntentDetectionAndSlotFilling",
            ProjectType::Speech2text => "Speech2text",
            ProjectType::ImageClassification => "ImageClassification",
            ProjectType::BoundingBox => "BoundingBox",
            ProjectType::Segmentation => "Segmentation",
            ProjectType::ImageCaptioning => "ImageCaptioning",
        }
    }

    /// Parse a wire name back into a variant.
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "TextClassification" => ProjectType::TextClassification,
            "SequenceLabeling" => ProjectType::SequenceLabeling,
            "Seq2seq" => ProjectType::Seq2seq,
            "IntentDetectionAndSlotFilling" => ProjectType::IntentDetectionAndSlotFilling,
            "Speech2text" => ProjectType::Speech2text,
            "ImageClassification" => ProjectType::ImageClassification,
            "BoundingBox" => ProjectType::BoundingBox,
            "Segmentation" => ProjectType::Segmentation,
            "ImageCaptioning" => ProjectType::ImageCaptioning,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_projects_are_classified() {
        assert!(ProjectType::TextClassification.is_text_project());
        assert!(ProjectType::SequenceLabeling.is_text_project());
        assert!(!ProjectType::Speech2text.is_text_project());
        assert!(!ProjectType::BoundingBox.is_text_project());
    }

    #[test]
    fn wire_names_round_trip() {
        for ty in [
            ProjectType::TextClassification,
            ProjectType::SequenceLabeling,
            ProjectType::Seq2seq,
            ProjectType::IntentDetectionAndSlotFilling,
            ProjectType::Speech2text,
            ProjectType::ImageClassification,
            ProjectType::BoundingBox,
            ProjectType::Segmentation,
            ProjectType::ImageCaptioning,
        ] {
            assert_eq!(ProjectType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(ProjectType::parse("DocumentChat"), None);
    }
}
