//! Per-video labeling records and the write-path validation rules.
//!
//! An annotation is keyed by `(user_id, video_id)` and is either fully
//! present, with both speaker labels set, or absent. The payload type is
//! what clients submit; [`AnnotationPayload::validate_into`] is the only way
//! to turn one into a stored [`Annotation`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::CoreError;
use crate::ontology::{all_facets, facet_by_id, is_valid_signal};
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lowest accepted confidence score.
pub const MIN_CONFIDENCE: u8 = 1;

/// Highest accepted confidence score.
pub const MAX_CONFIDENCE: u8 = 5;

/// Confidence pre-selected for a fresh draft.
pub const DEFAULT_CONFIDENCE: u8 = 3;

fn default_confidence() -> u8 {
    DEFAULT_CONFIDENCE
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Binary per-speaker classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MorphLabel {
    #[serde(rename = "Morph A")]
    MorphA,
    #[serde(rename = "Morph B")]
    MorphB,
}

impl MorphLabel {
    pub const ALL: [MorphLabel; 2] = [MorphLabel::MorphA, MorphLabel::MorphB];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MorphA => "Morph A",
            Self::MorphB => "Morph B",
        }
    }

    /// Parse the wire form (`"Morph A"` / `"Morph B"`).
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s.trim() {
            "Morph A" => Ok(Self::MorphA),
            "Morph B" => Ok(Self::MorphB),
            other => Err(CoreError::Validation(format!(
                "Invalid speaker label '{other}'. Must be one of: Morph A, Morph B"
            ))),
        }
    }
}

/// Which of the two recorded participants a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Speaker {
    One,
    Two,
}

// ---------------------------------------------------------------------------
// Category selections
// ---------------------------------------------------------------------------

/// Selected signal ids per facet for one speaker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryAnnotations(BTreeMap<String, Vec<String>>);

impl CategoryAnnotations {
    /// One empty list per ontology facet.
    pub fn empty() -> Self {
        Self(
            all_facets()
                .iter()
                .map(|f| (f.id.to_string(), Vec::new()))
                .collect(),
        )
    }

    pub fn signals(&self, facet_id: &str) -> &[String] {
        self.0.get(facet_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Add or remove a signal. Unknown facet/signal pairs are rejected.
    pub fn toggle(&mut self, facet_id: &str, signal_id: &str) -> Result<(), CoreError> {
        if !is_valid_signal(facet_id, signal_id) {
            return Err(CoreError::Validation(format!(
                "Signal '{signal_id}' does not belong to facet '{facet_id}'"
            )));
        }
        let list = self.0.entry(facet_id.to_string()).or_default();
        match list.binary_search_by(|s| s.as_str().cmp(signal_id)) {
            Ok(pos) => {
                list.remove(pos);
            }
            Err(pos) => list.insert(pos, signal_id.to_string()),
        }
        Ok(())
    }

    /// Check every id against the ontology and canonicalise: all facets
    /// present, ids sorted, duplicates collapsed.
    pub fn normalize(self) -> Result<Self, CoreError> {
        let mut out = Self::empty();
        for (facet_id, signals) in self.0 {
            if facet_by_id(&facet_id).is_none() {
                return Err(CoreError::Validation(format!("Unknown facet '{facet_id}'")));
            }
            let mut signals = signals;
            if let Some(bad) = signals.iter().find(|s| !is_valid_signal(&facet_id, s)) {
                return Err(CoreError::Validation(format!(
                    "Signal '{bad}' does not belong to facet '{facet_id}'"
                )));
            }
            signals.sort();
            signals.dedup();
            out.0.insert(facet_id, signals);
        }
        Ok(out)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    pub fn selected_signal_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

// ---------------------------------------------------------------------------
// Stored record
// ---------------------------------------------------------------------------

/// A complete labeling of one video by one reviewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: Uuid,
    pub user_id: String,
    pub video_id: String,
    pub vendor_id: u64,
    pub session_id: u64,
    pub interaction_id: u64,
    pub speaker1_id: String,
    pub speaker2_id: String,
    pub speaker1_label: MorphLabel,
    pub speaker2_label: MorphLabel,
    pub speaker1_confidence: u8,
    pub speaker2_confidence: u8,
    pub speaker1_comments: String,
    pub speaker2_comments: String,
    pub speaker1_categories: CategoryAnnotations,
    pub speaker2_categories: CategoryAnnotations,
    pub labeling_time_ms: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Annotation {
    pub fn label(&self, speaker: Speaker) -> MorphLabel {
        match speaker {
            Speaker::One => self.speaker1_label,
            Speaker::Two => self.speaker2_label,
        }
    }
}

// ---------------------------------------------------------------------------
// Write payload
// ---------------------------------------------------------------------------

/// Annotation as submitted by a client.
///
/// Labels are optional here so that a half-filled form deserialises and can
/// be rejected with a readable message instead of a decode error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationPayload {
    #[validate(length(min = 1, max = 128))]
    pub video_id: String,
    #[serde(default)]
    pub vendor_id: u64,
    #[serde(default)]
    pub session_id: u64,
    #[serde(default)]
    pub interaction_id: u64,
    #[serde(default)]
    pub speaker1_id: String,
    #[serde(default)]
    pub speaker2_id: String,
    #[serde(default)]
    pub speaker1_label: Option<String>,
    #[serde(default)]
    pub speaker2_label: Option<String>,
    #[serde(default = "default_confidence")]
    #[validate(range(min = 1, max = 5))]
    pub speaker1_confidence: u8,
    #[serde(default = "default_confidence")]
    #[validate(range(min = 1, max = 5))]
    pub speaker2_confidence: u8,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub speaker1_comments: String,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub speaker2_comments: String,
    #[serde(default)]
    pub speaker1_categories: CategoryAnnotations,
    #[serde(default)]
    pub speaker2_categories: CategoryAnnotations,
    #[serde(default)]
    pub labeling_time_ms: u64,
}

fn required_label(value: Option<&str>, which: &str) -> Result<MorphLabel, CoreError> {
    match value.map(str::trim) {
        None | Some("") => Err(CoreError::Validation(format!("{which} label is required"))),
        Some(v) => MorphLabel::parse(v),
    }
}

impl AnnotationPayload {
    /// Validate the payload and produce the record to store under
    /// `(user_id, video_id)`.
    ///
    /// Nothing is produced unless both speaker labels are present and valid.
    /// When `existing` is given (same key), its id, creation time and video
    /// identity are kept and only the labeling fields are replaced.
    pub fn validate_into(
        self,
        user_id: &str,
        now: Timestamp,
        existing: Option<&Annotation>,
    ) -> Result<Annotation, CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;

        let speaker1_label = required_label(self.speaker1_label.as_deref(), "Speaker 1")?;
        let speaker2_label = required_label(self.speaker2_label.as_deref(), "Speaker 2")?;
        let speaker1_categories = self.speaker1_categories.normalize()?;
        let speaker2_categories = self.speaker2_categories.normalize()?;

        let annotation = match existing {
            Some(prev) => Annotation {
                speaker1_label,
                speaker2_label,
                speaker1_confidence: self.speaker1_confidence,
                speaker2_confidence: self.speaker2_confidence,
                speaker1_comments: self.speaker1_comments,
                speaker2_comments: self.speaker2_comments,
                speaker1_categories,
                speaker2_categories,
                labeling_time_ms: self.labeling_time_ms,
                updated_at: now,
                ..prev.clone()
            },
            None => Annotation {
                id: Uuid::new_v4(),
                user_id: user_id.to_string(),
                video_id: self.video_id,
                vendor_id: self.vendor_id,
                session_id: self.session_id,
                interaction_id: self.interaction_id,
                speaker1_id: self.speaker1_id,
                speaker2_id: self.speaker2_id,
                speaker1_label,
                speaker2_label,
                speaker1_confidence: self.speaker1_confidence,
                speaker2_confidence: self.speaker2_confidence,
                speaker1_comments: self.speaker1_comments,
                speaker2_comments: self.speaker2_comments,
                speaker1_categories,
                speaker2_categories,
                labeling_time_ms: self.labeling_time_ms,
                created_at: now,
                updated_at: now,
            },
        };

        Ok(annotation)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn payload() -> AnnotationPayload {
        AnnotationPayload {
            video_id: "V00_S0001_I00000001".into(),
            vendor_id: 0,
            session_id: 1,
            interaction_id: 1,
            speaker1_id: "0".into(),
            speaker2_id: "1".into(),
            speaker1_label: Some("Morph A".into()),
            speaker2_label: Some("Morph B".into()),
            speaker1_confidence: 4,
            speaker2_confidence: 2,
            speaker1_comments: String::new(),
            speaker2_comments: String::new(),
            speaker1_categories: CategoryAnnotations::default(),
            speaker2_categories: CategoryAnnotations::default(),
            labeling_time_ms: 3500,
        }
    }

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    // -- labels ---------------------------------------------------------------

    #[test]
    fn label_wire_format() {
        assert_eq!(serde_json::to_string(&MorphLabel::MorphA).unwrap(), "\"Morph A\"");
        let parsed: MorphLabel = serde_json::from_str("\"Morph B\"").unwrap();
        assert_eq!(parsed, MorphLabel::MorphB);
        assert_matches!(MorphLabel::parse("Morph C"), Err(CoreError::Validation(_)));
    }

    // -- write path -----------------------------------------------------------

    #[test]
    fn valid_payload_creates_record() {
        let a = payload().validate_into("alice", t0(), None).unwrap();
        assert_eq!(a.user_id, "alice");
        assert_eq!(a.speaker1_label, MorphLabel::MorphA);
        assert_eq!(a.speaker2_label, MorphLabel::MorphB);
        assert_eq!(a.created_at, a.updated_at);
        assert_eq!(a.labeling_time_ms, 3500);
    }

    #[test]
    fn missing_either_label_is_rejected() {
        let mut p = payload();
        p.speaker2_label = None;
        assert_matches!(
            p.validate_into("alice", t0(), None),
            Err(CoreError::Validation(msg)) if msg.contains("Speaker 2")
        );

        let mut p = payload();
        p.speaker1_label = Some("  ".into());
        assert_matches!(p.validate_into("alice", t0(), None), Err(CoreError::Validation(_)));
    }

    #[test]
    fn confidence_out_of_range_is_rejected() {
        let mut p = payload();
        p.speaker1_confidence = 6;
        assert_matches!(p.validate_into("alice", t0(), None), Err(CoreError::Validation(_)));

        let mut p = payload();
        p.speaker2_confidence = 0;
        assert_matches!(p.validate_into("alice", t0(), None), Err(CoreError::Validation(_)));
    }

    #[test]
    fn update_keeps_identity_and_creation_time() {
        let first = payload().validate_into("alice", t0(), None).unwrap();

        let mut p = payload();
        p.speaker1_label = Some("Morph B".into());
        p.vendor_id = 99;
        let later = t0() + Duration::minutes(5);
        let second = p.validate_into("alice", later, Some(&first)).unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.created_at, t0());
        assert_eq!(second.updated_at, later);
        assert_eq!(second.vendor_id, first.vendor_id);
        assert_eq!(second.speaker1_label, MorphLabel::MorphB);
    }

    #[test]
    fn payload_defaults_confidence_to_three() {
        let json = r#"{"videoId":"V00_S0001_I00000001","speaker1Label":"Morph A","speaker2Label":"Morph A"}"#;
        let p: AnnotationPayload = serde_json::from_str(json).unwrap();
        assert_eq!(p.speaker1_confidence, DEFAULT_CONFIDENCE);
        assert_eq!(p.speaker2_confidence, DEFAULT_CONFIDENCE);
        assert!(p.validate_into("u", t0(), None).is_ok());
    }

    // -- categories -----------------------------------------------------------

    #[test]
    fn categories_are_normalised() {
        let first_facet = &all_facets()[0];
        let a = first_facet.signals[0].id.to_string();
        let b = first_facet.signals[1].id.to_string();

        let mut raw = BTreeMap::new();
        raw.insert(first_facet.id.to_string(), vec![b.clone(), a.clone(), b.clone()]);
        let cats = CategoryAnnotations(raw).normalize().unwrap();

        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(cats.signals(first_facet.id), expected.as_slice());
        assert_eq!(cats.selected_signal_count(), 2);
        assert_eq!(cats.0.len(), all_facets().len());
    }

    #[test]
    fn unknown_facet_or_signal_rejected() {
        let mut raw = BTreeMap::new();
        raw.insert("smell".to_string(), vec![]);
        assert_matches!(CategoryAnnotations(raw).normalize(), Err(CoreError::Validation(_)));

        let mut raw = BTreeMap::new();
        raw.insert("gaze".to_string(), vec!["not_a_signal".to_string()]);
        assert_matches!(CategoryAnnotations(raw).normalize(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn toggle_adds_then_removes() {
        let gaze = facet_by_id("gaze").unwrap();
        let signal = gaze.signals[0].id;

        let mut cats = CategoryAnnotations::empty();
        assert!(cats.is_empty());
        cats.toggle("gaze", signal).unwrap();
        assert_eq!(cats.signals("gaze"), [signal.to_string()]);
        cats.toggle("gaze", signal).unwrap();
        assert!(cats.is_empty());
        assert!(cats.toggle("gaze", "nope").is_err());
    }
}
