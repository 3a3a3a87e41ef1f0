//! Aggregate statistics over annotations and the interaction catalog.
//!
//! Every aggregate reports zero for an empty input instead of dividing by
//! zero.

use std::collections::HashSet;

use serde::Serialize;

use crate::annotation::{Annotation, MorphLabel};
use crate::grouping::Interaction;

/// How the 2×N speaker-label slots split between the two labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MorphDistribution {
    pub morph_a: usize,
    pub morph_b: usize,
    pub morph_a_percent: f64,
    pub morph_b_percent: f64,
}

/// Mean confidence per speaker slot and the mean of the two.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceSummary {
    pub speaker1: f64,
    pub speaker2: f64,
    pub overall: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSummary {
    pub total_ms: u64,
    pub average_ms: f64,
}

/// Size of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    pub total_videos: usize,
    pub total_speakers: usize,
    pub unique_vendors: usize,
    pub unique_sessions: usize,
}

/// Everything the dashboard shows in one payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationStats {
    pub annotation_count: usize,
    pub morph: MorphDistribution,
    pub confidence: ConfidenceSummary,
    pub time: TimeSummary,
}

fn percent(count: usize, slots: usize) -> f64 {
    if slots == 0 {
        0.0
    } else {
        count as f64 / slots as f64 * 100.0
    }
}

pub fn morph_distribution(annotations: &[Annotation]) -> MorphDistribution {
    let morph_a = annotations
        .iter()
        .flat_map(|a| [a.speaker1_label, a.speaker2_label])
        .filter(|l| *l == MorphLabel::MorphA)
        .count();
    let slots = annotations.len() * 2;
    let morph_b = slots - morph_a;

    MorphDistribution {
        morph_a,
        morph_b,
        morph_a_percent: percent(morph_a, slots),
        morph_b_percent: percent(morph_b, slots),
    }
}

pub fn confidence_summary(annotations: &[Annotation]) -> ConfidenceSummary {
    if annotations.is_empty() {
        return ConfidenceSummary {
            speaker1: 0.0,
            speaker2: 0.0,
            overall: 0.0,
        };
    }

    let n = annotations.len() as f64;
    let speaker1 = annotations.iter().map(|a| f64::from(a.speaker1_confidence)).sum::<f64>() / n;
    let speaker2 = annotations.iter().map(|a| f64::from(a.speaker2_confidence)).sum::<f64>() / n;

    ConfidenceSummary {
        speaker1,
        speaker2,
        overall: (speaker1 + speaker2) / 2.0,
    }
}

pub fn time_summary(annotations: &[Annotation]) -> TimeSummary {
    let total_ms: u64 = annotations.iter().map(|a| a.labeling_time_ms).sum();
    let average_ms = match annotations.len() {
        0 => 0.0,
        n => total_ms as f64 / n as f64,
    };
    TimeSummary {
        total_ms,
        average_ms,
    }
}

pub fn annotation_stats(annotations: &[Annotation]) -> AnnotationStats {
    AnnotationStats {
        annotation_count: annotations.len(),
        morph: morph_distribution(annotations),
        confidence: confidence_summary(annotations),
        time: time_summary(annotations),
    }
}

pub fn dataset_summary(interactions: &[Interaction]) -> DatasetSummary {
    let vendors: HashSet<u64> = interactions.iter().map(|i| i.vendor_id).collect();
    let sessions: HashSet<(u64, u64)> = interactions
        .iter()
        .map(|i| (i.vendor_id, i.session_id))
        .collect();

    DatasetSummary {
        total_videos: interactions.len(),
        total_speakers: interactions.len() * 2,
        unique_vendors: vendors.len(),
        unique_sessions: sessions.len(),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    use crate::annotation::{Annotation, CategoryAnnotations, MorphLabel};

    /// Annotation for `video_id` created `minute` minutes after a fixed epoch.
    pub fn annotation(
        video_id: &str,
        labels: (MorphLabel, MorphLabel),
        confidences: (u8, u8),
        labeling_time_ms: u64,
        minute: i64,
    ) -> Annotation {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minute);
        Annotation {
            id: Uuid::new_v4(),
            user_id: "tester".into(),
            video_id: video_id.into(),
            vendor_id: 0,
            session_id: 0,
            interaction_id: 0,
            speaker1_id: "0".into(),
            speaker2_id: "1".into(),
            speaker1_label: labels.0,
            speaker2_label: labels.1,
            speaker1_confidence: confidences.0,
            speaker2_confidence: confidences.1,
            speaker1_comments: String::new(),
            speaker2_comments: String::new(),
            speaker1_categories: CategoryAnnotations::empty(),
            speaker2_categories: CategoryAnnotations::empty(),
            labeling_time_ms,
            created_at: at,
            updated_at: at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::annotation;
    use super::*;
    use crate::annotation::MorphLabel::{MorphA, MorphB};

    #[test]
    fn distribution_counts_speaker_slots() {
        let anns = vec![
            annotation("v1", (MorphA, MorphB), (3, 3), 0, 0),
            annotation("v2", (MorphA, MorphA), (3, 3), 0, 1),
        ];
        let d = morph_distribution(&anns);
        assert_eq!(d.morph_a, 3);
        assert_eq!(d.morph_b, 1);
        assert_eq!(d.morph_a_percent, 75.0);
        assert_eq!(d.morph_b_percent, 25.0);
    }

    #[test]
    fn empty_input_reports_zeroes() {
        let stats = annotation_stats(&[]);
        assert_eq!(stats.annotation_count, 0);
        assert_eq!(stats.morph.morph_a_percent, 0.0);
        assert_eq!(stats.morph.morph_b_percent, 0.0);
        assert_eq!(stats.confidence.overall, 0.0);
        assert_eq!(stats.time, TimeSummary { total_ms: 0, average_ms: 0.0 });
    }

    #[test]
    fn confidence_means() {
        let anns = vec![
            annotation("v1", (MorphA, MorphB), (5, 1), 0, 0),
            annotation("v2", (MorphA, MorphB), (3, 2), 0, 1),
        ];
        let c = confidence_summary(&anns);
        assert_eq!(c.speaker1, 4.0);
        assert_eq!(c.speaker2, 1.5);
        assert_eq!(c.overall, 2.75);
    }

    #[test]
    fn time_totals_and_average() {
        let anns = vec![
            annotation("v1", (MorphA, MorphB), (3, 3), 3000, 0),
            annotation("v2", (MorphA, MorphB), (3, 3), 5000, 1),
        ];
        assert_eq!(time_summary(&anns), TimeSummary { total_ms: 8000, average_ms: 4000.0 });
    }

    #[test]
    fn time_average_keeps_fractions() {
        let anns = vec![
            annotation("v1", (MorphA, MorphB), (3, 3), 1000, 0),
            annotation("v2", (MorphA, MorphB), (3, 3), 1001, 1),
        ];
        assert_eq!(time_summary(&anns).average_ms, 1000.5);
    }

    #[test]
    fn dataset_summary_counts_distinct_vendors_and_sessions() {
        let make = |vendor, session, n| Interaction {
            video_id: format!("V{vendor}_S{session}_I{n}"),
            vendor_id: vendor,
            session_id: session,
            interaction_id: n,
            participant1_id: "0".into(),
            participant2_id: "1".into(),
            label: "improvised".into(),
            split: "dev".into(),
            file_id1: format!("V{vendor}_S{session}_I{n}_P0"),
            file_id2: format!("V{vendor}_S{session}_I{n}_P1"),
            batch_idx: 0,
            archive_idx: 0,
        };
        let catalog = vec![make(0, 1, 1), make(0, 1, 2), make(0, 2, 1), make(1, 1, 1)];
        let s = dataset_summary(&catalog);
        assert_eq!(s.total_videos, 4);
        assert_eq!(s.total_speakers, 8);
        assert_eq!(s.unique_vendors, 2);
        assert_eq!(s.unique_sessions, 3);
    }
}
