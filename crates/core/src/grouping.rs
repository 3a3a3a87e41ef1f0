//! Folding per-participant manifest rows into paired interactions.
//!
//! Two files with the same video id form one interaction. The first row
//! seen for a video id fixes participant 1 and the interaction-level tags
//! (label, split, provenance); the next one fills participant 2. Video ids
//! that never see a partner are dropped.

use std::collections::HashMap;

use serde::Serialize;

use crate::file_id::parse_file_id;
use crate::manifest::ManifestRow;

/// A logical video: two participant recordings of the same interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub video_id: String,
    pub vendor_id: u64,
    pub session_id: u64,
    pub interaction_id: u64,
    pub participant1_id: String,
    pub participant2_id: String,
    pub label: String,
    pub split: String,
    pub file_id1: String,
    pub file_id2: String,
    pub batch_idx: u32,
    pub archive_idx: u32,
}

impl Interaction {
    /// Both participant files have been observed.
    pub fn is_complete(&self) -> bool {
        !self.file_id1.is_empty() && !self.file_id2.is_empty()
    }
}

/// Diagnostics gathered while grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingReport {
    /// Rows whose `file_id` did not parse.
    pub unparsable_rows: usize,
    /// Video ids that appeared without a partner and were discarded.
    pub incomplete: usize,
    /// Video ids seen more than twice. The extra rows overwrote participant 2.
    pub overfull_video_ids: Vec<String>,
}

/// Group manifest rows into complete interactions, in first-seen order.
pub fn group_interactions(rows: &[ManifestRow]) -> Vec<Interaction> {
    group_interactions_with_report(rows).0
}

/// Same as [`group_interactions`], also returning what was dropped or
/// overwritten so the caller can log it.
pub fn group_interactions_with_report(rows: &[ManifestRow]) -> (Vec<Interaction>, GroupingReport) {
    let mut order: Vec<Interaction> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut seen: Vec<usize> = Vec::new();
    let mut report = GroupingReport::default();

    for row in rows {
        let Some(parsed) = parse_file_id(&row.file_id) else {
            report.unparsable_rows += 1;
            continue;
        };

        match index.get(&parsed.video_id).copied() {
            None => {
                index.insert(parsed.video_id.clone(), order.len());
                seen.push(1);
                order.push(Interaction {
                    video_id: parsed.video_id,
                    vendor_id: parsed.vendor_id,
                    session_id: parsed.session_id,
                    interaction_id: parsed.interaction_id,
                    participant1_id: parsed.participant_id,
                    participant2_id: String::new(),
                    label: row.label.clone(),
                    split: row.split.clone(),
                    file_id1: row.file_id.clone(),
                    file_id2: String::new(),
                    batch_idx: row.batch_idx,
                    archive_idx: row.archive_idx,
                });
            }
            Some(pos) => {
                seen[pos] += 1;
                if seen[pos] == 3 {
                    report.overfull_video_ids.push(parsed.video_id.clone());
                }
                let interaction = &mut order[pos];
                interaction.participant2_id = parsed.participant_id;
                interaction.file_id2 = row.file_id.clone();
            }
        }
    }

    let before = order.len();
    let complete: Vec<Interaction> = order.into_iter().filter(Interaction::is_complete).collect();
    report.incomplete = before - complete.len();

    (complete, report)
}
