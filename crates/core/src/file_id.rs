//! Composite participant file identifiers.
//!
//! Dataset files are named `V<vendor>_S<session>_I<interaction>_P<participant>`,
//! optionally followed by an extension. Two participant files share the same
//! `V_S_I` prefix, which becomes the video id of the interaction.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Pattern for a participant file id. Not anchored: the id may sit inside a
/// longer file name such as `V00_S0001_I00000001_P0.mp4`.
///
/// Numeric runs are capped at 19 digits so every match fits in a `u64`.
const FILE_ID_PATTERN: &str = r"V(\d{1,19})_S(\d{1,19})_I(\d{1,19})_P([0-9A-Za-z]+)";

static FILE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(FILE_ID_PATTERN).expect("valid regex"));

/// Structured form of a participant file id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileIdentifier {
    pub vendor_id: u64,
    pub session_id: u64,
    pub interaction_id: u64,
    /// Kept verbatim: may carry leading zeros or an alphabetic suffix.
    pub participant_id: String,
    /// `V<vendor>_S<session>_I<interaction>` with the original digit runs.
    pub video_id: String,
}

/// Parse a file id (or a file name containing one).
///
/// Returns `None` unless all four segments are present. Vendor, session and
/// interaction numbers are parsed base-10 so leading zeros do not matter;
/// the participant segment is never interpreted.
///
/// ```
/// use pairlabel_core::file_id::parse_file_id;
///
/// let id = parse_file_id("V00_S0644_I00000129_P0799.mp4").unwrap();
/// assert_eq!(id.session_id, 644);
/// assert_eq!(id.participant_id, "0799");
/// assert_eq!(id.video_id, "V00_S0644_I00000129");
/// assert!(parse_file_id("V00_S0644").is_none());
/// ```
pub fn parse_file_id(raw: &str) -> Option<FileIdentifier> {
    let caps = FILE_ID_RE.captures(raw)?;

    let vendor = caps.get(1)?.as_str();
    let session = caps.get(2)?.as_str();
    let interaction = caps.get(3)?.as_str();
    let participant = caps.get(4)?.as_str();

    Some(FileIdentifier {
        vendor_id: vendor.parse().ok()?,
        session_id: session.parse().ok()?,
        interaction_id: interaction.parse().ok()?,
        participant_id: participant.to_string(),
        video_id: format!("V{vendor}_S{session}_I{interaction}"),
    })
}

/// Returns `true` if `raw` is exactly one file id with no surrounding text.
///
/// Used wherever a file id ends up in a URL or a file name, so that nothing
/// but the id itself can reach the path.
pub fn is_exact_file_id(raw: &str) -> bool {
    FILE_ID_RE
        .find(raw)
        .is_some_and(|m| m.start() == 0 && m.end() == raw.len())
}
