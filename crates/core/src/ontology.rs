//! Behavioural signal ontology (v1.1).
//!
//! Closed coding system of 11 facets and 98 signals. Signal ids are stored
//! verbatim in annotation records, so the table below is an external
//! contract: ids must never be renamed or reused.

use serde::Serialize;

/// Ontology revision reported alongside the table.
pub const ONTOLOGY_VERSION: &str = "1.1";

/// A single observable behaviour within a facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Signal {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

/// A group of related signals. Signal order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Facet {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub signals: &'static [Signal],
}

const fn signal(id: &'static str, label: &'static str, description: &'static str) -> Signal {
    Signal {
        id,
        label,
        description,
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

const PROSODY_SIGNALS: &[Signal] = &[
    signal(
        "low_pitch_variance",
        "Low pitch variance",
        "Pitch remains within a narrow frequency range across a turn.",
    ),
    signal(
        "high_pitch_variance",
        "High pitch variance",
        "Noticeable pitch modulation within a turn, including rises and falls.",
    ),
    signal(
        "rising_terminal",
        "Rising terminal",
        "Utterance ends with an upward pitch movement.",
    ),
    signal(
        "falling_terminal",
        "Falling terminal",
        "Utterance ends with a downward pitch movement.",
    ),
    signal(
        "flat_intonation",
        "Flat intonation",
        "Minimal pitch movement across the utterance, including terminal position.",
    ),
    signal(
        "speech_rate_fast",
        "Speech rate fast",
        "Words produced at a higher-than-baseline tempo for the speaker.",
    ),
    signal(
        "speech_rate_slow",
        "Speech rate slow",
        "Words produced at a lower-than-baseline tempo for the speaker.",
    ),
    signal(
        "clipped_phrasing",
        "Clipped phrasing",
        "Syllables or words shortened or cut off abruptly.",
    ),
    signal(
        "elongated_vowels",
        "Elongated vowels",
        "Vowel sounds audibly extended beyond typical duration.",
    ),
    signal(
        "volume_increase",
        "Volume increase",
        "Audible rise in loudness within or across turns.",
    ),
    signal(
        "volume_decrease",
        "Volume decrease",
        "Audible reduction in loudness within or across turns.",
    ),
    signal(
        "creaky_voice",
        "Creaky voice",
        "Low-frequency, irregular vocal fold vibration (vocal fry).",
    ),
    signal(
        "breathy_voice",
        "Breathy voice",
        "Audible airflow accompanying phonation.",
    ),
];

const LEXICAL_CHOICE_SIGNALS: &[Signal] = &[
    signal(
        "hedging_terms",
        "Hedging terms",
        "Use of words that soften commitment (e.g. \"maybe\", \"kind of\").",
    ),
    signal(
        "certainty_terms",
        "Certainty terms",
        "Use of words expressing confidence or finality (e.g. \"definitely\", \"clearly\").",
    ),
    signal(
        "intensifiers",
        "Intensifiers",
        "Words amplifying emphasis (e.g. \"very\", \"extremely\").",
    ),
    signal(
        "mitigators",
        "Mitigators",
        "Words reducing force or imposition (e.g. \"just\", \"a bit\").",
    ),
    signal(
        "self_references",
        "Self-references",
        "First-person references (e.g. \"I\", \"me\", \"my\").",
    ),
    signal(
        "other_references",
        "Other-references",
        "References to interlocutor(s) (e.g. \"you\", \"they\").",
    ),
    signal(
        "abstract_language",
        "Abstract language",
        "Use of generalized or conceptual terms rather than concrete entities.",
    ),
    signal(
        "concrete_language",
        "Concrete language",
        "Use of specific, tangible, or directly referable terms.",
    ),
    signal(
        "modal_verbs",
        "Modal verbs",
        "Use of modals expressing possibility, obligation, or ability (e.g. \"might\", \"should\").",
    ),
    signal(
        "politeness_markers",
        "Politeness markers",
        "Use of politeness forms (e.g. \"please\", \"thank you\").",
    ),
    signal(
        "informal_register",
        "Informal register",
        "Colloquial vocabulary or contractions.",
    ),
    signal(
        "formal_register",
        "Formal register",
        "Structured or institutional vocabulary and syntax.",
    ),
];

const TURN_TAKING_SIGNALS: &[Signal] = &[
    signal(
        "interruptions",
        "Interruptions",
        "Speaker begins while another speaker is mid-turn, cutting them off.",
    ),
    signal(
        "overlaps",
        "Overlaps",
        "Simultaneous speech without clear interruption intent.",
    ),
    signal(
        "rapid_backchannels",
        "Rapid backchannels",
        "Short acknowledgements produced quickly after or during turns.",
    ),
    signal(
        "delayed_backchannels",
        "Delayed backchannels",
        "Acknowledgements produced after a noticeable delay.",
    ),
    signal(
        "long_turns",
        "Long turns",
        "Turns significantly longer than interlocutor's or speaker's baseline.",
    ),
    signal(
        "short_turns",
        "Short turns",
        "Turns noticeably brief or minimal.",
    ),
    signal(
        "floor_holding",
        "Floor holding",
        "Behaviours preventing turn transfer (e.g. continued speech, fillers).",
    ),
    signal(
        "floor_yielding",
        "Floor yielding",
        "Clear cues inviting the other speaker to take the floor.",
    ),
    signal(
        "competitive_entry",
        "Competitive entry",
        "Entering the floor at transition-relevant points with assertive timing.",
    ),
    signal(
        "smooth_transition",
        "Smooth transition",
        "Turn exchanges without overlap, interruption, or delay.",
    ),
];

const GAZE_SIGNALS: &[Signal] = &[
    signal(
        "direct_gaze",
        "Direct gaze",
        "Eyes oriented toward interlocutor's face.",
    ),
    signal(
        "gaze_aversion",
        "Gaze aversion",
        "Eyes oriented away from interlocutor during interaction.",
    ),
    signal(
        "gaze_shift_frequency_high",
        "Gaze shift frequency high",
        "Frequent changes in gaze direction within a short time.",
    ),
    signal(
        "gaze_shift_frequency_low",
        "Gaze shift frequency low",
        "Sustained gaze direction with few shifts.",
    ),
    signal(
        "downward_gaze",
        "Downward gaze",
        "Eyes oriented downward relative to head position.",
    ),
    signal(
        "side_glance",
        "Side glance",
        "Brief lateral gaze movement without head turn.",
    ),
    signal(
        "gaze_following",
        "Gaze following",
        "Gaze tracks another speaker's movement or focus.",
    ),
    signal(
        "gaze_fixation",
        "Gaze fixation",
        "Prolonged gaze on a single point or target.",
    ),
];

const FACIAL_EXPRESSION_SIGNALS: &[Signal] = &[
    signal(
        "smile",
        "Smile",
        "Sustained upward movement of lip corners.",
    ),
    signal(
        "micro_smile",
        "Micro-smile",
        "Brief, subtle lip corner elevation.",
    ),
    signal(
        "brow_raise",
        "Brow raise",
        "Upward movement of eyebrows.",
    ),
    signal(
        "brow_furrow",
        "Brow furrow",
        "Inward or downward movement of eyebrows.",
    ),
    signal(
        "jaw_tension",
        "Jaw tension",
        "Visible tightening or clenching of jaw muscles.",
    ),
    signal(
        "lip_press",
        "Lip press",
        "Lips pressed firmly together.",
    ),
    signal(
        "lip_purse",
        "Lip purse",
        "Lips drawn inward or forward.",
    ),
    signal(
        "asymmetrical_expression",
        "Asymmetrical expression",
        "Uneven facial movement across sides.",
    ),
    signal(
        "neutral_face",
        "Neutral face",
        "Minimal facial muscle movement.",
    ),
    signal(
        "expression_freeze",
        "Expression freeze",
        "Facial expression held unusually still across time.",
    ),
];

const GESTURE_SIGNALS: &[Signal] = &[
    signal(
        "expansive_gesture",
        "Expansive gesture",
        "Broad movements extending away from the body.",
    ),
    signal(
        "restricted_gesture",
        "Restricted gesture",
        "Small or minimal hand movements close to the body.",
    ),
    signal(
        "illustrative_gesture",
        "Illustrative gesture",
        "Movements that visually depict speech content.",
    ),
    signal(
        "beat_gesture",
        "Beat gesture",
        "Rhythmic movements aligned with speech timing.",
    ),
    signal(
        "self_touch",
        "Self-touch",
        "Hands contacting one's own body.",
    ),
    signal(
        "object_manipulation",
        "Object manipulation",
        "Handling or fidgeting with objects.",
    ),
    signal(
        "gesture_synchrony_high",
        "Gesture synchrony high",
        "Gestures closely aligned with speech rhythm.",
    ),
    signal(
        "gesture_synchrony_low",
        "Gesture synchrony low",
        "Gestures weakly or inconsistently aligned with speech.",
    ),
    signal(
        "mirroring",
        "Mirroring",
        "Gesture patterns resembling interlocutor's gestures.",
    ),
];

const POSTURE_SIGNALS: &[Signal] = &[
    signal(
        "forward_lean",
        "Forward lean",
        "Upper body inclined toward interlocutor.",
    ),
    signal(
        "backward_lean",
        "Backward lean",
        "Upper body inclined away from interlocutor.",
    ),
    signal(
        "upright_posture",
        "Upright posture",
        "Spine aligned vertically with minimal slouch.",
    ),
    signal(
        "collapsed_posture",
        "Collapsed posture",
        "Slouched or compressed torso position.",
    ),
    signal(
        "postural_shift_frequency_high",
        "Postural shift frequency high",
        "Frequent changes in body position.",
    ),
    signal(
        "postural_shift_frequency_low",
        "Postural shift frequency low",
        "Sustained body position with minimal movement.",
    ),
    signal(
        "body_orientation_direct",
        "Body orientation direct",
        "Torso facing interlocutor.",
    ),
    signal(
        "body_orientation_angled",
        "Body orientation angled",
        "Torso oriented partially away.",
    ),
    signal(
        "stillness",
        "Stillness",
        "Minimal whole-body movement across time.",
    ),
];

const AFFECT_REGULATION_SIGNALS: &[Signal] = &[
    signal(
        "self_soothing_touch",
        "Self-soothing touch",
        "Repetitive touch actions (e.g. rubbing hands, neck).",
    ),
    signal(
        "suppressed_expression",
        "Suppressed expression",
        "Visible inhibition of facial or vocal expression.",
    ),
    signal(
        "forced_smile",
        "Forced smile",
        "Smile not accompanied by other facial movements.",
    ),
    signal(
        "affect_dampening",
        "Affect dampening",
        "Reduction in expressive intensity over time.",
    ),
    signal(
        "affect_amplification",
        "Affect amplification",
        "Increase in expressive intensity over time.",
    ),
    signal(
        "respiratory_control_visible",
        "Respiratory control visible",
        "Audible or visible breath control (e.g. sighs, breath holds).",
    ),
    signal(
        "tension_release",
        "Tension release",
        "Visible relaxation following sustained tension.",
    ),
];

const INTERACTIONAL_ROLE_SIGNALS: &[Signal] = &[
    signal(
        "initiative_taking",
        "Initiative taking",
        "Initiating topics or actions without prompt.",
    ),
    signal(
        "responsive_following",
        "Responsive following",
        "Primarily responding rather than initiating.",
    ),
    signal(
        "topic_introduction",
        "Topic introduction",
        "Introducing new subject matter.",
    ),
    signal(
        "topic_maintenance",
        "Topic maintenance",
        "Sustaining or elaborating current topic.",
    ),
    signal(
        "topic_shift",
        "Topic shift",
        "Redirecting conversation to a new topic.",
    ),
    signal(
        "alignment_behavior",
        "Alignment behavior",
        "Behaviours matching interlocutor's framing or stance.",
    ),
    signal(
        "counter_alignment",
        "Counter-alignment",
        "Behaviours diverging from interlocutor's framing.",
    ),
];

const TIMING_LATENCY_SIGNALS: &[Signal] = &[
    signal(
        "response_latency_short",
        "Response latency short",
        "Minimal delay between turn completion and response.",
    ),
    signal(
        "response_latency_long",
        "Response latency long",
        "Noticeable pause before responding.",
    ),
    signal(
        "latency_variability_high",
        "Latency variability high",
        "Inconsistent response timing across turns.",
    ),
    signal(
        "latency_variability_low",
        "Latency variability low",
        "Consistent response timing across turns.",
    ),
    signal(
        "pause_before_response",
        "Pause before response",
        "Silent pause preceding speech onset.",
    ),
    signal(
        "pause_mid_turn",
        "Pause mid-turn",
        "Silent pause occurring within a turn.",
    ),
];

const REPAIR_BEHAVIOR_SIGNALS: &[Signal] = &[
    signal(
        "self_correction",
        "Self-correction",
        "Speaker revises their own speech content.",
    ),
    signal(
        "false_start",
        "False start",
        "Abandoned utterance before completion.",
    ),
    signal(
        "rephrasing",
        "Rephrasing",
        "Same idea restated with different wording.",
    ),
    signal(
        "filled_pause",
        "Filled pause",
        "Vocal fillers (e.g. \"um\", \"uh\").",
    ),
    signal(
        "unfilled_pause",
        "Unfilled pause",
        "Silent gap without vocalisation.",
    ),
    signal(
        "backtracking",
        "Backtracking",
        "Returning to earlier conversational point.",
    ),
    signal(
        "clarification_request",
        "Clarification request",
        "Explicit request for clarification.",
    ),
];

/// Every facet, in display order.
pub static ONTOLOGY: &[Facet] = &[
    Facet {
        id: "prosody",
        label: "Prosody",
        description: "Acoustic characteristics of speech independent of word choice.",
        signals: PROSODY_SIGNALS,
    },
    Facet {
        id: "lexical_choice",
        label: "Lexical Choice",
        description: "Patterns in word and phrase selection.",
        signals: LEXICAL_CHOICE_SIGNALS,
    },
    Facet {
        id: "turn_taking",
        label: "Turn Taking",
        description: "How conversational floor access is managed.",
        signals: TURN_TAKING_SIGNALS,
    },
    Facet {
        id: "gaze",
        label: "Gaze",
        description: "Eye direction and movement relative to interlocutors.",
        signals: GAZE_SIGNALS,
    },
    Facet {
        id: "facial_expression",
        label: "Facial Expression",
        description: "Visible facial muscle movements, without inferred emotion.",
        signals: FACIAL_EXPRESSION_SIGNALS,
    },
    Facet {
        id: "gesture",
        label: "Gesture",
        description: "Hand and arm movements accompanying interaction.",
        signals: GESTURE_SIGNALS,
    },
    Facet {
        id: "posture",
        label: "Posture",
        description: "Whole-body orientation and stability.",
        signals: POSTURE_SIGNALS,
    },
    Facet {
        id: "affect_regulation",
        label: "Affect Regulation",
        description: "Behaviours that modulate or constrain expressive output.",
        signals: AFFECT_REGULATION_SIGNALS,
    },
    Facet {
        id: "interactional_role",
        label: "Interactional Role",
        description: "Behavioural positioning within conversational structure.",
        signals: INTERACTIONAL_ROLE_SIGNALS,
    },
    Facet {
        id: "timing_latency",
        label: "Timing & Latency",
        description: "Temporal characteristics of response timing.",
        signals: TIMING_LATENCY_SIGNALS,
    },
    Facet {
        id: "repair_behavior",
        label: "Repair Behavior",
        description: "Corrections or restarts during interaction.",
        signals: REPAIR_BEHAVIOR_SIGNALS,
    },
];

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Look up a facet by id.
pub fn facet_by_id(id: &str) -> Option<&'static Facet> {
    ONTOLOGY.iter().find(|f| f.id == id)
}

/// All facets in table order.
pub fn all_facets() -> &'static [Facet] {
    ONTOLOGY
}

/// Signals of a facet; empty for an unknown facet.
pub fn signals_by_facet(facet_id: &str) -> &'static [Signal] {
    facet_by_id(facet_id).map(|f| f.signals).unwrap_or(&[])
}

/// All facet ids in table order.
pub fn all_facet_ids() -> Vec<&'static str> {
    ONTOLOGY.iter().map(|f| f.id).collect()
}

/// Sum of signal counts over every facet.
pub fn total_signal_count() -> usize {
    ONTOLOGY.iter().map(|f| f.signals.len()).sum()
}

/// Returns `true` if `signal_id` belongs to the facet `facet_id`.
pub fn is_valid_signal(facet_id: &str, signal_id: &str) -> bool {
    signals_by_facet(facet_id).iter().any(|s| s.id == signal_id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
