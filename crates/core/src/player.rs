//! Synchronized two-camera player and the labeling session around it.
//!
//! The player drives two media elements in lock-step. Element A is the
//! timing leader: starting playback pulls B to A's position, the displayed
//! time is A's, and a seek moves both. Elements are abstracted behind
//! [`MediaElement`] so the protocol can be driven by a browser binding or
//! by a test double.
//!
//! All instants are caller-supplied [`Millis`] so the state machine never
//! reads a clock itself.

use crate::annotation::{
    AnnotationPayload, CategoryAnnotations, MorphLabel, Speaker, DEFAULT_CONFIDENCE, MAX_CONFIDENCE,
    MIN_CONFIDENCE,
};
use crate::error::CoreError;
use crate::grouping::Interaction;
use crate::types::Millis;

// ---------------------------------------------------------------------------
// Media element seam
// ---------------------------------------------------------------------------

/// One playable video surface.
pub trait MediaElement {
    /// Playback position in seconds.
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, secs: f64);
    /// Known once metadata has loaded.
    fn duration(&self) -> Option<f64>;
    fn play(&mut self);
    fn pause(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Paused,
    Playing,
}

/// What currently holds keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    #[default]
    Page,
    Button,
    TextInput,
    TextArea,
    ContentEditable,
}

impl FocusTarget {
    /// Typing surfaces receive key presses untouched.
    pub fn accepts_text(&self) -> bool {
        matches!(self, Self::TextInput | Self::TextArea | Self::ContentEditable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The shortcut was consumed; playback is now in this state.
    Toggled(PlaybackState),
    /// Not ours; let the focused element handle it.
    PassThrough,
}

/// The play/pause shortcut (space bar, by `KeyboardEvent.key` or `.code`).
pub fn is_toggle_key(key: &str) -> bool {
    matches!(key, " " | "Space" | "Spacebar")
}

// ---------------------------------------------------------------------------
// SyncPlayer
// ---------------------------------------------------------------------------

type FirstPlayHook = Box<dyn FnMut(Millis)>;

/// Lock-step controller for a leader/follower pair.
pub struct SyncPlayer<E: MediaElement> {
    leader: E,
    follower: E,
    state: PlaybackState,
    first_played_at: Option<Millis>,
    on_first_play: Option<FirstPlayHook>,
}

impl<E: MediaElement> SyncPlayer<E> {
    pub fn new(leader: E, follower: E) -> Self {
        Self {
            leader,
            follower,
            state: PlaybackState::Paused,
            first_played_at: None,
            on_first_play: None,
        }
    }

    /// Register the one-shot notification fired on the first transition to
    /// playing.
    pub fn on_first_play(mut self, hook: impl FnMut(Millis) + 'static) -> Self {
        self.on_first_play = Some(Box::new(hook));
        self
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn has_played_once(&self) -> bool {
        self.first_played_at.is_some()
    }

    pub fn first_played_at(&self) -> Option<Millis> {
        self.first_played_at
    }

    pub fn leader(&self) -> &E {
        &self.leader
    }

    pub fn follower(&self) -> &E {
        &self.follower
    }

    /// Paused -> Playing. Returns `true` only for the first transition in
    /// this session. A no-op while already playing.
    pub fn play(&mut self, now: Millis) -> bool {
        if self.is_playing() {
            return false;
        }

        let position = self.leader.current_time();
        self.follower.set_current_time(position);
        self.leader.play();
        self.follower.play();
        self.state = PlaybackState::Playing;

        if self.first_played_at.is_some() {
            return false;
        }
        self.first_played_at = Some(now);
        if let Some(hook) = self.on_first_play.as_mut() {
            hook(now);
        }
        true
    }

    /// Playing -> Paused. Idempotent.
    pub fn pause(&mut self) {
        if !self.is_playing() {
            return;
        }
        self.leader.pause();
        self.follower.pause();
        self.state = PlaybackState::Paused;
    }

    pub fn toggle(&mut self, now: Millis) -> PlaybackState {
        match self.state {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused => {
                self.play(now);
            }
        }
        self.state
    }

    /// Move both elements to `secs`, in any state.
    pub fn seek(&mut self, secs: f64) {
        let secs = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
        self.leader.set_current_time(secs);
        self.follower.set_current_time(secs);
    }

    /// Displayed position follows the leader.
    pub fn current_time(&self) -> f64 {
        self.leader.current_time()
    }

    /// Longer of the two durations, tolerating slightly mismatched encodes.
    pub fn duration(&self) -> Option<f64> {
        match (self.leader.duration(), self.follower.duration()) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }

    /// Space toggles playback unless a typing surface has focus.
    pub fn handle_key(&mut self, key: &str, focus: FocusTarget, now: Millis) -> KeyOutcome {
        if !is_toggle_key(key) || focus.accepts_text() {
            return KeyOutcome::PassThrough;
        }
        KeyOutcome::Toggled(self.toggle(now))
    }

    /// Return to the initial state for a different video. The first-play
    /// notification becomes armed again.
    pub fn reset(&mut self) {
        self.pause();
        self.seek(0.0);
        self.first_played_at = None;
    }
}

// ---------------------------------------------------------------------------
// Labeling clock
// ---------------------------------------------------------------------------

/// Instants bounding active labeling work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelingClock {
    pub first_play_at: Option<Millis>,
    pub last_label_edit_at: Option<Millis>,
}

impl LabelingClock {
    /// Time from first play to the final label decision.
    ///
    /// Falls back to `previous` (or zero) when either instant is missing or
    /// the last edit happened before playback ever started.
    pub fn labeling_time_ms(&self, previous: Option<u64>) -> u64 {
        match (self.first_play_at, self.last_label_edit_at) {
            (Some(first), Some(last)) if last >= first => last - first,
            _ => previous.unwrap_or(0),
        }
    }
}

// ---------------------------------------------------------------------------
// Labeling session
// ---------------------------------------------------------------------------

/// Unsaved form state for one video.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelDraft {
    pub speaker1_label: Option<MorphLabel>,
    pub speaker2_label: Option<MorphLabel>,
    pub speaker1_confidence: u8,
    pub speaker2_confidence: u8,
    pub speaker1_comments: String,
    pub speaker2_comments: String,
    pub speaker1_categories: CategoryAnnotations,
    pub speaker2_categories: CategoryAnnotations,
}

impl Default for LabelDraft {
    fn default() -> Self {
        Self {
            speaker1_label: None,
            speaker2_label: None,
            speaker1_confidence: DEFAULT_CONFIDENCE,
            speaker2_confidence: DEFAULT_CONFIDENCE,
            speaker1_comments: String::new(),
            speaker2_comments: String::new(),
            speaker1_categories: CategoryAnnotations::empty(),
            speaker2_categories: CategoryAnnotations::empty(),
        }
    }
}

/// Player, draft and clock for labeling a single interaction.
pub struct LabelingSession<E: MediaElement> {
    video: Interaction,
    player: SyncPlayer<E>,
    draft: LabelDraft,
    last_label_edit_at: Option<Millis>,
}

impl<E: MediaElement> LabelingSession<E> {
    pub fn new(video: Interaction, player: SyncPlayer<E>) -> Self {
        Self {
            video,
            player,
            draft: LabelDraft::default(),
            last_label_edit_at: None,
        }
    }

    /// Start from previously saved values. Loading does not count as an edit.
    pub fn with_draft(mut self, draft: LabelDraft) -> Self {
        self.draft = draft;
        self
    }

    pub fn video(&self) -> &Interaction {
        &self.video
    }

    pub fn player(&self) -> &SyncPlayer<E> {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut SyncPlayer<E> {
        &mut self.player
    }

    pub fn draft(&self) -> &LabelDraft {
        &self.draft
    }

    pub fn clock(&self) -> LabelingClock {
        LabelingClock {
            first_play_at: self.player.first_played_at(),
            last_label_edit_at: self.last_label_edit_at,
        }
    }

    /// Choosing a label, even the one already selected, stamps the edit time.
    pub fn set_speaker_label(&mut self, speaker: Speaker, label: Option<MorphLabel>, now: Millis) {
        match speaker {
            Speaker::One => self.draft.speaker1_label = label,
            Speaker::Two => self.draft.speaker2_label = label,
        }
        if label.is_some() {
            self.last_label_edit_at = Some(now);
        }
    }

    pub fn set_confidence(&mut self, speaker: Speaker, value: u8) -> Result<(), CoreError> {
        if !(MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&value) {
            return Err(CoreError::Validation(format!(
                "confidence must be between {MIN_CONFIDENCE} and {MAX_CONFIDENCE}, got {value}"
            )));
        }
        match speaker {
            Speaker::One => self.draft.speaker1_confidence = value,
            Speaker::Two => self.draft.speaker2_confidence = value,
        }
        Ok(())
    }

    pub fn set_comments(&mut self, speaker: Speaker, text: impl Into<String>) {
        match speaker {
            Speaker::One => self.draft.speaker1_comments = text.into(),
            Speaker::Two => self.draft.speaker2_comments = text.into(),
        }
    }

    pub fn toggle_signal(
        &mut self,
        speaker: Speaker,
        facet_id: &str,
        signal_id: &str,
    ) -> Result<(), CoreError> {
        let categories = match speaker {
            Speaker::One => &mut self.draft.speaker1_categories,
            Speaker::Two => &mut self.draft.speaker2_categories,
        };
        categories.toggle(facet_id, signal_id)
    }

    /// Stop playback and build the write payload.
    ///
    /// `previous_ms` is the labeling time already stored for this video, if
    /// any. Refuses while either speaker label is unset.
    pub fn to_payload(&mut self, previous_ms: Option<u64>) -> Result<AnnotationPayload, CoreError> {
        self.player.pause();

        let (Some(label1), Some(label2)) = (self.draft.speaker1_label, self.draft.speaker2_label)
        else {
            return Err(CoreError::Validation(
                "Please select labels for both speakers".to_string(),
            ));
        };

        Ok(AnnotationPayload {
            video_id: self.video.video_id.clone(),
            vendor_id: self.video.vendor_id,
            session_id: self.video.session_id,
            interaction_id: self.video.interaction_id,
            speaker1_id: self.video.participant1_id.clone(),
            speaker2_id: self.video.participant2_id.clone(),
            speaker1_label: Some(label1.as_str().to_string()),
            speaker2_label: Some(label2.as_str().to_string()),
            speaker1_confidence: self.draft.speaker1_confidence,
            speaker2_confidence: self.draft.speaker2_confidence,
            speaker1_comments: self.draft.speaker1_comments.clone(),
            speaker2_comments: self.draft.speaker2_comments.clone(),
            speaker1_categories: self.draft.speaker1_categories.clone(),
            speaker2_categories: self.draft.speaker2_categories.clone(),
            labeling_time_ms: self.clock().labeling_time_ms(previous_ms),
        })
    }

    /// Switch to another video: fresh draft, fresh clock, player rewound.
    pub fn load(&mut self, video: Interaction) {
        self.player.reset();
        self.video = video;
        self.draft = LabelDraft::default();
        self.last_label_edit_at = None;
    }
}
