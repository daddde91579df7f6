use crate::foundation::error::StageResult;
use crate::scene::runtime::ScenePlayer;
use crate::timeline::model::{
    CaptionSettings, Layer, TextClipSettings, TranscriptionMap, TransitionMap,
};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Full variable bundle pushed into the scene runtime.
///
/// Compared by deep equality (`PartialEq`) against the last-applied bundle to
/// suppress redundant pushes.
pub struct Snapshot {
    /// Timeline layers, bottom-to-top.
    pub layers: Vec<Layer>,
    /// Project duration in seconds.
    pub duration_s: f64,
    /// Transcriptions keyed by source asset id.
    pub transcriptions: TranscriptionMap,
    /// Transitions keyed by leading clip id.
    pub transitions: TransitionMap,
    /// Caption appearance defaults.
    pub caption_settings: CaptionSettings,
    /// Text clip defaults.
    pub text_clip_settings: TextClipSettings,
}

/// What [`PlaybackGate::apply`] did with a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateEffect {
    /// Pushed into the scene runtime immediately.
    Applied,
    /// Buffered until playback stops; the UI shows an "update queued" hint.
    Queued,
    /// Deep-equal to the last applied snapshot; nothing happened.
    Unchanged,
}

/// Gates variable pushes into the live scene runtime on play state.
///
/// Pushing variables mid-playback forces the runtime to recompute its timing
/// graphs synchronously, which visibly stutters playback. While playing,
/// snapshots are buffered last-write-wins and flushed when playback stops, so
/// authoring edits never interrupt a running preview.
#[derive(Debug, Default)]
pub struct PlaybackGate {
    last_applied: Option<Snapshot>,
    pending: Option<Snapshot>,
    player_generation: u64,
}

impl PlaybackGate {
    /// Create a gate with no applied state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a changed snapshot toward the player.
    ///
    /// The play state is read from the player at call time, never from a
    /// captured value, so a push can never race a play/pause transition.
    pub fn apply(
        &mut self,
        snapshot: Snapshot,
        player: &mut dyn ScenePlayer,
    ) -> StageResult<GateEffect> {
        if self.last_applied.as_ref() == Some(&snapshot) {
            return Ok(GateEffect::Unchanged);
        }

        if player.playback().playing {
            // Last write wins; a burst of edits during one play session
            // flushes as a single push at stop time.
            self.pending = Some(snapshot);
            return Ok(GateEffect::Queued);
        }

        self.push(snapshot, player)?;
        Ok(GateEffect::Applied)
    }

    /// Notify the gate that playback stopped.
    ///
    /// Flushes the pending snapshot, if any; returns `true` when a flush
    /// happened (the UI clears its "update queued" hint).
    pub fn playback_stopped(&mut self, player: &mut dyn ScenePlayer) -> StageResult<bool> {
        match self.pending.take() {
            Some(snapshot) => {
                self.push(snapshot, player)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Notify the gate that the player identity changed (a newly compiled
    /// scene replaced the old one).
    ///
    /// Resets applied and buffered state so the next snapshot is pushed
    /// unconditionally into the fresh player.
    pub fn player_changed(&mut self, generation: u64) {
        if generation != self.player_generation {
            self.player_generation = generation;
            self.last_applied = None;
            self.pending = None;
        }
    }

    /// Whether a buffered snapshot is waiting for playback to stop.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The last snapshot actually pushed into the runtime.
    pub fn last_applied(&self) -> Option<&Snapshot> {
        self.last_applied.as_ref()
    }

    fn push(&mut self, snapshot: Snapshot, player: &mut dyn ScenePlayer) -> StageResult<()> {
        player.set_variables(&snapshot)?;
        player.request_recalculation();
        self.last_applied = Some(snapshot);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/gate.rs"]
mod tests;
