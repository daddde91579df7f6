use std::collections::BTreeMap;

use crate::foundation::core::Vec2;

/// Floor applied to clip speed when computing effective duration.
const MIN_SPEED: f64 = 1e-6;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One timeline layer, ordered bottom-to-top within the project.
///
/// Layer order doubles as z-order: later layers render on top of earlier ones.
pub struct Layer {
    /// Stable layer identifier.
    pub id: String,
    /// Layer content kind. Audio layers are never hit-tested.
    pub kind: LayerKind,
    /// Clips in timeline order; later clips within a layer render on top.
    pub clips: Vec<Clip>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Kind of content a layer holds.
pub enum LayerKind {
    /// Video or image footage.
    Video,
    /// Audio only; has no visual render node.
    Audio,
    /// Text clips, optionally templated.
    Text,
    /// Auto-generated caption track.
    Caption,
}

impl LayerKind {
    /// Whether clips of this layer produce render nodes at all.
    pub fn is_visual(self) -> bool {
        !matches!(self, LayerKind::Audio)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One clip placed on a layer.
pub struct Clip {
    /// Stable clip identifier.
    pub id: String,
    /// Optional template name for templated text clips.
    #[serde(default)]
    pub template: Option<String>,
    /// Timeline start in seconds.
    pub start_s: f64,
    /// Source duration in seconds, before speed adjustment.
    pub duration_s: f64,
    /// Playback speed multiplier; effective duration is `duration_s / speed`.
    pub speed: f64,
    /// Position offset in scene units.
    pub position: Vec2,
    /// Scale in scene units per axis.
    pub scale: Vec2,
}

impl Clip {
    /// Whether this clip is temporally active at playhead time `now_s`.
    ///
    /// Active means `start <= now <= start + duration / max(speed, eps)`; both
    /// boundaries are inclusive.
    pub fn is_active_at(&self, now_s: f64) -> bool {
        let effective = self.duration_s / self.speed.max(MIN_SPEED);
        self.start_s <= now_s && now_s <= self.start_s + effective
    }

    /// Resolve the render-tree node key this clip draws into.
    ///
    /// Pure function of clip kind and template: a text clip using the
    /// "title-card" template renders through a different node than plain text,
    /// and all caption clips share one captions node.
    pub fn node_key(&self, layer_kind: LayerKind) -> Option<String> {
        match layer_kind {
            LayerKind::Audio => None,
            LayerKind::Video => Some(format!("clip-{}", self.id)),
            LayerKind::Text => match self.template.as_deref() {
                Some("title-card") => Some(format!("title-card-{}", self.id)),
                _ => Some(format!("text-{}", self.id)),
            },
            LayerKind::Caption => Some("captions".to_string()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Word-level transcription attached to a source asset.
pub struct Transcription {
    /// Timed words as `(start_s, end_s, text)` triples.
    pub words: Vec<(f64, f64, String)>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Transition between two adjacent clips.
pub struct TransitionSpec {
    /// Canonical transition kind identifier.
    pub kind: String,
    /// Transition duration in seconds.
    pub duration_s: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Project-wide caption appearance defaults.
pub struct CaptionSettings {
    /// Font family name.
    pub font_family: String,
    /// Font size in scene units.
    pub font_size: f64,
    /// Text color as straight RGBA8.
    pub color_rgba8: [u8; 4],
    /// Whether captions are shown at all.
    pub enabled: bool,
}

impl Default for CaptionSettings {
    fn default() -> Self {
        Self {
            font_family: "Inter".to_string(),
            font_size: 48.0,
            color_rgba8: [255, 255, 255, 255],
            enabled: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Project-wide defaults for newly created text clips.
pub struct TextClipSettings {
    /// Font family name.
    pub font_family: String,
    /// Font size in scene units.
    pub font_size: f64,
    /// Text color as straight RGBA8.
    pub color_rgba8: [u8; 4],
}

impl Default for TextClipSettings {
    fn default() -> Self {
        Self {
            font_family: "Inter".to_string(),
            font_size: 64.0,
            color_rgba8: [255, 255, 255, 255],
        }
    }
}

/// Transcription table keyed by source asset id.
pub type TranscriptionMap = BTreeMap<String, Transcription>;

/// Transition table keyed by the boundary's leading clip id.
pub type TransitionMap = BTreeMap<String, TransitionSpec>;

#[cfg(test)]
#[path = "../../tests/unit/timeline/model.rs"]
mod tests;
