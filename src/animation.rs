//! Animation clip selection for the mascot.
//!
//! The selector keeps at most one clip active and only talks to the model's
//! clips through the [`ClipRegistry`] contract. Reaction clips are one-shot:
//! they play for a fixed time, then the selector returns to a follow-up clip.

use tracing::{info, warn};

use crate::error::MascotError;
use crate::mood::Mood;

pub const IDLE_CLIP: &str = "Idle";
pub const HAPPY_CLIP: &str = "Happy";
pub const HYPER_CLIP: &str = "Hyper";
pub const MOODY_CLIP: &str = "Moody";
pub const SCAM_CLIP: &str = "ScamDance";

/// Looping clip shown for a mood.
pub fn clip_for_mood(mood: Mood) -> &'static str {
    match mood {
        Mood::Hyped => HYPER_CLIP,
        Mood::Salty | Mood::EdgyAF => MOODY_CLIP,
        _ => IDLE_CLIP,
    }
}

// ---------------------------------------------------------------------------
// Clip registry contract
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipId(pub usize);

/// Playable clips of the loaded model.
pub trait ClipRegistry {
    fn lookup(&self, name: &str) -> Option<ClipId>;
    /// Start `clip` from its beginning.
    fn play(&mut self, clip: ClipId);
    fn stop(&mut self, clip: ClipId);
}

/// Named clip list that reports playback through `tracing`.
pub struct ClipLibrary {
    names: Vec<String>,
    playing: Option<ClipId>,
}

impl ClipLibrary {
    pub fn new(names: Vec<String>) -> Self {
        for name in &names {
            info!(clip = %name, "found animation");
        }
        Self {
            names,
            playing: None,
        }
    }

    pub fn name(&self, clip: ClipId) -> Option<&str> {
        self.names.get(clip.0).map(String::as_str)
    }

    pub fn playing(&self) -> Option<&str> {
        self.playing.and_then(|id| self.name(id))
    }
}

impl ClipRegistry for ClipLibrary {
    fn lookup(&self, name: &str) -> Option<ClipId> {
        self.names.iter().position(|n| n == name).map(ClipId)
    }

    fn play(&mut self, clip: ClipId) {
        info!(clip = self.name(clip).unwrap_or("?"), "play");
        self.playing = Some(clip);
    }

    fn stop(&mut self, clip: ClipId) {
        info!(clip = self.name(clip).unwrap_or("?"), "stop");
        if self.playing == Some(clip) {
            self.playing = None;
        }
    }
}

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

struct ActiveClip {
    name: String,
    id: ClipId,
}

struct OneShot {
    remaining: f64,
    then: String,
}

pub struct AnimationSelector {
    active: Option<ActiveClip>,
    oneshot: Option<OneShot>,
}

impl Default for AnimationSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationSelector {
    pub fn new() -> Self {
        Self {
            active: None,
            oneshot: None,
        }
    }

    /// Name of the active clip.
    pub fn active(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.name.as_str())
    }

    /// Switch to `name`. Re-requesting the active clip is a no-op; a missing
    /// clip is an error and leaves the previous clip playing.
    ///
    /// Returns `true` if playback changed. Cancels a pending one-shot return.
    pub fn set_target<C: ClipRegistry>(
        &mut self,
        registry: &mut C,
        name: &str,
    ) -> Result<bool, MascotError> {
        if self.active() == Some(name) {
            return Ok(false);
        }
        let id = registry
            .lookup(name)
            .ok_or_else(|| MascotError::ClipNotFound(name.to_string()))?;

        if let Some(prev) = self.active.take() {
            registry.stop(prev.id);
        }
        registry.play(id);
        self.active = Some(ActiveClip {
            name: name.to_string(),
            id,
        });
        self.oneshot = None;
        Ok(true)
    }

    /// Play `name` for `duration` seconds, then switch to `then`.
    /// Re-triggering a running one-shot restarts its timer.
    pub fn play_oneshot<C: ClipRegistry>(
        &mut self,
        registry: &mut C,
        name: &str,
        duration: f64,
        then: &str,
    ) -> Result<bool, MascotError> {
        let changed = self.set_target(registry, name)?;
        self.oneshot = Some(OneShot {
            remaining: duration,
            then: then.to_string(),
        });
        Ok(changed)
    }

    pub fn in_oneshot(&self) -> bool {
        self.oneshot.is_some()
    }

    /// Advance the one-shot timer by `dt` seconds.
    pub fn advance<C: ClipRegistry>(
        &mut self,
        registry: &mut C,
        dt: f64,
    ) -> Result<bool, MascotError> {
        let Some(oneshot) = self.oneshot.as_mut() else {
            return Ok(false);
        };
        oneshot.remaining -= dt;
        if oneshot.remaining > 0.0 {
            return Ok(false);
        }
        let then = std::mem::take(&mut oneshot.then);
        self.oneshot = None;
        self.set_target(registry, &then)
    }

    /// Request `name`, downgrading a missing clip to a warning.
    pub fn request<C: ClipRegistry>(&mut self, registry: &mut C, name: &str) -> bool {
        match self.set_target(registry, name) {
            Ok(changed) => changed,
            Err(e) => {
                warn!(error = %e, active = ?self.active(), "keeping current animation");
                false
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Registry that records every call.
    #[derive(Default)]
    pub(crate) struct RecordingRegistry {
        pub names: Vec<&'static str>,
        pub calls: Vec<(&'static str, &'static str)>,
    }

    impl RecordingRegistry {
        pub fn with(names: &[&'static str]) -> Self {
            Self {
                names: names.to_vec(),
                calls: Vec::new(),
            }
        }
    }

    impl ClipRegistry for RecordingRegistry {
        fn lookup(&self, name: &str) -> Option<ClipId> {
            self.names.iter().position(|n| *n == name).map(ClipId)
        }

        fn play(&mut self, clip: ClipId) {
            self.calls.push(("play", self.names[clip.0]));
        }

        fn stop(&mut self, clip: ClipId) {
            self.calls.push(("stop", self.names[clip.0]));
        }
    }

    fn registry() -> RecordingRegistry {
        RecordingRegistry::with(&[IDLE_CLIP, HAPPY_CLIP, HYPER_CLIP, MOODY_CLIP])
    }

    #[test]
    fn test_set_target_twice_is_one_transition() {
        let mut reg = registry();
        let mut sel = AnimationSelector::new();
        sel.set_target(&mut reg, HYPER_CLIP).unwrap();
        reg.calls.clear();

        assert!(sel.set_target(&mut reg, IDLE_CLIP).unwrap());
        assert!(!sel.set_target(&mut reg, IDLE_CLIP).unwrap());
        assert_eq!(reg.calls, vec![("stop", HYPER_CLIP), ("play", IDLE_CLIP)]);
        assert_eq!(sel.active(), Some(IDLE_CLIP));
    }

    #[test]
    fn test_first_target_only_plays() {
        let mut reg = registry();
        let mut sel = AnimationSelector::new();
        sel.set_target(&mut reg, IDLE_CLIP).unwrap();
        assert_eq!(reg.calls, vec![("play", IDLE_CLIP)]);
    }

    #[test]
    fn test_missing_clip_keeps_previous() {
        let mut reg = registry();
        let mut sel = AnimationSelector::new();
        sel.set_target(&mut reg, IDLE_CLIP).unwrap();
        reg.calls.clear();

        let err = sel.set_target(&mut reg, "Backflip").unwrap_err();
        assert!(matches!(err, MascotError::ClipNotFound(ref n) if n == "Backflip"));
        assert!(reg.calls.is_empty());
        assert_eq!(sel.active(), Some(IDLE_CLIP));

        assert!(!sel.request(&mut reg, "Backflip"));
        assert_eq!(sel.active(), Some(IDLE_CLIP));
    }

    #[test]
    fn test_oneshot_returns_to_follow_up() {
        let mut reg = registry();
        let mut sel = AnimationSelector::new();
        sel.set_target(&mut reg, IDLE_CLIP).unwrap();

        sel.play_oneshot(&mut reg, HAPPY_CLIP, 2.0, MOODY_CLIP).unwrap();
        assert_eq!(sel.active(), Some(HAPPY_CLIP));
        assert!(!sel.advance(&mut reg, 1.5).unwrap());
        assert_eq!(sel.active(), Some(HAPPY_CLIP));
        assert!(sel.advance(&mut reg, 0.5).unwrap());
        assert_eq!(sel.active(), Some(MOODY_CLIP));
        assert!(!sel.in_oneshot());
    }

    #[test]
    fn test_retrigger_restarts_oneshot_timer() {
        let mut reg = registry();
        let mut sel = AnimationSelector::new();
        sel.play_oneshot(&mut reg, HAPPY_CLIP, 2.0, IDLE_CLIP).unwrap();
        sel.advance(&mut reg, 1.5).unwrap();
        assert!(!sel.play_oneshot(&mut reg, HAPPY_CLIP, 2.0, IDLE_CLIP).unwrap());
        sel.advance(&mut reg, 1.5).unwrap();
        assert_eq!(sel.active(), Some(HAPPY_CLIP));
    }

    #[test]
    fn test_explicit_target_cancels_oneshot() {
        let mut reg = registry();
        let mut sel = AnimationSelector::new();
        sel.play_oneshot(&mut reg, HAPPY_CLIP, 2.0, IDLE_CLIP).unwrap();
        sel.set_target(&mut reg, MOODY_CLIP).unwrap();
        assert!(!sel.in_oneshot());
        sel.advance(&mut reg, 5.0).unwrap();
        assert_eq!(sel.active(), Some(MOODY_CLIP));
    }

    #[test]
    fn test_mood_clip_table() {
        assert_eq!(clip_for_mood(Mood::Hyped), HYPER_CLIP);
        assert_eq!(clip_for_mood(Mood::Salty), MOODY_CLIP);
        assert_eq!(clip_for_mood(Mood::EdgyAF), MOODY_CLIP);
        assert_eq!(clip_for_mood(Mood::Chill), IDLE_CLIP);
        assert_eq!(clip_for_mood(Mood::Hyper), IDLE_CLIP);
        assert_eq!(clip_for_mood(Mood::JawbreakerJunkie), IDLE_CLIP);
    }

    #[test]
    fn test_clip_library_tracks_playing() {
        let mut lib = ClipLibrary::new(vec!["Idle".into(), "Happy".into()]);
        let idle = lib.lookup("Idle").unwrap();
        lib.play(idle);
        assert_eq!(lib.playing(), Some("Idle"));
        lib.stop(idle);
        assert_eq!(lib.playing(), None);
        assert!(lib.lookup("Moody").is_none());
    }
}
