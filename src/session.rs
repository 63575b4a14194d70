//! The mascot session: one context that owns every piece of simulation
//! state for a spawned mascot and turns user input into render data.
//!
//! Within a frame, pointer overrides win over integration: while the mascot
//! is held, `tick` leaves the position alone and wandering is suppressed.

use rand::Rng;
use serde::Serialize;
use std::f64::consts::TAU;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::animation::{AnimationSelector, ClipRegistry, HAPPY_CLIP, SCAM_CLIP, clip_for_mood};
use crate::config::{AppearanceConfig, MascotConfig};
use crate::math::{Aabb, Vector2, Vector3};
use crate::mood::{MascotState, Mood};
use crate::physics::{PhysicsBody, PhysicsState};
use crate::picking::{Camera, DragController, DragPhase};
use crate::throw::ThrowResolver;
use crate::wander::WanderScheduler;

/// Tint shown briefly after a feed.
pub const FEED_FLASH_TINT: u32 = 0x00ff00;

const SHORT_MESSAGE_TTL: Duration = Duration::from_secs(2);
const LONG_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// What the renderer applies to the displayed model each frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub position: Vector3,
    /// Euler angles in radians.
    pub rotation: Vector3,
    pub scale: Vector3,
    /// `0xRRGGBB`.
    pub tint: u32,
    pub clip: Option<String>,
}

/// Display data for the UI after a user action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusUpdate {
    pub level: u32,
    pub mood: Mood,
    pub message: String,
    /// How long the caller should show `message`.
    pub message_ttl_ms: u64,
}

impl StatusUpdate {
    fn new(state: &MascotState, message: String, ttl: Duration) -> Self {
        Self {
            level: state.level(),
            mood: state.mood(),
            message,
            message_ttl_ms: ttl.as_millis() as u64,
        }
    }

    pub fn message_ttl(&self) -> Duration {
        Duration::from_millis(self.message_ttl_ms)
    }
}

pub struct MascotSession<C: ClipRegistry, G: Rng> {
    name: String,
    body: PhysicsBody,
    drag: DragController,
    throw: ThrowResolver,
    wander: WanderScheduler,
    mascot: MascotState,
    animation: AnimationSelector,
    clips: C,
    camera: Camera,
    rng: G,
    /// Pick box half size at scale 1; `None` while no model is loaded.
    half_extents: Option<Vector3>,
    configured_extents: Vector3,
    appearance: AppearanceConfig,
    reaction_secs: f64,
    rotation: Vector3,
    flash_remaining: f64,
}

impl<C: ClipRegistry, G: Rng> MascotSession<C, G> {
    /// Spawn a mascot with a loaded model: wandering armed, idle clip playing.
    pub fn spawn(cfg: &MascotConfig, clips: C, rng: G) -> Self {
        let mut session = Self {
            name: cfg.identity.name.clone(),
            body: PhysicsBody::new(&cfg.physics),
            drag: DragController::new(),
            throw: ThrowResolver::new(cfg.drag.throw_factor),
            wander: WanderScheduler::new(&cfg.wander),
            mascot: MascotState::new(),
            animation: AnimationSelector::new(),
            clips,
            camera: Camera::new(&cfg.camera),
            rng,
            half_extents: Some(cfg.drag.half_extents),
            configured_extents: cfg.drag.half_extents,
            appearance: cfg.appearance.clone(),
            reaction_secs: cfg.animation.reaction_secs,
            rotation: Vector3::ZERO,
            flash_remaining: 0.0,
        };
        session.wander.restart();
        session.request_resting_clip();
        info!(name = %session.name, "mascot spawned");
        session
    }

    // -- simulation ----------------------------------------------------------

    /// Advance everything by `dt` seconds and return the frame to display.
    pub fn tick(&mut self, dt: f64) -> RenderFrame {
        if let Err(e) = self.animation.advance(&mut self.clips, dt) {
            warn!(error = %e, "reaction clip could not return");
        }
        self.flash_remaining = (self.flash_remaining - dt).max(0.0);

        let held = self.drag.is_dragging();
        if !held {
            self.body.step(dt);
        }

        if let Some(v) = self
            .wander
            .advance(dt, held, self.body.velocity(), &mut self.rng)
        {
            self.body.set_velocity(v);
        }

        if self.appearance.spin_rate != 0.0 {
            self.rotation.y = (self.rotation.y + self.appearance.spin_rate * dt).rem_euclid(TAU);
        }

        self.frame()
    }

    /// Current render data without advancing time.
    pub fn frame(&self) -> RenderFrame {
        let tint = if self.flash_remaining > 0.0 {
            FEED_FLASH_TINT
        } else {
            self.mascot.mood().tint()
        };
        RenderFrame {
            position: self.body.position(),
            rotation: self.rotation,
            scale: Vector3::splat(self.scale()),
            tint,
            clip: self.animation.active().map(str::to_string),
        }
    }

    // -- pointer input -------------------------------------------------------

    /// Returns `true` if the mascot was picked up.
    pub fn pointer_down(&mut self, ndc: Vector2) -> bool {
        let ray = self.camera.ray_from_ndc(ndc);
        let proxy = self.proxy();
        let picked = self
            .drag
            .pointer_down(&ray, ndc, proxy.as_ref(), &mut self.body);
        if picked {
            info!(x = ndc.x, y = ndc.y, "picked up");
        } else {
            debug!(x = ndc.x, y = ndc.y, "pointer down missed");
        }
        picked
    }

    pub fn pointer_move(&mut self, ndc: Vector2) -> Option<Vector3> {
        let ray = self.camera.ray_from_ndc(ndc);
        self.drag.pointer_move(&ray, ndc, &mut self.body)
    }

    /// Returns the launch velocity if the mascot was being held.
    pub fn pointer_up(&mut self, ndc: Vector2) -> Option<Vector3> {
        let thrown = self.drag.pointer_up(ndc, &self.throw, &mut self.body);
        if let Some(v) = thrown {
            info!(vx = v.x, vy = v.y, "thrown");
        }
        thrown
    }

    // -- user actions --------------------------------------------------------

    pub fn feed(&mut self) -> StatusUpdate {
        let leveled = self.mascot.feed();
        self.flash_remaining = self.appearance.feed_flash_secs;

        let then = self.resting_clip();
        if let Err(e) =
            self.animation
                .play_oneshot(&mut self.clips, HAPPY_CLIP, self.reaction_secs, then)
        {
            warn!(error = %e, "keeping current animation");
        }

        info!(
            level = self.mascot.level(),
            mood = %self.mascot.mood(),
            leveled,
            "fed"
        );
        StatusUpdate::new(
            &self.mascot,
            format!("{} munches on a jawbreaker!", self.name),
            SHORT_MESSAGE_TTL,
        )
    }

    pub fn provoke(&mut self) -> StatusUpdate {
        let mood = self.mascot.provoke(&mut self.rng);
        self.animation.request(&mut self.clips, clip_for_mood(mood));
        info!(mood = %mood, "mood swing");
        StatusUpdate::new(
            &self.mascot,
            format!("{} is feeling: {}", self.name, mood),
            SHORT_MESSAGE_TTL,
        )
    }

    pub fn toggle_scam(&mut self) -> StatusUpdate {
        let active = self.mascot.toggle_scam();
        self.request_resting_clip();
        let message = if active {
            format!("{} is up to no good! Scam in progress...", self.name)
        } else {
            "Scam ended. The cul-de-sac is safe... for now.".to_string()
        };
        info!(active, "scam toggled");
        StatusUpdate::new(&self.mascot, message, LONG_MESSAGE_TTL)
    }

    // -- model lifecycle -----------------------------------------------------

    /// Swap in a freshly loaded model's clips. Cancels any grab and re-arms
    /// wandering so only one interval is ever pending.
    pub fn reload_model(&mut self, clips: C) {
        self.drag.cancel();
        self.clips = clips;
        self.animation = AnimationSelector::new();
        self.half_extents = Some(self.configured_extents);
        self.wander.restart();
        self.request_resting_clip();
        info!("model reloaded");
    }

    /// Model gone: picking misses and wandering stops until the next reload.
    pub fn unload_model(&mut self) {
        self.drag.cancel();
        self.half_extents = None;
        self.wander.stop();
        info!("model unloaded");
    }

    // -- observation ---------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn physics(&self) -> &PhysicsState {
        self.body.state()
    }

    pub fn mascot(&self) -> &MascotState {
        &self.mascot
    }

    pub fn drag_phase(&self) -> &DragPhase {
        self.drag.phase()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn active_clip(&self) -> Option<&str> {
        self.animation.active()
    }

    pub fn clips(&self) -> &C {
        &self.clips
    }

    pub fn is_wandering(&self) -> bool {
        self.wander.is_running()
    }

    pub fn scale(&self) -> f64 {
        let grown = self.mascot.level().saturating_sub(1) as f64;
        self.appearance.base_scale + self.appearance.growth_per_level * grown
    }

    // -- private helpers -----------------------------------------------------

    fn proxy(&self) -> Option<Aabb> {
        let half = self.half_extents?;
        Some(Aabb::from_center_extents(
            self.body.position(),
            half * self.scale(),
        ))
    }

    /// Looping clip to settle on: the scam dance while a scam runs, else the
    /// mood's clip.
    fn resting_clip(&self) -> &'static str {
        if self.mascot.scam_active() {
            SCAM_CLIP
        } else {
            clip_for_mood(self.mascot.mood())
        }
    }

    fn request_resting_clip(&mut self) {
        let clip = self.resting_clip();
        self.animation.request(&mut self.clips, clip);
    }
}
