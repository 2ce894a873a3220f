//! Wire-Routing Puzzle Engine for the puzzlebox adventure core.
//!
//! The player threads a chain of wire segments from a start point to a
//! target point inside a box, viewed through one of two fixed camera
//! viewpoints. Each primary action extends the chain at the active tip;
//! running the tip into a wall discards the chain and reseeds it at the
//! start. Bringing the tip within the completion threshold of the target
//! freezes the final segment and plays the closing sequence.
//!
//! The host drives the active tip every frame via
//! [`WireBoxPuzzle::set_tip`] -- the core never raycasts. Guard planes
//! constrain the chain to a single plane per camera view and are
//! repositioned each tick to track the tip; swapping the camera swaps
//! which plane is enforced.
//!
//! Every wait in the opening/completion/abort sequences is explicit timer
//! state; the only early exit from a started sequence is collision ->
//! reset, which discards chain state rather than cancelling a timer.

pub mod geometry;

use geometry::Vec3;
use puzzlebox_core::context::PuzzleContext;
use puzzlebox_core::event::Event;
use puzzlebox_core::fixed::{seconds_to_ticks, Fixed64, Ticks};
use puzzlebox_core::id::PuzzleId;
use puzzlebox_core::state::{Puzzle, PuzzleState, StateCell};
use puzzlebox_core::timer::{TimerId, Timers};
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Identifies a wire segment in the chain.
    pub struct WirePartId;
}

// ---------------------------------------------------------------------------
// Segments
// ---------------------------------------------------------------------------

/// One segment of the wire chain. The puzzle owns the whole chain; a reset
/// clears the slotmap in one pass, non-recursively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WireSegment {
    /// Anchor position: the previous segment's mount point (or the start
    /// point for the seed segment).
    pub base: Vec3,
    /// Current tip position, driven by the host cursor every frame.
    pub mount_point: Vec3,
    /// Whether the tip currently touches a wall/obstacle, per the host's
    /// proximity check.
    pub colliding: bool,
    /// Back-reference to the segment this one grew from.
    pub prev: Option<WirePartId>,
    /// Set when the chain completes: the segment's orientation and length
    /// are fixed to exactly reach the target.
    pub frozen: bool,
}

impl WireSegment {
    /// Current segment length.
    pub fn length(&self) -> Fixed64 {
        (self.mount_point - self.base).length()
    }
}

// ---------------------------------------------------------------------------
// Views and walls
// ---------------------------------------------------------------------------

/// The two fixed camera viewpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum ViewPoint {
    #[default]
    Front,
    Up,
}

impl ViewPoint {
    fn opposite(self) -> ViewPoint {
        match self {
            ViewPoint::Front => ViewPoint::Up,
            ViewPoint::Up => ViewPoint::Front,
        }
    }
}

/// Positions of the two guard planes bounding the active build plane.
/// Exactly one is active at a time, chosen by the camera view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct GuardWalls {
    pub back_active: bool,
    /// Depth (z) of the back plane while the front view is active.
    pub back_depth: Fixed64,
    pub down_active: bool,
    /// Height (y) of the down plane while the up view is active.
    pub down_height: Fixed64,
}

// ---------------------------------------------------------------------------
// Input and configuration
// ---------------------------------------------------------------------------

/// One tick's worth of player input, as the host saw it.
#[derive(Debug, Clone, Copy, Default)]
pub struct WireInput {
    /// Extend the chain.
    pub primary: bool,
    /// Swap the camera viewpoint.
    pub secondary: bool,
    /// The pointer is over UI; primary clicks are swallowed.
    pub pointer_over_ui: bool,
}

/// Static configuration for one wire box instance.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct WireBoxConfig {
    pub start_point: Vec3,
    pub target_point: Vec3,
    /// Completion threshold: the chain completes iff the tip's distance to
    /// the target is strictly below this.
    pub check_distance: Fixed64,
    /// Wait before the door-open trigger fires.
    pub open_delay: Ticks,
    /// Wait between the door-open trigger and the tutorial + seed.
    pub tutorial_delay: Ticks,
    /// Wait between the complete notification and the door-close trigger.
    pub complete_door_delay: Ticks,
    /// Wait between the door-close trigger and the final teardown.
    pub complete_finish_delay: Ticks,
    /// Abbreviated wait before the door-close trigger on abort.
    pub abort_door_delay: Ticks,
    /// Duration of a camera viewpoint transition.
    pub view_swap_time: Ticks,
    /// World objects the presentation layer disables while the puzzle is
    /// active.
    pub off_objects: Vec<String>,
}

impl Default for WireBoxConfig {
    fn default() -> Self {
        Self {
            start_point: Vec3::ZERO,
            target_point: Vec3::ZERO,
            check_distance: Fixed64::from_num(0.1),
            open_delay: seconds_to_ticks(0.5),
            tutorial_delay: seconds_to_ticks(0.5),
            complete_door_delay: seconds_to_ticks(0.5),
            complete_finish_delay: seconds_to_ticks(0.7),
            abort_door_delay: seconds_to_ticks(0.2),
            view_swap_time: seconds_to_ticks(1.0),
            off_objects: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Phases
// ---------------------------------------------------------------------------

/// Where the puzzle is in its own state machine. Layered over the shared
/// [`PuzzleState`]: `WaitingStart` maps to the opening sequence,
/// `BuildingChain` to live input, `Completing` to the closing sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WirePhase {
    Idle,
    Opening(OpeningStep),
    Building,
    Completing(CompletingStep),
    Aborting(AbortingStep),
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpeningStep {
    DoorDelay,
    TutorialDelay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompletingStep {
    /// Waiting for the forced front-view transition to land.
    AwaitView,
    DoorDelay,
    FinishDelay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AbortingStep {
    AwaitView,
    DoorDelay,
}

// ---------------------------------------------------------------------------
// WireBoxPuzzle
// ---------------------------------------------------------------------------

/// The wire-routing puzzle.
pub struct WireBoxPuzzle {
    id: PuzzleId,
    config: WireBoxConfig,
    state: StateCell,
    phase: WirePhase,
    timers: Timers,
    /// The pending sequence wait, if a phase step is counting down.
    pending: Option<TimerId>,
    parts: SlotMap<WirePartId, WireSegment>,
    /// Chain order; the last entry is the active tip.
    chain: Vec<WirePartId>,
    view: ViewPoint,
    pending_view: ViewPoint,
    view_transition: Option<TimerId>,
    input_enabled: bool,
    tutorial_visible: bool,
    target_reached: bool,
    visible: bool,
    world_suppressed: bool,
    walls: GuardWalls,
}

impl std::fmt::Debug for WireBoxPuzzle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WireBoxPuzzle")
            .field("id", &self.id)
            .field("state", &self.state.get())
            .field("phase", &self.phase)
            .field("segments", &self.chain.len())
            .field("view", &self.view)
            .field("input_enabled", &self.input_enabled)
            .finish_non_exhaustive()
    }
}

impl WireBoxPuzzle {
    pub fn new(id: PuzzleId, config: WireBoxConfig) -> Self {
        Self {
            id,
            config,
            state: StateCell::new(),
            phase: WirePhase::Idle,
            timers: Timers::new(),
            pending: None,
            parts: SlotMap::with_key(),
            chain: Vec::new(),
            view: ViewPoint::Front,
            pending_view: ViewPoint::Front,
            view_transition: None,
            input_enabled: false,
            tutorial_visible: false,
            target_reached: false,
            visible: false,
            world_suppressed: false,
            walls: GuardWalls::default(),
        }
    }

    pub fn id(&self) -> PuzzleId {
        self.id
    }

    pub fn state_cell(&mut self) -> &mut StateCell {
        &mut self.state
    }

    pub fn is_input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn is_tutorial_visible(&self) -> bool {
        self.tutorial_visible
    }

    /// Whether the target-reached visual should show.
    pub fn is_target_reached(&self) -> bool {
        self.target_reached
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn view(&self) -> ViewPoint {
        self.view
    }

    pub fn is_view_transitioning(&self) -> bool {
        self.view_transition.is_some()
    }

    pub fn walls(&self) -> GuardWalls {
        self.walls
    }

    pub fn segment_count(&self) -> usize {
        self.chain.len()
    }

    /// The chain's segments in build order.
    pub fn segments(&self) -> impl Iterator<Item = &WireSegment> {
        self.chain.iter().map(|id| &self.parts[*id])
    }

    /// The active tip segment, if the chain is seeded.
    pub fn active_segment(&self) -> Option<&WireSegment> {
        self.chain.last().map(|id| &self.parts[*id])
    }

    /// World objects the presentation layer should keep disabled right now.
    pub fn suppressed_objects(&self) -> &[String] {
        if self.world_suppressed {
            &self.config.off_objects
        } else {
            &[]
        }
    }

    /// Update the active tip from the host's cursor tracking: its current
    /// mount position and whether it touches a wall. Frozen tips ignore
    /// further tracking.
    pub fn set_tip(&mut self, mount_point: Vec3, colliding: bool) {
        let Some(last) = self.chain.last() else {
            return;
        };
        let segment = &mut self.parts[*last];
        if segment.frozen {
            return;
        }
        segment.mount_point = mount_point;
        segment.colliding = colliding;
    }

    /// Advance the puzzle by one tick with this tick's input.
    pub fn tick(&mut self, ctx: &mut PuzzleContext<'_>, input: WireInput) {
        let expired = self.timers.tick();

        if let Some(transition) = self.view_transition
            && expired.contains(&transition)
        {
            self.view_transition = None;
            self.view = self.pending_view;
        }

        let pending_fired = match self.pending {
            Some(timer) => expired.contains(&timer),
            None => false,
        };
        if pending_fired {
            self.pending = None;
        }

        self.advance_sequence(ctx, pending_fired);

        if self.phase == WirePhase::Building
            && self.input_enabled
            && self.view_transition.is_none()
        {
            if input.secondary {
                self.swap_view();
            } else if input.primary && !input.pointer_over_ui && !self.chain.is_empty() {
                self.extend_chain(ctx);
            }
            self.update_walls();
        }
    }

    // -- Sequence state machine --

    fn advance_sequence(&mut self, ctx: &mut PuzzleContext<'_>, pending_fired: bool) {
        match self.phase {
            WirePhase::Opening(OpeningStep::DoorDelay) if pending_fired => {
                ctx.events.emit(Event::DoorSequence {
                    puzzle: self.id,
                    opening: true,
                    tick: ctx.tick,
                });
                self.phase = WirePhase::Opening(OpeningStep::TutorialDelay);
                self.pending = Some(self.timers.start(self.config.tutorial_delay));
            }
            WirePhase::Opening(OpeningStep::TutorialDelay) if pending_fired => {
                self.tutorial_visible = true;
                self.seed_chain();
                self.input_enabled = true;
                self.phase = WirePhase::Building;
                self.update_walls();
            }
            WirePhase::Completing(CompletingStep::AwaitView)
                if self.view_transition.is_none() =>
            {
                self.announce_completion(ctx);
            }
            WirePhase::Completing(CompletingStep::DoorDelay) if pending_fired => {
                ctx.events.emit(Event::DoorSequence {
                    puzzle: self.id,
                    opening: false,
                    tick: ctx.tick,
                });
                self.phase = WirePhase::Completing(CompletingStep::FinishDelay);
                self.pending = Some(self.timers.start(self.config.complete_finish_delay));
            }
            WirePhase::Completing(CompletingStep::FinishDelay) if pending_fired => {
                let transition = self.state.set(PuzzleState::Complete);
                self.emit_transition(ctx, transition);
                self.teardown();
                self.phase = WirePhase::Complete;
            }
            WirePhase::Aborting(AbortingStep::AwaitView) if self.view_transition.is_none() => {
                self.begin_abort_door(ctx);
            }
            WirePhase::Aborting(AbortingStep::DoorDelay) if pending_fired => {
                ctx.events.emit(Event::DoorSequence {
                    puzzle: self.id,
                    opening: false,
                    tick: ctx.tick,
                });
                let transition = self.state.set(PuzzleState::Idle);
                self.emit_transition(ctx, transition);
                self.teardown();
                self.phase = WirePhase::Idle;
            }
            _ => {}
        }
    }

    fn announce_completion(&mut self, ctx: &mut PuzzleContext<'_>) {
        ctx.events.emit(Event::PuzzleCompleted {
            puzzle: self.id,
            tick: ctx.tick,
        });
        self.tutorial_visible = false;
        self.phase = WirePhase::Completing(CompletingStep::DoorDelay);
        self.pending = Some(self.timers.start(self.config.complete_door_delay));
    }

    fn begin_abort_door(&mut self, _ctx: &mut PuzzleContext<'_>) {
        self.tutorial_visible = false;
        self.phase = WirePhase::Aborting(AbortingStep::DoorDelay);
        self.pending = Some(self.timers.start(self.config.abort_door_delay));
    }

    // -- Chain building --

    fn extend_chain(&mut self, ctx: &mut PuzzleContext<'_>) {
        let last_id = *self.chain.last().expect("chain checked non-empty");
        let tip = self.parts[last_id];

        if tip.colliding {
            ctx.events.emit(Event::ChainCollided {
                puzzle: self.id,
                tick: ctx.tick,
            });
            self.discard_chain();
            self.seed_chain();
            ctx.events.emit(Event::ChainReset {
                puzzle: self.id,
                tick: ctx.tick,
            });
            return;
        }

        let threshold = self.config.check_distance * self.config.check_distance;
        if tip.mount_point.distance_squared(&self.config.target_point) < threshold {
            // Freeze the final segment to exactly reach the target.
            let segment = &mut self.parts[last_id];
            segment.mount_point = self.config.target_point;
            segment.frozen = true;
            self.target_reached = true;
            self.input_enabled = false;
            if self.view == ViewPoint::Up {
                self.start_view_transition(ViewPoint::Front);
                self.phase = WirePhase::Completing(CompletingStep::AwaitView);
            } else {
                self.announce_completion(ctx);
            }
            return;
        }

        let base = tip.mount_point;
        let id = self.parts.insert(WireSegment {
            base,
            mount_point: base,
            colliding: false,
            prev: Some(last_id),
            frozen: false,
        });
        self.chain.push(id);
        ctx.events.emit(Event::ChainExtended {
            puzzle: self.id,
            segments: self.chain.len() as u32,
            tick: ctx.tick,
        });
    }

    fn seed_chain(&mut self) {
        let start = self.config.start_point;
        let id = self.parts.insert(WireSegment {
            base: start,
            mount_point: start,
            colliding: false,
            prev: None,
            frozen: false,
        });
        self.chain.push(id);
    }

    fn discard_chain(&mut self) {
        self.parts.clear();
        self.chain.clear();
    }

    // -- Camera --

    fn swap_view(&mut self) {
        if self.view_transition.is_some() {
            return;
        }
        self.start_view_transition(self.view.opposite());
    }

    fn start_view_transition(&mut self, target: ViewPoint) {
        self.pending_view = target;
        self.view_transition = Some(self.timers.start(self.config.view_swap_time));
    }

    // -- Walls --

    fn update_walls(&mut self) {
        let Some(last) = self.chain.last() else {
            return;
        };
        let tip = self.parts[*last].base;
        match self.view {
            ViewPoint::Front => {
                self.walls = GuardWalls {
                    back_active: true,
                    back_depth: tip.z,
                    down_active: false,
                    down_height: self.walls.down_height,
                };
            }
            ViewPoint::Up => {
                self.walls = GuardWalls {
                    back_active: false,
                    back_depth: self.walls.back_depth,
                    down_active: true,
                    down_height: tip.y,
                };
            }
        }
    }

    // -- Teardown --

    fn teardown(&mut self) {
        self.visible = false;
        self.tutorial_visible = false;
        self.world_suppressed = false;
        self.input_enabled = false;
        self.discard_chain();
    }

    fn emit_transition(
        &mut self,
        ctx: &mut PuzzleContext<'_>,
        transition: Option<(PuzzleState, PuzzleState)>,
    ) {
        if let Some((from, to)) = transition {
            ctx.events.emit(Event::StateChanged {
                puzzle: self.id,
                from,
                to,
                tick: ctx.tick,
            });
        }
    }
}

impl Puzzle for WireBoxPuzzle {
    fn state(&self) -> PuzzleState {
        self.state.get()
    }

    /// The closing sequences run to completion once started.
    fn is_busy(&self) -> bool {
        matches!(
            self.phase,
            WirePhase::Completing(_) | WirePhase::Aborting(_)
        )
    }

    /// Activate the puzzle: suppress the configured world objects and run
    /// the opening sequence. Input is enabled only after the chain seeds.
    fn show(&mut self, ctx: &mut PuzzleContext<'_>) {
        let transition = self.state.set(PuzzleState::Active);
        self.emit_transition(ctx, transition);
        self.visible = true;
        self.world_suppressed = true;
        self.input_enabled = false;
        self.tutorial_visible = false;
        self.target_reached = false;
        self.view = ViewPoint::Front;
        self.phase = WirePhase::Opening(OpeningStep::DoorDelay);
        self.pending = Some(self.timers.start(self.config.open_delay));
    }

    /// Close request. While a closing sequence is already running this
    /// fails; during the opening sequence or live building it starts the
    /// abbreviated abort teardown (camera forced back to front first).
    fn hide(&mut self, ctx: &mut PuzzleContext<'_>) -> bool {
        match self.phase {
            WirePhase::Completing(_) | WirePhase::Aborting(_) => false,
            WirePhase::Idle | WirePhase::Complete => {
                self.teardown();
                true
            }
            WirePhase::Opening(_) | WirePhase::Building => {
                if let Some(timer) = self.pending.take() {
                    self.timers.cancel(timer);
                }
                self.input_enabled = false;
                if self.view == ViewPoint::Up || self.view_transition.is_some() {
                    if self.view_transition.is_none() {
                        self.start_view_transition(ViewPoint::Front);
                    }
                    self.pending_view = ViewPoint::Front;
                    self.phase = WirePhase::Aborting(AbortingStep::AwaitView);
                } else {
                    self.begin_abort_door(ctx);
                }
                true
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
