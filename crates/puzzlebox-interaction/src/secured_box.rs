//! Secured box: a locked container gated by a code lock.
//!
//! Demonstrates the one-way completion edge: when the composed lock
//! reaches Complete, the box persists its unlocked flag, applies its
//! one-shot grants (hidden item, note -- each gated by its own taken
//! flag), hides the lock visual, and permanently disables interaction.
//! `load_state` reconstructs the same enabled/disabled outcome purely from
//! the persisted variables without re-running any grant.

use crate::code_lock::CodeLock;
use crate::{Interaction, PlayerState};
use puzzlebox_core::context::PuzzleContext;
use puzzlebox_core::fixed::{seconds_to_ticks, Ticks};
use puzzlebox_core::id::{ItemTypeId, NoteId, PuzzleId};
use puzzlebox_core::state::{Puzzle, PuzzleState};
use puzzlebox_core::vars::{taken_key, unlocked_key, VarStore};

/// Static configuration for a secured box.
#[derive(Debug, Clone)]
pub struct SecuredBoxConfig {
    /// The box item's name; the unlocked flag is keyed on it.
    pub item_name: String,
    pub overview_info: String,
    pub safe_code: String,
    /// Item granted once on unlock, if any.
    pub hidden_item: Option<ItemTypeId>,
    /// Note granted once on unlock, if any.
    pub note: Option<NoteId>,
}

/// A locked box in the world, opened through its code lock.
pub struct SecuredBoxInteraction {
    config: SecuredBoxConfig,
    code_lock: CodeLock,
    interactable: bool,
    /// Whether the lock visual on the box should render.
    secured_view_visible: bool,
    /// Whether the box's highlight outline should render.
    outline_visible: bool,
    /// Remaining ticks before the lock UI opens after an interact.
    show_delay: Option<Ticks>,
}

impl std::fmt::Debug for SecuredBoxInteraction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecuredBoxInteraction")
            .field("item_name", &self.config.item_name)
            .field("interactable", &self.interactable)
            .field("secured_view_visible", &self.secured_view_visible)
            .field("lock_state", &self.code_lock.state())
            .finish_non_exhaustive()
    }
}

impl SecuredBoxInteraction {
    pub fn new(config: SecuredBoxConfig, lock_id: PuzzleId) -> Self {
        Self {
            config,
            code_lock: CodeLock::new(lock_id),
            interactable: true,
            secured_view_visible: true,
            outline_visible: true,
            show_delay: None,
        }
    }

    pub fn code_lock(&self) -> &CodeLock {
        &self.code_lock
    }

    pub fn is_secured_view_visible(&self) -> bool {
        self.secured_view_visible
    }

    pub fn is_outline_visible(&self) -> bool {
        self.outline_visible
    }

    /// Advance the pending open delay, if an interact is in flight.
    pub fn tick(&mut self, ctx: &mut PuzzleContext<'_>) {
        let Some(remaining) = &mut self.show_delay else {
            return;
        };
        *remaining = remaining.saturating_sub(1);
        if *remaining > 0 {
            return;
        }
        self.show_delay = None;
        self.outline_visible = false;
        self.code_lock.set_password(&self.config.safe_code);
        self.code_lock.show(ctx);
    }

    pub fn push_digit(&mut self, digit: char) {
        self.code_lock.push_digit(digit);
    }

    /// Submit the current lock entry. On the lock's transition to Complete
    /// the box applies its unlock side effects.
    pub fn submit_code(&mut self, ctx: &mut PuzzleContext<'_>) -> bool {
        if !self.code_lock.submit(ctx) {
            return false;
        }
        self.handle_unlocked(ctx);
        true
    }

    /// Close the lock UI without solving it; the box highlight returns.
    pub fn cancel_lock(&mut self, ctx: &mut PuzzleContext<'_>) {
        self.code_lock.hide(ctx);
        if self.code_lock.state() != PuzzleState::Complete {
            self.outline_visible = true;
        }
    }

    fn handle_unlocked(&mut self, ctx: &mut PuzzleContext<'_>) {
        // The unlocked flag is persisted first; the grants below read
        // their own flags against the already-updated store.
        let key = unlocked_key(&self.config.item_name);
        ctx.set_var(&key, "true", true);

        if let Some(item) = self.config.hidden_item
            && let Some(def) = ctx.registry.get_item(item)
        {
            let key = taken_key(&def.name);
            if !ctx.vars.flag(&key) {
                ctx.set_var(&key, "true", true);
                ctx.grant_item(item);
            }
        }

        if let Some(note) = self.config.note
            && let Some(def) = ctx.registry.get_note(note)
        {
            let key = taken_key(&def.name);
            if !ctx.vars.flag(&key) {
                ctx.set_var(&key, "true", true);
                ctx.add_note(note);
            }
        }

        self.secured_view_visible = false;
        self.interactable = false;
    }
}

impl Interaction for SecuredBoxInteraction {
    fn required_state(&self) -> PlayerState {
        PlayerState::Interact
    }

    fn interactable(&self) -> bool {
        self.interactable
    }

    /// Start opening the lock UI: after a short delay the highlight drops
    /// and the lock shows with this box's combination loaded.
    fn interact(&mut self, _ctx: &mut PuzzleContext<'_>) {
        if !self.interactable || self.show_delay.is_some() {
            return;
        }
        self.show_delay = Some(seconds_to_ticks(0.5));
    }

    fn load_state(&mut self, vars: &VarStore) {
        if let Some(value) = vars.get(&unlocked_key(&self.config.item_name)) {
            self.interactable = value != "true";
        }
        self.secured_view_visible = self.interactable;
    }

    fn overview_info(&self) -> &str {
        &self.config.overview_info
    }
}

// ===========================================================================
// Tests
// ===========================================================================
