//! # Modal State Machine
//!
//! The add/edit/delete dialogs of every management screen share one
//! lifecycle, modelled here as an explicit two-state machine.
//!
//! ## Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │             open(mode, context)                                         │
//! │  ┌────────┐ ──────────────────────────► ┌────────────────────────┐      │
//! │  │ Closed │                             │ Open { mode, context } │      │
//! │  └────────┘ ◄────────────────────────── └────────────────────────┘      │
//! │             close() / Escape / backdrop      │            ▲             │
//! │             save(f) returning Ok             └────────────┘             │
//! │                                       save(f) returning Err             │
//! │                                       Tab / Shift+Tab (focus trap)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Focus is tracked by element id. The screen supplies the focusable ids of
//! the dialog in tab order; the modal cycles through them and hands back the
//! id to restore when it closes.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ModalError;

// =============================================================================
// Types
// =============================================================================

/// Whether the dialog creates or modifies an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalMode {
    Add,
    Edit,
}

/// Dismissal and focus behaviour. Everything is on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalOptions {
    pub close_on_escape: bool,
    pub close_on_backdrop: bool,
    pub focus_trap: bool,
}

impl Default for ModalOptions {
    fn default() -> Self {
        ModalOptions {
            close_on_escape: true,
            close_on_backdrop: true,
            focus_trap: true,
        }
    }
}

/// Keys the modal reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Tab,
    ShiftTab,
    Other,
}

/// Current state of a modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalState<C> {
    Closed,
    Open { mode: ModalMode, context: C },
}

/// Entry and exit hooks.
pub trait ModalHooks<C> {
    fn on_open(&mut self, _mode: ModalMode, _context: &C) {}
    fn on_close(&mut self) {}
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl<C> ModalHooks<C> for NoHooks {}

// =============================================================================
// Modal
// =============================================================================

/// A dialog carrying a context value `C` while open (e.g. the id of the row
/// being edited).
#[derive(Debug)]
pub struct Modal<C, H = NoHooks> {
    state: ModalState<C>,
    options: ModalOptions,
    hooks: H,
    focusables: Vec<String>,
    focused: Option<usize>,
    previous_focus: Option<String>,
    busy: bool,
}

impl<C> Modal<C, NoHooks> {
    pub fn new(options: ModalOptions) -> Self {
        Modal::with_hooks(options, NoHooks)
    }
}

impl<C> Default for Modal<C, NoHooks> {
    fn default() -> Self {
        Modal::new(ModalOptions::default())
    }
}

impl<C, H: ModalHooks<C>> Modal<C, H> {
    pub fn with_hooks(options: ModalOptions, hooks: H) -> Self {
        Modal {
            state: ModalState::Closed,
            options,
            hooks,
            focusables: Vec::new(),
            focused: None,
            previous_focus: None,
            busy: false,
        }
    }

    /// Sets the dialog's focusable element ids, in tab order.
    ///
    /// Disabled and hidden controls must already be filtered out.
    pub fn set_focusables<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.focusables = ids.into_iter().map(Into::into).collect();
        self.focused = if self.is_open() && !self.focusables.is_empty() {
            Some(0)
        } else {
            None
        };
    }

    /// Opens the dialog.
    ///
    /// `previous_focus` is the element focused before opening; it is handed
    /// back by [`Modal::close`].
    pub fn open(&mut self, mode: ModalMode, context: C, previous_focus: Option<String>) -> Result<(), ModalError> {
        if self.is_open() {
            return Err(ModalError::AlreadyOpen);
        }

        self.previous_focus = previous_focus;
        self.hooks.on_open(mode, &context);
        self.state = ModalState::Open { mode, context };
        self.focused = if self.focusables.is_empty() { None } else { Some(0) };
        self.busy = false;

        info!(?mode, "modal opened");
        Ok(())
    }

    /// Closes the dialog and returns the element id to refocus.
    ///
    /// Closing a closed dialog does nothing and returns `None`.
    pub fn close(&mut self) -> Option<String> {
        if !self.is_open() {
            return None;
        }

        self.state = ModalState::Closed;
        self.focused = None;
        self.busy = false;
        self.hooks.on_close();

        info!("modal closed");
        self.previous_focus.take()
    }

    /// Runs the save callback; closes on success, stays open on failure.
    ///
    /// ## Example
    /// ```rust
    /// use kakeibon_core::modal::{Modal, ModalMode};
    /// use kakeibon_core::CoreError;
    ///
    /// let mut modal: Modal<u32> = Modal::default();
    /// modal.open(ModalMode::Edit, 7, None).unwrap();
    ///
    /// let saved: Result<u32, CoreError> = modal.save(|_, id| Ok(*id));
    /// assert_eq!(saved.unwrap(), 7);
    /// assert!(!modal.is_open());
    /// ```
    pub fn save<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(ModalMode, &C) -> Result<T, E>,
        E: From<ModalError>,
    {
        if self.busy {
            return Err(ModalError::Busy.into());
        }

        let result = match &self.state {
            ModalState::Open { mode, context } => f(*mode, context),
            ModalState::Closed => return Err(ModalError::NotOpen.into()),
        };

        if result.is_ok() {
            self.close();
        }
        result
    }

    /// Handles a key press. Returns `true` when the default action must be
    /// suppressed.
    pub fn handle_key(&mut self, key: Key) -> bool {
        if !self.is_open() {
            return false;
        }

        match key {
            Key::Escape if self.options.close_on_escape => {
                self.close();
                true
            }
            Key::Tab if self.options.focus_trap => self.move_focus(true),
            Key::ShiftTab if self.options.focus_trap => self.move_focus(false),
            _ => false,
        }
    }

    /// A click on the backdrop outside the dialog content.
    pub fn backdrop_click(&mut self) -> bool {
        if self.is_open() && self.options.close_on_backdrop {
            self.close();
            return true;
        }
        false
    }

    /// Records that the user focused `id` (e.g. by clicking it).
    pub fn focus(&mut self, id: &str) {
        if self.is_open() {
            if let Some(index) = self.focusables.iter().position(|f| f == id) {
                self.focused = Some(index);
            }
        }
    }

    /// Moves focus one step, wrapping at either end. Only the wrap needs the
    /// browser's default suppressed.
    fn move_focus(&mut self, forward: bool) -> bool {
        let last = match self.focusables.len() {
            0 => return false,
            n => n - 1,
        };
        let current = self.focused.unwrap_or(0);

        let (next, wrapped) = match (forward, current) {
            (true, c) if c >= last => (0, true),
            (true, c) => (c + 1, false),
            (false, 0) => (last, true),
            (false, c) => (c - 1, false),
        };

        self.focused = Some(next);
        wrapped
    }

    /// Disables saving while a save request is in flight.
    pub fn show_loading(&mut self) {
        self.busy = true;
    }

    pub fn hide_loading(&mut self) {
        self.busy = false;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open { .. })
    }

    pub fn state(&self) -> &ModalState<C> {
        &self.state
    }

    pub fn mode(&self) -> Option<ModalMode> {
        match &self.state {
            ModalState::Open { mode, .. } => Some(*mode),
            ModalState::Closed => None,
        }
    }

    pub fn context(&self) -> Option<&C> {
        match &self.state {
            ModalState::Open { context, .. } => Some(context),
            ModalState::Closed => None,
        }
    }

    pub fn context_mut(&mut self) -> Option<&mut C> {
        match &mut self.state {
            ModalState::Open { context, .. } => Some(context),
            ModalState::Closed => None,
        }
    }

    /// Id of the element currently focused inside the dialog.
    pub fn focused(&self) -> Option<&str> {
        self.focused
            .and_then(|i| self.focusables.get(i))
            .map(String::as_str)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
