use super::catalog::{matching_indices, CommandCatalogEntry, CommandContext};
use super::keys::{cycle_index, Key, KeyCapture, KeyOutcome, KeyRouter};
use super::overlay::{AnchoredOverlay, MenuRow, MenuView};
use super::query::{find_slash_query, TRIGGER_CHAR};
use super::scroll::ListScroll;
use crate::editor::{EditorSession, TextRange};

pub const KEY_CAPTURE_OWNER: &str = "slash-menu";

/// Where a trigger was typed: the uid of its block and its byte offset there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriggerKey {
    pub block: String,
    pub slash_index: usize,
}

impl TriggerKey {
    pub fn new(block: impl Into<String>, slash_index: usize) -> Self {
        Self {
            block: block.into(),
            slash_index,
        }
    }
}

struct OpenMenu {
    trigger: TriggerKey,
    query: String,
    matches: Vec<usize>,
    highlighted: Option<usize>,
    scroll: ListScroll,
    _capture: KeyCapture,
}

impl OpenMenu {
    fn trigger_range(&self) -> TextRange {
        let from = self.trigger.slash_index;
        TextRange::new(from, from + TRIGGER_CHAR.len_utf8() + self.query.len())
    }

    fn set_matches(&mut self, matches: Vec<usize>) {
        self.highlighted = if matches.is_empty() { None } else { Some(0) };
        self.matches = matches;
        self.scroll.reset();
        if let Some(ix) = self.highlighted {
            self.scroll.reveal(ix, self.matches.len());
        }
    }

    fn view(&self, catalog: &[CommandCatalogEntry]) -> MenuView {
        let rows = self
            .matches
            .iter()
            .enumerate()
            .map(|(position, &ix)| {
                let entry = &catalog[ix];
                MenuRow {
                    id: entry.id,
                    title: entry.title,
                    description: entry.description,
                    icon: entry.icon,
                    highlighted: self.highlighted == Some(position),
                }
            })
            .collect();
        MenuView {
            rows,
            scroll_top: self.scroll.scroll_top,
        }
    }
}

/// Slash-command popup: Closed until a trigger is typed, Open while the
/// user filters and navigates, Closed again on confirm, Escape or cancel.
pub struct SlashMenu<O: AnchoredOverlay> {
    catalog: &'static [CommandCatalogEntry],
    overlay: O,
    router: KeyRouter,
    state: Option<OpenMenu>,
    dismissed: Option<TriggerKey>,
}

impl<O: AnchoredOverlay> SlashMenu<O> {
    pub fn new(catalog: &'static [CommandCatalogEntry], overlay: O, router: KeyRouter) -> Self {
        Self {
            catalog,
            overlay,
            router,
            state: None,
            dismissed: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.is_some()
    }

    pub fn query(&self) -> Option<&str> {
        self.state.as_ref().map(|state| state.query.as_str())
    }

    pub fn slash_index(&self) -> Option<usize> {
        self.state.as_ref().map(|state| state.trigger.slash_index)
    }

    pub fn trigger(&self) -> Option<&TriggerKey> {
        self.state.as_ref().map(|state| &state.trigger)
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.state.as_ref().and_then(|state| state.highlighted)
    }

    pub fn trigger_range(&self) -> Option<TextRange> {
        self.state.as_ref().map(OpenMenu::trigger_range)
    }

    pub fn matches(&self) -> Vec<&'static CommandCatalogEntry> {
        let catalog = self.catalog;
        self.state
            .as_ref()
            .map(|state| state.matches.iter().map(|&ix| &catalog[ix]).collect())
            .unwrap_or_default()
    }

    pub fn scroll_top(&self) -> Option<f32> {
        self.state.as_ref().map(|state| state.scroll.scroll_top)
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    /// Opens for a freshly typed trigger. Stays closed when the session
    /// cannot report a caret rectangle.
    pub fn open(&mut self, trigger: TriggerKey, session: &dyn EditorSession) -> bool {
        if self.is_open() {
            self.close();
        }
        let Some(anchor) = session.caret_rect() else {
            tracing::debug!(
                block = %trigger.block,
                slash_index = trigger.slash_index,
                "slash menu not opened: no caret"
            );
            return false;
        };

        tracing::debug!(
            block = %trigger.block,
            slash_index = trigger.slash_index,
            "slash menu opened"
        );
        let mut state = OpenMenu {
            trigger,
            query: String::new(),
            matches: Vec::new(),
            highlighted: None,
            scroll: ListScroll::default(),
            _capture: self.router.capture(KEY_CAPTURE_OWNER),
        };
        state.set_matches(matching_indices("", self.catalog));
        self.overlay.mount(&state.view(self.catalog), anchor);
        self.state = Some(state);
        true
    }

    pub fn update_query(&mut self, query: &str, session: &dyn EditorSession) {
        if !self.is_open() {
            return;
        }
        let Some(anchor) = session.caret_rect() else {
            tracing::debug!("slash menu closed: caret lost during update");
            self.close();
            return;
        };
        let catalog = self.catalog;
        let Some(state) = self.state.as_mut() else {
            return;
        };
        state.query = query.to_string();
        state.set_matches(matching_indices(query, catalog));
        let view = state.view(catalog);
        self.overlay.update_content(&view);
        self.overlay.update_anchor(anchor);
    }

    /// Reconciles the menu with the cursor's block after an edit or cursor
    /// move: opens on a fresh trigger, follows the query while typing, closes
    /// once the cursor leaves the trigger. A trigger dismissed with Escape
    /// stays closed until the cursor leaves it.
    pub fn sync_with_text(
        &mut self,
        block: &str,
        text: &str,
        cursor: usize,
        session: &dyn EditorSession,
    ) {
        let found = find_slash_query(text, cursor);
        let key = found
            .as_ref()
            .map(|found| TriggerKey::new(block, found.slash_index));
        if key != self.dismissed {
            self.dismissed = None;
        }
        if self.dismissed.is_some() {
            return;
        }
        let (Some(found), Some(key)) = (found, key) else {
            if self.is_open() {
                tracing::debug!("slash menu cancelled: cursor left trigger");
                self.close();
            }
            return;
        };
        if self.trigger() != Some(&key) && !self.open(key, session) {
            return;
        }
        self.update_query(&found.query, session);
    }

    pub fn handle_key(&mut self, key: Key, ctx: &mut CommandContext<'_>) -> KeyOutcome {
        let Some(state) = self.state.as_mut() else {
            return KeyOutcome::Ignored;
        };
        let count = state.matches.len();
        match key {
            Key::Escape => {
                self.dismissed = Some(state.trigger.clone());
                self.close();
                KeyOutcome::Consumed
            }
            Key::ArrowDown | Key::ArrowUp if count > 0 => {
                let current = state.highlighted.unwrap_or(0);
                let next = cycle_index(current, count, key == Key::ArrowDown);
                state.highlighted = Some(next);
                state.scroll.reveal(next, count);
                let view = state.view(self.catalog);
                self.overlay.update_content(&view);
                KeyOutcome::Consumed
            }
            Key::Enter if count > 0 => {
                self.confirm(ctx);
                KeyOutcome::Consumed
            }
            _ => KeyOutcome::Ignored,
        }
    }

    /// Mouse selection of a visible row.
    pub fn select(&mut self, position: usize, ctx: &mut CommandContext<'_>) -> bool {
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        if position >= state.matches.len() {
            return false;
        }
        state.highlighted = Some(position);
        self.confirm(ctx)
    }

    /// Runs the highlighted command over the trigger range and closes.
    /// Returns whether a command ran.
    pub fn confirm(&mut self, ctx: &mut CommandContext<'_>) -> bool {
        let Some(state) = self.state.as_ref() else {
            return false;
        };
        let Some(position) = state.highlighted else {
            return false;
        };
        if ctx.editor.caret_rect().is_none() {
            tracing::debug!("slash menu closed without running: caret lost");
            self.close();
            return false;
        }
        let entry = &self.catalog[state.matches[position]];
        let range = state.trigger_range();
        tracing::debug!(command = entry.id, from = range.from, to = range.to, "running slash command");
        entry.action.run(ctx, range);
        self.close();
        true
    }

    /// External cancellation, e.g. the editor lost focus.
    pub fn cancel(&mut self) {
        if self.is_open() {
            tracing::debug!("slash menu cancelled");
        }
        self.close();
    }

    /// Idempotent. Destroys the overlay and releases the key capture.
    pub fn close(&mut self) {
        if let Some(state) = self.state.take() {
            self.overlay.destroy();
            drop(state);
            tracing::debug!("slash menu closed");
        }
    }
}

impl<O: AnchoredOverlay> Drop for SlashMenu<O> {
    fn drop(&mut self) {
        self.close();
    }
}
