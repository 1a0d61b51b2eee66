use std::cell::RefCell;
use std::rc::{Rc, Weak};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
    Backspace,
    Char(char),
}

impl Key {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "Up" => Some(Key::ArrowUp),
            "Down" => Some(Key::ArrowDown),
            "Enter" => Some(Key::Enter),
            "Esc" => Some(Key::Escape),
            "Backspace" => Some(Key::Backspace),
            "lt" => Some(Key::Char('<')),
            _ => None,
        }
    }
}

/// Parses a key script such as `/head<Down><Enter>`. Named keys are written
/// in angle brackets; `<lt>` types a literal `<`.
pub fn parse_key_script(script: &str) -> Result<Vec<Key>, String> {
    let mut keys = Vec::new();
    let mut rest = script;
    while let Some(ch) = rest.chars().next() {
        if ch == '<' {
            let end = rest
                .find('>')
                .ok_or_else(|| format!("Unterminated key name in {rest:?}"))?;
            let name = &rest[1..end];
            let key = Key::from_name(name).ok_or_else(|| format!("Unknown key <{name}>"))?;
            keys.push(key);
            rest = &rest[end + 1..];
        } else {
            keys.push(Key::Char(ch));
            rest = &rest[ch.len_utf8()..];
        }
    }
    Ok(keys)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Default handling is suppressed and the editor never sees the key.
    Consumed,
    Ignored,
}

impl KeyOutcome {
    pub fn is_consumed(&self) -> bool {
        matches!(self, KeyOutcome::Consumed)
    }
}

#[derive(Debug, Default)]
struct RouterState {
    next_id: u64,
    captures: Vec<(u64, &'static str)>,
}

/// Tracks which components currently want key-down events ahead of the
/// editor. Registrations are held by [`KeyCapture`] guards.
#[derive(Clone, Debug, Default)]
pub struct KeyRouter {
    state: Rc<RefCell<RouterState>>,
}

impl KeyRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capture(&self, owner: &'static str) -> KeyCapture {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = state.next_id;
        state.captures.push((id, owner));
        tracing::trace!(owner, id, "key capture acquired");
        KeyCapture {
            id,
            state: Rc::downgrade(&self.state),
        }
    }

    pub fn is_captured(&self) -> bool {
        !self.state.borrow().captures.is_empty()
    }

    pub fn is_captured_by(&self, owner: &str) -> bool {
        self.state
            .borrow()
            .captures
            .iter()
            .any(|(_, existing)| *existing == owner)
    }

    pub fn active_captures(&self) -> usize {
        self.state.borrow().captures.len()
    }
}

/// Releases its registration when dropped.
#[derive(Debug)]
pub struct KeyCapture {
    id: u64,
    state: Weak<RefCell<RouterState>>,
}

impl Drop for KeyCapture {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            let mut state = state.borrow_mut();
            state.captures.retain(|(id, _)| *id != self.id);
            tracing::trace!(id = self.id, "key capture released");
        }
    }
}

pub(crate) fn cycle_index(current: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (current + 1) % len
    } else {
        (current + len - 1) % len
    }
}
