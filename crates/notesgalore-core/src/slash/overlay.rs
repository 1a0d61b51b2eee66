use super::catalog::CommandIcon;
use super::scroll::{ListScroll, MENU_MAX_HEIGHT, MENU_ROW_HEIGHT};
use crate::editor::CaretRect;

pub const MENU_WIDTH: f32 = 288.0;

#[derive(Clone, Debug, PartialEq)]
pub struct MenuRow {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: CommandIcon,
    pub highlighted: bool,
}

/// What the popup shows. An empty row list renders nothing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MenuView {
    pub rows: Vec<MenuRow>,
    pub scroll_top: f32,
}

impl MenuView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.rows.iter().position(|row| row.highlighted)
    }

    pub fn size(&self) -> (f32, f32) {
        if self.rows.is_empty() {
            return (0.0, 0.0);
        }
        (MENU_WIDTH, ListScroll::viewport_height(self.rows.len()))
    }
}

/// Floating surface anchored to the caret. Implemented by the UI shell.
pub trait AnchoredOverlay {
    fn mount(&mut self, view: &MenuView, anchor: CaretRect);
    fn update_content(&mut self, view: &MenuView);
    fn update_anchor(&mut self, anchor: CaretRect);
    fn destroy(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// Top-left corner for a popup placed below the caret, left edges aligned.
/// Flips above the caret when there is no room below, and shifts left to
/// stay inside the viewport.
pub fn place_bottom_start(anchor: CaretRect, size: (f32, f32), viewport: Viewport) -> (f32, f32) {
    let (width, height) = size;
    let below = anchor.bottom();
    let y = if below + height > viewport.height && anchor.top - height >= 0.0 {
        anchor.top - height
    } else {
        below
    };
    let max_x = (viewport.width - width).max(0.0);
    (anchor.left.clamp(0.0, max_x), y)
}

/// Overlay that renders the menu into text lines, for terminals and tests.
#[derive(Clone, Debug)]
pub struct TextOverlay {
    viewport: Viewport,
    anchor: Option<CaretRect>,
    view: MenuView,
    pub mounts: usize,
    pub destroys: usize,
}

impl TextOverlay {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            anchor: None,
            view: MenuView::default(),
            mounts: 0,
            destroys: 0,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn anchor(&self) -> Option<CaretRect> {
        self.anchor
    }

    pub fn view(&self) -> &MenuView {
        &self.view
    }

    pub fn origin(&self) -> Option<(f32, f32)> {
        let anchor = self.anchor?;
        Some(place_bottom_start(anchor, self.view.size(), self.viewport))
    }

    pub fn render_lines(&self) -> Vec<String> {
        if !self.is_mounted() || self.view.is_empty() {
            return Vec::new();
        }
        let max_rows = (MENU_MAX_HEIGHT / MENU_ROW_HEIGHT) as usize;
        let mut first = (self.view.scroll_top / MENU_ROW_HEIGHT) as usize;
        if let Some(highlighted) = self.view.highlighted() {
            if highlighted < first {
                first = highlighted;
            } else if highlighted >= first + max_rows {
                first = highlighted + 1 - max_rows;
            }
        }
        self.view
            .rows
            .iter()
            .skip(first)
            .take(max_rows)
            .map(|row| {
                let marker = if row.highlighted { '>' } else { ' ' };
                format!("{marker} {:<14} {}", row.title, row.description)
            })
            .collect()
    }
}

impl AnchoredOverlay for TextOverlay {
    fn mount(&mut self, view: &MenuView, anchor: CaretRect) {
        self.view = view.clone();
        self.anchor = Some(anchor);
        self.mounts += 1;
    }

    fn update_content(&mut self, view: &MenuView) {
        self.view = view.clone();
    }

    fn update_anchor(&mut self, anchor: CaretRect) {
        if self.anchor.is_some() {
            self.anchor = Some(anchor);
        }
    }

    fn destroy(&mut self) {
        if self.anchor.take().is_some() {
            self.destroys += 1;
        }
        self.view = MenuView::default();
    }
}
