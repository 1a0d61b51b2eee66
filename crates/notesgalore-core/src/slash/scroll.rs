pub const MENU_MAX_HEIGHT: f32 = 330.0;
pub const MENU_ROW_HEIGHT: f32 = 48.0;
pub const MENU_PADDING_Y: f32 = 8.0;
pub const SCROLL_MARGIN: f32 = 5.0;

/// Scroll offset that brings the item fully into the visible window, moving
/// by the deficit plus [`SCROLL_MARGIN`]. Unchanged when already visible.
pub fn scroll_into_view(
    scroll_top: f32,
    viewport_height: f32,
    item_top: f32,
    item_height: f32,
) -> f32 {
    let item_bottom = item_top + item_height;
    if item_top < scroll_top {
        scroll_top - (scroll_top - item_top + SCROLL_MARGIN)
    } else if item_bottom > viewport_height + scroll_top {
        scroll_top + (item_bottom - viewport_height - scroll_top + SCROLL_MARGIN)
    } else {
        scroll_top
    }
}

/// Scroll state of the popup's fixed-height row list.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ListScroll {
    pub scroll_top: f32,
}

impl ListScroll {
    pub fn content_height(count: usize) -> f32 {
        if count == 0 {
            return 0.0;
        }
        count as f32 * MENU_ROW_HEIGHT + 2.0 * MENU_PADDING_Y
    }

    pub fn viewport_height(count: usize) -> f32 {
        Self::content_height(count).min(MENU_MAX_HEIGHT)
    }

    pub fn row_top(index: usize) -> f32 {
        MENU_PADDING_Y + index as f32 * MENU_ROW_HEIGHT
    }

    pub fn reset(&mut self) {
        self.scroll_top = 0.0;
    }

    pub fn reveal(&mut self, index: usize, count: usize) {
        if index >= count {
            return;
        }
        let viewport = Self::viewport_height(count);
        let next = scroll_into_view(
            self.scroll_top,
            viewport,
            Self::row_top(index),
            MENU_ROW_HEIGHT,
        );
        let max_scroll = (Self::content_height(count) - viewport).max(0.0);
        self.scroll_top = next.clamp(0.0, max_scroll);
    }

    pub fn is_row_visible(&self, index: usize, count: usize) -> bool {
        let top = Self::row_top(index);
        let bottom = top + MENU_ROW_HEIGHT;
        top >= self.scroll_top && bottom <= self.scroll_top + Self::viewport_height(count)
    }
}
