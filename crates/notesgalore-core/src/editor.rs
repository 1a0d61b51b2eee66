use crate::blocks::BlockType;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const LINE_HEIGHT: f32 = 24.0;
pub const CHAR_WIDTH: f32 = 8.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextRange {
    pub from: usize,
    pub to: usize,
}

impl TextRange {
    pub fn new(from: usize, to: usize) -> Self {
        if from <= to {
            Self { from, to }
        } else {
            Self { from: to, to: from }
        }
    }

    pub fn caret(pos: usize) -> Self {
        Self { from: pos, to: pos }
    }

    pub fn len(&self) -> usize {
        self.to - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }
}

/// Screen-space bounding box of the text cursor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaretRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl CaretRect {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Capabilities the slash menu needs from the document being edited.
///
/// Positions are byte offsets into the text of the block holding the cursor.
pub trait EditorSession {
    /// `None` once the session has been torn down.
    fn caret_rect(&self) -> Option<CaretRect>;
    fn selection_from(&self) -> usize;
    fn delete_range(&mut self, range: TextRange);
    fn set_block_type(&mut self, range: TextRange, block_type: BlockType);
    fn toggle_block_type(&mut self, range: TextRange, block_type: BlockType);
    fn insert_content(&mut self, range: TextRange, content: &str);
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub uid: String,
    pub text: String,
    pub block_type: BlockType,
}

impl Block {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            uid: Uuid::new_v4().to_string(),
            text: text.into(),
            block_type: BlockType::Paragraph,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    pub block_ix: usize,
    pub offset: usize,
}

/// Plain block list with a single cursor. Lays text out on a fixed grid so
/// the caret rectangle is predictable.
///
/// Never empty, and the cursor always sits on a char boundary of the active
/// block.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockDocument {
    blocks: Vec<Block>,
    active_ix: usize,
    cursor: usize,
    origin: (f32, f32),
    detached: bool,
}

impl BlockDocument {
    pub fn new(blocks: Vec<Block>) -> Self {
        let mut doc = Self {
            blocks,
            active_ix: 0,
            cursor: 0,
            origin: (0.0, 0.0),
            detached: false,
        };
        doc.ensure_non_empty();
        doc
    }

    pub fn with_origin(mut self, left: f32, top: f32) -> Self {
        self.origin = (left, top);
        self
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn active_ix(&self) -> usize {
        self.active_ix
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn ensure_non_empty(&mut self) {
        if self.blocks.is_empty() {
            self.blocks.push(Block::new(""));
        }
        if self.active_ix >= self.blocks.len() {
            self.active_ix = self.blocks.len() - 1;
        }
        self.cursor = clamp_to_boundary(&self.active().text, self.cursor);
    }

    pub fn active(&self) -> &Block {
        &self.blocks[self.active_ix]
    }

    fn active_mut(&mut self) -> &mut Block {
        &mut self.blocks[self.active_ix]
    }

    pub fn set_active_ix(&mut self, ix: usize) {
        self.active_ix = ix.min(self.blocks.len().saturating_sub(1));
        self.cursor = self.active().text.len();
    }

    pub fn set_cursor(&mut self, offset: usize) {
        self.cursor = clamp_to_boundary(&self.active().text, offset);
    }

    pub fn position(&self) -> Cursor {
        Cursor {
            block_ix: self.active_ix,
            offset: self.cursor,
        }
    }

    pub fn type_text(&mut self, text: &str) {
        let cursor = clamp_to_boundary(&self.active().text, self.cursor);
        self.active_mut().text.insert_str(cursor, text);
        self.cursor = cursor + text.len();
    }

    pub fn backspace(&mut self) -> bool {
        let text = &self.active().text;
        let Some((start, _)) = text[..self.cursor].char_indices().next_back() else {
            return false;
        };
        let end = self.cursor;
        self.active_mut().text.replace_range(start..end, "");
        self.cursor = start;
        true
    }

    pub fn split_active_and_insert_after(&mut self) -> Cursor {
        let text = self.active().text.clone();
        let cursor = clamp_to_boundary(&text, self.cursor);
        let before = text[..cursor].to_string();
        let after = text[cursor..].to_string();
        let block_type = self.active().block_type;

        self.active_mut().text = before;
        let insert_ix = self.active_ix + 1;
        let mut next = Block::new(after);
        if block_type.is_list() {
            next.block_type = block_type;
        }
        self.blocks.insert(insert_ix, next);
        self.active_ix = insert_ix;
        self.cursor = 0;
        self.position()
    }

    /// Simulates the host discarding the editor mid-interaction.
    pub fn detach(&mut self) {
        self.detached = true;
    }

    fn clamp_range(&self, range: TextRange) -> TextRange {
        let text = &self.active().text;
        TextRange::new(
            clamp_to_boundary(text, range.from),
            clamp_to_boundary(text, range.to),
        )
    }
}

impl EditorSession for BlockDocument {
    fn caret_rect(&self) -> Option<CaretRect> {
        if self.detached {
            return None;
        }
        let column = self.active().text[..self.cursor].chars().count() as f32;
        Some(CaretRect {
            left: self.origin.0 + column * CHAR_WIDTH,
            top: self.origin.1 + self.active_ix as f32 * LINE_HEIGHT,
            width: 1.0,
            height: LINE_HEIGHT,
        })
    }

    fn selection_from(&self) -> usize {
        self.cursor
    }

    fn delete_range(&mut self, range: TextRange) {
        let range = self.clamp_range(range);
        if range.is_empty() {
            return;
        }
        self.active_mut().text.replace_range(range.from..range.to, "");
        if self.cursor >= range.to {
            self.cursor -= range.len();
        } else if self.cursor > range.from {
            self.cursor = range.from;
        }
    }

    fn set_block_type(&mut self, _range: TextRange, block_type: BlockType) {
        self.active_mut().block_type = block_type;
    }

    fn toggle_block_type(&mut self, _range: TextRange, block_type: BlockType) {
        let current = self.active().block_type;
        self.active_mut().block_type = current.toggled(block_type);
    }

    fn insert_content(&mut self, range: TextRange, content: &str) {
        let range = self.clamp_range(range);
        self.active_mut()
            .text
            .replace_range(range.from..range.to, content);
        self.cursor = range.from + content.len();
    }
}

fn clamp_to_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while offset > 0 && !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::{Block, BlockDocument, CaretRect, EditorSession, TextRange, CHAR_WIDTH, LINE_HEIGHT};
    use crate::blocks::BlockType;

    fn doc(texts: &[&str]) -> BlockDocument {
        BlockDocument::new(texts.iter().map(|text| Block::new(*text)).collect())
    }

    #[test]
    fn new_document_is_never_empty() {
        let model = BlockDocument::new(Vec::new());
        assert_eq!(model.blocks.len(), 1);
        assert_eq!(model.active().text, "");
    }

    #[test]
    fn delete_range_moves_cursor_back() {
        let mut model = doc(&["hello /head world"]);
        model.set_cursor(11);
        model.delete_range(TextRange::new(6, 11));
        assert_eq!(model.active().text, "hello  world");
        assert_eq!(model.cursor, 6);
    }

    #[test]
    fn delete_range_clamps_to_char_boundaries() {
        let mut model = doc(&["é/x"]);
        model.set_cursor(4);
        model.delete_range(TextRange::new(1, 40));
        assert_eq!(model.active().text, "");
        assert_eq!(model.cursor, 0);
    }

    #[test]
    fn insert_content_replaces_range_and_places_cursor_after() {
        let mut model = doc(&["ab"]);
        model.insert_content(TextRange::new(1, 2), "XYZ");
        assert_eq!(model.active().text, "aXYZ");
        assert_eq!(model.cursor, 4);
    }

    #[test]
    fn toggle_block_type_flips_back_to_paragraph() {
        let mut model = doc(&["task"]);
        let range = TextRange::caret(0);
        model.toggle_block_type(range, BlockType::TodoList);
        assert_eq!(model.active().block_type, BlockType::TodoList);
        model.toggle_block_type(range, BlockType::TodoList);
        assert_eq!(model.active().block_type, BlockType::Paragraph);
    }

    #[test]
    fn caret_rect_follows_cursor_and_block() {
        let mut model = doc(&["one", "two"]).with_origin(10.0, 20.0);
        model.set_active_ix(1);
        model.set_cursor(2);
        assert_eq!(
            model.caret_rect(),
            Some(CaretRect {
                left: 10.0 + 2.0 * CHAR_WIDTH,
                top: 20.0 + LINE_HEIGHT,
                width: 1.0,
                height: LINE_HEIGHT,
            })
        );
    }

    #[test]
    fn detached_document_has_no_caret() {
        let mut model = doc(&["x"]);
        model.detach();
        assert!(model.caret_rect().is_none());
    }

    #[test]
    fn split_keeps_list_type_for_next_block() {
        let mut model = doc(&["first"]);
        model.active_mut().block_type = BlockType::BulletList;
        model.set_cursor(5);
        let cursor = model.split_active_and_insert_after();
        assert_eq!(cursor.block_ix, 1);
        assert_eq!(model.blocks[1].block_type, BlockType::BulletList);
        assert_eq!(model.blocks[1].text, "");
    }

    #[test]
    fn cursor_never_lands_inside_a_char() {
        let mut model = doc(&["é", "abc"]);
        model.set_cursor(1);
        assert_eq!(model.cursor(), 0);
        model.set_cursor(99);
        assert_eq!(model.cursor(), 2);
        assert!(model.caret_rect().is_some());
        model.set_active_ix(7);
        assert_eq!(model.active_ix(), 1);
        assert_eq!(model.cursor(), 3);
    }

    #[test]
    fn backspace_removes_previous_char() {
        let mut model = doc(&["añ"]);
        model.set_cursor(3);
        assert!(model.backspace());
        assert_eq!(model.active().text, "a");
        model.set_cursor(0);
        assert!(!model.backspace());
    }
}
