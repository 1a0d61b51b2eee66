use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    #[default]
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    TodoList,
    BulletList,
    NumberedList,
    Quote,
    Code,
    Image,
}

impl BlockType {
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            BlockType::TodoList | BlockType::BulletList | BlockType::NumberedList
        )
    }

    pub fn heading(level: u8) -> Option<Self> {
        match level {
            1 => Some(BlockType::Heading1),
            2 => Some(BlockType::Heading2),
            3 => Some(BlockType::Heading3),
            _ => None,
        }
    }

    /// Result of toggling `self` towards `target`: toggling a block into the
    /// type it already has turns it back into a paragraph.
    pub fn toggled(self, target: BlockType) -> BlockType {
        if self == target {
            BlockType::Paragraph
        } else {
            target
        }
    }
}
