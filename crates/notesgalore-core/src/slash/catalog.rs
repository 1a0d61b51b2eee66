use crate::blocks::BlockType;
use crate::editor::{EditorSession, TextRange};
use crate::upload::{self, ImagePicker, ImageUploader};

pub const FEEDBACK_HREF: &str = "/feedback";

pub trait LinkOpener {
    fn open_in_new_tab(&mut self, href: &str);
}

/// Everything a slash command may touch when it runs.
pub struct CommandContext<'a> {
    pub editor: &'a mut dyn EditorSession,
    pub links: &'a mut dyn LinkOpener,
    pub picker: &'a mut dyn ImagePicker,
    pub uploader: &'a mut dyn ImageUploader,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandIcon {
    MessageSquarePlus,
    Text,
    CheckSquare,
    Heading1,
    Heading2,
    Heading3,
    List,
    ListOrdered,
    TextQuote,
    Code,
    Image,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlashAction {
    OpenInNewTab(&'static str),
    SetBlockType(BlockType),
    ToggleBlockType(BlockType),
    UploadImage,
}

impl SlashAction {
    /// Replaces `range` (the trigger plus the typed query) with the command's
    /// own effect.
    pub fn run(self, ctx: &mut CommandContext<'_>, range: TextRange) {
        ctx.editor.delete_range(range);
        let at = TextRange::caret(range.from);
        match self {
            SlashAction::OpenInNewTab(href) => ctx.links.open_in_new_tab(href),
            SlashAction::SetBlockType(block_type) => ctx.editor.set_block_type(at, block_type),
            SlashAction::ToggleBlockType(block_type) => {
                ctx.editor.toggle_block_type(at, block_type)
            }
            SlashAction::UploadImage => {
                upload::begin_image_upload(ctx.picker, ctx.uploader, ctx.editor);
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandCatalogEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: CommandIcon,
    pub search_terms: &'static [&'static str],
    pub action: SlashAction,
}

pub const SLASH_COMMANDS: &[CommandCatalogEntry] = &[
    CommandCatalogEntry {
        id: "feedback",
        title: "Send Feedback",
        description: "Let us know how we can improve.",
        icon: CommandIcon::MessageSquarePlus,
        search_terms: &[],
        action: SlashAction::OpenInNewTab(FEEDBACK_HREF),
    },
    CommandCatalogEntry {
        id: "text",
        title: "Text",
        description: "Just start typing with plain text.",
        icon: CommandIcon::Text,
        search_terms: &["p", "paragraph"],
        action: SlashAction::SetBlockType(BlockType::Paragraph),
    },
    CommandCatalogEntry {
        id: "todo",
        title: "To-do List",
        description: "Track tasks with a to-do list.",
        icon: CommandIcon::CheckSquare,
        search_terms: &["todo", "task", "list", "check", "checkbox"],
        action: SlashAction::ToggleBlockType(BlockType::TodoList),
    },
    CommandCatalogEntry {
        id: "h1",
        title: "Heading 1",
        description: "Big section heading.",
        icon: CommandIcon::Heading1,
        search_terms: &["title", "big", "large"],
        action: SlashAction::SetBlockType(BlockType::Heading1),
    },
    CommandCatalogEntry {
        id: "h2",
        title: "Heading 2",
        description: "Medium section heading.",
        icon: CommandIcon::Heading2,
        search_terms: &["subtitle", "medium"],
        action: SlashAction::SetBlockType(BlockType::Heading2),
    },
    CommandCatalogEntry {
        id: "h3",
        title: "Heading 3",
        description: "Small section heading.",
        icon: CommandIcon::Heading3,
        search_terms: &["subtitle", "small"],
        action: SlashAction::SetBlockType(BlockType::Heading3),
    },
    CommandCatalogEntry {
        id: "bullet",
        title: "Bullet List",
        description: "Create a simple bullet list.",
        icon: CommandIcon::List,
        search_terms: &["unordered", "point"],
        action: SlashAction::ToggleBlockType(BlockType::BulletList),
    },
    CommandCatalogEntry {
        id: "numbered",
        title: "Numbered List",
        description: "Create a list with numbering.",
        icon: CommandIcon::ListOrdered,
        search_terms: &["ordered"],
        action: SlashAction::ToggleBlockType(BlockType::NumberedList),
    },
    CommandCatalogEntry {
        id: "quote",
        title: "Quote",
        description: "Capture a quote.",
        icon: CommandIcon::TextQuote,
        search_terms: &["blockquote"],
        action: SlashAction::ToggleBlockType(BlockType::Quote),
    },
    CommandCatalogEntry {
        id: "code",
        title: "Code",
        description: "Capture a code snippet.",
        icon: CommandIcon::Code,
        search_terms: &["codeblock"],
        action: SlashAction::ToggleBlockType(BlockType::Code),
    },
    CommandCatalogEntry {
        id: "image",
        title: "Image",
        description: "Upload an image from your computer.",
        icon: CommandIcon::Image,
        search_terms: &["photo", "picture", "media"],
        action: SlashAction::UploadImage,
    },
];

/// Title-only, case-insensitive substring match in catalog order.
/// `search_terms` are not consulted.
pub fn filter_slash_commands<'a>(
    query: &str,
    commands: &'a [CommandCatalogEntry],
) -> Vec<&'a CommandCatalogEntry> {
    matching_indices(query, commands)
        .into_iter()
        .map(|ix| &commands[ix])
        .collect()
}

pub(crate) fn matching_indices(query: &str, commands: &[CommandCatalogEntry]) -> Vec<usize> {
    if query.is_empty() {
        return (0..commands.len()).collect();
    }
    let needle = query.to_lowercase();
    commands
        .iter()
        .enumerate()
        .filter(|(_, cmd)| cmd.title.to_lowercase().contains(&needle))
        .map(|(ix, _)| ix)
        .collect()
}
