pub mod catalog;
pub mod host;
pub mod keys;
pub mod menu;
pub mod overlay;
pub mod query;
pub mod scroll;

pub use catalog::{
    filter_slash_commands, CommandCatalogEntry, CommandContext, CommandIcon, LinkOpener,
    SlashAction, SLASH_COMMANDS,
};
pub use host::{EditorHost, Services};
pub use keys::{parse_key_script, Key, KeyCapture, KeyOutcome, KeyRouter};
pub use menu::{SlashMenu, TriggerKey};
pub use overlay::{AnchoredOverlay, MenuView, TextOverlay, Viewport};
pub use query::{find_slash_query, SlashQuery};
