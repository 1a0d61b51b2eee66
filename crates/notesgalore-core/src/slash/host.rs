use super::catalog::{CommandContext, LinkOpener, SLASH_COMMANDS};
use super::keys::{Key, KeyOutcome, KeyRouter};
use super::menu::SlashMenu;
use super::overlay::AnchoredOverlay;
use crate::editor::BlockDocument;
use crate::upload::{ImagePicker, ImageUploader};

/// Services a confirmed command may call out to.
pub struct Services<'a> {
    pub links: &'a mut dyn LinkOpener,
    pub picker: &'a mut dyn ImagePicker,
    pub uploader: &'a mut dyn ImageUploader,
}

/// A document wired to a slash menu. Keys go to the menu first; whatever it
/// does not consume is applied to the document as plain editing.
pub struct EditorHost<O: AnchoredOverlay> {
    pub doc: BlockDocument,
    pub menu: SlashMenu<O>,
    router: KeyRouter,
}

impl<O: AnchoredOverlay> EditorHost<O> {
    pub fn new(doc: BlockDocument, overlay: O) -> Self {
        let router = KeyRouter::new();
        Self {
            doc,
            menu: SlashMenu::new(SLASH_COMMANDS, overlay, router.clone()),
            router,
        }
    }

    pub fn router(&self) -> &KeyRouter {
        &self.router
    }

    pub fn press(&mut self, key: Key, services: &mut Services<'_>) -> KeyOutcome {
        let mut ctx = CommandContext {
            editor: &mut self.doc,
            links: &mut *services.links,
            picker: &mut *services.picker,
            uploader: &mut *services.uploader,
        };
        if self.menu.handle_key(key, &mut ctx).is_consumed() {
            return KeyOutcome::Consumed;
        }

        match key {
            Key::Char(ch) => {
                let mut buf = [0u8; 4];
                self.doc.type_text(ch.encode_utf8(&mut buf));
            }
            Key::Backspace => {
                self.doc.backspace();
            }
            Key::Enter => {
                self.doc.split_active_and_insert_after();
            }
            Key::ArrowUp => {
                let ix = self.doc.active_ix().saturating_sub(1);
                self.doc.set_active_ix(ix);
            }
            Key::ArrowDown => {
                let ix = self.doc.active_ix() + 1;
                self.doc.set_active_ix(ix);
            }
            Key::Escape => {}
        }
        self.sync_menu();
        KeyOutcome::Ignored
    }

    pub fn press_all(&mut self, keys: &[Key], services: &mut Services<'_>) {
        for &key in keys {
            self.press(key, services);
        }
    }

    pub fn sync_menu(&mut self) {
        let active = self.doc.active();
        let (block, text) = (active.uid.clone(), active.text.clone());
        self.menu
            .sync_with_text(&block, &text, self.doc.cursor(), &self.doc);
    }
}
