use notesgalore_core::blocks::BlockType;
use notesgalore_core::documents::{render_document_list, DocumentOperations, DocumentSummary};
use notesgalore_core::editor::{Block, BlockDocument};
use notesgalore_core::prefs::{PreferenceStore, SqlitePreferences};
use notesgalore_core::slash::{
    filter_slash_commands, parse_key_script, EditorHost, LinkOpener, Services, TextOverlay,
    Viewport, SLASH_COMMANDS,
};
use notesgalore_core::theme::{
    ClassList, ThemePreference, ThemeToggle, COLOR_THEME_KEY, DARK_CLASS,
};
use notesgalore_core::upload::{ImagePicker, LocalAssetUploader, PickedFile};
use tempfile::tempdir;

#[derive(Default)]
struct Links(Vec<String>);

impl LinkOpener for Links {
    fn open_in_new_tab(&mut self, href: &str) {
        self.0.push(href.to_string());
    }
}

struct Picker(Option<PickedFile>);

impl ImagePicker for Picker {
    fn pick_image(&mut self) -> Option<PickedFile> {
        self.0.take()
    }
}

fn host(text: &str) -> EditorHost<TextOverlay> {
    let mut doc = BlockDocument::new(vec![Block::new(text)]);
    doc.set_active_ix(0);
    EditorHost::new(
        doc,
        TextOverlay::new(Viewport {
            width: 1024.0,
            height: 768.0,
        }),
    )
}

fn type_keys(
    host: &mut EditorHost<TextOverlay>,
    script: &str,
    links: &mut Links,
    picker: &mut Picker,
    uploader: &mut LocalAssetUploader,
) {
    let keys = parse_key_script(script).expect("key script");
    let mut services = Services {
        links,
        picker,
        uploader,
    };
    host.press_all(&keys, &mut services);
}

#[test]
fn heading_command_replaces_trigger_and_converts_block() {
    let dir = tempdir().expect("tempdir");
    let mut host = host("Plan ");
    let (mut links, mut picker) = (Links::default(), Picker(None));
    let mut uploader = LocalAssetUploader::new(dir.path());

    type_keys(&mut host, "/head<Down><Down><Enter>", &mut links, &mut picker, &mut uploader);

    assert_eq!(host.doc.active().text, "Plan ");
    assert_eq!(host.doc.active().block_type, BlockType::Heading3);
    assert!(!host.menu.is_open());
    assert!(!host.router().is_captured());
}

#[test]
fn three_matches_wrap_from_last_to_first() {
    let dir = tempdir().expect("tempdir");
    let mut host = host("");
    let (mut links, mut picker) = (Links::default(), Picker(None));
    let mut uploader = LocalAssetUploader::new(dir.path());

    type_keys(&mut host, "/head<Down><Down>", &mut links, &mut picker, &mut uploader);
    assert_eq!(host.menu.matches().len(), 3);
    assert_eq!(host.menu.highlighted(), Some(2));

    type_keys(&mut host, "<Down>", &mut links, &mut picker, &mut uploader);
    assert_eq!(host.menu.highlighted(), Some(0));
}

#[test]
fn escape_then_enter_leaves_document_untouched() {
    let dir = tempdir().expect("tempdir");
    let mut host = host("");
    let (mut links, mut picker) = (Links::default(), Picker(None));
    let mut uploader = LocalAssetUploader::new(dir.path());

    type_keys(&mut host, "/to<Esc>", &mut links, &mut picker, &mut uploader);
    assert!(!host.menu.is_open());

    type_keys(&mut host, "<Enter>", &mut links, &mut picker, &mut uploader);
    assert_eq!(host.doc.blocks().len(), 2);
    assert_eq!(host.doc.blocks()[0].text, "/to");
    assert_eq!(host.doc.blocks()[0].block_type, BlockType::Paragraph);
    assert!(links.0.is_empty());
}

#[test]
fn todo_command_toggles_list_type() {
    let dir = tempdir().expect("tempdir");
    let mut host = host("");
    let (mut links, mut picker) = (Links::default(), Picker(None));
    let mut uploader = LocalAssetUploader::new(dir.path());

    type_keys(&mut host, "/to-do<Enter>buy milk", &mut links, &mut picker, &mut uploader);
    assert_eq!(host.doc.active().block_type, BlockType::TodoList);
    assert_eq!(host.doc.active().text, "buy milk");

    type_keys(&mut host, " /to-do<Enter>", &mut links, &mut picker, &mut uploader);
    assert_eq!(host.doc.active().block_type, BlockType::Paragraph);
    assert_eq!(host.doc.active().text, "buy milk ");
}

#[test]
fn image_command_uploads_and_inserts_reference() {
    let dir = tempdir().expect("tempdir");
    let mut host = host("see ");
    let mut links = Links::default();
    let mut picker = Picker(PickedFile::from_name("diagram.png", b"png-bytes".to_vec()));
    let mut uploader = LocalAssetUploader::new(dir.path());

    type_keys(&mut host, "/ima<Enter>", &mut links, &mut picker, &mut uploader);

    let record = uploader.uploaded().first().expect("uploaded").clone();
    assert_eq!(
        host.doc.active().text,
        format!("see ![diagram.png](/{})", record.path)
    );
    assert!(dir.path().join(&record.path).exists());
    assert!(!host.menu.is_open());
}

#[test]
fn cancelled_image_picker_only_removes_trigger() {
    let dir = tempdir().expect("tempdir");
    let mut host = host("");
    let (mut links, mut picker) = (Links::default(), Picker(None));
    let mut uploader = LocalAssetUploader::new(dir.path());

    type_keys(&mut host, "/image<Enter>", &mut links, &mut picker, &mut uploader);
    assert_eq!(host.doc.active().text, "");
    assert!(uploader.uploaded().is_empty());
}

#[test]
fn feedback_command_opens_feedback_page() {
    let dir = tempdir().expect("tempdir");
    let mut host = host("");
    let (mut links, mut picker) = (Links::default(), Picker(None));
    let mut uploader = LocalAssetUploader::new(dir.path());

    type_keys(&mut host, "/<Enter>", &mut links, &mut picker, &mut uploader);
    assert_eq!(links.0, vec!["/feedback".to_string()]);
    assert_eq!(host.doc.active().text, "");
}

// Heading 2 and Heading 3 carry "subtitle" as a search term, yet the filter
// only looks at titles. Kept as-is until search terms are meant to match.
#[test]
fn search_terms_do_not_widen_the_filter() {
    let heading_terms: Vec<&str> = SLASH_COMMANDS
        .iter()
        .filter(|cmd| cmd.title.starts_with("Heading"))
        .flat_map(|cmd| cmd.search_terms.iter().copied())
        .collect();
    assert!(heading_terms.contains(&"subtitle"));
    assert!(filter_slash_commands("subtitle", SLASH_COMMANDS).is_empty());
}

#[test]
fn theme_survives_reopening_preferences() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("preferences.db");

    let prefs = SqlitePreferences::open(&path).expect("open prefs");
    let mut toggle = ThemeToggle::mount(prefs, ClassList::default(), ThemePreference::Light);
    assert_eq!(toggle.toggle(), ThemePreference::Dark);
    drop(toggle);

    let prefs = SqlitePreferences::open(&path).expect("reopen prefs");
    assert_eq!(prefs.get(COLOR_THEME_KEY).as_deref(), Some("dark"));
    let mut toggle = ThemeToggle::mount(prefs, ClassList::default(), ThemePreference::Light);
    assert!(toggle.scope().contains(DARK_CLASS));

    toggle.toggle();
    let (prefs, scope) = toggle.into_parts();
    assert_eq!(prefs.get(COLOR_THEME_KEY).as_deref(), Some("light"));
    assert!(!scope.contains(DARK_CLASS));
}

#[derive(Default)]
struct AttachedMenus(Vec<(String, String)>);

impl DocumentOperations for AttachedMenus {
    fn attach(&mut self, public_id: &str, title: &str) {
        self.0.push((public_id.to_string(), title.to_string()));
    }
}

#[test]
fn document_list_marks_current_route() {
    let docs = vec![
        DocumentSummary::new("a1", "Groceries"),
        DocumentSummary::new("b2", "A very long meeting notes title for Tuesday"),
    ];
    let mut menus = AttachedMenus::default();

    let cards = render_document_list(&docs, "/app/b2", &mut menus);

    assert_eq!(cards.len(), 2);
    assert!(!cards[0].active);
    assert!(cards[1].active);
    assert_eq!(cards[0].href, "/app/a1");
    assert!(cards[1].display_title.ends_with('…'));
    assert_eq!(
        menus.0,
        vec![
            ("a1".to_string(), "Groceries".to_string()),
            (
                "b2".to_string(),
                "A very long meeting notes title for Tuesday".to_string()
            ),
        ]
    );
}
