use anyhow::Context;
use notesgalore_core::config::{AppConfig, ConfigStore};
use notesgalore_core::editor::{Block, BlockDocument};
use notesgalore_core::logging;
use notesgalore_core::prefs::SqlitePreferences;
use notesgalore_core::slash::{
    parse_key_script, EditorHost, LinkOpener, Services, TextOverlay, Viewport,
};
use notesgalore_core::theme::{ClassList, ThemeToggle};
use notesgalore_core::upload::{ImagePicker, LocalAssetUploader, PickedFile};
use serde_json::json;
use std::path::PathBuf;

#[derive(Debug)]
struct HarnessArgs {
    text: String,
    keys: String,
    config_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    image_path: Option<PathBuf>,
    toggle_theme: bool,
}

fn parse_args(args: &[String]) -> Result<HarnessArgs, String> {
    let mut text: Option<String> = None;
    let mut keys: Option<String> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut data_dir: Option<PathBuf> = None;
    let mut image_path: Option<PathBuf> = None;
    let mut toggle_theme = false;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--text" => {
                let value = iter.next().ok_or_else(|| "Missing --text value".to_string())?;
                text = Some(value.to_string());
            }
            "--keys" => {
                let value = iter.next().ok_or_else(|| "Missing --keys value".to_string())?;
                keys = Some(value.to_string());
            }
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "Missing --config value".to_string())?;
                config_path = Some(PathBuf::from(value));
            }
            "--data-dir" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "Missing --data-dir value".to_string())?;
                data_dir = Some(PathBuf::from(value));
            }
            "--image" => {
                let value = iter.next().ok_or_else(|| "Missing --image value".to_string())?;
                image_path = Some(PathBuf::from(value));
            }
            "--toggle-theme" => {
                toggle_theme = true;
            }
            "--help" | "-h" => {
                return Err(String::new());
            }
            _ => return Err(format!("Unknown argument: {arg}")),
        }
    }

    let keys = keys.ok_or_else(|| "Missing --keys".to_string())?;

    Ok(HarnessArgs {
        text: text.unwrap_or_default(),
        keys,
        config_path,
        data_dir,
        image_path,
        toggle_theme,
    })
}

#[derive(Default)]
struct RecordedLinks(Vec<String>);

impl LinkOpener for RecordedLinks {
    fn open_in_new_tab(&mut self, href: &str) {
        tracing::info!(href, "open in new tab");
        self.0.push(href.to_string());
    }
}

/// Answers the image picker with the file given on the command line, or the
/// native dialog when built with it and no file was given.
struct HarnessPicker {
    path: Option<PathBuf>,
}

impl ImagePicker for HarnessPicker {
    fn pick_image(&mut self) -> Option<PickedFile> {
        let Some(path) = self.path.take() else {
            return native_pick();
        };
        let name = path.file_name()?.to_str().unwrap_or("image").to_string();
        match std::fs::read(&path) {
            Ok(bytes) => PickedFile::from_name(name, bytes),
            Err(err) => {
                tracing::warn!(path = %path.display(), "failed to read image: {err}");
                None
            }
        }
    }
}

#[cfg(feature = "native-dialog")]
fn native_pick() -> Option<PickedFile> {
    notesgalore_core::upload::NativeImagePicker.pick_image()
}

#[cfg(not(feature = "native-dialog"))]
fn native_pick() -> Option<PickedFile> {
    None
}

fn load_config(args: &HarnessArgs) -> anyhow::Result<AppConfig> {
    let store = match &args.config_path {
        Some(path) => Some(ConfigStore::new(path.clone())),
        None => ConfigStore::default_store().ok(),
    };
    let mut config = match store {
        Some(store) => store
            .load()
            .with_context(|| format!("failed to load {}", store.path().display()))?,
        None => AppConfig::default(),
    };
    if let Some(dir) = &args.data_dir {
        config.data_dir = Some(dir.to_string_lossy().to_string());
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = std::env::args().collect::<Vec<_>>();
    let parsed = match parse_args(&args) {
        Ok(value) => value,
        Err(message) => {
            if !message.is_empty() {
                eprintln!("{message}");
            }
            eprintln!("Usage: slash-harness --keys <script> [--text <block>] [--config <path>] [--data-dir <dir>] [--image <file>] [--toggle-theme]");
            std::process::exit(1);
        }
    };

    let config = load_config(&parsed)?;
    logging::init(&config.log_filter);

    let keys = parse_key_script(&parsed.keys).map_err(anyhow::Error::msg)?;
    let data_dir = config.resolve_data_dir()?;
    let prefs = SqlitePreferences::open(&config.preferences_path()?)
        .context("failed to open preferences")?;
    let mut theme = ThemeToggle::mount(prefs, ClassList::default(), config.theme_default());
    if parsed.toggle_theme {
        theme.toggle();
    }

    let mut doc = BlockDocument::new(vec![Block::new(parsed.text.clone())]);
    doc.set_active_ix(0);
    let mut host = EditorHost::new(
        doc,
        TextOverlay::new(Viewport {
            width: 1280.0,
            height: 800.0,
        }),
    );
    host.sync_menu();

    let mut links = RecordedLinks::default();
    let mut picker = HarnessPicker {
        path: parsed.image_path.clone(),
    };
    let mut uploader = LocalAssetUploader::new(&data_dir);
    {
        let mut services = Services {
            links: &mut links,
            picker: &mut picker,
            uploader: &mut uploader,
        };
        host.press_all(&keys, &mut services);
    }

    let output = json!({
        "blocks": host.doc.blocks(),
        "cursor": host.doc.position().offset,
        "menu": {
            "open": host.menu.is_open(),
            "query": host.menu.query(),
            "highlighted": host.menu.highlighted(),
            "lines": host.menu.overlay().render_lines(),
            "origin": host.menu.overlay().origin().map(|(x, y)| json!({ "x": x, "y": y })),
        },
        "opened_links": links.0,
        "uploads": uploader.uploaded(),
        "theme": theme.current().as_str(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
