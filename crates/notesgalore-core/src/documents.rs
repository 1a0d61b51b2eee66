use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;
use uuid::Uuid;

pub const DOCUMENT_ROUTE_PREFIX: &str = "/app/";
pub const CARD_TITLE_MAX_GRAPHEMES: usize = 26;
const ELLIPSIS: &str = "…";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub public_id: String,
    pub title: String,
}

impl DocumentSummary {
    pub fn new(public_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            public_id: public_id.into(),
            title: title.into(),
        }
    }

    pub fn with_new_id(title: impl Into<String>) -> Self {
        Self::new(Uuid::new_v4().to_string(), title)
    }

    pub fn href(&self) -> String {
        format!("{DOCUMENT_ROUTE_PREFIX}{}", self.public_id)
    }
}

/// Supplies the sidebar's documents in display order.
pub trait DocumentListing {
    fn documents(&self) -> Vec<DocumentSummary>;
}

impl DocumentListing for Vec<DocumentSummary> {
    fn documents(&self) -> Vec<DocumentSummary> {
        self.clone()
    }
}

/// Per-card rename/delete menu. Only receives the identity of the card.
pub trait DocumentOperations {
    fn attach(&mut self, public_id: &str, title: &str);
}

/// Row icon. Every card currently renders the same file glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardIcon {
    FileText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentCard {
    pub public_id: String,
    pub title: String,
    pub display_title: String,
    pub href: String,
    pub icon: CardIcon,
    pub active: bool,
}

impl DocumentCard {
    pub fn from_summary(summary: &DocumentSummary, pathname: &str) -> Self {
        let href = summary.href();
        Self {
            public_id: summary.public_id.clone(),
            title: summary.title.clone(),
            display_title: truncate_title(&summary.title, CARD_TITLE_MAX_GRAPHEMES),
            active: pathname == href,
            href,
            icon: CardIcon::FileText,
        }
    }
}

pub fn render_document_list(
    listing: &dyn DocumentListing,
    pathname: &str,
    operations: &mut dyn DocumentOperations,
) -> Vec<DocumentCard> {
    listing
        .documents()
        .iter()
        .map(|summary| {
            operations.attach(&summary.public_id, &summary.title);
            DocumentCard::from_summary(summary, pathname)
        })
        .collect()
}

pub fn truncate_title(title: &str, max_graphemes: usize) -> String {
    let single_line: String = title
        .chars()
        .map(|ch| if ch == '\n' || ch == '\r' { ' ' } else { ch })
        .collect();
    let graphemes: Vec<&str> = single_line.graphemes(true).collect();
    if graphemes.len() <= max_graphemes {
        return single_line;
    }
    let keep = max_graphemes.saturating_sub(1);
    let mut output: String = graphemes[..keep].concat();
    output.truncate(output.trim_end().len());
    output.push_str(ELLIPSIS);
    output
}
