//! Parsed page snapshots and the node walks the engine performs over them.

use crate::config::CompareConfig;
use crate::debug_log;
use crate::normalize::resolve_absolute_url;
use ego_tree::{NodeId, NodeRef};
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use url::Url;

const SKIPPED_TEXT_CONTAINERS: &[&str] = &["script", "style"];

/// Walk options shared by the source and current snapshots of one run.
#[derive(Debug, Clone)]
pub struct SnapshotOptions {
    /// Base URI used when the markup carries no `<base href>`.
    pub document_url: Url,
    /// `id` of the presentation layer's own container; its text is never compared.
    pub ui_container_id: String,
}

impl SnapshotOptions {
    /// Derives walk options from the comparison config.
    pub fn from_config(config: &CompareConfig) -> Self {
        Self {
            document_url: config.document_url.clone(),
            ui_container_id: config.ui_container_id.clone(),
        }
    }
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self::from_config(&CompareConfig::default())
    }
}

/// Reference to an element inside the snapshot that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(NodeId);

/// One text leaf that takes part in comparison.
#[derive(Debug, Clone, Copy)]
pub struct TextLeaf<'a> {
    /// Raw node value.
    pub value: &'a str,
    /// Immediately containing element.
    pub parent: ElementRef<'a>,
}

impl TextLeaf<'_> {
    /// Upper-case tag name of the containing element (`H1`, `P`, `SPAN`, ...).
    pub fn parent_tag(&self) -> String {
        self.parent.value().name().to_ascii_uppercase()
    }

    /// True when the leaf sits anywhere inside an `<a>` or `<button>`.
    pub fn inside_link_or_button(&self) -> bool {
        std::iter::once(*self.parent)
            .chain(self.parent.ancestors())
            .filter_map(ElementRef::wrap)
            .any(|el| matches!(el.value().name(), "a" | "button"))
    }
}

/// Anchor element with its raw reference and visible text.
#[derive(Debug, Clone)]
pub struct AnchorNode<'a> {
    /// The `<a>` element itself.
    pub element: ElementRef<'a>,
    /// Raw `href` value; empty when the attribute is missing.
    pub href: &'a str,
    /// Concatenated descendant text, not yet normalized.
    pub text: String,
}

/// Image element with its raw `src` and `srcset` attributes.
#[derive(Debug, Clone)]
pub struct ImageNode<'a> {
    /// The `<img>` element itself.
    pub element: ElementRef<'a>,
    /// Raw `src`, if present.
    pub src: Option<&'a str>,
    /// Raw `srcset`, if present.
    pub srcset: Option<&'a str>,
}

/// A parsed document tree plus the base URI its references resolve against.
pub struct Snapshot {
    html: Html,
    base_url: Url,
    ui_container_id: String,
    selectors: Selectors,
}

impl Snapshot {
    /// Parses `markup` independently of any live environment.
    pub fn parse(markup: &str, options: &SnapshotOptions) -> Self {
        let html = Html::parse_document(markup);
        let selectors = Selectors::new();
        let base_url = html
            .select(&selectors.base)
            .filter_map(|el| el.value().attr("href"))
            .next()
            .and_then(|href| resolve_absolute_url(&options.document_url, href).ok())
            .unwrap_or_else(|| options.document_url.clone());
        debug_log!("snapshot parsed, base uri {base_url}");
        Self {
            html,
            base_url,
            ui_container_id: options.ui_container_id.clone(),
            selectors,
        }
    }

    /// Base URI references in this snapshot resolve against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a handle back to its element.
    ///
    /// Returns `None` for handles minted by a different snapshot that happen not to
    /// point at an element here.
    pub fn element(&self, handle: ElementHandle) -> Option<ElementRef<'_>> {
        self.html.tree.get(handle.0).and_then(ElementRef::wrap)
    }

    /// Handle for an element of this snapshot.
    pub fn handle(&self, element: ElementRef<'_>) -> ElementHandle {
        ElementHandle(element.id())
    }

    /// Text leaves under the body in document order.
    ///
    /// Skips whitespace-only values and anything inside `script`, `style`, or the
    /// presentation layer's own container.
    pub fn text_leaves(&self) -> impl Iterator<Item = TextLeaf<'_>> + '_ {
        let root = self
            .html
            .select(&self.selectors.body)
            .next()
            .unwrap_or_else(|| self.html.root_element());
        root.descendants().filter_map(move |node| self.text_leaf(node))
    }

    fn text_leaf<'a>(&self, node: NodeRef<'a, Node>) -> Option<TextLeaf<'a>> {
        let Node::Text(text) = node.value() else {
            return None;
        };
        let value: &str = text;
        if value.trim().is_empty() {
            return None;
        }
        let parent = node.parent().and_then(ElementRef::wrap)?;
        if self.in_skipped_container(parent) {
            return None;
        }
        Some(TextLeaf { value, parent })
    }

    fn in_skipped_container(&self, parent: ElementRef<'_>) -> bool {
        std::iter::once(*parent)
            .chain(parent.ancestors())
            .filter_map(ElementRef::wrap)
            .any(|el| {
                SKIPPED_TEXT_CONTAINERS.contains(&el.value().name())
                    || el.value().id() == Some(self.ui_container_id.as_str())
            })
    }

    /// Every `<a>` element in document order.
    pub fn anchors(&self) -> impl Iterator<Item = AnchorNode<'_>> + '_ {
        self.html.select(&self.selectors.anchor).map(|element| AnchorNode {
            element,
            href: element.value().attr("href").unwrap_or(""),
            text: element.text().collect(),
        })
    }

    /// Every `<img>` element in document order.
    pub fn images(&self) -> impl Iterator<Item = ImageNode<'_>> + '_ {
        self.html.select(&self.selectors.image).map(|element| ImageNode {
            element,
            src: element.value().attr("src"),
            srcset: element.value().attr("srcset"),
        })
    }
}

struct Selectors {
    base: Selector,
    body: Selector,
    anchor: Selector,
    image: Selector,
}

impl Selectors {
    fn new() -> Self {
        Self {
            base: Selector::parse("base[href]").expect("base selector"),
            body: Selector::parse("body").expect("body selector"),
            anchor: Selector::parse("a").expect("anchor selector"),
            image: Selector::parse("img").expect("image selector"),
        }
    }
}
