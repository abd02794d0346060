//! Comparison settings and the command-line surface that builds them.

use crate::rank::{CategoryFilter, SortColumn};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use url::Url;

/// Default base URI for snapshots that carry no `<base href>`.
pub const DEFAULT_DOCUMENT_URL: &str = "http://localhost/";
/// Default `id` of the presentation layer's container, excluded from text walks.
pub const DEFAULT_UI_CONTAINER_ID: &str = "pce-ui-container";

/// Settings shared by both snapshots of a comparison run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompareConfig {
    /// URL the compared page was served from.
    pub document_url: Url,
    /// Container whose text belongs to the presentation layer.
    pub ui_container_id: String,
}

impl CompareConfig {
    /// Builds a config for a page served from `document_url`.
    pub fn new(document_url: Url) -> Self {
        Self {
            document_url,
            ..Self::default()
        }
    }

    /// Overrides the presentation container id.
    pub fn with_ui_container_id(mut self, id: impl Into<String>) -> Self {
        self.ui_container_id = id.into();
        self
    }
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            document_url: Url::parse(DEFAULT_DOCUMENT_URL).expect("default document url"),
            ui_container_id: DEFAULT_UI_CONTAINER_ID.to_string(),
        }
    }
}

/// Output rendering for the `pagediff` binary.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table, one record per line.
    Table,
    /// Pretty-printed JSON array of records.
    Json,
}

/// Legend filter as accepted on the command line.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum FilterArg {
    /// Every record, priority order.
    All,
    /// Heading changes.
    Heading,
    /// New and modified links.
    Link,
    /// Link text changes.
    CtaText,
    /// Paragraph changes.
    Paragraph,
    /// Image changes.
    Image,
    /// Text outside headings, paragraphs, links and buttons.
    GeneralText,
    /// Removed text and links.
    Removed,
}

impl FilterArg {
    /// Maps the CLI value onto the ranker's filter.
    pub fn to_filter(self) -> CategoryFilter {
        use crate::record::Category;
        match self {
            Self::All => CategoryFilter::All,
            Self::Heading => CategoryFilter::Only(Category::Heading),
            Self::Link => CategoryFilter::Links,
            Self::CtaText => CategoryFilter::Only(Category::CtaText),
            Self::Paragraph => CategoryFilter::Only(Category::Paragraph),
            Self::Image => CategoryFilter::Only(Category::Image),
            Self::GeneralText => CategoryFilter::Only(Category::GeneralText),
            Self::Removed => CategoryFilter::Only(Category::Removed),
        }
    }
}

/// Column accepted by `--sort`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum SortArg {
    /// Numeric priority.
    Priority,
    /// Category icon and label.
    Category,
    /// Difference kind label.
    Kind,
    /// Detail message.
    Detail,
}

impl From<SortArg> for SortColumn {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Priority => SortColumn::Priority,
            SortArg::Category => SortColumn::Category,
            SortArg::Kind => SortColumn::Kind,
            SortArg::Detail => SortColumn::Detail,
        }
    }
}

/// Command-line interface for comparing two saved page snapshots.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "pagediff",
    about = "Report categorized content differences between two HTML snapshots"
)]
pub struct Cli {
    /// Markup of the prior (source) page
    #[arg(long, env = "PAGEDIFF_SOURCE")]
    pub source: PathBuf,

    /// Markup of the current page
    #[arg(long, env = "PAGEDIFF_CURRENT")]
    pub current: PathBuf,

    /// URL both snapshots were served from, used to resolve relative links
    #[arg(long, env = "PAGEDIFF_DOCUMENT_URL", default_value = DEFAULT_DOCUMENT_URL)]
    pub document_url: Url,

    /// Element id whose text is excluded from comparison
    #[arg(long, env = "PAGEDIFF_UI_CONTAINER_ID", default_value = DEFAULT_UI_CONTAINER_ID)]
    pub ui_container_id: String,

    /// Legend filter; anything but `all` switches to grouped order
    #[arg(long, value_enum, env = "PAGEDIFF_FILTER", default_value = "all")]
    pub filter: FilterArg,

    /// Only keep records whose row text contains this query
    #[arg(long, env = "PAGEDIFF_SEARCH")]
    pub search: Option<String>,

    /// Re-sort the view by a single column
    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,

    /// Sort the chosen column descending
    #[arg(long, default_value_t = false, requires = "sort")]
    pub descending: bool,

    /// Output rendering
    #[arg(long, value_enum, env = "PAGEDIFF_FORMAT", default_value = "table")]
    pub format: OutputFormat,
}

impl Cli {
    /// Converts the parsed CLI into a `CompareConfig`.
    pub fn build_config(&self) -> CompareConfig {
        CompareConfig::new(self.document_url.clone()).with_ui_container_id(&self.ui_container_id)
    }
}
