// Buffered job summary builder for the GITHUB_STEP_SUMMARY file channel.
// Content is accumulated in memory and flushed with `write`; the file is
// created by the host runner before the step starts.
//
// Two builder families share the buffer: HTML elements and GitHub-flavored
// markdown blocks. Markdown needs a blank line after raw HTML to resume
// rendering, so the builder tracks which family wrote last and inserts one
// when the family changes.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use actions_sdk::environment::keys;
use actions_sdk::Environment;

use crate::errors::{CoreError, Result};

const EOL: &str = "\n";

/// Options for a summary write operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryWriteOptions {
    /// Replace the file contents instead of appending.
    pub overwrite: bool,
}

/// Options for an embedded image.
#[derive(Debug, Clone, Default)]
pub struct SummaryImageOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// The GitHub alert flavors for [`Summary::add_alert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertType {
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl AlertType {
    fn marker(self) -> &'static str {
        match self {
            Self::Note => "NOTE",
            Self::Tip => "TIP",
            Self::Important => "IMPORTANT",
            Self::Warning => "WARNING",
            Self::Caution => "CAUTION",
        }
    }
}

/// One entry of a markdown task list.
#[derive(Debug, Clone)]
pub struct TaskItem {
    pub content: String,
    pub complete: bool,
}

impl TaskItem {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            complete: false,
        }
    }

    pub fn complete(content: impl Into<String>) -> Self {
        Self {
            complete: true,
            ..Self::new(content)
        }
    }
}

/// Column alignment, taken from the heading cell of a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableColumnAlignment {
    #[default]
    Center,
    Left,
    Right,
}

impl TableColumnAlignment {
    fn html_attribute(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    fn markdown_separator(self) -> &'static str {
        match self {
            Self::Left => ":--",
            Self::Right => "--:",
            Self::Center => "---",
        }
    }
}

/// A single table cell.
#[derive(Debug, Clone)]
pub struct SummaryTableCell {
    pub data: String,
    pub header: bool,
    pub colspan: u32,
    pub rowspan: u32,
    pub alignment: TableColumnAlignment,
}

impl SummaryTableCell {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            header: false,
            colspan: 1,
            rowspan: 1,
            alignment: TableColumnAlignment::default(),
        }
    }

    pub fn header(data: impl Into<String>) -> Self {
        Self {
            header: true,
            ..Self::new(data)
        }
    }
}

/// A table row: an ordered list of cells.
pub type SummaryTableRow = Vec<SummaryTableCell>;

/// A markdown table: one heading row plus body rows. The heading cells
/// carry the column alignments.
#[derive(Debug, Clone)]
pub struct SummaryTable {
    pub heading: SummaryTableRow,
    pub rows: Vec<SummaryTableRow>,
}

/// Which builder family wrote the previous block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Unspecified,
    Html,
    Markdown,
}

/// A buffered Markdown/HTML job summary.
#[derive(Debug)]
pub struct Summary<E: Environment> {
    env: E,
    buffer: String,
    file_path: Option<PathBuf>,
    previous_mode: Mode,
    current_mode: Mode,
}

impl<E: Environment> Summary<E> {
    pub fn new(env: E) -> Self {
        Self {
            env,
            buffer: String::new(),
            file_path: None,
            previous_mode: Mode::Unspecified,
            current_mode: Mode::Unspecified,
        }
    }

    /// Resolve (and cache) the summary file path from the environment.
    fn file_path(&mut self) -> Result<&Path> {
        if self.file_path.is_none() {
            let path = self
                .env
                .get(keys::GITHUB_STEP_SUMMARY)
                .filter(|value| !value.trim().is_empty())
                .ok_or(CoreError::ConfigurationMissing {
                    variable: keys::GITHUB_STEP_SUMMARY.to_string(),
                })?;

            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(CoreError::FileNotFound { path });
            }

            self.file_path = Some(path);
        }

        Ok(self.file_path.as_deref().unwrap())
    }

    /// Wrap `content` in an HTML tag with optional attributes. An empty
    /// content renders a void element.
    fn wrap(tag: &str, content: &str, attributes: &[(&str, String)]) -> String {
        let mut html = format!("<{tag}");
        for (key, value) in attributes {
            html.push_str(&format!(" {key}=\"{value}\""));
        }

        if content.is_empty() {
            html.push('>');
        } else {
            html.push_str(&format!(">{content}</{tag}>"));
        }

        html
    }

    /// Flush the buffer to the summary file and empty it.
    pub fn write(&mut self, options: SummaryWriteOptions) -> Result<&mut Self> {
        let path = self.file_path()?.to_path_buf();

        let mut file = if options.overwrite {
            OpenOptions::new().write(true).truncate(true).open(&path)?
        } else {
            OpenOptions::new().append(true).open(&path)?
        };
        file.write_all(self.buffer.as_bytes())?;

        tracing::debug!(path = %path.display(), bytes = self.buffer.len(), "wrote job summary");
        Ok(self.empty_buffer())
    }

    /// Empty the buffer and wipe the summary file.
    pub fn clear(&mut self) -> Result<&mut Self> {
        self.empty_buffer().write(SummaryWriteOptions { overwrite: true })
    }

    /// The current buffer contents.
    pub fn stringify(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty_buffer(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Reset the buffer without touching the file.
    pub fn empty_buffer(&mut self) -> &mut Self {
        self.buffer.clear();
        self
    }

    fn add_raw_text(&mut self, text: &str, add_new_line: bool) -> &mut Self {
        if add_new_line {
            if self.current_mode != self.previous_mode && self.previous_mode != Mode::Unspecified {
                self.buffer.push_str(EOL);
                self.buffer.push_str(EOL);
            }
            self.previous_mode = self.current_mode;
            self.buffer.push_str(text);
            self.buffer.push_str(EOL);
        } else {
            self.buffer.push_str(text);
        }
        self
    }

    fn add_html_block(&mut self, element: &str) -> &mut Self {
        self.current_mode = Mode::Html;
        self.add_raw_text(element, true)
    }

    fn add_markdown_block(&mut self, block: &str) -> &mut Self {
        self.current_mode = Mode::Markdown;
        self.add_raw_text(block, true)
    }

    /// Append raw text to the buffer.
    pub fn add_raw(&mut self, text: &str) -> &mut Self {
        self.add_raw_text(text, false)
    }

    /// Append a line terminator.
    pub fn add_eol(&mut self) -> &mut Self {
        self.add_raw(EOL)
    }

    /// Append raw text followed by a line terminator.
    pub fn add_raw_line(&mut self, text: &str) -> &mut Self {
        self.add_raw_text(text, true)
    }

    /// Append raw markdown, switching the buffer into markdown mode.
    pub fn add_raw_markdown(&mut self, markdown: &str) -> &mut Self {
        self.current_mode = Mode::Markdown;
        self.add_raw_text(markdown, false)
    }

    // -----------------------------------------------------------------------
    // HTML elements
    // -----------------------------------------------------------------------

    /// Append a fenced code block, optionally language-tagged.
    pub fn add_code_block(&mut self, code: &str, lang: Option<&str>) -> &mut Self {
        let mut attributes = Vec::new();
        if let Some(lang) = lang {
            attributes.push(("lang", lang.to_string()));
        }
        let element = Self::wrap("pre", &Self::wrap("code", code, &[]), &attributes);
        self.add_html_block(&element)
    }

    /// Append a list, ordered or unordered.
    pub fn add_list(&mut self, items: &[&str], ordered: bool) -> &mut Self {
        let tag = if ordered { "ol" } else { "ul" };
        let list_items: String = items
            .iter()
            .map(|item| Self::wrap("li", item, &[]))
            .collect();
        let element = Self::wrap(tag, &list_items, &[]);
        self.add_html_block(&element)
    }

    /// Append a table built from rows of cells.
    pub fn add_table(&mut self, rows: &[SummaryTableRow]) -> &mut Self {
        let body: String = rows
            .iter()
            .map(|row| {
                let cells: String = row
                    .iter()
                    .map(|cell| {
                        let tag = if cell.header { "th" } else { "td" };
                        let mut attributes = Vec::new();
                        if cell.colspan != 1 {
                            attributes.push(("colspan", cell.colspan.to_string()));
                        }
                        if cell.rowspan != 1 {
                            attributes.push(("rowspan", cell.rowspan.to_string()));
                        }
                        if cell.alignment != TableColumnAlignment::Center {
                            attributes.push(("align", cell.alignment.html_attribute().to_string()));
                        }
                        Self::wrap(tag, &cell.data, &attributes)
                    })
                    .collect();
                Self::wrap("tr", &cells, &[])
            })
            .collect();

        let element = Self::wrap("table", &body, &[]);
        self.add_html_block(&element)
    }

    /// Append a collapsible details element.
    pub fn add_details(&mut self, label: &str, content: &str) -> &mut Self {
        let element = Self::wrap(
            "details",
            &format!("{}{}", Self::wrap("summary", label, &[]), content),
            &[],
        );
        self.add_html_block(&element)
    }

    /// Append an image.
    pub fn add_image(
        &mut self,
        src: &str,
        alt: &str,
        options: &SummaryImageOptions,
    ) -> &mut Self {
        let mut attributes = vec![("src", src.to_string()), ("alt", alt.to_string())];
        if let Some(width) = options.width {
            attributes.push(("width", width.to_string()));
        }
        if let Some(height) = options.height {
            attributes.push(("height", height.to_string()));
        }
        let element = Self::wrap("img", "", &attributes);
        self.add_html_block(&element)
    }

    /// Append a heading, clamping `level` to 1..=6.
    pub fn add_heading(&mut self, text: &str, level: u32) -> &mut Self {
        let tag = match level {
            1..=6 => format!("h{level}"),
            _ => "h1".to_string(),
        };
        let element = Self::wrap(&tag, text, &[]);
        self.add_html_block(&element)
    }

    /// Append a horizontal rule.
    pub fn add_separator(&mut self) -> &mut Self {
        self.add_html_block("<hr>")
    }

    /// Append a line break.
    pub fn add_break(&mut self) -> &mut Self {
        self.add_html_block("<br>")
    }

    /// Append a block quote, optionally with a citation.
    pub fn add_quote(&mut self, text: &str, cite: Option<&str>) -> &mut Self {
        let mut attributes = Vec::new();
        if let Some(cite) = cite {
            attributes.push(("cite", cite.to_string()));
        }
        let element = Self::wrap("blockquote", text, &attributes);
        self.add_html_block(&element)
    }

    /// Append an anchor element.
    pub fn add_link(&mut self, text: &str, href: &str) -> &mut Self {
        let element = Self::wrap("a", text, &[("href", href.to_string())]);
        self.add_html_block(&element)
    }

    // -----------------------------------------------------------------------
    // Markdown blocks
    // -----------------------------------------------------------------------

    /// Append a GitHub alert, e.g. `> [!NOTE]`.
    pub fn add_alert(&mut self, text: &str, alert_type: AlertType) -> &mut Self {
        let block = format!("> [!{}]{EOL}> {text}", alert_type.marker());
        self.add_markdown_block(&block)
    }

    /// Append a markdown heading, `#` through `######`.
    pub fn add_markdown_heading(&mut self, text: &str, level: u32) -> &mut Self {
        let hashes = match level {
            1..=6 => "#".repeat(level as usize),
            _ => "#".to_string(),
        };
        self.add_markdown_block(&format!("{hashes} {text}"))
    }

    /// Append a fenced markdown code block, optionally language-tagged.
    pub fn add_markdown_code_block(&mut self, code: &str, lang: Option<&str>) -> &mut Self {
        let block = format!("```{}{EOL}{code}{EOL}```", lang.unwrap_or(""));
        self.add_markdown_block(&block)
    }

    /// Append a markdown list, ordered or unordered.
    pub fn add_markdown_list(&mut self, items: &[&str], ordered: bool) -> &mut Self {
        let prefix = if ordered { "1." } else { "-" };
        let block = items
            .iter()
            .map(|item| format!("{prefix} {item}"))
            .collect::<Vec<_>>()
            .join(EOL);
        self.add_markdown_block(&block)
    }

    /// Append a markdown task list, `- [x]` for complete items.
    pub fn add_markdown_task_list(&mut self, items: &[TaskItem]) -> &mut Self {
        let block = items
            .iter()
            .map(|item| {
                let check = if item.complete { "x" } else { " " };
                // A leading parenthesis would otherwise read as a link target.
                let content = if item.content.starts_with('(') {
                    format!("\\{}", item.content)
                } else {
                    item.content.clone()
                };
                format!("- [{check}] {content}")
            })
            .collect::<Vec<_>>()
            .join(EOL);
        self.add_markdown_block(&block)
    }

    /// Append a markdown table; heading cells carry the column alignments.
    pub fn add_markdown_table(&mut self, table: &SummaryTable) -> &mut Self {
        let heading = format!(
            "| {} |",
            table
                .heading
                .iter()
                .map(|cell| cell.data.as_str())
                .collect::<Vec<_>>()
                .join(" | ")
        );
        let separators = format!(
            "| {} |",
            table
                .heading
                .iter()
                .map(|cell| cell.alignment.markdown_separator())
                .collect::<Vec<_>>()
                .join(" | ")
        );
        let body = table
            .rows
            .iter()
            .map(|row| {
                format!(
                    "| {} |",
                    row.iter()
                        .map(|cell| cell.data.as_str())
                        .collect::<Vec<_>>()
                        .join(" | ")
                )
            })
            .collect::<Vec<_>>()
            .join(EOL);

        let block = format!("{heading}{EOL}{separators}{EOL}{body}");
        self.add_markdown_block(&block)
    }

    /// Append a markdown thematic break.
    pub fn add_markdown_separator(&mut self) -> &mut Self {
        self.add_markdown_block("---")
    }

    /// Append a markdown block quote.
    pub fn add_markdown_quote(&mut self, text: &str) -> &mut Self {
        self.add_markdown_block(&format!("> {text}"))
    }

    /// Append a markdown link.
    pub fn add_markdown_link(&mut self, text: &str, href: &str) -> &mut Self {
        self.add_markdown_block(&format!("[{text}]({href})"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
