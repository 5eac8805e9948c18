//! Parsed document model.
//!
//! A notebook body is a flat sequence of [`Block`]s: headings, paragraphs,
//! lists and tables. Table cells and list items hold [`Content`], an inline
//! sequence of text runs, hyperlinks and nested blocks. The walker only ever
//! reads this model; building it from HTML is the job of [`crate::html`].

/// A parsed document body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Top-level blocks in document order.
    pub blocks: Vec<Block>,
}

/// A block-level element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `h1` to `h6`.
    Heading(Heading),
    /// A paragraph or any other run of inline content.
    Paragraph(Content),
    /// An ordered or unordered list.
    List(List),
    /// A table.
    Table(Table),
}

impl Block {
    /// Returns the table if this block is one.
    #[must_use]
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Block::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Returns the list if this block is one.
    #[must_use]
    pub fn as_list(&self) -> Option<&List> {
        match self {
            Block::List(list) => Some(list),
            _ => None,
        }
    }

    /// Returns the heading if this block is one.
    #[must_use]
    pub fn as_heading(&self) -> Option<&Heading> {
        match self {
            Block::Heading(heading) => Some(heading),
            _ => None,
        }
    }

    fn write_text(&self, out: &mut String, links: bool) {
        match self {
            Block::Heading(h) => {
                out.push('\n');
                h.content.write_text(out, links);
                out.push('\n');
            }
            Block::Paragraph(c) => {
                out.push('\n');
                c.write_text(out, links);
                out.push('\n');
            }
            Block::List(list) => {
                out.push('\n');
                for item in &list.items {
                    item.write_text(out, links);
                    out.push('\n');
                }
            }
            Block::Table(table) => {
                out.push('\n');
                for row in &table.rows {
                    for (i, cell) in row.cells.iter().enumerate() {
                        if i > 0 {
                            out.push('\t');
                        }
                        cell.write_text(out, links);
                    }
                    out.push('\n');
                }
            }
        }
    }

    fn collect_links<'a>(&'a self, out: &mut Vec<&'a Link>) {
        match self {
            Block::Heading(h) => h.content.collect_links(out),
            Block::Paragraph(c) => c.collect_links(out),
            Block::List(list) => list.items.iter().for_each(|i| i.collect_links(out)),
            Block::Table(table) => table
                .rows
                .iter()
                .flat_map(|r| r.cells.iter())
                .for_each(|c| c.collect_links(out)),
        }
    }
}

/// A heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Rank, 1 for `h1`.
    pub level: u8,
    /// Heading content.
    pub content: Content,
}

impl Heading {
    /// Lower-cased, trimmed heading text.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.content.text().trim().to_lowercase()
    }
}

/// A list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    /// `ol` rather than `ul`.
    pub ordered: bool,
    /// List items.
    pub items: Vec<Content>,
}

impl List {
    /// All items, including those of lists nested inside items, depth-first.
    #[must_use]
    pub fn all_items(&self) -> Vec<&Content> {
        let mut out = Vec::new();
        for item in &self.items {
            out.push(item);
            for inline in &item.inlines {
                if let Inline::Block(block) = inline {
                    if let Block::List(nested) = block.as_ref() {
                        out.extend(nested.all_items());
                    }
                }
            }
        }
        out
    }
}

/// A table. Header rows are not distinguished from data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Rows in document order.
    pub rows: Vec<Row>,
}

/// A table row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    /// Cells in column order.
    pub cells: Vec<Content>,
}

impl Row {
    /// Returns the cell at `index`.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<&Content> {
        self.cells.get(index)
    }
}

/// A hyperlink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Target as written (possibly relative).
    pub href: String,
    /// Link content.
    pub content: Content,
}

/// An inline node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// A run of text.
    Text(String),
    /// A hyperlink.
    Link(Link),
    /// A block nested inside inline content (list in a table cell, paragraph in a list item).
    Block(Box<Block>),
}

/// A sequence of inline nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Content {
    /// Inline nodes in document order.
    pub inlines: Vec<Inline>,
}

impl Content {
    /// Builds content from inline nodes.
    #[must_use]
    pub fn new(inlines: Vec<Inline>) -> Self {
        Self { inlines }
    }

    /// Builds content holding a single text run.
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            inlines: vec![Inline::Text(text.into())],
        }
    }

    /// Full text, link text included.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out, true);
        out
    }

    /// Text with every hyperlink removed entirely.
    #[must_use]
    pub fn text_without_links(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out, false);
        out
    }

    /// All hyperlinks, including those inside nested blocks, in document order.
    #[must_use]
    pub fn links(&self) -> Vec<&Link> {
        let mut out = Vec::new();
        self.collect_links(&mut out);
        out
    }

    /// Returns true if a list is nested anywhere inside this content.
    #[must_use]
    pub fn has_nested_list(&self) -> bool {
        self.inlines.iter().any(|inline| match inline {
            Inline::Block(block) => match block.as_ref() {
                Block::List(_) => true,
                Block::Paragraph(c) => c.has_nested_list(),
                Block::Heading(h) => h.content.has_nested_list(),
                Block::Table(t) => t
                    .rows
                    .iter()
                    .flat_map(|r| r.cells.iter())
                    .any(Content::has_nested_list),
            },
            Inline::Link(link) => link.content.has_nested_list(),
            Inline::Text(_) => false,
        })
    }

    /// Splits this content into the fragments item usage is resolved on.
    ///
    /// Content with a nested list splits into its top-level parts, each list
    /// contributing its items (nested items included) and bare text runs
    /// contributing nothing. Content without a nested list is one fragment.
    #[must_use]
    pub fn fragments(&self) -> Vec<Fragment<'_>> {
        if !self.has_nested_list() {
            return vec![Fragment::Content(self)];
        }
        let mut out = Vec::new();
        for inline in &self.inlines {
            match inline {
                Inline::Text(_) => {}
                Inline::Link(_) => out.push(Fragment::Inline(inline)),
                Inline::Block(block) => match block.as_ref() {
                    Block::List(list) => {
                        out.extend(list.all_items().into_iter().map(Fragment::Content));
                    }
                    _ => out.push(Fragment::Inline(inline)),
                },
            }
        }
        out
    }

    fn write_text(&self, out: &mut String, links: bool) {
        for inline in &self.inlines {
            write_inline(inline, out, links);
        }
    }

    fn collect_links<'a>(&'a self, out: &mut Vec<&'a Link>) {
        for inline in &self.inlines {
            collect_inline_links(inline, out);
        }
    }
}

fn write_inline(inline: &Inline, out: &mut String, links: bool) {
    match inline {
        Inline::Text(text) => out.push_str(text),
        Inline::Link(link) => {
            if links {
                link.content.write_text(out, links);
            }
        }
        Inline::Block(block) => block.write_text(out, links),
    }
}

fn collect_inline_links<'a>(inline: &'a Inline, out: &mut Vec<&'a Link>) {
    match inline {
        Inline::Text(_) => {}
        Inline::Link(link) => {
            out.push(link);
            link.content.collect_links(out);
        }
        Inline::Block(block) => block.collect_links(out),
    }
}

/// A unit of item-usage resolution: either whole content or one inline part of it.
#[derive(Debug, Clone, Copy)]
pub enum Fragment<'a> {
    /// A list item or a whole cell.
    Content(&'a Content),
    /// One top-level part of a cell.
    Inline(&'a Inline),
}

impl Fragment<'_> {
    /// Full text, link text included.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Fragment::Content(c) => c.text(),
            Fragment::Inline(i) => {
                let mut out = String::new();
                write_inline(i, &mut out, true);
                out
            }
        }
    }

    /// All hyperlinks in document order.
    #[must_use]
    pub fn links(&self) -> Vec<&Link> {
        match self {
            Fragment::Content(c) => c.links(),
            Fragment::Inline(i) => {
                let mut out = Vec::new();
                collect_inline_links(i, &mut out);
                out
            }
        }
    }
}

impl Document {
    /// Indices and headings of rank `level`, in document order.
    pub fn headings(&self, level: u8) -> impl Iterator<Item = (usize, &Heading)> {
        self.blocks
            .iter()
            .enumerate()
            .filter_map(move |(i, b)| b.as_heading().filter(|h| h.level == level).map(|h| (i, h)))
    }

    /// Blocks following the heading at `index`, up to the next heading of the
    /// same or higher rank.
    ///
    /// Returns an empty slice if `index` is not a heading.
    #[must_use]
    pub fn section_after(&self, index: usize) -> &[Block] {
        section_after(&self.blocks, index)
    }

    /// The first table among the blocks, if any.
    #[must_use]
    pub fn first_table(&self) -> Option<&Table> {
        self.blocks.iter().find_map(Block::as_table)
    }
}

/// Blocks of `blocks` following the heading at `index`, up to the next
/// heading of the same or higher rank.
///
/// Returns an empty slice if `index` is not a heading.
#[must_use]
pub fn section_after(blocks: &[Block], index: usize) -> &[Block] {
    let Some(level) = blocks.get(index).and_then(Block::as_heading).map(|h| h.level) else {
        return &[];
    };
    let start = index + 1;
    let end = blocks[start..]
        .iter()
        .position(|b| b.as_heading().is_some_and(|h| h.level <= level))
        .map_or(blocks.len(), |offset| start + offset);
    &blocks[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_owned())
    }

    fn link(href: &str, label: &str) -> Inline {
        Inline::Link(Link {
            href: href.to_owned(),
            content: Content::text_only(label),
        })
    }

    fn heading(level: u8, s: &str) -> Block {
        Block::Heading(Heading {
            level,
            content: Content::text_only(s),
        })
    }

    #[test]
    fn text_with_and_without_links() {
        let c = Content::new(vec![text("Add 5 ml "), link("Database/a.html", "PBS"), text(" at 37°C")]);
        assert_eq!(c.text(), "Add 5 ml PBS at 37°C");
        assert_eq!(c.text_without_links(), "Add 5 ml  at 37°C");
        assert_eq!(c.links().len(), 1);
    }

    #[test]
    fn fragments_without_list_is_whole_cell() {
        let c = Content::new(vec![text("Use "), link("x", "A"), text(" and "), link("y", "B")]);
        let fragments = c.fragments();
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].links().len(), 2);
    }

    #[test]
    fn fragments_split_lists_into_items() {
        let nested = List {
            ordered: false,
            items: vec![Content::new(vec![link("z", "C")])],
        };
        let list = List {
            ordered: false,
            items: vec![
                Content::new(vec![link("x", "A")]),
                Content::new(vec![link("y", "B"), Inline::Block(Box::new(Block::List(nested)))]),
            ],
        };
        let c = Content::new(vec![
            text("Prepare:"),
            Inline::Block(Box::new(Block::List(list))),
            link("w", "D"),
        ]);
        let fragments = c.fragments();
        // two items + one nested item + the trailing link; bare text is skipped
        assert_eq!(fragments.len(), 4);
        assert_eq!(fragments[3].text(), "D");
    }

    #[test]
    fn section_after_stops_at_same_rank() {
        let doc = Document {
            blocks: vec![
                heading(1, "Protocol"),
                heading(2, "Preparation"),
                Block::Table(Table::default()),
                heading(2, "Cell culture"),
                heading(1, "Notes"),
            ],
        };
        assert_eq!(doc.section_after(0).len(), 3);
        assert_eq!(doc.section_after(1).len(), 1);
        assert_eq!(doc.section_after(3).len(), 0);
        assert_eq!(doc.section_after(2).len(), 0);
        assert_eq!(doc.headings(2).count(), 2);
    }

    #[test]
    fn normalized_heading() {
        let h = Heading {
            level: 2,
            content: Content::text_only("  Cell Culture \n"),
        };
        assert_eq!(h.normalized(), "cell culture");
    }
}
