//! HTML-structure adapter.
//!
//! Builds the [`Document`] model from notebook HTML using `html5ever` with the
//! reference-counted DOM from `markup5ever_rcdom`. Parsing is lenient; malformed
//! markup yields whatever structure the HTML5 tree builder recovers.

use html5ever::parse_document as parse_html;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::document::{Block, Content, Document, Heading, Inline, Link, List, Row, Table};

/// Parses an HTML body (fragment or full document) into a [`Document`].
#[must_use]
pub fn parse_document(html: &str) -> Document {
    let dom = parse_html(RcDom::default(), Default::default()).one(html);
    let mut blocks = Vec::new();
    collect_blocks(&dom.document, &mut blocks);
    Document { blocks }
}

/// Replaces each configured person name with `Anonymous Person<n>`, `n` counting from 1.
#[must_use]
pub fn pseudonymize(body: &str, names: &[String]) -> String {
    let mut out = body.to_owned();
    for (i, name) in names.iter().enumerate().filter(|(_, n)| !n.is_empty()) {
        out = out.replace(name.as_str(), &format!("Anonymous Person{}", i + 1));
    }
    out
}

enum Kind {
    Heading(u8),
    Paragraph,
    List(bool),
    Table,
    Container,
    Skip,
    Inline,
}

fn kind(tag: &str) -> Kind {
    match tag {
        "h1" => Kind::Heading(1),
        "h2" => Kind::Heading(2),
        "h3" => Kind::Heading(3),
        "h4" => Kind::Heading(4),
        "h5" => Kind::Heading(5),
        "h6" => Kind::Heading(6),
        "p" | "pre" | "blockquote" | "figcaption" | "dt" | "dd" => Kind::Paragraph,
        "ul" => Kind::List(false),
        "ol" => Kind::List(true),
        "table" => Kind::Table,
        "html" | "body" | "div" | "section" | "article" | "main" | "header" | "footer"
        | "nav" | "aside" | "figure" | "dl" | "center" => Kind::Container,
        "head" | "script" | "style" | "template" | "noscript" | "title" | "meta" | "link" => {
            Kind::Skip
        }
        _ => Kind::Inline,
    }
}

fn element_name(handle: &Handle) -> Option<String> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

fn attribute(handle: &Handle, attr: &str) -> Option<String> {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == attr)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

fn collect_blocks(handle: &Handle, out: &mut Vec<Block>) {
    let mut pending: Vec<Inline> = Vec::new();
    for child in handle.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => push_text(&mut pending, &contents.borrow()),
            NodeData::Element { .. } => {
                let tag = element_name(child).unwrap_or_default();
                match kind(&tag) {
                    Kind::Inline => push_inline_element(child, &tag, &mut pending),
                    Kind::Skip => {}
                    Kind::Container => {
                        flush(&mut pending, out);
                        collect_blocks(child, out);
                    }
                    _ => {
                        flush(&mut pending, out);
                        if let Some(block) = block(child, &tag) {
                            out.push(block);
                        }
                    }
                }
            }
            _ => {}
        }
    }
    flush(&mut pending, out);
}

fn flush(pending: &mut Vec<Inline>, out: &mut Vec<Block>) {
    let blank = pending.iter().all(|i| match i {
        Inline::Text(t) => t.trim().is_empty(),
        _ => false,
    });
    if !blank {
        out.push(Block::Paragraph(Content::new(std::mem::take(pending))));
    }
    pending.clear();
}

fn block(handle: &Handle, tag: &str) -> Option<Block> {
    match kind(tag) {
        Kind::Heading(level) => Some(Block::Heading(Heading {
            level,
            content: inline_content(handle),
        })),
        Kind::Paragraph => Some(Block::Paragraph(inline_content(handle))),
        Kind::List(ordered) => Some(Block::List(list(handle, ordered))),
        Kind::Table => Some(Block::Table(table(handle))),
        _ => None,
    }
}

fn list(handle: &Handle, ordered: bool) -> List {
    let items = handle
        .children
        .borrow()
        .iter()
        .filter(|c| element_name(c).as_deref() == Some("li"))
        .map(inline_content)
        .collect();
    List { ordered, items }
}

fn table(handle: &Handle) -> Table {
    let mut rows = Vec::new();
    collect_rows(handle, &mut rows);
    Table { rows }
}

fn collect_rows(handle: &Handle, rows: &mut Vec<Row>) {
    for child in handle.children.borrow().iter() {
        match element_name(child).as_deref() {
            Some("tr") => {
                let cells = child
                    .children
                    .borrow()
                    .iter()
                    .filter(|c| matches!(element_name(c).as_deref(), Some("td" | "th")))
                    .map(inline_content)
                    .collect();
                rows.push(Row { cells });
            }
            Some("thead" | "tbody" | "tfoot") => collect_rows(child, rows),
            _ => {}
        }
    }
}

fn inline_content(handle: &Handle) -> Content {
    let mut inlines = Vec::new();
    collect_inlines(handle, &mut inlines);
    Content::new(inlines)
}

fn collect_inlines(handle: &Handle, out: &mut Vec<Inline>) {
    for child in handle.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => push_text(out, &contents.borrow()),
            NodeData::Element { .. } => {
                let tag = element_name(child).unwrap_or_default();
                match kind(&tag) {
                    Kind::Inline => push_inline_element(child, &tag, out),
                    Kind::Skip => {}
                    Kind::Container => {
                        let mut blocks = Vec::new();
                        collect_blocks(child, &mut blocks);
                        out.extend(blocks.into_iter().map(|b| Inline::Block(Box::new(b))));
                    }
                    _ => {
                        if let Some(block) = block(child, &tag) {
                            out.push(Inline::Block(Box::new(block)));
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

fn push_inline_element(handle: &Handle, tag: &str, out: &mut Vec<Inline>) {
    if tag == "a" {
        out.push(Inline::Link(Link {
            href: attribute(handle, "href").unwrap_or_default(),
            content: inline_content(handle),
        }));
    } else {
        // Formatting elements (span, strong, em, sub, sup, ...) are flattened.
        collect_inlines(handle, out);
    }
}

fn push_text(out: &mut Vec<Inline>, text: &str) {
    if let Some(Inline::Text(last)) = out.last_mut() {
        last.push_str(text);
    } else {
        out.push(Inline::Text(text.to_owned()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"
<h1>General information</h1>
<table><tbody>
  <tr><td>Researcher</td><td>Jane Doe</td></tr>
  <tr><td>Objective</td><td>Measure <strong>calcium</strong></td></tr>
</tbody></table>
<h1>Protocol</h1>
<h2>Preparation</h2>
<ul><li><a href="Database/Chemical - PBS.html">PBS</a> LOT 123</li></ul>
<table>
  <tr><th>Description</th><th>Start</th></tr>
  <tr><td>Wash cells<ul><li>one</li><li>two<ol><li>deep</li></ol></li></ul></td><td>10:00</td></tr>
</table>
<script>alert(1)</script>
"#;

    #[test]
    fn block_structure() {
        let doc = parse_document(BODY);
        let kinds: Vec<&str> = doc
            .blocks
            .iter()
            .map(|b| match b {
                Block::Heading(_) => "h",
                Block::Paragraph(_) => "p",
                Block::List(_) => "l",
                Block::Table(_) => "t",
            })
            .collect();
        assert_eq!(kinds, ["h", "t", "h", "h", "l", "t"]);
    }

    #[test]
    fn table_cells_and_inline_flattening() {
        let doc = parse_document(BODY);
        let table = doc.first_table().map(|t| t.rows.clone()).unwrap_or_default();
        assert_eq!(table.len(), 2);
        assert_eq!(table[1].cells[1].text(), "Measure calcium");
    }

    #[test]
    fn nested_lists_in_cells_are_kept() {
        let doc = parse_document(BODY);
        let steps = doc.blocks[5].as_table().map(|t| t.rows.clone()).unwrap_or_default();
        let description = &steps[1].cells[0];
        assert!(description.has_nested_list());
        assert_eq!(description.fragments().len(), 3);
        assert_eq!(steps[1].cells[1].text(), "10:00");
    }

    #[test]
    fn links_carry_href() {
        let doc = parse_document(BODY);
        let list = doc.blocks[4].as_list().map(|l| l.items.clone()).unwrap_or_default();
        let links = list[0].links();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].href, "Database/Chemical - PBS.html");
        assert_eq!(list[0].text_without_links().trim(), "LOT 123");
    }

    #[test]
    fn pseudonymize_numbers_from_one() {
        let names = vec!["Jane Doe".to_owned(), "John Roe".to_owned()];
        let out = pseudonymize("Jane Doe and John Roe", &names);
        assert_eq!(out, "Anonymous Person1 and Anonymous Person2");
    }
}
