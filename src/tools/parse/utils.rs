use scraper::{ElementRef, Html, Node};

const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

const INDENT: &str = " ";

/// Render the tree one node per line, children indented one step deeper
/// than their parent. Whitespace-only text nodes are dropped.
pub(super) fn prettify_html(html: &Html) -> String {
    let mut out = String::new();
    for child in html.tree.root().children() {
        match ElementRef::wrap(child) {
            Some(element) => write_element(element, 0, &mut out),
            None => write_leaf(child.value(), 0, false, &mut out),
        }
    }
    out
}

fn write_element(element: ElementRef, depth: usize, out: &mut String) {
    let el = element.value();
    let name = el.name();

    let mut open = format!("<{}", name);
    for (attr, value) in el.attrs() {
        open.push(' ');
        open.push_str(attr);
        open.push_str("=\"");
        open.push_str(&html_escape::encode_double_quoted_attribute(value));
        open.push('"');
    }
    open.push('>');
    push_line(out, depth, &open);

    if VOID_ELEMENTS.contains(&name) {
        return;
    }

    let raw_text = RAW_TEXT_ELEMENTS.contains(&name);
    for child in element.children() {
        match ElementRef::wrap(child) {
            Some(child_element) => write_element(child_element, depth + 1, out),
            None => write_leaf(child.value(), depth + 1, raw_text, out),
        }
    }

    push_line(out, depth, &format!("</{}>", name));
}

fn write_leaf(node: &Node, depth: usize, raw_text: bool, out: &mut String) {
    match node {
        Node::Doctype(doctype) => push_line(out, depth, &format!("<!DOCTYPE {}>", doctype.name())),
        Node::Comment(comment) => push_line(out, depth, &format!("<!--{}-->", &**comment)),
        Node::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return;
            }
            if raw_text {
                push_line(out, depth, text);
            } else {
                push_line(out, depth, &html_escape::encode_text(text));
            }
        }
        _ => {}
    }
}

fn push_line(out: &mut String, depth: usize, line: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(line);
    out.push('\n');
}
