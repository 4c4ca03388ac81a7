#[cfg(test)]
mod tests {
    use crate::tools::parse::{find_within, stripped_text, Document, Query};

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Listing</title></head>
<body>
  <div id="desc_div"><iframe src="https://vi.vipr.ebaystatic.com/desc/1"></iframe></div>
  <div class="vi_descsnpt_holder snippet">  Mint   condition,
     barely used  </div>
  <ul>
    <li class="s-item">one</li>
    <li class="s-item featured">two</li>
    <li>three</li>
  </ul>
  <p>a &amp; b</p>
</body>
</html>"#;

    #[test]
    fn parse_rejects_blank_content() {
        assert!(Document::parse("").is_err());
        assert!(Document::parse(" \n\t ").is_err());
    }

    #[test]
    fn find_by_tag_and_id() {
        let doc = Document::parse(PAGE).unwrap();
        let div = doc.find(&Query::tag("div").id("desc_div")).unwrap();
        let iframe = find_within(div, &Query::tag("iframe")).unwrap();
        assert_eq!(
            iframe.value().attr("src"),
            Some("https://vi.vipr.ebaystatic.com/desc/1")
        );
    }

    #[test]
    fn find_missing_returns_none() {
        let doc = Document::parse(PAGE).unwrap();
        assert!(doc.find(&Query::tag("div").id("nope")).is_none());
        assert!(doc.find(&Query::tag("table")).is_none());
    }

    #[test]
    fn find_all_by_class_keeps_document_order() {
        let doc = Document::parse(PAGE).unwrap();
        let items = doc.find_all(&Query::tag("li").class("s-item"));
        let texts: Vec<String> = items.iter().map(stripped_text).collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[test]
    fn class_match_is_per_token() {
        let doc = Document::parse(PAGE).unwrap();
        assert_eq!(doc.find_all(&Query::tag("li").class("featured")).len(), 1);
        assert!(doc.find(&Query::tag("li").class("s-ite")).is_none());
    }

    #[test]
    fn stripped_text_keeps_inner_whitespace() {
        let doc = Document::parse(PAGE).unwrap();
        let snippet = doc.find(&Query::tag("div").class("vi_descsnpt_holder")).unwrap();
        assert_eq!(stripped_text(&snippet), "Mint   condition,\n     barely used");
    }

    #[test]
    fn prettify_indents_and_escapes() {
        let doc = Document::parse(PAGE).unwrap();
        let pretty = doc.prettify();
        assert!(pretty.starts_with("<!DOCTYPE html>\n<html>\n"));
        assert!(pretty.contains("\n <head>\n  <title>\n   Listing\n  </title>\n </head>\n"));
        assert!(pretty.contains("a &amp; b"));
        assert!(pretty.trim_end().ends_with("</html>"));
    }

    #[test]
    fn prettify_leaves_script_text_raw() {
        let doc = Document::parse("<html><body><script>if (a < b) { go(); }</script></body></html>").unwrap();
        let pretty = doc.prettify();
        assert!(pretty.contains("if (a < b) { go(); }"));
    }

    #[test]
    fn prettify_void_elements_have_no_closing_tag() {
        let doc = Document::parse(r#"<html><body><img src="a.jpg"><br></body></html>"#).unwrap();
        let pretty = doc.prettify();
        assert!(pretty.contains("<img src=\"a.jpg\">"));
        assert!(!pretty.contains("</img>"));
        assert!(!pretty.contains("</br>"));
    }
}
