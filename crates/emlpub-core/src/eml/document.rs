//! Mutable XML element tree for EML documents
//!
//! `quick-xml` only offers a streaming reader/writer, so the document is
//! materialized into an owned tree that the resolver can walk and the
//! mutator can rewrite in place. Everything outside the root element
//! (declaration, doctype, comments, processing instructions, whitespace)
//! is kept verbatim so a parse/serialize cycle leaves it untouched.

use crate::errors::{EmlError, Result};
use quick_xml::events::{BytesCData, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::str::FromStr;

/// Child indices leading from the root element to a descendant.
/// The empty address denotes the root itself.
pub type NodeAddress = Vec<usize>;

/// Content of an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
}

/// Top-level items surrounding the root element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Misc {
    Declaration(String),
    DocType(String),
    Comment(String),
    ProcessingInstruction(String),
    Whitespace(String),
}

/// A named element with ordered attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: append an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Builder: append a child element
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Builder: append a text node
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Qualified tag name as written, e.g. `eml:eml`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tag name with any namespace prefix removed
    pub fn local_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    /// A path segment matches on either the qualified or the local name
    pub fn matches(&self, segment: &str) -> bool {
        self.name == segment || self.local_name() == segment
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replace the value of `key`, or append it if absent
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn push_child(&mut self, node: Node) {
        self.children.push(node);
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Concatenated text and CDATA content of this element and its descendants
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) | Node::CData(t) => out.push_str(t),
                Node::Element(el) => el.collect_text(out),
                Node::Comment(_) | Node::ProcessingInstruction(_) => {}
            }
        }
    }

    /// Drop all children and make `value` the sole content.
    /// An empty `value` leaves the element childless.
    pub fn set_text(&mut self, value: impl Into<String>) {
        self.children.clear();
        let value = value.into();
        if !value.is_empty() {
            self.children.push(Node::Text(value));
        }
    }

    /// Depth-first, document-order search of the descendants (not `self`)
    /// for the first element matching `segment`. Returns its address
    /// relative to `self`.
    pub fn find_descendant(&self, segment: &str) -> Option<NodeAddress> {
        self.find_descendant_by(&|el: &Element| el.matches(segment))
    }

    /// Like `find_descendant`, but compares the qualified name only
    pub fn find_qualified(&self, name: &str) -> Option<NodeAddress> {
        self.find_descendant_by(&|el: &Element| el.name == name)
    }

    fn find_descendant_by(&self, pred: &dyn Fn(&Element) -> bool) -> Option<NodeAddress> {
        for (idx, child) in self.children.iter().enumerate() {
            if let Node::Element(el) = child {
                if pred(el) {
                    return Some(vec![idx]);
                }
                if let Some(mut rest) = el.find_descendant_by(pred) {
                    rest.insert(0, idx);
                    return Some(rest);
                }
            }
        }
        None
    }

    /// Follow an address produced by one of the find methods
    pub fn descend(&self, address: &[usize]) -> Option<&Element> {
        let mut current = self;
        for &idx in address {
            current = match current.children.get(idx)? {
                Node::Element(el) => el,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn descend_mut(&mut self, address: &[usize]) -> Option<&mut Element> {
        let mut current = self;
        for &idx in address {
            current = match current.children.get_mut(idx)? {
                Node::Element(el) => el,
                _ => return None,
            };
        }
        Some(current)
    }
}

/// A parsed XML document: one root element plus surrounding items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    prolog: Vec<Misc>,
    root: Element,
    epilog: Vec<Misc>,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self {
            prolog: vec![Misc::Declaration(
                r#"xml version="1.0" encoding="UTF-8""#.to_string(),
            )],
            root,
            epilog: Vec::new(),
        }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    pub fn prolog(&self) -> &[Misc] {
        &self.prolog
    }

    /// Parse an XML string into an owned tree
    ///
    /// # Errors
    ///
    /// `EmlError::Parse` for malformed XML, mismatched tags, text outside
    /// the root element, or a document without exactly one root.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let event = reader.read_event()?;
            let outside = if root.is_none() {
                &mut prolog
            } else {
                &mut epilog
            };

            match event {
                Event::Start(e) => stack.push(element_from_start(&e)?),
                Event::Empty(e) => {
                    let el = element_from_start(&e)?;
                    attach(&mut stack, &mut root, el)?;
                }
                Event::End(_) => {
                    let el = stack.pop().ok_or_else(|| parse_error("unexpected end tag"))?;
                    attach(&mut stack, &mut root, el)?;
                }
                Event::Text(t) => {
                    let text = t.unescape()?.into_owned();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Text(text)),
                        None if text.trim().is_empty() => outside.push(Misc::Whitespace(text)),
                        None => return Err(parse_error("text outside the root element")),
                    }
                }
                Event::CData(c) => {
                    let text = String::from_utf8_lossy(&c).into_owned();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::CData(text)),
                        None => return Err(parse_error("CDATA outside the root element")),
                    }
                }
                Event::Comment(c) => {
                    let text = String::from_utf8_lossy(&c).into_owned();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Comment(text)),
                        None => outside.push(Misc::Comment(text)),
                    }
                }
                Event::PI(p) => {
                    let text = String::from_utf8_lossy(&p).into_owned();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::ProcessingInstruction(text)),
                        None => outside.push(Misc::ProcessingInstruction(text)),
                    }
                }
                Event::Decl(d) => {
                    outside.push(Misc::Declaration(String::from_utf8_lossy(&d).into_owned()));
                }
                Event::DocType(d) => {
                    outside.push(Misc::DocType(String::from_utf8_lossy(&d).into_owned()));
                }
                Event::Eof => break,
            }
        }

        if let Some(open) = stack.last() {
            return Err(parse_error(&format!("unclosed element <{}>", open.name)));
        }
        let root = root.ok_or_else(|| parse_error("document has no root element"))?;

        Ok(Self {
            prolog,
            root,
            epilog,
        })
    }

    /// Serialize the tree back to an XML string
    ///
    /// # Errors
    ///
    /// `EmlError::Serialize` if the writer fails.
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        for item in &self.prolog {
            write_misc(&mut writer, item)?;
        }
        write_element(&mut writer, &self.root)?;
        for item in &self.epilog {
            write_misc(&mut writer, item)?;
        }
        String::from_utf8(writer.into_inner()).map_err(|e| EmlError::Serialize {
            message: e.to_string(),
        })
    }
}

impl FromStr for Document {
    type Err = EmlError;

    fn from_str(s: &str) -> Result<Self> {
        Document::parse(s)
    }
}

fn parse_error(message: &str) -> EmlError {
    EmlError::Parse {
        message: message.to_string(),
    }
}

fn element_from_start(start: &BytesStart) -> Result<Element> {
    let mut el = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        el.attributes.push((key, value));
    }
    Ok(el)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, el: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(el));
        return Ok(());
    }
    if root.is_some() {
        return Err(parse_error("document has more than one root element"));
    }
    *root = Some(el);
    Ok(())
}

fn write_failed(err: impl std::fmt::Display) -> EmlError {
    EmlError::Serialize {
        message: err.to_string(),
    }
}

fn write_misc(writer: &mut Writer<Vec<u8>>, item: &Misc) -> Result<()> {
    match item {
        Misc::Declaration(raw) => {
            // Written verbatim so version/encoding/standalone keep their spelling
            writer.get_mut().extend_from_slice(b"<?");
            writer.get_mut().extend_from_slice(raw.as_bytes());
            writer.get_mut().extend_from_slice(b"?>");
            Ok(())
        }
        Misc::DocType(raw) => writer
            .write_event(Event::DocType(BytesText::from_escaped(raw.as_str())))
            .map_err(write_failed),
        Misc::Comment(raw) => writer
            .write_event(Event::Comment(BytesText::from_escaped(raw.as_str())))
            .map_err(write_failed),
        Misc::ProcessingInstruction(raw) => writer
            .write_event(Event::PI(BytesPI::new(raw.as_str())))
            .map_err(write_failed),
        Misc::Whitespace(ws) => {
            writer.get_mut().extend_from_slice(ws.as_bytes());
            Ok(())
        }
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, el: &Element) -> Result<()> {
    let mut start = BytesStart::new(el.name.as_str());
    for (key, value) in &el.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if el.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(write_failed);
    }

    writer
        .write_event(Event::Start(start))
        .map_err(write_failed)?;
    for child in &el.children {
        match child {
            Node::Element(inner) => write_element(writer, inner)?,
            Node::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(write_failed)?,
            Node::CData(text) => writer
                .write_event(Event::CData(BytesCData::new(text.as_str())))
                .map_err(write_failed)?,
            Node::Comment(raw) => writer
                .write_event(Event::Comment(BytesText::from_escaped(raw.as_str())))
                .map_err(write_failed)?,
            Node::ProcessingInstruction(raw) => writer
                .write_event(Event::PI(BytesPI::new(raw.as_str())))
                .map_err(write_failed)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(el.name.as_str())))
        .map_err(write_failed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- exported by the field app -->
<eml:eml xmlns:eml="https://eml.ecoinformatics.org/eml-2.2.0" packageId="edi.1.5" system="edi">
  <dataset>
    <title>Run &amp; return</title>
    <dataTable><entityName>runs</entityName></dataTable>
    <notes><![CDATA[a < b]]></notes>
  </dataset>
</eml:eml>
"#;

    #[test]
    fn test_parse_builds_tree() {
        let doc = Document::parse(SAMPLE).unwrap();
        let root = doc.root();
        assert_eq!(root.name(), "eml:eml");
        assert_eq!(root.local_name(), "eml");
        assert_eq!(root.attribute("packageId"), Some("edi.1.5"));

        let dataset = root.child_elements().next().unwrap();
        assert_eq!(dataset.name(), "dataset");
        let title = dataset.child_elements().next().unwrap();
        assert_eq!(title.text(), "Run & return");
    }

    #[test]
    fn test_prolog_is_preserved() {
        let doc = Document::parse(SAMPLE).unwrap();
        assert!(matches!(doc.prolog()[0], Misc::Declaration(ref d) if d.contains("version=\"1.0\"")));
        assert!(doc
            .prolog()
            .iter()
            .any(|m| matches!(m, Misc::Comment(c) if c.contains("field app"))));
    }

    #[test]
    fn test_serialize_reparse_is_stable() {
        let doc = Document::parse(SAMPLE).unwrap();
        let xml = doc.to_xml_string().unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("Run &amp; return"));
        assert!(xml.contains("<![CDATA[a < b]]>"));

        let reparsed = Document::parse(&xml).unwrap();
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn test_find_descendant_is_depth_first() {
        let root = Element::new("root")
            .with_child(Element::new("a").with_child(Element::new("target").with_text("deep")))
            .with_child(Element::new("target").with_text("shallow"));

        let addr = root.find_descendant("target").unwrap();
        assert_eq!(addr, vec![0, 0]);
        assert_eq!(root.descend(&addr).unwrap().text(), "deep");
    }

    #[test]
    fn test_find_descendant_excludes_self() {
        let root = Element::new("root").with_child(Element::new("leaf"));
        assert!(root.find_descendant("root").is_none());
    }

    #[test]
    fn test_set_attribute_replaces_in_place() {
        let mut el = Element::new("eml:eml")
            .with_attribute("packageId", "edi.1.1")
            .with_attribute("system", "edi");
        el.set_attribute("packageId", "edi.1.2");
        assert_eq!(
            el.attributes(),
            &[
                ("packageId".to_string(), "edi.1.2".to_string()),
                ("system".to_string(), "edi".to_string())
            ]
        );
    }

    #[test]
    fn test_rejects_mismatched_tags() {
        let err = Document::parse("<a><b></a>").unwrap_err();
        assert!(matches!(err, EmlError::Parse { .. }));
    }

    #[test]
    fn test_rejects_missing_root() {
        let err = Document::parse("<?xml version=\"1.0\"?>\n").unwrap_err();
        assert!(matches!(err, EmlError::Parse { .. }));
    }

    #[test]
    fn test_set_empty_text_survives_reparse() {
        let mut doc = Document::parse(r#"<eml:eml packageId="a.1"><t>old</t></eml:eml>"#).unwrap();
        doc.root_mut().descend_mut(&[0]).unwrap().set_text("");
        assert!(doc.root().descend(&[0]).unwrap().children().is_empty());

        let xml = doc.to_xml_string().unwrap();
        assert_eq!(xml, r#"<eml:eml packageId="a.1"><t/></eml:eml>"#);
        assert_eq!(Document::parse(&xml).unwrap(), doc);
    }

    #[test]
    fn test_empty_element_serializes_self_closing() {
        let doc = Document::new(Element::new("eml:eml").with_child(Element::new("dataset")));
        let xml = doc.to_xml_string().unwrap();
        assert!(xml.ends_with("<eml:eml><dataset/></eml:eml>"));
    }
}
