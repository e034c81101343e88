// Common test utilities
//
// An in-memory fake DOM implementing the Page capability, so helpers can be
// tested without a browser. It understands the small CSS subset the helpers
// and tests use (tag, #id, [attr], [attr=value], descendant combinator,
// selector lists) and the scripts the frame helpers run.

// Note: Items appear "unused" because each test binary compiles separately,
// but they ARE used across multiple test files. Suppress false-positive warnings.
#![allow(dead_code)]

use async_trait::async_trait;
use pageassert_rs::page::accessible_name_matches;
use pageassert_rs::{AccessibleRole, ElementHandle, Error, Page, Result, frames};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Bytes returned by FakePage::screenshot (PNG signature).
pub const FAKE_PNG: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// Initialize tracing subscriber for tests
///
/// Respects RUST_LOG, defaulting to warnings only.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Element description used to build fake documents.
#[derive(Debug, Clone, Default)]
pub struct El {
    tag: String,
    attrs: Vec<(String, String)>,
    text: String,
    checked: bool,
    value: Option<String>,
}

pub fn el(tag: &str) -> El {
    El {
        tag: tag.to_string(),
        ..Default::default()
    }
}

impl El {
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Current form value (the `value` property).
    pub fn value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }
}

pub fn checkbox(id: &str, checked: bool) -> El {
    el("input").attr("type", "checkbox").id(id).checked(checked)
}

pub fn radio(id: &str, name: &str, value: &str) -> El {
    el("input")
        .attr("type", "radio")
        .id(id)
        .attr("name", name)
        .attr("value", value)
}

#[derive(Debug, Clone)]
struct Node {
    el: El,
    parent: Option<usize>,
    children: Vec<usize>,
    /// Document index of an iframe's content.
    content: Option<usize>,
    /// Body markup written by a script, replacing the children.
    raw_html: Option<String>,
}

#[derive(Debug, Default)]
struct Document {
    nodes: Vec<Node>,
}

impl Document {
    fn new() -> Self {
        let body = Node {
            el: el("body"),
            parent: None,
            children: Vec::new(),
            content: None,
            raw_html: None,
        };
        Document { nodes: vec![body] }
    }

    fn attr(&self, node: usize, name: &str) -> Option<&str> {
        self.nodes[node]
            .el
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn set_attr(&mut self, node: usize, name: &str, value: &str) {
        let attrs = &mut self.nodes[node].el.attrs;
        match attrs.iter().position(|(k, _)| k == name) {
            Some(i) => attrs[i].1 = value.to_string(),
            None => attrs.push((name.to_string(), value.to_string())),
        }
    }

    /// Descendants of `scope` in document order (excluding `scope`).
    fn descendants(&self, scope: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.nodes[scope].children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.nodes[node].children.iter().rev().copied());
        }
        out
    }

    fn text(&self, node: usize) -> String {
        let mut parts = Vec::new();
        if !self.nodes[node].el.text.is_empty() {
            parts.push(self.nodes[node].el.text.clone());
        }
        for child in &self.nodes[node].children {
            let text = self.text(*child);
            if !text.is_empty() {
                parts.push(text);
            }
        }
        parts.join(" ")
    }

    /// The `value` property: set value, else the attribute, else "on" for
    /// checkable inputs.
    fn value(&self, node: usize) -> Option<String> {
        let el = &self.nodes[node].el;
        el.value
            .clone()
            .or_else(|| self.attr(node, "value").map(str::to_string))
            .or_else(|| {
                let checkable = matches!(self.attr(node, "type"), Some("radio" | "checkbox"));
                (el.tag == "input" && checkable).then(|| "on".to_string())
            })
    }

    fn is_radio(&self, node: usize) -> bool {
        self.nodes[node].el.tag == "input" && self.attr(node, "type") == Some("radio")
    }

    fn check(&mut self, node: usize) {
        if self.is_radio(node) {
            let group = self.attr(node, "name").map(str::to_string);
            for other in self.descendants(0) {
                if self.is_radio(other) && self.attr(other, "name").map(str::to_string) == group {
                    self.nodes[other].el.checked = false;
                }
            }
        }
        self.nodes[node].el.checked = true;
    }

    fn select(&self, selector: &str, scope: usize) -> Vec<usize> {
        let groups: Vec<Vec<Compound>> = split_list(selector)
            .iter()
            .map(|group| split_descendants(group).iter().map(|c| Compound::parse(c)).collect())
            .collect();
        self.descendants(scope)
            .into_iter()
            .filter(|node| groups.iter().any(|chain| self.matches_chain(*node, chain)))
            .collect()
    }

    fn matches_chain(&self, node: usize, chain: &[Compound]) -> bool {
        let Some((last, rest)) = chain.split_last() else {
            return false;
        };
        if !last.matches(self, node) {
            return false;
        }
        if rest.is_empty() {
            return true;
        }
        let mut ancestor = self.nodes[node].parent;
        while let Some(a) = ancestor {
            if self.matches_chain(a, rest) {
                return true;
            }
            ancestor = self.nodes[a].parent;
        }
        false
    }
}

/// One compound selector: `tag#id[attr][attr=value]`.
#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    attrs: Vec<(String, Option<String>)>,
}

impl Compound {
    fn parse(source: &str) -> Self {
        let chars: Vec<char> = source.chars().collect();
        let mut compound = Compound::default();
        let mut i = 0;

        let tag: String = chars
            .iter()
            .take_while(|c| c.is_ascii_alphanumeric() || **c == '-' || **c == '*')
            .collect();
        i += tag.len();
        if !tag.is_empty() && tag != "*" {
            compound.tag = Some(tag);
        }

        while i < chars.len() {
            match chars[i] {
                '#' => {
                    i += 1;
                    let id: String = chars[i..]
                        .iter()
                        .take_while(|c| c.is_ascii_alphanumeric() || **c == '-' || **c == '_')
                        .collect();
                    i += id.len();
                    compound.attrs.push(("id".to_string(), Some(id)));
                }
                '[' => {
                    i += 1;
                    let name: String = chars[i..]
                        .iter()
                        .take_while(|c| **c != '=' && **c != ']')
                        .collect();
                    i += name.len();
                    let mut value = None;
                    if chars[i] == '=' {
                        i += 1;
                        let mut v = String::new();
                        if chars[i] == '"' {
                            i += 1;
                            while chars[i] != '"' {
                                if chars[i] == '\\' {
                                    i += 1;
                                }
                                v.push(chars[i]);
                                i += 1;
                            }
                            i += 1;
                        } else {
                            while chars[i] != ']' {
                                v.push(chars[i]);
                                i += 1;
                            }
                        }
                        value = Some(v);
                    }
                    assert_eq!(chars[i], ']', "unsupported selector: {}", source);
                    i += 1;
                    compound.attrs.push((name.trim().to_string(), value));
                }
                other => panic!("unsupported selector character '{}' in {}", other, source),
            }
        }
        compound
    }

    fn matches(&self, doc: &Document, node: usize) -> bool {
        if let Some(tag) = &self.tag {
            if &doc.nodes[node].el.tag != tag {
                return false;
            }
        }
        self.attrs.iter().all(|(name, value)| match (doc.attr(node, name), value) {
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == expected,
            (None, _) => false,
        })
    }
}

/// Splits on commas outside brackets.
fn split_list(selector: &str) -> Vec<String> {
    split_outside_brackets(selector, |c| c == ',')
}

/// Splits on whitespace outside brackets.
fn split_descendants(selector: &str) -> Vec<String> {
    split_outside_brackets(selector, char::is_whitespace)
}

fn split_outside_brackets(selector: &str, is_separator: impl Fn(char) -> bool) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0;
    let mut in_quotes = false;
    let mut escaped = false;
    for c in selector.chars() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            in_quotes = !in_quotes;
        } else if !in_quotes && c == '[' {
            depth += 1;
        } else if !in_quotes && c == ']' {
            depth -= 1;
        } else if depth == 0 && !in_quotes && is_separator(c) {
            if !current.trim().is_empty() {
                parts.push(current.trim().to_string());
            }
            current.clear();
            continue;
        }
        current.push(c);
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

#[derive(Debug, Default)]
struct State {
    docs: Vec<Document>,
    url: String,
    active: usize,
    frame_log: Vec<Option<String>>,
    clicks: Vec<String>,
    screenshots: usize,
    window_size: Option<(u32, u32)>,
    fail_scripts: bool,
}

/// Handle to a node of a fake document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRef {
    doc: usize,
    node: usize,
}

/// In-memory Page.
#[derive(Clone)]
pub struct FakePage {
    state: Arc<Mutex<State>>,
}

impl FakePage {
    pub fn new(url: &str) -> Self {
        let state = State {
            docs: vec![Document::new()],
            url: url.to_string(),
            ..Default::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Body of the top-level document.
    pub fn body(&self) -> NodeRef {
        NodeRef { doc: 0, node: 0 }
    }

    /// Appends an element under `parent` and returns it.
    pub fn append(&self, parent: NodeRef, el: El) -> NodeRef {
        let mut state = self.state.lock().unwrap();
        let doc = &mut state.docs[parent.doc];
        let node = doc.nodes.len();
        doc.nodes.push(Node {
            el,
            parent: Some(parent.node),
            children: Vec::new(),
            content: None,
            raw_html: None,
        });
        doc.nodes[parent.node].children.push(node);
        NodeRef {
            doc: parent.doc,
            node,
        }
    }

    /// Appends an iframe under `parent`; returns the iframe and its body.
    pub fn append_iframe(&self, parent: NodeRef, iframe: El) -> (NodeRef, NodeRef) {
        let frame = self.append(parent, iframe);
        let mut state = self.state.lock().unwrap();
        let content = state.docs.len();
        state.docs.push(Document::new());
        state.docs[frame.doc].nodes[frame.node].content = Some(content);
        (frame, NodeRef { doc: content, node: 0 })
    }

    /// Appends a table with one row per entry; returns the rows.
    pub fn table(&self, parent: NodeRef, rows: &[&str]) -> Vec<NodeRef> {
        let table = self.append(parent, el("table"));
        rows.iter()
            .map(|text| self.append(table, el("tr").text(text)))
            .collect()
    }

    pub fn attr(&self, node: NodeRef, name: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.docs[node.doc].attr(node.node, name).map(str::to_string)
    }

    pub fn is_checked(&self, node: NodeRef) -> bool {
        self.state.lock().unwrap().docs[node.doc].nodes[node.node].el.checked
    }

    /// Markup of a body as last written by a script.
    pub fn body_html(&self, body: NodeRef) -> Option<String> {
        self.state.lock().unwrap().docs[body.doc].nodes[body.node]
            .raw_html
            .clone()
    }

    /// Whether the fake is currently inside an iframe.
    pub fn in_frame(&self) -> bool {
        self.state.lock().unwrap().active != 0
    }

    /// Every switch_frame call that succeeded, in order.
    pub fn frame_log(&self) -> Vec<Option<String>> {
        self.state.lock().unwrap().frame_log.clone()
    }

    /// Ids of clicked elements, in order.
    pub fn clicks(&self) -> Vec<String> {
        self.state.lock().unwrap().clicks.clone()
    }

    pub fn screenshots(&self) -> usize {
        self.state.lock().unwrap().screenshots
    }

    pub fn window_size(&self) -> Option<(u32, u32)> {
        self.state.lock().unwrap().window_size
    }

    /// Makes every execute_script call fail with a driver error.
    pub fn fail_scripts(&self) {
        self.state.lock().unwrap().fail_scripts = true;
    }

    fn handles(&self, doc: usize, nodes: Vec<usize>) -> Vec<Box<dyn ElementHandle>> {
        nodes
            .into_iter()
            .map(|node| {
                Box::new(FakeElement {
                    state: Arc::clone(&self.state),
                    at: NodeRef { doc, node },
                }) as Box<dyn ElementHandle>
            })
            .collect()
    }
}

#[async_trait]
impl Page for FakePage {
    async fn find_elements(&self, selector: &str) -> Result<Vec<Box<dyn ElementHandle>>> {
        let (doc, nodes) = {
            let state = self.state.lock().unwrap();
            (state.active, state.docs[state.active].select(selector, 0))
        };
        Ok(self.handles(doc, nodes))
    }

    async fn find_by_role(
        &self,
        role: AccessibleRole,
        name: &str,
    ) -> Result<Vec<Box<dyn ElementHandle>>> {
        if !matches!(role, AccessibleRole::Radio | AccessibleRole::Checkbox) {
            panic!("fake page does not support role {}", role);
        }
        let (doc, nodes) = {
            let state = self.state.lock().unwrap();
            let document = &state.docs[state.active];
            let nodes = document
                .select(role.selector(), 0)
                .into_iter()
                .filter(|node| {
                    let id = document.attr(*node, "id");
                    let mut labels: Vec<String> = ["aria-label", "title"]
                        .iter()
                        .filter_map(|a| document.attr(*node, a).map(str::to_string))
                        .collect();
                    if let Some(id) = id {
                        for label in document.select("label", 0) {
                            if document.attr(label, "for") == Some(id) {
                                labels.push(document.text(label));
                            }
                        }
                    }
                    accessible_name_matches(name, id, document.attr(*node, "name"), &labels)
                })
                .collect();
            (state.active, nodes)
        };
        Ok(self.handles(doc, nodes))
    }

    async fn execute_script(&self, code: &str, args: Vec<Value>) -> Result<Value> {
        let mut state = self.state.lock().unwrap();
        if state.fail_scripts {
            return Err(Error::Driver("javascript error: script failed".to_string()));
        }
        let active = state.active;
        let doc = &mut state.docs[active];
        let arg = |i: usize| args.get(i).and_then(Value::as_str).unwrap_or_default().to_string();

        if code == frames::ASSIGN_IFRAME_ID_SCRIPT {
            let container = doc
                .descendants(0)
                .into_iter()
                .find(|node| doc.attr(*node, "id") == Some(arg(0).as_str()));
            let Some(container) = container else {
                return Ok(Value::from(frames::SCRIPT_MISSING_CONTAINER));
            };
            let iframe = doc
                .descendants(container)
                .into_iter()
                .find(|node| doc.nodes[*node].el.tag == "iframe");
            let Some(iframe) = iframe else {
                return Ok(Value::from(frames::SCRIPT_MISSING_IFRAME));
            };
            doc.set_attr(iframe, "id", &arg(1));
            return Ok(Value::from(frames::SCRIPT_OK));
        }

        if code == frames::REPLACE_BODY_SCRIPT {
            doc.nodes[0].children.clear();
            doc.nodes[0].raw_html = Some(format!("<p>{}</p>", arg(0)));
            return Ok(Value::Null);
        }

        Err(Error::Driver(format!("fake page cannot run script: {}", code)))
    }

    async fn switch_frame(&self, name: Option<&str>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let Some(name) = name else {
            state.active = 0;
            state.frame_log.push(None);
            return Ok(());
        };

        let doc = &state.docs[state.active];
        let content = doc
            .descendants(0)
            .into_iter()
            .find(|node| {
                doc.nodes[*node].el.tag == "iframe"
                    && (doc.attr(*node, "id") == Some(name) || doc.attr(*node, "name") == Some(name))
            })
            .and_then(|node| doc.nodes[node].content);

        match content {
            Some(content) => {
                state.active = content;
                state.frame_log.push(Some(name.to_string()));
                Ok(())
            }
            None => Err(Error::FrameNotFound {
                name: name.to_string(),
                location: state.url.clone(),
            }),
        }
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.state.lock().unwrap().url.clone())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        self.state.lock().unwrap().screenshots += 1;
        Ok(FAKE_PNG.to_vec())
    }

    async fn set_window_size(&self, width: u32, height: u32) -> Result<()> {
        self.state.lock().unwrap().window_size = Some((width, height));
        Ok(())
    }
}

/// Element of a fake document.
pub struct FakeElement {
    state: Arc<Mutex<State>>,
    at: NodeRef,
}

#[async_trait]
impl ElementHandle for FakeElement {
    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        let state = self.state.lock().unwrap();
        Ok(state.docs[self.at.doc].attr(self.at.node, name).map(str::to_string))
    }

    async fn text(&self) -> Result<String> {
        let state = self.state.lock().unwrap();
        Ok(state.docs[self.at.doc].text(self.at.node))
    }

    async fn is_checked(&self) -> Result<bool> {
        let state = self.state.lock().unwrap();
        Ok(state.docs[self.at.doc].nodes[self.at.node].el.checked)
    }

    async fn check(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.docs[self.at.doc].check(self.at.node);
        Ok(())
    }

    async fn click(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let id = state.docs[self.at.doc]
            .attr(self.at.node, "id")
            .unwrap_or_default()
            .to_string();
        state.clicks.push(id);
        let doc = &mut state.docs[self.at.doc];
        if doc.is_radio(self.at.node) {
            doc.check(self.at.node);
        } else {
            let checked = doc.nodes[self.at.node].el.checked;
            doc.nodes[self.at.node].el.checked = !checked;
        }
        Ok(())
    }

    async fn select_value(&self, value: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let id = state.docs[self.at.doc]
            .attr(self.at.node, "id")
            .unwrap_or_default()
            .to_string();
        state.clicks.push(id);
        let doc = &mut state.docs[self.at.doc];
        if doc.nodes[self.at.node].el.tag == "select" {
            doc.nodes[self.at.node].el.value = Some(value.to_string());
            return Ok(());
        }
        if doc.value(self.at.node).unwrap_or_default() == value {
            doc.check(self.at.node);
            return Ok(());
        }
        let group = doc.attr(self.at.node, "name").map(str::to_string);
        let target = doc.descendants(0).into_iter().find(|node| {
            doc.is_radio(*node)
                && doc.attr(*node, "name").map(str::to_string) == group
                && doc.value(*node).as_deref() == Some(value)
        });
        match target {
            Some(node) => {
                doc.check(node);
                Ok(())
            }
            None => Err(Error::Driver(format!("no radio with value {}", value))),
        }
    }

    async fn value(&self) -> Result<Option<String>> {
        let state = self.state.lock().unwrap();
        Ok(state.docs[self.at.doc].value(self.at.node))
    }

    async fn find_elements(&self, selector: &str) -> Result<Vec<Box<dyn ElementHandle>>> {
        let nodes = {
            let state = self.state.lock().unwrap();
            state.docs[self.at.doc].select(selector, self.at.node)
        };
        Ok(nodes
            .into_iter()
            .map(|node| {
                Box::new(FakeElement {
                    state: Arc::clone(&self.state),
                    at: NodeRef {
                        doc: self.at.doc,
                        node,
                    },
                }) as Box<dyn ElementHandle>
            })
            .collect())
    }
}
