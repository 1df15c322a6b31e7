use anyhow::Context as _;
use base64::Engine as _;
use kuchiki::traits::TendrilSink as _;
use kuchiki::{ElementData, NodeDataRef, NodeRef};
use maud::html;
use serde::Serialize;
use url::Url;

/// Marker class; its presence in a container is what makes re-injection skip.
pub const BUTTON_CLASS: &str = "online-compile-button";
pub const NO_MAIN_CLASS: &str = "online-compile-button--no-main";
pub const CONTAINER_CLASS: &str = "online-compile-container";

pub const DEFAULT_SERVICE_URL: &str = "https://godbolt.org/";
pub const DEFAULT_COMPILER: &str = "clang_trunk";
pub const DEFAULT_OPTIONS: &str = "-std=c++23 -O2";

const CPP_CLASS_TOKENS: [&str; 4] = ["language-cpp", "language-c++", "lang-cpp", "lang-c++"];

/// Linked when a page offers no recognizable snippet.
pub const FALLBACK_PROGRAM: &str = r#"#include <iostream>

int main() {
    std::cout << "Hello, world!\n";
    return 0;
}"#;

#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub service_url: Url,
    pub compiler: String,
    pub options: String,
}

// One compilation "session": empty compiler list, a single executor naming
// the target compiler and flags.
#[derive(Serialize)]
struct ClientState<'a> {
    sessions: Vec<Session<'a>>,
}

#[derive(Serialize)]
struct Session<'a> {
    id: u32,
    language: &'a str,
    source: &'a str,
    compilers: Vec<serde_json::Value>,
    executors: Vec<Executor<'a>>,
}

#[derive(Serialize)]
struct Executor<'a> {
    compiler: ExecutorCompiler<'a>,
}

#[derive(Serialize)]
struct ExecutorCompiler<'a> {
    id: &'a str,
    libs: Vec<serde_json::Value>,
    options: &'a str,
}

/// Builds a clientstate URL for one snippet. The JSON is encoded strictly as
/// UTF-8 bytes, then base64, then percent-escaped for the path segment; any
/// other order corrupts non-ASCII source text.
pub fn build_url(opts: &CompileOptions, source: &str) -> anyhow::Result<String> {
    let state = ClientState {
        sessions: vec![Session {
            id: 1,
            language: "c++",
            source,
            compilers: Vec::new(),
            executors: vec![Executor {
                compiler: ExecutorCompiler {
                    id: &opts.compiler,
                    libs: Vec::new(),
                    options: &opts.options,
                },
            }],
        }],
    };

    let json = serde_json::to_string(&state).context("serialize clientstate")?;
    let b64 = base64::engine::general_purpose::STANDARD.encode(json.as_bytes());
    let encoded: String = url::form_urlencoded::byte_serialize(b64.as_bytes()).collect();

    let base = opts.service_url.as_str().trim_end_matches('/');
    Ok(format!("{base}/clientstate/{encoded}"))
}

/// Trimmed text of the first recognized C++ fenced block under `root`, or the
/// fallback program. A result is always producible.
pub fn extract_snippet(root: &NodeRef) -> String {
    if let Ok(blocks) = root.select("pre > code") {
        for code in blocks {
            if !is_cpp_code_block(&code) {
                continue;
            }
            let text = code.text_contents();
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
    }
    FALLBACK_PROGRAM.to_string()
}

/// Whether the snippet carries a program entry point. Affects only the link's
/// labeling, never the payload.
pub fn has_main(code: &str) -> bool {
    let re = regex::Regex::new(r"\bmain\s*\(").expect("main regex");
    re.is_match(code)
}

/// Appends a compile link to every recognized C++ block's highlight
/// container. Keyed on the marker class, so re-running over already-enhanced
/// output inserts nothing. Returns the number of links added.
pub fn inject_links(document: &NodeRef, opts: &CompileOptions) -> anyhow::Result<usize> {
    let blocks: Vec<_> = match document.select("pre > code") {
        Ok(nodes) => nodes.filter(is_cpp_code_block).collect(),
        Err(()) => Vec::new(),
    };

    let mut injected = 0usize;
    for code_el in blocks {
        let Some(pre) = code_el.as_node().parent() else {
            continue;
        };
        let container = highlight_container(&pre);
        if container.select_first(&format!(".{BUTTON_CLASS}")).is_ok() {
            continue;
        }

        let text = code_el.text_contents();
        let code = text.trim();
        if code.is_empty() {
            continue;
        }

        let url = build_url(opts, code)?;
        container.append(link_node(&url, has_main(code)));
        add_class(&container, CONTAINER_CLASS);
        injected += 1;
    }
    Ok(injected)
}

fn is_cpp_code_block(code: &NodeDataRef<ElementData>) -> bool {
    let attrs = code.attributes.borrow();
    let Some(class) = attrs.get("class") else {
        return false;
    };
    class
        .split_ascii_whitespace()
        .any(|token| CPP_CLASS_TOKENS.contains(&token))
}

// The pre's `.highlight` wrapper when present, else its parent, else the pre
// itself. Mirrors where the host theme puts its own clipboard button.
fn highlight_container(pre: &NodeRef) -> NodeRef {
    for node in pre.inclusive_ancestors() {
        if has_class(&node, "highlight") {
            return node;
        }
    }
    pre.parent().unwrap_or_else(|| pre.clone())
}

fn link_node(href: &str, complete: bool) -> NodeRef {
    let title = if complete {
        "Compile online (opens Compiler Explorer)"
    } else {
        "Compile online (snippet may need a main function)"
    };
    let class = if complete {
        format!("md-button {BUTTON_CLASS}")
    } else {
        format!("md-button {BUTTON_CLASS} {NO_MAIN_CLASS}")
    };
    let markup = html! {
        a class=(class) href=(href) target="_blank" rel="noopener noreferrer"
            title=(title) aria-label=(title) {
            "Compile online"
        }
    };
    let doc = kuchiki::parse_html().one(markup.into_string());
    doc.select_first("a").unwrap().as_node().clone()
}

fn has_class(node: &NodeRef, class: &str) -> bool {
    let Some(el) = node.as_element() else {
        return false;
    };
    let attrs = el.attributes.borrow();
    attrs
        .get("class")
        .is_some_and(|c| c.split_ascii_whitespace().any(|t| t == class))
}

fn add_class(node: &NodeRef, class: &str) {
    let Some(el) = node.as_element() else {
        return;
    };
    let mut attrs = el.attributes.borrow_mut();
    let current = attrs.get("class").unwrap_or("").to_string();
    if current.split_ascii_whitespace().any(|t| t == class) {
        return;
    }
    let updated = if current.is_empty() {
        class.to_string()
    } else {
        format!("{current} {class}")
    };
    attrs.insert("class", updated);
}
