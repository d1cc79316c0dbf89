//! htmlmatch command-line tool
//!
//! Parses a full document and a pattern fragment verbatim and reports whether
//! the pattern is contained in the document.
//!
//! - htmlmatch page.html pattern.html   # exit 0 on match, 1 otherwise
//! - htmlmatch --html '<p>x</p>' --tree # dump the parsed tree
//!
//! Paths fill the full and pattern slots in that order, skipping a slot that
//! is already given inline, so `--html '<p>x</p>' pattern.html` reads the
//! pattern from the file.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use htmlmatch::contains_tree;
use htmlmatch_common::warning::{Component, warn_once};
use htmlmatch_dom::{DomTree, NodeRef, NodeType};
use htmlmatch_html::{HTMLTokenizer, TokenizerOptions, parse_verbatim_bytes};
use owo_colors::OwoColorize;
use serde_json::{Map, Value, json};

/// htmlmatch - ordered subtree containment for HTML fragments
#[derive(Parser, Debug)]
#[command(name = "htmlmatch")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Check a page against a pattern
    htmlmatch page.html pattern.html

    # Inline markup
    htmlmatch --html '<ul><li>a</li><li>b</li></ul>' --pattern-html '<li>b</li>'

    # Inline document, pattern from a file
    htmlmatch --html '<ul><li>a</li></ul>' pattern.html

    # Show how a fragment is tokenized and built
    htmlmatch --html '<tr><td>a1</td></tr>' --tokens --tree

    # Text prefixes in patterns
    htmlmatch page.html --pattern-html '<div>substring:ipsum</div>'
"#)]
struct Cli {
    /// Paths to the full document and the pattern fragment
    #[arg(value_name = "FULL|PATTERN", num_args = 0..=2)]
    paths: Vec<PathBuf>,

    /// Full document markup given inline
    #[arg(long, value_name = "MARKUP")]
    html: Option<String>,

    /// Pattern markup given inline
    #[arg(long, value_name = "MARKUP")]
    pattern_html: Option<String>,

    /// Print the token stream of the full document
    #[arg(long)]
    tokens: bool,

    /// Print the parsed trees
    #[arg(long)]
    tree: bool,

    /// Print the full tree as JSON
    #[arg(long)]
    json: bool,

    /// Largest number of bytes a single token may span
    #[arg(long, value_name = "BYTES")]
    max_buffer: Option<usize>,
}

impl Cli {
    fn options(&self) -> TokenizerOptions {
        TokenizerOptions {
            max_buffer: self.max_buffer,
        }
    }

    /// Where the full document and the pattern come from. Inline markup
    /// takes its slot first; paths fill the remaining slots in order.
    fn sources(&self) -> anyhow::Result<(Option<Source<'_>>, Option<Source<'_>>)> {
        let mut paths = self.paths.iter().map(|path| Source::File(path.as_path()));
        let full = self.html.as_deref().map(Source::Inline).or_else(|| paths.next());
        let pattern = self
            .pattern_html
            .as_deref()
            .map(Source::Inline)
            .or_else(|| paths.next());
        if let Some(extra) = paths.next() {
            anyhow::bail!("unexpected argument {extra}: both inputs are already given");
        }
        Ok((full, pattern))
    }
}

/// One input document.
#[derive(Debug, PartialEq, Eq)]
enum Source<'a> {
    Inline(&'a str),
    File(&'a Path),
}

impl Source<'_> {
    fn read(&self) -> anyhow::Result<Vec<u8>> {
        match self {
            Self::Inline(markup) => Ok(markup.as_bytes().to_vec()),
            Self::File(path) => {
                fs::read(path).with_context(|| format!("failed to read {}", path.display()))
            }
        }
    }
}

impl fmt::Display for Source<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline(_) => write!(f, "<inline markup>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let options = cli.options();

    let (full_source, pattern_source) = cli.sources()?;
    let full_markup = full_source
        .context("a full document is required (FULL or --html)")?
        .read()?;
    let pattern_markup = pattern_source.map(|source| source.read()).transpose()?;

    if cli.tokens {
        println!("=== Tokens ===");
        for token in HTMLTokenizer::from_bytes(&full_markup, options) {
            let token = token.context("failed to tokenize full document")?;
            println!("{token}");
        }
        println!();
    }

    let full =
        parse_verbatim_bytes(&full_markup, options).context("failed to parse full document")?;

    if cli.tree {
        println!("=== Full Tree ===");
        print!("{full}");
    }
    if cli.json {
        let json = node_to_json(full.document());
        println!("{}", serde_json::to_string_pretty(&json)?);
    }

    let Some(pattern_markup) = pattern_markup else {
        if !(cli.tokens || cli.tree || cli.json) {
            warn_once(Component::Cli, "no pattern given, nothing to match");
        }
        return Ok(ExitCode::SUCCESS);
    };
    let pattern =
        parse_verbatim_bytes(&pattern_markup, options).context("failed to parse pattern")?;

    if cli.tree {
        println!("\n=== Pattern Tree ===");
        print!("{pattern}");
        println!();
    }

    Ok(report(&full, &pattern))
}

/// Print the verdict and turn it into the process exit code.
fn report(full: &DomTree, pattern: &DomTree) -> ExitCode {
    if pattern.top_level().is_none() {
        warn_once(Component::Cli, "pattern is empty and matches anything");
    }
    if contains_tree(full.top_level(), pattern.top_level()) {
        println!("{}", "match".green().bold());
        ExitCode::SUCCESS
    } else {
        println!("{}", "no match".red().bold());
        ExitCode::FAILURE
    }
}

fn node_to_json(node: NodeRef<'_>) -> Value {
    let mut obj = Map::new();

    match node.node_type() {
        NodeType::Document => {
            let _ = obj.insert("type".to_string(), json!("document"));
        }
        NodeType::Element(data) => {
            let _ = obj.insert("type".to_string(), json!("element"));
            let _ = obj.insert("tagName".to_string(), json!(data.tag_name));
            let _ = obj.insert("attributes".to_string(), json!(data.attrs));
        }
        NodeType::Text(text) => {
            let _ = obj.insert("type".to_string(), json!("text"));
            let _ = obj.insert("content".to_string(), json!(text));
        }
        NodeType::Comment(text) => {
            let _ = obj.insert("type".to_string(), json!("comment"));
            let _ = obj.insert("content".to_string(), json!(text));
        }
        NodeType::Doctype(name) => {
            let _ = obj.insert("type".to_string(), json!("doctype"));
            let _ = obj.insert("name".to_string(), json!(name));
        }
    }

    let children: Vec<Value> = node.children().map(node_to_json).collect();
    if !children.is_empty() {
        let _ = obj.insert("children".to_string(), Value::Array(children));
    }

    Value::Object(obj)
}
