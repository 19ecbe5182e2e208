//! Tree rendering for archive structure

use console::Style;

use super::format::format_bytes;
use super::source::AssetKind;

/// A node of the rendered tree
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    pub kind: AssetKind,
    pub size: Option<u64>,
    pub children: Vec<TreeNode>,
    pub metadata: Vec<(String, String)>,
}

/// Options for tree rendering
#[derive(Debug, Clone, Default)]
pub struct TreeOptions {
    pub max_depth: Option<usize>,
    pub no_color: bool,
    pub show_metadata: bool,
}

impl TreeNode {
    /// Create a node named `name`, classified by its extension
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            kind: AssetKind::from_name(&name),
            name,
            size: None,
            children: Vec::new(),
            metadata: Vec::new(),
        }
    }

    /// Add a child node
    pub fn add_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Set the size of this node
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Add a metadata line
    pub fn with_metadata(mut self, key: &str, value: impl Into<String>) -> Self {
        self.metadata.push((key.to_string(), value.into()));
        self
    }
}

fn icon(kind: AssetKind) -> &'static str {
    match kind {
        AssetKind::Gob => "📦",
        AssetKind::Lump => "📁",
        AssetKind::Texture => "🖼️",
        AssetKind::Mesh => "🏗️",
        AssetKind::Animation => "📽️",
        AssetKind::Other => "📄",
    }
}

fn style(kind: AssetKind, no_color: bool) -> Style {
    if no_color {
        return Style::new();
    }
    match kind {
        AssetKind::Gob => Style::new().bold().cyan(),
        AssetKind::Lump => Style::new().cyan(),
        AssetKind::Texture => Style::new().magenta(),
        AssetKind::Mesh => Style::new().green(),
        AssetKind::Animation => Style::new().yellow(),
        AssetKind::Other => Style::new().dim(),
    }
}

/// Render a tree to a string
pub fn render_tree(root: &TreeNode, options: &TreeOptions) -> String {
    let mut output = String::new();
    render_node(root, &mut output, "", true, 0, options);
    output
}

fn render_node(
    node: &TreeNode,
    output: &mut String,
    prefix: &str,
    is_last: bool,
    depth: usize,
    options: &TreeOptions,
) {
    if options.max_depth.is_some_and(|max| depth > max) {
        return;
    }

    let connector = match (depth, is_last) {
        (0, _) => "",
        (_, true) => "└── ",
        (_, false) => "├── ",
    };
    output.push_str(&format!(
        "{prefix}{connector}{} {}",
        icon(node.kind),
        style(node.kind, options.no_color).apply_to(&node.name)
    ));
    if let Some(size) = node.size {
        output.push_str(&format!(" ({})", format_bytes(size)));
    }
    output.push('\n');

    let child_prefix = match (depth, is_last) {
        (0, _) => String::new(),
        (_, true) => format!("{prefix}    "),
        (_, false) => format!("{prefix}│   "),
    };

    if options.show_metadata {
        let dim = if options.no_color { Style::new() } else { Style::new().dim() };
        for (key, value) in &node.metadata {
            output.push_str(&format!("{child_prefix}    {}: {value}\n", dim.apply_to(key)));
        }
    }

    for (i, child) in node.children.iter().enumerate() {
        let last = i + 1 == node.children.len();
        render_node(child, output, &child_prefix, last, depth + 1, options);
    }
}
