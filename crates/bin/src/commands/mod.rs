//! Subcommand implementations.

use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use formkit::form::FormNode;
use formkit::generation::GroupDescriptor;

pub mod convert;
pub mod generate;
pub mod validate;

/// Result type of every command
pub type CommandResult<T = ()> = Result<T, Box<dyn Error>>;

/// Read a whole file, or stdin when `path` is `-`.
pub fn read_input(path: &Path) -> io::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    fs::read_to_string(path)
}

/// Parse a group descriptor document.
pub fn load_descriptor(path: &Path) -> CommandResult<GroupDescriptor> {
    let text = read_input(path)?;
    let descriptor: GroupDescriptor = serde_json::from_str(&text)
        .map_err(|e| format!("invalid descriptor {}: {e}", path.display()))?;
    tracing::debug!(name = %descriptor.name, items = descriptor.items.len(), "Loaded descriptor");
    Ok(descriptor)
}

/// Every node below `root` with its dotted path, depth-first.
pub fn walk(root: &FormNode) -> Vec<(String, FormNode)> {
    let mut out = Vec::new();
    collect(root, String::new(), &mut out);
    out
}

fn collect(node: &FormNode, path: String, out: &mut Vec<(String, FormNode)>) {
    for (key, child) in node.child_entries() {
        let child_path = if path.is_empty() {
            key.to_string()
        } else {
            format!("{path}.{key}")
        };
        out.push((child_path.clone(), child.clone()));
        collect(&child, child_path, out);
    }
}
