//! Generate command - builds a form from a descriptor and prints its tree.

use serde_json::json;

use formkit::generation::FormGenerator;

use super::{CommandResult, load_descriptor, walk};
use crate::cli::GenerateArgs;
use crate::output::{OutputFormat, print_json, print_table, truncate};

/// Run the generate command
pub fn run(args: &GenerateArgs, format: OutputFormat) -> CommandResult {
    let descriptor = load_descriptor(&args.descriptor)?;
    let form = FormGenerator::new().create_form_group(&descriptor)?;
    let nodes = walk(&form);

    match format {
        OutputFormat::Human => {
            println!("Form:     {}", descriptor.name);
            println!("Status:   {}", form.status());
            println!("Nodes:    {}", nodes.len());
            println!();
            let rows: Vec<Vec<String>> = nodes
                .iter()
                .map(|(path, node)| {
                    let errors = node
                        .errors()
                        .map(|e| e.keys().collect::<Vec<_>>().join(","))
                        .unwrap_or_default();
                    vec![
                        path.clone(),
                        node.node_type().to_string(),
                        node.status().to_string(),
                        truncate(&node.value().to_string(), 40),
                        errors,
                    ]
                })
                .collect();
            print_table(&["PATH", "TYPE", "STATUS", "VALUE", "ERRORS"], &rows);
        }
        OutputFormat::Json => {
            let nodes: Vec<_> = nodes
                .iter()
                .map(|(path, node)| {
                    json!({
                        "path": path,
                        "type": node.node_type().as_str(),
                        "status": node.status(),
                        "value": node.value().to_json(),
                        "errors": node.errors(),
                    })
                })
                .collect();
            print_json(&json!({
                "name": descriptor.name,
                "status": form.status(),
                "value": form.value().to_json(),
                "nodes": nodes,
            }))?;
        }
    }

    Ok(())
}
