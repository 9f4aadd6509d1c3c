//! Validate command - applies values to a generated form and prints
//! localized validation messages.

use std::process::ExitCode;
use std::rc::Rc;

use serde_json::json;

use formkit::Value;
use formkit::form::{SetValueOptions, mark_as_touched_recursive};
use formkit::generation::FormGenerator;
use formkit::locale::{CurrentCulture, Globalization};
use formkit::messages::{DefaultTranslationService, MessageCollection, MessageService};

use super::{CommandResult, load_descriptor, read_input, walk};
use crate::cli::ValidateArgs;
use crate::output::{OutputFormat, print_json, print_table};

const FALLBACK_CULTURE: &str = "en";

/// Run the validate command. Exits with failure when the form is invalid.
pub fn run(args: &ValidateArgs, culture: &str, format: OutputFormat) -> CommandResult<ExitCode> {
    let descriptor = load_descriptor(&args.descriptor)?;
    let form = FormGenerator::new().create_form_group(&descriptor)?;

    if let Some(path) = &args.values {
        let values: Value = serde_json::from_str(&read_input(path)?)
            .map_err(|e| format!("invalid values {}: {e}", path.display()))?;
        if args.strict {
            form.set_value(&values, SetValueOptions::default())?;
        } else {
            form.patch_value(&values, SetValueOptions::default())?;
        }
    }
    mark_as_touched_recursive(&form);

    let messages = message_service(args, culture)?;
    let prefix = args.prefix.as_deref();
    let failures: Vec<(String, Vec<String>)> = walk(&form)
        .into_iter()
        .filter_map(|(path, node)| {
            let rendered = messages.control_errors(&node, prefix);
            (!rendered.is_empty()).then_some((path, rendered))
        })
        .collect();
    tracing::debug!(failures = failures.len(), status = %form.status(), "Validated form");

    match format {
        OutputFormat::Human => {
            println!("Status:   {}", form.status());
            if !failures.is_empty() {
                println!();
                let rows: Vec<Vec<String>> = failures
                    .iter()
                    .flat_map(|(path, rendered)| {
                        rendered.iter().map(move |m| vec![path.clone(), m.clone()])
                    })
                    .collect();
                print_table(&["PATH", "MESSAGE"], &rows);
            }
        }
        OutputFormat::Json => {
            let errors: Vec<_> = failures
                .iter()
                .map(|(path, rendered)| json!({"path": path, "messages": rendered}))
                .collect();
            print_json(&json!({
                "status": form.status(),
                "value": form.value().to_json(),
                "errors": errors,
            }))?;
        }
    }

    Ok(if form.is_invalid() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn message_service(args: &ValidateArgs, culture: &str) -> CommandResult<MessageService> {
    let collections: Vec<MessageCollection> = match &args.messages {
        Some(path) => serde_json::from_str(&read_input(path)?)
            .map_err(|e| format!("invalid messages {}: {e}", path.display()))?,
        None => Vec::new(),
    };
    let mut cultures = vec![FALLBACK_CULTURE];
    if culture != FALLBACK_CULTURE {
        cultures.push(culture);
    }
    let translation = DefaultTranslationService::with_default_messages(&cultures, collections);
    Ok(MessageService::new(
        Rc::new(translation),
        Rc::new(Globalization::default()),
        CurrentCulture::new(culture),
    ))
}
