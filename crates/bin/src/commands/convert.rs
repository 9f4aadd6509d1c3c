//! Convert command - coerces raw input under a culture and re-formats it.

use std::rc::Rc;

use serde::Serialize;

use formkit::Value;
use formkit::convert::{
    Coerced, Converter, DateConverter, IntegerConverter, NumberConverter, ToNullConverter,
    ValueSync,
};
use formkit::locale::{DateFormat, Globalization, NumberFormat};

use super::CommandResult;
use crate::cli::{ConvertArgs, ValueType};
use crate::output::{OutputFormat, print_json};

/// What a bound input would make of the raw text
#[derive(Debug, Serialize)]
pub struct ConvertReport {
    pub converter: &'static str,
    pub culture: String,
    pub input: String,
    /// `value`, `cleared` or `rejected`
    pub outcome: &'static str,
    pub value: Value,
    /// The value as the input would display it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
}

/// Run the convert command
pub fn run(args: &ConvertArgs, culture: &str, format: OutputFormat) -> CommandResult {
    let report = convert(args, culture)?;

    match format {
        OutputFormat::Human => {
            println!("Converter:  {}", report.converter);
            println!("Culture:    {}", report.culture);
            println!("Input:      {:?}", report.input);
            println!("Outcome:    {}", report.outcome);
            if let Some(formatted) = &report.formatted {
                println!("Value:      {}", report.value);
                println!("Formatted:  {formatted}");
            }
        }
        OutputFormat::Json => print_json(&report)?,
    }

    Ok(())
}

/// Coerce `args.raw` with the converter selected by `args`.
pub fn convert(args: &ConvertArgs, culture: &str) -> CommandResult<ConvertReport> {
    let mut number_format = if args.percent {
        NumberFormat::percent()
    } else {
        NumberFormat::default()
    };
    if let Some(digits) = args.max_fraction_digits {
        number_format = number_format.max_fraction_digits(digits);
    }
    number_format = number_format.grouping(!args.no_grouping);

    Ok(match args.value_type {
        ValueType::Number => report(NumberConverter::with_format(number_format), culture, &args.raw),
        ValueType::Integer => {
            report(IntegerConverter::with_format(number_format), culture, &args.raw)
        }
        ValueType::Date => {
            let date_format = parse_date_format(&args.date_format)?;
            report(DateConverter::with_format(date_format), culture, &args.raw)
        }
        ValueType::ToNull => report(ToNullConverter, culture, &args.raw),
    })
}

fn parse_date_format(spec: &str) -> CommandResult<DateFormat> {
    Ok(match spec {
        "short" => DateFormat::Short,
        "datetime" => DateFormat::DateTime,
        "iso" => DateFormat::Iso,
        pattern => DateFormat::pattern(pattern)?,
    })
}

fn report<C: Converter>(converter: C, culture: &str, raw: &str) -> ConvertReport {
    let sync = ValueSync::new(converter, Rc::new(Globalization::default()), culture);
    let (outcome, value, formatted) = match sync.coerce(Some(raw)) {
        Coerced::Value(v) => {
            let formatted = sync.format(&v);
            ("value", v.into(), Some(formatted))
        }
        Coerced::Cleared => ("cleared", Value::Null, None),
        Coerced::Rejected => ("rejected", Value::Text(raw.to_string()), None),
    };
    tracing::debug!(converter = sync.converter().name(), outcome, "Converted input");
    ConvertReport {
        converter: sync.converter().name(),
        culture: sync.culture().to_string(),
        input: raw.to_string(),
        outcome,
        value,
        formatted,
    }
}
