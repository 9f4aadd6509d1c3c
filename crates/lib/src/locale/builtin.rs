//! Built-in culture table.

use std::fmt::Write as _;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use super::{DateFormat, LocaleError, LocaleProvider, NumberFormat, NumberStyle, resolve_culture};

static PLAIN_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[0-9]+(?:\.[0-9]+)?|\.[0-9]+)$").expect("valid regex"));

const ISO_DATE_TIME: &str = "%Y-%m-%dT%H:%M:%S";
const ISO_DATE: &str = "%Y-%m-%d";

/// Bidi and formatting marks that some cultures place around signs.
const MARKS: [char; 3] = ['\u{200E}', '\u{200F}', '\u{061C}'];

const ARABIC_INDIC_DIGITS: [char; 10] = ['٠', '١', '٢', '٣', '٤', '٥', '٦', '٧', '٨', '٩'];

/// Number and date conventions of one culture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CultureInfo {
    /// Culture name, e.g. `en-GB`
    pub name: String,
    /// Decimal separator
    pub decimal: char,
    /// Group separator
    pub group: char,
    /// Percent sign as displayed after the number, including any spacing
    pub percent_suffix: String,
    /// Native digits, when the culture does not use ASCII digits
    pub digits: Option<[char; 10]>,
    /// chrono pattern of the short date
    pub short_date: String,
    /// chrono pattern of the short date with time
    pub date_time: String,
}

impl CultureInfo {
    fn new(name: &str, decimal: char, group: char, percent_suffix: &str, short_date: &str) -> Self {
        Self {
            name: name.to_string(),
            decimal,
            group,
            percent_suffix: percent_suffix.to_string(),
            digits: None,
            short_date: short_date.to_string(),
            date_time: format!("{short_date} %H:%M"),
        }
    }

    fn with_digits(mut self, digits: [char; 10]) -> Self {
        self.digits = Some(digits);
        self
    }

    /// Replace native digits with ASCII digits.
    fn to_ascii_digits(&self, text: &str) -> String {
        match &self.digits {
            None => text.to_string(),
            Some(digits) => text
                .chars()
                .map(|c| match digits.iter().position(|d| *d == c) {
                    Some(i) => char::from(b'0' + i as u8),
                    None => c,
                })
                .collect(),
        }
    }

    /// Replace ASCII digits with native digits.
    fn to_native_digits(&self, text: &str) -> String {
        match &self.digits {
            None => text.to_string(),
            Some(digits) => text
                .chars()
                .map(|c| match c.to_digit(10) {
                    Some(i) => digits[i as usize],
                    None => c,
                })
                .collect(),
        }
    }

    fn date_patterns(&self, format: &DateFormat) -> Vec<String> {
        match format {
            DateFormat::Short => vec![self.short_date.clone()],
            DateFormat::DateTime => vec![self.date_time.clone(), self.short_date.clone()],
            DateFormat::Iso => vec![ISO_DATE_TIME.to_string(), ISO_DATE.to_string()],
            DateFormat::Pattern(p) => vec![p.clone()],
        }
    }
}

/// The built-in [`LocaleProvider`].
///
/// Ships conventions for `en`, `en-GB`, `en-US`, `de`, `de-DE`, `fr` and
/// `ar-EG`. Unknown cultures resolve through [`resolve_culture`], falling
/// back to the first culture in the table.
///
/// ```
/// use formkit::locale::{Globalization, LocaleProvider, NumberFormat};
///
/// let g = Globalization::default();
/// assert_eq!(g.parse_number("de", "1.234,5", &NumberFormat::default()), Some(1234.5));
/// assert_eq!(g.format_number("en-GB", 1234.5, &NumberFormat::default()), "1,234.5");
/// ```
#[derive(Debug, Clone)]
pub struct Globalization {
    cultures: Vec<CultureInfo>,
    names: Vec<String>,
}

impl Default for Globalization {
    fn default() -> Self {
        Self::new(vec![
            CultureInfo::new("en", '.', ',', "%", "%m/%d/%Y"),
            CultureInfo::new("en-GB", '.', ',', "%", "%d/%m/%Y"),
            CultureInfo::new("en-US", '.', ',', "%", "%m/%d/%Y"),
            CultureInfo::new("de", ',', '.', "\u{a0}%", "%d.%m.%Y"),
            CultureInfo::new("de-DE", ',', '.', "\u{a0}%", "%d.%m.%Y"),
            CultureInfo::new("fr", ',', '\u{202f}', "\u{a0}%", "%d/%m/%Y"),
            CultureInfo::new("ar-EG", '٫', '٬', "٪", "%d/%m/%Y").with_digits(ARABIC_INDIC_DIGITS),
        ])
    }
}

impl Globalization {
    /// Create a provider over an explicit culture table.
    pub fn new(cultures: Vec<CultureInfo>) -> Self {
        let names = cultures.iter().map(|c| c.name.clone()).collect();
        Self { cultures, names }
    }

    /// Names of all cultures in the table.
    pub fn culture_names(&self) -> &[String] {
        &self.names
    }

    /// Conventions for a culture, resolved like [`LocaleProvider::supported_culture`].
    pub fn culture(&self, name: &str) -> Option<&CultureInfo> {
        let resolved = resolve_culture(&self.names, name)?;
        self.cultures.iter().find(|c| c.name == resolved)
    }

    /// Like [`culture`](Self::culture) but without falling back to the first
    /// culture: the name or its language must be in the table.
    pub fn strict_culture(&self, name: &str) -> Result<&CultureInfo, LocaleError> {
        let language = name.split(['-', '_']).next().unwrap_or_default();
        let known = self.names.iter().any(|c| {
            c.eq_ignore_ascii_case(name)
                || c.split(['-', '_'])
                    .next()
                    .is_some_and(|l| l.eq_ignore_ascii_case(language))
        });
        if !known {
            return Err(LocaleError::UnsupportedCulture {
                name: name.to_string(),
            });
        }
        self.culture(name).ok_or_else(|| LocaleError::UnsupportedCulture {
            name: name.to_string(),
        })
    }

    fn culture_or_invariant(&self, name: &str) -> CultureInfo {
        self.culture(name)
            .cloned()
            .unwrap_or_else(|| CultureInfo::new("", '.', ',', "%", ISO_DATE))
    }
}

impl LocaleProvider for Globalization {
    fn supported_culture(&self, name: &str) -> String {
        resolve_culture(&self.names, name)
            .unwrap_or_default()
            .to_string()
    }

    fn parse_number(&self, culture: &str, text: &str, format: &NumberFormat) -> Option<f64> {
        let info = self.culture_or_invariant(culture);
        let mut s: String = info
            .to_ascii_digits(text)
            .chars()
            .filter(|c| !MARKS.contains(c))
            .collect();
        s = s.trim().to_string();

        if format.style == NumberStyle::Percent {
            let sign = info.percent_suffix.trim();
            for candidate in [sign, "%", "٪"] {
                if !candidate.is_empty()
                    && let Some(rest) = s.strip_suffix(candidate)
                {
                    s = rest.trim_end_matches([' ', '\u{a0}', '\u{202f}']).to_string();
                    break;
                }
            }
        }

        let first = s.chars().next();
        let (negative, body) = match first {
            Some('-') | Some('\u{2212}') => (true, s.chars().skip(1).collect::<String>()),
            Some('+') => (false, s.chars().skip(1).collect::<String>()),
            _ => (false, s),
        };

        let mut plain = String::with_capacity(body.len());
        for c in body.chars() {
            if c == info.decimal {
                plain.push('.');
            } else if c == info.group
                || (info.group.is_whitespace() && (c == ' ' || c == '\u{a0}'))
            {
                continue;
            } else {
                plain.push(c);
            }
        }

        if !PLAIN_NUMBER.is_match(&plain) {
            return None;
        }
        let magnitude: f64 = plain.parse().ok()?;
        let value = if negative { -magnitude } else { magnitude };
        Some(match format.style {
            NumberStyle::Decimal => value,
            NumberStyle::Percent => value / 100.0,
        })
    }

    fn format_number(&self, culture: &str, value: f64, format: &NumberFormat) -> String {
        let info = self.culture_or_invariant(culture);
        if !value.is_finite() {
            return value.to_string();
        }
        let scaled = match format.style {
            NumberStyle::Decimal => value,
            NumberStyle::Percent => value * 100.0,
        };

        let mut digits = match format.effective_fraction_digits() {
            Some(n) => format!("{:.*}", n as usize, scaled.abs()),
            None => format!("{}", scaled.abs()),
        };
        if digits.contains('.') {
            digits = digits.trim_end_matches('0').trim_end_matches('.').to_string();
        }
        let negative = scaled < 0.0 && digits.chars().any(|c| c != '0' && c != '.');

        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i.to_string(), Some(f.to_string())),
            None => (digits.clone(), None),
        };

        let mut out = String::new();
        if negative {
            out.push('-');
        }
        if format.use_grouping {
            let len = int_part.len();
            for (i, c) in int_part.chars().enumerate() {
                if i > 0 && (len - i) % 3 == 0 {
                    out.push(info.group);
                }
                out.push(c);
            }
        } else {
            out.push_str(&int_part);
        }
        if let Some(frac) = frac_part {
            out.push(info.decimal);
            out.push_str(&frac);
        }
        if format.style == NumberStyle::Percent {
            out.push_str(&info.percent_suffix);
        }
        info.to_native_digits(&out)
    }

    fn parse_date(&self, culture: &str, text: &str, format: &DateFormat) -> Option<NaiveDateTime> {
        let info = self.culture_or_invariant(culture);
        let s = info.to_ascii_digits(text.trim());
        info.date_patterns(format).iter().find_map(|pattern| {
            NaiveDateTime::parse_from_str(&s, pattern).ok().or_else(|| {
                NaiveDate::parse_from_str(&s, pattern)
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
        })
    }

    fn format_date(&self, culture: &str, value: &NaiveDateTime, format: &DateFormat) -> String {
        let info = self.culture_or_invariant(culture);
        let pattern = info
            .date_patterns(format)
            .into_iter()
            .next()
            .unwrap_or_else(|| ISO_DATE_TIME.to_string());
        let mut out = String::new();
        if write!(out, "{}", value.format(&pattern)).is_err() {
            tracing::warn!(%pattern, "Date pattern failed to format, using ISO");
            out = value.format(ISO_DATE_TIME).to_string();
        }
        info.to_native_digits(&out)
    }
}
