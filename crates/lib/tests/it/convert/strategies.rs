//! Coercion strategies under the laws every converter must obey.

use std::rc::Rc;

use formkit::Value;
use formkit::convert::{
    Coerced, ConvertContext, Converter, DateConverter, IntegerConverter, NumberConverter,
    ToNullConverter,
};
use formkit::locale::{DateFormat, Globalization, NumberFormat};

use crate::helpers::date;

const CULTURES: [&str; 5] = ["en", "en-GB", "de", "fr", "ar-EG"];

fn with_ctx<R>(culture: &str, f: impl FnOnce(&ConvertContext<'_>) -> R) -> R {
    let locale = Rc::new(Globalization::default());
    let ctx = ConvertContext {
        locale: locale.as_ref(),
        culture,
    };
    f(&ctx)
}

fn assert_round_trip<C: Converter>(converter: &C, values: &[C::Output]) {
    for culture in CULTURES {
        with_ctx(culture, |ctx| {
            for v in values {
                let text = converter.format(v, ctx);
                match converter.coerce(Some(&text), ctx) {
                    Coerced::Value(back) => assert!(
                        converter.values_equal(&back, v),
                        "{} in {culture}: {v:?} -> {text:?} -> {back:?}",
                        converter.name()
                    ),
                    other => panic!("{} in {culture}: {text:?} gave {other:?}", converter.name()),
                }
            }
        });
    }
}

#[test]
fn numbers_round_trip() {
    let values = [0.0, -1.0, 1.5, 1234567.25, -0.001, 1e-7];
    assert_round_trip(&NumberConverter::new(), &values);
    assert_round_trip(
        &NumberConverter::with_format(NumberFormat::default().grouping(false)),
        &values,
    );
    assert_round_trip(
        &NumberConverter::with_format(NumberFormat::percent().max_fraction_digits(4)),
        &[0.5, 0.25, 0.125],
    );
}

#[test]
fn integers_round_trip() {
    assert_round_trip(&IntegerConverter::new(), &[0.0, 42.0, -7.0, 1_000_000.0]);
}

#[test]
fn dates_round_trip() {
    let values = [date(2020, 12, 3), date(1999, 1, 31), date(2000, 2, 29)];
    assert_round_trip(&DateConverter::new(), &values);
    assert_round_trip(&DateConverter::with_format(DateFormat::Iso), &values);
    assert_round_trip(
        &DateConverter::with_format(DateFormat::pattern("%Y/%m/%d").unwrap()),
        &values,
    );
}

#[test]
fn clearing_is_idempotent() {
    with_ctx("en", |ctx| {
        for raw in [None, Some(""), Some("   "), Some("\t")] {
            assert!(NumberConverter::new().coerce(raw, ctx).is_cleared());
            assert!(IntegerConverter::new().coerce(raw, ctx).is_cleared());
            assert!(DateConverter::new().coerce(raw, ctx).is_cleared());
            assert!(ToNullConverter.coerce(raw, ctx).is_cleared());
        }
    });
}

#[test]
fn unparsable_input_is_rejected() {
    with_ctx("en", |ctx| {
        for raw in ["-", "abc", "1.2.3", "NaN", "inf", "1e999"] {
            assert!(NumberConverter::new().coerce(Some(raw), ctx).is_rejected(), "{raw}");
        }
        assert!(IntegerConverter::new().coerce(Some("1.5"), ctx).is_rejected());
        for raw in ["31/31/2020", "yesterday", "12/"] {
            assert!(DateConverter::new().coerce(Some(raw), ctx).is_rejected(), "{raw}");
        }
    });
}

#[test]
fn to_null_passes_values_through() {
    with_ctx("de", |ctx| {
        assert_eq!(
            ToNullConverter.coerce(Some(" x "), ctx).value(),
            Some(Value::from(" x "))
        );
        assert_eq!(ToNullConverter.format(&Value::Number(1.5), ctx), "1,5");
        assert_eq!(ToNullConverter.format(&Value::from("abc"), ctx), "abc");
    });
}
