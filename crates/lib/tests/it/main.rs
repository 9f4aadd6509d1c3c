/*! Integration tests for formkit.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - convert: Tests for ValueSync and the coercion strategies
 * - form: Tests for the form tree, flags, arrays and async validation
 * - generation: Tests for descriptors, factories and the FormGenerator
 * - messages: Tests for translation lookup and message rendering
 * - validators: Tests for the named validators and sibling comparisons
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("formkit=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod convert;
mod form;
mod helpers;
