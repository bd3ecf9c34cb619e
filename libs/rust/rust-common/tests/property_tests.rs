//! Property-based tests for rust-common crate.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use proptest::prelude::*;
use rust_common::{FormRequest, basic_auth_header};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Form bodies decode back to the same fields in the same order, whatever
    /// characters the values carry.
    #[test]
    fn prop_form_body_preserves_fields(
        fields in prop::collection::vec(("[a-z_]{1,12}", "\\PC{0,40}"), 1..6)
    ) {
        let request = fields
            .iter()
            .fold(FormRequest::new("http://localhost"), |req, (k, v)| req.form_param(k, v));

        let decoded: Vec<(String, String)> =
            url::form_urlencoded::parse(request.encoded_body().as_bytes())
                .into_owned()
                .collect();

        prop_assert_eq!(decoded, fields);
    }

    /// The Basic header always carries `user:password` in standard base64.
    #[test]
    fn prop_basic_auth_header_encodes_credentials(
        user in "[A-Za-z0-9._-]{1,32}",
        password in "\\PC{0,32}",
    ) {
        let header = basic_auth_header(&user, &password);
        let encoded = header.strip_prefix("Basic ").unwrap();
        let decoded = String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap();

        prop_assert_eq!(decoded, format!("{user}:{password}"));
    }
}
