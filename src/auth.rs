use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::Params;

/// Everything but the RFC 3986 unreserved characters.
pub(crate) const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Build an OAuth1 `Authorization` header value.
///
/// The realm is always the first item and defaults to an empty string.
/// The realm and the values are percent-encoded.
pub fn oauth1_authorization(oauth_params: &Params, realm: Option<&str>) -> String {
    format!(
        "OAuth realm=\"{}\"{}",
        utf8_percent_encode(realm.unwrap_or_default(), OAUTH_ENCODE_SET),
        quoted_items(oauth_params, true)
    )
}

/// Build an OAuth2 bearer `Authorization` header value.
pub fn bearer_authorization(access_token: &str) -> String {
    format!("Bearer {}", access_token)
}

/// Build an Ofly `Authorization` header value.
pub fn ofly_authorization(ofly_params: &Params) -> String {
    format!("Ofly {}", quoted_items(ofly_params, false))
}

fn quoted_items(params: &Params, leading_comma: bool) -> String {
    params
        .iter()
        .enumerate()
        .map(|(i, (k, v))| {
            let sep = if i > 0 || leading_comma { "," } else { "" };
            format!("{}{}=\"{}\"", sep, k, utf8_percent_encode(v, OAUTH_ENCODE_SET))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oauth1_header_realm() {
        let params: Params = vec![("hello", "world"), ("foo", "bar")].into_iter().collect();

        assert_eq!(
            oauth1_authorization(&params, None),
            "OAuth realm=\"\",foo=\"bar\",hello=\"world\""
        );
        assert_eq!(
            oauth1_authorization(&params, Some("example")),
            "OAuth realm=\"example\",foo=\"bar\",hello=\"world\""
        );
    }

    #[test]
    fn oauth1_header_encodes_values() {
        let params: Params = vec![("oauth_signature", "tR3+Ty81lMeYAr/Fid0kMTYa/WM=")]
            .into_iter()
            .collect();
        assert_eq!(
            oauth1_authorization(&params, Some("Photos")),
            "OAuth realm=\"Photos\",oauth_signature=\"tR3%2BTy81lMeYAr%2FFid0kMTYa%2FWM%3D\""
        );
    }

    #[test]
    fn oauth1_header_encodes_realm() {
        let params: Params = vec![("oauth_nonce", "abc")].into_iter().collect();
        assert_eq!(
            oauth1_authorization(&params, Some("a\",oauth_token=\"x")),
            "OAuth realm=\"a%22%2Coauth_token%3D%22x\",oauth_nonce=\"abc\""
        );
        assert_eq!(
            oauth1_authorization(&params, Some("Photo Album")),
            "OAuth realm=\"Photo%20Album\",oauth_nonce=\"abc\""
        );
    }

    #[test]
    fn bearer_header() {
        assert_eq!(bearer_authorization("abcdefg"), "Bearer abcdefg");
    }

    #[test]
    fn ofly_header() {
        let params: Params = vec![("oflyAppId", "123"), ("oflyApiSig", "abc")]
            .into_iter()
            .collect();
        assert_eq!(
            ofly_authorization(&params),
            "Ofly oflyApiSig=\"abc\",oflyAppId=\"123\""
        );
    }
}
