use std::{collections::HashMap, future::Future};

use async_trait::async_trait;
use reqwest::Response;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    parse_utf8_qsl, Error, Result, TokenReaderError, TokenReaderResult, ACCESS_TOKEN_KEY,
    OAUTH_TOKEN_KEY, OAUTH_TOKEN_SECRET_KEY,
};

/// Represents response of OAuth1 token acquisition.
#[derive(Deserialize, Debug)]
pub struct TokenResponse {
    /// OAuth Token
    pub oauth_token: String,
    /// OAuth Token Secret
    pub oauth_token_secret: String,
    /// Other contents
    #[serde(flatten)]
    pub remain: HashMap<String, String>,
}

/// Represents response of OAuth2 access token acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessTokenResponse {
    pub access_token: String,
    /// Other contents, e.g. `token_type`, `expires_in` or `refresh_token`.
    /// Non-string JSON values are kept in their JSON text form.
    pub remain: HashMap<String, String>,
}

/// Add token parsing to reqwest::Response.
// this trait is sealed
#[async_trait(?Send)]
pub trait TokenReader: private::Sealed {
    async fn parse_oauth_token(self) -> Result<TokenResponse>;

    async fn parse_access_token(self) -> Result<AccessTokenResponse>;
}

#[async_trait(?Send)]
impl TokenReader for Response {
    async fn parse_oauth_token(self) -> Result<TokenResponse> {
        let text = self.text().await?;
        Ok(read_oauth_token(text)?)
    }

    async fn parse_access_token(self) -> Result<AccessTokenResponse> {
        let text = self.text().await?;
        Ok(read_access_token(text)?)
    }
}

/// Add token parsing to Future of reqwest::Response.
// this trait is also sealed
#[async_trait(?Send)]
pub trait TokenReaderFuture: private::SealedWrapper {
    async fn parse_oauth_token(self) -> Result<TokenResponse>;

    async fn parse_access_token(self) -> Result<AccessTokenResponse>;
}

#[async_trait(?Send)]
impl<T, E> TokenReaderFuture for T
where
    T: Future<Output = std::result::Result<Response, E>>,
    E: Into<Error> + 'static,
{
    async fn parse_oauth_token(self) -> Result<TokenResponse> {
        match self.await {
            Ok(resp) => Ok(resp.parse_oauth_token().await?),
            Err(err) => Err(err.into()),
        }
    }

    async fn parse_access_token(self) -> Result<AccessTokenResponse> {
        match self.await {
            Ok(resp) => Ok(resp.parse_access_token().await?),
            Err(err) => Err(err.into()),
        }
    }
}

fn read_oauth_token(text: String) -> TokenReaderResult<TokenResponse> {
    let mut destructured: HashMap<String, String> = parse_utf8_qsl(&text)?.into();
    let oauth_token = destructured.remove(OAUTH_TOKEN_KEY);
    let oauth_token_secret = destructured.remove(OAUTH_TOKEN_SECRET_KEY);
    match (oauth_token, oauth_token_secret) {
        (Some(t), Some(s)) => Ok(TokenResponse {
            oauth_token: t,
            oauth_token_secret: s,
            remain: destructured,
        }),
        (None, _) => Err(TokenReaderError::TokenKeyNotFound(OAUTH_TOKEN_KEY, text)),
        (_, _) => Err(TokenReaderError::TokenKeyNotFound(
            OAUTH_TOKEN_SECRET_KEY,
            text,
        )),
    }
}

// providers answer either with a JSON object or with a form-encoded body
fn read_access_token(text: String) -> TokenReaderResult<AccessTokenResponse> {
    let mut destructured: HashMap<String, String> = if text.trim_start().starts_with('{') {
        serde_json::from_str::<Map<String, Value>>(&text)?
            .into_iter()
            .map(|(k, v)| match v {
                Value::String(s) => (k, s),
                other => (k, other.to_string()),
            })
            .collect()
    } else {
        parse_utf8_qsl(text.trim())?.into()
    };
    match destructured.remove(ACCESS_TOKEN_KEY) {
        Some(access_token) => Ok(AccessTokenResponse {
            access_token,
            remain: destructured,
        }),
        None => Err(TokenReaderError::TokenKeyNotFound(ACCESS_TOKEN_KEY, text)),
    }
}

mod private {
    use std::future::Future;

    use reqwest::Response;

    use crate::Error;

    pub trait Sealed {}
    impl Sealed for Response {}
    pub trait SealedWrapper {}
    impl<T, E> SealedWrapper for T
    where
        T: Future<Output = Result<Response, E>>,
        E: Into<Error>,
    {
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn parse_response_typical() {
        let resp_str_sample = "oauth_token=Z6eEdO8MOmk394WozF5oKyuAv855l4Mlqo7hhlSLik&oauth_token_secret=Kd75W4OQfb2oJTV0vzGzeXftVAwgMnEK9MumzYcM&oauth_callback_confirmed=true";
        for parsed in &[
            read_oauth_token(resp_str_sample.to_string()).unwrap(),
            serde_urlencoded::from_str::<TokenResponse>(resp_str_sample).unwrap(),
        ] {
            assert_eq!(
                parsed.oauth_token,
                "Z6eEdO8MOmk394WozF5oKyuAv855l4Mlqo7hhlSLik"
            );
            assert_eq!(
                parsed.oauth_token_secret,
                "Kd75W4OQfb2oJTV0vzGzeXftVAwgMnEK9MumzYcM"
            );
            assert_eq!(parsed.remain.len(), 1);
            let oauth_callback_confirmed = parsed.remain.get("oauth_callback_confirmed").unwrap();
            assert_eq!(oauth_callback_confirmed, "true");
        }
    }

    #[test]
    fn parse_response_edge() {
        let resp_str_sample = "oauth_token==&oauth_token_secret=&keyonly=&keyonly2&=&&";
        for parsed in &[
            read_oauth_token(resp_str_sample.to_string()).unwrap(),
            serde_urlencoded::from_str::<TokenResponse>(resp_str_sample).unwrap(),
        ] {
            assert_eq!(parsed.oauth_token, "=");
            assert_eq!(parsed.oauth_token_secret, "");
            assert_eq!(parsed.remain.len(), 3);
            let keyonly = parsed.remain.get("keyonly").unwrap();
            assert_eq!(keyonly, "");
            let keyonly2 = parsed.remain.get("keyonly2").unwrap();
            assert_eq!(keyonly2, "");
            let empty = parsed.remain.get("").unwrap();
            assert_eq!(empty, "");
        }
    }

    #[test]
    fn parse_response_encoded() {
        let resp_str_sample = "oauth_token=a%2Bb&oauth_token_secret=s+s&screen_name=%E3%81%82";
        let parsed = read_oauth_token(resp_str_sample.to_string()).unwrap();
        assert_eq!(parsed.oauth_token, "a+b");
        assert_eq!(parsed.oauth_token_secret, "s s");
        assert_eq!(parsed.remain.get("screen_name").unwrap(), "あ");
    }

    #[test]
    fn parse_minimal() {
        let resp_str_sample = "oauth_token&oauth_token_secret";
        let parsed = read_oauth_token(resp_str_sample.to_string()).unwrap();
        assert_eq!(parsed.oauth_token, "");
        assert_eq!(parsed.oauth_token_secret, "");
        assert_eq!(parsed.remain.len(), 0);
    }

    #[test]
    fn parse_token_notfound() {
        let resp_str_sample = "oauth_token_secret=";
        let parsed = read_oauth_token(resp_str_sample.to_string());
        match parsed {
            Err(TokenReaderError::TokenKeyNotFound(key, resp_str)) => {
                assert_eq!(key, OAUTH_TOKEN_KEY);
                assert_eq!(resp_str, resp_str_sample)
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn parse_token_secret_notfound() {
        let resp_str_sample = "oauth_token=";
        let parsed = read_oauth_token(resp_str_sample.to_string());
        match parsed {
            Err(TokenReaderError::TokenKeyNotFound(key, resp_str)) => {
                assert_eq!(key, OAUTH_TOKEN_SECRET_KEY);
                assert_eq!(resp_str, resp_str_sample)
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn parse_token_malformed_utf8() {
        let parsed = read_oauth_token("oauth_token=%FF&oauth_token_secret=".to_string());
        assert!(matches!(parsed, Err(TokenReaderError::Decode(_))));
    }

    #[test]
    fn parse_access_token_json() {
        let resp_str_sample =
            r#"{"access_token":"2YotnFZFEjr1zCsicMWpAA","token_type":"Bearer","expires_in":3600}"#;
        let parsed = read_access_token(resp_str_sample.to_string()).unwrap();
        assert_eq!(parsed.access_token, "2YotnFZFEjr1zCsicMWpAA");
        assert_eq!(parsed.remain.get("token_type").unwrap(), "Bearer");
        assert_eq!(parsed.remain.get("expires_in").unwrap(), "3600");
        assert_eq!(parsed.remain.len(), 2);
    }

    #[test]
    fn parse_access_token_form() {
        let parsed =
            read_access_token("access_token=abc%3D&expires=5108".to_string()).unwrap();
        assert_eq!(parsed.access_token, "abc=");
        assert_eq!(parsed.remain.get("expires").unwrap(), "5108");
    }

    #[test]
    fn parse_access_token_notfound() {
        let parsed = read_access_token(r#"{"error":"invalid_grant"}"#.to_string());
        match parsed {
            Err(TokenReaderError::TokenKeyNotFound(key, _)) => assert_eq!(key, ACCESS_TOKEN_KEY),
            other => panic!("unexpected result {:?}", other),
        }

        let parsed = read_access_token("{not json".to_string());
        assert!(matches!(parsed, Err(TokenReaderError::Json(_))));
    }
}
