/*!
reqwest-auth-session: signed OAuth1, OAuth2 and Ofly sessions on top of [reqwest](https://crates.io/crates/reqwest).

# Overview

A [`Session`] wraps a `reqwest::Client` together with one [`Signer`]. Every
request made through the session is signed on the way out:

- **OAuth1**: HMAC-SHA1 (or any [oauth1-request](https://crates.io/crates/oauth1-request)
  signature method) over method, URL and parameters. The `oauth_*` parameters
  go into the query string, the form body or the `Authorization` header.
- **OAuth2**: the access token is presented as `Authorization: Bearer ...`
  or as an `access_token` query parameter.
- **Ofly**: an `oflyApiSig` hash (SHA1 or MD5) of the app secret, the path and
  the sorted parameters.

Relative URLs resolve against the base URL of an attached [`Service`].
Query strings and bodies are decoded as UTF-8 before signing.

# How to use

## Basic usecase 1 - OAuth1 with the signature in the header

```rust,no_run
use reqwest_auth_session::{RequestOptions, Secrets, SessionProvider};

# async fn run() -> reqwest_auth_session::Result<()> {
let secrets = Secrets::new("[CONSUMER_KEY]", "[CONSUMER_SECRET]")
    .token("[ACCESS_TOKEN]", "[TOKEN_SECRET]");

let session = reqwest::Client::new().oauth1(secrets);
let resp = session
    .post(
        "https://api.twitter.com/1.1/statuses/update.json",
        RequestOptions::new()
            .data([("status", "Hello, Twitter!")])
            .header_auth(true),
    )
    .await?;
# Ok(())
# }
```

## Basic usecase 2 - Acquiring OAuth token & secret

```rust,no_run
use reqwest_auth_session::{RequestOptions, Secrets, SessionProvider, TokenReaderFuture};

# async fn run() -> reqwest_auth_session::Result<()> {
let secrets = Secrets::new("[CONSUMER_KEY]", "[CONSUMER_SECRET]");

// step 1: acquire request token & token secret
let resp = reqwest::Client::new()
    .oauth1(secrets)
    .get(
        "https://api.twitter.com/oauth/request_token",
        RequestOptions::new().params([("oauth_callback", "oob")]),
    )
    .parse_oauth_token()
    .await?;

// step 2: let the user authorize, then exchange the verifier
let secrets = Secrets::new("[CONSUMER_KEY]", "[CONSUMER_SECRET]")
    .token(resp.oauth_token, resp.oauth_token_secret);
let resp = reqwest::Client::new()
    .oauth1(secrets)
    .get(
        "https://api.twitter.com/oauth/access_token",
        RequestOptions::new().params([("oauth_verifier", "[PIN]")]),
    )
    .parse_oauth_token()
    .await?;
println!("token: {}, secret: {}", resp.oauth_token, resp.oauth_token_secret);
# Ok(())
# }
```

## Basic usecase 3 - OAuth2 and Ofly against a service

```rust,no_run
use reqwest_auth_session::{
    AppCredentials, ClientCredentials, RequestOptions, Service, Session, SessionProvider,
};

# async fn run() -> reqwest_auth_session::Result<()> {
let github = Session::oauth2(ClientCredentials::new("[CLIENT_ID]", "[CLIENT_SECRET]"))
    .with_access_token("[ACCESS_TOKEN]")
    .service(Service::new().base_url("https://api.github.com/"));
let user = github.get("user", RequestOptions::new()).await?;

let shutterfly = reqwest::Client::new().ofly(AppCredentials::new("[APP_ID]", "[APP_SECRET]"));
let albums = shutterfly
    .get(
        "https://ws.shutterfly.com/userid/albums",
        RequestOptions::new().user_id("[USER_ID]").hash_meth("md5"),
    )
    .await?;
# Ok(())
# }
```
*/
mod auth;
mod client;
mod error;
mod headers;
mod params;
mod request;
mod resolve;
mod secrets;
mod signer;
mod token_reader;

use std::time::Duration;

// exposed to external program
pub use auth::{bearer_authorization, oauth1_authorization, ofly_authorization};
pub use client::{OAuth1Session, OAuth2Session, OflySession, Session, SessionProvider};
pub use error::{
    DecodeError, Error, Result, SignError, SignResult, TokenReaderError, TokenReaderResult,
};
pub use headers::CaseInsensitiveMap;
pub use params::{parse_utf8_qsl, Params, RawParams};
pub use request::RequestOptions;
pub use resolve::{is_absolute_url, resolve_url, Service};
pub use secrets::{AppCredentials, ClientCredentials, Secrets, SecretsProvider};
pub use signer::{
    HashMethod, OAuth1Signer, OAuth2Signer, OAuthParameters, OflySigner, SignableRequest,
    Signature, Signer,
};
pub use token_reader::{AccessTokenResponse, TokenReader, TokenReaderFuture, TokenResponse};

// exposed constant variables
/// Represents `oauth_callback`.
pub const OAUTH_CALLBACK_KEY: &str = "oauth_callback";
/// Represents `oauth_verifier`.
pub const OAUTH_VERIFIER_KEY: &str = "oauth_verifier";
/// Represents `oauth_version`.
pub const OAUTH_VERSION_KEY: &str = "oauth_version";
/// Represents `oauth_signature`.
pub const OAUTH_SIGNATURE_KEY: &str = "oauth_signature";
/// Represents `access_token`.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Content type of form-encoded bodies, set by default on POST, PUT and PATCH.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
/// Timeout applied when a request does not set one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

// crate-private constant variables
pub(crate) const OAUTH_KEY_PREFIX: &str = "oauth_";
pub(crate) const OAUTH_TOKEN_KEY: &str = "oauth_token";
pub(crate) const OAUTH_TOKEN_SECRET_KEY: &str = "oauth_token_secret";
