use std::borrow::Cow;

use oauth1_request::signature_method::SignatureMethod;
use oauth1_request::signer::Signer as OAuthSigner;
use oauth1_request::{HmacSha1, Options};
use percent_encoding::percent_decode_str;

use super::{SignableRequest, Signature, Signer};
use crate::{
    Params, Secrets, SecretsProvider, SignResult, OAUTH_CALLBACK_KEY, OAUTH_KEY_PREFIX,
    OAUTH_VERIFIER_KEY, OAUTH_VERSION_KEY,
};

const AUTHORIZATION_PREFIX: &str = "OAuth ";

#[derive(Debug, Clone)]
pub struct OAuth1Signer<'a, TSecretsProvider, TSignatureMethod = HmacSha1>
where
    TSecretsProvider: SecretsProvider,
    TSignatureMethod: SignatureMethod + Clone,
{
    secrets: TSecretsProvider,
    parameters: OAuthParameters<'a, TSignatureMethod>,
}

impl<'a> OAuth1Signer<'a, Secrets<'a, ()>, HmacSha1> {
    /// HMAC-SHA1 signer sending `oauth_version=1.0`.
    pub fn new<TKey, TSecret>(consumer_key: TKey, consumer_secret: TSecret) -> Self
    where
        TKey: Into<Cow<'a, str>>,
        TSecret: Into<Cow<'a, str>>,
    {
        OAuth1Signer::with_params(
            Secrets::new(consumer_key, consumer_secret),
            OAuthParameters::new().version(true),
        )
    }
}

impl<'a, TSecretsProvider, TSignatureMethod> OAuth1Signer<'a, TSecretsProvider, TSignatureMethod>
where
    TSecretsProvider: SecretsProvider,
    TSignatureMethod: SignatureMethod + Clone,
{
    pub fn with_params(
        secrets: TSecretsProvider,
        parameters: OAuthParameters<'a, TSignatureMethod>,
    ) -> Self {
        OAuth1Signer {
            secrets,
            parameters,
        }
    }

    pub fn secrets(&self) -> &TSecretsProvider {
        &self.secrets
    }

    pub fn parameters(&self) -> &OAuthParameters<'a, TSignatureMethod> {
        &self.parameters
    }

    /// Sign `request` and return every `oauth_*` parameter, decoded.
    fn generate_signature(&self, request: &SignableRequest) -> Params {
        let (consumer_key, consumer_secret) = self.secrets.get_consumer_key_pair();
        let (token, token_secret) = self.secrets.get_token_option_pair();

        // oauth_callback / oauth_verifier / oauth_version may ride along with the request
        let callback = promoted_parameter(request, OAUTH_CALLBACK_KEY);
        let verifier = promoted_parameter(request, OAUTH_VERIFIER_KEY);
        let version = promoted_parameter(request, OAUTH_VERSION_KEY).is_some();
        let options = self
            .parameters
            .build_options(token, callback, verifier, version);

        // non-oauth query and form parameters, sorted by alphabetical order
        let mut sorted: Vec<(&str, &str)> = request
            .query
            .iter()
            .chain(request.form.iter().flat_map(|form| form.iter()))
            .filter(|(k, _)| !k.starts_with(OAUTH_KEY_PREFIX))
            .collect();
        sorted.sort_unstable();
        let (before_oauth, after_oauth) =
            sorted.split_at(sorted.partition_point(|(k, _)| *k < OAUTH_KEY_PREFIX));

        // Step 0. instantiate sign generator
        let sig_method = self.parameters.signature_method.clone();
        let url = request.url.clone();
        let method = request.method.as_str();
        let mut signer = if request.form.is_some() {
            OAuthSigner::form_with_signature_method(
                sig_method,
                method,
                url,
                consumer_secret,
                token_secret,
            )
        } else {
            OAuthSigner::with_signature_method(
                sig_method,
                method,
                url,
                consumer_secret,
                token_secret,
            )
        };

        // Step 1. key [a ~ oauth_)
        for &(key, value) in before_oauth {
            signer.parameter(key, value);
        }
        // Step 2. add oauth_* parameters
        let mut signer = signer.oauth_parameters(consumer_key, &options);
        // Step 3. key (oauth_ ~ z]
        for &(key, value) in after_oauth {
            signer.parameter(key, value);
        }

        parse_authorization(&signer.finish().authorization)
    }
}

impl<'a, TSecretsProvider, TSignatureMethod> Signer
    for OAuth1Signer<'a, TSecretsProvider, TSignatureMethod>
where
    TSecretsProvider: SecretsProvider,
    TSignatureMethod: SignatureMethod + Clone,
{
    fn name(&self) -> &'static str {
        "oauth1"
    }

    fn sign(&self, request: &SignableRequest) -> SignResult<Signature> {
        let oauth_params = self.generate_signature(request);
        let realm = request
            .realm()
            .or_else(|| self.parameters.realm.as_deref())
            .map(str::to_owned);
        tracing::trace!(
            method = %request.method,
            url = %request.url,
            signed = request.query.len() + request.form.as_ref().map_or(0, Params::len),
            "computed oauth1 signature"
        );
        Ok(Signature::OAuth1 {
            oauth_params,
            realm,
        })
    }
}

fn promoted_parameter<'r>(request: &'r SignableRequest, key: &str) -> Option<&'r str> {
    request
        .form()
        .and_then(|form| form.get(key))
        .or_else(|| request.query().get(key))
}

/// Read back `OAuth k="v",...` into decoded parameters.
fn parse_authorization(authorization: &str) -> Params {
    authorization
        .strip_prefix(AUTHORIZATION_PREFIX)
        .unwrap_or(authorization)
        .split(',')
        .filter_map(|item| item.split_once('='))
        .map(|(k, v)| {
            let value = percent_decode_str(v.trim_matches('"')).decode_utf8_lossy();
            (k.trim().to_owned(), value.into_owned())
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct OAuthParameters<'a, TSignatureMethod>
where
    TSignatureMethod: SignatureMethod + Clone,
{
    callback: Option<Cow<'a, str>>,
    nonce: Option<Cow<'a, str>>,
    realm: Option<Cow<'a, str>>,
    signature_method: TSignatureMethod,
    timestamp: Option<u64>,
    verifier: Option<Cow<'a, str>>,
    version: bool,
}

impl Default for OAuthParameters<'static, HmacSha1> {
    fn default() -> Self {
        OAuthParameters {
            callback: None,
            nonce: None,
            realm: None,
            signature_method: HmacSha1,
            timestamp: None,
            verifier: None,
            version: false,
        }
    }
}

impl<'a> OAuthParameters<'a, HmacSha1> {
    pub fn new() -> Self {
        Default::default()
    }
}

impl<'a, T> OAuthParameters<'a, T>
where
    T: SignatureMethod + Clone,
{
    /// set the oauth_callback value
    pub fn callback<U>(self, callback: U) -> Self
    where
        U: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            callback: Some(callback.into()),
            ..self
        }
    }

    /// set the oauth_nonce value
    pub fn nonce<U>(self, nonce: U) -> Self
    where
        U: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            nonce: Some(nonce.into()),
            ..self
        }
    }

    /// set the realm value used in the `Authorization` header
    pub fn realm<U>(self, realm: U) -> Self
    where
        U: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            realm: Some(realm.into()),
            ..self
        }
    }

    /// set the oauth_timestamp value
    pub fn timestamp<U>(self, timestamp: U) -> Self
    where
        U: Into<u64>,
    {
        OAuthParameters {
            timestamp: Some(timestamp.into()),
            ..self
        }
    }

    /// set the oauth_verifier value
    pub fn verifier<U>(self, verifier: U) -> Self
    where
        U: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            verifier: Some(verifier.into()),
            ..self
        }
    }

    /// set the oauth_version value (boolean)
    ///
    /// # Note
    /// When the version has value `true`, oauth_version will be set with "1.0".
    /// Otherwise, oauth_version will not be included in your request.
    pub fn version<U>(self, version: U) -> Self
    where
        U: Into<bool>,
    {
        OAuthParameters {
            version: version.into(),
            ..self
        }
    }

    pub fn signature_method<TSignatureMethod>(
        self,
        signature_method: TSignatureMethod,
    ) -> OAuthParameters<'a, TSignatureMethod>
    where
        TSignatureMethod: SignatureMethod + Clone,
    {
        OAuthParameters {
            signature_method,
            callback: self.callback,
            nonce: self.nonce,
            realm: self.realm,
            timestamp: self.timestamp,
            verifier: self.verifier,
            version: self.version,
        }
    }

    pub fn get_realm(&self) -> Option<&str> {
        self.realm.as_deref()
    }

    fn build_options<'o>(
        &'o self,
        token: Option<&'o str>,
        callback: Option<&'o str>,
        verifier: Option<&'o str>,
        version: bool,
    ) -> Options<'o> {
        let mut opt = Options::new();

        // NOTE: items must be added by alphabetical order

        if let Some(callback) = callback.or(self.callback.as_deref()) {
            opt.callback(callback);
        }
        if let Some(ref nonce) = self.nonce {
            opt.nonce(nonce.as_ref());
        }
        if let Some(timestamp) = self.timestamp {
            opt.timestamp(timestamp);
        }
        if let Some(token) = token {
            opt.token(token);
        }
        if let Some(verifier) = verifier.or(self.verifier.as_deref()) {
            opt.verifier(verifier);
        }
        opt.version(self.version || version);

        opt
    }
}

#[cfg(test)]
mod tests {
    use http::Method;
    use url::Url;

    use super::*;
    use crate::OAUTH_SIGNATURE_KEY;

    fn signable(
        method: Method,
        url: &str,
        query: &[(&str, &str)],
        form: Option<&[(&str, &str)]>,
    ) -> SignableRequest {
        let mut request = SignableRequest::new(method, Url::parse(url).unwrap());
        request.query = query.iter().copied().collect();
        request.form = form.map(|form| form.iter().copied().collect());
        request
    }

    fn oauth_params(signature: Signature) -> Params {
        match signature {
            Signature::OAuth1 { oauth_params, .. } => oauth_params,
            other => panic!("unexpected signature {:?}", other),
        }
    }

    #[test]
    fn sign_post_initiate() {
        // https://tools.ietf.org/html/rfc5849
        let params = OAuthParameters::new()
            .nonce("wIjqoS")
            .timestamp(137_131_200u64)
            .callback("http://printer.example.com/ready")
            .realm("photos");
        let signer = OAuth1Signer::with_params(
            Secrets::new("dpf43f3p2l4k3l03", "kd94hf93k423kf44"),
            params,
        );
        let request = signable(
            Method::POST,
            "https://photos.example.net/initiate",
            &[],
            Some(&[]),
        );

        let signature = signer.sign(&request).unwrap();
        if let Signature::OAuth1 { realm, .. } = &signature {
            assert_eq!(realm.as_deref(), Some("photos"));
        }
        let oauth_params = oauth_params(signature);
        assert_eq!(
            oauth_params.get(OAUTH_SIGNATURE_KEY),
            Some("74KNZJeDHnMBp0EMJ9ZHt/XKycU=")
        );
        assert_eq!(
            oauth_params.get(OAUTH_CALLBACK_KEY),
            Some("http://printer.example.com/ready")
        );
        assert_eq!(oauth_params.get("oauth_consumer_key"), Some("dpf43f3p2l4k3l03"));
        assert_eq!(oauth_params.get("oauth_signature_method"), Some("HMAC-SHA1"));
        assert!(!oauth_params.contains_key("oauth_token"));
    }

    #[test]
    fn promoted_callback_signs_the_same() {
        let params = OAuthParameters::new()
            .nonce("wIjqoS")
            .timestamp(137_131_200u64);
        let signer = OAuth1Signer::with_params(
            Secrets::new("dpf43f3p2l4k3l03", "kd94hf93k423kf44"),
            params,
        );
        let request = signable(
            Method::POST,
            "https://photos.example.net/initiate",
            &[],
            Some(&[(OAUTH_CALLBACK_KEY, "http://printer.example.com/ready")]),
        );

        let oauth_params = oauth_params(signer.sign(&request).unwrap());
        assert_eq!(
            oauth_params.get(OAUTH_SIGNATURE_KEY),
            Some("74KNZJeDHnMBp0EMJ9ZHt/XKycU=")
        );
    }

    #[test]
    fn promoted_version_is_signed() {
        let secrets = || {
            Secrets::new("dpf43f3p2l4k3l03", "kd94hf93k423kf44")
                .token("nnch734d00sl2jdk", "pfkkdhi9sl3r4s00")
        };
        let params = || {
            OAuthParameters::new()
                .nonce("chapoH")
                .timestamp(137_131_202u64)
        };
        let url = "http://photos.example.net/photos";
        let query = [("file", "vacation.jpg"), ("size", "original")];

        let versioned = OAuth1Signer::with_params(secrets(), params().version(true));
        let expected = oauth_params(
            versioned
                .sign(&signable(Method::GET, url, &query, None))
                .unwrap(),
        );

        let plain = OAuth1Signer::with_params(secrets(), params());
        let mut with_version = query.to_vec();
        with_version.push((OAUTH_VERSION_KEY, "1.0"));
        let promoted = oauth_params(
            plain
                .sign(&signable(Method::GET, url, &with_version, None))
                .unwrap(),
        );

        assert_eq!(promoted.get(OAUTH_VERSION_KEY), Some("1.0"));
        assert_eq!(
            promoted.get(OAUTH_SIGNATURE_KEY),
            expected.get(OAUTH_SIGNATURE_KEY)
        );
        assert_ne!(
            promoted.get(OAUTH_SIGNATURE_KEY),
            Some("MdpQcU8iPSUjWoN/UDMsK2sui9I=")
        );
    }

    #[test]
    fn sign_get_query() {
        // https://tools.ietf.org/html/rfc5849
        let secrets = Secrets::new("dpf43f3p2l4k3l03", "kd94hf93k423kf44")
            .token("nnch734d00sl2jdk", "pfkkdhi9sl3r4s00");
        let params = OAuthParameters::new()
            .nonce("chapoH")
            .timestamp(137_131_202u64)
            .realm("Photos");
        let signer = OAuth1Signer::with_params(secrets, params);
        let request = signable(
            Method::GET,
            "http://photos.example.net/photos",
            &[("file", "vacation.jpg"), ("size", "original")],
            None,
        );

        let oauth_params = oauth_params(signer.sign(&request).unwrap());
        assert_eq!(
            oauth_params.get(OAUTH_SIGNATURE_KEY),
            Some("MdpQcU8iPSUjWoN/UDMsK2sui9I=")
        );
        assert_eq!(oauth_params.get("oauth_token"), Some("nnch734d00sl2jdk"));
        assert!(!oauth_params.contains_key("file"));
    }

    #[test]
    fn sign_post_body() {
        // https://developer.twitter.com/ja/docs/basics/authentication/guides/creating-a-signature
        let secrets = Secrets::new(
            "xvz1evFS4wEEPTGEFPHBog",
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
        )
        .token(
            "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
            "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
        );
        let params = OAuthParameters::new()
            .nonce("kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg")
            .timestamp(1_318_622_958u64)
            .version(true);
        let signer = OAuth1Signer::with_params(secrets, params);
        let request = signable(
            Method::POST,
            "https://api.twitter.com/1.1/statuses/update.json",
            &[],
            Some(&[
                ("include_entities", "true"),
                (
                    "status",
                    "Hello Ladies + Gentlemen, a signed OAuth request!",
                ),
            ]),
        );

        let oauth_params = oauth_params(signer.sign(&request).unwrap());
        assert_eq!(
            oauth_params.get(OAUTH_SIGNATURE_KEY),
            Some("hCtSmYh+iHYCEqBWrE7C7hYmtUk=")
        );
        assert_eq!(oauth_params.get("oauth_version"), Some("1.0"));
    }

    #[test]
    fn request_realm_overrides_default() {
        let signer = OAuth1Signer::with_params(
            Secrets::new("123", "345"),
            OAuthParameters::new().realm("default"),
        );
        let mut request = signable(Method::GET, "http://example.com/", &[], None);
        request.realm = Some("example".to_owned());

        match signer.sign(&request).unwrap() {
            Signature::OAuth1 { realm, .. } => assert_eq!(realm.as_deref(), Some("example")),
            other => panic!("unexpected signature {:?}", other),
        }
    }

    #[test]
    fn new_signer_sends_version_and_random_nonce() {
        let signer = OAuth1Signer::new("123", "345");
        let request = signable(Method::GET, "http://example.com/", &[], None);

        let oauth_params = oauth_params(signer.sign(&request).unwrap());
        assert_eq!(oauth_params.get("oauth_version"), Some("1.0"));
        assert!(oauth_params.get("oauth_nonce").map_or(false, |n| !n.is_empty()));
        assert!(oauth_params.contains_key("oauth_timestamp"));
        assert!(oauth_params.contains_key(OAUTH_SIGNATURE_KEY));
    }

    #[test]
    fn parse_authorization_decodes() {
        let parsed = parse_authorization(
            "OAuth oauth_consumer_key=\"key\",oauth_signature=\"MdpQcU8iPSUjWoN%2FUDMsK2sui9I%3D\"",
        );
        assert_eq!(parsed.get("oauth_consumer_key"), Some("key"));
        assert_eq!(
            parsed.get(OAUTH_SIGNATURE_KEY),
            Some("MdpQcU8iPSUjWoN/UDMsK2sui9I=")
        );
    }
}
