// ----------------------------------------------------------------------------
// This source code contains derived artifacts from seanmonstar's `reqwest`.
// for further information(including license information),
// please visit their repository: https://github.com/seanmonstar/reqwest .
// ----------------------------------------------------------------------------
use std::time::Duration;

use http::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder as ReqwestRequestBuilder};
use url::Url;

use crate::signer::is_entity_method;
use crate::{
    parse_utf8_qsl, CaseInsensitiveMap, Params, RawParams, Result, Session, SignableRequest,
    Signer, DEFAULT_TIMEOUT, FORM_URLENCODED,
};

/// Per-request options for [`Session::request`].
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    header_auth: Option<bool>,
    params: Option<RawParams>,
    data: Option<RawParams>,
    headers: CaseInsensitiveMap<String>,
    hash_meth: Option<String>,
    realm: Option<String>,
    user_id: Option<String>,
    timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Default::default()
    }

    /// Put the signature into the `Authorization` header (`true`) or into
    /// the query string / body (`false`). Unset, the session decides.
    pub fn header_auth(self, header_auth: bool) -> Self {
        RequestOptions {
            header_auth: Some(header_auth),
            ..self
        }
    }

    /// Query parameters, as pairs, a map or an encoded string.
    pub fn params<T>(self, params: T) -> Self
    where
        T: Into<RawParams>,
    {
        RequestOptions {
            params: Some(params.into()),
            ..self
        }
    }

    /// Body data, as pairs, a map or an encoded string.
    ///
    /// With a form-urlencoded content type the data is decoded and signed;
    /// otherwise it is sent verbatim.
    pub fn data<T>(self, data: T) -> Self
    where
        T: Into<RawParams>,
    {
        RequestOptions {
            data: Some(data.into()),
            ..self
        }
    }

    /// Add a header. Names are compared ignoring case.
    pub fn header<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.headers.insert(key, value.into());
        self
    }

    /// Ofly hash method: `"sha1"` or `"md5"`.
    pub fn hash_meth<T>(self, hash_meth: T) -> Self
    where
        T: Into<String>,
    {
        RequestOptions {
            hash_meth: Some(hash_meth.into()),
            ..self
        }
    }

    /// OAuth1 realm for the `Authorization` header.
    pub fn realm<T>(self, realm: T) -> Self
    where
        T: Into<String>,
    {
        RequestOptions {
            realm: Some(realm.into()),
            ..self
        }
    }

    /// Ofly `oflyUserid`.
    pub fn user_id<T>(self, user_id: T) -> Self
    where
        T: Into<String>,
    {
        RequestOptions {
            user_id: Some(user_id.into()),
            ..self
        }
    }

    /// Enables a request timeout, overriding the default of five minutes.
    pub fn timeout(self, timeout: Duration) -> Self {
        RequestOptions {
            timeout: Some(timeout),
            ..self
        }
    }
}

fn is_form_urlencoded(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map_or(false, |mime| mime.trim().eq_ignore_ascii_case(FORM_URLENCODED))
}

impl<TSigner> Session<TSigner>
where
    TSigner: Signer,
{
    /// Sign the request and return reqwest's `RequestBuilder`, ready to send.
    ///
    /// # Errors
    ///
    /// Fails if the URL cannot be parsed, parameters cannot be decoded, a
    /// header is invalid or the signer rejects the request.
    pub fn prepare<U: AsRef<str>>(
        &self,
        method: Method,
        url: U,
        options: RequestOptions,
    ) -> Result<ReqwestRequestBuilder> {
        let RequestOptions {
            header_auth,
            params,
            data,
            mut headers,
            hash_meth,
            realm,
            user_id,
            timeout,
        } = options;

        // split the query off the url, it is signed along with `params`
        let mut url = Url::parse(&self.resolve_url(url.as_ref()))?;
        let mut query = parse_utf8_qsl(url.query().unwrap_or_default())?;
        url.set_query(None);
        if let Some(params) = params {
            query.extend(params.normalize()?);
        }

        if is_entity_method(&method) {
            headers.set_default(CONTENT_TYPE.as_str(), FORM_URLENCODED.to_owned());
        }
        let form_urlencoded = headers
            .get(CONTENT_TYPE.as_str())
            .map_or(false, |content_type| is_form_urlencoded(content_type));
        let (form, body) = match data {
            Some(data) if form_urlencoded => (Some(data.normalize()?), None),
            Some(data) => (None, Some(data.into_body())),
            None if form_urlencoded => (Some(Params::new()), None),
            None => (None, None),
        };

        let mut request = SignableRequest {
            method,
            url,
            query,
            form,
            realm,
            user_id,
            hash_meth,
        };
        let signature = self.signer.sign(&request)?;
        let header_auth = header_auth.unwrap_or_else(|| self.signer.default_header_auth());
        let authorization = signature.place(&mut request, header_auth);
        tracing::debug!(
            protocol = self.signer.name(),
            method = %request.method,
            url = %request.url,
            header_auth,
            "signed request"
        );

        let SignableRequest {
            method,
            url,
            query,
            form,
            ..
        } = request;
        let mut builder = self
            .inner
            .request(method, url)
            .headers(headers.to_header_map()?)
            .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT));
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if let Some(authorization) = authorization {
            builder = builder.header(AUTHORIZATION, authorization);
        }
        match (form, body) {
            (Some(form), _) if !form.is_empty() => builder = builder.body(form.to_query_string()),
            (_, Some(body)) => builder = builder.body(body),
            _ => {}
        }
        Ok(builder)
    }
}
