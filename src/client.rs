// ----------------------------------------------------------------------------
// This source code contains derived artifacts from seanmonstar's `reqwest`.
// for further information(including license information),
// please visit their repository: https://github.com/seanmonstar/reqwest .
// ----------------------------------------------------------------------------
use std::borrow::Cow;

use oauth1_request::signature_method::SignatureMethod;
use oauth1_request::HmacSha1;
use reqwest::{Client as ReqwestClient, Method, Response};

use crate::resolve::resolve_url;
use crate::{
    AppCredentials, ClientCredentials, OAuth1Signer, OAuth2Signer, OAuthParameters, OflySigner,
    RequestOptions, Result, Secrets, SecretsProvider, Service, Signer,
};

/// Turns a `reqwest::Client` into a signing [`Session`].
pub trait SessionProvider {
    fn signed<TSigner>(self, signer: TSigner) -> Session<TSigner>
    where
        Self: Sized,
        TSigner: Signer;

    fn oauth1<'a, T>(self, secrets: T) -> OAuth1Session<'a, T>
    where
        Self: Sized,
        T: SecretsProvider,
    {
        self.oauth1_with_params(secrets, OAuthParameters::new().version(true))
    }

    fn oauth1_with_params<'a, TSecrets, TSignatureMethod>(
        self,
        secrets: TSecrets,
        params: OAuthParameters<'a, TSignatureMethod>,
    ) -> OAuth1Session<'a, TSecrets, TSignatureMethod>
    where
        Self: Sized,
        TSecrets: SecretsProvider,
        TSignatureMethod: SignatureMethod + Clone,
    {
        self.signed(OAuth1Signer::with_params(secrets, params))
    }

    fn oauth2(self, credentials: ClientCredentials) -> OAuth2Session
    where
        Self: Sized,
    {
        self.signed(OAuth2Signer::with_credentials(credentials))
    }

    fn ofly(self, credentials: AppCredentials) -> OflySession
    where
        Self: Sized,
    {
        self.signed(OflySigner::with_credentials(credentials))
    }
}

impl SessionProvider for ReqwestClient {
    fn signed<TSigner>(self, signer: TSigner) -> Session<TSigner>
    where
        TSigner: Signer,
    {
        Session::with_client(self, signer)
    }
}

/// A `reqwest::Client` bound to one signer and, optionally, one service.
#[derive(Debug, Clone)]
pub struct Session<TSigner> {
    pub(crate) inner: ReqwestClient,
    pub(crate) signer: TSigner,
    pub(crate) service: Option<Service>,
}

pub type OAuth1Session<'a, TSecrets = Secrets<'a, ()>, TSignatureMethod = HmacSha1> =
    Session<OAuth1Signer<'a, TSecrets, TSignatureMethod>>;
pub type OAuth2Session = Session<OAuth2Signer>;
pub type OflySession = Session<OflySigner>;

impl<TSigner> Session<TSigner>
where
    TSigner: Signer,
{
    /// Constructs a new `Session` on top of `reqwest::Client::new()`.
    pub fn new(signer: TSigner) -> Self {
        Session::with_client(ReqwestClient::new(), signer)
    }

    /// Constructs a new `Session` with specifying inner `reqwest::Client`.
    pub fn with_client(client: ReqwestClient, signer: TSigner) -> Self {
        Session {
            inner: client,
            signer,
            service: None,
        }
    }

    /// Attach a service; relative request URLs resolve against its base URL.
    pub fn service(self, service: Service) -> Self {
        Session {
            service: Some(service),
            ..self
        }
    }

    pub fn get_service(&self) -> Option<&Service> {
        self.service.as_ref()
    }

    pub fn signer(&self) -> &TSigner {
        &self.signer
    }

    pub fn resolve_url(&self, url: &str) -> String {
        resolve_url(url, self.service.as_ref())
    }

    /// Sign and send a request, returning reqwest's response as-is.
    ///
    /// # Errors
    ///
    /// This method fails if the request cannot be signed, or if there was
    /// an error while sending request, redirect loop was detected or
    /// redirect limit was exhausted.
    pub async fn request<U: AsRef<str>>(
        &self,
        method: Method,
        url: U,
        options: RequestOptions,
    ) -> Result<Response> {
        let builder = self.prepare(method, url, options)?;
        Ok(builder.send().await?)
    }

    /// Convenience method to make a `GET` request to a URL.
    pub async fn get<U: AsRef<str>>(&self, url: U, options: RequestOptions) -> Result<Response> {
        self.request(Method::GET, url, options).await
    }

    /// Convenience method to make a `POST` request to a URL.
    pub async fn post<U: AsRef<str>>(&self, url: U, options: RequestOptions) -> Result<Response> {
        self.request(Method::POST, url, options).await
    }

    /// Convenience method to make a `PUT` request to a URL.
    pub async fn put<U: AsRef<str>>(&self, url: U, options: RequestOptions) -> Result<Response> {
        self.request(Method::PUT, url, options).await
    }

    /// Convenience method to make a `PATCH` request to a URL.
    pub async fn patch<U: AsRef<str>>(&self, url: U, options: RequestOptions) -> Result<Response> {
        self.request(Method::PATCH, url, options).await
    }

    /// Convenience method to make a `DELETE` request to a URL.
    pub async fn delete<U: AsRef<str>>(&self, url: U, options: RequestOptions) -> Result<Response> {
        self.request(Method::DELETE, url, options).await
    }

    /// Convenience method to make a `HEAD` request to a URL.
    pub async fn head<U: AsRef<str>>(&self, url: U, options: RequestOptions) -> Result<Response> {
        self.request(Method::HEAD, url, options).await
    }
}

impl<TSigner> Default for Session<TSigner>
where
    TSigner: Signer + Default,
{
    fn default() -> Self {
        Session::new(TSigner::default())
    }
}

impl<'a> Session<OAuth1Signer<'a, Secrets<'a, ()>, HmacSha1>> {
    /// OAuth1 session signing with HMAC-SHA1 and no token.
    pub fn oauth1<TKey, TSecret>(consumer_key: TKey, consumer_secret: TSecret) -> Self
    where
        TKey: Into<Cow<'a, str>>,
        TSecret: Into<Cow<'a, str>>,
    {
        Session::new(OAuth1Signer::new(consumer_key, consumer_secret))
    }
}

impl Session<OAuth2Signer> {
    pub fn oauth2(credentials: ClientCredentials) -> Self {
        Session::new(OAuth2Signer::with_credentials(credentials))
    }

    pub fn client_id(&self) -> Option<&str> {
        self.signer.client_id()
    }

    pub fn client_secret(&self) -> Option<&str> {
        self.signer.client_secret()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.signer.get_access_token()
    }

    /// Replace the access token presented by this session.
    pub fn with_access_token<T>(self, access_token: T) -> Self
    where
        T: Into<String>,
    {
        Session {
            signer: self.signer.access_token(access_token),
            ..self
        }
    }
}

impl Session<OflySigner> {
    pub fn ofly<TId, TSecret>(app_id: TId, app_secret: TSecret) -> Self
    where
        TId: Into<String>,
        TSecret: Into<String>,
    {
        Session::new(OflySigner::new(app_id, app_secret))
    }
}
