mod oauth1;
mod oauth2;
mod ofly;

pub use oauth1::{OAuth1Signer, OAuthParameters};
pub use oauth2::OAuth2Signer;
pub use ofly::{HashMethod, OflySigner};

use http::Method;
use url::Url;

use crate::auth::{bearer_authorization, oauth1_authorization, ofly_authorization};
use crate::{Params, SignResult, OAUTH_KEY_PREFIX};

/// Computes the authorization artifact for a request.
pub trait Signer {
    /// Protocol label used in logs.
    fn name(&self) -> &'static str;

    /// Whether the artifact goes into the `Authorization` header when the
    /// request does not say otherwise.
    fn default_header_auth(&self) -> bool {
        false
    }

    fn sign(&self, request: &SignableRequest) -> SignResult<Signature>;
}

/// The normalized view of a request that signers work on.
#[derive(Debug, Clone)]
pub struct SignableRequest {
    pub(crate) method: Method,
    pub(crate) url: Url,
    pub(crate) query: Params,
    pub(crate) form: Option<Params>,
    pub(crate) realm: Option<String>,
    pub(crate) user_id: Option<String>,
    pub(crate) hash_meth: Option<String>,
}

impl SignableRequest {
    pub fn new(method: Method, url: Url) -> Self {
        SignableRequest {
            method,
            url,
            query: Params::new(),
            form: None,
            realm: None,
            user_id: None,
            hash_meth: None,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request URL without its query string.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn query(&self) -> &Params {
        &self.query
    }

    /// Form-urlencoded body parameters, if the body is a form.
    pub fn form(&self) -> Option<&Params> {
        self.form.as_ref()
    }

    pub fn realm(&self) -> Option<&str> {
        self.realm.as_deref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn hash_meth(&self) -> Option<&str> {
        self.hash_meth.as_deref()
    }

    pub fn is_entity_method(&self) -> bool {
        is_entity_method(&self.method)
    }
}

pub(crate) fn is_entity_method(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

/// The output of a [`Signer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signature {
    /// Every `oauth_*` parameter, `oauth_signature` included.
    OAuth1 {
        oauth_params: Params,
        realm: Option<String>,
    },
    Bearer(String),
    /// `params` are the signed request parameters, `ofly_params` the
    /// `ofly*` parameters including `oflyApiSig`.
    Ofly { params: Params, ofly_params: Params },
    /// Nothing to present. The request goes out without authorization.
    Unsigned,
}

impl Signature {
    /// Merge the artifact into `request`, returning the `Authorization`
    /// header value when it goes into the header.
    pub(crate) fn place(self, request: &mut SignableRequest, header_auth: bool) -> Option<String> {
        match self {
            Signature::OAuth1 {
                oauth_params,
                realm,
            } => {
                let not_oauth = |k: &str, _: &str| !k.starts_with(OAUTH_KEY_PREFIX);
                request.query.retain(not_oauth);
                if let Some(form) = request.form.as_mut() {
                    form.retain(not_oauth);
                }
                if header_auth {
                    return Some(oauth1_authorization(&oauth_params, realm.as_deref()));
                }
                let entity = request.is_entity_method();
                match request.form.as_mut() {
                    Some(form) if entity => form.extend(oauth_params),
                    _ => request.query.extend(oauth_params),
                }
                None
            }
            Signature::Bearer(access_token) => {
                if header_auth {
                    Some(bearer_authorization(&access_token))
                } else {
                    request.query.insert(crate::ACCESS_TOKEN_KEY, access_token);
                    None
                }
            }
            Signature::Ofly {
                params,
                ofly_params,
            } => {
                request.query = params;
                if header_auth {
                    Some(ofly_authorization(&ofly_params))
                } else {
                    request.query.extend(ofly_params);
                    None
                }
            }
            Signature::Unsigned => None,
        }
    }
}
