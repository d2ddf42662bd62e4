use super::{SignableRequest, Signature, Signer};
use crate::{ClientCredentials, SignResult};

/// Presents an OAuth2 access token as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OAuth2Signer {
    credentials: ClientCredentials,
}

impl OAuth2Signer {
    /// A signer without any credentials.
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_credentials(credentials: ClientCredentials) -> Self {
        OAuth2Signer { credentials }
    }

    pub fn access_token<T>(self, access_token: T) -> Self
    where
        T: Into<String>,
    {
        OAuth2Signer {
            credentials: self.credentials.access_token(access_token),
        }
    }

    pub fn client_id(&self) -> Option<&str> {
        self.credentials.client_id.as_deref()
    }

    pub fn client_secret(&self) -> Option<&str> {
        self.credentials.client_secret.as_deref()
    }

    pub fn get_access_token(&self) -> Option<&str> {
        self.credentials.access_token.as_deref()
    }
}

impl Signer for OAuth2Signer {
    fn name(&self) -> &'static str {
        "oauth2"
    }

    fn default_header_auth(&self) -> bool {
        true
    }

    // without a token the request is sent unauthenticated
    fn sign(&self, _request: &SignableRequest) -> SignResult<Signature> {
        Ok(self
            .get_access_token()
            .map_or(Signature::Unsigned, |token| Signature::Bearer(token.to_owned())))
    }
}
