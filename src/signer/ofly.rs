use std::fmt;
use std::str::FromStr;

use md5::Md5;
use sha1::{Digest, Sha1};
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use super::{SignableRequest, Signature, Signer};
use crate::{AppCredentials, Params, SignError, SignResult};

pub(crate) const OFLY_USER_ID_KEY: &str = "oflyUserid";
const OFLY_APP_ID_KEY: &str = "oflyAppId";
const OFLY_HASH_METH_KEY: &str = "oflyHashMeth";
const OFLY_TIMESTAMP_KEY: &str = "oflyTimestamp";
const OFLY_API_SIG_KEY: &str = "oflyApiSig";

/// Digest used for `oflyApiSig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashMethod {
    #[default]
    Sha1,
    Md5,
}

impl HashMethod {
    pub const ALL: [HashMethod; 2] = [HashMethod::Sha1, HashMethod::Md5];

    /// Identifier accepted by `hash_meth`.
    pub fn as_str(&self) -> &'static str {
        match self {
            HashMethod::Sha1 => "sha1",
            HashMethod::Md5 => "md5",
        }
    }

    /// Value sent as `oflyHashMeth`.
    fn ofly_name(&self) -> &'static str {
        match self {
            HashMethod::Sha1 => "SHA1",
            HashMethod::Md5 => "MD5",
        }
    }

    fn hex_digest(&self, input: &[u8]) -> String {
        match self {
            HashMethod::Sha1 => hex::encode(Sha1::digest(input)),
            HashMethod::Md5 => hex::encode(Md5::digest(input)),
        }
    }
}

impl fmt::Display for HashMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashMethod {
    type Err = SignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HashMethod::ALL
            .iter()
            .copied()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| SignError::UnsupportedHashMethod(s.to_owned()))
    }
}

/// Signs requests with an Ofly `oflyApiSig` hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OflySigner {
    credentials: AppCredentials,
    hash_method: HashMethod,
    timestamp: Option<OffsetDateTime>,
}

impl OflySigner {
    pub fn new<TId, TSecret>(app_id: TId, app_secret: TSecret) -> Self
    where
        TId: Into<String>,
        TSecret: Into<String>,
    {
        OflySigner::with_credentials(AppCredentials::new(app_id, app_secret))
    }

    pub fn with_credentials(credentials: AppCredentials) -> Self {
        OflySigner {
            credentials,
            hash_method: HashMethod::default(),
            timestamp: None,
        }
    }

    /// Hash method used when a request does not name one.
    pub fn hash_method(self, hash_method: HashMethod) -> Self {
        OflySigner {
            hash_method,
            ..self
        }
    }

    /// Pin `oflyTimestamp` instead of reading the clock.
    pub fn timestamp(self, timestamp: OffsetDateTime) -> Self {
        OflySigner {
            timestamp: Some(timestamp),
            ..self
        }
    }

    pub fn app_id(&self) -> &str {
        &self.credentials.app_id
    }

    /// `oflyTimestamp` as `YYYY-MM-DDTHH:MM:SS.mmmZ` in UTC.
    ///
    /// Milliseconds are always zero-padded to three digits (`.005Z`, never `.5Z`),
    /// which some servers that format them unpadded will not reproduce.
    fn format_timestamp(&self) -> SignResult<String> {
        let format = format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
        );
        self.timestamp
            .unwrap_or_else(OffsetDateTime::now_utc)
            .to_offset(UtcOffset::UTC)
            .format(format)
            .map_err(|err| SignError::InvalidTimestamp(err.to_string()))
    }
}

impl Signer for OflySigner {
    fn name(&self) -> &'static str {
        "ofly"
    }

    fn sign(&self, request: &SignableRequest) -> SignResult<Signature> {
        let hash_method = match request.hash_meth() {
            Some(name) => name.parse()?,
            None => self.hash_method,
        };
        let user_id = request
            .user_id()
            .or(self.credentials.user_id.as_deref())
            .ok_or(SignError::MissingUserId)?;

        let mut params = request.query().clone();
        params.insert(OFLY_USER_ID_KEY, user_id);

        let mut ofly_params = Params::new();
        ofly_params.insert(OFLY_APP_ID_KEY, self.credentials.app_id.as_str());
        ofly_params.insert(OFLY_HASH_METH_KEY, hash_method.ofly_name());
        ofly_params.insert(OFLY_TIMESTAMP_KEY, self.format_timestamp()?);

        // secret + path + "?" + params + "&" + ofly params, all unescaped
        let mut base = format!("{}{}?", self.credentials.app_secret, request.url().path());
        if !params.is_empty() {
            base.push_str(&params.to_sorted_plain());
            base.push('&');
        }
        base.push_str(&ofly_params.to_sorted_plain());

        ofly_params.insert(OFLY_API_SIG_KEY, hash_method.hex_digest(base.as_bytes()));
        tracing::trace!(%hash_method, path = request.url().path(), "computed ofly signature");

        Ok(Signature::Ofly {
            params,
            ofly_params,
        })
    }
}
