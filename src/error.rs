use std::str::Utf8Error;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;
pub type SignResult<T> = std::result::Result<T, SignError>;
pub type TokenReaderResult<T> = std::result::Result<T, TokenReaderError>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("token acquisition failed : {0}")]
    TokenReader(#[from] TokenReaderError),
    #[error("sign failed : {0}")]
    Signer(#[from] SignError),
    #[error("parameter decoding failed : {0}")]
    Decode(#[from] DecodeError),
    #[error("invalid url : {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("invalid header : {0}")]
    InvalidHeader(String),
    #[error("request failed : {0}")]
    Reqwest(#[from] reqwest::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignError {
    #[error("hash_meth must be one of \"sha1\", \"md5\"")]
    UnsupportedHashMethod(String),
    #[error("an oflyUserid must be provided as `user_id`")]
    MissingUserId,
    #[error("invalid timestamp : {0}")]
    InvalidTimestamp(String),
}

/// Raised when a percent-decoded key or value is not valid UTF-8.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed UTF-8 sequence in {input:?} : {source}")]
pub struct DecodeError {
    pub input: String,
    #[source]
    pub source: Utf8Error,
}

#[derive(Error, Debug)]
pub enum TokenReaderError {
    #[error("response has malformed format: not found {0} in {1}")]
    TokenKeyNotFound(&'static str, String),
    #[error("response could not be decoded : {0}")]
    Decode(#[from] DecodeError),
    #[error("response is not a json object : {0}")]
    Json(#[from] serde_json::Error),
}
