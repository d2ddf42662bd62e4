use std::borrow::Cow;

/// Supplies OAuth1 consumer and token credentials to the signer.
pub trait SecretsProvider {
    fn get_consumer_key_pair<'a>(&'a self) -> (&'a str, &'a str);

    fn get_token_pair_option<'a>(&'a self) -> Option<(&'a str, &'a str)>;

    fn get_token_option_pair<'a>(&'a self) -> (Option<&'a str>, Option<&'a str>) {
        self.get_token_pair_option()
            .map(|s| (Some(s.0), Some(s.1)))
            .unwrap_or((None, None))
    }
}

/// OAuth1 consumer key pair, optionally with a token pair.
///
/// `T` is `()` until [`Secrets::token`] attaches a token.
#[derive(Debug, Clone)]
pub struct Secrets<'a, T> {
    token: T,
    token_secret: T,
    consumer_key: Cow<'a, str>,
    consumer_secret: Cow<'a, str>,
}

impl<'a> Secrets<'a, ()> {
    pub fn new<TKey, TSecret>(consumer_key: TKey, consumer_secret: TSecret) -> Self
    where
        TKey: Into<Cow<'a, str>>,
        TSecret: Into<Cow<'a, str>>,
    {
        Secrets {
            token: (),
            token_secret: (),
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
        }
    }

    pub fn token<TKey, TSecret>(
        self,
        token: TKey,
        token_secret: TSecret,
    ) -> Secrets<'a, Cow<'a, str>>
    where
        TKey: Into<Cow<'a, str>>,
        TSecret: Into<Cow<'a, str>>,
    {
        Secrets {
            token: token.into(),
            token_secret: token_secret.into(),
            consumer_key: self.consumer_key,
            consumer_secret: self.consumer_secret,
        }
    }
}

impl SecretsProvider for Secrets<'_, ()> {
    fn get_consumer_key_pair<'a>(&'a self) -> (&'a str, &'a str) {
        (&self.consumer_key, &self.consumer_secret)
    }

    fn get_token_pair_option<'a>(&'a self) -> Option<(&'a str, &'a str)> {
        None
    }
}

impl SecretsProvider for Secrets<'_, Cow<'_, str>> {
    fn get_consumer_key_pair<'a>(&'a self) -> (&'a str, &'a str) {
        (&self.consumer_key, &self.consumer_secret)
    }

    fn get_token_pair_option<'a>(&'a self) -> Option<(&'a str, &'a str)> {
        Some((&self.token, &self.token_secret))
    }
}

/// OAuth2 client credentials. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub access_token: Option<String>,
}

impl ClientCredentials {
    pub fn new<TId, TSecret>(client_id: TId, client_secret: TSecret) -> Self
    where
        TId: Into<String>,
        TSecret: Into<String>,
    {
        ClientCredentials {
            client_id: Some(client_id.into()),
            client_secret: Some(client_secret.into()),
            access_token: None,
        }
    }

    pub fn access_token<T>(self, access_token: T) -> Self
    where
        T: Into<String>,
    {
        ClientCredentials {
            access_token: Some(access_token.into()),
            ..self
        }
    }
}

/// Ofly application credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppCredentials {
    pub app_id: String,
    pub app_secret: String,
    pub user_id: Option<String>,
}

impl AppCredentials {
    pub fn new<TId, TSecret>(app_id: TId, app_secret: TSecret) -> Self
    where
        TId: Into<String>,
        TSecret: Into<String>,
    {
        AppCredentials {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            user_id: None,
        }
    }

    /// Default `oflyUserid`, used when a request does not carry one.
    pub fn user_id<T>(self, user_id: T) -> Self
    where
        T: Into<String>,
    {
        AppCredentials {
            user_id: Some(user_id.into()),
            ..self
        }
    }
}
