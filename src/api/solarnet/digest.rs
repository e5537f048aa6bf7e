//! HTTP digest authentication as the SolarNet web server implements it.
//!
//! The server sends the challenge in `X-WWW-Authenticate` to keep browsers from prompting, and
//! expects unquoted parameters in the `Authorization` header.

use std::{str::FromStr, time::Duration};

use reqwest::{
    Method,
    Response,
    StatusCode,
    Url,
    header::{AUTHORIZATION, HeaderMap, WWW_AUTHENTICATE},
};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::prelude::*;

const NONCE_COUNT: &str = "00000001";
const CLIENT_NONCE: &str = "NaN";

pub struct Client {
    inner: reqwest::Client,
    base_url: Url,
    username: String,
    password: String,

    /// Last received challenge, reused until the server rejects it.
    challenge: Mutex<Option<Challenge>>,
}

impl Client {
    pub fn new(base_url: Url, username: String, password: String) -> Result<Self> {
        let inner = reqwest::Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self { inner, base_url, username, password, challenge: Mutex::new(None) })
    }

    pub async fn get(&self, uri: &str) -> Result<Response> {
        self.send(Method::GET, uri, None::<&()>).await
    }

    pub async fn post_json<B: Serialize + Sync>(&self, uri: &str, body: &B) -> Result<Response> {
        self.send(Method::POST, uri, Some(body)).await
    }

    /// Send the request, answering an authentication challenge once.
    #[instrument(skip_all, level = Level::DEBUG, fields(method = %method, uri = uri))]
    async fn send<B: Serialize + Sync>(
        &self,
        method: Method,
        uri: &str,
        body: Option<&B>,
    ) -> Result<Response> {
        let url = self.base_url.join(uri).with_context(|| format!("invalid URI `{uri}`"))?;

        let cached_challenge = self.challenge.lock().await.clone();
        let response = self.request(&method, &url, uri, body, cached_challenge.as_ref()).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return response.error_for_status().with_context(|| format!("`{method} {uri}` failed"));
        }

        debug!("challenged, retrying…");
        let challenge = Challenge::from_headers(response.headers())?;
        let response = self.request(&method, &url, uri, body, Some(&challenge)).await?;
        ensure!(
            response.status() != StatusCode::UNAUTHORIZED,
            "authentication failed for `{method} {uri}`, check the username and password",
        );
        *self.challenge.lock().await = Some(challenge);
        response.error_for_status().with_context(|| format!("`{method} {uri}` failed"))
    }

    async fn request<B: Serialize + Sync>(
        &self,
        method: &Method,
        url: &Url,
        uri: &str,
        body: Option<&B>,
        challenge: Option<&Challenge>,
    ) -> Result<Response> {
        let mut request = self.inner.request(method.clone(), url.clone());
        if let Some(challenge) = challenge {
            request = request.header(
                AUTHORIZATION,
                challenge.authorization(method, uri, &self.username, &self.password),
            );
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        request.send().await.with_context(|| format!("failed to call `{method} {uri}`"))
    }
}

/// Digest challenge parameters. Only `MD5` is supported.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Challenge {
    pub realm: String,
    pub nonce: String,
    pub qop: String,
}

impl Challenge {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self> {
        headers
            .get("X-WWW-Authenticate")
            .or_else(|| headers.get(WWW_AUTHENTICATE))
            .context("the server requires authentication but sent no challenge")?
            .to_str()
            .context("the challenge is not valid ASCII")?
            .parse()
    }

    #[must_use]
    pub fn authorization(
        &self,
        method: &Method,
        uri: &str,
        username: &str,
        password: &str,
    ) -> String {
        let Self { realm, nonce, qop } = self;
        let ha1 = md5_hex(&format!("{username}:{realm}:{password}"));
        let ha2 = md5_hex(&format!("{method}:{uri}"));
        let response = md5_hex(&format!("{ha1}:{nonce}:{NONCE_COUNT}:{CLIENT_NONCE}:{qop}:{ha2}"));
        format!(
            "Digest username={username}, realm={realm}, nonce={nonce}, uri={uri}, \
             response={response}, qop={qop}, nc={NONCE_COUNT}, cnonce={CLIENT_NONCE}"
        )
    }
}

impl FromStr for Challenge {
    type Err = Error;

    fn from_str(header: &str) -> Result<Self> {
        let parameter = |name: &str| {
            header.split(',').find_map(|part| {
                let (key, value) = part.split_once('=')?;
                let key = key.trim().trim_start_matches("Digest").trim();
                (key == name).then(|| value.trim().trim_matches('"').to_owned())
            })
        };

        // RFC 7616 defaults to MD5 when the algorithm is omitted:
        let algorithm = parameter("algorithm").unwrap_or_else(|| "MD5".to_owned());
        ensure!(algorithm == "MD5", "unsupported digest algorithm `{algorithm}`");

        Ok(Self {
            realm: parameter("realm").context("the challenge has no realm")?,
            nonce: parameter("nonce").context("the challenge has no nonce")?,
            qop: parameter("qop").context("the challenge has no qop")?,
        })
    }
}

fn md5_hex(text: &str) -> String {
    let digest = md5::compute(text.as_bytes());
    format!("{digest:x}")
}
