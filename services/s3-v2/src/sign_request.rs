// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! S3 signature version 2.
use std::fmt::Write;
use std::str::FromStr;

use bytes::Bytes;
use http::header::AUTHORIZATION;
use http::HeaderMap;
use http::HeaderName;
use http::HeaderValue;
use http::Method;
use log::debug;
use s3sign_core::hash::base64_hmac_sha1;
use s3sign_core::time::format_http_date;
use s3sign_core::time::now;
use s3sign_core::time::DateTime;
use s3sign_core::{Context, Error, Result, SignRequest};

use crate::canonicalize::{normalize, HeaderEntry, SignInfo};
use crate::constants::*;
use crate::credential::Credential;

/// RequestSigner that implements S3 signature version 2.
///
/// - [Signing and authenticating REST requests](https://docs.aws.amazon.com/AmazonS3/latest/userguide/RESTAuthentication.html)
#[derive(Debug, Default)]
pub struct RequestSigner {
    endpoint_prefix: Option<String>,
    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new signer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the endpoint prefix stripped from the path when building the
    /// resource line, for services mounted below a path like `/s3`.
    pub fn with_endpoint_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.endpoint_prefix = Some(prefix.into());
        self
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Compute the authorization value of the request at the given instant.
    ///
    /// Returns the `Authorization` header value along with the [`SignInfo`] it
    /// was computed from, whose plain headers include the `Date` header.
    ///
    /// `POST` is rejected with [`ErrorKind::UnsupportedMethod`](s3sign_core::ErrorKind::UnsupportedMethod),
    /// use `PUT` instead.
    pub fn sign(
        &self,
        req: &http::Request<Bytes>,
        cred: &Credential,
        now: DateTime,
    ) -> Result<(String, SignInfo)> {
        check_method(req.method())?;

        let mut headers = req.headers().clone();
        if let Some(token) = &cred.session_token {
            headers.insert(X_AMZ_SECURITY_TOKEN, token.parse()?);
        }

        let mut info = normalize(&headers, req.uri(), req.body())?;
        let date = format_http_date(now);
        info.plain_headers.push(HeaderEntry::new(DATE, date.as_str()));

        let resource = self.canonicalize_resource(req.uri().path());
        let string_to_sign = string_to_sign(req.method(), &info, &date, &resource)?;
        let signature = base64_hmac_sha1(
            cred.secret_access_key.as_bytes(),
            string_to_sign.as_bytes(),
        );

        Ok((
            format!(
                "{AUTHORIZATION_SCHEME} {}:{signature}",
                cred.access_key_id
            ),
            info,
        ))
    }

    /// Strip the endpoint prefix from the path.
    ///
    /// This is plain string removal, the path is never re-parsed.
    fn canonicalize_resource(&self, path: &str) -> String {
        match self.endpoint_prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() => path.replace(prefix, ""),
            _ => path.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    fn check_request(&self, req: &http::Request<Bytes>) -> Result<()> {
        check_method(req.method())
    }

    async fn sign_request(
        &self,
        _ctx: &Context,
        req: &http::Request<Bytes>,
        credential: Option<&Self::Credential>,
    ) -> Result<http::Request<Bytes>> {
        let cred = credential.ok_or_else(|| Error::credential_invalid("missing credential"))?;
        let now = self.time.unwrap_or_else(now);

        let (authorization, info) = self.sign(req, cred, now)?;

        let mut headers = HeaderMap::with_capacity(
            info.plain_headers.len() + info.canonical_headers.len() + 1,
        );
        for entry in info.plain_headers.iter().chain(&info.canonical_headers) {
            headers.append(HeaderName::from_str(&entry.key)?, entry.value.parse()?);
        }
        headers.insert(AUTHORIZATION, {
            let mut value: HeaderValue = authorization.parse()?;
            value.set_sensitive(true);

            value
        });

        let mut signed = http::Request::new(req.body().clone());
        *signed.method_mut() = req.method().clone();
        *signed.uri_mut() = req.uri().clone();
        *signed.version_mut() = req.version();
        *signed.headers_mut() = headers;
        Ok(signed)
    }
}

fn check_method(method: &Method) -> Result<()> {
    if *method == Method::POST {
        return Err(Error::unsupported_method(
            "POST requests can't be signed with signature v2, use PUT instead",
        ));
    }
    Ok(())
}

/// Construct string to sign
///
/// ## Format
///
/// ```text
/// VERB + "\n" +
/// Content-MD5 + "\n" +
/// Content-Type + "\n" +
/// Date + "\n" +
/// [CanonicalizedHeaders + "\n"] +
/// Resource;
/// ```
///
/// The canonicalized headers line is left out entirely when there is no
/// `x-amz-*` header.
pub fn string_to_sign(
    method: &Method,
    info: &SignInfo,
    date: &str,
    resource: &str,
) -> Result<String> {
    let mut s = String::new();
    writeln!(&mut s, "{}", method.as_str())?;
    writeln!(&mut s, "{}", info.body_hash)?;
    writeln!(&mut s, "{}", info.content_type())?;
    writeln!(&mut s, "{date}")?;
    {
        let headers = info.canonical_block();
        if !headers.is_empty() {
            writeln!(&mut s, "{headers}")?;
        }
    }
    write!(&mut s, "{resource}")?;

    debug!("string to sign: {}", &s);
    Ok(s)
}
