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

//! The full pipeline against an in-memory server that verifies v2 signatures.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use http::header::{AUTHORIZATION, DATE};
use http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use s3sign_core::hash::base64_hmac_sha1;
use s3sign_core::{
    Context, CredentialStore, ErrorKind, HttpSend, ProvideCredential, Signer, SigningInterceptor,
    StaticEnv,
};
use s3sign_s3_v2::canonicalize::normalize;
use s3sign_s3_v2::{
    string_to_sign, Credential, DefaultCredentialProvider, RequestSigner,
    StaticCredentialProvider,
};

/// Accepts only requests signed with `access_key`/`secret_key`.
#[derive(Debug, Clone, Default)]
struct VerifyingServer {
    received: Arc<Mutex<Vec<http::Request<Bytes>>>>,
}

impl VerifyingServer {
    fn received(&self) -> Vec<http::Request<Bytes>> {
        self.received.lock().unwrap().clone()
    }

    fn authorizations(&self) -> Vec<String> {
        self.received()
            .iter()
            .map(|r| r.headers()[AUTHORIZATION].to_str().unwrap().to_string())
            .collect()
    }

    fn verify(req: &http::Request<Bytes>) -> s3sign_core::Result<bool> {
        let info = normalize(req.headers(), req.uri(), req.body())?;
        if req.headers()["content-md5"] != info.body_hash.as_str() {
            return Ok(false);
        }
        let date = req.headers()[DATE].to_str()?;
        let sts = string_to_sign(req.method(), &info, date, req.uri().path())?;
        let expected = format!(
            "AWS access_key:{}",
            base64_hmac_sha1(b"secret_key", sts.as_bytes())
        );
        Ok(req.headers()[AUTHORIZATION] == expected.as_str())
    }
}

#[async_trait]
impl HttpSend for VerifyingServer {
    async fn http_send(
        &self,
        req: http::Request<Bytes>,
    ) -> s3sign_core::Result<http::Response<Bytes>> {
        let status = if Self::verify(&req)? {
            StatusCode::OK
        } else {
            StatusCode::FORBIDDEN
        };
        self.received.lock().unwrap().push(req);
        Ok(http::Response::builder().status(status).body(Bytes::new())?)
    }
}

fn interceptor(
    server: &VerifyingServer,
    stale: Option<Credential>,
) -> SigningInterceptor<Credential> {
    let _ = env_logger::builder().is_test(true).try_init();

    let ctx = Context::new().with_http_send(server.clone());
    let provider = StaticCredentialProvider::new("access_key", "secret_key");
    let mut store = CredentialStore::new(provider);
    if let Some(cred) = stale {
        store = store.with_credential(cred);
    }
    SigningInterceptor::new(Signer::new(ctx, store, RequestSigner::new()))
}

fn put_object() -> http::Request<Bytes> {
    http::Request::put("http://s3.example.com/bucket/object.txt")
        .header("Content-Type", "text/plain")
        .header("x-amz-meta-a", "2")
        .header("x-amz-meta-a", "1")
        .body(Bytes::from_static(b"Hello, World!"))
        .unwrap()
}

#[tokio::test]
async fn test_valid_credential_is_accepted_first_time() -> Result<()> {
    let server = VerifyingServer::default();

    let resp = interceptor(&server, None).send(put_object()).await?;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(server.received().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_stale_credential_is_refreshed_and_retried() -> Result<()> {
    let server = VerifyingServer::default();
    let stale = Credential::new("access_key", "rotated_secret");
    let interceptor = interceptor(&server, Some(stale));

    let resp = interceptor.send(put_object()).await?;

    assert_eq!(resp.status(), StatusCode::OK);
    let auths = server.authorizations();
    assert_eq!(auths.len(), 2);
    assert_ne!(auths[0], auths[1]);
    assert_eq!(
        interceptor.signer().store().current(),
        Some(Credential::new("access_key", "secret_key"))
    );

    // Both attempts carry the original request unchanged.
    for req in server.received() {
        assert_eq!(req.method(), Method::PUT);
        assert_eq!(req.uri().path(), "/bucket/object.txt");
        assert_eq!(req.body(), &Bytes::from_static(b"Hello, World!"));
        assert_eq!(req.headers()["x-amz-meta-a"], "1,2");
    }
    Ok(())
}

#[tokio::test]
async fn test_wrong_refreshed_credential_is_not_retried_twice() -> Result<()> {
    let server = VerifyingServer::default();
    let ctx = Context::new().with_http_send(server.clone());
    let provider = StaticCredentialProvider::new("access_key", "still_wrong");
    let store = CredentialStore::new(provider);
    let interceptor = SigningInterceptor::new(Signer::new(ctx, store, RequestSigner::new()));

    let resp = interceptor.send(put_object()).await?;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(server.received().len(), 2);
    Ok(())
}

/// Counts calls, never has a credential to offer.
#[derive(Debug, Clone, Default)]
struct CountingProvider {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ProvideCredential for CountingProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> s3sign_core::Result<Option<Credential>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }
}

#[tokio::test]
async fn test_post_without_credential_is_unsupported() {
    let server = VerifyingServer::default();
    let ctx = Context::new()
        .with_http_send(server.clone())
        .with_env(StaticEnv::default());
    let store = CredentialStore::new(DefaultCredentialProvider::new());
    let interceptor = SigningInterceptor::new(Signer::new(ctx, store, RequestSigner::new()));

    let req = http::Request::post("http://s3.example.com/bucket/object.txt")
        .body(Bytes::new())
        .unwrap();
    let err = interceptor.send(req).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnsupportedMethod);
    assert!(server.received().is_empty());
}

#[tokio::test]
async fn test_post_never_calls_the_provider() {
    let server = VerifyingServer::default();
    let provider = CountingProvider::default();
    let ctx = Context::new().with_http_send(server.clone());
    let store = CredentialStore::new(provider.clone());
    let interceptor = SigningInterceptor::new(Signer::new(ctx, store, RequestSigner::new()));

    let req = http::Request::post("http://s3.example.com/bucket/object.txt")
        .body(Bytes::from_static(b"Hello, World!"))
        .unwrap();
    let err = interceptor.send(req).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnsupportedMethod);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    assert!(server.received().is_empty());
}

#[tokio::test]
async fn test_post_never_reaches_the_server() {
    let server = VerifyingServer::default();
    let req = http::Request::post("http://s3.example.com/bucket/object.txt")
        .body(Bytes::new())
        .unwrap();

    let err = interceptor(&server, None).send(req).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnsupportedMethod);
    assert!(server.received().is_empty());
}
