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

//! Tests against a real S3 compatible service.
//!
//! Skipped unless `S3SIGN_S3_V2_TEST=on`, see `.env.example`.

use std::env;

use anyhow::Result;
use bytes::Bytes;
use http::{Method, StatusCode};
use log::{debug, warn};
use s3sign_core::{Context, CredentialStore, Signer, SigningInterceptor};
use s3sign_http_send_reqwest::ReqwestHttpSend;
use s3sign_s3_v2::{Credential, RequestSigner, StaticCredentialProvider};

fn init_interceptor() -> Option<(SigningInterceptor<Credential>, String)> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("S3SIGN_S3_V2_TEST").ok().as_deref() != Some("on") {
        return None;
    }

    let access_key =
        env::var("S3SIGN_S3_V2_ACCESS_KEY").expect("env S3SIGN_S3_V2_ACCESS_KEY must set");
    let secret_key =
        env::var("S3SIGN_S3_V2_SECRET_KEY").expect("env S3SIGN_S3_V2_SECRET_KEY must set");
    let url = env::var("S3SIGN_S3_V2_URL").expect("env S3SIGN_S3_V2_URL must set");

    let ctx = Context::new().with_http_send(ReqwestHttpSend::default());
    let store = CredentialStore::new(StaticCredentialProvider::new(&access_key, &secret_key));
    let mut signer = RequestSigner::new();
    if let Ok(prefix) = env::var("S3SIGN_S3_V2_ENDPOINT_PREFIX") {
        signer = signer.with_endpoint_prefix(prefix);
    }

    Some((SigningInterceptor::new(Signer::new(ctx, store, signer)), url))
}

fn request(method: Method, url: &str, body: &'static [u8]) -> http::Request<Bytes> {
    http::Request::builder()
        .method(method)
        .uri(url)
        .body(Bytes::from_static(body))
        .expect("request must be valid")
}

#[tokio::test]
async fn test_put_then_get_object() -> Result<()> {
    let Some((interceptor, url)) = init_interceptor() else {
        warn!("S3SIGN_S3_V2_TEST is not set, skipped");
        return Ok(());
    };

    let object = format!("{url}/s3sign_put_object_test");
    let mut req = request(Method::PUT, &object, b"Hello, World!");
    req.headers_mut().insert("x-amz-meta-origin", "s3sign".parse()?);
    let resp = interceptor.send(req).await?;
    debug!("put response: {resp:?}");
    assert_eq!(StatusCode::OK, resp.status());

    let resp = interceptor.send(request(Method::GET, &object, b"")).await?;
    assert_eq!(StatusCode::OK, resp.status());
    assert_eq!(&resp.body()[..], b"Hello, World!");
    Ok(())
}

#[tokio::test]
async fn test_head_not_exist_object() -> Result<()> {
    let Some((interceptor, url)) = init_interceptor() else {
        warn!("S3SIGN_S3_V2_TEST is not set, skipped");
        return Ok(());
    };

    let resp = interceptor
        .send(request(Method::HEAD, &format!("{url}/not_exist_file"), b""))
        .await?;
    assert_eq!(StatusCode::NOT_FOUND, resp.status());
    Ok(())
}

#[tokio::test]
async fn test_wrong_secret_is_rejected() -> Result<()> {
    let Some((_, url)) = init_interceptor() else {
        warn!("S3SIGN_S3_V2_TEST is not set, skipped");
        return Ok(());
    };

    let ctx = Context::new().with_http_send(ReqwestHttpSend::default());
    let store = CredentialStore::new(StaticCredentialProvider::new("invalid", "invalid"));
    let interceptor = SigningInterceptor::new(Signer::new(ctx, store, RequestSigner::new()));

    let resp = interceptor
        .send(request(Method::GET, &format!("{url}/not_exist_file"), b""))
        .await?;
    assert_eq!(StatusCode::FORBIDDEN, resp.status());
    Ok(())
}
