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

//! S3 signature version 2 signing for s3sign.
//!
//! ## Overview
//!
//! Signature v2 signs a request with HMAC-SHA1 over a string made of the
//! method, `Content-MD5`, `Content-Type`, `Date`, the `x-amz-*` headers and
//! the resource path:
//!
//! ```text
//! Authorization: AWS <access_key_id>:<base64 signature>
//! ```
//!
//! `POST` is not supported by this signer, use `PUT` instead.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bytes::Bytes;
//! use s3sign_core::{Context, CredentialStore, OsEnv, Signer, SigningInterceptor};
//! use s3sign_http_send_reqwest::ReqwestHttpSend;
//! use s3sign_s3_v2::{DefaultCredentialProvider, RequestSigner};
//!
//! #[tokio::main]
//! async fn main() -> s3sign_core::Result<()> {
//!     let ctx = Context::new()
//!         .with_http_send(ReqwestHttpSend::default())
//!         .with_env(OsEnv);
//!
//!     let store = CredentialStore::new(DefaultCredentialProvider::new());
//!     let signer = Signer::new(ctx, store, RequestSigner::new());
//!     let interceptor = SigningInterceptor::new(signer);
//!
//!     let req = http::Request::put("https://s3.example.com/bucket/object.txt")
//!         .header("Content-Type", "text/plain")
//!         .body(Bytes::from_static(b"Hello, S3!"))
//!         .unwrap();
//!     let resp = interceptor.send(req).await?;
//!     println!("{}", resp.status());
//!     Ok(())
//! }
//! ```
//!
//! ## Credential Sources
//!
//! ```bash
//! export AWS_ACCESS_KEY_ID=your-access-key-id
//! export AWS_SECRET_ACCESS_KEY=your-secret-access-key
//! export AWS_SESSION_TOKEN=your-session-token  # Optional
//! ```

mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

pub mod canonicalize;
pub use canonicalize::{HeaderEntry, SignInfo};

mod sign_request;
pub use sign_request::{string_to_sign, RequestSigner};

mod provide_credential;
pub use provide_credential::*;
