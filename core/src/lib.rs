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

//! Core components for signing S3 requests.
//!
//! This crate provides the foundational types and traits for the s3sign
//! ecosystem: the building blocks every signing scheme shares, plus the
//! interceptor that sends signed requests and retries once on rejection.
//!
//! ## Overview
//!
//! - **Context**: holds the HTTP transport ([`HttpSend`]) and environment access ([`Env`])
//! - **CredentialStore**: the shared, refreshable credential used for signing
//! - **Signer**: pairs a credential store with a [`SignRequest`] implementation
//! - **SigningInterceptor**: signs, sends, and on 400/403 refreshes credentials and retries once
//!
//! ## Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use bytes::Bytes;
//! use s3sign_core::{
//!     Context, CredentialStore, ProvideCredential, Result, SignRequest, Signer,
//!     SigningCredential, SigningInterceptor,
//! };
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     key: String,
//!     secret: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.key.is_empty() && !self.secret.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyProvider;
//!
//! #[async_trait]
//! impl ProvideCredential for MyProvider {
//!     type Credential = MyCredential;
//!
//!     async fn provide_credential(&self, _: &Context) -> Result<Option<MyCredential>> {
//!         Ok(Some(MyCredential {
//!             key: "my-access-key".to_string(),
//!             secret: "my-secret-key".to_string(),
//!         }))
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MySigner;
//!
//! #[async_trait]
//! impl SignRequest for MySigner {
//!     type Credential = MyCredential;
//!
//!     async fn sign_request(
//!         &self,
//!         _ctx: &Context,
//!         _req: &http::Request<Bytes>,
//!         _cred: Option<&MyCredential>,
//!     ) -> Result<http::Request<Bytes>> {
//!         todo!()
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let ctx = Context::new();
//! let store = CredentialStore::new(MyProvider);
//! let interceptor = SigningInterceptor::new(Signer::new(ctx, store, MySigner));
//!
//! let req = http::Request::get("https://s3.example.com/bucket/key")
//!     .body(Bytes::new())
//!     .unwrap();
//! let resp = interceptor.send(req).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: digests and keyed hashes
//! - [`time`]: signing time and its wire formats
//! - [`utils`]: general utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};

mod context;
pub use context::{Context, Env, HttpSend, NoopEnv, NoopHttpSend, OsEnv, StaticEnv};

mod api;
pub use api::{ProvideCredential, SignRequest, SigningCredential};
mod chain;
pub use chain::ProvideCredentialChain;
mod store;
pub use store::CredentialStore;
mod signer;
pub use signer::Signer;
mod interceptor;
pub use interceptor::SigningInterceptor;
