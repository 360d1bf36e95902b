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

//! S3 signature v2 support with convenience APIs

// Re-export all signature v2 types
pub use s3sign_s3_v2::*;

#[cfg(feature = "default-context")]
use crate::{default_context, CredentialStore, Signer, SigningInterceptor};

/// Interceptor signing with signature v2 credentials.
#[cfg(feature = "default-context")]
pub type DefaultInterceptor = SigningInterceptor<Credential>;

/// Create an interceptor with standard configuration
///
/// This function creates an interceptor with:
/// - Default context (reqwest transport, OS environment)
/// - Default credential provider (reads `AWS_ACCESS_KEY_ID` and friends)
/// - Signature v2 request signer without endpoint prefix
///
/// # Example
///
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> s3sign_core::Result<()> {
/// let interceptor = s3sign::s3::default_interceptor();
///
/// let req = http::Request::get("https://s3.example.com/bucket/object")
///     .body(bytes::Bytes::new())
///     .unwrap();
/// let resp = interceptor.send(req).await?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "default-context")]
pub fn default_interceptor() -> DefaultInterceptor {
    interceptor_with_signer(RequestSigner::new())
}

/// Same as [`default_interceptor`] but with a custom request signer, for
/// example one configured with an endpoint prefix.
///
/// ```no_run
/// use s3sign::s3::{interceptor_with_signer, RequestSigner};
///
/// let interceptor = interceptor_with_signer(RequestSigner::new().with_endpoint_prefix("/s3"));
/// ```
#[cfg(feature = "default-context")]
pub fn interceptor_with_signer(signer: RequestSigner) -> DefaultInterceptor {
    let ctx = default_context();
    let store = CredentialStore::new(DefaultCredentialProvider::new());
    SigningInterceptor::new(Signer::new(ctx, store, signer))
}
