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

use crate::{Context, Result};
use bytes::Bytes;
use std::fmt::Debug;

/// SigningCredential is the trait used by signer as the signing credential.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential is usable for signing.
    fn is_valid(&self) -> bool;
}

impl<T: SigningCredential> SigningCredential for Option<T> {
    fn is_valid(&self) -> bool {
        let Some(cred) = self else {
            return false;
        };

        cred.is_valid()
    }
}

/// ProvideCredential is the trait used to obtain fresh credentials.
///
/// The credential store calls it on first use and every time a refresh is
/// requested, for example after the server rejected a signature. How the
/// credential is actually obtained (environment, static config, an identity
/// provider) is up to the implementation.
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + Unpin + 'static {
    /// Credential returned by this provider.
    type Credential: Send + Sync + Unpin + 'static;

    /// Load credential from current env.
    ///
    /// Returns `Ok(None)` if this provider has nothing to offer.
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>>;
}

/// SignRequest is the trait used by signer to sign the request.
#[async_trait::async_trait]
pub trait SignRequest: Debug + Send + Sync + Unpin + 'static {
    /// Credential used by this signer.
    type Credential: Send + Sync + Unpin + 'static;

    /// Reject requests this signer can never sign.
    ///
    /// Runs before any credential is loaded, so a refused request costs no
    /// provider call. The default accepts every request.
    fn check_request(&self, req: &http::Request<Bytes>) -> Result<()> {
        let _ = req;
        Ok(())
    }

    /// Sign the request and return a new, signed request.
    ///
    /// The input request is never modified: method, uri and body are reused
    /// as-is and only derived headers differ in the returned request. This is
    /// what allows the same request to be signed again with other credentials.
    async fn sign_request(
        &self,
        ctx: &Context,
        req: &http::Request<Bytes>,
        credential: Option<&Self::Credential>,
    ) -> Result<http::Request<Bytes>>;
}
