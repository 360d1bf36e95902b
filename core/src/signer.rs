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

use crate::{Context, CredentialStore, Error, Result, SignRequest, SigningCredential};
use bytes::Bytes;
use std::sync::Arc;

/// Signer is the main struct used to sign the request.
///
/// It pairs a [`CredentialStore`] with a [`SignRequest`] implementation.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    store: CredentialStore<K>,
    builder: Arc<dyn SignRequest<Credential = K>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer.
    pub fn new(
        ctx: Context,
        store: CredentialStore<K>,
        builder: impl SignRequest<Credential = K>,
    ) -> Self {
        Self {
            ctx,
            store,
            builder: Arc::new(builder),
        }
    }

    /// The context this signer runs in.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// The credential store backing this signer.
    pub fn store(&self) -> &CredentialStore<K> {
        &self.store
    }

    /// Sign the request with the current credential.
    ///
    /// Requests the signer refuses fail before the credential is loaded.
    pub async fn sign(&self, req: &http::Request<Bytes>) -> Result<http::Request<Bytes>> {
        self.builder.check_request(req)?;

        let cred = self
            .store
            .load(&self.ctx)
            .await?
            .ok_or_else(|| Error::credential_invalid("no credential available for signing"))?;

        self.sign_with(req, &cred).await
    }

    /// Sign the request with the given credential.
    pub async fn sign_with(
        &self,
        req: &http::Request<Bytes>,
        cred: &K,
    ) -> Result<http::Request<Bytes>> {
        self.builder.sign_request(&self.ctx, req, Some(cred)).await
    }

    /// Refresh the credential in the backing store.
    pub async fn refresh(&self) -> Result<K> {
        self.store.refresh(&self.ctx).await
    }
}
