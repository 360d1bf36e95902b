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

use crate::{Context, Error, ProvideCredential, Result, SigningCredential};
use log::debug;
use std::fmt::{self, Debug};
use std::sync::{Arc, Mutex};

/// CredentialStore holds the credential currently used for signing.
///
/// A store is cheap to clone and all clones share the same credential, so a
/// refresh triggered by one request is visible to every request signed after
/// it. The credential is always replaced as a whole value: readers see either
/// the old pair or the new one, never a mix of both.
pub struct CredentialStore<K: SigningCredential> {
    provider: Arc<dyn ProvideCredential<Credential = K>>,
    credential: Arc<Mutex<Option<K>>>,
}

impl<K: SigningCredential> Clone for CredentialStore<K> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            credential: self.credential.clone(),
        }
    }
}

impl<K: SigningCredential> Debug for CredentialStore<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("provider", &self.provider)
            .field("credential", &self.current())
            .finish()
    }
}

impl<K: SigningCredential> CredentialStore<K> {
    /// Create a new, empty store backed by the given provider.
    ///
    /// Nothing is loaded until the first request is signed.
    pub fn new(provider: impl ProvideCredential<Credential = K>) -> Self {
        Self {
            provider: Arc::new(provider),
            credential: Arc::new(Mutex::new(None)),
        }
    }

    /// Seed the store with a credential.
    pub fn with_credential(self, credential: K) -> Self {
        self.set(credential);
        self
    }

    /// Snapshot of the current credential.
    pub fn current(&self) -> Option<K> {
        self.credential.lock().expect("lock poisoned").clone()
    }

    /// Replace the current credential.
    pub fn set(&self, credential: K) {
        *self.credential.lock().expect("lock poisoned") = Some(credential);
    }

    /// Return the current credential, loading it from the provider first if
    /// the store holds nothing valid yet.
    pub async fn load(&self, ctx: &Context) -> Result<Option<K>> {
        let cred = self.current();
        if cred.is_valid() {
            return Ok(cred);
        }

        let cred = self.provider.provide_credential(ctx).await?;
        if let Some(cred) = &cred {
            self.set(cred.clone());
        }
        Ok(cred)
    }

    /// Fetch a new credential from the provider and make it current.
    ///
    /// The lock is never held while the provider runs, concurrent refreshes
    /// are allowed and the last one to finish wins. On failure the previous
    /// credential is kept.
    pub async fn refresh(&self, ctx: &Context) -> Result<K> {
        debug!("refreshing credential from provider: {:?}", self.provider);

        let cred = self
            .provider
            .provide_credential(ctx)
            .await
            .map_err(|e| {
                Error::credential_refresh_failed("credential provider failed").with_source(e)
            })?
            .ok_or_else(|| {
                Error::credential_refresh_failed("credential provider returned no credential")
            })?;
        if !cred.is_valid() {
            return Err(Error::credential_refresh_failed(
                "credential provider returned an invalid credential",
            ));
        }

        self.set(cred.clone());
        Ok(cred)
    }
}
