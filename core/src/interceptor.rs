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

use crate::{Result, Signer, SigningCredential};
use bytes::Bytes;
use http::StatusCode;
use log::{debug, warn};

/// Statuses the server answers with when it rejects a signature.
const AUTH_FAILURE_STATUSES: [StatusCode; 2] = [StatusCode::BAD_REQUEST, StatusCode::FORBIDDEN];

/// SigningInterceptor signs requests, sends them and retries once on
/// authentication failure.
///
/// ```text
/// INITIAL -> SIGNED_SENT -> DONE
///                        -> REFRESH_RETRY_SENT -> DONE
/// ```
///
/// When the first response is a 400 or 403, the credential is refreshed and
/// the original request is signed again and resent exactly once. The second
/// response is returned whatever its status. If the refresh fails, the first
/// response is returned as-is.
#[derive(Clone, Debug)]
pub struct SigningInterceptor<K: SigningCredential> {
    signer: Signer<K>,
}

impl<K: SigningCredential> SigningInterceptor<K> {
    /// Create a new interceptor around the given signer.
    pub fn new(signer: Signer<K>) -> Self {
        Self { signer }
    }

    /// The signer used by this interceptor.
    pub fn signer(&self) -> &Signer<K> {
        &self.signer
    }

    /// Sign and send the request through the context's transport.
    ///
    /// Requests the signer refuses (for example an unsupported method) fail
    /// before any credential is loaded or anything is sent. Transport errors
    /// are returned as-is and never retried. Once a retry has been decided,
    /// failing to refresh or to re-sign returns the first response.
    pub async fn send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let ctx = self.signer.context();

        let signed = self.signer.sign(&req).await?;
        let resp = ctx.http_send(signed).await?;
        if !is_auth_failure(resp.status()) {
            return Ok(resp);
        }

        warn!(
            "{} {} rejected with {}, refreshing credential and retrying once",
            req.method(),
            req.uri(),
            resp.status()
        );
        let cred = match self.signer.refresh().await {
            Ok(cred) => cred,
            Err(err) => {
                warn!("credential refresh failed, giving up retry: {err:?}");
                return Ok(resp);
            }
        };

        let signed = match self.signer.sign_with(&req, &cred).await {
            Ok(signed) => signed,
            Err(err) => {
                warn!("signing with refreshed credential failed, giving up retry: {err:?}");
                return Ok(resp);
            }
        };
        let resp = ctx.http_send(signed).await?;
        debug!(
            "{} {} retried with refreshed credential: {}",
            req.method(),
            req.uri(),
            resp.status()
        );
        Ok(resp)
    }
}

fn is_auth_failure(status: StatusCode) -> bool {
    AUTH_FAILURE_STATUSES.contains(&status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Context, CredentialStore, Error, ErrorKind, HttpSend, ProvideCredential, SignRequest,
    };
    use async_trait::async_trait;
    use http::header::AUTHORIZATION;
    use http::Method;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use test_case::test_case;

    #[derive(Clone, Debug, PartialEq)]
    struct TestCredential {
        key: String,
        secret: String,
    }

    impl SigningCredential for TestCredential {
        fn is_valid(&self) -> bool {
            !self.key.is_empty() && !self.secret.is_empty()
        }
    }

    /// Hands out `secret-0`, `secret-1`, ... on every call.
    #[derive(Debug, Clone, Default)]
    struct RotatingProvider {
        calls: Arc<AtomicUsize>,
        fail_after_first: bool,
        // Secrets after the first one can't go into a header value.
        unsendable_after_first: bool,
    }

    #[async_trait]
    impl ProvideCredential for RotatingProvider {
        type Credential = TestCredential;

        async fn provide_credential(&self, _: &Context) -> Result<Option<TestCredential>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_after_first && n > 0 {
                return Err(Error::unexpected("identity provider unreachable"));
            }
            let secret = if self.unsendable_after_first && n > 0 {
                format!("secret\n{n}")
            } else {
                format!("secret-{n}")
            };
            Ok(Some(TestCredential {
                key: "key".to_string(),
                secret,
            }))
        }
    }

    /// Writes the credential into the authorization header, rejects POST.
    #[derive(Debug)]
    struct PlainSigner;

    #[async_trait]
    impl SignRequest for PlainSigner {
        type Credential = TestCredential;

        fn check_request(&self, req: &http::Request<Bytes>) -> Result<()> {
            if req.method() == Method::POST {
                return Err(Error::unsupported_method("POST"));
            }
            Ok(())
        }

        async fn sign_request(
            &self,
            _: &Context,
            req: &http::Request<Bytes>,
            credential: Option<&TestCredential>,
        ) -> Result<http::Request<Bytes>> {
            let cred = credential.ok_or_else(|| Error::credential_invalid("missing"))?;

            let mut signed = req.clone();
            signed.headers_mut().insert(
                AUTHORIZATION,
                format!("TEST {}:{}", cred.key, cred.secret).parse()?,
            );
            Ok(signed)
        }
    }

    /// Replies with queued statuses (200 once the queue is drained) and
    /// records every request it sees.
    #[derive(Debug, Clone, Default)]
    struct MockTransport {
        statuses: Arc<Mutex<VecDeque<StatusCode>>>,
        sent: Arc<Mutex<Vec<http::Request<Bytes>>>>,
    }

    impl MockTransport {
        fn replying(statuses: &[StatusCode]) -> Self {
            Self {
                statuses: Arc::new(Mutex::new(statuses.iter().copied().collect())),
                ..Default::default()
            }
        }

        fn sent(&self) -> Vec<http::Request<Bytes>> {
            self.sent.lock().unwrap().clone()
        }

        fn authorizations(&self) -> Vec<String> {
            self.sent()
                .iter()
                .map(|r| r.headers()[AUTHORIZATION].to_str().unwrap().to_string())
                .collect()
        }
    }

    #[async_trait]
    impl HttpSend for MockTransport {
        async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
            self.sent.lock().unwrap().push(req);
            let status = self
                .statuses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(StatusCode::OK);
            Ok(http::Response::builder().status(status).body(Bytes::new())?)
        }
    }

    fn interceptor(
        transport: &MockTransport,
        provider: &RotatingProvider,
    ) -> SigningInterceptor<TestCredential> {
        let _ = env_logger::builder().is_test(true).try_init();

        let ctx = Context::new().with_http_send(transport.clone());
        let store = CredentialStore::new(provider.clone());
        SigningInterceptor::new(Signer::new(ctx, store, PlainSigner))
    }

    fn put_request() -> http::Request<Bytes> {
        http::Request::put("http://s3.example.com/bucket/key")
            .body(Bytes::from_static(b"payload"))
            .unwrap()
    }

    #[tokio::test]
    async fn test_success_sends_once() {
        let transport = MockTransport::replying(&[StatusCode::OK]);
        let provider = RotatingProvider::default();

        let resp = interceptor(&transport, &provider)
            .send(put_request())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(transport.authorizations(), vec!["TEST key:secret-0"]);
        // Only the initial load, no refresh.
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[test_case(StatusCode::FORBIDDEN, StatusCode::OK; "403 then ok")]
    #[test_case(StatusCode::BAD_REQUEST, StatusCode::OK; "400 then ok")]
    #[test_case(StatusCode::FORBIDDEN, StatusCode::FORBIDDEN; "403 twice")]
    #[test_case(StatusCode::BAD_REQUEST, StatusCode::FORBIDDEN; "400 then 403")]
    #[tokio::test]
    async fn test_auth_failure_retries_exactly_once(first: StatusCode, second: StatusCode) {
        let transport = MockTransport::replying(&[first, second, StatusCode::OK]);
        let provider = RotatingProvider::default();

        let resp = interceptor(&transport, &provider)
            .send(put_request())
            .await
            .unwrap();

        assert_eq!(resp.status(), second);
        // Initial load plus exactly one refresh.
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            transport.authorizations(),
            vec!["TEST key:secret-0", "TEST key:secret-1"]
        );
    }

    #[tokio::test]
    async fn test_retry_reuses_original_request() {
        let transport = MockTransport::replying(&[StatusCode::FORBIDDEN]);
        let provider = RotatingProvider::default();

        interceptor(&transport, &provider)
            .send(put_request())
            .await
            .unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        for req in &sent {
            assert_eq!(req.method(), Method::PUT);
            assert_eq!(req.uri(), "http://s3.example.com/bucket/key");
            assert_eq!(req.body(), &Bytes::from_static(b"payload"));
        }
    }

    #[test_case(StatusCode::NOT_FOUND)]
    #[test_case(StatusCode::UNAUTHORIZED)]
    #[test_case(StatusCode::INTERNAL_SERVER_ERROR)]
    #[tokio::test]
    async fn test_other_statuses_are_not_retried(status: StatusCode) {
        let transport = MockTransport::replying(&[status]);
        let provider = RotatingProvider::default();

        let resp = interceptor(&transport, &provider)
            .send(put_request())
            .await
            .unwrap();

        assert_eq!(resp.status(), status);
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_failure_returns_first_response() {
        let transport = MockTransport::replying(&[StatusCode::FORBIDDEN]);
        let provider = RotatingProvider {
            fail_after_first: true,
            ..Default::default()
        };

        let resp = interceptor(&transport, &provider)
            .send(put_request())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(transport.sent().len(), 1);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_refused_request_loads_no_credential() {
        let transport = MockTransport::default();
        let provider = RotatingProvider::default();
        let interceptor = interceptor(&transport, &provider);

        let req = http::Request::post("http://s3.example.com/bucket/key")
            .body(Bytes::new())
            .unwrap();
        let err = interceptor.send(req).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnsupportedMethod);
        assert!(transport.sent().is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        assert!(interceptor.signer().store().current().is_none());
    }

    #[tokio::test]
    async fn test_resign_failure_returns_first_response() {
        let transport = MockTransport::replying(&[StatusCode::FORBIDDEN]);
        let provider = RotatingProvider {
            unsendable_after_first: true,
            ..Default::default()
        };

        let resp = interceptor(&transport, &provider)
            .send(put_request())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(transport.authorizations(), vec!["TEST key:secret-0"]);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_refresh_benefits_later_requests() {
        let transport = MockTransport::replying(&[StatusCode::FORBIDDEN]);
        let provider = RotatingProvider::default();
        let interceptor = interceptor(&transport, &provider);

        interceptor.send(put_request()).await.unwrap();
        interceptor.send(put_request()).await.unwrap();

        assert_eq!(
            transport.authorizations(),
            vec![
                "TEST key:secret-0",
                "TEST key:secret-1",
                "TEST key:secret-1"
            ]
        );
    }
}
