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

//! Header canonicalization for signature v2.

use http::header::AUTHORIZATION;
use http::header::CONTENT_TYPE as CONTENT_TYPE_NAME;
use http::header::DATE as DATE_NAME;
use http::header::HOST as HOST_NAME;
use http::{HeaderMap, HeaderName, Uri};
use s3sign_core::hash::base64_md5;
use s3sign_core::{Error, Result};

use crate::constants::*;

/// A single header as seen by the signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderEntry {
    /// Header name.
    pub key: String,
    /// Header value.
    pub value: String,
}

impl HeaderEntry {
    /// Create a new header entry.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// SignInfo is the normalized view of one request, built once per signing
/// attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInfo {
    /// Headers sent as-is, always holding exactly one `Content-Type`, `Host`
    /// and `Content-MD5`.
    pub plain_headers: Vec<HeaderEntry>,
    /// `x-amz-*` headers sorted by `key:value` with duplicate keys merged.
    pub canonical_headers: Vec<HeaderEntry>,
    /// Base64 encoded MD5 of the body, same value as `Content-MD5`.
    pub body_hash: String,
}

impl SignInfo {
    /// Value of the first plain header named `key`, ignoring case.
    pub fn plain_header(&self, key: &str) -> Option<&str> {
        self.plain_headers
            .iter()
            .find(|e| e.key.eq_ignore_ascii_case(key))
            .map(|e| e.value.as_str())
    }

    /// Content type that takes part in the signature.
    pub fn content_type(&self) -> &str {
        self.plain_header(CONTENT_TYPE).unwrap_or(DEFAULT_CONTENT_TYPE)
    }

    /// Render the canonical headers block of the string to sign.
    ///
    /// Each entry becomes `lowercase(key):lowercase(value)`, one per line,
    /// without trailing newline. Returns an empty string if there is no
    /// canonical header.
    pub fn canonical_block(&self) -> String {
        self.canonical_headers
            .iter()
            .map(|e| format!("{}:{}", e.key.to_lowercase(), e.value.to_lowercase()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Normalize request headers into a [`SignInfo`].
///
/// - `x-amz-*` headers (any case) form the canonical group, everything else
///   but `Content-Type` is plain.
/// - `Content-Type` falls back to `application/octet-stream`. If it's given
///   several times, the last value wins.
/// - `Host` is taken from the uri and `Content-MD5` is computed from the body,
///   even when it's empty. Incoming `Host`, `Content-MD5`, `Date` and
///   `Authorization` headers are derived values and get dropped.
pub fn normalize(headers: &HeaderMap, uri: &Uri, body: &[u8]) -> Result<SignInfo> {
    let host = uri
        .host()
        .ok_or_else(|| Error::request_invalid("request without host is invalid for signing"))?;

    let mut plain = Vec::with_capacity(headers.len() + 4);
    let mut canonical = Vec::new();
    let mut content_type = None;

    for (k, v) in headers {
        let value = v.to_str()?;
        if is_canonical(k.as_str()) {
            canonical.push(HeaderEntry::new(k.as_str(), value));
        } else if k == CONTENT_TYPE_NAME {
            content_type = Some(value);
        } else if !is_derived(k) {
            plain.push(HeaderEntry::new(k.as_str(), value));
        }
    }

    let body_hash = base64_md5(body);
    plain.push(HeaderEntry::new(
        CONTENT_TYPE,
        content_type.unwrap_or(DEFAULT_CONTENT_TYPE),
    ));
    plain.push(HeaderEntry::new(HOST, host));
    plain.push(HeaderEntry::new(CONTENT_MD5, body_hash.as_str()));

    Ok(SignInfo {
        plain_headers: plain,
        canonical_headers: sort_and_merge(canonical),
        body_hash,
    })
}

fn is_canonical(key: &str) -> bool {
    key.get(..CANONICAL_HEADER_PREFIX.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(CANONICAL_HEADER_PREFIX))
}

fn is_derived(key: &HeaderName) -> bool {
    key == HOST_NAME
        || key == DATE_NAME
        || key == AUTHORIZATION
        || key.as_str().eq_ignore_ascii_case(CONTENT_MD5)
}

/// Sort entries by `key:value` and merge adjacent entries sharing a key.
///
/// Values take part in the sort, so the merged value follows the sorted
/// order, not the insertion order.
fn sort_and_merge(mut entries: Vec<HeaderEntry>) -> Vec<HeaderEntry> {
    entries.sort_by_cached_key(|e| format!("{}:{}", e.key, e.value));

    let mut merged: Vec<HeaderEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        match merged.last_mut() {
            Some(last) if last.key.eq_ignore_ascii_case(&entry.key) => {
                last.value.push(',');
                last.value.push_str(&entry.value);
            }
            _ => merged.push(entry),
        }
    }
    merged
}
