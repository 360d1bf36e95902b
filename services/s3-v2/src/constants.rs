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

// Env values used by the S3 v2 signer.
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const AWS_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";

// Headers starting with this prefix take part in the signature.
pub const CANONICAL_HEADER_PREFIX: &str = "x-amz-";
pub const X_AMZ_SECURITY_TOKEN: &str = "x-amz-security-token";

// Plain header names as rendered in `SignInfo`.
pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_MD5: &str = "Content-MD5";
pub const HOST: &str = "Host";
pub const DATE: &str = "Date";

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

// Scheme identifier of the authorization header.
pub const AUTHORIZATION_SCHEME: &str = "AWS";
