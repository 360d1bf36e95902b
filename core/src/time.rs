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

//! Time related utils.
//!
//! Every signing scheme stamps requests with the current instant in UTC and
//! renders it in one of a few fixed wire formats.

use chrono::Utc;

/// DateTime is the alias for `chrono::DateTime<chrono::Utc>`.
pub type DateTime = chrono::DateTime<Utc>;

/// Create datetime of now.
///
/// The instant is always expressed in UTC, whatever the local timezone is.
pub fn now() -> DateTime {
    Utc::now()
}

/// Wire formats a signing time can be rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `Fri, 5 Aug 2022 16:50:12 GMT`, used by the `Date` header of signature v2.
    Rfc2822,
    /// `20220805T165012Z`, used by v4 style schemes.
    Iso8601,
    /// `20220805`, the credential scope date of v4 style schemes.
    Date,
}

impl DateFormat {
    fn pattern(self) -> &'static str {
        match self {
            DateFormat::Rfc2822 => "%a, %-d %b %Y %H:%M:%S GMT",
            DateFormat::Iso8601 => "%Y%m%dT%H%M%SZ",
            DateFormat::Date => "%Y%m%d",
        }
    }

    /// Render the given time in this format.
    pub fn format(self, t: DateTime) -> String {
        t.format(self.pattern()).to_string()
    }
}

/// Format time into http date: `Fri, 5 Aug 2022 16:50:12 GMT`
pub fn format_http_date(t: DateTime) -> String {
    DateFormat::Rfc2822.format(t)
}

/// Format time into ISO8601: `20220313T072004Z`
pub fn format_iso8601(t: DateTime) -> String {
    DateFormat::Iso8601.format(t)
}

/// Format time into date: `20220313`
pub fn format_date(t: DateTime) -> String {
    DateFormat::Date.format(t)
}
