//! SmartTag site-specifics
//!
//! The parent portal exposes the last known position of a student through an anonymous GET:
//!
//! `GET /Activity/GetLastKnownLocationByStudentId?studentId=<id>`
//!
//! returning a JSON array of `StudentStatus`.
//!
//! This implement the `Fetchable` trait described in `lib.rs`.
//!

use std::time::Duration;

use clap::{crate_name, crate_version};
use reqwest::blocking::Client;
use tracing::{debug, trace};

use crate::{http_get, AccessError, Fetchable, StudentStatus};

/// Default site
pub const DEF_SITE: &str = "https://parent.smart-tag.net";

/// Add this to `base_url` to fetch data
const ROUTE: &str = "/Activity/GetLastKnownLocationByStudentId";

/// Do not hang forever on the API
const TIMEOUT: Duration = Duration::from_secs(30);

/// This describe the SmartTag parent portal.
///
#[derive(Clone, Debug)]
pub struct SmartTag {
    /// Base site url taken from config
    pub base_url: String,
    /// Add this to `base_url` to fetch data
    pub get: String,
    /// reqwest blocking client
    pub client: Client,
}

impl SmartTag {
    /// Client with the default timeout.
    ///
    #[tracing::instrument]
    pub fn new() -> Result<Self, AccessError> {
        Self::with_timeout(TIMEOUT)
    }

    /// Client giving up on any request after `timeout`.
    ///
    #[tracing::instrument]
    pub fn with_timeout(timeout: Duration) -> Result<Self, AccessError> {
        trace!("smarttag::new");

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AccessError::HTTP(e.to_string()))?;

        Ok(SmartTag {
            base_url: DEF_SITE.to_owned(),
            get: ROUTE.to_owned(),
            client,
        })
    }

    /// Use another site, mostly for tests.
    ///
    #[tracing::instrument(skip(self))]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_owned();
        self
    }

    /// Full URL for a given student.
    ///
    pub fn url(&self, student_id: i64) -> String {
        format!("{}{}?studentId={}", self.base_url, self.get, student_id)
    }
}

impl Fetchable for SmartTag {
    fn name(&self) -> String {
        "smarttag".to_string()
    }

    /// Fetch the statuses for one student, only one attempt.
    ///
    #[tracing::instrument(skip(self))]
    fn fetch(&self, student_id: i64) -> Result<Vec<StudentStatus>, AccessError> {
        trace!("smarttag::fetch");

        let url = self.url(student_id);
        let resp = http_get!(self, url).map_err(|e| AccessError::HTTP(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AccessError::Status {
                status: status.as_u16(),
                url: self.url(student_id),
            });
        }

        let body = resp.text().map_err(|e| AccessError::HTTP(e.to_string()))?;
        debug!("{} bytes read.", body.len());

        let list: Vec<StudentStatus> =
            serde_json::from_str(&body).map_err(|e| AccessError::Decoding(e.to_string()))?;
        debug!("{} statuses", list.len());
        Ok(list)
    }
}
