//! Amazon S3 implementation of [`ObjectStore`].
//!
//! Listings are requested page by page, following continuation tokens until
//! the service reports the listing complete.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client;
use bytes::Bytes;
use chrono::DateTime;
use pricing_core::{Error, Result};
use std::future::Future;
use tracing::{debug, info};

use crate::config::S3Config;
use crate::store::{ObjectStore, ObjectSummary};

/// S3 client wrapper.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Creates a client from the default AWS provider chain plus `config`.
    pub async fn new(config: &S3Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(ref region) = config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.force_path_style);
        if let Some(ref endpoint) = config.endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }

        info!(
            region = ?sdk_config.region().map(|r| r.as_ref().to_string()),
            endpoint = config.endpoint_url.as_deref().unwrap_or("default"),
            "Created S3 client"
        );

        Self {
            client: Client::from_conf(builder.build()),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                Error::download(format!(
                    "get s3://{}/{}: {}",
                    bucket,
                    key,
                    DisplayErrorContext(&e)
                ))
            })?;

        let body = output.body.collect().await.map_err(|e| {
            Error::download(format!("read body of s3://{}/{}: {}", bucket, key, e))
        })?;

        let bytes = body.into_bytes();
        debug!(bucket = bucket, key = key, size = bytes.len(), "Downloaded object");
        Ok(bytes)
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectSummary>> {
        let objects = collect_pages(|token| self.list_page(bucket, prefix, token)).await?;

        debug!(bucket = bucket, prefix = prefix, count = objects.len(), "Listed objects");
        Ok(objects)
    }
}

impl S3Store {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        token: Option<String>,
    ) -> Result<ListPage> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .set_continuation_token(token)
            .send()
            .await
            .map_err(|e| {
                Error::download(format!(
                    "list s3://{}/{}: {}",
                    bucket,
                    prefix,
                    DisplayErrorContext(&e)
                ))
            })?;

        let mut objects = Vec::new();
        for object in output.contents() {
            let (Some(key), Some(modified)) = (object.key(), object.last_modified()) else {
                continue;
            };
            let Some(last_modified) =
                DateTime::from_timestamp(modified.secs(), modified.subsec_nanos())
            else {
                continue;
            };
            objects.push(ObjectSummary::new(key, last_modified));
        }

        let next_token = match output.is_truncated() {
            Some(true) => output.next_continuation_token().map(str::to_string),
            _ => None,
        };

        Ok(ListPage {
            objects,
            next_token,
        })
    }
}

/// One page of a listing and the token for the next, if any.
struct ListPage {
    objects: Vec<ObjectSummary>,
    next_token: Option<String>,
}

/// Requests pages until one comes back without a continuation token.
async fn collect_pages<F, Fut>(mut fetch: F) -> Result<Vec<ObjectSummary>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<ListPage>>,
{
    let mut objects = Vec::new();
    let mut token = None;
    loop {
        let page = fetch(token.take()).await?;
        objects.extend(page.objects);
        match page.next_token {
            Some(next) => token = Some(next),
            None => return Ok(objects),
        }
    }
}
