// SPDX-License-Identifier: GPL-3.0-only

//! Recipe service clients

use super::response::{Generation, interpret_response};
use crate::config::Config;
use crate::constants::UPLOAD_FIELD_NAME;
use crate::errors::DetectionError;
use crate::media::SourceImage;
use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::{debug, info};

/// Something that can turn a photo into a recipe
///
/// Calls are independent: the returned future owns everything it needs, so
/// several may be in flight at once and none of them borrows the service.
pub trait RecipeService: Send + Sync {
    fn detect_and_generate(
        &self,
        image: SourceImage,
    ) -> BoxFuture<'static, Result<Generation, DetectionError>>;
}

/// Posts the image as multipart form data to the detection endpoint
#[derive(Debug, Clone)]
pub struct HttpRecipeService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRecipeService {
    /// Build a client for `endpoint`
    ///
    /// Without a timeout a call waits as long as the transport lets it.
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self, DetectionError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        let endpoint = endpoint.into();

        info!(endpoint = %endpoint, ?timeout, "Recipe service client ready");
        Ok(Self { client, endpoint })
    }

    pub fn from_config(config: &Config) -> Result<Self, DetectionError> {
        Self::new(config.endpoint.clone(), config.request_timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RecipeService for HttpRecipeService {
    fn detect_and_generate(
        &self,
        image: SourceImage,
    ) -> BoxFuture<'static, Result<Generation, DetectionError>> {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();

        async move {
            debug!(name = image.name(), size = image.len(), "Uploading image");

            let part = Part::bytes(image.bytes().to_vec())
                .file_name(image.name().to_string())
                .mime_str(image.mime())?;
            let form = Form::new().part(UPLOAD_FIELD_NAME, part);

            let response = client.post(&endpoint).multipart(form).send().await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?;

            debug!(status, size = body.len(), "Endpoint answered");
            interpret_response(status, &body)
        }
        .boxed()
    }
}
