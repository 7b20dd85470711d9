//! Named endpoint descriptors.
//!
//! # Design
//! An `Endpoint` is a method plus a path template such as
//! `/users/{user_id}/profile`. Resolving walks the template through a
//! `PathBuilder`: static segments are descended into and `{placeholder}`
//! segments are filled from the supplied parameters, so descriptor requests
//! get exactly the joining and normalization of hand-built traversals.
//! Tables are plain data and load from JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::builder::PathBuilder;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub id: String,
    pub method: HttpMethod,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Endpoint {
    pub fn new(id: impl Into<String>, method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            method,
            path: path.into(),
            description: None,
        }
    }

    /// Placeholder names in template order.
    pub fn path_params(&self) -> Vec<&str> {
        self.template_segments().filter_map(placeholder).collect()
    }

    /// Walk the template from `base`, filling placeholders from `params`.
    pub fn resolve(
        &self,
        base: &PathBuilder,
        params: &[(&str, &str)],
    ) -> Result<PathBuilder, ApiError> {
        let mut path = base.clone();
        for segment in self.template_segments() {
            path = match placeholder(segment) {
                Some(name) => {
                    let value = params
                        .iter()
                        .find(|(key, _)| *key == name)
                        .map(|(_, value)| *value)
                        .ok_or_else(|| ApiError::MissingPathParam {
                            endpoint: self.id.clone(),
                            param: name.to_string(),
                        })?;
                    path.segment(value)
                }
                None => path.segment(segment),
            };
        }
        Ok(path)
    }

    pub fn request(
        &self,
        base: &PathBuilder,
        params: &[(&str, &str)],
        body: Option<Value>,
        config: Option<Value>,
    ) -> Result<HttpRequest, ApiError> {
        Ok(self.resolve(base, params)?.request(self.method, body, config))
    }

    fn template_segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }
}

fn placeholder(segment: &str) -> Option<&str> {
    segment
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .filter(|name| !name.is_empty())
}

/// A set of endpoints addressable by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointTable {
    endpoints: Vec<Endpoint>,
}

impl EndpointTable {
    pub fn new(endpoints: Vec<Endpoint>) -> Self {
        Self { endpoints }
    }

    /// Parse `{"endpoints": [...]}`.
    pub fn from_json(json: &str) -> Result<Self, ApiError> {
        serde_json::from_str(json).map_err(|e| ApiError::Descriptor(e.to_string()))
    }

    pub fn get(&self, id: &str) -> Result<&Endpoint, ApiError> {
        self.endpoints
            .iter()
            .find(|endpoint| endpoint.id == id)
            .ok_or_else(|| ApiError::UnknownEndpoint(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.iter()
    }
}
