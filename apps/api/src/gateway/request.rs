use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::CoreError;
use crate::gateway::templates::{fill, find_template};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptParam {
    pub name: String,
    pub value: String,
}

/// A template id plus its ordered substitution parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRequest {
    pub template_id: String,
    #[serde(default)]
    pub params: Vec<PromptParam>,
}

/// A validated request: the text to send and the key it is cached under.
#[derive(Debug, Clone)]
pub struct RenderedPrompt {
    pub template_id: String,
    pub cache_key: String,
    pub system: &'static str,
    pub prompt: String,
}

impl PromptRequest {
    pub fn new(template_id: impl Into<String>) -> Self {
        Self {
            template_id: template_id.into(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push(PromptParam {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Names trimmed and lowercased, values trimmed with inner whitespace
    /// collapsed, sorted by name.
    fn normalized_params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = self
            .params
            .iter()
            .map(|p| {
                (
                    p.name.trim().to_lowercase(),
                    p.value.split_whitespace().collect::<Vec<_>>().join(" "),
                )
            })
            .collect();
        params.sort();
        params
    }

    /// Stable key: SHA-256 over the template id and the normalized parameters.
    pub fn cache_key(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.template_id.trim().as_bytes());
        for (name, value) in self.normalized_params() {
            hasher.update([0x1e_u8]);
            hasher.update(name.as_bytes());
            hasher.update([0x1f_u8]);
            hasher.update(value.as_bytes());
        }
        format!("generation:{}", hex::encode(hasher.finalize()))
    }

    /// Validates against the template registry and renders the prompt.
    pub fn render(&self) -> Result<RenderedPrompt, CoreError> {
        let template_id = self.template_id.trim();
        if template_id.is_empty() {
            return Err(CoreError::InvalidArgument(
                "template_id cannot be empty".to_string(),
            ));
        }
        let template = find_template(template_id).ok_or_else(|| {
            CoreError::InvalidArgument(format!("unknown prompt template '{template_id}'"))
        })?;

        let params = self.normalized_params();
        let mut seen = HashSet::new();
        for (name, _) in &params {
            if !seen.insert(name.as_str()) {
                return Err(CoreError::InvalidArgument(format!(
                    "parameter '{name}' supplied more than once"
                )));
            }
            if !template.params.iter().any(|p| *p == name.as_str()) {
                return Err(CoreError::InvalidArgument(format!(
                    "template '{template_id}' has no parameter '{name}'"
                )));
            }
        }
        if let Some(missing) = template.params.iter().find(|p| !seen.contains(*p)) {
            return Err(CoreError::InvalidArgument(format!(
                "template '{template_id}' requires parameter '{missing}'"
            )));
        }

        Ok(RenderedPrompt {
            template_id: template.id.to_string(),
            cache_key: self.cache_key(),
            system: template.system,
            prompt: fill(template, &params),
        })
    }
}
