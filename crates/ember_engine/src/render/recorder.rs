//! Headless renderer that records uniform uploads

use std::collections::HashMap;

use super::{RenderError, RenderResult, Renderer, UniformValue};
use crate::foundation::math::Mat4;

/// Renderer backend that keeps the most recent value of every uniform
///
/// Optionally restricted to a declared set of uniform names, mirroring a real
/// shader program rejecting unknown uniforms.
#[derive(Debug, Default, Clone)]
pub struct UniformRecorder {
    uniforms: HashMap<String, UniformValue>,
    declared: Option<Vec<String>>,
    upload_count: usize,
}

impl UniformRecorder {
    /// Create a recorder accepting any uniform name
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recorder that rejects names outside `declared`
    pub fn with_declared<I, S>(declared: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            declared: Some(declared.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Latest value uploaded under `name`
    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.uniforms.get(name)
    }

    /// Latest matrix array uploaded under `name`
    pub fn mat4_array(&self, name: &str) -> Option<&[Mat4]> {
        match self.uniforms.get(name) {
            Some(UniformValue::Mat4Array(values)) => Some(values),
            _ => None,
        }
    }

    /// Latest matrix uploaded under `name`
    pub fn mat4(&self, name: &str) -> Option<&Mat4> {
        match self.uniforms.get(name) {
            Some(UniformValue::Mat4(value)) => Some(value),
            _ => None,
        }
    }

    /// Number of successful uploads since creation
    pub fn upload_count(&self) -> usize {
        self.upload_count
    }

    /// Forget recorded values
    pub fn clear(&mut self) {
        self.uniforms.clear();
        self.upload_count = 0;
    }
}

impl Renderer for UniformRecorder {
    fn set_uniform(&mut self, name: &str, value: UniformValue) -> RenderResult<()> {
        if let Some(declared) = &self.declared {
            if !declared.iter().any(|d| d == name) {
                return Err(RenderError::UnknownUniform(name.to_string()));
            }
        }
        log::trace!("uniform {name} = {value:?}");
        self.uniforms.insert(name.to_string(), value);
        self.upload_count += 1;
        Ok(())
    }
}
