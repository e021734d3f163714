//! Engine Options

use std::collections::HashMap;
use std::ffi::OsString;

/// Settings for the external reconstruction engine
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Engine executable
    pub program: OsString,
    /// Sparse sub-model handed to the dense stages
    pub sparse_model: u32,
    /// Extra arguments appended per tool name
    pub extra_args: HashMap<String, Vec<String>>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            program: OsString::from("colmap"),
            sparse_model: 0,
            extra_args: HashMap::new(),
        }
    }
}

impl EngineOptions {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn with_sparse_model(mut self, index: u32) -> Self {
        self.sparse_model = index;
        self
    }

    pub fn with_extra_args(mut self, tool: impl Into<String>, args: Vec<String>) -> Self {
        self.extra_args.insert(tool.into(), args);
        self
    }

    pub fn extra_args_for(&self, tool: &str) -> &[String] {
        self.extra_args
            .get(tool)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}
