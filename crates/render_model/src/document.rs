//! Preview document: the set of mounted preview roots

use crate::error::{RenderError, Result};
use crate::node::PreviewNode;
use crate::preview::{render_preview, PreviewTheme};
use cv_model::{AppState, DownloadLayout};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level container for everything the page has mounted.
///
/// `root_variables` plays the part of the document root style: custom
/// properties resolve there when no ancestor of an element defines them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewDocument {
    pub root_variables: BTreeMap<String, String>,
    pub body: Vec<PreviewNode>,
}

impl PreviewDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount both layout variants for `state`
    pub fn from_state(state: &AppState, theme: PreviewTheme) -> Self {
        let mut document = Self::new();
        document.set_theme(theme);
        document.body = DownloadLayout::ALL
            .iter()
            .map(|layout| render_preview(state, *layout))
            .collect();
        document
    }

    pub fn set_theme(&mut self, theme: PreviewTheme) {
        self.root_variables = theme
            .variables()
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
    }

    /// Look up an element anywhere in the document
    pub fn element_by_id(&self, id: &str) -> Option<&PreviewNode> {
        self.body.iter().find_map(|root| root.find_by_id(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.element_by_id(id).is_some()
    }

    /// Append a top-level node; its id must be unique in the document
    pub fn append(&mut self, node: PreviewNode) -> Result<()> {
        let id = node.id.clone().ok_or(RenderError::MissingId)?;
        if self.contains(&id) {
            return Err(RenderError::DuplicateId(id));
        }
        self.body.push(node);
        Ok(())
    }

    /// Detach a top-level node by id
    pub fn remove(&mut self, id: &str) -> Option<PreviewNode> {
        let index = self.body.iter().position(|node| node.id.as_deref() == Some(id))?;
        Some(self.body.remove(index))
    }

    /// Resolve a custom property as seen by the element with `id`:
    /// nearest ancestor-or-self inline definition, then the document root
    pub fn resolve_variable(&self, id: &str, name: &str) -> Option<&str> {
        let path = self.body.iter().find_map(|root| root.path_to(id))?;
        path.iter()
            .rev()
            .find_map(|node| node.style_value(name))
            .or_else(|| self.root_variables.get(name).map(String::as_str))
    }
}
