//! Offscreen staging of a detached preview clone
//!
//! The clone is restyled for print and mounted inside a uniquely named
//! container that the guard removes when it goes out of scope, on success,
//! error, or unwind alike.

use crate::Result;
use render_model::{PreviewDocument, PreviewNode};
use uuid::Uuid;

pub const STAGING_ID_PREFIX: &str = "cv-export-staging";

/// Custom properties forced on the staging container so output is always
/// light background with dark text
pub const PRINT_PALETTE: &[(&str, &str)] = &[
    ("--cv-bg", "#ffffff"),
    ("--cv-text", "#111827"),
    ("--cv-muted", "#4b5563"),
    ("--cv-accent", "#1d4ed8"),
    ("--cv-border", "#e5e7eb"),
    ("--cv-tag-bg", "#f3f4f6"),
];

/// Container styling dropped from the cloned root
pub const DECORATIVE_PROPERTIES: &[&str] = &["border", "box-shadow"];

/// Deep-clone `root` and strip its decoration.
///
/// The clone loses its id so lookups keep resolving to the live root.
pub fn stage_clone(root: &PreviewNode) -> PreviewNode {
    let mut clone = root.clone();
    clone.id = None;
    for property in DECORATIVE_PROPERTIES {
        clone.set_style(*property, "none");
    }
    clone.set_style("width", "100%");
    clone.set_style("margin", "0");
    clone
}

/// Offscreen container holding `content` at a fixed CSS pixel width
pub fn staging_container(id: &str, width_px: u32, content: PreviewNode) -> PreviewNode {
    let mut container = PreviewNode::element("div")
        .with_id(id)
        .with_style("position", "fixed")
        .with_style("left", "-10000px")
        .with_style("top", "0")
        .with_style("width", format!("{}px", width_px))
        .with_style("background", "#ffffff")
        .with_style("pointer-events", "none")
        .with_style("z-index", "-1");
    for (name, value) in PRINT_PALETTE {
        container.set_style(*name, *value);
    }
    container.with_child(content)
}

/// A mounted staging container, removed from the document on drop
pub struct StagingGuard<'a> {
    document: &'a mut PreviewDocument,
    id: String,
}

impl<'a> StagingGuard<'a> {
    /// Mount `content` offscreen under a fresh unique id
    pub fn mount(document: &'a mut PreviewDocument, content: PreviewNode, width_px: u32) -> Result<Self> {
        let id = format!("{}-{}", STAGING_ID_PREFIX, Uuid::new_v4());
        document.append(staging_container(&id, width_px, content))?;
        tracing::debug!(id = %id, width_px, "Mounted staging container");
        Ok(Self { document, id })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn document(&self) -> &PreviewDocument {
        &*self.document
    }

    pub fn container(&self) -> Option<&PreviewNode> {
        self.document.element_by_id(&self.id)
    }
}

impl Drop for StagingGuard<'_> {
    fn drop(&mut self) {
        if self.document.remove(&self.id).is_some() {
            tracing::debug!(id = %self.id, "Removed staging container");
        } else {
            tracing::warn!(id = %self.id, "Staging container already gone");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cv_model::{AppState, DownloadLayout};
    use render_model::{render_preview, PreviewTheme};

    #[test]
    fn test_stage_clone_strips_decoration() {
        let root = render_preview(&AppState::default(), DownloadLayout::Classic);
        let staged = stage_clone(&root);
        assert_eq!(staged.style_value("border"), Some("none"));
        assert_eq!(staged.style_value("box-shadow"), Some("none"));
        assert!(staged.id.is_none());
        assert_eq!(staged.children, root.children);
        // Original untouched
        assert_ne!(root.style_value("border"), Some("none"));
    }

    #[test]
    fn test_guard_removes_container() {
        let mut document = PreviewDocument::from_state(&AppState::default(), PreviewTheme::Dark);
        let before = document.clone();
        let root = document.element_by_id("cv-preview-compact").unwrap().clone();

        let id = {
            let guard = StagingGuard::mount(&mut document, stage_clone(&root), 1100).unwrap();
            let container = guard.container().unwrap();
            assert_eq!(container.style_value("width"), Some("1100px"));
            guard.id().to_string()
        };
        assert!(id.starts_with(STAGING_ID_PREFIX));
        assert!(!document.contains(&id));
        assert_eq!(document, before);
    }

    #[test]
    fn test_palette_overrides_dark_theme() {
        let mut document = PreviewDocument::from_state(&AppState::default(), PreviewTheme::Dark);
        let root = document.element_by_id("cv-preview-classic").unwrap().clone();
        let mut staged = stage_clone(&root);
        staged.id = Some("staged-root".to_string());

        let guard = StagingGuard::mount(&mut document, staged, 1100).unwrap();
        let doc = guard.document();
        assert_eq!(doc.resolve_variable("staged-root", "--cv-bg"), Some("#ffffff"));
        assert_eq!(doc.resolve_variable("cv-preview-classic", "--cv-bg"), Some("#111827"));
    }

    #[test]
    fn test_unique_ids() {
        let mut document = PreviewDocument::new();
        let first = StagingGuard::mount(&mut document, PreviewNode::element("div"), 10)
            .unwrap()
            .id()
            .to_string();
        let second = StagingGuard::mount(&mut document, PreviewNode::element("div"), 10)
            .unwrap()
            .id()
            .to_string();
        assert_ne!(first, second);
        assert!(document.body.is_empty());
    }
}
