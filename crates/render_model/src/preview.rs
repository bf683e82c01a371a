//! Projection of application state into preview trees

use crate::node::PreviewNode;
use cv_model::{AppState, CvSection, DateParts, DownloadLayout, Education, Experience};
use serde::{Deserialize, Serialize};

pub const PLACEHOLDER_NAME: &str = "Your Name";
pub const EMPTY_EXPERIENCE: &str = "No experience added.";
pub const EMPTY_SKILLS: &str = "No skills added.";
pub const EMPTY_LANGUAGES: &str = "No languages added.";
pub const EMPTY_EDUCATION: &str = "No education added.";

/// Color scheme the live preview is shown in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewTheme {
    #[default]
    Light,
    Dark,
}

impl PreviewTheme {
    /// Custom properties the preview styles read
    pub fn variables(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            PreviewTheme::Light => &[
                ("--cv-bg", "#ffffff"),
                ("--cv-text", "#1f2933"),
                ("--cv-muted", "#52606d"),
                ("--cv-accent", "#2563eb"),
                ("--cv-border", "#d9e2ec"),
                ("--cv-tag-bg", "#eef2ff"),
            ],
            PreviewTheme::Dark => &[
                ("--cv-bg", "#111827"),
                ("--cv-text", "#f3f4f6"),
                ("--cv-muted", "#9ca3af"),
                ("--cv-accent", "#60a5fa"),
                ("--cv-border", "#374151"),
                ("--cv-tag-bg", "#1e293b"),
            ],
        }
    }
}

/// `"{start} -"` followed by ` Present` for ongoing entries or ` {end}` when set
pub fn date_range(start: &DateParts, end: Option<&DateParts>, ongoing: bool) -> String {
    if ongoing {
        format!("{start} - Present")
    } else if let Some(end) = end {
        format!("{start} - {end}")
    } else {
        format!("{start} -")
    }
}

/// Build the preview root for one layout variant
pub fn render_preview(state: &AppState, layout: DownloadLayout) -> PreviewNode {
    let root = PreviewNode::element("div")
        .with_id(layout.root_element_id())
        .with_class("cvPreview")
        .with_class(format!("cvPreview--{}", layout.as_str()))
        .with_style("background", "var(--cv-bg)")
        .with_style("color", "var(--cv-text)")
        .with_style("border", "1px solid var(--cv-border)")
        .with_style("box-shadow", "0 12px 32px rgba(15, 23, 42, 0.12)")
        .with_style("border-radius", "12px")
        .with_child(render_header(state))
        .with_child(render_meta(state));

    match layout {
        DownloadLayout::Classic => {
            let sections = [
                CvSection::Experience,
                CvSection::Skills,
                CvSection::Languages,
                CvSection::Education,
            ];
            root.with_style("padding", "32px")
                .with_children(sections.iter().filter_map(|s| render_section(state, *s)))
        }
        DownloadLayout::Compact => {
            let sidebar = PreviewNode::element("aside")
                .with_class("compactSidebar")
                .with_children(
                    [CvSection::Skills, CvSection::Languages]
                        .iter()
                        .filter_map(|s| render_section(state, *s)),
                );
            let main = PreviewNode::element("div")
                .with_class("compactMain")
                .with_children(
                    [CvSection::Experience, CvSection::Education]
                        .iter()
                        .filter_map(|s| render_section(state, *s)),
                );
            root.with_style("padding", "24px").with_child(
                PreviewNode::element("div")
                    .with_class("compactColumns")
                    .with_style("display", "grid")
                    .with_style("grid-template-columns", "1fr 2fr")
                    .with_child(sidebar)
                    .with_child(main),
            )
        }
    }
}

fn render_header(state: &AppState) -> PreviewNode {
    let personal = &state.cv.personal_data;
    let full_name = personal.full_name();
    let name = if full_name.is_empty() {
        PLACEHOLDER_NAME.to_string()
    } else {
        full_name
    };

    let mut identity = PreviewNode::element("div")
        .with_class("previewIdentity")
        .with_child(PreviewNode::text_element("h3", name).with_class("previewName"));
    if !personal.desired_job_title.trim().is_empty() {
        identity.push_child(
            PreviewNode::text_element("div", personal.desired_job_title.trim()).with_class("previewRole"),
        );
    }
    if !personal.summary.trim().is_empty() {
        identity.push_child(
            PreviewNode::text_element("p", personal.summary.trim()).with_class("previewSummary"),
        );
    }

    let mut header = PreviewNode::element("header")
        .with_class("previewTop")
        .with_child(identity);
    if let Some(src) = personal.profile_image() {
        header.push_child(
            PreviewNode::element("img")
                .with_class("previewAvatar")
                .with_attribute("src", src)
                .with_attribute("alt", "Profile"),
        );
    }
    header
}

fn render_meta(state: &AppState) -> PreviewNode {
    let personal = &state.cv.personal_data;
    let location = personal.location();
    let items = [
        personal.email.trim(),
        personal.phone.trim(),
        location.as_str(),
        personal.linked_in_url.trim(),
        personal.personal_website.trim(),
        personal.driver_license_category.trim(),
    ];
    PreviewNode::element("div").with_class("previewMeta").with_children(
        items
            .iter()
            .filter(|item| !item.is_empty())
            .map(|item| PreviewNode::text_element("span", *item)),
    )
}

fn section_shell(section: CvSection, title: &str) -> PreviewNode {
    PreviewNode::element("section")
        .with_class("previewSection")
        .with_attribute("data-section", section.as_str())
        .with_child(PreviewNode::text_element("h4", title).with_class("previewSectionTitle"))
}

fn empty_message(text: &str) -> PreviewNode {
    PreviewNode::text_element("p", text).with_class("previewEmpty")
}

fn render_section(state: &AppState, section: CvSection) -> Option<PreviewNode> {
    if !state.sections.is_enabled(section) {
        return None;
    }
    let cv = &state.cv;
    let node = match section {
        CvSection::Personal => return None,
        CvSection::Experience => {
            let shell = section_shell(section, "Experience");
            if cv.experience_data.is_empty() {
                shell.with_child(empty_message(EMPTY_EXPERIENCE))
            } else {
                shell.with_children(cv.experience_data.iter().map(render_experience))
            }
        }
        CvSection::Skills => {
            let shell = section_shell(section, "Skills");
            if cv.skills_data.is_empty() {
                shell.with_child(empty_message(EMPTY_SKILLS))
            } else {
                shell.with_child(
                    PreviewNode::element("div").with_class("previewTags").with_children(
                        cv.skills_data
                            .iter()
                            .map(|skill| PreviewNode::text_element("span", skill.name.as_str())),
                    ),
                )
            }
        }
        CvSection::Languages => {
            let shell = section_shell(section, "Languages");
            if cv.languages_data.is_empty() {
                shell.with_child(empty_message(EMPTY_LANGUAGES))
            } else {
                shell.with_child(
                    PreviewNode::element("ul").with_class("previewList").with_children(
                        cv.languages_data
                            .iter()
                            .map(|language| PreviewNode::text_element("li", language.label())),
                    ),
                )
            }
        }
        CvSection::Education => {
            let shell = section_shell(section, "Education");
            if cv.education_data.is_empty() {
                shell.with_child(empty_message(EMPTY_EDUCATION))
            } else {
                shell.with_children(cv.education_data.iter().map(render_education))
            }
        }
    };
    Some(node)
}

fn entry_rows(title: &str, dates: String, subtitle: String, location: &str, description: &str) -> PreviewNode {
    let mut sub_row = PreviewNode::element("div")
        .with_class("previewSubRow")
        .with_child(PreviewNode::text_element("span", subtitle));
    if !location.trim().is_empty() {
        sub_row.push_child(PreviewNode::text_element("span", location.trim()));
    }

    let mut article = PreviewNode::element("article")
        .with_class("previewEntry")
        .with_child(
            PreviewNode::element("div")
                .with_class("previewRow")
                .with_child(PreviewNode::text_element("strong", title))
                .with_child(PreviewNode::text_element("span", dates)),
        )
        .with_child(sub_row);
    if !description.trim().is_empty() {
        article.push_child(
            PreviewNode::text_element("p", description.trim()).with_class("previewDescription"),
        );
    }
    article
}

fn render_experience(entry: &Experience) -> PreviewNode {
    entry_rows(
        &entry.role,
        date_range(&entry.start_date, entry.end_date.as_ref(), entry.still_working_here),
        entry.company_name.clone(),
        &entry.location,
        &entry.description,
    )
}

fn render_education(entry: &Education) -> PreviewNode {
    entry_rows(
        &entry.institution_name,
        date_range(&entry.start_date, entry.end_date.as_ref(), entry.still_studying),
        entry.qualification(),
        &entry.location,
        &entry.description,
    )
}
