//! Command handlers
//!
//! Each handler works against an open [`AppContext`] and returns the text to
//! print, so the binary stays a thin parse-dispatch-print loop.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{bail, Context};
use cv_model::forms::{submit_education, submit_languages, submit_skills, EducationDraft, ExperienceDraft, SkillDraft};
use cv_model::validation::{validate_personal, FieldError};
use cv_model::{
    image_data_url, AppState, CvAction, CvModelError, CvSection, DownloadLayout, LanguageLevel,
    PersonalDataPatch, SkillLevel,
};
use export::{print_tree, DirectorySink, Exporter, RecordingNotifier, SnapshotRasterizer};
use render_model::{render_preview, PreviewDocument, PreviewNode, PreviewTheme};
use store::{ExportSettings, STORAGE_KEY};

use crate::cli::{
    Command, EducationArgs, EducationCommand, ExperienceArgs, ExperienceCommand, ExportArgs,
    LanguageCommand, LayoutCommand, PersonalArgs, PreviewArgs, SettingsArgs, SettingsCommand,
    ShowArgs, SkillCommand,
};
use crate::state::AppContext;

/// Run one command and return its output
pub async fn run(ctx: &mut AppContext, command: Command) -> anyhow::Result<String> {
    match command {
        Command::Show(args) => show(ctx, &args),
        Command::Preview(args) => preview(ctx, &args),
        Command::Toggle { section } => toggle(ctx, section),
        Command::Personal(args) => personal(ctx, args),
        Command::Experience(ExperienceCommand::Add(args)) => add_experience(ctx, args),
        Command::Experience(ExperienceCommand::Remove { index }) => remove_experience(ctx, index),
        Command::Education(EducationCommand::Add(args)) => add_education(ctx, args),
        Command::Education(EducationCommand::Remove { index }) => remove_education(ctx, index),
        Command::Skill(SkillCommand::Add {
            name,
            level,
            description,
        }) => add_skill(ctx, name, level, description),
        Command::Skill(SkillCommand::Remove { index }) => {
            ctx.store.dispatch(CvAction::RemoveSkillAt(index))?;
            Ok(format!("Removed skill {}", index))
        }
        Command::Language(LanguageCommand::Add { language, level }) => {
            add_language(ctx, language, level)
        }
        Command::Language(LanguageCommand::Remove { index }) => remove_language(ctx, index),
        Command::Layout(LayoutCommand::Get) => Ok(ctx.layout.get().to_string()),
        Command::Layout(LayoutCommand::Set { layout }) => {
            ctx.layout.set(layout);
            Ok(format!("Download layout set to {}", layout))
        }
        Command::Export(args) => export(ctx, &args).await,
        Command::Settings(SettingsCommand::Show) => show_settings(ctx.settings.get()),
        Command::Settings(SettingsCommand::Set(args)) => {
            let updated = ctx.settings.update(|settings| apply_settings(settings, &args))?;
            show_settings(updated)
        }
        Command::Settings(SettingsCommand::Reset) => show_settings(ctx.settings.reset()?),
    }
}

fn describe_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("  {}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Turn a rejected form into a readable error
fn form_error(error: CvModelError) -> anyhow::Error {
    match error {
        CvModelError::InvalidForm(errors) => {
            anyhow::anyhow!("Please fix the following fields:\n{}", describe_errors(&errors))
        }
        other => other.into(),
    }
}

fn show(ctx: &AppContext, args: &ShowArgs) -> anyhow::Result<String> {
    if args.json {
        let raw = ctx.store.storage().get_item(STORAGE_KEY)?;
        return Ok(match raw {
            Some(raw) => {
                let value: serde_json::Value = serde_json::from_str(&raw)?;
                serde_json::to_string_pretty(&value)?
            }
            None => "{}".to_string(),
        });
    }
    Ok(summarize(ctx.store.state(), ctx.layout.get(), ctx.data_dir()))
}

fn summarize(state: &AppState, layout: DownloadLayout, data_dir: &Path) -> String {
    let cv = &state.cv;
    let mut out = String::new();
    let name = cv.personal_data.full_name();
    let _ = writeln!(out, "Name:       {}", if name.is_empty() { "-" } else { &name });
    let _ = writeln!(out, "Email:      {}", cv.personal_data.email);
    let _ = writeln!(out, "Location:   {}", cv.personal_data.location());
    let _ = writeln!(out, "Experience: {}", cv.experience_data.len());
    let _ = writeln!(out, "Skills:     {}", cv.skills_data.len());
    let _ = writeln!(out, "Languages:  {}", cv.languages_data.len());
    let _ = writeln!(out, "Education:  {}", cv.education_data.len());
    let sections: Vec<&str> = state.sections.enabled().map(|s| s.as_str()).collect();
    let _ = writeln!(out, "Sections:   {}", sections.join(", "));
    let _ = writeln!(out, "Layout:     {}", layout);
    let _ = write!(out, "Data:       {}", data_dir.display());
    out
}

fn preview(ctx: &AppContext, args: &PreviewArgs) -> anyhow::Result<String> {
    let layout = args.layout.unwrap_or_else(|| ctx.layout.get());
    let theme = PreviewTheme::from(args.theme);
    let root = if args.print {
        let document = PreviewDocument::from_state(ctx.store.state(), theme);
        print_tree(&document, layout, ctx.settings.get().staging_width_px)?
    } else {
        let mut root = render_preview(ctx.store.state(), layout);
        for (name, value) in theme.variables() {
            root.set_style(*name, *value);
        }
        root
    };

    if args.json {
        return Ok(serde_json::to_string_pretty(&root)?);
    }
    let mut out = String::new();
    outline(&root, 0, &mut out);
    Ok(out.trim_end().to_string())
}

/// Indented tag/class/text outline of a preview tree
fn outline(node: &PreviewNode, depth: usize, out: &mut String) {
    let _ = write!(out, "{}{}", "  ".repeat(depth), node.tag);
    if let Some(id) = &node.id {
        let _ = write!(out, "#{}", id);
    }
    for class in &node.classes {
        let _ = write!(out, ".{}", class);
    }
    if let Some(text) = node.text.as_deref().filter(|t| !t.is_empty()) {
        let _ = write!(out, " \"{}\"", text);
    }
    out.push('\n');
    for child in &node.children {
        outline(child, depth + 1, out);
    }
}

fn toggle(ctx: &mut AppContext, section: CvSection) -> anyhow::Result<String> {
    ctx.store.dispatch(CvAction::ToggleSection(section))?;
    let state = if ctx.store.state().sections.is_enabled(section) {
        "on"
    } else {
        "off"
    };
    Ok(format!("Section {} is {}", section, state))
}

/// Guess an image MIME type from the file extension
fn image_mime(path: &Path) -> anyhow::Result<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "gif" => Ok("image/gif"),
        "webp" => Ok("image/webp"),
        _ => bail!("Unsupported image type: {}", path.display()),
    }
}

fn personal(ctx: &mut AppContext, args: PersonalArgs) -> anyhow::Result<String> {
    let profile_image_url = if args.clear_image {
        Some(None)
    } else if let Some(path) = &args.image {
        let mime = image_mime(path)?;
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read image {}", path.display()))?;
        Some(Some(image_data_url(mime, &bytes)))
    } else {
        None
    };

    let patch = PersonalDataPatch {
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        phone: args.phone,
        country: args.country,
        city: args.city,
        linked_in_url: args.linked_in_url,
        personal_website: args.personal_website,
        driver_license_category: args.driver_license_category,
        desired_job_title: args.desired_job_title,
        summary: args.summary,
        profile_image_url,
    };

    let mut merged = ctx.store.state().cv.personal_data.clone();
    merged.apply(patch.clone());
    let errors = validate_personal(&merged);
    if !errors.is_empty() {
        bail!("Please fix the following fields:\n{}", describe_errors(&errors));
    }

    ctx.store.dispatch(CvAction::UpdatePersonalData(patch))?;
    Ok(format!("Saved personal details for {}", merged.full_name()))
}

fn add_experience(ctx: &mut AppContext, args: ExperienceArgs) -> anyhow::Result<String> {
    let mut draft = ExperienceDraft {
        role: args.role,
        company_name: args.company,
        start_date: args.start,
        end_date: args.end.unwrap_or_default(),
        location: args.location,
        description: args.description,
        ..Default::default()
    };
    draft.set_still_working_here(args.current);
    draft.set_remote(args.remote);

    let mut entries = ctx.store.state().cv.experience_data.clone();
    let errors = draft.validate(entries.len());
    if !errors.is_empty() {
        bail!("Please fix the following fields:\n{}", describe_errors(&errors));
    }
    let entry = draft.to_entry().map_err(form_error)?;
    let label = format!("{} at {}", entry.role, entry.company_name);
    entries.push(entry);

    ctx.store.dispatch(CvAction::SetExperienceData(entries))?;
    Ok(format!("Added experience: {}", label))
}

fn remove_experience(ctx: &mut AppContext, index: usize) -> anyhow::Result<String> {
    let mut entries = ctx.store.state().cv.experience_data.clone();
    let len = entries.len();
    if index >= len {
        return Err(CvModelError::IndexOutOfRange { index, len }.into());
    }
    entries.remove(index);
    ctx.store.dispatch(CvAction::SetExperienceData(entries))?;
    Ok(format!("Removed experience {}", index))
}

fn add_education(ctx: &mut AppContext, args: EducationArgs) -> anyhow::Result<String> {
    let mut draft = EducationDraft {
        institution_name: args.institution,
        start_date: args.start,
        end_date: args.end.unwrap_or_default(),
        location: args.location,
        degree_type: args.degree,
        field_of_study: args.field_of_study,
        description: args.description,
        ..Default::default()
    };
    draft.set_still_studying(args.current);
    draft.set_remote(args.remote);

    let mut drafts: Vec<EducationDraft> = ctx
        .store
        .state()
        .cv
        .education_data
        .iter()
        .map(EducationDraft::from_entry)
        .collect();
    drafts.push(draft);
    let entries = submit_education(&drafts).map_err(form_error)?;
    let label = entries
        .last()
        .map(|e| e.institution_name.clone())
        .unwrap_or_default();

    ctx.store.dispatch(CvAction::SetEducationData(entries))?;
    Ok(format!("Added education: {}", label))
}

fn remove_education(ctx: &mut AppContext, index: usize) -> anyhow::Result<String> {
    let mut entries = ctx.store.state().cv.education_data.clone();
    let len = entries.len();
    if index >= len {
        return Err(CvModelError::IndexOutOfRange { index, len }.into());
    }
    entries.remove(index);
    ctx.store.dispatch(CvAction::SetEducationData(entries))?;
    Ok(format!("Removed education {}", index))
}

fn add_skill(
    ctx: &mut AppContext,
    name: String,
    level: SkillLevel,
    description: String,
) -> anyhow::Result<String> {
    let draft = SkillDraft {
        name,
        proficiency_level: level,
        description,
    };
    let skill = submit_skills(std::slice::from_ref(&draft))
        .map_err(form_error)?
        .into_iter()
        .next()
        .context("Skill name is required")?;
    let label = skill.name.clone();

    ctx.store.dispatch(CvAction::AddSkill(skill))?;
    Ok(format!("Added skill: {}", label))
}

fn add_language(
    ctx: &mut AppContext,
    language: String,
    level: Option<LanguageLevel>,
) -> anyhow::Result<String> {
    let Some(entry) = submit_languages(&[(language, level)]).into_iter().next() else {
        bail!("Language name is required");
    };
    let label = entry.label();

    let mut languages = ctx.store.state().cv.languages_data.clone();
    languages.push(entry);
    ctx.store.dispatch(CvAction::SetLanguagesData(languages))?;
    Ok(format!("Added language: {}", label))
}

fn remove_language(ctx: &mut AppContext, index: usize) -> anyhow::Result<String> {
    let mut languages = ctx.store.state().cv.languages_data.clone();
    let len = languages.len();
    if index >= len {
        return Err(CvModelError::IndexOutOfRange { index, len }.into());
    }
    languages.remove(index);
    ctx.store.dispatch(CvAction::SetLanguagesData(languages))?;
    Ok(format!("Removed language {}", index))
}

fn show_settings(settings: &ExportSettings) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(settings)?)
}

fn apply_settings(settings: &mut ExportSettings, args: &SettingsArgs) {
    if let Some(width) = args.staging_width {
        settings.staging_width_px = width;
    }
    if let Some(ratio) = args.pixel_ratio {
        settings.pixel_ratio = ratio;
    }
    if let Some(width) = args.page_width {
        settings.page_width_mm = width;
    }
    if let Some(height) = args.page_height {
        settings.page_height_mm = height;
    }
    if let Some(margin) = args.margin {
        settings.margin_mm = margin;
    }
    if let Some(compress) = args.compress {
        settings.compress = compress;
    }
    if let Some(title_from_name) = args.title_from_name {
        settings.title_from_name = title_from_name;
    }
}

async fn export(ctx: &AppContext, args: &ExportArgs) -> anyhow::Result<String> {
    let layout = args.layout.unwrap_or_else(|| ctx.layout.get());
    let state = ctx.store.state();
    let mut document = PreviewDocument::from_state(state, PreviewTheme::Light);

    let exporter = Exporter::new(
        SnapshotRasterizer::from_file(&args.snapshot),
        ctx.settings.get().clone(),
    );
    let sink = DirectorySink::new(&args.out);
    let notifier = RecordingNotifier::new();

    match exporter
        .download(
            &mut document,
            &state.cv.personal_data,
            layout,
            &sink,
            &notifier,
        )
        .await
    {
        Some(outcome) => Ok(format!(
            "Saved {} ({} page{})",
            outcome.path.display(),
            outcome.page_count,
            if outcome.page_count == 1 { "" } else { "s" }
        )),
        None => match notifier.notices().last() {
            Some(notice) => bail!("{}", notice),
            None => bail!("Export did not produce a file"),
        },
    }
}
