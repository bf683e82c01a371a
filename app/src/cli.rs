//! CLI argument definitions for the CV builder.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use cv_model::{CvSection, DownloadLayout, LanguageLevel, SkillLevel};
use render_model::PreviewTheme;

#[derive(Parser, Debug)]
#[command(
    name = "fastcv",
    version,
    about = "Build a CV and export it as a paginated PDF",
    long_about = "Edit CV data stored in a local data directory, preview it in the \
                  classic or compact layout, and export the preview to A4 PDF."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding the persisted state and export settings.
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        env = "FASTCV_DATA_DIR",
        default_value = ".fastcv",
        global = true
    )]
    pub data_dir: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the stored CV state.
    Show(ShowArgs),

    /// Render the preview tree for a layout.
    Preview(PreviewArgs),

    /// Switch a CV section on or off.
    Toggle {
        /// Section name (personal, experience, skills, languages, education).
        section: CvSection,
    },

    /// Update personal details.
    Personal(PersonalArgs),

    /// Manage work experience entries.
    #[command(subcommand)]
    Experience(ExperienceCommand),

    /// Manage education entries.
    #[command(subcommand)]
    Education(EducationCommand),

    /// Manage skills.
    #[command(subcommand)]
    Skill(SkillCommand),

    /// Manage languages.
    #[command(subcommand)]
    Language(LanguageCommand),

    /// Read or change the download layout preference.
    #[command(subcommand)]
    Layout(LayoutCommand),

    /// Export the preview to PDF.
    Export(ExportArgs),

    /// Show or change the export settings.
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Print the raw persisted JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Layout to render (defaults to the stored preference).
    #[arg(long, value_name = "LAYOUT")]
    pub layout: Option<DownloadLayout>,

    /// Color scheme of the preview.
    #[arg(long, value_enum, default_value = "light")]
    pub theme: ThemeArg,

    /// Print the print-styled tree the export rasterizes; capture this one
    /// for `export --snapshot`.
    #[arg(long)]
    pub print: bool,

    /// Print the preview tree as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for PreviewTheme {
    fn from(value: ThemeArg) -> Self {
        match value {
            ThemeArg::Light => PreviewTheme::Light,
            ThemeArg::Dark => PreviewTheme::Dark,
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct PersonalArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long = "linkedin")]
    pub linked_in_url: Option<String>,
    #[arg(long = "website")]
    pub personal_website: Option<String>,
    #[arg(long = "driver-license")]
    pub driver_license_category: Option<String>,
    #[arg(long = "job-title")]
    pub desired_job_title: Option<String>,
    #[arg(long)]
    pub summary: Option<String>,

    /// Profile picture (PNG, JPEG, GIF or WebP).
    #[arg(long, value_name = "PATH", conflicts_with = "clear_image")]
    pub image: Option<PathBuf>,

    /// Remove the profile picture.
    #[arg(long)]
    pub clear_image: bool,
}

#[derive(Subcommand, Debug)]
pub enum ExperienceCommand {
    /// Append an experience entry.
    Add(ExperienceArgs),
    /// Remove the entry at INDEX.
    Remove { index: usize },
}

#[derive(Args, Debug)]
pub struct ExperienceArgs {
    #[arg(long)]
    pub role: String,
    #[arg(long)]
    pub company: String,
    /// Start date as MM/YYYY or DD/MM/YYYY.
    #[arg(long)]
    pub start: String,
    /// End date as MM/YYYY or DD/MM/YYYY.
    #[arg(long, conflicts_with = "current")]
    pub end: Option<String>,
    /// Still working here.
    #[arg(long)]
    pub current: bool,
    #[arg(long, default_value = "")]
    pub location: String,
    #[arg(long)]
    pub remote: bool,
    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Subcommand, Debug)]
pub enum EducationCommand {
    /// Append an education entry.
    Add(EducationArgs),
    /// Remove the entry at INDEX.
    Remove { index: usize },
}

#[derive(Args, Debug)]
pub struct EducationArgs {
    #[arg(long)]
    pub institution: String,
    /// Start date as MM/YYYY or DD/MM/YYYY.
    #[arg(long)]
    pub start: String,
    /// End date as MM/YYYY or DD/MM/YYYY.
    #[arg(long, conflicts_with = "current")]
    pub end: Option<String>,
    /// Still studying here.
    #[arg(long)]
    pub current: bool,
    #[arg(long, default_value = "")]
    pub degree: String,
    #[arg(long = "field", default_value = "")]
    pub field_of_study: String,
    #[arg(long, default_value = "")]
    pub location: String,
    #[arg(long)]
    pub remote: bool,
    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Subcommand, Debug)]
pub enum SkillCommand {
    /// Append a skill.
    Add {
        name: String,
        /// N/A, Beginner, Intermediate, Advanced or Expert.
        #[arg(long, default_value = "N/A")]
        level: SkillLevel,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Remove the skill at INDEX.
    Remove { index: usize },
}

#[derive(Subcommand, Debug)]
pub enum LanguageCommand {
    /// Append a language.
    Add {
        language: String,
        /// Beginner, Intermediate, Advanced, Fluent or Native.
        #[arg(long)]
        level: Option<LanguageLevel>,
    },
    /// Remove the language at INDEX.
    Remove { index: usize },
}

#[derive(Subcommand, Debug)]
pub enum LayoutCommand {
    /// Print the current download layout.
    Get,
    /// Store a new download layout.
    Set { layout: DownloadLayout },
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// PNG capture of the rendered preview.
    #[arg(long, value_name = "PNG")]
    pub snapshot: PathBuf,

    /// Directory the PDF is written to.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub out: PathBuf,

    /// Layout to export (defaults to the stored preference).
    #[arg(long, value_name = "LAYOUT")]
    pub layout: Option<DownloadLayout>,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print the current export settings.
    Show,
    /// Change one or more export settings.
    Set(SettingsArgs),
    /// Restore the default export settings.
    Reset,
}

#[derive(Args, Debug, Default)]
#[group(required = true, multiple = true)]
pub struct SettingsArgs {
    /// Staging container width in CSS pixels.
    #[arg(long, value_name = "PX")]
    pub staging_width: Option<u32>,
    /// Device pixels per CSS pixel.
    #[arg(long, value_name = "RATIO")]
    pub pixel_ratio: Option<f64>,
    #[arg(long, value_name = "MM")]
    pub page_width: Option<f64>,
    #[arg(long, value_name = "MM")]
    pub page_height: Option<f64>,
    /// Margin on all four sides.
    #[arg(long, value_name = "MM")]
    pub margin: Option<f64>,
    /// Compress the embedded raster.
    #[arg(long, value_name = "BOOL")]
    pub compress: Option<bool>,
    /// Fill the PDF title and author from the CV owner's name.
    #[arg(long, value_name = "BOOL")]
    pub title_from_name: Option<bool>,
}
