//! Portfolio project model.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::validation::{
    choice, coordinates, date, required_text, supplied_text, trimmed_list, Choice, Coordinates,
    ValidationErrors,
};

/// Area of work a project belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProjectCategory {
    #[serde(rename = "Land Lab")]
    LandLab,
    #[serde(rename = "Digital Forge")]
    DigitalForge,
    #[serde(rename = "GIS")]
    Gis,
    Homestead,
    Research,
}

impl Choice for ProjectCategory {
    const ALL: &'static [Self] = &[
        ProjectCategory::LandLab,
        ProjectCategory::DigitalForge,
        ProjectCategory::Gis,
        ProjectCategory::Homestead,
        ProjectCategory::Research,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            ProjectCategory::LandLab => "Land Lab",
            ProjectCategory::DigitalForge => "Digital Forge",
            ProjectCategory::Gis => "GIS",
            ProjectCategory::Homestead => "Homestead",
            ProjectCategory::Research => "Research",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ProjectStatus {
    Planning,
    #[default]
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Ongoing,
}

impl Choice for ProjectStatus {
    const ALL: &'static [Self] = &[
        ProjectStatus::Planning,
        ProjectStatus::InProgress,
        ProjectStatus::Completed,
        ProjectStatus::Ongoing,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planning => "Planning",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Ongoing => "Ongoing",
        }
    }
}

/// A portfolio project pinned on the map by its coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub long_description: String,
    pub category: ProjectCategory,
    pub technologies: Vec<String>,
    pub status: ProjectStatus,
    pub featured: bool,
    pub image: String,
    pub github_url: String,
    pub live_url: String,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<String>,
    pub order: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for creating a new project.
///
/// Coordinates stay raw JSON so numeric strings are accepted and checked by
/// [`crate::validation::coordinates`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub technologies: Option<Vec<String>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub completion_date: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub latitude: Option<Value>,
    #[serde(default)]
    pub longitude: Option<Value>,
}

/// A validated project ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub long_description: String,
    pub category: ProjectCategory,
    pub technologies: Vec<String>,
    pub status: ProjectStatus,
    pub featured: bool,
    pub image: String,
    pub github_url: String,
    pub live_url: String,
    /// `None` means "now" at insert time.
    pub start_date: Option<String>,
    pub completion_date: Option<String>,
    pub order: i64,
    pub coordinates: Coordinates,
}

impl CreateProjectRequest {
    /// Validates every field. The coordinate pair is required.
    pub fn validate(&self) -> Result<NewProject, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = required_text(
            &mut errors,
            "title",
            self.title.as_deref(),
            true,
            "Project title is required",
        );
        let description = required_text(
            &mut errors,
            "description",
            self.description.as_deref(),
            false,
            "Description is required",
        );
        let category = match self.category.as_deref() {
            Some(raw) => choice::<ProjectCategory>(&mut errors, "category", Some(raw)),
            None => {
                errors.push("category", "Category is required");
                None
            }
        };
        let status = choice::<ProjectStatus>(&mut errors, "status", self.status.as_deref());
        let start_date = date(&mut errors, "startDate", self.start_date.as_deref());
        let completion_date = date(&mut errors, "completionDate", self.completion_date.as_deref());
        let pair = coordinates(
            &mut errors,
            self.latitude.as_ref(),
            self.longitude.as_ref(),
            true,
        );

        let (Some(title), Some(description), Some(category), Some(pair)) =
            (title, description, category, pair)
        else {
            return Err(errors);
        };

        errors.finish(NewProject {
            title,
            description,
            long_description: self.long_description.clone().unwrap_or_default(),
            category,
            technologies: self
                .technologies
                .as_deref()
                .map(trimmed_list)
                .unwrap_or_default(),
            status: status.unwrap_or_default(),
            featured: self.featured.unwrap_or(false),
            image: self.image.clone().unwrap_or_default(),
            github_url: self.github_url.clone().unwrap_or_default(),
            live_url: self.live_url.clone().unwrap_or_default(),
            start_date,
            completion_date,
            order: self.order.unwrap_or(0),
            coordinates: pair,
        })
    }
}

/// Request body for a partial project update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub technologies: Option<Vec<String>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    /// `null` clears the stored date.
    #[serde(default, deserialize_with = "nullable")]
    pub completion_date: Option<Option<String>>,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub latitude: Option<Value>,
    #[serde(default)]
    pub longitude: Option<Value>,
}

/// Validated subset of project fields to overwrite.
#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub category: Option<ProjectCategory>,
    pub technologies: Option<Vec<String>>,
    pub status: Option<ProjectStatus>,
    pub featured: Option<bool>,
    pub image: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub start_date: Option<String>,
    /// `Some(None)` clears the stored date.
    pub completion_date: Option<Option<String>>,
    pub order: Option<i64>,
    pub coordinates: Option<Coordinates>,
}

impl UpdateProjectRequest {
    /// Coordinates are optional here but must arrive as a pair.
    pub fn validate(&self) -> Result<ProjectChanges, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = supplied_text(
            &mut errors,
            "title",
            self.title.as_deref(),
            true,
            "Project title is required",
        );
        let description = supplied_text(
            &mut errors,
            "description",
            self.description.as_deref(),
            false,
            "Description is required",
        );
        let category = choice::<ProjectCategory>(&mut errors, "category", self.category.as_deref());
        let status = choice::<ProjectStatus>(&mut errors, "status", self.status.as_deref());
        let start_date = date(&mut errors, "startDate", self.start_date.as_deref());
        let completion_date = match self.completion_date.as_ref() {
            Some(Some(raw)) if !raw.trim().is_empty() => {
                date(&mut errors, "completionDate", Some(raw.as_str())).map(Some)
            }
            Some(_) => Some(None),
            None => None,
        };
        let pair = coordinates(
            &mut errors,
            self.latitude.as_ref(),
            self.longitude.as_ref(),
            false,
        );

        errors.finish(ProjectChanges {
            title,
            description,
            long_description: self.long_description.clone(),
            category,
            technologies: self.technologies.as_deref().map(trimmed_list),
            status,
            featured: self.featured,
            image: self.image.clone(),
            github_url: self.github_url.clone(),
            live_url: self.live_url.clone(),
            start_date,
            completion_date,
            order: self.order,
            coordinates: pair,
        })
    }
}

/// Keeps an explicit `null` apart from an absent field.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Query parameters for the project listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectListParams {
    pub category: Option<String>,
    pub featured: Option<String>,
    pub status: Option<String>,
    pub limit: Option<String>,
}
