//! Server-side HTML for the showcase and the dashboard views.

use chrono::Datelike;
use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::analytics::{Category, DashboardSummary};
use crate::error::{Result, ShowcaseError};
use crate::record::{ProjectRecord, fields};
use crate::theme::ProjectCard;

pub const SHOWCASE_UNAVAILABLE: &str = "Unable to load projects at this time.";
pub const LIST_UNAVAILABLE: &str = "Failed to load data. Ensure script is deployed correctly.";
pub const ANALYTICS_UNAVAILABLE: &str = "Failed to load analytics. Ensure script is deployed correctly.";

const TEMPLATES: [(&str, &str); 5] = [
    ("showcase", include_str!("../templates/showcase.hbs")),
    ("dashboard_add", include_str!("../templates/dashboard_add.hbs")),
    ("dashboard_projects", include_str!("../templates/dashboard_projects.hbs")),
    ("dashboard_edit", include_str!("../templates/dashboard_edit.hbs")),
    ("dashboard_analytics", include_str!("../templates/dashboard_analytics.hbs")),
];

const PARTIALS: [(&str, &str); 3] = [
    ("dashboard_header", include_str!("../templates/dashboard_header.hbs")),
    ("dashboard_footer", include_str!("../templates/dashboard_footer.hbs")),
    ("project_fields", include_str!("../templates/project_fields.hbs")),
];

/// Dashboard views and their page titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Add,
    Manage,
    Analytics,
}

impl View {
    pub fn slug(self) -> &'static str {
        match self {
            View::Add => "add",
            View::Manage => "view",
            View::Analytics => "analytics",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Add => "New Project Entry",
            View::Manage => "Manage Projects",
            View::Analytics => "Project Analytics",
        }
    }
}

/// Outcome of a create, passed back to the entry form as `?status=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitStatus {
    Success,
    Error,
}

impl SubmitStatus {
    pub fn message(self) -> &'static str {
        match self {
            SubmitStatus::Success => "Success! Data transmitted.",
            SubmitStatus::Error => "Failed. Check the server log.",
        }
    }

    /// Value of the `status` query parameter, also the CSS class.
    pub fn kind(self) -> &'static str {
        match self {
            SubmitStatus::Success => "success",
            SubmitStatus::Error => "error",
        }
    }
}

/// Outcome of an update or delete, passed back to the list as `?notice=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Notice {
    Updated,
    UpdateFailed,
    Deleted,
    DeleteFailed,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::Updated => "Update sent! Give it a moment to reflect.",
            Notice::UpdateFailed => "Update failed",
            Notice::Deleted => "Deletion request sent. Refreshing...",
            Notice::DeleteFailed => "Delete failed",
        }
    }

    fn kind(self) -> &'static str {
        match self {
            Notice::Updated | Notice::Deleted => "success",
            Notice::UpdateFailed | Notice::DeleteFailed => "error",
        }
    }

    pub fn query(self) -> &'static str {
        match self {
            Notice::Updated => "updated",
            Notice::UpdateFailed => "update-failed",
            Notice::Deleted => "deleted",
            Notice::DeleteFailed => "delete-failed",
        }
    }
}

/// Registered templates plus one render method per page.
pub struct Pages {
    registry: Handlebars<'static>,
}

impl Pages {
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        for (name, source) in PARTIALS {
            registry
                .register_partial(name, source)
                .map_err(|e| ShowcaseError::Template(e.to_string()))?;
        }
        for (name, source) in TEMPLATES {
            registry
                .register_template_string(name, source)
                .map_err(|e| ShowcaseError::Template(e.to_string()))?;
        }
        Ok(Self { registry })
    }

    fn render(&self, name: &str, data: &Value) -> Result<String> {
        self.registry
            .render(name, data)
            .map_err(|e| ShowcaseError::Template(e.to_string()))
    }

    /// Public page. `error` replaces the card grid when the sheet could not be read.
    pub fn showcase(&self, cards: &[ProjectCard], error: Option<&str>) -> Result<String> {
        self.render(
            "showcase",
            &json!({
                "cards": cards,
                "error": error,
                "year": chrono::Local::now().year(),
            }),
        )
    }

    pub fn add_view(&self, status: Option<SubmitStatus>) -> Result<String> {
        self.render(
            "dashboard_add",
            &json!({
                "title": View::Add.title(),
                "view": View::Add.slug(),
                "status": status.map(|s| json!({"kind": s.kind(), "message": s.message()})),
                "project": {},
                "types": type_options(""),
            }),
        )
    }

    pub fn projects_view(
        &self,
        projects: &[ProjectRecord],
        notice: Option<Notice>,
        error: Option<&str>,
    ) -> Result<String> {
        let rows: Vec<Value> = projects
            .iter()
            .map(|p| {
                json!({
                    "name": p.name(),
                    "kind": p.kind(),
                    "description": p.field(fields::DESCRIPTION),
                    "row": p.row(),
                })
            })
            .collect();

        self.render(
            "dashboard_projects",
            &json!({
                "title": View::Manage.title(),
                "view": View::Manage.slug(),
                "projects": rows,
                "notice": notice.map(|n| json!({"kind": n.kind(), "message": n.message()})),
                "error": error,
            }),
        )
    }

    pub fn edit_view(&self, row: u32, project: &ProjectRecord) -> Result<String> {
        self.render(
            "dashboard_edit",
            &json!({
                "title": View::Manage.title(),
                "view": View::Manage.slug(),
                "row": row,
                "project": project.to_json_map(),
                "types": type_options(project.kind()),
            }),
        )
    }

    /// Analytics view. With `Err`, the message replaces the counters and charts.
    pub fn analytics_view(&self, summary: std::result::Result<&DashboardSummary, &str>) -> Result<String> {
        let data = match summary {
            Ok(summary) => json!({
                "title": View::Analytics.title(),
                "view": View::Analytics.slug(),
                "total": summary.total,
                "top_category": summary.top_category_label(),
                "categories": summary.types.labels_with_counts(),
                "software": summary.top_software,
            }),
            Err(message) => json!({
                "title": View::Analytics.title(),
                "view": View::Analytics.slug(),
                "error": message,
            }),
        };
        self.render("dashboard_analytics", &data)
    }
}

/// Options for the Type select with `current` preselected.
///
/// A stored Type that is not one of the category labels (`"robotics"`,
/// `"Painting"`) is offered first, verbatim, so saving the form keeps it.
fn type_options(current: &str) -> Vec<Value> {
    let labels = Category::ALL.map(Category::label);
    let mut options = Vec::with_capacity(labels.len() + 1);
    if !current.is_empty() && !labels.contains(&current) {
        options.push(json!({"value": current, "selected": true}));
    }
    options.extend(
        labels
            .iter()
            .map(|label| json!({"value": label, "selected": *label == current})),
    );
    options
}
