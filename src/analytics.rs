//! Dashboard analytics: category counts and technology frequencies.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::record::{ProjectRecord, fields};

/// How many technologies the dashboard shows.
pub const TOP_SOFTWARE_LIMIT: usize = 5;

/// Closed set of project categories.
///
/// Declaration order is the tie-break order for the top category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Robotics,
    Automation,
    ThreeDModeling,
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Robotics,
        Category::Automation,
        Category::ThreeDModeling,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Robotics => "Robotics",
            Category::Automation => "Automation",
            Category::ThreeDModeling => "3D Modeling",
            Category::Other => "Other",
        }
    }

    /// Case-insensitive exact match against the known labels; anything else is `Other`.
    pub fn classify(type_field: &str) -> Category {
        let lowered = type_field.to_lowercase();
        Category::ALL[..3]
            .iter()
            .copied()
            .find(|c| c.label().to_lowercase() == lowered)
            .unwrap_or(Category::Other)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Project count per category. All four categories are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeBreakdown {
    counts: [usize; 4],
}

impl TypeBreakdown {
    pub fn count(&self, category: Category) -> usize {
        self.counts[category.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `(category, count)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, usize)> + '_ {
        Category::ALL.iter().map(|c| (*c, self.count(*c)))
    }

    /// Category with the highest count; ties go to the earlier category.
    ///
    /// With no projects at all every count is zero and this is `Robotics`.
    pub fn top(&self) -> (Category, usize) {
        let mut sorted: Vec<(Category, usize)> = self.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted[0]
    }

    /// Chart labels such as `"Robotics (5)"`.
    pub fn labels_with_counts(&self) -> Vec<String> {
        self.iter()
            .map(|(c, n)| format!("{} ({})", c.label(), n))
            .collect()
    }
}

/// Counts projects per category from their `Type` column.
pub fn aggregate_by_type(projects: &[ProjectRecord]) -> TypeBreakdown {
    let mut breakdown = TypeBreakdown::default();
    for project in projects {
        let kind = match project.kind() {
            "" => Category::Other.label(),
            kind => kind,
        };
        breakdown.counts[Category::classify(kind).index()] += 1;
    }
    breakdown
}

/// How often one technology appears across projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoftwareUsage {
    pub name: String,
    pub count: usize,
}

/// Counts every comma-separated `Software` token, most frequent first.
///
/// Tokens are trimmed and compared case-sensitively; a blank token (from
/// `"a,,b"` or a trailing comma) is counted as `""` like any other. Equal
/// counts keep the order in which the tokens were first seen.
pub fn aggregate_by_software(projects: &[ProjectRecord]) -> Vec<SoftwareUsage> {
    let mut usage: Vec<SoftwareUsage> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for project in projects {
        let software = project.field(fields::SOFTWARE);
        if software.is_empty() {
            continue;
        }
        for token in software.split(',').map(str::trim) {
            match positions.get(token) {
                Some(&i) => usage[i].count += 1,
                None => {
                    positions.insert(token.to_string(), usage.len());
                    usage.push(SoftwareUsage {
                        name: token.to_string(),
                        count: 1,
                    });
                }
            }
        }
    }

    // stable: ties stay in first-seen order
    usage.sort_by(|a, b| b.count.cmp(&a.count));
    usage
}

/// The `limit` most used technologies.
pub fn top_software(projects: &[ProjectRecord], limit: usize) -> Vec<SoftwareUsage> {
    let mut usage = aggregate_by_software(projects);
    usage.truncate(limit);
    usage
}

/// Everything the analytics view shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total: usize,
    pub types: TypeBreakdown,
    pub top_software: Vec<SoftwareUsage>,
}

impl DashboardSummary {
    pub fn from_projects(projects: &[ProjectRecord]) -> Self {
        Self {
            total: projects.len(),
            types: aggregate_by_type(projects),
            top_software: top_software(projects, TOP_SOFTWARE_LIMIT),
        }
    }

    /// E.g. `"Robotics (4)"`.
    pub fn top_category_label(&self) -> String {
        let (category, count) = self.types.top();
        format!("{} ({})", category.label(), count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(kind: &str) -> ProjectRecord {
        ProjectRecord::from_pairs([("Name", "p"), ("Type", kind)])
    }

    fn with_software(software: &str) -> ProjectRecord {
        ProjectRecord::from_pairs([("Name", "p"), ("Software", software)])
    }

    #[test]
    fn type_match_ignores_case() {
        let projects = vec![typed("robotics"), typed("Robotics"), typed("ROBOTICS")];
        let breakdown = aggregate_by_type(&projects);
        assert_eq!(breakdown.count(Category::Robotics), 3);
        assert_eq!(breakdown.count(Category::Other), 0);
    }

    #[test]
    fn unknown_and_empty_types_are_other() {
        let projects = vec![
            typed("Painting"),
            typed(""),
            ProjectRecord::from_pairs([("Name", "untyped")]),
            typed("3d modeling"),
        ];
        let breakdown = aggregate_by_type(&projects);
        assert_eq!(breakdown.count(Category::Other), 3);
        assert_eq!(breakdown.count(Category::ThreeDModeling), 1);
        assert_eq!(breakdown.total(), 4);
    }

    #[test]
    fn type_match_is_exact_not_substring() {
        assert_eq!(Category::classify("Robotics Arm"), Category::Other);
        assert_eq!(Category::classify(" Robotics"), Category::Other);
        assert_eq!(Category::classify("AUTOMATION"), Category::Automation);
    }

    #[test]
    fn no_projects_means_robotics_zero() {
        let breakdown = aggregate_by_type(&[]);
        for (_, count) in breakdown.iter() {
            assert_eq!(count, 0);
        }
        assert_eq!(breakdown.top(), (Category::Robotics, 0));
    }

    #[test]
    fn tie_goes_to_earlier_category() {
        let projects = vec![typed("Other stuff"), typed("Automation")];
        assert_eq!(aggregate_by_type(&projects).top(), (Category::Automation, 1));
    }

    #[test]
    fn labels_include_counts_in_fixed_order() {
        let projects = vec![typed("Robotics"), typed("Robotics"), typed("Welding")];
        assert_eq!(
            aggregate_by_type(&projects).labels_with_counts(),
            vec!["Robotics (2)", "Automation (0)", "3D Modeling (0)", "Other (1)"]
        );
    }

    #[test]
    fn software_tokens_are_counted() {
        let projects = vec![with_software("Fusion360, Arduino"), with_software("Arduino")];
        let usage = aggregate_by_software(&projects);
        assert_eq!(
            usage,
            vec![
                SoftwareUsage { name: "Arduino".into(), count: 2 },
                SoftwareUsage { name: "Fusion360".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn software_is_case_sensitive_and_counts_blank_tokens() {
        let projects = vec![with_software("ROS, ros,, "), with_software("")];
        let usage = aggregate_by_software(&projects);
        let counts: Vec<(&str, usize)> = usage.iter().map(|u| (u.name.as_str(), u.count)).collect();
        assert_eq!(counts, vec![("", 2), ("ROS", 1), ("ros", 1)]);
    }

    #[test]
    fn trailing_comma_counts_an_empty_technology() {
        let usage = aggregate_by_software(&[with_software("Arduino, ")]);
        let counts: Vec<(&str, usize)> = usage.iter().map(|u| (u.name.as_str(), u.count)).collect();
        assert_eq!(counts, vec![("Arduino", 1), ("", 1)]);
    }

    #[test]
    fn top_software_keeps_five_most_used() {
        let projects = vec![
            with_software("A, B, C, D, E, F"),
            with_software("F, E"),
            with_software("F"),
        ];
        let top = top_software(&projects, TOP_SOFTWARE_LIMIT);
        assert_eq!(top.len(), 5);
        assert_eq!(top[0], SoftwareUsage { name: "F".into(), count: 3 });
        assert_eq!(top[1], SoftwareUsage { name: "E".into(), count: 2 });
        // remaining ties in first-seen order
        let rest: Vec<&str> = top[2..].iter().map(|u| u.name.as_str()).collect();
        assert_eq!(rest, vec!["A", "B", "C"]);
    }

    #[test]
    fn summary_reports_top_category() {
        let mut projects = vec![
            typed("Robotics"),
            typed("robotics"),
            typed("ROBOTICS"),
            typed("RoBoTiCs"),
        ];
        projects.extend(["Automation", "Automation", "3D Modeling", "Other", "", "Art"].map(typed));
        let summary = DashboardSummary::from_projects(&projects);
        assert_eq!(summary.total, 10);
        assert_eq!(summary.top_category_label(), "Robotics (4)");
    }
}
