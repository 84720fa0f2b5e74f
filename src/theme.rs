use serde::Serialize;

use crate::record::{ProjectRecord, fields};

/// Visual theme of a project card: CSS classes plus icon names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CardTheme {
    pub gradient: &'static str,
    pub icon_color: &'static str,
    pub type_color: &'static str,
    pub tag_bg: &'static str,
    pub tag_text: &'static str,
    pub main_icon: &'static str,
    pub sub_icon: &'static str,
}

pub const THEMES: [CardTheme; 4] = [
    CardTheme {
        gradient: "from-blue-900 to-slate-900",
        icon_color: "text-ebl-blue",
        type_color: "text-ebl-blue",
        tag_bg: "bg-blue-50",
        tag_text: "text-blue-700",
        main_icon: "bot",
        sub_icon: "circuit-board",
    },
    CardTheme {
        gradient: "from-cyan-800 to-slate-900",
        icon_color: "text-cyan-600",
        type_color: "text-cyan-600",
        tag_bg: "bg-cyan-50",
        tag_text: "text-cyan-700",
        main_icon: "grab",
        sub_icon: "hand",
    },
    CardTheme {
        gradient: "from-indigo-900 to-slate-900",
        icon_color: "text-indigo-600",
        type_color: "text-indigo-600",
        tag_bg: "bg-indigo-50",
        tag_text: "text-indigo-700",
        main_icon: "box",
        sub_icon: "pen-tool",
    },
    CardTheme {
        gradient: "from-emerald-800 to-slate-900",
        icon_color: "text-emerald-600",
        type_color: "text-emerald-600",
        tag_bg: "bg-emerald-50",
        tag_text: "text-emerald-700",
        main_icon: "zap",
        sub_icon: "droplet",
    },
];

/// Picks the theme and side icon for a card.
///
/// Substring rules are checked in order (`robot`, then `3d`/`model`, then
/// `auto`/`plant`); unmatched types cycle through [`THEMES`] by `index`.
pub fn theme_for(type_field: &str, index: usize) -> (&'static CardTheme, &'static str) {
    let kind = type_field.to_lowercase();
    if kind.contains("robot") {
        (&THEMES[0], "bot")
    } else if kind.contains("3d") || kind.contains("model") {
        (&THEMES[2], "box")
    } else if kind.contains("auto") || kind.contains("plant") {
        (&THEMES[3], "factory")
    } else {
        let theme = &THEMES[index % THEMES.len()];
        (theme, theme.sub_icon)
    }
}

/// Tag chips for a card: materials, then software, then the code link as one tag.
pub fn card_tags(project: &ProjectRecord) -> Vec<String> {
    let mut tags: Vec<&str> = Vec::new();
    tags.extend(project.field(fields::MATERIALS).split(','));
    tags.extend(project.field(fields::SOFTWARE).split(','));
    tags.push(project.field(fields::CODE));

    tags.into_iter()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Everything the showcase template needs to draw one card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectCard {
    pub name: String,
    pub type_label: String,
    pub description: String,
    pub video_link: String,
    pub tags: Vec<String>,
    pub side_icon: &'static str,
    pub theme: CardTheme,
}

impl ProjectCard {
    pub fn new(project: &ProjectRecord, index: usize) -> Self {
        let (theme, side_icon) = theme_for(project.kind(), index);
        Self {
            name: project.name().to_string(),
            type_label: non_empty_or(project.kind(), "Project"),
            description: project.field(fields::DESCRIPTION).to_string(),
            video_link: non_empty_or(project.field(fields::VIDEO_LINK), "#"),
            tags: card_tags(project),
            side_icon,
            theme: *theme,
        }
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Cards for every named project, in list order.
///
/// `index` counts every record, so skipped nameless records still advance the
/// theme cycle.
pub fn build_cards(projects: &[ProjectRecord]) -> Vec<ProjectCard> {
    projects
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.name().is_empty())
        .map(|(index, p)| ProjectCard::new(p, index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(pairs: &[(&str, &str)]) -> ProjectRecord {
        ProjectRecord::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn substring_rules_pick_fixed_themes() {
        assert_eq!(theme_for("Robotics", 5), (&THEMES[0], "bot"));
        assert_eq!(theme_for("3D Printing", 5), (&THEMES[2], "box"));
        assert_eq!(theme_for("CAD model", 5), (&THEMES[2], "box"));
        assert_eq!(theme_for("Home Automation", 5), (&THEMES[3], "factory"));
        assert_eq!(theme_for("Power plant", 5), (&THEMES[3], "factory"));
    }

    #[test]
    fn robot_rule_wins_over_later_rules() {
        assert_eq!(theme_for("Automated robot", 0).1, "bot");
    }

    #[test]
    fn unknown_type_cycles_by_index() {
        assert_eq!(theme_for("Painting", 0), (&THEMES[0], "circuit-board"));
        assert_eq!(theme_for("Painting", 1), (&THEMES[1], "hand"));
        assert_eq!(theme_for("", 6), (&THEMES[2], "pen-tool"));
    }

    #[test]
    fn tags_keep_code_whole_and_drop_blanks() {
        let p = project(&[
            ("Materials", "PLA, Steel,"),
            ("Software", " Fusion360 ,Arduino"),
            ("Code", "github.com/a, b"),
        ]);
        assert_eq!(
            card_tags(&p),
            vec!["PLA", "Steel", "Fusion360", "Arduino", "github.com/a, b"]
        );
    }

    #[test]
    fn nameless_projects_are_skipped_but_advance_index() {
        let projects = vec![
            project(&[("Name", ""), ("Type", "Painting")]),
            project(&[("Name", "Easel"), ("Type", "Painting")]),
        ];
        let cards = build_cards(&projects);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].name, "Easel");
        assert_eq!(cards[0].theme, THEMES[1]);
    }

    #[test]
    fn card_fallbacks() {
        let card = ProjectCard::new(&project(&[("Name", "Arm")]), 0);
        assert_eq!(card.type_label, "Project");
        assert_eq!(card.video_link, "#");
        assert!(card.tags.is_empty());
        assert_eq!(card.description, "");
    }
}
