use std::{fmt::Display, path::Path};

use config::{Config, File};
use miette::{Context, IntoDiagnostic};
use serde::Deserialize;

use crate::result::{bail, Result};

/// The built-in scene holders: ten alternating groups of
/// short-cut and long-cut subclip durations
const SCENE_HOLDERS: [[f64; 4]; 10] = [
    [0.2, 0.2, 0.3, 0.7],
    [1.1, 0.9, 0.9, 0.9],
    [0.2, 0.2, 0.3, 0.7],
    [1.1, 0.9, 0.9, 0.9],
    [0.2, 0.2, 0.3, 0.7],
    [1.1, 0.9, 0.9, 0.9],
    [0.2, 0.2, 0.3, 0.7],
    [1.1, 0.9, 0.9, 0.9],
    [0.2, 0.2, 0.3, 0.7],
    [1.1, 0.9, 0.9, 0.9],
];

/// Ordered groups of subclip durations (in seconds) describing the
/// structure of the highlight. The group boundaries carry no meaning
/// for sampling, the plan is walked duration by duration in order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClipPlan {
    groups: Vec<Vec<f64>>,
}

impl ClipPlan {
    pub fn new(groups: Vec<Vec<f64>>) -> Result<Self> {
        let plan = Self { groups };
        plan.check()?;
        Ok(plan)
    }

    /// Load a plan from a TOML file with a single `groups` key,
    /// an array of arrays of durations in seconds
    pub fn from_file(path: &Path) -> Result<Self> {
        let plan: Self = Config::builder()
            .add_source(File::from(path))
            .build()
            .into_diagnostic()
            .wrap_err_with(|| format!("Could not read plan file '{}'", path.display()))?
            .try_deserialize()
            .into_diagnostic()
            .wrap_err("Plan file is not a valid clip plan")?;

        plan.check()?;
        Ok(plan)
    }

    fn check(&self) -> Result<()> {
        let has_durations = self.groups.iter().any(|group| !group.is_empty());
        if !has_durations {
            return bail("Clip plan does not contain any duration");
        }

        for &duration in self.durations() {
            if duration <= 0.0 {
                return bail(format!(
                    "Clip plan contains a non-positive duration: {duration}"
                ));
            }
        }

        Ok(())
    }

    pub fn groups(&self) -> &[Vec<f64>] {
        &self.groups
    }

    /// All durations in plan order, ignoring group boundaries
    pub fn durations(&self) -> impl Iterator<Item = &f64> {
        self.groups.iter().flatten()
    }
}

impl Default for ClipPlan {
    fn default() -> Self {
        Self {
            groups: SCENE_HOLDERS.iter().map(|group| group.to_vec()).collect(),
        }
    }
}

impl Display for ClipPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "[")?;
        for group in &self.groups {
            writeln!(f, "\t{group:?}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use indoc::indoc;

    use super::*;

    #[test]
    fn default_plan_is_the_scene_holders() {
        let plan = ClipPlan::default();
        assert_eq!(plan.groups().len(), 10);
        assert!(plan.groups().iter().all(|group| group.len() == 4));
        assert_eq!(plan.durations().count(), 40);
    }

    #[test]
    fn plan_loads_from_toml() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        write!(
            file,
            "{}",
            indoc! {r#"
                groups = [
                    [0.5, 0.5],
                    [2.0],
                ]
            "#}
        )
        .unwrap();

        let plan = ClipPlan::from_file(file.path()).unwrap();
        assert_eq!(plan.groups(), &[vec![0.5, 0.5], vec![2.0]]);
    }

    #[test]
    fn non_positive_durations_are_rejected() {
        assert!(ClipPlan::new(vec![vec![0.5, -1.0]]).is_err());
        assert!(ClipPlan::new(vec![vec![0.0]]).is_err());
    }

    #[test]
    fn empty_plans_are_rejected() {
        assert!(ClipPlan::new(vec![]).is_err());
        assert!(ClipPlan::new(vec![vec![], vec![]]).is_err());
    }
}
