//! Reference catalog and job planning
//!
//! Wells, problems, objectives, recommendations and procedures, read-only
//! once loaded. The built-in catalog is embedded at compile time from
//! `data/catalog.json`; a site catalog with the same shape can be loaded
//! from disk.
//!
//! Planning resolves a `(well, objective)` or `(well, problem)` pair into the
//! [`JobPlan`] the simulator runs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::types::{AiRecommendation, Objective, Problem, Procedure, Well};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unknown well '{0}'")]
    UnknownWell(String),

    #[error("Unknown objective '{0}'")]
    UnknownObjective(String),

    #[error("Unknown problem '{0}'")]
    UnknownProblem(String),

    #[error("No recommendation on record for problem '{0}'")]
    NoRecommendation(String),

    #[error("No procedure on record for objective '{0}'")]
    NoProcedure(String),

    #[error("Failed to read catalog ({}): {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Malformed catalog: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A fully resolved job: everything the simulator needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPlan {
    pub well: Well,
    pub objective: Objective,
    pub procedure: Procedure,
    /// Recommendation that selected the objective, when planned from a problem
    pub recommendation: Option<AiRecommendation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub wells: Vec<Well>,
    #[serde(default)]
    pub objectives: Vec<Objective>,
    #[serde(default)]
    pub problems: Vec<Problem>,
    /// Recommendations keyed by problem id
    #[serde(default)]
    pub recommendations: BTreeMap<String, Vec<AiRecommendation>>,
    /// Procedures keyed by objective id
    #[serde(default)]
    pub procedures: BTreeMap<String, Procedure>,
}

impl Catalog {
    /// The catalog shipped with the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Io(path.to_path_buf(), e))?;
        let catalog = Self::from_json_str(&contents)?;
        info!(
            path = %path.display(),
            wells = catalog.wells.len(),
            procedures = catalog.procedures.len(),
            "Loaded catalog"
        );
        Ok(catalog)
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    pub fn well(&self, id: &str) -> Result<&Well, CatalogError> {
        self.wells
            .iter()
            .find(|w| w.id == id)
            .ok_or_else(|| CatalogError::UnknownWell(id.to_string()))
    }

    pub fn objective(&self, id: &str) -> Result<&Objective, CatalogError> {
        self.objectives
            .iter()
            .find(|o| o.id == id)
            .ok_or_else(|| CatalogError::UnknownObjective(id.to_string()))
    }

    pub fn problem(&self, id: &str) -> Result<&Problem, CatalogError> {
        self.problems
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| CatalogError::UnknownProblem(id.to_string()))
    }

    /// Recommendations for a problem, highest confidence first.
    pub fn recommendations_for(
        &self,
        problem_id: &str,
    ) -> Result<Vec<&AiRecommendation>, CatalogError> {
        self.problem(problem_id)?;
        let mut recs: Vec<&AiRecommendation> = self
            .recommendations
            .get(problem_id)
            .map(|r| r.iter().collect())
            .unwrap_or_default();
        recs.sort_by(|a, b| b.confidence.cmp(&a.confidence));
        Ok(recs)
    }

    pub fn procedure_for(&self, objective_id: &str) -> Result<&Procedure, CatalogError> {
        self.objective(objective_id)?;
        self.procedures
            .get(objective_id)
            .ok_or_else(|| CatalogError::NoProcedure(objective_id.to_string()))
    }

    /// Wells that carry a survey and a completion.
    pub fn simulation_ready_wells(&self) -> impl Iterator<Item = &Well> {
        self.wells.iter().filter(|w| w.is_simulation_ready())
    }

    // ========================================================================
    // Planning
    // ========================================================================

    pub fn plan(&self, well_id: &str, objective_id: &str) -> Result<JobPlan, CatalogError> {
        let well = self.well(well_id)?;
        let objective = self.objective(objective_id)?;
        let procedure = self.procedure_for(objective_id)?;
        debug!(well = %well.id, objective = %objective.id, "Planned job");

        Ok(JobPlan {
            well: well.clone(),
            objective: objective.clone(),
            procedure: procedure.clone(),
            recommendation: None,
        })
    }

    /// Plan from a diagnosed problem using its highest-confidence recommendation.
    pub fn plan_from_problem(
        &self,
        well_id: &str,
        problem_id: &str,
    ) -> Result<JobPlan, CatalogError> {
        let recommendation = self
            .recommendations_for(problem_id)?
            .first()
            .copied()
            .cloned()
            .ok_or_else(|| CatalogError::NoRecommendation(problem_id.to_string()))?;

        info!(
            problem = problem_id,
            objective = %recommendation.objective_id,
            confidence = recommendation.confidence,
            "Selected recommended objective"
        );

        let mut plan = self.plan(well_id, &recommendation.objective_id)?;
        plan.recommendation = Some(recommendation);
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConveyanceType;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.wells.len(), 4);
        assert_eq!(catalog.objectives.len(), 3);
        assert_eq!(catalog.problems.len(), 3);
        assert_eq!(catalog.procedures.len(), 3);

        let ready: Vec<&str> = catalog.simulation_ready_wells().map(|w| w.id.as_str()).collect();
        assert_eq!(ready, vec!["W666"]);
    }

    #[test]
    fn test_w666_restrictions() {
        let catalog = Catalog::builtin().unwrap();
        let well = catalog.well("W666").unwrap();
        let completion = well.completion.as_ref().unwrap();
        let restricted: Vec<(f64, f64)> = completion
            .equipment
            .iter()
            .filter_map(|e| e.restriction.map(|r| (e.top, r)))
            .collect();
        assert_eq!(restricted, vec![(8500.0, 0.3), (14200.0, 0.4)]);
        assert_eq!(well.survey().len(), 6);
    }

    #[test]
    fn test_plan_by_objective() {
        let catalog = Catalog::builtin().unwrap();
        let plan = catalog.plan("W666", "obj2").unwrap();
        assert_eq!(plan.procedure.conveyance, ConveyanceType::CoiledTubing);
        assert!((plan.procedure.tool_weight - 2500.0).abs() < f64::EPSILON);
        assert!(plan.recommendation.is_none());
    }

    #[test]
    fn test_plan_from_problem_uses_recommendation() {
        let catalog = Catalog::builtin().unwrap();
        let plan = catalog.plan_from_problem("W666", "prob3").unwrap();
        assert_eq!(plan.objective.id, "obj3");
        assert_eq!(plan.recommendation.map(|r| r.confidence), Some(99));
        assert_eq!(plan.procedure.conveyance, ConveyanceType::Slickline);
    }

    #[test]
    fn test_unknown_ids() {
        let catalog = Catalog::builtin().unwrap();
        assert!(matches!(catalog.well("X-1"), Err(CatalogError::UnknownWell(_))));
        assert!(matches!(
            catalog.plan("W666", "obj9"),
            Err(CatalogError::UnknownObjective(_))
        ));
        assert!(matches!(
            catalog.plan_from_problem("W666", "prob9"),
            Err(CatalogError::UnknownProblem(_))
        ));
    }

    #[test]
    fn test_missing_recommendation_and_procedure() {
        let mut catalog = Catalog::builtin().unwrap();
        catalog.recommendations.remove("prob1");
        catalog.procedures.remove("obj2");
        assert!(matches!(
            catalog.plan_from_problem("W666", "prob1"),
            Err(CatalogError::NoRecommendation(_))
        ));
        assert!(matches!(
            catalog.procedure_for("obj2"),
            Err(CatalogError::NoProcedure(_))
        ));
    }

    #[test]
    fn test_highest_confidence_first() {
        let mut catalog = Catalog::builtin().unwrap();
        catalog.recommendations.insert(
            "prob2".to_string(),
            vec![
                AiRecommendation {
                    objective_id: "obj1".to_string(),
                    confidence: 40,
                    outcome: "Partial".to_string(),
                    reason: "Weak analogue".to_string(),
                },
                AiRecommendation {
                    objective_id: "obj2".to_string(),
                    confidence: 92,
                    outcome: "Cleared".to_string(),
                    reason: "S-15".to_string(),
                },
            ],
        );
        let recs = catalog.recommendations_for("prob2").unwrap();
        assert_eq!(recs[0].objective_id, "obj2");
        assert_eq!(catalog.plan_from_problem("W666", "prob2").unwrap().objective.id, "obj2");
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Catalog::from_json_str("{\"wells\": 3}"),
            Err(CatalogError::Malformed(_))
        ));
    }
}
