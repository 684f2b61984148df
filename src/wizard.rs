//! Agent creation flows.
//!
//! `CreateAgentWizard` is the full eight-step flow; `QuickCreate` is the
//! three-step shortcut. Both produce a [`NewAgent`] for the store.

use crate::models::{Agent, Repository, Role, Scenario};
use crate::store::NewAgent;
use thiserror::Error;
use tracing::debug;

/// Step titles of the full wizard, in order.
pub const STEPS: [&str; 8] = [
    "基本信息",
    "分析场景",
    "选择分析源",
    "关注范围",
    "工作方式",
    "规则配置",
    "已学习",
    "完成",
];

/// Step titles of the quick-create flow.
pub const QUICK_STEPS: [&str; 3] = ["基本信息", "分析场景", "选择分析源"];

const CREATE_STEP: usize = 7;
const DONE_STEP: usize = STEPS.len();

/// Validation failures when submitting a wizard.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("agent name is required")]
    MissingName,

    #[error("select at least one repository")]
    NoRepositorySelected,

    #[error("agent can only be created from step {expected}, currently on step {actual}")]
    WrongStep { expected: usize, actual: usize },
}

/// State of the full create/edit wizard. Steps are numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAgentWizard {
    step: usize,
    pub name: String,
    pub scenario: Scenario,
    pub selected_repos: Vec<String>,
    editing: Option<String>,
}

impl CreateAgentWizard {
    /// Starts a new wizard with the first repository preselected.
    pub fn new(repositories: &[Repository]) -> Self {
        Self {
            step: 1,
            name: String::new(),
            scenario: Scenario::ProjectAcceptance,
            selected_repos: first_repo(repositories),
            editing: None,
        }
    }

    /// Starts a wizard pre-filled from an existing agent.
    pub fn for_edit(agent: &Agent, repositories: &[Repository]) -> Self {
        let selected_repos = repositories
            .iter()
            .find(|r| r.name == agent.repo)
            .map(|r| vec![r.id.clone()])
            .unwrap_or_default();

        Self {
            step: 1,
            name: agent.name.clone(),
            scenario: Scenario::ProjectAcceptance,
            selected_repos,
            editing: Some(agent.id.clone()),
        }
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn title(&self) -> &'static str {
        STEPS[self.step - 1]
    }

    /// Id of the agent being edited, if any.
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn is_complete(&self) -> bool {
        self.step == DONE_STEP
    }

    /// Whether the stepper lets the user jump to `step`.
    pub fn can_visit(&self, step: usize) -> bool {
        step >= 1 && step < self.step
    }

    pub fn next(&mut self) {
        self.step = (self.step + 1).min(DONE_STEP);
    }

    pub fn prev(&mut self) {
        self.step = self.step.saturating_sub(1).max(1);
    }

    /// Jumps back to a completed step. Forward jumps are ignored.
    pub fn go_to(&mut self, step: usize) -> bool {
        if self.can_visit(step) {
            self.step = step;
            true
        } else {
            false
        }
    }

    /// Finishes the flow from the last editable step.
    pub fn create(&mut self) -> Result<NewAgent, WizardError> {
        if self.step != CREATE_STEP {
            return Err(WizardError::WrongStep {
                expected: CREATE_STEP,
                actual: self.step,
            });
        }
        let name = self.name.trim();
        if name.is_empty() {
            return Err(WizardError::MissingName);
        }

        let agent = NewAgent {
            name: name.to_string(),
            scenario: self.scenario,
            repo_ids: self.selected_repos.clone(),
        };
        debug!("Wizard finished for agent {}", agent.name);
        self.step = DONE_STEP;
        Ok(agent)
    }

    /// Clears the form for creating another agent.
    pub fn reset(&mut self, repositories: &[Repository]) {
        *self = Self::new(repositories);
    }
}

/// Where a quick-created agent reads its code from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceType {
    #[default]
    Repository,
    Jar,
}

/// State of the three-step quick-create dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickCreate {
    step: usize,
    pub name: String,
    pub role: Role,
    pub scenario: Scenario,
    pub source: SourceType,
    selected_repos: Vec<String>,
}

impl QuickCreate {
    pub fn new(repositories: &[Repository]) -> Self {
        Self {
            step: 1,
            name: String::new(),
            role: Role::Developer,
            scenario: Scenario::ProjectAcceptance,
            source: SourceType::Repository,
            selected_repos: first_repo(repositories),
        }
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn next(&mut self) {
        self.step = (self.step + 1).min(QUICK_STEPS.len());
    }

    pub fn prev(&mut self) {
        self.step = self.step.saturating_sub(1).max(1);
    }

    pub fn selected_repos(&self) -> &[String] {
        &self.selected_repos
    }

    /// Selects the repository, or deselects it if already selected.
    pub fn toggle_repo(&mut self, id: &str) {
        match self.selected_repos.iter().position(|r| r == id) {
            Some(pos) => {
                self.selected_repos.remove(pos);
            }
            None => self.selected_repos.push(id.to_string()),
        }
    }

    pub fn submit(&self) -> Result<NewAgent, WizardError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(WizardError::MissingName);
        }
        if self.source == SourceType::Repository && self.selected_repos.is_empty() {
            return Err(WizardError::NoRepositorySelected);
        }

        Ok(NewAgent {
            name: name.to_string(),
            scenario: self.scenario,
            repo_ids: match self.source {
                SourceType::Repository => self.selected_repos.clone(),
                SourceType::Jar => Vec::new(),
            },
        })
    }
}

fn first_repo(repositories: &[Repository]) -> Vec<String> {
    repositories.first().map(|r| vec![r.id.clone()]).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use crate::store::Store;

    #[test]
    fn test_new_wizard_preselects_first_repo() {
        let wizard = CreateAgentWizard::new(&seed::repositories());
        assert_eq!(wizard.step(), 1);
        assert_eq!(wizard.title(), "基本信息");
        assert_eq!(wizard.selected_repos, vec!["repo-1"]);
        assert!(CreateAgentWizard::new(&[]).selected_repos.is_empty());
    }

    #[test]
    fn test_step_bounds() {
        let mut wizard = CreateAgentWizard::new(&[]);
        wizard.prev();
        assert_eq!(wizard.step(), 1);

        for _ in 0..20 {
            wizard.next();
        }
        assert_eq!(wizard.step(), 8);
        assert!(wizard.is_complete());
    }

    #[test]
    fn test_go_to_only_moves_back() {
        let mut wizard = CreateAgentWizard::new(&[]);
        wizard.next();
        wizard.next();
        wizard.next();
        assert_eq!(wizard.step(), 4);

        assert!(!wizard.go_to(6));
        assert!(!wizard.go_to(4));
        assert!(!wizard.go_to(0));
        assert_eq!(wizard.step(), 4);

        assert!(wizard.go_to(2));
        assert_eq!(wizard.step(), 2);
        assert_eq!(wizard.title(), "分析场景");
    }

    #[test]
    fn test_create_from_learning_step() {
        let repos = seed::repositories();
        let mut wizard = CreateAgentWizard::new(&repos);
        wizard.name = "  订单压测  ".to_string();
        wizard.scenario = Scenario::RiskRadar;

        assert!(matches!(
            wizard.create(),
            Err(WizardError::WrongStep { expected: 7, actual: 1 })
        ));

        for _ in 0..6 {
            wizard.next();
        }
        let new_agent = wizard.create().unwrap();
        assert_eq!(new_agent.name, "订单压测");
        assert_eq!(new_agent.scenario, Scenario::RiskRadar);
        assert!(wizard.is_complete());

        let mut store = Store::seeded();
        let agent = store.add_agent(new_agent);
        assert_eq!(agent.repo, "payment-service");
        assert_eq!(agent.role, "风险雷达");
    }

    #[test]
    fn test_create_requires_name() {
        let mut wizard = CreateAgentWizard::new(&[]);
        for _ in 0..6 {
            wizard.next();
        }
        assert_eq!(wizard.create(), Err(WizardError::MissingName));
        assert_eq!(wizard.step(), 7);
    }

    #[test]
    fn test_reset_and_edit() {
        let repos = seed::repositories();
        let mut wizard = CreateAgentWizard::new(&repos);
        wizard.name = "x".to_string();
        wizard.next();
        wizard.reset(&repos);
        assert_eq!(wizard, CreateAgentWizard::new(&repos));

        let agent = seed::agents().remove(1);
        let edit = CreateAgentWizard::for_edit(&agent, &repos);
        assert_eq!(edit.name, "订单服务-精准测试");
        assert_eq!(edit.selected_repos, vec!["repo-3"]);
        assert_eq!(edit.editing(), Some("agent-2"));
    }

    #[test]
    fn test_quick_create() {
        let repos = seed::repositories();
        let mut quick = QuickCreate::new(&repos);
        assert_eq!(quick.submit(), Err(WizardError::MissingName));

        quick.name = "支付模块压测Agent".to_string();
        quick.toggle_repo("repo-1");
        assert_eq!(quick.submit(), Err(WizardError::NoRepositorySelected));

        quick.toggle_repo("repo-2");
        quick.toggle_repo("repo-4");
        assert_eq!(quick.selected_repos(), ["repo-2", "repo-4"]);

        let new_agent = quick.submit().unwrap();
        assert_eq!(new_agent.repo_ids, vec!["repo-2", "repo-4"]);
    }

    #[test]
    fn test_quick_create_jar_source() {
        let mut quick = QuickCreate::new(&[]);
        quick.name = "jar agent".to_string();
        quick.source = SourceType::Jar;
        assert!(quick.submit().unwrap().repo_ids.is_empty());

        quick.next();
        quick.next();
        quick.next();
        assert_eq!(quick.step(), 3);
        quick.prev();
        assert_eq!(quick.step(), 2);
    }
}
