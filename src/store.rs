//! In-memory store for agents, repositories, reports, rules and tokens.
//!
//! The store owns every collection. Readers get cloned snapshots, so a
//! caller holding a list never observes later writes. Nothing is
//! persisted; a new process starts from the seed data again.

use crate::models::{
    Agent, AgentStatus, ApiToken, LearnedRule, Platform, Report, Repository, Rule, Scenario,
};
use crate::seed;
use chrono::{Days, Local, NaiveDate, Utc};
use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Prefix of every generated API token.
pub const TOKEN_PREFIX: &str = "hawk_";

/// Number of random characters after the prefix.
const TOKEN_BODY_LEN: usize = 32;

/// Characters shown in the listed token prefix before the ellipsis.
const TOKEN_VISIBLE_LEN: usize = 9;

const TOKEN_CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Label for tokens without an expiry date.
pub const NEVER_EXPIRES: &str = "永不过期";

const NEVER_USED: &str = "从未使用";
const JUST_NOW: &str = "刚刚";
const UNKNOWN_REPO: &str = "unknown-repo";

/// Errors returned by store operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("already exists: {0}")]
    Duplicate(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Input for creating an agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAgent {
    pub name: String,
    pub scenario: Scenario,
    /// Selected repository ids; the first one names the agent's repo.
    pub repo_ids: Vec<String>,
}

/// Input for connecting a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectRepo {
    pub platform: Platform,
    pub url: String,
    pub token: String,
    pub branch: String,
}

/// Lifetime of a new API token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    Days(u64),
    Never,
}

/// A freshly generated token. `secret` is only available here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedToken {
    pub token: ApiToken,
    pub secret: String,
}

/// Headline numbers for the overview page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OverviewStats {
    /// Agents that are not idle.
    pub running_agents: usize,
    pub repositories: usize,
    /// Sum of P0 and P1 issues across agents.
    pub open_issues: usize,
    pub reports: usize,
}

/// The in-memory backend.
#[derive(Debug, Clone, Default)]
pub struct Store {
    agents: Vec<Agent>,
    repositories: Vec<Repository>,
    reports: Vec<Report>,
    rules: Vec<Rule>,
    learned_rules: Vec<LearnedRule>,
    tokens: Vec<ApiToken>,
    sequence: u64,
}

impl Store {
    /// Creates a store loaded with the built-in sample data.
    pub fn seeded() -> Self {
        Self {
            agents: seed::agents(),
            repositories: seed::repositories(),
            reports: seed::reports(),
            rules: seed::rules(),
            learned_rules: seed::learned_rules(),
            tokens: seed::tokens(),
            sequence: 0,
        }
    }

    fn next_id(&mut self, kind: &str) -> String {
        self.sequence += 1;
        format!("{}-{}{:03}", kind, Utc::now().timestamp_millis(), self.sequence)
    }

    // --- Agents ---

    pub fn agents(&self) -> Vec<Agent> {
        self.agents.clone()
    }

    pub fn agent(&self, id: &str) -> Result<Agent> {
        self.agents
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| not_found("agent", id))
    }

    /// Creates a running agent and puts it at the front of the list.
    pub fn add_agent(&mut self, new: NewAgent) -> Agent {
        let agent = Agent {
            id: self.next_id("agent"),
            name: new.name,
            status: AgentStatus::Running,
            repo: self.repo_name_for(&new.repo_ids),
            role: new.scenario.label().to_string(),
            last_scan: JUST_NOW.to_string(),
            p0_issues: 0,
            p1_issues: 0,
            health: 100,
        };

        info!("Created agent {} ({}) on {}", agent.name, agent.id, agent.repo);
        self.agents.insert(0, agent.clone());
        agent
    }

    /// Replaces the name, repository and role of an existing agent.
    pub fn update_agent(&mut self, id: &str, update: NewAgent) -> Result<Agent> {
        let repo = self.repo_name_for(&update.repo_ids);
        let agent = self
            .agents
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| not_found("agent", id))?;

        agent.name = update.name;
        agent.repo = repo;
        agent.role = update.scenario.label().to_string();

        info!("Updated agent {}", id);
        Ok(agent.clone())
    }

    pub fn remove_agent(&mut self, id: &str) -> Result<Agent> {
        let pos = self
            .agents
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| not_found("agent", id))?;

        info!("Removed agent {}", id);
        Ok(self.agents.remove(pos))
    }

    fn repo_name_for(&self, repo_ids: &[String]) -> String {
        repo_ids
            .first()
            .and_then(|id| self.repositories.iter().find(|r| &r.id == id))
            .map(|r| r.name.clone())
            .unwrap_or_else(|| {
                warn!("No known repository in {:?}, using {}", repo_ids, UNKNOWN_REPO);
                UNKNOWN_REPO.to_string()
            })
    }

    // --- Repositories ---

    pub fn repositories(&self) -> Vec<Repository> {
        self.repositories.clone()
    }

    pub fn repository(&self, id: &str) -> Result<Repository> {
        self.repositories
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| not_found("repository", id))
    }

    /// Registers a repository. The access token is checked for presence only.
    pub fn connect_repository(&mut self, request: ConnectRepo) -> Result<Repository> {
        let url = request.url.trim();
        if url.is_empty() || request.token.trim().is_empty() {
            return Err(StoreError::Validation(
                "repository url and access token are required".to_string(),
            ));
        }
        if self.repositories.iter().any(|r| r.url == url) {
            return Err(StoreError::Duplicate(url.to_string()));
        }

        let name = repo_name_from_url(url)
            .ok_or_else(|| StoreError::Validation(format!("cannot derive a name from {}", url)))?;
        let branch = match request.branch.trim() {
            "" => "main".to_string(),
            b => b.to_string(),
        };

        let repo = Repository {
            id: self.next_id("repo"),
            name,
            url: url.to_string(),
            main_branch: branch,
            file_count: 0,
            language: "Unknown".to_string(),
            agent_count: 0,
        };

        info!("Connected {} repository {} ({})", request.platform, repo.name, repo.url);
        self.repositories.push(repo.clone());
        Ok(repo)
    }

    // --- Reports ---

    pub fn reports(&self) -> Vec<Report> {
        self.reports.clone()
    }

    pub fn report(&self, id: &str) -> Result<Report> {
        self.reports
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| not_found("report", id))
    }

    // --- Rules ---

    pub fn rules(&self) -> Vec<Rule> {
        self.rules.clone()
    }

    pub fn set_rule_enabled(&mut self, id: &str, enabled: bool) -> Result<Rule> {
        let rule = self
            .rules
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found("rule", id))?;

        rule.enabled = enabled;
        debug!("Rule {} ({}) enabled={}", rule.code, rule.id, enabled);
        Ok(rule.clone())
    }

    pub fn learned_rules(&self) -> Vec<LearnedRule> {
        self.learned_rules.clone()
    }

    // --- API tokens ---

    pub fn tokens(&self) -> Vec<ApiToken> {
        self.tokens.clone()
    }

    /// Generates a token, stores its listing and returns the full secret once.
    pub fn generate_token(&mut self, name: &str, expiry: Expiry) -> Result<GeneratedToken> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Validation("token name is required".to_string()));
        }

        let today = Local::now().date_naive();
        let secret = random_token(&mut rand::rng());
        let token = ApiToken {
            id: self.next_id("token"),
            name: name.to_string(),
            token_prefix: secret[..TOKEN_VISIBLE_LEN].to_string(),
            last_used: NEVER_USED.to_string(),
            created: format_date(today),
            expires: expiry_label(today, expiry),
        };

        info!("Generated API token {} ({})", token.name, token.id);
        self.tokens.insert(0, token.clone());
        Ok(GeneratedToken { token, secret })
    }

    pub fn revoke_token(&mut self, id: &str) -> Result<ApiToken> {
        let pos = self
            .tokens
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| not_found("token", id))?;

        info!("Revoked API token {}", id);
        Ok(self.tokens.remove(pos))
    }

    // --- Overview ---

    pub fn overview(&self) -> OverviewStats {
        OverviewStats {
            running_agents: self
                .agents
                .iter()
                .filter(|a| a.status != AgentStatus::Idle)
                .count(),
            repositories: self.repositories.len(),
            open_issues: self.agents.iter().map(|a| a.p0_issues + a.p1_issues).sum(),
            reports: self.reports.len(),
        }
    }
}

fn not_found(kind: &'static str, id: &str) -> StoreError {
    StoreError::NotFound {
        kind,
        id: id.to_string(),
    }
}

/// Last path segment of a clone URL without the `.git` suffix.
fn repo_name_from_url(url: &str) -> Option<String> {
    let segment = url.trim_end_matches('/').rsplit(['/', ':']).next()?;
    let name = segment.strip_suffix(".git").unwrap_or(segment);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

fn random_token<R: Rng>(rng: &mut R) -> String {
    let body: String = (0..TOKEN_BODY_LEN)
        .map(|_| TOKEN_CHARSET[rng.random_range(0..TOKEN_CHARSET.len())] as char)
        .collect();
    format!("{}{}", TOKEN_PREFIX, body)
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn expiry_label(today: NaiveDate, expiry: Expiry) -> String {
    match expiry {
        Expiry::Days(days) if days > 0 => today
            .checked_add_days(Days::new(days))
            .map(format_date)
            .unwrap_or_else(|| NEVER_EXPIRES.to_string()),
        _ => NEVER_EXPIRES.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_agent(name: &str, repo_ids: &[&str]) -> NewAgent {
        NewAgent {
            name: name.to_string(),
            scenario: Scenario::ChangeRisk,
            repo_ids: repo_ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_seeded_store() {
        let store = Store::seeded();
        assert_eq!(store.agents().len(), 3);
        assert_eq!(store.repositories().len(), 5);
        assert_eq!(store.rules().len(), 4);
        assert_eq!(store.learned_rules().len(), 5);
        assert_eq!(store.tokens().len(), 2);
        assert!(!store.reports().is_empty());
        assert!(Store::default().agents().is_empty());
    }

    #[test]
    fn test_add_agent() {
        let mut store = Store::seeded();
        let agent = store.add_agent(new_agent("支付模块压测Agent", &["repo-3", "repo-1"]));

        assert_eq!(agent.repo, "order-service");
        assert_eq!(agent.role, "变更风险评估");
        assert_eq!(agent.status, AgentStatus::Running);
        assert_eq!(agent.last_scan, "刚刚");
        assert_eq!((agent.p0_issues, agent.p1_issues, agent.health), (0, 0, 100));
        assert!(agent.id.starts_with("agent-"));

        let agents = store.agents();
        assert_eq!(agents.len(), 4);
        assert_eq!(agents[0], agent);
    }

    #[test]
    fn test_add_agent_unknown_repo() {
        let mut store = Store::seeded();
        assert_eq!(store.add_agent(new_agent("a", &[])).repo, "unknown-repo");
        assert_eq!(store.add_agent(new_agent("b", &["nope"])).repo, "unknown-repo");
    }

    #[test]
    fn test_agent_ids_are_unique() {
        let mut store = Store::seeded();
        let a = store.add_agent(new_agent("a", &["repo-1"]));
        let b = store.add_agent(new_agent("b", &["repo-1"]));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_snapshots_are_isolated() {
        let mut store = Store::seeded();
        let before = store.agents();
        store.add_agent(new_agent("a", &["repo-1"]));
        assert_eq!(before.len(), 3);
        assert_eq!(store.agents().len(), 4);
    }

    #[test]
    fn test_update_and_remove_agent() {
        let mut store = Store::seeded();
        let updated = store
            .update_agent("agent-2", new_agent("renamed", &["repo-4"]))
            .unwrap();
        assert_eq!(updated.name, "renamed");
        assert_eq!(updated.repo, "user-service");
        assert_eq!(updated.status, AgentStatus::Scanning);

        let removed = store.remove_agent("agent-2").unwrap();
        assert_eq!(removed.name, "renamed");
        assert!(matches!(
            store.agent("agent-2"),
            Err(StoreError::NotFound { kind: "agent", .. })
        ));
        assert!(store.remove_agent("agent-2").is_err());
    }

    #[test]
    fn test_connect_repository() {
        let mut store = Store::seeded();
        let repo = store
            .connect_repository(ConnectRepo {
                platform: Platform::Gitlab,
                url: "https://gitlab.com/company/billing-service.git".to_string(),
                token: "glpat-123".to_string(),
                branch: String::new(),
            })
            .unwrap();

        assert_eq!(repo.name, "billing-service");
        assert_eq!(repo.main_branch, "main");
        assert_eq!(store.repositories().len(), 6);
        assert_eq!(store.repository(&repo.id).unwrap(), repo);
    }

    #[test]
    fn test_connect_repository_validation() {
        let mut store = Store::seeded();
        let missing_token = ConnectRepo {
            platform: Platform::Github,
            url: "https://github.com/company/new.git".to_string(),
            token: " ".to_string(),
            branch: "main".to_string(),
        };
        assert!(matches!(
            store.connect_repository(missing_token),
            Err(StoreError::Validation(_))
        ));

        let duplicate = ConnectRepo {
            platform: Platform::Github,
            url: "https://github.com/company/payment-service.git".to_string(),
            token: "ghp_x".to_string(),
            branch: "main".to_string(),
        };
        assert!(matches!(
            store.connect_repository(duplicate),
            Err(StoreError::Duplicate(_))
        ));
    }

    #[test]
    fn test_repo_name_from_url() {
        assert_eq!(
            repo_name_from_url("https://github.com/o/repo.git").as_deref(),
            Some("repo")
        );
        assert_eq!(repo_name_from_url("git@gitee.com:o/tool").as_deref(), Some("tool"));
        assert_eq!(repo_name_from_url("https://github.com/o/repo/").as_deref(), Some("repo"));
        assert_eq!(repo_name_from_url(".git"), None);
    }

    #[test]
    fn test_set_rule_enabled() {
        let mut store = Store::seeded();
        let rule = store.set_rule_enabled("rule-4", true).unwrap();
        assert!(rule.enabled);
        assert!(store.rules().iter().all(|r| r.enabled));
        assert!(store.set_rule_enabled("rule-99", true).is_err());
    }

    #[test]
    fn test_generate_token() {
        let mut store = Store::seeded();
        let generated = store.generate_token("CI Runner", Expiry::Days(30)).unwrap();

        assert!(generated.secret.starts_with(TOKEN_PREFIX));
        assert_eq!(generated.secret.len(), TOKEN_PREFIX.len() + TOKEN_BODY_LEN);
        assert!(generated.secret[TOKEN_PREFIX.len()..]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert_eq!(generated.token.token_prefix, &generated.secret[..9]);
        assert_eq!(generated.token.last_used, "从未使用");
        assert_ne!(generated.token.expires, NEVER_EXPIRES);

        let tokens = store.tokens();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0], generated.token);
        assert!(!tokens[0].token_prefix.contains(&generated.secret));
    }

    #[test]
    fn test_generate_token_requires_name() {
        let mut store = Store::seeded();
        assert!(matches!(
            store.generate_token("   ", Expiry::Never),
            Err(StoreError::Validation(_))
        ));
        assert_eq!(store.tokens().len(), 2);
    }

    #[test]
    fn test_expiry_label() {
        let today = NaiveDate::from_ymd_opt(2025, 11, 10).unwrap();
        assert_eq!(expiry_label(today, Expiry::Days(30)), "2025-12-10");
        assert_eq!(expiry_label(today, Expiry::Days(0)), NEVER_EXPIRES);
        assert_eq!(expiry_label(today, Expiry::Never), NEVER_EXPIRES);
    }

    #[test]
    fn test_revoke_token() {
        let mut store = Store::seeded();
        let revoked = store.revoke_token("token-1").unwrap();
        assert_eq!(revoked.name, "GitLab CI Runner");
        assert_eq!(store.tokens().len(), 1);
        assert_eq!(
            store.revoke_token("token-1"),
            Err(StoreError::NotFound {
                kind: "token",
                id: "token-1".to_string()
            })
        );
    }

    #[test]
    fn test_overview() {
        let store = Store::seeded();
        let stats = store.overview();
        assert_eq!(stats.running_agents, 2);
        assert_eq!(stats.repositories, 5);
        assert_eq!(stats.open_issues, 5 + 18 + 1 + 7 + 3);
        assert_eq!(stats.reports, store.reports().len());
    }

    #[test]
    fn test_report_lookup() {
        let store = Store::seeded();
        assert!(store.report("report-1").is_ok());
        assert_eq!(
            store.report("missing").unwrap_err().to_string(),
            "report not found: missing"
        );
    }
}
