//! Data models for the agent dashboard.
//!
//! This module contains the core data structures shared by the store,
//! the aggregator and the report views: issues, reports, agents,
//! repositories, rules and API tokens.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority of an issue, ordered by urgency (`P0` is the greatest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Nice to fix - style, maintainability
    P2,
    /// Should fix - likely bugs, risky patterns
    P1,
    /// Must fix - outages, data loss, deadlocks
    P0,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::P0 => write!(f, "P0"),
            Priority::P1 => write!(f, "P1"),
            Priority::P2 => write!(f, "P2"),
        }
    }
}

impl Priority {
    /// Returns an emoji representation of the priority.
    pub fn emoji(&self) -> &'static str {
        match self {
            Priority::P0 => "🔴",
            Priority::P1 => "🟠",
            Priority::P2 => "⚪",
        }
    }
}

/// A single code-quality finding.
///
/// Callers must supply `file` and `category`; the aggregator does not
/// guard against empty values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Unique identifier within its report.
    pub id: String,
    /// Priority of the issue.
    pub priority: Priority,
    /// Path of the affected file (relative to repo root).
    pub file: String,
    /// Human readable description.
    pub description: String,
    /// Free-form category, e.g. "性能".
    pub category: String,
}

impl Issue {
    pub fn new(
        id: impl Into<String>,
        priority: Priority,
        file: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            priority,
            file: file.into(),
            description: description.into(),
            category: category.into(),
        }
    }
}

/// Viewer role a report was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Developer,
    TechLead,
    Architect,
    TechManager,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Developer => write!(f, "developer"),
            Role::TechLead => write!(f, "tech-lead"),
            Role::Architect => write!(f, "architect"),
            Role::TechManager => write!(f, "tech-manager"),
        }
    }
}

/// Summary numbers shown on report cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStat {
    pub new_issues: usize,
    pub fixed_issues: usize,
    /// Health delta in percentage points, may be negative.
    pub health_change: i32,
    pub p0_issues: usize,
}

/// A module bucket used by the module rollup.
///
/// Prefixes are not required to be disjoint; an issue matching several
/// prefixes is counted in each of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDef {
    pub name: String,
    pub path_prefix: String,
    #[serde(default)]
    pub is_core: bool,
}

impl ModuleDef {
    pub fn new(name: impl Into<String>, path_prefix: impl Into<String>, is_core: bool) -> Self {
        Self {
            name: name.into(),
            path_prefix: path_prefix.into(),
            is_core,
        }
    }

    /// Whether the given file falls under this module.
    pub fn contains(&self, file: &str) -> bool {
        file.starts_with(&self.path_prefix)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcernSeverity {
    High,
    Medium,
}

/// An architecture-level risk surfaced in technical-debt reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitecturalConcern {
    pub title: String,
    pub description: String,
    pub severity: ConcernSeverity,
}

/// An outdated or vulnerable dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechStackRisk {
    pub library: String,
    pub version: String,
    pub risk: String,
}

/// Duplicated code spanning two files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeDuplication {
    pub first_file: String,
    pub second_file: String,
    pub lines: usize,
    pub module: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::High => write!(f, "高"),
            RiskLevel::Medium => write!(f, "中"),
            RiskLevel::Low => write!(f, "低"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Conclusion {
    Pass,
    Fail,
}

impl fmt::Display for Conclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conclusion::Pass => write!(f, "通过"),
            Conclusion::Fail => write!(f, "不通过"),
        }
    }
}

/// A measured value with its unit, e.g. `850 ms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub value: f64,
    pub unit: String,
    /// Change against the previous run, in the same unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<f64>,
}

impl Measure {
    pub fn new(value: f64, unit: &str) -> Self {
        Self {
            value,
            unit: unit.to_string(),
            trend: None,
        }
    }

    pub fn with_trend(mut self, trend: f64) -> Self {
        self.trend = Some(trend);
        self
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceKpis {
    pub avg_response_time: Measure,
    pub p99_response_time: Measure,
    pub tps: Measure,
    pub success_rate: Measure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestInfo {
    pub duration: String,
    pub concurrency: usize,
    pub ramp_up: String,
    pub target: String,
}

/// A performance bottleneck found under load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bottleneck {
    pub id: String,
    pub priority: Priority,
    pub description: String,
    pub component: String,
    pub suggestion: String,
}

/// Latency and error figures for one endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDetail {
    pub id: String,
    pub endpoint: String,
    pub requests: u64,
    pub avg: u64,
    pub p95: u64,
    pub p99: u64,
    /// Error rate in percent.
    pub error_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub title: String,
    pub file_count: usize,
    pub additions: usize,
    pub deletions: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFindings {
    pub good_news: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactAssessment {
    pub scope: String,
    pub recommendation: String,
}

/// A reliability finding: an issue with rule code, location and blast radius.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    /// Code of the rule that produced the finding, e.g. "1.2.3".
    pub code: String,
    pub category: String,
    pub priority: Priority,
    pub file: String,
    pub line: usize,
    pub description: String,
    pub suggestion: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
    #[serde(default)]
    pub affected_modules: Vec<String>,
    #[serde(default)]
    pub affected_apis: Vec<String>,
}

impl Finding {
    /// Flattens the finding into a plain issue.
    pub fn to_issue(&self) -> Issue {
        Issue {
            id: self.id.clone(),
            priority: self.priority,
            file: self.file.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
        }
    }
}

/// Category assigned to issues derived from performance bottlenecks.
pub const BOTTLENECK_CATEGORY: &str = "性能瓶颈";

/// Kind-specific payload of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ReportKind {
    TechnicalDebt {
        health: u8,
        issues: Vec<Issue>,
        #[serde(default)]
        architectural_concerns: Vec<ArchitecturalConcern>,
        #[serde(default)]
        tech_stack_risks: Vec<TechStackRisk>,
        #[serde(default)]
        duplications: Vec<CodeDuplication>,
    },
    ChangeRisk {
        risk_level: RiskLevel,
        affected_files: Vec<String>,
        new_issues: Vec<Issue>,
    },
    PrecisionTest {
        conclusion: Conclusion,
        kpis: PerformanceKpis,
        test_info: TestInfo,
        bottlenecks: Vec<Bottleneck>,
        transactions: Vec<TransactionDetail>,
    },
    ReliabilityTest {
        health: u8,
        change_summary: ChangeSummary,
        key_findings: KeyFindings,
        impact_assessment: ImpactAssessment,
        findings: Vec<Finding>,
    },
}

impl ReportKind {
    /// Display label of the report type.
    pub fn label(&self) -> &'static str {
        match self {
            ReportKind::TechnicalDebt { .. } => "技术债治理",
            ReportKind::ChangeRisk { .. } => "变更风险评估",
            ReportKind::PrecisionTest { .. } => "非功能精准测试",
            ReportKind::ReliabilityTest { .. } => "可靠性测试",
        }
    }
}

/// A report produced by an agent run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub agent_name: String,
    pub repo_name: String,
    pub date: String,
    pub stats: ReportStat,
    pub created_by_role: Role,
    #[serde(flatten)]
    pub kind: ReportKind,
}

impl Report {
    /// Returns the report's issues as a flat list.
    ///
    /// Reliability findings and performance bottlenecks are flattened into
    /// issues so every report kind can be rolled up the same way.
    pub fn issues(&self) -> Vec<Issue> {
        match &self.kind {
            ReportKind::TechnicalDebt { issues, .. } => issues.clone(),
            ReportKind::ChangeRisk { new_issues, .. } => new_issues.clone(),
            ReportKind::PrecisionTest { bottlenecks, .. } => bottlenecks
                .iter()
                .map(|b| Issue {
                    id: b.id.clone(),
                    priority: b.priority,
                    file: b.component.clone(),
                    description: b.description.clone(),
                    category: BOTTLENECK_CATEGORY.to_string(),
                })
                .collect(),
            ReportKind::ReliabilityTest { findings, .. } => {
                findings.iter().map(Finding::to_issue).collect()
            }
        }
    }

    /// Highest priority among the report's issues, if any.
    pub fn max_priority(&self) -> Option<Priority> {
        self.issues().iter().map(|i| i.priority).max()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Running,
    Scanning,
    Idle,
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentStatus::Running => write!(f, "✓ 运行中"),
            AgentStatus::Scanning => write!(f, "⟳ 扫描中"),
            AgentStatus::Idle => write!(f, "- 空闲"),
        }
    }
}

/// A configured analysis agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub status: AgentStatus,
    /// Name of the repository the agent watches.
    pub repo: String,
    /// Role label derived from the agent's scenario.
    pub role: String,
    pub last_scan: String,
    pub p0_issues: usize,
    pub p1_issues: usize,
    /// Code health in percent.
    pub health: u8,
}

/// A connected source repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: String,
    pub name: String,
    pub url: String,
    pub main_branch: String,
    pub file_count: usize,
    pub language: String,
    pub agent_count: usize,
}

/// A built-in analysis rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub code: String,
    pub name: String,
    pub description: String,
    pub priority: Priority,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LearnedRuleKind {
    Ignore,
    Misreport,
    PriorityDown,
    PriorityUp,
    Learning,
}

/// A rule inferred from how users triaged previous findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnedRule {
    pub id: String,
    pub icon: String,
    pub title: String,
    pub source: String,
    pub scope: String,
    pub timestamp: String,
    pub rule_logic: String,
    pub kind: LearnedRuleKind,
}

/// An API token as listed to users. The full secret is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiToken {
    pub id: String,
    pub name: String,
    pub token_prefix: String,
    pub last_used: String,
    pub created: String,
    pub expires: String,
}

/// What an agent is set up to analyze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    TechDebt,
    ChangeRisk,
    ProjectAcceptance,
    RiskRadar,
    RegressionTesting,
}

impl Scenario {
    /// Role label shown on agents created for this scenario.
    pub fn label(&self) -> &'static str {
        match self {
            Scenario::TechDebt => "非功能精准测试",
            Scenario::ChangeRisk => "变更风险评估",
            Scenario::ProjectAcceptance => "项目上线",
            Scenario::RiskRadar => "风险雷达",
            Scenario::RegressionTesting => "非功能回归测试",
        }
    }
}

/// Git hosting platform of a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Github,
    Gitlab,
    Gitee,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Github => write!(f, "GitHub"),
            Platform::Gitlab => write!(f, "GitLab"),
            Platform::Gitee => write!(f, "Gitee"),
        }
    }
}
