//! Role-based report views.
//!
//! A report is shown differently depending on who reads it. Each view is a
//! plain struct built by a pure function from the report; `select_view`
//! picks the builder from the report kind and the viewer role.

use super::aggregator::{
    aggregate_by_category, aggregate_by_module, filter_by_priority, hotspot_files,
    sort_by_priority, CategorySummary, HotspotFile, ModuleSummary,
};
use crate::models::{
    ArchitecturalConcern, Bottleneck, ChangeSummary, CodeDuplication, Conclusion, Finding,
    ImpactAssessment, Issue, KeyFindings, ModuleDef, PerformanceKpis, Priority, Report,
    ReportKind, RiskLevel, Role, TechStackRisk, TestInfo, TransactionDetail,
};
use serde::Serialize;
use tracing::debug;

/// How many hotspot files each technical-debt view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    pub developer_hotspots: usize,
    pub lead_hotspots: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            developer_hotspots: 2,
            lead_hotspots: 3,
        }
    }
}

/// Developer view: urgent issues and the files worth fixing first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeveloperView {
    /// P0 and P1 issues, in report order.
    pub issues: Vec<Issue>,
    pub hotspots: Vec<HotspotFile>,
}

/// Tech-lead view: health numbers, hotspots and the full issue list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechLeadView {
    pub health: u8,
    pub new_issues: usize,
    pub fixed_issues: usize,
    pub hotspots: Vec<HotspotFile>,
    pub modules: Vec<ModuleSummary>,
    pub categories: Vec<CategorySummary>,
    pub issues: Vec<Issue>,
}

/// Architect view: structural risks plus the module/category rollups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchitectView {
    pub concerns: Vec<ArchitecturalConcern>,
    pub stack_risks: Vec<TechStackRisk>,
    pub duplications: Vec<CodeDuplication>,
    pub modules: Vec<ModuleSummary>,
    pub categories: Vec<CategorySummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeRiskView {
    pub risk_level: RiskLevel,
    pub affected_files: Vec<String>,
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecisionTestView {
    pub conclusion: Conclusion,
    pub kpis: PerformanceKpis,
    pub test_info: TestInfo,
    /// Bottlenecks, P0 first.
    pub bottlenecks: Vec<Bottleneck>,
    pub transactions: Vec<TransactionDetail>,
    /// Endpoints that returned any errors under load.
    pub failing_endpoints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReliabilityView {
    pub health: u8,
    pub change_summary: ChangeSummary,
    pub key_findings: KeyFindings,
    pub impact: ImpactAssessment,
    /// Findings, P0 first.
    pub findings: Vec<Finding>,
    pub categories: Vec<CategorySummary>,
}

/// The data a report screen renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "kebab-case")]
pub enum ViewModel {
    Developer(DeveloperView),
    TechLead(TechLeadView),
    Architect(ArchitectView),
    ChangeRisk(ChangeRiskView),
    PrecisionTest(PrecisionTestView),
    Reliability(ReliabilityView),
}

impl ViewModel {
    /// Issues shown by this view.
    pub fn issues(&self) -> Vec<Issue> {
        match self {
            ViewModel::Developer(v) => v.issues.clone(),
            ViewModel::TechLead(v) => v.issues.clone(),
            ViewModel::Architect(_) => Vec::new(),
            ViewModel::ChangeRisk(v) => v.issues.clone(),
            ViewModel::PrecisionTest(v) => v
                .bottlenecks
                .iter()
                .map(|b| {
                    Issue::new(
                        b.id.clone(),
                        b.priority,
                        b.component.clone(),
                        b.description.clone(),
                        crate::models::BOTTLENECK_CATEGORY,
                    )
                })
                .collect(),
            ViewModel::Reliability(v) => v.findings.iter().map(Finding::to_issue).collect(),
        }
    }
}

/// Pick and build the view for `role` looking at `report`.
///
/// Only technical-debt reports vary by role; tech-lead is the fallback for
/// roles without a dedicated view. Other report kinds have a single view.
pub fn select_view(
    role: Role,
    report: &Report,
    modules: &[ModuleDef],
    options: ViewOptions,
) -> ViewModel {
    debug!("Selecting view for report {} as {}", report.id, role);

    match &report.kind {
        ReportKind::TechnicalDebt { .. } => match role {
            Role::Developer => ViewModel::Developer(developer_view(report, options)),
            Role::Architect => ViewModel::Architect(architect_view(report, modules)),
            Role::TechLead | Role::TechManager => {
                ViewModel::TechLead(tech_lead_view(report, modules, options))
            }
        },
        ReportKind::ChangeRisk {
            risk_level,
            affected_files,
            new_issues,
        } => ViewModel::ChangeRisk(ChangeRiskView {
            risk_level: *risk_level,
            affected_files: affected_files.clone(),
            issues: new_issues.clone(),
        }),
        ReportKind::PrecisionTest {
            conclusion,
            kpis,
            test_info,
            bottlenecks,
            transactions,
        } => {
            let mut bottlenecks = bottlenecks.clone();
            bottlenecks.sort_by(|a, b| b.priority.cmp(&a.priority));
            ViewModel::PrecisionTest(PrecisionTestView {
                conclusion: *conclusion,
                kpis: kpis.clone(),
                test_info: test_info.clone(),
                bottlenecks,
                transactions: transactions.clone(),
                failing_endpoints: transactions
                    .iter()
                    .filter(|t| t.error_rate > 0.0)
                    .map(|t| t.endpoint.clone())
                    .collect(),
            })
        }
        ReportKind::ReliabilityTest {
            health,
            change_summary,
            key_findings,
            impact_assessment,
            findings,
        } => {
            let mut sorted = findings.clone();
            sorted.sort_by(|a, b| b.priority.cmp(&a.priority));
            ViewModel::Reliability(ReliabilityView {
                health: *health,
                change_summary: change_summary.clone(),
                key_findings: key_findings.clone(),
                impact: impact_assessment.clone(),
                findings: sorted,
                categories: aggregate_by_category(&report.issues()),
            })
        }
    }
}

/// Build the view for the role the report was created for.
pub fn default_view(report: &Report, modules: &[ModuleDef], options: ViewOptions) -> ViewModel {
    select_view(report.created_by_role, report, modules, options)
}

fn developer_view(report: &Report, options: ViewOptions) -> DeveloperView {
    let issues = report.issues();
    let mut hotspots = hotspot_files(&issues);
    hotspots.truncate(options.developer_hotspots);

    DeveloperView {
        issues: filter_by_priority(&issues, &[Priority::P0, Priority::P1]),
        hotspots,
    }
}

fn tech_lead_view(report: &Report, modules: &[ModuleDef], options: ViewOptions) -> TechLeadView {
    let issues = report.issues();
    let mut hotspots = hotspot_files(&issues);
    hotspots.truncate(options.lead_hotspots);

    let health = match &report.kind {
        ReportKind::TechnicalDebt { health, .. } => *health,
        _ => 0,
    };

    let mut sorted = issues.clone();
    sort_by_priority(&mut sorted);

    TechLeadView {
        health,
        new_issues: report.stats.new_issues,
        fixed_issues: report.stats.fixed_issues,
        hotspots,
        modules: aggregate_by_module(&issues, modules),
        categories: aggregate_by_category(&issues),
        issues: sorted,
    }
}

fn architect_view(report: &Report, modules: &[ModuleDef]) -> ArchitectView {
    let issues = report.issues();
    let (concerns, stack_risks, duplications) = match &report.kind {
        ReportKind::TechnicalDebt {
            architectural_concerns,
            tech_stack_risks,
            duplications,
            ..
        } => (
            architectural_concerns.clone(),
            tech_stack_risks.clone(),
            duplications.clone(),
        ),
        _ => (Vec::new(), Vec::new(), Vec::new()),
    };

    ArchitectView {
        concerns,
        stack_risks,
        duplications,
        modules: aggregate_by_module(&issues, modules),
        categories: aggregate_by_category(&issues),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConcernSeverity, Measure, ReportStat};

    fn debt_report(role: Role) -> Report {
        Report {
            id: "report-1".to_string(),
            title: "支付服务技术债".to_string(),
            icon: "📊".to_string(),
            agent_name: "agent".to_string(),
            repo_name: "payment-service".to_string(),
            date: "2025-11-10".to_string(),
            stats: ReportStat {
                new_issues: 4,
                fixed_issues: 2,
                health_change: -3,
                p0_issues: 1,
            },
            created_by_role: role,
            kind: ReportKind::TechnicalDebt {
                health: 78,
                issues: vec![
                    Issue::new("i-1", Priority::P2, "payment/a.java", "d", "可维护性"),
                    Issue::new("i-2", Priority::P0, "payment/a.java", "d", "并发"),
                    Issue::new("i-3", Priority::P1, "order/b.java", "d", "并发"),
                    Issue::new("i-4", Priority::P2, "order/c.java", "d", "可维护性"),
                    Issue::new("i-5", Priority::P1, "order/b.java", "d", "事务"),
                    Issue::new("i-6", Priority::P2, "user/d.java", "d", "可维护性"),
                ],
                architectural_concerns: vec![ArchitecturalConcern {
                    title: "循环依赖".to_string(),
                    description: "service <-> repository".to_string(),
                    severity: ConcernSeverity::High,
                }],
                tech_stack_risks: vec![TechStackRisk {
                    library: "log4j".to_string(),
                    version: "2.14.0".to_string(),
                    risk: "Log4Shell".to_string(),
                }],
                duplications: vec![],
            },
        }
    }

    fn modules() -> Vec<ModuleDef> {
        vec![
            ModuleDef::new("支付", "payment/", true),
            ModuleDef::new("订单", "order/", true),
            ModuleDef::new("库存", "inventory/", true),
        ]
    }

    #[test]
    fn test_developer_view() {
        let report = debt_report(Role::Developer);
        let view = default_view(&report, &modules(), ViewOptions::default());

        let ViewModel::Developer(v) = view else {
            panic!("expected developer view");
        };
        let ids: Vec<_> = v.issues.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["i-2", "i-3", "i-5"]);
        assert_eq!(v.hotspots.len(), 2);
        assert_eq!(v.hotspots[0].file, "payment/a.java");
        assert_eq!(v.hotspots[1].file, "order/b.java");
    }

    #[test]
    fn test_tech_lead_view() {
        let report = debt_report(Role::TechLead);
        let view = default_view(&report, &modules(), ViewOptions::default());

        let ViewModel::TechLead(v) = view else {
            panic!("expected tech-lead view");
        };
        assert_eq!(v.health, 78);
        assert_eq!(v.new_issues, 4);
        assert_eq!(v.fixed_issues, 2);
        assert_eq!(v.hotspots.len(), 3);
        assert_eq!(v.issues.len(), 6);
        assert_eq!(v.issues[0].priority, Priority::P0);
        assert_eq!(v.modules[0].name, "订单");
        assert_eq!(v.modules[0].total, 3);
        assert_eq!(v.modules.last().map(|m| m.total), Some(0));
        assert_eq!(v.categories[0].category, "可维护性");
    }

    #[test]
    fn test_tech_manager_falls_back_to_tech_lead() {
        let report = debt_report(Role::TechManager);
        let view = default_view(&report, &modules(), ViewOptions::default());
        assert!(matches!(view, ViewModel::TechLead(_)));
    }

    #[test]
    fn test_architect_view() {
        let report = debt_report(Role::Developer);
        let view = select_view(Role::Architect, &report, &modules(), ViewOptions::default());

        let ViewModel::Architect(v) = view else {
            panic!("expected architect view");
        };
        assert_eq!(v.concerns.len(), 1);
        assert_eq!(v.stack_risks[0].library, "log4j");
        assert_eq!(v.modules.len(), 3);
        let total: usize = v.categories.iter().map(|c| c.total).sum();
        assert_eq!(total, 6);
        assert!(ViewModel::Architect(v).issues().is_empty());
    }

    #[test]
    fn test_hotspot_limits_follow_options() {
        let report = debt_report(Role::Developer);
        let options = ViewOptions {
            developer_hotspots: 1,
            lead_hotspots: 10,
        };

        let ViewModel::Developer(dev) = select_view(Role::Developer, &report, &[], options) else {
            panic!("expected developer view");
        };
        assert_eq!(dev.hotspots.len(), 1);

        let ViewModel::TechLead(lead) = select_view(Role::TechLead, &report, &[], options) else {
            panic!("expected tech-lead view");
        };
        assert_eq!(lead.hotspots.len(), 4);
        assert!(lead.modules.is_empty());
    }

    #[test]
    fn test_change_risk_ignores_role() {
        let mut report = debt_report(Role::Developer);
        report.kind = ReportKind::ChangeRisk {
            risk_level: RiskLevel::Medium,
            affected_files: vec!["order/b.java".to_string()],
            new_issues: vec![Issue::new("c-1", Priority::P1, "order/b.java", "d", "事务")],
        };

        for role in [Role::Developer, Role::Architect, Role::TechLead] {
            let view = select_view(role, &report, &modules(), ViewOptions::default());
            let ViewModel::ChangeRisk(v) = view else {
                panic!("expected change-risk view");
            };
            assert_eq!(v.risk_level, RiskLevel::Medium);
            assert_eq!(v.issues.len(), 1);
        }
    }

    #[test]
    fn test_precision_view_sorts_bottlenecks() {
        let mut report = debt_report(Role::TechLead);
        report.kind = ReportKind::PrecisionTest {
            conclusion: Conclusion::Fail,
            kpis: PerformanceKpis {
                avg_response_time: Measure::new(850.0, "ms").with_trend(150.0),
                p99_response_time: Measure::new(2500.0, "ms"),
                tps: Measure::new(520.0, "/s"),
                success_rate: Measure::new(99.8, "%"),
            },
            test_info: TestInfo {
                duration: "15 分钟".to_string(),
                concurrency: 500,
                ramp_up: "5 分钟".to_string(),
                target: "/api/v2/order/create".to_string(),
            },
            bottlenecks: vec![
                Bottleneck {
                    id: "b1".to_string(),
                    priority: Priority::P1,
                    description: "GC".to_string(),
                    component: "JVM".to_string(),
                    suggestion: "tune".to_string(),
                },
                Bottleneck {
                    id: "b2".to_string(),
                    priority: Priority::P0,
                    description: "pool".to_string(),
                    component: "OrderRepository.java".to_string(),
                    suggestion: "grow".to_string(),
                },
            ],
            transactions: vec![
                TransactionDetail {
                    id: "t1".to_string(),
                    endpoint: "/api/v2/order/create".to_string(),
                    requests: 450000,
                    avg: 850,
                    p95: 1800,
                    p99: 2500,
                    error_rate: 0.2,
                },
                TransactionDetail {
                    id: "t2".to_string(),
                    endpoint: "/api/v2/order/query".to_string(),
                    requests: 120000,
                    avg: 120,
                    p95: 250,
                    p99: 400,
                    error_rate: 0.0,
                },
            ],
        };

        let view = select_view(Role::Developer, &report, &[], ViewOptions::default());
        let ViewModel::PrecisionTest(v) = &view else {
            panic!("expected precision view");
        };
        assert_eq!(v.bottlenecks[0].id, "b2");
        assert_eq!(v.failing_endpoints, vec!["/api/v2/order/create"]);
        assert_eq!(view.issues()[0].priority, Priority::P0);
    }

    #[test]
    fn test_view_json_is_tagged() {
        let report = debt_report(Role::Developer);
        let view = default_view(&report, &modules(), ViewOptions::default());
        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("\"view\":\"developer\""));
    }
}
