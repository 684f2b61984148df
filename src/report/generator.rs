//! Markdown and JSON rendering.
//!
//! This module turns a report view, or one of the store's listings, into
//! Markdown or JSON text.

use crate::analysis::views::{
    ArchitectView, ChangeRiskView, DeveloperView, PrecisionTestView, ReliabilityView,
    TechLeadView,
};
use crate::analysis::{
    bar_width, max_category_total, max_module_total, CategorySummary, HotspotFile,
    ModuleSummary, PriorityCounts, ViewModel,
};
use crate::models::{
    Agent, ApiToken, Finding, Issue, LearnedRule, Priority, Report, ReportStat, Repository,
    Role, Rule,
};
use crate::store::OverviewStats;
use anyhow::Result;
use serde::Serialize;

const BAR_FILLED: char = '█';
const BAR_EMPTY: char = '░';

/// Generate the Markdown page for one report seen through `view`.
pub fn generate_markdown_view(report: &Report, view: &ViewModel, bar_length: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {} {}\n\n", report.icon, report.title));
    output.push_str(&generate_metadata_section(report, view));
    output.push_str(&generate_stats_section(&report.stats));

    let body = match view {
        ViewModel::Developer(v) => generate_developer_section(v),
        ViewModel::TechLead(v) => generate_tech_lead_section(v, bar_length),
        ViewModel::Architect(v) => generate_architect_section(v, bar_length),
        ViewModel::ChangeRisk(v) => generate_change_risk_section(v),
        ViewModel::PrecisionTest(v) => generate_precision_test_section(v),
        ViewModel::Reliability(v) => generate_reliability_section(v, bar_length),
    };
    output.push_str(&body);

    output.push_str(&generate_footer());
    output
}

/// Report header plus the view, as serialized by `generate_json_view`.
#[derive(Debug, Serialize)]
struct RenderedView<'a> {
    id: &'a str,
    title: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    agent_name: &'a str,
    repo_name: &'a str,
    date: &'a str,
    created_by_role: Role,
    stats: &'a ReportStat,
    view: &'a ViewModel,
}

/// Generate a JSON document for one report seen through `view`.
pub fn generate_json_view(report: &Report, view: &ViewModel) -> Result<String> {
    let rendered = RenderedView {
        id: &report.id,
        title: &report.title,
        kind: report.kind.label(),
        agent_name: &report.agent_name,
        repo_name: &report.repo_name,
        date: &report.date,
        created_by_role: report.created_by_role,
        stats: &report.stats,
        view,
    };
    serde_json::to_string_pretty(&rendered).map_err(Into::into)
}

/// Serialize any listing as pretty JSON.
pub fn generate_json_listing<T: Serialize + ?Sized>(items: &T) -> Result<String> {
    serde_json::to_string_pretty(items).map_err(Into::into)
}

/// Render a text bar `bar_length` characters wide.
pub fn text_bar(count: usize, max: usize, bar_length: usize) -> String {
    let filled = (bar_width(count, max) / 100.0 * bar_length as f64).round() as usize;
    let filled = filled.min(bar_length);

    let mut bar = String::with_capacity(bar_length * BAR_FILLED.len_utf8());
    bar.extend(std::iter::repeat(BAR_FILLED).take(filled));
    bar.extend(std::iter::repeat(BAR_EMPTY).take(bar_length - filled));
    bar
}

fn view_name(view: &ViewModel) -> &'static str {
    match view {
        ViewModel::Developer(_) => "developer",
        ViewModel::TechLead(_) => "tech-lead",
        ViewModel::Architect(_) => "architect",
        ViewModel::ChangeRisk(_) => "change-risk",
        ViewModel::PrecisionTest(_) => "precision-test",
        ViewModel::Reliability(_) => "reliability",
    }
}

fn generate_metadata_section(report: &Report, view: &ViewModel) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Report:** `{}`\n", report.id));
    section.push_str(&format!("- **Type:** {}\n", report.kind.label()));
    section.push_str(&format!("- **Agent:** {}\n", report.agent_name));
    section.push_str(&format!("- **Repository:** {}\n", report.repo_name));
    section.push_str(&format!("- **Date:** {}\n", report.date));
    section.push_str(&format!("- **Created for:** {}\n", report.created_by_role));
    section.push_str(&format!("- **View:** {}\n", view_name(view)));

    let counts = PriorityCounts::from_issues(&view.issues());
    section.push_str(&format!(
        "- **Issues shown:** {} (P0 {} / P1 {} / P2 {})\n",
        counts.total, counts.p0, counts.p1, counts.p2
    ));
    section.push('\n');

    section
}

fn generate_stats_section(stats: &ReportStat) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| New | Fixed | Health Δ | 🔴 P0 |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {:+} | {} |\n\n",
        stats.new_issues, stats.fixed_issues, stats.health_change, stats.p0_issues
    ));

    section
}

fn generate_developer_section(view: &DeveloperView) -> String {
    let mut section = String::new();

    section.push_str("## Urgent Issues\n\n");
    section.push_str(&generate_issue_table(&view.issues));
    section.push_str(&generate_hotspot_section(&view.hotspots));

    section
}

fn generate_tech_lead_section(view: &TechLeadView, bar_length: usize) -> String {
    let mut section = String::new();

    section.push_str("## Health\n\n");
    section.push_str(&format!("- **Code health:** {}%\n", view.health));
    section.push_str(&format!("- **New issues:** {}\n", view.new_issues));
    section.push_str(&format!("- **Fixed issues:** {}\n\n", view.fixed_issues));

    section.push_str(&generate_hotspot_section(&view.hotspots));
    section.push_str(&generate_module_section(&view.modules, bar_length));
    section.push_str(&generate_category_section(&view.categories, bar_length));

    section.push_str("## All Issues\n\n");
    section.push_str(&generate_issue_table(&view.issues));

    section
}

fn generate_architect_section(view: &ArchitectView, bar_length: usize) -> String {
    let mut section = String::new();

    if !view.concerns.is_empty() {
        section.push_str("## Architectural Concerns\n\n");
        for concern in &view.concerns {
            section.push_str(&format!(
                "- **{}** ({:?}): {}\n",
                concern.title, concern.severity, concern.description
            ));
        }
        section.push('\n');
    }

    if !view.stack_risks.is_empty() {
        section.push_str("## Tech Stack Risks\n\n");
        section.push_str("| Library | Version | Risk |\n");
        section.push_str("|:---|:---|:---|\n");
        for risk in &view.stack_risks {
            section.push_str(&format!(
                "| `{}` | {} | {} |\n",
                risk.library, risk.version, risk.risk
            ));
        }
        section.push('\n');
    }

    if !view.duplications.is_empty() {
        section.push_str("## Code Duplication\n\n");
        section.push_str("| Files | Lines | Module |\n");
        section.push_str("|:---|:---:|:---|\n");
        for dup in &view.duplications {
            section.push_str(&format!(
                "| `{}` ↔ `{}` | {} | {} |\n",
                dup.first_file, dup.second_file, dup.lines, dup.module
            ));
        }
        section.push('\n');
    }

    section.push_str(&generate_module_section(&view.modules, bar_length));
    section.push_str(&generate_category_section(&view.categories, bar_length));

    section
}

fn generate_change_risk_section(view: &ChangeRiskView) -> String {
    let mut section = String::new();

    section.push_str("## Change Risk\n\n");
    section.push_str(&format!("- **Risk level:** {}\n", view.risk_level));
    section.push_str(&format!(
        "- **Affected files:** {}\n\n",
        view.affected_files.len()
    ));
    for file in &view.affected_files {
        section.push_str(&format!("  - `{}`\n", file));
    }
    if !view.affected_files.is_empty() {
        section.push('\n');
    }

    section.push_str("## New Issues\n\n");
    section.push_str(&generate_issue_table(&view.issues));

    section
}

fn generate_precision_test_section(view: &PrecisionTestView) -> String {
    let mut section = String::new();

    section.push_str("## Conclusion\n\n");
    section.push_str(&format!("**{}**\n\n", view.conclusion));

    section.push_str("## Key Metrics\n\n");
    section.push_str("| Avg RT | P99 RT | TPS | Success Rate |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        view.kpis.avg_response_time,
        view.kpis.p99_response_time,
        view.kpis.tps,
        view.kpis.success_rate
    ));

    section.push_str("## Test Setup\n\n");
    section.push_str(&format!("- **Target:** {}\n", view.test_info.target));
    section.push_str(&format!("- **Duration:** {}\n", view.test_info.duration));
    section.push_str(&format!(
        "- **Concurrency:** {}\n",
        view.test_info.concurrency
    ));
    section.push_str(&format!("- **Ramp-up:** {}\n\n", view.test_info.ramp_up));

    section.push_str("## Bottlenecks\n\n");
    if view.bottlenecks.is_empty() {
        section.push_str("No bottlenecks found.\n\n");
    }
    for bottleneck in &view.bottlenecks {
        section.push_str(&format!(
            "### {} {} {}\n\n",
            bottleneck.priority.emoji(),
            bottleneck.priority,
            bottleneck.description
        ));
        section.push_str(&format!("**Component:** `{}`\n\n", bottleneck.component));
        section.push_str(&format!("> 💡 **Suggestion:** {}\n\n", bottleneck.suggestion));
    }

    if !view.transactions.is_empty() {
        section.push_str("## Transactions\n\n");
        section.push_str("| Endpoint | Requests | Avg | P95 | P99 | Errors |\n");
        section.push_str("|:---|:---:|:---:|:---:|:---:|:---:|\n");
        for tx in &view.transactions {
            let marker = if view.failing_endpoints.contains(&tx.endpoint) {
                " ⚠️"
            } else {
                ""
            };
            section.push_str(&format!(
                "| `{}` | {} | {}ms | {}ms | {}ms | {}%{} |\n",
                tx.endpoint, tx.requests, tx.avg, tx.p95, tx.p99, tx.error_rate, marker
            ));
        }
        section.push('\n');
    }

    section
}

fn generate_reliability_section(view: &ReliabilityView, bar_length: usize) -> String {
    let mut section = String::new();

    section.push_str("## Change Summary\n\n");
    section.push_str(&format!("{}\n\n", view.change_summary.title));
    section.push_str(&format!(
        "- **Files:** {} (+{} / -{})\n",
        view.change_summary.file_count,
        view.change_summary.additions,
        view.change_summary.deletions
    ));
    section.push_str(&format!("- **Code health:** {}%\n\n", view.health));

    if !view.key_findings.good_news.is_empty() || !view.key_findings.warnings.is_empty() {
        section.push_str("## Key Findings\n\n");
        for news in &view.key_findings.good_news {
            section.push_str(&format!("- ✅ {}\n", news));
        }
        for warning in &view.key_findings.warnings {
            section.push_str(&format!("- ⚠️ {}\n", warning));
        }
        section.push('\n');
    }

    section.push_str("## Impact\n\n");
    section.push_str(&format!("- **Scope:** {}\n", view.impact.scope));
    section.push_str(&format!(
        "- **Recommendation:** {}\n\n",
        view.impact.recommendation
    ));

    section.push_str(&generate_category_section(&view.categories, bar_length));

    section.push_str("## Findings\n\n");
    if view.findings.is_empty() {
        section.push_str("No findings. 🎉\n\n");
    }
    for finding in &view.findings {
        section.push_str(&generate_finding_block(finding));
    }

    section
}

fn generate_finding_block(finding: &Finding) -> String {
    let mut block = String::new();

    block.push_str(&format!(
        "### {} {} [{}] {}\n\n",
        finding.priority.emoji(),
        finding.priority,
        finding.code,
        finding.description
    ));
    block.push_str(&format!(
        "**Location:** `{}:{}` | **Category:** {}\n\n",
        finding.file, finding.line, finding.category
    ));

    if let Some(ref snippet) = finding.code_snippet {
        block.push_str("<details>\n<summary>View Code</summary>\n\n```\n");
        block.push_str(snippet);
        block.push_str("\n```\n</details>\n\n");
    }

    if !finding.affected_modules.is_empty() {
        block.push_str(&format!(
            "**Affected modules:** {}\n\n",
            finding.affected_modules.join(", ")
        ));
    }
    if !finding.affected_apis.is_empty() {
        block.push_str(&format!(
            "**Affected APIs:** {}\n\n",
            finding.affected_apis.join(", ")
        ));
    }

    if !finding.suggestion.is_empty() {
        block.push_str(&format!("> 💡 **Suggestion:** {}\n\n", finding.suggestion));
    }

    block.push_str("---\n\n");
    block
}

fn generate_issue_table(issues: &[Issue]) -> String {
    if issues.is_empty() {
        return "No issues. 🎉\n\n".to_string();
    }

    let mut table = String::new();
    table.push_str("| Priority | File | Category | Description |\n");
    table.push_str("|:---:|:---|:---|:---|\n");
    for issue in issues {
        table.push_str(&format!(
            "| {} {} | `{}` | {} | {} |\n",
            issue.priority.emoji(),
            issue.priority,
            issue.file,
            issue.category,
            issue.description
        ));
    }
    table.push('\n');
    table
}

fn generate_hotspot_section(hotspots: &[HotspotFile]) -> String {
    if hotspots.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Hotspot Files\n\n");
    section.push_str("| File | Issues |\n");
    section.push_str("|:---|:---:|\n");
    for hotspot in hotspots {
        section.push_str(&format!("| `{}` | {} |\n", hotspot.file, hotspot.issue_count));
    }
    section.push('\n');
    section
}

fn generate_module_section(modules: &[ModuleSummary], bar_length: usize) -> String {
    if modules.is_empty() {
        return String::new();
    }

    let max = max_module_total(modules);
    let mut section = String::new();
    section.push_str("## Issues by Module\n\n");
    section.push_str(&format!(
        "| Module | {} | {} | {} | Total | |\n",
        Priority::P0,
        Priority::P1,
        Priority::P2
    ));
    section.push_str("|:---|:---:|:---:|:---:|:---:|:---|\n");
    for module in modules {
        let name = if module.is_core {
            format!("{} ⭐", module.name)
        } else {
            module.name.clone()
        };
        section.push_str(&format!(
            "| {} | {} | {} | {} | **{}** | `{}` |\n",
            name,
            module.p0,
            module.p1,
            module.p2,
            module.total,
            text_bar(module.total, max, bar_length)
        ));
    }
    section.push('\n');
    section
}

fn generate_category_section(categories: &[CategorySummary], bar_length: usize) -> String {
    if categories.is_empty() {
        return String::new();
    }

    let max = max_category_total(categories);
    let mut section = String::new();
    section.push_str("## Issues by Category\n\n");
    section.push_str(&format!(
        "| Category | {} | {} | {} | Total | |\n",
        Priority::P0,
        Priority::P1,
        Priority::P2
    ));
    section.push_str("|:---|:---:|:---:|:---:|:---:|:---|\n");
    for category in categories {
        section.push_str(&format!(
            "| {} | {} | {} | {} | **{}** | `{}` |\n",
            category.category,
            category.p0,
            category.p1,
            category.p2,
            category.total,
            text_bar(category.total, max, bar_length)
        ));
    }
    section.push('\n');
    section
}

/// Generate the overview page.
pub fn generate_overview_markdown(stats: &OverviewStats) -> String {
    let mut output = String::new();

    output.push_str("# HawkAI Overview\n\n");
    output.push_str("| Active Agents | Repositories | Open Issues | Reports |\n");
    output.push_str("|:---:|:---:|:---:|:---:|\n");
    output.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        stats.running_agents, stats.repositories, stats.open_issues, stats.reports
    ));

    output.push_str(&generate_footer());
    output
}

pub fn generate_agents_markdown(agents: &[Agent]) -> String {
    let mut output = String::from("# Agents\n\n");
    if agents.is_empty() {
        output.push_str("No agents configured.\n\n");
        return output;
    }

    output.push_str("| ID | Name | Status | Repository | Role | Last Scan | P0 | P1 | Health |\n");
    output.push_str("|:---|:---|:---|:---|:---|:---|:---:|:---:|:---:|\n");
    for agent in agents {
        output.push_str(&format!(
            "| `{}` | {} | {} | {} | {} | {} | {} | {} | {}% |\n",
            agent.id,
            agent.name,
            agent.status,
            agent.repo,
            agent.role,
            agent.last_scan,
            agent.p0_issues,
            agent.p1_issues,
            agent.health
        ));
    }
    output.push('\n');
    output
}

pub fn generate_repositories_markdown(repositories: &[Repository]) -> String {
    let mut output = String::from("# Repositories\n\n");
    if repositories.is_empty() {
        output.push_str("No repositories connected.\n\n");
        return output;
    }

    output.push_str("| ID | Name | Branch | Language | Files | Agents | URL |\n");
    output.push_str("|:---|:---|:---|:---|:---:|:---:|:---|\n");
    for repo in repositories {
        output.push_str(&format!(
            "| `{}` | {} | `{}` | {} | {} | {} | {} |\n",
            repo.id,
            repo.name,
            repo.main_branch,
            repo.language,
            repo.file_count,
            repo.agent_count,
            repo.url
        ));
    }
    output.push('\n');
    output
}

pub fn generate_reports_markdown(reports: &[Report]) -> String {
    let mut output = String::from("# Reports\n\n");
    if reports.is_empty() {
        output.push_str("No reports yet.\n\n");
        return output;
    }

    output.push_str("| ID | Title | Type | Date | New | Fixed | P0 |\n");
    output.push_str("|:---|:---|:---|:---|:---:|:---:|:---:|\n");
    for report in reports {
        output.push_str(&format!(
            "| `{}` | {} {} | {} | {} | {} | {} | {} |\n",
            report.id,
            report.icon,
            report.title,
            report.kind.label(),
            report.date,
            report.stats.new_issues,
            report.stats.fixed_issues,
            report.stats.p0_issues
        ));
    }
    output.push('\n');
    output
}

pub fn generate_rules_markdown(rules: &[Rule]) -> String {
    let mut output = String::from("# Rules\n\n");
    if rules.is_empty() {
        output.push_str("No rules defined.\n\n");
        return output;
    }

    output.push_str("| Code | Name | Priority | Enabled | Description |\n");
    output.push_str("|:---|:---|:---:|:---:|:---|\n");
    for rule in rules {
        output.push_str(&format!(
            "| `{}` | {} | {} {} | {} | {} |\n",
            rule.code,
            rule.name,
            rule.priority.emoji(),
            rule.priority,
            if rule.enabled { "✓" } else { "✗" },
            rule.description
        ));
    }
    output.push('\n');
    output
}

pub fn generate_learned_rules_markdown(rules: &[LearnedRule]) -> String {
    let mut output = String::from("# Learned Rules\n\n");
    if rules.is_empty() {
        output.push_str("Nothing learned yet.\n\n");
        return output;
    }

    for rule in rules {
        output.push_str(&format!("### {} {}\n\n", rule.icon, rule.title));
        output.push_str(&format!(
            "*{} | {} | {}*\n\n",
            rule.source, rule.scope, rule.timestamp
        ));
        output.push_str(&format!("> {}\n\n", rule.rule_logic));
    }
    output
}

pub fn generate_tokens_markdown(tokens: &[ApiToken]) -> String {
    let mut output = String::from("# API Tokens\n\n");
    if tokens.is_empty() {
        output.push_str("No API tokens.\n\n");
        return output;
    }

    output.push_str("| Name | Token | Created | Last Used | Expires |\n");
    output.push_str("|:---|:---|:---|:---|:---|\n");
    for token in tokens {
        output.push_str(&format!(
            "| {} | `{}…` | {} | {} | {} |\n",
            token.name, token.token_prefix, token.created, token.last_used, token.expires
        ));
    }
    output.push('\n');
    output
}

/// Generate the page footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Generated by HawkAI v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}
