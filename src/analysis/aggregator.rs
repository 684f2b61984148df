//! Issue aggregation and statistics.
//!
//! Rollups are recomputed from the issue list on every call. Every function
//! here is total: an empty issue list yields empty or zero-filled output.

use crate::models::{Issue, ModuleDef, Priority};
use serde::Serialize;
use std::collections::HashMap;

/// Per-priority issue counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    pub p0: usize,
    pub p1: usize,
    pub p2: usize,
    pub total: usize,
}

impl PriorityCounts {
    /// Counts one issue of the given priority.
    pub fn record(&mut self, priority: Priority) {
        match priority {
            Priority::P0 => self.p0 += 1,
            Priority::P1 => self.p1 += 1,
            Priority::P2 => self.p2 += 1,
        }
        self.total += 1;
    }

    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut counts = Self::default();
        for issue in issues {
            counts.record(issue.priority);
        }
        counts
    }
}

/// Issue counts for one declared module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleSummary {
    pub name: String,
    pub path_prefix: String,
    pub is_core: bool,
    pub p0: usize,
    pub p1: usize,
    pub p2: usize,
    pub total: usize,
}

impl ModuleSummary {
    fn new(module: &ModuleDef, counts: PriorityCounts) -> Self {
        Self {
            name: module.name.clone(),
            path_prefix: module.path_prefix.clone(),
            is_core: module.is_core,
            p0: counts.p0,
            p1: counts.p1,
            p2: counts.p2,
            total: counts.total,
        }
    }
}

/// Issue counts for one category seen in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub p0: usize,
    pub p1: usize,
    pub p2: usize,
    pub total: usize,
}

/// A file together with the number of issues reported in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HotspotFile {
    pub file: String,
    pub issue_count: usize,
}

/// Roll issues up by module, matching `file` against each module's prefix.
///
/// Every declared module is emitted, including those with no issues. With
/// overlapping prefixes an issue is counted once per matching module, so the
/// totals only sum to `issues.len()` when the modules partition the files.
/// Output is sorted by total descending; ties keep declaration order.
pub fn aggregate_by_module(issues: &[Issue], modules: &[ModuleDef]) -> Vec<ModuleSummary> {
    let mut summaries: Vec<ModuleSummary> = modules
        .iter()
        .map(|module| {
            let mut counts = PriorityCounts::default();
            for issue in issues.iter().filter(|i| module.contains(&i.file)) {
                counts.record(issue.priority);
            }
            ModuleSummary::new(module, counts)
        })
        .collect();

    summaries.sort_by_key(|s| std::cmp::Reverse(s.total));
    summaries
}

/// Roll issues up by their exact `category` value.
///
/// Only categories present in the input are emitted. Output is sorted by
/// total descending; ties keep first-seen order.
pub fn aggregate_by_category(issues: &[Issue]) -> Vec<CategorySummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut buckets: Vec<(&str, PriorityCounts)> = Vec::new();

    for issue in issues {
        let slot = *index.entry(issue.category.as_str()).or_insert_with(|| {
            buckets.push((issue.category.as_str(), PriorityCounts::default()));
            buckets.len() - 1
        });
        buckets[slot].1.record(issue.priority);
    }

    let mut summaries: Vec<CategorySummary> = buckets
        .into_iter()
        .map(|(category, counts)| CategorySummary {
            category: category.to_string(),
            p0: counts.p0,
            p1: counts.p1,
            p2: counts.p2,
            total: counts.total,
        })
        .collect();

    summaries.sort_by_key(|s| std::cmp::Reverse(s.total));
    summaries
}

/// Files with the most issues, most problematic first.
///
/// Ties keep first-seen order.
pub fn hotspot_files(issues: &[Issue]) -> Vec<HotspotFile> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut hotspots: Vec<HotspotFile> = Vec::new();

    for issue in issues {
        match index.get(issue.file.as_str()) {
            Some(&slot) => hotspots[slot].issue_count += 1,
            None => {
                index.insert(issue.file.as_str(), hotspots.len());
                hotspots.push(HotspotFile {
                    file: issue.file.clone(),
                    issue_count: 1,
                });
            }
        }
    }

    hotspots.sort_by_key(|h| std::cmp::Reverse(h.issue_count));
    hotspots
}

/// Keep only issues with one of the given priorities, in input order.
pub fn filter_by_priority(issues: &[Issue], priorities: &[Priority]) -> Vec<Issue> {
    issues
        .iter()
        .filter(|i| priorities.contains(&i.priority))
        .cloned()
        .collect()
}

/// Keep issues at or above the given priority, in input order.
pub fn at_or_above(issues: &[Issue], threshold: Priority) -> Vec<Issue> {
    issues
        .iter()
        .filter(|i| i.priority >= threshold)
        .cloned()
        .collect()
}

/// Sort issues by priority (P0 first), keeping input order within a priority.
pub fn sort_by_priority(issues: &mut [Issue]) {
    issues.sort_by(|a, b| b.priority.cmp(&a.priority));
}

/// Width of a bar for `count` relative to the largest bucket, in percent.
///
/// A zero maximum yields a zero width rather than NaN.
pub fn bar_width(count: usize, max: usize) -> f64 {
    if max == 0 {
        return 0.0;
    }
    (count as f64 / max as f64 * 100.0).min(100.0)
}

/// Largest module total, or 0 for an empty rollup.
pub fn max_module_total(summaries: &[ModuleSummary]) -> usize {
    summaries.iter().map(|s| s.total).max().unwrap_or(0)
}

/// Largest category total, or 0 for an empty rollup.
pub fn max_category_total(summaries: &[CategorySummary]) -> usize {
    summaries.iter().map(|s| s.total).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(id: &str, file: &str, category: &str, priority: Priority) -> Issue {
        Issue::new(id, priority, file, "Test description", category)
    }

    fn sample_issues() -> Vec<Issue> {
        vec![
            issue("i-1", "payment/a.java", "性能", Priority::P0),
            issue("i-2", "order/b.java", "性能", Priority::P1),
            issue("i-3", "payment/c.java", "可靠性", Priority::P2),
        ]
    }

    fn sample_modules() -> Vec<ModuleDef> {
        vec![
            ModuleDef::new("支付", "payment/", true),
            ModuleDef::new("订单", "order/", true),
        ]
    }

    #[test]
    fn test_aggregate_by_module_example() {
        let rollup = aggregate_by_module(&sample_issues(), &sample_modules());

        assert_eq!(rollup.len(), 2);
        assert_eq!(rollup[0].name, "支付");
        assert_eq!((rollup[0].p0, rollup[0].p1, rollup[0].p2), (1, 0, 1));
        assert_eq!(rollup[0].total, 2);
        assert_eq!(rollup[1].name, "订单");
        assert_eq!((rollup[1].p0, rollup[1].p1, rollup[1].p2), (0, 1, 0));
        assert_eq!(rollup[1].total, 1);
    }

    #[test]
    fn test_aggregate_by_category_example() {
        let rollup = aggregate_by_category(&sample_issues());

        assert_eq!(rollup.len(), 2);
        assert_eq!(rollup[0].category, "性能");
        assert_eq!(rollup[0].total, 2);
        assert_eq!((rollup[0].p0, rollup[0].p1), (1, 1));
        assert_eq!(rollup[1].category, "可靠性");
        assert_eq!(rollup[1].total, 1);
        assert_eq!(rollup[1].p2, 1);
    }

    #[test]
    fn test_empty_issue_list() {
        let modules = sample_modules();

        let by_module = aggregate_by_module(&[], &modules);
        assert_eq!(by_module.len(), modules.len());
        assert!(by_module.iter().all(|m| m.total == 0 && m.p0 == 0 && m.p1 == 0 && m.p2 == 0));
        assert_eq!(by_module[0].name, "支付");

        assert!(aggregate_by_category(&[]).is_empty());
        assert!(hotspot_files(&[]).is_empty());
    }

    #[test]
    fn test_module_rollup_keeps_empty_modules() {
        let mut modules = sample_modules();
        modules.push(ModuleDef::new("库存", "inventory/", false));

        let rollup = aggregate_by_module(&sample_issues(), &modules);
        let inventory = rollup.iter().find(|m| m.name == "库存").unwrap();
        assert_eq!(inventory.total, 0);
        assert!(!inventory.is_core);
        assert_eq!(rollup.last().map(|m| m.name.as_str()), Some("库存"));
    }

    #[test]
    fn test_overlapping_prefixes_double_count() {
        let modules = vec![
            ModuleDef::new("支付", "payment/", true),
            ModuleDef::new("支付核心", "payment/core/", true),
        ];
        let issues = vec![
            issue("i-1", "payment/core/a.java", "性能", Priority::P0),
            issue("i-2", "payment/b.java", "性能", Priority::P1),
        ];

        let rollup = aggregate_by_module(&issues, &modules);
        let sum: usize = rollup.iter().map(|m| m.total).sum();
        assert_eq!(sum, 3);
        assert!(sum >= issues.len());
    }

    #[test]
    fn test_partition_sums_match() {
        let issues = sample_issues();

        let module_sum: usize = aggregate_by_module(&issues, &sample_modules())
            .iter()
            .map(|m| m.total)
            .sum();
        assert_eq!(module_sum, issues.len());

        let category_sum: usize = aggregate_by_category(&issues).iter().map(|c| c.total).sum();
        assert_eq!(category_sum, issues.len());
    }

    #[test]
    fn test_module_ties_keep_declaration_order() {
        let modules = vec![
            ModuleDef::new("A", "a/", false),
            ModuleDef::new("B", "b/", false),
            ModuleDef::new("C", "c/", false),
        ];
        let issues = vec![
            issue("i-1", "c/x.rs", "x", Priority::P2),
            issue("i-2", "b/x.rs", "x", Priority::P2),
            issue("i-3", "c/y.rs", "x", Priority::P2),
            issue("i-4", "a/x.rs", "x", Priority::P2),
        ];

        let names: Vec<_> = aggregate_by_module(&issues, &modules)
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_category_ties_keep_first_seen_order() {
        let issues = vec![
            issue("i-1", "a.rs", "Style", Priority::P2),
            issue("i-2", "a.rs", "Bug", Priority::P0),
            issue("i-3", "a.rs", "Security", Priority::P1),
            issue("i-4", "a.rs", "Security", Priority::P1),
        ];

        let categories: Vec<_> = aggregate_by_category(&issues)
            .into_iter()
            .map(|c| c.category)
            .collect();
        assert_eq!(categories, vec!["Security", "Style", "Bug"]);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let issues = sample_issues();
        let before = issues.clone();

        let first = (
            aggregate_by_module(&issues, &sample_modules()),
            aggregate_by_category(&issues),
        );
        let second = (
            aggregate_by_module(&issues, &sample_modules()),
            aggregate_by_category(&issues),
        );

        assert_eq!(first, second);
        assert_eq!(issues, before);
    }

    #[test]
    fn test_hotspot_files() {
        let issues = vec![
            issue("i-1", "a.java", "x", Priority::P2),
            issue("i-2", "b.java", "x", Priority::P1),
            issue("i-3", "b.java", "x", Priority::P0),
            issue("i-4", "c.java", "x", Priority::P2),
        ];

        let hotspots = hotspot_files(&issues);
        assert_eq!(hotspots[0].file, "b.java");
        assert_eq!(hotspots[0].issue_count, 2);
        assert_eq!(hotspots[1].file, "a.java");
        assert_eq!(hotspots[2].file, "c.java");
    }

    #[test]
    fn test_filter_and_sort_by_priority() {
        let mut issues = vec![
            issue("i-1", "a.rs", "x", Priority::P2),
            issue("i-2", "a.rs", "x", Priority::P0),
            issue("i-3", "a.rs", "x", Priority::P1),
            issue("i-4", "a.rs", "x", Priority::P0),
        ];

        let urgent = filter_by_priority(&issues, &[Priority::P0, Priority::P1]);
        let ids: Vec<_> = urgent.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["i-2", "i-3", "i-4"]);

        assert_eq!(at_or_above(&issues, Priority::P1).len(), 3);
        assert_eq!(at_or_above(&issues, Priority::P0).len(), 2);

        sort_by_priority(&mut issues);
        let ids: Vec<_> = issues.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["i-2", "i-4", "i-3", "i-1"]);
    }

    #[test]
    fn test_bar_width() {
        assert_eq!(bar_width(0, 0), 0.0);
        assert_eq!(bar_width(5, 0), 0.0);
        assert_eq!(bar_width(1, 2), 50.0);
        assert_eq!(bar_width(2, 2), 100.0);
        assert!(!bar_width(0, 0).is_nan());
    }

    #[test]
    fn test_priority_counts() {
        let counts = PriorityCounts::from_issues(&sample_issues());
        assert_eq!(counts, PriorityCounts { p0: 1, p1: 1, p2: 1, total: 3 });
        assert_eq!(max_category_total(&[]), 0);
        assert_eq!(max_module_total(&[]), 0);
    }
}
