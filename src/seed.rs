//! Built-in sample data.
//!
//! The dashboard has no backend; these collections are loaded into a fresh
//! [`Store`](crate::store::Store) at startup.

use crate::models::{
    Agent, AgentStatus, ApiToken, ArchitecturalConcern, Bottleneck, ChangeSummary,
    CodeDuplication, ConcernSeverity, Conclusion, Finding, ImpactAssessment, Issue, KeyFindings,
    LearnedRule, LearnedRuleKind, Measure, ModuleDef, PerformanceKpis, Priority, Report,
    ReportKind, ReportStat, Repository, RiskLevel, Role, Rule, TechStackRisk, TestInfo,
    TransactionDetail,
};

/// Module buckets used when no `[[modules]]` are configured.
pub fn default_modules() -> Vec<ModuleDef> {
    vec![
        ModuleDef::new("支付模块", "payment/", true),
        ModuleDef::new("订单模块", "order/", true),
        ModuleDef::new("库存模块", "inventory/", true),
        ModuleDef::new("用户模块", "user/", false),
        ModuleDef::new("公共组件", "common/", false),
    ]
}

pub fn agents() -> Vec<Agent> {
    vec![
        Agent {
            id: "agent-1".to_string(),
            name: "电商平台V3上线-性能压测".to_string(),
            status: AgentStatus::Running,
            repo: "payment-service".to_string(),
            role: "项目验收".to_string(),
            last_scan: "3小时前".to_string(),
            p0_issues: 5,
            p1_issues: 18,
            health: 78,
        },
        Agent {
            id: "agent-2".to_string(),
            name: "订单服务-精准测试".to_string(),
            status: AgentStatus::Scanning,
            repo: "order-service".to_string(),
            role: "非功能精准测试".to_string(),
            last_scan: "正在扫描... 68%".to_string(),
            p0_issues: 1,
            p1_issues: 7,
            health: 92,
        },
        Agent {
            id: "agent-3".to_string(),
            name: "前端团队-回归测试".to_string(),
            status: AgentStatus::Idle,
            repo: "web-frontend".to_string(),
            role: "非功能回归测试".to_string(),
            last_scan: "1天前".to_string(),
            p0_issues: 0,
            p1_issues: 3,
            health: 95,
        },
    ]
}

fn repository(
    id: &str,
    name: &str,
    url: &str,
    branch: &str,
    files: usize,
    language: &str,
    agents: usize,
) -> Repository {
    Repository {
        id: id.to_string(),
        name: name.to_string(),
        url: url.to_string(),
        main_branch: branch.to_string(),
        file_count: files,
        language: language.to_string(),
        agent_count: agents,
    }
}

pub fn repositories() -> Vec<Repository> {
    vec![
        repository("repo-1", "payment-service", "https://github.com/company/payment-service.git", "main", 500, "Java", 1),
        repository("repo-2", "web-frontend", "https://github.com/company/web-frontend.git", "master", 320, "TypeScript", 1),
        repository("repo-3", "order-service", "https://gitlab.com/company/order-service.git", "main", 420, "Java", 1),
        repository("repo-4", "user-service", "https://github.com/company/user-service.git", "develop", 280, "Python", 0),
        repository("repo-5", "data-analytics", "https://github.com/company/data-analytics.git", "main", 180, "Python", 0),
    ]
}

fn rule(id: &str, code: &str, name: &str, description: &str, priority: Priority, enabled: bool) -> Rule {
    Rule {
        id: id.to_string(),
        code: code.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        priority,
        enabled,
    }
}

pub fn rules() -> Vec<Rule> {
    vec![
        rule("rule-1", "1.2.3", "锁块内执行RPC调用", "在持有锁的代码块内执行远程调用，可能导致死锁或长时间阻塞", Priority::P1, true),
        rule("rule-2", "2.1.2", "事务中捕获异常未回滚", "在事务方法中捕获异常但未处理回滚，可能导致数据不一致", Priority::P1, true),
        rule("rule-3", "3.1.5", "使用SELECT *", "SQL查询使用SELECT *，影响性能且字段变更时容易出错", Priority::P2, true),
        rule("rule-4", "4.2.1", "空指针检查缺失", "方法参数或返回值可能为null，但未进行检查", Priority::P2, false),
    ]
}

#[allow(clippy::too_many_arguments)]
fn learned(
    id: &str,
    icon: &str,
    title: &str,
    source: &str,
    scope: &str,
    timestamp: &str,
    rule_logic: &str,
    kind: LearnedRuleKind,
) -> LearnedRule {
    LearnedRule {
        id: id.to_string(),
        icon: icon.to_string(),
        title: title.to_string(),
        source: source.to_string(),
        scope: scope.to_string(),
        timestamp: timestamp.to_string(),
        rule_logic: rule_logic.to_string(),
        kind,
    }
}

pub fn learned_rules() -> Vec<LearnedRule> {
    vec![
        learned(
            "lr-1", "🚫", "忽略测试文件中的\"空指针检查缺失\"", "你标记了3次忽略",
            "*Test.java 文件中的规则 4.2.1", "2025-10-20",
            "IF 文件匹配 \"*Test.java\" THEN 忽略规则 \"4.2.1\"",
            LearnedRuleKind::Ignore,
        ),
        learned(
            "lr-2", "⚠️", "标记为误报：\"配置类中的SELECT *\"", "你标记了5次误报",
            "Config.java 中的规则 3.1.5", "2025-10-18",
            "IF 文件路径包含 \"config/\" AND 规则==\"3.1.5\" THEN 标记为误报",
            LearnedRuleKind::Misreport,
        ),
        learned(
            "lr-3", "🔇", "降低优先级：工具类中的代码复杂度警告", "你总是跳过这类问题",
            "utils/ 目录下的 P2 问题", "2025-10-15",
            "IF 文件路径以 \"utils/\" 开头 AND 严重性==\"P2\" THEN 降低推荐优先级",
            LearnedRuleKind::PriorityDown,
        ),
        learned(
            "lr-4", "✅", "优先关注：支付模块中的事务问题", "你优先修复了这类问题",
            "payment/ 目录下的规则 2.1.2", "2025-10-10",
            "IF 文件路径包含 \"payment/\" AND 规则==\"2.1.2\" THEN 提升推荐优先级 ×1.5",
            LearnedRuleKind::PriorityUp,
        ),
        learned(
            "lr-5", "🔄", "正在学习中：生成代码的忽略模式", "你标记了2次忽略（需要3次以上）",
            "待确认", "2/3 次", "学习中，尚未形成规则...",
            LearnedRuleKind::Learning,
        ),
    ]
}

pub fn tokens() -> Vec<ApiToken> {
    vec![
        ApiToken {
            id: "token-1".to_string(),
            name: "GitLab CI Runner".to_string(),
            token_prefix: "hawk_a1b2c3d4".to_string(),
            last_used: "3小时前".to_string(),
            created: "2025-11-10".to_string(),
            expires: "2026-11-10".to_string(),
        },
        ApiToken {
            id: "token-2".to_string(),
            name: "本地开发调试".to_string(),
            token_prefix: "hawk_e5f6g7h8".to_string(),
            last_used: "1天前".to_string(),
            created: "2025-11-01".to_string(),
            expires: "永不过期".to_string(),
        },
    ]
}

fn debt_issues() -> Vec<Issue> {
    vec![
        Issue::new("td-1", Priority::P0, "payment/PaymentService.java", "锁块内执行RPC调用 - 可能导致死锁", "并发与锁"),
        Issue::new("td-2", Priority::P1, "order/OrderController.java", "事务中捕获异常未回滚 - 可能导致数据不一致", "事务与数据库"),
        Issue::new("td-3", Priority::P1, "payment/PaymentService.java", "外部HTTP调用未设置超时", "外部调用与容错"),
        Issue::new("td-4", Priority::P2, "order/OrderMapper.java", "SQL查询使用SELECT *", "事务与数据库"),
        Issue::new("td-5", Priority::P1, "inventory/StockService.java", "检测到N+1查询模式", "事务与数据库"),
        Issue::new("td-6", Priority::P2, "common/utils/DateUtils.java", "方法圈复杂度过高 (23)", "可维护性"),
        Issue::new("td-7", Priority::P2, "payment/RefundController.java", "与 PaymentController 存在45行重复代码", "可维护性"),
        Issue::new("td-8", Priority::P0, "order/OrderService.java", "本地缓存没有容量上限，可能导致OOM", "资源管理"),
        Issue::new("td-9", Priority::P2, "user/UserService.java", "空指针检查缺失", "可维护性"),
    ]
}

fn technical_debt_report() -> Report {
    Report {
        id: "report-1".to_string(),
        title: "支付服务 - 技术债治理周报".to_string(),
        icon: "📊".to_string(),
        agent_name: "电商平台V3上线-性能压测".to_string(),
        repo_name: "payment-service".to_string(),
        date: "2025-11-03".to_string(),
        stats: ReportStat {
            new_issues: 9,
            fixed_issues: 4,
            health_change: -2,
            p0_issues: 2,
        },
        created_by_role: Role::TechLead,
        kind: ReportKind::TechnicalDebt {
            health: 78,
            issues: debt_issues(),
            architectural_concerns: vec![
                ArchitecturalConcern {
                    title: "循环依赖".to_string(),
                    description: "在 payment-service 中，'service' 层和 'repository' 层之间检测到循环依赖，破坏了分层架构。".to_string(),
                    severity: ConcernSeverity::High,
                },
                ArchitecturalConcern {
                    title: "核心组件过度耦合".to_string(),
                    description: "`common-utils` 模块与多个业务模块存在双向依赖，建议重构为单向依赖。".to_string(),
                    severity: ConcernSeverity::Medium,
                },
            ],
            tech_stack_risks: vec![TechStackRisk {
                library: "log4j".to_string(),
                version: "2.14.0".to_string(),
                risk: "存在已知安全漏洞 (Log4Shell)，建议立即升级。".to_string(),
            }],
            duplications: vec![CodeDuplication {
                first_file: "PaymentController.java".to_string(),
                second_file: "RefundController.java".to_string(),
                lines: 45,
                module: "payment-service".to_string(),
            }],
        },
    }
}

fn change_risk_report() -> Report {
    Report {
        id: "report-2".to_string(),
        title: "订单服务 - 变更风险评估 (#482)".to_string(),
        icon: "⚠️".to_string(),
        agent_name: "订单服务-精准测试".to_string(),
        repo_name: "order-service".to_string(),
        date: "2025-11-05".to_string(),
        stats: ReportStat {
            new_issues: 3,
            fixed_issues: 0,
            health_change: -4,
            p0_issues: 1,
        },
        created_by_role: Role::Developer,
        kind: ReportKind::ChangeRisk {
            risk_level: RiskLevel::High,
            affected_files: vec![
                "order/OrderService.java".to_string(),
                "order/OrderController.java".to_string(),
                "inventory/StockService.java".to_string(),
            ],
            new_issues: vec![
                Issue::new("cr-1", Priority::P0, "order/OrderService.java", "事务中包含了对外部的RPC调用", "事务与数据库"),
                Issue::new("cr-2", Priority::P1, "inventory/StockService.java", "在锁块内部执行了RPC调用", "并发与锁"),
                Issue::new("cr-3", Priority::P2, "order/OrderController.java", "入参未做长度校验", "可维护性"),
            ],
        },
    }
}

fn precision_test_report() -> Report {
    Report {
        id: "report-3".to_string(),
        title: "订单创建接口 - 非功能精准测试报告".to_string(),
        icon: "🎯".to_string(),
        agent_name: "订单服务-精准测试".to_string(),
        repo_name: "order-service".to_string(),
        date: "2025-11-08".to_string(),
        stats: ReportStat {
            new_issues: 2,
            fixed_issues: 0,
            health_change: 0,
            p0_issues: 1,
        },
        created_by_role: Role::TechLead,
        kind: ReportKind::PrecisionTest {
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
                    priority: Priority::P0,
                    description: "数据库连接池耗尽导致大量请求超时".to_string(),
                    component: "OrderRepository.java".to_string(),
                    suggestion: "增加数据库连接池大小，并排查慢SQL查询。".to_string(),
                },
                Bottleneck {
                    id: "b2".to_string(),
                    priority: Priority::P1,
                    description: "GC活动频繁导致应用STW（Stop-The-World）".to_string(),
                    component: "JVM Management".to_string(),
                    suggestion: "优化内存分配，调整JVM垃圾回收器参数。".to_string(),
                },
            ],
            transactions: vec![
                TransactionDetail {
                    id: "t1".to_string(),
                    endpoint: "/api/v2/order/create".to_string(),
                    requests: 450_000,
                    avg: 850,
                    p95: 1800,
                    p99: 2500,
                    error_rate: 0.2,
                },
                TransactionDetail {
                    id: "t2".to_string(),
                    endpoint: "/api/v2/order/query".to_string(),
                    requests: 120_000,
                    avg: 120,
                    p95: 250,
                    p99: 400,
                    error_rate: 0.0,
                },
                TransactionDetail {
                    id: "t3".to_string(),
                    endpoint: "/api/v2/user/profile".to_string(),
                    requests: 800_000,
                    avg: 50,
                    p95: 90,
                    p99: 150,
                    error_rate: 0.0,
                },
            ],
        },
    }
}

#[allow(clippy::too_many_arguments)]
fn finding(
    id: &str,
    code: &str,
    category: &str,
    priority: Priority,
    file: &str,
    line: usize,
    description: &str,
    suggestion: &str,
    modules: &[&str],
    apis: &[&str],
) -> Finding {
    Finding {
        id: id.to_string(),
        code: code.to_string(),
        category: category.to_string(),
        priority,
        file: file.to_string(),
        line,
        description: description.to_string(),
        suggestion: suggestion.to_string(),
        code_snippet: None,
        affected_modules: modules.iter().map(|m| m.to_string()).collect(),
        affected_apis: apis.iter().map(|a| a.to_string()).collect(),
    }
}

fn reliability_findings() -> Vec<Finding> {
    let mut findings = vec![
        finding(
            "f-1", "1.2.3", "并发与锁", Priority::P0, "services/StockService.java", 112,
            "在锁块（synchronized/Lock）内部执行了RPC调用",
            "将RPC调用移出同步代码块，先释放锁再进行网络通信，以避免长时间阻塞和潜在的死锁风险。",
            &["库存模块", "订单模块"], &["/stock/decrease", "/order/create"],
        ),
        finding(
            "f-2", "1.3.1", "事务与数据库", Priority::P1, "services/OrderService.java", 88,
            "事务中包含了对外部的RPC调用",
            "应先执行数据库事务并提交，再进行RPC调用。若需保证一致性，请采用可靠消息最终一致性方案。",
            &["订单模块", "支付模块"], &["/order/create", "/payment/request"],
        ),
        finding(
            "f-3", "1.1.3", "资源管理", Priority::P1, "utils/FileProcessor.java", 45,
            "文件IO流等原生资源，未使用 try-with-resources 语句确保关闭",
            "将`new FileInputStream(...)`等资源创建语句包裹在`try-with-resources`中，确保流被自动关闭。",
            &["报表导出模块", "文件上传模块"], &["/report/export", "/file/upload"],
        ),
        finding(
            "f-4", "1.3.5", "事务与数据库", Priority::P1, "services/UserService.java", 201,
            "检测到N+1查询模式",
            "在查询用户列表后，循环查询了每个用户的订单。请使用JOIN查询或批量查询一次性获取所有用户的订单数据。",
            &["用户模块", "管理后台"], &["/api/v1/users/list-with-orders"],
        ),
        finding(
            "f-5", "1.2.5", "并发与锁", Priority::P2, "jobs/TaskScheduler.java", 31,
            "禁止使用 Executors.newFixedThreadPool，必须通过 ThreadPoolExecutor 构造函数显式创建",
            "使用`new ThreadPoolExecutor(...)`显式指定核心线程数、最大线程数、队列类型和拒绝策略，以避免资源耗尽风险。",
            &["异步任务模块", "全局"], &["/task/submit-async"],
        ),
        finding(
            "f-6", "3.2.1", "外部调用与容错", Priority::P1, "clients/PaymentApiClient.java", 56,
            "所有对外部依赖（HTTP/RPC）的调用，必须设置明确的超时时间",
            "为HttpClient或RPC客户端配置连接超时（Connect Timeout）和读取超时（Read Timeout）。",
            &["支付模块", "订单模块"], &["/order/create-and-pay"],
        ),
        finding(
            "f-7", "1.1.1", "资源管理", Priority::P2, "cache/LocalCacheManager.java", 25,
            "所有本地缓存都必须有容量上限",
            "推荐使用Caffeine/Guava等专业缓存库，或在手动实现的缓存中添加大小限制和淘汰策略。",
            &["商品信息模块", "用户配置模块"], &["/product/get/{id}", "/user/config"],
        ),
    ];

    findings[0].code_snippet = Some(
        "synchronized(this) {\n    Stock stock = stockMapper.selectById(productId);\n    if (stock.getCount() < amount) {\n        notificationRpcService.sendStockAlert(productId);\n    }\n}"
            .to_string(),
    );
    findings[5].code_snippet = Some("HttpClient client = HttpClient.newHttpClient();".to_string());

    findings
}

fn reliability_test_report() -> Report {
    Report {
        id: "report-6".to_string(),
        title: "核心交易链路 - 可靠性专项测试报告".to_string(),
        icon: "🛡️".to_string(),
        agent_name: "电商平台V3上线-性能压测".to_string(),
        repo_name: "payment-service".to_string(),
        date: "2025-11-10".to_string(),
        stats: ReportStat {
            new_issues: 7,
            fixed_issues: 2,
            health_change: -5,
            p0_issues: 1,
        },
        created_by_role: Role::Architect,
        kind: ReportKind::ReliabilityTest {
            health: 82,
            change_summary: ChangeSummary {
                title: "重构库存服务，并优化了订单创建流程".to_string(),
                file_count: 8,
                additions: 256,
                deletions: 98,
            },
            key_findings: KeyFindings {
                good_news: vec![
                    "修复了 2 个历史遗留问题".to_string(),
                    "库存服务 'StockService' 的代码复杂度从 15 降低到 9".to_string(),
                ],
                warnings: vec![
                    "在核心服务 'StockService.java' 中发现 1 个 P0 级严重问题".to_string(),
                    "在 'OrderService.java' 中发现 1 个 P1 级事务风险".to_string(),
                    "共发现 7 个新问题".to_string(),
                ],
            },
            impact_assessment: ImpactAssessment {
                scope: "变更涉及核心交易链路（库存、订单），影响范围：高".to_string(),
                recommendation: "建议在上线前重点测试“下单扣减库存”和“并发下单”场景。".to_string(),
            },
            findings: reliability_findings(),
        },
    }
}

/// Reports, newest first.
pub fn reports() -> Vec<Report> {
    vec![
        reliability_test_report(),
        precision_test_report(),
        change_risk_report(),
        technical_debt_report(),
    ]
}
