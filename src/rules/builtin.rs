use crate::models::Severity;
use crate::rules::RuleDefinition;

struct BuiltinRule {
    pattern: &'static str,
    cause: &'static str,
    severity: Severity,
    case_sensitive: bool,
    suggestions: &'static [&'static str],
}

// Scan order matters: causes are reported in first-match order.
const BUILTIN_RULES: &[BuiltinRule] = &[
    BuiltinRule {
        pattern: r"\b(OutOfMemory|OOMKilled|oom-kill|heap space)\b",
        cause: "Out of memory / memory pressure",
        severity: Severity::Critical,
        case_sensitive: false,
        suggestions: &[
            "Rollback the last deploy or reduce workload while investigating memory usage.",
            "Increase container memory limits or JVM heap if appropriate.",
            "Add heap dump on OOM and examine allocations.",
        ],
    },
    BuiltinRule {
        pattern: r"\b(connection refused|could not connect|ECONNREFUSED|database is down|timeout.*db)\b",
        cause: "Database connectivity issue",
        severity: Severity::High,
        case_sensitive: false,
        suggestions: &[
            "Check DB service health and network routes/security groups.",
            "Verify credentials / rotate secrets if recently changed.",
            "Fail over to replica if available.",
        ],
    },
    BuiltinRule {
        pattern: r"\b(ETIMEDOUT|ECONNRESET|timeout|TLS handshake timeout)\b",
        cause: "Network timeout / instability",
        severity: Severity::High,
        case_sensitive: false,
        suggestions: &[
            "Check recent infrastructure changes (load balancer, firewall, DNS).",
            "Add client-side timeouts/retries with backoff; validate upstream SLAs.",
            "Correlate with latency graphs in monitoring.",
        ],
    },
    BuiltinRule {
        pattern: r"\b5\d{2}\b",
        cause: "Spike in 5xx responses",
        severity: Severity::Critical,
        case_sensitive: true,
        suggestions: &[
            "Rollback the last deployment if errors began right after it.",
            "Enable circuit breakers or serve static fallback where possible.",
            "Check dependency health (DB/cache/queue)",
        ],
    },
    BuiltinRule {
        pattern: r"\b(migration|alembic|liquibase|flyway|prisma.*migrate)\b",
        cause: "Application/database migration failure",
        severity: Severity::High,
        case_sensitive: false,
        suggestions: &[
            "Rollback/mark migration as failed; restore from backup if necessary.",
            "Re-run migration in maintenance window after fix.",
            "Add pre-deploy migration dry-run to CI.",
        ],
    },
    BuiltinRule {
        pattern: r"\b(CrashLoopBackOff|Back-off restarting failed container)\b",
        cause: "Container crash loop",
        severity: Severity::High,
        case_sensitive: false,
        suggestions: &[
            "Inspect container logs from previous attempts; compare resource limits.",
            "Temporarily scale out a stable version while investigating.",
        ],
    },
    BuiltinRule {
        pattern: r"\b(ENOSPC|No space left on device)\b",
        cause: "Disk full",
        severity: Severity::High,
        case_sensitive: false,
        suggestions: &[
            "Clear logs/temp files; increase volume size.",
            "Set up log rotation and disk usage alerts.",
        ],
    },
    BuiltinRule {
        pattern: r"\b(panic|segfault|fatal error)\b",
        cause: "Crash / fatal error",
        severity: Severity::Critical,
        case_sensitive: false,
        suggestions: &[
            "Rollback to last known good build.",
            "Collect core dumps / stack traces for root-cause.",
        ],
    },
    BuiltinRule {
        pattern: r"\b(denied|unauthorized|forbidden|invalid credentials)\b",
        cause: "Auth / permission issue",
        severity: Severity::Medium,
        case_sensitive: false,
        suggestions: &[
            "Confirm token scopes/roles; rotate keys if compromised.",
            "Audit recent permission changes.",
        ],
    },
];

/// Definitions of the built-in rules, in scan order
pub fn builtin_definitions() -> Vec<RuleDefinition> {
    BUILTIN_RULES
        .iter()
        .map(|rule| RuleDefinition {
            pattern: rule.pattern.to_string(),
            cause: rule.cause.to_string(),
            severity: rule.severity,
            suggestions: rule.suggestions.iter().map(|s| s.to_string()).collect(),
            case_sensitive: rule.case_sensitive,
        })
        .collect()
}
