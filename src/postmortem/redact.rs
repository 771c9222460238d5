use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Marker substituted for every redacted span
pub const REDACTED: &str = "[REDACTED]";

/// One redaction pattern
pub struct RedactionPattern {
    pub name: &'static str,
    regex: Regex,
}

impl RedactionPattern {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).expect("redaction pattern is valid"),
        }
    }
}

/// Applied in order; each replaces every match with [`REDACTED`].
pub static REDACTION_PATTERNS: Lazy<Vec<RedactionPattern>> = Lazy::new(|| {
    vec![
        RedactionPattern::new(
            "credential_assignment",
            r#"(?i)(api[_-]?key|token|secret|password)\s*[:=]\s*["']?[A-Za-z0-9_\-]{8,}["']?"#,
        ),
        RedactionPattern::new("aws_access_key", r"AKIA[0-9A-Z]{16}"),
        RedactionPattern::new(
            "jwt",
            r"eyJ[a-zA-Z0-9_\-]+\.[a-zA-Z0-9_\-]+\.[a-zA-Z0-9_\-]+",
        ),
        RedactionPattern::new(
            "private_key",
            r"-----BEGIN (?:RSA|EC|DSA|OPENSSH) PRIVATE KEY-----[\s\S]*?-----END (?:RSA|EC|DSA|OPENSSH) PRIVATE KEY-----",
        ),
    ]
});

const PRIVATE_KEY: &str = "private_key";

static PEM_BEGIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"-----BEGIN (?:RSA|EC|DSA|OPENSSH) PRIVATE KEY-----").expect("pem begin is valid")
});

static PEM_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"-----END (?:RSA|EC|DSA|OPENSSH) PRIVATE KEY-----").expect("pem end is valid")
});

/// Redacted lines plus per-pattern replacement counts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedactionOutcome {
    pub lines: Vec<String>,
    pub counts: BTreeMap<&'static str, usize>,
}

impl RedactionOutcome {
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Redact a single line with every pattern
pub fn redact(line: &str) -> String {
    redact_counting(line, &mut BTreeMap::new())
}

fn redact_counting(line: &str, counts: &mut BTreeMap<&'static str, usize>) -> String {
    let mut current = line.to_string();
    for pattern in REDACTION_PATTERNS.iter() {
        let hits = pattern.regex.find_iter(&current).count();
        if hits == 0 {
            continue;
        }
        *counts.entry(pattern.name).or_insert(0) += hits;
        current = pattern.regex.replace_all(&current, REDACTED).into_owned();
    }
    current
}

/// Redact a sequence of lines.
///
/// Besides the per-line patterns, a private key block that opens on one line
/// and closes on a later one is redacted across the lines it spans. Key
/// markers are located in the raw text, so a credential-style prefix cannot
/// hide them. Line count is preserved.
pub fn redact_lines<S: AsRef<str>>(lines: &[S]) -> RedactionOutcome {
    let mut outcome = RedactionOutcome {
        lines: Vec::with_capacity(lines.len()),
        counts: BTreeMap::new(),
    };
    let mut in_key_block = false;

    for line in lines {
        let mut rest = line.as_ref();
        let mut out = String::new();

        if in_key_block {
            match PEM_END.find(rest) {
                Some(end) => {
                    out.push_str(REDACTED);
                    rest = &rest[end.end()..];
                    in_key_block = false;
                }
                None => {
                    outcome.lines.push(REDACTED.to_string());
                    continue;
                }
            }
        }

        while let Some(begin) = PEM_BEGIN.find(rest) {
            out.push_str(&redact_counting(&rest[..begin.start()], &mut outcome.counts));
            out.push_str(REDACTED);
            *outcome.counts.entry(PRIVATE_KEY).or_insert(0) += 1;

            let body = &rest[begin.end()..];
            match PEM_END.find(body) {
                Some(end) => rest = &body[end.end()..],
                None => {
                    rest = "";
                    in_key_block = true;
                }
            }
        }
        out.push_str(&redact_counting(rest, &mut outcome.counts));

        outcome.lines.push(out);
    }

    outcome
}
