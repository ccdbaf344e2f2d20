// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Threshold evaluation producing Nagios-style verdicts
//!
//! Output has the shape `<CHECK> <STATUS> - <summary> | <perfdata>` and the
//! exit code follows the plugin convention (0 OK, 1 WARNING, 2 CRITICAL,
//! 3 UNKNOWN).

use std::fmt;
use std::str::FromStr;

use pk_core::{Evaluate, Metric, MetricValue, Outcome, Verdict};
use thiserror::Error;

/// Result tier, ordered by significance
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Status {
    Ok,
    Warning,
    Unknown,
    Critical,
}

impl Status {
    pub fn exit_code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
            Status::Unknown => 3,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid threshold range [{0}]")]
pub struct RangeError(String);

/// Nagios threshold range, `[@]start:end`
///
/// `start` defaults to 0 and may be `~` for negative infinity; an empty `end`
/// is positive infinity. A value outside the range alerts, or inside it when
/// the range starts with `@`.
#[derive(Clone, Debug, PartialEq)]
pub struct ThresholdRange {
    start: f64,
    end: f64,
    inside: bool,
    bounds: String,
}

impl ThresholdRange {
    pub fn violated_by(&self, value: f64) -> bool {
        let within = self.start <= value && value <= self.end;
        within == self.inside
    }
}

impl FromStr for ThresholdRange {
    type Err = RangeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || RangeError(raw.to_string());
        let (inside, bounds) = match raw.strip_prefix('@') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let number = |text: &str| text.parse::<f64>().map_err(|_| invalid());

        let (start, end) = match bounds.split_once(':') {
            None => (0.0, number(bounds)?),
            Some((start, end)) => {
                let start = match start {
                    "~" => f64::NEG_INFINITY,
                    "" => 0.0,
                    start => number(start)?,
                };
                let end = if end.is_empty() {
                    f64::INFINITY
                } else {
                    number(end)?
                };
                (start, end)
            }
        };
        if start.is_nan() || end.is_nan() || start > end {
            return Err(invalid());
        }

        Ok(Self {
            start,
            end,
            inside,
            bounds: bounds.to_string(),
        })
    }
}

impl fmt::Display for ThresholdRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inside {
            write!(f, "@")?;
        }
        write!(f, "{}", self.bounds)
    }
}

/// How one metric is judged
#[derive(Clone, Debug, PartialEq)]
pub enum Rule {
    /// Numeric metric must not exceed the bounds
    Upper {
        metric: String,
        warning: Option<f64>,
        critical: Option<f64>,
    },
    /// Numeric metric must not violate `range`
    Within {
        metric: String,
        range: ThresholdRange,
        otherwise: Status,
    },
    /// Text metric must be one of `expected` (no check when empty)
    Expect {
        metric: String,
        expected: Vec<String>,
        otherwise: Status,
    },
}

impl Rule {
    pub fn upper(metric: impl Into<String>, warning: Option<f64>, critical: Option<f64>) -> Self {
        Rule::Upper {
            metric: metric.into(),
            warning,
            critical,
        }
    }

    pub fn within(metric: impl Into<String>, range: ThresholdRange, otherwise: Status) -> Self {
        Rule::Within {
            metric: metric.into(),
            range,
            otherwise,
        }
    }

    pub fn expect(
        metric: impl Into<String>,
        expected: &[impl AsRef<str>],
        otherwise: Status,
    ) -> Self {
        Rule::Expect {
            metric: metric.into(),
            expected: expected.iter().map(|s| s.as_ref().to_string()).collect(),
            otherwise,
        }
    }

    fn metric(&self) -> &str {
        match self {
            Rule::Upper { metric, .. }
            | Rule::Within { metric, .. }
            | Rule::Expect { metric, .. } => metric,
        }
    }

    /// Warning and critical thresholds as rendered in perfdata
    fn perf_bounds(&self) -> (String, String) {
        let bound = |b: &Option<f64>| b.map(|b| b.to_string()).unwrap_or_default();
        match self {
            Rule::Upper {
                warning, critical, ..
            } => (bound(warning), bound(critical)),
            Rule::Within {
                range, otherwise, ..
            } if *otherwise == Status::Critical => (String::new(), range.to_string()),
            Rule::Within { range, .. } => (range.to_string(), String::new()),
            Rule::Expect { .. } => (String::new(), String::new()),
        }
    }

    fn judge(&self, metric: &Metric) -> (Status, Option<String>) {
        match (self, &metric.value) {
            (
                Rule::Upper {
                    warning, critical, ..
                },
                MetricValue::Numeric(value),
            ) => {
                if value.is_nan() {
                    return (Status::Ok, None);
                }
                if let Some(bound) = critical.filter(|bound| value > bound) {
                    return (
                        Status::Critical,
                        Some(format!("{} is {} (outside 0:{})", metric.name, value, bound)),
                    );
                }
                if let Some(bound) = warning.filter(|bound| value > bound) {
                    return (
                        Status::Warning,
                        Some(format!("{} is {} (outside 0:{})", metric.name, value, bound)),
                    );
                }
                (Status::Ok, None)
            }
            (
                Rule::Within {
                    range, otherwise, ..
                },
                MetricValue::Numeric(value),
            ) => {
                if value.is_nan() || !range.violated_by(*value) {
                    return (Status::Ok, None);
                }
                let relation = if range.inside { "inside" } else { "outside" };
                (
                    *otherwise,
                    Some(format!(
                        "{} is {} ({} {})",
                        metric.name, value, relation, range.bounds
                    )),
                )
            }
            (
                Rule::Expect {
                    expected,
                    otherwise,
                    ..
                },
                MetricValue::Text(value),
            ) => {
                if expected.is_empty() || expected.iter().any(|e| e.eq_ignore_ascii_case(value)) {
                    (Status::Ok, None)
                } else {
                    (
                        *otherwise,
                        Some(format!(
                            "{} is {} (expected {})",
                            metric.name,
                            value,
                            expected.join(",")
                        )),
                    )
                }
            }
            _ => (
                Status::Unknown,
                Some(format!("{} has an unexpected value type", metric.name)),
            ),
        }
    }
}

/// Stand-in for an external evaluation engine
#[derive(Clone, Debug)]
pub struct ThresholdEvaluator {
    check: String,
    rules: Vec<Rule>,
}

impl ThresholdEvaluator {
    pub fn new(check: impl Into<String>) -> Self {
        Self {
            check: check.into().to_uppercase(),
            rules: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    fn judge_all(&self, metrics: &[Metric]) -> (Status, Vec<String>) {
        let mut worst = Status::Ok;
        let mut hints = Vec::new();

        for rule in &self.rules {
            // Metrics the probe could not collect were reported as warnings
            let Some(metric) = metrics.iter().find(|m| m.name == rule.metric()) else {
                continue;
            };
            let (status, hint) = rule.judge(metric);
            if status > worst {
                worst = status;
                hints.insert(0, hint.unwrap_or_default());
            } else if let Some(hint) = hint {
                hints.push(hint);
            }
        }

        (worst, hints)
    }

    fn perfdata(&self, metrics: &[Metric]) -> String {
        metrics
            .iter()
            .filter_map(|m| {
                let value = m.as_f64()?;
                let (warning, critical) = self
                    .rules
                    .iter()
                    .find(|rule| rule.metric() == m.name)
                    .map(Rule::perf_bounds)
                    .unwrap_or_default();
                Some(format!(
                    "{}={}{};{};{}",
                    m.name, value, m.unit, warning, critical
                ))
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Evaluate for ThresholdEvaluator {
    fn evaluate(&self, outcome: &Outcome) -> Verdict {
        let (status, mut summary, perfdata) = match &outcome.metrics {
            Err(e) => (Status::Unknown, e.to_string(), String::new()),
            Ok(metrics) => {
                let (status, hints) = self.judge_all(metrics);
                let summary = if hints.is_empty() {
                    metrics
                        .iter()
                        .map(|m| format!("{}={}{}", m.name, m.value, m.unit))
                        .collect::<Vec<_>>()
                        .join(" ")
                } else {
                    hints.join(", ")
                };
                (status, summary, self.perfdata(metrics))
            }
        };

        for warning in outcome.warnings.iter() {
            summary.push_str(&format!(" [warning: {}]", warning));
        }

        let mut output = format!("{} {} - {}", self.check, status, summary);
        if !perfdata.is_empty() {
            output.push_str(" | ");
            output.push_str(&perfdata);
        }

        Verdict {
            output,
            exit_code: status.exit_code(),
        }
    }
}

#[cfg(test)]
#[path = "evaluate_tests.rs"]
mod tests;
