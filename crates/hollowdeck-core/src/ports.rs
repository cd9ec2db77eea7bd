//! Simulated system state: the port registry.
//!
//! A fixed roster of fabricated endpoints whose statuses and policies churn
//! stochastically over time, biased by drift. None of this reflects real
//! routing; the registry exists to be rendered. Routing "actions" and
//! handshake samples are cosmetic flavor drawn fresh each render, not
//! derived from any action history.

use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::rng::Mulberry32;

/// Gate class of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gate {
    Local,
    Internal,
    Public,
    Onchain,
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Internal => write!(f, "internal"),
            Self::Public => write!(f, "public"),
            Self::Onchain => write!(f, "onchain"),
        }
    }
}

/// Disclosure policy attached to a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    MinimalDisclosure,
    Filtered,
    Silent,
    Unverified,
    Irreversible,
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MinimalDisclosure => write!(f, "minimal disclosure"),
            Self::Filtered => write!(f, "filtered"),
            Self::Silent => write!(f, "silent"),
            Self::Unverified => write!(f, "unverified"),
            Self::Irreversible => write!(f, "irreversible"),
        }
    }
}

/// Displayed port status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortStatus {
    Open,
    Filtered,
    Silent,
    Looping,
    Leak,
    Active,
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Filtered => write!(f, "FILTERED"),
            Self::Silent => write!(f, "SILENT"),
            Self::Looping => write!(f, "LOOPING"),
            Self::Leak => write!(f, "LEAK"),
            Self::Active => write!(f, "ACTIVE"),
        }
    }
}

/// Claimed I/O direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IoDirection {
    Inbound,
    Outbound,
    Bidirectional,
}

impl fmt::Display for IoDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inbound => write!(f, "inbound"),
            Self::Outbound => write!(f, "outbound"),
            Self::Bidirectional => write!(f, "bidirectional"),
        }
    }
}

/// One simulated endpoint. Created once at startup, mutated in place,
/// never deleted.
#[derive(Debug, Clone)]
pub struct PortRecord {
    pub route: &'static str,
    pub gate: Gate,
    pub policy: Policy,
    pub status: PortStatus,
    pub io: IoDirection,
    pub last_mutated: Instant,
    /// Action tag for egress records ("egress-link", "egress-value").
    pub action: Option<&'static str>,
    pub hint: Option<&'static str>,
    pub egress: bool,
}

/// Value surfaced when the egress/value port is activated.
pub const EGRESS_VALUE: &str = "0x0000000000000000000000000000000000000000";

/// External endpoint behind the egress/link port.
pub const EGRESS_LINK_URL: &str = "https://github.com/hollowdeck/hollowdeck";

/// Base status draw pool. ACTIVE is a seed-only status: mutation never
/// assigns it.
const STATUS_POOL: [PortStatus; 5] = [
    PortStatus::Open,
    PortStatus::Filtered,
    PortStatus::Silent,
    PortStatus::Looping,
    PortStatus::Leak,
];

/// Negative-leaning pool used once drift passes the bias threshold.
const BIAS_POOL: [PortStatus; 4] = [
    PortStatus::Leak,
    PortStatus::Looping,
    PortStatus::Filtered,
    PortStatus::Silent,
];

/// Drift level above which status draws turn negative.
pub const BIAS_THRESHOLD: f64 = 0.6;

/// Chance a mutation also redraws the policy.
const POLICY_REROLL_CHANCE: f64 = 0.3;

const POLICY_POOL: [Policy; 3] = [Policy::MinimalDisclosure, Policy::Filtered, Policy::Silent];

const ACTION_POOL: [&str; 3] = ["allow", "throttle", "deny"];

const ANOMALY_POOL: [&str; 5] = [
    "route loop detected",
    "signal inversion",
    "trace timeout",
    "memory echo",
    "handshake partial",
];

/// Ports drawn for the handshake view each render.
const HANDSHAKE_SAMPLE: usize = 9;

// ---------------------------------------------------------------------------
// Render views
// ---------------------------------------------------------------------------

/// Flattened port entry for list views and JSON snapshots.
#[derive(Debug, Clone, Serialize)]
pub struct PortSnapshot {
    pub route: String,
    pub gate: String,
    pub policy: String,
    pub status: String,
    pub io: String,
    pub egress: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Routing-table row. The action column is sampled fresh each render.
#[derive(Debug, Clone, Serialize)]
pub struct RouteRow {
    pub route: String,
    pub gate: String,
    pub io: String,
    pub action: String,
    pub age: String,
}

/// Handshake-list row.
#[derive(Debug, Clone, Serialize)]
pub struct HandshakeRow {
    pub route: String,
    pub age: String,
}

/// One hub-summary line.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryLine {
    pub label: &'static str,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Human age of a mutation timestamp.
pub fn format_age(elapsed: Duration) -> String {
    let ms = elapsed.as_millis();
    if ms < 9_000 {
        "just now".to_string()
    } else if ms < 60_000 {
        format!("{}s", (ms / 1_000).max(1))
    } else if ms < 3_600_000 {
        format!("{}m", ms / 60_000)
    } else {
        format!("{}h", ms / 3_600_000)
    }
}

/// Uptime as hh:mm:ss.
pub fn format_uptime(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// The fixed registry of simulated ports.
pub struct PortRegistry {
    ports: Vec<PortRecord>,
}

impl PortRegistry {
    /// Seed the fixed roster: 9 internal/local routes plus 2 egress records.
    /// Each record's last-mutated stamp lands at a random point within the
    /// past hour.
    pub fn seed(rng: &mut Mulberry32, now: Instant) -> Self {
        let seeds: [(&'static str, Gate, Policy, PortStatus, IoDirection); 9] = [
            ("/deck.core", Gate::Local, Policy::MinimalDisclosure, PortStatus::Open, IoDirection::Bidirectional),
            ("/deck.core/archive", Gate::Internal, Policy::Filtered, PortStatus::Filtered, IoDirection::Inbound),
            ("/annex", Gate::Internal, Policy::Silent, PortStatus::Silent, IoDirection::Inbound),
            ("/agents/executor", Gate::Internal, Policy::MinimalDisclosure, PortStatus::Open, IoDirection::Outbound),
            ("/agents/router", Gate::Internal, Policy::Filtered, PortStatus::Looping, IoDirection::Bidirectional),
            ("/agents/auditor", Gate::Internal, Policy::Silent, PortStatus::Silent, IoDirection::Inbound),
            ("/agents/memory", Gate::Internal, Policy::MinimalDisclosure, PortStatus::Open, IoDirection::Outbound),
            ("/observer/echo", Gate::Local, Policy::Filtered, PortStatus::Filtered, IoDirection::Inbound),
            ("/trace/spool", Gate::Local, Policy::MinimalDisclosure, PortStatus::Open, IoDirection::Outbound),
        ];

        let mut ports: Vec<PortRecord> = seeds
            .iter()
            .map(|&(route, gate, policy, status, io)| PortRecord {
                route,
                gate,
                policy,
                status,
                io,
                last_mutated: now,
                action: None,
                hint: None,
                egress: false,
            })
            .collect();

        ports.push(PortRecord {
            route: "egress/link",
            gate: Gate::Public,
            policy: Policy::Unverified,
            status: PortStatus::Open,
            io: IoDirection::Outbound,
            last_mutated: now,
            action: Some("egress-link"),
            hint: Some("external signal propagation"),
            egress: true,
        });
        ports.push(PortRecord {
            route: "egress/value",
            gate: Gate::Onchain,
            policy: Policy::Irreversible,
            status: PortStatus::Active,
            io: IoDirection::Outbound,
            last_mutated: now,
            action: Some("egress-value"),
            hint: None,
            egress: true,
        });

        for port in &mut ports {
            let back = Duration::from_secs_f64(rng.range(0.0, 3600.0));
            port.last_mutated = now.checked_sub(back).unwrap_or(now);
        }

        Self { ports }
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    pub fn record(&self, idx: usize) -> Option<&PortRecord> {
        self.ports.get(idx)
    }

    /// Routes whose status is anything but SILENT.
    pub fn active_routes(&self) -> usize {
        self.ports
            .iter()
            .filter(|p| p.status != PortStatus::Silent)
            .count()
    }

    /// Mutate one uniformly chosen record: redraw its status (from the
    /// negative pool once drift passes the bias threshold), sometimes its
    /// policy, and stamp the mutation time.
    pub fn mutate(&mut self, rng: &mut Mulberry32, drift: f64, now: Instant) {
        let idx = rng.index(self.ports.len());
        let port = &mut self.ports[idx];
        port.status = if drift > BIAS_THRESHOLD {
            *rng.pick(&BIAS_POOL)
        } else {
            *rng.pick(&STATUS_POOL)
        };
        if rng.chance(POLICY_REROLL_CHANCE) {
            port.policy = *rng.pick(&POLICY_POOL);
        }
        port.last_mutated = now;
    }

    /// Compact list view. Egress records can be excluded, mainly for
    /// JSON snapshots.
    pub fn list(&self, include_egress: bool) -> Vec<PortSnapshot> {
        self.ports
            .iter()
            .filter(|p| include_egress || !p.egress)
            .map(|p| PortSnapshot {
                route: p.route.to_string(),
                gate: p.gate.to_string(),
                policy: p.policy.to_string(),
                status: p.status.to_string(),
                io: p.io.to_string(),
                egress: p.egress,
                action: p.action.map(str::to_string),
                hint: p.hint.map(str::to_string),
            })
            .collect()
    }

    /// Routing table: every record with a freshly sampled cosmetic action.
    pub fn routing(&self, rng: &mut Mulberry32, now: Instant) -> Vec<RouteRow> {
        self.ports
            .iter()
            .map(|p| RouteRow {
                route: p.route.to_string(),
                gate: p.gate.to_string(),
                io: p.io.to_string(),
                action: rng.pick(&ACTION_POOL).to_string(),
                age: format_age(now.duration_since(p.last_mutated)),
            })
            .collect()
    }

    /// Handshake view: a fresh uniform 9-of-N sample each render.
    pub fn handshakes(&self, rng: &mut Mulberry32, now: Instant) -> Vec<HandshakeRow> {
        let mut indices: Vec<usize> = (0..self.ports.len()).collect();
        rng.shuffle(&mut indices);
        indices
            .into_iter()
            .take(HANDSHAKE_SAMPLE.min(self.ports.len()))
            .map(|i| {
                let p = &self.ports[i];
                HandshakeRow {
                    route: p.route.to_string(),
                    age: format_age(now.duration_since(p.last_mutated)),
                }
            })
            .collect()
    }

    /// Hub summary: uptime, drift, and a column of fabricated health lines.
    pub fn summary(&self, rng: &mut Mulberry32, drift: f64, uptime: Duration) -> Vec<SummaryLine> {
        let anomaly = if rng.chance(0.55) {
            String::new()
        } else {
            rng.pick(&ANOMALY_POOL).to_string()
        };
        let coin = |rng: &mut Mulberry32, p: f64, a: &str, b: &str| {
            if rng.chance(p) { a.to_string() } else { b.to_string() }
        };
        let density = coin(rng, 0.5, "nominal", "sparse");
        let pressure = coin(rng, 0.5, "low", "elevated");
        let window = coin(rng, 0.5, "narrow", "wide");
        let load = coin(rng, 0.55, "steady", "spiky");
        let latency = coin(rng, 0.8, "within range", "spike");
        let echo = coin(rng, 0.4, "pending", "quiet");

        vec![
            SummaryLine { label: "uptime", value: format_uptime(uptime) },
            SummaryLine { label: "drift", value: format!("{drift:.2}") },
            SummaryLine { label: "trace integrity", value: "stable".to_string() },
            SummaryLine { label: "active routes", value: format!("{:02}", self.active_routes()) },
            SummaryLine { label: "routing density", value: density },
            SummaryLine { label: "buffer pressure", value: pressure },
            SummaryLine { label: "trace window", value: window },
            SummaryLine { label: "handshake load", value: load },
            SummaryLine { label: "observer latency", value: latency },
            SummaryLine { label: "echo state", value: echo },
            SummaryLine { label: "last anomaly", value: anomaly },
        ]
    }
}
