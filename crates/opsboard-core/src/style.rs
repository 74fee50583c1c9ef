//! Status-to-display-token lookup
//!
//! Categorical values (ticket status, approval, payment, priority) map to a
//! background/text color pair through static tables. Lookup is trimmed and
//! case-insensitive; anything unknown gets the neutral fallback.
//!
//! ```rust
//! use opsboard_core::style::{resolve_style, resolve_style_in, StylePalette};
//!
//! let solved = resolve_style(" SOLVED ");
//! assert_eq!(solved.bg_color, "#d4edda");
//! assert_eq!(solved.text_color, "#155724");
//!
//! let unknown = resolve_style("Escalated to vendor");
//! assert_eq!((unknown.bg_color, unknown.text_color), ("#f0f0f0", "#333"));
//!
//! assert_eq!(resolve_style_in(StylePalette::Payment, "unpaid").bg_color, "#f8d7da");
//! ```

use serde::{Deserialize, Serialize};

/// Fallback background for unknown values
pub const DEFAULT_BG: &str = "#f0f0f0";
/// Fallback text color for unknown values
pub const DEFAULT_TEXT: &str = "#333";

const GREEN: (&str, &str) = ("#d4edda", "#155724");
const YELLOW: (&str, &str) = ("#fff3cd", "#856404");
const CYAN: (&str, &str) = ("#d1ecf1", "#0c5460");
const RED: (&str, &str) = ("#f8d7da", "#721c24");

/// Lower-cased ticket status → (background, text)
const TICKET_STATUS: &[(&str, (&str, &str))] = &[
    ("solved", GREEN),
    ("training pending", YELLOW),
    ("in development", CYAN),
    ("feedback pending", RED),
    ("approved", GREEN),
    ("new", ("#d6d8d9", "#383d41")),
    ("feedback received", ("#e2e3e5", "#41464b")),
    ("in-review", ("#e8eaf6", "#3f51b5")),
    ("in-progress", ("#e3f2fd", "#0d47a1")),
    ("pending customer input", YELLOW),
    ("in observation", CYAN),
    ("solved - upcoming release", GREEN),
    ("upcoming release", ("#fefefe", "#6c757d")),
    ("closed", ("#e2e3e5", "#383d41")),
    ("pending maintenance", YELLOW),
    ("client conversation pending", RED),
    ("pending close", RED),
    ("upload pending", YELLOW),
    ("in planning", CYAN),
];

const APPROVAL: &[(&str, (&str, &str))] = &[
    ("approved", GREEN),
    ("pending", YELLOW),
    ("rejected", RED),
];

const PAYMENT: &[(&str, (&str, &str))] = &[
    ("paid", GREEN),
    ("partially paid", YELLOW),
    ("unpaid", RED),
];

const PRIORITY: &[(&str, (&str, &str))] = &[
    ("high", RED),
    ("medium", YELLOW),
    ("low", ("#e2e3e5", "#383d41")),
];

/// Which lookup table to resolve against
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StylePalette {
    #[default]
    TicketStatus,
    Approval,
    Payment,
    Priority,
}

impl StylePalette {
    fn table(&self) -> &'static [(&'static str, (&'static str, &'static str))] {
        match self {
            StylePalette::TicketStatus => TICKET_STATUS,
            StylePalette::Approval => APPROVAL,
            StylePalette::Payment => PAYMENT,
            StylePalette::Priority => PRIORITY,
        }
    }

    /// Every value the palette knows, lower-cased
    pub fn known_values(&self) -> impl Iterator<Item = &'static str> {
        self.table().iter().map(|(key, _)| *key)
    }
}

impl std::str::FromStr for StylePalette {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "status" | "ticket_status" => Ok(StylePalette::TicketStatus),
            "approval" => Ok(StylePalette::Approval),
            "payment" => Ok(StylePalette::Payment),
            "priority" => Ok(StylePalette::Priority),
            other => Err(format!("unknown palette: {other}")),
        }
    }
}

/// Display token for a categorical value
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleToken {
    /// The value as supplied, trimmed; "-" when empty
    pub label: String,
    pub bg_color: &'static str,
    pub text_color: &'static str,
}

impl StyleToken {
    pub fn is_default(&self) -> bool {
        self.bg_color == DEFAULT_BG && self.text_color == DEFAULT_TEXT
    }
}

/// Resolve a ticket status to its display token
pub fn resolve_style(status: &str) -> StyleToken {
    resolve_style_in(StylePalette::TicketStatus, status)
}

/// Resolve `value` against a specific palette
pub fn resolve_style_in(palette: StylePalette, value: &str) -> StyleToken {
    let label = value.trim();
    let normalized = label.to_lowercase();
    let (bg_color, text_color) = palette
        .table()
        .iter()
        .find(|(key, _)| *key == normalized)
        .map(|(_, colors)| *colors)
        .unwrap_or((DEFAULT_BG, DEFAULT_TEXT));

    StyleToken {
        label: if label.is_empty() { "-".to_string() } else { label.to_string() },
        bg_color,
        text_color,
    }
}
