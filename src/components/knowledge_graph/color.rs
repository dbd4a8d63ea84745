//! Color policy for nodes and links. Precedence runs top to bottom through
//! the match arms, so each rule is visible and testable on its own.

use super::types::{GraphLink, GraphNode, LinkKind, NodeKind};

pub const BACKGROUND: &str = "#1a1a2e";

pub const POSITIVE: &str = "#2ca02c";
pub const NEGATIVE: &str = "#d62728";
pub const NEUTRAL: &str = "#7f7f7f";

pub const PERSONA: &str = "#1f77b4";
pub const CONCEPT: &str = "#ff7f0e";
pub const EMOTION: &str = "#9467bd";
pub const LINK_DEFAULT: &str = "#64b4ff";

const POSITIVE_THRESHOLD: f64 = 0.5;
const NEGATIVE_THRESHOLD: f64 = -0.3;

/// Sentiment banding shared by nodes and links: strongly positive scores
/// go green, scores below the negative threshold go red, the rest gray.
pub fn sentiment_band(sentiment: f64) -> &'static str {
	if sentiment > POSITIVE_THRESHOLD {
		POSITIVE
	} else if sentiment < NEGATIVE_THRESHOLD {
		NEGATIVE
	} else {
		NEUTRAL
	}
}

/// Node fill color. Personas with a sentiment score use the band; every
/// other case falls through to the per-kind palette.
pub fn node_color(node: &GraphNode) -> &'static str {
	match (node.kind, node.sentiment) {
		(NodeKind::Persona, Some(s)) => sentiment_band(s),
		(NodeKind::Persona, None) => PERSONA,
		(NodeKind::Concept, _) => CONCEPT,
		(NodeKind::Emotion, _) => EMOTION,
	}
}

/// Link stroke color: sentiment first, then relation kind, then neutral.
pub fn link_color(link: &GraphLink) -> &'static str {
	match (link.sentiment, link.kind) {
		(Some(s), _) => sentiment_band(s),
		(None, Some(LinkKind::Disagrees)) => NEGATIVE,
		(None, Some(LinkKind::Agrees)) => POSITIVE,
		(None, None) => LINK_DEFAULT,
	}
}

/// Parses a `#rrggbb` palette entry.
pub fn rgb(hex: &str) -> (u8, u8, u8) {
	let v = u32::from_str_radix(hex.trim_start_matches('#'), 16).unwrap_or(0x7f7f7f);
	(((v >> 16) & 0xff) as u8, ((v >> 8) & 0xff) as u8, (v & 0xff) as u8)
}

/// Scales a palette color's brightness; a factor of 1.0 is the color itself.
pub fn shade(hex: &str, factor: f64) -> String {
	let (r, g, b) = rgb(hex);
	let scale = |c: u8| (f64::from(c) * factor).round().clamp(0.0, 255.0) as u8;
	format!("rgb({}, {}, {})", scale(r), scale(g), scale(b))
}
