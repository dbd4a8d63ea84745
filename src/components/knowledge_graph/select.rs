//! Link pruning: bounds the number of edges drawn so frame rate stays
//! acceptable on large graphs.

use super::types::GraphLink;

/// Hard cap on rendered links.
pub const MAX_RENDERED_LINKS: usize = 100;

/// Indices of the links to draw, in their original relative order.
///
/// At or below the cap every link survives. Above it, links are ranked by
/// [`GraphLink::weight`] descending and only the top cap kept; ties keep
/// their original order.
pub fn rendered_links(links: &[GraphLink]) -> Vec<usize> {
	if links.len() <= MAX_RENDERED_LINKS {
		return (0..links.len()).collect();
	}
	let mut order: Vec<usize> = (0..links.len()).collect();
	// Stable sort, so equal weights stay in input order.
	order.sort_by(|&a, &b| links[b].weight().total_cmp(&links[a].weight()));
	order.truncate(MAX_RENDERED_LINKS);
	order.sort_unstable();
	order
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn links_with_strengths(strengths: &[f64]) -> Vec<GraphLink> {
		strengths
			.iter()
			.map(|&s| GraphLink::new("a", "b").with_strength(s))
			.collect()
	}

	#[test]
	fn at_or_below_cap_keeps_everything() {
		let links = links_with_strengths(&[3.0, 1.0, 2.0]);
		assert_eq!(rendered_links(&links), vec![0, 1, 2]);

		let at_cap = links_with_strengths(&vec![1.0; MAX_RENDERED_LINKS]);
		assert_eq!(rendered_links(&at_cap).len(), MAX_RENDERED_LINKS);
	}

	#[test]
	fn above_cap_keeps_the_strongest() {
		// Strengths 0..150: only the strongest 100 (indices 50..150) survive.
		let strengths: Vec<f64> = (0..150).map(|i| i as f64).collect();
		let links = links_with_strengths(&strengths);
		let kept = rendered_links(&links);
		assert_eq!(kept, (50..150).collect::<Vec<_>>());
	}

	#[test]
	fn ties_break_by_original_order() {
		// 101 equal-weight links: the last one is the only drop.
		let links = links_with_strengths(&vec![7.0; MAX_RENDERED_LINKS + 1]);
		let kept = rendered_links(&links);
		assert_eq!(kept, (0..MAX_RENDERED_LINKS).collect::<Vec<_>>());
	}

	#[test]
	fn missing_strength_ranks_at_zero() {
		let mut links = links_with_strengths(&vec![1.0; MAX_RENDERED_LINKS]);
		links.push(GraphLink::new("a", "b"));
		links.push(GraphLink::new("a", "b").with_value(5.0));
		let kept = rendered_links(&links);
		assert_eq!(kept.len(), MAX_RENDERED_LINKS);
		// The weightless link loses; the value-backed one outranks the rest.
		assert!(!kept.contains(&MAX_RENDERED_LINKS));
		assert!(kept.contains(&(MAX_RENDERED_LINKS + 1)));
	}
}
