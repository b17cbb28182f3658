mod badge;
mod error;
mod expand;
mod graph;
mod solver;
pub(crate) mod types;
mod unions;
pub use badge::classify;
pub use error::LayoutError;
pub use expand::{PlacedCard, expand_unions, row_y};
pub use graph::Graph;
pub use solver::solve;
pub use types::*;
pub use unions::UnionTree;

use crate::config::LayoutOptions;
use crate::ir::{Edge, Person, PersonId, Sex};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// Computes card positions and kinship badges for everyone reachable from
/// `options.root_id`.
///
/// Runs the whole pipeline once: validate the graph, build the union tree,
/// solve widths and positions, expand unions into cards and classify badges.
/// The solver recurses once per generation, so stack use grows with the depth
/// of the family tree, not with its size.
///
/// # Errors
///
/// Any [`LayoutError`]; nothing is returned on failure.
pub fn compute_layout<'a>(
    people: &'a [Person],
    edges: &[Edge],
    options: &LayoutOptions,
) -> Result<Vec<LayoutNode<'a>>, LayoutError> {
    let root_id = options.validate()?;
    let graph = Graph::build(people, edges, options.fail_on_unknown_ids)?;
    let mut tree = UnionTree::build(&graph, root_id)?;
    solve(&mut tree, options);
    let cards = expand_unions(&tree, options);
    let badges = classify(&graph, root_id);

    let mut nodes = Vec::with_capacity(cards.len());
    for card in cards {
        let Some(person) = graph.person(card.id) else {
            continue;
        };
        let badge = badges.get(&card.id).copied().unwrap_or(Badge::Unknown);
        nodes.push(LayoutNode {
            id: card.id,
            person,
            badge,
            badge_label: badge.label(options.locale),
            x: card.x,
            y: card.y,
            level: card.level,
            mate_id: card.mate_id,
        });
    }
    tracing::debug!(root = root_id, nodes = nodes.len(), "family layout computed");
    Ok(nodes)
}

/// Axis-aligned box around every card, `(min_x, min_y, max_x, max_y)`.
pub fn bounding_box(
    nodes: &[LayoutNode<'_>],
    options: &LayoutOptions,
) -> Option<(i32, i32, i32, i32)> {
    let width = options.card_width.round() as i32;
    let height = options.card_height.round() as i32;
    let first = nodes.first()?;
    let mut bounds = (first.x, first.y, first.x + width, first.y + height);
    for node in nodes {
        bounds.0 = bounds.0.min(node.x);
        bounds.1 = bounds.1.min(node.y);
        bounds.2 = bounds.2.max(node.x + width);
        bounds.3 = bounds.3.max(node.y + height);
    }
    Some(bounds)
}

/// Every pair of cards whose rectangles intersect. Touching edges do not
/// count. Empty for any layout produced by [`compute_layout`].
pub fn find_overlaps(
    nodes: &[LayoutNode<'_>],
    options: &LayoutOptions,
) -> Vec<(PersonId, PersonId)> {
    let width = options.card_width.round() as i32;
    let height = options.card_height.round() as i32;
    let mut sorted: Vec<&LayoutNode<'_>> = nodes.iter().collect();
    sorted.sort_by_key(|node| (node.y, node.x));

    let mut overlaps = Vec::new();
    for (idx, a) in sorted.iter().enumerate() {
        for b in &sorted[idx + 1..] {
            if b.y >= a.y + height {
                break;
            }
            let apart = a.x + width <= b.x || b.x + width <= a.x;
            if !apart {
                overlaps.push((a.id.min(b.id), a.id.max(b.id)));
            }
        }
    }
    overlaps
}
