use super::*;

/// A person's card position before badges are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedCard {
    pub id: PersonId,
    pub x: i32,
    pub y: i32,
    pub level: i32,
    pub mate_id: Option<PersonId>,
}

/// Turns solved unions into one card per person. Virtual unions hold nobody
/// and produce nothing.
pub fn expand_unions(tree: &UnionTree, options: &LayoutOptions) -> Vec<PlacedCard> {
    let mut cards = Vec::with_capacity(tree.union_of.len());
    let mut emitted = HashSet::new();
    let mate_offset = options.mate_offset().round() as i32;

    for id in &tree.post_order {
        let union = tree.get(*id);
        let x = union.left.floor() as i32;
        let y = row_y(union.level, options);
        let placements: Vec<(PersonId, i32, Option<PersonId>)> = match union.kind {
            UnionKind::Couple([first, second]) => vec![
                (first, x, Some(second)),
                (second, x + mate_offset, Some(first)),
            ],
            UnionKind::Single(only) => vec![(only, x, None)],
            UnionKind::VirtualRoot => continue,
        };
        for (person, x, mate_id) in placements {
            if !emitted.insert(person) {
                tracing::warn!(person, "person already placed; skipping duplicate card");
                continue;
            }
            cards.push(PlacedCard {
                id: person,
                x,
                y,
                level: union.level,
                mate_id,
            });
        }
    }
    cards
}

pub fn row_y(level: i32, options: &LayoutOptions) -> i32 {
    (level as f32 * options.row_height()).round() as i32
}
