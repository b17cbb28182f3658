use super::*;

/// A packed row of sibling unions, in coordinates relative to the row start.
#[derive(Debug, Clone)]
struct PackedRow {
    /// Own-block left edge per child, in sibling order.
    slots: Vec<f32>,
    extent_left: f32,
    extent_right: f32,
    /// Midpoint between the first and last sibling's own-block centers.
    mid: f32,
}

impl PackedRow {
    /// Widest distance from `mid` to either extent edge.
    fn reach(&self) -> f32 {
        (self.mid - self.extent_left).max(self.extent_right - self.mid)
    }
}

pub(crate) fn own_width(kind: &UnionKind, options: &LayoutOptions) -> f32 {
    match kind {
        UnionKind::Couple(_) => options.couple_width(),
        UnionKind::Single(_) => options.card_width,
        UnionKind::VirtualRoot => 0.0,
    }
}

/// Fills in the geometry of every union, then moves the origin so the root
/// person's union starts at x = 0.
pub fn solve(tree: &mut UnionTree, options: &LayoutOptions) {
    measure(tree, options);
    place(tree, tree.top, 0.0, options.horizontal_gap);

    let origin = tree.get(tree.root).left;
    for union in &mut tree.unions {
        union.left -= origin;
        union.center_x -= origin;
    }
}

/// Post-order: children are measured before their parent.
fn measure(tree: &mut UnionTree, options: &LayoutOptions) {
    for idx in 0..tree.post_order.len() {
        let id = tree.post_order[idx];
        let union = tree.get(id);
        let own = own_width(&union.kind, options);
        let subtree = match pack_row(tree, &union.children, options.horizontal_gap) {
            Some(row) => own.max(2.0 * row.reach()),
            None => own,
        };
        let union = tree.get_mut(id);
        union.own_width = own;
        union.subtree_width = subtree;
    }
}

/// Pre-order: `boundary` is the left edge of the width allotted to `id`.
fn place(tree: &mut UnionTree, id: UnionId, boundary: f32, gap: f32) {
    let union = tree.get_mut(id);
    union.center_x = boundary + union.subtree_width / 2.0;
    union.left = union.center_x - union.own_width / 2.0;
    let center = union.center_x;
    let children = union.children.clone();

    let Some(row) = pack_row(tree, &children, gap) else {
        return;
    };
    let shift = center - row.mid;
    for (child, slot) in children.iter().zip(&row.slots) {
        let union = tree.get(*child);
        let overhang = (union.subtree_width - union.own_width) / 2.0;
        place(tree, *child, slot + shift - overhang, gap);
    }
}

/// Lays siblings left to right on own-width slots separated by `gap`, each
/// carrying its subtree extent centered over the slot. Whenever an extent
/// would come closer than `gap` to everything packed before it, the running
/// offset grows by the deficit, so that sibling and every later one move
/// right together.
fn pack_row(tree: &UnionTree, children: &[UnionId], gap: f32) -> Option<PackedRow> {
    let last = children.last()?;
    let mut slots = Vec::with_capacity(children.len());
    let mut cursor = 0.0f32;
    let mut rightmost = f32::NEG_INFINITY;
    let mut extent_left = 0.0f32;

    for (idx, child) in children.iter().enumerate() {
        let union = tree.get(*child);
        let overhang = (union.subtree_width - union.own_width) / 2.0;
        let mut left = cursor;
        if idx == 0 {
            extent_left = left - overhang;
        } else {
            let deficit = rightmost + gap - (left - overhang);
            if deficit > 0.0 {
                left += deficit;
            }
        }
        rightmost = rightmost.max(left + union.own_width + overhang);
        slots.push(left);
        cursor = left + union.own_width + gap;
    }

    let first_center = slots[0] + tree.get(children[0]).own_width / 2.0;
    let last_center = slots[slots.len() - 1] + tree.get(*last).own_width / 2.0;
    Some(PackedRow {
        slots,
        extent_left,
        extent_right: rightmost,
        mid: (first_center + last_center) / 2.0,
    })
}
