use super::*;

/// Labels every person in `graph` with their kinship to `root_id`.
///
/// Rules apply in a fixed order and the first one to reach a person wins:
/// self and spouse, ancestors, descendants, siblings, in-laws, uncles/aunts
/// with their children, nephews/nieces. Whoever is left is `Unknown`.
pub fn classify(graph: &Graph<'_>, root_id: PersonId) -> HashMap<PersonId, Badge> {
    let mut badges = Badges::default();
    badges.mark(root_id, Badge::Root);
    if let Some(spouse) = graph.spouse(root_id) {
        badges.mark(spouse, Badge::Spouse);
    }

    let mut seen = HashSet::from([root_id]);
    mark_ancestors(graph, root_id, 1, &mut badges, &mut seen);
    let mut seen = HashSet::from([root_id]);
    mark_descendants(graph, root_id, 1, &mut badges, &mut seen);

    let root_parents = graph.parents(root_id);
    for person in graph.people {
        if person.id == root_id {
            continue;
        }
        let shares_parent = graph
            .parents(person.id)
            .iter()
            .any(|parent| root_parents.contains(parent));
        if shares_parent {
            badges.mark(person.id, Badge::Sibling);
        }
    }

    for person in graph.people {
        let Some(spouse) = graph.spouse(person.id) else {
            continue;
        };
        if badges.get(spouse).is_some_and(|badge| badge != Badge::Root) {
            badges.mark(person.id, Badge::InLaw);
        }
    }

    let mut parent_siblings: Vec<PersonId> = Vec::new();
    for parent in root_parents {
        for grandparent in graph.parents(*parent) {
            for kid in graph.children(*grandparent) {
                if !root_parents.contains(kid) && !parent_siblings.contains(kid) {
                    parent_siblings.push(*kid);
                }
            }
        }
    }
    for uncle in &parent_siblings {
        badges.mark(*uncle, Badge::UncleAunt);
        for cousin in graph.children(*uncle) {
            badges.mark(*cousin, Badge::Cousin);
        }
    }

    for person in graph.people {
        if badges.get(person.id) != Some(Badge::Sibling) {
            continue;
        }
        for kid in graph.children(person.id) {
            badges.mark(*kid, Badge::NephewNiece);
        }
    }

    for person in graph.people {
        badges.mark(person.id, Badge::Unknown);
    }
    badges.0
}

#[derive(Debug, Default)]
struct Badges(HashMap<PersonId, Badge>);

impl Badges {
    /// Never overwrites an earlier badge.
    fn mark(&mut self, id: PersonId, badge: Badge) {
        self.0.entry(id).or_insert(badge);
    }

    fn get(&self, id: PersonId) -> Option<Badge> {
        self.0.get(&id).copied()
    }
}

fn mark_ancestors(
    graph: &Graph<'_>,
    person: PersonId,
    depth: usize,
    badges: &mut Badges,
    seen: &mut HashSet<PersonId>,
) {
    for parent in graph.parents(person) {
        if !seen.insert(*parent) {
            continue;
        }
        let badge = if depth == 1 {
            Badge::Parent
        } else {
            Badge::Grandparent
        };
        badges.mark(*parent, badge);
        mark_ancestors(graph, *parent, depth + 1, badges, seen);
    }
}

fn mark_descendants(
    graph: &Graph<'_>,
    person: PersonId,
    depth: usize,
    badges: &mut Badges,
    seen: &mut HashSet<PersonId>,
) {
    for child in graph.children(person) {
        if !seen.insert(*child) {
            continue;
        }
        let badge = if depth == 1 {
            Badge::Child
        } else {
            Badge::Grandchild
        };
        badges.mark(*child, badge);
        mark_descendants(graph, *child, depth + 1, badges, seen);
    }
}
