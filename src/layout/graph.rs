use super::*;

/// Validated kinship indices over the caller's people.
///
/// Every map is keyed by id in ascending order and every adjacency list keeps
/// first-seen order without duplicates, so traversals over a `Graph` are
/// deterministic for identical input.
#[derive(Debug, Clone)]
pub struct Graph<'a> {
    pub people: &'a [Person],
    pub by_id: BTreeMap<PersonId, &'a Person>,
    /// Symmetric: `spouses[a] == b` iff `spouses[b] == a`.
    pub spouses: BTreeMap<PersonId, PersonId>,
    pub children_of: BTreeMap<PersonId, Vec<PersonId>>,
    pub parents_of: BTreeMap<PersonId, Vec<PersonId>>,
}

impl<'a> Graph<'a> {
    pub fn build(
        people: &'a [Person],
        edges: &[Edge],
        fail_on_unknown_ids: bool,
    ) -> Result<Self, LayoutError> {
        let mut by_id = BTreeMap::new();
        for person in people {
            if by_id.insert(person.id, person).is_some() {
                return Err(LayoutError::DuplicateId { id: person.id });
            }
        }

        let mut graph = Graph {
            people,
            by_id,
            spouses: BTreeMap::new(),
            children_of: BTreeMap::new(),
            parents_of: BTreeMap::new(),
        };

        for edge in edges {
            if !graph.endpoints_known(edge, fail_on_unknown_ids)? {
                tracing::debug!(?edge, "dropping edge with unknown endpoint");
                continue;
            }
            match *edge {
                Edge::Spouse { a, b } => {
                    if a == b {
                        return Err(LayoutError::SelfSpouse { id: a });
                    }
                    graph.pair_spouses(a, b);
                }
                Edge::Parent { parent, child } => {
                    if parent == child {
                        return Err(LayoutError::SelfParent { id: parent });
                    }
                    push_unique(graph.children_of.entry(parent).or_default(), child);
                    push_unique(graph.parents_of.entry(child).or_default(), parent);
                }
            }
        }

        for (&child, parents) in &graph.parents_of {
            if parents.len() > 2 {
                return Err(LayoutError::TooManyParents {
                    child,
                    count: parents.len(),
                });
            }
        }

        tracing::trace!(
            people = graph.by_id.len(),
            couples = graph.spouses.len() / 2,
            "kinship graph built"
        );
        Ok(graph)
    }

    fn endpoints_known(&self, edge: &Edge, strict: bool) -> Result<bool, LayoutError> {
        let (first, second) = match *edge {
            Edge::Spouse { a, b } => (a, b),
            Edge::Parent { parent, child } => (parent, child),
        };
        for id in [first, second] {
            if !self.by_id.contains_key(&id) {
                if strict {
                    return Err(LayoutError::UnknownReference {
                        id,
                        kind: edge.kind(),
                    });
                }
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// First recorded pairing wins; one spouse per person is a model limit.
    fn pair_spouses(&mut self, a: PersonId, b: PersonId) {
        let taken = |id: PersonId, other: PersonId| {
            self.spouses
                .get(&id)
                .is_some_and(|current| *current != other)
        };
        if taken(a, b) || taken(b, a) {
            tracing::debug!(a, b, "ignoring second spouse pairing");
            return;
        }
        self.spouses.insert(a, b);
        self.spouses.insert(b, a);
    }

    pub fn person(&self, id: PersonId) -> Option<&'a Person> {
        self.by_id.get(&id).copied()
    }

    pub fn contains(&self, id: PersonId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn spouse(&self, id: PersonId) -> Option<PersonId> {
        self.spouses.get(&id).copied()
    }

    pub fn parents(&self, id: PersonId) -> &[PersonId] {
        self.parents_of.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn children(&self, id: PersonId) -> &[PersonId] {
        self.children_of.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn push_unique(list: &mut Vec<PersonId>, id: PersonId) {
    if !list.contains(&id) {
        list.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::EdgeKind;

    fn people(ids: &[PersonId]) -> Vec<Person> {
        ids.iter()
            .map(|id| Person::new(*id, "P", &id.to_string()))
            .collect()
    }

    #[test]
    fn indexes_spouses_and_parents() {
        let people = people(&[1, 2, 3]);
        let edges = [
            Edge::spouse(1, 2),
            Edge::parent(1, 3),
            Edge::parent(2, 3),
            Edge::parent(1, 3),
        ];
        let graph = Graph::build(&people, &edges, true).unwrap();
        assert_eq!(graph.spouse(1), Some(2));
        assert_eq!(graph.spouse(2), Some(1));
        assert_eq!(graph.parents(3), &[1, 2]);
        assert_eq!(graph.children(1), &[3]);
        assert!(graph.children(3).is_empty());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let people = people(&[1, 2, 1]);
        let err = Graph::build(&people, &[], true).unwrap_err();
        assert_eq!(err, LayoutError::DuplicateId { id: 1 });
    }

    #[test]
    fn strict_mode_rejects_unknown_ids() {
        let people = people(&[1, 2]);
        let err = Graph::build(&people, &[Edge::parent(1, 9)], true).unwrap_err();
        assert_eq!(
            err,
            LayoutError::UnknownReference {
                id: 9,
                kind: EdgeKind::Parent
            }
        );
    }

    #[test]
    fn lenient_mode_drops_unknown_edges() {
        let people = people(&[1, 2]);
        let edges = [Edge::spouse(1, 9), Edge::parent(1, 2)];
        let graph = Graph::build(&people, &edges, false).unwrap();
        assert_eq!(graph.spouse(1), None);
        assert_eq!(graph.children(1), &[2]);
    }

    #[test]
    fn rejects_self_edges() {
        let people = people(&[1]);
        assert_eq!(
            Graph::build(&people, &[Edge::spouse(1, 1)], true).unwrap_err(),
            LayoutError::SelfSpouse { id: 1 }
        );
        assert_eq!(
            Graph::build(&people, &[Edge::parent(1, 1)], true).unwrap_err(),
            LayoutError::SelfParent { id: 1 }
        );
    }

    #[test]
    fn first_spouse_wins() {
        let people = people(&[1, 2, 3]);
        let edges = [Edge::spouse(1, 2), Edge::spouse(3, 1), Edge::spouse(2, 1)];
        let graph = Graph::build(&people, &edges, true).unwrap();
        assert_eq!(graph.spouse(1), Some(2));
        assert_eq!(graph.spouse(3), None);
    }

    #[test]
    fn three_parents_is_fatal() {
        let people = people(&[1, 2, 3, 4]);
        let edges = [
            Edge::parent(1, 4),
            Edge::parent(2, 4),
            Edge::parent(3, 4),
        ];
        assert_eq!(
            Graph::build(&people, &edges, true).unwrap_err(),
            LayoutError::TooManyParents { child: 4, count: 3 }
        );
    }
}
