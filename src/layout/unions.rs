use super::*;

/// Couples and singles reachable from the root, linked into one tree.
///
/// Unions live in an arena and refer to each other by [`UnionId`]. Every
/// child union sits on a strictly deeper level than its parent union, which
/// keeps the links acyclic even for malformed kinship data.
#[derive(Debug, Clone)]
pub struct UnionTree {
    pub unions: Vec<Union>,
    /// Children before parents, starting from `top`.
    pub post_order: Vec<UnionId>,
    pub by_key: HashMap<UnionKey, UnionId>,
    pub root: UnionId,
    pub top: UnionId,
    /// Breadth-first generation of every person reached from the root.
    pub levels: HashMap<PersonId, i32>,
    pub union_of: HashMap<PersonId, UnionId>,
}

#[derive(Debug, Clone, Copy)]
struct SiblingKey {
    earliest_birth: Option<NaiveDate>,
    min_member: PersonId,
}

impl UnionTree {
    pub fn build(graph: &Graph<'_>, root_id: PersonId) -> Result<Self, LayoutError> {
        if !graph.contains(root_id) {
            return Err(LayoutError::UnknownRoot { id: root_id });
        }
        let (levels, discovered) = assign_levels(graph, root_id);

        let mut tree = UnionTree {
            unions: Vec::new(),
            post_order: Vec::new(),
            by_key: HashMap::new(),
            root: UnionId(0),
            top: UnionId(0),
            levels,
            union_of: HashMap::new(),
        };
        tree.form_unions(graph, &discovered);
        tree.link_parents(graph);
        tree.root = tree.union_of[&root_id];
        tree.top = tree.find_top();
        tree.sort_siblings(graph);

        let mut post_order = Vec::with_capacity(tree.unions.len());
        tree.collect_post_order(tree.top, &mut post_order);
        tree.post_order = post_order;

        tracing::debug!(
            unions = tree.unions.len(),
            top = %tree.unions[tree.top.0].key(),
            "union tree built"
        );
        Ok(tree)
    }

    pub fn get(&self, id: UnionId) -> &Union {
        &self.unions[id.0]
    }

    pub fn get_mut(&mut self, id: UnionId) -> &mut Union {
        &mut self.unions[id.0]
    }

    pub fn lookup(&self, key: UnionKey) -> Option<&Union> {
        self.by_key.get(&key).map(|id| self.get(*id))
    }

    fn push(&mut self, union: Union) -> UnionId {
        let id = UnionId(self.unions.len());
        self.by_key.insert(union.key(), id);
        for member in union.members() {
            self.union_of.insert(*member, id);
        }
        self.unions.push(union);
        id
    }

    /// Walks people in discovery order, so a couple takes the level of
    /// whichever partner the traversal reached first.
    fn form_unions(&mut self, graph: &Graph<'_>, discovered: &[PersonId]) {
        for &person in discovered {
            if self.union_of.contains_key(&person) {
                continue;
            }
            let level = self.levels[&person];
            let kind = match graph.spouse(person) {
                Some(mate) if self.levels.contains_key(&mate) => {
                    UnionKind::Couple(couple_order(graph, person, mate))
                }
                _ => UnionKind::Single(person),
            };
            self.push(Union::new(kind, level));
        }
    }

    fn link_parents(&mut self, graph: &Graph<'_>) {
        for (&child, parents) in &graph.parents_of {
            let Some(&child_union) = self.union_of.get(&child) else {
                continue;
            };
            let Some(parent_union) = self.parent_union_for(graph, parents) else {
                continue;
            };
            if parent_union == child_union {
                continue;
            }
            if let Some(existing) = self.get(child_union).parent {
                if existing != parent_union {
                    tracing::debug!(
                        child,
                        kept = %self.get(existing).key(),
                        skipped = %self.get(parent_union).key(),
                        "union already has a parent union"
                    );
                }
                continue;
            }
            if self.get(child_union).level <= self.get(parent_union).level {
                tracing::debug!(
                    child,
                    "parent union is not above child union; leaving it unlinked"
                );
                continue;
            }
            self.get_mut(child_union).parent = Some(parent_union);
            self.get_mut(parent_union).children.push(child_union);
        }
    }

    fn parent_union_for(&self, graph: &Graph<'_>, parents: &[PersonId]) -> Option<UnionId> {
        if let [first, second] = parents
            && graph.spouse(*first) == Some(*second)
            && let Some(id) = self.by_key.get(&UnionKey::couple(*first, *second))
        {
            return Some(*id);
        }
        parents
            .first()
            .and_then(|parent| self.union_of.get(parent))
            .copied()
    }

    fn find_top(&mut self) -> UnionId {
        let candidates: Vec<UnionId> = (0..self.unions.len())
            .map(UnionId)
            .filter(|id| self.get(*id).parent.is_none())
            .collect();
        if let [only] = candidates.as_slice() {
            return *only;
        }
        let level = candidates
            .iter()
            .map(|id| self.get(*id).level)
            .min()
            .unwrap_or(0)
            - 1;
        let mut virtual_root = Union::new(UnionKind::VirtualRoot, level);
        virtual_root.children = candidates.clone();
        let top = self.push(virtual_root);
        for id in candidates {
            self.get_mut(id).parent = Some(top);
        }
        tracing::debug!(
            branches = self.get(top).children.len(),
            "joining disconnected ancestor branches under a virtual root"
        );
        top
    }

    fn sort_siblings(&mut self, graph: &Graph<'_>) {
        let mut unsorted = Vec::with_capacity(self.unions.len());
        self.collect_post_order(self.top, &mut unsorted);

        let mut keys = vec![
            SiblingKey {
                earliest_birth: None,
                min_member: PersonId::MAX,
            };
            self.unions.len()
        ];
        for id in unsorted {
            let union = self.get(id);
            let mut key = SiblingKey {
                earliest_birth: union
                    .members()
                    .iter()
                    .filter_map(|member| graph.person(*member).and_then(Person::born_on))
                    .min(),
                min_member: union.members().iter().copied().min().unwrap_or(PersonId::MAX),
            };
            for child in &union.children {
                key.earliest_birth = earliest(key.earliest_birth, keys[child.0].earliest_birth);
            }
            keys[id.0] = key;
        }

        for union in &mut self.unions {
            union
                .children
                .sort_by(|a, b| sibling_order(&keys[a.0], &keys[b.0]));
        }
    }

    fn collect_post_order(&self, id: UnionId, out: &mut Vec<UnionId>) {
        for child in &self.get(id).children {
            self.collect_post_order(*child, out);
        }
        out.push(id);
    }
}

/// Breadth-first levels from the root: parents one up, children one down,
/// spouses level. Returns the levels and the discovery order.
fn assign_levels(graph: &Graph<'_>, root_id: PersonId) -> (HashMap<PersonId, i32>, Vec<PersonId>) {
    let mut levels = HashMap::new();
    let mut discovered = vec![root_id];
    let mut queue = VecDeque::from([root_id]);
    levels.insert(root_id, 0);

    while let Some(person) = queue.pop_front() {
        let level = levels[&person];
        let parents = graph.parents(person).iter().map(|id| (*id, level - 1));
        let children = graph.children(person).iter().map(|id| (*id, level + 1));
        let spouse = graph.spouse(person).map(|id| (id, level));
        for (next, next_level) in parents.chain(children).chain(spouse) {
            if levels.contains_key(&next) {
                continue;
            }
            levels.insert(next, next_level);
            discovered.push(next);
            queue.push_back(next);
        }
    }
    (levels, discovered)
}

/// Male partner first when both sexes are known, otherwise ascending id.
fn couple_order(graph: &Graph<'_>, a: PersonId, b: PersonId) -> [PersonId; 2] {
    let (low, high) = (a.min(b), a.max(b));
    let sex = |id: PersonId| graph.person(id).and_then(|person| person.sex);
    if sex(low) == Some(Sex::Female) && sex(high) == Some(Sex::Male) {
        [high, low]
    } else {
        [low, high]
    }
}

fn earliest(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Option<NaiveDate> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (x, None) => x,
        (None, y) => y,
    }
}

/// Older branches first; branches without any known birth date go last;
/// ties fall back to the smallest member id.
fn sibling_order(a: &SiblingKey, b: &SiblingKey) -> Ordering {
    let by_date = match (a.earliest_birth, b.earliest_birth) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_date.then_with(|| a.min_member.cmp(&b.min_member))
}
