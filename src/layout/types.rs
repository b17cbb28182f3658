use std::fmt;

use serde::Serialize;

use crate::config::BadgeLocale;
use crate::ir::{Person, PersonId};

/// Index into the union arena of a [`UnionTree`](super::UnionTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnionId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnionKind {
    /// Members in display order, left card first.
    Couple([PersonId; 2]),
    Single(PersonId),
    /// Joins disconnected ancestor branches under one root. Holds nobody.
    VirtualRoot,
}

impl UnionKind {
    pub fn members(&self) -> &[PersonId] {
        match self {
            Self::Couple(pair) => pair.as_slice(),
            Self::Single(id) => std::slice::from_ref(id),
            Self::VirtualRoot => &[],
        }
    }

    pub fn key(&self) -> UnionKey {
        match *self {
            Self::Couple([a, b]) => UnionKey::Couple(a.min(b), a.max(b)),
            Self::Single(id) => UnionKey::Single(id),
            Self::VirtualRoot => UnionKey::Virtual,
        }
    }
}

/// Stable identity of a union, independent of arena position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UnionKey {
    Couple(PersonId, PersonId),
    Single(PersonId),
    Virtual,
}

impl UnionKey {
    pub fn couple(a: PersonId, b: PersonId) -> Self {
        Self::Couple(a.min(b), a.max(b))
    }
}

impl fmt::Display for UnionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Couple(a, b) => write!(f, "couple:{a}-{b}"),
            Self::Single(id) => write!(f, "single:{id}"),
            Self::Virtual => f.write_str("virtual"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Union {
    pub kind: UnionKind,
    pub level: i32,
    pub parent: Option<UnionId>,
    pub children: Vec<UnionId>,
    pub own_width: f32,
    pub subtree_width: f32,
    /// Left edge of the union's own cards.
    pub left: f32,
    pub center_x: f32,
}

impl Union {
    pub(crate) fn new(kind: UnionKind, level: i32) -> Self {
        Self {
            kind,
            level,
            parent: None,
            children: Vec::new(),
            own_width: 0.0,
            subtree_width: 0.0,
            left: 0.0,
            center_x: 0.0,
        }
    }

    pub fn key(&self) -> UnionKey {
        self.kind.key()
    }

    pub fn members(&self) -> &[PersonId] {
        self.kind.members()
    }

    pub fn is_virtual(&self) -> bool {
        matches!(self.kind, UnionKind::VirtualRoot)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    #[serde(rename = "self")]
    Root,
    Spouse,
    Child,
    Grandchild,
    Parent,
    Grandparent,
    Sibling,
    InLaw,
    UncleAunt,
    NephewNiece,
    Cousin,
    Unknown,
}

impl Badge {
    pub fn code(self) -> &'static str {
        match self {
            Self::Root => "self",
            Self::Spouse => "spouse",
            Self::Child => "child",
            Self::Grandchild => "grandchild",
            Self::Parent => "parent",
            Self::Grandparent => "grandparent",
            Self::Sibling => "sibling",
            Self::InLaw => "in_law",
            Self::UncleAunt => "uncle_aunt",
            Self::NephewNiece => "nephew_niece",
            Self::Cousin => "cousin",
            Self::Unknown => "unknown",
        }
    }

    pub fn label(self, locale: BadgeLocale) -> &'static str {
        match locale {
            BadgeLocale::En => match self {
                Self::Root => "You",
                Self::Spouse => "Spouse",
                Self::Child => "Child",
                Self::Grandchild => "Grandchild",
                Self::Parent => "Parent",
                Self::Grandparent => "Grandparent",
                Self::Sibling => "Sibling",
                Self::InLaw => "In-law",
                Self::UncleAunt => "Uncle/aunt",
                Self::NephewNiece => "Nephew/niece",
                Self::Cousin => "Cousin",
                Self::Unknown => "Unknown",
            },
            BadgeLocale::Ru => match self {
                Self::Root => "Вы",
                Self::Spouse => "Супруг/супруга",
                Self::Child => "Ребёнок",
                Self::Grandchild => "Внук/внучка",
                Self::Parent => "Родитель",
                Self::Grandparent => "Дедушка/бабушка",
                Self::Sibling => "Брат/сестра",
                Self::InLaw => "Родственник через брак",
                Self::UncleAunt => "Дядя/тётя",
                Self::NephewNiece => "Племянник/племянница",
                Self::Cousin => "Кузен/кузина",
                Self::Unknown => "Не определено",
            },
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One person's card: top-left corner in pixels plus kinship to the root.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode<'a> {
    pub id: PersonId,
    pub person: &'a Person,
    pub badge: Badge,
    pub badge_label: &'static str,
    pub x: i32,
    pub y: i32,
    pub level: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mate_id: Option<PersonId>,
}
