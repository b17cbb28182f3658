#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{BadgeLocale, Config, LayoutOptions, LayoutProfile, load_config};
pub use ir::{Edge, FamilyData, Person, PersonId, Sex};
pub use layout::{Badge, LayoutError, LayoutNode, compute_layout, find_overlaps};
