//! # Data Model
//!
//! The architecture document: a tree of [`Node`]s, a legend of
//! [`LegendEntry`] categories, and a title. The model is plain data plus the
//! invariant-preserving operations in [`tree`]; it is the single source of
//! truth, and the scene graph is rebuilt or patched from it.
//!
//! ## Key Components
//!
//! - [`Architecture`] - The document root, legend and title
//! - [`Node`] - A named, positioned entity owning its children
//! - [`LegendEntry`] - A named color category
//! - [`tree`] - `assign_ids`, `find_by_id`, `delete_by_id`, `get_color`, ...

pub mod architecture;
pub mod ids;
pub mod legend;
pub mod node;
pub mod tree;

pub use architecture::Architecture;
pub use legend::LegendEntry;
pub use node::Node;
pub use tree::{
    add_child, assign_ids, collect_descendant_ids, dedupe_ids, delete_by_id, find_by_id,
    find_by_id_mut, find_parent, get_color, get_color_or, map_colors_to_legend, visit_mut,
    DEFAULT_COLOR,
};
