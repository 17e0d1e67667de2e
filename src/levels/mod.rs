//! Tag-to-severity resolution.

mod level_map;
mod resolver;

pub use level_map::LevelMap;
pub use resolver::{ResolvedEvent, Resolver, shape_record};
