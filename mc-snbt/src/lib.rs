//! SNBT tag trees
//!
//! SNBT ("stringified NBT") is the text form of Minecraft's tag format. Mods
//! such as FTB Quests store their configuration in it. This crate provides:
//!
//! - [`TagNode`]: an in-memory tree with one enum variant per tag kind
//! - [`Parser`] / [`parse`]: text to tree
//! - [`to_snbt`]: tree to text, compact or FTB-style pretty
//! - [`loader`]: reading, writing and discovering `.snbt` files
//!
//! # Example
//!
//! ```
//! use mc_snbt::{Style, TagNode, parse, to_snbt};
//!
//! let mut tree = parse("{ title: \"Hello\", x: 1.5d }").unwrap();
//! if let TagNode::Compound(map) = &mut tree {
//!     map.insert("subtitle".to_string(), TagNode::string("World"));
//! }
//! assert_eq!(
//!     to_snbt(&tree, Style::Compact),
//!     r#"{title:"Hello",x:1.5d,subtitle:"World"}"#
//! );
//! ```

pub mod error;
pub mod loader;
pub mod parser;
pub mod tag;
pub mod writer;

pub use error::{SnbtError, SnbtResult};
pub use loader::{collect_snbt_files, load_file, save_file};
pub use parser::{Parser, parse};
pub use tag::{Compound, TagId, TagNode};
pub use writer::{Style, to_snbt};
