//! Package implement a self-balancing ordered binary-search-tree engine.
//!
//! The engine maintains three guarantees across every mutation:
//!
//! * In-order traversal always yields keys in comparator order.
//! * A structural balance invariant, either height-balance (AVL) or
//!   red/black coloring, keeping every operation logarithmic.
//! * Stable bidirectional cursors: a node never moves, so a cursor
//!   survives every mutation except the removal of the node it points
//!   at.
//!
//! Following types are implemented on top of the engine:
//!
//! * [Tree] is the engine itself, parametrised over value-type, key
//!   extraction, comparator and balancing discipline.
//! * [OMap] projects {Key, Value} pairs onto the engine.
//! * [OSet] projects bare keys onto the engine.
//!
//! Balancing discipline is selected at construction time by choosing
//! [Avl] or [Rb] as the type parameter, and cannot change afterward.
//!
//! Constructing a new [OMap] instance and CRUD operations:
//!
//! ```
//! use otree::OMap;
//!
//! let mut index: OMap<String,String> = OMap::new();
//! assert_eq!(index.len(), 0);
//! assert_eq!(index.is_empty(), true);
//!
//! index.set("key1".to_string(), "value1".to_string());
//! index.set("key2".to_string(), "value2".to_string());
//!
//! let n = index.len();
//! assert_eq!(n, 2);
//!
//! let value = index.get("key1").unwrap();
//! assert_eq!(value, &"value1".to_string());
//!
//! let old_value = index.remove("key1").unwrap();
//! assert_eq!(old_value, "value1".to_string());
//! ```
//!
//! Using the engine directly, with duplicate keys and an AVL discipline:
//!
//! ```
//! use otree::{Avl, Natural, SelfKey, Tree};
//!
//! let mut tree: Tree<i32, SelfKey, Natural, Avl> = Tree::new();
//! tree.insert_equal(10);
//! tree.insert_equal(10);
//! let (_, inserted) = tree.insert_unique(10);
//! assert_eq!(inserted, false);
//! assert_eq!(tree.count(&10), 2);
//! ```

use std::{error, fmt, result};

// Short form to compose Error values.
//
// Here are few possible ways:
//
// ```ignore
// use crate::Error;
// err_at!(Fatal, msg: format!("bad argument"));
// ```
//
// ```ignore
// use crate::Error;
// err_at!(Fatal, std::io::read(buf));
// ```
//
macro_rules! err_at {
    ($v:ident, msg: $($arg:expr),+) => {{
        let prefix = format!("{}:{}", file!(), line!());
        Err(Error::$v(prefix, format!($($arg),+)))
    }};
    ($v:ident, $e:expr) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => {
                let prefix = format!("{}:{}", file!(), line!());
                Err(Error::$v(prefix, format!("{}", err)))
            }
        }
    }};
}

mod avl;
mod node;
mod omap;
mod oset;
mod rb;
mod tree;

pub use avl::Avl;
pub use omap::OMap;
pub use oset::OSet;
pub use rb::Rb;
pub use tree::{Balance, Comparator, Cursor, Iter, KeyOf, Natural, PairKey, SelfKey, Tree};

/// Error variants that are returned by this package's API.
///
/// Each variant carries a prefix, typically identifying the
/// error location.
pub enum Error {
    Fatal(String, String),
    KeyNotFound(String, String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        use Error::*;

        match self {
            Fatal(p, msg) => write!(f, "{} Fatal: {}", p, msg),
            KeyNotFound(p, msg) => write!(f, "{} KeyNotFound: {}", p, msg),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        write!(f, "{}", self)
    }
}

impl error::Error for Error {}

/// Type alias for Result return type, used by this package.
pub type Result<T> = result::Result<T, Error>;
