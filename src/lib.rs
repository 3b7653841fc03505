//! Order-statistic AVL collections with lazy key shifting.
//!
//! This crate provides [`OSAvlMap`] and [`OSAvlSet`], ordered collections of
//! integer keys that answer, in O(log n):
//!
//! - [`count_less`](OSAvlMap::count_less) - How many keys are below a bound
//! - [`select`](OSAvlMap::select) - The k-th smallest key, counting from 1
//! - [`predecessor_or_equal`](OSAvlMap::predecessor_or_equal) - The largest key not above a bound
//! - [`shift_from`](OSAvlMap::shift_from) - Add a delta to every key at or above a bound
//!
//! # Example
//!
//! ```
//! use lazy_ostree::OSAvlSet;
//!
//! // Start offsets of the tokens in a line being edited.
//! let mut tokens: OSAvlSet<u32> = [0, 4, 9, 15].into();
//!
//! // Three characters typed at column 5 push every later token right.
//! tokens.shift_from(5, 3).unwrap();
//! assert_eq!(tokens.iter().collect::<Vec<_>>(), [0, 4, 12, 18]);
//!
//! // The token under the cursor at column 13, and its index.
//! assert_eq!(tokens.predecessor_or_equal(&13), Some(12));
//! assert_eq!(tokens.count_less(&12), 2);
//! assert_eq!(tokens.select(3), Some(12));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Multiset by default** - Equal keys are kept side by side; see [`Duplicates`]
//! - **Lazy shifts** - A suffix shift touches one root-to-leaf path
//!
//! # Implementation
//!
//! Both collections are AVL trees stored in an arena. Every node caches the
//! height and size of its two subtrees, which drives both rebalancing and
//! rank queries. A shift leaves a pending delta on the subtrees it covers;
//! mutating operations push that delta one level down as they pass a node,
//! while read-only queries add the pending deltas up along their path and
//! leave the tree as it is.
//!
//! Rejected shifts, and every rotation, are reported through the [`log`]
//! facade at `debug` and `trace` level.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod config;
mod error;
mod order_statistic;
mod ordinal;
mod raw;

pub mod osavl_map;
pub mod osavl_set;

pub use config::{Config, Duplicates};
pub use error::ShiftError;
pub use order_statistic::Rank;
pub use ordinal::Ordinal;
pub use osavl_map::OSAvlMap;
pub use osavl_set::OSAvlSet;
