mod arena;
mod handle;
mod node;
mod raw_osavl_map;
mod size;

pub(crate) use raw_osavl_map::{RawIter, RawOSAvlMap};
