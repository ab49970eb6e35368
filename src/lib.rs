#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

extern crate alloc;

pub mod hash_map;
pub mod hash_set;
pub mod hash_table;
pub mod policy;

pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hash_table::HashTable;
pub use hash_table::Pos;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// Default [`BuildHasher`](core::hash::BuildHasher) used by [`HashMap`]
        /// and [`HashSet`] when none is supplied.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// Default [`BuildHasher`](core::hash::BuildHasher) used by [`HashMap`]
        /// and [`HashSet`] when none is supplied.
        pub type DefaultHashBuilder = std::collections::hash_map::RandomState;
    } else {
        compile_error!(
            "no default hasher available: enable the `foldhash` or `std` feature, \
             or construct containers with an explicit hasher"
        );
    }
}
