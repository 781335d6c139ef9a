//! Collection operations built on [`each`](crate::each) and
//! [`reduce`](crate::reduce).

pub mod advanced;
pub mod derived;
pub mod merge;

pub use advanced::{
    difference, flatten, intersection, shuffle, shuffle_with, sort_by, zip, SortCriterion,
};
pub use derived::{
    contains, every, filter, first, identity, index_of, invoke, last, map, pluck, reject, some,
    uniq, Method,
};
pub use merge::{defaults, extend};
