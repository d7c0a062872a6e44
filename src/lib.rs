#![doc = include_str!("../README.md")]

pub mod error;
pub mod s_list;

pub use error::Error;
pub use s_list::{HeadRef, Iter, LinkedList, Node};
