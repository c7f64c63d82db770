//! CSV readers and writers for ingredient catalogs, price lists and mixes.

pub mod catalog;
