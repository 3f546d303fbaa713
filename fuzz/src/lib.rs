//! Shared code for the vimexpr fuzz targets.

pub mod seeds;
