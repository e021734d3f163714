//! Domain Layer
//!
//! Value objects, entities and ports. Nothing in here spawns processes or
//! knows about COLMAP, ffmpeg or specific file formats.

pub mod entities;
pub mod ports;
pub mod value_objects;
