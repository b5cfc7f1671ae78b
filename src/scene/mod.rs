//! Show description (what to render) and its frame timeline.

pub mod model;
pub mod timeline;
