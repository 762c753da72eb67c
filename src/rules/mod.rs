//! Rule sets.
//!
//! - `negative`: `noindex`, `nofollow` and `noarchive`.
//! - `budget`: `max_snippet`, `max_image_preview` and `max_video_preview`.
//!
//! Each module exposes `get()`, returning its rules in declaration order. The
//! engine registry turns them into per-directive chains.

pub(crate) mod budget;
pub(crate) mod negative;
mod predicates;

#[cfg(test)]
mod tests;
