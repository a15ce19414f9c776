//! Pipeline stages for PDF-to-CBZ conversion.
//!
//! Each submodule implements exactly one step, so the engine in
//! [`crate::convert`] reads as a straight sequence and every stage can be
//! tested (or swapped, for the two adapter traits) on its own.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ workspace ──▶ render ──▶ archive ──▶ publish
//! (arg)     (temp dir)    (pdfium)   (zip)       (rename)
//! ```
//!
//! 1. [`input`]     — classify the argument and list candidate PDFs
//! 2. [`workspace`] — scoped scratch directory, removed on every exit path
//! 3. [`render`]    — [`render::Rasterizer`]: one image file per page
//! 4. [`archive`]   — [`archive::Archiver`]: pack the page images into a CBZ
//! 5. [`publish`]   — move the archive next to the source atomically

pub mod archive;
pub mod input;
pub mod publish;
pub mod render;
pub mod workspace;
